use crate::{AnalysisError, Result};
use std::io::Read;

pub const TEXT_COLUMN: &str = "Text";

const SAMPLE_TEXTS: &[&str] = &[
    "Aplikasi Transjakarta sangat membantu untuk perjalanan sehari-hari karena informasi rute dan halte sangat jelas, serta fitur pelacak busnya memudahkan saya agar tidak menunggu terlalu lama.",
    "Pemesanan tiket sekarang sangat mudah dan cepat; saya hanya butuh beberapa klik dalam 1 menit langsung dapat tiket tanpa harus antre di loket stasiun.",
    "Sangat terkesan dengan petugas stasiun MRT yang sangat ramah dan sigap membantu, bahkan sampai menawarkan bantuan pengisian daya HP dan hotspot saat saya kesulitan 👍🏻",
    "Aplikasi Akses by KAI sekarang jauh lebih simpel dan praktis untuk beli tiket kereta api, pembayarannya pun bisa pakai KAI Pay yang sangat mempermudah bagi yang tidak punya m-banking.",
    "Fitur real-time tracking di aplikasi sangat akurat, saya bisa memantau posisi bus secara langsung sehingga rencana perjalanan jadi lebih efisien dan tidak menebak-nebak lagi.",
    "Sangat mengecewakan 😔 saya sudah bayar pakai KAI Pay dan saldo sudah terpotong, tapi status tiket tidak ter-update dan dana tidak otomatis kembali.",
    "Aplikasi sering sekali error dan loading lama padahal sinyal bagus; saat mau beli tiket lokal di jam sibuk, jadwal sering tidak muncul atau langsung habis dalam hitungan menit.",
    "Proses verifikasi menjadi member basic sangat berbelit-belit dan selalu muncul pesan 'ID sudah ada', padahal saya baru mencoba mendaftar.",
    "Sistem pembayarannya payah karena hanya tersedia e-wallet tertentu yang jarang dipakai orang, tolong kembalikan pilihan pembayaran populer seperti GoPay, OVO, atau Dana.",
    "Server sering sekali down atau mengalami internal server error, terutama di hari libur atau saat jam pemesanan tiket lokal dibuka, benar-benar menyusahkan 😡😤",
];

#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    Lines(String),
    Csv(String),
    Sample,
}

impl InputSource {
    pub fn into_reviews(self) -> Result<Vec<String>> {
        let reviews = match self {
            InputSource::Lines(text) => from_lines(&text),
            InputSource::Csv(content) => from_csv_reader(content.as_bytes())?,
            InputSource::Sample => sample_texts(),
        };
        ensure_non_empty(reviews)
    }
}

pub fn sample_texts() -> Vec<String> {
    SAMPLE_TEXTS.iter().map(|s| s.to_string()).collect()
}

pub fn from_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reviews from the `Text` column; blank cells are skipped.
pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let col = headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == TEXT_COLUMN)
        .ok_or_else(|| AnalysisError::input(format!("CSV must have a column named '{TEXT_COLUMN}'")))?;

    let mut texts = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if let Some(cell) = record.get(col) {
            if !cell.trim().is_empty() {
                texts.push(cell.to_string());
            }
        }
    }
    Ok(texts)
}

pub fn ensure_non_empty(reviews: Vec<String>) -> Result<Vec<String>> {
    if reviews.iter().all(|r| r.trim().is_empty()) {
        return Err(AnalysisError::input("no review text to analyze"));
    }
    Ok(reviews)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_review_per_non_blank_line() {
        let got = from_lines("  bagus sekali \n\n   \njelek banget\n");
        assert_eq!(got, vec!["bagus sekali", "jelek banget"]);
    }

    #[test]
    fn csv_requires_text_column() {
        let err = from_csv_reader("Review,Rating\nbagus,5\n".as_bytes()).unwrap_err();
        assert!(matches!(err, AnalysisError::InputValidation(_)));
    }

    #[test]
    fn csv_reads_text_column_and_skips_blanks() {
        let data = "Id,Text\n1,\"mantap, cepat\"\n2,\n3,lemot\n";
        let got = from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(got, vec!["mantap, cepat", "lemot"]);
    }

    #[test]
    fn blank_input_is_rejected() {
        let err = InputSource::Lines("   \n \n".into()).into_reviews().unwrap_err();
        assert!(matches!(err, AnalysisError::InputValidation(_)));
        assert_eq!(InputSource::Sample.into_reviews().unwrap().len(), 10);
    }
}
