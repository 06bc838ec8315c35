use crate::{AnalysisError, Result, SentimentRow, TopicRow};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const SENTIMENT_FILE: &str = "hasil_sentimen.csv";
pub const POSITIVE_TOPICS_FILE: &str = "hasil_topik_positif.csv";
pub const NEGATIVE_TOPICS_FILE: &str = "hasil_topik_negatif.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFile {
    Sentiment,
    PositiveTopics,
    NegativeTopics,
}

impl ExportFile {
    pub const ALL: [ExportFile; 3] = [ExportFile::Sentiment, ExportFile::PositiveTopics, ExportFile::NegativeTopics];

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFile::Sentiment => SENTIMENT_FILE,
            ExportFile::PositiveTopics => POSITIVE_TOPICS_FILE,
            ExportFile::NegativeTopics => NEGATIVE_TOPICS_FILE,
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.file_name() == name)
    }
}

pub struct ExportPaths {
    pub root: PathBuf,
}

impl ExportPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn file(&self, which: ExportFile) -> PathBuf { self.root.join(which.file_name()) }
}

pub fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_rows<R: Read, T: DeserializeOwned>(reader: R) -> Result<Vec<T>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

pub fn to_csv_bytes<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_rows(&mut buf, rows)?;
    Ok(buf)
}

pub fn save_sentiment(paths: &ExportPaths, rows: &[SentimentRow]) -> Result<PathBuf> {
    save(paths, ExportFile::Sentiment, rows)
}

/// Empty topic tables are not written; returns `None` for them.
pub fn save_topics(paths: &ExportPaths, which: ExportFile, rows: &[TopicRow]) -> Result<Option<PathBuf>> {
    if rows.is_empty() {
        return Ok(None);
    }
    save(paths, which, rows).map(Some)
}

fn save<T: Serialize>(paths: &ExportPaths, which: ExportFile, rows: &[T]) -> Result<PathBuf> {
    create_dir_all(&paths.root)?;
    let path = paths.file(which);
    let f = File::create(&path)?;
    write_rows(f, rows)?;
    Ok(path)
}

pub fn load_sentiment(paths: &ExportPaths) -> Result<Vec<SentimentRow>> {
    load(paths, ExportFile::Sentiment)
}

/// A missing topic table means that polarity had no reviews.
pub fn load_topics(paths: &ExportPaths, which: ExportFile) -> Result<Vec<TopicRow>> {
    match load(paths, which) {
        Err(AnalysisError::ResourceNotFound(_)) => Ok(Vec::new()),
        other => other,
    }
}

fn load<T: DeserializeOwned>(paths: &ExportPaths, which: ExportFile) -> Result<Vec<T>> {
    let path = paths.file(which);
    let f = File::open(&path).map_err(|e| AnalysisError::from_io(e, &path))?;
    read_rows(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sentiment;

    #[test]
    fn sentiment_header_and_values() {
        let rows = vec![SentimentRow { text: "bagus, cepat".into(), sentiment: Sentiment::Positive, confidence: 0.875 }];
        let bytes = to_csv_bytes(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "Text,Sentiment,Confidence\n\"bagus, cepat\",Positif,0.875\n");
    }

    #[test]
    fn topic_rows_read_back() {
        let data = "Text,Topic,Confidence\nserver down,-1,0.0\nrefund lama,2,0.61\n";
        let rows: Vec<TopicRow> = read_rows(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].topic, -1);
        assert_eq!(rows[1].confidence, 0.61);
    }

    #[test]
    fn export_file_names_resolve() {
        assert_eq!(ExportFile::from_file_name("hasil_topik_negatif.csv"), Some(ExportFile::NegativeTopics));
        assert_eq!(ExportFile::from_file_name("other.csv"), None);
    }
}
