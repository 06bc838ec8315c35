use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"[\p{L}\p{N}_]+").expect("valid regex");
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").expect("valid regex");
    /// Informal Indonesian spellings seen in app-store reviews. Values never appear as keys.
    static ref SLANG: HashMap<&'static str, &'static str> = {
        let pairs: &[(&str, &str)] = &[
            ("aja", "saja"), ("ajah", "saja"), ("doang", "saja"),
            ("apk", "aplikasi"), ("aplikasinya", "aplikasi nya"),
            ("bgt", "banget"), ("bngt", "banget"), ("bener", "benar"), ("bgs", "bagus"),
            ("bikin", "membuat"), ("blm", "belum"), ("bnyk", "banyak"), ("bs", "bisa"), ("bsa", "bisa"),
            ("cm", "cuma"), ("cmn", "cuma"),
            ("dgn", "dengan"), ("dg", "dengan"), ("dr", "dari"), ("dpt", "dapat"),
            ("emg", "memang"), ("emang", "memang"),
            ("ga", "tidak"), ("gak", "tidak"), ("gk", "tidak"), ("nggak", "tidak"), ("ngga", "tidak"),
            ("enggak", "tidak"), ("engga", "tidak"), ("tdk", "tidak"), ("tak", "tidak"),
            ("gimana", "bagaimana"), ("gmn", "bagaimana"),
            ("hrs", "harus"),
            ("jd", "jadi"), ("jdi", "jadi"), ("jg", "juga"), ("jgn", "jangan"),
            ("kalo", "kalau"), ("klo", "kalau"), ("kl", "kalau"), ("knp", "kenapa"), ("krn", "karena"),
            ("lg", "lagi"), ("lgsg", "langsung"), ("lemot", "lambat"),
            ("makasih", "terima kasih"), ("makasi", "terima kasih"), ("mksh", "terima kasih"),
            ("thx", "terima kasih"), ("tks", "terima kasih"),
            ("mantul", "mantap betul"),
            ("org", "orang"),
            ("pake", "pakai"), ("pk", "pakai"),
            ("sdh", "sudah"), ("udah", "sudah"), ("udh", "sudah"), ("dah", "sudah"),
            ("skrg", "sekarang"), ("sm", "sama"), ("sy", "saya"), ("gw", "saya"), ("gue", "saya"),
            ("tp", "tapi"), ("tpi", "tapi"), ("trs", "terus"),
            ("utk", "untuk"), ("u", "untuk"),
            ("yg", "yang"),
        ];
        pairs.iter().copied().collect()
    };
    /// Emoji glyph to alias; multi-word aliases use underscores.
    static ref EMOJI: HashMap<char, &'static str> = {
        let pairs: &[(char, &str)] = &[
            ('👍', "thumbs_up"), ('👎', "thumbs_down"), ('👌', "ok_hand"), ('👏', "clapping_hands"),
            ('🙏', "folded_hands"), ('💪', "flexed_biceps"),
            ('😀', "grinning_face"), ('😁', "beaming_face_with_smiling_eyes"), ('😂', "face_with_tears_of_joy"),
            ('🤣', "rolling_on_the_floor_laughing"), ('😃', "grinning_face_with_big_eyes"),
            ('😄', "grinning_face_with_smiling_eyes"), ('😅', "grinning_face_with_sweat"),
            ('😊', "smiling_face_with_smiling_eyes"), ('🙂', "slightly_smiling_face"),
            ('😍', "smiling_face_with_heart_eyes"), ('🥰', "smiling_face_with_hearts"),
            ('😘', "face_blowing_a_kiss"), ('🤩', "star_struck"), ('🥲', "smiling_face_with_tear"),
            ('🤔', "thinking_face"), ('😐', "neutral_face"), ('😑', "expressionless_face"),
            ('😒', "unamused_face"), ('🙄', "face_with_rolling_eyes"),
            ('😔', "pensive_face"), ('😞', "disappointed_face"), ('😟', "worried_face"),
            ('🙁', "slightly_frowning_face"), ('☹', "frowning_face"), ('😢', "crying_face"),
            ('😭', "loudly_crying_face"), ('😩', "weary_face"), ('😫', "tired_face"),
            ('😤', "face_with_steam_from_nose"), ('😠', "angry_face"), ('😡', "pouting_face"),
            ('🤬', "face_with_symbols_on_mouth"), ('😱', "face_screaming_in_fear"),
            ('💩', "pile_of_poo"), ('❤', "red_heart"), ('💔', "broken_heart"),
            ('🔥', "fire"), ('⭐', "star"), ('🌟', "glowing_star"), ('💯', "hundred_points"),
            ('🚌', "bus"), ('🚍', "oncoming_bus"), ('🚇', "metro"), ('🚆', "train"), ('🚉', "station"),
            ('🎫', "ticket"), ('💳', "credit_card"), ('📱', "mobile_phone"), ('⏰', "alarm_clock"),
            ('⌛', "hourglass_done"), ('⏳', "hourglass_not_done"),
        ];
        pairs.iter().copied().collect()
    };
    /// Non-ASCII characters that have no decomposition to ASCII.
    static ref ASCII_FALLBACK: HashMap<char, &'static str> = {
        let pairs: &[(char, &str)] = &[
            ('ß', "ss"), ('æ', "ae"), ('Æ', "ae"), ('œ', "oe"), ('Œ', "oe"),
            ('ø', "o"), ('Ø', "o"), ('ł', "l"), ('Ł', "l"), ('đ', "d"), ('Đ', "d"),
            ('ð', "d"), ('þ', "th"), ('ı', "i"),
            ('\u{2018}', "'"), ('\u{2019}', "'"), ('\u{201A}', "'"),
            ('\u{201C}', "\""), ('\u{201D}', "\""), ('\u{201E}', "\""), ('«', "\""), ('»', "\""),
            ('\u{2013}', "-"), ('\u{2014}', "-"), ('\u{2212}', "-"),
            ('\u{2026}', "..."), ('\u{2044}', "/"),
            ('•', "*"), ('×', "x"),
        ];
        pairs.iter().copied().collect()
    };
}

/// Clean a raw review before inference.
///
/// Steps run in a fixed order, each one assuming the output form of the previous:
/// lowercase, slang expansion, elongation collapse, emoji aliasing,
/// ASCII transliteration, NFKC, repeated-symbol collapse, whitespace collapse.
pub fn normalize(text: &str) -> String {
    let text = text.to_lowercase();
    let text = replace_slang(&text);
    let text = collapse_elongation(&text);
    let text = emoji_to_words(&text);
    let text = transliterate(&text);
    let text: String = text.nfkc().collect();
    let text = collapse_repeated_symbols(&text);
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// JSON-facing variant: strings are normalized, every other value passes through untouched.
pub fn normalize_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(normalize(&s)),
        other => other,
    }
}

pub fn normalize_batch<S: AsRef<str>>(texts: &[S]) -> Vec<String> {
    texts.iter().map(|t| normalize(t.as_ref())).collect()
}

fn replace_slang(text: &str) -> String {
    TOKEN_RE
        .replace_all(text, |caps: &Captures| {
            canonical(&caps[0]).to_string()
        })
        .into_owned()
}

// Runs of three or more identical letters become one ("bagusss" -> "bagus").
// A token that changes is looked up again so "gaaak" lands on "tidak", not "gak".
fn collapse_elongation(text: &str) -> String {
    TOKEN_RE
        .replace_all(text, |caps: &Captures| {
            let token = &caps[0];
            let collapsed = collapse_runs(token);
            if collapsed == token {
                collapsed
            } else {
                canonical(&collapsed).to_string()
            }
        })
        .into_owned()
}

fn collapse_runs(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let mut out = String::with_capacity(token.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let mut j = i + 1;
        while j < chars.len() && chars[j] == c {
            j += 1;
        }
        if c.is_alphabetic() && j - i >= 3 {
            out.push(c);
        } else {
            out.extend(&chars[i..j]);
        }
        i = j;
    }
    out
}

fn canonical(token: &str) -> &str {
    SLANG.get(token).copied().unwrap_or(token)
}

fn is_emoji_modifier(c: char) -> bool {
    matches!(c, '\u{1F3FB}'..='\u{1F3FF}' | '\u{FE0F}' | '\u{FE0E}' | '\u{200D}')
}

fn emoji_to_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if is_emoji_modifier(c) {
            continue;
        }
        match EMOJI.get(&c) {
            Some(alias) => {
                out.push(' ');
                out.push_str(alias);
                out.push(' ');
            }
            None => out.push(c),
        }
    }
    out.replace('_', " ")
}

// Accented tokens go through the same collapse and slang lookup once they are ASCII ("gá" -> "tidak").
fn transliterate(text: &str) -> String {
    let text = TOKEN_RE.replace_all(text, |caps: &Captures| {
        let token = &caps[0];
        if token.is_ascii() {
            return token.to_string();
        }
        let ascii = to_ascii(token);
        let collapsed = collapse_runs(&ascii);
        canonical(&collapsed).to_string()
    });
    to_ascii(&text)
}

fn to_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else if let Some(rep) = ASCII_FALLBACK.get(&c) {
            out.push_str(rep);
        } else {
            // combining marks and anything without an ASCII decomposition are dropped
            for d in std::iter::once(c).nfkd() {
                if d.is_ascii() {
                    out.push(d.to_ascii_lowercase());
                } else if let Some(rep) = ASCII_FALLBACK.get(&d) {
                    out.push_str(rep);
                }
            }
        }
    }
    out
}

/// "!!!" -> "!", "??" -> "?"; letters, digits, underscore and whitespace are left alone.
fn collapse_repeated_symbols(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    for c in text.chars() {
        let is_symbol = !(c.is_alphanumeric() || c == '_' || c.is_whitespace());
        if is_symbol && prev == Some(c) {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_slang_as_whole_tokens() {
        assert_eq!(replace_slang("yg ga bisa"), "yang tidak bisa");
        // "gaji" contains "ga" but is not the token "ga"
        assert_eq!(replace_slang("gaji"), "gaji");
    }

    #[test]
    fn collapses_elongated_letters_only() {
        assert_eq!(collapse_elongation("bagusss sangaaat"), "bagus sangat");
        assert_eq!(collapse_elongation("tunggu 1000"), "tunggu 1000");
        assert_eq!(collapse_elongation("gaaak udhhh"), "tidak sudah");
    }

    #[test]
    fn emoji_becomes_words_and_modifiers_vanish() {
        assert_eq!(emoji_to_words("mantap👍🏻").trim(), "mantap thumbs up");
        assert_eq!(emoji_to_words("❤️"), " red heart ");
    }

    #[test]
    fn transliterates_to_ascii() {
        assert_eq!(transliterate("café"), "cafe");
        assert_eq!(transliterate("straße"), "strasse");
        assert_eq!(transliterate("\u{201C}ok\u{201D}"), "\"ok\"");
        assert_eq!(transliterate("a\u{4E2D}b"), "ab");
        assert_eq!(transliterate("gá bisa"), "tidak bisa");
        assert_eq!(transliterate("½ harga"), "1/2 harga");
        assert_eq!(transliterate("tunggu…"), "tunggu...");
    }

    #[test]
    fn collapses_repeated_punctuation() {
        assert_eq!(collapse_repeated_symbols("parah!!! kenapa??"), "parah! kenapa?");
        assert_eq!(collapse_repeated_symbols("__ aa"), "__ aa");
    }
}
