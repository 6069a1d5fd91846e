//! PII masking for log output.
//!
//! Request and response documents carry personal data; log lines keep only
//! enough to correlate: the first two name characters and the birth year.
//! Addresses and identification numbers are masked entirely.

use regex::Regex;

/// Applies the masking rules to XML text. Compiled once per client.
pub struct PiiMasker {
    rules: Vec<(Regex, &'static str)>,
}

impl PiiMasker {
    pub fn new() -> Self {
        let rules = vec![
            // Names: keep the first two characters
            rule(r"(<name>)([^<]{2})[^<]*(</name>)", "$1$2***$3"),
            rule(r"(<nachname>)([^<]{2})[^<]*(</nachname>)", "$1$2***$3"),
            rule(r"(<vornamen>)([^<]{2})[^<]*(</vornamen>)", "$1$2***$3"),
            // Birth dates: keep the year
            rule(
                r"(<jahrMonatTag>)(\d{4})-\d{2}-\d{2}(</jahrMonatTag>)",
                "$1$2-**-**$3",
            ),
            // Addresses
            rule(r"(<strasse>)[^<]+(</strasse>)", "$1***$2"),
            rule(r"(<hausnummer>)[^<]+(</hausnummer>)", "$1***$2"),
            rule(r"(<postleitzahl>)[^<]+(</postleitzahl>)", "$1***$2"),
            // Identifiers
            rule(
                r"(<identifikationsmerkmal>)\d+(</identifikationsmerkmal>)",
                "$1***$2",
            ),
            rule(r"(<seriennummer>)[^<]+(</seriennummer>)", "$1***$2"),
        ];
        Self { rules }
    }

    /// Mask all personal data in the given XML text.
    pub fn mask(&self, xml: &str) -> String {
        let mut masked = xml.to_string();
        for (re, replacement) in &self.rules {
            masked = re.replace_all(&masked, *replacement).into_owned();
        }
        masked
    }
}

impl Default for PiiMasker {
    fn default() -> Self {
        Self::new()
    }
}

fn rule(pattern: &str, replacement: &'static str) -> (Regex, &'static str) {
    (
        Regex::new(pattern).expect("masking pattern is valid"),
        replacement,
    )
}
