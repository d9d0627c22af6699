use once_cell::sync::Lazy;
use regex::Regex;

// Runs of separators collapse into a single space. Underscore is included so
// an already-normalized identifier re-splits into the same words, which is
// what keeps normalization idempotent.
static SEPARATOR_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s/_-]+").unwrap());

// Everything outside the identifier alphabet (plus whitespace, which the
// word split consumes) is dropped.
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9\s'()]").unwrap());

/// Words an acronym can be at most this long.
const ACRONYM_MAX_LEN: usize = 4;

/// Derives canonical identifiers from free-form names.
///
/// The symbol table is injected state rather than a module-level constant so
/// the normalizer stays trivially testable; `Default` carries the fixed
/// production mapping.
#[derive(Debug, Clone)]
pub struct Normalizer {
    symbols: Vec<(String, String)>,
}

/// The fixed production symbol table.
pub fn default_symbol_map() -> Vec<(String, String)> {
    [
        ("%", "Percent"),
        ("#", "Number"),
        ("@", "At"),
        ("&", "And"),
        ("+", "Plus"),
        ("$", "Dollar"),
        ("€", "Euro"),
        ("£", "Pound"),
        ("¥", "Yen"),
    ]
    .iter()
    .map(|(s, w)| (s.to_string(), w.to_string()))
    .collect()
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(default_symbol_map())
    }
}

impl Normalizer {
    pub fn new(symbols: Vec<(String, String)>) -> Self {
        Self { symbols }
    }

    /// Turn arbitrary text into a canonical underscore-joined identifier.
    /// Pure and total: empty input yields an empty string, and the result is
    /// stable under re-normalization.
    pub fn normalize(&self, text: &str) -> String {
        let trimmed = text.trim();

        // An input that is exactly a known symbol maps straight to its word.
        if let Some((_, word)) = self.symbols.iter().find(|(sym, _)| sym == trimmed) {
            return word.clone();
        }

        // Otherwise substitute each symbol occurrence, space-padded so the
        // word split picks it up as its own word ("10%" -> "10 Percent ").
        let mut text = trimmed.to_string();
        for (sym, word) in &self.symbols {
            if text.contains(sym.as_str()) {
                text = text.replace(sym.as_str(), &format!(" {} ", word));
            }
        }

        let text = SEPARATOR_RUN.replace_all(&text, " ");
        let text = DISALLOWED.replace_all(&text, "");

        let joined = text
            .split_whitespace()
            .map(capitalize_word)
            .collect::<Vec<_>>()
            .join("_");

        // Collapse repeated underscores and strip them from the ends.
        let mut id = String::with_capacity(joined.len());
        for c in joined.chars() {
            if c == '_' && id.ends_with('_') {
                continue;
            }
            id.push(c);
        }
        id.trim_matches('_').to_string()
    }
}

/// A word that is already all-uppercase and short is treated as an acronym
/// and preserved verbatim; every other word is title-cased.
fn capitalize_word(word: &str) -> String {
    if word.len() <= ACRONYM_MAX_LEN && word.chars().all(|c| c.is_ascii_uppercase()) {
        return word.to_string();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(word.len());
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(text: &str) -> String {
        Normalizer::default().normalize(text)
    }

    #[test]
    fn basic_words() {
        assert_eq!(norm("Crop Production"), "Crop_Production");
        assert_eq!(norm("crop production"), "Crop_Production");
        assert_eq!(norm("Agriculture"), "Agriculture");
    }

    #[test]
    fn empty_input() {
        assert_eq!(norm(""), "");
        assert_eq!(norm("   "), "");
    }

    #[test]
    fn exact_symbol_token() {
        assert_eq!(norm("%"), "Percent");
        assert_eq!(norm(" & "), "And");
    }

    #[test]
    fn embedded_symbols_become_words() {
        assert_eq!(norm("10%"), "10_Percent");
        assert_eq!(norm("Oil & Gas Extraction"), "Oil_And_Gas_Extraction");
        assert_eq!(norm("C# developers"), "C_Number_Developers");
    }

    #[test]
    fn separators_collapse() {
        assert_eq!(norm("data-driven/statistical   modeling"), "Data_Driven_Statistical_Modeling");
    }

    #[test]
    fn disallowed_characters_stripped() {
        assert_eq!(norm("Farmers' Markets (Retail)"), "Farmers'_Markets_(retail)");
        assert_eq!(norm("a.b,c;d"), "Abcd");
    }

    #[test]
    fn short_all_caps_preserved_as_acronym() {
        assert_eq!(norm("SOC codes"), "SOC_Codes");
        assert_eq!(norm("US economy"), "US_Economy");
        // Five letters is past the acronym cutoff.
        assert_eq!(norm("NAICS codes"), "Naics_Codes");
        assert_eq!(norm("TRADE data"), "Trade_Data");
    }

    #[test]
    fn idempotent() {
        let n = Normalizer::default();
        for input in [
            "Crop Production",
            "Oil & Gas Extraction",
            "10%",
            "NAICS codes",
            "Farmers' Markets (Retail)",
            "data-driven/statistical modeling",
        ] {
            let once = n.normalize(input);
            assert_eq!(n.normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn output_free_of_separator_characters() {
        for input in ["a b", "a-b", "a/b", "a\tb", "a\nb", "a - / b"] {
            let out = norm(input);
            assert!(
                !out.contains([' ', '\t', '-', '/', '\n']),
                "separators survived in {out:?}"
            );
        }
    }

    #[test]
    fn no_doubled_or_edge_underscores() {
        let out = norm("  - leading and trailing -  ");
        assert_eq!(out, "Leading_And_Trailing");
        assert!(!out.contains("__"));
    }
}
