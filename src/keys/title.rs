use std::sync::LazyLock;

use regex::Regex;

/// Disambiguation suffix `.N` the media index appends to repeated titles
static ORDINAL_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.\d+$").unwrap());

/// Trim a title and drop a trailing `.<digits>` suffix
pub fn title_cleanup(title: &str) -> String {
    ORDINAL_SUFFIX_RE.replace(title.trim(), "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_ordinal_removed() {
        assert_eq!(title_cleanup("Tagesordnungspunkt 5.2"), "Tagesordnungspunkt 5");
        assert_eq!(title_cleanup("  Zusatzpunkt 12.10  "), "Zusatzpunkt 12");
    }

    #[test]
    fn test_other_dots_kept() {
        assert_eq!(title_cleanup("Tagesordnungspunkt 5."), "Tagesordnungspunkt 5.");
        assert_eq!(title_cleanup("Punkt 1.2 a"), "Punkt 1.2 a");
        assert_eq!(title_cleanup("Sitzungseröffnung"), "Sitzungseröffnung");
    }
}
