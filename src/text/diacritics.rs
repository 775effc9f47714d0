/// Harakat, tanween, shadda and sukun (U+064B..=U+0652).
const HARAKAT: std::ops::RangeInclusive<char> = '\u{064B}'..='\u{0652}';
/// Tatweel, the elongation stroke.
const TATWEEL: char = '\u{0640}';

pub fn is_stripped_mark(c: char) -> bool {
    HARAKAT.contains(&c) || c == TATWEEL
}

/// Remove vowel marks and elongation so only base letters reach the converter.
pub fn strip_diacritics(text: &str) -> String {
    text.chars().filter(|&c| !is_stripped_mark(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_harakat() {
        assert_eq!(strip_diacritics("بِسْمِ"), "بسم");
        assert_eq!(strip_diacritics("الرَّحِيمِ"), "الرحيم");
    }

    #[test]
    fn strips_tatweel() {
        assert_eq!(strip_diacritics("رحـــيم"), "رحيم");
    }

    #[test]
    fn keeps_marks_outside_the_range() {
        // superscript alef (U+0670) and small high sukun (U+06E1) are not harakat
        let text = "ٱلرَّحۡمَٰنِ";
        let stripped = strip_diacritics(text);
        assert!(stripped.contains('\u{0670}'));
        assert!(stripped.contains('\u{06E1}'));
        assert!(!stripped.contains('\u{064E}'));
    }

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(strip_diacritics("bismi allah"), "bismi allah");
    }
}
