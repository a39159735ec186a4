//! Character-level normalization shared by the resolver, classifier and aggregator.

const FULL_WIDTH: &str = "（）“”‘’＋－\u{3000}\u{a0}";
const HALF_WIDTH: &str = "()\"\"''+-  ";

const LEADING_NOISE: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '(', ')', ' ', '\'', '"', '`', '+', '-',
];

const NAME_PADDING: &[char] = &[' ', '\u{3000}', '\u{a0}'];

const APPLICANT_SEPARATORS: &[char] = &[';', '；'];

/// Maps every character of `from` to the character at the same position in `to`.
///
/// Characters past the end of `to` are left untouched.
pub fn translate(text: &str, from: &str, to: &str) -> String {
    let pairs: Vec<(char, char)> = from.chars().zip(to.chars()).collect();
    text.chars()
        .map(|ch| {
            pairs
                .iter()
                .find(|(source, _)| *source == ch)
                .map(|(_, target)| *target)
                .unwrap_or(ch)
        })
        .collect()
}

/// Folds full-width brackets, quotes, signs and wide spaces into their ASCII forms.
pub fn normalize_punctuation(text: &str) -> String {
    translate(text, FULL_WIDTH, HALF_WIDTH)
}

/// Drops leading digits, brackets, quotes, signs and spaces.
pub fn strip_leading_noise(text: &str) -> &str {
    text.trim_start_matches(LEADING_NOISE)
}

/// Trims ASCII, ideographic and no-break spaces from both ends of a name.
pub fn trim_name(text: &str) -> &str {
    text.trim_matches(NAME_PADDING)
}

/// Length in characters rather than bytes.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Splits a multi-party applicant field on `;` or `；`, skipping blank segments.
pub fn split_applicants(field: &str) -> impl Iterator<Item = &str> {
    field
        .split(APPLICANT_SEPARATORS)
        .filter(|segment| !trim_name(segment).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_maps_positionally() {
        assert_eq!(translate("this is a test", "abcde", "ABCDE"), "this is A tEst");
        assert_eq!(
            translate("中海油（天津）管道工程技术有限公司", "（）", "()"),
            "中海油(天津)管道工程技术有限公司"
        );
        assert_eq!(
            translate("他说：“‘好’极了！”", "“”‘’：！", "\"\"'':!"),
            "他说:\"'好'极了!\""
        );
    }

    #[test]
    fn normalize_punctuation_folds_wide_forms() {
        assert_eq!(
            normalize_punctuation("（北京）＋－\u{3000}“甲”"),
            "(北京)+- \"甲\""
        );
    }

    #[test]
    fn strip_leading_noise_keeps_text_after_postcode() {
        assert_eq!(strip_leading_noise("618000四川省德阳市"), "四川省德阳市");
        assert_eq!(strip_leading_noise("( 100080 )'北京'"), "北京'");
        assert_eq!(strip_leading_noise("123"), "");
    }

    #[test]
    fn trim_name_handles_wide_spaces() {
        assert_eq!(trim_name("\u{3000} 清华大学\u{a0}"), "清华大学");
    }

    #[test]
    fn char_len_counts_characters() {
        assert_eq!(char_len("清华大学"), 4);
        assert_eq!("清华大学".len(), 12);
    }

    #[test]
    fn split_applicants_accepts_both_separators() {
        let parts: Vec<&str> = split_applicants("甲公司;乙大学；；丙研究所; ").collect();
        assert_eq!(parts, vec!["甲公司", "乙大学", "丙研究所"]);
    }
}
