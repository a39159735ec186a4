use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ReferenceError;

const IPC_SEPARATORS: &[char] = &[';', '；', ' ', '\u{3000}', '\u{a0}'];

/// Start-anchored alternation over the high-technology IPC fragments.
#[derive(Debug, Clone)]
pub struct TechCodePattern {
    pattern: Regex,
    fragments: usize,
}

impl TechCodePattern {
    /// One regex fragment per line; blank lines are ignored.
    pub fn from_lines(document: &str) -> Result<Self, ReferenceError> {
        let fragments: Vec<&str> = document
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if fragments.is_empty() {
            return Err(ReferenceError::Structure(
                "technology-code list has no entries".into(),
            ));
        }

        let pattern = Regex::new(&format!("^(?:{})", fragments.join("|")))?;
        Ok(Self {
            pattern,
            fragments: fragments.len(),
        })
    }

    pub fn fragments(&self) -> usize {
        self.fragments
    }

    pub fn is_hi_tech(&self, code: &str) -> bool {
        self.pattern.is_match(code)
    }
}

/// Whether an application's IPC field carries high- and/or low-technology codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechProfile {
    pub hi_tech: bool,
    pub low_tech: bool,
}

impl TechProfile {
    pub fn classify(pattern: Option<&TechCodePattern>, int_cl: &str) -> Self {
        let mut profile = Self::default();
        for code in int_cl.split(IPC_SEPARATORS).filter(|code| !code.is_empty()) {
            if pattern.is_some_and(|pattern| pattern.is_hi_tech(code)) {
                profile.hi_tech = true;
            } else {
                profile.low_tech = true;
            }
        }
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> TechCodePattern {
        TechCodePattern::from_lines("G06F\n\nH04L\n  A61K  \n").expect("compiles")
    }

    #[test]
    fn mixed_field_is_both_hi_and_low_tech() {
        let profile = TechProfile::classify(Some(&pattern()), "G06F17/30;B65D81/00");
        assert_eq!(
            profile,
            TechProfile {
                hi_tech: true,
                low_tech: true
            }
        );
    }

    #[test]
    fn codes_only_match_at_start() {
        let pattern = pattern();
        assert!(pattern.is_hi_tech("H04L29/06"));
        assert!(!pattern.is_hi_tech("XH04L"));
        assert_eq!(pattern.fragments(), 3);
    }

    #[test]
    fn splits_on_wide_separators_and_skips_blanks() {
        let profile = TechProfile::classify(Some(&pattern()), "A61K31/00； H04L12/28\u{3000}");
        assert!(profile.hi_tech);
        assert!(!profile.low_tech);
    }

    #[test]
    fn without_pattern_everything_is_low_tech() {
        let profile = TechProfile::classify(None, "G06F17/30");
        assert!(!profile.hi_tech);
        assert!(profile.low_tech);
        assert_eq!(TechProfile::classify(None, ""), TechProfile::default());
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(matches!(
            TechCodePattern::from_lines("\n  \n"),
            Err(ReferenceError::Structure(_))
        ));
    }
}
