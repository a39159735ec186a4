//! Applicant name → University / Industry / Government category.

mod rules;

pub use rules::{
    ApplicantRule, Outcome, PERSONAL_NAME_MIN_CHARS, RULE_TABLE_VERSION, WEAK_SIGNAL_MIN_CHARS,
};

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::reference::ReferenceError;
use crate::text::trim_name;

/// Organizational type of an applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    University,
    Industry,
    Government,
    Unknown,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::University,
        Category::Industry,
        Category::Government,
        Category::Unknown,
    ];

    /// One-letter tag shared by every consumer of classified records.
    pub fn tag(&self) -> &'static str {
        match self {
            Category::University => "U",
            Category::Industry => "I",
            Category::Government => "G",
            Category::Unknown => "X",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.tag() == tag)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Unknown)
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tag().cmp(other.tag())
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Category::from_tag(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown category tag `{raw}`")))
    }
}

/// Category together with the identifier of the rule that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub category: Category,
    /// `None` when no rule matched.
    pub rule: Option<&'static str>,
}

/// Ordered rule cascade; the first applicable rule decides.
#[derive(Debug, Clone)]
pub struct ApplicantClassifier {
    rules: Vec<ApplicantRule>,
}

impl ApplicantClassifier {
    /// Compiles the rule table identified by [`RULE_TABLE_VERSION`].
    pub fn standard() -> Result<Self, ReferenceError> {
        Ok(Self {
            rules: rules::compile_standard()?,
        })
    }

    pub fn version(&self) -> &'static str {
        RULE_TABLE_VERSION
    }

    pub fn rules(&self) -> &[ApplicantRule] {
        &self.rules
    }

    pub fn classify(&self, name: &str) -> Category {
        self.explain(name).category
    }

    pub fn explain(&self, name: &str) -> Verdict {
        let name = trim_name(name);
        if let Some(rule) = self.rules.iter().find(|rule| rule.applies(name)) {
            return Verdict {
                category: rule.outcome.category(),
                rule: Some(rule.id),
            };
        }

        debug!(applicant = name, "unrecognized applicant");
        Verdict {
            category: Category::Unknown,
            rule: None,
        }
    }
}
