use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::address::Country;
use crate::applicant::Category;

/// State value for a party located outside the mainland.
pub const FOREIGN_MARKER: &str = "F";

/// Where one party of a collaboration sits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Locale {
    /// Outside the mainland, sub-national detail unresolved.
    Foreign,
    Province(String),
}

impl Locale {
    pub fn as_str(&self) -> &str {
        match self {
            Locale::Foreign => FOREIGN_MARKER,
            Locale::Province(name) => name,
        }
    }

    pub fn is_foreign(&self) -> bool {
        matches!(self, Locale::Foreign)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw == FOREIGN_MARKER {
            Locale::Foreign
        } else {
            Locale::Province(raw)
        })
    }
}

/// One classified party of an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantClassification {
    pub category: Category,
    pub state: Locale,
    /// Trimmed applicant name; organization mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_root: Option<String>,
}

impl ApplicantClassification {
    pub fn new(category: Category, state: Locale) -> Self {
        Self {
            category,
            state,
            name: None,
            organization_root: None,
        }
    }
}

/// Classified parties of one application plus the application's own resolved location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaborationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    pub entries: Vec<ApplicantClassification>,
    pub country: Option<Country>,
    pub state: Option<String>,
}

impl CollaborationRecord {
    /// Record for input that could not be classified at all.
    pub fn unclassified(application_id: Option<&str>) -> Self {
        Self {
            application_id: application_id.map(str::to_string),
            ..Self::default()
        }
    }

    /// `tag + state` per entry joined with `;`, e.g. `I云南;U湖北`.
    pub fn code(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{}{}", entry.category.tag(), entry.state))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Every unordered pair of domestic entries, in entry order.
    pub fn edges(&self) -> Vec<CollaborationEdge<'_>> {
        let domestic: Vec<&ApplicantClassification> = self
            .entries
            .iter()
            .filter(|entry| !entry.state.is_foreign())
            .collect();

        let mut edges = Vec::new();
        for (index, from) in domestic.iter().enumerate() {
            for to in &domestic[index + 1..] {
                edges.push(CollaborationEdge { from, to });
            }
        }
        edges
    }
}

/// Pair of collaborating parties taken from one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollaborationEdge<'r> {
    pub from: &'r ApplicantClassification,
    pub to: &'r ApplicantClassification,
}

/// An input field that is not valid UTF-8; only the affected record is lost.
#[derive(Debug, thiserror::Error)]
#[error("{field} field is not valid UTF-8: {source}")]
pub struct EncodingError {
    pub field: &'static str,
    #[source]
    pub source: std::str::Utf8Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(category: Category, state: &str) -> ApplicantClassification {
        let state = if state == FOREIGN_MARKER {
            Locale::Foreign
        } else {
            Locale::Province(state.to_string())
        };
        ApplicantClassification::new(category, state)
    }

    fn record(entries: Vec<ApplicantClassification>) -> CollaborationRecord {
        CollaborationRecord {
            entries,
            ..CollaborationRecord::default()
        }
    }

    #[test]
    fn code_joins_tag_and_state() {
        let record = record(vec![
            entry(Category::Industry, "云南"),
            entry(Category::University, "湖北"),
        ]);
        assert_eq!(record.code(), "I云南;U湖北");
        assert_eq!(CollaborationRecord::default().code(), "");
    }

    #[test]
    fn edges_skip_foreign_parties() {
        let record = record(vec![
            entry(Category::Industry, "北京"),
            entry(Category::Government, FOREIGN_MARKER),
            entry(Category::University, "湖北"),
            entry(Category::Government, "上海"),
        ]);
        let edges: Vec<(&str, &str)> = record
            .edges()
            .iter()
            .map(|edge| (edge.from.state.as_str(), edge.to.state.as_str()))
            .collect();
        assert_eq!(edges, vec![("北京", "湖北"), ("北京", "上海"), ("湖北", "上海")]);
    }

    #[test]
    fn single_domestic_party_has_no_edges() {
        let record = record(vec![
            entry(Category::Industry, "北京"),
            entry(Category::University, FOREIGN_MARKER),
        ]);
        assert!(record.edges().is_empty());
    }

    #[test]
    fn foreign_sorts_first_and_serializes_as_marker() {
        let mut locales = vec![Locale::Province("北京".into()), Locale::Foreign];
        locales.sort();
        assert_eq!(locales[0], Locale::Foreign);

        let json = serde_json::to_value(entry(Category::University, FOREIGN_MARKER))
            .expect("serializes");
        assert_eq!(json, serde_json::json!({ "category": "U", "state": "F" }));
    }
}
