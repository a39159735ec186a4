use serde_json::{Map, Value};

use super::ReferenceError;

/// Province → university-name substrings, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniversityDirectory {
    entries: Vec<(String, Vec<String>)>,
}

impl UniversityDirectory {
    pub fn from_json_str(document: &str) -> Result<Self, ReferenceError> {
        let map: Map<String, Value> = serde_json::from_str(document)?;
        let mut entries = Vec::with_capacity(map.len());
        for (province, names) in map {
            let names: Vec<String> = serde_json::from_value(names)?;
            let names = names
                .into_iter()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect();
            entries.push((province, names));
        }
        Ok(Self { entries })
    }

    pub fn from_entries(entries: Vec<(String, Vec<String>)>) -> Self {
        Self { entries }
    }

    /// Number of university names across all provinces.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, names)| names.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First (province, university) pair whose university name occurs in `text`.
    pub fn find_in(&self, text: &str) -> Option<(&str, &str)> {
        self.entries.iter().find_map(|(province, names)| {
            names
                .iter()
                .find(|name| text.contains(name.as_str()))
                .map(|name| (province.as_str(), name.as_str()))
        })
    }

    pub fn province_of(&self, text: &str) -> Option<&str> {
        self.find_in(text).map(|(province, _)| province)
    }
}
