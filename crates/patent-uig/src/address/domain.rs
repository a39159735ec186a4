use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Country value recorded for mainland China.
pub const MAINLAND: &str = "大陆";

/// Country part of a resolved address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Country {
    Mainland,
    /// Hong Kong, Macao, Taiwan or a foreign country, by its taxonomy name.
    Named(String),
}

impl Country {
    pub fn as_str(&self) -> &str {
        match self {
            Country::Mainland => MAINLAND,
            Country::Named(name) => name,
        }
    }

    pub fn is_mainland(&self) -> bool {
        matches!(self, Country::Mainland)
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Country {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Country {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw == MAINLAND {
            Country::Mainland
        } else {
            Country::Named(raw)
        })
    }
}

/// (country, state) pair; either side may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressResolution {
    pub country: Option<Country>,
    pub state: Option<String>,
}

impl AddressResolution {
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn mainland(province: impl Into<String>) -> Self {
        Self {
            country: Some(Country::Mainland),
            state: Some(province.into()),
        }
    }

    /// Non-mainland country with no sub-national detail.
    pub fn abroad(country: impl Into<String>) -> Self {
        Self {
            country: Some(Country::Named(country.into())),
            state: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.country.is_none() && self.state.is_none()
    }

    pub fn is_mainland(&self) -> bool {
        self.country.as_ref().is_some_and(Country::is_mainland)
    }
}

/// Which step of the cascade produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressRule {
    Empty,
    Province,
    ForeignCountry,
    City,
    University,
    ForeignPlace,
    PostalCode,
    Parenthetical,
    DomesticHint,
    Unresolved,
}

impl AddressRule {
    pub fn label(&self) -> &'static str {
        match self {
            AddressRule::Empty => "empty",
            AddressRule::Province => "province",
            AddressRule::ForeignCountry => "foreign_country",
            AddressRule::City => "city",
            AddressRule::University => "university",
            AddressRule::ForeignPlace => "foreign_place",
            AddressRule::PostalCode => "postal_code",
            AddressRule::Parenthetical => "parenthetical",
            AddressRule::DomesticHint => "domestic_hint",
            AddressRule::Unresolved => "unresolved",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_serializes_as_plain_name() {
        let resolution = AddressResolution::mainland("北京");
        let json = serde_json::to_value(&resolution).expect("serializes");
        assert_eq!(json, serde_json::json!({ "country": "大陆", "state": "北京" }));

        let parsed: AddressResolution =
            serde_json::from_value(serde_json::json!({ "country": "香港", "state": null }))
                .expect("deserializes");
        assert_eq!(parsed, AddressResolution::abroad("香港"));
    }
}
