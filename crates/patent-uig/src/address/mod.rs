//! Free-text address → (country, province) resolution.
//!
//! The resolver walks a fixed cascade and stops at the first rule that produces a location:
//!
//! ```text
//! normalize punctuation → strip leading noise → consume "中国"
//!   ├── province name prefix        → (大陆, province)
//!   ├── foreign country prefix      → (country, -)
//!   ├── mainland city prefix        → (大陆, owning province)
//!   ├── known university anywhere   → (大陆, home province)
//!   ├── foreign state/city prefix   → (owning country, -)
//!   ├── six-digit postal code       → (大陆, province for prefix)
//!   ├── parenthesized substring     → resolved once more, one level deep
//!   └── domestic hint substring     → (大陆, -) or whatever was recorded
//! ```

mod domain;

pub use domain::{AddressResolution, AddressRule, Country, MAINLAND};

use tracing::debug;

use crate::reference::ReferenceData;
use crate::text::{normalize_punctuation, strip_leading_noise};

const DOMESTIC_MARKER: &str = "中国";

const UNIVERSITY_KEYWORDS: &[&str] = &["大学", "学院", "学校"];

const DOMESTIC_HINTS: &[&str] = &["中国", "中南", "华东", "华南", "华西", "华北", "华中"];

const POSTAL_CODE_DIGITS: usize = 6;
const POSTAL_PREFIX_DIGITS: usize = 2;

/// Parenthesized text is resolved at most this many levels below the original address.
const MAX_PAREN_DEPTH: u8 = 1;

/// Resolves addresses against borrowed, immutable reference data.
#[derive(Debug, Clone, Copy)]
pub struct AddressResolver<'a> {
    reference: &'a ReferenceData,
}

impl<'a> AddressResolver<'a> {
    pub fn new(reference: &'a ReferenceData) -> Self {
        Self { reference }
    }

    pub fn resolve(&self, raw: &str) -> AddressResolution {
        self.explain(raw).0
    }

    /// Resolution plus the rule that decided it.
    pub fn explain(&self, raw: &str) -> (AddressResolution, AddressRule) {
        self.resolve_at_depth(raw, 0)
    }

    /// University lookup used when an applicant name carries no other location.
    pub fn resolve_university(&self, name: &str) -> AddressResolution {
        let normalized = normalize_punctuation(name);
        match self.reference.universities().province_of(&normalized) {
            Some(province) => AddressResolution::mainland(province),
            None => AddressResolution::unknown(),
        }
    }

    fn resolve_at_depth(&self, raw: &str, depth: u8) -> (AddressResolution, AddressRule) {
        if raw.trim().is_empty() {
            return (AddressResolution::unknown(), AddressRule::Empty);
        }

        let address = normalize_punctuation(raw);
        let mut stripped = strip_leading_noise(&address);
        let mut country = None;
        if let Some(rest) = stripped.strip_prefix(DOMESTIC_MARKER) {
            country = Some(Country::Mainland);
            stripped = rest;
        }

        let taxonomy = self.reference.taxonomy();

        if let Some(province) = taxonomy.match_province(stripped) {
            return (AddressResolution::mainland(province), AddressRule::Province);
        }

        if let Some(name) = taxonomy.match_foreign_country(stripped) {
            return (AddressResolution::abroad(name), AddressRule::ForeignCountry);
        }

        if let Some(province) = taxonomy.province_for_city_prefix(stripped) {
            return (AddressResolution::mainland(province), AddressRule::City);
        }

        if UNIVERSITY_KEYWORDS
            .iter()
            .any(|keyword| address.contains(keyword))
        {
            if let Some(province) = self.reference.universities().province_of(&address) {
                return (AddressResolution::mainland(province), AddressRule::University);
            }
        }

        if let Some(name) = taxonomy.country_for_place_prefix(stripped) {
            return (AddressResolution::abroad(name), AddressRule::ForeignPlace);
        }

        if let Some(province) =
            postal_prefix(&address).and_then(|prefix| taxonomy.province_for_postal_prefix(prefix))
        {
            return (AddressResolution::mainland(province), AddressRule::PostalCode);
        }

        if depth < MAX_PAREN_DEPTH {
            if let Some(inner) = parenthesized(&address) {
                let (resolution, _) = self.resolve_at_depth(inner, depth + 1);
                return (resolution, AddressRule::Parenthetical);
            }
        }

        let mut rule = AddressRule::Unresolved;
        if country.is_none() && DOMESTIC_HINTS.iter().any(|hint| address.contains(hint)) {
            country = Some(Country::Mainland);
            rule = AddressRule::DomesticHint;
        }

        debug!(address = %address, "unrecognized address");
        (
            AddressResolution {
                country,
                state: None,
            },
            rule,
        )
    }
}

/// First two digits of a six-digit code at the very start of the address.
fn postal_prefix(address: &str) -> Option<&str> {
    let digits = address.as_bytes().get(..POSTAL_CODE_DIGITS)?;
    if digits.iter().all(u8::is_ascii_digit) {
        Some(&address[..POSTAL_PREFIX_DIGITS])
    } else {
        None
    }
}

/// Text between the first `(` and the last `)` after it; must be non-empty.
fn parenthesized(address: &str) -> Option<&str> {
    let open = address.find('(')?;
    let close = address.rfind(')')?;
    let inner = address.get(open + 1..close)?;
    if inner.is_empty() || inner.contains('\n') {
        None
    } else {
        Some(inner)
    }
}
