//! Immutable reference data: geographic taxonomy, university directory and technology codes.
//!
//! Everything here is built once at startup. A load failure is fatal and never retried;
//! once built, [`ReferenceData`] is only ever read, so it can be shared freely across threads.

mod taxonomy;
mod tech_codes;
mod universities;

pub use taxonomy::{ForeignCountry, GeoTaxonomy, Province, NON_MAINLAND_REGIONS};
pub use tech_codes::{TechCodePattern, TechProfile};
pub use universities::UniversityDirectory;

use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::info;

/// Locations of the reference documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSources {
    pub taxonomy: PathBuf,
    pub universities: Option<PathBuf>,
    pub tech_codes: Option<PathBuf>,
}

/// Fatal configuration problems raised while loading reference documents.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not valid UTF-8: {source}", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("malformed taxonomy document: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed university directory: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected reference structure: {0}")]
    Structure(String),
    #[error("invalid match pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// The loaded, read-only reference data every classifier consults.
#[derive(Debug)]
pub struct ReferenceData {
    taxonomy: GeoTaxonomy,
    universities: UniversityDirectory,
    tech_codes: Option<TechCodePattern>,
}

impl ReferenceData {
    pub fn load(sources: &ReferenceSources) -> Result<Self, ReferenceError> {
        let taxonomy = GeoTaxonomy::from_xml_str(&read_utf8(&sources.taxonomy)?)?;
        let universities = match &sources.universities {
            Some(path) => UniversityDirectory::from_json_str(&read_utf8(path)?)?,
            None => UniversityDirectory::default(),
        };
        let tech_codes = match &sources.tech_codes {
            Some(path) => Some(TechCodePattern::from_lines(&read_utf8(path)?)?),
            None => None,
        };

        let data = Self::from_parts(taxonomy, universities, tech_codes);
        info!(
            provinces = data.taxonomy.provinces().len(),
            cities = data.taxonomy.city_count(),
            foreign_countries = data.taxonomy.foreign_countries().len(),
            universities = data.universities.len(),
            tech_codes = data.tech_codes.is_some(),
            "reference data loaded"
        );
        Ok(data)
    }

    pub fn from_parts(
        taxonomy: GeoTaxonomy,
        universities: UniversityDirectory,
        tech_codes: Option<TechCodePattern>,
    ) -> Self {
        Self {
            taxonomy,
            universities,
            tech_codes,
        }
    }

    pub fn taxonomy(&self) -> &GeoTaxonomy {
        &self.taxonomy
    }

    pub fn universities(&self) -> &UniversityDirectory {
        &self.universities
    }

    pub fn tech_codes(&self) -> Option<&TechCodePattern> {
        self.tech_codes.as_ref()
    }

    /// Splits an IPC field and reports whether it holds high- and/or low-technology codes.
    pub fn classify_tech_codes(&self, int_cl: &str) -> TechProfile {
        TechProfile::classify(self.tech_codes.as_ref(), int_cl)
    }
}

fn read_utf8(path: &Path) -> Result<String, ReferenceError> {
    let bytes = std::fs::read(path).map_err(|source| ReferenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|source| ReferenceError::Encoding {
        path: path.to_path_buf(),
        source,
    })
}

/// Builds `^(a|b|c)` over escaped names. Blank names are skipped; `None` when nothing remains.
pub(crate) fn anchored_alternation<'a, I>(names: I) -> Result<Option<Regex>, regex::Error>
where
    I: IntoIterator<Item = &'a str>,
{
    let escaped: Vec<String> = names
        .into_iter()
        .filter(|name| !name.is_empty())
        .map(regex::escape)
        .collect();
    if escaped.is_empty() {
        return Ok(None);
    }
    Regex::new(&format!("^(?:{})", escaped.join("|"))).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn data_path(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
    }

    #[test]
    fn load_reads_bundled_documents() {
        let data = ReferenceData::load(&ReferenceSources {
            taxonomy: data_path("LocList.xml"),
            universities: Some(data_path("cn_univs.json")),
            tech_codes: Some(data_path("hi_tech_ipcs.txt")),
        })
        .expect("bundled reference data loads");

        assert_eq!(data.taxonomy().provinces().len(), 31);
        assert!(data.universities().len() > 100);
        assert!(data.tech_codes().is_some());
    }

    #[test]
    fn missing_taxonomy_is_io_error() {
        let error = ReferenceData::load(&ReferenceSources {
            taxonomy: data_path("does-not-exist.xml"),
            universities: None,
            tech_codes: None,
        })
        .expect_err("missing file fails");
        assert!(matches!(error, ReferenceError::Io { .. }));
        assert!(error.to_string().contains("does-not-exist.xml"));
    }

    #[test]
    fn non_utf8_directory_is_encoding_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(&[0x7b, 0xff, 0xfe, 0x7d]).expect("write bytes");

        let error = ReferenceData::load(&ReferenceSources {
            taxonomy: data_path("LocList.xml"),
            universities: Some(file.path().to_path_buf()),
            tech_codes: None,
        })
        .expect_err("invalid utf-8 fails");
        assert!(matches!(error, ReferenceError::Encoding { .. }));
    }

    #[test]
    fn alternation_escapes_and_skips_blanks() {
        let pattern = anchored_alternation(["a.b", "", "c"])
            .expect("compiles")
            .expect("non-empty");
        assert!(pattern.is_match("a.bx"));
        assert!(!pattern.is_match("axb"));
        assert!(!pattern.is_match("xc"));
        assert!(anchored_alternation([""]).expect("compiles").is_none());
    }
}
