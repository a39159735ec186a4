use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::applicant::ApplicantClassifier;
use crate::reference::{ReferenceData, ReferenceSources};

pub(crate) fn data_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

pub(crate) fn bundled_sources() -> ReferenceSources {
    ReferenceSources {
        taxonomy: data_path("LocList.xml"),
        universities: Some(data_path("cn_univs.json")),
        tech_codes: Some(data_path("hi_tech_ipcs.txt")),
    }
}

/// Bundled reference data, loaded once per test binary.
pub(crate) fn reference() -> &'static ReferenceData {
    static DATA: OnceLock<ReferenceData> = OnceLock::new();
    DATA.get_or_init(|| ReferenceData::load(&bundled_sources()).expect("bundled data loads"))
}

pub(crate) fn classifier() -> &'static ApplicantClassifier {
    static CLASSIFIER: OnceLock<ApplicantClassifier> = OnceLock::new();
    CLASSIFIER.get_or_init(|| ApplicantClassifier::standard().expect("rule table compiles"))
}
