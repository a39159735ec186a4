use patent_uig::{ClassificationEngine, ReferenceSources};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

pub(crate) fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../crates/patent-uig/data")
        .join(name)
}

pub(crate) fn engine() -> Arc<ClassificationEngine> {
    static ENGINE: OnceLock<Arc<ClassificationEngine>> = OnceLock::new();
    ENGINE
        .get_or_init(|| {
            let sources = ReferenceSources {
                taxonomy: data_path("LocList.xml"),
                universities: Some(data_path("cn_univs.json")),
                tech_codes: Some(data_path("hi_tech_ipcs.txt")),
            };
            Arc::new(ClassificationEngine::load(&sources).expect("bundled data loads"))
        })
        .clone()
}
