use chrono::{Datelike, NaiveDate};
use clap::Args;
use metrics_exporter_prometheus::PrometheusHandle;
use patent_uig::config::AppConfig;
use patent_uig::error::AppError;
use patent_uig::{telemetry, ClassificationEngine, ReferenceSources};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

const APPLICATION_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y.%m.%d"];

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Reference document overrides shared by every command.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ReferenceArgs {
    /// Geographic taxonomy XML (overrides UIG_LOC_FILE)
    #[arg(long)]
    pub(crate) loc_file: Option<PathBuf>,
    /// Province → university JSON directory (overrides UIG_UNIV_FILE)
    #[arg(long)]
    pub(crate) univ_file: Option<PathBuf>,
    /// Newline-delimited high-technology IPC patterns (overrides UIG_IPC_FILE)
    #[arg(long)]
    pub(crate) ipc_file: Option<PathBuf>,
}

impl ReferenceArgs {
    pub(crate) fn apply(self, sources: &mut ReferenceSources) {
        if let Some(path) = self.loc_file {
            sources.taxonomy = path;
        }
        if let Some(path) = self.univ_file {
            sources.universities = Some(path);
        }
        if let Some(path) = self.ipc_file {
            sources.tech_codes = Some(path);
        }
    }
}

/// Loads configuration, installs tracing and builds the engine for one-shot commands.
pub(crate) fn load_engine(reference: ReferenceArgs) -> Result<ClassificationEngine, AppError> {
    let mut config = AppConfig::load()?;
    reference.apply(&mut config.reference);
    telemetry::init(&config.telemetry)?;
    Ok(ClassificationEngine::load(&config.reference)?)
}

pub(crate) fn parse_application_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    APPLICATION_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .ok_or_else(|| format!("failed to parse '{raw}' as YYYY-MM-DD or YYYY.MM.DD"))
}

pub(crate) fn application_year(raw: &str) -> Option<i32> {
    parse_application_date(raw).ok().map(|date| date.year())
}
