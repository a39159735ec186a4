use crate::infra::{application_year, load_engine, ReferenceArgs};
use clap::{Args, ValueEnum};
use csv::{ByteRecord, ReaderBuilder, Writer};
use patent_uig::error::AppError;
use patent_uig::{ClassificationEngine, CollaborationRecord};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{error, info};

const APP_NO: usize = 0;
const APP_DATE: usize = 1;
const ADDRESS: usize = 2;
const APPLICANT: usize = 3;

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV with app_no, app_date, address and applicant columns (header row required)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Destination CSV; defaults to stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// What to emit per application
    #[arg(long, value_enum, default_value_t = BatchMode::Collab)]
    pub(crate) mode: BatchMode,
    /// Worker threads; defaults to one per core
    #[arg(long)]
    pub(crate) workers: Option<usize>,
    #[command(flatten)]
    pub(crate) reference: ReferenceArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BatchMode {
    /// One canonical collaboration code per application
    Collab,
    /// One row per located applicant with its organization root
    Orgs,
    /// One row per pair of domestic organizations
    Edges,
}

impl BatchMode {
    fn header(&self) -> &'static [&'static str] {
        match self {
            BatchMode::Collab => &["app_no", "app_year", "country", "state", "collab"],
            BatchMode::Orgs => &["app_no", "org", "org2", "state", "kind"],
            BatchMode::Edges => &[
                "app_no", "org_a", "org_b", "state_a", "state_b", "kind_a", "kind_b",
            ],
        }
    }

    fn include_orgs(&self) -> bool {
        !matches!(self, BatchMode::Collab)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BatchSummary {
    pub(crate) records: usize,
    pub(crate) flagged: usize,
    pub(crate) rows_written: usize,
}

struct ClassifiedRow {
    app_no: String,
    app_year: Option<i32>,
    record: CollaborationRecord,
    flagged: bool,
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let BatchArgs {
        input,
        output,
        mode,
        workers,
        reference,
    } = args;

    let engine = load_engine(reference)?;
    let reader = File::open(&input)?;
    let writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };

    let summary = process(&engine, reader, writer, mode, workers)?;
    info!(
        input = %input.display(),
        records = summary.records,
        flagged = summary.flagged,
        rows = summary.rows_written,
        "batch classification finished"
    );
    Ok(())
}

pub(crate) fn process<R: Read, W: Write>(
    engine: &ClassificationEngine,
    input: R,
    output: W,
    mode: BatchMode,
    workers: Option<usize>,
) -> Result<BatchSummary, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let records = reader
        .byte_records()
        .collect::<Result<Vec<ByteRecord>, csv::Error>>()?;

    let mut pool = ThreadPoolBuilder::new();
    if let Some(workers) = workers {
        pool = pool.num_threads(workers);
    }
    let pool = pool.build().map_err(io::Error::other)?;

    let classified: Vec<ClassifiedRow> = pool.install(|| {
        records
            .par_iter()
            .map(|record| classify_row(engine, record, mode))
            .collect()
    });

    let mut writer = Writer::from_writer(output);
    writer.write_record(mode.header())?;

    let mut summary = BatchSummary {
        records: classified.len(),
        ..BatchSummary::default()
    };
    for row in &classified {
        if row.flagged {
            summary.flagged += 1;
        }
        summary.rows_written += write_row(&mut writer, row, mode)?;
    }
    writer.flush()?;
    Ok(summary)
}

fn classify_row(
    engine: &ClassificationEngine,
    record: &ByteRecord,
    mode: BatchMode,
) -> ClassifiedRow {
    let field = |index: usize| record.get(index).unwrap_or_default();
    let app_no = String::from_utf8_lossy(field(APP_NO)).trim().to_string();
    let app_year = std::str::from_utf8(field(APP_DATE))
        .ok()
        .and_then(application_year);

    match engine.aggregate_bytes(
        Some(app_no.as_str()),
        field(APPLICANT),
        Some(field(ADDRESS)),
        mode.include_orgs(),
    ) {
        Ok(record) => ClassifiedRow {
            app_no,
            app_year,
            record,
            flagged: false,
        },
        Err(err) => {
            error!(app_no = %app_no, error = %err, "record skipped");
            ClassifiedRow {
                record: CollaborationRecord::unclassified(Some(app_no.as_str())),
                app_no,
                app_year,
                flagged: true,
            }
        }
    }
}

fn write_row<W: Write>(
    writer: &mut Writer<W>,
    row: &ClassifiedRow,
    mode: BatchMode,
) -> Result<usize, csv::Error> {
    let app_no = row.app_no.as_str();
    match mode {
        BatchMode::Collab => {
            let year = row.app_year.map(|year| year.to_string()).unwrap_or_default();
            let country = row
                .record
                .country
                .as_ref()
                .map(|country| country.as_str())
                .unwrap_or_default();
            let state = row.record.state.as_deref().unwrap_or_default();
            let code = row.record.code();
            writer.write_record([app_no, year.as_str(), country, state, code.as_str()])?;
            Ok(1)
        }
        BatchMode::Orgs => {
            for entry in &row.record.entries {
                writer.write_record([
                    app_no,
                    entry.name.as_deref().unwrap_or_default(),
                    entry.organization_root.as_deref().unwrap_or_default(),
                    entry.state.as_str(),
                    entry.category.tag(),
                ])?;
            }
            Ok(row.record.entries.len())
        }
        BatchMode::Edges => {
            let edges = row.record.edges();
            for edge in &edges {
                writer.write_record([
                    app_no,
                    edge.from.organization_root.as_deref().unwrap_or_default(),
                    edge.to.organization_root.as_deref().unwrap_or_default(),
                    edge.from.state.as_str(),
                    edge.to.state.as_str(),
                    edge.from.category.tag(),
                    edge.to.category.tag(),
                ])?;
            }
            Ok(edges.len())
        }
    }
}
