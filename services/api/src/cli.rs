use crate::batch::{run_batch, BatchArgs};
use crate::infra::ReferenceArgs;
use crate::lookup::{
    run_address, run_applicant, run_record, AddressArgs, ApplicantArgs, RecordArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use patent_uig::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "patent-uig",
    about = "Classify patent applicants and addresses for University/Industry/Government analysis",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Resolve one free-text address to country and province
    Address(AddressArgs),
    /// Classify one applicant name
    Applicant(ApplicantArgs),
    /// Build the collaboration record for one applicant field
    Record(RecordArgs),
    /// Classify a CSV export of applications
    Batch(BatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) reference: ReferenceArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Address(args) => run_address(args),
        Command::Applicant(args) => run_applicant(args),
        Command::Record(args) => run_record(args),
        Command::Batch(args) => run_batch(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchMode;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["patent-uig"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn batch_accepts_mode_workers_and_reference_overrides() {
        let cli = Cli::try_parse_from([
            "patent-uig",
            "batch",
            "--input",
            "patents.csv",
            "--mode",
            "edges",
            "--workers",
            "4",
            "--univ-file",
            "univs.json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Batch(args)) => {
                assert_eq!(args.mode, BatchMode::Edges);
                assert_eq!(args.workers, Some(4));
                assert!(args.output.is_none());
                assert_eq!(
                    args.reference.univ_file.as_deref(),
                    Some(std::path::Path::new("univs.json"))
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn record_takes_optional_address_and_orgs_flag() {
        let cli = Cli::try_parse_from([
            "patent-uig",
            "record",
            "北京大学;华为技术有限公司",
            "--address",
            "北京市海淀区",
            "--orgs",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Record(args)) => {
                assert_eq!(args.applicants, "北京大学;华为技术有限公司");
                assert_eq!(args.address.as_deref(), Some("北京市海淀区"));
                assert!(args.orgs);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
