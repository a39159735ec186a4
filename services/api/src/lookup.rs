use crate::infra::{load_engine, ReferenceArgs};
use crate::routes::CollaborationResponse;
use clap::Args;
use patent_uig::error::AppError;
use patent_uig::{AddressResolution, ClassificationEngine, RULE_TABLE_VERSION};

const UNKNOWN: &str = "-";

#[derive(Args, Debug)]
pub(crate) struct AddressArgs {
    /// Free-text address
    pub(crate) text: String,
    #[command(flatten)]
    pub(crate) reference: ReferenceArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ApplicantArgs {
    /// Applicant name
    pub(crate) name: String,
    #[command(flatten)]
    pub(crate) reference: ReferenceArgs,
}

#[derive(Args, Debug)]
pub(crate) struct RecordArgs {
    /// Applicant field; parties separated by `;` or `；`
    pub(crate) applicants: String,
    /// Application address used when a party cannot be located on its own
    #[arg(long)]
    pub(crate) address: Option<String>,
    /// Keep every party with its organization root instead of deduplicating
    #[arg(long)]
    pub(crate) orgs: bool,
    /// Application number echoed in the output
    #[arg(long)]
    pub(crate) application_id: Option<String>,
    #[command(flatten)]
    pub(crate) reference: ReferenceArgs,
}

pub(crate) fn run_address(args: AddressArgs) -> Result<(), AppError> {
    let engine = load_engine(args.reference)?;
    println!("{}", render_address(&engine, &args.text));
    Ok(())
}

pub(crate) fn run_applicant(args: ApplicantArgs) -> Result<(), AppError> {
    let engine = load_engine(args.reference)?;
    println!("{}", render_applicant(&engine, &args.name));
    Ok(())
}

pub(crate) fn run_record(args: RecordArgs) -> Result<(), AppError> {
    let engine = load_engine(args.reference)?;
    let application_id = args.application_id.as_deref();
    let address = args.address.as_deref();
    let record = if args.orgs {
        engine.aggregate_with_orgs(application_id, &args.applicants, address)
    } else {
        engine.aggregate(application_id, &args.applicants, address)
    };

    let json = serde_json::to_string_pretty(&CollaborationResponse::from(record))
        .map_err(std::io::Error::from)?;
    println!("{json}");
    Ok(())
}

fn render_address(engine: &ClassificationEngine, text: &str) -> String {
    let (resolution, rule) = engine.explain_address(text);
    let AddressResolution { country, state } = resolution;
    format!(
        "country: {}\nstate: {}\nrule: {}",
        country.as_ref().map_or(UNKNOWN, |country| country.as_str()),
        state.as_deref().unwrap_or(UNKNOWN),
        rule.label()
    )
}

fn render_applicant(engine: &ClassificationEngine, name: &str) -> String {
    let verdict = engine.explain_applicant(name);
    format!(
        "category: {}\nrule: {}\nrule table: {}",
        verdict.category,
        verdict.rule.unwrap_or(UNKNOWN),
        RULE_TABLE_VERSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::engine;

    #[test]
    fn address_output_names_the_deciding_rule() {
        assert_eq!(
            render_address(&engine(), "618000四川省德阳市华山北路"),
            "country: 大陆\nstate: 四川\nrule: province"
        );
        assert_eq!(
            render_address(&engine(), "无名之地"),
            "country: -\nstate: -\nrule: unresolved"
        );
    }

    #[test]
    fn applicant_output_shows_tag_and_rule() {
        assert_eq!(
            render_applicant(&engine(), "北京协和医院"),
            format!("category: G\nrule: government.suffix\nrule table: {RULE_TABLE_VERSION}")
        );
        assert!(render_applicant(&engine(), "张三").contains("rule: length.personal_name"));
    }
}
