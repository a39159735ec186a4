use regex::Regex;

use super::Category;
use crate::text::char_len;

/// Version of [`STANDARD_RULES`]; bump whenever a pattern or the order changes.
pub const RULE_TABLE_VERSION: &str = "uig-rules-2014.3";

/// Names shorter than this are taken to be personal names.
pub const PERSONAL_NAME_MIN_CHARS: usize = 4;

/// Names shorter than this stop before the broad keyword stages.
pub const WEAK_SIGNAL_MIN_CHARS: usize = 5;

/// What a matching rule decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Assign(Category),
    Reject,
}

impl Outcome {
    pub fn category(&self) -> Category {
        match self {
            Outcome::Assign(category) => *category,
            Outcome::Reject => Category::Unknown,
        }
    }
}

#[derive(Debug, Clone)]
enum Predicate {
    Matches(Regex),
    ShorterThan(usize),
}

/// One compiled step of the classification cascade.
#[derive(Debug, Clone)]
pub struct ApplicantRule {
    pub id: &'static str,
    pub outcome: Outcome,
    predicate: Predicate,
}

impl ApplicantRule {
    pub fn applies(&self, name: &str) -> bool {
        match &self.predicate {
            Predicate::Matches(pattern) => pattern.is_match(name),
            Predicate::ShorterThan(min_chars) => char_len(name) < *min_chars,
        }
    }
}

enum PredicateSource {
    Pattern(&'static str),
    ShorterThan(usize),
}

struct RuleSource {
    id: &'static str,
    predicate: PredicateSource,
    outcome: Outcome,
}

const fn pattern(id: &'static str, source: &'static str, outcome: Outcome) -> RuleSource {
    RuleSource {
        id,
        predicate: PredicateSource::Pattern(source),
        outcome,
    }
}

const fn shorter_than(id: &'static str, min_chars: usize) -> RuleSource {
    RuleSource {
        id,
        predicate: PredicateSource::ShorterThan(min_chars),
        outcome: Outcome::Reject,
    }
}

// Exclusions sit between keyword stages to catch names the next, broader stage would
// otherwise claim. Order is significant.
const STANDARD_RULES: &[RuleSource] = &[
    pattern(
        "exclusion.non_organization",
        "小学|中学|监狱|银行",
        Outcome::Reject,
    ),
    shorter_than("length.personal_name", PERSONAL_NAME_MIN_CHARS),
    pattern(
        "industry.corporate_root",
        "公司",
        Outcome::Assign(Category::Industry),
    ),
    pattern(
        "government.academy_root",
        "科学院",
        Outcome::Assign(Category::Government),
    ),
    pattern(
        "university.suffix",
        "(?:大学|学院|学校)$",
        Outcome::Assign(Category::University),
    ),
    pattern(
        "industry.suffix",
        "(?:公司|实业|企业|工业|厂|集团|车间|矿)$",
        Outcome::Assign(Category::Industry),
    ),
    pattern(
        "government.suffix",
        "(?:医院|保健院)$",
        Outcome::Assign(Category::Government),
    ),
    pattern(
        "university.keyword",
        "大学|学院|学校",
        Outcome::Assign(Category::University),
    ),
    shorter_than("length.weak_signal", WEAK_SIGNAL_MIN_CHARS),
    pattern(
        "industry.keyword",
        "有限|公司|实业|企业|厂|集团|车间",
        Outcome::Assign(Category::Industry),
    ),
    pattern(
        "exclusion.military_police",
        "解放军|部队|军区|军分区|公安局|警察",
        Outcome::Reject,
    ),
    pattern(
        "government.keyword",
        concat!(
            "(?:科学|技术|研究|开发|研发|设计|科研|科技).*(?:所|院|中心|基地)",
            "|(?:科|工程)院|科学(?:研究|技术)|科委|(?:计算|实验|测试)中心|研究会|实验室|医院",
            "|政府|机构|部$|厅$|局$|处$|院$|所$|站$|部.*中心$|协会$|委员会$",
        ),
        Outcome::Assign(Category::Government),
    ),
    pattern(
        "industry.foreign_form",
        r"株式|\(株\)|（株）|会社|公社|托拉斯",
        Outcome::Assign(Category::Industry),
    ),
    pattern(
        "government.foreign_consortium",
        "研究组(?:织|合)",
        Outcome::Assign(Category::Government),
    ),
    pattern(
        "exclusion.residual",
        concat!(
            r"·|\..+|队$|(?:农|林|牧|渔|殖|猪|牛|羊|鸡|禽|木|茶|盐|种|加工)场",
            "|商店|学会|办公室|联合会|工会|出版社|保健院|红十字|基金(?:会)?$|台$|馆$",
        ),
        Outcome::Reject,
    ),
];

pub(crate) fn compile_standard() -> Result<Vec<ApplicantRule>, regex::Error> {
    STANDARD_RULES
        .iter()
        .map(|entry| {
            let predicate = match entry.predicate {
                PredicateSource::Pattern(source) => Predicate::Matches(Regex::new(source)?),
                PredicateSource::ShorterThan(min_chars) => Predicate::ShorterThan(min_chars),
            };
            Ok(ApplicantRule {
                id: entry.id,
                outcome: entry.outcome,
                predicate,
            })
        })
        .collect()
}
