//! Multi-party applicant field → canonical collaboration record.

mod domain;

pub use domain::{
    ApplicantClassification, CollaborationEdge, CollaborationRecord, EncodingError, Locale,
    FOREIGN_MARKER,
};

use std::collections::BTreeSet;

use crate::address::{AddressResolution, AddressResolver, Country};
use crate::applicant::{ApplicantClassifier, Category};
use crate::reference::{ReferenceData, UniversityDirectory};
use crate::text::{split_applicants, trim_name};

const CORPORATE_ROOT: &str = "公司";
const ACADEMY_ROOT: &str = "科学院";

/// Classifies and locates every party of an application.
#[derive(Debug, Clone, Copy)]
pub struct CollaborationAggregator<'a> {
    resolver: AddressResolver<'a>,
    classifier: &'a ApplicantClassifier,
    universities: &'a UniversityDirectory,
}

impl<'a> CollaborationAggregator<'a> {
    pub fn new(reference: &'a ReferenceData, classifier: &'a ApplicantClassifier) -> Self {
        Self {
            resolver: AddressResolver::new(reference),
            classifier,
            universities: reference.universities(),
        }
    }

    /// Distinct (category, state) pairs in canonical order; a lone pair is doubled.
    pub fn aggregate(
        &self,
        application_id: Option<&str>,
        applicants: &str,
        address: Option<&str>,
    ) -> CollaborationRecord {
        let mut record = self.collect(application_id, applicants, address, false);
        record.entries = canonical_pairs(record.entries);
        record
    }

    /// Every located party with its name and organization root, in field order.
    pub fn aggregate_with_orgs(
        &self,
        application_id: Option<&str>,
        applicants: &str,
        address: Option<&str>,
    ) -> CollaborationRecord {
        self.collect(application_id, applicants, address, true)
    }

    /// Decodes raw fields first; undecodable input fails only this record.
    pub fn aggregate_bytes(
        &self,
        application_id: Option<&str>,
        applicants: &[u8],
        address: Option<&[u8]>,
        include_orgs: bool,
    ) -> Result<CollaborationRecord, EncodingError> {
        let applicants = decode("applicants", applicants)?;
        let address = address.map(|raw| decode("address", raw)).transpose()?;
        Ok(if include_orgs {
            self.aggregate_with_orgs(application_id, applicants, address)
        } else {
            self.aggregate(application_id, applicants, address)
        })
    }

    fn collect(
        &self,
        application_id: Option<&str>,
        applicants: &str,
        address: Option<&str>,
        include_orgs: bool,
    ) -> CollaborationRecord {
        let primary = self.resolver.resolve(address.unwrap_or_default());

        let entries = split_applicants(applicants)
            .filter_map(|applicant| {
                let category = self.classifier.classify(applicant);
                if !category.is_known() {
                    return None;
                }
                let state = self.locate(applicant, category, &primary)?;

                let mut entry = ApplicantClassification::new(category, state);
                if include_orgs {
                    let name = trim_name(applicant);
                    entry.organization_root =
                        Some(organization_root(name, self.universities).to_string());
                    entry.name = Some(name.to_string());
                }
                Some(entry)
            })
            .collect();

        CollaborationRecord {
            application_id: application_id.map(str::to_string),
            entries,
            country: primary.country,
            state: primary.state,
        }
    }

    fn locate(
        &self,
        applicant: &str,
        category: Category,
        primary: &AddressResolution,
    ) -> Option<Locale> {
        let own = self.resolver.resolve(applicant);
        if let Some(state) = own.state {
            return Some(Locale::Province(state));
        }

        match own.country {
            None if category == Category::University => {
                if let Some(state) = self.resolver.resolve_university(applicant).state {
                    return Some(Locale::Province(state));
                }
                if !primary.is_mainland() {
                    return Some(Locale::Foreign);
                }
            }
            Some(Country::Named(_)) => return Some(Locale::Foreign),
            _ => {}
        }

        match &primary.country {
            Some(Country::Mainland) => primary.state.clone().map(Locale::Province),
            Some(Country::Named(_)) => Some(Locale::Foreign),
            None => None,
        }
    }
}

/// Shortest prefix through the first `公司`, else the longest through `科学院`,
/// else the first directory university named, else the name itself.
pub fn organization_root<'n>(name: &'n str, universities: &'n UniversityDirectory) -> &'n str {
    if let Some(start) = name.find(CORPORATE_ROOT) {
        return &name[..start + CORPORATE_ROOT.len()];
    }
    if let Some(start) = name.rfind(ACADEMY_ROOT) {
        return &name[..start + ACADEMY_ROOT.len()];
    }
    match universities.find_in(name) {
        Some((_, university)) => university,
        None => name,
    }
}

fn canonical_pairs(entries: Vec<ApplicantClassification>) -> Vec<ApplicantClassification> {
    let distinct: BTreeSet<(Category, Locale)> = entries
        .into_iter()
        .map(|entry| (entry.category, entry.state))
        .collect();

    let mut pairs: Vec<ApplicantClassification> = distinct
        .into_iter()
        .map(|(category, state)| ApplicantClassification::new(category, state))
        .collect();
    if pairs.len() == 1 {
        let only = pairs[0].clone();
        pairs.push(only);
    }
    pairs
}

fn decode<'b>(field: &'static str, raw: &'b [u8]) -> Result<&'b str, EncodingError> {
    std::str::from_utf8(raw).map_err(|source| EncodingError { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{classifier, reference};

    fn aggregator() -> CollaborationAggregator<'static> {
        CollaborationAggregator::new(reference(), classifier())
    }

    fn pairs(record: &CollaborationRecord) -> Vec<(Category, &str)> {
        record
            .entries
            .iter()
            .map(|entry| (entry.category, entry.state.as_str()))
            .collect()
    }

    #[test]
    fn university_and_industry_are_located_and_sorted() {
        let record = aggregator().aggregate(
            Some("CN201310000001"),
            "华中科技大学;云南电力试验研究院有限公司电力研究院",
            None,
        );
        assert_eq!(
            pairs(&record),
            vec![(Category::Industry, "云南"), (Category::University, "湖北")]
        );
        assert_eq!(record.code(), "I云南;U湖北");
        assert_eq!(record.application_id.as_deref(), Some("CN201310000001"));
        assert_eq!(record.country, None);
    }

    #[test]
    fn identical_pairs_collapse_to_exactly_two() {
        let record = aggregator().aggregate(
            None,
            "北京大学；清华大学；北京航空航天大学",
            Some("北京市海淀区"),
        );
        assert_eq!(
            pairs(&record),
            vec![(Category::University, "北京"), (Category::University, "北京")]
        );
    }

    #[test]
    fn single_party_is_doubled() {
        let record = aggregator().aggregate(None, "华为技术有限公司", Some("广东省深圳市"));
        assert_eq!(
            pairs(&record),
            vec![(Category::Industry, "广东"), (Category::Industry, "广东")]
        );
    }

    #[test]
    fn primary_address_is_the_fallback_state() {
        let record = aggregator().aggregate(
            None,
            "航天部上海航天局八○六研究所;某某电子设备厂",
            Some("四川省成都市"),
        );
        assert_eq!(
            pairs(&record),
            vec![(Category::Government, "四川"), (Category::Industry, "四川")]
        );
        assert_eq!(record.country, Some(Country::Mainland));
        assert_eq!(record.state.as_deref(), Some("四川"));
    }

    #[test]
    fn unknown_and_unlocated_parties_are_dropped() {
        let with_person = aggregator().aggregate(
            None,
            "张三;华中科技大学;云南电力试验研究院有限公司电力研究院",
            None,
        );
        let without_person = aggregator().aggregate(
            None,
            "华中科技大学;云南电力试验研究院有限公司电力研究院",
            None,
        );
        assert_eq!(with_person.entries, without_person.entries);

        let unlocated = aggregator().aggregate(None, "某某电子设备厂", None);
        assert!(unlocated.entries.is_empty());
    }

    #[test]
    fn foreign_parties_get_the_marker() {
        let record = aggregator().aggregate(
            None,
            "松下电器产业株式会社;美国加州大学",
            Some("日本国大阪府门真市"),
        );
        assert_eq!(
            pairs(&record),
            vec![(Category::Industry, "F"), (Category::University, "F")]
        );
        assert_eq!(record.country, Some(Country::Named("日本".into())));
    }

    #[test]
    fn unlisted_university_without_address_is_foreign() {
        let record = aggregator().aggregate_with_orgs(None, "斯坦福大学", None);
        assert_eq!(pairs(&record), vec![(Category::University, "F")]);
    }

    #[test]
    fn organization_mode_keeps_every_party_with_roots() {
        let record = aggregator().aggregate_with_orgs(
            Some("CN1"),
            " 北京大学医学部 ;北京大学;中国科学院化学研究所;联想(北京)有限公司研发中心",
            Some("北京市海淀区中关村北一街2号"),
        );
        let roots: Vec<(&str, &str, &str)> = record
            .entries
            .iter()
            .map(|entry| {
                (
                    entry.name.as_deref().unwrap_or_default(),
                    entry.organization_root.as_deref().unwrap_or_default(),
                    entry.state.as_str(),
                )
            })
            .collect();
        assert_eq!(
            roots,
            vec![
                ("北京大学医学部", "北京大学", "北京"),
                ("北京大学", "北京大学", "北京"),
                ("中国科学院化学研究所", "中国科学院", "北京"),
                ("联想(北京)有限公司研发中心", "联想(北京)有限公司", "北京"),
            ]
        );
    }

    #[test]
    fn mainland_party_without_state_needs_an_address() {
        let record = aggregator().aggregate_with_orgs(None, "中国科学院化学研究所", None);
        assert!(record.entries.is_empty());
    }

    #[test]
    fn organization_root_prefers_corporate_then_academy() {
        let directory = reference().universities();
        assert_eq!(
            organization_root("中国科学院沈阳自动化研究所", directory),
            "中国科学院"
        );
        assert_eq!(
            organization_root("中科院公司中国科学院", directory),
            "中科院公司"
        );
        assert_eq!(organization_root("清华大学深圳研究生院", directory), "清华大学");
        assert_eq!(organization_root("某某研究所", directory), "某某研究所");
    }

    #[test]
    fn invalid_bytes_fail_only_the_record() {
        let error = aggregator()
            .aggregate_bytes(None, &[0xe5, 0x8c], None, false)
            .expect_err("truncated utf-8 fails");
        assert_eq!(error.field, "applicants");

        let error = aggregator()
            .aggregate_bytes(None, "北京大学".as_bytes(), Some(&[0xff]), false)
            .expect_err("bad address fails");
        assert_eq!(error.field, "address");

        let record = aggregator()
            .aggregate_bytes(None, "北京大学".as_bytes(), None, false)
            .expect("valid utf-8 classifies");
        assert_eq!(record.code(), "U北京;U北京");
    }
}
