use crate::address::{AddressResolution, AddressResolver, AddressRule};
use crate::applicant::{ApplicantClassifier, Category, Verdict};
use crate::collaboration::{CollaborationAggregator, CollaborationRecord, EncodingError};
use crate::reference::{ReferenceData, ReferenceError, ReferenceSources, TechProfile};

/// Loaded reference data plus the compiled rule table, shared read-only by all callers.
#[derive(Debug)]
pub struct ClassificationEngine {
    reference: ReferenceData,
    classifier: ApplicantClassifier,
}

impl ClassificationEngine {
    pub fn new(reference: ReferenceData) -> Result<Self, ReferenceError> {
        Ok(Self {
            reference,
            classifier: ApplicantClassifier::standard()?,
        })
    }

    pub fn load(sources: &ReferenceSources) -> Result<Self, ReferenceError> {
        Self::new(ReferenceData::load(sources)?)
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn classifier(&self) -> &ApplicantClassifier {
        &self.classifier
    }

    pub fn resolve_address(&self, address: &str) -> AddressResolution {
        self.resolver().resolve(address)
    }

    pub fn explain_address(&self, address: &str) -> (AddressResolution, AddressRule) {
        self.resolver().explain(address)
    }

    pub fn classify_applicant(&self, name: &str) -> Category {
        self.classifier.classify(name)
    }

    pub fn explain_applicant(&self, name: &str) -> Verdict {
        self.classifier.explain(name)
    }

    pub fn aggregate(
        &self,
        application_id: Option<&str>,
        applicants: &str,
        address: Option<&str>,
    ) -> CollaborationRecord {
        self.aggregator()
            .aggregate(application_id, applicants, address)
    }

    pub fn aggregate_with_orgs(
        &self,
        application_id: Option<&str>,
        applicants: &str,
        address: Option<&str>,
    ) -> CollaborationRecord {
        self.aggregator()
            .aggregate_with_orgs(application_id, applicants, address)
    }

    pub fn aggregate_bytes(
        &self,
        application_id: Option<&str>,
        applicants: &[u8],
        address: Option<&[u8]>,
        include_orgs: bool,
    ) -> Result<CollaborationRecord, EncodingError> {
        self.aggregator()
            .aggregate_bytes(application_id, applicants, address, include_orgs)
    }

    pub fn classify_tech_codes(&self, int_cl: &str) -> TechProfile {
        self.reference.classify_tech_codes(int_cl)
    }

    fn resolver(&self) -> AddressResolver<'_> {
        AddressResolver::new(&self.reference)
    }

    fn aggregator(&self) -> CollaborationAggregator<'_> {
        CollaborationAggregator::new(&self.reference, &self.classifier)
    }
}
