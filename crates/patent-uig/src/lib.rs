//! University/Industry/Government classification of patent records.
//!
//! Reference data (geographic taxonomy, university directory, technology codes) is loaded
//! once into [`reference::ReferenceData`]; everything downstream is a pure function over it.

pub mod address;
pub mod applicant;
pub mod collaboration;
pub mod config;
pub mod engine;
pub mod error;
pub mod reference;
pub mod telemetry;
pub mod text;

#[cfg(test)]
mod test_support;

pub use address::{AddressResolution, AddressResolver, Country};
pub use applicant::{ApplicantClassifier, Category, Verdict, RULE_TABLE_VERSION};
pub use collaboration::{
    ApplicantClassification, CollaborationAggregator, CollaborationEdge, CollaborationRecord,
    EncodingError, Locale,
};
pub use engine::ClassificationEngine;
pub use reference::{ReferenceData, ReferenceError, ReferenceSources, TechProfile};
