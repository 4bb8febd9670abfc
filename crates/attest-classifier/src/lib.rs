//! Attest Classifier
//!
//! Provenance consistency checks and aggregate histograms.
//!
//! A claim's tag may be no stronger than the weakest tag in its dependency
//! closure (`convention` < `import-gated` < `structural` < `proved`). The
//! classifier computes that implied tag for every accepted claim, flags
//! overclaimed labels as warnings, and marks claims it cannot judge (on a
//! dependency cycle, or resting on a rejected claim) as indeterminate.

#![warn(missing_docs)]

mod classifier;
mod histogram;

pub use classifier::{
    ClassifierReport, LabelWarning, LabelWarningKind, ProvenanceClassifier, ProvenanceFinding,
    ProvenanceStatus,
};
pub use histogram::Histogram;
