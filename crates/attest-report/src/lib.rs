//! Attest Report
//!
//! Runs the verification pipeline and assembles its single artifact, the
//! [`RunReport`].
//!
//! The pipeline is one linear pass:
//!
//! 1. Schema validation ([`attest_gatekeeper`])
//! 2. Dependency graph validation ([`attest_graph`])
//! 3. Witness evaluation for accepted claims ([`attest_witness`])
//! 4. Provenance classification ([`attest_classifier`])
//! 5. Report assembly, including the audit catalogue
//!
//! Nothing in a run is fatal once the registry has loaded: every violation
//! and warning is collected into the report, and `overall_pass` tells
//! automation whether any hard violation was found.
//!
//! # Examples
//!
//! ```
//! use attest_domain::builtin_registry;
//! use attest_report::{Engine, EngineConfig};
//!
//! let registry = builtin_registry().unwrap();
//! let report = Engine::new(EngineConfig::default()).run(&registry);
//! assert!(report.overall_pass);
//! assert_eq!(report.exit_status, 0);
//! ```

#![warn(missing_docs)]

mod audit;
mod engine;
mod error;
mod report;

pub use audit::{AuditCheck, AuditStatus, Severity};
pub use engine::{Engine, EngineConfig};
pub use error::{ReportError, Result};
pub use report::{
    ClaimStatus, ImportEntry, RunReport, TierSummary, ViolationEntry, WarningEntry, WitnessEntry,
    WitnessState,
};
