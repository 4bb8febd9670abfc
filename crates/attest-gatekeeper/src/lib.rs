//! Attest Gatekeeper
//!
//! Schema validation for claim registries.
//!
//! The Gatekeeper provides:
//! - Required field and enumeration membership checks
//! - Identifier uniqueness across axioms and claims
//! - Dangling reference detection
//! - Witness definition checks
//!
//! Validation never stops at the first defect: every violation in the
//! registry is reported in one pass, and claims without violations are
//! converted into typed [`Claim`](attest_domain::Claim) values.
//!
//! # Examples
//!
//! ```
//! use attest_domain::builtin_registry;
//! use attest_gatekeeper::{Gatekeeper, ValidationConfig};
//!
//! let registry = builtin_registry().unwrap();
//! let report = Gatekeeper::new(ValidationConfig::default()).validate(&registry);
//! assert!(report.is_clean());
//! ```

#![warn(missing_docs)]

mod config;
mod validator;

pub use config::ValidationConfig;
pub use validator::{Gatekeeper, RejectionReason, SchemaReport, Violation, ViolationKind};
