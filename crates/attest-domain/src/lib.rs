//! Attest Domain Layer
//!
//! This crate defines the data model every other Attest crate operates on:
//! the claim registry, its axioms and constants, and the closed enumerations
//! used to label claims.
//!
//! ## Key Concepts
//!
//! - **Claim**: a labeled assertion with a provenance tag, a gap classification
//!   and an ordered list of dependencies
//! - **Axiom**: a root assumption; claims reference it, it references nothing
//! - **Provenance tag**: how strongly a claim is justified
//!   (`proved` > `structural` > `import-gated` > `convention`)
//! - **Gap classification**: what kind of justification gap remains
//! - **Witness**: a computable check substantiating a claim's numeric assertion
//! - **Registry**: the immutable collection loaded once per run
//!
//! ## Records vs. claims
//!
//! The registry holds *records* exactly as they were defined: strings and
//! integers that may be missing or invalid. The schema validator turns records
//! into typed [`Claim`] values; nothing downstream of it sees a raw string tag.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod axiom;
pub mod builtin;
pub mod claim;
pub mod constant;
pub mod error;
pub mod gap;
pub mod provenance;
pub mod record;
pub mod registry;
pub mod tier;
pub mod witness;

// Re-exports for convenience
pub use axiom::Axiom;
pub use builtin::builtin_registry;
pub use claim::{Claim, ClaimId};
pub use constant::Constant;
pub use error::RegistryError;
pub use gap::GapClass;
pub use provenance::{ProvenanceTag, Strength};
pub use record::{ClaimRecord, WitnessRecord};
pub use registry::{Registry, RegistryBuilder};
pub use tier::Tier;
pub use witness::{ComparisonMode, WitnessSpec, DEFAULT_RELATIVE_TOLERANCE};
