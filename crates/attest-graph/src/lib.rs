//! Attest Graph
//!
//! Dependency graph validation over claim-to-claim edges.
//!
//! Axiom references are not edges: axioms have no dependencies of their own
//! and act as roots. The validator reports:
//! - Every dependency cycle, as the shortest loop through the revisited claim
//! - The tier implied by the longest dependency path from a root
//! - Claims depending on claims of a later declared tier
//! - Axioms no claim references
//!
//! Cycles listed in the configured exception list are downgraded to warnings.

#![warn(missing_docs)]

mod config;
mod graph;
mod validator;

pub use config::GraphConfig;
pub use graph::{Cycle, DependencyGraph};
pub use validator::{GraphReport, GraphValidator, GraphWarning, GraphWarningKind};
