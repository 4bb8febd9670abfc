//! Graph validation configuration

use serde::Deserialize;

/// Configuration for dependency graph validation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Groups of claims whose mutual dependencies are intentional
    ///
    /// A cycle whose members all belong to one group is reported as a
    /// warning instead of a violation.
    pub allowed_cycles: Vec<Vec<String>>,
}

impl GraphConfig {
    /// Whether every member of the cycle falls inside one exception group
    pub fn allows<'a>(&self, members: impl IntoIterator<Item = &'a str> + Clone) -> bool {
        self.allowed_cycles.iter().any(|group| {
            members
                .clone()
                .into_iter()
                .all(|member| group.iter().any(|allowed| allowed == member))
        })
    }
}
