//! The claim registry

use serde::Deserialize;

use crate::{Axiom, ClaimRecord, Constant, RegistryError};

/// Immutable collection of axioms, constants and claim records
///
/// Records keep their definition order; every report the engine produces
/// follows it. Duplicate identifiers are kept as defined so the schema
/// validator can report them; lookups return the first occurrence.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Registry {
    #[serde(default)]
    axioms: Vec<Axiom>,

    #[serde(default)]
    constants: Vec<Constant>,

    #[serde(default)]
    claims: Vec<ClaimRecord>,
}

impl Registry {
    /// Parse a registry definition
    ///
    /// # Examples
    ///
    /// ```
    /// use attest_domain::Registry;
    ///
    /// let registry = Registry::from_toml_str(r#"
    ///     [[axioms]]
    ///     id = "A1"
    ///     name = "Finite capacity"
    ///
    ///     [[claims]]
    ///     id = "T1"
    ///     dependencies = ["A1"]
    /// "#).unwrap();
    /// assert_eq!(registry.claims().len(), 1);
    /// ```
    pub fn from_toml_str(definition: &str) -> Result<Self, RegistryError> {
        Ok(toml::from_str(definition)?)
    }

    /// Start building a registry in code
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Axioms in definition order
    pub fn axioms(&self) -> &[Axiom] {
        &self.axioms
    }

    /// Constants in definition order
    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    /// Claim records in definition order
    pub fn claims(&self) -> &[ClaimRecord] {
        &self.claims
    }

    /// Whether the registry defines no claims
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Whether `id` names an axiom
    pub fn is_axiom(&self, id: &str) -> bool {
        self.axioms.iter().any(|axiom| axiom.id == id)
    }

    /// Whether `id` names a claim
    pub fn is_claim(&self, id: &str) -> bool {
        self.claims.iter().any(|claim| claim.id == id)
    }

    /// Whether `id` resolves to an axiom or a claim
    pub fn resolves(&self, id: &str) -> bool {
        self.is_axiom(id) || self.is_claim(id)
    }

    /// First claim record with the given identifier
    pub fn claim(&self, id: &str) -> Option<&ClaimRecord> {
        self.claims.iter().find(|claim| claim.id == id)
    }
}

/// Builder for registries defined in code
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: Registry,
}

impl RegistryBuilder {
    /// Add an axiom
    pub fn axiom(mut self, axiom: Axiom) -> Self {
        self.registry.axioms.push(axiom);
        self
    }

    /// Add a constant
    pub fn constant(mut self, constant: Constant) -> Self {
        self.registry.constants.push(constant);
        self
    }

    /// Add a claim record
    pub fn claim(mut self, claim: ClaimRecord) -> Self {
        self.registry.claims.push(claim);
        self
    }

    /// Finish building
    pub fn build(self) -> Registry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_registry() {
        let definition = r#"
            [[axioms]]
            id = "A1"
            name = "Finite capacity"
            statement = "Every interface has finite enforcement capacity."

            [[constants]]
            name = "C_int"
            value = "12"
            origin = "A1"

            [[claims]]
            id = "T1"
            name = "First"
            tier = 0
            provenance = "proved"
            gap = "closed"
            dependencies = ["A1"]

            [[claims]]
            id = "T2"
            name = "Second"
            tier = 1
            provenance = "import-gated"
            source = "Kochen-Specker (1967)"
            gap = "import"
            dependencies = ["T1"]

            [claims.witness]
            check = "capacity"
            expression = "C_int"
            mode = "exact-equality"
            expected = "12"
        "#;

        let registry = Registry::from_toml_str(definition).unwrap();
        assert_eq!(registry.axioms().len(), 1);
        assert_eq!(registry.constants()[0].origin.as_deref(), Some("A1"));
        assert_eq!(registry.claims().len(), 2);

        let t2 = registry.claim("T2").unwrap();
        assert_eq!(t2.source.as_deref(), Some("Kochen-Specker (1967)"));
        let witness = t2.witness.as_ref().unwrap();
        assert_eq!(witness.mode.as_deref(), Some("exact-equality"));
        assert!(registry.claim("T1").unwrap().witness.is_none());
    }

    #[test]
    fn test_missing_fields_are_not_load_errors() {
        let registry = Registry::from_toml_str("[[claims]]\nid = \"T1\"\n").unwrap();
        let record = &registry.claims()[0];
        assert!(record.provenance.is_none());
        assert!(record.tier.is_none());
        assert!(record.dependencies.is_empty());
    }

    #[test]
    fn test_wrongly_typed_field_fails_to_load() {
        let result = Registry::from_toml_str("[[claims]]\nid = \"T1\"\ntier = \"three\"\n");
        assert!(matches!(result, Err(RegistryError::Parse(_))));
    }

    #[test]
    fn test_unknown_section_fails_to_load() {
        assert!(Registry::from_toml_str("[[claim]]\nid = \"T1\"\n").is_err());
        assert!(Registry::from_toml_str("not toml at all [").is_err());
    }

    #[test]
    fn test_misspelled_record_keys_fail_to_load() {
        let misspelled_witness = r#"
            [[claims]]
            id = "T2"
            name = "Result"
            dependencies = ["T1"]

            [claims.witnes]
            check = "broken"
            expression = "1/0"
            mode = "exact-equality"
            expected = "0"
        "#;
        assert!(matches!(
            Registry::from_toml_str(misspelled_witness),
            Err(RegistryError::Parse(_))
        ));

        let misspelled_dependencies = "[[claims]]\nid = \"T2\"\ndepends = [\"T1\"]\n";
        assert!(Registry::from_toml_str(misspelled_dependencies).is_err());

        let witness_key = "[[claims]]\nid = \"T2\"\n[claims.witness]\nexpresion = \"1\"\n";
        assert!(Registry::from_toml_str(witness_key).is_err());

        assert!(Registry::from_toml_str("[[axioms]]\nid = \"A1\"\nstatment = \"x\"\n").is_err());
        assert!(Registry::from_toml_str("[[constants]]\nname = \"c\"\nvalu = \"1\"\n").is_err());
    }

    #[test]
    fn test_empty_definition() {
        let registry = Registry::from_toml_str("").unwrap();
        assert!(registry.is_empty());
        assert!(registry.axioms().is_empty());
    }

    #[test]
    fn test_lookup() {
        let registry = Registry::builder()
            .axiom(Axiom::new("A1", "Axiom", ""))
            .claim(ClaimRecord::new("T1", "First"))
            .claim(ClaimRecord::new("T1", "Duplicate"))
            .build();

        assert!(registry.is_axiom("A1"));
        assert!(!registry.is_claim("A1"));
        assert!(registry.resolves("T1"));
        assert!(!registry.resolves("T9"));
        assert_eq!(registry.claim("T1").unwrap().name.as_deref(), Some("First"));
    }
}
