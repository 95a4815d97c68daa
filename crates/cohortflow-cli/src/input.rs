//! Input document format.
//!
//! A diagram is described by a TOML document with optional figure settings
//! and one `[[nodes]]` table per cohort step:
//!
//! ```toml
//! title = "Trial enrollment"
//! style = "colorful"
//!
//! [[nodes]]
//! heading = "Assessed for eligibility"
//! count = 1000
//!
//! [[nodes]]
//! heading = "Randomized"
//! count = 820
//! exclusion_description = "Did not meet criteria"
//! ```
//!
//! Node tables accept the same fields as
//! [`CohortNode`](cohortflow::CohortNode), including the `N` spelling for
//! the count.

use cohortflow::CohortNode;
use serde::Deserialize;

/// A parsed diagram document.
#[derive(Debug, Deserialize)]
pub struct FlowDocument {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    style: Option<String>,
    #[serde(default)]
    transparent: Option<bool>,
    #[serde(default)]
    nodes: Vec<CohortNode>,
}

impl FlowDocument {
    /// Parses a TOML document.
    pub fn parse(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Returns the document's figure title, if set.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the document's style name, if set.
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// Returns whether the document asks for a transparent background.
    pub fn transparent(&self) -> bool {
        self.transparent.unwrap_or(false)
    }

    /// Returns the cohort steps in flow order.
    pub fn nodes(&self) -> &[CohortNode] {
        &self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_document() {
        let source = r#"
            title = "Trial enrollment"
            style = "colorful"
            transparent = true

            [[nodes]]
            heading = "Assessed for eligibility"
            count = 1000

            [[nodes]]
            heading = "Randomized"
            N = 820
            exclusion_description = "Did not meet criteria"
        "#;

        let document = FlowDocument::parse(source).unwrap();
        assert_eq!(document.title(), Some("Trial enrollment"));
        assert_eq!(document.style(), Some("colorful"));
        assert!(document.transparent());

        let nodes = document.nodes();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].count(), 1000);
        assert_eq!(nodes[1].count(), 820);
        assert_eq!(
            nodes[1].exclusion_description(),
            Some("Did not meet criteria")
        );
    }

    #[test]
    fn test_defaults_for_missing_keys() {
        let document = FlowDocument::parse("[[nodes]]\ncount = 5\n").unwrap();
        assert!(document.title().is_none());
        assert!(document.style().is_none());
        assert!(!document.transparent());
        assert_eq!(document.nodes().len(), 1);
    }

    #[test]
    fn test_empty_document_has_no_nodes() {
        let document = FlowDocument::parse("").unwrap();
        assert!(document.nodes().is_empty());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(FlowDocument::parse("nodes = [notclosed").is_err());
    }
}
