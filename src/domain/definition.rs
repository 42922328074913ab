//! Container definitions extracted from parsed documents

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{XmlDocument, XmlElement};

/// Names the definition; required on every non-defaults root.
pub const NAME_ATTRIBUTE: &str = "name";
/// Optional reference to the base definition this one derives from.
pub const EXTENDS_ATTRIBUTE: &str = "extends";
/// Marks a definition as a base layer only, skipped by the builder.
pub const ABSTRACT_ATTRIBUTE: &str = "abstract";

/// A named configuration layer: one parsed document root plus the reserved
/// attributes the resolver and builder care about.
#[derive(Debug, Clone)]
pub struct ContainerDefinition {
    pub name: String,
    pub extends: Option<String>,
    pub is_abstract: bool,
    /// The definition's root element, children describing its dependencies
    pub element: XmlElement,
}

impl ContainerDefinition {
    /// Extract a definition from a document root.
    ///
    /// The `name` attribute is required; `extends` and `abstract` are
    /// optional. All three stay on the element as ordinary attributes so the
    /// merge engine treats them like any other.
    pub fn from_element(element: XmlElement) -> DomainResult<Self> {
        let name = element
            .attribute(NAME_ATTRIBUTE)
            .ok_or_else(|| DomainError::MissingNameAttribute {
                tag: element.tag.clone(),
            })?
            .to_string();

        let extends = element.attribute(EXTENDS_ATTRIBUTE).map(str::to_string);
        let is_abstract = element
            .attribute(ABSTRACT_ATTRIBUTE)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));

        Ok(Self {
            name,
            extends,
            is_abstract,
            element,
        })
    }

    pub fn from_document(document: XmlDocument) -> DomainResult<Self> {
        Self::from_element(document.root)
    }

    /// True when the root carries no `name` attribute, marking the document
    /// as the anonymous defaults layer.
    pub fn is_defaults_layer(element: &XmlElement) -> bool {
        !element.has_attribute(NAME_ATTRIBUTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::node::XmlDocument;

    #[test]
    fn test_from_element_reads_reserved_attributes() {
        let doc =
            XmlDocument::parse(r#"<config name="Web" extends="Base" abstract="TRUE" />"#).unwrap();

        let definition = ContainerDefinition::from_document(doc).unwrap();

        assert_eq!(definition.name, "Web");
        assert_eq!(definition.extends.as_deref(), Some("Base"));
        assert!(definition.is_abstract);
    }

    #[test]
    fn test_from_element_requires_name() {
        let doc = XmlDocument::parse(r#"<config extends="Base" />"#).unwrap();

        let result = ContainerDefinition::from_document(doc);

        assert!(matches!(
            result,
            Err(DomainError::MissingNameAttribute { ref tag }) if tag == "config"
        ));
    }

    #[test]
    fn test_defaults_layer_detection() {
        let defaults = XmlDocument::parse(r#"<defaults><dep type="x" /></defaults>"#).unwrap();
        let named = XmlDocument::parse(r#"<config name="Foo" />"#).unwrap();

        assert!(ContainerDefinition::is_defaults_layer(&defaults.root));
        assert!(!ContainerDefinition::is_defaults_layer(&named.root));
    }
}
