//! Variable replacement inside merged definitions

use regex::Regex;

use crate::domain::definition::ContainerDefinition;
use crate::domain::node::{XmlContent, XmlElement};

/// Collaborator seam: rewrites a merged definition in place before it is
/// handed to the builder.
pub trait VariablesReplacer: Send + Sync {
    fn replace_variables(&self, definition: &mut ContainerDefinition);
}

/// Replaces `$(name)` and `$(extends)` tokens in attribute values throughout
/// the definition tree. Unknown tokens are left untouched.
pub struct TokenVariablesReplacer {
    token_regex: Regex,
}

impl Default for TokenVariablesReplacer {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenVariablesReplacer {
    pub fn new() -> Self {
        Self {
            token_regex: Regex::new(r"\$\(([^)]+)\)").unwrap(),
        }
    }

    fn lookup<'a>(&self, token: &str, definition: &'a ContainerDefinition) -> Option<&'a str> {
        match token {
            "name" => Some(definition.name.as_str()),
            "extends" => definition.extends.as_deref(),
            _ => None,
        }
    }

    fn rewrite_element(&self, element: &mut XmlElement, definition: &ContainerDefinition) {
        for value in element.attribute_values_mut() {
            if !value.contains("$(") {
                continue;
            }
            let replaced = self
                .token_regex
                .replace_all(value, |caps: &regex::Captures| {
                    self.lookup(&caps[1], definition)
                        .map_or_else(|| caps[0].to_string(), str::to_string)
                })
                .into_owned();
            *value = replaced;
        }
        for child in &mut element.children {
            if let XmlContent::Element(child_element) = child {
                self.rewrite_element(child_element, definition);
            }
        }
    }
}

impl VariablesReplacer for TokenVariablesReplacer {
    fn replace_variables(&self, definition: &mut ContainerDefinition) {
        let context = definition.clone();
        self.rewrite_element(&mut definition.element, &context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::node::XmlDocument;

    fn definition(xml: &str) -> ContainerDefinition {
        ContainerDefinition::from_document(XmlDocument::parse(xml).unwrap()).unwrap()
    }

    #[test]
    fn test_replaces_name_token_in_nested_attributes() {
        let mut def = definition(
            r#"<config name="Web" extends="Base"><dep type="x" path="/data/$(name)/logs" /></config>"#,
        );

        TokenVariablesReplacer::new().replace_variables(&mut def);

        let dep = def.element.child_elements().next().unwrap();
        assert_eq!(dep.attribute("path"), Some("/data/Web/logs"));
    }

    #[test]
    fn test_unknown_token_left_verbatim() {
        let mut def = definition(r#"<config name="Web" value="$(other)" />"#);

        TokenVariablesReplacer::new().replace_variables(&mut def);

        assert_eq!(def.element.attribute("value"), Some("$(other)"));
    }

    #[test]
    fn test_extends_token_without_base_left_verbatim() {
        let mut def = definition(r#"<config name="Web" value="$(extends)" />"#);

        TokenVariablesReplacer::new().replace_variables(&mut def);

        assert_eq!(def.element.attribute("value"), Some("$(extends)"));
    }
}
