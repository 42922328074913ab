//! Inheritance merge engine: pairwise document merge
//!
//! Combines a more general ("source") element tree with a more specific
//! ("target") tree. Callers chain calls across layers, folding
//! defaults -> base -> concrete; the engine itself is a pure pairwise
//! primitive with no per-call state.

use tracing::trace;

use crate::domain::node::{XmlContent, XmlElement};

/// Reserved attribute acting as the override discriminator: a target element
/// that changes it replaces the matched source subtree wholesale.
pub const TYPE_ATTRIBUTE: &str = "type";

/// Pure pairwise merge over element trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct InheritanceEngine;

impl InheritanceEngine {
    pub fn new() -> Self {
        Self
    }

    /// Merge `target` over `source`, returning a fresh tree.
    ///
    /// The result root takes the target's tag and attributes wholesale; the
    /// child lists are reconciled by tag name. Neither input is mutated.
    pub fn process(&self, source: &XmlElement, target: &XmlElement) -> XmlElement {
        trace!("process: <{}> over <{}>", target.tag, source.tag);

        let mut result = XmlElement::new(&target.tag);
        for (name, value) in target.attributes() {
            result.set_attribute(name, value);
        }
        result.children = self.reconcile_children(source, target);
        result
    }

    /// Pair source and target child elements by tag name and merge each pair.
    ///
    /// Source children keep their positions; comments and other non-element
    /// content on the source side pass through in place, while the target's
    /// own non-element content is never copied. Unmatched target elements are
    /// appended after all source-derived children, in target order.
    ///
    /// When several siblings share a tag name, pairing is sequential: each
    /// source element takes the first not-yet-consumed target element with
    /// the same tag, in document order.
    fn reconcile_children(&self, source: &XmlElement, target: &XmlElement) -> Vec<XmlContent> {
        let mut consumed = vec![false; target.children.len()];
        let mut children = Vec::with_capacity(source.children.len() + target.children.len());

        for item in &source.children {
            match item {
                XmlContent::Element(source_child) => {
                    let matched = target.children.iter().enumerate().find_map(|(idx, candidate)| {
                        if consumed[idx] {
                            return None;
                        }
                        candidate
                            .as_element()
                            .filter(|t| t.tag == source_child.tag)
                            .map(|t| (idx, t))
                    });
                    match matched {
                        Some((idx, target_child)) => {
                            consumed[idx] = true;
                            children.push(XmlContent::Element(
                                self.merge_pair(source_child, target_child),
                            ));
                        }
                        None => children.push(item.clone()),
                    }
                }
                passthrough => children.push(passthrough.clone()),
            }
        }

        for (idx, item) in target.children.iter().enumerate() {
            if item.is_element() && !consumed[idx] {
                children.push(item.clone());
            }
        }

        children
    }

    /// Merge a matched pair: full replace when the target changes the
    /// `type` attribute, union merge otherwise.
    fn merge_pair(&self, source: &XmlElement, target: &XmlElement) -> XmlElement {
        if self.overrides_type(source, target) {
            trace!("merge_pair: <{}> type override, full replace", target.tag);
            return target.clone();
        }

        // Union merge: target attributes win, children append flat.
        // No deeper matching happens here; nested inheritance is realized by
        // merging again at a higher layer.
        let mut merged = source.clone();
        for (name, value) in target.attributes() {
            merged.set_attribute(name, value);
        }
        merged.children.extend(target.children.iter().cloned());
        merged
    }

    /// True when the target introduces or changes the `type` attribute.
    fn overrides_type(&self, source: &XmlElement, target: &XmlElement) -> bool {
        match target.attribute(TYPE_ATTRIBUTE) {
            Some(target_type) => source.attribute(TYPE_ATTRIBUTE) != Some(target_type),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::node::XmlDocument;

    fn parse_root(xml: &str) -> XmlElement {
        XmlDocument::parse(xml).unwrap().root
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let source = parse_root(r#"<config a="1"><element x="1" /></config>"#);
        let target = parse_root(r#"<config b="2"><element y="2" /></config>"#);
        let source_before = source.clone();
        let target_before = target.clone();

        let _ = InheritanceEngine::new().process(&source, &target);

        assert_eq!(source, source_before);
        assert_eq!(target, target_before);
    }

    #[test]
    fn test_union_merge_appends_target_attributes_after_source() {
        let source = parse_root(r#"<config><element bonkers="foo" /></config>"#);
        let target = parse_root(r#"<config><element monkeys="bars" /></config>"#);

        let result = InheritanceEngine::new().process(&source, &target);

        assert_eq!(
            result.to_string(),
            r#"<config><element bonkers="foo" monkeys="bars" /></config>"#
        );
    }

    #[test]
    fn test_same_type_value_is_union_not_replace() {
        let source = parse_root(r#"<config><element type="foo" keep="yes" /></config>"#);
        let target = parse_root(r#"<config><element type="foo" extra="1" /></config>"#);

        let result = InheritanceEngine::new().process(&source, &target);
        let element = result.child_elements().next().unwrap();

        assert_eq!(element.attribute("keep"), Some("yes"));
        assert_eq!(element.attribute("extra"), Some("1"));
    }

    #[test]
    fn test_repeated_sibling_tags_pair_sequentially() {
        let source = parse_root(r#"<config><item id="s1" /><item id="s2" /></config>"#);
        let target = parse_root(r#"<config><item extra="t1" /></config>"#);

        let result = InheritanceEngine::new().process(&source, &target);
        let items: Vec<_> = result.child_elements().collect();

        assert_eq!(items.len(), 2);
        // First source item pairs with the single target item
        assert_eq!(items[0].attribute("id"), Some("s1"));
        assert_eq!(items[0].attribute("extra"), Some("t1"));
        assert_eq!(items[1].attribute("id"), Some("s2"));
        assert_eq!(items[1].attribute("extra"), None);
    }
}
