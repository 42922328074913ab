//! Tests for the pairwise inheritance merge engine

use rsconf::domain::{InheritanceEngine, XmlDocument, XmlElement};

fn parse_root(xml: &str) -> XmlElement {
    XmlDocument::parse(xml).unwrap().root
}

fn merge(source: &str, target: &str) -> String {
    let engine = InheritanceEngine::new();
    engine
        .process(&parse_root(source), &parse_root(target))
        .to_string()
}

// ============================================================
// Root element handling
// ============================================================

#[test]
fn given_empty_target_when_merged_then_source_children_pass_through() {
    let result = merge(r#"<config><element type="foo" /></config>"#, "<config />");

    assert_eq!(result, r#"<config><element type="foo" /></config>"#);
}

#[test]
fn given_empty_source_when_merged_then_target_children_pass_through() {
    let result = merge("<config />", r#"<config><element type="foo" /></config>"#);

    assert_eq!(result, r#"<config><element type="foo" /></config>"#);
}

#[test]
fn given_target_root_attribute_when_merged_then_target_attribute_wins() {
    let result = merge(
        "<config><element /></config>",
        r#"<config name="Foo"><element /></config>"#,
    );

    assert_eq!(result, r#"<config name="Foo"><element /></config>"#);
}

#[test]
fn given_different_root_tags_when_merged_then_target_tag_wins() {
    // A defaults layer can use any root tag; the named layer decides
    let result = merge(
        "<defaults><element /></defaults>",
        r#"<config name="Foo"><element /></config>"#,
    );

    assert_eq!(result, r#"<config name="Foo"><element /></config>"#);
}

#[test]
fn given_source_root_attributes_when_merged_then_they_are_not_inherited() {
    // Root attributes come from the target wholesale, no union at the root
    let result = merge(
        r#"<config abstract="true"><element /></config>"#,
        r#"<config name="Foo"><element /></config>"#,
    );

    assert_eq!(result, r#"<config name="Foo"><element /></config>"#);
}

// ============================================================
// Comment handling
// ============================================================

#[test]
fn given_comments_on_both_sides_when_merged_then_source_comments_survive() {
    let result = merge(
        r#"<config><!-- haha --><element type="foo" /><!-- lul --></config>"#,
        r#"<config><!-- kek --><element type="foo" /><!-- lawl --></config>"#,
    );

    assert_eq!(
        result,
        r#"<config><!-- haha --><element type="foo" /><!-- lul --></config>"#
    );
}

// ============================================================
// Matched pair merging
// ============================================================

#[test]
fn given_disjoint_attributes_when_merged_then_union_keeps_both() {
    let result = merge(
        r#"<config><element bonkers="foo" /></config>"#,
        r#"<config><element monkeys="bars" /></config>"#,
    );

    assert_eq!(
        result,
        r#"<config><element bonkers="foo" monkeys="bars" /></config>"#
    );
}

#[test]
fn given_same_attribute_on_both_sides_when_merged_then_target_value_wins() {
    // The overridden attribute keeps its original position; source-only
    // attributes survive
    let result = merge(
        r#"<config><element a="1" b="keep" /></config>"#,
        r#"<config><element a="2" /></config>"#,
    );

    assert_eq!(result, r#"<config><element a="2" b="keep" /></config>"#);
}

#[test]
fn given_changed_type_when_merged_then_target_replaces_element() {
    let result = merge(
        r#"<config><element type="foo" /></config>"#,
        r#"<config><element type="bars" /></config>"#,
    );

    assert_eq!(result, r#"<config><element type="bars" /></config>"#);
}

#[test]
fn given_changed_type_when_merged_then_source_attributes_are_dropped() {
    let result = merge(
        r#"<config><element type="foo" baz="baz" /></config>"#,
        r#"<config><element type="bars" /></config>"#,
    );

    assert_eq!(result, r#"<config><element type="bars" /></config>"#);
}

#[test]
fn given_changed_type_when_merged_then_source_children_are_dropped() {
    let result = merge(
        r#"<config><element type="foo" baz="baz"><cfg /></element></config>"#,
        r#"<config><element type="bars" /></config>"#,
    );

    assert_eq!(result, r#"<config><element type="bars" /></config>"#);
}

#[test]
fn given_unchanged_type_when_merged_then_children_append_flat() {
    // No deeper matching inside a matched pair: children append as-is
    let result = merge(
        r#"<config><element type="foo"><cfg /></element></config>"#,
        r#"<config><element><cfg /></element></config>"#,
    );

    assert_eq!(
        result,
        r#"<config><element type="foo"><cfg /><cfg /></element></config>"#
    );
}

#[test]
fn given_type_introduced_by_target_when_merged_then_target_replaces_element() {
    // Introducing a type where the source had none counts as an override
    let result = merge(
        r#"<config><element keep="no"><cfg /></element></config>"#,
        r#"<config><element type="foo" /></config>"#,
    );

    assert_eq!(result, r#"<config><element type="foo" /></config>"#);
}

#[test]
fn given_same_type_value_when_merged_then_union_applies() {
    let result = merge(
        r#"<config><element type="foo" keep="yes" /></config>"#,
        r#"<config><element type="foo" extra="1" /></config>"#,
    );

    assert_eq!(
        result,
        r#"<config><element type="foo" keep="yes" extra="1" /></config>"#
    );
}

// ============================================================
// Unmatched elements and ordering
// ============================================================

#[test]
fn given_unmatched_target_elements_when_merged_then_they_append_after() {
    let result = merge(
        "<config><alpha /></config>",
        "<config><beta /><gamma /></config>",
    );

    assert_eq!(result, "<config><alpha /><beta /><gamma /></config>");
}

#[test]
fn given_repeated_sibling_tags_when_merged_then_pairing_is_sequential() {
    let result = merge(
        r#"<config><item id="s1" /><item id="s2" /></config>"#,
        r#"<config><item extra="t1" /></config>"#,
    );

    assert_eq!(
        result,
        r#"<config><item id="s1" extra="t1" /><item id="s2" /></config>"#
    );
}

// ============================================================
// Multi-layer composition
// ============================================================

#[test]
fn given_three_layers_when_folded_then_children_accumulate_in_layer_order() {
    let engine = InheritanceEngine::new();
    let defaults = parse_root(r#"<defaults><dep1 type="Foo, Foo" /></defaults>"#);
    let base = parse_root(r#"<config name="Foo" abstract="true"><dep2 type="Bar, Bar" /></config>"#);
    let leaf = parse_root(r#"<config name="Bar"><dep3 type="Baz, Baz" /></config>"#);

    let result = engine.process(&engine.process(&defaults, &base), &leaf);

    assert_eq!(
        result.to_string(),
        r#"<config name="Bar"><dep1 type="Foo, Foo" /><dep2 type="Bar, Bar" /><dep3 type="Baz, Baz" /></config>"#
    );
}

#[test]
fn given_interleaved_merges_when_engine_is_reused_then_results_are_independent() {
    // Arrange
    let engine = InheritanceEngine::new();
    let source_a = parse_root(r#"<config><element a="1" /></config>"#);
    let target_a = parse_root(r#"<config><element b="2" /></config>"#);
    let source_b = parse_root(r#"<other><item type="x" /></other>"#);
    let target_b = parse_root(r#"<other><item type="y" /></other>"#);

    // Act - run an unrelated merge between two identical merges
    let first = engine.process(&source_a, &target_a);
    let _ = engine.process(&source_b, &target_b);
    let second = engine.process(&source_a, &target_a);

    // Assert - nothing carries over between calls
    assert_eq!(first, second);
    assert_eq!(
        first.to_string(),
        r#"<config><element a="1" b="2" /></config>"#
    );
}

#[test]
fn given_inputs_when_merged_then_neither_input_is_mutated() {
    let engine = InheritanceEngine::new();
    let source = parse_root(r#"<config a="1"><element x="1" /></config>"#);
    let target = parse_root(r#"<config b="2"><element y="2" /></config>"#);
    let source_before = source.clone();
    let target_before = target.clone();

    let _ = engine.process(&source, &target);

    assert_eq!(source, source_before);
    assert_eq!(target, target_before);
}
