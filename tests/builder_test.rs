//! Tests for the type registry and container builder

use std::sync::Arc;

use rstest::rstest;

use rsconf::application::{
    ApplicationError, AttributeValue, ContainerBuilder, DependencySpec, TypeRegistry,
};
use rsconf::domain::{ContainerDefinition, XmlDocument};

/// A stand-in runtime object the factories produce
#[derive(Debug, PartialEq)]
struct Cache {
    size: i64,
}

fn definition(xml: &str) -> ContainerDefinition {
    ContainerDefinition::from_document(XmlDocument::parse(xml).unwrap()).unwrap()
}

fn cache_registry() -> Arc<TypeRegistry> {
    let mut registry = TypeRegistry::new();
    registry.register("cache.memory", |spec: &DependencySpec| {
        let size = spec
            .attributes
            .get("size")
            .and_then(AttributeValue::as_int)
            .unwrap_or(0);
        Arc::new(Cache { size })
    });
    Arc::new(registry)
}

// ============================================================
// Attribute coercion edge cases
// ============================================================

#[rstest]
#[case("TRUE", AttributeValue::Bool(true))]
#[case("fAlSe", AttributeValue::Bool(false))]
#[case("007", AttributeValue::Int(7))]
#[case("9999999999", AttributeValue::Int(9_999_999_999))]
#[case("", AttributeValue::Str("".into()))]
#[case(" 42", AttributeValue::Str(" 42".into()))]
fn given_raw_attribute_when_coerced_then_expected_variant(
    #[case] raw: &str,
    #[case] expected: AttributeValue,
) {
    assert_eq!(AttributeValue::coerce(raw), expected);
}

// ============================================================
// build_container() tests
// ============================================================

#[test]
fn given_known_keys_when_built_then_container_holds_specs_in_order() {
    // Arrange
    let registry = cache_registry();
    let def = definition(
        r#"<config name="App"><first type="cache.memory" size="1" /><second type="cache.memory" size="2" /></config>"#,
    );

    // Act
    let container = ContainerBuilder::new(registry).build_container(&def).unwrap();

    // Assert
    let names: Vec<_> = container.dependencies().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);
    assert_eq!(container.name, "App");
}

#[test]
fn given_unknown_key_when_built_then_typed_error_names_the_dependency() {
    let registry = cache_registry();
    let def = definition(r#"<config name="App"><db type="db.postgres" /></config>"#);

    let result = ContainerBuilder::new(registry).build_container(&def);

    assert!(matches!(
        result,
        Err(ApplicationError::UnknownImplementationKey { ref key, ref dependency })
            if key == "db.postgres" && dependency == "db"
    ));
}

#[test]
fn given_missing_type_attribute_when_built_then_error() {
    let registry = cache_registry();
    let def = definition(r#"<config name="App"><db size="1" /></config>"#);

    let result = ContainerBuilder::new(registry).build_container(&def);

    assert!(matches!(
        result,
        Err(ApplicationError::MissingTypeAttribute { ref dependency }) if dependency == "db"
    ));
}

#[test]
fn given_abstract_definitions_when_build_containers_then_they_are_skipped() {
    // Arrange
    let registry = cache_registry();
    let defs = vec![
        definition(r#"<config name="Base" abstract="true"><c type="cache.memory" /></config>"#),
        definition(r#"<config name="App"><c type="cache.memory" /></config>"#),
    ];

    // Act
    let containers = ContainerBuilder::new(registry).build_containers(defs).unwrap();

    // Assert
    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0].name, "App");
}

// ============================================================
// resolve() tests
// ============================================================

#[test]
fn given_factory_when_resolved_then_attributes_reach_the_instance() {
    let registry = cache_registry();
    let def = definition(r#"<config name="App"><c type="cache.memory" size="128" /></config>"#);
    let container = ContainerBuilder::new(registry).build_container(&def).unwrap();

    let instance = container.resolve("c").unwrap();

    let cache = instance.downcast_ref::<Cache>().unwrap();
    assert_eq!(cache.size, 128);
}

#[test]
fn given_single_instance_when_resolved_twice_then_same_handle_is_returned() {
    // Arrange
    let registry = cache_registry();
    let def = definition(
        r#"<config name="App"><c type="cache.memory" singleInstance="true" size="1" /></config>"#,
    );
    let container = ContainerBuilder::new(registry).build_container(&def).unwrap();

    // Act
    let first = container.resolve("c").unwrap();
    let second = container.resolve("c").unwrap();

    // Assert
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn given_transient_dependency_when_resolved_twice_then_instances_differ() {
    let registry = cache_registry();
    let def = definition(r#"<config name="App"><c type="cache.memory" size="1" /></config>"#);
    let container = ContainerBuilder::new(registry).build_container(&def).unwrap();

    let first = container.resolve("c").unwrap();
    let second = container.resolve("c").unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn given_unknown_dependency_name_when_resolved_then_error() {
    let registry = cache_registry();
    let def = definition(r#"<config name="App"><c type="cache.memory" /></config>"#);
    let container = ContainerBuilder::new(registry).build_container(&def).unwrap();

    let result = container.resolve("nope");

    assert!(matches!(result, Err(ApplicationError::UnknownDependency(_))));
}
