//! Integration tests for void_decode
//!
//! Exercises the full decode → link path over JSON literals

use std::sync::Arc;
use void_core::{EntityId, EntityPlaceholder};
use void_decode::*;
use void_ir::{FieldPath, Node, Value};
use void_schema::{SchemaRegistry, StructDescriptor, TypeDescriptor, UnionDescriptor};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn registry() -> SchemaRegistry {
    SchemaRegistry::builder()
        .register("Vec3", TypeDescriptor::fixed_array(TypeDescriptor::float(), 3))
        .register("Quat", TypeDescriptor::fixed_array(TypeDescriptor::float(), 4))
        .register(
            "Transform",
            StructDescriptor::default()
                .field("position", TypeDescriptor::named("Vec3"))
                .field_with_default("rotation", TypeDescriptor::named("Quat"), vec![0.0, 0.0, 0.0, 1.0])
                .field_with_default("scale", TypeDescriptor::float(), 1.0),
        )
        .register(
            "Shape",
            UnionDescriptor::default()
                .variant(
                    "box",
                    StructDescriptor::new("Box")
                        .field("width", TypeDescriptor::float())
                        .field("height", TypeDescriptor::float()),
                )
                .variant("circle", StructDescriptor::new("Circle").field("radius", TypeDescriptor::float()))
                .void_variant("point"),
        )
        .register(
            "Follow",
            StructDescriptor::default()
                .field("target", TypeDescriptor::entity_ref())
                .field_with_default("distance", TypeDescriptor::float(), 2.0),
        )
        .build()
        .expect("registry should build")
}

fn json(source: &str) -> Node {
    serde_json::from_str(source).expect("fixture should parse")
}

#[test]
fn test_default_equals_explicit_default() {
    let registry = registry();
    let decoder = Decoder::new(&registry);

    let implicit = decoder
        .decode_named("Transform", &json(r#"{"position": [1, 2, 3]}"#))
        .unwrap();
    let explicit = decoder
        .decode_named(
            "Transform",
            &json(r#"{"position": [1, 2, 3], "rotation": [0, 0, 0, 1], "scale": 1.0}"#),
        )
        .unwrap();

    assert_eq!(implicit, explicit);
}

#[test]
fn test_fixed_array_length_errors() {
    let registry = registry();
    let decoder = Decoder::new(&registry);

    for len in [0usize, 3, 5] {
        let elements = vec![Node::Float(0.5); len];
        let node = Node::record([("position", Node::tuple([1, 2, 3])), ("rotation", Node::Tuple(elements))]);

        let err = decoder.decode_named("Transform", &node).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::ArraySizeMismatch { expected: 4, got: len });
        assert_eq!(err.path.to_string(), "rotation");
    }
}

#[test]
fn test_shape_from_json() {
    init_logging();
    let registry = registry();
    let decoder = Decoder::new(&registry);

    let boxed = decoder
        .decode_named("Shape", &json(r#"{"box": {"width": 50, "height": 30}}"#))
        .unwrap();
    let union = boxed.as_union().unwrap();
    assert_eq!((union.union.as_str(), union.variant.as_str()), ("Shape", "box"));
    assert_eq!(union.payload.get("width"), Some(&Value::Float(50.0)));

    let point = decoder.decode_named("Shape", &Node::tag("point")).unwrap();
    assert!(point.as_union().unwrap().is_void());

    let relaxed = decoder
        .decode_named("Shape", &json(r#"{"width": 10, "height": 20}"#))
        .unwrap();
    assert_eq!(relaxed.as_union().unwrap().variant, "box");

    let err = decoder.decode_named("Shape", &Node::tag("triangle")).unwrap_err();
    assert_eq!(
        err.kind,
        DecodeErrorKind::UnresolvedUnionVariant {
            available: vec!["box".into(), "circle".into(), "point".into()],
        }
    );
}

#[test]
fn test_strict_mode_from_toml() {
    let registry = registry();
    let config = DecoderConfig::from_toml_str("union_mode = \"strict\"").unwrap();
    let decoder = Decoder::with_config(&registry, config);

    let err = decoder
        .decode_named("Shape", &json(r#"{"width": 10, "height": 20}"#))
        .unwrap_err();
    assert!(matches!(err.kind, DecodeErrorKind::UnresolvedUnionVariant { .. }));

    // Explicit selectors still work
    assert!(decoder.decode_named("Shape", &json(r#"{"circle": {"radius": 1}}"#)).is_ok());
}

#[test]
fn test_prefab_merge_then_decode() {
    let registry = registry();
    let decoder = Decoder::new(&registry);

    let prefab = json(r#"{"position": [0, 0, 0], "scale": 2.0}"#);
    let instance = json(r#"{"position": [5, 0, 5]}"#);

    let merged = decoder
        .decode_named("Transform", &merge_nodes(prefab.clone(), instance.clone()))
        .unwrap();
    let layered = merge(
        decoder.decode_named("Transform", &prefab).unwrap(),
        decoder
            .decode_named("Transform", &json(r#"{"position": [5, 0, 5], "scale": 2.0}"#))
            .unwrap(),
    );

    assert_eq!(merged, layered);
    assert_eq!(merged.get("scale"), Some(&Value::Float(2.0)));
}

#[test]
fn test_reference_decode_and_link() {
    init_logging();
    let registry = registry();
    let decoder = Decoder::new(&registry);
    let literal = json(r#"{"target": {"ref": {"entity": "door"}}}"#);
    let player = EntityPlaceholder::new(0);

    let mut follow = decoder.decode_named("Follow", &literal).unwrap();
    assert_eq!(follow.get("target"), Some(&Value::EntityRef(None)));

    let refs = extract_references(player, "Follow", &literal).unwrap();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].target, ReferenceTarget::Named("door".into()));

    let door = EntityId::new(1, 0);
    let mut table = NameTable::new();
    table.bind(player, EntityId::new(0, 0));
    table.insert_name("door", door);

    link(&refs, &table, |_, component, path: &FieldPath, value| {
        assert_eq!(component, "Follow");
        match follow.lookup_mut(path).and_then(Value::entity_slot_mut) {
            Some(slot) => {
                *slot = value.as_entity();
                Ok(())
            }
            None => Err(format!("no entity slot at {}", path)),
        }
    })
    .unwrap();

    assert_eq!(follow.get("target").and_then(Value::as_entity), Some(door));
}

#[test]
fn test_decode_component_collects_references() {
    let registry = registry();
    let decoder = Decoder::new(&registry);
    let literal = json(r#"{"target": {"ref": {"entity": "door"}}}"#);
    let owner = EntityPlaceholder::new(3);

    let decoded = decoder.decode_component(owner, "Follow", &literal).unwrap();
    assert_eq!(decoded.value, decoder.decode_named("Follow", &literal).unwrap());
    assert_eq!(decoded.references, extract_references(owner, "Follow", &literal).unwrap());
    assert_eq!(decoded.references[0].field_path, FieldPath::from_steps(["target"]));
}

#[test]
fn test_serialized_tags_decode_the_same() {
    let registry = registry();
    let decoder = Decoder::new(&registry);
    let point = Node::tag("point");

    let text = serde_json::to_string(&point).unwrap();
    assert_eq!(
        decoder.decode_named("Shape", &json(&text)).unwrap(),
        decoder.decode_named("Shape", &point).unwrap()
    );
}

#[test]
fn test_link_to_missing_entity() {
    let literal = json(r#"{"target": {"ref": {"entity": "chest"}}}"#);
    let refs = extract_references(EntityPlaceholder::new(0), "Follow", &literal).unwrap();

    let mut table = NameTable::new();
    table.bind(EntityPlaceholder::new(0), EntityId::new(0, 0));

    let err = link(&refs, &table, |_, _, _, _| Ok::<_, String>(())).unwrap_err();
    assert!(matches!(err, LinkError::UnresolvedReferenceTarget { ref name } if name == "chest"));
}

#[test]
fn test_malformed_reference_is_a_decode_error() {
    let registry = registry();
    let decoder = Decoder::new(&registry);

    let err = decoder
        .decode_named("Follow", &json(r#"{"target": {"ref": 12}}"#))
        .unwrap_err();
    assert!(matches!(err.kind, DecodeErrorKind::InvalidReferenceSyntax { .. }));
    assert_eq!(err.path.to_string(), "target");
}

#[test]
fn test_concurrent_decodes_share_registry() {
    let registry = Arc::new(registry());
    let literals: Vec<Node> = (0..8)
        .map(|i| json(&format!(r#"{{"position": [{i}, 0, 0], "scale": {i}}}"#)))
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = literals
            .iter()
            .map(|literal| {
                let registry = Arc::clone(&registry);
                scope.spawn(move || Decoder::new(&registry).decode_named("Transform", literal))
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let value = handle.join().unwrap().unwrap();
            assert_eq!(value.get("scale"), Some(&Value::Float(i as f64)));
        }
    });
}
