//! Integration tests for the structural type model

use confval_types::{PrimType, Type};

#[test]
fn collection_queries() {
    let t = Type::list(Type::object([("id", Type::number())]));
    assert!(t.is_collection());
    assert!(!t.is_primitive());
    assert_eq!(
        t.element_type().and_then(|e| e.attribute_type("id")),
        Some(&Type::number())
    );
    assert_eq!(Type::string().element_type(), None);
}

#[test]
fn objects_and_tuples_are_not_collections() {
    assert!(!Type::empty_object().is_collection());
    assert!(!Type::empty_tuple().is_collection());
    assert_eq!(
        Type::tuple(vec![Type::bool(), Type::string()]).tuple_element_types(),
        Some(&[Type::bool(), Type::string()][..])
    );
}

#[test]
fn attribute_types_are_ordered_by_name() {
    let t = Type::object([("zeta", Type::bool()), ("alpha", Type::string())]);
    let names: Vec<&str> = t
        .attribute_types()
        .expect("object type")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
}

#[test]
fn types_are_freely_shareable_across_threads() {
    let t = std::sync::Arc::new(Type::map(Type::Prim(PrimType::Number)));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let t = t.clone();
            std::thread::spawn(move || t.element_type().cloned())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().expect("thread panicked"), Some(Type::number()));
    }
}

#[test]
fn dynamic_is_a_wildcard_at_any_depth() {
    let dynamic_tuple = Type::tuple(vec![Type::Dynamic, Type::list(Type::Dynamic)]);
    let concrete = Type::tuple(vec![Type::string(), Type::list(Type::bool())]);
    assert!(dynamic_tuple.conforms_to(&concrete));
    assert!(concrete.conforms_to(&dynamic_tuple));
    assert_ne!(dynamic_tuple, concrete);
}

#[cfg(feature = "serde")]
#[test]
fn serde_round_trip_preserves_structure() {
    let t = Type::object([
        ("tags", Type::set(Type::string())),
        ("any", Type::Dynamic),
    ]);
    let json = serde_json::to_string(&t).expect("serialize");
    let back: Type = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, t);
}
