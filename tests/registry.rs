use anyhow::Result;
use poset_registry::{Poset, PosetError, PosetHandle, Registry, RegistryConfig};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn registry_with(names: &[&str]) -> (Registry, PosetHandle) {
    init_tracing();
    let mut registry = Registry::new();
    let p = registry.new_poset();
    for name in names {
        assert!(registry.insert(p, name), "insert {name}");
    }
    (registry, p)
}

#[test]
fn fresh_elements_are_only_related_to_themselves() {
    let (registry, p) = registry_with(&["x", "y"]);
    assert!(registry.test(p, "x", "x"));
    assert!(!registry.test(p, "x", "y"));
    assert!(!registry.test(p, "y", "x"));
}

#[test]
fn reversed_relation_is_refused() {
    let (mut registry, p) = registry_with(&["a", "b"]);
    assert!(registry.add(p, "a", "b"));
    assert!(!registry.add(p, "b", "a"));
    assert!(!registry.test(p, "b", "a"));
}

#[test]
fn transitive_pairs_need_no_explicit_add() {
    let (mut registry, p) = registry_with(&["a", "b", "c", "d"]);
    assert!(registry.add(p, "c", "d"));
    assert!(registry.add(p, "a", "b"));
    assert!(registry.add(p, "b", "c"));
    assert!(registry.test(p, "a", "d"));
    assert!(!registry.add(p, "a", "d"));
}

#[test]
fn removing_a_bridge_element() -> Result<()> {
    let (mut registry, p) = registry_with(&["a", "x", "b"]);
    assert!(registry.add(p, "a", "x"));
    assert!(registry.add(p, "x", "b"));
    assert!(registry.remove(p, "x"));

    assert!(!registry.test(p, "a", "x"));
    assert!(!registry.test(p, "x", "b"));
    assert_eq!(registry.size(p), 2);
    registry.get(p)?.check_invariants()?;
    Ok(())
}

#[test]
fn deleted_handle_comes_back_empty() {
    let (mut registry, p) = registry_with(&["a"]);
    let q = registry.new_poset();
    registry.delete(p);
    assert!(!registry.test(p, "a", "a"));

    let reused = registry.new_poset();
    assert_eq!(reused, p);
    assert_ne!(reused, q);
    assert_eq!(registry.size(reused), 0);
    assert!(registry.insert(reused, "a"));
}

#[test]
fn typed_errors_through_get_mut() -> Result<()> {
    let (mut registry, p) = registry_with(&["a", "b", "c"]);
    let poset = registry.get_mut(p)?;
    poset.add_relation("a", "b")?;
    poset.add_relation("b", "c")?;

    assert_eq!(
        poset.remove_relation("a", "c"),
        Err(PosetError::NotCoveringRelation {
            lesser: "a".into(),
            greater: "c".into()
        })
    );
    assert_eq!(
        poset.insert("a"),
        Err(PosetError::DuplicateName("a".into()))
    );
    assert_eq!(
        registry.get(PosetHandle::from(9)).unwrap_err().to_string(),
        "poset 9 does not exist"
    );
    Ok(())
}

#[test]
fn snapshot_of_a_registry_poset() -> Result<()> {
    init_tracing();
    let config = RegistryConfig::from_json(r#"{ "slot_capacity": 1, "element_capacity": 8 }"#)?;
    let mut registry = Registry::with_config(&config);
    let p = registry.new_poset();
    *registry.get_mut(p)? = Poset::from_chains(&[vec!["low", "mid", "high"], vec!["low", "side"]])?;

    let snapshot = registry.get(p)?.snapshot()?;
    assert_eq!(snapshot.elements, ["low", "mid", "high", "side"]);
    assert_eq!(
        snapshot.covers,
        [
            ("low".to_owned(), "mid".to_owned()),
            ("low".to_owned(), "side".to_owned()),
            ("mid".to_owned(), "high".to_owned()),
        ]
    );
    assert_eq!(snapshot.order.first().map(String::as_str), Some("low"));
    assert!(snapshot.to_json()?.contains("\"incomparable\""));
    Ok(())
}
