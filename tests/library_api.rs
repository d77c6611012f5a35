//! Integration tests for the callmap library API.

use callmap::{CallmapError, Resolution, build, build_with, parse_codebase};
use std::path::Path;

const FIXTURE: &str = "tests/fixtures/shop";

#[test]
fn test_parse_fixture_project() {
    let modules = parse_codebase(Path::new(FIXTURE)).unwrap();

    let names: Vec<_> = modules.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["cart", "pricing"]);

    let cart = &modules[0];
    let qualified: Vec<_> = cart
        .functions
        .iter()
        .map(|f| f.qualified_name.as_str())
        .collect();
    assert_eq!(
        qualified,
        ["cart.Cart.__init__", "cart.Cart.add", "cart.Cart.checkout"]
    );

    let add = &cart.functions[1];
    assert_eq!(add.params, ["item", "qty"]);
    assert_eq!(add.docstring.as_deref(), Some("Add an item to the cart."));
    assert_eq!(add.line_number, 8);
}

#[test]
fn test_build_from_fixture_project() {
    let graph = build(parse_codebase(Path::new(FIXTURE)).unwrap());

    assert_eq!(graph.nodes.len(), 5);
    assert!(
        graph
            .edges
            .iter()
            .any(|e| e.from == "pricing.total" && e.to == "pricing.price")
    );

    // bare calls resolve into the caller's own module
    let dangling: Vec<_> = graph.dangling_edges().map(|e| e.to.as_str()).collect();
    assert!(dangling.contains(&"cart.total"), "{:?}", dangling);
    assert!(!dangling.contains(&"pricing.price"));

    let checkout = graph.lookup.get("cart.Cart.checkout").unwrap();
    assert_eq!(checkout.calls, ["total"]);
}

#[test]
fn test_whole_dataset_keeps_edge_count() {
    let modules = parse_codebase(Path::new(FIXTURE)).unwrap();
    let ordered = build(modules.clone());
    let whole = build_with(modules, Resolution::WholeDataset);

    assert_eq!(ordered.nodes.len(), whole.nodes.len());
    assert_eq!(ordered.edges.len(), whole.edges.len());
}

#[test]
fn test_parse_invalid_path() {
    let result = parse_codebase(Path::new("/nonexistent/path"));

    match result {
        Err(CallmapError::PathNotFound(_)) => {}
        Err(e) => panic!("Expected PathNotFound error, got: {:?}", e),
        Ok(_) => panic!("Expected error for invalid path"),
    }
}

const PACKAGES: &str = "tests/fixtures/packages";

#[test]
fn test_same_file_name_in_two_packages_stays_distinct() {
    let modules = parse_codebase(Path::new(PACKAGES)).unwrap();

    let names: Vec<_> = modules.iter().map(|m| m.name.as_str()).collect();
    assert!(names.contains(&"pkg_a.utils"), "{:?}", names);
    assert!(names.contains(&"pkg_b.utils"), "{:?}", names);
    assert!(names.contains(&"pkg_a"), "{:?}", names);

    let graph = build(modules);
    let mut ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), total, "duplicate node ids: {:?}", ids);
    assert!(ids.contains(&"pkg_a.utils.helper"));
    assert!(ids.contains(&"pkg_b.utils.helper"));
}

#[test]
fn test_latin1_source_is_parsed() {
    let modules = parse_codebase(Path::new(PACKAGES)).unwrap();

    let legacy = modules
        .iter()
        .find(|m| m.name == "legacy")
        .expect("legacy.py should not be dropped");
    assert_eq!(
        legacy.functions[0].docstring.as_deref(),
        Some("Dit bonjour à tous.")
    );
}
