use super::*;

fn index() -> SpatialIndex<&'static str> {
    SpatialIndex::from_items([
        ("a", Bounds::from_rect(0.0, 0.0, 10.0, 10.0)),
        ("b", Bounds::from_rect(50.0, 50.0, 10.0, 10.0)),
        ("c", Bounds::from_rect(5.0, 5.0, 100.0, 2.0)),
    ])
}

fn sorted(mut keys: Vec<&'static str>) -> Vec<&'static str> {
    keys.sort_unstable();
    keys
}

#[test]
fn search_returns_overlapping_keys() {
    let hits = sorted(index().search(&Bounds::from_rect(8.0, 0.0, 4.0, 4.0)));
    assert_eq!(hits, vec!["a"]);
    let hits = sorted(index().search(&Bounds::from_rect(0.0, 0.0, 60.0, 60.0)));
    assert_eq!(hits, vec!["a", "b", "c"]);
}

#[test]
fn search_includes_touching_envelopes() {
    let hits = index().search(&Bounds::from_rect(60.0, 60.0, 5.0, 5.0));
    assert_eq!(hits, vec!["b"]);
}

#[test]
fn zero_area_query_hits_containing_items() {
    let hits = sorted(index().search(&Bounds::from_rect(6.0, 6.0, 0.0, 0.0)));
    assert_eq!(hits, vec!["a", "c"]);
}

#[test]
fn insert_and_clear() {
    let mut idx = SpatialIndex::new();
    assert!(idx.is_empty());
    idx.insert(1u32, Bounds::from_rect(0.0, 0.0, 1.0, 1.0));
    idx.insert(2u32, Bounds::from_rect(5.0, 5.0, 1.0, 1.0));
    assert_eq!(idx.len(), 2);
    assert_eq!(idx.search(&Bounds::from_rect(4.0, 4.0, 3.0, 3.0)), vec![2]);
    idx.clear();
    assert!(idx.is_empty());
    assert!(idx.search(&Bounds::from_rect(0.0, 0.0, 10.0, 10.0)).is_empty());
}
