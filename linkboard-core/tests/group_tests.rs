// Tests for grouping link records by parent page

use linkboard_core::group::group_by_parent;
use linkboard_fetch::LinkRecord;
use serde_json::json;
use std::collections::HashSet;

fn record(parent: Option<&str>, id: u64) -> LinkRecord {
    LinkRecord::new(parent).with_field("id", id)
}

fn id_of(link: &LinkRecord) -> u64 {
    link.extra["id"].as_u64().unwrap()
}

fn ids(links: &[LinkRecord]) -> Vec<u64> {
    links.iter().map(id_of).collect()
}

/// Deterministic pseudo-random inputs: a mix of a few parents, empty and
/// missing parents, in varying lengths.
fn generated_inputs() -> Vec<Vec<LinkRecord>> {
    let parents = [Some("a"), Some("b"), Some("c"), Some(""), None, Some("https://example.com/")];
    let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
    let mut inputs = Vec::new();

    for len in [0usize, 1, 2, 5, 17, 64] {
        let mut links = Vec::with_capacity(len);
        for id in 0..len as u64 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let parent = parents[(seed >> 33) as usize % parents.len()];
            links.push(record(parent, id));
        }
        inputs.push(links);
    }

    inputs
}

// ============================================================================
// Concrete scenarios
// ============================================================================

#[test]
fn test_group_mixed_parents() {
    let links = vec![
        record(Some("a"), 1),
        record(Some("b"), 2),
        record(Some("a"), 3),
        record(None, 4),
    ];

    let groups = group_by_parent(&links);

    assert_eq!(groups.parents(), ["a", "b"]);
    assert_eq!(ids(groups.get("a").unwrap()), vec![1, 3]);
    assert_eq!(ids(groups.get("b").unwrap()), vec![2]);
    assert_eq!(groups.link_count(), 3);

    let summary = groups.summary();
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].parent, "a");
    assert_eq!(ids(summary[0].links), vec![1, 3]);
    assert_eq!(summary[1].parent, "b");
    assert_eq!(ids(summary[1].links), vec![2]);

    // Input untouched
    assert_eq!(ids(&links), vec![1, 2, 3, 4]);
}

#[test]
fn test_group_empty_input() {
    let groups = group_by_parent(&[]);

    assert!(groups.is_empty());
    assert_eq!(groups.len(), 0);
    assert!(groups.parents().is_empty());
    assert!(groups.summary().is_empty());
    assert_eq!(groups.link_count(), 0);
}

#[test]
fn test_group_single_parent_keeps_order() {
    let links: Vec<LinkRecord> = (0..10).map(|id| record(Some("only"), id)).collect();

    let groups = group_by_parent(&links);

    assert_eq!(groups.len(), 1);
    assert_eq!(ids(groups.get("only").unwrap()), (0..10).collect::<Vec<_>>());
}

#[test]
fn test_group_excludes_empty_parent() {
    let links = vec![record(Some(""), 1), record(None, 2), record(Some("x"), 3)];

    let groups = group_by_parent(&links);

    assert_eq!(groups.parents(), ["x"]);
    assert!(groups.get("").is_none());
}

#[test]
fn test_group_keeps_duplicate_records() {
    let duplicate = record(Some("p"), 7);
    let links = vec![duplicate.clone(), duplicate.clone(), duplicate];

    let groups = group_by_parent(&links);

    assert_eq!(groups.get("p").unwrap().len(), 3);
}

#[test]
fn test_group_order_is_first_occurrence_not_sorted() {
    let links = vec![
        record(Some("zeta"), 1),
        record(Some("alpha"), 2),
        record(Some("mu"), 3),
        record(Some("alpha"), 4),
    ];

    let groups = group_by_parent(&links);

    assert_eq!(groups.parents(), ["zeta", "alpha", "mu"]);
}

#[test]
fn test_group_serializes_keys_in_first_occurrence_order() {
    let links = vec![record(Some("zeta"), 1), record(Some("alpha"), 2)];

    let groups = group_by_parent(&links);
    let encoded = serde_json::to_string(&groups).unwrap();

    let zeta = encoded.find("\"zeta\"").unwrap();
    let alpha = encoded.find("\"alpha\"").unwrap();
    assert!(zeta < alpha, "keys out of order: {}", encoded);

    let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
    assert_eq!(value["alpha"], json!([{"parent": "alpha", "id": 2}]));
}

#[test]
fn test_group_does_not_inspect_other_fields() {
    let links = vec![
        LinkRecord::new(Some("p"))
            .with_field("url", "https://example.com/a")
            .with_field("nested", json!({"deep": [1, 2]})),
    ];

    let groups = group_by_parent(&links);

    assert_eq!(groups.get("p").unwrap()[0], links[0]);
}

// ============================================================================
// Properties over generated inputs
// ============================================================================

#[test]
fn test_every_parented_record_in_exactly_one_group() {
    for links in generated_inputs() {
        let groups = group_by_parent(&links);

        for link in &links {
            let Some(parent) = link.parent_key() else {
                continue;
            };

            let containing: Vec<&str> = groups
                .iter()
                .filter(|(_, group)| group.iter().any(|l| id_of(l) == id_of(link)))
                .map(|(p, _)| p)
                .collect();
            assert_eq!(containing, vec![parent]);
        }
    }
}

#[test]
fn test_groups_preserve_relative_order() {
    for links in generated_inputs() {
        let groups = group_by_parent(&links);

        for (parent, group) in groups.iter() {
            let expected: Vec<u64> = links
                .iter()
                .filter(|l| l.parent_key() == Some(parent))
                .map(id_of)
                .collect();
            assert_eq!(ids(group), expected);
        }
    }
}

#[test]
fn test_unparented_records_never_grouped() {
    for links in generated_inputs() {
        let groups = group_by_parent(&links);
        let unparented: HashSet<u64> = links
            .iter()
            .filter(|l| l.parent_key().is_none())
            .map(id_of)
            .collect();

        for entry in groups.summary() {
            assert!(entry.links.iter().all(|l| !unparented.contains(&id_of(l))));
        }
        assert_eq!(groups.link_count() + unparented.len(), links.len());
    }
}

#[test]
fn test_summary_length_matches_distinct_parents() {
    for links in generated_inputs() {
        let groups = group_by_parent(&links);
        let distinct: HashSet<&str> = links.iter().filter_map(LinkRecord::parent_key).collect();

        assert_eq!(groups.summary().len(), distinct.len());
        assert_eq!(groups.parents().len(), distinct.len());
    }
}

#[test]
fn test_summary_follows_first_occurrence() {
    for links in generated_inputs() {
        let groups = group_by_parent(&links);

        let mut seen = Vec::new();
        for parent in links.iter().filter_map(LinkRecord::parent_key) {
            if !seen.contains(&parent) {
                seen.push(parent);
            }
        }

        let summary_parents: Vec<&str> = groups.summary().iter().map(|s| s.parent).collect();
        assert_eq!(summary_parents, seen);
    }
}
