use linkboard_fetch::LinkRecord;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Link records grouped by the page they were found on.
///
/// Keys keep the order in which each parent was first seen in the source
/// list; records inside a group keep their arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkGroups {
    parents: Vec<String>,
    by_parent: HashMap<String, Vec<LinkRecord>>,
}

/// One `{parent, links}` entry of the derived summary sequence.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ParentSummary<'a> {
    pub parent: &'a str,
    pub links: &'a [LinkRecord],
}

/// Group `links` by their parent in a single left-to-right pass.
///
/// A record joins a group only when its parent is present and non-empty.
/// The input is left untouched.
pub fn group_by_parent(links: &[LinkRecord]) -> LinkGroups {
    let mut groups = LinkGroups::default();

    for link in links {
        let Some(parent) = link.parent_key() else {
            continue;
        };

        match groups.by_parent.get_mut(parent) {
            Some(group) => group.push(link.clone()),
            None => {
                groups.parents.push(parent.to_string());
                groups
                    .by_parent
                    .insert(parent.to_string(), vec![link.clone()]);
            }
        }
    }

    groups
}

impl LinkGroups {
    /// Distinct parents in first-occurrence order.
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn get(&self, parent: &str) -> Option<&[LinkRecord]> {
        self.by_parent.get(parent).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Number of records across all groups.
    pub fn link_count(&self) -> usize {
        self.by_parent.values().map(Vec::len).sum()
    }

    /// Iterate `(parent, links)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[LinkRecord])> {
        self.parents
            .iter()
            .filter_map(|parent| Some((parent.as_str(), self.get(parent)?)))
    }

    /// Build the derived summary sequence, one entry per parent.
    pub fn summary(&self) -> Vec<ParentSummary<'_>> {
        self.iter()
            .map(|(parent, links)| ParentSummary { parent, links })
            .collect()
    }
}

impl Serialize for LinkGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.parents.len()))?;
        for (parent, links) in self.iter() {
            map.serialize_entry(parent, links)?;
        }
        map.end()
    }
}
