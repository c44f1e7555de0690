// View models handed to the presenters (report renderer, terminal viewer)

use crate::group::{LinkGroups, ParentSummary, group_by_parent};
use linkboard_fetch::LinkRecord;
use serde::{Serialize, Serializer};
use std::fmt;

/// Named region a view is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountPoint {
    /// Grouped view of broken links per parent page
    BrokenLinksList,
    /// Flat list of links
    Links,
}

impl MountPoint {
    pub fn id(&self) -> &'static str {
        match self {
            MountPoint::BrokenLinksList => "broken-links-list",
            MountPoint::Links => "links",
        }
    }
}

impl fmt::Display for MountPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id())
    }
}

impl Serialize for MountPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// Where a view is in its single load cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState<V> {
    #[default]
    Loading,
    Ready(V),
    Failed(String),
}

impl<V> ViewState<V> {
    pub fn is_ready(&self) -> bool {
        matches!(self, ViewState::Ready(_))
    }

    pub fn view(&self) -> Option<&V> {
        match self {
            ViewState::Ready(view) => Some(view),
            _ => None,
        }
    }
}

/// The grouped view: the raw list plus everything derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedView {
    links: Vec<LinkRecord>,
    groups: LinkGroups,
}

/// The flat view: the raw list, untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlatView {
    links: Vec<LinkRecord>,
}

/// Bind a fetched list to the grouped view, grouping it once.
pub fn bind_grouped(links: Vec<LinkRecord>) -> GroupedView {
    let groups = group_by_parent(&links);
    GroupedView { links, groups }
}

/// Bind a fetched list to the flat view.
pub fn bind_flat(links: Vec<LinkRecord>) -> FlatView {
    FlatView { links }
}

impl GroupedView {
    pub fn mount_point(&self) -> MountPoint {
        MountPoint::BrokenLinksList
    }

    /// The list exactly as fetched, including records with no parent.
    pub fn links(&self) -> &[LinkRecord] {
        &self.links
    }

    pub fn groups(&self) -> &LinkGroups {
        &self.groups
    }

    pub fn parents(&self) -> &[String] {
        self.groups.parents()
    }

    pub fn summary(&self) -> Vec<ParentSummary<'_>> {
        self.groups.summary()
    }

    /// Records that were left out of every group.
    pub fn ungrouped_count(&self) -> usize {
        self.links.len() - self.groups.link_count()
    }
}

impl FlatView {
    pub fn mount_point(&self) -> MountPoint {
        MountPoint::Links
    }

    pub fn links(&self) -> &[LinkRecord] {
        &self.links
    }
}

#[derive(Serialize)]
struct GroupedViewData<'a> {
    links: &'a [LinkRecord],
    links_by_parent: &'a LinkGroups,
    parents: &'a [String],
    data: Vec<ParentSummary<'a>>,
}

impl Serialize for GroupedView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GroupedViewData {
            links: &self.links,
            links_by_parent: &self.groups,
            parents: self.parents(),
            data: self.summary(),
        }
        .serialize(serializer)
    }
}

impl Serialize for FlatView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct FlatViewData<'a> {
            links: &'a [LinkRecord],
        }

        FlatViewData { links: &self.links }.serialize(serializer)
    }
}
