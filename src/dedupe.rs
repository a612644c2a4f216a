//! Dedupe module - Duplicate detection and retention.
//!
//! Items are grouped by a normalized title. Inside a group the most recently
//! modified item is kept; ties go to the smallest item id. Output ordering
//! depends only on the items, never on the order they were listed in.

use crate::op::Item;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Duplicate key of a title: trimmed, inner whitespace collapsed, lowercased.
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Retention order: newest `updated_at` first, then ascending id.
pub fn retention_order(a: &Item, b: &Item) -> Ordering {
    b.updated_at
        .cmp(&a.updated_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// Group items by duplicate key. Members are sorted in retention order.
pub fn group_by_title(items: &[Item]) -> BTreeMap<String, Vec<Item>> {
    let mut groups: BTreeMap<String, Vec<Item>> = BTreeMap::new();
    for item in items {
        groups
            .entry(normalize_title(&item.title))
            .or_default()
            .push(item.clone());
    }
    for members in groups.values_mut() {
        members.sort_by(retention_order);
    }
    groups
}

/// A set of items sharing a duplicate key, split into keeper and the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Normalized title
    pub key: String,
    /// Item that stays active
    pub retained: Item,
    /// Items to archive, in retention order
    pub duplicates: Vec<Item>,
}

impl DuplicateGroup {
    /// Apply the retention rule to a set of members. `None` when empty.
    pub fn from_members(key: String, mut members: Vec<Item>) -> Option<Self> {
        if members.is_empty() {
            return None;
        }
        members.sort_by(retention_order);
        let retained = members.remove(0);
        Some(Self {
            key,
            retained,
            duplicates: members,
        })
    }

    /// Display title (the retained item's title as stored)
    pub fn title(&self) -> &str {
        &self.retained.title
    }

    /// Total number of members, retained one included
    pub fn member_count(&self) -> usize {
        self.duplicates.len() + 1
    }

    /// Whether anything in this group needs archiving
    pub fn is_actionable(&self) -> bool {
        !self.duplicates.is_empty()
    }
}

/// Actionable groups (two or more members), ordered by key.
pub fn find_duplicates(items: &[Item]) -> Vec<DuplicateGroup> {
    group_by_title(items)
        .into_iter()
        .filter_map(|(key, members)| DuplicateGroup::from_members(key, members))
        .filter(DuplicateGroup::is_actionable)
        .collect()
}

/// Number of items that would be archived across all groups.
pub fn total_duplicates(groups: &[DuplicateGroup]) -> usize {
    groups.iter().map(|g| g.duplicates.len()).sum()
}
