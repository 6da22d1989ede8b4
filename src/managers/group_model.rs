//! Entity Model: the in-memory group/item graph shared by both features.
//!
//! All operations are synchronous and run to completion. Each one reports a
//! [`Mutation`] so the owning feature knows whether to persist and re-render;
//! only input validation produces an error.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;
use uuid::Uuid;

use crate::services::url_tools::{ensure_scheme, normalize_url};
use crate::types::errors::{Mutation, SkipReason, ValidationError};
use crate::types::group::{Group, Item};
use crate::types::interaction::DropPosition;

/// Millisecond timestamp source.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Wall clock in milliseconds since the UNIX epoch.
pub fn system_clock() -> Clock {
    Arc::new(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    })
}

/// Operations over a group collection.
pub trait GroupModelTrait {
    fn add_group(&mut self, name: &str) -> Result<String, ValidationError>;
    fn rename_group(&mut self, id: &str, new_name: &str) -> Mutation;
    fn toggle_expand(&mut self, id: &str) -> Mutation;
    fn toggle_pin(&mut self, id: &str) -> Mutation;
    fn delete_group(&mut self, id: &str) -> Mutation;
    fn add_item(
        &mut self,
        group_id: &str,
        url: &str,
        display_name: Option<&str>,
    ) -> Result<Mutation, ValidationError>;
    fn remove_items(&mut self, group_id: &str, keys: &HashSet<String>) -> Mutation;
    fn move_item(&mut self, from_group_id: &str, to_group_id: &str, key: &str) -> Mutation;
    fn reorder_groups(&mut self, moved_id: &str, target_id: &str, position: DropPosition) -> Mutation;
}

/// Owned group collection with one reserved, undeletable group.
pub struct GroupModel {
    groups: Vec<Group>,
    reserved_id: String,
    clock: Clock,
}

impl GroupModel {
    /// A collection holding only an empty reserved group.
    pub fn new(reserved_id: &str, reserved_name: &str) -> Self {
        Self::from_groups(Vec::new(), reserved_id, reserved_name)
    }

    /// Adopts a loaded or projected collection, creating the reserved group if
    /// it is missing and renumbering unpinned orders densely.
    pub fn from_groups(groups: Vec<Group>, reserved_id: &str, reserved_name: &str) -> Self {
        let mut model = Self {
            groups,
            reserved_id: reserved_id.to_string(),
            clock: system_clock(),
        };
        if model.index_of(reserved_id).is_none() {
            let order = model.unpinned_count();
            model.groups.push(Group::new(reserved_id, reserved_name, order));
        }
        model.renumber();
        model
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.set_clock(clock);
        self
    }

    /// Swaps the timestamp source, keeping every group.
    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    pub fn reserved_id(&self) -> &str {
        &self.reserved_id
    }

    pub fn is_reserved(&self, id: &str) -> bool {
        self.reserved_id == id
    }

    /// Groups in storage order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<Group> {
        self.groups
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Display order: pinned groups by most recent pin, then unpinned by rank.
    pub fn ordered(&self) -> Vec<&Group> {
        let mut pinned: Vec<&Group> = self.groups.iter().filter(|g| g.pinned).collect();
        pinned.sort_by(|a, b| b.pinned_time.cmp(&a.pinned_time));
        let mut ordered = pinned;
        ordered.extend(self.unpinned_in_order());
        ordered
    }

    /// Unpinned groups sorted by `order`.
    pub fn unpinned_in_order(&self) -> Vec<&Group> {
        let mut unpinned: Vec<&Group> = self.groups.iter().filter(|g| !g.pinned).collect();
        unpinned.sort_by_key(|g| g.order);
        unpinned
    }

    fn now(&self) -> i64 {
        (self.clock)()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.id == id)
    }

    fn unpinned_count(&self) -> usize {
        self.groups.iter().filter(|g| !g.pinned).count()
    }

    /// Unpinned group indices sorted by (order, storage position).
    fn unpinned_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.groups.len())
            .filter(|&i| !self.groups[i].pinned)
            .collect();
        indices.sort_by_key(|&i| (self.groups[i].order, i));
        indices
    }

    fn assign_orders(&mut self, sequence: &[usize]) {
        for (rank, &idx) in sequence.iter().enumerate() {
            self.groups[idx].order = rank;
        }
    }

    /// Restores `order` to a dense `0..N` over unpinned groups, keeping their
    /// relative sequence.
    fn renumber(&mut self) {
        let sequence = self.unpinned_indices();
        self.assign_orders(&sequence);
    }

    fn skip(op: &str, id: &str, reason: SkipReason) -> Mutation {
        debug!(op, id, ?reason, "group operation skipped");
        Mutation::Skipped(reason)
    }
}

impl GroupModelTrait for GroupModel {
    /// Adds an empty, expanded group at the end of the unpinned sequence.
    /// Returns the new group's id.
    fn add_group(&mut self, name: &str) -> Result<String, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.groups.iter().any(|g| g.name == name) {
            return Err(ValidationError::DuplicateName(name.to_string()));
        }

        let id = format!("group-{}", Uuid::new_v4());
        let order = self.unpinned_count();
        self.groups.push(Group::new(id.clone(), name, order));
        Ok(id)
    }

    fn rename_group(&mut self, id: &str, new_name: &str) -> Mutation {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Self::skip("rename_group", id, SkipReason::EmptyName);
        }
        if self.is_reserved(id) {
            return Self::skip("rename_group", id, SkipReason::Reserved);
        }
        let Some(idx) = self.index_of(id) else {
            return Self::skip("rename_group", id, SkipReason::NotFound);
        };
        if self.groups[idx].name == new_name {
            return Mutation::Skipped(SkipReason::Unchanged);
        }
        self.groups[idx].name = new_name.to_string();
        Mutation::Applied
    }

    fn toggle_expand(&mut self, id: &str) -> Mutation {
        let Some(idx) = self.index_of(id) else {
            return Self::skip("toggle_expand", id, SkipReason::NotFound);
        };
        self.groups[idx].expanded = !self.groups[idx].expanded;
        Mutation::Applied
    }

    /// Pins or unpins a group.
    ///
    /// The toggled group's own `order` is left as it was: while pinned it
    /// remembers the slot the group came from, and unpinning reinserts it
    /// there, so pin followed by unpin leaves every other rank unchanged.
    fn toggle_pin(&mut self, id: &str) -> Mutation {
        let Some(idx) = self.index_of(id) else {
            return Self::skip("toggle_pin", id, SkipReason::NotFound);
        };

        if self.groups[idx].pinned {
            self.groups[idx].pinned = false;
            self.groups[idx].pinned_time = None;
            let mut sequence: Vec<usize> = self
                .unpinned_indices()
                .into_iter()
                .filter(|&i| i != idx)
                .collect();
            let slot = self.groups[idx].order.min(sequence.len());
            sequence.insert(slot, idx);
            self.assign_orders(&sequence);
        } else {
            self.groups[idx].pinned = true;
            self.groups[idx].pinned_time = Some(self.now());
            let remembered = self.groups[idx].order;
            self.renumber();
            self.groups[idx].order = remembered;
        }
        Mutation::Applied
    }

    /// Removes a group with all of its items. The reserved group is kept.
    fn delete_group(&mut self, id: &str) -> Mutation {
        if self.is_reserved(id) {
            return Self::skip("delete_group", id, SkipReason::Reserved);
        }
        let Some(idx) = self.index_of(id) else {
            return Self::skip("delete_group", id, SkipReason::NotFound);
        };
        self.groups.remove(idx);
        self.renumber();
        Mutation::Applied
    }

    /// Appends a link, completing a missing scheme with `https://`.
    ///
    /// Rejected when the group already holds a URL with the same normalized
    /// form.
    fn add_item(
        &mut self,
        group_id: &str,
        url: &str,
        display_name: Option<&str>,
    ) -> Result<Mutation, ValidationError> {
        if url.trim().is_empty() {
            return Err(ValidationError::EmptyUrl);
        }
        let url = ensure_scheme(url);
        let Some(idx) = self.index_of(group_id) else {
            return Ok(Self::skip("add_item", group_id, SkipReason::NotFound));
        };

        let normalized = normalize_url(&url);
        if self.groups[idx]
            .items
            .iter()
            .any(|item| normalize_url(&item.url) == normalized)
        {
            return Err(ValidationError::DuplicateItem(url));
        }

        let display_name = display_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let now = self.now();
        self.groups[idx]
            .items
            .push(Item::bookmark(url, display_name, now));
        Ok(Mutation::Applied)
    }

    /// Removes every item whose key is in `keys`. A non-reserved group left
    /// empty is removed as well.
    fn remove_items(&mut self, group_id: &str, keys: &HashSet<String>) -> Mutation {
        let Some(idx) = self.index_of(group_id) else {
            return Self::skip("remove_items", group_id, SkipReason::NotFound);
        };

        let before = self.groups[idx].items.len();
        self.groups[idx].items.retain(|item| !keys.contains(&item.key()));
        if self.groups[idx].items.len() == before {
            return Mutation::Skipped(SkipReason::Unchanged);
        }

        if self.groups[idx].items.is_empty() && !self.is_reserved(group_id) {
            debug!(group_id, "removing group emptied by deletion");
            self.groups.remove(idx);
            self.renumber();
        }
        Mutation::Applied
    }

    /// Moves an item unchanged to the end of another group.
    fn move_item(&mut self, from_group_id: &str, to_group_id: &str, key: &str) -> Mutation {
        if from_group_id == to_group_id {
            return Mutation::Skipped(SkipReason::SameGroup);
        }
        let (Some(from), Some(to)) = (self.index_of(from_group_id), self.index_of(to_group_id))
        else {
            return Self::skip("move_item", from_group_id, SkipReason::NotFound);
        };
        let Some(pos) = self.groups[from].items.iter().position(|i| i.key() == key) else {
            return Self::skip("move_item", key, SkipReason::NotFound);
        };

        let item = self.groups[from].items.remove(pos);
        self.groups[to].items.push(item);
        Mutation::Applied
    }

    /// Moves `moved_id` next to `target_id` within the unpinned sequence and
    /// renumbers. Pinned groups never take part.
    fn reorder_groups(&mut self, moved_id: &str, target_id: &str, position: DropPosition) -> Mutation {
        let (Some(moved), Some(target)) = (self.index_of(moved_id), self.index_of(target_id)) else {
            return Self::skip("reorder_groups", moved_id, SkipReason::NotFound);
        };
        if self.groups[moved].pinned || self.groups[target].pinned {
            return Self::skip("reorder_groups", moved_id, SkipReason::Pinned);
        }
        if moved == target {
            return Mutation::Skipped(SkipReason::Unchanged);
        }

        let mut sequence: Vec<usize> = self
            .unpinned_indices()
            .into_iter()
            .filter(|&i| i != moved)
            .collect();
        let Some(target_pos) = sequence.iter().position(|&i| i == target) else {
            return Self::skip("reorder_groups", target_id, SkipReason::NotFound);
        };
        let insert_at = match position {
            DropPosition::Before => target_pos,
            DropPosition::After => target_pos + 1,
        };
        sequence.insert(insert_at, moved);
        self.assign_orders(&sequence);
        Mutation::Applied
    }
}
