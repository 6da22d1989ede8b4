//! Drag-reorder controller.
//!
//! Tracks the single in-flight drag gesture and turns a drop into the model
//! operation it stands for. The controller never mutates the model itself;
//! the owning feature applies the returned [`DropOutcome`].

use crate::managers::group_model::GroupModel;
use crate::types::interaction::{DragPayload, DropPosition};

/// Which drag grammars a feature accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragPolicy {
    /// Groups can be dragged onto each other to reorder them.
    pub group_reorder: bool,
}

impl DragPolicy {
    pub const BOOKMARKS: DragPolicy = DragPolicy { group_reorder: true };
    pub const TABS: DragPolicy = DragPolicy { group_reorder: false };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    ReorderGroups {
        moved_id: String,
        target_id: String,
        position: DropPosition,
    },
    MoveItem {
        from_group_id: String,
        to_group_id: String,
        item_key: String,
    },
    Ignored(DropRejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropRejection {
    /// Nothing was being dragged.
    NoGesture,
    /// Dropped back onto the group it came from.
    SameGroup,
    /// A group drag involving a pinned group.
    Pinned,
    /// Source or target no longer exists.
    Missing,
}

/// Transient visual markers of the gesture in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragMarkers {
    pub dragging: Option<DragPayload>,
    pub over_group: Option<String>,
}

#[derive(Debug)]
pub struct DragController {
    policy: DragPolicy,
    markers: DragMarkers,
}

impl DragController {
    pub fn new(policy: DragPolicy) -> Self {
        Self {
            policy,
            markers: DragMarkers::default(),
        }
    }

    pub fn policy(&self) -> DragPolicy {
        self.policy
    }

    pub fn markers(&self) -> &DragMarkers {
        &self.markers
    }

    pub fn is_dragging(&self) -> bool {
        self.markers.dragging.is_some()
    }

    /// Starts a gesture. Group drags are refused when the policy disallows
    /// them. Returns whether the gesture started.
    pub fn begin(&mut self, payload: DragPayload) -> bool {
        if matches!(payload, DragPayload::Group { .. }) && !self.policy.group_reorder {
            return false;
        }
        self.markers = DragMarkers {
            dragging: Some(payload),
            over_group: None,
        };
        true
    }

    pub fn enter(&mut self, group_id: &str) {
        if self.is_dragging() {
            self.markers.over_group = Some(group_id.to_string());
        }
    }

    pub fn leave(&mut self, group_id: &str) {
        if self.markers.over_group.as_deref() == Some(group_id) {
            self.markers.over_group = None;
        }
    }

    /// Ends the gesture without dropping.
    pub fn cancel(&mut self) {
        self.markers = DragMarkers::default();
    }

    /// Ends the gesture over `target_group_id`. Markers are cleared whatever
    /// the outcome.
    pub fn drop_on(&mut self, target_group_id: &str, model: &GroupModel) -> DropOutcome {
        let payload = std::mem::take(&mut self.markers).dragging;
        let Some(payload) = payload else {
            return DropOutcome::Ignored(DropRejection::NoGesture);
        };

        match payload {
            DragPayload::Item {
                item_key,
                source_group_id,
            } => {
                if source_group_id == target_group_id {
                    return DropOutcome::Ignored(DropRejection::SameGroup);
                }
                if model.group(target_group_id).is_none() {
                    return DropOutcome::Ignored(DropRejection::Missing);
                }
                DropOutcome::MoveItem {
                    from_group_id: source_group_id,
                    to_group_id: target_group_id.to_string(),
                    item_key,
                }
            }
            DragPayload::Group { group_id } => {
                if group_id == target_group_id {
                    return DropOutcome::Ignored(DropRejection::SameGroup);
                }
                let (Some(moved), Some(target)) = (model.group(&group_id), model.group(target_group_id))
                else {
                    return DropOutcome::Ignored(DropRejection::Missing);
                };
                if moved.pinned || target.pinned {
                    return DropOutcome::Ignored(DropRejection::Pinned);
                }
                let unpinned = model.unpinned_in_order();
                let from = unpinned.iter().position(|g| g.id == group_id);
                let to = unpinned.iter().position(|g| g.id == target_group_id);
                let (Some(from), Some(to)) = (from, to) else {
                    return DropOutcome::Ignored(DropRejection::Missing);
                };
                DropOutcome::ReorderGroups {
                    moved_id: group_id,
                    target_id: target_group_id.to_string(),
                    position: DropPosition::between(from, to),
                }
            }
        }
    }
}
