// groupshelf state managers
// Managers own the mutable popup state: the group model, delete-mode selection,
// drag gestures and the two feature controllers built on top of them.

pub mod bookmark_manager;
pub mod drag;
pub mod group_model;
pub mod operation_queue;
pub mod selection;
pub mod tab_manager;
