use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use groupshelf::managers::group_model::{Clock, GroupModel, GroupModelTrait};
use groupshelf::types::errors::{Mutation, SkipReason, ValidationError};
use groupshelf::types::group::{Group, BOOKMARK_RESERVED_ID, BOOKMARK_RESERVED_NAME};
use groupshelf::types::interaction::DropPosition;

/// Clock that ticks by one millisecond per reading.
fn ticking_clock() -> Clock {
    let t = Arc::new(AtomicI64::new(1_000));
    Arc::new(move || t.fetch_add(1, Ordering::SeqCst))
}

fn model() -> GroupModel {
    GroupModel::new(BOOKMARK_RESERVED_ID, BOOKMARK_RESERVED_NAME).with_clock(ticking_clock())
}

/// Three unpinned groups g1, g2, g3 with orders 0, 1, 2 and no reserved group
/// in between.
fn three_groups() -> GroupModel {
    let groups = vec![
        Group::new("g1", "One", 0),
        Group::new("g2", "Two", 1),
        Group::new("g3", "Three", 2),
        Group::new(BOOKMARK_RESERVED_ID, BOOKMARK_RESERVED_NAME, 3),
    ];
    GroupModel::from_groups(groups, BOOKMARK_RESERVED_ID, BOOKMARK_RESERVED_NAME)
        .with_clock(ticking_clock())
}

fn order_of(model: &GroupModel, id: &str) -> usize {
    model.group(id).unwrap().order
}

fn display_ids(model: &GroupModel) -> Vec<String> {
    model.ordered().into_iter().map(|g| g.id.clone()).collect()
}

fn keys(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// === Construction ===

#[test]
fn test_new_contains_only_reserved_group() {
    let model = model();
    assert_eq!(model.len(), 1);
    assert!(model.group(BOOKMARK_RESERVED_ID).is_some());
    assert!(model.is_reserved(BOOKMARK_RESERVED_ID));
}

#[test]
fn test_from_groups_adds_missing_reserved_and_renumbers() {
    let groups = vec![Group::new("a", "A", 7), Group::new("b", "B", 3)];
    let model = GroupModel::from_groups(groups, BOOKMARK_RESERVED_ID, BOOKMARK_RESERVED_NAME);
    assert_eq!(model.len(), 3);
    assert_eq!(order_of(&model, "b"), 0);
    assert_eq!(order_of(&model, "a"), 1);
    assert_eq!(order_of(&model, BOOKMARK_RESERVED_ID), 2);
}

// === add_group ===

#[test]
fn test_add_group_appends_with_next_order() {
    let mut model = model();
    let id = model.add_group("  Work  ").unwrap();
    let group = model.group(&id).unwrap();
    assert!(id.starts_with("group-"));
    assert_eq!(group.name, "Work");
    assert_eq!(group.order, 1);
    assert!(group.expanded);
    assert!(!group.pinned);
    assert!(group.items.is_empty());
}

#[test]
fn test_add_group_rejects_empty_and_duplicate_names() {
    let mut model = model();
    assert_eq!(model.add_group("   "), Err(ValidationError::EmptyName));
    model.add_group("Work").unwrap();
    assert_eq!(
        model.add_group("Work"),
        Err(ValidationError::DuplicateName("Work".to_string()))
    );
    assert_eq!(model.len(), 2, "rejected adds leave the model untouched");
}

// === rename / expand ===

#[test]
fn test_rename_group() {
    let mut model = three_groups();
    assert_eq!(model.rename_group("g1", "Uno"), Mutation::Applied);
    assert_eq!(model.group("g1").unwrap().name, "Uno");
    assert_eq!(model.rename_group("g1", "  "), Mutation::Skipped(SkipReason::EmptyName));
    assert_eq!(model.rename_group("nope", "X"), Mutation::Skipped(SkipReason::NotFound));
    assert_eq!(
        model.rename_group(BOOKMARK_RESERVED_ID, "Misc"),
        Mutation::Skipped(SkipReason::Reserved)
    );
}

#[test]
fn test_toggle_expand_flips() {
    let mut model = three_groups();
    model.toggle_expand("g2");
    assert!(!model.group("g2").unwrap().expanded);
    model.toggle_expand("g2");
    assert!(model.group("g2").unwrap().expanded);
    assert_eq!(model.toggle_expand("gone"), Mutation::Skipped(SkipReason::NotFound));
}

// === toggle_pin ===

#[test]
fn test_pin_moves_group_to_front_and_keeps_others_dense() {
    let mut model = three_groups();
    assert_eq!(model.toggle_pin("g2"), Mutation::Applied);

    let g2 = model.group("g2").unwrap();
    assert!(g2.pinned);
    assert!(g2.pinned_time.is_some());
    assert_eq!(display_ids(&model)[0], "g2");
    assert_eq!(order_of(&model, "g1"), 0);
    assert_eq!(order_of(&model, "g3"), 1);
}

#[test]
fn test_most_recent_pin_first() {
    let mut model = three_groups();
    model.toggle_pin("g3");
    model.toggle_pin("g1");
    assert_eq!(&display_ids(&model)[..2], ["g1", "g3"]);
}

#[test]
fn test_pin_then_unpin_restores_orders() {
    let mut model = three_groups();
    let before: Vec<usize> = ["g1", "g2", "g3"].iter().map(|id| order_of(&model, id)).collect();

    model.toggle_pin("g2");
    model.toggle_pin("g2");

    let after: Vec<usize> = ["g1", "g2", "g3"].iter().map(|id| order_of(&model, id)).collect();
    assert_eq!(before, after);
    assert!(model.group("g2").unwrap().pinned_time.is_none());
}

// === delete_group ===

#[test]
fn test_delete_group_renumbers() {
    let mut model = three_groups();
    assert_eq!(model.delete_group("g1"), Mutation::Applied);
    assert!(model.group("g1").is_none());
    assert_eq!(order_of(&model, "g2"), 0);
    assert_eq!(order_of(&model, "g3"), 1);
}

#[test]
fn test_delete_reserved_group_is_skipped() {
    let mut model = three_groups();
    assert_eq!(
        model.delete_group(BOOKMARK_RESERVED_ID),
        Mutation::Skipped(SkipReason::Reserved)
    );
    assert_eq!(model.len(), 4);
}

// === add_item ===

#[test]
fn test_add_item_prepends_scheme_and_stamps_time() {
    let mut model = three_groups();
    model.add_item("g1", "example.com", Some("Ex")).unwrap();
    let item = &model.group("g1").unwrap().items[0];
    assert_eq!(item.url, "https://example.com");
    assert_eq!(item.display_name.as_deref(), Some("Ex"));
    assert!(item.added_time.is_some());
}

#[test]
fn test_add_item_rejects_normalized_duplicate() {
    let mut model = three_groups();
    model.add_item("g1", "https://example.com", None).unwrap();
    let result = model.add_item("g1", "http://www.Example.com/", None);
    assert!(matches!(result, Err(ValidationError::DuplicateItem(_))));
    assert_eq!(model.group("g1").unwrap().items.len(), 1);

    // Other groups may hold the same link.
    assert_eq!(model.add_item("g2", "example.com", None), Ok(Mutation::Applied));
}

#[test]
fn test_add_item_with_url_in_query_is_not_a_duplicate() {
    let mut model = three_groups();
    model
        .add_item("g1", "example.com/login?next=https://other.org", None)
        .unwrap();
    assert_eq!(
        model.group("g1").unwrap().items[0].url,
        "https://example.com/login?next=https://other.org"
    );

    assert_eq!(model.add_item("g1", "other.org", None), Ok(Mutation::Applied));
    assert_eq!(model.group("g1").unwrap().items.len(), 2);
}

#[test]
fn test_add_item_empty_url_and_missing_group() {
    let mut model = three_groups();
    assert_eq!(model.add_item("g1", "  ", None), Err(ValidationError::EmptyUrl));
    assert_eq!(
        model.add_item("nope", "a.io", None),
        Ok(Mutation::Skipped(SkipReason::NotFound))
    );
}

// === remove_items ===

#[test]
fn test_remove_all_items_removes_group() {
    let mut model = three_groups();
    model.add_item("g2", "a.io", None).unwrap();
    model.add_item("g2", "b.io", None).unwrap();

    let mutation = model.remove_items("g2", &keys(&["https://a.io", "https://b.io"]));
    assert_eq!(mutation, Mutation::Applied);
    assert!(model.group("g2").is_none());
    assert_eq!(order_of(&model, "g3"), 1);
}

#[test]
fn test_emptied_reserved_group_survives() {
    let mut model = three_groups();
    model.add_item(BOOKMARK_RESERVED_ID, "a.io", None).unwrap();
    model.remove_items(BOOKMARK_RESERVED_ID, &keys(&["https://a.io"]));
    let reserved = model.group(BOOKMARK_RESERVED_ID).unwrap();
    assert!(reserved.items.is_empty());
}

#[test]
fn test_remove_unknown_keys_is_unchanged() {
    let mut model = three_groups();
    model.add_item("g1", "a.io", None).unwrap();
    assert_eq!(
        model.remove_items("g1", &keys(&["https://z.io"])),
        Mutation::Skipped(SkipReason::Unchanged)
    );
}

// === move_item ===

#[test]
fn test_move_item_appends_to_destination() {
    let mut model = three_groups();
    model.add_item("g1", "a.io", Some("A")).unwrap();
    model.add_item("g2", "b.io", None).unwrap();

    assert_eq!(model.move_item("g1", "g2", "https://a.io"), Mutation::Applied);
    let g2 = model.group("g2").unwrap();
    assert_eq!(g2.items.len(), 2);
    assert_eq!(g2.items[1].display_name.as_deref(), Some("A"));
    // The emptied source group stays.
    assert!(model.group("g1").unwrap().items.is_empty());
}

#[test]
fn test_move_item_same_group_or_missing() {
    let mut model = three_groups();
    model.add_item("g1", "a.io", None).unwrap();
    assert_eq!(
        model.move_item("g1", "g1", "https://a.io"),
        Mutation::Skipped(SkipReason::SameGroup)
    );
    assert_eq!(
        model.move_item("g1", "g2", "https://nope.io"),
        Mutation::Skipped(SkipReason::NotFound)
    );
}

// === reorder_groups ===

#[test]
fn test_reorder_before_first() {
    let mut model = three_groups();
    assert_eq!(model.reorder_groups("g3", "g1", DropPosition::Before), Mutation::Applied);
    assert_eq!(order_of(&model, "g3"), 0);
    assert_eq!(order_of(&model, "g1"), 1);
    assert_eq!(order_of(&model, "g2"), 2);
}

#[test]
fn test_reorder_after_target() {
    let mut model = three_groups();
    model.reorder_groups("g1", "g2", DropPosition::After);
    assert_eq!(&display_ids(&model)[..3], ["g2", "g1", "g3"]);
}

#[test]
fn test_reorder_with_pinned_group_is_skipped() {
    let mut model = three_groups();
    model.toggle_pin("g1");
    assert_eq!(
        model.reorder_groups("g1", "g3", DropPosition::After),
        Mutation::Skipped(SkipReason::Pinned)
    );
    assert_eq!(
        model.reorder_groups("g3", "g1", DropPosition::Before),
        Mutation::Skipped(SkipReason::Pinned)
    );
}

#[test]
fn test_move_there_and_back_keeps_payload() {
    let mut model = three_groups();
    model.add_item("g1", "a.io", Some("A")).unwrap();
    let original = model.group("g1").unwrap().items[0].clone();

    model.move_item("g1", "g3", "https://a.io");
    model.move_item("g3", "g1", "https://a.io");

    assert_eq!(model.group("g1").unwrap().items, vec![original]);
    assert!(model.group("g3").unwrap().items.is_empty());
}
