use groupshelf::managers::drag::{DragController, DragMarkers, DragPolicy, DropOutcome, DropRejection};
use groupshelf::managers::group_model::{GroupModel, GroupModelTrait};
use groupshelf::types::group::{Group, BOOKMARK_RESERVED_ID, BOOKMARK_RESERVED_NAME};
use groupshelf::types::interaction::{DragPayload, DropPosition};

fn model() -> GroupModel {
    let groups = vec![
        Group::new("g1", "One", 0),
        Group::new("g2", "Two", 1),
        Group::new("g3", "Three", 2),
    ];
    GroupModel::from_groups(groups, BOOKMARK_RESERVED_ID, BOOKMARK_RESERVED_NAME)
}

fn group(id: &str) -> DragPayload {
    DragPayload::Group {
        group_id: id.to_string(),
    }
}

fn item(key: &str, source: &str) -> DragPayload {
    DragPayload::Item {
        item_key: key.to_string(),
        source_group_id: source.to_string(),
    }
}

#[test]
fn test_drop_without_gesture_is_ignored() {
    let mut drag = DragController::new(DragPolicy::BOOKMARKS);
    assert_eq!(
        drag.drop_on("g1", &model()),
        DropOutcome::Ignored(DropRejection::NoGesture)
    );
}

#[test]
fn test_group_drag_upward_lands_before_target() {
    let mut drag = DragController::new(DragPolicy::BOOKMARKS);
    assert!(drag.begin(group("g3")));
    assert_eq!(
        drag.drop_on("g1", &model()),
        DropOutcome::ReorderGroups {
            moved_id: "g3".to_string(),
            target_id: "g1".to_string(),
            position: DropPosition::Before,
        }
    );
    assert!(!drag.is_dragging());
}

#[test]
fn test_group_drag_downward_lands_after_target() {
    let mut drag = DragController::new(DragPolicy::BOOKMARKS);
    drag.begin(group("g1"));
    match drag.drop_on("g2", &model()) {
        DropOutcome::ReorderGroups { position, .. } => assert_eq!(position, DropPosition::After),
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_group_drag_refused_without_policy() {
    let mut drag = DragController::new(DragPolicy::TABS);
    assert!(!drag.begin(group("g1")));
    assert!(!drag.is_dragging());
    assert!(drag.begin(item("7", "g1")));
}

#[test]
fn test_group_drag_involving_pinned_is_rejected() {
    let mut model = model();
    model.toggle_pin("g2");
    let mut drag = DragController::new(DragPolicy::BOOKMARKS);
    drag.begin(group("g1"));
    assert_eq!(
        drag.drop_on("g2", &model),
        DropOutcome::Ignored(DropRejection::Pinned)
    );
}

#[test]
fn test_item_drop_on_other_group() {
    let mut drag = DragController::new(DragPolicy::BOOKMARKS);
    drag.begin(item("https://a.io", "g1"));
    assert_eq!(
        drag.drop_on("g3", &model()),
        DropOutcome::MoveItem {
            from_group_id: "g1".to_string(),
            to_group_id: "g3".to_string(),
            item_key: "https://a.io".to_string(),
        }
    );
}

#[test]
fn test_item_drop_on_own_or_missing_group() {
    let mut drag = DragController::new(DragPolicy::BOOKMARKS);
    drag.begin(item("https://a.io", "g1"));
    assert_eq!(
        drag.drop_on("g1", &model()),
        DropOutcome::Ignored(DropRejection::SameGroup)
    );

    drag.begin(item("https://a.io", "g1"));
    assert_eq!(
        drag.drop_on("gone", &model()),
        DropOutcome::Ignored(DropRejection::Missing)
    );
}

#[test]
fn test_markers_follow_enter_leave_cancel() {
    let mut drag = DragController::new(DragPolicy::BOOKMARKS);
    drag.enter("g1");
    assert_eq!(drag.markers().over_group, None, "no marker without a gesture");

    drag.begin(item("k", "g1"));
    drag.enter("g2");
    assert_eq!(drag.markers().over_group.as_deref(), Some("g2"));
    drag.leave("g3");
    assert_eq!(drag.markers().over_group.as_deref(), Some("g2"));
    drag.leave("g2");
    assert_eq!(drag.markers().over_group, None);

    drag.enter("g2");
    drag.cancel();
    assert_eq!(*drag.markers(), DragMarkers::default());
}

#[test]
fn test_item_moved_during_delete_mode_leaves_source_selection() {
    use groupshelf::managers::selection::{DeletePress, SelectionController};

    let mut model = model();
    model.add_item("g1", "a.io", None).unwrap();
    model.add_item("g1", "b.io", None).unwrap();
    let mut selection = SelectionController::new();
    selection.press_delete("g1");
    selection.toggle_select("g1", "https://a.io");
    selection.toggle_select("g1", "https://b.io");

    let mut drag = DragController::new(DragPolicy::BOOKMARKS);
    drag.begin(item("https://b.io", "g1"));
    let DropOutcome::MoveItem { from_group_id, to_group_id, item_key } = drag.drop_on("g2", &model)
    else {
        panic!("expected an item move");
    };
    model.move_item(&from_group_id, &to_group_id, &item_key);
    let live: Vec<String> = model.group("g1").unwrap().items.iter().map(|i| i.key()).collect();
    selection.retain_keys("g1", live.iter().map(String::as_str));

    let DeletePress::Commit(keys) = selection.press_delete("g1") else {
        panic!("expected a commit");
    };
    model.remove_items("g1", &keys);
    assert_eq!(model.group("g2").unwrap().items[0].url, "https://b.io");
}
