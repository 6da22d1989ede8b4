//! Property-based tests for group ordering.
//!
//! For any sequence of add, delete, pin and reorder operations the unpinned
//! groups keep a dense `0..N` order, the reserved group survives, and the
//! display order puts the most recently pinned group first.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use groupshelf::managers::bookmark_manager::BookmarkManager;
use groupshelf::managers::group_model::{GroupModel, GroupModelTrait};
use groupshelf::platform::prompt::ScriptedPrompt;
use groupshelf::store::MemoryStore;
use groupshelf::types::group::{BOOKMARK_RESERVED_ID, BOOKMARK_RESERVED_NAME};
use groupshelf::types::interaction::DropPosition;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum GroupOp {
    Add,
    Delete(usize),
    TogglePin(usize),
    Reorder(usize, usize, bool),
}

fn arb_group_ops() -> impl Strategy<Value = Vec<GroupOp>> {
    prop::collection::vec(
        prop_oneof![
            3 => Just(GroupOp::Add),
            1 => (0..16usize).prop_map(GroupOp::Delete),
            2 => (0..16usize).prop_map(GroupOp::TogglePin),
            3 => (0..16usize, 0..16usize, any::<bool>())
                .prop_map(|(a, b, after)| GroupOp::Reorder(a, b, after)),
        ],
        1..50,
    )
}

fn test_model() -> GroupModel {
    let t = Arc::new(AtomicI64::new(0));
    GroupModel::new(BOOKMARK_RESERVED_ID, BOOKMARK_RESERVED_NAME)
        .with_clock(Arc::new(move || t.fetch_add(1, Ordering::SeqCst)))
}

fn id_at(model: &GroupModel, idx: usize) -> String {
    model.groups()[idx % model.len()].id.clone()
}

fn apply(model: &mut GroupModel, op: &GroupOp, counter: &mut usize) {
    match op {
        GroupOp::Add => {
            *counter += 1;
            model.add_group(&format!("G{}", counter)).unwrap();
        }
        GroupOp::Delete(i) => {
            let id = id_at(model, *i);
            model.delete_group(&id);
        }
        GroupOp::TogglePin(i) => {
            let id = id_at(model, *i);
            model.toggle_pin(&id);
        }
        GroupOp::Reorder(a, b, after) => {
            let moved = id_at(model, *a);
            let target = id_at(model, *b);
            let position = if *after { DropPosition::After } else { DropPosition::Before };
            model.reorder_groups(&moved, &target, position);
        }
    }
}

// **Property 1: Dense unpinned order**
//
// *For any* operation sequence, the `order` values of unpinned groups are
// exactly `0..N` and the reserved group is still present.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn unpinned_orders_stay_dense(ops in arb_group_ops()) {
        let mut model = test_model();
        let mut counter = 0;
        for op in &ops {
            apply(&mut model, op, &mut counter);

            let mut orders: Vec<usize> = model
                .groups()
                .iter()
                .filter(|g| !g.pinned)
                .map(|g| g.order)
                .collect();
            orders.sort_unstable();
            let expected: Vec<usize> = (0..orders.len()).collect();
            prop_assert_eq!(orders, expected);
            prop_assert!(model.group(BOOKMARK_RESERVED_ID).is_some());
        }
    }
}

// **Property 2: Pinned groups lead the display order**
//
// *For any* operation sequence, `ordered()` lists every pinned group before
// every unpinned one, pinned groups by descending pin time.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pinned_groups_render_first(ops in arb_group_ops()) {
        let mut model = test_model();
        let mut counter = 0;
        for op in &ops {
            apply(&mut model, op, &mut counter);
        }

        let ordered = model.ordered();
        prop_assert_eq!(ordered.len(), model.len());
        let first_unpinned = ordered.iter().position(|g| !g.pinned).unwrap_or(ordered.len());
        prop_assert!(ordered[first_unpinned..].iter().all(|g| !g.pinned));

        let times: Vec<i64> = ordered[..first_unpinned]
            .iter()
            .map(|g| g.pinned_time.unwrap_or_default())
            .collect();
        prop_assert!(times.windows(2).all(|w| w[0] >= w[1]));
    }
}

// **Property 3: Pin then unpin is neutral for other groups**
//
// *For any* reachable state and any unpinned group, pinning and immediately
// unpinning it leaves every group's `order` as it was.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pin_unpin_restores_order(ops in arb_group_ops(), pick in 0..16usize) {
        let mut model = test_model();
        let mut counter = 0;
        for op in &ops {
            apply(&mut model, op, &mut counter);
        }

        let unpinned: Vec<String> = model.unpinned_in_order().iter().map(|g| g.id.clone()).collect();
        if unpinned.is_empty() {
            return Ok(());
        }
        let target = unpinned[pick % unpinned.len()].clone();
        let before: Vec<(String, usize)> =
            model.groups().iter().map(|g| (g.id.clone(), g.order)).collect();

        model.toggle_pin(&target);
        model.toggle_pin(&target);

        let after: Vec<(String, usize)> =
            model.groups().iter().map(|g| (g.id.clone(), g.order)).collect();
        prop_assert_eq!(before, after);
    }
}

// **Property 4: Persisted collection reloads identically**
//
// *For any* operation sequence applied through the bookmark feature, a fresh
// feature initialized from the same store sees the same groups in the same
// display order.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn persisted_collection_reloads(ops in arb_group_ops()) {
        let store = Arc::new(MemoryStore::new());
        let mut manager = BookmarkManager::new(Arc::clone(&store));
        manager.initialize().unwrap();
        let prompt = ScriptedPrompt::accepting();

        let mut counter = 0;
        for op in &ops {
            match op {
                GroupOp::Add => {
                    counter += 1;
                    manager.add_group(&format!("G{}", counter)).unwrap();
                }
                GroupOp::Delete(i) => {
                    let id = id_at(manager.model(), *i);
                    manager.delete_group(&id, &prompt).unwrap();
                }
                GroupOp::TogglePin(i) => {
                    let id = id_at(manager.model(), *i);
                    manager.toggle_pin(&id).unwrap();
                }
                GroupOp::Reorder(a, b, _) => {
                    let id = id_at(manager.model(), *a);
                    manager.toggle_expand(&id).unwrap();
                    let other = id_at(manager.model(), *b);
                    manager.rename_group(&other, &format!("R{}", b)).unwrap();
                }
            }
        }

        let mut reloaded = BookmarkManager::new(Arc::clone(&store));
        let view = reloaded.initialize().unwrap();
        prop_assert_eq!(view, manager.render());
    }
}
