mod common;

use common::{FlatFixture, preview_move};
use pretty_assertions::assert_eq;
use reorder_dom::{ListDom, MemoryDom};
use reorder_engine::drag::mock::{DragCall, MockDrag};
use reorder_engine::protocol::{DISCONNECTED_EVENT, RECONNECTED_EVENT};
use reorder_engine::{
    DragControl, DragEnd, DragPhase, DragStart, FlatHook, PushTarget, Reply, SettleOutcome,
    Signal,
};
use reorder_types::{ItemId, MoveId};
use serde_json::json;

// ── Mounting ─────────────────────────────────────────────────────

#[test]
fn mount_configures_drag_engine() {
    let f = FlatFixture::new(&["a", "b"]);
    assert_eq!(f.drag.calls(), vec![DragCall::Configure]);
    let options = f.drag.options().unwrap();
    assert_eq!(options.handle, ".drag-handle");
    assert_eq!(options.animation.as_millis(), 150);
    assert!(!f.drag.is_disabled());
    assert!(!f.hook.is_locked());
    assert!(f.hook.pending().is_none());
}

#[test]
fn mount_reads_overrides_from_dataset() {
    let mut dom = MemoryDom::new();
    let (list, _) = dom.build_list("taskId", &["t1", "t2"]).unwrap();
    dom.set_dataset(list, "itemIdAttribute", "taskId").unwrap();
    dom.set_dataset(list, "repositionEvent", "reposition_task").unwrap();
    dom.set_dataset(list, "idField", "task_id").unwrap();
    dom.set_dataset(list, "prevIdField", "before_id").unwrap();
    dom.set_dataset(list, "nextIdField", "").unwrap();

    let mut hook = FlatHook::flat(&mut dom, list, MockDrag::new().boxed()).unwrap();
    assert_eq!(hook.config().item_id_attribute, "taskId");
    assert_eq!(hook.config().next_id_field, "next_item_id");

    let request = common::drag_within(&mut hook, &mut dom, list, 0, 1).unwrap();
    assert_eq!(request.event, "reposition_task");
    assert_eq!(
        request.payload_value(),
        json!({ "task_id": "t1", "before_id": "t2", "next_item_id": null })
    );
}

// ── No-op drops ──────────────────────────────────────────────────

#[test]
fn drop_in_place_sends_nothing() {
    let mut f = FlatFixture::new(&["a", "b", "c"]);
    assert!(f.drag(1, 1).is_none());
    assert!(!f.hook.is_locked());
    assert_eq!(f.order(), vec!["a", "b", "c"]);
    assert!(!f.dom.has_class(f.items[1], "dragging"));
    assert_eq!(f.hook.state().phase(), &DragPhase::Idle);
}

#[test]
fn dragging_marker_lives_for_the_gesture() {
    let mut f = FlatFixture::new(&["a", "b"]);
    let item = f.items[0];
    f.hook
        .drag_started(&mut f.dom, &DragStart { item, from: f.list, old_index: 0 });
    assert!(f.dom.has_class(item, "dragging"));
    f.hook
        .drag_ended(&mut f.dom, &DragEnd::within(f.list, item, 0, 0));
    assert!(!f.dom.has_class(item, "dragging"));
}

// ── Commit ───────────────────────────────────────────────────────

#[test]
fn drop_issues_neighbor_request_and_locks() {
    let mut f = FlatFixture::new(&["a", "b", "c", "d"]);
    let request = f.drag(0, 2).unwrap();

    assert_eq!(f.order(), vec!["b", "c", "a", "d"]);
    assert_eq!(request.event, "reposition_item");
    assert_eq!(request.target, PushTarget::Element);
    assert_eq!(
        request.payload_value(),
        json!({ "item_id": "a", "prev_item_id": "c", "next_item_id": "d" })
    );

    assert!(f.hook.is_locked());
    assert!(f.drag.is_disabled());
    assert!(f.dom.has_class(f.items[0], "opacity-50"));
    assert!(f.dom.has_class(f.items[0], "pointer-events-none"));

    let pending = f.hook.pending().unwrap();
    assert_eq!(pending.id, request.move_id);
    assert_eq!(pending.item_id, ItemId::parse("a").unwrap());
    assert_eq!(pending.original_index, 0);
    assert_eq!(pending.new_index, 2);
}

#[test]
fn drop_first_and_last_use_null_neighbors() {
    let mut f = FlatFixture::new(&["a", "b", "c"]);
    let request = f.drag(2, 0).unwrap();
    assert_eq!(request.field("prev_item_id"), Some(&json!(null)));
    assert_eq!(request.field("next_item_id"), Some(&json!("a")));
    f.hook.settle(&mut f.dom, request.move_id, &Reply::Ok);

    let request = f.drag(0, 2).unwrap();
    assert_eq!(request.field("prev_item_id"), Some(&json!("b")));
    assert_eq!(request.field("next_item_id"), Some(&json!(null)));
}

#[test]
fn accepted_reply_unlocks_and_keeps_order() {
    let mut f = FlatFixture::new(&["a", "b", "c"]);
    let request = f.drag(0, 2).unwrap();

    let outcome = f.hook.settle_value(&mut f.dom, request.move_id, &json!({}));
    assert_eq!(outcome, SettleOutcome::Committed(request.move_id));
    assert_eq!(f.order(), vec!["b", "c", "a"]);
    assert!(!f.hook.is_locked());
    assert!(!f.drag.is_disabled());
    assert!(f.dom.classes(f.items[0]).is_empty());
    assert!(f.hook.pending().is_none());
}

#[test]
fn rejected_reply_reverts_and_unlocks() {
    let mut f = FlatFixture::new(&["a", "b", "c", "d"]);
    let request = f.drag(3, 1).unwrap();
    assert_eq!(f.order(), vec!["a", "d", "b", "c"]);

    let outcome = f
        .hook
        .settle_value(&mut f.dom, request.move_id, &json!({ "error": "conflict" }));
    assert_eq!(outcome, SettleOutcome::Reverted(request.move_id));
    assert_eq!(f.order(), vec!["a", "b", "c", "d"]);
    assert!(!f.hook.is_locked());
    assert!(f.dom.classes(f.items[3]).is_empty());
}

#[test]
fn rejected_reply_leaves_moved_away_item_alone() {
    let mut f = FlatFixture::new(&["a", "b", "c"]);
    let request = f.drag(0, 2).unwrap();
    let elsewhere = f.dom.create_element("div");
    f.dom.append_child(elsewhere, f.items[0]).unwrap();

    let outcome = f.hook.settle(&mut f.dom, request.move_id, &Reply::error("conflict"));
    assert_eq!(outcome, SettleOutcome::RevertSkipped(request.move_id));
    assert_eq!(f.order(), vec!["b", "c"]);
    assert_eq!(f.dom.parent(f.items[0]), Some(elsewhere));
    assert!(!f.hook.is_locked());
}

#[test]
fn flat_list_refuses_drop_from_another_container() {
    let mut f = FlatFixture::new(&["a", "b", "c"]);
    let (other, _) = f.dom.build_list("itemId", &["x"]).unwrap();
    let item = f.items[1];
    f.hook
        .drag_started(&mut f.dom, &DragStart { item, from: f.list, old_index: 1 });
    preview_move(&mut f.dom, other, item, 0);

    let end = DragEnd { item, from: f.list, to: other, old_index: 1, new_index: 0 };
    assert!(f.hook.drag_ended(&mut f.dom, &end).is_none());
    assert_eq!(f.order(), vec!["a", "b", "c"]);
    assert_eq!(f.dom.dataset_order(other, "itemId"), vec!["x"]);
    assert!(!f.hook.is_locked());
}

#[test]
fn falsy_error_member_counts_as_success() {
    for reply in [json!({ "error": null }), json!({ "error": false }), json!({ "error": "" })] {
        let mut f = FlatFixture::new(&["a", "b"]);
        let request = f.drag(0, 1).unwrap();
        let outcome = f.hook.settle_value(&mut f.dom, request.move_id, &reply);
        assert_eq!(outcome, SettleOutcome::Committed(request.move_id));
        assert_eq!(f.order(), vec!["b", "a"]);
    }
}

// ── Stale replies ────────────────────────────────────────────────

#[test]
fn unknown_reply_is_stale_and_touches_nothing() {
    let mut f = FlatFixture::new(&["a", "b", "c"]);
    let request = f.drag(0, 2).unwrap();

    let stranger = MoveId::new();
    let outcome = f.hook.settle(&mut f.dom, stranger, &Reply::error("x"));
    assert_eq!(outcome, SettleOutcome::Stale(stranger));
    assert!(f.hook.is_locked());
    assert_eq!(f.hook.pending().map(|p| p.id), Some(request.move_id));
    assert_eq!(f.order(), vec!["b", "c", "a"]);
}

#[test]
fn second_reply_for_same_move_is_stale() {
    let mut f = FlatFixture::new(&["a", "b", "c"]);
    let request = f.drag(0, 2).unwrap();
    f.hook.settle(&mut f.dom, request.move_id, &Reply::Ok);

    let outcome = f.hook.settle(&mut f.dom, request.move_id, &Reply::error("late"));
    assert_eq!(outcome, SettleOutcome::Stale(request.move_id));
    assert_eq!(f.order(), vec!["b", "c", "a"]);
}

// ── Lock invariant ───────────────────────────────────────────────

#[test]
fn drop_while_pending_is_snapped_back_without_request() {
    let mut f = FlatFixture::new(&["a", "b", "c", "d"]);
    let first = f.drag(0, 3).unwrap();
    assert_eq!(f.order(), vec!["b", "c", "d", "a"]);

    assert!(f.drag(0, 1).is_none());
    assert_eq!(f.order(), vec!["b", "c", "d", "a"]);
    assert_eq!(f.hook.pending().map(|p| p.id), Some(first.move_id));
}

// ── Connectivity ─────────────────────────────────────────────────

#[test]
fn disconnect_locks_and_marks_container() {
    let mut f = FlatFixture::new(&["a", "b"]);
    let signal = f.hook.handle_event(&mut f.dom, DISCONNECTED_EVENT, &json!({}));
    assert_eq!(signal, Some(Signal::Disconnected));
    assert!(f.hook.is_locked());
    assert!(f.hook.is_offline());
    assert!(f.drag.is_disabled());
    assert!(f.dom.has_class(f.list, "opacity-75"));

    f.hook.handle_event(&mut f.dom, RECONNECTED_EVENT, &json!({}));
    assert!(!f.hook.is_locked());
    assert!(!f.drag.is_disabled());
    assert!(!f.dom.has_class(f.list, "opacity-75"));
}

#[test]
fn no_request_while_offline() {
    let mut f = FlatFixture::new(&["a", "b", "c"]);
    f.hook.handle_event(&mut f.dom, DISCONNECTED_EVENT, &json!({}));

    assert!(f.drag(0, 2).is_none());
    assert_eq!(f.order(), vec!["a", "b", "c"]);
    assert!(f.hook.pending().is_none());
}

#[test]
fn reconnect_keeps_lock_while_move_pending() {
    let mut f = FlatFixture::new(&["a", "b", "c"]);
    let request = f.drag(0, 1).unwrap();
    f.hook.handle_event(&mut f.dom, DISCONNECTED_EVENT, &json!({}));
    f.hook.handle_event(&mut f.dom, RECONNECTED_EVENT, &json!({}));

    assert!(!f.hook.is_offline());
    assert!(f.hook.is_locked());
    assert!(f.drag.is_disabled());

    f.hook.settle(&mut f.dom, request.move_id, &Reply::Ok);
    assert!(!f.hook.is_locked());
    assert!(!f.drag.is_disabled());
}

#[test]
fn connectivity_changes_do_not_revert() {
    let mut f = FlatFixture::new(&["a", "b", "c"]);
    f.drag(0, 2).unwrap();
    f.hook.handle_event(&mut f.dom, DISCONNECTED_EVENT, &json!({}));
    assert_eq!(f.order(), vec!["b", "c", "a"]);
    assert!(f.hook.pending().is_some());
}

// ── Concurrent deletion ──────────────────────────────────────────

#[test]
fn deleting_dragged_item_cancels_gesture() {
    let mut f = FlatFixture::new(&["a", "b", "c"]);
    let item = f.items[1];
    f.hook
        .drag_started(&mut f.dom, &DragStart { item, from: f.list, old_index: 1 });
    f.drag.clear_calls();

    let signal = f
        .hook
        .handle_event(&mut f.dom, "item_deleted", &json!({ "item_id": "b" }));
    assert_eq!(signal, Some(Signal::ItemDeleted(ItemId::parse("b").unwrap())));
    assert_eq!(
        f.drag.calls(),
        vec![DragCall::SetDisabled(true), DragCall::SetDisabled(false)]
    );
    assert!(!f.hook.is_locked());

    // The server removes the element; the engine still reports the end.
    f.dom.remove(item).unwrap();
    let end = DragEnd::within(f.list, item, 1, 0);
    assert!(f.hook.drag_ended(&mut f.dom, &end).is_none());
    assert_eq!(f.order(), vec!["a", "c"]);
}

#[test]
fn deletion_accepts_numeric_ids() {
    let mut f = FlatFixture::new(&["1", "2"]);
    let item = f.items[0];
    f.hook
        .drag_started(&mut f.dom, &DragStart { item, from: f.list, old_index: 0 });
    let signal = f.hook.handle_event(&mut f.dom, "item_deleted", &json!({ "item_id": 1 }));
    assert_eq!(signal, Some(Signal::ItemDeleted(ItemId::parse("1").unwrap())));
    assert!(matches!(f.hook.state().phase(), DragPhase::Cancelled { .. }));
}

#[test]
fn deleting_pending_item_makes_reply_stale() {
    let mut f = FlatFixture::new(&["a", "b", "c"]);
    let request = f.drag(0, 2).unwrap();

    assert!(f.hook.apply_signal(
        &mut f.dom,
        &Signal::ItemDeleted(ItemId::parse("a").unwrap())
    ));
    assert!(f.hook.pending().is_none());
    assert!(!f.hook.is_locked());
    assert!(!f.drag.is_disabled());

    let before = f.order();
    let outcome = f.hook.settle(&mut f.dom, request.move_id, &Reply::error("gone"));
    assert_eq!(outcome, SettleOutcome::Stale(request.move_id));
    assert_eq!(f.order(), before);
}

#[test]
fn deleting_other_item_is_ignored() {
    let mut f = FlatFixture::new(&["a", "b"]);
    let item = f.items[0];
    f.hook
        .drag_started(&mut f.dom, &DragStart { item, from: f.list, old_index: 0 });
    f.drag.clear_calls();

    let applied = f
        .hook
        .apply_signal(&mut f.dom, &Signal::ItemDeleted(ItemId::parse("b").unwrap()));
    assert!(!applied);
    assert!(f.drag.calls().is_empty());
    assert!(matches!(f.hook.state().phase(), DragPhase::Dragging(_)));
}

#[test]
fn explicit_cancel_replaces_toggle() {
    let mut dom = MemoryDom::new();
    let (list, items) = dom.build_list("itemId", &["a", "b"]).unwrap();
    let drag = MockDrag::with_cancel();
    let mut hook = FlatHook::flat(&mut dom, list, drag.boxed()).unwrap();
    hook.drag_started(&mut dom, &DragStart { item: items[0], from: list, old_index: 0 });
    drag.clear_calls();

    hook.apply_signal(&mut dom, &Signal::ItemDeleted(ItemId::parse("a").unwrap()));
    assert_eq!(drag.calls(), vec![DragCall::Cancel, DragCall::SetDisabled(false)]);
}

#[test]
fn deletion_while_offline_keeps_offline_lock() {
    let mut f = FlatFixture::new(&["a", "b"]);
    let item = f.items[0];
    f.hook
        .drag_started(&mut f.dom, &DragStart { item, from: f.list, old_index: 0 });
    f.hook.apply_signal(&mut f.dom, &Signal::Disconnected);
    f.hook
        .apply_signal(&mut f.dom, &Signal::ItemDeleted(ItemId::parse("a").unwrap()));
    assert!(f.hook.is_locked());
    assert!(f.drag.is_disabled());
}

// ── Inconsistent pages ───────────────────────────────────────────

#[test]
fn neighbor_without_id_snaps_back() {
    let mut f = FlatFixture::new(&["a", "b", "c"]);
    f.dom.remove_attribute(f.items[1], "data-item-id").unwrap();

    assert!(f.drag(0, 2).is_none());
    assert_eq!(f.dom.children(f.list), f.items);
    assert!(!f.hook.is_locked());
}

#[test]
fn end_index_out_of_sync_snaps_back() {
    let mut f = FlatFixture::new(&["a", "b", "c"]);
    let item = f.items[0];
    f.hook
        .drag_started(&mut f.dom, &DragStart { item, from: f.list, old_index: 0 });
    preview_move(&mut f.dom, f.list, item, 2);
    let end = DragEnd::within(f.list, item, 0, 1);
    assert!(f.hook.drag_ended(&mut f.dom, &end).is_none());
    assert_eq!(f.order(), vec!["a", "b", "c"]);
}

#[test]
fn end_without_start_uses_event_indices() {
    let mut f = FlatFixture::new(&["a", "b", "c"]);
    let item = f.items[2];
    preview_move(&mut f.dom, f.list, item, 0);
    let request = f
        .hook
        .drag_ended(&mut f.dom, &DragEnd::within(f.list, item, 2, 0))
        .unwrap();
    f.hook.settle(&mut f.dom, request.move_id, &Reply::error("no"));
    assert_eq!(f.order(), vec!["a", "b", "c"]);
}

// ── Teardown ─────────────────────────────────────────────────────

#[test]
fn destroy_without_drag_is_safe_and_idempotent() {
    let mut f = FlatFixture::new(&["a"]);
    f.hook.destroy(&mut f.dom);
    f.hook.destroy(&mut f.dom);
    assert!(f.hook.is_destroyed());
    assert!(f.drag.is_destroyed());
    let destroys = f
        .drag
        .calls()
        .into_iter()
        .filter(|c| *c == DragCall::Destroy)
        .count();
    assert_eq!(destroys, 1);
}

#[test]
fn destroy_drops_pending_move() {
    let mut f = FlatFixture::new(&["a", "b"]);
    let request = f.drag(0, 1).unwrap();
    f.hook.destroy(&mut f.dom);
    assert!(f.hook.pending().is_none());
    let outcome = f.hook.settle(&mut f.dom, request.move_id, &Reply::error("late"));
    assert_eq!(outcome, SettleOutcome::Stale(request.move_id));
    assert!(f.drag(0, 1).is_none());
}
