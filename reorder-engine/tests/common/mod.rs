//! Shared fixtures for engine tests.

#![allow(dead_code)]

use reorder_dom::{ListDom, MemoryDom, NodeId};
use reorder_engine::drag::mock::MockDrag;
use reorder_engine::{
    CrossContainerHook, DragEnd, DragStart, FlatHook, ReorderBehavior, ReorderHook,
    ReorderRequest, SectionConfig, SectionedHook,
};
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber honouring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builds `count` ids named `item-0`, `item-1`, ...
pub fn item_ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("item-{i}")).collect()
}

/// Moves `item` to `index` of `container` the way the drag engine's live
/// preview does, so that afterwards it sits exactly at `index`.
pub fn preview_move(dom: &mut MemoryDom, container: NodeId, item: NodeId, index: usize) {
    let others: Vec<NodeId> = dom
        .children(container)
        .into_iter()
        .filter(|&c| c != item)
        .collect();
    match others.get(index) {
        Some(&reference) => dom.insert_before(container, item, Some(reference)).unwrap(),
        None => dom.append_child(container, item).unwrap(),
    }
}

/// Runs a whole gesture inside one container and returns the request.
pub fn drag_within<B: ReorderBehavior>(
    hook: &mut ReorderHook<B>,
    dom: &mut MemoryDom,
    container: NodeId,
    from_index: usize,
    to_index: usize,
) -> Option<ReorderRequest> {
    let item = dom.children(container)[from_index];
    hook.drag_started(dom, &DragStart { item, from: container, old_index: from_index });
    preview_move(dom, container, item, to_index);
    hook.drag_ended(dom, &DragEnd::within(container, item, from_index, to_index))
}

/// A flat list mounted with a recording drag engine.
pub struct FlatFixture {
    pub dom: MemoryDom,
    pub list: NodeId,
    pub items: Vec<NodeId>,
    pub drag: MockDrag,
    pub hook: FlatHook,
}

impl FlatFixture {
    pub fn new(ids: &[&str]) -> Self {
        init_tracing();
        let mut dom = MemoryDom::new();
        let (list, items) = dom.build_list("itemId", ids).unwrap();
        let drag = MockDrag::new();
        let hook = FlatHook::flat(&mut dom, list, drag.boxed()).unwrap();
        Self { dom, list, items, drag, hook }
    }

    pub fn with_len(count: usize) -> Self {
        let ids = item_ids(count);
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        Self::new(&refs)
    }

    pub fn order(&self) -> Vec<String> {
        self.dom.dataset_order(self.list, "itemId")
    }

    pub fn drag(&mut self, from_index: usize, to_index: usize) -> Option<ReorderRequest> {
        drag_within(&mut self.hook, &mut self.dom, self.list, from_index, to_index)
    }
}

/// A list of categories, each with a toggle icon and a collapsible body.
pub struct SectionedFixture {
    pub dom: MemoryDom,
    pub list: NodeId,
    pub categories: Vec<NodeId>,
    pub contents: Vec<NodeId>,
    pub icons: Vec<NodeId>,
    pub drag: MockDrag,
    pub hook: SectionedHook,
}

impl SectionedFixture {
    pub fn new(count: usize, sections: SectionConfig) -> Self {
        init_tracing();
        let mut dom = MemoryDom::new();
        let list = dom.create_element("div");
        let mut categories = Vec::new();
        let mut contents = Vec::new();
        let mut icons = Vec::new();
        for i in 0..count {
            let category = dom.create_child(list, "section").unwrap();
            dom.set_dataset(category, "itemId", &format!("cat-{i}")).unwrap();
            let icon = dom.create_child(category, "span").unwrap();
            dom.set_attribute(icon, "id", &format!("toggle-icon-{i}")).unwrap();
            let content = dom.create_child(category, "div").unwrap();
            dom.set_attribute(content, "id", &format!("category-content-{i}")).unwrap();
            dom.set_scroll_height(content, 100 + 10 * i as u32).unwrap();
            categories.push(category);
            contents.push(content);
            icons.push(icon);
        }
        let drag = MockDrag::new();
        let hook = SectionedHook::sectioned(&mut dom, list, drag.boxed(), sections).unwrap();
        Self { dom, list, categories, contents, icons, drag, hook }
    }

    pub fn order(&self) -> Vec<String> {
        self.dom.dataset_order(self.list, "itemId")
    }
}

/// Two sibling category containers, each with its own hook.
pub struct CrossFixture {
    pub dom: MemoryDom,
    pub a: NodeId,
    pub b: NodeId,
    pub a_items: Vec<NodeId>,
    pub b_items: Vec<NodeId>,
    pub a_drag: MockDrag,
    pub b_drag: MockDrag,
    pub a_hook: CrossContainerHook,
    pub b_hook: CrossContainerHook,
}

impl CrossFixture {
    pub fn new(a_ids: &[&str], b_ids: &[&str]) -> Self {
        init_tracing();
        let mut dom = MemoryDom::new();
        let page = dom.create_element("div");
        let (a, a_items) = dom.build_list("envelopeId", a_ids).unwrap();
        let (b, b_items) = dom.build_list("envelopeId", b_ids).unwrap();
        dom.set_dataset(a, "categoryId", "groceries").unwrap();
        dom.set_dataset(b, "categoryId", "rent").unwrap();
        dom.append_child(page, a).unwrap();
        dom.append_child(page, b).unwrap();

        let a_drag = MockDrag::new();
        let b_drag = MockDrag::new();
        let a_hook = CrossContainerHook::cross_container(&mut dom, a, a_drag.boxed()).unwrap();
        let b_hook = CrossContainerHook::cross_container(&mut dom, b, b_drag.boxed()).unwrap();
        Self { dom, a, b, a_items, b_items, a_drag, b_drag, a_hook, b_hook }
    }

    pub fn order(&self, container: NodeId) -> Vec<String> {
        self.dom.dataset_order(container, "envelopeId")
    }

    /// Drags `item` from index `from_index` of A to `to_index` of B. The end
    /// event is handled by A's hook, where the gesture began.
    pub fn drag_a_to_b(&mut self, from_index: usize, to_index: usize) -> Option<ReorderRequest> {
        let item = self.dom.children(self.a)[from_index];
        self.a_hook.drag_started(
            &mut self.dom,
            &DragStart { item, from: self.a, old_index: from_index },
        );
        preview_move(&mut self.dom, self.b, item, to_index);
        self.a_hook.drag_ended(
            &mut self.dom,
            &DragEnd {
                item,
                from: self.a,
                to: self.b,
                old_index: from_index,
                new_index: to_index,
            },
        )
    }
}
