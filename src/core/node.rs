//! Retained element tree shared between the plugins and the host surface.
//!
//! Invariant: node identifiers are unique for the lifetime of the process and
//! never reused.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

/// Stable identifier for a node.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(u64);

impl NodeId {
    /// Returns the raw numeric identifier.
    pub fn raw(self) -> u64 {
        self.0
    }
}

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

fn allocate_node_id() -> NodeId {
    NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
}

/// Element kinds the plugins construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Division,
    Header,
    Footer,
    Heading,
    Button,
    Link,
    Area,
    TextInput,
    DateInput,
    Select,
    TextArea,
    Table,
    TableRow,
    TableCell,
    TableHeaderCell,
}

struct Node {
    id: NodeId,
    kind: NodeKind,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    text: String,
    value: String,
    disabled: bool,
    tab_index: Option<i32>,
    focused: bool,
    mount_root: bool,
    parent: Option<Weak<RefCell<Node>>>,
    children: Vec<NodeHandle>,
}

/// Shared handle to a node.
#[derive(Clone)]
pub struct NodeHandle(Rc<RefCell<Node>>);

/// Weak counterpart to [`NodeHandle`], used by event bindings so a binding
/// never keeps a detached subtree alive.
#[derive(Clone)]
pub struct WeakNode(Weak<RefCell<Node>>);

impl WeakNode {
    pub fn upgrade(&self) -> Option<NodeHandle> {
        self.0.upgrade().map(NodeHandle)
    }
}

impl NodeHandle {
    pub fn new(kind: NodeKind) -> Self {
        Self(Rc::new(RefCell::new(Node {
            id: allocate_node_id(),
            kind,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            text: String::new(),
            value: String::new(),
            disabled: false,
            tab_index: None,
            focused: false,
            mount_root: false,
            parent: None,
            children: Vec::new(),
        })))
    }

    pub fn id(&self) -> NodeId {
        self.0.borrow().id
    }

    pub fn kind(&self) -> NodeKind {
        self.0.borrow().kind
    }

    pub fn ptr_eq(&self, other: &NodeHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn downgrade(&self) -> WeakNode {
        WeakNode(Rc::downgrade(&self.0))
    }

    pub fn add_class(&self, class: &str) {
        let mut node = self.0.borrow_mut();
        if !node.classes.iter().any(|existing| existing == class) {
            node.classes.push(class.to_string());
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|existing| existing == class)
    }

    pub fn set_attr(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.0.borrow().attrs.get(name).cloned()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.0.borrow_mut().text = text.into();
    }

    pub fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        self.0.borrow_mut().value = value.into();
    }

    pub fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.0.borrow_mut().disabled = disabled;
    }

    pub fn is_disabled(&self) -> bool {
        self.0.borrow().disabled
    }

    pub fn set_tab_index(&self, tab_index: Option<i32>) {
        self.0.borrow_mut().tab_index = tab_index;
    }

    pub fn set_focused(&self, focused: bool) {
        self.0.borrow_mut().focused = focused;
    }

    pub fn is_focused(&self) -> bool {
        self.0.borrow().focused
    }

    /// Marks this node as a mount root; connectedness queries terminate here.
    pub fn mark_mount_root(&self) {
        self.0.borrow_mut().mount_root = true;
    }

    pub fn append_child(&self, child: &NodeHandle) {
        if self.ptr_eq(child) {
            return;
        }
        child.detach();
        child.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
        self.0.borrow_mut().children.push(child.clone());
    }

    /// Removes `child` from this node's children. Returns whether anything
    /// was removed.
    pub fn remove_child(&self, child: &NodeHandle) -> bool {
        let mut node = self.0.borrow_mut();
        let before = node.children.len();
        node.children.retain(|existing| !existing.ptr_eq(child));
        let removed = node.children.len() != before;
        drop(node);
        if removed {
            child.0.borrow_mut().parent = None;
        }
        removed
    }

    /// Detaches this node from its parent, if any.
    pub fn detach(&self) {
        let parent = self.parent();
        if let Some(parent) = parent {
            parent.remove_child(self);
        }
    }

    pub fn parent(&self) -> Option<NodeHandle> {
        self.0
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(NodeHandle)
    }

    pub fn children(&self) -> Vec<NodeHandle> {
        self.0.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// Whether this node's ancestor chain reaches a mount root.
    pub fn is_connected(&self) -> bool {
        let mut current = self.clone();
        loop {
            if current.0.borrow().mount_root {
                return true;
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn is_descendant_of(&self, ancestor: &NodeHandle) -> bool {
        let mut current = self.parent();
        while let Some(node) = current {
            if node.ptr_eq(ancestor) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Whether this node can receive keyboard focus: links and areas with an
    /// `href`, enabled form controls, or an explicit zero tab index.
    pub fn is_interactive(&self) -> bool {
        let node = self.0.borrow();
        match node.kind {
            NodeKind::Link | NodeKind::Area => node.attrs.contains_key("href"),
            NodeKind::TextInput
            | NodeKind::DateInput
            | NodeKind::Select
            | NodeKind::TextArea
            | NodeKind::Button => !node.disabled,
            _ => node.tab_index == Some(0),
        }
    }

    /// Collects interactive descendants in document order (depth-first,
    /// excluding this node itself).
    pub fn query_focusable(&self) -> Vec<NodeHandle> {
        let mut found = Vec::new();
        for child in self.children() {
            collect_focusable(&child, &mut found);
        }
        found
    }
}

fn collect_focusable(node: &NodeHandle, found: &mut Vec<NodeHandle>) {
    if node.is_interactive() {
        found.push(node.clone());
    }
    for child in node.children() {
        collect_focusable(&child, found);
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeHandle, NodeKind};

    #[test]
    fn append_and_detach_track_parents() {
        let parent = NodeHandle::new(NodeKind::Division);
        let child = NodeHandle::new(NodeKind::Button);

        parent.append_child(&child);
        assert_eq!(parent.child_count(), 1);
        assert!(child.parent().is_some_and(|node| node.ptr_eq(&parent)));
        assert!(child.is_descendant_of(&parent));

        child.detach();
        assert_eq!(parent.child_count(), 0);
        assert!(child.parent().is_none());
    }

    #[test]
    fn connectedness_requires_a_mount_root() {
        let mount = NodeHandle::new(NodeKind::Division);
        mount.mark_mount_root();
        let overlay = NodeHandle::new(NodeKind::Division);
        let button = NodeHandle::new(NodeKind::Button);
        overlay.append_child(&button);

        assert!(!button.is_connected());
        mount.append_child(&overlay);
        assert!(button.is_connected());
        mount.remove_child(&overlay);
        assert!(!button.is_connected());
    }

    #[test]
    fn focusable_query_follows_document_order_and_selector_rules() {
        let root = NodeHandle::new(NodeKind::Division);
        let header = NodeHandle::new(NodeKind::Header);
        let close = NodeHandle::new(NodeKind::Button);
        header.append_child(&close);

        let content = NodeHandle::new(NodeKind::Division);
        let plain_link = NodeHandle::new(NodeKind::Link);
        let real_link = NodeHandle::new(NodeKind::Link);
        real_link.set_attr("href", "#bindings");
        let disabled_input = NodeHandle::new(NodeKind::TextInput);
        disabled_input.set_disabled(true);
        let input = NodeHandle::new(NodeKind::TextInput);
        let tab_stop = NodeHandle::new(NodeKind::Division);
        tab_stop.set_tab_index(Some(0));
        for node in [&plain_link, &real_link, &disabled_input, &input, &tab_stop] {
            content.append_child(node);
        }

        root.append_child(&header);
        root.append_child(&content);

        let focusables = root.query_focusable();
        assert_eq!(focusables.len(), 4);
        assert!(focusables[0].ptr_eq(&close));
        assert!(focusables[1].ptr_eq(&real_link));
        assert!(focusables[2].ptr_eq(&input));
        assert!(focusables[3].ptr_eq(&tab_stop));
    }

    #[test]
    fn reparenting_moves_the_child() {
        let first = NodeHandle::new(NodeKind::Division);
        let second = NodeHandle::new(NodeKind::Division);
        let child = NodeHandle::new(NodeKind::Heading);

        first.append_child(&child);
        second.append_child(&child);

        assert_eq!(first.child_count(), 0);
        assert_eq!(second.child_count(), 1);
        assert!(child.parent().is_some_and(|node| node.ptr_eq(&second)));
    }
}
