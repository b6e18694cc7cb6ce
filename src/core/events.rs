//! Conditional event binding and bubbling dispatch.
//!
//! Invariant: a [`BindingHandle`] is consumed by at most one successful
//! `unbind`. Dispatch snapshots the handler list per node before invoking, so
//! handlers may bind or unbind freely while an event is in flight; handlers
//! drained mid-dispatch are skipped via liveness checks.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::node::{NodeHandle, WeakNode};

/// Event categories a binding can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Click,
    KeyDown,
    /// Fired at an input node after the host applied an edit to its value.
    ValueChanged,
}

/// Keyboard event payload. `key_id` follows the host convention of lowercase
/// key names with `+`-joined modifiers: `"tab"`, `"shift+tab"`, `"escape"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key_id: String,
}

impl KeyEvent {
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    Click,
    KeyDown(KeyEvent),
    ValueChanged { value: String },
}

impl UiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            UiEvent::Click => EventKind::Click,
            UiEvent::KeyDown(_) => EventKind::KeyDown,
            UiEvent::ValueChanged { .. } => EventKind::ValueChanged,
        }
    }
}

/// Opaque handle returned by [`EventBus::bind`], consumed by
/// [`EventBus::unbind`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct BindingHandle(u64);

/// Per-handler dispatch context.
pub struct EventCtx<'a> {
    pub event: &'a UiEvent,
    /// Node the event was dispatched at.
    pub target: NodeHandle,
    /// Node whose binding is currently running.
    pub current: NodeHandle,
    stop: bool,
    prevent: bool,
}

impl EventCtx<'_> {
    /// Stops the event from bubbling past the current node. Handlers already
    /// registered on the current node still run.
    pub fn stop_propagation(&mut self) {
        self.stop = true;
    }

    /// Suppresses the host's default action for this event.
    pub fn prevent_default(&mut self) {
        self.prevent = true;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

type Handler = Rc<RefCell<dyn FnMut(&mut EventCtx<'_>)>>;

struct BindingEntry {
    id: u64,
    node: WeakNode,
    kind: EventKind,
    handler: Handler,
}

/// Conditional event-binding registry.
///
/// Bindings hold only weak node references, and dispatch suppresses handlers
/// whose node is detached from every mount, so a bound handler can never
/// observe a torn-down subtree.
#[derive(Default)]
pub struct EventBus {
    entries: Vec<BindingEntry>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(
        &mut self,
        node: &NodeHandle,
        kind: EventKind,
        handler: impl FnMut(&mut EventCtx<'_>) + 'static,
    ) -> BindingHandle {
        let id = self.next_id;
        self.next_id = self.next_id.checked_add(1).expect("binding id overflowed u64");
        self.entries.push(BindingEntry {
            id,
            node: node.downgrade(),
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
        BindingHandle(id)
    }

    /// Removes the binding. Returns whether it was still registered.
    pub fn unbind(&mut self, handle: BindingHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != handle.0);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn handlers_for(&self, node: &NodeHandle, kind: EventKind) -> Vec<(u64, Handler)> {
        self.entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .filter(|entry| {
                entry
                    .node
                    .upgrade()
                    .is_some_and(|bound| bound.ptr_eq(node))
            })
            .map(|entry| (entry.id, Rc::clone(&entry.handler)))
            .collect()
    }

    fn is_live(&self, id: u64) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }
}

/// Dispatches `event` at `target`, bubbling toward the mount root.
///
/// Listener execution order per (node, event kind) is registration order.
/// Handlers on nodes detached from every mount are suppressed.
pub fn dispatch(
    bus: &Rc<RefCell<EventBus>>,
    target: &NodeHandle,
    event: &UiEvent,
) -> DispatchOutcome {
    let kind = event.kind();
    let mut outcome = DispatchOutcome::default();
    let mut current = Some(target.clone());
    while let Some(node) = current {
        let handlers = bus.borrow().handlers_for(&node, kind);
        for (id, handler) in handlers {
            if !bus.borrow().is_live(id) {
                continue;
            }
            if !node.is_connected() {
                continue;
            }
            let mut ctx = EventCtx {
                event,
                target: target.clone(),
                current: node.clone(),
                stop: false,
                prevent: false,
            };
            (&mut *handler.borrow_mut())(&mut ctx);
            if ctx.prevent {
                outcome.default_prevented = true;
            }
            if ctx.stop {
                outcome.propagation_stopped = true;
            }
        }
        if outcome.propagation_stopped {
            break;
        }
        current = node.parent();
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::{dispatch, EventBus, EventKind, UiEvent};
    use crate::core::node::{NodeHandle, NodeKind};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn mounted_pair() -> (NodeHandle, NodeHandle, NodeHandle) {
        let mount = NodeHandle::new(NodeKind::Division);
        mount.mark_mount_root();
        let outer = NodeHandle::new(NodeKind::Division);
        let inner = NodeHandle::new(NodeKind::Button);
        outer.append_child(&inner);
        mount.append_child(&outer);
        (mount, outer, inner)
    }

    #[test]
    fn unbind_consumes_the_handle_once() {
        let bus = Rc::new(RefCell::new(EventBus::new()));
        let (_mount, _outer, inner) = mounted_pair();
        let handle = bus.borrow_mut().bind(&inner, EventKind::Click, |_ctx| {});
        assert_eq!(bus.borrow().len(), 1);
        assert!(bus.borrow_mut().unbind(handle));
        assert!(bus.borrow().is_empty());
    }

    #[test]
    fn events_bubble_in_registration_order_until_stopped() {
        let bus = Rc::new(RefCell::new(EventBus::new()));
        let (_mount, outer, inner) = mounted_pair();
        let order: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&order);
        bus.borrow_mut().bind(&inner, EventKind::Click, move |_ctx| {
            log.borrow_mut().push("inner-first");
        });
        let log = Rc::clone(&order);
        bus.borrow_mut().bind(&inner, EventKind::Click, move |ctx| {
            log.borrow_mut().push("inner-second");
            ctx.stop_propagation();
        });
        let log = Rc::clone(&order);
        bus.borrow_mut().bind(&outer, EventKind::Click, move |_ctx| {
            log.borrow_mut().push("outer");
        });

        let outcome = dispatch(&bus, &inner, &UiEvent::Click);
        assert!(outcome.propagation_stopped);
        assert_eq!(order.borrow().as_slice(), &["inner-first", "inner-second"]);
    }

    #[test]
    fn detached_nodes_do_not_run_handlers() {
        let bus = Rc::new(RefCell::new(EventBus::new()));
        let (mount, outer, inner) = mounted_pair();
        let fired = Rc::new(RefCell::new(0usize));

        let count = Rc::clone(&fired);
        bus.borrow_mut().bind(&inner, EventKind::Click, move |_ctx| {
            *count.borrow_mut() += 1;
        });

        dispatch(&bus, &inner, &UiEvent::Click);
        assert_eq!(*fired.borrow(), 1);

        mount.remove_child(&outer);
        dispatch(&bus, &inner, &UiEvent::Click);
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn a_binding_drained_mid_dispatch_is_skipped() {
        let bus = Rc::new(RefCell::new(EventBus::new()));
        let (_mount, _outer, inner) = mounted_pair();
        let fired = Rc::new(RefCell::new(Vec::new()));

        let doomed_handle = Rc::new(RefCell::new(None));

        // The remover runs first (registration order) and unbinds the handler
        // registered after it, which must then be skipped in the same
        // dispatch.
        let bus_ref = Rc::clone(&bus);
        let log = Rc::clone(&fired);
        let doomed = Rc::clone(&doomed_handle);
        bus.borrow_mut().bind(&inner, EventKind::Click, move |_ctx| {
            log.borrow_mut().push("remover");
            if let Some(handle) = doomed.borrow_mut().take() {
                bus_ref.borrow_mut().unbind(handle);
            }
        });

        let log = Rc::clone(&fired);
        let handle = bus.borrow_mut().bind(&inner, EventKind::Click, move |_ctx| {
            log.borrow_mut().push("doomed");
        });
        *doomed_handle.borrow_mut() = Some(handle);

        dispatch(&bus, &inner, &UiEvent::Click);
        dispatch(&bus, &inner, &UiEvent::Click);
        assert_eq!(fired.borrow().as_slice(), &["remover", "remover"]);
        assert_eq!(bus.borrow().len(), 1);
    }
}
