//! Modal dialog controller: overlay construction, scoped event bindings, and
//! the keyboard focus trap.
//!
//! Invariant: every binding registered while a dialog is open is released
//! exactly once, on whichever teardown path runs first: explicit hide,
//! dispose, or widget-layer pre-emption. The layer's dispose callback is the
//! single drain point; hide funnels through it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::core::events::{BindingHandle, EventBus, EventCtx, EventKind, UiEvent};
use crate::core::node::{NodeHandle, NodeKind};
use crate::host::focus::FocusState;
use crate::host::surface::HostSurface;
use crate::host::widget_layer::{OwnerId, WidgetLayer};

/// Modal configuration flags, fixed at construction.
#[derive(Clone, Copy, Debug)]
pub struct ModalOptions {
    /// Close when the user clicks the dimmed area outside the dialog.
    pub close_on_overlay_click: bool,
    /// Close on the escape key.
    pub close_on_escape: bool,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            close_on_overlay_click: true,
            close_on_escape: true,
        }
    }
}

/// Render hooks for the three dialog regions. Implementations customize
/// appearance; lifecycle and the focus trap stay in the controller.
pub trait ModalView {
    fn render_header(&mut self, header: &NodeHandle, ctx: &mut ModalCtx<'_>) {
        let heading = NodeHandle::new(NodeKind::Heading);
        heading.add_class("modalHeaderTitle");
        heading.set_text(ctx.title());
        header.append_child(&heading);
    }

    fn render_content(&mut self, _content: &NodeHandle, _ctx: &mut ModalCtx<'_>) {}

    fn render_footer(&mut self, _footer: &NodeHandle, _ctx: &mut ModalCtx<'_>) {}
}

struct ModalState {
    title: String,
    options: ModalOptions,
    is_open: bool,
    root: Option<NodeHandle>,
    close_button: Option<NodeHandle>,
    mount: Option<NodeHandle>,
    bound: Vec<BindingHandle>,
    focusables: Vec<NodeHandle>,
    first: Option<NodeHandle>,
    last: Option<NodeHandle>,
}

/// Context passed to render hooks; bindings added through it are scoped to
/// the dialog and drained on teardown.
pub struct ModalCtx<'a> {
    state: &'a Rc<RefCell<ModalState>>,
    surface: &'a HostSurface,
}

impl ModalCtx<'_> {
    pub fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    pub fn surface(&self) -> &HostSurface {
        self.surface
    }

    /// Binds `handler` for the dialog's lifetime.
    pub fn bind(
        &mut self,
        node: &NodeHandle,
        kind: EventKind,
        handler: impl FnMut(&mut EventCtx<'_>) + 'static,
    ) {
        let handle = self.surface.events.borrow_mut().bind(node, kind, handler);
        self.state.borrow_mut().bound.push(handle);
    }
}

/// Weak teardown handle shared by the trap and the close controls. Weak on
/// every side so bindings never keep the controller or the host alive.
#[derive(Clone)]
struct CloseHook {
    state: Weak<RefCell<ModalState>>,
    layer: Weak<RefCell<WidgetLayer>>,
    events: Weak<RefCell<EventBus>>,
    focus: Weak<RefCell<FocusState>>,
    owner: OwnerId,
}

impl CloseHook {
    /// Full hide: releases the layer when this dialog owns it, which funnels
    /// into [`CloseHook::teardown`] via the dispose callback.
    fn close(&self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        if !state.borrow().is_open {
            return;
        }
        let Some(layer) = self.layer.upgrade() else {
            return;
        };
        let owned = layer.borrow().owner() == Some(self.owner);
        if owned {
            layer.borrow_mut().hide();
        } else {
            self.teardown();
        }
    }

    /// Drains bindings, detaches the subtree, and clears focus. Runs at most
    /// once per open; must not call back into the widget layer (it runs from
    /// the layer's dispose callback).
    fn teardown(&self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        if !state.borrow().is_open {
            return;
        }
        let (drained, root, mount) = {
            let mut st = state.borrow_mut();
            st.is_open = false;
            st.close_button = None;
            st.focusables.clear();
            st.first = None;
            st.last = None;
            (
                std::mem::take(&mut st.bound),
                st.root.take(),
                st.mount.take(),
            )
        };
        if let Some(events) = self.events.upgrade() {
            let mut bus = events.borrow_mut();
            for handle in drained {
                bus.unbind(handle);
            }
        }
        if let Some(root) = root {
            if let Some(focus) = self.focus.upgrade() {
                focus.borrow_mut().clear_if_within(&root);
            }
            if let Some(mount) = mount {
                mount.remove_child(&root);
            }
        }
        debug!("modal torn down");
    }
}

/// Dialog state machine: `Closed` (initial and terminal) and `Open`.
pub struct ModalController {
    state: Rc<RefCell<ModalState>>,
    view: Box<dyn ModalView>,
    surface: HostSurface,
    owner: OwnerId,
}

impl ModalController {
    pub fn new(
        title: impl Into<String>,
        surface: HostSurface,
        view: Box<dyn ModalView>,
        options: ModalOptions,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(ModalState {
                title: title.into(),
                options,
                is_open: false,
                root: None,
                close_button: None,
                mount: None,
                bound: Vec::new(),
                focusables: Vec::new(),
                first: None,
                last: None,
            })),
            view,
            surface,
            owner: OwnerId::allocate(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().is_open
    }

    pub fn root(&self) -> Option<NodeHandle> {
        self.state.borrow().root.clone()
    }

    /// Number of live event bindings owned by the dialog.
    pub fn active_bindings(&self) -> usize {
        self.state.borrow().bound.len()
    }

    pub fn focusable_count(&self) -> usize {
        self.state.borrow().focusables.len()
    }

    fn hook(&self) -> CloseHook {
        CloseHook {
            state: Rc::downgrade(&self.state),
            layer: Rc::downgrade(&self.surface.layer),
            events: Rc::downgrade(&self.surface.events),
            focus: Rc::downgrade(&self.surface.focus),
            owner: self.owner,
        }
    }

    fn bind(
        &self,
        node: &NodeHandle,
        kind: EventKind,
        handler: impl FnMut(&mut EventCtx<'_>) + 'static,
    ) {
        let handle = self.surface.events.borrow_mut().bind(node, kind, handler);
        self.state.borrow_mut().bound.push(handle);
    }

    /// `Closed -> Open`. Claims the widget layer, builds the dialog subtree
    /// through the render hooks, binds the trap and close controls, then
    /// recomputes the focusable ring and moves focus into the dialog.
    ///
    /// No-op while already open: the layer contract allows one attached
    /// dialog, and rebuilding mid-open would double-bind.
    pub fn show(&mut self) {
        if self.state.borrow().is_open {
            return;
        }
        debug!(title = %self.state.borrow().title, "modal show");

        let hook = self.hook();
        {
            let dispose_hook = hook.clone();
            self.surface.layer.borrow_mut().show(
                self.owner,
                self.surface.rtl,
                Box::new(move || dispose_hook.teardown()),
            );
        }
        let mount = self.surface.layer.borrow().mount();

        let (title, close_on_overlay_click) = {
            let st = self.state.borrow();
            (st.title.clone(), st.options.close_on_overlay_click)
        };

        let overlay = NodeHandle::new(NodeKind::Division);
        overlay.add_class("modalOverlay");
        let container = NodeHandle::new(NodeKind::Division);
        container.add_class("modalContainer");
        container.set_attr("role", "dialog");
        container.set_attr("aria-labelledby", &title);

        {
            let mut st = self.state.borrow_mut();
            st.is_open = true;
            st.root = Some(overlay.clone());
            st.mount = Some(mount.clone());
        }

        {
            let trap_hook = hook.clone();
            self.bind(&container, EventKind::KeyDown, move |ctx| {
                handle_key_down(&trap_hook, ctx);
            });
        }

        if close_on_overlay_click {
            let close = hook.clone();
            self.bind(&overlay, EventKind::Click, move |_ctx| close.close());
            self.bind(&container, EventKind::Click, |ctx| ctx.stop_propagation());
        }

        let header = NodeHandle::new(NodeKind::Header);
        header.add_class("modalHeader");
        {
            let mut ctx = ModalCtx {
                state: &self.state,
                surface: &self.surface,
            };
            self.view.render_header(&header, &mut ctx);
        }

        let close_button = NodeHandle::new(NodeKind::Button);
        close_button.add_class("modalBtn");
        close_button.add_class("modalBtnClose");
        close_button.set_text("\u{2715}");
        {
            let close = hook.clone();
            self.bind(&close_button, EventKind::Click, move |_ctx| close.close());
        }
        header.append_child(&close_button);
        self.state.borrow_mut().close_button = Some(close_button.clone());

        let content = NodeHandle::new(NodeKind::Division);
        content.add_class("modalContent");
        {
            let mut ctx = ModalCtx {
                state: &self.state,
                surface: &self.surface,
            };
            self.view.render_content(&content, &mut ctx);
        }

        let footer = NodeHandle::new(NodeKind::Footer);
        footer.add_class("modalFooter");
        {
            let mut ctx = ModalCtx {
                state: &self.state,
                surface: &self.surface,
            };
            self.view.render_footer(&footer, &mut ctx);
        }

        container.append_child(&header);
        container.append_child(&content);
        container.append_child(&footer);
        overlay.append_child(&container);
        mount.append_child(&overlay);

        self.refresh_focusables();
    }

    /// Recomputes the focusable ring from the live subtree and moves focus
    /// to the first useful element: the second one when the close control
    /// leads and anything else exists, otherwise the first.
    fn refresh_focusables(&self) {
        let Some(overlay) = self.state.borrow().root.clone() else {
            return;
        };
        let focusables = overlay.query_focusable();
        let initial = {
            let mut st = self.state.borrow_mut();
            st.first = focusables.first().cloned();
            st.last = focusables.last().cloned();
            let initial = match focusables.first() {
                Some(first) => {
                    let close_leads = st
                        .close_button
                        .as_ref()
                        .is_some_and(|close| close.ptr_eq(first));
                    if close_leads && focusables.len() > 1 {
                        Some(focusables[1].clone())
                    } else {
                        Some(first.clone())
                    }
                }
                None => None,
            };
            st.focusables = focusables;
            initial
        };
        if let Some(node) = initial {
            self.surface.focus.borrow_mut().set_focus(Some(node));
        }
    }

    /// `Open -> Closed`; no-op when already closed.
    pub fn hide(&mut self) {
        self.hook().close();
    }

    /// Hide plus dropping any remaining subtree reference. Safe without a
    /// prior `show`.
    pub fn dispose(&mut self) {
        self.hook().close();
        let mut st = self.state.borrow_mut();
        st.root = None;
        st.mount = None;
    }
}

/// The focus trap. Runs on every keydown that reaches the dialog container.
fn handle_key_down(hook: &CloseHook, ctx: &mut EventCtx<'_>) {
    let UiEvent::KeyDown(key) = ctx.event else {
        return;
    };
    let Some(state) = hook.state.upgrade() else {
        return;
    };

    match key.key_id.as_str() {
        "tab" | "shift+tab" => {
            let (count, first, last) = {
                let st = state.borrow();
                (st.focusables.len(), st.first.clone(), st.last.clone())
            };
            // Nothing to cycle through: swallow the key entirely.
            if count <= 1 {
                ctx.prevent_default();
                ctx.stop_propagation();
                return;
            }
            let focused = hook
                .focus
                .upgrade()
                .and_then(|focus| focus.borrow().focused());
            if let (Some(focused), Some(first), Some(last)) = (focused, first, last) {
                if key.key_id == "shift+tab" {
                    if focused.ptr_eq(&first) {
                        ctx.prevent_default();
                        if let Some(focus) = hook.focus.upgrade() {
                            focus.borrow_mut().set_focus(Some(last));
                        }
                    }
                } else if focused.ptr_eq(&last) {
                    ctx.prevent_default();
                    if let Some(focus) = hook.focus.upgrade() {
                        focus.borrow_mut().set_focus(Some(first));
                    }
                }
            }
        }
        "escape" => {
            let close_on_escape = state.borrow().options.close_on_escape;
            if close_on_escape {
                hook.close();
            }
        }
        _ => {}
    }
    // The host's global key handling must not also react to keys the dialog
    // saw.
    ctx.stop_propagation();
}
