//! Host surface: the bundle of service handles a plugin consumes, plus
//! reference input driving with host default actions.
//!
//! Input routing mirrors the host contract: key events are dispatched at the
//! focused node (falling back to the layer mount), handlers run first, and
//! the default action (linear tab movement, input editing) only applies when
//! no handler prevented it. Stopping propagation does not suppress the
//! default action.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::config::EnvConfig;
use crate::core::events::{dispatch, DispatchOutcome, EventBus, KeyEvent, UiEvent};
use crate::core::node::{NodeHandle, NodeKind};
use crate::core::text_edit;
use crate::host::focus::FocusState;
use crate::host::widget_layer::WidgetLayer;

#[derive(Clone)]
pub struct HostSurface {
    pub layer: Rc<RefCell<WidgetLayer>>,
    pub events: Rc<RefCell<EventBus>>,
    pub focus: Rc<RefCell<FocusState>>,
    pub rtl: bool,
}

impl HostSurface {
    pub fn new(rtl: bool) -> Self {
        Self {
            layer: Rc::new(RefCell::new(WidgetLayer::new())),
            events: Rc::new(RefCell::new(EventBus::new())),
            focus: Rc::new(RefCell::new(FocusState::new())),
            rtl,
        }
    }

    pub fn from_config(config: &EnvConfig) -> Self {
        Self::new(config.rtl)
    }

    /// The widget layer's mount node.
    pub fn mount(&self) -> NodeHandle {
        self.layer.borrow().mount()
    }

    /// Dispatches a click at `node`.
    pub fn click(&self, node: &NodeHandle) -> DispatchOutcome {
        dispatch(&self.events, node, &UiEvent::Click)
    }

    /// Dispatches a keydown at the focused node (or the mount when nothing
    /// is focused), then applies the host default action unless prevented.
    pub fn press_key(&self, key_id: &str) -> DispatchOutcome {
        let target = self
            .focus
            .borrow()
            .focused()
            .unwrap_or_else(|| self.mount());
        let event = UiEvent::KeyDown(KeyEvent::new(key_id));
        let outcome = dispatch(&self.events, &target, &event);
        trace!(key_id, ?outcome, "key dispatched");
        if !outcome.default_prevented {
            self.default_key_action(key_id, &target);
        }
        outcome
    }

    /// Types `text` into the focused input node and fires its value-changed
    /// event. No-op when focus is not on an enabled input.
    pub fn type_text(&self, text: &str) {
        let Some(target) = self.focus.borrow().focused() else {
            return;
        };
        if !is_editable(&target) {
            return;
        }
        let mut value = target.value();
        text_edit::push_text(&mut value, &text_edit::sanitize_paste(text));
        target.set_value(value.clone());
        dispatch(&self.events, &target, &UiEvent::ValueChanged { value });
    }

    fn default_key_action(&self, key_id: &str, target: &NodeHandle) {
        match key_id {
            "tab" => self.move_focus_linear(1),
            "shift+tab" => self.move_focus_linear(-1),
            "backspace" => {
                if !is_editable(target) {
                    return;
                }
                let mut value = target.value();
                if text_edit::delete_last_grapheme(&mut value) {
                    target.set_value(value.clone());
                    dispatch(&self.events, target, &UiEvent::ValueChanged { value });
                }
            }
            _ => {}
        }
    }

    /// Host default tab movement: document order over the attached mount
    /// subtree, clamped at the ends. Wrapping is a dialog-trap behavior, not
    /// a host behavior.
    fn move_focus_linear(&self, delta: isize) {
        let focusables = self.mount().query_focusable();
        if focusables.is_empty() {
            return;
        }
        let current = self.focus.borrow().focused();
        let next = match current.and_then(|node| {
            focusables
                .iter()
                .position(|candidate| candidate.ptr_eq(&node))
        }) {
            Some(index) => {
                let next = index as isize + delta;
                if next < 0 || next as usize >= focusables.len() {
                    return;
                }
                focusables[next as usize].clone()
            }
            None => focusables[0].clone(),
        };
        self.focus.borrow_mut().set_focus(Some(next));
    }
}

fn is_editable(node: &NodeHandle) -> bool {
    matches!(node.kind(), NodeKind::TextInput | NodeKind::DateInput) && !node.is_disabled()
}
