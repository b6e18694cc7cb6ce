//! Generic text-input field capability.
//!
//! Field kinds are a variant tag plus injected strategies (a validation
//! function and an editor-widget factory) rather than a subclass hierarchy.
//! The editor widget lives on the shared widget layer under this field's own
//! owner token, so another overlay claiming the layer detaches it through
//! the layer's dispose path.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::core::node::{NodeHandle, NodeKind};
use crate::host::surface::HostSurface;
use crate::host::widget_layer::OwnerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
}

/// Validation strategy: returns the accepted value, or `None` to abort the
/// change ("no value" is a rejection signal, not an error).
pub type ValueValidator = Box<dyn Fn(Option<&str>) -> Option<String>>;

/// Builds the editor widget node for the field's current value.
pub type EditorFactory = Box<dyn Fn(&str) -> NodeHandle>;

pub struct TextField {
    kind: FieldKind,
    value: String,
    validator: Option<ValueValidator>,
    editor_factory: Option<EditorFactory>,
    editor: Rc<RefCell<Option<NodeHandle>>>,
    owner: OwnerId,
}

impl std::fmt::Debug for TextField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextField")
            .field("kind", &self.kind)
            .field("value", &self.value)
            .field("validator", &self.validator.as_ref().map(|_| "..."))
            .field("editor_factory", &self.editor_factory.as_ref().map(|_| "..."))
            .field("editor", &self.editor.borrow().as_ref().map(|_| "..."))
            .field("owner", &self.owner)
            .finish()
    }
}

impl TextField {
    pub fn new(kind: FieldKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            validator: None,
            editor_factory: None,
            editor: Rc::new(RefCell::new(None)),
            owner: OwnerId::allocate(),
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_validator(&mut self, validator: Option<ValueValidator>) {
        self.validator = validator;
    }

    pub fn set_editor_factory(&mut self, factory: Option<EditorFactory>) {
        self.editor_factory = factory;
    }

    /// Applies `new_value` through the validation strategy. Returns whether
    /// the change was accepted; a rejected change leaves the value untouched.
    pub fn set_value(&mut self, new_value: Option<&str>) -> bool {
        let validated = match self.validator.as_ref() {
            Some(validator) => validator(new_value),
            None => new_value.map(str::to_string),
        };
        match validated {
            Some(value) => {
                self.value = value;
                true
            }
            None => false,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editor.borrow().is_some()
    }

    pub fn editor(&self) -> Option<NodeHandle> {
        self.editor.borrow().clone()
    }

    /// Opens the editor widget on the shared widget layer. No-op while
    /// already editing.
    pub fn show_editor(&mut self, surface: &HostSurface) {
        if self.editor.borrow().is_some() {
            return;
        }
        let editor = match self.editor_factory.as_ref() {
            Some(factory) => factory(&self.value),
            None => default_text_editor(&self.value),
        };

        let mount = surface.mount();
        let slot = Rc::downgrade(&self.editor);
        let mount_ref = mount.downgrade();
        let focus_ref = Rc::downgrade(&surface.focus);
        let dispose = move || {
            let Some(slot) = slot.upgrade() else {
                return;
            };
            let taken = slot.borrow_mut().take();
            if let Some(node) = taken {
                if let Some(focus) = focus_ref.upgrade() {
                    focus.borrow_mut().clear_if_within(&node);
                }
                if let Some(mount) = mount_ref.upgrade() {
                    mount.remove_child(&node);
                }
            }
        };
        surface
            .layer
            .borrow_mut()
            .show(self.owner, surface.rtl, Box::new(dispose));
        mount.append_child(&editor);
        surface.focus.borrow_mut().set_focus(Some(editor.clone()));
        *self.editor.borrow_mut() = Some(editor);
        debug!(kind = ?self.kind, "field editor shown");
    }

    /// Closes the editor widget. Idempotent.
    pub fn hide_editor(&mut self, surface: &HostSurface) {
        if self.editor.borrow().is_none() {
            return;
        }
        if surface.layer.borrow().owner() == Some(self.owner) {
            surface.layer.borrow_mut().hide();
            return;
        }
        // Pre-empted: the layer already ran our dispose callback.
        self.editor.borrow_mut().take();
    }
}

fn default_text_editor(value: &str) -> NodeHandle {
    let input = NodeHandle::new(NodeKind::TextInput);
    input.add_class("fieldTextInput");
    input.set_value(value);
    input
}

#[cfg(test)]
mod tests {
    use super::{FieldKind, TextField};
    use crate::host::surface::HostSurface;
    use crate::host::widget_layer::OwnerId;

    #[test]
    fn rejected_values_leave_the_field_untouched() {
        let mut field = TextField::new(FieldKind::Text, "start");
        field.set_validator(Some(Box::new(|value| {
            value.filter(|v| !v.is_empty()).map(str::to_string)
        })));

        assert!(field.set_value(Some("next")));
        assert_eq!(field.value(), "next");
        assert!(!field.set_value(Some("")));
        assert!(!field.set_value(None));
        assert_eq!(field.value(), "next");
    }

    #[test]
    fn editor_lifecycle_attaches_and_detaches() {
        let surface = HostSurface::new(false);
        let mut field = TextField::new(FieldKind::Text, "abc");

        field.show_editor(&surface);
        let editor = field.editor().expect("editor node");
        assert!(editor.is_connected());
        assert_eq!(editor.value(), "abc");

        field.show_editor(&surface);
        assert_eq!(surface.mount().child_count(), 1);

        field.hide_editor(&surface);
        assert!(!field.is_editing());
        assert_eq!(surface.mount().child_count(), 0);
        field.hide_editor(&surface);
        assert!(!field.is_editing());
    }

    #[test]
    fn another_owner_pre_empts_the_editor() {
        let surface = HostSurface::new(false);
        let mut field = TextField::new(FieldKind::Text, "abc");
        field.show_editor(&surface);
        assert!(field.is_editing());

        surface
            .layer
            .borrow_mut()
            .show(OwnerId::allocate(), false, Box::new(|| {}));
        assert!(!field.is_editing());
        assert_eq!(surface.mount().child_count(), 0);
    }
}
