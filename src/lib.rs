//! UI extension plumbing for a block-editing toolkit host.
//!
//! Invariant: every event binding registered while a dialog or editor is
//! attached to the shared widget layer is released exactly once by the
//! teardown path (explicit hide, dispose, or layer pre-emption).
//!
//! # Public API Overview
//! - Build dialog plugins on [`ModalController`] with [`ModalView`] render
//!   hooks; the focus trap and binding lifecycle stay in the controller.
//! - Install field types through the [`FieldRegistry`] using the
//!   [`TextField`] capability with injected validation and editor strategies.
//! - Drive input and focus through a [`HostSurface`].
//! - Render any subtree to width-bounded lines with [`render_lines`].

pub mod config;
pub mod core;
pub mod fields;
pub mod host;
pub mod modal;
pub mod render;

/// Environment configuration.
pub use crate::config::EnvConfig;

/// Element tree primitives.
pub use crate::core::node::{NodeHandle, NodeId, NodeKind, WeakNode};

/// Event binding and dispatch.
pub use crate::core::events::{
    dispatch, BindingHandle, DispatchOutcome, EventBus, EventCtx, EventKind, KeyEvent, UiEvent,
};

/// Field capability and its errors.
pub use crate::fields::text_field::{EditorFactory, FieldKind, TextField, ValueValidator};
pub use crate::fields::FieldError;

/// Host services.
pub use crate::host::field_registry::{field_registry, FieldCtor, FieldRegistry, RegistryError};
pub use crate::host::focus::FocusState;
pub use crate::host::shortcuts::{shortcut_registry, ShortcutBinding, ShortcutRegistry};
pub use crate::host::styles::{style_registry, StyleRegistry};
pub use crate::host::surface::HostSurface;
pub use crate::host::widget_layer::{OwnerId, WidgetLayer};

/// Modal dialog controller and its extension points.
pub use crate::modal::{ModalController, ModalCtx, ModalOptions, ModalView};

/// Line rendering.
pub use crate::render::render_lines;
