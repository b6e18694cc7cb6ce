//! In-process host services consumed by the plugins.

pub mod field_registry;
pub mod focus;
pub mod shortcuts;
pub mod styles;
pub mod surface;
pub mod widget_layer;

pub use field_registry::{field_registry, FieldCtor, FieldRegistry, RegistryError};
pub use focus::FocusState;
pub use shortcuts::{shortcut_registry, ShortcutBinding, ShortcutRegistry};
pub use styles::{style_registry, StyleRegistry};
pub use surface::HostSurface;
pub use widget_layer::{OwnerId, WidgetLayer};
