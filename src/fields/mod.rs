//! Field capabilities installable through the field registry.

use thiserror::Error;

pub mod text_field;

pub use text_field::{EditorFactory, FieldKind, TextField, ValueValidator};

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("field option `{0}` must be a string")]
    InvalidOption(&'static str),
}
