//! Date input field plugin.
//!
//! A text-input field specialized with a strict `YYYY-MM-DD` validator and a
//! native date-picker editor widget overlaid, fully transparent, on the text
//! editor.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use block_ui::{
    style_registry, FieldError, FieldKind, FieldRegistry, HostSurface, NodeHandle, NodeKind,
    RegistryError, TextField,
};

/// Registry key for this field type.
pub const FIELD_TYPE: &str = "field_date";

/// Value used when none is supplied.
pub const DEFAULT_DATE: &str = "2000-10-10";

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("date pattern is valid")
});

/// Ensures the input value is a date in `YYYY-MM-DD` form.
///
/// Month must be 01-12 and day 01-31. Day-of-month overflow for short months
/// (`2021-02-31`) is accepted: validation is pattern-only, and tightening it
/// would change the field's observable contract.
pub fn validate_date(new_value: Option<&str>) -> Option<String> {
    let value = new_value?;
    if value.is_empty() {
        return None;
    }
    if !DATE_PATTERN.is_match(value) {
        return None;
    }
    Some(value.to_string())
}

fn date_editor(value: &str) -> NodeHandle {
    let picker = NodeHandle::new(NodeKind::DateInput);
    picker.add_class("datePicker");
    picker.set_attr("type", "date");
    picker.set_attr("opacity", "0");
    picker.set_value(value);
    picker
}

/// Builds a date field: the generic text-input capability with the date
/// validator and the picker editor injected.
pub fn date_field(value: Option<&str>) -> TextField {
    let mut field = TextField::new(FieldKind::Date, value.unwrap_or(DEFAULT_DATE));
    field.set_validator(Some(Box::new(|value| validate_date(value))));
    field.set_editor_factory(Some(Box::new(date_editor)));
    field
}

/// Shows the field editor and opens the native picker on it.
pub fn show_editor(field: &mut TextField, surface: &HostSurface) {
    field.show_editor(surface);
    if let Some(picker) = field.editor() {
        picker.set_attr("data-picker-open", "true");
        debug!(value = %picker.value(), "date picker opened");
    }
}

/// JSON construction entry point: `{"date": "YYYY-MM-DD"}`. A missing or
/// null `date` falls back to [`DEFAULT_DATE`]; a non-string value is an
/// integration error.
pub fn from_json(options: &Value) -> Result<TextField, FieldError> {
    let value = match options.get("date") {
        None | Some(Value::Null) => None,
        Some(Value::String(date)) => Some(date.as_str()),
        Some(_) => return Err(FieldError::InvalidOption("date")),
    };
    Ok(date_field(value))
}

pub const FIELD_CSS: &str = "\
.datePicker {
  opacity: 0;
}
input::-webkit-calendar-picker-indicator {
  cursor: pointer;
}
";

/// Installs the field type and its stylesheet. Style registration is
/// idempotent; a duplicate field key is reported.
pub fn register(registry: &mut FieldRegistry) -> Result<(), RegistryError> {
    registry.register(FIELD_TYPE, Box::new(|options| from_json(options)))?;
    style_registry()
        .lock()
        .expect("style registry lock poisoned")
        .register(FIELD_CSS);
    debug!(field_type = FIELD_TYPE, "date field registered");
    Ok(())
}
