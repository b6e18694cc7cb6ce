//! Style registry: raw stylesheets injected by plugins at load time.

use std::sync::{Arc, Mutex, OnceLock};

/// Collects plugin stylesheets for the host to serve. Re-registering an
/// identical sheet is a no-op, so plugin init functions may run more than
/// once.
#[derive(Default)]
pub struct StyleRegistry {
    sheets: Vec<String>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, css: &str) {
        if self.sheets.iter().any(|sheet| sheet == css) {
            return;
        }
        self.sheets.push(css.to_string());
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// All registered sheets, concatenated in registration order.
    pub fn css(&self) -> String {
        self.sheets.join("\n")
    }
}

static GLOBAL_STYLE_REGISTRY: OnceLock<Arc<Mutex<StyleRegistry>>> = OnceLock::new();

/// Process-wide registry handle, initialized on first use.
pub fn style_registry() -> Arc<Mutex<StyleRegistry>> {
    GLOBAL_STYLE_REGISTRY
        .get_or_init(|| Arc::new(Mutex::new(StyleRegistry::new())))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::StyleRegistry;

    #[test]
    fn re_registration_is_idempotent() {
        let mut registry = StyleRegistry::new();
        registry.register(".modalOverlay { position: fixed; }");
        registry.register(".modalOverlay { position: fixed; }");
        registry.register(".datePicker { opacity: 0; }");

        assert_eq!(registry.sheet_count(), 2);
        assert!(registry.css().contains("datePicker"));
    }
}
