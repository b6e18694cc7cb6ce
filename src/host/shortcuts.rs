//! Shortcut registry: ordered command-to-chord descriptors.

use std::sync::{Arc, Mutex, OnceLock};

/// Key chords bound to one command. Each chord is a `+`-joined token
/// sequence; alternate chords are ordered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShortcutBinding {
    pub key_codes: Vec<String>,
}

impl ShortcutBinding {
    pub fn new<I, S>(chords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key_codes: chords.into_iter().map(Into::into).collect(),
        }
    }
}

/// Insertion-ordered command registry, read-only at render time.
#[derive(Default)]
pub struct ShortcutRegistry {
    entries: Vec<(String, ShortcutBinding)>,
}

impl ShortcutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name`, replacing an existing binding in place so the
    /// display order stays stable across re-registration.
    pub fn register(&mut self, name: &str, binding: ShortcutBinding) {
        if let Some(entry) = self.entries.iter_mut().find(|(existing, _)| existing == name) {
            entry.1 = binding;
            return;
        }
        self.entries.push((name.to_string(), binding));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, ShortcutBinding)> {
        self.entries.iter()
    }

    /// Owned copy for render-time iteration outside the registry lock.
    pub fn snapshot(&self) -> Vec<(String, ShortcutBinding)> {
        self.entries.clone()
    }
}

static GLOBAL_SHORTCUT_REGISTRY: OnceLock<Arc<Mutex<ShortcutRegistry>>> = OnceLock::new();

/// Process-wide registry handle, initialized on first use.
pub fn shortcut_registry() -> Arc<Mutex<ShortcutRegistry>> {
    GLOBAL_SHORTCUT_REGISTRY
        .get_or_init(|| Arc::new(Mutex::new(ShortcutRegistry::new())))
        .clone()
}
