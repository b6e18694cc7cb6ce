//! Keyboard-shortcut reference modal plugin.
//!
//! Renders every registered command with its key chords in a searchable
//! table inside a modal dialog. The dialog lifecycle and focus trap come
//! from [`ModalController`]; this crate only supplies the content hooks and
//! the chord formatting.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use tracing::debug;

use block_ui::{
    style_registry, EventKind, HostSurface, ModalController, ModalCtx, ModalOptions, ModalView,
    NodeHandle, NodeKind, ShortcutRegistry, UiEvent,
};

/// Dialog title.
pub const MENU_TITLE: &str = "Keyboard shortcuts";

/// Per-token display overrides. Numeric entries are key codes whose display
/// name is not their character; named modifiers normalize to their short
/// form.
static SPECIAL_CODES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("27", "Escape"),
        ("46", "."),
        ("8", "Backspace"),
        ("Control", "Ctrl"),
        ("Meta", "Meta"),
        ("Shift", "Shift"),
        ("Alt", "Alt"),
    ])
});

/// Display styling hook for chord tokens, injected so hosts control the
/// markup. The default renders tokens bare.
pub struct ShortcutMenuTheme {
    pub code: Box<dyn Fn(&str) -> String>,
}

impl Default for ShortcutMenuTheme {
    fn default() -> Self {
        Self {
            code: Box::new(|token: &str| token.to_string()),
        }
    }
}

/// Formats chords into display text. Each chord is a `+`-joined token list.
/// A token goes through the special-code table first, then numeric tokens in
/// printable ASCII (`!`..=`~`) render as their character, and anything else
/// passes through unchanged. Tokens join with `" + "`, alternate chords with
/// `" , "`.
pub fn format_codes(chords: &[String], code: &dyn Fn(&str) -> String) -> String {
    chords
        .iter()
        .map(|chord| {
            chord
                .split('+')
                .map(|token| code(&format_token(token)))
                .collect::<Vec<_>>()
                .join(" + ")
        })
        .collect::<Vec<_>>()
        .join(" , ")
}

fn format_token(token: &str) -> String {
    if let Some(mapped) = SPECIAL_CODES.get(token) {
        return (*mapped).to_string();
    }
    if let Ok(point) = token.parse::<u32>() {
        if (0x21..=0x7e).contains(&point) {
            if let Some(ch) = char::from_u32(point) {
                return ch.to_string();
            }
        }
    }
    token.to_string()
}

struct MenuState {
    registry: Arc<Mutex<ShortcutRegistry>>,
    theme: ShortcutMenuTheme,
    filter: String,
    table: Option<NodeHandle>,
}

impl MenuState {
    /// Rebuilds the table rows from the registry snapshot, keeping only
    /// commands whose name or formatted binding matches the filter.
    fn rebuild_table(&self) {
        let Some(table) = self.table.as_ref() else {
            return;
        };
        for child in table.children() {
            table.remove_child(&child);
        }

        let header = NodeHandle::new(NodeKind::TableRow);
        for label in ["Command", "Keybinding"] {
            let cell = NodeHandle::new(NodeKind::TableHeaderCell);
            cell.set_text(label);
            header.append_child(&cell);
        }
        table.append_child(&header);

        let needle = self.filter.to_lowercase();
        let entries = self
            .registry
            .lock()
            .expect("shortcut registry lock poisoned")
            .snapshot();
        for (name, binding) in entries {
            let formatted = format_codes(&binding.key_codes, &*self.theme.code);
            if !needle.is_empty() {
                let haystack = format!("{} {}", name.to_lowercase(), formatted.to_lowercase());
                if !haystack.contains(&needle) {
                    continue;
                }
            }
            let row = NodeHandle::new(NodeKind::TableRow);
            let command = NodeHandle::new(NodeKind::TableCell);
            command.set_text(&name);
            let keybinding = NodeHandle::new(NodeKind::TableCell);
            keybinding.set_text(&formatted);
            row.append_child(&command);
            row.append_child(&keybinding);
            table.append_child(&row);
        }
    }
}

struct MenuView {
    state: Rc<RefCell<MenuState>>,
}

impl ModalView for MenuView {
    fn render_content(&mut self, content: &NodeHandle, ctx: &mut ModalCtx<'_>) {
        let search_bar = NodeHandle::new(NodeKind::Division);
        search_bar.add_class("searchBar");
        let input = NodeHandle::new(NodeKind::TextInput);
        input.set_attr("placeholder", "Type to search in keybindings");
        search_bar.append_child(&input);
        content.append_child(&search_bar);

        let table = NodeHandle::new(NodeKind::Table);
        {
            let mut state = self.state.borrow_mut();
            state.filter.clear();
            state.table = Some(table.clone());
            state.rebuild_table();
        }
        content.append_child(&table);

        let state = Rc::clone(&self.state);
        ctx.bind(&input, EventKind::ValueChanged, move |event_ctx| {
            let UiEvent::ValueChanged { value } = event_ctx.event else {
                return;
            };
            debug!(value = %value, "shortcut search input");
            state.borrow_mut().filter = value.clone();
            state.borrow().rebuild_table();
        });
    }
}

/// The shortcut reference dialog.
pub struct ShortcutMenuPlugin {
    controller: ModalController,
    registry: Arc<Mutex<ShortcutRegistry>>,
}

impl ShortcutMenuPlugin {
    pub fn new(surface: &HostSurface, registry: Arc<Mutex<ShortcutRegistry>>) -> Self {
        Self::with_theme(surface, registry, ShortcutMenuTheme::default())
    }

    pub fn with_theme(
        surface: &HostSurface,
        registry: Arc<Mutex<ShortcutRegistry>>,
        theme: ShortcutMenuTheme,
    ) -> Self {
        let view = MenuView {
            state: Rc::new(RefCell::new(MenuState {
                registry: Arc::clone(&registry),
                theme,
                filter: String::new(),
                table: None,
            })),
        };
        let controller = ModalController::new(
            MENU_TITLE,
            surface.clone(),
            Box::new(view),
            ModalOptions::default(),
        );
        Self {
            controller,
            registry,
        }
    }

    /// One-time plugin setup: registers the stylesheet and logs the current
    /// registry contents.
    pub fn init(&self) {
        style_registry()
            .lock()
            .expect("style registry lock poisoned")
            .register(MENU_CSS);
        let entries = self
            .registry
            .lock()
            .expect("shortcut registry lock poisoned")
            .snapshot();
        debug!(commands = entries.len(), "shortcut menu initialized");
        for (name, binding) in entries {
            debug!(command = %name, chords = ?binding.key_codes, "registered shortcut");
        }
    }

    pub fn show(&mut self) {
        self.controller.show();
    }

    pub fn hide(&mut self) {
        self.controller.hide();
    }

    pub fn dispose(&mut self) {
        self.controller.dispose();
    }

    pub fn is_open(&self) -> bool {
        self.controller.is_open()
    }

    pub fn root(&self) -> Option<NodeHandle> {
        self.controller.root()
    }
}

pub const MENU_CSS: &str = "\
.modalOverlay {
  width: 100%;
  height: 100%;
  left: 0px;
  top: 0px;
  position: fixed;
}
.modalContainer {
  background-color: white;
  border: 1px solid gray;
  padding: 1em;
  width: 75vw;
  height: 75vh;
  display: flex;
  flex-direction: column;
  margin: auto;
  overflow: scroll;
}
.modalHeader {
  display: flex;
  justify-content: space-between;
  align-items: center;
}
.modalHeaderTitle {
  margin: 0;
  font-size: 1.2em;
  line-height: 1.25;
}
.modalBtn {
  margin-right: .5em;
  border: 1px solid gray;
  color: gray;
  border-radius: 25px;
}
code {
  background-color: lightgray;
  padding: 4px;
  border-radius: 5px;
}
.searchBar input[type=text] {
  width: 100%;
  padding: 6px;
  box-sizing: border-box;
}
";
