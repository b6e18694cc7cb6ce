//! Drives the shortcut menu against an in-process host surface and prints
//! the rendered dialog.
//!
//! ```sh
//! cargo run -p shortcut_menu --example shortcut-menu-demo
//! ```

use std::sync::{Arc, Mutex};

use block_ui::{render_lines, EnvConfig, HostSurface, ShortcutBinding, ShortcutRegistry};
use shortcut_menu::ShortcutMenuPlugin;

fn main() {
    let config = EnvConfig::from_env();
    let surface = HostSurface::from_config(&config);

    let mut registry = ShortcutRegistry::new();
    registry.register("undo", ShortcutBinding::new(["Control+90", "Meta+90"]));
    registry.register("redo", ShortcutBinding::new(["Control+Shift+90"]));
    registry.register("copy", ShortcutBinding::new(["Control+67"]));
    registry.register("paste", ShortcutBinding::new(["Control+86"]));
    registry.register("delete", ShortcutBinding::new(["8", "46"]));
    registry.register("dismiss", ShortcutBinding::new(["27"]));
    let registry = Arc::new(Mutex::new(registry));

    let mut plugin = ShortcutMenuPlugin::new(&surface, registry);
    plugin.init();
    plugin.show();

    println!("-- dialog --");
    for line in render_lines(&surface.mount(), 60) {
        println!("{line}");
    }

    surface.type_text("ctrl");
    println!();
    println!("-- filtered: \"ctrl\" --");
    for line in render_lines(&surface.mount(), 60) {
        println!("{line}");
    }

    surface.press_key("escape");
    println!();
    println!("-- after escape: dialog open = {} --", plugin.is_open());
}
