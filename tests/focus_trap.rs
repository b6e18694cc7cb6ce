//! Keyboard focus trap: wrap-around, single-element swallowing, escape.

use block_ui::{
    HostSurface, ModalController, ModalCtx, ModalOptions, ModalView, NodeHandle, NodeKind,
};

/// Content with a link and two buttons, so the ring is
/// close -> link -> first -> second.
struct RingView;

impl ModalView for RingView {
    fn render_content(&mut self, content: &NodeHandle, _ctx: &mut ModalCtx<'_>) {
        let link = NodeHandle::new(NodeKind::Link);
        link.set_attr("href", "#docs");
        link.set_text("Documentation");
        content.append_child(&link);
        for label in ["First", "Second"] {
            let button = NodeHandle::new(NodeKind::Button);
            button.set_text(label);
            content.append_child(&button);
        }
    }
}

/// Content with nothing focusable, leaving only the close control.
struct BareView;

impl ModalView for BareView {}

fn focused(surface: &HostSurface) -> NodeHandle {
    surface.focus.borrow().focused().expect("focused node")
}

fn open(surface: &HostSurface, view: Box<dyn ModalView>, options: ModalOptions) -> ModalController {
    let mut modal = ModalController::new("Trap", surface.clone(), view, options);
    modal.show();
    modal
}

#[test]
fn initial_focus_skips_the_leading_close_control() {
    let surface = HostSurface::new(false);
    let mut modal = open(&surface, Box::new(RingView), ModalOptions::default());

    assert_eq!(modal.focusable_count(), 4);
    assert_eq!(focused(&surface).text(), "Documentation");
    modal.dispose();
}

#[test]
fn tab_wraps_forward_from_the_last_element() {
    let surface = HostSurface::new(false);
    let mut modal = open(&surface, Box::new(RingView), ModalOptions::default());

    // Walk to the last element with the host's own tab movement.
    surface.press_key("tab");
    surface.press_key("tab");
    assert_eq!(focused(&surface).text(), "Second");

    let outcome = surface.press_key("tab");
    assert!(outcome.default_prevented);
    assert!(outcome.propagation_stopped);
    // Wrapped to the close control, the first focusable.
    assert!(focused(&surface).has_class("modalBtnClose"));
    modal.dispose();
}

#[test]
fn shift_tab_wraps_backward_from_the_first_element() {
    let surface = HostSurface::new(false);
    let mut modal = open(&surface, Box::new(RingView), ModalOptions::default());

    surface.press_key("shift+tab");
    assert!(focused(&surface).has_class("modalBtnClose"));

    let outcome = surface.press_key("shift+tab");
    assert!(outcome.default_prevented);
    assert_eq!(focused(&surface).text(), "Second");
    modal.dispose();
}

#[test]
fn mid_ring_tabs_use_the_host_default_movement() {
    let surface = HostSurface::new(false);
    let mut modal = open(&surface, Box::new(RingView), ModalOptions::default());

    let outcome = surface.press_key("tab");
    assert!(!outcome.default_prevented);
    assert!(outcome.propagation_stopped);
    assert_eq!(focused(&surface).text(), "First");
    modal.dispose();
}

#[test]
fn a_single_focusable_swallows_tab_entirely() {
    let surface = HostSurface::new(false);
    let mut modal = open(&surface, Box::new(BareView), ModalOptions::default());

    assert_eq!(modal.focusable_count(), 1);
    assert!(focused(&surface).has_class("modalBtnClose"));

    for key in ["tab", "shift+tab"] {
        let outcome = surface.press_key(key);
        assert!(outcome.default_prevented, "key: {key}");
        assert!(outcome.propagation_stopped, "key: {key}");
        assert!(focused(&surface).has_class("modalBtnClose"), "key: {key}");
    }
    modal.dispose();
}

#[test]
fn escape_closes_when_enabled() {
    let surface = HostSurface::new(false);
    let mut modal = open(&surface, Box::new(RingView), ModalOptions::default());

    let outcome = surface.press_key("escape");
    assert!(outcome.propagation_stopped);
    assert!(!modal.is_open());
    assert!(surface.events.borrow().is_empty());
    modal.dispose();
}

#[test]
fn escape_is_ignored_when_disabled() {
    let surface = HostSurface::new(false);
    let mut modal = open(
        &surface,
        Box::new(RingView),
        ModalOptions {
            close_on_overlay_click: true,
            close_on_escape: false,
        },
    );

    let outcome = surface.press_key("escape");
    // Still swallowed so the host's global handling stays quiet.
    assert!(outcome.propagation_stopped);
    assert!(modal.is_open());
    modal.dispose();
}

#[test]
fn other_keys_are_stopped_but_not_prevented() {
    let surface = HostSurface::new(false);
    let mut modal = open(&surface, Box::new(RingView), ModalOptions::default());

    let outcome = surface.press_key("enter");
    assert!(outcome.propagation_stopped);
    assert!(!outcome.default_prevented);
    modal.dispose();
}
