//! Focus management for the shared widget surface.

use crate::core::node::NodeHandle;

/// Tracks the single focused node, blurring the previous one on change.
#[derive(Default)]
pub struct FocusState {
    focused: Option<NodeHandle>,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_focus(&mut self, target: Option<NodeHandle>) {
        if let (Some(prev), Some(next)) = (self.focused.as_ref(), target.as_ref()) {
            if prev.ptr_eq(next) {
                return;
            }
        }

        if let Some(prev) = self.focused.take() {
            prev.set_focused(false);
        }

        if let Some(next) = target {
            next.set_focused(true);
            self.focused = Some(next);
        }
    }

    pub fn clear(&mut self) {
        self.set_focus(None);
    }

    /// Clears focus when the focused node sits inside `root`'s subtree.
    /// Used on teardown so focus never points into a detached dialog.
    pub fn clear_if_within(&mut self, root: &NodeHandle) {
        let inside = self
            .focused
            .as_ref()
            .is_some_and(|node| node.ptr_eq(root) || node.is_descendant_of(root));
        if inside {
            self.clear();
        }
    }

    pub fn focused(&self) -> Option<NodeHandle> {
        self.focused.clone()
    }
}
