//! Shared widget layer: the host's single mount for transient overlays.
//!
//! Invariant: at most one owner holds the layer at a time. Claiming the layer
//! runs the previous owner's dispose callback before the new owner attaches,
//! so a pre-empted owner tears down through the same path as an explicit
//! hide.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::core::node::{NodeHandle, NodeKind};

/// Identifies one layer owner. Never reused within a process.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct OwnerId(u64);

static NEXT_OWNER_ID: AtomicU64 = AtomicU64::new(1);

impl OwnerId {
    pub fn allocate() -> Self {
        Self(NEXT_OWNER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

pub struct WidgetLayer {
    mount: NodeHandle,
    owner: Option<OwnerId>,
    on_dispose: Option<Box<dyn FnOnce()>>,
}

impl WidgetLayer {
    pub fn new() -> Self {
        let mount = NodeHandle::new(NodeKind::Division);
        mount.add_class("widgetLayer");
        mount.mark_mount_root();
        Self {
            mount,
            owner: None,
            on_dispose: None,
        }
    }

    /// The root container node overlays attach to.
    pub fn mount(&self) -> NodeHandle {
        self.mount.clone()
    }

    pub fn owner(&self) -> Option<OwnerId> {
        self.owner
    }

    /// Claims the layer for `owner`. A previous owner's dispose callback runs
    /// first; it must not call back into the layer.
    pub fn show(&mut self, owner: OwnerId, rtl: bool, on_dispose: Box<dyn FnOnce()>) {
        if let Some(previous) = self.on_dispose.take() {
            debug!(
                previous = self.owner.map(OwnerId::raw),
                next = owner.raw(),
                "widget layer pre-empted"
            );
            previous();
        }
        self.owner = Some(owner);
        self.mount.set_attr("dir", if rtl { "rtl" } else { "ltr" });
        self.on_dispose = Some(on_dispose);
    }

    /// Releases the layer, running the current owner's dispose callback.
    /// No-op when nothing is shown.
    pub fn hide(&mut self) {
        if self.owner.take().is_none() {
            return;
        }
        if let Some(on_dispose) = self.on_dispose.take() {
            on_dispose();
        }
    }
}

impl Default for WidgetLayer {
    fn default() -> Self {
        Self::new()
    }
}
