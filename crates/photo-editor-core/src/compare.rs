//! "Show original" comparison mode.
//!
//! While comparison is active the displayed image bypasses the preview
//! descriptor entirely. Parameters are never touched, so releasing the hold
//! brings back exactly the descriptor that was shown before.

use crate::params::EditParameters;
use crate::render::{preview_descriptor, PreviewDescriptor};

/// Whether the original, unedited image is currently displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComparisonMode {
    showing_original: bool,
}

impl ComparisonMode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start showing the original. Idempotent.
    pub fn enter(&mut self) {
        if !self.showing_original {
            log::debug!("comparison: showing original");
        }
        self.showing_original = true;
    }

    /// Go back to the edited preview. Idempotent, so every input
    /// termination path (release, leave, cancel) can call it.
    pub fn exit(&mut self) {
        if self.showing_original {
            log::debug!("comparison: showing edits");
        }
        self.showing_original = false;
    }

    pub fn is_active(&self) -> bool {
        self.showing_original
    }

    /// Enter comparison mode for the lifetime of the returned guard.
    pub fn hold(&mut self) -> OriginalView<'_> {
        self.enter();
        OriginalView { mode: self }
    }

    /// Descriptor to display for `params` in the current mode.
    pub fn displayed(&self, params: &EditParameters) -> PreviewDescriptor {
        if self.showing_original {
            PreviewDescriptor::identity()
        } else {
            preview_descriptor(params)
        }
    }
}

/// Scoped "original view". Comparison mode ends when this is dropped,
/// including on early return or unwinding.
#[derive(Debug)]
pub struct OriginalView<'a> {
    mode: &'a mut ComparisonMode,
}

impl OriginalView<'_> {
    /// Descriptor displayed while the guard is held.
    pub fn displayed(&self, params: &EditParameters) -> PreviewDescriptor {
        self.mode.displayed(params)
    }
}

impl Drop for OriginalView<'_> {
    fn drop(&mut self) {
        self.mode.exit();
    }
}
