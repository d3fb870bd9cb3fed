//! Lifecycle state of the search controller.
//!
//! ```text
//!   NotHydrated ──Mount──▶ Hydrated
//!        │                     │
//!        └──────Unmount────────┴──▶ Unmounted
//! ```
//!
//! Hydration happens exactly once. There is no transition back to
//! `NotHydrated`, and nothing leaves `Unmounted`.

/// Where the controller is in its mount/hydrate/unmount lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Mounted, waiting for the URL. Every operation is a no-op.
    #[default]
    NotHydrated,

    /// State was read from the URL; operations and reactive behaviors run.
    Hydrated,

    /// The owning view is gone. Pending timers are released and every event
    /// is ignored.
    Unmounted,
}

impl Lifecycle {
    #[must_use]
    pub const fn is_hydrated(self) -> bool {
        matches!(self, Self::Hydrated)
    }
}
