use screenpilot_core_types::Snapshot;

/// Capture side of UI inspection.
pub trait StructuralPerceiver: Send + Sync {
    /// Returns `None` when no surface is active.
    fn capture_snapshot(&self) -> Option<Snapshot>;
}
