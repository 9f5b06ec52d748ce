//! Live-actor count. When it reaches zero, every loop of the core winds down.

/// Read-only view of the number of live actors.
///
/// The count is owned by the actor registry; the core only reads it. It must be
/// readable without blocking, and once it has reached zero it is expected to
/// stay there.
pub trait LiveActors: Send + Sync {
    fn remaining(&self) -> usize;

    /// Global shutdown: no actors left.
    fn is_shutdown(&self) -> bool {
        self.remaining() == 0
    }
}
