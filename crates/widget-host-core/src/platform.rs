//! Host platform hooks used by the callback runtime.

/// Requests frames from the host.
///
/// A frame request means some leaf callback made progress and the host tree
/// may want to run another reconciliation pass. Implementations must be safe
/// to call from any thread because wakers can be moved across threads.
pub trait RuntimeScheduler: Send + Sync {
    fn schedule_frame(&self);
}
