//! Contract consumed from the evaluation engine.

use crate::error::ScriptError;
use crate::props::Props;
use crate::value::Value;

/// A binding environment owned by one widget instance.
///
/// The host never shares a child context: the value returned by
/// [`create_child`](EvalContext::create_child) is owned by exactly one
/// [`WidgetSlot`](crate::WidgetSlot) and released through a
/// [`ScopeGuard`](crate::ScopeGuard).
pub trait EvalContext: Sized {
    /// Allocate a child scope seeded with `bindings`. Construction failures
    /// are reported through [`creation_error`](EvalContext::creation_error),
    /// not through the return value.
    fn create_child(&self, bindings: Props) -> Self;

    /// Update one binding in place. Must not render anything by itself.
    fn set_binding_without_render(&mut self, name: &str, value: Value);

    /// Run every registered destructor. Called exactly once per context.
    fn run_cleanup(&mut self);

    fn creation_error(&self) -> Option<&ScriptError>;

    /// One-shot signal issued after the first successful render.
    fn mark_fully_created(&mut self);
}
