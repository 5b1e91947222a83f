//! Testing utilities and harness for the widget host.

mod engine;
mod functions;
mod rule;

pub use engine::{binding_ref, BindingRef, ContextEvent, RecordingContext, RecordingEngine, ScopeId};
pub use functions::{script_fn, PendingCall, ScriptFunction};
pub use rule::{
    count_binding_sets, count_cleanups, count_creations, count_renders, CountingScheduler,
    RecordingInvoker, WidgetHostTestRule,
};

pub mod prelude {
    pub use crate::*;
}
