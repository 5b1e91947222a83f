#![doc = r"Instance lifecycle and context propagation for script-defined widgets."]

pub mod callback;
pub mod collections;
pub mod config;
pub mod context;
pub mod diff;
pub mod error;
pub mod host;
pub mod platform;
pub mod props;
pub mod render;
pub mod runtime;
pub mod slot;
pub mod value;

pub use callback::{spawn_callback, CallFuture, CallbackContext, LastError};
pub use config::HostConfig;
pub use context::EvalContext;
pub use error::{ErrorPhase, HostError, RenderError, ScriptError};
pub use diff::ChildrenChange;
pub use host::{HostNode, Transition, WidgetHost};
pub use platform::RuntimeScheduler;
pub use props::{Children, Props};
pub use render::{RenderInvoker, RenderOutput, WidgetRegistry};
pub use runtime::{DefaultScheduler, Runtime, RuntimeHandle};
pub use slot::{InstanceId, InstanceToken, ScopeGuard, UpdateReport, WidgetSlot};
pub use value::{Value, WidgetName};

pub use futures_task::SpawnError;

#[cfg(test)]
#[path = "tests/value_tests.rs"]
mod value_tests;

#[cfg(test)]
#[path = "tests/diff_tests.rs"]
mod diff_tests;

#[cfg(test)]
#[path = "tests/slot_tests.rs"]
mod slot_tests;

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod runtime_tests;
