//! The boundary between leaf widgets and script callbacks.
//!
//! Callbacks run on the [`Runtime`](crate::Runtime), outside any
//! reconciliation pass. Their failures never leave the widget that issued
//! them: they are parked in a [`LastError`] for that widget to display.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use futures_task::{LocalFutureObj, LocalSpawn, SpawnError};

use crate::error::ScriptError;
use crate::slot::InstanceToken;
use crate::value::Value;

pub type CallFuture = Pin<Box<dyn Future<Output = Result<Value, ScriptError>>>>;

/// Operations a leaf widget performs against the evaluation engine.
pub trait CallbackContext: Clone + 'static {
    /// Assigns `value` to the binding `target` refers to.
    fn set_value(&self, target: &Value, value: Value) -> Result<(), ScriptError>;

    /// Evaluates `target`, falling back to `default` when it has no value.
    fn evaluate_or(&self, target: &Value, default: Value) -> Value;

    fn call_function_async(&self, function: &Value, args: Vec<Value>) -> CallFuture;
}

/// Transient error state of one leaf widget.
#[derive(Clone, Default)]
pub struct LastError {
    inner: Rc<RefCell<Option<ScriptError>>>,
}

impl LastError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<ScriptError> {
        self.inner.borrow().clone()
    }

    pub fn is_set(&self) -> bool {
        self.inner.borrow().is_some()
    }

    pub fn set(&self, error: ScriptError) {
        *self.inner.borrow_mut() = Some(error);
    }

    /// Clears the error, returning it.
    pub fn dismiss(&self) -> Option<ScriptError> {
        self.inner.borrow_mut().take()
    }
}

impl std::fmt::Debug for LastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LastError").field(&*self.inner.borrow()).finish()
    }
}

/// Spawns `work` and routes its failure into `last_error`.
///
/// The error is kept only if `token` is still active when `work` finishes;
/// a callback that outlived its widget instance has nobody to report to.
pub fn spawn_callback<S>(
    spawner: &S,
    token: InstanceToken,
    last_error: LastError,
    work: impl Future<Output = Result<(), ScriptError>> + 'static,
) -> Result<(), SpawnError>
where
    S: LocalSpawn + ?Sized,
{
    let task = async move {
        let Err(error) = work.await else {
            return;
        };
        if token.is_active() {
            log::debug!("callback of instance {} failed: {error}", token.id());
            last_error.set(error);
        } else {
            log::debug!(
                "dropping callback error of released instance {}: {error}",
                token.id()
            );
        }
    };
    spawner.spawn_local_obj(LocalFutureObj::new(Box::pin(task)))
}
