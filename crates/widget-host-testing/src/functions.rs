use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use widget_host_core::{CallFuture, ScriptError, Value};

/// Script-callable function stored inside a [`Value`].
#[derive(Clone)]
pub struct ScriptFunction {
    body: Rc<dyn Fn(Vec<Value>) -> CallFuture>,
}

impl ScriptFunction {
    pub fn new(body: impl Fn(Vec<Value>) -> CallFuture + 'static) -> Self {
        Self {
            body: Rc::new(body),
        }
    }

    pub fn call(&self, args: Vec<Value>) -> CallFuture {
        (self.body)(args)
    }
}

/// Wraps a synchronous closure as a function value whose calls complete on
/// first poll.
pub fn script_fn(body: impl Fn(Vec<Value>) -> Result<Value, ScriptError> + 'static) -> Value {
    Value::new(ScriptFunction::new(move |args| -> CallFuture {
        Box::pin(std::future::ready(body(args)))
    }))
}

#[derive(Default)]
struct CallState {
    resolved: bool,
    result: Option<Result<Value, ScriptError>>,
    waker: Option<Waker>,
}

struct Call {
    args: Vec<Value>,
    state: Rc<RefCell<CallState>>,
}

/// Function value whose calls stay pending until the test resolves them.
#[derive(Clone, Default)]
pub struct PendingCall {
    calls: Rc<RefCell<Vec<Call>>>,
}

impl PendingCall {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn function(&self) -> Value {
        let calls = Rc::clone(&self.calls);
        Value::new(ScriptFunction::new(move |args| -> CallFuture {
            let state = Rc::new(RefCell::new(CallState::default()));
            calls.borrow_mut().push(Call {
                args,
                state: Rc::clone(&state),
            });
            Box::pin(PendingFuture { state })
        }))
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn args(&self, index: usize) -> Option<Vec<Value>> {
        self.calls.borrow().get(index).map(|call| call.args.clone())
    }

    /// Completes the oldest unresolved call. Returns `false` if none is
    /// waiting.
    pub fn resolve_next(&self, result: Result<Value, ScriptError>) -> bool {
        let calls = self.calls.borrow();
        let Some(call) = calls
            .iter()
            .find(|call| !call.state.borrow().resolved)
        else {
            return false;
        };
        let waker = {
            let mut state = call.state.borrow_mut();
            state.resolved = true;
            state.result = Some(result);
            state.waker.take()
        };
        drop(calls);
        if let Some(waker) = waker {
            waker.wake();
        }
        true
    }
}

struct PendingFuture {
    state: Rc<RefCell<CallState>>,
}

impl Future for PendingFuture {
    type Output = Result<Value, ScriptError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.borrow_mut();
        match state.result.take() {
            Some(result) => Poll::Ready(result),
            None => {
                state.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}
