use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use futures_task::{waker, ArcWake, LocalFutureObj, LocalSpawn, SpawnError};

use crate::collections::map::HashMap;
use crate::platform::RuntimeScheduler;

type TaskId = u64;

#[derive(Default)]
struct WakeQueue {
    ready: Mutex<VecDeque<TaskId>>,
}

impl WakeQueue {
    fn push(&self, id: TaskId) {
        self.ready
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(id);
    }

    fn pop(&self) -> Option<TaskId> {
        self.ready
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    fn is_empty(&self) -> bool {
        self.ready
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

struct TaskWaker {
    id: TaskId,
    queue: Arc<WakeQueue>,
    scheduler: Arc<dyn RuntimeScheduler>,
}

impl ArcWake for TaskWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.queue.push(arc_self.id);
        arc_self.scheduler.schedule_frame();
    }
}

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    tasks: RefCell<HashMap<TaskId, LocalFutureObj<'static, ()>>>,
    queue: Arc<WakeQueue>,
    next_task_id: Cell<TaskId>,
}

impl RuntimeInner {
    fn spawn(&self, future: LocalFutureObj<'static, ()>) {
        let id = self.next_task_id.get();
        self.next_task_id.set(id + 1);
        self.tasks.borrow_mut().insert(id, future);
        self.queue.push(id);
        self.scheduler.schedule_frame();
    }
}

/// Single-threaded executor for leaf widget callbacks.
///
/// Reconciliation never waits on it: callbacks are spawned from event
/// handlers and polled whenever the host calls
/// [`run_until_stalled`](Runtime::run_until_stalled), typically once per
/// frame.
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner {
                scheduler,
                tasks: RefCell::new(HashMap::default()),
                queue: Arc::new(WakeQueue::default()),
                next_task_id: Cell::new(1),
            }),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Number of spawned callbacks that have not completed yet.
    pub fn pending_tasks(&self) -> usize {
        self.inner.tasks.borrow().len()
    }

    pub fn has_ready_tasks(&self) -> bool {
        !self.inner.queue.is_empty()
    }

    /// Polls every woken task until none is ready. Returns how many tasks
    /// completed.
    pub fn run_until_stalled(&self) -> usize {
        let mut completed = 0;
        while let Some(id) = self.inner.queue.pop() {
            // Removed while polling so the task can spawn more work.
            let Some(mut task) = self.inner.tasks.borrow_mut().remove(&id) else {
                continue;
            };
            let task_waker = waker(Arc::new(TaskWaker {
                id,
                queue: Arc::clone(&self.inner.queue),
                scheduler: Arc::clone(&self.inner.scheduler),
            }));
            let mut cx = Context::from_waker(&task_waker);
            match Pin::new(&mut task).poll(&mut cx) {
                Poll::Ready(()) => completed += 1,
                Poll::Pending => {
                    self.inner.tasks.borrow_mut().insert(id, task);
                }
            }
        }
        completed
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(Arc::new(DefaultScheduler))
    }
}

/// Non-owning handle used to spawn callbacks.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    pub fn spawn(&self, future: impl Future<Output = ()> + 'static) -> Result<(), SpawnError> {
        self.spawn_local_obj(LocalFutureObj::new(Box::pin(future)))
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl LocalSpawn for RuntimeHandle {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        let inner = self.inner.upgrade().ok_or_else(SpawnError::shutdown)?;
        inner.spawn(future);
        Ok(())
    }

    fn status_local(&self) -> Result<(), SpawnError> {
        if self.is_alive() {
            Ok(())
        } else {
            Err(SpawnError::shutdown())
        }
    }
}

/// Scheduler that ignores frame requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}
