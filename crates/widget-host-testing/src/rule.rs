use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use widget_host_core::{
    Children, HostConfig, HostError, HostNode, Props, RenderInvoker, RenderOutput, Runtime,
    RuntimeHandle, RuntimeScheduler, ScriptError, WidgetHost, WidgetName, WidgetRegistry,
};

use crate::engine::{ContextEvent, RecordingContext, RecordingEngine};

/// Scheduler that counts frame requests.
#[derive(Debug, Default)]
pub struct CountingScheduler {
    frames: AtomicUsize,
}

impl CountingScheduler {
    pub fn frames(&self) -> usize {
        self.frames.load(Ordering::SeqCst)
    }

    pub fn take_frames(&self) -> usize {
        self.frames.swap(0, Ordering::SeqCst)
    }
}

impl RuntimeScheduler for CountingScheduler {
    fn schedule_frame(&self) {
        self.frames.fetch_add(1, Ordering::SeqCst);
    }
}

/// Invoker wrapper that logs a [`ContextEvent::Rendered`] before delegating.
pub struct RecordingInvoker<I> {
    inner: I,
}

impl<I> RecordingInvoker<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    pub fn inner_mut(&mut self) -> &mut I {
        &mut self.inner
    }
}

impl<I> RenderInvoker<RecordingContext> for RecordingInvoker<I>
where
    I: RenderInvoker<RecordingContext>,
{
    fn render(
        &mut self,
        context: &RecordingContext,
        widget: &WidgetName,
    ) -> Result<RenderOutput, HostError> {
        context.engine().record(ContextEvent::Rendered {
            scope: context.scope(),
            widget: widget.clone(),
        });
        self.inner.render(context, widget)
    }
}

/// Headless harness for one widget placement.
///
/// Owns a recording engine, a registry of widget bodies, the host under
/// test and a callback runtime, and exposes the engine's event log for
/// assertions.
pub struct WidgetHostTestRule {
    engine: RecordingEngine,
    root: RecordingContext,
    host: WidgetHost<RecordingContext>,
    invoker: RecordingInvoker<WidgetRegistry<RecordingContext>>,
    scheduler: Arc<CountingScheduler>,
    runtime: Runtime,
}

impl Default for WidgetHostTestRule {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetHostTestRule {
    pub fn new() -> Self {
        Self::with_config(HostConfig::default())
    }

    pub fn with_config(config: HostConfig) -> Self {
        let engine = RecordingEngine::new();
        let root = engine.root();
        let scheduler = Arc::new(CountingScheduler::default());
        let runtime = Runtime::new(scheduler.clone());
        Self {
            engine,
            root,
            host: WidgetHost::with_config(config),
            invoker: RecordingInvoker::new(WidgetRegistry::new()),
            scheduler,
            runtime,
        }
    }

    pub fn engine(&self) -> &RecordingEngine {
        &self.engine
    }

    pub fn root(&self) -> &RecordingContext {
        &self.root
    }

    pub fn host(&self) -> &WidgetHost<RecordingContext> {
        &self.host
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn scheduler(&self) -> &CountingScheduler {
        &self.scheduler
    }

    /// Registers a widget body.
    pub fn register(
        &mut self,
        name: &str,
        body: impl FnMut(&RecordingContext) -> Result<RenderOutput, ScriptError> + 'static,
    ) -> &mut Self {
        self.invoker.inner_mut().register(name, body);
        self
    }

    /// One reconciliation pass.
    pub fn render(
        &mut self,
        widget: &str,
        props: Props,
        children: Children,
    ) -> Result<HostNode, HostError> {
        self.host.render(
            &self.root,
            &mut self.invoker,
            &WidgetName::from(widget),
            props,
            children,
        )
    }

    /// One reconciliation pass under `parent` instead of the root scope.
    pub fn render_in(
        &mut self,
        parent: &RecordingContext,
        widget: &str,
        props: Props,
        children: Children,
    ) -> Result<HostNode, HostError> {
        self.host.render(
            parent,
            &mut self.invoker,
            &WidgetName::from(widget),
            props,
            children,
        )
    }

    pub fn unmount(&mut self) {
        self.host.unmount();
    }

    /// Polls pending callbacks until they stall. Returns how many finished.
    pub fn pump(&self) -> usize {
        self.runtime.run_until_stalled()
    }

    pub fn events(&self) -> Vec<ContextEvent> {
        self.engine.events()
    }

    pub fn take_events(&self) -> Vec<ContextEvent> {
        self.engine.take_events()
    }

    /// Scope of the live child context.
    pub fn current_scope(&self) -> Option<usize> {
        self.host.slot().map(|slot| slot.context().scope())
    }
}

pub fn count_binding_sets(events: &[ContextEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, ContextEvent::BindingSet { .. }))
        .count()
}

pub fn count_cleanups(events: &[ContextEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, ContextEvent::CleanedUp { .. }))
        .count()
}

pub fn count_creations(events: &[ContextEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, ContextEvent::Created { .. }))
        .count()
}

pub fn count_renders(events: &[ContextEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, ContextEvent::Rendered { .. }))
        .count()
}
