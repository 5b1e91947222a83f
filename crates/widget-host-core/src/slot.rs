use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::HostConfig;
use crate::context::EvalContext;
use crate::diff::{self, ChildrenChange};
use crate::props::{Children, Props};
use crate::value::{Value, WidgetName};

static NEXT_INSTANCE_ID: AtomicUsize = AtomicUsize::new(1);

fn next_instance_id() -> InstanceId {
    InstanceId(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(usize);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle naming the widget instance that was current when it was taken.
///
/// Goes inactive as soon as that instance's context is released, so work
/// that outlives the instance can tell it is stale.
#[derive(Clone)]
pub struct InstanceToken {
    id: InstanceId,
    active: Rc<Cell<bool>>,
}

impl InstanceToken {
    fn new() -> Self {
        Self {
            id: next_instance_id(),
            active: Rc::new(Cell::new(true)),
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl PartialEq for InstanceToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for InstanceToken {}

impl fmt::Debug for InstanceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceToken")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Owns a child context and runs its cleanup exactly once, either through
/// [`release`](ScopeGuard::release) or when dropped.
pub struct ScopeGuard<C: EvalContext> {
    context: C,
    active: Rc<Cell<bool>>,
    released: bool,
}

impl<C: EvalContext> ScopeGuard<C> {
    pub fn new(context: C) -> Self {
        Self {
            context,
            active: Rc::new(Cell::new(true)),
            released: false,
        }
    }

    fn with_token(context: C, token: &InstanceToken) -> Self {
        Self {
            context,
            active: Rc::clone(&token.active),
            released: false,
        }
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Runs the cleanup now instead of at drop time.
    pub fn release(mut self) {
        self.run_cleanup();
    }

    fn run_cleanup(&mut self) {
        if std::mem::replace(&mut self.released, true) {
            return;
        }
        self.active.set(false);
        self.context.run_cleanup();
    }
}

impl<C: EvalContext> Drop for ScopeGuard<C> {
    fn drop(&mut self) {
        self.run_cleanup();
    }
}

/// Per-position record of the live child context and the inputs last pushed
/// into it.
pub struct WidgetSlot<C: EvalContext> {
    scope: ScopeGuard<C>,
    identity: WidgetName,
    last_props: Props,
    last_children: Children,
    token: InstanceToken,
    created_signalled: bool,
}

/// What an update pass pushed into an existing context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateReport {
    pub props_pushed: usize,
    pub children: ChildrenChange,
}

impl UpdateReport {
    pub fn pushes(&self) -> usize {
        self.props_pushed + usize::from(self.children != ChildrenChange::Unchanged)
    }
}

impl<C: EvalContext> WidgetSlot<C> {
    /// Creates a fresh child of `parent` seeded with every prop and the
    /// children list.
    pub(crate) fn create(
        parent: &C,
        identity: WidgetName,
        props: Props,
        children: Children,
        config: &HostConfig,
    ) -> Self {
        let mut bindings = props.clone();
        let shadowed = bindings.insert(&*config.children_binding, Value::new(children.clone()));
        if shadowed.is_some() {
            log::warn!(
                "prop `{}` of `{identity}` is shadowed by the children binding",
                config.children_binding
            );
        }
        let token = InstanceToken::new();
        let context = parent.create_child(bindings);
        log::debug!("created context for `{identity}` ({})", token.id());
        Self {
            scope: ScopeGuard::with_token(context, &token),
            identity,
            last_props: props,
            last_children: children,
            token,
            created_signalled: false,
        }
    }

    pub fn identity(&self) -> &WidgetName {
        &self.identity
    }

    pub fn context(&self) -> &C {
        self.scope.context()
    }

    pub fn last_props(&self) -> &Props {
        &self.last_props
    }

    pub fn last_children(&self) -> &[Value] {
        &self.last_children
    }

    pub fn token(&self) -> &InstanceToken {
        &self.token
    }

    /// Pushes only the inputs that changed by reference into the existing
    /// context.
    pub(crate) fn update(
        &mut self,
        props: Props,
        children: Children,
        config: &HostConfig,
    ) -> UpdateReport {
        let children_binding: &str = &config.children_binding;
        let changes = diff::diff_props(&self.last_props, &props);
        let mut props_pushed = 0;
        for (name, value) in &changes {
            if &**name == children_binding {
                log::trace!("skipping prop `{name}` shadowed by the children binding");
                continue;
            }
            log::trace!("push `{name}` into `{}`", self.identity);
            self.scope
                .context_mut()
                .set_binding_without_render(name, value.clone());
            props_pushed += 1;
        }
        if !changes.is_empty() {
            self.last_props = props;
        }

        let children_change = diff::diff_children(&self.last_children, &children);
        if children_change != ChildrenChange::Unchanged {
            log::trace!(
                "push `{children_binding}` into `{}` ({:?})",
                self.identity,
                children_change
            );
            self.scope
                .context_mut()
                .set_binding_without_render(children_binding, Value::new(children.clone()));
            self.last_children = children;
        }

        UpdateReport {
            props_pushed,
            children: children_change,
        }
    }

    /// Issues the fully-created signal the first time it is called for this
    /// context.
    pub(crate) fn mark_fully_created(&mut self) {
        if !std::mem::replace(&mut self.created_signalled, true) {
            self.scope.context_mut().mark_fully_created();
        }
    }

    /// Runs the context's cleanup. The slot is gone afterwards.
    pub(crate) fn release(self) {
        log::debug!("releasing context of `{}` ({})", self.identity, self.token.id());
        self.scope.release();
    }
}
