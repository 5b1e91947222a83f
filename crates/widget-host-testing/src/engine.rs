use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use hashbrown::HashMap;
use widget_host_core::{
    CallFuture, CallbackContext, EvalContext, Props, ScriptError, Value, WidgetName,
};

use crate::functions::ScriptFunction;

pub type ScopeId = usize;

/// Everything the engine observed, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContextEvent {
    Created {
        scope: ScopeId,
        parent: ScopeId,
        bindings: Vec<String>,
    },
    BindingSet {
        scope: ScopeId,
        name: String,
    },
    CleanedUp {
        scope: ScopeId,
    },
    FullyCreated {
        scope: ScopeId,
    },
    Rendered {
        scope: ScopeId,
        widget: WidgetName,
    },
    ValueSet {
        scope: ScopeId,
        name: String,
    },
    Called {
        scope: ScopeId,
        args: usize,
    },
}

/// Reference to a named binding, the way scripts pass `bindTo` targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingRef(pub String);

pub fn binding_ref(name: impl Into<String>) -> Value {
    Value::new(BindingRef(name.into()))
}

type CreateHook = Box<dyn FnMut(&RecordingContext, &Props) -> Result<(), ScriptError>>;

#[derive(Default)]
struct ScopeState {
    parent: Option<ScopeId>,
    bindings: HashMap<String, Value>,
    destructors: Vec<Box<dyn FnOnce()>>,
    cleaned_up: bool,
    fully_created: bool,
}

struct EngineState {
    events: RefCell<Vec<ContextEvent>>,
    scopes: RefCell<HashMap<ScopeId, ScopeState>>,
    next_scope: Cell<ScopeId>,
    pending_failures: RefCell<VecDeque<ScriptError>>,
    on_create: RefCell<Option<CreateHook>>,
}

impl EngineState {
    fn record(&self, event: ContextEvent) {
        self.events.borrow_mut().push(event);
    }

    fn allocate(&self, parent: Option<ScopeId>, bindings: &Props) -> ScopeId {
        let id = self.next_scope.get();
        self.next_scope.set(id + 1);
        let state = ScopeState {
            parent,
            bindings: bindings
                .iter()
                .map(|(name, value)| (name.to_owned(), value.clone()))
                .collect(),
            ..ScopeState::default()
        };
        self.scopes.borrow_mut().insert(id, state);
        id
    }

    /// Nearest scope, starting at `scope`, that defines `name`.
    fn owner_of(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let scopes = self.scopes.borrow();
        let mut current = Some(scope);
        while let Some(id) = current {
            let state = scopes.get(&id)?;
            if state.bindings.contains_key(name) {
                return Some(id);
            }
            current = state.parent;
        }
        None
    }

    fn lookup(&self, scope: ScopeId, name: &str) -> Option<Value> {
        let owner = self.owner_of(scope, name)?;
        self.scopes
            .borrow()
            .get(&owner)
            .and_then(|state| state.bindings.get(name).cloned())
    }

    fn write(&self, scope: ScopeId, name: &str, value: Value) {
        if let Some(state) = self.scopes.borrow_mut().get_mut(&scope) {
            state.bindings.insert(name.to_owned(), value);
        }
    }
}

/// In-memory evaluation engine that records every call the host makes.
#[derive(Clone)]
pub struct RecordingEngine {
    state: Rc<EngineState>,
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingEngine {
    pub fn new() -> Self {
        let state = Rc::new(EngineState {
            events: RefCell::new(Vec::new()),
            scopes: RefCell::new(HashMap::new()),
            next_scope: Cell::new(0),
            pending_failures: RefCell::new(VecDeque::new()),
            on_create: RefCell::new(None),
        });
        state.allocate(None, &Props::new());
        Self { state }
    }

    /// The scope every widget placement is parented on. Always scope `0`.
    pub fn root(&self) -> RecordingContext {
        RecordingContext {
            state: Rc::clone(&self.state),
            scope: 0,
            creation_error: None,
        }
    }

    /// The next child created fails with `error`. A failed scope evaluates
    /// again when a binding is pushed into it, taking the next queued
    /// failure if there is one and succeeding otherwise.
    pub fn fail_next_creation(&self, error: ScriptError) {
        self.state.pending_failures.borrow_mut().push_back(error);
    }

    /// Runs `hook` as the initial evaluation of every child scope.
    pub fn on_create(
        &self,
        hook: impl FnMut(&RecordingContext, &Props) -> Result<(), ScriptError> + 'static,
    ) {
        *self.state.on_create.borrow_mut() = Some(Box::new(hook));
    }

    pub fn events(&self) -> Vec<ContextEvent> {
        self.state.events.borrow().clone()
    }

    pub fn take_events(&self) -> Vec<ContextEvent> {
        self.state.events.borrow_mut().drain(..).collect()
    }

    pub(crate) fn record(&self, event: ContextEvent) {
        self.state.record(event);
    }

    pub fn binding(&self, scope: ScopeId, name: &str) -> Option<Value> {
        self.state.lookup(scope, name)
    }

    pub fn parent_of(&self, scope: ScopeId) -> Option<ScopeId> {
        self.state
            .scopes
            .borrow()
            .get(&scope)
            .and_then(|state| state.parent)
    }

    pub fn is_cleaned_up(&self, scope: ScopeId) -> bool {
        self.state
            .scopes
            .borrow()
            .get(&scope)
            .is_some_and(|state| state.cleaned_up)
    }

    pub fn is_fully_created(&self, scope: ScopeId) -> bool {
        self.state
            .scopes
            .borrow()
            .get(&scope)
            .is_some_and(|state| state.fully_created)
    }

    /// Child scopes created and not yet cleaned up.
    pub fn live_children(&self) -> usize {
        self.state
            .scopes
            .borrow()
            .values()
            .filter(|state| state.parent.is_some() && !state.cleaned_up)
            .count()
    }
}

/// Scope handle handed to the host and to widget bodies.
#[derive(Clone)]
pub struct RecordingContext {
    state: Rc<EngineState>,
    scope: ScopeId,
    creation_error: Option<ScriptError>,
}

impl RecordingContext {
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn engine(&self) -> RecordingEngine {
        RecordingEngine {
            state: Rc::clone(&self.state),
        }
    }

    pub fn binding(&self, name: &str) -> Option<Value> {
        self.state.lookup(self.scope, name)
    }

    /// Registers a destructor to run when this scope is cleaned up.
    pub fn register_destructor(&self, destructor: impl FnOnce() + 'static) {
        if let Some(state) = self.state.scopes.borrow_mut().get_mut(&self.scope) {
            state.destructors.push(Box::new(destructor));
        }
    }
}

impl std::fmt::Debug for RecordingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingContext")
            .field("scope", &self.scope)
            .field("creation_error", &self.creation_error)
            .finish()
    }
}

impl EvalContext for RecordingContext {
    fn create_child(&self, bindings: Props) -> Self {
        let scope = self.state.allocate(Some(self.scope), &bindings);
        self.state.record(ContextEvent::Created {
            scope,
            parent: self.scope,
            bindings: bindings.names().map(str::to_owned).collect(),
        });
        let mut child = RecordingContext {
            state: Rc::clone(&self.state),
            scope,
            creation_error: None,
        };

        let queued = self.state.pending_failures.borrow_mut().pop_front();
        child.creation_error = match queued {
            Some(error) => Some(error),
            None => {
                let hook = self.state.on_create.borrow_mut().take();
                match hook {
                    Some(mut hook) => {
                        let result = hook(&child, &bindings);
                        let mut slot = self.state.on_create.borrow_mut();
                        if slot.is_none() {
                            *slot = Some(hook);
                        }
                        result.err()
                    }
                    None => None,
                }
            }
        };
        child
    }

    fn set_binding_without_render(&mut self, name: &str, value: Value) {
        self.state.record(ContextEvent::BindingSet {
            scope: self.scope,
            name: name.to_owned(),
        });
        self.state.write(self.scope, name, value);
        if self.creation_error.is_some() {
            self.creation_error = self.state.pending_failures.borrow_mut().pop_front();
            log::trace!(
                "scope {} re-evaluated, failed: {}",
                self.scope,
                self.creation_error.is_some()
            );
        }
    }

    fn run_cleanup(&mut self) {
        let destructors = {
            let mut scopes = self.state.scopes.borrow_mut();
            match scopes.get_mut(&self.scope) {
                Some(state) => {
                    if state.cleaned_up {
                        log::error!("scope {} cleaned up twice", self.scope);
                    }
                    state.cleaned_up = true;
                    std::mem::take(&mut state.destructors)
                }
                None => Vec::new(),
            }
        };
        for destructor in destructors {
            destructor();
        }
        self.state
            .record(ContextEvent::CleanedUp { scope: self.scope });
    }

    fn creation_error(&self) -> Option<&ScriptError> {
        self.creation_error.as_ref()
    }

    fn mark_fully_created(&mut self) {
        if let Some(state) = self.state.scopes.borrow_mut().get_mut(&self.scope) {
            state.fully_created = true;
        }
        self.state
            .record(ContextEvent::FullyCreated { scope: self.scope });
    }
}

impl CallbackContext for RecordingContext {
    fn set_value(&self, target: &Value, value: Value) -> Result<(), ScriptError> {
        let BindingRef(name) = target
            .downcast_ref::<BindingRef>()
            .ok_or_else(|| ScriptError::new("target is not a binding"))?;
        let owner = self.state.owner_of(self.scope, name).unwrap_or(self.scope);
        self.state.write(owner, name, value);
        self.state.record(ContextEvent::ValueSet {
            scope: owner,
            name: name.clone(),
        });
        Ok(())
    }

    fn evaluate_or(&self, target: &Value, default: Value) -> Value {
        target
            .downcast_ref::<BindingRef>()
            .and_then(|BindingRef(name)| self.state.lookup(self.scope, name))
            .filter(|value| !value.is_undefined())
            .unwrap_or(default)
    }

    fn call_function_async(&self, function: &Value, args: Vec<Value>) -> CallFuture {
        self.state.record(ContextEvent::Called {
            scope: self.scope,
            args: args.len(),
        });
        match function.downcast_ref::<ScriptFunction>() {
            Some(function) => function.call(args),
            None => Box::pin(std::future::ready(Err(ScriptError::new(
                "value is not a function",
            )))),
        }
    }
}
