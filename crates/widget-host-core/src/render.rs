use crate::collections::map::HashMap;
use crate::error::{HostError, ScriptError};
use crate::value::{Value, WidgetName};

/// Raw output of a widget body. `None` entries are placeholders for
/// "nothing to render" and are discarded by the host.
pub type RenderOutput = Vec<Option<Value>>;

/// Evaluates a widget body in a context.
///
/// Errors returned here are hosting-layer failures; widget-authoring
/// failures are expected to surface through the context's creation error or
/// be turned into nodes by the invoker itself.
pub trait RenderInvoker<C> {
    fn render(&mut self, context: &C, widget: &WidgetName) -> Result<RenderOutput, HostError>;
}

type WidgetBody<C> = Box<dyn FnMut(&C) -> Result<RenderOutput, ScriptError>>;

/// Name-keyed table of widget bodies.
pub struct WidgetRegistry<C> {
    bodies: HashMap<WidgetName, WidgetBody<C>>,
}

impl<C> Default for WidgetRegistry<C> {
    fn default() -> Self {
        Self {
            bodies: HashMap::default(),
        }
    }
}

impl<C> WidgetRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `body` under `name`, replacing any previous definition.
    pub fn register(
        &mut self,
        name: impl Into<WidgetName>,
        body: impl FnMut(&C) -> Result<RenderOutput, ScriptError> + 'static,
    ) -> &mut Self {
        let name = name.into();
        if self.bodies.insert(name.clone(), Box::new(body)).is_some() {
            log::debug!("replaced widget definition `{name}`");
        }
        self
    }

    pub fn contains(&self, name: &WidgetName) -> bool {
        self.bodies.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl<C> RenderInvoker<C> for WidgetRegistry<C> {
    fn render(&mut self, context: &C, widget: &WidgetName) -> Result<RenderOutput, HostError> {
        let body = self
            .bodies
            .get_mut(widget)
            .ok_or_else(|| HostError::UnknownWidget(widget.clone()))?;
        body(context).map_err(|source| HostError::Render {
            widget: widget.clone(),
            source,
        })
    }
}
