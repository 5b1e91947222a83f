use crate::config::HostConfig;
use crate::context::EvalContext;
use crate::error::{HostError, RenderError};
use crate::props::{Children, Props};
use crate::render::RenderInvoker;
use crate::slot::{InstanceToken, UpdateReport, WidgetSlot};
use crate::value::{Value, WidgetName};

/// What the host tree displays for one widget placement.
#[derive(Clone, Debug)]
pub enum HostNode {
    Rendered {
        instance: InstanceToken,
        nodes: Vec<Value>,
    },
    Error(RenderError),
}

impl HostNode {
    pub fn nodes(&self) -> Option<&[Value]> {
        match self {
            HostNode::Rendered { nodes, .. } => Some(nodes),
            HostNode::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&RenderError> {
        match self {
            HostNode::Rendered { .. } => None,
            HostNode::Error(error) => Some(error),
        }
    }

    pub fn instance(&self) -> Option<&InstanceToken> {
        match self {
            HostNode::Rendered { instance, .. } => Some(instance),
            HostNode::Error(_) => None,
        }
    }
}

/// How the last reconciliation pass treated the slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    Initialize,
    Replace { previous: WidgetName },
    Update(UpdateReport),
}

/// Reconciles one host-tree position against a script-defined widget.
///
/// The host is either uninitialized (no slot yet) or active. Every
/// [`render`](WidgetHost::render) call is one reconciliation pass: an
/// unchanged name reuses the live context and pushes only the inputs whose
/// handles changed; a different name releases the old context and builds a
/// new one from scratch.
pub struct WidgetHost<C: EvalContext> {
    slot: Option<WidgetSlot<C>>,
    config: HostConfig,
    last_transition: Option<Transition>,
}

impl<C: EvalContext> Default for WidgetHost<C> {
    fn default() -> Self {
        Self::with_config(HostConfig::default())
    }
}

impl<C: EvalContext> WidgetHost<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HostConfig) -> Self {
        Self {
            slot: None,
            config,
            last_transition: None,
        }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.slot.is_some()
    }

    pub fn slot(&self) -> Option<&WidgetSlot<C>> {
        self.slot.as_ref()
    }

    pub fn identity(&self) -> Option<&WidgetName> {
        self.slot.as_ref().map(WidgetSlot::identity)
    }

    pub fn instance(&self) -> Option<&InstanceToken> {
        self.slot.as_ref().map(WidgetSlot::token)
    }

    pub fn last_transition(&self) -> Option<&Transition> {
        self.last_transition.as_ref()
    }

    /// Runs one reconciliation pass and renders the widget.
    ///
    /// A creation error on the context short-circuits into
    /// [`HostNode::Error`] without calling `invoker`. Errors from `invoker`
    /// itself are returned as-is.
    pub fn render<R>(
        &mut self,
        parent: &C,
        invoker: &mut R,
        widget: &WidgetName,
        props: Props,
        children: Children,
    ) -> Result<HostNode, HostError>
    where
        R: RenderInvoker<C> + ?Sized,
    {
        let (slot, transition) =
            reconcile(&mut self.slot, &self.config, parent, widget, props, children);
        self.last_transition = Some(transition);

        if let Some(error) = slot.context().creation_error() {
            log::warn!("`{}` failed during creation: {error}", slot.identity());
            return Ok(HostNode::Error(RenderError::on_create(error.clone())));
        }

        let output = invoker.render(slot.context(), slot.identity())?;
        let nodes: Vec<Value> = output.into_iter().flatten().collect();
        slot.mark_fully_created();
        Ok(HostNode::Rendered {
            instance: slot.token().clone(),
            nodes,
        })
    }

    /// Releases the live context, if any. Called when the host tree removes
    /// this position.
    pub fn unmount(&mut self) {
        if let Some(slot) = self.slot.take() {
            slot.release();
        }
        self.last_transition = None;
    }
}

fn reconcile<'a, C: EvalContext>(
    current: &'a mut Option<WidgetSlot<C>>,
    config: &HostConfig,
    parent: &C,
    widget: &WidgetName,
    props: Props,
    children: Children,
) -> (&'a mut WidgetSlot<C>, Transition) {
    match current.take() {
        Some(mut slot) if slot.identity() == widget => {
            let report = slot.update(props, children, config);
            log::debug!("updated `{widget}` with {} push(es)", report.pushes());
            (current.insert(slot), Transition::Update(report))
        }
        Some(previous) => {
            let previous_name = previous.identity().clone();
            log::debug!("replacing `{previous_name}` with `{widget}`");
            // The old context must be gone before the new one is created.
            previous.release();
            let slot = WidgetSlot::create(parent, widget.clone(), props, children, config);
            (
                current.insert(slot),
                Transition::Replace {
                    previous: previous_name,
                },
            )
        }
        None => {
            log::debug!("initializing `{widget}`");
            let slot = WidgetSlot::create(parent, widget.clone(), props, children, config);
            (current.insert(slot), Transition::Initialize)
        }
    }
}
