use std::fmt;

use crate::value::WidgetName;

/// Failure raised by script code: a widget's initial state, a callback, or
/// a function invoked on behalf of a leaf widget.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ScriptError {
    pub message: String,
    pub expression: Option<String>,
}

impl ScriptError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expression: None,
        }
    }

    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorPhase {
    OnCreate,
    Callback,
}

impl ErrorPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorPhase::OnCreate => "on_create",
            ErrorPhase::Callback => "callback",
        }
    }
}

impl fmt::Display for ErrorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Displayable replacement for a widget that failed. Produced instead of
/// unwinding into the surrounding tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{phase}: {error}")]
pub struct RenderError {
    pub phase: ErrorPhase,
    pub expression: Option<String>,
    pub error: ScriptError,
}

impl RenderError {
    pub fn on_create(error: ScriptError) -> Self {
        Self {
            phase: ErrorPhase::OnCreate,
            expression: None,
            error,
        }
    }
}

/// Inconsistency in the hosting layer itself. These propagate out of
/// [`WidgetHost::render`](crate::WidgetHost::render).
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("no widget registered under `{0}`")]
    UnknownWidget(WidgetName),
    #[error("rendering `{widget}` failed")]
    Render {
        widget: WidgetName,
        #[source]
        source: ScriptError,
    },
}
