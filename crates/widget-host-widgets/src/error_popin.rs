use widget_host_core::{ErrorPhase, LastError, RenderError, ScriptError};

/// Dismissible view of a widget's last callback error.
#[derive(Clone, Debug, Default)]
pub struct ErrorPopin {
    last_error: LastError,
}

impl ErrorPopin {
    pub fn new(last_error: LastError) -> Self {
        Self { last_error }
    }

    pub fn is_visible(&self) -> bool {
        self.last_error.is_set()
    }

    pub fn error(&self) -> Option<ScriptError> {
        self.last_error.get()
    }

    /// The error as a displayable node.
    pub fn render_error(&self) -> Option<RenderError> {
        self.last_error.get().map(|error| RenderError {
            phase: ErrorPhase::Callback,
            expression: error.expression.clone(),
            error,
        })
    }

    pub fn dismiss(&self) {
        if let Some(error) = self.last_error.dismiss() {
            log::trace!("dismissed callback error: {error}");
        }
    }
}
