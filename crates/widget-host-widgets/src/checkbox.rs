use widget_host_core::{CallbackContext, LastError, SpawnError, Value};

use crate::docs::WidgetDocumentation;
use crate::error_popin::ErrorPopin;
use crate::input::{InputProps, LeafEnv};

/// Boolean input, optionally bound to a script variable.
pub struct CheckBox<C> {
    env: LeafEnv<C>,
    input: InputProps<bool>,
    last_error: LastError,
}

impl<C: CallbackContext> CheckBox<C> {
    pub fn new(env: LeafEnv<C>, input: InputProps<bool>) -> Self {
        Self {
            env,
            input,
            last_error: LastError::new(),
        }
    }

    /// Replaces the props, keeping the error state.
    pub fn update_input(&mut self, input: InputProps<bool>) {
        self.input = input;
    }

    pub fn checked(&self) -> bool {
        match &self.input.bind_to {
            Some(target) => self
                .env
                .context
                .evaluate_or(target, Value::new(false))
                .downcast_ref::<bool>()
                .copied()
                .unwrap_or(false),
            None => self.input.value.unwrap_or(false),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.input.disabled
    }

    /// Writes `checked` into the bound variable, then calls `onChange`.
    pub fn handle_change(&self, checked: bool) -> Result<(), SpawnError> {
        if self.input.disabled {
            log::trace!("ignoring change of disabled checkbox");
            return Ok(());
        }
        if let Some(target) = &self.input.bind_to {
            if let Err(error) = self.env.context.set_value(target, Value::new(checked)) {
                self.last_error.set(error);
                return Ok(());
            }
        }
        self.env.notify(
            self.input.on_change.as_ref(),
            vec![Value::new(checked)],
            &self.last_error,
        )
    }

    pub fn error_popin(&self) -> ErrorPopin {
        ErrorPopin::new(self.last_error.clone())
    }

    pub fn documentation() -> WidgetDocumentation {
        WidgetDocumentation::new("A checkbox to input a boolean value")
            .prop("disabled", "Do not allow changing the value")
            .input_props()
    }
}
