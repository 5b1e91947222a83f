use std::any::Any;

use widget_host_core::{
    spawn_callback, CallbackContext, InstanceToken, LastError, Props, RuntimeHandle, ScriptError,
    SpawnError, Value,
};

/// Props shared by every input widget.
#[derive(Clone, Debug)]
pub struct InputProps<T> {
    /// Binding the widget writes its value into.
    pub bind_to: Option<Value>,
    /// Function called with the new value.
    pub on_change: Option<Value>,
    pub value: Option<T>,
    pub disabled: bool,
}

impl<T> Default for InputProps<T> {
    fn default() -> Self {
        Self {
            bind_to: None,
            on_change: None,
            value: None,
            disabled: false,
        }
    }
}

impl<T: Any + Clone> InputProps<T> {
    /// Reads `bindTo`, `onChange`, `value` and `disabled` from script props.
    pub fn from_props(props: &Props) -> Self {
        let defined = |name: &str| props.get(name).filter(|value| !value.is_undefined()).cloned();
        Self {
            bind_to: defined("bindTo"),
            on_change: defined("onChange"),
            value: props
                .get("value")
                .and_then(|value| value.downcast_ref::<T>())
                .cloned(),
            disabled: props
                .get("disabled")
                .and_then(|value| value.downcast_ref::<bool>())
                .copied()
                .unwrap_or(false),
        }
    }
}

/// What a leaf widget needs from the instance that rendered it.
#[derive(Clone)]
pub struct LeafEnv<C> {
    pub context: C,
    pub runtime: RuntimeHandle,
    pub instance: InstanceToken,
}

impl<C: CallbackContext> LeafEnv<C> {
    pub fn new(context: C, runtime: RuntimeHandle, instance: InstanceToken) -> Self {
        Self {
            context,
            runtime,
            instance,
        }
    }

    /// Calls `on_change` with `args` in the background. Failures land in
    /// `last_error`.
    pub(crate) fn notify(
        &self,
        on_change: Option<&Value>,
        args: Vec<Value>,
        last_error: &LastError,
    ) -> Result<(), SpawnError> {
        let Some(function) = on_change else {
            return Ok(());
        };
        let call = self.context.call_function_async(function, args);
        spawn_callback(
            &self.runtime,
            self.instance.clone(),
            last_error.clone(),
            async move {
                call.await?;
                Ok::<(), ScriptError>(())
            },
        )
    }
}
