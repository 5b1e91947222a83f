use std::rc::Rc;

use widget_host_core::{CallbackContext, LastError, Props, SpawnError, Value};

use crate::docs::WidgetDocumentation;
use crate::error_popin::ErrorPopin;
use crate::input::{InputProps, LeafEnv};

/// Script strings arrive as `String` or `&'static str`.
fn text_of(value: &Value) -> Option<&str> {
    value
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| value.downcast_ref::<&'static str>().copied())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: Rc<str>,
    pub label: Rc<str>,
}

impl SelectOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: Rc::from(value),
            label: Rc::from(label),
        }
    }

    /// Accepts a plain string, used as both value and label, or a
    /// `SelectOption`.
    pub fn from_value(value: &Value) -> Option<Self> {
        if let Some(option) = value.downcast_ref::<SelectOption>() {
            return Some(option.clone());
        }
        text_of(value).map(SelectOption::from)
    }
}

impl From<&str> for SelectOption {
    fn from(value: &str) -> Self {
        let value: Rc<str> = Rc::from(value);
        Self {
            label: Rc::clone(&value),
            value,
        }
    }
}

/// What the themed select displays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectView {
    pub options: Vec<SelectOption>,
    /// An empty entry is shown first, before `options`.
    pub show_empty: bool,
    pub value: Rc<str>,
    pub placeholder: Option<Rc<str>>,
    pub disabled: bool,
}

/// Picks a string value from a fixed list.
pub struct Select<C> {
    env: LeafEnv<C>,
    input: InputProps<String>,
    options: Vec<SelectOption>,
    placeholder: Option<Rc<str>>,
    last_error: LastError,
}

impl<C: CallbackContext> Select<C> {
    pub fn new(env: LeafEnv<C>, input: InputProps<String>, options: Vec<SelectOption>) -> Self {
        Self {
            env,
            input,
            options,
            placeholder: None,
            last_error: LastError::new(),
        }
    }

    /// Reads `options` and `placeholder` along with the input props.
    /// Entries that are neither strings nor options are skipped.
    /// Text props may be `String` or `&'static str`.
    pub fn from_props(env: LeafEnv<C>, props: &Props) -> Self {
        let options = props
            .get("options")
            .and_then(Value::as_list)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let option = SelectOption::from_value(entry);
                        if option.is_none() {
                            log::warn!("skipping select option {entry:?}");
                        }
                        option
                    })
                    .collect()
            })
            .unwrap_or_default();
        let text = |name: &str| props.get(name).and_then(text_of);
        let mut input = InputProps::<String>::from_props(props);
        input.value = text("value").map(str::to_owned);
        let placeholder: Option<Rc<str>> = text("placeholder").map(Rc::from);
        let mut select = Self::new(env, input, options);
        select.placeholder = placeholder;
        select
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(Rc::from(placeholder));
        self
    }

    /// True when the current value is absent or not among the options.
    pub fn show_empty(&self) -> bool {
        match &self.input.value {
            None => true,
            Some(value) => !self
                .options
                .iter()
                .any(|option| *option.value == **value),
        }
    }

    pub fn view(&self) -> SelectView {
        SelectView {
            options: self.options.clone(),
            show_empty: self.show_empty(),
            value: Rc::from(self.input.value.as_deref().unwrap_or("")),
            placeholder: self.placeholder.clone(),
            disabled: self.input.disabled,
        }
    }

    /// Option at a displayed index, which counts the empty entry when it
    /// is shown.
    fn option_at(&self, index: usize) -> Option<&SelectOption> {
        let index = if self.show_empty() {
            index.checked_sub(1)?
        } else {
            index
        };
        self.options.get(index)
    }

    /// Calls `onChange` with the value of the option at displayed `index`.
    pub fn handle_change(&self, index: usize) -> Result<(), SpawnError> {
        if self.input.disabled {
            log::trace!("ignoring change of disabled select");
            return Ok(());
        }
        let Some(option) = self.option_at(index) else {
            log::warn!(
                "select index {index} does not name one of {} options",
                self.options.len()
            );
            return Ok(());
        };
        self.env.notify(
            self.input.on_change.as_ref(),
            vec![Value::new(option.value.to_string())],
            &self.last_error,
        )
    }

    pub fn error_popin(&self) -> ErrorPopin {
        ErrorPopin::new(self.last_error.clone())
    }

    pub fn documentation() -> WidgetDocumentation {
        WidgetDocumentation::new("Pick a string value from a predefined list")
            .prop(
                "options",
                "List of all possible values as string | {value: string, label: string}",
            )
            .prop("placeholder", "Message to show when the widget is empty")
            .input_props()
    }
}
