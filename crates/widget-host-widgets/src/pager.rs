use widget_host_core::{CallbackContext, LastError, Props, SpawnError, Value};

use crate::docs::WidgetDocumentation;
use crate::error_popin::ErrorPopin;
use crate::input::{InputProps, LeafEnv};

/// Pages shown on each side of the current one.
const WINDOW_REACH: u32 = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PagerAction {
    First,
    Previous,
    Next,
    Last,
    Page(u32),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Enabled,
    Disabled,
}

impl ButtonState {
    fn disabled_if(condition: bool) -> Self {
        if condition {
            ButtonState::Disabled
        } else {
            ButtonState::Enabled
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PagerView {
    pub first_state: ButtonState,
    pub previous_state: ButtonState,
    pub next_state: ButtonState,
    pub last_state: ButtonState,
    /// Page numbers to offer, ascending.
    pub values: Vec<u32>,
    pub value: u32,
    pub disabled: bool,
}

/// Number of pages needed for `max` elements. Never below one.
pub fn max_page(max: u32, per_page: u32) -> u32 {
    if per_page == 0 {
        return 1;
    }
    max.div_ceil(per_page).max(1)
}

/// Up to seven consecutive pages around `current`, clamped to
/// `1..=max_page`.
pub fn page_window(current: u32, max_page: u32) -> Vec<u32> {
    let mut first = current.saturating_sub(WINDOW_REACH).max(1);
    let last = first
        .saturating_add(WINDOW_REACH * 2)
        .min(max_page);
    first = last.saturating_sub(WINDOW_REACH * 2).max(1);
    (first..=last).collect()
}

fn read_count(props: &Props, name: &str) -> Option<u32> {
    let value = props.get(name)?;
    if let Some(count) = value.downcast_ref::<u32>() {
        return Some(*count);
    }
    if let Some(count) = value.downcast_ref::<i64>() {
        return u32::try_from(*count).ok();
    }
    value
        .downcast_ref::<f64>()
        .filter(|count| count.is_finite() && **count >= 0.0)
        .map(|count| *count as u32)
}

/// Page selector for a paginated data source.
pub struct Pager<C> {
    env: LeafEnv<C>,
    input: InputProps<u32>,
    max: u32,
    per_page: u32,
    last_error: LastError,
}

impl<C: CallbackContext> Pager<C> {
    pub fn new(env: LeafEnv<C>, input: InputProps<u32>, max: u32, per_page: u32) -> Self {
        Self {
            env,
            input,
            max,
            per_page,
            last_error: LastError::new(),
        }
    }

    /// Reads `max`, `perPage` and the current page from script props.
    /// Numbers may be integers or floats.
    pub fn from_props(env: LeafEnv<C>, props: &Props) -> Self {
        let mut input = InputProps::<u32>::from_props(props);
        input.value = read_count(props, "value");
        let max = read_count(props, "max").unwrap_or(0);
        let per_page = read_count(props, "perPage").unwrap_or(0);
        Self::new(env, input, max, per_page)
    }

    pub fn current_page(&self) -> u32 {
        self.input.value.unwrap_or(1)
    }

    pub fn max_page(&self) -> u32 {
        max_page(self.max, self.per_page)
    }

    pub fn view(&self) -> PagerView {
        let current = self.current_page();
        let max_page = self.max_page();
        PagerView {
            first_state: ButtonState::disabled_if(current == 1),
            previous_state: ButtonState::disabled_if(current == 1),
            next_state: ButtonState::disabled_if(current == max_page),
            last_state: ButtonState::disabled_if(current == max_page),
            values: page_window(current, max_page),
            value: current,
            disabled: self.input.disabled,
        }
    }

    pub fn target_page(&self, action: PagerAction) -> u32 {
        let current = self.current_page();
        let max_page = self.max_page();
        match action {
            PagerAction::First => 1,
            PagerAction::Previous => current.saturating_sub(1).max(1),
            PagerAction::Next => current.saturating_add(1).min(max_page),
            PagerAction::Last => max_page,
            PagerAction::Page(page) => page,
        }
    }

    /// Calls `onChange` with the page `action` leads to.
    pub fn handle(&self, action: PagerAction) -> Result<(), SpawnError> {
        if self.input.disabled {
            log::trace!("ignoring {action:?} on disabled pager");
            return Ok(());
        }
        let page = self.target_page(action);
        self.env.notify(
            self.input.on_change.as_ref(),
            vec![Value::new(page)],
            &self.last_error,
        )
    }

    pub fn error_popin(&self) -> ErrorPopin {
        ErrorPopin::new(self.last_error.clone())
    }

    pub fn documentation() -> WidgetDocumentation {
        WidgetDocumentation::new("Select a page in a paginated data source")
            .prop("max", "Maximum page number")
            .prop("perPage", "Elements fetched per page")
            .input_props()
    }
}
