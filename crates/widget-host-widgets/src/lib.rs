//! Interactive leaf widgets.
//!
//! Each widget keeps its own [`LastError`](widget_host_core::LastError):
//! failures of its callbacks are shown next to it and never reach the
//! widget host.

mod checkbox;
mod docs;
mod error_popin;
mod input;
mod pager;
mod select;

pub use checkbox::CheckBox;
pub use docs::WidgetDocumentation;
pub use error_popin::ErrorPopin;
pub use input::{InputProps, LeafEnv};
pub use pager::{max_page, page_window, ButtonState, Pager, PagerAction, PagerView};
pub use select::{Select, SelectOption, SelectView};

#[cfg(test)]
#[path = "tests/pager_tests.rs"]
mod pager_tests;
