use std::borrow::Cow;

/// Children are exposed to a widget body under this binding unless
/// configured otherwise.
pub const DEFAULT_CHILDREN_BINDING: &str = "children";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostConfig {
    pub children_binding: Cow<'static, str>,
}

impl HostConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children_binding(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.children_binding = name.into();
        self
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            children_binding: Cow::Borrowed(DEFAULT_CHILDREN_BINDING),
        }
    }
}
