/// Help text shown for a widget in the editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetDocumentation {
    pub description: &'static str,
    pub props: Vec<(&'static str, &'static str)>,
}

impl WidgetDocumentation {
    pub fn new(description: &'static str) -> Self {
        Self {
            description,
            props: Vec::new(),
        }
    }

    pub fn prop(mut self, name: &'static str, help: &'static str) -> Self {
        self.props.push((name, help));
        self
    }

    /// Adds the props every input widget accepts.
    pub fn input_props(self) -> Self {
        self.prop("bindTo", "Variable the value is written to")
            .prop("onChange", "Function called with the new value")
            .prop("value", "Value to display when not bound")
    }

    pub fn help(&self, name: &str) -> Option<&'static str> {
        self.props
            .iter()
            .find(|(prop, _)| *prop == name)
            .map(|(_, help)| *help)
    }
}
