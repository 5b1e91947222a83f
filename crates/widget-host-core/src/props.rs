use std::rc::Rc;

use indexmap::IndexMap;

use crate::collections::map::RandomState;
use crate::value::Value;

/// Ordered child nodes handed to a widget placement.
pub type Children = Vec<Value>;

/// Named inputs of a widget placement, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct Props {
    entries: IndexMap<Rc<str>, Value, RandomState>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl AsRef<str>, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts `value` under `name`, returning the value it replaced.
    pub fn insert(&mut self, name: impl AsRef<str>, value: Value) -> Option<Value> {
        self.entries.insert(Rc::from(name.as_ref()), value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (&**name, value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|name| &**name)
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&Rc<str>, &Value)> {
        self.entries.iter()
    }
}

impl<K: AsRef<str>> FromIterator<(K, Value)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (name, value) in iter {
            props.insert(name, value);
        }
        props
    }
}
