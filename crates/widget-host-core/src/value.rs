use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Dynamically typed handle to a script value.
///
/// Cloning a `Value` shares the underlying allocation. Two values are the
/// [`same`](Value::same) only when they point at the same allocation: the host
/// never looks inside a value to decide whether it changed. Callers are
/// expected to hand back the previous handle for content that did not change
/// and to allocate a new one when it did.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Shared(Rc<dyn Any>),
}

impl Value {
    pub fn new<T: Any>(value: T) -> Self {
        Value::Shared(Rc::new(value))
    }

    pub fn from_rc<T: Any>(value: Rc<T>) -> Self {
        Value::Shared(value)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Reference identity. `Undefined` is the same as `Undefined`.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Shared(a), Value::Shared(b)) => {
                // Compare the data pointers only; vtables may be duplicated across codegen units.
                std::ptr::eq(
                    Rc::as_ptr(a) as *const (),
                    Rc::as_ptr(b) as *const (),
                )
            }
            _ => false,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Undefined => None,
            Value::Shared(inner) => inner.downcast_ref::<T>(),
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        self.downcast_ref::<Vec<Value>>().map(Vec::as_slice)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("Undefined"),
            Value::Shared(inner) => {
                if let Some(text) = inner.downcast_ref::<String>() {
                    write!(f, "Value({text:?})")
                } else if let Some(text) = inner.downcast_ref::<&'static str>() {
                    write!(f, "Value({text:?})")
                } else if let Some(number) = inner.downcast_ref::<i64>() {
                    write!(f, "Value({number})")
                } else if let Some(number) = inner.downcast_ref::<f64>() {
                    write!(f, "Value({number})")
                } else if let Some(flag) = inner.downcast_ref::<bool>() {
                    write!(f, "Value({flag})")
                } else if let Some(list) = inner.downcast_ref::<Vec<Value>>() {
                    f.debug_tuple("Value").field(list).finish()
                } else {
                    write!(f, "Value({:p})", Rc::as_ptr(inner) as *const ())
                }
            }
        }
    }
}

/// Name of a widget definition. Two placements are the same logical
/// instance while their names are equal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetName(Rc<str>);

impl WidgetName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Rc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WidgetName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for WidgetName {
    fn from(name: String) -> Self {
        Self(Rc::from(name))
    }
}

impl AsRef<str> for WidgetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for WidgetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WidgetName({:?})", &*self.0)
    }
}

impl fmt::Display for WidgetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
