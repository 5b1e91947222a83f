use super::*;
use std::rc::Rc;

#[test]
fn clones_are_the_same_value() {
    let step = Value::new(1i64);
    let copy = step.clone();
    assert!(step.same(&copy));
    assert_eq!(copy.downcast_ref::<i64>(), Some(&1));
}

#[test]
fn equal_contents_in_new_allocations_are_different_values() {
    let first = Value::new(String::from("he"));
    let second = Value::new(String::from("he"));
    assert!(!first.same(&second));
}

#[test]
fn undefined_is_only_the_same_as_undefined() {
    assert!(Value::Undefined.same(&Value::default()));
    assert!(!Value::Undefined.same(&Value::new(())));
}

#[test]
fn from_rc_keeps_the_allocation() {
    let shared = Rc::new(vec![1u8, 2, 3]);
    let a = Value::from_rc(Rc::clone(&shared));
    let b = Value::from_rc(shared);
    assert!(a.same(&b));
}

#[test]
fn props_keep_insertion_order() {
    let props = Props::new()
        .with("zeta", Value::new(1i64))
        .with("alpha", Value::new(2i64))
        .with("mid", Value::new(3i64));
    let names: Vec<&str> = props.names().collect();
    assert_eq!(names, ["zeta", "alpha", "mid"]);
}

#[test]
fn widget_names_compare_by_content() {
    assert_eq!(WidgetName::from("counter"), WidgetName::new(String::from("counter")));
    assert_ne!(WidgetName::from("counter"), WidgetName::from("timer"));
}
