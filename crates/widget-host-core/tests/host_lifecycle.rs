use std::cell::Cell;
use std::rc::Rc;

use widget_host_core::{
    ChildrenChange, ErrorPhase, EvalContext, HostConfig, HostError, HostNode, Props, ScriptError,
    Transition, UpdateReport, Value,
};
use widget_host_testing::{
    count_binding_sets, count_cleanups, count_creations, count_renders, ContextEvent,
    WidgetHostTestRule,
};

fn rule_with_widgets() -> WidgetHostTestRule {
    let mut rule = WidgetHostTestRule::new();
    rule.register("counter", |ctx| {
        let step = ctx.binding("step").unwrap_or_default();
        Ok(vec![Some(step)])
    });
    rule.register("timer", |_| Ok(vec![Some(Value::new("tick"))]));
    rule
}

fn rendered(node: &HostNode) -> &[Value] {
    node.nodes().expect("rendered output")
}

#[test]
fn initialize_seeds_props_and_children() {
    let mut rule = rule_with_widgets();
    let child = Value::new("child");
    let node = rule
        .render(
            "counter",
            Props::new().with("step", Value::new(1i64)),
            vec![child.clone()],
        )
        .expect("render");

    let scope = rule.current_scope().expect("active");
    assert_eq!(
        rule.events(),
        vec![
            ContextEvent::Created {
                scope,
                parent: 0,
                bindings: vec!["step".to_string(), "children".to_string()],
            },
            ContextEvent::Rendered {
                scope,
                widget: "counter".into(),
            },
            ContextEvent::FullyCreated { scope },
        ]
    );
    let children = rule
        .engine()
        .binding(scope, "children")
        .expect("children bound");
    let list = children.as_list().expect("list");
    assert!(list[0].same(&child));
    assert_eq!(rendered(&node).len(), 1);
    assert_eq!(rule.host().last_transition(), Some(&Transition::Initialize));
}

#[test]
fn unchanged_inputs_push_nothing() {
    let mut rule = rule_with_widgets();
    let step = Value::new(1i64);
    let child = Value::new("a");
    rule.render(
        "counter",
        Props::new().with("step", step.clone()),
        vec![child.clone()],
    )
    .expect("first pass");
    rule.take_events();

    for _ in 0..3 {
        rule.render(
            "counter",
            Props::new().with("step", step.clone()),
            vec![child.clone()],
        )
        .expect("repeat pass");
    }

    let events = rule.take_events();
    assert_eq!(count_binding_sets(&events), 0);
    assert_eq!(count_cleanups(&events), 0);
    assert_eq!(count_creations(&events), 0);
    assert_eq!(count_renders(&events), 3);
    assert_eq!(
        rule.host().last_transition(),
        Some(&Transition::Update(UpdateReport {
            props_pushed: 0,
            children: ChildrenChange::Unchanged,
        }))
    );
}

#[test]
fn one_changed_prop_is_pushed_alone() {
    let mut rule = rule_with_widgets();
    let label = Value::new("steps");
    rule.render(
        "counter",
        Props::new()
            .with("label", label.clone())
            .with("step", Value::new(1i64)),
        Vec::new(),
    )
    .expect("first pass");
    let scope = rule.current_scope().expect("active");
    rule.take_events();

    let step = Value::new(2i64);
    rule.render(
        "counter",
        Props::new()
            .with("label", label)
            .with("step", step.clone()),
        Vec::new(),
    )
    .expect("second pass");

    let events = rule.take_events();
    let sets: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, ContextEvent::BindingSet { .. }))
        .collect();
    assert_eq!(
        sets,
        [&ContextEvent::BindingSet {
            scope,
            name: "step".to_string(),
        }]
    );
    let slot = rule.host().slot().expect("active");
    assert!(slot.last_props().get("step").expect("step").same(&step));
}

#[test]
fn pushes_happen_before_the_render() {
    let mut rule = rule_with_widgets();
    rule.render(
        "counter",
        Props::new().with("step", Value::new(1i64)),
        Vec::new(),
    )
    .expect("first pass");
    rule.take_events();

    rule.render(
        "counter",
        Props::new().with("step", Value::new(5i64)),
        vec![Value::new("new child")],
    )
    .expect("second pass");

    let events = rule.take_events();
    let render_at = events
        .iter()
        .position(|event| matches!(event, ContextEvent::Rendered { .. }))
        .expect("rendered");
    assert_eq!(count_binding_sets(&events[..render_at]), 2);
    assert_eq!(count_binding_sets(&events[render_at..]), 0);
}

#[test]
fn children_length_change_pushes_once() {
    let mut rule = rule_with_widgets();
    let props = Props::new();
    rule.render("counter", props.clone(), vec![Value::new("a")])
        .expect("first pass");
    rule.take_events();

    let grown: Vec<Value> = (0..5).map(|i| Value::new(i as i64)).collect();
    rule.render("counter", props.clone(), grown.clone())
        .expect("second pass");
    let events = rule.take_events();
    assert_eq!(count_binding_sets(&events), 1);

    let slot = rule.host().slot().expect("active");
    assert_eq!(slot.last_children().len(), 5);
    assert!(slot.last_children()[4].same(&grown[4]));

    // Snapshot was refreshed, so the same list again is a no-op.
    rule.render("counter", props, grown).expect("third pass");
    assert_eq!(count_binding_sets(&rule.take_events()), 0);
}

#[test]
fn children_difference_pushes_once_wherever_it_starts() {
    for first_difference in 0..4 {
        let mut rule = rule_with_widgets();
        let original: Vec<Value> = (0..4).map(|i| Value::new(i as i64)).collect();
        rule.render("counter", Props::new(), original.clone())
            .expect("first pass");
        rule.take_events();

        let mut next = original.clone();
        for entry in next.iter_mut().skip(first_difference) {
            *entry = Value::new(99i64);
        }
        rule.render("counter", Props::new(), next).expect("second pass");

        let events = rule.take_events();
        assert_eq!(count_binding_sets(&events), 1, "difference at {first_difference}");
        assert_eq!(
            rule.host().last_transition(),
            Some(&Transition::Update(UpdateReport {
                props_pushed: 0,
                children: ChildrenChange::Replaced {
                    index: first_difference
                },
            }))
        );
    }
}

#[test]
fn identity_change_cleans_up_before_creating() {
    let mut rule = rule_with_widgets();
    let destroyed = Rc::new(Cell::new(0));
    let counter = Rc::clone(&destroyed);
    rule.engine().on_create(move |ctx, _| {
        let counter = Rc::clone(&counter);
        ctx.register_destructor(move || counter.set(counter.get() + 1));
        Ok(())
    });

    let step = Value::new(1i64);
    rule.render("counter", Props::new().with("step", step.clone()), Vec::new())
        .expect("first pass");
    let old_scope = rule.current_scope().expect("active");
    let old_token = rule.host().instance().cloned().expect("token");
    rule.take_events();

    rule.render("timer", Props::new().with("step", step), Vec::new())
        .expect("second pass");
    let new_scope = rule.current_scope().expect("active");
    let events = rule.take_events();

    assert_ne!(old_scope, new_scope);
    assert_eq!(destroyed.get(), 1);
    assert!(!old_token.is_active());
    assert_eq!(
        events[0],
        ContextEvent::CleanedUp { scope: old_scope }
    );
    assert_eq!(
        events[1],
        ContextEvent::Created {
            scope: new_scope,
            parent: 0,
            bindings: vec!["step".to_string(), "children".to_string()],
        }
    );
    assert_eq!(count_cleanups(&events), 1);
    assert_eq!(count_binding_sets(&events), 0);
    assert_eq!(rule.engine().live_children(), 1);
    assert_eq!(
        rule.host().last_transition(),
        Some(&Transition::Replace {
            previous: "counter".into()
        })
    );
}

#[test]
fn repeated_identity_churn_never_leaves_two_live_contexts() {
    let mut rule = rule_with_widgets();
    for pass in 0..10 {
        let widget = if pass % 2 == 0 { "counter" } else { "timer" };
        rule.render(widget, Props::new(), Vec::new()).expect("pass");
        assert_eq!(rule.engine().live_children(), 1);
    }
    assert_eq!(count_cleanups(&rule.events()), 9);
}

#[test]
fn creation_error_short_circuits_rendering() {
    let mut rule = rule_with_widgets();
    rule.engine()
        .fail_next_creation(ScriptError::new("division by zero"));

    let node = rule
        .render("counter", Props::new(), Vec::new())
        .expect("host does not fail");
    let error = node.error().expect("error node");
    assert_eq!(error.phase, ErrorPhase::OnCreate);
    assert_eq!(error.phase.to_string(), "on_create");
    assert_eq!(error.expression, None);
    assert_eq!(error.error.message, "division by zero");

    let events = rule.events();
    assert_eq!(count_renders(&events), 0);
    assert!(!events
        .iter()
        .any(|event| matches!(event, ContextEvent::FullyCreated { .. })));

    // Same instance stays in error; a new identity starts over.
    let again = rule
        .render("counter", Props::new(), Vec::new())
        .expect("host does not fail");
    assert!(again.error().is_some());
    let healthy = rule
        .render("timer", Props::new(), Vec::new())
        .expect("host does not fail");
    assert_eq!(rendered(&healthy).len(), 1);
}

#[test]
fn null_entries_are_discarded() {
    let mut rule = WidgetHostTestRule::new();
    let kept = Value::new("kept");
    let output = kept.clone();
    rule.register("sparse", move |_| {
        Ok(vec![None, Some(output.clone()), None, None])
    });
    rule.register("empty", |_| Ok(vec![None, None]));

    let node = rule.render("sparse", Props::new(), Vec::new()).expect("render");
    assert_eq!(rendered(&node).len(), 1);
    assert!(rendered(&node)[0].same(&kept));

    let node = rule.render("empty", Props::new(), Vec::new()).expect("render");
    assert!(rendered(&node).is_empty());
}

#[test]
fn fully_created_is_signalled_once_after_first_successful_render() {
    let mut rule = rule_with_widgets();
    rule.render("counter", Props::new(), Vec::new()).expect("first");
    rule.render("counter", Props::new(), Vec::new()).expect("second");
    let scope = rule.current_scope().expect("active");
    let marks = rule
        .events()
        .into_iter()
        .filter(|event| *event == ContextEvent::FullyCreated { scope })
        .count();
    assert_eq!(marks, 1);
    assert!(rule.engine().is_fully_created(scope));
}

#[test]
fn hosting_errors_propagate() {
    let mut rule = rule_with_widgets();
    rule.register("broken", |_| Err(ScriptError::new("invoker bug")));

    let missing = rule.render("nowhere", Props::new(), Vec::new());
    assert!(matches!(missing, Err(HostError::UnknownWidget(name)) if name.as_str() == "nowhere"));

    let broken = rule.render("broken", Props::new(), Vec::new());
    match broken {
        Err(HostError::Render { widget, source }) => {
            assert_eq!(widget.as_str(), "broken");
            assert_eq!(source.message, "invoker bug");
        }
        other => panic!("expected render error, got {other:?}"),
    }
    let scope = rule.current_scope().expect("slot survives");
    assert!(!rule.engine().is_fully_created(scope));
}

#[test]
fn removed_prop_is_cleared_in_the_context() {
    let mut rule = rule_with_widgets();
    let step = Value::new(1i64);
    rule.render(
        "counter",
        Props::new()
            .with("step", step.clone())
            .with("max", Value::new(10i64)),
        Vec::new(),
    )
    .expect("first pass");
    let scope = rule.current_scope().expect("active");
    rule.take_events();

    rule.render("counter", Props::new().with("step", step), Vec::new())
        .expect("second pass");
    assert_eq!(count_binding_sets(&rule.take_events()), 1);
    assert!(rule
        .engine()
        .binding(scope, "max")
        .is_some_and(|value| value.is_undefined()));
    let slot = rule.host().slot().expect("active");
    assert!(!slot.last_props().contains("max"));
}

#[test]
fn unmount_runs_cleanup_once() {
    let mut rule = rule_with_widgets();
    rule.render("counter", Props::new(), Vec::new()).expect("render");
    let scope = rule.current_scope().expect("active");
    rule.unmount();
    rule.unmount();
    assert!(!rule.host().is_active());
    assert!(rule.engine().is_cleaned_up(scope));
    assert_eq!(count_cleanups(&rule.events()), 1);
}

#[test]
fn dropping_the_host_runs_cleanup() {
    let engine = {
        let mut rule = rule_with_widgets();
        rule.render("counter", Props::new(), Vec::new()).expect("render");
        rule.engine().clone()
    };
    assert_eq!(count_cleanups(&engine.events()), 1);
    assert_eq!(engine.live_children(), 0);
}

#[test]
fn custom_children_binding() {
    let mut rule =
        WidgetHostTestRule::with_config(HostConfig::new().with_children_binding("slots"));
    rule.register("card", |ctx| Ok(vec![ctx.binding("slots")]));
    let node = rule
        .render("card", Props::new(), vec![Value::new("a")])
        .expect("render");
    assert!(rendered(&node)[0].as_list().is_some());
}

#[test]
fn counter_then_timer_scenario() {
    let mut rule = rule_with_widgets();
    let step_one = Value::new(1i64);

    rule.render("counter", Props::new().with("step", step_one.clone()), Vec::new())
        .expect("pass 1");
    let first = rule.take_events();
    assert_eq!(count_creations(&first), 1);
    let slot = rule.host().slot().expect("active");
    assert!(slot.last_props().get("step").expect("step").same(&step_one));

    rule.render("counter", Props::new().with("step", step_one.clone()), Vec::new())
        .expect("pass 2");
    assert_eq!(count_binding_sets(&rule.take_events()), 0);

    let step_two = Value::new(2i64);
    rule.render("counter", Props::new().with("step", step_two.clone()), Vec::new())
        .expect("pass 3");
    let third = rule.take_events();
    assert_eq!(count_binding_sets(&third), 1);
    let slot = rule.host().slot().expect("active");
    assert!(slot.last_props().get("step").expect("step").same(&step_two));

    let node = rule
        .render("timer", Props::new().with("step", step_two), Vec::new())
        .expect("pass 4");
    let fourth = rule.take_events();
    assert_eq!(count_cleanups(&fourth), 1);
    assert_eq!(count_creations(&fourth), 1);
    assert_eq!(rule.host().identity().map(|name| name.as_str()), Some("timer"));
    assert_eq!(rendered(&node)[0].downcast_ref::<&str>(), Some(&"tick"));
}

#[test]
fn replace_parents_new_context_on_enclosing_context_of_that_pass() {
    let mut rule = rule_with_widgets();
    let outer_a = rule.root().create_child(Props::new());
    let outer_b = rule.root().create_child(Props::new());

    rule.render_in(&outer_a, "counter", Props::new(), Vec::new())
        .expect("first pass");
    let first = rule.current_scope().expect("active");
    assert_eq!(rule.engine().parent_of(first), Some(outer_a.scope()));
    rule.take_events();

    rule.render_in(&outer_b, "timer", Props::new(), Vec::new())
        .expect("replace pass");
    let second = rule.current_scope().expect("active");
    let events = rule.take_events();
    assert_eq!(events[0], ContextEvent::CleanedUp { scope: first });
    assert_eq!(
        events[1],
        ContextEvent::Created {
            scope: second,
            parent: outer_b.scope(),
            bindings: vec!["children".to_owned()],
        }
    );
}

#[test]
fn update_under_another_enclosing_context_keeps_the_context() {
    let mut rule = rule_with_widgets();
    let outer_a = rule.root().create_child(Props::new());
    let outer_b = rule.root().create_child(Props::new());

    rule.render_in(&outer_a, "counter", Props::new(), Vec::new())
        .expect("first pass");
    let scope = rule.current_scope().expect("active");
    rule.take_events();

    rule.render_in(
        &outer_b,
        "counter",
        Props::new().with("step", Value::new(2i64)),
        Vec::new(),
    )
    .expect("update pass");
    let events = rule.take_events();
    assert_eq!(count_creations(&events), 0);
    assert_eq!(count_cleanups(&events), 0);
    assert_eq!(rule.current_scope(), Some(scope));
    assert_eq!(rule.engine().parent_of(scope), Some(outer_a.scope()));
}

#[test]
fn prop_arriving_undefined_is_not_pushed() {
    let mut rule = rule_with_widgets();
    rule.render("counter", Props::new(), Vec::new())
        .expect("first pass");
    rule.take_events();

    let node = rule
        .render(
            "counter",
            Props::new().with("step", Value::Undefined),
            Vec::new(),
        )
        .expect("second pass");
    assert!(node.error().is_none());
    assert_eq!(count_binding_sets(&rule.take_events()), 0);
    assert_eq!(
        rule.host().last_transition(),
        Some(&Transition::Update(UpdateReport {
            props_pushed: 0,
            children: ChildrenChange::Unchanged,
        }))
    );
}

#[test]
fn creation_error_is_reattempted_after_inputs_change() {
    let mut rule = rule_with_widgets();
    rule.engine()
        .fail_next_creation(ScriptError::new("not ready"));

    let node = rule
        .render("counter", Props::new(), Vec::new())
        .expect("first pass");
    assert!(node.error().is_some());
    let scope = rule.current_scope().expect("active");

    let node = rule
        .render(
            "counter",
            Props::new().with("step", Value::new(1i64)),
            Vec::new(),
        )
        .expect("second pass");
    assert_eq!(rule.current_scope(), Some(scope));
    assert_eq!(rendered(&node).len(), 1);
    assert!(rule.engine().is_fully_created(scope));
}
