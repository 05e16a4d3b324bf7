//! Tests for the component tree, event bus and enabled state

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::component::{AsComponent, AttachEvent, Component, ComponentError, DetachEvent, Ui};
use crate::dom::{DisabledUpdateMode, DomEvent, Element};
use crate::events::{BlurEvent, ClickEvent, ComponentEvent, EventError, FocusEvent};

type Log = Rc<RefCell<Vec<String>>>;

fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

fn click_dom_event() -> DomEvent {
    DomEvent::new("click")
        .with_data("event.screenX", 100)
        .with_data("event.screenY", 200)
        .with_data("event.clientX", 10)
        .with_data("event.clientY", 20)
        .with_data("event.detail", 2)
        .with_data("event.button", 0)
        .with_data("event.ctrlKey", false)
        .with_data("event.shiftKey", true)
        .with_data("event.altKey", false)
        .with_data("event.metaKey", false)
}

#[test]
fn test_listeners_run_in_insertion_order() {
    let component = Component::new("div");
    let calls = log();
    for name in ["first", "second", "third"] {
        let calls = calls.clone();
        component.add_listener(move |_: &FocusEvent, _| calls.borrow_mut().push(name.into()));
    }

    component.fire_event(&FocusEvent::new(&component, false));
    assert_eq!(entries(&calls), vec!["first", "second", "third"]);
}

#[test]
fn test_registration_remove_is_idempotent() {
    let component = Component::new("div");
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    let registration =
        component.add_listener(move |_: &FocusEvent, _| counter.set(counter.get() + 1));
    let other = component.add_listener(|_: &FocusEvent, _| {});

    registration.remove();
    registration.remove();
    assert!(registration.is_removed());
    assert_eq!(component.event_bus().listener_count::<FocusEvent>(), 1);

    component.fire_event(&FocusEvent::new(&component, false));
    assert_eq!(count.get(), 0);
    other.remove();
    assert!(!component.event_bus().has_listener::<FocusEvent>());
}

#[test]
fn test_self_unregistration_during_dispatch() {
    let component = Component::new("div");
    let calls = log();

    let first = calls.clone();
    component.add_listener(move |_: &FocusEvent, context| {
        first.borrow_mut().push("once".into());
        context.unregister_listener();
    });
    let second = calls.clone();
    component.add_listener(move |_: &FocusEvent, context| {
        assert_eq!(context.event_type(), "FocusEvent");
        second.borrow_mut().push("always".into());
    });

    component.fire_event(&FocusEvent::new(&component, false));
    component.fire_event(&FocusEvent::new(&component, false));
    assert_eq!(entries(&calls), vec!["once", "always", "always"]);
    assert_eq!(component.event_bus().listener_count::<FocusEvent>(), 1);
}

#[test]
fn test_listener_removed_mid_dispatch_is_skipped() {
    let component = Component::new("div");
    let calls = log();
    let victim: Rc<RefCell<Option<crate::events::Registration>>> = Rc::default();

    let remover = victim.clone();
    component.add_listener(move |_: &FocusEvent, _| {
        if let Some(registration) = remover.borrow().as_ref() {
            registration.remove();
        }
    });
    let later = calls.clone();
    *victim.borrow_mut() =
        Some(component.add_listener(move |_: &FocusEvent, _| later.borrow_mut().push("victim".into())));

    component.fire_event(&FocusEvent::new(&component, false));
    assert!(entries(&calls).is_empty());
}

#[test]
fn test_listener_added_mid_dispatch_waits_for_next_fire() {
    let component = Component::new("div");
    let calls = log();

    let target = component.downgrade();
    let added = calls.clone();
    component.add_listener(move |_: &FocusEvent, context| {
        context.unregister_listener();
        let added = added.clone();
        if let Some(component) = target.upgrade() {
            component.add_listener(move |_: &FocusEvent, _| added.borrow_mut().push("late".into()));
        }
    });

    component.fire_event(&FocusEvent::new(&component, false));
    assert!(entries(&calls).is_empty());
    component.fire_event(&FocusEvent::new(&component, false));
    assert_eq!(entries(&calls), vec!["late"]);
}

#[test]
fn test_dispatch_matches_exact_event_type() {
    let component = Component::new("input");
    let calls = log();

    let focus = calls.clone();
    component.add_listener(move |event: &FocusEvent, _| {
        focus
            .borrow_mut()
            .push(format!("focus from_client={}", event.is_from_client()));
    });
    let blur = calls.clone();
    component.add_listener(move |_: &BlurEvent, _| blur.borrow_mut().push("blur".into()));

    component.fire_event(&FocusEvent::new(&component, true));
    assert_eq!(entries(&calls), vec!["focus from_client=true"]);
}

#[test]
fn test_dom_trigger_follows_listeners() {
    let component = Component::new("button");
    assert_eq!(component.element().listener_count("click"), 0);

    let first = component.add_listener(|_: &ClickEvent, _| {});
    let second = component.add_listener(|_: &ClickEvent, _| {});
    assert_eq!(component.element().listener_count("click"), 1);
    assert_eq!(component.event_types_for("click"), vec!["ClickEvent"]);

    let listener = component.element().listeners_for("click")[0].clone();
    assert_eq!(listener.mode(), DisabledUpdateMode::OnlyWhenEnabled);
    assert_eq!(
        component.element().snapshot()["listeners"][0]["config"]["event_data"]
            .as_array()
            .map(Vec::len),
        Some(10)
    );

    first.remove();
    assert_eq!(component.element().listener_count("click"), 1);
    second.remove();
    assert_eq!(component.element().listener_count("click"), 0);
    assert!(component.event_types_for("click").is_empty());
}

#[test]
fn test_dom_event_rebuilds_typed_event() {
    let component = Component::new("button");
    let clicks = Rc::new(RefCell::new(Vec::new()));
    let recorded = clicks.clone();
    component.add_listener(move |event: &ClickEvent, _| {
        recorded.borrow_mut().push((
            event.is_from_client(),
            event.client_x,
            event.click_count,
            event.shift_key,
        ));
    });

    component.handle_dom_event(&click_dom_event()).unwrap();
    assert_eq!(*clicks.borrow(), vec![(true, 10, 2, true)]);
}

#[test]
fn test_malformed_dom_event_is_reported() {
    let component = Component::new("button");
    component.add_listener(|_: &ClickEvent, _| panic!("must not be delivered"));

    let missing = DomEvent::new("click").with_data("event.screenX", 1);
    assert!(matches!(
        component.handle_dom_event(&missing),
        Err(EventError::MissingEventData { .. })
    ));

    let mistyped = click_dom_event().with_data("event.button", "left");
    assert!(matches!(
        component.handle_dom_event(&mistyped),
        Err(EventError::InvalidEventData { .. })
    ));
}

#[test]
fn test_disabled_component_drops_client_events() {
    let parent = Component::new("div");
    let button = Component::new("button");
    parent.append(&button).unwrap();

    let calls = log();
    let strict = calls.clone();
    button.add_listener(move |_: &ClickEvent, _| strict.borrow_mut().push("strict".into()));

    parent.set_enabled(false);
    button.handle_dom_event(&click_dom_event()).unwrap();
    assert!(entries(&calls).is_empty());

    // Server-side events are not gated
    button.fire_event(&ClickEvent::new(&button));
    assert_eq!(entries(&calls), vec!["strict"]);
}

#[test]
fn test_disabled_gating_is_per_binding() {
    let button = Component::new("button");
    let calls = log();

    let strict = calls.clone();
    button.add_listener(move |_: &ClickEvent, _| strict.borrow_mut().push("strict".into()));
    let permissive = calls.clone();
    let always = button.add_listener_with_mode(DisabledUpdateMode::Always, move |_: &ClickEvent, _| {
        permissive.borrow_mut().push("always".into())
    });

    let listener = button.element().listeners_for("click")[0].clone();
    assert_eq!(listener.mode(), DisabledUpdateMode::Always);

    button.set_enabled(false);
    button.handle_dom_event(&click_dom_event()).unwrap();
    assert_eq!(entries(&calls), vec!["always"]);

    always.remove();
    assert_eq!(listener.mode(), DisabledUpdateMode::OnlyWhenEnabled);

    button.handle_dom_event(&click_dom_event()).unwrap();
    assert_eq!(entries(&calls), vec!["always"]);

    button.set_enabled(true);
    button.handle_dom_event(&click_dom_event()).unwrap();
    assert_eq!(entries(&calls), vec!["always", "strict"]);
}

#[test]
fn test_filtered_dom_listener_needs_matching_filter() {
    let component = Component::new("div");
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    let registration = component
        .element()
        .add_event_listener("keyup", move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        })
        .unwrap();
    registration.set_filter(Some("event.key === 'a'"));

    component.handle_dom_event(&DomEvent::new("keyup")).unwrap();
    component
        .handle_dom_event(&DomEvent::new("keyup").with_data("event.key === 'a'", false))
        .unwrap();
    assert_eq!(count.get(), 0);

    component
        .handle_dom_event(&DomEvent::new("keyup").with_data("event.key === 'a'", true))
        .unwrap();
    assert_eq!(count.get(), 1);
}

#[test]
fn test_enabled_state_propagation() {
    let root = Component::new("div");
    let child = Component::new("div");
    let grandchild = Component::new("span");
    root.append(&child).unwrap();
    child.append(&grandchild).unwrap();
    assert!(grandchild.is_enabled());

    root.set_enabled(false);
    assert!(!grandchild.is_enabled());
    assert!(!grandchild.is_explicitly_disabled());
    assert!(grandchild.element().has_attribute("disabled"));

    child.remove(&grandchild).unwrap();
    assert!(grandchild.is_enabled());
    assert!(!grandchild.element().has_attribute("disabled"));

    child.append(&grandchild).unwrap();
    assert!(!grandchild.is_enabled());
    grandchild.set_enabled(false);
    child.remove(&grandchild).unwrap();
    assert!(!grandchild.is_enabled());
    assert!(grandchild.element().has_attribute("disabled"));
}

#[test]
fn test_enabling_under_disabled_ancestor() {
    let root = Component::new("div");
    let child = Component::new("div");
    root.append(&child).unwrap();

    child.set_enabled(false);
    root.set_enabled(false);
    child.set_enabled(true);
    assert!(!child.is_enabled());

    root.set_enabled(true);
    assert!(child.is_enabled());
    assert!(!child.element().has_attribute("disabled"));
}

#[test]
fn test_attach_events_fire_child_first() {
    let ui = Ui::new();
    let root = Component::new("div");
    let child = Component::new("div");
    let grandchild = Component::new("span");
    root.append(&child).unwrap();
    child.append(&grandchild).unwrap();

    let calls = log();
    for (name, component) in [("root", &root), ("child", &child), ("grandchild", &grandchild)] {
        let attach = calls.clone();
        component.add_attach_listener(move |event: &AttachEvent, _| {
            attach
                .borrow_mut()
                .push(format!("attach {} initial={}", name, event.is_initial_attach()));
        });
        let detach = calls.clone();
        component.add_detach_listener(move |event: &DetachEvent, _| {
            assert!(event.source().is_attached());
            detach.borrow_mut().push(format!("detach {}", name));
        });
    }

    ui.add(&[&root]).unwrap();
    ui.remove(&root).unwrap();
    ui.add(&[&root]).unwrap();

    assert_eq!(
        entries(&calls),
        vec![
            "attach grandchild initial=true",
            "attach child initial=true",
            "attach root initial=true",
            "detach grandchild",
            "detach child",
            "detach root",
            "attach grandchild initial=false",
            "attach child initial=false",
            "attach root initial=false",
        ]
    );
    assert!(grandchild.is_attached());
    assert_eq!(grandchild.ui(), Some(ui));
}

#[test]
fn test_detached_tree_fires_nothing() {
    let root = Component::new("div");
    let child = Component::new("div");
    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();
    child.add_attach_listener(move |_, _| flag.set(true));

    root.append(&child).unwrap();
    assert!(!fired.get());
    assert!(!child.is_attached());
}

#[test]
fn test_tree_errors() {
    let root = Component::new("div");
    let child = Component::new("div");
    root.append(&child).unwrap();

    assert!(matches!(
        child.append(&root),
        Err(ComponentError::CycleDetected { .. })
    ));
    assert!(matches!(
        root.append(&root),
        Err(ComponentError::CycleDetected { .. })
    ));
    assert!(matches!(
        child.remove(&root),
        Err(ComponentError::NotAChild { .. })
    ));
}

#[test]
fn test_moving_child_between_parents() {
    let first = Component::new("div");
    let second = Component::new("div");
    let child = Component::new("span");
    first.append(&child).unwrap();
    second.insert(0, &child).unwrap();

    assert!(first.children().is_empty());
    assert_eq!(second.children(), vec![child.clone()]);
    assert_eq!(child.parent(), Some(second.clone()));

    child.remove_from_parent();
    assert!(child.parent().is_none());
    assert!(second.children().is_empty());
}

#[test]
fn test_detach_listener_moving_child_wins_over_move() {
    let ui = Ui::new();
    let first = Component::new("div");
    let second = Component::new("div");
    let third = Component::new("div");
    let child = Component::new("span");
    for parent in [&first, &second, &third] {
        ui.as_component().append(parent).unwrap();
    }
    first.append(&child).unwrap();

    let moved = Rc::new(Cell::new(false));
    let target = third.clone();
    let handle = child.downgrade();
    child.add_detach_listener(move |_, _| {
        if !moved.replace(true) {
            if let Some(child) = handle.upgrade() {
                target.append(&child).unwrap();
            }
        }
    });

    second.append(&child).unwrap();

    assert!(first.children().is_empty());
    assert!(second.children().is_empty());
    assert_eq!(third.children(), vec![child.clone()]);
    assert_eq!(child.parent(), Some(third.clone()));
    assert!(child.is_attached());
}

#[test]
fn test_element_backs_one_component() {
    let element = Element::new("x-panel");
    let owner = Component::with_element(element.clone()).unwrap();
    assert!(element.is_owned());
    assert_eq!(owner.element().tag(), "x-panel");

    assert!(matches!(
        Component::with_element(element),
        Err(ComponentError::ElementOwned(tag)) if tag == "x-panel"
    ));
    assert!(Component::new("div").element().is_owned());
}

#[test]
fn test_component_ids_are_unique() {
    let a = Component::new("div");
    let b = Component::new("div");
    assert_ne!(a.id(), b.id());
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
    assert!(a.downgrade().upgrade().is_some());
}
