//! Scenario tests for listeners, keyboard filtering, enabled state and attach order

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use serde_json::json;
use tether::events::{KeyLocation, KeyboardState};
use tether::kit::components::{Button, Input, Layout};
use tether::prelude::*;

type Log = Rc<RefCell<Vec<String>>>;

fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// A keyboard DOM event carrying every value the keyboard events read
fn key_event(dom_event: &str, key: &str, modifiers: &[KeyModifier]) -> DomEvent {
    let mut event = DomEvent::new(dom_event)
        .with_data("event.key", key)
        .with_data("event.code", "")
        .with_data("event.location", 0)
        .with_data("event.repeat", false)
        .with_data("event.isComposing", false);
    for modifier in KeyModifier::ALL {
        event = event.with_data(modifier.event_flag(), modifiers.contains(&modifier));
    }
    event
}

#[test]
fn focus_and_blur_listeners_are_independent() {
    let input = Input::default();
    let calls = log();

    let focus = calls.clone();
    input.add_focus_listener(move |event, _| {
        focus
            .borrow_mut()
            .push(format!("focus {}", event.is_from_client()));
    });
    let blur = calls.clone();
    input.add_blur_listener(move |_, _| blur.borrow_mut().push("blur".into()));

    input
        .as_component()
        .fire_event(&FocusEvent::new(input.as_component(), false));
    assert_eq!(*calls.borrow(), vec!["focus false"]);

    input
        .as_component()
        .handle_dom_event(&DomEvent::new("blur"))
        .unwrap();
    assert_eq!(*calls.borrow(), vec!["focus false", "blur"]);
}

#[test]
fn key_event_listener_requires_exact_modifiers() {
    let button = Button::new("Submit");
    let source = button.as_component();
    let calls = log();
    let recorded = calls.clone();
    let listener = KeyEventListener::new(Key::ENTER, [], move |event: &KeyDownEvent, _| {
        recorded.borrow_mut().push(event.key().to_string());
    });

    let plain = KeyDownEvent::new(source, Key::of("Enter"));
    assert!(listener.matches(&plain));

    let shifted = KeyDownEvent::with_state(
        source,
        true,
        KeyboardState::new(Key::of("Enter")).with_modifiers([KeyModifier::Shift]),
    );
    assert!(!listener.matches(&shifted));

    source.add_listener(listener.into_listener());
    source.fire_event(&plain);
    source.fire_event(&shifted);
    assert_eq!(*calls.borrow(), vec!["Enter"]);
}

#[test]
fn filtered_key_listener_from_the_client() {
    let input = Input::default();
    let calls = log();

    let filtered = calls.clone();
    input.add_key_down_listener_for(Key::ESCAPE, [], move |_, _| {
        filtered.borrow_mut().push("escape".into())
    });
    let all = calls.clone();
    input.add_key_down_listener(move |event, _| {
        all.borrow_mut()
            .push(format!("key {} {:?}", event.key(), event.modifiers()))
    });

    let component = input.as_component();
    assert_eq!(component.element().listener_count("keydown"), 1);

    component
        .handle_dom_event(&key_event("keydown", "Esc", &[]))
        .unwrap();
    component
        .handle_dom_event(&key_event("keydown", "Escape", &[KeyModifier::Control]))
        .unwrap();

    assert_eq!(
        *calls.borrow(),
        vec![
            "escape".to_string(),
            "key Esc {}".to_string(),
            "key Escape {Control}".to_string(),
        ]
    );
}

#[test]
fn key_event_carries_location_and_code() {
    let input = Input::default();
    let states = Rc::new(RefCell::new(Vec::new()));
    let recorded = states.clone();
    input.add_key_up_listener(move |event, _| {
        recorded
            .borrow_mut()
            .push((event.code().cloned(), event.location(), event.is_repeat()));
    });

    let event = key_event("keyup", "Shift", &[])
        .with_data("event.code", "ShiftRight")
        .with_data("event.location", 2)
        .with_data("event.repeat", true);
    input.as_component().handle_dom_event(&event).unwrap();

    assert_eq!(
        *states.borrow(),
        vec![(Some(Key::of("ShiftRight")), KeyLocation::Right, true)]
    );

    let invalid = key_event("keyup", "a", &[]).with_data("event.location", 9);
    assert!(matches!(
        input.as_component().handle_dom_event(&invalid),
        Err(EventError::InvalidEventData { .. })
    ));
}

#[test]
fn enabled_state_follows_the_tree() {
    let root = Layout::column();
    let child = Layout::row();
    let button = Button::new("Deep");
    root.add(&[&child]).unwrap();
    child.add(&[&button]).unwrap();

    root.set_enabled(false);
    assert!(!button.is_enabled());

    child.remove(&button).unwrap();
    assert!(button.is_enabled());

    child.add(&[&button]).unwrap();
    button.set_enabled(false);
    child.remove(&button).unwrap();
    assert!(!button.is_enabled());
}

#[test]
fn disabled_button_ignores_client_clicks() -> anyhow::Result<()> {
    let layout = Layout::default();
    let button = Button::new("Pay");
    layout.add(&[&button])?;

    let calls = log();
    let recorded = calls.clone();
    button.add_click_listener(move |event, _| {
        recorded
            .borrow_mut()
            .push(format!("click {}", event.click_count))
    });

    let payload = r#"{
        "type": "click",
        "data": {
            "event.screenX": 0, "event.screenY": 0,
            "event.clientX": 0, "event.clientY": 0,
            "event.detail": 1, "event.button": 0,
            "event.ctrlKey": false, "event.shiftKey": false,
            "event.altKey": false, "event.metaKey": false
        }
    }"#;
    let click = DomEvent::from_json(payload)?;

    layout.set_enabled(false);
    button.as_component().handle_dom_event(&click)?;
    assert!(calls.borrow().is_empty());

    layout.set_enabled(true);
    button.as_component().handle_dom_event(&click)?;
    assert_eq!(*calls.borrow(), vec!["click 1"]);
    Ok(())
}

#[test]
fn property_sync_uses_most_permissive_mode() {
    let input = Input::default();
    input.set_enabled(false);
    let component = input.as_component();

    assert!(!component.update_property_from_client("value", json!("blocked")));

    let permissive = component
        .element()
        .synchronize_property("value", "input", DisabledUpdateMode::Always);
    assert!(component.update_property_from_client("value", json!("allowed")));
    assert_eq!(input.value(), "allowed");

    permissive.remove();
    assert!(!component.update_property_from_client("value", json!("blocked again")));
    assert_eq!(input.value(), "allowed");
}

#[test]
fn attach_and_detach_fire_child_first() {
    let ui = Ui::new();
    let root = Layout::default();
    let child = Layout::default();
    let leaf = Button::new("Leaf");
    root.add(&[&child]).unwrap();
    child.add(&[&leaf]).unwrap();

    let calls = log();
    let attach = calls.clone();
    root.add_attach_listener(move |_, _| attach.borrow_mut().push("attach root".into()));
    let attach = calls.clone();
    child.add_attach_listener(move |_, _| attach.borrow_mut().push("attach child".into()));
    let attach = calls.clone();
    leaf.add_attach_listener(move |_, _| attach.borrow_mut().push("attach leaf".into()));
    let detach = calls.clone();
    leaf.add_detach_listener(move |_, _| detach.borrow_mut().push("detach leaf".into()));
    let detach = calls.clone();
    root.add_detach_listener(move |_, _| detach.borrow_mut().push("detach root".into()));

    ui.add(&[&root]).unwrap();
    ui.remove(&root).unwrap();

    assert_eq!(
        *calls.borrow(),
        vec![
            "attach leaf",
            "attach child",
            "attach root",
            "detach leaf",
            "detach root"
        ]
    );
}

#[test]
fn registry_builds_kit_components() -> anyhow::Result<()> {
    let mut registry = ComponentRegistry::new();
    registry.register("tether-button", || Button::new("From registry"))?;

    let button = registry.create_as::<Button>("tether-button")?;
    assert_eq!(button.text(), "From registry");

    let component = registry.create("tether-button")?;
    assert_eq!(component.element().tag(), "button");

    assert!(matches!(
        registry.create_as::<Input>("tether-button"),
        Err(ComponentError::CapabilityMisuse { .. })
    ));
    Ok(())
}

#[test]
fn modifier_sets_are_order_independent() {
    let a: BTreeSet<_> = [KeyModifier::Shift, KeyModifier::Control].into();
    let b: BTreeSet<_> = [KeyModifier::Control, KeyModifier::Shift].into();
    assert_eq!(a, b);
    assert_eq!(
        KeyModifier::filter_expression(&a),
        KeyModifier::filter_expression(&b)
    );
}
