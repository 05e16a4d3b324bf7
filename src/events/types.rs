//! Built-in event types

use std::collections::BTreeSet;

use crate::component::Component;
use crate::events::event::component_event;
use crate::events::{
    ComponentEvent, DomBinding, EventArgs, EventDescriptor, EventError, Key, KeyLocation,
    KeyModifier, ParamType,
};

/// The component received focus
#[derive(Debug, Clone)]
pub struct FocusEvent {
    source: Component,
    from_client: bool,
}

impl FocusEvent {
    /// Create a focus event
    pub fn new(source: &Component, from_client: bool) -> Self {
        Self {
            source: source.clone(),
            from_client,
        }
    }
}

component_event!(
    FocusEvent,
    DomBinding::new(EventDescriptor::new("FocusEvent", "focus"), |source, _| {
        Ok(FocusEvent::new(source, true))
    })
);

/// The component lost focus
#[derive(Debug, Clone)]
pub struct BlurEvent {
    source: Component,
    from_client: bool,
}

impl BlurEvent {
    /// Create a blur event
    pub fn new(source: &Component, from_client: bool) -> Self {
        Self {
            source: source.clone(),
            from_client,
        }
    }
}

component_event!(
    BlurEvent,
    DomBinding::new(EventDescriptor::new("BlurEvent", "blur"), |source, _| {
        Ok(BlurEvent::new(source, true))
    })
);

/// The component was clicked
#[derive(Debug, Clone)]
pub struct ClickEvent {
    source: Component,
    from_client: bool,
    /// Horizontal position relative to the screen, -1 when not known
    pub screen_x: i64,
    /// Vertical position relative to the screen, -1 when not known
    pub screen_y: i64,
    /// Horizontal position relative to the viewport, -1 when not known
    pub client_x: i64,
    /// Vertical position relative to the viewport, -1 when not known
    pub client_y: i64,
    /// Number of consecutive clicks
    pub click_count: i64,
    /// Mouse button, -1 when not known
    pub button: i64,
    pub ctrl_key: bool,
    pub shift_key: bool,
    pub alt_key: bool,
    pub meta_key: bool,
}

impl ClickEvent {
    /// A click created on the server, e.g. by a click shortcut
    pub fn new(source: &Component) -> Self {
        Self {
            source: source.clone(),
            from_client: false,
            screen_x: -1,
            screen_y: -1,
            client_x: -1,
            client_y: -1,
            click_count: 1,
            button: -1,
            ctrl_key: false,
            shift_key: false,
            alt_key: false,
            meta_key: false,
        }
    }

    fn descriptor() -> EventDescriptor {
        EventDescriptor::new("ClickEvent", "click")
            .data("event.screenX", ParamType::Integer)
            .data("event.screenY", ParamType::Integer)
            .data("event.clientX", ParamType::Integer)
            .data("event.clientY", ParamType::Integer)
            .data("event.detail", ParamType::Integer)
            .data("event.button", ParamType::Integer)
            .data("event.ctrlKey", ParamType::Boolean)
            .data("event.shiftKey", ParamType::Boolean)
            .data("event.altKey", ParamType::Boolean)
            .data("event.metaKey", ParamType::Boolean)
    }

    fn from_args(source: &Component, args: &EventArgs) -> Result<Self, EventError> {
        Ok(Self {
            source: source.clone(),
            from_client: true,
            screen_x: args.integer("event.screenX")?,
            screen_y: args.integer("event.screenY")?,
            client_x: args.integer("event.clientX")?,
            client_y: args.integer("event.clientY")?,
            click_count: args.integer("event.detail")?,
            button: args.integer("event.button")?,
            ctrl_key: args.boolean("event.ctrlKey")?,
            shift_key: args.boolean("event.shiftKey")?,
            alt_key: args.boolean("event.altKey")?,
            meta_key: args.boolean("event.metaKey")?,
        })
    }
}

component_event!(
    ClickEvent,
    DomBinding::new(ClickEvent::descriptor(), ClickEvent::from_args)
);

/// Key state carried by keyboard events
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardState {
    pub key: Key,
    pub code: Option<Key>,
    pub location: KeyLocation,
    pub repeat: bool,
    pub composing: bool,
    pub modifiers: BTreeSet<KeyModifier>,
}

impl KeyboardState {
    /// State for a key pressed without modifiers
    pub fn new(key: Key) -> Self {
        Self {
            key,
            code: None,
            location: KeyLocation::Standard,
            repeat: false,
            composing: false,
            modifiers: BTreeSet::new(),
        }
    }

    /// Set the active modifiers
    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = KeyModifier>) -> Self {
        self.modifiers = modifiers.into_iter().collect();
        self
    }

    /// Set the physical key code
    pub fn with_code(mut self, code: Key) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the key location
    pub fn with_location(mut self, location: KeyLocation) -> Self {
        self.location = location;
        self
    }

    fn descriptor(type_name: &'static str, dom_event: &'static str) -> EventDescriptor {
        let descriptor = EventDescriptor::new(type_name, dom_event)
            .data("event.key", ParamType::String)
            .data("event.code", ParamType::String)
            .data("event.location", ParamType::Integer)
            .data("event.repeat", ParamType::Boolean)
            .data("event.isComposing", ParamType::Boolean);
        KeyModifier::ALL
            .into_iter()
            .fold(descriptor, |d, m| d.data(m.event_flag(), ParamType::Boolean))
    }

    fn from_args(args: &EventArgs) -> Result<Self, EventError> {
        let code = args.string("event.code")?;
        let location = args.integer("event.location")?;
        let location =
            KeyLocation::from_code(location).ok_or_else(|| EventError::InvalidEventData {
                event: "KeyboardEvent",
                expression: "event.location".to_string(),
                expected: ParamType::Integer,
                found: location.to_string(),
            })?;

        let mut modifiers = BTreeSet::new();
        for modifier in KeyModifier::ALL {
            if args.boolean(modifier.event_flag())? {
                modifiers.insert(modifier);
            }
        }

        Ok(Self {
            key: Key::of(args.string("event.key")?),
            code: (!code.is_empty()).then(|| Key::of(code)),
            location,
            repeat: args.boolean("event.repeat")?,
            composing: args.boolean("event.isComposing")?,
            modifiers,
        })
    }
}

/// Common accessors of keyboard events
pub trait KeyboardEvent: ComponentEvent {
    /// Full key state
    fn state(&self) -> &KeyboardState;

    /// Key that was pressed
    fn key(&self) -> &Key {
        &self.state().key
    }

    /// Physical key code, if reported
    fn code(&self) -> Option<&Key> {
        self.state().code.as_ref()
    }

    /// Modifiers held while the key was pressed
    fn modifiers(&self) -> &BTreeSet<KeyModifier> {
        &self.state().modifiers
    }

    /// Key location
    fn location(&self) -> KeyLocation {
        self.state().location
    }

    /// Whether the key is being held down
    fn is_repeat(&self) -> bool {
        self.state().repeat
    }

    /// Whether the key event is part of a composition session
    fn is_composing(&self) -> bool {
        self.state().composing
    }
}

macro_rules! keyboard_event {
    ($(#[$doc:meta])* $name:ident, $dom_event:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            source: Component,
            from_client: bool,
            state: KeyboardState,
        }

        impl $name {
            /// Create a server-side event for a key without modifiers
            pub fn new(source: &Component, key: Key) -> Self {
                Self::with_state(source, false, KeyboardState::new(key))
            }

            /// Create an event from a full key state
            pub fn with_state(source: &Component, from_client: bool, state: KeyboardState) -> Self {
                Self {
                    source: source.clone(),
                    from_client,
                    state,
                }
            }
        }

        impl KeyboardEvent for $name {
            fn state(&self) -> &KeyboardState {
                &self.state
            }
        }

        component_event!(
            $name,
            DomBinding::new(
                KeyboardState::descriptor(stringify!($name), $dom_event),
                |source, args| Ok($name::with_state(source, true, KeyboardState::from_args(args)?)),
            )
        );
    };
}

keyboard_event!(
    /// A key was pressed down
    KeyDownEvent,
    "keydown"
);
keyboard_event!(
    /// A key was released
    KeyUpEvent,
    "keyup"
);
keyboard_event!(
    /// A key producing a character was pressed
    KeyPressEvent,
    "keypress"
);
