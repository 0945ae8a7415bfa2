//=========================================================================
// Input Manager
//
// Adapts normalised `RawInput` from the platform into `ActionEvent`
// messages on a `Dispatcher`, and keeps enough state to answer queries.
//
// Responsibilities:
// - Maintain held keys/buttons (presence in map) and the cursor position
// - Resolve held inputs to game actions through bindings
// - Publish Started/Performed/Canceled phases for bound actions
// - Provide high-level queries (`is_key_pressed`, `is_action_active`, ...)
//
// The action started by a press is remembered with the press, so bindings
// changed while an input is held only affect later presses.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use super::event::{ActionEvent, ActionPhase, Binding, KeyCode, MouseButton, RawInput};
use super::Action;
use crate::core::dispatch::Dispatcher;

//=== InputManager ========================================================

/// Engine-level input adapter publishing [`ActionEvent<A>`] messages.
///
/// # Example
///
/// ```
/// use aetheric_dispatch::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum GameAction { Jump }
/// impl Action for GameAction {}
///
/// let dispatcher = Dispatcher::new();
/// let mut input = InputManager::new();
/// input.bind(Binding::Key(KeyCode::Space), GameAction::Jump);
///
/// dispatcher.subscribe_fn(|event: &ActionEvent<GameAction>| {
///     println!("{:?} {:?}", event.action, event.phase);
/// });
///
/// input.process(&[RawInput::KeyDown(KeyCode::Space)], &dispatcher);
/// assert!(input.is_action_active(GameAction::Jump));
/// ```
pub struct InputManager<A: Action> {
    /// Input source → action.
    bindings: HashMap<Binding, A>,

    /// Held keys/buttons and the action each press started, if any.
    held: HashMap<Binding, Option<A>>,

    /// Active button actions and how many held inputs drive them.
    active: HashMap<A, usize>,

    /// Last pointer value per pointer-bound action.
    values: HashMap<A, (f32, f32)>,

    mouse: (f32, f32),
    enabled: bool,
    has_changed: bool,
}

impl<A: Action> InputManager<A> {
    //--- Constructor ------------------------------------------------------

    /// Creates an enabled manager with no bindings.
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            held: HashMap::new(),
            active: HashMap::new(),
            values: HashMap::new(),
            mouse: (0.0, 0.0),
            enabled: true,
            has_changed: false,
        }
    }

    //--- Binding API ------------------------------------------------------

    /// Binds an input source to an action, replacing any earlier binding
    /// of the same source.
    pub fn bind(&mut self, binding: Binding, action: A) {
        if let Some(previous) = self.bindings.insert(binding, action) {
            if previous != action {
                warn!("{:?} rebound from {:?} to {:?}", binding, previous, action);
            }
        }
    }

    /// Removes a binding; returns the action it drove.
    pub fn unbind(&mut self, binding: Binding) -> Option<A> {
        self.bindings.remove(&binding)
    }

    /// Returns the action bound to `binding`.
    pub fn binding(&self, binding: Binding) -> Option<A> {
        self.bindings.get(&binding).copied()
    }

    //--- Enable / Disable -------------------------------------------------

    /// Resumes processing input.
    pub fn enable(&mut self) {
        if !self.enabled {
            debug!("Input manager enabled");
            self.enabled = true;
        }
    }

    /// Stops processing input, cancelling every active action.
    pub fn disable(&mut self, dispatcher: &Dispatcher) {
        if !self.enabled {
            return;
        }

        for action in self.active.drain().map(|(action, _)| action) {
            dispatcher.publish(ActionEvent::button(action, ActionPhase::Canceled));
        }
        self.held.clear();
        self.enabled = false;
        self.has_changed = true;
        debug!("Input manager disabled");
    }

    //--- process() --------------------------------------------------------
    //
    // Consumes one frame's worth of `RawInput` and publishes the resulting
    // action phases. Returns the number of `ActionEvent`s published.
    //
    // Repeated key-downs for a held key are ignored; cursor movement always
    // counts as a change.
    //
    pub fn process(&mut self, events: &[RawInput], dispatcher: &Dispatcher) -> usize {
        self.has_changed = false;

        if !self.enabled {
            if !events.is_empty() {
                trace!("Input manager disabled, ignoring {} events", events.len());
            }
            return 0;
        }

        let mut published = 0;
        for event in events {
            published += match *event {
                //--- Discrete Inputs -------------------------------------
                RawInput::KeyDown(key) => self.press(Binding::Key(key), dispatcher),
                RawInput::KeyUp(key) => self.release(Binding::Key(key), dispatcher),
                RawInput::MouseButtonDown(btn) => self.press(Binding::Button(btn), dispatcher),
                RawInput::MouseButtonUp(btn) => self.release(Binding::Button(btn), dispatcher),

                //--- Continuous Inputs -----------------------------------
                RawInput::MouseMoved { x, y } => self.pointer(x, y, dispatcher),
            };
        }

        if self.has_changed {
            trace!("Input updated: {:?}", self);
        }
        published
    }

    fn press(&mut self, binding: Binding, dispatcher: &Dispatcher) -> usize {
        if self.held.contains_key(&binding) {
            return 0;
        }

        let action = self.bindings.get(&binding).copied();
        self.held.insert(binding, action);
        self.has_changed = true;

        let Some(action) = action else {
            return 0;
        };

        let count = self.active.entry(action).or_insert(0);
        *count += 1;
        if *count > 1 {
            return 0;
        }

        dispatcher.publish(ActionEvent::button(action, ActionPhase::Started));
        dispatcher.publish(ActionEvent::button(action, ActionPhase::Performed));
        2
    }

    fn release(&mut self, binding: Binding, dispatcher: &Dispatcher) -> usize {
        let Some(started) = self.held.remove(&binding) else {
            return 0;
        };
        self.has_changed = true;

        let Some(action) = started else {
            return 0;
        };
        let Some(count) = self.active.get_mut(&action) else {
            return 0;
        };

        *count -= 1;
        if *count > 0 {
            return 0;
        }

        self.active.remove(&action);
        dispatcher.publish(ActionEvent::button(action, ActionPhase::Canceled));
        1
    }

    fn pointer(&mut self, x: f32, y: f32, dispatcher: &Dispatcher) -> usize {
        self.mouse = (x, y);
        self.has_changed = true;

        let Some(&action) = self.bindings.get(&Binding::Pointer) else {
            return 0;
        };

        self.values.insert(action, (x, y));
        dispatcher.publish(ActionEvent::new(action, ActionPhase::Performed, Some((x, y))));
        1
    }

    //--- Query Methods ----------------------------------------------------

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.held.contains_key(&Binding::Key(key))
    }

    pub fn is_button_pressed(&self, btn: MouseButton) -> bool {
        self.held.contains_key(&Binding::Button(btn))
    }

    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse
    }

    /// Returns true while at least one held input drives `action`.
    pub fn is_action_active(&self, action: A) -> bool {
        self.active.contains_key(&action)
    }

    /// Last 2D value reported for a pointer-bound action.
    pub fn action_value(&self, action: A) -> Option<(f32, f32)> {
        self.values.get(&action).copied()
    }

    /// Whether the last `process()` (or `disable()`) changed any state.
    pub fn has_changed(&self) -> bool {
        self.has_changed
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl<A: Action> Default for InputManager<A> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Debug Trait ==========================================================
//
// Prints only the state worth seeing in a log line.
//
// ```text
// InputManager {
//     mouse: (420.0, 255.0),
//     enabled: true,
//     pressed: [Key(KeyW), Button(Left)],
//     active: [Jump]
// }
// ```
//
impl<A: Action> fmt::Debug for InputManager<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pressed: Vec<&Binding> = self.held.keys().collect();
        let active: Vec<&A> = self.active.keys().collect();

        f.debug_struct("InputManager")
            .field("mouse", &self.mouse)
            .field("enabled", &self.enabled)
            .field("pressed", &pressed)
            .field("active", &active)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
