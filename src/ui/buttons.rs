//! Physical buttons, semantic intents and the binding table between them.
//!
//! Four face buttons (A, B, X, Y) can each carry one of three remappable
//! intents:
//!   - Action  - secondary choice, exits with the action code
//!   - Confirm - accept the message, exits with success
//!   - Cancel  - dismiss the message, exits with the cancel code
//!
//! START is reserved: it always ends the session with its own code and can
//! never be bound to anything else.

use core::fmt;
use core::str::FromStr;

use crate::error::ConfigError;
use crate::exit_code::ExitCode;

/// Physical buttons the presenter reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    X,
    Y,
    Start,
}

impl Button {
    /// Face buttons in polling order.
    pub const FACE: [Button; 4] = [Button::A, Button::B, Button::X, Button::Y];

    const fn index(self) -> usize {
        match self {
            Button::A => 0,
            Button::B => 1,
            Button::X => 2,
            Button::Y => 3,
            Button::Start => 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Button::A => "A",
            Button::B => "B",
            Button::X => "X",
            Button::Y => "Y",
            Button::Start => "START",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a bindable face button. START is not accepted.
impl FromStr for Button {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Button::A),
            "B" => Ok(Button::B),
            "X" => Ok(Button::X),
            "Y" => Ok(Button::Y),
            _ => Err(()),
        }
    }
}

/// Semantic action a button press triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    Action,
    Confirm,
    Cancel,
    /// Reserved, always bound to START.
    Start,
}

impl Intent {
    /// Remappable intents in precedence order.
    pub const REMAPPABLE: [Intent; 3] = [Intent::Action, Intent::Confirm, Intent::Cancel];

    pub const fn exit_code(self) -> ExitCode {
        match self {
            Intent::Action => ExitCode::ActionButton,
            Intent::Confirm => ExitCode::Success,
            Intent::Cancel => ExitCode::CancelButton,
            Intent::Start => ExitCode::StartButton,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Intent::Action => "action",
            Intent::Confirm => "confirm",
            Intent::Cancel => "cancel",
            Intent::Start => "start",
        };
        f.write_str(name)
    }
}

/// One physical button carrying one intent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonBinding {
    pub button: Button,
    pub intent: Intent,
    /// Text shown next to the button glyph.
    pub label: String,
    /// Whether the hint is drawn.
    pub visible: bool,
}

impl ButtonBinding {
    pub fn new(button: Button, intent: Intent, label: impl Into<String>) -> Self {
        Self {
            button,
            intent,
            label: label.into(),
            visible: false,
        }
    }

    pub fn shown(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Binding table, one optional slot per remappable intent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bindings {
    action: Option<ButtonBinding>,
    confirm: Option<ButtonBinding>,
    cancel: Option<ButtonBinding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a binding in its intent's slot, replacing any previous one.
    ///
    /// START bindings are ignored; START cannot be remapped.
    pub fn with(mut self, binding: ButtonBinding) -> Self {
        match binding.intent {
            Intent::Action => self.action = Some(binding),
            Intent::Confirm => self.confirm = Some(binding),
            Intent::Cancel => self.cancel = Some(binding),
            Intent::Start => {
                tracing::warn!(
                    button = %binding.button,
                    "ignoring binding for reserved start intent"
                );
            }
        }
        self
    }

    pub fn get(&self, intent: Intent) -> Option<&ButtonBinding> {
        match intent {
            Intent::Action => self.action.as_ref(),
            Intent::Confirm => self.confirm.as_ref(),
            Intent::Cancel => self.cancel.as_ref(),
            Intent::Start => None,
        }
    }

    /// Bound intents in precedence order (Action, Confirm, Cancel).
    pub fn iter(&self) -> impl Iterator<Item = &ButtonBinding> {
        Intent::REMAPPABLE
            .into_iter()
            .filter_map(move |intent| self.get(intent))
    }
}

/// Reject any table where one physical button serves two intents.
///
/// Walks Action, Confirm, Cancel in order and reports the first button
/// claimed twice. Unset intents are skipped.
pub fn validate_bindings(bindings: &Bindings) -> Result<(), ConfigError> {
    let mut claimed: [Option<Intent>; 5] = [None; 5];

    for binding in bindings.iter() {
        let slot = &mut claimed[binding.button.index()];
        if let Some(previous) = *slot {
            tracing::debug!(
                button = %binding.button,
                first = %previous,
                second = %binding.intent,
                "button bound twice"
            );
            return Err(ConfigError::ButtonConflict(binding.button));
        }
        *slot = Some(binding.intent);
    }

    Ok(())
}

/// Map the button released this tick to an intent.
///
/// START always wins. Otherwise the first of Action > Confirm > Cancel
/// bound to `pressed` is returned; unbound buttons resolve to `None`.
pub fn resolve(pressed: Option<Button>, bindings: &Bindings) -> Option<Intent> {
    let pressed = pressed?;
    if pressed == Button::Start {
        return Some(Intent::Start);
    }

    bindings
        .iter()
        .find(|binding| binding.button == pressed)
        .map(|binding| binding.intent)
}
