//! Menu state machine
//!
//! The UI is a function of the current screen and an event. A transition
//! may ask the application to touch the clock through an [`Action`].

use crate::config::UiConfig;
use crate::input::Key;
use crate::time::{Field, TimeOfDay};

/// Events that drive the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A key went down
    Key(Key),
    /// A main-loop tick passed with no key press
    Tick,
}

/// Clock access requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Fill the editor with the stored value
    LoadEditor(EditTarget),
    /// Set the current time
    SetTime(TimeOfDay),
    /// Set the switch-on time
    SetOnTime(TimeOfDay),
    /// Set the switch-off time
    SetOffTime(TimeOfDay),
    /// Arm or disarm the alarm output
    SetAlarm(bool),
}

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    SetTime,
    SetOnTime,
    SetOffTime,
    SetAlarm,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 5] = [
        MenuItem::SetTime,
        MenuItem::SetOnTime,
        MenuItem::SetOffTime,
        MenuItem::SetAlarm,
        MenuItem::Quit,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            MenuItem::SetTime => "Set Time",
            MenuItem::SetOnTime => "Set On Time",
            MenuItem::SetOffTime => "Set Off Time",
            MenuItem::SetAlarm => "Set Alarm",
            MenuItem::Quit => "Quit",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|&i| i == self).unwrap_or(0)
    }

    /// Previous entry, staying on the first
    pub fn prev(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }

    /// Next entry, staying on the last
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }
}

/// Alarm menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmChoice {
    Enable,
    Disable,
}

impl AlarmChoice {
    pub const fn label(self) -> &'static str {
        match self {
            AlarmChoice::Enable => "Enable",
            AlarmChoice::Disable => "Disable",
        }
    }
}

/// Which stored time an editor changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditTarget {
    /// The running clock
    Clock,
    /// Switch-on alarm
    OnTime,
    /// Switch-off alarm (no seconds)
    OffTime,
}

impl EditTarget {
    /// Fields in cursor order
    pub const fn fields(self) -> &'static [Field] {
        match self {
            EditTarget::Clock | EditTarget::OnTime => {
                &[Field::Hours, Field::Minutes, Field::Seconds]
            }
            EditTarget::OffTime => &[Field::Hours, Field::Minutes],
        }
    }

    const fn store(self, value: TimeOfDay) -> (Action, Message) {
        match self {
            EditTarget::Clock => (Action::SetTime(value), Message::TimeSet),
            EditTarget::OnTime => (Action::SetOnTime(value), Message::OnTimeSet),
            EditTarget::OffTime => (Action::SetOffTime(value), Message::OffTimeSet),
        }
    }
}

/// Time editor state
///
/// The cursor walks the fields and then an OK slot; Left/Right on OK
/// confirms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Editor {
    pub target: EditTarget,
    pub value: TimeOfDay,
    pub cursor: u8,
}

/// Result of a key press in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Editing(Editor),
    Confirmed(EditTarget, TimeOfDay),
}

impl Editor {
    pub const fn new(target: EditTarget) -> Self {
        Self {
            target,
            value: TimeOfDay::MIDNIGHT,
            cursor: 0,
        }
    }

    /// Replace the edited value
    pub fn load(&mut self, value: TimeOfDay) {
        self.value = value;
        if self.target == EditTarget::OffTime {
            self.value.seconds = 0;
        }
    }

    /// Field under the cursor, `None` on OK
    pub fn field(&self) -> Option<Field> {
        self.target.fields().get(self.cursor as usize).copied()
    }

    /// Cursor positions, fields plus OK
    fn positions(&self) -> u8 {
        self.target.fields().len() as u8 + 1
    }

    pub fn handle(mut self, key: Key) -> EditOutcome {
        match (key, self.field()) {
            (Key::Left, Some(field)) => self.value.increment(field),
            (Key::Right, Some(field)) => self.value.decrement(field),
            (Key::Left | Key::Right, None) => {
                return EditOutcome::Confirmed(self.target, self.value)
            }
            (Key::Enter, _) => self.cursor = (self.cursor + 1) % self.positions(),
        }
        EditOutcome::Editing(self)
    }
}

/// Confirmation messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message {
    TimeSet,
    OnTimeSet,
    OffTimeSet,
    AlarmEnabled,
    AlarmDisabled,
    ClockError,
}

impl Message {
    pub const fn text(self) -> &'static str {
        match self {
            Message::TimeSet => "Main Time Set",
            Message::OnTimeSet => "OnTime Set",
            Message::OffTimeSet => "OffTime Set",
            Message::AlarmEnabled => "Alarm Enabled",
            Message::AlarmDisabled => "Alarm Disabled",
            Message::ClockError => "Clock Error",
        }
    }

    /// Menu entry to return to once the message times out
    const fn return_to(self) -> MenuItem {
        match self {
            Message::TimeSet | Message::ClockError => MenuItem::SetTime,
            Message::OnTimeSet => MenuItem::SetOnTime,
            Message::OffTimeSet => MenuItem::SetOffTime,
            Message::AlarmEnabled | Message::AlarmDisabled => MenuItem::SetAlarm,
        }
    }
}

/// UI screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    /// Banner and running clock
    Home,
    /// Top-level menu
    MainMenu { selected: MenuItem },
    /// Time editor
    Edit(Editor),
    /// Alarm enable/disable
    AlarmMenu { selected: AlarmChoice },
    /// Timed confirmation
    Message { message: Message, remaining: u8 },
}

impl Screen {
    /// Timed message screen
    pub fn message(message: Message, ui: &UiConfig) -> Self {
        Screen::Message {
            message,
            remaining: ui.message_ticks.max(1),
        }
    }

    /// Fill an open editor for `target` with its stored value
    pub fn load_editor(&mut self, target: EditTarget, value: TimeOfDay) {
        if let Screen::Edit(editor) = self {
            if editor.target == target {
                editor.load(value);
            }
        }
    }

    /// Process an event and return the next screen
    pub fn transition(self, event: Event, ui: &UiConfig) -> (Self, Option<Action>) {
        match (self, event) {
            // Home
            (Screen::Home, Event::Key(Key::Right)) => (
                Screen::MainMenu {
                    selected: MenuItem::SetTime,
                },
                None,
            ),

            // Main menu
            (Screen::MainMenu { selected }, Event::Key(Key::Left)) => (
                Screen::MainMenu {
                    selected: selected.prev(),
                },
                None,
            ),
            (Screen::MainMenu { selected }, Event::Key(Key::Right)) => (
                Screen::MainMenu {
                    selected: selected.next(),
                },
                None,
            ),
            (Screen::MainMenu { selected }, Event::Key(Key::Enter)) => match selected {
                MenuItem::SetTime => open_editor(EditTarget::Clock),
                MenuItem::SetOnTime => open_editor(EditTarget::OnTime),
                MenuItem::SetOffTime => open_editor(EditTarget::OffTime),
                MenuItem::SetAlarm => (
                    Screen::AlarmMenu {
                        selected: AlarmChoice::Enable,
                    },
                    None,
                ),
                MenuItem::Quit => (Screen::Home, None),
            },

            // Editor
            (Screen::Edit(editor), Event::Key(key)) => match editor.handle(key) {
                EditOutcome::Editing(editor) => (Screen::Edit(editor), None),
                EditOutcome::Confirmed(target, value) => {
                    let (action, message) = target.store(value);
                    (Screen::message(message, ui), Some(action))
                }
            },

            // Alarm menu
            (Screen::AlarmMenu { .. }, Event::Key(Key::Left)) => (
                Screen::AlarmMenu {
                    selected: AlarmChoice::Enable,
                },
                None,
            ),
            (Screen::AlarmMenu { .. }, Event::Key(Key::Right)) => (
                Screen::AlarmMenu {
                    selected: AlarmChoice::Disable,
                },
                None,
            ),
            (Screen::AlarmMenu { selected }, Event::Key(Key::Enter)) => {
                let enabled = selected == AlarmChoice::Enable;
                let message = if enabled {
                    Message::AlarmEnabled
                } else {
                    Message::AlarmDisabled
                };
                (Screen::message(message, ui), Some(Action::SetAlarm(enabled)))
            }

            // Message countdown; keys are ignored while it shows
            (Screen::Message { message, remaining }, Event::Tick) => {
                if remaining <= 1 {
                    (
                        Screen::MainMenu {
                            selected: message.return_to(),
                        },
                        None,
                    )
                } else {
                    (
                        Screen::Message {
                            message,
                            remaining: remaining - 1,
                        },
                        None,
                    )
                }
            }

            // Default: stay on the current screen
            _ => (self, None),
        }
    }
}

fn open_editor(target: EditTarget) -> (Screen, Option<Action>) {
    (
        Screen::Edit(Editor::new(target)),
        Some(Action::LoadEditor(target)),
    )
}
