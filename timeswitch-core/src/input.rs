//! Keypad input
//!
//! Three push buttons, sampled once per main-loop tick. A key counts as
//! pressed on the tick it goes down; holding it does not repeat.

/// Keypad key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// Key 1: previous item / increment
    Left,
    /// Key 2: next item / decrement
    Right,
    /// Key 3: select / next field
    Enter,
}

impl Key {
    /// Keys in priority order
    pub const ALL: [Key; 3] = [Key::Left, Key::Right, Key::Enter];

    const fn mask(self) -> u8 {
        match self {
            Key::Left => 0b001,
            Key::Right => 0b010,
            Key::Enter => 0b100,
        }
    }
}

/// Set of keys held down in one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeySet(u8);

impl KeySet {
    pub const EMPTY: Self = Self(0);

    /// Build from pin levels of active-low buttons
    pub fn from_levels(left_low: bool, right_low: bool, enter_low: bool) -> Self {
        let mut set = Self::EMPTY;
        for (key, down) in Key::ALL.into_iter().zip([left_low, right_low, enter_low]) {
            if down {
                set = set.with(key);
            }
        }
        set
    }

    pub const fn with(self, key: Key) -> Self {
        Self(self.0 | key.mask())
    }

    pub const fn contains(self, key: Key) -> bool {
        self.0 & key.mask() != 0
    }
}

impl From<Key> for KeySet {
    fn from(key: Key) -> Self {
        KeySet::EMPTY.with(key)
    }
}

/// Press edge detector
#[derive(Debug, Default)]
pub struct Keypad {
    previous: KeySet,
}

impl Keypad {
    pub const fn new() -> Self {
        Self {
            previous: KeySet::EMPTY,
        }
    }

    /// Feed one sample and return the key pressed since the last sample
    ///
    /// When several keys go down on the same tick the first one in
    /// [`Key::ALL`] order wins.
    pub fn update(&mut self, held: KeySet) -> Option<Key> {
        let previous = core::mem::replace(&mut self.previous, held);
        Key::ALL
            .into_iter()
            .find(|&key| held.contains(key) && !previous.contains(key))
    }
}
