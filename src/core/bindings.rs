//! Setting up and responding to user defined key/mouse bindings
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// The X11 modifier bit for the caps lock key
pub const LOCK_MASK: u16 = 1 << 1;

/// Known modifier keys for bindings
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, EnumIter, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum ModifierKey {
    /// Control
    Ctrl,
    /// Alt (Mod1)
    Alt,
    /// Shift
    Shift,
    /// Meta / super / windows (Mod4)
    Meta,
}

impl ModifierKey {
    fn was_held(&self, mask: u16) -> bool {
        mask & u16::from(*self) > 0
    }

    /// The combined mask for a set of modifiers
    pub fn mask_for(mods: &[ModifierKey]) -> u16 {
        mods.iter().fold(0, |acc, &m| acc | u16::from(m))
    }

    /// The modifiers held in a raw X11 modifier mask
    pub fn held_in(mask: u16) -> Vec<ModifierKey> {
        Self::iter().filter(|m| m.was_held(mask)).collect()
    }
}

impl From<ModifierKey> for u16 {
    fn from(m: ModifierKey) -> u16 {
        match m {
            ModifierKey::Shift => 1 << 0,
            ModifierKey::Ctrl => 1 << 2,
            ModifierKey::Alt => 1 << 3,
            ModifierKey::Meta => 1 << 6,
        }
    }
}

/// Strip the lock and num lock bits from a raw modifier mask along with any bits that are not
/// real modifiers (pointer button state), so that bindings match regardless of lock state.
///
/// ```
/// # use kbgwm::core::bindings::{clean_mask, ModifierKey};
/// let numlock = 1 << 4;
/// let meta = u16::from(ModifierKey::Meta);
/// let button1 = 1 << 8;
///
/// assert_eq!(clean_mask(meta | numlock | button1 | 2, numlock), meta);
/// ```
pub fn clean_mask(mask: u16, numlock: u16) -> u16 {
    // Shift, Control and Mod1 through Mod5
    const MODIFIERS: u16 = 0b1111_1101;

    mask & !(numlock | LOCK_MASK) & MODIFIERS
}

/// Known mouse buttons for binding actions
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum MouseButton {
    /// 1
    Left,
    /// 2
    Middle,
    /// 3
    Right,
    /// 4
    ScrollUp,
    /// 5
    ScrollDown,
}

impl From<MouseButton> for u8 {
    fn from(b: MouseButton) -> u8 {
        match b {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
            MouseButton::ScrollUp => 4,
            MouseButton::ScrollDown => 5,
        }
    }
}

impl TryFrom<u8> for MouseButton {
    type Error = u8;

    fn try_from(n: u8) -> std::result::Result<Self, u8> {
        match n {
            1 => Ok(Self::Left),
            2 => Ok(Self::Middle),
            3 => Ok(Self::Right),
            4 => Ok(Self::ScrollUp),
            5 => Ok(Self::ScrollDown),
            _ => Err(n),
        }
    }
}

/// A key symbol and held modifiers
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct KeyCombo {
    /// The held modifier mask
    pub mask: u16,
    /// The keysym that was pressed
    pub keysym: u32,
}

impl KeyCombo {
    /// Create a new KeyCombo from a set of modifiers and a keysym
    pub fn new(mods: &[ModifierKey], keysym: u32) -> Self {
        Self {
            mask: ModifierKey::mask_for(mods),
            keysym,
        }
    }

    /// Create a new KeyCombo from an existing one with the lock modifiers removed
    pub fn cleaned(&self, numlock: u16) -> Self {
        Self {
            mask: clean_mask(self.mask, numlock),
            keysym: self.keysym,
        }
    }
}

/// A mouse button and held modifiers
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct MouseState {
    /// The button being pressed
    pub button: MouseButton,
    /// The held modifier mask
    pub mask: u16,
}

impl MouseState {
    /// Construct a new MouseState
    pub fn new(button: MouseButton, mods: &[ModifierKey]) -> Self {
        Self {
            button,
            mask: ModifierKey::mask_for(mods),
        }
    }

    /// Create a new MouseState from an existing one with the lock modifiers removed
    pub fn cleaned(&self, numlock: u16) -> Self {
        Self {
            button: self.button,
            mask: clean_mask(self.mask, numlock),
        }
    }
}

/// Something that the window manager can do in response to a binding
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// Run an external program given as an argv vector
    Spawn(Vec<String>),
    /// Ask the focused client to close
    KillFocused,
    /// Toggle the maximized state of the focused client
    ToggleMaximize,
    /// Focus the next client in the ring of the current workspace
    FocusNext,
    /// Focus the previous client in the ring of the current workspace
    FocusPrevious,
    /// Switch to the given workspace
    SwitchWorkspace(usize),
    /// Move the focused client to the given workspace
    SendToWorkspace(usize),
    /// Switch to the next workspace, wrapping at the end
    NextWorkspace,
    /// Switch to the previous workspace, wrapping at the start
    PreviousWorkspace,
    /// Start moving the focused client with the pointer
    MouseMove,
    /// Start resizing the focused client with the pointer
    MouseResize,
    /// Exit the window manager
    Quit,
}

impl Action {
    /// Build a [Action::Spawn] from a whitespace separated command line
    pub fn spawn(cmd: &str) -> Self {
        Self::Spawn(cmd.split_whitespace().map(String::from).collect())
    }

    /// The workspace index referenced by this action if it has one
    pub fn workspace(&self) -> Option<usize> {
        match self {
            Self::SwitchWorkspace(n) | Self::SendToWorkspace(n) => Some(*n),
            _ => None,
        }
    }

    /// Whether this action starts a pointer drag
    pub fn is_drag(&self) -> bool {
        matches!(self, Self::MouseMove | Self::MouseResize)
    }
}

/// A key binding: when `key` is pressed run `action`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    /// The key combination to match
    pub key: KeyCombo,
    /// The action to run
    pub action: Action,
}

impl KeyBinding {
    /// Create a new key binding
    pub fn new(mods: &[ModifierKey], keysym: u32, action: Action) -> Self {
        Self {
            key: KeyCombo::new(mods, keysym),
            action,
        }
    }
}

/// A mouse binding: when `state` is pressed over a client run `action`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonBinding {
    /// The button and modifiers to match
    pub state: MouseState,
    /// The action to run
    pub action: Action,
}

impl ButtonBinding {
    /// Create a new button binding
    pub fn new(mods: &[ModifierKey], button: MouseButton, action: Action) -> Self {
        Self {
            state: MouseState::new(button, mods),
            action,
        }
    }
}

/// Find the action for the first key binding matching `key` once lock modifiers are ignored.
pub fn match_key(bindings: &[KeyBinding], key: KeyCombo, numlock: u16) -> Option<&Action> {
    let key = key.cleaned(numlock);

    bindings.iter().find(|b| b.key == key).map(|b| &b.action)
}

/// Find the action for the first button binding matching `state` once lock modifiers are
/// ignored.
pub fn match_button(bindings: &[ButtonBinding], state: MouseState, numlock: u16) -> Option<&Action> {
    let state = state.cleaned(numlock);

    bindings.iter().find(|b| b.state == state).map(|b| &b.action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keysyms::{XK_Return, XK_p};
    use simple_test_case::test_case;

    const NUMLOCK: u16 = 1 << 4;

    fn bindings() -> Vec<KeyBinding> {
        vec![
            KeyBinding::new(&[ModifierKey::Meta], XK_Return, Action::spawn("alacritty")),
            KeyBinding::new(&[ModifierKey::Meta], XK_p, Action::spawn("dmenu_run")),
            KeyBinding::new(&[ModifierKey::Meta], XK_p, Action::Quit),
            KeyBinding::new(&[ModifierKey::Meta, ModifierKey::Shift], XK_p, Action::KillFocused),
        ]
    }

    #[test_case(u16::from(ModifierKey::Meta), XK_Return, Some(Action::spawn("alacritty")); "exact match")]
    #[test_case(u16::from(ModifierKey::Meta) | NUMLOCK, XK_Return, Some(Action::spawn("alacritty")); "numlock held")]
    #[test_case(u16::from(ModifierKey::Meta) | LOCK_MASK, XK_Return, Some(Action::spawn("alacritty")); "caps lock held")]
    #[test_case(u16::from(ModifierKey::Meta), XK_p, Some(Action::spawn("dmenu_run")); "first match wins")]
    #[test_case(ModifierKey::mask_for(&[ModifierKey::Meta, ModifierKey::Shift]), XK_p, Some(Action::KillFocused); "extra modifier")]
    #[test_case(0, XK_Return, None; "missing modifier")]
    #[test_case(u16::from(ModifierKey::Alt), XK_Return, None; "wrong modifier")]
    #[test]
    fn key_matching(mask: u16, keysym: u32, expected: Option<Action>) {
        let bs = bindings();
        let action = match_key(&bs, KeyCombo { mask, keysym }, NUMLOCK);

        assert_eq!(action, expected.as_ref());
    }

    #[test]
    fn button_matching_ignores_lock_and_button_state() {
        let bs = vec![ButtonBinding::new(
            &[ModifierKey::Meta],
            MouseButton::Left,
            Action::MouseMove,
        )];
        let state = MouseState {
            button: MouseButton::Left,
            mask: u16::from(ModifierKey::Meta) | NUMLOCK | LOCK_MASK | (1 << 8),
        };

        assert_eq!(match_button(&bs, state, NUMLOCK), Some(&Action::MouseMove));
    }

    #[test]
    fn held_modifiers_are_decoded() {
        let mask = ModifierKey::mask_for(&[ModifierKey::Shift, ModifierKey::Meta]);

        assert_eq!(
            ModifierKey::held_in(mask),
            vec![ModifierKey::Shift, ModifierKey::Meta]
        );
    }

    #[test_case(1, Ok(MouseButton::Left); "left")]
    #[test_case(3, Ok(MouseButton::Right); "right")]
    #[test_case(9, Err(9); "unknown")]
    #[test]
    fn mouse_button_from_u8(n: u8, expected: std::result::Result<MouseButton, u8>) {
        assert_eq!(MouseButton::try_from(n), expected);
    }
}
