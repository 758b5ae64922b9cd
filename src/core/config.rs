//! User facing configuration of the window manager.
use crate::{
    core::bindings::{Action, ButtonBinding, KeyBinding, ModifierKey, MouseButton},
    keysyms::*,
    Color, Error, Result,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The keys used to select workspaces, in workspace order.
///
/// Home and End are aliases for the first and last workspace.
const WORKSPACE_KEYS: [(u32, usize); 12] = [
    (XK_Home, 0),
    (XK_1, 0),
    (XK_2, 1),
    (XK_3, 2),
    (XK_4, 3),
    (XK_5, 4),
    (XK_6, 5),
    (XK_7, 6),
    (XK_8, 7),
    (XK_9, 8),
    (XK_0, 9),
    (XK_End, 9),
];

/// The user specified config options for how the window manager should run
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The number of workspaces
    pub workspaces: usize,
    /// The border width of each window in pixels
    pub border_width: u32,
    /// The border color used for the focused client
    pub focused_border: Color,
    /// The border color used for every other client
    pub normal_border: Color,
    /// Key bindings, matched in order
    pub key_bindings: Vec<KeyBinding>,
    /// Mouse bindings for clients, matched in order
    pub button_bindings: Vec<ButtonBinding>,
}

impl Default for Config {
    fn default() -> Self {
        let m = ModifierKey::Meta;
        let ms = [ModifierKey::Meta, ModifierKey::Shift];

        let mut key_bindings = vec![
            KeyBinding::new(&[m], XK_Return, Action::spawn("alacritty")),
            KeyBinding::new(&[m], XK_p, Action::spawn("dmenu_run")),
            KeyBinding::new(&[m], XK_Page_Up, Action::PreviousWorkspace),
            KeyBinding::new(&[m], XK_Page_Down, Action::NextWorkspace),
            KeyBinding::new(&[m], XK_Tab, Action::FocusNext),
            KeyBinding::new(&ms, XK_Tab, Action::FocusPrevious),
            KeyBinding::new(&[m], XK_f, Action::ToggleMaximize),
            KeyBinding::new(&[m], XK_q, Action::KillFocused),
            KeyBinding::new(&ms, XK_q, Action::Quit),
        ];

        for (keysym, wix) in WORKSPACE_KEYS {
            key_bindings.push(KeyBinding::new(&ms, keysym, Action::SendToWorkspace(wix)));
            key_bindings.push(KeyBinding::new(&[m], keysym, Action::SwitchWorkspace(wix)));
        }

        Self {
            workspaces: 10,
            border_width: 1,
            focused_border: Color::from(0xff0000),
            normal_border: Color::from(0x005577),
            key_bindings,
            button_bindings: vec![
                ButtonBinding::new(&[m], MouseButton::Left, Action::MouseMove),
                ButtonBinding::new(&[m], MouseButton::Right, Action::MouseResize),
            ],
        }
    }
}

impl Config {
    /// Check that this config can be used to run the window manager.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(Error::InvalidConfig(msg)) };

        if self.workspaces == 0 {
            return invalid("at least one workspace is required".into());
        }

        if self.workspaces > u8::MAX as usize {
            return invalid(format!("at most {} workspaces are supported", u8::MAX));
        }

        let actions = self
            .key_bindings
            .iter()
            .map(|b| &b.action)
            .chain(self.button_bindings.iter().map(|b| &b.action));

        for action in actions {
            match action.workspace() {
                Some(wix) if wix >= self.workspaces => {
                    return invalid(format!(
                        "{action:?} refers to workspace {wix} but there are only {}",
                        self.workspaces
                    ));
                }
                _ => (),
            }

            if let Action::Spawn(argv) = action {
                if argv.is_empty() {
                    return invalid("spawn actions need a program to run".into());
                }
            }
        }

        if let Some(b) = self.key_bindings.iter().find(|b| b.action.is_drag()) {
            return invalid(format!("{:?} can only be used as a mouse binding", b.action));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn default_config_has_bindings_for_every_workspace() {
        let c = Config::default();

        for wix in 0..c.workspaces {
            assert!(c
                .key_bindings
                .iter()
                .any(|b| b.action == Action::SwitchWorkspace(wix)));
            assert!(c
                .key_bindings
                .iter()
                .any(|b| b.action == Action::SendToWorkspace(wix)));
        }
    }

    fn with_workspaces(n: usize) -> Config {
        Config {
            workspaces: n,
            key_bindings: vec![],
            ..Default::default()
        }
    }

    #[test_case(with_workspaces(0); "no workspaces")]
    #[test_case(with_workspaces(256); "too many workspaces")]
    #[test_case(Config { workspaces: 3, ..Default::default() }; "binding out of range")]
    #[test_case(Config {
        key_bindings: vec![KeyBinding::new(&[ModifierKey::Meta], XK_f, Action::MouseMove)],
        ..Default::default()
    }; "drag on a key")]
    #[test_case(Config {
        key_bindings: vec![KeyBinding::new(&[ModifierKey::Meta], XK_f, Action::Spawn(vec![]))],
        ..Default::default()
    }; "empty spawn")]
    #[test]
    fn invalid_configs(c: Config) {
        assert!(matches!(c.validate(), Err(Error::InvalidConfig(_))));
    }
}
