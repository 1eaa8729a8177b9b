/// CSS class present on `<body>` while the menu is hidden.
pub const MENU_HIDDEN_CLASS: &str = "menu-hidden";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Hidden,
    Visible,
}

impl MenuState {
    pub fn toggled(self) -> Self {
        match self {
            MenuState::Hidden => MenuState::Visible,
            MenuState::Visible => MenuState::Hidden,
        }
    }
}

#[derive(Debug, Default)]
pub struct MenuController {
    state: MenuState,
}

impl MenuController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Flips the state and returns the new one.
    pub fn toggle(&mut self) -> MenuState {
        self.state = self.state.toggled();
        self.state
    }

    pub fn hide(&mut self) {
        self.state = MenuState::Hidden;
    }

    pub fn is_hidden(&self) -> bool {
        self.state == MenuState::Hidden
    }

    pub fn body_class(&self) -> Option<&'static str> {
        match self.state {
            MenuState::Hidden => Some(MENU_HIDDEN_CLASS),
            MenuState::Visible => None,
        }
    }
}
