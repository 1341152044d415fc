use crate::config::{Slot, Toggle};
use crate::session::TextField;

use super::animation::RenderState;

// ============================================================================
// Main screen focus
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotField {
    #[default]
    Owner,
    Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MainState {
    pub row: usize,
    pub field: SlotField,
}

impl MainState {
    pub fn slot(&self) -> Slot {
        Slot::from_index(self.row).unwrap_or(Slot::Opus)
    }

    pub fn move_up(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        self.row = (self.row + 1).min(Slot::ALL.len() - 1);
    }
}

// ============================================================================
// Config screen focus
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Text(TextField),
    Toggle(Toggle),
}

pub const CONFIG_FIELDS: [ConfigField; 5] = [
    ConfigField::Text(TextField::BaseUrl),
    ConfigField::Text(TextField::ApiKey),
    ConfigField::Toggle(Toggle::EnableTelemetry),
    ConfigField::Toggle(Toggle::DisableCostWarnings),
    ConfigField::Toggle(Toggle::DisableNonessentialTraffic),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigState {
    pub focus: usize,
    pub base_url_cursor: usize,
    pub api_key_cursor: usize,
    /// Main screen focus to restore on the way back.
    pub return_to: MainState,
}

impl ConfigState {
    /// Focus on the first field with each cursor after the current text.
    pub fn enter(return_to: MainState, base_url: &str, api_key: &str) -> Self {
        Self {
            focus: 0,
            base_url_cursor: base_url.chars().count(),
            api_key_cursor: api_key.chars().count(),
            return_to,
        }
    }

    pub fn field(&self) -> ConfigField {
        CONFIG_FIELDS[self.focus.min(CONFIG_FIELDS.len() - 1)]
    }

    pub fn move_up(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        self.focus = (self.focus + 1).min(CONFIG_FIELDS.len() - 1);
    }

    pub fn cursor(&self, field: TextField) -> usize {
        match field {
            TextField::BaseUrl => self.base_url_cursor,
            TextField::ApiKey => self.api_key_cursor,
        }
    }

    pub fn set_cursor(&mut self, field: TextField, cursor: usize) {
        match field {
            TextField::BaseUrl => self.base_url_cursor = cursor,
            TextField::ApiKey => self.api_key_cursor = cursor,
        }
    }
}

// ============================================================================
// App state
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main(MainState),
    Config(ConfigState),
}

#[derive(Debug)]
pub struct App<R> {
    pub screen: Screen,
    pub should_exit: bool,
    pub render: RenderState<R>,
}

impl<R> App<R> {
    pub fn new(render: RenderState<R>) -> Self {
        Self {
            screen: Screen::Main(MainState::default()),
            should_exit: false,
            render,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_focus_is_clamped() {
        let mut state = MainState::default();
        state.move_up();
        assert_eq!(state.row, 0);
        for _ in 0..5 {
            state.move_down();
        }
        assert_eq!(state.row, 2);
        assert_eq!(state.slot(), Slot::Haiku);
    }

    #[test]
    fn config_focus_does_not_wrap() {
        let mut state = ConfigState::enter(MainState::default(), "http://x", "");
        assert_eq!(state.base_url_cursor, 8);
        assert_eq!(state.api_key_cursor, 0);
        state.move_up();
        assert_eq!(state.field(), ConfigField::Text(TextField::BaseUrl));
        for _ in 0..10 {
            state.move_down();
        }
        assert_eq!(
            state.field(),
            ConfigField::Toggle(Toggle::DisableNonessentialTraffic)
        );
    }
}
