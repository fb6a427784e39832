use crossterm::event::KeyCode;

use crate::indicator::IndicatorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    ToggleIndicator(IndicatorKind),
    ToggleTheme,
    PrevCoin,
    NextCoin,
    Refresh,
    OpenAlertForm,
    AlertUp,
    AlertDown,
    DeleteAlert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormCommand {
    NextField,
    PrevField,
    Input(char),
    Backspace,
    Submit,
    Cancel,
}

pub fn parse_main_command(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::Left => Some(UiCommand::PrevCoin),
        KeyCode::Right => Some(UiCommand::NextCoin),
        KeyCode::Up => Some(UiCommand::AlertUp),
        KeyCode::Down => Some(UiCommand::AlertDown),
        KeyCode::Delete => Some(UiCommand::DeleteAlert),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(UiCommand::Quit),
            '1' => Some(UiCommand::ToggleIndicator(IndicatorKind::Sma)),
            '2' => Some(UiCommand::ToggleIndicator(IndicatorKind::Ema)),
            '3' => Some(UiCommand::ToggleIndicator(IndicatorKind::Rsi)),
            't' => Some(UiCommand::ToggleTheme),
            'h' => Some(UiCommand::PrevCoin),
            'l' => Some(UiCommand::NextCoin),
            'r' => Some(UiCommand::Refresh),
            'n' => Some(UiCommand::OpenAlertForm),
            'k' => Some(UiCommand::AlertUp),
            'j' => Some(UiCommand::AlertDown),
            'x' => Some(UiCommand::DeleteAlert),
            _ => None,
        },
        _ => None,
    }
}

/// Keys while the new-alert popup is open. Characters go to the focused field.
pub fn parse_form_command(key_code: &KeyCode) -> Option<FormCommand> {
    match key_code {
        KeyCode::Tab | KeyCode::Down => Some(FormCommand::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(FormCommand::PrevField),
        KeyCode::Backspace => Some(FormCommand::Backspace),
        KeyCode::Enter => Some(FormCommand::Submit),
        KeyCode::Esc => Some(FormCommand::Cancel),
        KeyCode::Char(c) => Some(FormCommand::Input(*c)),
        _ => None,
    }
}
