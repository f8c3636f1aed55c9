use ratatui::style::Color;
use std::env;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub error: Color,
    pub success: Color,
    pub text: Color,
    pub is_color: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Gray,
            error: Color::Red,
            success: Color::Green,
            text: Color::Reset,
            is_color: true,
        }
    }
}

impl Theme {
    pub fn monochrome() -> Self {
        Self {
            primary: Color::White,
            secondary: Color::Gray,
            error: Color::White,
            success: Color::White,
            text: Color::Reset,
            is_color: false,
        }
    }

    pub fn from_config(name: Option<&str>) -> Self {
        // Honor the NO_COLOR standard (see no-color.org)
        if env::var("NO_COLOR").is_ok() {
            return Self::monochrome();
        }

        match name {
            Some("monochrome") => Self::monochrome(),
            _ => Self::default(),
        }
    }
}
