use ratatui::style::Color;

/// Fixed color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub selection_bg: Color,
    pub drop_line: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x10, 0x10, 0x18),
            text: Color::Rgb(0xC8, 0xC8, 0xD8),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x5B, 0x9B, 0xFF),
            dim: Color::Rgb(0x70, 0x70, 0x88),
            red: Color::Rgb(0xFF, 0x55, 0x55),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x50, 0xE0, 0x90),
            cyan: Color::Rgb(0x50, 0xD0, 0xE0),
            selection_bg: Color::Rgb(0x24, 0x30, 0x48),
            drop_line: Color::Rgb(0x5B, 0x9B, 0xFF),
        }
    }
}
