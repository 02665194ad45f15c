use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub panel: Color,
    pub text: Color,
    pub text_muted: Color,
    pub border: Color,
    pub accent: Color,
    pub positive: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            panel: Color::Rgb(20, 26, 32),
            text: Color::Rgb(220, 220, 220),
            text_muted: Color::Rgb(140, 140, 140),
            border: Color::Rgb(70, 78, 86),
            accent: Color::Rgb(80, 160, 160),
            positive: Color::Rgb(110, 180, 110),
            warning: Color::Rgb(210, 170, 80),
            error: Color::Rgb(200, 80, 80),
        }
    }
}
