use crossterm::style::Color;

/// Colors for terminal output. `plain` turns styling off entirely, which is
/// what you want when piping output to a file.
#[derive(Clone, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub styled: bool,
    pub accent: Color,
    pub muted: Color,
    pub thinking: Color,
    pub answer: Color,
    pub error: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            styled: true,
            accent: Color::Rgb { r: 122, g: 162, b: 247 },
            muted: Color::Rgb { r: 100, g: 100, b: 100 },
            thinking: Color::Rgb { r: 224, g: 175, b: 104 },
            answer: Color::Rgb { r: 158, g: 206, b: 106 },
            error: Color::Rgb { r: 247, g: 118, b: 142 },
        }
    }

    pub fn dracula() -> Self {
        Self {
            name: "dracula",
            styled: true,
            accent: Color::Rgb { r: 255, g: 121, b: 198 },
            muted: Color::Rgb { r: 98, g: 114, b: 164 },
            thinking: Color::Rgb { r: 241, g: 250, b: 140 },
            answer: Color::Rgb { r: 80, g: 250, b: 123 },
            error: Color::Rgb { r: 255, g: 85, b: 85 },
        }
    }

    pub fn plain() -> Self {
        Self {
            name: "plain",
            styled: false,
            accent: Color::Reset,
            muted: Color::Reset,
            thinking: Color::Reset,
            answer: Color::Reset,
            error: Color::Reset,
        }
    }

    pub fn by_name(name: &str) -> Self {
        match name {
            "dracula" => Self::dracula(),
            "plain" | "none" => Self::plain(),
            _ => Self::dark(),
        }
    }

    pub fn all_names() -> &'static [&'static str] {
        &["dark", "dracula", "plain"]
    }
}
