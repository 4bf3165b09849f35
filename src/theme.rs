use ratatui::style::Color;
use terminal_colorsaurus::{QueryOptions, ThemeMode, theme_mode};

pub struct Theme {
    pub border: Color,
    pub axis: Color,
    pub labels: Color,
    pub title: Color,
    pub series: [Color; 3],
}

impl Theme {
    pub fn default() -> Self {
        match theme_mode(QueryOptions::default()) {
            Ok(ThemeMode::Dark) => Theme::dark(),
            Ok(ThemeMode::Light) => Theme::light(),
            _ => Theme::dark(),
        }
    }

    pub fn dark() -> Self {
        let gutter = Color::Rgb(131, 148, 150);
        Theme {
            border: gutter,
            axis: gutter,
            labels: Color::Rgb(192, 192, 192),
            title: Color::Rgb(230, 219, 116),
            series: [
                Color::Rgb(253, 151, 31),
                Color::Rgb(102, 217, 239),
                Color::Rgb(190, 132, 255),
            ],
        }
    }

    pub fn light() -> Self {
        let gutter = Color::Rgb(131, 148, 150);
        Theme {
            border: gutter,
            axis: gutter,
            labels: Color::Rgb(73, 72, 62),
            title: Color::Rgb(153, 143, 47),
            series: [
                Color::Rgb(207, 112, 0),
                Color::Rgb(0, 137, 179),
                Color::Rgb(104, 77, 153),
            ],
        }
    }
}
