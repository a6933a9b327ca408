use console::{style, Color, StyledObject};
use std::fmt::Display;

type Styled = StyledObject<String>;

fn paint(text: impl Display, color: Color) -> Styled {
    style(text.to_string()).fg(color).bright()
}

pub fn bright_yellow(text: impl Display) -> Styled {
    paint(text, Color::Yellow)
}

pub fn bright_green(text: impl Display) -> Styled {
    paint(text, Color::Green)
}

pub fn bright_red(text: impl Display) -> Styled {
    paint(text, Color::Red)
}

pub fn cyan(text: impl Display) -> Styled {
    style(text.to_string()).cyan()
}

pub fn dim(text: impl Display) -> Styled {
    style(text.to_string()).dim()
}

pub fn bright(text: impl Display) -> Styled {
    style(text.to_string()).bright()
}

pub fn magenta_bold(text: impl Display) -> Styled {
    style(text.to_string()).magenta().bold()
}

/// Colour band for a build success rate: green above 80%, yellow from 50%.
fn rate_color(rate: f64) -> Color {
    if rate > 80.0 {
        Color::Green
    } else if rate >= 50.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// `66.67%`, coloured by [`rate_color`].
pub fn success_rate(rate: f64) -> Styled {
    paint(format!("{rate:.2}%"), rate_color(rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_color_bands() {
        assert_eq!(rate_color(100.0), Color::Green);
        assert_eq!(rate_color(80.01), Color::Green);
        assert_eq!(rate_color(80.0), Color::Yellow);
        assert_eq!(rate_color(50.0), Color::Yellow);
        assert_eq!(rate_color(49.99), Color::Red);
        assert_eq!(rate_color(0.0), Color::Red);
    }

    #[test]
    fn test_success_rate_text() {
        let styled = success_rate(66.666).force_styling(false);
        assert_eq!(styled.to_string(), "66.67%");
    }
}
