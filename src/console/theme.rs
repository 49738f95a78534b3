//! Console color semantics.
//!
//! Color semantics:
//! - Green: success (created, posted, logged in)
//! - Yellow: warning, retry prompts, paging boundaries
//! - Red: collaborator failures
//! - Cyan: interactive elements (menu numbers, command hints)
//! - Dim: de-emphasized (page counters, timestamps)
//! - Bold: headings

use crossterm::style::{Attribute, Color, ContentStyle};

// ============================================================================
// SEMANTIC STYLES
// ============================================================================

fn fg(color: Color) -> ContentStyle {
    ContentStyle {
        foreground_color: Some(color),
        ..ContentStyle::default()
    }
}

/// Success: green.
pub fn safe() -> ContentStyle {
    fg(Color::Green)
}

/// Warning / retry: yellow.
pub fn warning() -> ContentStyle {
    fg(Color::Yellow)
}

/// Failure: red.
pub fn danger() -> ContentStyle {
    fg(Color::Red)
}

/// Interactive element / command hint: cyan.
pub fn interactive() -> ContentStyle {
    fg(Color::Cyan)
}

/// De-emphasized metadata: dark gray.
pub fn dim() -> ContentStyle {
    fg(Color::DarkGrey)
}

/// Heading: bold.
pub fn title() -> ContentStyle {
    ContentStyle {
        attributes: Attribute::Bold.into(),
        ..ContentStyle::default()
    }
}

/// Render `text` in `style`, or plain when color is off.
pub fn paint(style: ContentStyle, text: &str, color: bool) -> String {
    if color {
        style.apply(text).to_string()
    } else {
        text.to_string()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_styles_have_expected_colors() {
        assert_eq!(safe().foreground_color, Some(Color::Green));
        assert_eq!(warning().foreground_color, Some(Color::Yellow));
        assert_eq!(danger().foreground_color, Some(Color::Red));
        assert_eq!(interactive().foreground_color, Some(Color::Cyan));
        assert_eq!(dim().foreground_color, Some(Color::DarkGrey));
    }

    #[test]
    fn title_is_bold() {
        assert!(title().attributes.has(Attribute::Bold));
    }

    #[test]
    fn paint_without_color_is_plain() {
        assert_eq!(paint(danger(), "failed", false), "failed");
    }

    #[test]
    fn paint_with_color_wraps_text() {
        let painted = paint(danger(), "failed", true);
        assert!(painted.contains("failed"));
        assert_ne!(painted, "failed");
    }
}
