use inksac::prelude::*;

/// Styles interpreter diagnostics when the terminal supports color.
/// Child-status reports keep their plain format either way.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticStyle {
    color_support: ColorSupport,
}

impl Default for DiagnosticStyle {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticStyle {
    pub fn new() -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self {
            color_support: support,
        }
    }

    pub fn error(&self, message: &str) -> String {
        if matches!(self.color_support, ColorSupport::NoColor) {
            return message.to_string();
        }

        let error_style = Style::builder().foreground(Color::Red).bold().build();

        message.style(error_style).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_keeps_message_text() {
        let style = DiagnosticStyle::new();
        let rendered = style.error("fork failed");
        assert!(rendered.contains("fork failed"));
    }
}
