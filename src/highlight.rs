use inksac::prelude::*;

use crate::core::commands::CommandType;

#[derive(Debug, Clone, Copy)]
pub struct SyntaxHighlighter {
    color_support: ColorSupport,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    pub fn new() -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self {
            color_support: support,
        }
    }

    /// A highlighter that never emits escape sequences.
    pub fn plain() -> Self {
        Self {
            color_support: ColorSupport::NoColor,
        }
    }

    pub fn with_support(color_support: ColorSupport) -> Self {
        Self { color_support }
    }

    fn enabled(&self) -> bool {
        !matches!(self.color_support, ColorSupport::NoColor)
    }

    /// Colors the verb and flags of `input`. Whitespace is copied through
    /// untouched so the rendered line lines up with the cursor.
    pub fn highlight_command(&self, input: &str) -> String {
        if !self.enabled() {
            return input.to_string();
        }

        let mut highlighted = String::with_capacity(input.len());
        let mut rest = input;
        let mut first = true;

        while !rest.is_empty() {
            let gap = rest.len() - rest.trim_start().len();
            highlighted.push_str(&rest[..gap]);
            rest = &rest[gap..];

            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let (word, tail) = rest.split_at(end);
            rest = tail;
            if word.is_empty() {
                break;
            }

            highlighted.push_str(&self.highlight_word(word, first));
            first = false;
        }

        highlighted
    }

    fn highlight_word(&self, word: &str, is_command: bool) -> String {
        if is_command {
            // Known verbs in cyan, anything else in red
            let command_color = if CommandType::is_known(word) {
                Color::Cyan
            } else {
                Color::Red
            };
            let command_style = Style::builder()
                .foreground(command_color)
                .bold()
                .build();
            word.style(command_style).to_string()
        } else if word.starts_with('-') {
            let flag_style = Style::builder().foreground(Color::Yellow).build();
            word.style(flag_style).to_string()
        } else {
            word.to_string()
        }
    }

    pub fn highlight_error(&self, error: &str) -> String {
        if !self.enabled() {
            return error.to_string();
        }

        let error_style = Style::builder().foreground(Color::Red).bold().build();

        error.style(error_style).to_string()
    }

    pub fn highlight_directory(&self, name: &str) -> String {
        if !self.enabled() {
            return name.to_string();
        }

        let dir_style = Style::builder().foreground(Color::Blue).bold().build();

        name.style(dir_style).to_string()
    }

    pub fn highlight_hint(&self, hint: &str) -> String {
        if !self.enabled() {
            return hint.to_string();
        }

        let hint_style = Style::builder()
            .foreground(Color::RGB(128, 128, 128))
            .build();

        hint.style(hint_style).to_string()
    }
}
