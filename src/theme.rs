//! Fixed style palette for dashboard cells.

#![allow(missing_docs)]

use std::env;

use crossterm::style::Color;

/// Style applied to a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Color,
    pub bold: bool,
}

impl CellStyle {
    #[must_use]
    pub const fn fg(color: Color) -> Self {
        Self {
            fg: color,
            bold: false,
        }
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        Self::fg(Color::Reset)
    }
}

/// The dashboard's fixed style set. Overflow indicator runs share the key
/// style; rule gaps share the rule style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub key: CellStyle,
    pub value: CellStyle,
    pub banner: CellStyle,
    pub rule: CellStyle,
    pub log: CellStyle,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            key: CellStyle::fg(Color::Yellow),
            value: CellStyle::fg(Color::White),
            banner: CellStyle::fg(Color::White).bold(),
            rule: CellStyle::fg(Color::White),
            log: CellStyle::fg(Color::White),
        }
    }
}

/// Color output mode for compatibility with `NO_COLOR` and terminal policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Enabled,
    Disabled,
}

impl ColorMode {
    #[must_use]
    pub const fn from_no_color_flag(no_color: bool) -> Self {
        if no_color { Self::Disabled } else { Self::Enabled }
    }

    #[must_use]
    pub fn from_environment() -> Self {
        Self::from_no_color_flag(env::var_os("NO_COLOR").is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_color_flag_disables_color_output() {
        assert_eq!(ColorMode::from_no_color_flag(true), ColorMode::Disabled);
        assert_eq!(ColorMode::from_no_color_flag(false), ColorMode::Enabled);
    }

    #[test]
    fn default_palette_distinguishes_key_and_value() {
        let palette = Palette::default();
        assert_ne!(palette.key, palette.value);
        assert!(palette.banner.bold);
    }
}
