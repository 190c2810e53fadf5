//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from the config file (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette — semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Category tree --
    pub category_normal: Style,
    pub category_selected: Style,
    /// The active (filtering) category when the cursor is elsewhere.
    pub category_active: Style,
    pub category_count: Style,
    pub breadcrumb: Style,
    pub breadcrumb_leaf: Style,

    // -- Article list --
    pub article_title: Style,
    pub article_selected: Style,
    pub article_date: Style,
    pub article_category_tag: Style,
    pub article_excerpt: Style,
    pub page_indicator: Style,

    // -- Reader --
    pub reader_heading: Style,
    pub reader_body: Style,
    pub reader_metadata: Style,
    pub reader_code_block: Style,
    pub reader_inline_code: Style,
    pub reader_emphasis: Style,
    pub reader_strong: Style,
    pub reader_image: Style,
    pub reader_link: Style,
    pub reader_error: Style,
    pub reader_fallback: Style,

    // -- Sidebar / about --
    pub sidebar_heading: Style,
    pub sidebar_value: Style,
    pub sidebar_tag: Style,
    pub about_section: Style,
    pub about_detail: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            // Category tree
            category_normal: Style::default(),
            category_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            category_active: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            category_count: Style::default().fg(Color::DarkGray),
            breadcrumb: Style::default().fg(Color::Gray),
            breadcrumb_leaf: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            // Article list
            article_title: Style::default().add_modifier(Modifier::BOLD),
            article_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            article_date: Style::default().fg(Color::DarkGray),
            article_category_tag: Style::default().fg(Color::Magenta),
            article_excerpt: Style::default().fg(Color::Gray),
            page_indicator: Style::default().fg(Color::DarkGray),

            // Reader
            reader_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default(),
            reader_metadata: Style::default().fg(Color::DarkGray),
            reader_code_block: Style::default().fg(Color::Yellow).bg(Color::Black),
            reader_inline_code: Style::default().fg(Color::Yellow),
            reader_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            reader_strong: Style::default().add_modifier(Modifier::BOLD),
            reader_image: Style::default().fg(Color::Blue),
            reader_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            reader_error: Style::default().fg(Color::Red),
            reader_fallback: Style::default().fg(Color::Yellow),

            // Sidebar / about
            sidebar_heading: Style::default().add_modifier(Modifier::BOLD),
            sidebar_value: Style::default().fg(Color::Gray),
            sidebar_tag: Style::default().fg(Color::Magenta),
            about_section: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            about_detail: Style::default().fg(Color::Gray),

            // Chrome
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    /// Light palette — adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            category_normal: Style::default().fg(Color::Black),
            category_selected: Style::default().bg(Color::Blue).fg(Color::White),
            category_active: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            category_count: Style::default().fg(Color::Gray),
            breadcrumb: Style::default().fg(Color::DarkGray),
            breadcrumb_leaf: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            article_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            article_selected: Style::default().bg(Color::Blue).fg(Color::White),
            article_date: Style::default().fg(Color::Gray),
            article_category_tag: Style::default().fg(Color::Magenta),
            article_excerpt: Style::default().fg(Color::DarkGray),
            page_indicator: Style::default().fg(Color::Gray),

            reader_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default().fg(Color::Black),
            reader_metadata: Style::default().fg(Color::Gray),
            reader_code_block: Style::default().fg(Color::Red).bg(Color::White),
            reader_inline_code: Style::default().fg(Color::Red),
            reader_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            reader_strong: Style::default().add_modifier(Modifier::BOLD),
            reader_image: Style::default().fg(Color::Blue),
            reader_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            reader_error: Style::default().fg(Color::Red),
            reader_fallback: Style::default().fg(Color::Magenta),

            sidebar_heading: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            sidebar_value: Style::default().fg(Color::DarkGray),
            sidebar_tag: Style::default().fg(Color::Magenta),
            about_section: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            about_detail: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::Gray).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }
}

// ============================================================================
// Style Map — role-name resolution
// ============================================================================

/// Resolves semantic role names to styles at render time.
///
/// Unknown roles resolve to `Style::default()` so a renamed role degrades
/// to unstyled text instead of a panic mid-render.
#[derive(Debug, Clone)]
pub struct StyleMap {
    styles: HashMap<&'static str, Style>,
}

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let mut styles = HashMap::new();

        styles.insert("category_normal", p.category_normal);
        styles.insert("category_selected", p.category_selected);
        styles.insert("category_active", p.category_active);
        styles.insert("category_count", p.category_count);
        styles.insert("breadcrumb", p.breadcrumb);
        styles.insert("breadcrumb_leaf", p.breadcrumb_leaf);

        styles.insert("article_title", p.article_title);
        styles.insert("article_selected", p.article_selected);
        styles.insert("article_date", p.article_date);
        styles.insert("article_category_tag", p.article_category_tag);
        styles.insert("article_excerpt", p.article_excerpt);
        styles.insert("page_indicator", p.page_indicator);

        styles.insert("reader_heading", p.reader_heading);
        styles.insert("reader_body", p.reader_body);
        styles.insert("reader_metadata", p.reader_metadata);
        styles.insert("reader_code_block", p.reader_code_block);
        styles.insert("reader_inline_code", p.reader_inline_code);
        styles.insert("reader_emphasis", p.reader_emphasis);
        styles.insert("reader_strong", p.reader_strong);
        styles.insert("reader_image", p.reader_image);
        styles.insert("reader_link", p.reader_link);
        styles.insert("reader_error", p.reader_error);
        styles.insert("reader_fallback", p.reader_fallback);

        styles.insert("sidebar_heading", p.sidebar_heading);
        styles.insert("sidebar_value", p.sidebar_value);
        styles.insert("sidebar_tag", p.sidebar_tag);
        styles.insert("about_section", p.about_section);
        styles.insert("about_detail", p.about_detail);

        styles.insert("status_bar", p.status_bar);
        styles.insert("panel_border", p.panel_border);
        styles.insert("panel_border_focused", p.panel_border_focused);

        Self { styles }
    }

    pub fn resolve(&self, role: &str) -> Style {
        self.styles.get(role).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_parsing() {
        assert_eq!(ThemeVariant::from_str_name("dark"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name("LIGHT"), Some(ThemeVariant::Light));
        assert_eq!(ThemeVariant::from_str_name("solarized"), None);
    }

    #[test]
    fn variant_cycle_round_trips() {
        assert_eq!(ThemeVariant::Dark.next(), ThemeVariant::Light);
        assert_eq!(ThemeVariant::Dark.next().next(), ThemeVariant::Dark);
    }

    #[test]
    fn known_roles_resolve() {
        let map = StyleMap::from_palette(&ThemeVariant::Dark.palette());
        assert_ne!(map.resolve("category_selected"), Style::default());
        assert_ne!(map.resolve("status_bar"), Style::default());
    }

    #[test]
    fn unknown_role_resolves_to_default() {
        let map = StyleMap::from_palette(&ThemeVariant::Dark.palette());
        assert_eq!(map.resolve("no_such_role"), Style::default());
    }
}
