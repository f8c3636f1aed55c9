//! Help overlay content, parsed once from the bundled markdown.
//!
//! The bundled file only uses top-level headings, section headings, and
//! bullets; styling is applied at render time so the overlay follows the
//! active theme.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::theme::Theme;

const HELP_MD: &str = include_str!("help/help.md");

#[derive(Debug, Clone, PartialEq, Eq)]
enum HelpLine {
    Title(String),
    Section(String),
    Bullet(String),
    Text(String),
    Blank,
}

#[derive(Debug, Clone)]
pub struct HelpContent {
    lines: Vec<HelpLine>,
}

impl HelpContent {
    pub fn new() -> Self {
        Self {
            lines: HELP_MD.lines().map(parse_line).collect(),
        }
    }

    pub fn text(&self, theme: &Theme) -> Text<'static> {
        let lines = self
            .lines
            .iter()
            .map(|line| match line {
                HelpLine::Title(content) => Line::from(Span::styled(
                    content.clone(),
                    Style::default()
                        .fg(theme.primary)
                        .add_modifier(Modifier::BOLD),
                )),
                HelpLine::Section(content) => Line::from(Span::styled(
                    content.clone(),
                    Style::default().fg(theme.primary),
                )),
                HelpLine::Bullet(content) => Line::from(vec![
                    Span::styled("  • ", Style::default().fg(theme.secondary)),
                    Span::raw(content.clone()),
                ]),
                HelpLine::Text(content) => Line::from(content.clone()),
                HelpLine::Blank => Line::from(""),
            })
            .collect::<Vec<_>>();
        Text::from(lines)
    }
}

impl Default for HelpContent {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_line(line: &str) -> HelpLine {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return HelpLine::Blank;
    }
    if let Some(content) = trimmed.strip_prefix("## ") {
        return HelpLine::Section(content.to_string());
    }
    if let Some(content) = trimmed.strip_prefix("# ") {
        return HelpLine::Title(content.to_string());
    }
    if let Some(content) = trimmed.strip_prefix("- ") {
        return HelpLine::Bullet(content.to_string());
    }
    HelpLine::Text(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_sections_and_bullets_parse() {
        assert_eq!(parse_line("# Encore Keys"), HelpLine::Title("Encore Keys".into()));
        assert_eq!(parse_line("## Global"), HelpLine::Section("Global".into()));
        assert_eq!(
            parse_line("- Esc: cancel or quit"),
            HelpLine::Bullet("Esc: cancel or quit".into())
        );
        assert_eq!(parse_line("   "), HelpLine::Blank);
        assert_eq!(parse_line("plain prose"), HelpLine::Text("plain prose".into()));
    }

    #[test]
    fn bundled_help_covers_every_tab() {
        let content = HelpContent::new();
        let sections: Vec<&str> = content
            .lines
            .iter()
            .filter_map(|line| match line {
                HelpLine::Section(name) => Some(name.as_str()),
                _ => None,
            })
            .collect();
        for tab in ["Manual", "Search", "Album"] {
            assert!(sections.contains(&tab), "missing help section for {tab}");
        }
    }

    #[test]
    fn rendering_follows_the_theme() {
        let content = HelpContent {
            lines: vec![
                HelpLine::Section("Global".into()),
                HelpLine::Bullet("F1: toggle help".into()),
            ],
        };
        let theme = Theme::default();
        let text = content.text(&theme);
        assert_eq!(text.lines.len(), 2);
        assert_eq!(text.lines[0].spans[0].style.fg, Some(theme.primary));
        assert_eq!(text.lines[1].spans[0].style.fg, Some(theme.secondary));
    }
}
