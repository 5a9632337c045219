use crate::config::Config;
use crate::render::{LineKind, TaggedLine};
use anyhow::{Context, Result};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::path::PathBuf;
use syntect::highlighting::{Highlighter, Theme, ThemeSet};
use syntect::parsing::Scope;

pub struct ThemeManager {
    theme_set: ThemeSet,
    theme_names: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct UiPalette {
    pub base_fg: Color,
    pub base_bg: Option<Color>,
    pub accent: Color,
    pub muted: Color,
    pub border: Color,
    pub section: Color,
    pub key: Color,
    pub value: Color,
}

impl UiPalette {
    pub fn base_style(&self) -> Style {
        let style = Style::default().fg(self.base_fg);
        match self.base_bg {
            Some(bg) => style.bg(bg),
            None => style,
        }
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.accent)
            .fg(self.base_bg.unwrap_or(self.base_fg))
    }
}

impl ThemeManager {
    pub fn load(config: &Config) -> Result<Self> {
        let mut theme_set = ThemeSet::load_defaults();

        if let Some(dir) = resolve_bat_theme_dir(config) {
            if dir.exists() {
                let extra = ThemeSet::load_from_folder(&dir)
                    .with_context(|| format!("Failed to load themes from {}", dir.display()))?;
                theme_set.themes.extend(extra.themes);
            }
        }

        let mut theme_names: Vec<String> = theme_set.themes.keys().cloned().collect();
        theme_names.sort();

        Ok(Self {
            theme_set,
            theme_names,
        })
    }

    pub fn theme_names(&self) -> &[String] {
        &self.theme_names
    }

    pub fn has_theme(&self, name: &str) -> bool {
        self.theme_set.themes.contains_key(name)
    }

    pub fn get(&self, name: &str) -> &Theme {
        self.theme_set
            .themes
            .get(name)
            .unwrap_or_else(|| self.fallback_theme())
    }

    pub fn ui_palette(&self, name: &str) -> UiPalette {
        palette_from_theme(self.get(name))
    }

    pub fn fallback_name(&self) -> &str {
        self.theme_names
            .first()
            .map(|s| s.as_str())
            .unwrap_or("base16-ocean.dark")
    }

    fn fallback_theme(&self) -> &Theme {
        let name = self.fallback_name();
        self.theme_set
            .themes
            .get(name)
            .unwrap_or_else(|| self.theme_set.themes.values().next().expect("themeset empty"))
    }
}

fn resolve_bat_theme_dir(config: &Config) -> Option<PathBuf> {
    if let Some(dir) = &config.bat_theme_dir {
        return Some(dir.clone());
    }
    let base = dirs::config_dir()?;
    Some(base.join("bat").join("themes"))
}

fn palette_from_theme(theme: &Theme) -> UiPalette {
    let settings = &theme.settings;
    let base_fg = settings
        .foreground
        .map(to_ratatui)
        .unwrap_or(Color::Gray);
    let base_bg = settings.background.map(to_ratatui);
    let accent = settings
        .selection_foreground
        .or(settings.caret)
        .or(settings.foreground)
        .map(to_ratatui)
        .unwrap_or(Color::Cyan);
    let muted = settings
        .gutter_foreground
        .or(settings.foreground)
        .map(to_ratatui)
        .unwrap_or(Color::DarkGray);

    UiPalette {
        base_fg,
        base_bg,
        accent,
        muted,
        border: muted,
        section: scope_color(theme, "entity.name.section").unwrap_or(accent),
        key: scope_color(theme, "variable.other").unwrap_or(base_fg),
        value: scope_color(theme, "string").unwrap_or(base_fg),
    }
}

/// Foreground the theme assigns to `scope`, if it differs from the default.
fn scope_color(theme: &Theme, scope: &str) -> Option<Color> {
    let scope = Scope::new(scope).ok()?;
    let style = Highlighter::new(theme).style_for_stack(&[scope]);
    let color = style.foreground;
    let is_default = theme.settings.foreground == Some(color);
    (!is_default).then(|| to_ratatui(color))
}

fn to_ratatui(color: syntect::highlighting::Color) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Styles one rendered line by its kind. Headers, keys and values get their
/// own colours; `selected` paints the whole line with the highlight style.
pub fn style_line(line: &TaggedLine, selected: bool, palette: &UiPalette) -> Line<'static> {
    let base = palette.base_style();
    let text = line.text.as_str();
    let mut spans = Vec::new();
    match &line.kind {
        LineKind::Section { .. } => spans.push(Span::styled(
            text.to_string(),
            base.fg(palette.section).add_modifier(Modifier::BOLD),
        )),
        LineKind::Entry { .. } => match text.split_once(" = ") {
            Some((key, value)) => {
                spans.push(Span::styled(key.to_string(), base.fg(palette.key)));
                spans.push(Span::styled(" = ", base.fg(palette.muted)));
                spans.push(Span::styled(value.to_string(), base.fg(palette.value)));
            }
            None => spans.push(Span::styled(text.to_string(), base.fg(palette.key))),
        },
        LineKind::Blank => spans.push(Span::styled(text.to_string(), base)),
    }

    if selected {
        let highlight = palette.highlight_style();
        spans = spans
            .into_iter()
            .map(|span| Span::styled(span.content, highlight))
            .collect();
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::{style_line, UiPalette};
    use crate::render::{LineKind, TaggedLine};
    use ratatui::style::{Color, Modifier};

    fn palette() -> UiPalette {
        UiPalette {
            base_fg: Color::White,
            base_bg: None,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            section: Color::Yellow,
            key: Color::Blue,
            value: Color::Green,
        }
    }

    fn header(name: &str) -> TaggedLine {
        TaggedLine {
            text: format!("[{name}]"),
            kind: LineKind::Section {
                section: name.to_string(),
            },
        }
    }

    fn entry(key: &str, value: &str) -> TaggedLine {
        TaggedLine {
            text: format!("  {key} = {value}"),
            kind: LineKind::Entry {
                section: "Net".to_string(),
                key: key.to_string(),
            },
        }
    }

    #[test]
    fn header_lines_are_bold_section_color() {
        let line = style_line(&header("Net"), false, &palette());
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line.spans[0].style.fg, Some(Color::Yellow));
        assert!(line.spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn entry_lines_split_key_separator_value() {
        let line = style_line(&entry("host", "a = b"), false, &palette());
        let parts: Vec<_> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["  host", " = ", "a = b"]);
        assert_eq!(line.spans[2].style.fg, Some(Color::Green));
    }

    #[test]
    fn entry_with_bracketed_key_is_not_a_header() {
        let line = style_line(&entry("[odd", "1"), false, &palette());
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[0].style.fg, Some(Color::Blue));
        assert!(!line.spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn blank_lines_use_base_style() {
        let blank = TaggedLine {
            text: String::new(),
            kind: LineKind::Blank,
        };
        let line = style_line(&blank, false, &palette());
        assert_eq!(line.spans[0].style.fg, Some(Color::White));
    }

    #[test]
    fn selection_overrides_colors() {
        let line = style_line(&entry("host", "a"), true, &palette());
        assert!(line.spans.iter().all(|s| s.style.bg == Some(Color::Cyan)));
    }
}
