use crate::command::HELP;
use crate::config::{self, Config};
use crate::render::TaggedLine;
use crate::theme::{style_line, ThemeManager, UiPalette};
use crate::view::{Transition, View, ViewContext};
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, ExecutableCommand};
use log::info;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Clear, List, ListItem, ListState, Paragraph};
use ratatui::Terminal;
use std::env;
use std::io::{self, Stdout};
use std::mem;
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

pub fn run_app(path: Option<PathBuf>, mut config: Config) -> Result<()> {
    let theme_manager = ThemeManager::load(&config)?;
    if !theme_manager.has_theme(&config.theme) {
        config.theme = theme_manager.fallback_name().to_string();
        config::write_config(&config)?;
    }

    let (_, rows) = crossterm::terminal::size().context("Failed to query terminal size")?;
    let ctx = ViewContext {
        dir: env::current_dir().context("Failed to resolve working directory")?,
        extensions: config.extensions.clone(),
        viewport_height: rows.saturating_sub(config.chrome_reserve).max(1) as usize,
    };
    info!(
        "starting in {} (viewport {} rows)",
        ctx.dir.display(),
        ctx.viewport_height
    );

    let view = View::open(path.as_deref(), &ctx);
    let mut app = App {
        view,
        ctx,
        ui: theme_manager.ui_palette(&config.theme),
        show_line_numbers: config.show_line_numbers,
        input: String::new(),
    };

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    loop {
        terminal.draw(|f| ui(f, &app))?;
        if let Event::Key(key) = event::read()? {
            if app.handle_key(key) {
                break;
            }
        }
    }

    info!("exiting");
    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

struct App {
    view: View,
    ctx: ViewContext,
    ui: UiPalette,
    show_line_numbers: bool,
    input: String,
}

impl App {
    /// Returns true when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Esc => {
                self.view.cancel_prompt();
                self.input.clear();
            }
            KeyCode::Enter => {
                let line = mem::take(&mut self.input);
                return self.submit(&line);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Up if self.input.is_empty() && !self.view.is_prompting() => {
                return self.submit("w");
            }
            KeyCode::Down if self.input.is_empty() && !self.view.is_prompting() => {
                return self.submit("s");
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
            }
            _ => {}
        }
        false
    }

    fn submit(&mut self, line: &str) -> bool {
        match self.view.handle_input(line, &self.ctx) {
            Transition::Stay => {}
            Transition::To(next) => {
                info!("{} -> {}", self.view.label(), next.label());
                self.view = next;
            }
            Transition::Quit => return true,
        }
        if let Some(initial) = self.view.prompt_initial() {
            self.input = initial;
        }
        false
    }
}

fn ui(f: &mut ratatui::Frame, app: &App) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.size());
    let main = vertical[0];
    let base_style = app.ui.base_style();

    match &app.view {
        View::FileSelection(view) => {
            let block = app.block(" Open INI file ".to_string());
            if view.files().is_empty() {
                let msg = format!("No INI files in {}", app.ctx.dir.display());
                f.render_widget(Paragraph::new(msg).block(block).style(base_style), main);
            } else {
                let items: Vec<ListItem> = view
                    .files()
                    .iter()
                    .map(|path| {
                        let name = path
                            .file_name()
                            .map(|s| s.to_string_lossy().to_string())
                            .unwrap_or_else(|| path.display().to_string());
                        ListItem::new(name)
                    })
                    .collect();
                let mut state = ListState::default();
                state.select(Some(view.selected()));
                let list = List::new(items)
                    .block(block)
                    .style(base_style)
                    .highlight_style(app.ui.highlight_style());
                f.render_stateful_widget(list, main, &mut state);
            }
        }
        View::LineEditor(view) => {
            let current = view.search().and_then(|s| s.current());
            let visible = view
                .lines()
                .iter()
                .enumerate()
                .skip(view.scroll())
                .take(view.viewport_height())
                .map(|(idx, line)| {
                    app.numbered(idx, view.lines().len(), line, Some(idx) == current)
                })
                .collect::<Vec<_>>();
            f.render_widget(
                Paragraph::new(Text::from(visible))
                    .block(app.block(app.title()))
                    .style(base_style),
                main,
            );
            if view.show_help() {
                render_help(f, app, main);
            }
        }
        View::InlineEditor(view) => {
            let visible = view
                .lines()
                .iter()
                .enumerate()
                .skip(view.scroll())
                .take(app.ctx.viewport_height)
                .map(|(idx, line)| {
                    app.numbered(idx, view.lines().len(), line, idx == view.selected())
                })
                .collect::<Vec<_>>();
            f.render_widget(
                Paragraph::new(Text::from(visible))
                    .block(app.block(app.title()))
                    .style(base_style),
                main,
            );
        }
    }

    f.render_widget(
        Paragraph::new(app.status_line()).style(base_style),
        vertical[1],
    );

    let prompt = if app.view.is_prompting() { "value> " } else { ":" };
    let input_line = Line::from(vec![
        Span::styled(prompt, Style::default().fg(app.ui.accent)),
        Span::styled(app.input.clone(), base_style),
    ]);
    f.render_widget(Paragraph::new(input_line).style(base_style), vertical[2]);
    let x = vertical[2].x + (prompt.width() + app.input.width()) as u16;
    f.set_cursor(x.min(vertical[2].right().saturating_sub(1)), vertical[2].y);
}

fn render_help(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let popup = centered_rect(70, 70, area);
    f.render_widget(Clear, popup);
    let width = HELP.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);
    let lines: Vec<Line> = HELP
        .iter()
        .map(|(usage, what)| {
            Line::from(vec![
                Span::styled(format!("{usage:<width$}  "), Style::default().fg(app.ui.accent)),
                Span::styled(what.to_string(), app.ui.base_style()),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(app.block(" Commands ".to_string()))
            .style(app.ui.base_style()),
        popup,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

impl App {
    fn block(&self, title: String) -> Block<'static> {
        Block::bordered()
            .title(title)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.ui.border))
            .style(self.ui.base_style())
    }

    fn title(&self) -> String {
        let Some(doc) = self.view.document() else {
            return " inkey ".to_string();
        };
        let name = doc
            .current_file()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");
        if doc.is_dirty() {
            format!(" *{name} ")
        } else {
            format!(" {name} ")
        }
    }

    fn numbered(
        &self,
        idx: usize,
        total: usize,
        tagged: &TaggedLine,
        selected: bool,
    ) -> Line<'static> {
        let mut line = style_line(tagged, selected, &self.ui);
        if self.show_line_numbers {
            let width = total.max(1).to_string().len();
            line.spans.insert(
                0,
                Span::styled(
                    format!("{:>width$} ", idx + 1),
                    Style::default().fg(self.ui.muted),
                ),
            );
        }
        line
    }

    fn status_line(&self) -> Line<'static> {
        let sep = || Span::styled(" | ", Style::default().fg(self.ui.muted));
        let mut parts = vec![
            Span::styled(
                "inkey",
                Style::default().fg(self.ui.accent).add_modifier(Modifier::BOLD),
            ),
            sep(),
            Span::styled(self.view.label(), Style::default().fg(self.ui.accent)),
        ];
        if let Some(path) = self.view.document().and_then(|d| d.current_file()) {
            parts.push(sep());
            parts.push(Span::styled(
                path.to_string_lossy().to_string(),
                self.ui.base_style(),
            ));
        }
        if let View::LineEditor(view) = &self.view {
            if let Some(search) = view.search() {
                let current = if search.is_empty() { 0 } else { search.cursor() + 1 };
                parts.push(sep());
                parts.push(Span::styled(
                    format!("search '{}' {current}/{}", search.term(), search.len()),
                    Style::default().fg(self.ui.muted),
                ));
            }
        }
        if let Some(msg) = self.view.status() {
            parts.push(sep());
            parts.push(Span::styled(
                msg.to_string(),
                Style::default().fg(self.ui.accent),
            ));
        }
        Line::from(parts)
    }
}
