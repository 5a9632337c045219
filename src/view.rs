//! The three interactive modes and the transitions between them. Every mode
//! consumes one submitted input line at a time and answers with a
//! [`Transition`].

use crate::command::{
    parse_file_command, parse_inline_command, parse_line_command, FileCommand, InlineCommand,
    LineCommand,
};
use crate::document::{DocError, IniDocument};
use crate::files::list_ini_files;
use crate::render::TaggedLine;
use crate::search::SearchIndex;
use log::{debug, warn};
use std::mem;
use std::path::{Path, PathBuf};

/// Settings shared by every mode, fixed for the whole session.
#[derive(Debug, Clone)]
pub struct ViewContext {
    pub dir: PathBuf,
    pub extensions: Vec<String>,
    pub viewport_height: usize,
}

pub enum Transition {
    Stay,
    To(View),
    Quit,
}

pub enum View {
    FileSelection(FileSelection),
    LineEditor(LineEditor),
    InlineEditor(InlineEditor),
}

impl View {
    /// Starting view: the line editor when `path` loads, file selection otherwise.
    pub fn open(path: Option<&Path>, ctx: &ViewContext) -> View {
        let Some(path) = path else {
            return View::FileSelection(FileSelection::load(ctx));
        };
        match IniDocument::open(path) {
            Ok(doc) => View::LineEditor(LineEditor::new(doc, ctx.viewport_height)),
            Err(err) => {
                warn!("{err}");
                let mut selection = FileSelection::load(ctx);
                selection.status = Some(err.to_string());
                View::FileSelection(selection)
            }
        }
    }

    pub fn handle_input(&mut self, input: &str, ctx: &ViewContext) -> Transition {
        match self {
            View::FileSelection(view) => view.handle_input(input, ctx),
            View::LineEditor(view) => view.handle_input(input, ctx),
            View::InlineEditor(view) => view.handle_input(input),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::FileSelection(_) => "files",
            View::LineEditor(_) => "lines",
            View::InlineEditor(_) if self.is_prompting() => "value",
            View::InlineEditor(_) => "inline",
        }
    }

    pub fn status(&self) -> Option<&str> {
        match self {
            View::FileSelection(view) => view.status.as_deref(),
            View::LineEditor(view) => view.status.as_deref(),
            View::InlineEditor(view) => view.status.as_deref(),
        }
    }

    pub fn document(&self) -> Option<&IniDocument> {
        match self {
            View::FileSelection(_) => None,
            View::LineEditor(view) => Some(&view.doc),
            View::InlineEditor(view) => Some(&view.doc),
        }
    }

    pub fn is_prompting(&self) -> bool {
        matches!(self, View::InlineEditor(view) if view.pending.is_some())
    }

    /// Current value to pre-fill the input with while a value prompt is open.
    pub fn prompt_initial(&self) -> Option<String> {
        match self {
            View::InlineEditor(view) => view.pending_value().map(str::to_string),
            _ => None,
        }
    }

    /// Drops an open value prompt. Returns whether there was one.
    pub fn cancel_prompt(&mut self) -> bool {
        match self {
            View::InlineEditor(view) => view.cancel_edit(),
            _ => false,
        }
    }
}

pub struct FileSelection {
    files: Vec<PathBuf>,
    selected: usize,
    status: Option<String>,
}

impl FileSelection {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            selected: 0,
            status: None,
        }
    }

    pub fn load(ctx: &ViewContext) -> Self {
        match list_ini_files(&ctx.dir, &ctx.extensions) {
            Ok(files) => Self::new(files),
            Err(err) => {
                warn!("{err:#}");
                let mut view = Self::new(Vec::new());
                view.status = Some(format!("{err:#}"));
                view
            }
        }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    fn handle_input(&mut self, input: &str, ctx: &ViewContext) -> Transition {
        self.status = None;
        let command = match parse_file_command(input) {
            Ok(command) => command,
            Err(err) => {
                self.status = Some(err.to_string());
                return Transition::Stay;
            }
        };
        match command {
            FileCommand::Up => self.selected = self.selected.saturating_sub(1),
            FileCommand::Down => {
                if self.selected + 1 < self.files.len() {
                    self.selected += 1;
                }
            }
            FileCommand::Confirm => {
                let Some(path) = self.files.get(self.selected) else {
                    self.status = Some("No INI files found".to_string());
                    return Transition::Stay;
                };
                match IniDocument::open(path) {
                    Ok(doc) => {
                        let mut editor = LineEditor::new(doc, ctx.viewport_height);
                        editor.status = Some(format!("Opened {}", path.display()));
                        return Transition::To(View::LineEditor(editor));
                    }
                    Err(err) => {
                        warn!("{err}");
                        self.status = Some(err.to_string());
                    }
                }
            }
            FileCommand::Quit => return Transition::Quit,
        }
        Transition::Stay
    }
}

pub struct LineEditor {
    doc: IniDocument,
    lines: Vec<TaggedLine>,
    scroll: usize,
    viewport_height: usize,
    search: Option<SearchIndex>,
    show_help: bool,
    status: Option<String>,
}

impl LineEditor {
    pub fn new(doc: IniDocument, viewport_height: usize) -> Self {
        let lines = doc.render_lines();
        Self {
            doc,
            lines,
            scroll: 0,
            viewport_height: viewport_height.max(1),
            search: None,
            show_help: false,
            status: None,
        }
    }

    pub fn lines(&self) -> &[TaggedLine] {
        &self.lines
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    pub fn search(&self) -> Option<&SearchIndex> {
        self.search.as_ref()
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    fn handle_input(&mut self, input: &str, ctx: &ViewContext) -> Transition {
        self.status = None;
        self.show_help = false;
        let command = match parse_line_command(input) {
            Ok(Some(command)) => command,
            Ok(None) => return Transition::Stay,
            Err(err) => {
                self.search = None;
                self.status = Some(err.to_string());
                return Transition::Stay;
            }
        };
        debug!("line editor: {command:?}");
        if !matches!(
            command,
            LineCommand::Search(_) | LineCommand::Next | LineCommand::Previous
        ) {
            self.search = None;
        }

        match command {
            LineCommand::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            LineCommand::ScrollDown => self.scroll = (self.scroll + 1).min(self.max_scroll()),
            LineCommand::Back => {
                return Transition::To(View::FileSelection(FileSelection::load(ctx)));
            }
            LineCommand::Search(term) => self.search_for(&term),
            LineCommand::Next => self.jump_match(1),
            LineCommand::Previous => self.jump_match(-1),
            LineCommand::Edit => {
                let doc = mem::take(&mut self.doc);
                return Transition::To(View::InlineEditor(InlineEditor::new(
                    doc,
                    self.viewport_height,
                )));
            }
            LineCommand::Quit => return Transition::Quit,
            LineCommand::Help => self.show_help = true,
            LineCommand::Save(path) => self.save(path.as_deref()),
            LineCommand::Set {
                section,
                key,
                value,
            } => {
                let result = self.doc.set_value(&section, &key, &value);
                self.apply(result, format!("Set {section}.{key} = {value}"));
            }
            LineCommand::Goto(line) => {
                if (1..=self.lines.len()).contains(&line) {
                    self.scroll = line - 1;
                }
            }
            LineCommand::AddSection(section) => {
                let result = self.doc.add_section(&section);
                self.apply(result, format!("Added section [{section}]"));
            }
            LineCommand::AddKey {
                section,
                key,
                value,
            } => {
                let result = self.doc.add_key(&section, &key, &value);
                self.apply(result, format!("Added {section}.{key} = {value}"));
            }
            LineCommand::RemoveKey { section, key } => {
                let result = self.doc.remove_key(&section, &key);
                self.apply(result, format!("Removed {section}.{key}"));
            }
            LineCommand::RemoveSection(section) => {
                let result = self.doc.remove_section(&section);
                self.apply(result, format!("Removed section [{section}]"));
            }
            LineCommand::List => self.refresh(),
        }
        Transition::Stay
    }

    fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(self.viewport_height)
    }

    fn refresh(&mut self) {
        self.lines = self.doc.render_lines();
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn apply(&mut self, result: Result<(), DocError>, done: String) {
        match result {
            Ok(()) => {
                self.refresh();
                self.status = Some(done);
            }
            Err(err) => {
                warn!("{err}");
                self.status = Some(err.to_string());
            }
        }
    }

    fn save(&mut self, path: Option<&Path>) {
        let result = self
            .doc
            .resolve_save_path(path)
            .and_then(|target| self.doc.save(&target).map(|()| target));
        match result {
            Ok(target) => self.status = Some(format!("Saved {}", target.display())),
            Err(err) => {
                warn!("{err}");
                self.status = Some(err.to_string());
            }
        }
    }

    fn search_for(&mut self, term: &str) {
        let index = SearchIndex::build(&self.lines, term);
        match index.current() {
            Some(line) => {
                self.scroll_to(line);
                self.status = Some(format!("{} match(es) for '{term}'", index.len()));
            }
            None => self.status = Some(format!("No matches for '{term}'")),
        }
        self.search = Some(index);
    }

    fn jump_match(&mut self, delta: isize) {
        let Some(index) = self.search.as_mut() else {
            self.status = Some("No active search".to_string());
            return;
        };
        let line = if delta < 0 {
            index.previous()
        } else {
            index.next()
        };
        let position = index.position();
        match line {
            Some(line) => {
                self.scroll_to(line);
                self.status = Some(format!("Match {position}"));
            }
            None => self.status = Some("No matches".to_string()),
        }
    }

    fn scroll_to(&mut self, line: usize) {
        self.scroll = line.min(self.max_scroll());
    }
}

pub struct InlineEditor {
    doc: IniDocument,
    lines: Vec<TaggedLine>,
    selected: usize,
    scroll: usize,
    viewport_height: usize,
    pending: Option<(String, String)>,
    status: Option<String>,
}

impl InlineEditor {
    pub fn new(doc: IniDocument, viewport_height: usize) -> Self {
        let lines = doc.render_lines();
        Self {
            doc,
            lines,
            selected: 0,
            scroll: 0,
            viewport_height: viewport_height.max(1),
            pending: None,
            status: None,
        }
    }

    pub fn lines(&self) -> &[TaggedLine] {
        &self.lines
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    fn pending_value(&self) -> Option<&str> {
        let (section, key) = self.pending.as_ref()?;
        self.doc.get(section, key)
    }

    fn cancel_edit(&mut self) -> bool {
        if self.pending.take().is_some() {
            self.status = Some("Edit cancelled".to_string());
            return true;
        }
        false
    }

    fn handle_input(&mut self, input: &str) -> Transition {
        self.status = None;
        if let Some((section, key)) = self.pending.take() {
            self.commit_edit(&section, &key, input.trim());
            return Transition::Stay;
        }
        let command = match parse_inline_command(input) {
            Ok(Some(command)) => command,
            Ok(None) => return Transition::Stay,
            Err(err) => {
                self.status = Some(err.to_string());
                return Transition::Stay;
            }
        };
        debug!("inline editor: {command:?}");

        match command {
            InlineCommand::Up => {
                self.selected = self.selected.saturating_sub(1);
                self.follow_selection();
            }
            InlineCommand::Down => {
                if self.selected + 1 < self.lines.len() {
                    self.selected += 1;
                }
                self.follow_selection();
            }
            InlineCommand::Edit => {
                let target = self
                    .lines
                    .get(self.selected)
                    .and_then(TaggedLine::target)
                    .map(|(section, key)| (section.to_string(), key.to_string()));
                if let Some((section, key)) = target {
                    self.status = Some(format!("New value for {section}.{key} (Esc to cancel)"));
                    self.pending = Some((section, key));
                }
            }
            InlineCommand::Goto(line) => {
                if (1..=self.lines.len()).contains(&line) {
                    self.scroll = line - 1;
                }
            }
            InlineCommand::Back => {
                let doc = mem::take(&mut self.doc);
                return Transition::To(View::LineEditor(LineEditor::new(
                    doc,
                    self.viewport_height,
                )));
            }
            InlineCommand::Quit => return Transition::Quit,
        }
        Transition::Stay
    }

    fn follow_selection(&mut self) {
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + self.viewport_height {
            self.scroll = self.selected + 1 - self.viewport_height;
        }
    }

    // The selection index is left as is; after a rebuild it may point at a
    // different logical line.
    fn commit_edit(&mut self, section: &str, key: &str, value: &str) {
        match self.doc.set_value(section, key, value) {
            Ok(()) => self.status = Some(format!("Updated {section}.{key} = {value}")),
            Err(err) => {
                warn!("{err}");
                self.status = Some(err.to_string());
            }
        }
        self.lines = self.doc.render_lines();
    }
}

#[cfg(test)]
mod tests {
    use super::{InlineEditor, LineEditor, Transition, View, ViewContext};
    use crate::document::IniDocument;
    use std::fs;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    const SAMPLE: &str = "key1=a\n[Net]\nhost = localhost\nport = 80\n";

    fn context(dir: &Path, viewport_height: usize) -> ViewContext {
        ViewContext {
            dir: dir.to_path_buf(),
            extensions: vec!["ini".to_string()],
            viewport_height,
        }
    }

    fn sample_dir() -> TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("app.ini"), SAMPLE).unwrap();
        dir
    }

    fn line_editor(dir: &TempDir, height: usize) -> (View, ViewContext) {
        let ctx = context(dir.path(), height);
        let view = View::open(Some(&dir.path().join("app.ini")), &ctx);
        assert!(matches!(view, View::LineEditor(_)));
        (view, ctx)
    }

    fn send(view: &mut View, input: &str, ctx: &ViewContext) {
        match view.handle_input(input, ctx) {
            Transition::Stay => {}
            Transition::To(next) => *view = next,
            Transition::Quit => panic!("unexpected quit on {input:?}"),
        }
    }

    fn as_line_editor(view: &View) -> &LineEditor {
        match view {
            View::LineEditor(editor) => editor,
            _ => panic!("not in the line editor"),
        }
    }

    fn as_inline_editor(view: &View) -> &InlineEditor {
        match view {
            View::InlineEditor(editor) => editor,
            _ => panic!("not in the inline editor"),
        }
    }

    #[test]
    fn open_missing_file_falls_back_to_file_selection() {
        let dir = sample_dir();
        let ctx = context(dir.path(), 10);
        let view = View::open(Some(&dir.path().join("nope.ini")), &ctx);
        let View::FileSelection(selection) = &view else {
            panic!("expected file selection");
        };
        assert_eq!(selection.files().len(), 1);
        assert!(view.status().unwrap().starts_with("File not found"));
    }

    #[test]
    fn file_selection_moves_within_bounds_and_opens() {
        let dir = sample_dir();
        fs::write(dir.path().join("b.ini"), "[b]\nx = 1\n").unwrap();
        let ctx = context(dir.path(), 10);
        let mut view = View::open(None, &ctx);

        send(&mut view, "w", &ctx);
        send(&mut view, "s", &ctx);
        send(&mut view, "s", &ctx);
        let View::FileSelection(selection) = &view else {
            panic!("expected file selection");
        };
        assert_eq!(selection.selected(), 1);

        send(&mut view, "", &ctx);
        let doc = view.document().unwrap();
        assert_eq!(doc.get("b", "x"), Some("1"));
    }

    #[test]
    fn file_selection_reports_failed_load_and_stays() {
        let dir = sample_dir();
        let ctx = context(dir.path(), 10);
        let mut view = View::open(None, &ctx);
        fs::remove_file(dir.path().join("app.ini")).unwrap();
        send(&mut view, "", &ctx);
        assert!(matches!(view, View::FileSelection(_)));
        assert!(view.status().is_some());
    }

    #[test]
    fn file_selection_quits() {
        let dir = sample_dir();
        let ctx = context(dir.path(), 10);
        let mut view = View::open(None, &ctx);
        assert!(matches!(view.handle_input("q", &ctx), Transition::Quit));
    }

    #[test]
    fn scrolling_is_clamped_to_viewport() {
        let dir = sample_dir();
        let (mut view, ctx) = line_editor(&dir, 3);
        // [global], key1, blank, [Net], host, port, blank
        assert_eq!(as_line_editor(&view).lines().len(), 7);
        send(&mut view, "w", &ctx);
        assert_eq!(as_line_editor(&view).scroll(), 0);
        for _ in 0..10 {
            send(&mut view, "s", &ctx);
        }
        assert_eq!(as_line_editor(&view).scroll(), 4);
    }

    #[test]
    fn shrinking_document_pulls_scroll_back_into_range() {
        let dir = sample_dir();
        let (mut view, ctx) = line_editor(&dir, 3);
        for _ in 0..10 {
            send(&mut view, "s", &ctx);
        }
        assert_eq!(as_line_editor(&view).scroll(), 4);

        send(&mut view, "removekey Net host", &ctx);
        assert_eq!(as_line_editor(&view).lines().len(), 6);
        assert_eq!(as_line_editor(&view).scroll(), 3);
        send(&mut view, "s", &ctx);
        assert_eq!(as_line_editor(&view).scroll(), 3);
    }

    #[test]
    fn search_reports_single_match_and_wraps_in_place() {
        let dir = sample_dir();
        let (mut view, ctx) = line_editor(&dir, 20);
        send(&mut view, "search host", &ctx);
        let search = as_line_editor(&view).search().unwrap();
        assert_eq!(search.matches(), &[4]);
        assert_eq!(view.status(), Some("1 match(es) for 'host'"));

        send(&mut view, "n", &ctx);
        assert_eq!(view.status(), Some("Match 1 of 1"));
        send(&mut view, "p", &ctx);
        assert_eq!(as_line_editor(&view).search().unwrap().cursor(), 0);
    }

    #[test]
    fn search_jumps_viewport_and_cycles() {
        let dir = sample_dir();
        let (mut view, ctx) = line_editor(&dir, 2);
        send(&mut view, "search =", &ctx);
        assert_eq!(as_line_editor(&view).scroll(), 1);
        send(&mut view, "p", &ctx);
        assert_eq!(view.status(), Some("Match 3 of 3"));
        assert_eq!(as_line_editor(&view).scroll(), 5);
        send(&mut view, "n", &ctx);
        assert_eq!(view.status(), Some("Match 1 of 3"));
    }

    #[test]
    fn unrelated_command_ends_search_session() {
        let dir = sample_dir();
        let (mut view, ctx) = line_editor(&dir, 20);
        send(&mut view, "search host", &ctx);
        send(&mut view, "list", &ctx);
        assert!(as_line_editor(&view).search().is_none());
        send(&mut view, "n", &ctx);
        assert_eq!(view.status(), Some("No active search"));
    }

    #[test]
    fn mutations_rebuild_lines_and_report_errors() {
        let dir = sample_dir();
        let (mut view, ctx) = line_editor(&dir, 20);

        send(&mut view, "addkey global key1 b", &ctx);
        assert_eq!(view.status(), Some("Key already exists: key1 in [global]"));

        send(&mut view, "set global key1 b c", &ctx);
        assert_eq!(view.document().unwrap().get("global", "key1"), Some("b c"));
        assert_eq!(as_line_editor(&view).lines()[1].text, "  key1 = b c");

        send(&mut view, r#"addsection "My Stuff""#, &ctx);
        send(&mut view, r#"addkey "my stuff" path "/tmp/a b""#, &ctx);
        assert_eq!(view.document().unwrap().get("My Stuff", "path"), Some("/tmp/a b"));

        send(&mut view, "removesection Net", &ctx);
        assert!(view.document().unwrap().section("net").is_none());
        send(&mut view, "removekey Net host", &ctx);
        assert_eq!(view.status(), Some("Section not found: [Net]"));

        send(&mut view, "bogus", &ctx);
        assert!(view.status().unwrap().starts_with("Unknown command: bogus"));
        send(&mut view, "set a b", &ctx);
        assert!(view.status().unwrap().starts_with("Usage: set"));
    }

    #[test]
    fn set_stores_hash_backslash_and_apostrophe_verbatim() {
        let dir = sample_dir();
        let (mut view, ctx) = line_editor(&dir, 20);
        send(&mut view, "set Net host box #primary", &ctx);
        send(&mut view, r"set Net root C:\Windows\System32", &ctx);
        send(&mut view, "set global motd Bob's and Al's", &ctx);

        let doc = view.document().unwrap();
        assert_eq!(doc.get("Net", "host"), Some("box #primary"));
        assert_eq!(doc.get("Net", "root"), Some(r"C:\Windows\System32"));
        assert_eq!(doc.get("global", "motd"), Some("Bob's and Al's"));

        send(&mut view, "save", &ctx);
        let reloaded = IniDocument::open(&dir.path().join("app.ini")).unwrap();
        assert_eq!(reloaded.get("Net", "host"), Some("box #primary"));
        assert_eq!(reloaded.get("Net", "root"), Some(r"C:\Windows\System32"));
    }

    #[test]
    fn names_that_cannot_be_saved_are_reported() {
        let dir = sample_dir();
        let (mut view, ctx) = line_editor(&dir, 20);
        send(&mut view, "set Net a=b 1", &ctx);
        assert_eq!(
            view.status(),
            Some(r#"Cannot store key "a=b": keys cannot contain '='"#)
        );
        send(&mut view, r#"addsection "a] x""#, &ctx);
        assert!(view.status().unwrap().starts_with("Cannot store section"));
        assert!(view.document().unwrap().section("a] x").is_none());
        assert!(!view.document().unwrap().is_dirty());
    }

    #[test]
    fn save_uses_current_path_or_argument() {
        let dir = sample_dir();
        let (mut view, ctx) = line_editor(&dir, 20);
        send(&mut view, "removesection Net", &ctx);
        send(&mut view, "save", &ctx);
        assert_eq!(
            fs::read_to_string(dir.path().join("app.ini")).unwrap(),
            "key1 = a\n\n"
        );

        let copy = dir.path().join("copy.ini");
        send(&mut view, &format!("save {}", copy.display()), &ctx);
        assert!(copy.exists());
        assert_eq!(view.document().unwrap().current_file(), Some(copy.as_path()));
    }

    #[test]
    fn save_without_any_path_is_reported() {
        let ctx = context(Path::new("."), 10);
        let mut view = View::LineEditor(LineEditor::new(IniDocument::new(), 10));
        send(&mut view, "save", &ctx);
        assert_eq!(view.status(), Some("No file path specified. Try `save <path>`."));
    }

    #[test]
    fn goto_is_one_based_and_ignores_out_of_range() {
        let dir = sample_dir();
        let (mut view, ctx) = line_editor(&dir, 2);
        send(&mut view, "goto 4", &ctx);
        assert_eq!(as_line_editor(&view).scroll(), 3);
        send(&mut view, "goto 99", &ctx);
        assert_eq!(as_line_editor(&view).scroll(), 3);
        send(&mut view, "goto 0", &ctx);
        assert_eq!(as_line_editor(&view).scroll(), 3);
    }

    #[test]
    fn help_is_shown_until_next_command() {
        let dir = sample_dir();
        let (mut view, ctx) = line_editor(&dir, 20);
        send(&mut view, "help", &ctx);
        assert!(as_line_editor(&view).show_help());
        send(&mut view, "w", &ctx);
        assert!(!as_line_editor(&view).show_help());
    }

    #[test]
    fn back_returns_to_file_selection() {
        let dir = sample_dir();
        let (mut view, ctx) = line_editor(&dir, 20);
        send(&mut view, "back", &ctx);
        assert!(matches!(view, View::FileSelection(_)));
    }

    #[test]
    fn inline_selection_drives_scroll() {
        let dir = sample_dir();
        let (mut view, ctx) = line_editor(&dir, 2);
        send(&mut view, "edit", &ctx);
        for _ in 0..4 {
            send(&mut view, "s", &ctx);
        }
        let editor = as_inline_editor(&view);
        assert_eq!(editor.selected(), 4);
        assert_eq!(editor.scroll(), 3);

        for _ in 0..20 {
            send(&mut view, "s", &ctx);
        }
        assert_eq!(as_inline_editor(&view).selected(), 6);

        for _ in 0..6 {
            send(&mut view, "w", &ctx);
        }
        let editor = as_inline_editor(&view);
        assert_eq!(editor.selected(), 0);
        assert_eq!(editor.scroll(), 0);

        send(&mut view, "goto 5", &ctx);
        let editor = as_inline_editor(&view);
        assert_eq!(editor.scroll(), 4);
        assert_eq!(editor.selected(), 0);
    }

    #[test]
    fn inline_edit_prompts_and_sets_value() {
        let dir = sample_dir();
        let (mut view, ctx) = line_editor(&dir, 20);
        send(&mut view, "edit", &ctx);
        for _ in 0..4 {
            send(&mut view, "s", &ctx);
        }
        send(&mut view, "e", &ctx);
        assert_eq!(view.label(), "value");
        assert_eq!(view.prompt_initial().as_deref(), Some("localhost"));

        send(&mut view, "  example.org ", &ctx);
        assert_eq!(view.document().unwrap().get("Net", "host"), Some("example.org"));
        assert_eq!(as_inline_editor(&view).lines()[4].text, "  host = example.org");
        assert_eq!(as_inline_editor(&view).selected(), 4);
        assert_eq!(view.status(), Some("Updated Net.host = example.org"));
    }

    #[test]
    fn inline_edit_on_header_is_noop_and_prompt_can_be_cancelled() {
        let dir = sample_dir();
        let (mut view, ctx) = line_editor(&dir, 20);
        send(&mut view, "edit", &ctx);
        send(&mut view, "e", &ctx);
        assert!(view.prompt_initial().is_none());
        assert_eq!(view.label(), "inline");

        send(&mut view, "s", &ctx);
        send(&mut view, "e", &ctx);
        assert!(view.cancel_prompt());
        assert!(!view.cancel_prompt());
        assert_eq!(view.document().unwrap().get("global", "key1"), Some("a"));
    }

    #[test]
    fn inline_back_keeps_document() {
        let dir = sample_dir();
        let (mut view, ctx) = line_editor(&dir, 20);
        send(&mut view, "edit", &ctx);
        send(&mut view, "s", &ctx);
        send(&mut view, "e", &ctx);
        send(&mut view, "z", &ctx);
        send(&mut view, "back", &ctx);
        let editor = as_line_editor(&view);
        assert_eq!(editor.lines()[1].text, "  key1 = z");
        assert!(view.document().unwrap().is_dirty());
        assert!(matches!(view.handle_input("q", &ctx), Transition::Quit));
    }
}
