use crate::render::TaggedLine;
use indexmap::IndexMap;
use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Section that holds keys appearing before the first `[header]`.
pub const GLOBAL_SECTION: &str = "global";

#[derive(Debug, Error)]
pub enum DocError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Section not found: [{0}]")]
    SectionNotFound(String),
    #[error("Key not found: {key} in [{section}]")]
    KeyNotFound { section: String, key: String },
    #[error("Section already exists: [{0}]")]
    DuplicateSection(String),
    #[error("Key already exists: {key} in [{section}]")]
    DuplicateKey { section: String, key: String },
    #[error("Cannot store {what} {text:?}: {reason}")]
    Unrepresentable {
        what: &'static str,
        text: String,
        reason: &'static str,
    },
    #[error("No file path specified. Try `save <path>`.")]
    NoFilePathSpecified,
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

/// A named group of entries. Keys are indexed by their case-folded form, the
/// entry keeps the casing it was first inserted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: IndexMap<String, Entry>,
}

impl Section {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&fold(key)).map(|e| e.value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn upsert(&mut self, key: &str, value: &str) {
        match self.entries.get_mut(&fold(key)) {
            Some(entry) => entry.value = value.to_string(),
            None => {
                self.entries.insert(
                    fold(key),
                    Entry {
                        key: key.to_string(),
                        value: value.to_string(),
                    },
                );
            }
        }
    }

    pub fn is_global(&self) -> bool {
        fold(&self.name) == GLOBAL_SECTION
    }
}

#[derive(Debug, Clone)]
pub struct IniDocument {
    sections: IndexMap<String, Section>,
    current_file: Option<PathBuf>,
    dirty: bool,
}

impl Default for IniDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl IniDocument {
    pub fn new() -> Self {
        let mut sections = IndexMap::new();
        sections.insert(fold(GLOBAL_SECTION), Section::new(GLOBAL_SECTION));
        Self {
            sections,
            current_file: None,
            dirty: false,
        }
    }

    pub fn open(path: &Path) -> Result<Self, DocError> {
        let mut doc = Self::new();
        doc.load(path)?;
        Ok(doc)
    }

    /// Replaces the whole document with the contents of `path` and binds the
    /// document to it. Lines that are neither headers, comments nor
    /// `key = value` pairs are dropped.
    pub fn load(&mut self, path: &Path) -> Result<(), DocError> {
        if !path.exists() {
            return Err(DocError::FileNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| DocError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        *self = Self::new();
        self.current_file = Some(path.to_path_buf());
        self.parse(&text);
        info!(
            "loaded {} ({} sections)",
            path.display(),
            self.sections.len()
        );
        Ok(())
    }

    fn parse(&mut self, text: &str) {
        let mut current = fold(GLOBAL_SECTION);
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(name) = header_name(line) {
                current = fold(name);
                self.sections
                    .entry(current.clone())
                    .or_insert_with(|| Section::new(name));
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                if let Some(section) = self.sections.get_mut(&current) {
                    section.upsert(key.trim(), value.trim());
                }
                continue;
            }
            debug!("ignoring line {}: {line:?}", idx + 1);
        }
    }

    pub fn save(&mut self, path: &Path) -> Result<(), DocError> {
        fs::write(path, self.to_ini_string()).map_err(|source| DocError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.current_file = Some(path.to_path_buf());
        self.dirty = false;
        info!("saved {}", path.display());
        Ok(())
    }

    /// Picks the explicit path, or the bound file when none is given.
    pub fn resolve_save_path(&self, path: Option<&Path>) -> Result<PathBuf, DocError> {
        match path {
            Some(path) => Ok(path.to_path_buf()),
            None => self
                .current_file
                .clone()
                .ok_or(DocError::NoFilePathSpecified),
        }
    }

    pub fn to_ini_string(&self) -> String {
        let mut out = String::new();
        for section in self.ordered_sections() {
            if section.is_global() {
                if section.is_empty() {
                    continue;
                }
            } else {
                out.push_str(&format!("[{}]\n", section.name));
            }
            for entry in section.entries() {
                out.push_str(&format!("{} = {}\n", entry.key, entry.value));
            }
            out.push('\n');
        }
        out
    }

    /// Sets `key` in `section`, creating the key when it is missing. Keys that
    /// already exist were read from a file, so only new keys are checked.
    pub fn set_value(&mut self, section: &str, key: &str, value: &str) -> Result<(), DocError> {
        check_value(value)?;
        let target = self.section_mut(section)?;
        if target.get(key).is_none() {
            check_key(key)?;
        }
        target.upsert(key, value);
        self.dirty = true;
        Ok(())
    }

    pub fn add_section(&mut self, name: &str) -> Result<(), DocError> {
        check_section_name(name)?;
        let folded = fold(name);
        if let Some(existing) = self.sections.get(&folded) {
            return Err(DocError::DuplicateSection(existing.name.clone()));
        }
        self.sections.insert(folded, Section::new(name));
        self.dirty = true;
        Ok(())
    }

    pub fn add_key(&mut self, section: &str, key: &str, value: &str) -> Result<(), DocError> {
        check_key(key)?;
        check_value(value)?;
        let target = self.section_mut(section)?;
        if let Some(existing) = target.entries.get(&fold(key)) {
            return Err(DocError::DuplicateKey {
                section: target.name.clone(),
                key: existing.key.clone(),
            });
        }
        target.upsert(key, value);
        self.dirty = true;
        Ok(())
    }

    pub fn remove_key(&mut self, section: &str, key: &str) -> Result<(), DocError> {
        let target = self.section_mut(section)?;
        if target.entries.shift_remove(&fold(key)).is_none() {
            return Err(DocError::KeyNotFound {
                section: target.name.clone(),
                key: key.to_string(),
            });
        }
        self.dirty = true;
        Ok(())
    }

    pub fn remove_section(&mut self, name: &str) -> Result<(), DocError> {
        if self.sections.shift_remove(&fold(name)).is_none() {
            return Err(DocError::SectionNotFound(name.to_string()));
        }
        self.dirty = true;
        Ok(())
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(&fold(name))
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// Sections in stored order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Display and serialization order: `global` first, then the rest as stored.
    pub fn ordered_sections(&self) -> impl Iterator<Item = &Section> {
        let global = self.section(GLOBAL_SECTION);
        global
            .into_iter()
            .chain(self.sections().filter(|s| !s.is_global()))
    }

    pub fn render_lines(&self) -> Vec<TaggedLine> {
        crate::render::tagged_lines(self)
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn section_mut(&mut self, name: &str) -> Result<&mut Section, DocError> {
        self.sections
            .get_mut(&fold(name))
            .ok_or_else(|| DocError::SectionNotFound(name.to_string()))
    }
}

// Names and values must read back unchanged after `to_ini_string`.
fn check_section_name(name: &str) -> Result<(), DocError> {
    let reason = if name.contains(['[', ']']) {
        Some("section names cannot contain brackets")
    } else {
        common_problem(name)
    };
    unrepresentable("section", name, reason)
}

fn check_key(key: &str) -> Result<(), DocError> {
    let reason = if key.contains('=') {
        Some("keys cannot contain '='")
    } else if key.starts_with([';', '#', '[']) {
        Some("keys cannot start with ';', '#' or '['")
    } else {
        common_problem(key)
    };
    unrepresentable("key", key, reason)
}

fn check_value(value: &str) -> Result<(), DocError> {
    unrepresentable("value", value, common_problem(value))
}

fn common_problem(text: &str) -> Option<&'static str> {
    if text.contains(['\n', '\r']) {
        Some("line breaks are not allowed")
    } else if text.trim() != text {
        Some("leading or trailing whitespace is trimmed on load")
    } else {
        None
    }
}

fn unrepresentable(
    what: &'static str,
    text: &str,
    reason: Option<&'static str>,
) -> Result<(), DocError> {
    match reason {
        Some(reason) => Err(DocError::Unrepresentable {
            what,
            text: text.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

fn header_name(line: &str) -> Option<&str> {
    line.strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}
