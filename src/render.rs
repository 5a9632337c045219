use crate::document::{IniDocument, Section};

/// What a rendered line was produced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Section { section: String },
    Entry { section: String, key: String },
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedLine {
    pub text: String,
    pub kind: LineKind,
}

impl AsRef<str> for TaggedLine {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl TaggedLine {
    /// Section and key this line edits, if it is a key-value line.
    pub fn target(&self) -> Option<(&str, &str)> {
        match &self.kind {
            LineKind::Entry { section, key } => Some((section.as_str(), key.as_str())),
            _ => None,
        }
    }
}

/// Display lines for both editors, each tagged with what produced it. An empty
/// `global` block is omitted.
pub fn tagged_lines(doc: &IniDocument) -> Vec<TaggedLine> {
    let mut lines = Vec::new();
    for section in doc.ordered_sections() {
        if section.is_global() && section.is_empty() {
            continue;
        }
        push_section(section, &mut lines);
    }
    lines
}

fn push_section(section: &Section, lines: &mut Vec<TaggedLine>) {
    lines.push(TaggedLine {
        text: format!("[{}]", section.name()),
        kind: LineKind::Section {
            section: section.name().to_string(),
        },
    });
    for entry in section.entries() {
        lines.push(TaggedLine {
            text: format!("  {} = {}", entry.key, entry.value),
            kind: LineKind::Entry {
                section: section.name().to_string(),
                key: entry.key.clone(),
            },
        });
    }
    lines.push(TaggedLine {
        text: String::new(),
        kind: LineKind::Blank,
    });
}
