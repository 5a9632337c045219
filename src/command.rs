//! Parsing of the single-line commands each view accepts.

use std::mem;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Usage: {0}")]
    InvalidUsage(&'static str),
    #[error("Unknown command: {0}. Type `help` for a list.")]
    UnknownCommand(String),
}

/// Commands understood by the line editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
    ScrollUp,
    ScrollDown,
    Back,
    Search(String),
    Next,
    Previous,
    Edit,
    Quit,
    Help,
    Save(Option<PathBuf>),
    Set {
        section: String,
        key: String,
        value: String,
    },
    Goto(usize),
    AddSection(String),
    AddKey {
        section: String,
        key: String,
        value: String,
    },
    RemoveKey {
        section: String,
        key: String,
    },
    RemoveSection(String),
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineCommand {
    Up,
    Down,
    Edit,
    Goto(usize),
    Back,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCommand {
    Up,
    Down,
    Confirm,
    Quit,
}

pub const HELP: &[(&str, &str)] = &[
    ("w / s", "scroll up / down"),
    ("search <term>", "find lines containing <term>"),
    ("n / p", "next / previous match"),
    ("goto <line>", "jump to a 1-based line"),
    ("set <section> <key> <value...>", "set or create a key"),
    ("addsection <section>", "add a section"),
    ("addkey <section> <key> <value...>", "add a new key"),
    ("removekey <section> <key>", "remove a key"),
    ("removesection <section>", "remove a section"),
    ("save [path]", "write to the current file or to [path]"),
    ("edit", "switch to the inline editor"),
    ("list", "refresh the view"),
    ("back", "return to file selection"),
    ("q", "quit"),
];

const USAGE_SEARCH: &str = "search <term>";
const USAGE_SAVE: &str = "save [path]";
const USAGE_SET: &str = "set <section> <key> <value...>";
const USAGE_GOTO: &str = "goto <line>";
const USAGE_ADD_SECTION: &str = "addsection <section>";
const USAGE_ADD_KEY: &str = "addkey <section> <key> <value...>";
const USAGE_REMOVE_KEY: &str = "removekey <section> <key>";
const USAGE_REMOVE_SECTION: &str = "removesection <section>";

/// Splits `input` on whitespace, keeping `"..."` segments together. Every
/// other character is literal. Input with an unterminated quote is split on
/// whitespace instead.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut started = false;
    let mut quoted = false;
    for c in input.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                started = true;
            }
            c if c.is_whitespace() && !quoted => {
                if started {
                    args.push(mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }
    if quoted {
        return input.split_whitespace().map(str::to_string).collect();
    }
    if started {
        args.push(current);
    }
    args
}

/// Parses a line-editor command. Blank input yields `None`.
pub fn parse_line_command(input: &str) -> Result<Option<LineCommand>, CommandError> {
    let args = tokenize(input.trim());
    let Some((name, rest)) = args.split_first() else {
        return Ok(None);
    };
    let command = match name.to_lowercase().as_str() {
        "w" => LineCommand::ScrollUp,
        "s" => LineCommand::ScrollDown,
        "back" => LineCommand::Back,
        "n" => LineCommand::Next,
        "p" => LineCommand::Previous,
        "edit" => LineCommand::Edit,
        "q" | "quit" => LineCommand::Quit,
        "help" => LineCommand::Help,
        "list" => LineCommand::List,
        "search" => {
            if rest.is_empty() {
                return Err(CommandError::InvalidUsage(USAGE_SEARCH));
            }
            LineCommand::Search(rest.join(" "))
        }
        "save" => match rest {
            [] => LineCommand::Save(None),
            [path] => LineCommand::Save(Some(PathBuf::from(path))),
            _ => return Err(CommandError::InvalidUsage(USAGE_SAVE)),
        },
        "set" => match rest {
            [section, key, value @ ..] if !value.is_empty() => LineCommand::Set {
                section: section.clone(),
                key: key.clone(),
                value: value.join(" "),
            },
            _ => return Err(CommandError::InvalidUsage(USAGE_SET)),
        },
        "goto" => LineCommand::Goto(parse_line_number(rest)?),
        "addsection" => match rest {
            [section] => LineCommand::AddSection(section.clone()),
            _ => return Err(CommandError::InvalidUsage(USAGE_ADD_SECTION)),
        },
        "addkey" => match rest {
            [section, key, value @ ..] if !value.is_empty() => LineCommand::AddKey {
                section: section.clone(),
                key: key.clone(),
                value: value.join(" "),
            },
            _ => return Err(CommandError::InvalidUsage(USAGE_ADD_KEY)),
        },
        "removekey" => match rest {
            [section, key] => LineCommand::RemoveKey {
                section: section.clone(),
                key: key.clone(),
            },
            _ => return Err(CommandError::InvalidUsage(USAGE_REMOVE_KEY)),
        },
        "removesection" => match rest {
            [section] => LineCommand::RemoveSection(section.clone()),
            _ => return Err(CommandError::InvalidUsage(USAGE_REMOVE_SECTION)),
        },
        _ => return Err(CommandError::UnknownCommand(name.clone())),
    };
    Ok(Some(command))
}

/// Parses an inline-editor command. Blank input yields `None`.
pub fn parse_inline_command(input: &str) -> Result<Option<InlineCommand>, CommandError> {
    let args = tokenize(input.trim());
    let Some((name, rest)) = args.split_first() else {
        return Ok(None);
    };
    let command = match name.to_lowercase().as_str() {
        "w" => InlineCommand::Up,
        "s" => InlineCommand::Down,
        "e" => InlineCommand::Edit,
        "goto" => InlineCommand::Goto(parse_line_number(rest)?),
        "back" => InlineCommand::Back,
        "q" | "quit" => InlineCommand::Quit,
        _ => return Err(CommandError::UnknownCommand(name.clone())),
    };
    Ok(Some(command))
}

/// Parses a file-selection command; blank input confirms the selection.
pub fn parse_file_command(input: &str) -> Result<FileCommand, CommandError> {
    match input.trim().to_lowercase().as_str() {
        "" => Ok(FileCommand::Confirm),
        "w" => Ok(FileCommand::Up),
        "s" => Ok(FileCommand::Down),
        "q" | "quit" => Ok(FileCommand::Quit),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

fn parse_line_number(args: &[String]) -> Result<usize, CommandError> {
    match args {
        [n] => n
            .parse()
            .map_err(|_| CommandError::InvalidUsage(USAGE_GOTO)),
        _ => Err(CommandError::InvalidUsage(USAGE_GOTO)),
    }
}
