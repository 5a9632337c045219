/// Matches of one search term over a rendered line sequence, plus the cursor
/// used for `n`/`p` navigation. Matching is case-insensitive substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchIndex {
    term: String,
    matches: Vec<usize>,
    cursor: usize,
}

impl SearchIndex {
    pub fn build<S: AsRef<str>>(lines: &[S], term: &str) -> Self {
        let needle = term.to_lowercase();
        let matches = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.as_ref().to_lowercase().contains(&needle))
            .map(|(idx, _)| idx)
            .collect();
        Self {
            term: term.to_string(),
            matches,
            cursor: 0,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Line index of the match under the cursor.
    pub fn current(&self) -> Option<usize> {
        self.matches.get(self.cursor).copied()
    }

    pub fn next(&mut self) -> Option<usize> {
        self.step(1)
    }

    pub fn previous(&mut self) -> Option<usize> {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        let len = self.matches.len() as isize;
        self.cursor = (self.cursor as isize + delta).rem_euclid(len) as usize;
        self.current()
    }

    /// `k of n`, 1-based.
    pub fn position(&self) -> String {
        if self.matches.is_empty() {
            return "0 of 0".to_string();
        }
        format!("{} of {}", self.cursor + 1, self.matches.len())
    }
}
