use url::Url;

/// Browser-style history: a stack of visited URLs plus a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<Url>,
    cursor: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a forward navigation.
    ///
    /// Entries ahead of the cursor are dropped first. Pushing the URL that is
    /// already current leaves the stack unchanged.
    pub fn push(&mut self, url: Url) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);

        if self.entries.last() != Some(&url) {
            self.entries.push(url);
        }
        self.cursor = self.entries.len().checked_sub(1);
    }

    /// Step the cursor back and return the entry it now points at.
    pub fn back(&mut self) -> Option<&Url> {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                self.entries.get(c - 1)
            }
            _ => None,
        }
    }

    pub fn forward(&mut self) -> Option<&Url> {
        match self.cursor {
            Some(c) if c + 1 < self.entries.len() => {
                self.cursor = Some(c + 1);
                self.entries.get(c + 1)
            }
            _ => None,
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// `None` while nothing has been visited.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&Url> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn entries(&self) -> &[Url] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse("https://visuales.uclv.cu").unwrap().join(path).unwrap()
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::new();
        assert_eq!(history.cursor(), None);
        assert!(history.current().is_none());
        assert!(history.back().is_none());
        assert!(history.forward().is_none());
        assert!(!history.can_go_back());
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_push_moves_cursor_to_end() {
        let mut history = History::new();
        history.push(url("/A/"));
        history.push(url("/B/"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), Some(1));
        assert_eq!(history.current(), Some(&url("/B/")));
    }

    #[test]
    fn test_consecutive_duplicates_collapse() {
        let mut history = History::new();
        history.push(url("/A/"));
        history.push(url("/A/"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), Some(0));
    }

    #[test]
    fn test_back_and_forward() {
        let mut history = History::new();
        history.push(url("/A/"));
        history.push(url("/B/"));

        assert_eq!(history.back(), Some(&url("/A/")));
        assert_eq!(history.cursor(), Some(0));
        assert!(history.back().is_none());
        assert_eq!(history.cursor(), Some(0));

        assert_eq!(history.forward(), Some(&url("/B/")));
        assert_eq!(history.cursor(), Some(1));
        assert!(history.forward().is_none());
    }

    #[test]
    fn test_push_behind_cursor_truncates_forward_entries() {
        let mut history = History::new();
        history.push(url("/A/"));
        history.push(url("/B/"));
        history.back();
        history.push(url("/C/"));

        assert_eq!(history.entries(), &[url("/A/"), url("/C/")]);
        assert_eq!(history.cursor(), Some(1));
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_push_current_behind_cursor_only_truncates() {
        let mut history = History::new();
        history.push(url("/A/"));
        history.push(url("/B/"));
        history.back();
        history.push(url("/A/"));

        assert_eq!(history.entries(), &[url("/A/")]);
        assert_eq!(history.cursor(), Some(0));
    }
}
