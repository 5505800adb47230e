/// Bounded index into the attempt's ordered question list.
///
/// Out-of-range navigation is a silent no-op: UI edge cases (stale buttons,
/// repeated key events) must never be fatal. Reads are synchronous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
    len: usize,
}

impl Cursor {
    /// Cursor over `len` questions, starting at the first.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Move to `index` when it is in range; returns whether the cursor moved.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.len && index != self.index {
            self.index = index;
            return true;
        }
        false
    }

    /// Advance one question; no-op at the last question.
    pub fn next(&mut self) -> bool {
        self.go_to(self.index.saturating_add(1))
    }

    /// Step back one question; no-op at the first question.
    pub fn previous(&mut self) -> bool {
        match self.index.checked_sub(1) {
            Some(prev) => self.go_to(prev),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_first_question() {
        let cursor = Cursor::new(5);
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn out_of_range_go_to_is_a_no_op() {
        let mut cursor = Cursor::new(3);
        cursor.go_to(2);
        assert!(!cursor.go_to(3));
        assert!(!cursor.go_to(usize::MAX));
        assert_eq!(cursor.current(), 2);
    }

    #[test]
    fn previous_at_zero_stays_put() {
        let mut cursor = Cursor::new(3);
        assert!(!cursor.previous());
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn next_stops_at_last_question() {
        let mut cursor = Cursor::new(2);
        assert!(cursor.next());
        assert!(!cursor.next());
        assert_eq!(cursor.current(), 1);
    }

    #[test]
    fn empty_list_never_moves() {
        let mut cursor = Cursor::new(0);
        assert!(!cursor.go_to(0));
        assert!(!cursor.next());
        assert_eq!(cursor.current(), 0);
    }
}
