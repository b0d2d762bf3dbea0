/// Input token the detector consumes. Characters are lowered so the
/// sequence is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyToken {
    Up,
    Down,
    Left,
    Right,
    Char(char),
}

impl KeyToken {
    pub fn character(ch: char) -> Self {
        Self::Char(ch.to_ascii_lowercase())
    }
}

/// Recognizes one fixed ordered token sequence. Re-triggerable: the
/// cursor rewinds after every completion, and the fire-once policy is
/// layered separately by [`OneShotGate`].
#[derive(Debug, Clone)]
pub struct SequenceDetector {
    expected: Vec<KeyToken>,
    cursor: usize,
}

impl SequenceDetector {
    pub fn new(expected: Vec<KeyToken>) -> Self {
        Self { expected, cursor: 0 }
    }

    /// Up Up Down Down Left Right Left Right B A.
    pub fn konami() -> Self {
        use KeyToken::*;
        Self::new(vec![
            Up,
            Up,
            Down,
            Down,
            Left,
            Right,
            Left,
            Right,
            Char('b'),
            Char('a'),
        ])
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns true exactly on the token that completes the sequence.
    ///
    /// A mismatching token is retried as the start of a fresh attempt,
    /// so a token equal to the first element advances the cursor to 1
    /// even immediately after a reset.
    pub fn feed(&mut self, token: KeyToken) -> bool {
        if self.expected.is_empty() {
            return false;
        }
        if self.cursor >= self.expected.len() {
            // Cursor overrun: reset and keep going, never propagate.
            self.cursor = 0;
        }
        if token == self.expected[self.cursor] {
            self.cursor += 1;
        } else if token == self.expected[0] {
            self.cursor = 1;
        } else {
            self.cursor = 0;
            return false;
        }
        if self.cursor == self.expected.len() {
            self.cursor = 0;
            return true;
        }
        false
    }

    #[cfg(test)]
    pub fn force_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }
}

/// Fire-once policy for the action bound to a completed sequence. The
/// detector keeps matching forever; this gate decides whether the
/// consuming action runs again.
#[derive(Debug, Clone, Default)]
pub struct OneShotGate {
    spent: bool,
}

impl OneShotGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// True only on the first completed match passed through.
    pub fn admit(&mut self, completed: bool) -> bool {
        if completed && !self.spent {
            self.spent = true;
            return true;
        }
        false
    }

    pub fn spent(&self) -> bool {
        self.spent
    }
}

#[cfg(test)]
mod tests {
    use super::KeyToken::*;
    use super::*;

    #[test]
    fn konami_fires_exactly_on_the_tenth_token() {
        let mut detector = SequenceDetector::konami();
        let tokens = [Up, Up, Down, Down, Left, Right, Left, Right, Char('b'), Char('a')];
        for (i, token) in tokens.iter().enumerate() {
            let fired = detector.feed(*token);
            assert_eq!(fired, i == 9, "unexpected result at token {i}");
        }
        assert_eq!(detector.cursor(), 0, "cursor rewinds after completion");
    }

    #[test]
    fn mismatch_resets_then_first_element_still_advances() {
        let mut detector = SequenceDetector::konami();
        for token in [Up, Up, Down] {
            detector.feed(token);
        }
        assert!(!detector.feed(Char('x')));
        assert_eq!(detector.cursor(), 0);
        assert!(!detector.feed(Up));
        assert_eq!(detector.cursor(), 1, "first element matches right after a reset");
    }

    #[test]
    fn mismatching_token_equal_to_the_first_element_restarts_at_one() {
        let mut detector = SequenceDetector::konami();
        for token in [Up, Up] {
            detector.feed(token);
        }
        // Expected Down; a third Up restarts the attempt, not a dead stop.
        assert!(!detector.feed(Up));
        assert_eq!(detector.cursor(), 1);
    }

    #[test]
    fn detector_is_retriggerable() {
        let mut detector = SequenceDetector::konami();
        let tokens = [Up, Up, Down, Down, Left, Right, Left, Right, Char('b'), Char('a')];
        for _ in 0..2 {
            let mut fired = 0;
            for token in tokens {
                if detector.feed(token) {
                    fired += 1;
                }
            }
            assert_eq!(fired, 1);
        }
    }

    #[test]
    fn cursor_overrun_is_repaired_silently() {
        let mut detector = SequenceDetector::konami();
        detector.force_cursor(99);
        assert!(!detector.feed(Up));
        assert_eq!(detector.cursor(), 1);
    }

    #[test]
    fn characters_are_case_insensitive() {
        let mut detector = SequenceDetector::new(vec![KeyToken::character('B')]);
        assert!(detector.feed(KeyToken::character('b')));
    }

    #[test]
    fn gate_admits_only_the_first_completion() {
        let mut gate = OneShotGate::new();
        assert!(!gate.admit(false));
        assert!(gate.admit(true));
        assert!(gate.spent());
        assert!(!gate.admit(true));
    }
}
