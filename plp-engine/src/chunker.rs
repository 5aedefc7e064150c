//! Backtracking word-group enumeration
//!
//! A message is broken into contiguous groups of words, one group per
//! track lookup. Candidates for each remainder are generated longest-first
//! so the search prefers few, full-phrase groups over many single words.
//! When no candidate for a remainder validates, the chunker backtracks:
//! the most recently accepted group is withdrawn and retried one word
//! shorter.
//!
//! The chunker is an explicit state machine driven from outside: `peek()`
//! is pure, and the caller decides which transition to take based on
//! whether the current candidate resolved to a track. This keeps the
//! validation logic (and its I/O) entirely out of the enumeration.

/// Contiguous run of words, by position and length, within the chunker's
/// word sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordGroup {
    pub start: usize,
    pub len: usize,
}

/// What the chunker offers next
#[derive(Debug, PartialEq, Eq)]
pub enum ChunkState<'a> {
    /// A candidate group to validate. Call `accept()` if it resolved,
    /// `reject()` to try the next (shorter) candidate.
    Candidate(&'a [String]),
    /// Candidates for the current remainder are exhausted; a backtrack is
    /// available. The caller must drop its last accepted result and call
    /// `backtrack()`.
    Stalled,
    /// Accepted groups cover the whole word sequence.
    Complete,
    /// No further segmentation is possible.
    Exhausted,
}

/// Backtracking enumerator over the word-group segmentations of a message.
///
/// Candidates for the remainder starting at `covered` are the prefixes of
/// length `cur_max - cursor` down to 1; they are never materialized, only
/// computed from the three counters.
#[derive(Debug)]
pub struct MessageChunker {
    words: Vec<String>,
    accepted: Vec<WordGroup>,
    /// Words covered by `accepted` (the start of the current remainder)
    covered: usize,
    /// Longest candidate length allowed for the current remainder
    cur_max: usize,
    /// Candidates already rejected for the current remainder
    cursor: usize,
}

impl MessageChunker {
    /// Create a chunker over `words` with an optional cap on the first
    /// group's length.
    ///
    /// `None`, zero, or a cap larger than the word count falls back to the
    /// full length, so a single-word message still yields its one group
    /// even when the caller asked for `word_count - 1`.
    pub fn new(words: Vec<String>, max_chunk_len: Option<usize>) -> Self {
        let len = words.len();
        let cur_max = match max_chunk_len {
            Some(max) if max >= 1 && max <= len => max,
            _ => len,
        };
        Self {
            words,
            accepted: Vec::new(),
            covered: 0,
            cur_max,
            cursor: 0,
        }
    }

    /// Current state, without side effects
    pub fn peek(&self) -> ChunkState<'_> {
        if self.covered == self.words.len() {
            return ChunkState::Complete;
        }
        let candidate_len = self.cur_max.saturating_sub(self.cursor);
        if candidate_len >= 1 {
            return ChunkState::Candidate(&self.words[self.covered..self.covered + candidate_len]);
        }
        // Remainder exhausted. Backtracking needs an accepted group to
        // withdraw, and withdrawing a lone single-word group leaves
        // nothing shorter to try.
        if self.accepted.is_empty() || (self.accepted.len() == 1 && self.accepted[0].len == 1) {
            ChunkState::Exhausted
        } else {
            ChunkState::Stalled
        }
    }

    /// Commit the current candidate. The new remainder is searched with
    /// the full remaining length as the cap.
    pub fn accept(&mut self) {
        debug_assert!(matches!(self.peek(), ChunkState::Candidate(_)));
        let len = self.cur_max - self.cursor;
        self.accepted.push(WordGroup {
            start: self.covered,
            len,
        });
        self.covered += len;
        self.cur_max = self.words.len() - self.covered;
        self.cursor = 0;
    }

    /// Discard the current candidate and move to the next, one word
    /// shorter.
    pub fn reject(&mut self) {
        debug_assert!(matches!(self.peek(), ChunkState::Candidate(_)));
        self.cursor += 1;
    }

    /// Withdraw the most recently accepted group (of length L) and
    /// restart candidate enumeration at its position with cap L - 1.
    pub fn backtrack(&mut self) {
        debug_assert!(matches!(self.peek(), ChunkState::Stalled));
        if let Some(group) = self.accepted.pop() {
            self.covered -= group.len;
            self.cur_max = group.len - 1;
            self.cursor = 0;
        }
    }

    /// Groups accepted so far, in order
    pub fn accepted(&self) -> &[WordGroup] {
        &self.accepted
    }

    /// Words covered by the accepted groups
    pub fn covered(&self) -> usize {
        self.covered
    }

    /// Total words in the message
    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}
