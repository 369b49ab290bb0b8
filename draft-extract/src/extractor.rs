//! Incremental delimiter scanner over a rolling text buffer.
//!
//! Model output interleaves prose with delimited regions:
//!
//! ```text
//! <IssueTitle>Fix login timeout</IssueTitle>
//! <IssueText>Sessions expire after 5 seconds instead of 5 minutes.</IssueText>
//! ```
//!
//! The extractor accumulates arbitrarily-chunked fragments and emits an
//! [`IssueDraft`] as soon as a title region and its following body region
//! are both closed. Matched spans are removed from the buffer, so memory
//! stays bounded by one in-flight region plus any prose around it.

use draft_types::{ExtractError, IssueDraft};

/// Opening delimiter of a title region.
const TITLE_OPEN: &str = "<IssueTitle>";
/// Closing delimiter of a title region.
const TITLE_CLOSE: &str = "</IssueTitle>";
/// Opening delimiter of a body region.
const BODY_OPEN: &str = "<IssueText>";
/// Closing delimiter of a body region.
const BODY_CLOSE: &str = "</IssueText>";

/// Scanner position within the delimiter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Looking for the next `<IssueTitle>`.
    SeekTitleOpen,
    /// Inside a title region, looking for `</IssueTitle>`.
    SeekTitleClose,
    /// Title closed, looking for the following `<IssueText>`.
    SeekBodyOpen,
    /// Inside a body region, looking for `</IssueText>`.
    SeekBodyClose,
}

/// Incremental extractor: feed fragments with [`push`](DraftExtractor::push),
/// collect completed drafts as they close.
///
/// The scan cursor persists across appends, so each `push` costs time
/// proportional to the new bytes. When a delimiter may straddle the chunk
/// seam, the cursor backs off by at most one delimiter length.
#[derive(Debug)]
pub struct DraftExtractor {
    /// Unconsumed text: prose plus at most one partially-formed trailing region.
    buf: String,
    state: ScanState,
    /// Byte offset where the current state's search resumes.
    cursor: usize,
    /// Offset of the `<IssueTitle>` that starts the in-flight match.
    match_start: usize,
    /// Start of the title text (just past `<IssueTitle>`).
    title_start: usize,
    /// End of the title text (at `</IssueTitle>`).
    title_end: usize,
    /// Start of the body text (just past `<IssueText>`).
    body_start: usize,
}

impl Default for DraftExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftExtractor {
    /// Create an empty extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: String::new(),
            state: ScanState::SeekTitleOpen,
            cursor: 0,
            match_start: 0,
            title_start: 0,
            title_end: 0,
            body_start: 0,
        }
    }

    /// Append one fragment and return every draft it completes, in buffer
    /// order.
    ///
    /// Fragments may split delimiters at any byte offset; an unterminated
    /// trailing region simply waits for future fragments.
    pub fn push(&mut self, fragment: &str) -> Vec<IssueDraft> {
        self.buf.push_str(fragment);

        let mut out = Vec::new();
        loop {
            match self.state {
                ScanState::SeekTitleOpen => {
                    let Some(at) = self.seek(TITLE_OPEN) else {
                        self.rewind(TITLE_OPEN);
                        break;
                    };
                    self.match_start = at;
                    self.title_start = at + TITLE_OPEN.len();
                    self.cursor = self.title_start;
                    self.state = ScanState::SeekTitleClose;
                }
                ScanState::SeekTitleClose => {
                    let Some(at) = self.seek(TITLE_CLOSE) else {
                        self.rewind(TITLE_CLOSE);
                        break;
                    };
                    self.title_end = at;
                    self.cursor = at + TITLE_CLOSE.len();
                    self.state = ScanState::SeekBodyOpen;
                }
                ScanState::SeekBodyOpen => {
                    let Some(at) = self.seek(BODY_OPEN) else {
                        self.rewind(BODY_OPEN);
                        break;
                    };
                    self.body_start = at + BODY_OPEN.len();
                    self.cursor = self.body_start;
                    self.state = ScanState::SeekBodyClose;
                }
                ScanState::SeekBodyClose => {
                    let Some(at) = self.seek(BODY_CLOSE) else {
                        self.rewind(BODY_CLOSE);
                        break;
                    };
                    let title = self.buf[self.title_start..self.title_end].trim().to_owned();
                    let body = self.buf[self.body_start..at].trim().to_owned();
                    // A region whose title trims to nothing is consumed but
                    // produces no draft.
                    if !title.is_empty() {
                        out.push(IssueDraft::new(title, body));
                    }
                    self.buf.replace_range(self.match_start..at + BODY_CLOSE.len(), "");
                    // Removal joins the text around the span; back off far
                    // enough to catch a delimiter forming across the seam.
                    self.cursor = self.match_start.saturating_sub(TITLE_OPEN.len() - 1);
                    while self.cursor > 0 && !self.buf.is_char_boundary(self.cursor) {
                        self.cursor -= 1;
                    }
                    self.state = ScanState::SeekTitleOpen;
                }
            }
        }
        out
    }

    /// The unconsumed buffer: text not attributed to any emitted draft.
    #[must_use]
    pub fn remainder(&self) -> &str {
        &self.buf
    }

    /// Consume the extractor, failing if any opening delimiter left in the
    /// buffer has no matching close.
    ///
    /// This is the strict end-of-input check the single-shot variant uses;
    /// streaming callers that want the lenient behavior just drop the
    /// extractor instead.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::UnterminatedTag`] naming the first unclosed
    /// region.
    pub fn finish(self) -> Result<(), ExtractError> {
        match first_unterminated(&self.buf) {
            Some((tag, offset)) => Err(ExtractError::UnterminatedTag { tag, offset }),
            None => Ok(()),
        }
    }

    /// Find `pat` at or after the cursor, returning its absolute offset.
    fn seek(&self, pat: &str) -> Option<usize> {
        self.buf[self.cursor..].find(pat).map(|i| self.cursor + i)
    }

    /// Advance the cursor as far as possible while still allowing a `pat`
    /// straddling the chunk seam to match after the next append.
    fn rewind(&mut self, pat: &str) {
        let mut at = self.buf.len().saturating_sub(pat.len() - 1);
        while at > 0 && !self.buf.is_char_boundary(at) {
            at -= 1;
        }
        self.cursor = self.cursor.max(at);
    }
}

/// Locate the first opening delimiter in `buf` whose closing delimiter never
/// appears after it. Returns the tag name and the byte offset of the open.
fn first_unterminated(buf: &str) -> Option<(&'static str, usize)> {
    let mut pos = 0;
    while let Some((at, open, close, tag)) = next_open(buf, pos) {
        let text_start = at + open.len();
        match buf[text_start..].find(close) {
            Some(rel) => pos = text_start + rel + close.len(),
            None => return Some((tag, at)),
        }
    }
    None
}

/// The earliest opening delimiter (title or body) at or after `pos`.
fn next_open(buf: &str, pos: usize) -> Option<(usize, &'static str, &'static str, &'static str)> {
    let title = buf[pos..].find(TITLE_OPEN).map(|i| pos + i);
    let body = buf[pos..].find(BODY_OPEN).map(|i| pos + i);
    match (title, body) {
        (Some(t), Some(b)) if b < t => Some((b, BODY_OPEN, BODY_CLOSE, "IssueText")),
        (Some(t), _) => Some((t, TITLE_OPEN, TITLE_CLOSE, "IssueTitle")),
        (None, Some(b)) => Some((b, BODY_OPEN, BODY_CLOSE, "IssueText")),
        (None, None) => None,
    }
}
