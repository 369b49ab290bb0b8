//! Single-shot extraction over a complete response text.

use draft_types::{ExtractError, IssueDraft};

use crate::extractor::DraftExtractor;

/// Extract every draft from one complete text blob.
///
/// Unlike incremental extraction, a single-shot call treats an unterminated
/// region as a hard failure: if any opening delimiter in `input` has no
/// matching close, the whole call fails and no drafts are returned.
///
/// # Errors
///
/// Returns [`ExtractError::UnterminatedTag`] naming the first unclosed
/// region.
///
/// # Example
///
/// ```
/// use draft_extract::extract_all;
///
/// let drafts = extract_all(
///     "<IssueTitle>Fix login</IssueTitle><IssueText>Timeout is 5s.</IssueText>",
/// )?;
/// assert_eq!(drafts.len(), 1);
/// assert_eq!(drafts[0].title, "Fix login");
/// # Ok::<(), draft_types::ExtractError>(())
/// ```
pub fn extract_all(input: &str) -> Result<Vec<IssueDraft>, ExtractError> {
    let mut extractor = DraftExtractor::new();
    let drafts = extractor.push(input);
    extractor.finish()?;
    Ok(drafts)
}
