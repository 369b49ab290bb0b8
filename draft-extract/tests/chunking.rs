//! Chunking-invariance property: however a well-formed response is split
//! into fragments, the same ordered drafts come out.

use draft_extract::{DraftExtractor, extract_all};
use proptest::prelude::*;

/// Assemble a well-formed response from (title, body, trailing prose) parts.
fn assemble(parts: &[(String, String, String)]) -> String {
    let mut out = String::from("Here are the issues I found:\n");
    for (title, body, prose) in parts {
        out.push_str("<IssueTitle>");
        out.push_str(title);
        out.push_str("</IssueTitle>");
        out.push_str("<IssueText>");
        out.push_str(body);
        out.push_str("</IssueText>");
        out.push_str(prose);
    }
    out
}

fn expected(parts: &[(String, String, String)]) -> Vec<(String, String)> {
    parts
        .iter()
        .map(|(t, b, _)| (t.trim().to_owned(), b.trim().to_owned()))
        .collect()
}

proptest! {
    #[test]
    fn any_fragmentation_yields_the_same_drafts(
        parts in prop::collection::vec(
            (
                "[A-Za-z][A-Za-z0-9 .,]{0,24}",
                "[A-Za-z0-9 .,\n]{0,48}",
                "[ \n]{0,4}",
            ),
            1..4,
        ),
        cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
    ) {
        let input = assemble(&parts);

        let mut offsets: Vec<usize> = cuts.iter().map(|ix| ix.index(input.len() + 1)).collect();
        offsets.push(0);
        offsets.push(input.len());
        offsets.sort_unstable();
        offsets.dedup();

        let mut ex = DraftExtractor::new();
        let mut got = Vec::new();
        for pair in offsets.windows(2) {
            for draft in ex.push(&input[pair[0]..pair[1]]) {
                got.push((draft.title, draft.body));
            }
        }

        prop_assert_eq!(got, expected(&parts));
    }

    #[test]
    fn batch_agrees_with_streaming_on_well_formed_input(
        parts in prop::collection::vec(
            (
                "[A-Za-z][A-Za-z0-9 ]{0,16}",
                "[A-Za-z0-9 ]{0,32}",
                "[ \n]{0,2}",
            ),
            1..4,
        ),
    ) {
        let input = assemble(&parts);

        let mut ex = DraftExtractor::new();
        let streamed: Vec<_> = ex
            .push(&input)
            .into_iter()
            .map(|d| (d.title, d.body))
            .collect();
        let batched: Vec<_> = extract_all(&input)
            .unwrap()
            .into_iter()
            .map(|d| (d.title, d.body))
            .collect();

        prop_assert_eq!(streamed, batched);
    }
}
