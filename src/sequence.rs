/*
    ALICE-SWIFT
    Copyright (C) 2026 Moroya Sakamoto
*/

//! Sequence slicing over block 4 tag lists.
//!
//! Two strategies cover every MT layout:
//!
//! - **Field 15 split** — each `15X` tag opens a new sequence `X` that runs
//!   until the next `15` tag. Used for the top-level sequences of the
//!   treasury and derivative confirmations.
//! - **Delimited with optional tail** — a sequence starts at a tag matching
//!   one of the `start` names, runs up to and including the first tag
//!   matching one of the `end` names, then absorbs any immediately following
//!   tags matching the `tail` names. Used for subsequences that have no
//!   marker field.
//!
//! All name sets accept wildcard patterns (`57a`).

use crate::block::TagList;
use crate::tag::Tag;

/// One block produced by [`split_by_field15`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceBlock {
    /// Remainder of the opening tag name after `15` (`"A"` for `15A`).
    pub letter: String,
    /// Tags of the sequence, the opening `15X` tag first.
    pub tags: TagList,
}

/// Split `tags` at every `15X` field.
///
/// Tags before the first `15` field are not part of any sequence and are
/// dropped. Repeated letters produce separate blocks in input order.
pub fn split_by_field15(tags: &TagList) -> Vec<SequenceBlock> {
    let mut out: Vec<SequenceBlock> = Vec::new();
    for tag in tags {
        if tag.is_sequence_boundary() {
            out.push(SequenceBlock {
                letter: tag.name[2..].to_string(),
                tags: TagList::new(),
            });
        }
        if let Some(current) = out.last_mut() {
            current.tags.append(tag.clone());
        }
    }
    out
}

/// First sequence opened by `15<letter>`.
pub fn field15_sequence(tags: &TagList, letter: &str) -> Option<TagList> {
    split_by_field15(tags)
        .into_iter()
        .find(|b| b.letter == letter)
        .map(|b| b.tags)
}

/// Every sequence opened by `15<letter>`, in order.
pub fn field15_sequences(tags: &TagList, letter: &str) -> Vec<TagList> {
    split_by_field15(tags)
        .into_iter()
        .filter(|b| b.letter == letter)
        .map(|b| b.tags)
        .collect()
}

#[inline]
fn is_one_of(tag: &Tag, names: &[&str]) -> bool {
    names.iter().any(|n| tag.matches(n))
}

/// Locate the next delimited block at or after index `from`.
///
/// Returns the half-open index range of the block. The end search includes
/// the start tag itself, so a name present in both `start` and `end` yields a
/// block that closes immediately (plus its tail). A start tag found before
/// any end tag restarts the candidate at that tag.
fn find_delimited(
    tags: &[Tag],
    start: &[&str],
    end: &[&str],
    tail: &[&str],
    from: usize,
) -> Option<std::ops::Range<usize>> {
    let mut s = (from..tags.len()).find(|&i| is_one_of(&tags[i], start))?;

    let e = if end.is_empty() {
        s
    } else {
        let mut found = None;
        let mut j = s;
        while j < tags.len() {
            if is_one_of(&tags[j], end) {
                found = Some(j);
                break;
            }
            if j > s && is_one_of(&tags[j], start) {
                s = j;
                // Re-check the new start as a potential end on the next pass.
                continue;
            }
            j += 1;
        }
        found?
    };

    let mut k = e + 1;
    while k < tags.len() && is_one_of(&tags[k], tail) {
        k += 1;
    }
    Some(s..k)
}

/// First block delimited by `start`/`end` with an optional `tail`.
pub fn sub_block_delimited_with_optional_tail(
    tags: &TagList,
    start: &[&str],
    end: &[&str],
    tail: &[&str],
) -> Option<TagList> {
    find_delimited(tags.tags(), start, end, tail, 0).map(|r| tags.slice(r))
}

/// Every non-overlapping block delimited by `start`/`end` with an optional
/// `tail`. Scanning resumes right after the previous block.
pub fn sub_blocks_delimited_with_optional_tail(
    tags: &TagList,
    start: &[&str],
    end: &[&str],
    tail: &[&str],
) -> Vec<TagList> {
    let mut out = Vec::new();
    let mut from = 0;
    while let Some(r) = find_delimited(tags.tags(), start, end, tail, from) {
        from = r.end;
        out.push(tags.slice(r));
    }
    out
}

/// First block starting at `start` and ending at `end` (inclusive).
pub fn sub_block(tags: &TagList, start: &str, end: &str) -> Option<TagList> {
    sub_block_delimited_with_optional_tail(tags, &[start], &[end], &[])
}

impl TagList {
    /// See [`split_by_field15`].
    #[inline]
    pub fn split_by_field15(&self) -> Vec<SequenceBlock> {
        split_by_field15(self)
    }

    /// See [`sub_block_delimited_with_optional_tail`].
    #[inline]
    pub fn sub_block_delimited_with_optional_tail(
        &self,
        start: &[&str],
        end: &[&str],
        tail: &[&str],
    ) -> Option<TagList> {
        sub_block_delimited_with_optional_tail(self, start, end, tail)
    }

    /// See [`sub_blocks_delimited_with_optional_tail`].
    #[inline]
    pub fn sub_blocks_delimited_with_optional_tail(
        &self,
        start: &[&str],
        end: &[&str],
        tail: &[&str],
    ) -> Vec<TagList> {
        sub_blocks_delimited_with_optional_tail(self, start, end, tail)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn list(names: &[&str]) -> TagList {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Tag::new(n, &i.to_string()))
            .collect()
    }

    fn names(l: &TagList) -> Vec<&str> {
        l.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_split_by_field15_basic() {
        let tags = list(&["15A", "20", "22A", "15B", "30T", "32B", "15C", "57A"]);
        let blocks = split_by_field15(&tags);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].letter, "A");
        assert_eq!(names(&blocks[0].tags), vec!["15A", "20", "22A"]);
        assert_eq!(names(&blocks[1].tags), vec!["15B", "30T", "32B"]);
        assert_eq!(names(&blocks[2].tags), vec!["15C", "57A"]);
    }

    #[test]
    fn test_split_drops_leading_tags() {
        let tags = list(&["20", "21", "15A", "22A"]);
        let blocks = split_by_field15(&tags);
        assert_eq!(blocks.len(), 1);
        assert_eq!(names(&blocks[0].tags), vec!["15A", "22A"]);
    }

    #[test]
    fn test_split_without_field15_is_empty() {
        let tags = list(&["20", "21"]);
        assert!(split_by_field15(&tags).is_empty());
        assert_eq!(field15_sequence(&tags, "A"), None);
    }

    #[test]
    fn test_repeated_letters_kept_separately() {
        let tags = list(&["15A", "20", "15B", "30F", "15B", "30F", "32M"]);
        let bs = field15_sequences(&tags, "B");
        assert_eq!(bs.len(), 2);
        assert_eq!(names(&bs[1]), vec!["15B", "30F", "32M"]);
        assert_eq!(field15_sequence(&tags, "B").map(|b| b.len()), Some(2));
    }

    #[test]
    fn test_delimited_with_tail() {
        let tags = list(&["20", "22X", "30F", "32M", "57A", "57D", "72"]);
        let b = sub_block_delimited_with_optional_tail(&tags, &["22X"], &["32M"], &["57a"])
            .unwrap();
        assert_eq!(names(&b), vec!["22X", "30F", "32M", "57A", "57D"]);
    }

    #[test]
    fn test_delimited_without_end_returns_none() {
        let tags = list(&["22X", "30F"]);
        assert_eq!(
            sub_block_delimited_with_optional_tail(&tags, &["22X"], &["32M"], &[]),
            None
        );
    }

    #[test]
    fn test_delimited_restarts_on_new_start() {
        let tags = list(&["22X", "30F", "22X", "32M"]);
        let b = sub_block(&tags, "22X", "32M").unwrap();
        assert_eq!(names(&b), vec!["22X", "32M"]);
        assert_eq!(b.tags()[0].value, "2");
    }

    #[test]
    fn test_start_equal_to_end_repeats() {
        let tags = list(&["18A", "30F", "32M", "30F", "30F", "32M", "72"]);
        let bs = sub_blocks_delimited_with_optional_tail(&tags, &["30F"], &["30F"], &["32M"]);
        let got: Vec<Vec<&str>> = bs.iter().map(names).collect();
        assert_eq!(
            got,
            vec![vec!["30F", "32M"], vec!["30F"], vec!["30F", "32M"]]
        );
    }

    #[test]
    fn test_empty_end_set_is_start_plus_tail() {
        let tags = list(&["30F", "32M", "32M", "72"]);
        let b = sub_block_delimited_with_optional_tail(&tags, &["30F"], &[], &["32M"]).unwrap();
        assert_eq!(names(&b), vec!["30F", "32M", "32M"]);
    }

    #[test]
    fn test_multiple_blocks_resume_after_previous() {
        let tags = list(&["22X", "32M", "22X", "30F", "32M", "33E"]);
        let bs = tags.sub_blocks_delimited_with_optional_tail(&["22X"], &["32M"], &["33E"]);
        assert_eq!(bs.len(), 2);
        assert_eq!(names(&bs[1]), vec!["22X", "30F", "32M", "33E"]);
    }

    #[test]
    fn test_wildcard_in_delimiters() {
        let tags = list(&["53A", "56D", "57A", "58J"]);
        let b = sub_block(&tags, "53a", "57a").unwrap();
        assert_eq!(names(&b), vec!["53A", "56D", "57A"]);
    }

    proptest! {
        #[test]
        fn prop_field15_split_preserves_tail_of_input(
            picks in proptest::collection::vec(0usize..6, 0..40)
        ) {
            const POOL: [&str; 6] = ["15A", "15B", "20", "30F", "32M", "57A"];
            let tags: TagList = picks.iter().map(|&i| Tag::new(POOL[i], "x")).collect();
            let first = tags.iter().position(|t| t.is_sequence_boundary());
            let flattened: Vec<Tag> = split_by_field15(&tags)
                .into_iter()
                .flat_map(|b| b.tags.into_tags())
                .collect();
            let expected: Vec<Tag> = match first {
                Some(i) => tags.tags()[i..].to_vec(),
                None => Vec::new(),
            };
            prop_assert_eq!(flattened, expected);
        }

        #[test]
        fn prop_delimited_blocks_are_ordered_and_bounded(
            picks in proptest::collection::vec(0usize..5, 0..40)
        ) {
            const POOL: [&str; 5] = ["22X", "30F", "32M", "33E", "72"];
            let tags: TagList = picks
                .iter()
                .enumerate()
                .map(|(n, &i)| Tag::new(POOL[i], &n.to_string()))
                .collect();
            let blocks = sub_blocks_delimited_with_optional_tail(&tags, &["22X"], &["32M"], &["33E"]);
            let mut last_index: i64 = -1;
            for b in &blocks {
                prop_assert_eq!(b.tags()[0].name.as_str(), "22X");
                prop_assert!(b.contains("32M"));
                let first: i64 = b.tags()[0].value.parse().unwrap();
                prop_assert!(first > last_index);
                last_index = b.tags().last().unwrap().value.parse().unwrap();
            }
        }
    }
}
