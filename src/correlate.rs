use std::cmp::Ordering;

use crate::post::Post;

/// Ordered intersection of two post collections by `original_url`.
///
/// Both sides are sorted (clones, callers keep their scan order) and walked
/// simultaneously; one element from side `a` is emitted per matching key.
/// O(n log n + m log m) to sort, O(n + m) to merge.
pub fn intersect(a: &[Post], b: &[Post]) -> Vec<Post> {
    let mut sorted_a = a.to_vec();
    let mut sorted_b = b.to_vec();
    sorted_a.sort();
    sorted_b.sort();

    let mut matches = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < sorted_a.len() && j < sorted_b.len() {
        match sorted_a[i].original_url.cmp(&sorted_b[j].original_url) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                matches.push(sorted_a[i].clone());
                i += 1;
                j += 1;
            }
        }
    }
    matches
}

/// Resolves each intersection key back to concrete posts: the first
/// occurrence (in original scan order) on each side. The merge only proves
/// membership, not which instance to report, and either side may contain
/// duplicate URLs.
///
/// A key the re-lookup cannot resolve on both sides is skipped; the
/// intersection just proved membership, so this should not happen, but a
/// miss must not panic.
pub fn match_pairs(a: &[Post], b: &[Post]) -> Vec<(Post, Post)> {
    intersect(a, b)
        .into_iter()
        .filter_map(|key| {
            let post_a = a.iter().find(|p| p.original_url == key.original_url)?;
            let post_b = b.iter().find(|p| p.original_url == key.original_url)?;
            Some((post_a.clone(), post_b.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn post(id: &str, url: &str) -> Post {
        Post {
            id: id.into(),
            submit_timestamp: Utc.timestamp_opt(1_600_000_000, 0).unwrap(),
            title: format!("title {id}"),
            original_url: url.into(),
            submitter: String::new(),
            comment_url: String::new(),
            votes: 0,
            comment_count: 0,
        }
    }

    #[test]
    fn test_intersection_is_order_independent() {
        let a = vec![
            post("a1", "https://example.com/x"),
            post("a2", "https://example.com/y"),
            post("a3", "https://example.com/z"),
        ];
        let b = vec![
            post("b1", "https://example.com/z"),
            post("b2", "https://example.com/q"),
            post("b3", "https://example.com/x"),
        ];

        let forward: Vec<_> = intersect(&a, &b)
            .into_iter()
            .map(|p| p.original_url)
            .collect();
        assert_eq!(forward, ["https://example.com/x", "https://example.com/z"]);

        let mut a_rev = a.clone();
        a_rev.reverse();
        let mut b_rev = b.clone();
        b_rev.reverse();
        let reversed: Vec<_> = intersect(&a_rev, &b_rev)
            .into_iter()
            .map(|p| p.original_url)
            .collect();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_disjoint_collections_have_empty_intersection() {
        let a = vec![post("a1", "https://example.com/x")];
        let b = vec![post("b1", "https://example.com/y")];
        assert!(intersect(&a, &b).is_empty());
        assert!(match_pairs(&a, &b).is_empty());
    }

    #[test]
    fn test_match_pairs_takes_first_occurrence_per_side() {
        // Both sides list the same URL twice; the pair must report the first
        // occurrence in the original scan order, not the sorted order.
        let a = vec![
            post("a-early", "https://example.com/dup"),
            post("a-late", "https://example.com/dup"),
        ];
        let b = vec![
            post("b-early", "https://example.com/dup"),
            post("b-late", "https://example.com/dup"),
        ];

        let pairs = match_pairs(&a, &b);
        assert_eq!(pairs.len(), 2, "merge emits one element per matching pair of keys");
        for (pa, pb) in &pairs {
            assert_eq!(pa.id, "a-early");
            assert_eq!(pb.id, "b-early");
        }
    }

    #[test]
    fn test_identity_is_case_sensitive() {
        let a = vec![post("a1", "https://example.com/X")];
        let b = vec![post("b1", "https://example.com/x")];
        assert!(intersect(&a, &b).is_empty());
    }
}
