use std::cmp::Ordering;

use chrono::{DateTime, Local, Utc};

/// Canonical representation of one submitted story, normalized from either
/// source. `original_url` is the identity key: two posts are the same story
/// iff their URLs are byte-for-byte equal. No scheme/slash/query
/// normalization is applied.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: String,
    pub submit_timestamp: DateTime<Utc>,
    pub title: String,
    pub original_url: String,
    pub submitter: String,
    pub comment_url: String,
    pub votes: u32,
    pub comment_count: u32,
}

impl Post {
    /// Submission time in the machine's local timezone, for display only.
    /// All comparisons use `submit_timestamp` directly (UTC).
    pub fn local_time(&self) -> String {
        self.submit_timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%dT%H:%M:%S %z")
            .to_string()
    }
}

// Equality and ordering are defined solely over the URL. The ordering exists
// to enable the sorted-merge intersection, not for display.
impl PartialEq for Post {
    fn eq(&self, other: &Self) -> bool {
        self.original_url == other.original_url
    }
}

impl Eq for Post {}

impl PartialOrd for Post {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Post {
    fn cmp(&self, other: &Self) -> Ordering {
        self.original_url.cmp(&other.original_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(url: &str, epoch: i64) -> Post {
        Post {
            id: "x1".into(),
            submit_timestamp: Utc.timestamp_opt(epoch, 0).unwrap(),
            title: "A story".into(),
            original_url: url.into(),
            submitter: "someone".into(),
            comment_url: String::new(),
            votes: 0,
            comment_count: 0,
        }
    }

    #[test]
    fn test_identity_is_exact_url_equality() {
        let a = sample("https://example.com/a", 100);
        let b = sample("https://example.com/a", 999); // different timestamp, same URL
        let c = sample("https://example.com/a/", 100); // trailing slash differs
        let d = sample("https://Example.com/a", 100); // case differs

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_ordering_is_lexicographic_on_url() {
        let mut posts = vec![
            sample("https://example.com/c", 1),
            sample("https://example.com/a", 2),
            sample("https://example.com/b", 3),
        ];
        posts.sort();
        let urls: Vec<_> = posts.iter().map(|p| p.original_url.as_str()).collect();
        assert_eq!(
            urls,
            [
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/c"
            ]
        );
    }
}
