use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::config::HackerNewsConfig;
use crate::error::FetchError;
use crate::fetch::Fetcher;
use crate::post::Post;

/// Hacker News has no paged listing: one endpoint returns an array of story
/// ids, each story is its own GET. Timestamps are Unix epoch seconds,
/// already UTC.
pub struct HackerNewsSource {
    ids_url: String,
    item_url: String,
    max_stories: usize,
    comments_base_url: String,
}

impl HackerNewsSource {
    pub fn best(config: &HackerNewsConfig) -> Self {
        Self::with_listing(config, config.best_ids_url.clone())
    }

    pub fn newest(config: &HackerNewsConfig) -> Self {
        Self::with_listing(config, config.new_ids_url.clone())
    }

    fn with_listing(config: &HackerNewsConfig, ids_url: String) -> Self {
        Self {
            ids_url,
            item_url: config.item_url.clone(),
            max_stories: config.max_stories,
            comments_base_url: config.comments_base_url.clone(),
        }
    }

    pub async fn list_targets(&self, fetcher: &Fetcher) -> Result<Vec<String>, FetchError> {
        let listing = fetcher.fetch_json(&self.ids_url).await?;
        Ok(self.targets_from_listing(&listing))
    }

    fn targets_from_listing(&self, listing: &Value) -> Vec<String> {
        listing
            .as_array()
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_i64)
                    .take(self.max_stories)
                    .map(|id| self.item_url.replace("%ID%", &id.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn parse(&self, items: &[Value]) -> Vec<Post> {
        items
            .iter()
            .filter_map(|item| self.parse_item(item))
            .collect()
    }

    fn parse_item(&self, item: &Value) -> Option<Post> {
        // Only stories correlate; jobs, polls and comments are skipped.
        if item.get("type").and_then(Value::as_str) != Some("story") {
            return None;
        }
        let original_url = item.get("url")?.as_str()?.to_string();

        let epoch = item.get("time").and_then(Value::as_i64)?;
        let submit_timestamp = parse_epoch(epoch)?;

        let (id, comment_url) = match item.get("id").and_then(Value::as_i64) {
            Some(id) => {
                let id = id.to_string();
                let comment_url = format!("{}{}", self.comments_base_url, id);
                (id, comment_url)
            }
            None => (String::new(), String::new()),
        };

        Some(Post {
            id,
            submit_timestamp,
            title: item
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            original_url,
            submitter: item
                .get("by")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            comment_url,
            votes: item.get("score").and_then(Value::as_u64).unwrap_or(0) as u32,
            comment_count: item.get("descendants").and_then(Value::as_u64).unwrap_or(0) as u32,
        })
    }
}

fn parse_epoch(epoch: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(epoch, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> HackerNewsSource {
        HackerNewsSource::best(&HackerNewsConfig::default())
    }

    #[test]
    fn test_targets_from_listing_caps_and_substitutes() {
        let ids: Vec<i64> = (1..=300).collect();
        let targets = source().targets_from_listing(&json!(ids));
        assert_eq!(targets.len(), 200);
        assert_eq!(targets[0], "https://hacker-news.firebaseio.com/v0/item/1.json");
        assert_eq!(
            targets[199],
            "https://hacker-news.firebaseio.com/v0/item/200.json"
        );
    }

    #[test]
    fn test_targets_from_non_array_listing_is_empty() {
        assert!(source().targets_from_listing(&json!({"ids": [1]})).is_empty());
    }

    #[test]
    fn test_parse_item_fixture() {
        let raw = std::fs::read_to_string("tests/fixtures/hn_item.json")
            .expect("Missing fixture file");
        let item: Value = serde_json::from_str(&raw).unwrap();
        let posts = source().parse(&[item]);

        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.id, "25550732");
        assert_eq!(post.submitter, "todsacerdoti");
        assert_eq!(post.votes, 154);
        assert_eq!(post.comment_count, 26);
        assert_eq!(post.submit_timestamp.timestamp(), 1_609_074_256);
        assert_eq!(
            post.comment_url,
            "https://news.ycombinator.com/item?id=25550732"
        );
    }

    #[test]
    fn test_parse_skips_non_stories_and_missing_urls() {
        let items = vec![
            json!({"type": "job", "id": 1, "time": 1609074256, "url": "https://example.com/job"}),
            json!({"type": "story", "id": 2, "time": 1609074256, "title": "Ask HN: no url"}),
            json!({"type": "story", "id": 3, "time": 1609074256, "url": "https://example.com/a"}),
        ];
        let posts = source().parse(&items);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].original_url, "https://example.com/a");
    }
}
