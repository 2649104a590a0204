use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::config::LobstersConfig;
use crate::post::Post;

/// Lobsters exposes paged JSON listings; one GET per page, each page an
/// array of story objects. Timestamps carry an explicit UTC offset
/// (`2020-12-27T06:58:40.000-06:00`) that must drive the conversion, never
/// the machine timezone.
pub struct LobstersSource {
    page_url: String,
    pages: u32,
    comments_base_url: String,
}

impl LobstersSource {
    pub fn top(config: &LobstersConfig) -> Self {
        Self::with_template(config, config.top_page_url.clone())
    }

    pub fn newest(config: &LobstersConfig) -> Self {
        Self::with_template(config, config.new_page_url.clone())
    }

    fn with_template(config: &LobstersConfig, page_url: String) -> Self {
        Self {
            page_url,
            pages: config.pages,
            comments_base_url: config.comments_base_url.clone(),
        }
    }

    pub fn list_targets(&self) -> Vec<String> {
        (1..=self.pages)
            .map(|page| self.page_url.replace("%PAGENUMBER%", &page.to_string()))
            .collect()
    }

    pub fn parse(&self, pages: &[Value]) -> Vec<Post> {
        let mut posts = Vec::new();
        for page in pages {
            let items = match page.as_array() {
                Some(items) => items,
                None => {
                    tracing::warn!("Lobsters page payload is not an array, skipping");
                    continue;
                }
            };
            for item in items {
                if let Some(post) = self.parse_item(item) {
                    posts.push(post);
                }
            }
        }
        posts
    }

    fn parse_item(&self, item: &Value) -> Option<Post> {
        let original_url = item.get("url")?.as_str()?.to_string();

        let created_at = item.get("created_at").and_then(Value::as_str)?;
        let submit_timestamp = match parse_created_at(created_at) {
            Some(ts) => ts,
            None => {
                // Data-quality tradeoff: a malformed timestamp drops the
                // item rather than failing the batch.
                tracing::debug!(created_at, "Unparseable Lobsters timestamp, dropping item");
                return None;
            }
        };

        let id = item
            .get("short_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let comment_url = match item.get("comments_url").and_then(Value::as_str) {
            Some(url) => url.to_string(),
            None => format!("{}{}", self.comments_base_url, id),
        };
        let submitter = item
            .get("submitter_user")
            .and_then(|user| user.get("username"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Some(Post {
            id,
            submit_timestamp,
            title: item
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            original_url,
            submitter,
            comment_url,
            votes: item.get("score").and_then(Value::as_u64).unwrap_or(0) as u32,
            comment_count: item.get("comment_count").and_then(Value::as_u64).unwrap_or(0) as u32,
        })
    }
}

/// Parses `YYYY-MM-DDTHH:MM:SS.mmm±HH:MM` using the offset embedded in the
/// string, then normalizes to UTC. Sub-second precision is discarded by the
/// format itself.
fn parse_created_at(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.3f%:z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> LobstersSource {
        LobstersSource::top(&LobstersConfig::default())
    }

    #[test]
    fn test_list_targets_substitutes_page_numbers() {
        let targets = source().list_targets();
        assert_eq!(targets.len(), 8);
        assert_eq!(targets[0], "https://lobste.rs/page/1.json");
        assert_eq!(targets[7], "https://lobste.rs/page/8.json");
    }

    #[test]
    fn test_created_at_uses_embedded_offset() {
        // 06:58:40 at -06:00 is 12:58:40 UTC.
        let ts = parse_created_at("2020-12-27T06:58:40.000-06:00").unwrap();
        assert_eq!(ts.timestamp(), 1_609_073_920);

        // Same wall clock at a different offset is a different instant.
        let ts_utc = parse_created_at("2020-12-27T06:58:40.000+00:00").unwrap();
        assert_eq!(ts_utc.timestamp(), 1_609_073_920 - 6 * 3600);
    }

    #[test]
    fn test_parse_page_fixture() {
        let raw = std::fs::read_to_string("tests/fixtures/lobsters_page.json")
            .expect("Missing fixture file");
        let page: Value = serde_json::from_str(&raw).unwrap();
        let posts = source().parse(&[page]);

        assert_eq!(posts.len(), 2, "item without url and item with bad timestamp are dropped");

        let first = &posts[0];
        assert_eq!(first.id, "4pivy1");
        assert_eq!(first.title, "Bash HTTP monitoring dashboard");
        assert_eq!(
            first.original_url,
            "https://raymii.org/s/software/Bash_HTTP_Monitoring_Dashboard.html"
        );
        assert_eq!(first.submitter, "raymii");
        assert_eq!(first.votes, 30);
        assert_eq!(first.comment_count, 2);
        assert_eq!(
            first.comment_url,
            "https://lobste.rs/s/4pivy1/bash_http_monitoring_dashboard"
        );
        assert_eq!(first.submit_timestamp.timestamp(), 1_609_073_920);

        // Second item has no comments_url; it is synthesized from the id.
        let second = &posts[1];
        assert_eq!(second.comment_url, "https://lobste.rs/s/abc123");
        assert!(second.submitter.is_empty(), "no submitter_user field");
    }

    #[test]
    fn test_non_array_page_is_skipped() {
        let page = serde_json::json!({"unexpected": "object"});
        assert!(source().parse(&[page]).is_empty());
    }
}
