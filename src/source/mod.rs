pub mod hackernews;
pub mod lobsters;

use serde_json::Value;

use crate::error::FetchError;
use crate::fetch::Fetcher;
use crate::post::Post;

pub use hackernews::HackerNewsSource;
pub use lobsters::LobstersSource;

/// The two origin sites. A closed set: both share the same
/// list-targets/parse surface but differ in pagination strategy and
/// timestamp encoding, so an enum beats an open trait here.
pub enum Source {
    Lobsters(LobstersSource),
    HackerNews(HackerNewsSource),
}

impl Source {
    pub fn name(&self) -> &'static str {
        match self {
            Source::Lobsters(_) => "Lobsters",
            Source::HackerNews(_) => "HackerNews",
        }
    }

    /// Every URL that one listing retrieval needs to GET. For Hacker News
    /// this does a network round-trip first to get the id listing.
    pub async fn list_targets(&self, fetcher: &Fetcher) -> Result<Vec<String>, FetchError> {
        match self {
            Source::Lobsters(s) => Ok(s.list_targets()),
            Source::HackerNews(s) => s.list_targets(fetcher).await,
        }
    }

    /// Normalizes raw JSON payloads (one per fetched target) into Posts.
    pub fn parse(&self, payloads: &[Value]) -> Vec<Post> {
        match self {
            Source::Lobsters(s) => s.parse(payloads),
            Source::HackerNews(s) => s.parse(payloads),
        }
    }

    /// Full listing retrieval: enumerate targets, fetch them as one
    /// concurrent batch, normalize. Any fetch failure aborts the batch.
    pub async fn fetch_posts(&self, fetcher: &Fetcher) -> Result<Vec<Post>, FetchError> {
        let targets = self.list_targets(fetcher).await?;
        tracing::info!(source = self.name(), targets = targets.len(), "Fetching listing");
        let payloads = fetcher.fetch_all(&targets).await?;
        let posts = self.parse(&payloads);
        tracing::info!(source = self.name(), count = posts.len(), "Parsed posts");
        Ok(posts)
    }
}
