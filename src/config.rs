use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub lobsters: LobstersConfig,
    #[serde(default)]
    pub hackernews: HackerNewsConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Disables TLS certificate verification. Off unless explicitly enabled.
    #[serde(default)]
    pub danger_accept_invalid_certs: bool,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LobstersConfig {
    #[serde(default = "default_lobsters_top")]
    pub top_page_url: String,
    #[serde(default = "default_lobsters_new")]
    pub new_page_url: String,
    #[serde(default = "default_lobsters_pages")]
    pub pages: u32,
    #[serde(default = "default_lobsters_comments")]
    pub comments_base_url: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct HackerNewsConfig {
    #[serde(default = "default_hn_best")]
    pub best_ids_url: String,
    #[serde(default = "default_hn_new")]
    pub new_ids_url: String,
    #[serde(default = "default_hn_item")]
    pub item_url: String,
    #[serde(default = "default_hn_max")]
    pub max_stories: usize,
    #[serde(default = "default_hn_comments")]
    pub comments_base_url: String,
}

fn default_timeout() -> u64 {
    15
}
fn default_user_agent() -> String {
    format!("crosspost-tracker/{}", env!("CARGO_PKG_VERSION"))
}
fn default_lobsters_top() -> String {
    "https://lobste.rs/page/%PAGENUMBER%.json".to_string()
}
fn default_lobsters_new() -> String {
    "https://lobste.rs/newest/page/%PAGENUMBER%.json".to_string()
}
fn default_lobsters_pages() -> u32 {
    8
}
fn default_lobsters_comments() -> String {
    "https://lobste.rs/s/".to_string()
}
fn default_hn_best() -> String {
    "https://hacker-news.firebaseio.com/v0/beststories.json".to_string()
}
fn default_hn_new() -> String {
    "https://hacker-news.firebaseio.com/v0/newstories.json".to_string()
}
fn default_hn_item() -> String {
    "https://hacker-news.firebaseio.com/v0/item/%ID%.json".to_string()
}
fn default_hn_max() -> usize {
    200
}
fn default_hn_comments() -> String {
    "https://news.ycombinator.com/item?id=".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            danger_accept_invalid_certs: false,
        }
    }
}

impl Default for LobstersConfig {
    fn default() -> Self {
        Self {
            top_page_url: default_lobsters_top(),
            new_page_url: default_lobsters_new(),
            pages: default_lobsters_pages(),
            comments_base_url: default_lobsters_comments(),
        }
    }
}

impl Default for HackerNewsConfig {
    fn default() -> Self {
        Self {
            best_ids_url: default_hn_best(),
            new_ids_url: default_hn_new(),
            item_url: default_hn_item(),
            max_stories: default_hn_max(),
            comments_base_url: default_hn_comments(),
        }
    }
}

impl Config {
    /// Loads config.toml when present, otherwise falls back to the built-in
    /// defaults. Every key is optional.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {:?}: {}", path, e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))?;
        Ok(config)
    }
}
