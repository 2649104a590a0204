mod config;
mod correlate;
mod error;
mod fetch;
mod post;
mod report;
mod source;

use std::path::Path;

use chrono::Local;
use clap::Parser;
use serde_json::Value;

use crate::config::Config;
use crate::fetch::Fetcher;
use crate::report::{analyze, render};
use crate::source::{HackerNewsSource, LobstersSource, Source};

#[derive(Parser)]
#[command(
    name = "crosspost-tracker",
    about = "Which stories appear both on Lobsters and on Hacker News, and who was first?"
)]
enum Cli {
    /// Analyze top/best stories from Hacker News and Lobsters
    Top,
    /// Analyze newest stories instead of best
    New,
    /// Run the timezone self-check against fixed payloads (no network)
    Test,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = Config::load_or_default(Path::new("config.toml"))?;

    println!("Which stories appear both on Lobsters and on Hacker News, who was first?\n");
    println!(
        "Current date/time: {}\n",
        Local::now().format("%Y-%m-%dT%H:%M:%S %z")
    );

    match cli {
        Cli::Top => {
            let lobsters = Source::Lobsters(LobstersSource::top(&cfg.lobsters));
            let hn = Source::HackerNews(HackerNewsSource::best(&cfg.hackernews));
            run_pipeline(&cfg, lobsters, hn).await
        }
        Cli::New => {
            let lobsters = Source::Lobsters(LobstersSource::newest(&cfg.lobsters));
            let hn = Source::HackerNews(HackerNewsSource::newest(&cfg.hackernews));
            run_pipeline(&cfg, lobsters, hn).await
        }
        Cli::Test => run_timezone_check(&cfg),
    }
}

/// Two sequential batches (Hacker News first, then Lobsters), each internally
/// fully parallel. Any fetch failure aborts the run; no partial reports.
async fn run_pipeline(cfg: &Config, lobsters: Source, hn: Source) -> anyhow::Result<()> {
    let fetcher = Fetcher::new(&cfg.http)?;

    println!(
        "Fetching Hacker News stories ({} posts max) (https://github.com/HackerNews/API)",
        cfg.hackernews.max_stories
    );
    let hn_posts = hn.fetch_posts(&fetcher).await?;

    println!("Fetching the first {} Lobsters pages\n", cfg.lobsters.pages);
    let lobsters_posts = lobsters.fetch_posts(&fetcher).await?;

    let analysis = analyze(&lobsters_posts, &hn_posts);
    print!("{}", render(&analysis));
    Ok(())
}

// Known cross-post from December 2020, submitted to Lobsters at
// 2020-12-27T06:58:40-06:00 and to Hacker News 5 minutes 36 seconds later.
const LOBSTERS_TEST_PAGE: &str = r#"[{"short_id":"4pivy1","short_id_url":"https://lobste.rs/s/4pivy1","created_at":"2020-12-27T06:58:40.000-06:00","title":"Bash HTTP monitoring dashboard","url":"https://raymii.org/s/software/Bash_HTTP_Monitoring_Dashboard.html","score":30,"flags":0,"comment_count":2,"description":"","comments_url":"https://lobste.rs/s/4pivy1/bash_http_monitoring_dashboard","submitter_user":{"username":"raymii","created_at":"2013-11-20T11:58:43.000-06:00","is_admin":false,"about":"https://raymii.org","is_moderator":false,"karma":7351,"avatar_url":"/avatars/raymii-100.png","invited_by_user":"journeysquid"},"tags":["linux","web"]}]"#;

const HN_TEST_ITEMS: &str = r#"[{"by":"todsacerdoti","descendants":26,"id":25550732,"kids":[25551346,25551828,25552963,25556255,25552339,25559309,25554106,25553520,25552809,25557037],"score":154,"time":1609074256,"title":"Bash HTTP Monitoring Dashboard","type":"story","url":"https://raymii.org/s/software/Bash_HTTP_Monitoring_Dashboard.html"}]"#;

/// Pushes two fixed payloads through parse + analyze instead of the network.
/// If the local timezone setup is sane, the reported gap is exactly
/// 5 minutes and 36 seconds, with Lobsters first.
fn run_timezone_check(cfg: &Config) -> anyhow::Result<()> {
    println!("--- START TEST ---");
    println!(
        "Date/time/timezones are hard. Below is a fixed post comparison; check that \
         your timezone information is correct. The difference between Lobsters and \
         Hacker News should be 5 minutes and 36 seconds, Lobsters first.\n"
    );

    let lobsters_page: Value = serde_json::from_str(LOBSTERS_TEST_PAGE)?;
    let hn_items: Vec<Value> = serde_json::from_str(HN_TEST_ITEMS)?;

    let lobsters_posts = LobstersSource::top(&cfg.lobsters).parse(&[lobsters_page]);
    let hn_posts = HackerNewsSource::best(&cfg.hackernews).parse(&hn_items);

    let analysis = analyze(&lobsters_posts, &hn_posts);
    print!("{}", render(&analysis));

    println!("--- END TEST ---");
    Ok(())
}
