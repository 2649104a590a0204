use std::fmt::Write;

use crate::correlate::match_pairs;
use crate::post::Post;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Lobsters,
    HackerNews,
}

impl Side {
    pub fn name(self) -> &'static str {
        match self {
            Side::Lobsters => "Lobsters",
            Side::HackerNews => "HackerNews",
        }
    }

    fn other(self) -> Side {
        match self {
            Side::Lobsters => Side::HackerNews,
            Side::HackerNews => Side::Lobsters,
        }
    }
}

/// One matched story with its derived timing/engagement facts.
#[derive(Debug)]
pub struct PairReport {
    pub title: String,
    pub url: String,
    pub first_side: Side,
    /// The earlier submission; `second` is the later one.
    pub first: Post,
    pub second: Post,
    pub gap_secs: i64,
    pub within_hour: bool,
    /// `None` means "nowhere": neither side collected a single vote.
    pub highest_votes: Option<Side>,
    pub most_comments: Option<Side>,
    pub same_submitter: bool,
}

#[derive(Debug)]
pub struct Analysis {
    pub lobsters_total: usize,
    pub hn_total: usize,
    pub pairs: Vec<PairReport>,
    pub first_on_lobsters: usize,
    pub first_on_hn: usize,
    /// Aggregates are `None` when there are no matched pairs, so nothing
    /// ever divides by zero.
    pub avg_gap_secs: Option<i64>,
    pub avg_lobsters_votes: Option<u64>,
    pub avg_hn_votes: Option<u64>,
    pub avg_lobsters_comments: Option<u64>,
    pub avg_hn_comments: Option<u64>,
}

/// Correlates the two collections and derives the per-pair facts and
/// aggregate statistics the report is made of.
pub fn analyze(lobsters_posts: &[Post], hn_posts: &[Post]) -> Analysis {
    let matched = match_pairs(lobsters_posts, hn_posts);

    let mut pairs = Vec::with_capacity(matched.len());
    let mut first_on_lobsters = 0;
    let mut first_on_hn = 0;
    let mut gap_sum: i64 = 0;
    let mut lobsters_votes: u64 = 0;
    let mut hn_votes: u64 = 0;
    let mut lobsters_comments: u64 = 0;
    let mut hn_comments: u64 = 0;

    for (lobsters_post, hn_post) in matched {
        lobsters_votes += u64::from(lobsters_post.votes);
        hn_votes += u64::from(hn_post.votes);
        lobsters_comments += u64::from(lobsters_post.comment_count);
        hn_comments += u64::from(hn_post.comment_count);

        // A timestamp tie counts as first on Lobsters.
        let (first_side, first, second) = if hn_post.submit_timestamp < lobsters_post.submit_timestamp
        {
            first_on_hn += 1;
            (Side::HackerNews, hn_post, lobsters_post)
        } else {
            first_on_lobsters += 1;
            (Side::Lobsters, lobsters_post, hn_post)
        };
        let second_side = first_side.other();

        let gap_secs = (second.submit_timestamp - first.submit_timestamp).num_seconds();
        gap_sum += gap_secs;

        let highest_votes = if first.votes + second.votes == 0 {
            None
        } else if first.votes > second.votes {
            Some(first_side)
        } else {
            Some(second_side)
        };
        let most_comments = if first.comment_count + second.comment_count == 0 {
            None
        } else if first.comment_count > second.comment_count {
            Some(first_side)
        } else {
            Some(second_side)
        };

        pairs.push(PairReport {
            title: first.title.clone(),
            url: first.original_url.clone(),
            first_side,
            same_submitter: first.submitter == second.submitter,
            within_hour: gap_secs < 3600,
            gap_secs,
            highest_votes,
            most_comments,
            first,
            second,
        });
    }

    let count = pairs.len() as u64;
    let average = |sum: u64| (count > 0).then(|| sum / count);

    Analysis {
        lobsters_total: lobsters_posts.len(),
        hn_total: hn_posts.len(),
        first_on_lobsters,
        first_on_hn,
        avg_gap_secs: (count > 0).then(|| gap_sum / count as i64),
        avg_lobsters_votes: average(lobsters_votes),
        avg_hn_votes: average(hn_votes),
        avg_lobsters_comments: average(lobsters_comments),
        avg_hn_comments: average(hn_comments),
        pairs,
    }
}

/// Renders non-negative seconds as "N days, N hours, N minutes, N seconds",
/// omitting zero-valued units. Zero renders as "0 seconds".
pub fn format_duration(total_secs: i64) -> String {
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days} days"));
    }
    if hours > 0 {
        parts.push(format!("{hours} hours"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes} minutes"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{seconds} seconds"));
    }
    parts.join(", ")
}

/// Turns an `Analysis` into the human-readable report. The prose is
/// markdown-flavored plain text, as in the per-pair narrative blocks.
pub fn render(analysis: &Analysis) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Number of posts from Lobsters    : {}",
        analysis.lobsters_total
    );
    let _ = writeln!(
        out,
        "Number of posts from Hacker News : {}",
        analysis.hn_total
    );
    let _ = writeln!(out, "\nMatches ({}):\n", analysis.pairs.len());

    for pair in &analysis.pairs {
        let second_side = pair.first_side.other();

        let _ = writeln!(out, "# {}  \nURL: {}  ", pair.title, pair.url);
        let _ = writeln!(
            out,
            "First appeared on **{}** with {} votes and {} comments, submitted by {} ({}; {} ).  ",
            pair.first_side.name(),
            pair.first.votes,
            pair.first.comment_count,
            pair.first.submitter,
            pair.first.local_time(),
            pair.first.comment_url,
        );
        if pair.within_hour {
            let _ = writeln!(
                out,
                "**Within the hour this was also posted to {}!**",
                second_side.name()
            );
        }
        let _ = writeln!(
            out,
            "After {} it was submitted to **{}** by {} with {} votes and {} comments ({}; {} ).  ",
            format_duration(pair.gap_secs),
            second_side.name(),
            pair.second.submitter,
            pair.second.votes,
            pair.second.comment_count,
            pair.second.local_time(),
            pair.second.comment_url,
        );
        let _ = writeln!(
            out,
            "The highest score was reached on {} and the most comments were on {}.  ",
            pair.highest_votes.map_or("nowhere", Side::name),
            pair.most_comments.map_or("nowhere", Side::name),
        );
        if pair.same_submitter {
            let _ = writeln!(out, "**The same username submitted the post to both sites**.  ");
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "{} posts appeared first on Lobsters and {} posts appeared first on HackerNews.",
        analysis.first_on_lobsters, analysis.first_on_hn
    );

    match analysis.avg_gap_secs {
        Some(avg) => {
            let _ = writeln!(
                out,
                "Average time for a cross-post: {}.",
                format_duration(avg)
            );
        }
        None => {
            let _ = writeln!(out, "No matches, so there are no averages to report.");
        }
    }

    if let (Some(hn_c), Some(lob_c)) = (analysis.avg_hn_comments, analysis.avg_lobsters_comments) {
        let _ = writeln!(out, "Average comments on HN: {hn_c}, Lobsters: {lob_c}.");
    }
    if let (Some(hn_v), Some(lob_v)) = (analysis.avg_hn_votes, analysis.avg_lobsters_votes) {
        let _ = writeln!(out, "Average score on HN: {hn_v}, Lobsters: {lob_v}.");
    }

    out
}
