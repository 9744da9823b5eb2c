use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tweet_digest_core::contract::{max_tweet_id, newest_tweet, Tweet};
use tweet_digest_core::digest::{render_digest, DIGEST_SUBJECT};
use tweet_digest_core::storage_keys::{current_bucket_key, previous_bucket_key};

use crate::adapters::notify::DigestNotifier;
use crate::adapters::object_store::{StoredBucket, TweetStore};
use crate::adapters::timeline::TimelineSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub bucket: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunOutcome {
    pub status: String,
    pub bucket_key: String,
    pub rolled_over: bool,
    pub digest_sent: bool,
    pub tweets_digested: usize,
    pub new_tweets: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunError {
    pub message: String,
}

impl RunError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Reconciled state of the current window after reading the store: the
/// high-water mark to fetch from and the tweets already persisted under
/// today's key.
struct WindowState {
    since_id: u64,
    carry: Vec<Tweet>,
    rolled_over: bool,
    tweets_digested: usize,
}

/// One scheduled invocation: reconcile the current window from the store,
/// roll over (digest + single-tweet carry) when the window is new, fetch
/// tweets past the high-water mark, and persist the merged bucket.
pub fn handle_scheduled_run(
    now: DateTime<Utc>,
    config: &RunConfig,
    store: &impl TweetStore,
    timeline: &impl TimelineSource,
    notifier: &impl DigestNotifier,
) -> Result<RunOutcome, RunError> {
    let today_key = current_bucket_key(&config.prefix, now);
    log_run_info(
        "run_started",
        json!({
            "bucket": config.bucket,
            "bucket_key": today_key,
        }),
    );

    match run_window(now, config, &today_key, store, timeline, notifier) {
        Ok(outcome) => {
            log_run_info(
                "run_completed",
                json!({
                    "bucket_key": outcome.bucket_key,
                    "rolled_over": outcome.rolled_over,
                    "digest_sent": outcome.digest_sent,
                    "new_tweets": outcome.new_tweets,
                }),
            );
            Ok(outcome)
        }
        Err(error) => {
            log_run_error(
                "run_failed",
                json!({
                    "bucket_key": today_key,
                    "error": error.message,
                }),
            );
            Err(error)
        }
    }
}

fn run_window(
    now: DateTime<Utc>,
    config: &RunConfig,
    today_key: &str,
    store: &impl TweetStore,
    timeline: &impl TimelineSource,
    notifier: &impl DigestNotifier,
) -> Result<RunOutcome, RunError> {
    let state = match store
        .read_bucket(today_key)
        .map_err(|error| RunError::new(format!("Failed to read bucket {today_key}: {error}")))?
    {
        StoredBucket::Found(stored) => {
            log_run_info(
                "bucket_loaded",
                json!({
                    "bucket_key": today_key,
                    "stored_tweets": stored.len(),
                }),
            );
            WindowState {
                since_id: max_tweet_id(&stored),
                carry: stored,
                rolled_over: false,
                tweets_digested: 0,
            }
        }
        StoredBucket::NotFound => roll_over_window(now, config, today_key, store, notifier)?,
    };

    let new_tweets = timeline
        .fetch_since(state.since_id)
        .map_err(|error| RunError::new(format!("Failed to fetch home timeline: {error}")))?;
    log_run_info(
        "tweets_fetched",
        json!({
            "since_id": state.since_id,
            "new_tweets": new_tweets.len(),
        }),
    );

    let outcome = RunOutcome {
        status: "ok".to_string(),
        bucket_key: today_key.to_string(),
        rolled_over: state.rolled_over,
        digest_sent: state.tweets_digested > 0,
        tweets_digested: state.tweets_digested,
        new_tweets: new_tweets.len(),
    };

    // The bucket already reflects correct state from the read or the
    // rollover write; nothing new means nothing to persist.
    if new_tweets.is_empty() {
        return Ok(outcome);
    }

    let mut merged = new_tweets;
    merged.extend(state.carry);
    store
        .write_bucket(today_key, &merged)
        .map_err(|error| RunError::new(format!("Failed to persist bucket {today_key}: {error}")))?;
    log_run_info(
        "bucket_written",
        json!({
            "bucket_key": today_key,
            "stored_tweets": merged.len(),
        }),
    );

    Ok(outcome)
}

/// First run in a new window. Delivers the prior window's digest before
/// anything is written, so a failed delivery leaves the prior bucket
/// untouched and the next run retries the whole rollover. The write of
/// `carry` (at most the single newest prior tweet) materializes the window
/// so re-runs take the found branch.
fn roll_over_window(
    now: DateTime<Utc>,
    config: &RunConfig,
    today_key: &str,
    store: &impl TweetStore,
    notifier: &impl DigestNotifier,
) -> Result<WindowState, RunError> {
    let yesterday_key = previous_bucket_key(&config.prefix, now);
    log_run_info(
        "window_rollover",
        json!({
            "bucket_key": today_key,
            "previous_key": yesterday_key,
        }),
    );

    let prior = match store.read_bucket(&yesterday_key).map_err(|error| {
        RunError::new(format!("Failed to read bucket {yesterday_key}: {error}"))
    })? {
        StoredBucket::Found(tweets) => tweets,
        StoredBucket::NotFound => Vec::new(),
    };

    let (since_id, carry, tweets_digested) = match newest_tweet(&prior) {
        None => (0, Vec::new(), 0),
        Some(last) => {
            let document = render_digest(&prior);
            notifier
                .deliver(DIGEST_SUBJECT, &document)
                .map_err(|error| RunError::new(format!("Failed to deliver digest: {error}")))?;
            log_run_info(
                "digest_delivered",
                json!({
                    "previous_key": yesterday_key,
                    "tweets_digested": prior.len(),
                }),
            );
            (last.id, vec![last.clone()], prior.len())
        }
    };

    store
        .write_bucket(today_key, &carry)
        .map_err(|error| RunError::new(format!("Failed to persist bucket {today_key}: {error}")))?;
    log_run_info(
        "window_initialized",
        json!({
            "bucket_key": today_key,
            "carried_tweets": carry.len(),
        }),
    );

    Ok(WindowState {
        since_id,
        carry,
        rolled_over: true,
        tweets_digested,
    })
}

fn log_run_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "digest_run",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_run_error(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "digest_run",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
