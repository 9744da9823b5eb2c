use tweet_digest_core::contract::Tweet;

/// Read result for a window bucket. `NotFound` signals the first run of a
/// window and drives the rollover path; it is never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredBucket {
    Found(Vec<Tweet>),
    NotFound,
}

pub trait TweetStore {
    fn read_bucket(&self, key: &str) -> Result<StoredBucket, String>;

    /// Full overwrite. An empty slice persists an empty bucket, which later
    /// reads report as `Found` rather than `NotFound`.
    fn write_bucket(&self, key: &str, tweets: &[Tweet]) -> Result<(), String>;
}
