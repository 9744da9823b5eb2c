use tweet_digest_core::contract::{Tweet, TIMELINE_PAGE_SIZE};

use crate::adapters::oauth::{authorization_header, OAuth1Credentials};

pub const HOME_TIMELINE_URL: &str = "https://api.twitter.com/1.1/statuses/home_timeline.json";

pub trait TimelineSource {
    /// Tweets strictly newer than `since_id`, capped at one page. Order is
    /// whatever the feed returns; an empty page is not an error.
    fn fetch_since(&self, since_id: u64) -> Result<Vec<Tweet>, String>;
}

pub struct HomeTimelineClient {
    http_client: reqwest::Client,
    credentials: OAuth1Credentials,
}

impl HomeTimelineClient {
    pub fn new(credentials: OAuth1Credentials) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            credentials,
        }
    }
}

impl TimelineSource for HomeTimelineClient {
    fn fetch_since(&self, since_id: u64) -> Result<Vec<Tweet>, String> {
        let mut query = vec![
            ("count".to_string(), TIMELINE_PAGE_SIZE.to_string()),
            ("tweet_mode".to_string(), "extended".to_string()),
        ];
        // A zero mark means no prior state; the feed rejects since_id=0.
        if since_id > 0 {
            query.push(("since_id".to_string(), since_id.to_string()));
        }

        let authorization =
            authorization_header(&self.credentials, "GET", HOME_TIMELINE_URL, &query);
        let client = self.http_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let response = client
                    .get(HOME_TIMELINE_URL)
                    .query(&query)
                    .header("Authorization", authorization)
                    .send()
                    .await
                    .map_err(|error| format!("failed to request home timeline: {error}"))?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(format!("home timeline request returned {status}: {body}"));
                }

                response
                    .json::<Vec<Tweet>>()
                    .await
                    .map_err(|error| format!("failed to decode home timeline response: {error}"))
            })
        })
    }
}
