use serde::{Deserialize, Serialize};

/// Upper bound on tweets requested per timeline fetch.
pub const TIMELINE_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TweetAuthor {
    pub name: String,
    pub screen_name: String,
    pub profile_image_url_https: String,
}

/// A single timeline item as the feed reports it. Retweets wrap the
/// original tweet exactly one level deep; the feed never nests further.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tweet {
    pub id: u64,
    pub user: TweetAuthor,
    pub full_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retweeted_status: Option<Box<Tweet>>,
}

/// Highest tweet id in a stored bucket, 0 when the bucket is empty. Tweet
/// ids are assigned monotonically, so this is the window's high-water mark.
pub fn max_tweet_id(tweets: &[Tweet]) -> u64 {
    tweets.iter().map(|tweet| tweet.id).max().unwrap_or(0)
}

pub fn newest_tweet(tweets: &[Tweet]) -> Option<&Tweet> {
    tweets.iter().max_by_key(|tweet| tweet.id)
}

pub fn encode_bucket(tweets: &[Tweet]) -> Vec<u8> {
    serde_json::to_vec(tweets).expect("serialization of tweet contract values should not fail")
}

pub fn decode_bucket(body: &[u8]) -> Result<Vec<Tweet>, String> {
    serde_json::from_slice(body).map_err(|error| format!("invalid stored tweet bucket: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tweet(id: u64) -> Tweet {
        Tweet {
            id,
            user: TweetAuthor {
                name: "Ada Lovelace".to_string(),
                screen_name: "ada".to_string(),
                profile_image_url_https: "https://pbs.twimg.com/ada_normal.jpg".to_string(),
            },
            full_text: format!("tweet {id}"),
            retweeted_status: None,
        }
    }

    #[test]
    fn max_tweet_id_is_zero_for_empty_bucket() {
        assert_eq!(max_tweet_id(&[]), 0);
    }

    #[test]
    fn max_tweet_id_ignores_storage_order() {
        let tweets = vec![tweet(5), tweet(7), tweet(3)];
        assert_eq!(max_tweet_id(&tweets), 7);
        assert_eq!(newest_tweet(&tweets).map(|t| t.id), Some(7));
    }

    #[test]
    fn bucket_round_trips_including_nested_retweet() {
        let mut retweet = tweet(9);
        retweet.retweeted_status = Some(Box::new(tweet(4)));
        let tweets = vec![retweet, tweet(8)];

        let decoded = decode_bucket(&encode_bucket(&tweets)).expect("bucket should decode");
        assert_eq!(decoded, tweets);
    }

    #[test]
    fn empty_bucket_round_trips_as_empty_array() {
        let body = encode_bucket(&[]);
        assert_eq!(body, b"[]");
        assert_eq!(decode_bucket(&body).expect("bucket should decode"), vec![]);
    }

    #[test]
    fn plain_tweet_omits_retweeted_status_field() {
        let body = encode_bucket(&[tweet(1)]);
        let text = String::from_utf8(body).expect("bucket body should be utf-8");
        assert!(!text.contains("retweeted_status"));
    }

    #[test]
    fn rejects_malformed_bucket_body() {
        let error = decode_bucket(b"{not json").expect_err("malformed body should fail");
        assert!(error.contains("invalid stored tweet bucket"));
    }
}
