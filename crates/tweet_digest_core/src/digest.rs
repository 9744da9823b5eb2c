use crate::contract::Tweet;

pub const DIGEST_SUBJECT: &str = "Tweets from the past 8h";

const BLOCK_FONT: &str = "15px system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, \
                          Ubuntu, 'Helvetica Neue', sans-serif";

const RETWEET_ICON_PATH: &str = "M23.615 15.477c-.47-.47-1.23-.47-1.697 0l-1.326 1.326V7.4c0-2.178-1.772-3.95-3.95-3.95h-5.2c-.663 0-1.2.538-1.2 1.2s.537 1.2 1.2 1.2h5.2c.854 0 1.55.695 1.55 1.55v9.403l-1.326-1.326c-.47-.47-1.23-.47-1.697 0s-.47 1.23 0 1.697l3.374 3.375c.234.233.542.35.85.35s.613-.116.848-.35l3.375-3.376c.467-.47.467-1.23-.002-1.697zM12.562 18.5h-5.2c-.854 0-1.55-.695-1.55-1.55V7.547l1.326 1.326c.234.235.542.352.848.352s.614-.117.85-.352c.468-.47.468-1.23 0-1.697L5.46 3.8c-.47-.468-1.23-.468-1.697 0L.388 7.177c-.47.47-.47 1.23 0 1.697s1.23.47 1.697 0L3.41 7.547v9.403c0 2.178 1.773 3.95 3.95 3.95h5.2c.664 0 1.2-.538 1.2-1.2s-.535-1.2-1.198-1.2z";

/// Renders a window's tweets into a single self-contained HTML document,
/// oldest first. Ids define the ordering, so the document reads
/// chronologically even if the stored bucket is not strictly newest-first.
pub fn render_digest(tweets: &[Tweet]) -> String {
    let mut ordered: Vec<&Tweet> = tweets.iter().collect();
    ordered.sort_by_key(|tweet| tweet.id);

    let mut document = String::new();
    for tweet in ordered {
        document.push_str(&render_tweet(tweet));
    }
    document
}

fn render_tweet(tweet: &Tweet) -> String {
    let mut block = format!("\n<div style=\"margin-bottom: 10px; font: {BLOCK_FONT};\">\n");

    let body = match &tweet.retweeted_status {
        Some(original) => {
            block.push_str(&render_retweet_header(tweet));
            original
        }
        None => tweet,
    };

    let author_url = profile_url(&body.user.screen_name);
    let tweet_url = format!(
        "https://twitter.com/{}/status/{}",
        body.user.screen_name, body.id
    );
    block.push_str(&format!(
        r#"  <div style="display: flex;">
    <a href="{author_url}" style="border-radius: 9999px; flex-shrink: 0; margin-right: 5px; max-height: 100px; min-width: 100px; overflow: hidden;">
      <img src="{avatar}" style="height: 100px; width: 100px;">
    </a>
    <div>
      <div>
        <a href="{author_url}" style="color: rgb(45, 51, 55); text-decoration: none;">
          <span style="font-weight: bold;">{name}</span>
          <span style="color: rgb(136, 153, 166);">@{screen_name}</span>
        </a>
      </div>
      <div style="line-height: 1.3125; width: 50%;">
        <a href="{tweet_url}" style="color: black; text-decoration: none;">{text}</a>
      </div>
    </div>
  </div>
</div>
"#,
        avatar = avatar_url(&body.user.profile_image_url_https),
        name = body.user.name,
        screen_name = body.user.screen_name,
        text = body.full_text,
    ));

    block
}

fn render_retweet_header(resharer: &Tweet) -> String {
    format!(
        r#"  <div style="display: flex;">
    <svg viewBox="0 0 24 24" style="color: rgb(45, 51, 55); fill: currentcolor; width: 13px;">
      <g><path d="{RETWEET_ICON_PATH}"></path></g>
    </svg>
    <a href="{url}" style="color: rgb(136, 153, 166); font-size: 14px; margin-left: 105px; text-decoration: none;">{name} Retweeted</a>
  </div>
"#,
        url = profile_url(&resharer.user.screen_name),
        name = resharer.user.name,
    )
}

fn profile_url(screen_name: &str) -> String {
    format!("https://twitter.com/{screen_name}")
}

// The feed hands out thumbnail avatars; swap in the larger variant.
fn avatar_url(profile_image_url: &str) -> String {
    profile_image_url.replacen("_normal.", "_reasonably_small.", 1)
}

#[cfg(test)]
mod tests {
    use crate::contract::TweetAuthor;

    use super::*;

    fn tweet(id: u64, screen_name: &str, text: &str) -> Tweet {
        Tweet {
            id,
            user: TweetAuthor {
                name: format!("User {screen_name}"),
                screen_name: screen_name.to_string(),
                profile_image_url_https: format!(
                    "https://pbs.twimg.com/{screen_name}_normal.jpg"
                ),
            },
            full_text: text.to_string(),
            retweeted_status: None,
        }
    }

    #[test]
    fn renders_oldest_tweet_first() {
        let stored = vec![
            tweet(5, "b", "second message"),
            tweet(7, "c", "third message"),
            tweet(3, "a", "first message"),
        ];

        let document = render_digest(&stored);
        let first = document.find("first message").expect("first message rendered");
        let second = document.find("second message").expect("second message rendered");
        let third = document.find("third message").expect("third message rendered");
        assert!(first < second && second < third);
    }

    #[test]
    fn links_author_profile_and_tweet_permalink() {
        let document = render_digest(&[tweet(42, "ada", "hello")]);
        assert!(document.contains("https://twitter.com/ada\""));
        assert!(document.contains("https://twitter.com/ada/status/42"));
        assert!(document.contains("@ada"));
    }

    #[test]
    fn upsizes_avatar_thumbnails() {
        let document = render_digest(&[tweet(1, "ada", "hello")]);
        assert!(document.contains("https://pbs.twimg.com/ada_reasonably_small.jpg"));
        assert!(!document.contains("ada_normal.jpg"));
    }

    #[test]
    fn retweet_renders_indicator_above_original_block() {
        let mut reshare = tweet(10, "resharer", "ignored");
        reshare.retweeted_status = Some(Box::new(tweet(6, "original", "the original text")));

        let document = render_digest(&[reshare]);
        let indicator = document
            .find("User resharer Retweeted")
            .expect("retweet indicator rendered");
        let original = document
            .find("the original text")
            .expect("original body rendered");
        assert!(indicator < original);
        // Body block is attributed to the original author, not the resharer.
        assert!(document.contains("https://twitter.com/original/status/6"));
        assert!(!document.contains("status/10"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let stored = vec![tweet(2, "b", "later"), tweet(1, "a", "earlier")];
        assert_eq!(render_digest(&stored), render_digest(&stored));
    }
}
