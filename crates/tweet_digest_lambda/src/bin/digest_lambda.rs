use aws_sdk_s3::primitives::ByteStream;
use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tweet_digest_core::contract::{decode_bucket, encode_bucket, Tweet};
use tweet_digest_lambda::adapters::notify::DigestNotifier;
use tweet_digest_lambda::adapters::oauth::OAuth1Credentials;
use tweet_digest_lambda::adapters::object_store::{StoredBucket, TweetStore};
use tweet_digest_lambda::adapters::timeline::HomeTimelineClient;
use tweet_digest_lambda::config::load_config;
use tweet_digest_lambda::handlers::run::{handle_scheduled_run, RunConfig, RunOutcome};

// SES is only available in a handful of regions.
const SES_REGION: &str = "us-west-2";

struct S3TweetStore {
    bucket: String,
    s3_client: aws_sdk_s3::Client,
}

impl TweetStore for S3TweetStore {
    fn read_bucket(&self, key: &str) -> Result<StoredBucket, String> {
        let bucket = self.bucket.clone();
        let object_key = key.to_string();
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                match client
                    .get_object()
                    .bucket(bucket)
                    .key(object_key)
                    .send()
                    .await
                {
                    Ok(output) => {
                        let body = output.body.collect().await.map_err(|error| {
                            format!("failed to read object body from s3: {error}")
                        })?;
                        decode_bucket(&body.into_bytes()).map(StoredBucket::Found)
                    }
                    Err(error) => {
                        let service_error = error.into_service_error();
                        if service_error.is_no_such_key() {
                            Ok(StoredBucket::NotFound)
                        } else {
                            Err(format!("failed to read object from s3: {service_error}"))
                        }
                    }
                }
            })
        })
    }

    fn write_bucket(&self, key: &str, tweets: &[Tweet]) -> Result<(), String> {
        let bucket = self.bucket.clone();
        let object_key = key.to_string();
        let body = encode_bucket(tweets);
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_object()
                    .bucket(bucket)
                    .key(object_key)
                    .body(ByteStream::from(body))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to write object to s3: {error}"))
            })
        })
    }
}

struct SesDigestNotifier {
    ses_client: aws_sdk_ses::Client,
    email: String,
}

impl DigestNotifier for SesDigestNotifier {
    fn deliver(&self, subject: &str, html_body: &str) -> Result<(), String> {
        use aws_sdk_ses::types::{Body, Content, Destination, Message};

        let client = self.ses_client.clone();
        let email = self.email.clone();
        let subject = subject.to_string();
        let html_body = html_body.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let subject_content = Content::builder()
                    .data(subject)
                    .charset("UTF-8")
                    .build()
                    .map_err(|error| format!("failed to build email subject: {error}"))?;
                let body_content = Content::builder()
                    .data(html_body)
                    .charset("UTF-8")
                    .build()
                    .map_err(|error| format!("failed to build email body: {error}"))?;
                let message = Message::builder()
                    .subject(subject_content)
                    .body(Body::builder().html(body_content).build())
                    .build();
                let destination = Destination::builder().to_addresses(email.clone()).build();

                client
                    .send_email()
                    .source(email)
                    .destination(destination)
                    .message(message)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to send digest email via ses: {error}"))
            })
        })
    }
}

async fn handle_request(_event: LambdaEvent<Value>) -> Result<RunOutcome, Error> {
    let config = load_config().map_err(Error::from)?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

    let store = S3TweetStore {
        bucket: config.bucket.clone(),
        s3_client: aws_sdk_s3::Client::new(&aws_config),
    };

    let ses_config = aws_sdk_ses::config::Builder::from(&aws_config)
        .region(aws_sdk_ses::config::Region::new(SES_REGION))
        .build();
    let notifier = SesDigestNotifier {
        ses_client: aws_sdk_ses::Client::from_conf(ses_config),
        email: config.email.clone(),
    };

    let timeline = HomeTimelineClient::new(OAuth1Credentials {
        consumer_key: config.consumer_api_key.clone(),
        consumer_secret: config.consumer_api_secret_key.clone(),
        access_token: config.access_token.clone(),
        access_token_secret: config.access_token_secret.clone(),
    });

    let run_config = RunConfig {
        bucket: config.bucket,
        prefix: config.prefix,
    };
    handle_scheduled_run(Utc::now(), &run_config, &store, &timeline, &notifier)
        .map_err(|error| Error::from(error.message))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
