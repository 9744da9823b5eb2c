use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuth1Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

/// OAuth 1.0a `Authorization` header value (HMAC-SHA1) for a request with
/// the given method, base URL, and query parameters.
pub fn authorization_header(
    credentials: &OAuth1Credentials,
    method: &str,
    url: &str,
    query: &[(String, String)],
) -> String {
    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);

    authorization_header_at(credentials, method, url, query, &nonce, timestamp)
}

fn authorization_header_at(
    credentials: &OAuth1Credentials,
    method: &str,
    url: &str,
    query: &[(String, String)],
    nonce: &str,
    timestamp: u64,
) -> String {
    let mut oauth_params = vec![
        (
            "oauth_consumer_key".to_string(),
            credentials.consumer_key.clone(),
        ),
        ("oauth_nonce".to_string(), nonce.to_string()),
        (
            "oauth_signature_method".to_string(),
            "HMAC-SHA1".to_string(),
        ),
        ("oauth_timestamp".to_string(), timestamp.to_string()),
        ("oauth_token".to_string(), credentials.access_token.clone()),
        ("oauth_version".to_string(), "1.0".to_string()),
    ];

    let signature = sign(credentials, method, url, query, &oauth_params);
    oauth_params.push(("oauth_signature".to_string(), signature));
    oauth_params.sort();

    let fields = oauth_params
        .iter()
        .map(|(name, value)| format!("{}=\"{}\"", percent_encode(name), percent_encode(value)))
        .collect::<Vec<_>>()
        .join(", ");

    format!("OAuth {fields}")
}

/// Signature over the normalized parameter set: all query and oauth
/// parameters percent-encoded, sorted, joined into the base string, and
/// HMAC-SHA1ed with the `<consumer_secret>&<token_secret>` key.
fn sign(
    credentials: &OAuth1Credentials,
    method: &str,
    url: &str,
    query: &[(String, String)],
    oauth_params: &[(String, String)],
) -> String {
    let mut pairs: Vec<(String, String)> = query
        .iter()
        .chain(oauth_params.iter())
        .map(|(name, value)| (percent_encode(name), percent_encode(value)))
        .collect();
    pairs.sort();

    let parameter_string = pairs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&parameter_string),
    );
    let signing_key = format!(
        "{}&{}",
        percent_encode(&credentials.consumer_secret),
        percent_encode(&credentials.access_token_secret),
    );

    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .expect("hmac accepts keys of any length");
    mac.update(base_string.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

// RFC 3986 encoding: everything except unreserved characters, as OAuth
// signing requires.
fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
