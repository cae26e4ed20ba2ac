//! Network implementation of [`AuthorityClient`]
//!
//! Every request waits on a shared token-bucket rate limiter first, so the
//! two authorities never see bursts even if a caller forgets to pace itself.
//! Each call is attempted exactly once; there is no retry.

use super::{club_listing, membership, AuthorityClient};
use crate::error::AuthorityError;
use crate::types::{ClubRegistrationCandidate, PlayerRecord};
use async_trait::async_trait;
use flate2::read::{GzDecoder, ZlibDecoder};
use governor::{Quota, RateLimiter};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use roster_common::config::TomlConfig;
use std::io::Read;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::debug;

/// Encodings `decode_body` understands; brotli is not advertised
const ACCEPT_ENCODING: &str = "gzip, deflate";

pub struct HttpAuthorityClient {
    client: Client,
    membership_url: String,
    club_url: String,
    /// Browser-like headers the Club Authority's bot filter expects
    club_headers: HeaderMap,
    rate_limiter: RateLimiter<
        governor::state::direct::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl HttpAuthorityClient {
    pub fn new(config: &TomlConfig) -> roster_common::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()
            .map_err(|e| roster_common::Error::Config(format!("HTTP client: {e}")))?;

        let user_agent = HeaderValue::from_str(&config.http.user_agent).map_err(|e| {
            roster_common::Error::Config(format!("http.user_agent is not a valid header: {e}"))
        })?;

        let mut club_headers = HeaderMap::new();
        club_headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        club_headers.insert(header::USER_AGENT, user_agent);
        club_headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        club_headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static(ACCEPT_ENCODING));

        let per_second = NonZeroU32::new(config.http.requests_per_second).ok_or_else(|| {
            roster_common::Error::Config("http.requests_per_second must be at least 1".to_string())
        })?;

        Ok(Self {
            client,
            membership_url: config.membership.base_url.clone(),
            club_url: config.club.base_url.clone(),
            club_headers,
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    /// Membership Authority player lookup
    pub(crate) fn membership_request(&self, id: &str) -> RequestBuilder {
        self.client
            .get(&self.membership_url)
            .query(&[("name", id), ("state", "0"), ("city", "0")])
    }

    /// Club Authority listing search, first page only
    pub(crate) fn club_request(&self, id: &str) -> RequestBuilder {
        self.client
            .get(&self.club_url)
            .query(&[("page", "1"), ("query", id)])
            .headers(self.club_headers.clone())
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, AuthorityError> {
        self.rate_limiter.until_ready().await;

        let response = request
            .send()
            .await
            .map_err(|e| AuthorityError::Network(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthorityError::Network(format!(
                "GET {} returned {status}",
                response.url()
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl AuthorityClient for HttpAuthorityClient {
    async fn lookup_player(&self, id: &str) -> Result<PlayerRecord, AuthorityError> {
        debug!(id = %id, "Querying Membership Authority");

        let response = self.send(self.membership_request(id)).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| AuthorityError::Network(format!("reading membership body: {e}")))?;

        membership::decode_player_response(id, &body)
    }

    async fn scrape_club_listing(
        &self,
        id: &str,
    ) -> Result<Vec<ClubRegistrationCandidate>, AuthorityError> {
        debug!(id = %id, "Querying Club Authority");

        let response = self.send(self.club_request(id)).await?;

        let encoding = response
            .headers()
            .get(header::CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_ascii_lowercase());
        let raw = response
            .bytes()
            .await
            .map_err(|e| AuthorityError::Network(format!("reading listing body: {e}")))?;

        let html = decode_body(encoding.as_deref(), &raw)?;
        let candidates = club_listing::parse_listing(&html)?;
        debug!(id = %id, candidates = candidates.len(), "Club listing parsed");
        Ok(candidates)
    }
}

/// Decompress a body according to its `Content-Encoding`
pub fn decode_body(encoding: Option<&str>, raw: &[u8]) -> Result<String, AuthorityError> {
    let mut bytes = Vec::new();
    let result = match encoding {
        None | Some("") | Some("identity") => return Ok(String::from_utf8_lossy(raw).into_owned()),
        Some("gzip") | Some("x-gzip") => GzDecoder::new(raw).read_to_end(&mut bytes),
        Some("deflate") => ZlibDecoder::new(raw).read_to_end(&mut bytes),
        Some(other) => {
            return Err(AuthorityError::Decode(format!(
                "unsupported Content-Encoding: {other}"
            )))
        }
    };

    result.map_err(|e| AuthorityError::Decode(format!("decompressing listing: {e}")))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
