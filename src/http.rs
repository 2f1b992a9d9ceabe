//! HTTP client with rate limiting for the metadata API.
//!
//! This module provides a wrapper around `reqwest::Client` that adds:
//! * Request rate limiting to respect third-party API quotas
//! * Credential headers applied to every request
//! * Consistent timeouts and headers
//!
//! # Rate Limiting
//!
//! The metadata API is metered per subscription. The client throttles
//! itself to 50 calls per 5-second interval, allowing bursts up to the
//! maximum calls per interval; requests that would exceed the limit are
//! delayed, not rejected.

use std::{future::Future, num::NonZeroU32, time::Duration};

use futures_util::{FutureExt, TryFutureExt};
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{
    self,
    header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE},
    Method, Url,
};

use crate::{config::Config, error::Result};

/// HTTP client with built-in rate limiting and credential headers.
pub struct Client {
    /// Unlimited request client for special cases.
    ///
    /// Direct access to underlying client without rate limiting.
    pub unlimited: reqwest::Client,

    /// Rate limiter for API quota compliance.
    rate_limiter: DefaultDirectRateLimiter,
}

impl Client {
    /// Header carrying the API key on every request.
    const KEY_HEADER: &'static str = "X-RapidAPI-Key";

    /// Header carrying the API host on every request.
    const HOST_HEADER: &'static str = "X-RapidAPI-Host";

    /// Standard rate limit interval for the metadata API.
    ///
    /// A rolling window during which a maximum number of calls can be made.
    const RATE_LIMIT_INTERVAL: Duration = Duration::from_secs(5);

    /// Maximum allowed API calls per interval.
    ///
    /// Requests beyond this limit will be automatically delayed.
    const RATE_LIMIT_CALLS_PER_INTERVAL: u8 = 50;

    /// Duration to keep idle connections alive.
    ///
    /// Prevents frequent reconnection overhead when walking the
    /// candidate endpoint chain.
    const KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(60);

    /// Duration to wait for individual network reads.
    ///
    /// The scraper endpoints can be slow, but a read that stalls for
    /// longer than this is treated as failed so the next candidate
    /// endpoint can be tried.
    const READ_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a new client carrying the configured credentials.
    ///
    /// The API key and host are installed as default headers, so every
    /// request issued through this client is authenticated. The key
    /// header is marked sensitive to keep it out of trace output.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// * HTTP client creation fails
    /// * Header values are invalid
    ///
    /// # Panics
    ///
    /// Panics if rate limit parameters are zero.
    pub fn new(config: &Config) -> Result<Self> {
        // Not having `Accept-Language` set is non-fatal.
        let mut headers = HeaderMap::new();
        if let Ok(lang) = HeaderValue::from_str(&config.app_lang) {
            headers.insert(ACCEPT_LANGUAGE, lang);
        }

        let mut key = HeaderValue::from_str(config.api_key.as_str())
            .map_err(crate::error::Error::invalid_argument)?;
        key.set_sensitive(true);
        headers.insert(Self::KEY_HEADER, key);

        let host = HeaderValue::from_str(&config.api_host)
            .map_err(crate::error::Error::invalid_argument)?;
        headers.insert(Self::HOST_HEADER, host);

        let http_client = reqwest::Client::builder()
            .tcp_keepalive(Self::KEEPALIVE_TIMEOUT)
            .read_timeout(Self::READ_TIMEOUT)
            .default_headers(headers)
            .user_agent(&config.user_agent);

        // Rate limit own requests as to not exhaust the API subscription.
        let replenish_interval =
            Self::RATE_LIMIT_INTERVAL / u32::from(Self::RATE_LIMIT_CALLS_PER_INTERVAL);
        let quota = Quota::with_period(replenish_interval)
            .expect("quota time interval is zero")
            .allow_burst(
                NonZeroU32::new(Self::RATE_LIMIT_CALLS_PER_INTERVAL.into())
                    .expect("calls per interval is zero"),
            );

        Ok(Self {
            unlimited: http_client.build()?,
            rate_limiter: governor::RateLimiter::direct(quota),
        })
    }

    /// Builds a request with specified method and URL.
    ///
    /// Creates a raw request that can be executed with `execute()`.
    pub fn request<U>(&self, method: Method, url: U) -> reqwest::Request
    where
        U: Into<Url>,
    {
        reqwest::Request::new(method, url.into())
    }

    /// Builds a GET request.
    ///
    /// Convenience method for `request()` with GET method.
    pub fn get<U>(&self, url: U) -> reqwest::Request
    where
        U: Into<Url>,
    {
        self.request(Method::GET, url)
    }

    /// Executes a request with rate limiting.
    ///
    /// Applies rate limiting before executing the request to
    /// comply with API quotas.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// * Request execution fails
    /// * Network error occurs
    pub fn execute(
        &self,
        request: reqwest::Request,
    ) -> impl Future<Output = Result<reqwest::Response>> + '_ {
        // No need to await with jitter because the level of concurrency is low.
        let throttle = self.rate_limiter.until_ready();
        throttle.then(|()| self.unlimited.execute(request).map_err(Into::into))
    }
}
