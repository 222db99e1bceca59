/// Status-driven retry policy with exponential backoff
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use std::time::Duration;

/// Statuses for which a `Retry-After` header overrides the computed backoff
const RETRY_AFTER_STATUSES: [u16; 3] = [413, 429, 503];

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt
    pub max_retries: u32,
    /// Base factor for exponential backoff
    pub backoff_factor: Duration,
    /// Upper bound for any single backoff
    pub max_backoff: Duration,
    /// Response statuses that trigger a retry
    pub retry_statuses: Vec<u16>,
    /// Honor `Retry-After` on 413/429/503 responses
    pub respect_retry_after: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: Duration::from_secs(1),
            max_backoff: Duration::from_secs(120),
            retry_statuses: vec![429, 500, 502, 503, 504],
            respect_retry_after: true,
        }
    }
}

impl RetryPolicy {
    /// Policy that never waits between attempts
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff_factor: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn is_retryable(&self, status: StatusCode) -> bool {
        self.retry_statuses.contains(&status.as_u16())
    }

    /// Backoff before retry number `retry` (1-based).
    ///
    /// The first retry is immediate; retry `n` then waits
    /// `backoff_factor * 2^(n-1)`, capped at `max_backoff`.
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }

        let multiplier = 2u32.saturating_pow(retry - 1);
        self.backoff_factor
            .checked_mul(multiplier)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }

    /// Delay before retry number `retry` after a response with `status` and
    /// `headers`, preferring a server-supplied `Retry-After`. Either way the
    /// delay never exceeds `max_backoff`.
    pub fn delay_for(&self, retry: u32, status: StatusCode, headers: &HeaderMap) -> Duration {
        if self.respect_retry_after && RETRY_AFTER_STATUSES.contains(&status.as_u16()) {
            if let Some(delay) = parse_retry_after(headers, Utc::now()) {
                return delay.min(self.max_backoff);
            }
        }
        self.backoff(retry)
    }
}

/// Parses `Retry-After` as delta seconds or an HTTP date relative to `now`
pub fn parse_retry_after(headers: &HeaderMap, now: DateTime<Utc>) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let date = DateTime::parse_from_rfc2822(value).ok()?;
    let wait = date.with_timezone(&Utc) - now;
    Some(wait.to_std().unwrap_or(Duration::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_default_retryable_statuses() {
        let policy = RetryPolicy::default();
        for status in [429, 500, 502, 503, 504] {
            assert!(policy.is_retryable(StatusCode::from_u16(status).unwrap()));
        }
        for status in [200, 400, 401, 404, 501] {
            assert!(!policy.is_retryable(StatusCode::from_u16(status).unwrap()));
        }
    }

    #[test]
    fn test_exponential_backoff() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.backoff(1), Duration::ZERO);
        assert_eq!(policy.backoff(2), Duration::from_secs(2));
        assert_eq!(policy.backoff(3), Duration::from_secs(4));
        assert_eq!(policy.backoff(4), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_capped() {
        let policy = RetryPolicy {
            max_backoff: Duration::from_secs(5),
            ..Default::default()
        };

        assert_eq!(policy.backoff(10), Duration::from_secs(5));
        assert_eq!(policy.backoff(64), Duration::from_secs(5));
    }

    #[test]
    fn test_immediate_policy_never_waits() {
        let policy = RetryPolicy::immediate(3);
        assert_eq!(policy.backoff(3), Duration::ZERO);
    }

    #[test]
    fn test_retry_after_seconds_overrides_backoff() {
        let policy = RetryPolicy::default();
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));

        assert_eq!(
            policy.delay_for(1, StatusCode::TOO_MANY_REQUESTS, &headers),
            Duration::from_secs(7)
        );
        // 500 is retryable but does not carry Retry-After semantics
        assert_eq!(
            policy.delay_for(2, StatusCode::INTERNAL_SERVER_ERROR, &headers),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn test_retry_after_capped_at_max_backoff() {
        let policy = RetryPolicy::default();
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("86400"));

        assert_eq!(
            policy.delay_for(1, StatusCode::TOO_MANY_REQUESTS, &headers),
            Duration::from_secs(120)
        );

        let policy = RetryPolicy {
            max_backoff: Duration::from_secs(5),
            ..Default::default()
        };
        assert_eq!(
            policy.delay_for(1, StatusCode::SERVICE_UNAVAILABLE, &headers),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_retry_after_ignored_when_disabled() {
        let policy = RetryPolicy {
            respect_retry_after: false,
            ..Default::default()
        };
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));

        assert_eq!(
            policy.delay_for(1, StatusCode::SERVICE_UNAVAILABLE, &headers),
            Duration::ZERO
        );
    }

    #[test]
    fn test_retry_after_http_date() {
        let now = DateTime::parse_from_rfc2822("Wed, 21 Oct 2015 07:28:00 GMT")
            .unwrap()
            .with_timezone(&Utc);
        let mut headers = HeaderMap::new();
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:30 GMT"),
        );

        assert_eq!(parse_retry_after(&headers, now), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_retry_after_in_the_past_is_zero() {
        let now = DateTime::parse_from_rfc2822("Wed, 21 Oct 2015 07:28:00 GMT")
            .unwrap()
            .with_timezone(&Utc);
        let mut headers = HeaderMap::new();
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:00:00 GMT"),
        );

        assert_eq!(parse_retry_after(&headers, now), Some(Duration::ZERO));
    }

    #[test]
    fn test_retry_after_garbage_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));
        assert_eq!(parse_retry_after(&headers, Utc::now()), None);
    }
}
