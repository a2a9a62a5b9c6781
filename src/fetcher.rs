use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use reqwest::blocking::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::redirect;
use tracing::debug;

use crate::config::ScraperConfig;
use crate::error::{FetchError, Result, ScrapeError};

const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub html: String,
    pub status: u16,
}

/// Browser identity presented on every request.
#[derive(Debug, Clone)]
pub struct Identity {
    user_agents: Vec<String>,
    referer: String,
}

impl Identity {
    pub fn new(user_agents: Vec<String>, referer: impl Into<String>) -> Result<Self> {
        if user_agents.is_empty() {
            return Err(ScrapeError::Config("user agent pool is empty".into()));
        }
        Ok(Self {
            user_agents,
            referer: referer.into(),
        })
    }

    pub fn pick_user_agent<R: Rng>(&self, rng: &mut R) -> &str {
        // pool is never empty, see `new`
        self.user_agents
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn static_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.5"),
        );
        headers.insert(
            header::REFERER,
            HeaderValue::from_str(&self.referer)
                .map_err(|e| ScrapeError::Config(format!("invalid referer: {e}")))?,
        );
        headers.insert(header::DNT, HeaderValue::from_static("1"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(
            header::UPGRADE_INSECURE_REQUESTS,
            HeaderValue::from_static("1"),
        );
        Ok(headers)
    }
}

/// Post-request delay drawn uniformly from `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    min: Duration,
    max: Duration,
}

impl Throttle {
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

pub struct Fetcher {
    client: Client,
    identity: Identity,
    throttle: Throttle,
    rng: StdRng,
}

impl Fetcher {
    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        let identity = Identity::new(config.user_agents.clone(), config.referer.clone())?;
        let throttle = Throttle::new(config.min_delay(), config.max_delay());
        Self::new(identity, throttle, config.timeout(), StdRng::from_entropy())
    }

    pub fn new(identity: Identity, throttle: Throttle, timeout: Duration, rng: StdRng) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .default_headers(identity.static_headers()?)
            .build()?;

        Ok(Self {
            client,
            identity,
            throttle,
            rng,
        })
    }

    /// GETs `url`, then sleeps for the throttle delay whether or not the
    /// request succeeded.
    pub fn fetch(&mut self, url: &str) -> std::result::Result<FetchedPage, FetchError> {
        let result = self.request(url);

        let delay = self.throttle.sample(&mut self.rng);
        if !delay.is_zero() {
            debug!("Sleeping for {:.2} seconds", delay.as_secs_f64());
            std::thread::sleep(delay);
        }

        result
    }

    fn request(&mut self, url: &str) -> std::result::Result<FetchedPage, FetchError> {
        let user_agent = self.identity.pick_user_agent(&mut self.rng).to_string();
        debug!("GET {} as {}", url, user_agent);

        let response = self
            .client
            .get(url)
            .header(header::USER_AGENT, user_agent)
            .send()?
            .error_for_status()?;
        let status = response.status().as_u16();
        let html = response.text()?;

        Ok(FetchedPage { html, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle_within_bounds() {
        let throttle = Throttle::new(Duration::from_millis(200), Duration::from_millis(500));
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let delay = throttle.sample(&mut rng);
            assert!(delay >= Duration::from_millis(200));
            assert!(delay <= Duration::from_millis(500));
        }
    }

    #[test]
    fn test_throttle_orders_bounds() {
        let throttle = Throttle::new(Duration::from_secs(5), Duration::from_secs(2));
        let mut rng = StdRng::seed_from_u64(1);
        let delay = throttle.sample(&mut rng);
        assert!(delay >= Duration::from_secs(2) && delay <= Duration::from_secs(5));
    }

    #[test]
    fn test_zero_throttle() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(Throttle::none().sample(&mut rng), Duration::ZERO);
    }

    #[test]
    fn test_user_agent_from_pool() {
        let pool = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let identity = Identity::new(pool.clone(), "https://www.lowes.com/").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let ua = identity.pick_user_agent(&mut rng);
            assert!(pool.iter().any(|p| p == ua));
        }
    }

    #[test]
    fn test_user_agent_rotation_is_seeded() {
        let pool: Vec<String> = (0..10).map(|i| format!("agent-{i}")).collect();
        let identity = Identity::new(pool, "r").unwrap();
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        let first: Vec<_> = (0..5).map(|_| identity.pick_user_agent(&mut a).to_string()).collect();
        let second: Vec<_> = (0..5).map(|_| identity.pick_user_agent(&mut b).to_string()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert!(Identity::new(Vec::new(), "r").is_err());
    }

    #[test]
    fn test_static_headers() {
        let identity = Identity::new(vec!["ua".into()], "https://www.lowes.com/").unwrap();
        let headers = identity.static_headers().unwrap();
        assert_eq!(headers[header::REFERER], "https://www.lowes.com/");
        assert_eq!(headers[header::CONNECTION], "keep-alive");
        assert!(headers.contains_key(header::ACCEPT));
        assert!(headers.contains_key(header::ACCEPT_LANGUAGE));
    }
}
