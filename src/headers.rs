use anyhow::{ensure, Context, Result};
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};

use crate::config::CrawlerConfig;

/// Builds a randomized header set per outbound request so consecutive
/// requests don't share one fingerprint. Each header is drawn uniformly
/// and independently from its pool; the thread-local RNG keeps this safe
/// to call from any number of concurrent downloads.
#[derive(Debug, Clone)]
pub struct HeaderRotator {
    user_agents: Vec<HeaderValue>,
    accept_languages: Vec<HeaderValue>,
    accepts: Vec<HeaderValue>,
    referers: Vec<HeaderValue>,
}

impl HeaderRotator {
    /// Pre-parses the configured pools. Fails on an empty pool or a value
    /// that is not a valid header.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self {
            user_agents: parse_pool("userAgents", &config.user_agents)?,
            accept_languages: parse_pool("acceptLanguages", &config.accept_languages)?,
            accepts: parse_pool("accepts", &config.accepts)?,
            referers: parse_pool("referers", &config.referers)?,
        })
    }

    pub fn next_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(4);
        headers.insert(USER_AGENT, pick(&self.user_agents));
        headers.insert(ACCEPT_LANGUAGE, pick(&self.accept_languages));
        headers.insert(ACCEPT, pick(&self.accepts));
        headers.insert(REFERER, pick(&self.referers));
        headers
    }
}

fn parse_pool(name: &str, pool: &[String]) -> Result<Vec<HeaderValue>> {
    ensure!(!pool.is_empty(), "header pool `{name}` is empty");
    pool.iter()
        .map(|v| HeaderValue::from_str(v).with_context(|| format!("bad `{name}` value: {v:?}")))
        .collect()
}

// Pools are checked non-empty in the constructor.
fn pick(pool: &[HeaderValue]) -> HeaderValue {
    pool[rand::thread_rng().gen_range(0..pool.len())].clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotator_covers_all_four_headers() {
        let rotator = HeaderRotator::new(&CrawlerConfig::default()).unwrap();
        let headers = rotator.next_headers();
        for key in [USER_AGENT, ACCEPT_LANGUAGE, ACCEPT, REFERER] {
            assert!(headers.contains_key(&key), "missing {key:?}");
        }
    }

    #[test]
    fn values_come_from_the_pools() {
        let config = CrawlerConfig {
            user_agents: vec!["test-agent".into()],
            accept_languages: vec!["en".into()],
            accepts: vec!["text/html".into()],
            referers: vec!["https://example.com/".into()],
            ..Default::default()
        };
        let rotator = HeaderRotator::new(&config).unwrap();
        for _ in 0..8 {
            let headers = rotator.next_headers();
            assert_eq!(headers[USER_AGENT], "test-agent");
            assert_eq!(headers[REFERER], "https://example.com/");
        }
    }

    #[test]
    fn empty_pool_is_rejected() {
        let config = CrawlerConfig {
            referers: vec![],
            ..Default::default()
        };
        assert!(HeaderRotator::new(&config).is_err());
    }
}
