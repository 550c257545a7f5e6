use std::cmp;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlerConfig {
    /// URL of the ranked movie list page.
    #[serde(default = "default_list_url")]
    pub list_url: String,

    /// Per-request timeout in seconds, applied to the list fetch and to
    /// every detail fetch independently.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Maximum concurrent detail page downloads.
    #[serde(default = "default_concurrent_downloads")]
    pub concurrent_downloads: usize,

    /// Path of the CSV snapshot used as a fallback data source.
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: PathBuf,

    /// Header rotation pools. Each pool must be non-empty.
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,

    #[serde(default = "default_accept_languages")]
    pub accept_languages: Vec<String>,

    #[serde(default = "default_accepts")]
    pub accepts: Vec<String>,

    #[serde(default = "default_referers")]
    pub referers: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            list_url: default_list_url(),
            request_timeout: default_request_timeout(),
            concurrent_downloads: default_concurrent_downloads(),
            snapshot_file: default_snapshot_file(),
            user_agents: default_user_agents(),
            accept_languages: default_accept_languages(),
            accepts: default_accepts(),
            referers: default_referers(),
        }
    }
}

fn default_list_url() -> String {
    String::from("https://editorial.rottentomatoes.com/guide/best-movies-of-all-time/")
}

fn default_request_timeout() -> u64 {
    10
}

fn default_concurrent_downloads() -> usize {
    cmp::max(1, num_cpus::get() * 2)
}

fn default_snapshot_file() -> PathBuf {
    PathBuf::from("movies.csv")
}

fn default_user_agents() -> Vec<String> {
    [
        // Windows Chrome
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.5993.90 Safari/537.36",
        // Mac Safari
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.6 Safari/605.1.15",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 11_6) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.4 Safari/605.1.15",
        // iPhone
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1",
        "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1",
        // Android Chrome
        "Mozilla/5.0 (Linux; Android 13; SM-G991B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36",
        "Mozilla/5.0 (Linux; Android 12; Pixel 6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.5735.199 Mobile Safari/537.36",
        // Firefox
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 12.6; rv:118.0) Gecko/20100101 Firefox/118.0",
    ]
    .map(String::from)
    .to_vec()
}

fn default_accept_languages() -> Vec<String> {
    [
        "en-US,en;q=0.9",
        "en-GB,en-US;q=0.9,en;q=0.8",
        "en-US;q=0.9,th;q=0.8",
        "en-US,en;q=0.5,fr;q=0.3",
        "en;q=0.8,es;q=0.6,en-US;q=0.4",
    ]
    .map(String::from)
    .to_vec()
}

fn default_accepts() -> Vec<String> {
    [
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        "text/html,application/xml;q=0.9,*/*;q=0.8",
        "text/html,application/xhtml+xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
    ]
    .map(String::from)
    .to_vec()
}

fn default_referers() -> Vec<String> {
    [
        "https://www.google.com/",
        "https://www.bing.com/",
        "https://www.reddit.com/",
        "https://twitter.com/",
        "https://www.facebook.com/",
        "https://www.youtube.com/",
        "https://www.rottentomatoes.com/",
        "https://editorial.rottentomatoes.com/guide/best-movies-of-all-time/",
    ]
    .map(String::from)
    .to_vec()
}
