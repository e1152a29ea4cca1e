use rand::seq::SliceRandom;
use toppler_core::BrowserConfig;

/// Common desktop user agents. Book sites serve the full result markup to these.
const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/95.0.4638.54 Safari/537.36",
];

/// Identity presented to the book sites.
#[derive(Debug, Clone)]
pub struct Fingerprint {
    pub user_agent: String,
}

impl Fingerprint {
    /// Pick one of the common desktop user agents at random
    pub fn randomized() -> Self {
        let mut rng = rand::thread_rng();
        let user_agent = USER_AGENTS.choose(&mut rng).copied().unwrap_or(USER_AGENTS[0]);

        Self {
            user_agent: user_agent.to_string(),
        }
    }

    /// Use the configured user agent, or a random one if none is set
    pub fn from_config(config: &BrowserConfig) -> Self {
        match &config.user_agent {
            Some(user_agent) if !user_agent.trim().is_empty() => Self {
                user_agent: user_agent.clone(),
            },
            _ => Self::randomized(),
        }
    }
}
