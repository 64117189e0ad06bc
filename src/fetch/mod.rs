use std::{fmt, num::NonZeroU32, sync::Arc, time::Duration};

use governor::{
    clock::{QuantaClock, QuantaInstant},
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
    Jitter, Quota,
};
use reqwest::{header::USER_AGENT, Client};
use tracing::{instrument, Level};
use url::Url;

use crate::config::Config;
use crate::error::Result;
use crate::locations::Site;

/// The site trims its pages for clients it does not recognise as browsers.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

type RateLimiter =
    governor::RateLimiter<NotKeyed, InMemoryState, QuantaClock, NoOpMiddleware<QuantaInstant>>;

/// Issues page requests against one [`Site`], spaced out by a shared rate
/// limiter. Clones share the client and the limiter.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    site: Site,
    rate_limiter: Arc<RateLimiter>,
    jitter: Duration,
}

impl fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher")
            .field("site", &self.site.base().as_str())
            .field("jitter", &self.jitter)
            .finish_non_exhaustive()
    }
}

pub fn make_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder().gzip(true).timeout(timeout).build()?;
    Ok(client)
}

impl Fetcher {
    pub fn new(site: Site, timeout: Duration, rate_limit: NonZeroU32, jitter: Duration) -> Result<Self> {
        Ok(Self {
            client: make_client(timeout)?,
            site,
            rate_limiter: Arc::new(governor::RateLimiter::direct(Quota::per_second(rate_limit))),
            jitter,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.site.clone(),
            config.fetch_timeout,
            config.rate_limit,
            config.rate_jitter,
        )
    }

    pub const fn site(&self) -> &Site {
        &self.site
    }

    /// GETs `url` and returns the body. Non-success statuses and timeouts
    /// are errors.
    #[instrument(skip_all, fields(url = %url), level = Level::TRACE)]
    pub async fn page(&self, url: Url) -> Result<String> {
        if self.jitter.is_zero() {
            self.rate_limiter.until_ready().await;
        } else {
            let jitter = Jitter::new(Duration::ZERO, self.jitter);
            self.rate_limiter.until_ready_with_jitter(jitter).await;
        }
        let start = std::time::Instant::now();
        let res = self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?
            .error_for_status()?;
        let text = res.text().await?;
        log::trace!("Got text of page in \t {:?}", start.elapsed());
        Ok(text)
    }
}
