use std::time::Duration;

use anyhow::Result;
use structopt::StructOpt;

use crate::opt::Opt;

const SLACK_API: &str = "https://slack.com/api";
const LINE_EMOJI_SHOP: &str = "https://store.line.me/emojishop/product";

const USER_AGENT: &str = "\
    Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) \
    Chrome/110.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub backoff: Duration,
    /// `None` retries forever, matching the platform's expectation that
    /// rate-limited clients eventually get through.
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub product_id: String,
    pub prefix: String,
    pub slack_api: String,
    pub store_base: String,
    pub retry: RetryPolicy,
}

impl Config {
    pub fn from_opt(opt: Opt) -> Config {
        Config {
            token: opt.token,
            product_id: opt.product_id,
            prefix: opt.prefix,
            slack_api: SLACK_API.to_string(),
            store_base: LINE_EMOJI_SHOP.to_string(),
            retry: RetryPolicy {
                backoff: Duration::from_secs(opt.throttle),
                max_attempts: opt.max_retries,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Context {
    pub cfg: Config,
    pub client: reqwest::Client,
}

impl Context {
    pub fn new(cfg: Config) -> Result<Context> {
        Ok(Context {
            cfg,
            client: reqwest::ClientBuilder::new()
                .user_agent(USER_AGENT)
                .build()?,
        })
    }

    pub fn from_args() -> Result<Context> {
        Self::new(Config::from_opt(Opt::from_args()))
    }
}
