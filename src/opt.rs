use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "emojiroid",
    about = "Mirror a LINE store emoji pack into a Slack workspace."
)]
pub struct Opt {
    /// Token for requesting the Slack API
    #[structopt(long)]
    pub token: String,

    /// Product id, e.g. the last section of
    /// https://store.line.me/emojishop/product/5e4f906cd8824d19066dfc58
    #[structopt(long = "id")]
    pub product_id: String,

    /// Prefix of the Slack emoji code
    #[structopt(long)]
    pub prefix: String,

    /// Seconds to wait before retrying a rate-limited upload
    #[structopt(long, default_value = "3")]
    pub throttle: u64,

    /// Give up on a rate-limited upload after this many attempts
    /// instead of retrying forever
    #[structopt(long = "max-retries")]
    pub max_retries: Option<u32>,
}
