use anyhow::Result;
use log::{error, warn};

use emojiroid::context::Context;
use emojiroid::staging::StagingDir;
use emojiroid::{logging, registry, scrape, upload};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init().unwrap();

    let ctx = match Context::from_args() {
        Ok(ctx) => ctx,
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&ctx).await {
        error!("{err}");
        std::process::exit(1);
    }
}

/// One sequential pass: snapshot the registry, scrape the page, stage the
/// downloads, upload what's new. The staging directory is cleaned up when
/// `staging` drops, on every exit path.
async fn run(ctx: &Context) -> Result<()> {
    let snapshot = registry::fetch_existing(ctx).await?;
    let assets = scrape::scrape_assets(ctx).await?;

    let staging = StagingDir::prepare()?;
    for asset in &assets {
        if let Err(err) = staging.download(ctx, asset).await {
            warn!("couldn't download `{}`: {err}", asset.source_url);
        }
    }

    let staged = upload::list_staged(staging.path())?;
    upload::upload_all(ctx, &staged, &snapshot).await;
    Ok(())
}
