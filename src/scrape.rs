use anyhow::Result;
use lazy_regex::lazy_regex;
use log::{info, warn};
use scraper::{Html, Selector};
use simple_error::simple_error;

use crate::context::Context;

const IMAGE_SELECTOR: &str = ".mdCMN09ImgList .mdCMN09ImgListWarp span.mdCMN09Image";

/// One image entry extracted from the storefront page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiAsset {
    pub index: u32,
    pub extension: String,
    pub source_url: String,
}

impl EmojiAsset {
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.index, self.extension)
    }
}

/// Pulls the image URL out of a `background-image:url(...)` style attribute
/// and parses its trailing path segment as `{index}.{extension}`.
///
/// E.g. `background-image:url(https://../sticon/5e4f90/iPhone/007.png);`
/// yields index 7 with extension `png`. Returns `None` for anything that
/// doesn't match, the caller decides whether to log.
pub fn asset_from_style(style: &str) -> Option<EmojiAsset> {
    let caps = lazy_regex!(r#"background-image:\s*url\(['"]?([^'")]+)['"]?\)"#).captures(style)?;
    let url = caps.get(1).unwrap().as_str();

    let caps = lazy_regex!(r"(\d+)\.(\w+)$").captures(url)?;
    let index = caps.get(1).unwrap().as_str().parse().ok()?;
    let extension = caps.get(2).unwrap().as_str().to_string();

    Some(EmojiAsset {
        index,
        extension,
        source_url: url.to_string(),
    })
}

/// Walks every image node on the product page and collects the valid
/// assets. Malformed style attributes are logged and skipped; an empty
/// page simply yields an empty list.
pub fn extract_assets(html: &str) -> Result<Vec<EmojiAsset>> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse(IMAGE_SELECTOR)
        .map_err(|err| simple_error!("couldn't parse selector: {}", err))?;

    let mut assets = Vec::new();
    for node in doc.select(&selector) {
        let style = match node.value().attr("style") {
            Some(style) => style,
            None => continue,
        };
        match asset_from_style(style) {
            Some(asset) => assets.push(asset),
            None => warn!("skipping malformed style attribute: `{style}`"),
        }
    }
    Ok(assets)
}

pub async fn scrape_assets(ctx: &Context) -> Result<Vec<EmojiAsset>> {
    let url = format!("{}/{}", ctx.cfg.store_base, ctx.cfg.product_id);
    let res = ctx.client.get(&url).send().await?;

    let status = res.status();
    if status != reqwest::StatusCode::OK {
        return Err(simple_error!("status code error: {}", status).into());
    }

    let html = res.text().await?;
    let assets = extract_assets(&html)?;
    info!("found {} assets on the product page", assets.len());
    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLE: &str = "background-image:url(https://stickershop.line-scdn.net/sticonshop/v1/sticon/5e4f906cd8824d19066dfc58/iPhone/007.png);";

    #[test]
    fn parses_url_index_and_extension() {
        let asset = asset_from_style(STYLE).unwrap();
        assert_eq!(asset.index, 7);
        assert_eq!(asset.extension, "png");
        assert_eq!(
            asset.source_url,
            "https://stickershop.line-scdn.net/sticonshop/v1/sticon/5e4f906cd8824d19066dfc58/iPhone/007.png"
        );
        assert_eq!(asset.file_name(), "7.png");
    }

    #[test]
    fn rejects_style_without_url_pattern() {
        assert_eq!(asset_from_style("color: red;"), None);
        assert_eq!(asset_from_style(""), None);
    }

    #[test]
    fn rejects_file_name_without_dot() {
        let style = "background-image:url(https://example.com/sticon/007png);";
        assert_eq!(asset_from_style(style), None);
    }

    #[test]
    fn rejects_non_numeric_index() {
        let style = "background-image:url(https://example.com/sticon/cover.png);";
        assert_eq!(asset_from_style(style), None);
    }

    #[test]
    fn extracts_only_matching_nodes_and_skips_malformed() {
        let html = r#"
            <div class="mdCMN09ImgList">
              <div class="mdCMN09ImgListWarp">
                <span class="mdCMN09Image" style="background-image:url(https://cdn.example.com/sticon/001.png);"></span>
                <span class="mdCMN09Image" style="background-image:url(https://cdn.example.com/sticon/002.gif);"></span>
                <span class="mdCMN09Image" style="color: red;"></span>
                <span class="mdCMN09Image"></span>
              </div>
            </div>
            <span class="mdCMN09Image" style="background-image:url(https://cdn.example.com/sticon/003.png);"></span>
        "#;

        let assets = extract_assets(html).unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].index, 1);
        assert_eq!(assets[0].extension, "png");
        assert_eq!(assets[1].index, 2);
        assert_eq!(assets[1].extension, "gif");
    }

    #[test]
    fn empty_page_yields_no_assets() {
        let assets = extract_assets("<html><body></body></html>").unwrap();
        assert!(assets.is_empty());
    }
}
