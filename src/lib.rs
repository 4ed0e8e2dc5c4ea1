pub mod context;
pub mod logging;
pub mod opt;
pub mod registry;
pub mod scrape;
pub mod staging;
pub mod upload;
