//! Daily Earth imagery
//!
//! ## Components
//! - `ImageryLocator`: builds the WMS request for yesterday's global composite
//! - `ImageryFetcher`: downloads it into the staging slot
//! - `ImageArtifact`: the staged image, released after publishing

mod types;
pub use types::{ImageArtifact, ImageryRequest};

mod locator;
pub use locator::ImageryLocator;

mod fetcher;
pub use fetcher::{ImageryFetcher, ImagerySource};
