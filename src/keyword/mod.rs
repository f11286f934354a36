mod feature;
mod filter;
mod registry;

pub use feature::Feature;
pub use filter::KeywordFilter;
pub use registry::FeatureRegistry;
