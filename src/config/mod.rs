pub mod consts;
pub mod market;
pub mod settings;

// Re-export for convenience
pub use market::{MarketArgs, MarketConfig, Network};
pub use settings::Settings;
