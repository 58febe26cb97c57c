// Sat Jan 24 2026 - Alex

pub mod error;
pub mod finder;
pub mod recipe;
pub mod stock;

pub use error::DiscoveryError;
pub use finder::{DiscoveredFunction, DiscoveryPath, FunctionDiscovery};
pub use recipe::{FunctionRecipe, HopSelect, MetadataAlternate};
pub use stock::stock_recipes;
