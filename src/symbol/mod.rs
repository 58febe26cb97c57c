// Mon Jan 19 2026 - Alex

pub mod error;
pub mod export;
pub mod resolver;

pub use error::SymbolError;
pub use export::{ExportTable, ExportedSymbol};
pub use resolver::ExportResolver;
