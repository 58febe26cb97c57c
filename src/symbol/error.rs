// Mon Jan 19 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SymbolError {
    #[error("Couldn't find {symbol} in {module}'s exports")]
    ExportNotFound { symbol: String, module: String },
}
