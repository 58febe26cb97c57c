// Tue Jan 20 2026 - Alex

pub mod pattern;
pub mod scanner;
pub mod signature;

pub use pattern::Pattern;
pub use scanner::SignatureScanner;
pub use signature::SignatureDefinition;
