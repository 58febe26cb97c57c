// Mon Jan 26 2026 - Alex

pub mod registry;

pub use registry::{FieldDefault, InjectedRegistry};
