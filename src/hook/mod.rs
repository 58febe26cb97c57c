// Sun Jan 25 2026 - Alex

pub mod backend;
pub mod error;
pub mod inline;
pub mod installer;
pub mod table;
pub mod trampoline;

pub use backend::DetourBackend;
pub use error::HookError;
pub use inline::InlineDetour;
pub use installer::HookInstaller;
pub use table::{DispatchTable, TableDetour};
pub use trampoline::TrampolineSlot;
