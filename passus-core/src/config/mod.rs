//! Configuration record, byte layout, storage seam, and edit mode

mod edit;
mod layout;
mod store;
mod types;

pub use edit::{EditFocus, EditSession};
pub use layout::*;
pub use store::{ConfigStore, MemoryStore};
pub use types::Config;
