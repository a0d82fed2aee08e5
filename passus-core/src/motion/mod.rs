//! Step motion generation

mod walker;

pub use walker::{Walker, HALF_STEP_NUMERATOR_MS};
