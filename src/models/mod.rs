//! Data Models
//!
//! Backend entities, the merged task row, derived chunk aggregates and
//! console settings.

pub mod agent;
pub mod chunk;
pub mod hashlist;
pub mod serde_helpers;
pub mod settings;
pub mod task;

pub use agent::*;
pub use chunk::*;
pub use hashlist::*;
pub use settings::*;
pub use task::*;
