//! Core types and local-day arithmetic for the focus pipeline.

pub mod error;
pub mod events;
pub mod goal;
pub mod session;
pub mod streak;
pub mod window;

pub use error::{Error, Result};
pub use events::*;
pub use goal::*;
pub use session::*;
pub use streak::*;
pub use window::*;
