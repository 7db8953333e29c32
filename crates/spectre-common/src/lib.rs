//! # Spectre Common
//!
//! Shared types, errors, and constants used across Spectre components.
//!
//! ## Modules
//! - `types` - Core enums and the Difficulty newtype
//! - `mission` - Mission blueprint/instance documents
//! - `player` - Player progression record
//! - `outcome` - Typed state-machine results
//! - `error` - Common error types
//! - `constants` - Shared configuration constants

pub mod constants;
pub mod error;
pub mod mission;
pub mod outcome;
pub mod player;
pub mod types;

pub use error::SpectreError;
pub use mission::*;
pub use outcome::*;
pub use player::*;
pub use types::*;
