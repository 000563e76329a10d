//! # pm-core
//!
//! Core types, traits, and utilities shared by every PM dashboard crate.
//!
//! - Error taxonomy (`PmError`, `ValidationErrors`)
//! - Mutation outcome type (`Applied`, `WriteStatus`)
//! - Identity traits (`Id`, `Identifiable`, `next_id`)
//! - Clock abstraction for "today"
//! - Configuration and the free-form settings collection

pub mod error;
pub mod result;
pub mod traits;
pub mod clock;
pub mod config;

pub use error::*;
pub use result::*;
pub use traits::*;
pub use clock::{Clock, FixedClock, SystemClock};
