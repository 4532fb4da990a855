//! # GLASS Core
//!
//! Shared foundations of the GLASS stack: the error taxonomy, GL scalar
//! aliases, physical addresses and the generational arena that backs every
//! GL object name.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  glass-gl                   │
//! │   context · resolver · objects · shaders    │
//! ├──────────────────────┬──────────────────────┤
//! │      glass-cmd       │                      │
//! │  registers · encoder │                      │
//! │   transfer queue     │                      │
//! ├──────────────────────┴──────────────────────┤
//! │                 glass-core                  │
//! │      errors · types · handles · arena       │
//! └─────────────────────────────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]

extern crate alloc;

// =============================================================================
// MODULE EXPORTS
// =============================================================================

pub mod arena;
pub mod error;
pub mod types;

pub use arena::{Arena, Handle};
pub use error::{BinaryError, ChunkKind, Error, Result};
pub use types::*;
