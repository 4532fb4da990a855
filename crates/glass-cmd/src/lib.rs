//! # GLASS Command System
//!
//! PICA200 register map, command list encoder and GX transfer queue.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Command Submission Path                   │
//! │                                                              │
//! │  ┌──────────────┐   split   ┌──────────────┐   ┌──────────┐  │
//! │  │   Command    │──────────▶│  Transfer    │──▶│ Transfer │  │
//! │  │   Buffer     │  chunk    │   Queue      │   │  Engine  │  │
//! │  │ (reg writes) │           │ (32 entries) │   │ (GX/GPU) │  │
//! │  └──────────────┘           └──────────────┘   └──────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Submission Flow
//!
//! 1. The GL resolver encodes register writes into the [`CommandBuffer`]
//! 2. A flush splits the pending words off as one command list chunk
//! 3. The chunk is queued on the [`TransferQueue`] with fills and transfers
//! 4. The [`TransferEngine`] executes queued operations in order

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]

extern crate alloc;

// =============================================================================
// MODULE EXPORTS
// =============================================================================

pub mod encoder;
pub mod queue;
pub mod regs;

pub use encoder::{CommandBuffer, GPU_MAX_ENTRIES};
pub use queue::{
    DisplayTransfer, GX_MAX_ENTRIES, GxCommand, MemoryFill, TransferEngine, TransferQueue,
};
