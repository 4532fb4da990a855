//! # GLASS: OpenGL ES 2.0 on the PICA200
//!
//! A subset of OpenGL ES 2.0 compiled to a PICA200 command stream.
//! Entry points only record state and mark it dirty; clears, draws and
//! swaps resolve the dirty groups into register writes and hand the
//! resulting command lists, fills and display transfers to the hardware.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          glass-gl                            │
//! │                                                              │
//! │  ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐  │
//! │  │ Context  │  │  Object  │  │ Shaders  │  │   Uniform    │  │
//! │  │  State   │  │  Store   │  │ (DVLB)   │  │  Addressing  │  │
//! │  └──────────┘  └──────────┘  └──────────┘  └──────────────┘  │
//! │        │ dirty flags                                         │
//! │        ▼                                                     │
//! │  ┌──────────┐   ┌──────────┐   ┌─────────────────────────┐   │
//! │  │ Resolver │──▶│ Emitters │──▶│ glass-cmd CommandBuffer │   │
//! │  └──────────┘   └──────────┘   └─────────────────────────┘   │
//! │        ▲                                   │                 │
//! │  clear · draw · swap ──────────▶ TransferQueue ──▶ Platform  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```text
//! let mut glass = Glass::new(platform, GlassConfig::default());
//! let ctx = glass.create_context()?;
//! glass.bind_context(Some(ctx));
//! glass.clear_color(0.0, 0.0, 0.0, 1.0);
//! glass.clear(GL_COLOR_BUFFER_BIT);
//! glass.swap_buffers();
//! ```

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]
#![allow(clippy::too_many_arguments)]

extern crate alloc;

// =============================================================================
// MODULE EXPORTS
// =============================================================================

pub mod context;
pub mod enums;
pub mod gpu;
pub mod object;
pub mod platform;
pub mod shader;
pub mod sim;
pub mod state;
pub mod translate;

mod attribs;
mod buffer;
mod effects;
mod framebuffer;
mod get;
mod render;
mod resolve;
mod uniforms;

pub use context::{ContextHandle, Glass, GlassConfig};
pub use enums::*;
pub use framebuffer::MAX_RENDERBUFFER_SIZE;
pub use get::Params;
pub use platform::{DisplayBuffer, Platform, VramBank};
pub use sim::SimPlatform;
pub use state::{Context, ContextSettings};
pub use uniforms::NO_LOCATION;
