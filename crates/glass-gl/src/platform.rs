//! # Platform Interface
//!
//! Services the GL layer needs from the system: GPU-visible memory, the
//! display framebuffers and the GX transfer engine that executes command
//! lists, fills and display transfers.

use glass_cmd::TransferEngine;
use glass_core::{PhysAddr, Screen, Side};

// =============================================================================
// MEMORY
// =============================================================================

/// VRAM bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VramBank {
    /// Bank A, preferred for color buffers
    A,
    /// Bank B, preferred for depth buffers
    B,
}

impl VramBank {
    /// The other bank
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

// =============================================================================
// DISPLAY
// =============================================================================

/// Framebuffer currently shown on a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayBuffer {
    /// Start of the pixel data
    pub addr: PhysAddr,
    /// Display format code (0 RGBA8, 1 RGB8, 2 RGB565, 3 RGB5A1, 4 RGBA4)
    pub format: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

// =============================================================================
// PLATFORM TRAIT
// =============================================================================

/// System services backing a GLASS instance
pub trait Platform: TransferEngine {
    /// Physical base of the linear heap, origin of attribute and index offsets
    fn linear_base(&self) -> PhysAddr;

    /// Allocate linear memory
    fn linear_alloc(&mut self, size: usize) -> Option<PhysAddr>;

    /// Release linear memory
    fn linear_free(&mut self, addr: PhysAddr);

    /// Allocate VRAM from a bank
    fn vram_alloc(&mut self, size: usize, bank: VramBank) -> Option<PhysAddr>;

    /// Release VRAM
    fn vram_free(&mut self, addr: PhysAddr);

    /// Copy bytes into GPU-visible memory
    fn write(&mut self, addr: PhysAddr, data: &[u8]);

    /// Back buffer of a screen
    fn display_buffer(&self, screen: Screen, side: Side) -> DisplayBuffer;
}
