//! # GLASS Core Types
//!
//! Fundamental type definitions used across the GL layer.
//!
//! These types provide:
//! - GL scalar aliases matching the ES 2.0 headers
//! - Strong typing for physical addresses handed to the GPU
//! - Screen and eye identifiers for presentation

use core::fmt;
use core::ops::{Add, Sub};

// =============================================================================
// GL SCALAR ALIASES
// =============================================================================

/// Symbolic constant
pub type GLenum = u32;
/// Signed integer
pub type GLint = i32;
/// Unsigned integer / object name
pub type GLuint = u32;
/// Non-negative size (signed for validation)
pub type GLsizei = i32;
/// Single precision float
pub type GLfloat = f32;
/// Float clamped to [0, 1]
pub type GLclampf = f32;
/// Boolean (0 or 1)
pub type GLboolean = u8;
/// Bitmask
pub type GLbitfield = u32;

/// GL true
pub const GL_TRUE: GLboolean = 1;
/// GL false
pub const GL_FALSE: GLboolean = 0;

// =============================================================================
// PHYSICAL ADDRESS
// =============================================================================

/// Physical address as seen by the PICA200
///
/// Command lists carry most addresses divided by eight, so every buffer
/// handed to the GPU must be 8-byte aligned.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct PhysAddr(u32);

impl PhysAddr {
    /// Create a new physical address
    #[inline]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Create a null physical address
    #[inline]
    pub const fn null() -> Self {
        Self(0)
    }

    /// Get the raw u32 value
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if null
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Check alignment
    #[inline]
    pub const fn is_aligned(self, alignment: u32) -> bool {
        self.0 & (alignment - 1) == 0
    }

    /// Offset by bytes
    #[inline]
    pub const fn offset(self, bytes: u32) -> Self {
        Self(self.0.wrapping_add(bytes))
    }

    /// Address in 8-byte units, as written to location registers
    #[inline]
    pub const fn units8(self) -> u32 {
        self.0 >> 3
    }
}

impl Add<u32> for PhysAddr {
    type Output = Self;

    fn add(self, rhs: u32) -> Self::Output {
        Self(self.0.wrapping_add(rhs))
    }
}

impl Sub<PhysAddr> for PhysAddr {
    type Output = u32;

    fn sub(self, rhs: PhysAddr) -> Self::Output {
        self.0.wrapping_sub(rhs.0)
    }
}

impl fmt::Debug for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhysAddr(0x{:08x})", self.0)
    }
}

impl fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

// =============================================================================
// PRESENTATION TARGETS
// =============================================================================

/// Physical screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    /// Top screen (400x240, stereoscopic)
    #[default]
    Top,
    /// Bottom screen (320x240)
    Bottom,
}

/// Eye for the stereoscopic top screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Left eye, also used when 3D is off
    #[default]
    Left,
    /// Right eye
    Right,
}

/// Downscale applied by the display transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum TransferScale {
    /// 1:1
    #[default]
    None = 0,
    /// Halve horizontally
    X = 1,
    /// Halve both axes
    XY = 2,
}

// =============================================================================
// STATIC ASSERTIONS
// =============================================================================

static_assertions::assert_eq_size!(PhysAddr, u32);
static_assertions::assert_impl_all!(PhysAddr: Send, Sync, Copy);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phys_addr() {
        let a = PhysAddr::new(0x1800_0000);
        assert!(!a.is_null());
        assert!(a.is_aligned(8));
        assert_eq!(a.units8(), 0x0300_0000);
        assert_eq!((a + 0x10) - a, 0x10);
        assert!(PhysAddr::null().is_null());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Screen::default(), Screen::Top);
        assert_eq!(Side::default(), Side::Left);
        assert_eq!(TransferScale::default() as u32, 0);
    }
}
