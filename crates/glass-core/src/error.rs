//! # GLASS Error Handling
//!
//! Error types shared by the command encoder and the GL layer.
//!
//! Error handling in GLASS follows these principles:
//! - Internal operations return [`Result`] and propagate with `?`
//! - Public GL entry points translate an [`Error`] into the pending GL error
//!   code exactly once, at the outermost layer
//! - Malformed input never panics

use core::fmt;

use crate::types::GLenum;

// =============================================================================
// RESULT TYPE
// =============================================================================

/// GLASS Result type alias
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// GL ERROR CODES
// =============================================================================

/// No error recorded
pub const GL_NO_ERROR: GLenum = 0;
/// Unrecognized symbolic parameter
pub const GL_INVALID_ENUM: GLenum = 0x0500;
/// Out-of-range numeric parameter
pub const GL_INVALID_VALUE: GLenum = 0x0501;
/// Operation illegal in the current state
pub const GL_INVALID_OPERATION: GLenum = 0x0502;
/// Allocation failure
pub const GL_OUT_OF_MEMORY: GLenum = 0x0505;
/// Draw or clear against an incomplete framebuffer
pub const GL_INVALID_FRAMEBUFFER_OPERATION: GLenum = 0x0506;

// =============================================================================
// ERROR ENUM
// =============================================================================

/// GLASS unified error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // =========================================================================
    // GL Errors
    // =========================================================================
    /// Unrecognized symbolic parameter
    InvalidEnum,
    /// Numeric parameter out of range
    InvalidValue,
    /// Valid parameters, illegal in the current state
    InvalidOperation,
    /// Allocation failed
    OutOfMemory,
    /// Framebuffer is not complete
    InvalidFramebufferOperation,

    // =========================================================================
    // Infrastructure Errors
    // =========================================================================
    /// Command buffer has no room for the write
    CommandBufferFull,
    /// Transfer queue has no free entry
    QueueFull,
    /// Handle refers to a freed or foreign object
    StaleHandle,
    /// Shader binary failed validation
    MalformedBinary(BinaryError),
}

impl Error {
    /// GL error code reported through `glGetError`
    pub const fn gl_code(self) -> GLenum {
        match self {
            Self::InvalidEnum => GL_INVALID_ENUM,
            Self::InvalidValue => GL_INVALID_VALUE,
            Self::InvalidOperation | Self::StaleHandle => GL_INVALID_OPERATION,
            Self::OutOfMemory | Self::CommandBufferFull | Self::QueueFull => GL_OUT_OF_MEMORY,
            Self::InvalidFramebufferOperation => GL_INVALID_FRAMEBUFFER_OPERATION,
            Self::MalformedBinary(_) => GL_INVALID_VALUE,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // GL
            Self::InvalidEnum => write!(f, "invalid enum"),
            Self::InvalidValue => write!(f, "invalid value"),
            Self::InvalidOperation => write!(f, "invalid operation"),
            Self::OutOfMemory => write!(f, "out of memory"),
            Self::InvalidFramebufferOperation => write!(f, "incomplete framebuffer"),

            // Infrastructure
            Self::CommandBufferFull => write!(f, "command buffer full"),
            Self::QueueFull => write!(f, "transfer queue full"),
            Self::StaleHandle => write!(f, "stale object handle"),
            Self::MalformedBinary(e) => write!(f, "malformed shader binary: {}", e),
        }
    }
}

// =============================================================================
// SUB-ERROR TYPES
// =============================================================================

/// Shader binary validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryError {
    /// Chunk shorter than its fixed header
    Truncated(ChunkKind),
    /// Magic tag mismatch
    BadMagic(ChunkKind),
    /// Table or blob reaches past the end of the chunk
    OutOfBounds(ChunkKind),
    /// Code or operand descriptor count above the hardware limit
    TooLarge,
    /// Unknown flag, mode or type value
    UnknownValue(ChunkKind),
    /// Uniform register range crosses a register file boundary
    BadUniformRange,
    /// More uniform entries than a location can address
    TooManyUniforms,
}

/// Chunk kinds of the shader binary container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// Container chunk
    Dvlb,
    /// Shared code chunk
    Dvlp,
    /// Per-shader entry chunk
    Dvle,
}

impl fmt::Display for BinaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated(c) => write!(f, "{:?} truncated", c),
            Self::BadMagic(c) => write!(f, "{:?} magic mismatch", c),
            Self::OutOfBounds(c) => write!(f, "{:?} offset out of bounds", c),
            Self::TooLarge => write!(f, "code segment above hardware limit"),
            Self::UnknownValue(c) => write!(f, "{:?} unknown field value", c),
            Self::BadUniformRange => write!(f, "invalid uniform register range"),
            Self::TooManyUniforms => write!(f, "uniform table above location limit"),
        }
    }
}

// =============================================================================
// ERROR CONVERSION
// =============================================================================

impl From<BinaryError> for Error {
    fn from(e: BinaryError) -> Self {
        Error::MalformedBinary(e)
    }
}

static_assertions::assert_impl_all!(Error: Send, Sync, Copy);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gl_codes() {
        assert_eq!(Error::InvalidEnum.gl_code(), 0x0500);
        assert_eq!(Error::InvalidValue.gl_code(), 0x0501);
        assert_eq!(Error::InvalidOperation.gl_code(), 0x0502);
        assert_eq!(Error::OutOfMemory.gl_code(), 0x0505);
        assert_eq!(Error::InvalidFramebufferOperation.gl_code(), 0x0506);
    }

    #[test]
    fn test_infrastructure_codes() {
        assert_eq!(Error::CommandBufferFull.gl_code(), GL_OUT_OF_MEMORY);
        assert_eq!(Error::StaleHandle.gl_code(), GL_INVALID_OPERATION);
        let e: Error = BinaryError::TooLarge.into();
        assert_eq!(e.gl_code(), GL_INVALID_VALUE);
    }
}
