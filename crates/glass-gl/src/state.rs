//! # Context State
//!
//! CPU-side model of everything a GL context configures on the GPU. Setters
//! mutate this model and raise [`DirtyFlags`]; the resolver later turns the
//! dirty groups into register writes.

use glass_cmd::{CommandBuffer, TransferQueue};
use glass_core::{Error, GLenum, GLint, GLsizei, GLuint, PhysAddr, Screen, Side, TransferScale};

use bitflags::bitflags;

use crate::enums::*;
use crate::object::{BufferHandle, FramebufferHandle, ProgramHandle, RenderbufferHandle};
use crate::translate::ScissorMode;

// =============================================================================
// LIMITS
// =============================================================================

/// Vertex attribute registers
pub const NUM_ATTRIBS: usize = 16;
/// Attribute slots consumed by the vertex loader
pub const NUM_ATTRIB_SLOTS: usize = 12;
/// Texture combiner stages
pub const NUM_COMBINER_STAGES: usize = 6;

// =============================================================================
// DIRTY FLAGS
// =============================================================================

bitflags! {
    /// State groups that differ from what the GPU was last given
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u32 {
        /// Render target changed
        const FRAMEBUFFER = 1 << 0;
        /// A draw was issued since the last cache flush
        const DRAW = 1 << 1;
        /// Viewport changed
        const VIEWPORT = 1 << 2;
        /// Scissor changed
        const SCISSOR = 1 << 3;
        /// Vertex attributes changed
        const ATTRIBS = 1 << 4;
        /// Current program changed
        const PROGRAM = 1 << 5;
        /// Texture combiners changed
        const COMBINERS = 1 << 6;
        /// Fragment mode or blend enable changed
        const FRAGMENT = 1 << 7;
        /// Polygon offset or depth range changed
        const DEPTHMAP = 1 << 8;
        /// Color mask or depth test changed
        const COLOR_DEPTH = 1 << 9;
        /// Early depth test changed
        const EARLY_DEPTH = 1 << 10;
        /// Early depth buffer clear requested
        const EARLY_DEPTH_CLEAR = 1 << 11;
        /// Stencil test changed
        const STENCIL = 1 << 12;
        /// Face culling changed
        const CULL_FACE = 1 << 13;
        /// Alpha test changed
        const ALPHA = 1 << 14;
        /// Blending or logic op changed
        const BLEND = 1 << 15;
    }
}

impl Default for DirtyFlags {
    fn default() -> Self {
        DirtyFlags::empty()
    }
}

// =============================================================================
// STATE BLOCKS
// =============================================================================

/// Window-space rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge
    pub x: GLint,
    /// Bottom edge
    pub y: GLint,
    /// Width
    pub width: GLsizei,
    /// Height
    pub height: GLsizei,
}

/// Vertex attribute register
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attrib {
    /// Component type
    pub ty: GLenum,
    /// Components per vertex
    pub count: u32,
    /// Bytes between vertices, 0 when tightly packed
    pub stride: u32,
    /// Source buffer
    pub buffer: Option<BufferHandle>,
    /// Data address, null for a fixed attribute
    pub phys: PhysAddr,
    /// Fixed value
    pub components: [f32; 4],
}

impl Default for Attrib {
    fn default() -> Self {
        Self {
            ty: GL_FLOAT,
            count: 4,
            stride: 0,
            buffer: None,
            phys: PhysAddr::null(),
            components: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// One texture combiner stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combiner {
    /// Color sources
    pub rgb_src: [GLenum; 3],
    /// Alpha sources
    pub alpha_src: [GLenum; 3],
    /// Color operands
    pub rgb_op: [GLenum; 3],
    /// Alpha operands
    pub alpha_op: [GLenum; 3],
    /// Color function
    pub rgb_func: GLenum,
    /// Alpha function
    pub alpha_func: GLenum,
    /// Color scale
    pub rgb_scale: f32,
    /// Alpha scale
    pub alpha_scale: f32,
    /// Constant color, `0xRRGGBBAA`
    pub color: u32,
}

impl Combiner {
    /// Pass-through stage; the first stage reads the primary color and the
    /// others forward the previous stage
    pub fn new(stage: usize) -> Self {
        let first = if stage == 0 { GL_PRIMARY_COLOR } else { GL_PREVIOUS };
        let src = [first, GL_PRIMARY_COLOR, GL_PRIMARY_COLOR];
        Self {
            rgb_src: src,
            alpha_src: src,
            rgb_op: [GL_SRC_COLOR; 3],
            alpha_op: [GL_SRC_ALPHA; 3],
            rgb_func: GL_REPLACE,
            alpha_func: GL_REPLACE,
            rgb_scale: 1.0,
            alpha_scale: 1.0,
            color: 0xFFFF_FFFF,
        }
    }
}

/// Color write mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMask {
    /// Red
    pub r: bool,
    /// Green
    pub g: bool,
    /// Blue
    pub b: bool,
    /// Alpha
    pub a: bool,
}

impl Default for ColorMask {
    fn default() -> Self {
        Self {
            r: true,
            g: true,
            b: true,
            a: true,
        }
    }
}

/// Depth test and depth range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthState {
    /// Test enabled
    pub test: bool,
    /// Comparison function
    pub func: GLenum,
    /// Depth writes enabled
    pub write: bool,
    /// Near plane
    pub near: f32,
    /// Far plane
    pub far: f32,
}

impl Default for DepthState {
    fn default() -> Self {
        Self {
            test: false,
            func: GL_LESS,
            write: true,
            near: 0.0,
            far: 1.0,
        }
    }
}

/// Polygon offset
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolygonOffset {
    /// Offset enabled
    pub enabled: bool,
    /// Slope factor (unused by the hardware)
    pub factor: f32,
    /// Constant offset in depth units
    pub units: f32,
}

/// Early depth test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarlyDepth {
    /// Test enabled
    pub test: bool,
    /// Comparison function
    pub func: GLenum,
    /// Clear value
    pub clear: f32,
}

impl Default for EarlyDepth {
    fn default() -> Self {
        Self {
            test: false,
            func: GL_LESS,
            clear: 1.0,
        }
    }
}

/// Stencil test and operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilState {
    /// Test enabled
    pub test: bool,
    /// Comparison function
    pub func: GLenum,
    /// Reference value
    pub reference: GLint,
    /// Comparison mask
    pub mask: GLuint,
    /// Write mask
    pub write_mask: GLuint,
    /// Action on stencil fail
    pub fail: GLenum,
    /// Action on depth fail
    pub depth_fail: GLenum,
    /// Action on depth pass
    pub depth_pass: GLenum,
}

impl Default for StencilState {
    fn default() -> Self {
        Self {
            test: false,
            func: GL_ALWAYS,
            reference: 0,
            mask: 0xFFFF_FFFF,
            write_mask: 0xFFFF_FFFF,
            fail: GL_KEEP,
            depth_fail: GL_KEEP,
            depth_pass: GL_KEEP,
        }
    }
}

/// Face culling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CullState {
    /// Culling enabled
    pub enabled: bool,
    /// Culled face
    pub mode: GLenum,
    /// Front face winding
    pub front: GLenum,
}

impl Default for CullState {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: GL_BACK,
            front: GL_CCW,
        }
    }
}

/// Alpha test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaState {
    /// Test enabled
    pub test: bool,
    /// Comparison function
    pub func: GLenum,
    /// Reference value
    pub reference: f32,
}

impl Default for AlphaState {
    fn default() -> Self {
        Self {
            test: false,
            func: GL_ALWAYS,
            reference: 0.0,
        }
    }
}

/// Blending and logic op; exactly one of the two is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendState {
    /// Blending active (logic op otherwise)
    pub enabled: bool,
    /// Constant color, `0xRRGGBBAA`
    pub color: u32,
    /// Color equation
    pub eq_rgb: GLenum,
    /// Alpha equation
    pub eq_alpha: GLenum,
    /// Color source factor
    pub src_rgb: GLenum,
    /// Color destination factor
    pub dst_rgb: GLenum,
    /// Alpha source factor
    pub src_alpha: GLenum,
    /// Alpha destination factor
    pub dst_alpha: GLenum,
    /// Logic operation
    pub logic_op: GLenum,
}

impl Default for BlendState {
    fn default() -> Self {
        Self {
            enabled: false,
            color: 0,
            eq_rgb: GL_FUNC_ADD,
            eq_alpha: GL_FUNC_ADD,
            src_rgb: GL_ONE,
            dst_rgb: GL_ZERO,
            src_alpha: GL_ONE,
            dst_alpha: GL_ZERO,
            logic_op: GL_COPY,
        }
    }
}

/// Presentation settings the application may change at any time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContextSettings {
    /// Screen shown by swap
    pub target_screen: Screen,
    /// Eye of the top screen
    pub target_side: Side,
    /// Downscaling applied by the display transfer
    pub transfer_scale: TransferScale,
}

// =============================================================================
// CONTEXT
// =============================================================================

/// A GL context
#[derive(Debug)]
pub struct Context {
    /// Presentation settings
    pub settings: ContextSettings,
    /// First error since the last query
    error: Option<Error>,
    /// Register writes
    pub cmd: CommandBuffer,
    /// Fills, transfers and command lists for the GX engine
    pub queue: TransferQueue,
    /// Groups awaiting resolve
    pub dirty: DirtyFlags,

    /// ARRAY_BUFFER binding
    pub array_buffer: Option<BufferHandle>,
    /// ELEMENT_ARRAY_BUFFER binding
    pub element_buffer: Option<BufferHandle>,
    /// Draw target
    pub framebuffer: Option<FramebufferHandle>,
    /// RENDERBUFFER binding
    pub renderbuffer: Option<RenderbufferHandle>,

    /// Clear color, `0xRRGGBBAA`
    pub clear_color: u32,
    /// Clear depth
    pub clear_depth: f32,
    /// Clear stencil
    pub clear_stencil: GLint,
    /// 32x32 tiling
    pub block32: bool,

    /// Viewport
    pub viewport: Rect,
    /// Scissor mode
    pub scissor_mode: ScissorMode,
    /// Scissor rectangle
    pub scissor: Rect,

    /// Current program
    pub program: Option<ProgramHandle>,

    /// Attribute registers
    pub attribs: [Attrib; NUM_ATTRIBS],
    /// Register index feeding each slot
    pub attrib_slots: [Option<u8>; NUM_ATTRIB_SLOTS],

    /// Stage edited by the combiner setters
    pub combiner_stage: usize,
    /// Combiner stages
    pub combiners: [Combiner; NUM_COMBINER_STAGES],

    /// Fragment pipeline mode
    pub frag_mode: GLenum,
    /// Color write mask
    pub color_mask: ColorMask,
    /// Depth test
    pub depth: DepthState,
    /// Polygon offset
    pub polygon_offset: PolygonOffset,
    /// Early depth test
    pub early_depth: EarlyDepth,
    /// Stencil test
    pub stencil: StencilState,
    /// Face culling
    pub cull: CullState,
    /// Alpha test
    pub alpha: AlphaState,
    /// Blending
    pub blend: BlendState,
}

impl Context {
    /// Create a context with GL defaults and every group dirty
    pub fn new(command_capacity: usize, settings: ContextSettings) -> Self {
        Self {
            settings,
            error: None,
            cmd: CommandBuffer::new(command_capacity),
            queue: TransferQueue::new(),
            dirty: DirtyFlags::all(),
            array_buffer: None,
            element_buffer: None,
            framebuffer: None,
            renderbuffer: None,
            clear_color: 0,
            clear_depth: 1.0,
            clear_stencil: 0,
            block32: false,
            viewport: Rect::default(),
            scissor_mode: ScissorMode::Disable,
            scissor: Rect::default(),
            program: None,
            attribs: [Attrib::default(); NUM_ATTRIBS],
            attrib_slots: [None; NUM_ATTRIB_SLOTS],
            combiner_stage: 0,
            combiners: core::array::from_fn(Combiner::new),
            frag_mode: GL_FRAGOP_MODE_DEFAULT_PICA,
            color_mask: ColorMask::default(),
            depth: DepthState::default(),
            polygon_offset: PolygonOffset::default(),
            early_depth: EarlyDepth::default(),
            stencil: StencilState::default(),
            cull: CullState::default(),
            alpha: AlphaState::default(),
            blend: BlendState::default(),
        }
    }

    /// Record an error unless one is already pending
    pub fn set_error(&mut self, error: Error) {
        if self.error.is_none() {
            log::debug!("GL error: {}", error);
            self.error = Some(error);
        }
    }

    /// Pending error, without clearing it
    #[inline]
    pub fn pending_error(&self) -> Option<Error> {
        self.error
    }

    /// Return and clear the pending error code
    pub fn take_error(&mut self) -> GLenum {
        self.error.take().map_or(glass_core::error::GL_NO_ERROR, Error::gl_code)
    }

    /// Combiner edited by the combiner setters
    #[inline]
    pub fn active_combiner(&mut self) -> &mut Combiner {
        &mut self.combiners[self.combiner_stage]
    }

    /// Slot holding an attribute register, if enabled
    pub fn attrib_slot(&self, index: usize) -> Option<usize> {
        self.attrib_slots
            .iter()
            .position(|slot| *slot == Some(index as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_defaults() {
        let ctx = Context::new(0x100, ContextSettings::default());
        assert_eq!(ctx.dirty, DirtyFlags::all());
        assert_eq!(ctx.clear_depth, 1.0);
        assert_eq!(ctx.stencil.mask, 0xFFFF_FFFF);
        assert_eq!(ctx.depth.func, GL_LESS);
        assert_eq!(ctx.early_depth.clear, 1.0);
        assert!(ctx.attrib_slots.iter().all(Option::is_none));
        assert_eq!(ctx.attribs[3].components, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(ctx.combiners[0].rgb_src[0], GL_PRIMARY_COLOR);
        assert_eq!(ctx.combiners[5].rgb_src[0], GL_PREVIOUS);
        assert_eq!(ctx.frag_mode, GL_FRAGOP_MODE_DEFAULT_PICA);
        assert!(!ctx.blend.enabled);
        assert_eq!(ctx.blend.logic_op, GL_COPY);
    }

    #[test]
    fn test_first_error_wins() {
        let mut ctx = Context::new(0x100, ContextSettings::default());
        ctx.set_error(Error::InvalidEnum);
        ctx.set_error(Error::InvalidValue);
        assert_eq!(ctx.take_error(), glass_core::error::GL_INVALID_ENUM);
        assert_eq!(ctx.take_error(), glass_core::error::GL_NO_ERROR);
    }

    #[test]
    fn test_attrib_slot_lookup() {
        let mut ctx = Context::new(0x100, ContextSettings::default());
        ctx.attrib_slots[2] = Some(7);
        assert_eq!(ctx.attrib_slot(7), Some(2));
        assert_eq!(ctx.attrib_slot(0), None);
    }
}
