//! # PICA200 Register Map
//!
//! Register IDs addressed by the command list processor. Only the registers
//! the GL layer programs are listed.

/// Register ID (10 bits)
pub type Reg = u16;

// =============================================================================
// MISC / RASTERIZER
// =============================================================================

/// Command list terminator
pub const FINALIZE: Reg = 0x010;
/// Magic value written to [`FINALIZE`]
pub const FINALIZE_MAGIC: u32 = 0x1234_5678;

/// Face culling mode
pub const FACECULLING_CONFIG: Reg = 0x040;
/// Viewport width (first of four incremental registers)
pub const VIEWPORT_WIDTH: Reg = 0x041;
/// Depth map scale (f24)
pub const DEPTHMAP_SCALE: Reg = 0x04D;
/// Depth map offset (f24)
pub const DEPTHMAP_OFFSET: Reg = 0x04E;
/// Number of shader output registers
pub const SH_OUTMAP_TOTAL: Reg = 0x04F;
/// First output semantic map register (seven incremental)
pub const SH_OUTMAP_O0: Reg = 0x050;
/// Early depth function
pub const EARLYDEPTH_FUNC: Reg = 0x061;
/// Early depth enable (rasterizer side)
pub const EARLYDEPTH_TEST1: Reg = 0x062;
/// Early depth buffer clear trigger
pub const EARLYDEPTH_CLEAR: Reg = 0x063;
/// Output attribute mode (texcoords in use)
pub const SH_OUTATTR_MODE: Reg = 0x064;
/// Scissor mode
pub const SCISSORTEST_MODE: Reg = 0x065;
/// Scissor origin
pub const SCISSORTEST_POS: Reg = 0x066;
/// Scissor far corner
pub const SCISSORTEST_DIM: Reg = 0x067;
/// Viewport origin
pub const VIEWPORT_XY: Reg = 0x068;
/// Early depth clear value
pub const EARLYDEPTH_DATA: Reg = 0x06A;
/// Depth map enable
pub const DEPTHMAP_ENABLE: Reg = 0x06D;
/// Render buffer dimensions
pub const RENDERBUF_DIM: Reg = 0x06E;
/// Output attribute clock
pub const SH_OUTATTR_CLOCK: Reg = 0x06F;

// =============================================================================
// TEXTURE COMBINERS
// =============================================================================

/// Base register of each of the six combiner stages
pub const TEXENV: [Reg; 6] = [0x0C0, 0x0C8, 0x0D0, 0x0D8, 0x0F0, 0x0F8];

// =============================================================================
// FRAMEBUFFER / PER-FRAGMENT
// =============================================================================

/// Fragment operation mode and blend enable
pub const COLOR_OPERATION: Reg = 0x100;
/// Blend equation and factors
pub const BLEND_FUNC: Reg = 0x101;
/// Logic operation
pub const LOGIC_OP: Reg = 0x102;
/// Constant blend color
pub const BLEND_COLOR: Reg = 0x103;
/// Alpha test
pub const FRAGOP_ALPHA_TEST: Reg = 0x104;
/// Stencil test
pub const STENCIL_TEST: Reg = 0x105;
/// Stencil operations
pub const STENCIL_OP: Reg = 0x106;
/// Depth test and color/depth write masks
pub const DEPTH_COLOR_MASK: Reg = 0x107;
/// Framebuffer cache invalidate
pub const FRAMEBUFFER_INVALIDATE: Reg = 0x110;
/// Framebuffer cache flush
pub const FRAMEBUFFER_FLUSH: Reg = 0x111;
/// Color buffer read enable (first of four)
pub const COLORBUFFER_READ: Reg = 0x112;
/// Depth buffer format
pub const DEPTHBUFFER_FORMAT: Reg = 0x116;
/// Color buffer format
pub const COLORBUFFER_FORMAT: Reg = 0x117;
/// Early depth enable (framebuffer side)
pub const EARLYDEPTH_TEST2: Reg = 0x118;
/// Block-32 tiling mode
pub const FRAMEBUFFER_BLOCK32: Reg = 0x11B;
/// Depth buffer location (first of three incremental)
pub const DEPTHBUFFER_LOC: Reg = 0x11C;
/// Color buffer location
pub const COLORBUFFER_LOC: Reg = 0x11D;
/// Framebuffer dimensions
pub const FRAMEBUFFER_DIM: Reg = 0x11E;

// =============================================================================
// GEOMETRY PIPELINE
// =============================================================================

/// Attribute buffers base
pub const ATTRIBBUFFERS_LOC: Reg = 0x200;
/// Attribute formats, slots 0-7
pub const ATTRIBBUFFERS_FORMAT_LOW: Reg = 0x201;
/// Attribute formats, slots 8-11, fixed mask and count
pub const ATTRIBBUFFERS_FORMAT_HIGH: Reg = 0x202;
/// First attribute buffer offset; each buffer spans three registers
pub const ATTRIBBUFFER0_OFFSET: Reg = 0x203;
/// Index buffer offset and type
pub const INDEXBUFFER_CONFIG: Reg = 0x227;
/// Vertex count
pub const NUMVERTICES: Reg = 0x228;
/// Geometry stage configuration
pub const GEOSTAGE_CONFIG: Reg = 0x229;
/// First vertex
pub const VERTEX_OFFSET: Reg = 0x22A;
/// Non-indexed draw trigger
pub const DRAWARRAYS: Reg = 0x22E;
/// Indexed draw trigger
pub const DRAWELEMENTS: Reg = 0x22F;
/// Vertex cache clear
pub const VTX_FUNC: Reg = 0x231;
/// Fixed attribute index
pub const FIXEDATTRIB_INDEX: Reg = 0x232;
/// Fixed attribute data (three incremental)
pub const FIXEDATTRIB_DATA0: Reg = 0x233;
/// Number of vertex shader input attributes
pub const VSH_NUM_ATTR: Reg = 0x242;
/// Shared vertex/geometry shader mode
pub const VSH_COM_MODE: Reg = 0x244;
/// Draw start gate
pub const START_DRAW_FUNC0: Reg = 0x245;
/// Vertex shader output count (first copy)
pub const VSH_OUTMAP_TOTAL1: Reg = 0x24A;
/// Vertex shader output count (second copy)
pub const VSH_OUTMAP_TOTAL2: Reg = 0x251;
/// Geometry shader misc 0
pub const GSH_MISC0: Reg = 0x252;
/// Geometry stage configuration 2
pub const GEOSTAGE_CONFIG2: Reg = 0x253;
/// Geometry shader misc 1
pub const GSH_MISC1: Reg = 0x254;
/// Primitive configuration
pub const PRIMITIVE_CONFIG: Reg = 0x25E;
/// Primitive restart
pub const RESTART_PRIMITIVE: Reg = 0x25F;

// =============================================================================
// SHADER UNITS
// =============================================================================

/// Register block of one programmable shader unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderUnitRegs {
    /// Boolean uniforms
    pub bool_uniform: Reg,
    /// First integer uniform (four consecutive)
    pub int_uniform_i0: Reg,
    /// Input buffer configuration
    pub inputbuffer_config: Reg,
    /// Code entry point
    pub entrypoint: Reg,
    /// Input permutation, attributes 0-7
    pub attributes_permutation_low: Reg,
    /// Input permutation, attributes 8-15
    pub attributes_permutation_high: Reg,
    /// Output register mask
    pub outmap_mask: Reg,
    /// Code upload end
    pub codetransfer_end: Reg,
    /// Float uniform index
    pub floatuniform_config: Reg,
    /// Float uniform data
    pub floatuniform_data: Reg,
    /// Code upload offset
    pub codetransfer_config: Reg,
    /// Code upload data
    pub codetransfer_data: Reg,
    /// Operand descriptor upload offset
    pub opdescs_config: Reg,
    /// Operand descriptor upload data
    pub opdescs_data: Reg,
}

/// Geometry shader unit
pub const GSH: ShaderUnitRegs = ShaderUnitRegs {
    bool_uniform: 0x280,
    int_uniform_i0: 0x281,
    inputbuffer_config: 0x289,
    entrypoint: 0x28A,
    attributes_permutation_low: 0x28B,
    attributes_permutation_high: 0x28C,
    outmap_mask: 0x28D,
    codetransfer_end: 0x28F,
    floatuniform_config: 0x290,
    floatuniform_data: 0x291,
    codetransfer_config: 0x29B,
    codetransfer_data: 0x29C,
    opdescs_config: 0x2A5,
    opdescs_data: 0x2A6,
};

/// Vertex shader unit
pub const VSH: ShaderUnitRegs = ShaderUnitRegs {
    bool_uniform: 0x2B0,
    int_uniform_i0: 0x2B1,
    inputbuffer_config: 0x2B9,
    entrypoint: 0x2BA,
    attributes_permutation_low: 0x2BB,
    attributes_permutation_high: 0x2BC,
    outmap_mask: 0x2BD,
    codetransfer_end: 0x2BF,
    floatuniform_config: 0x2C0,
    floatuniform_data: 0x2C1,
    codetransfer_config: 0x2CB,
    codetransfer_data: 0x2CC,
    opdescs_config: 0x2D5,
    opdescs_data: 0x2D6,
};
