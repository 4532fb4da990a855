//! # GL Enumerants
//!
//! Symbolic constants of the OpenGL ES 2.0 subset and the PICA200
//! extensions accepted by the GL layer.

use glass_core::{GLbitfield, GLenum};

// =============================================================================
// CLEAR BITS
// =============================================================================

/// Depth buffer clear bit
pub const GL_DEPTH_BUFFER_BIT: GLbitfield = 0x0000_0100;
/// Stencil buffer clear bit
pub const GL_STENCIL_BUFFER_BIT: GLbitfield = 0x0000_0400;
/// Color buffer clear bit
pub const GL_COLOR_BUFFER_BIT: GLbitfield = 0x0000_4000;
/// Early depth buffer clear bit (PICA)
pub const GL_EARLY_DEPTH_BUFFER_BIT_PICA: GLbitfield = 0x8000_0000;

// =============================================================================
// PRIMITIVES
// =============================================================================

/// Independent triangles
pub const GL_TRIANGLES: GLenum = 0x0004;
/// Triangle strip
pub const GL_TRIANGLE_STRIP: GLenum = 0x0005;
/// Triangle fan
pub const GL_TRIANGLE_FAN: GLenum = 0x0006;
/// Primitives assembled by the geometry shader (PICA)
pub const GL_GEOMETRY_PRIMITIVE_PICA: GLenum = 0x6010;

// =============================================================================
// BLENDING
// =============================================================================

/// Factor 0
pub const GL_ZERO: GLenum = 0;
/// Factor 1
pub const GL_ONE: GLenum = 1;
/// Source color
pub const GL_SRC_COLOR: GLenum = 0x0300;
/// 1 - source color
pub const GL_ONE_MINUS_SRC_COLOR: GLenum = 0x0301;
/// Source alpha
pub const GL_SRC_ALPHA: GLenum = 0x0302;
/// 1 - source alpha
pub const GL_ONE_MINUS_SRC_ALPHA: GLenum = 0x0303;
/// Destination alpha
pub const GL_DST_ALPHA: GLenum = 0x0304;
/// 1 - destination alpha
pub const GL_ONE_MINUS_DST_ALPHA: GLenum = 0x0305;
/// Destination color
pub const GL_DST_COLOR: GLenum = 0x0306;
/// 1 - destination color
pub const GL_ONE_MINUS_DST_COLOR: GLenum = 0x0307;
/// Saturated source alpha
pub const GL_SRC_ALPHA_SATURATE: GLenum = 0x0308;
/// Add equation
pub const GL_FUNC_ADD: GLenum = 0x8006;
/// Minimum equation
pub const GL_MIN: GLenum = 0x8007;
/// Maximum equation
pub const GL_MAX: GLenum = 0x8008;
/// Subtract equation
pub const GL_FUNC_SUBTRACT: GLenum = 0x800A;
/// Reverse subtract equation
pub const GL_FUNC_REVERSE_SUBTRACT: GLenum = 0x800B;
/// Constant color factor
pub const GL_CONSTANT_COLOR: GLenum = 0x8001;
/// 1 - constant color
pub const GL_ONE_MINUS_CONSTANT_COLOR: GLenum = 0x8002;
/// Constant alpha factor
pub const GL_CONSTANT_ALPHA: GLenum = 0x8003;
/// 1 - constant alpha
pub const GL_ONE_MINUS_CONSTANT_ALPHA: GLenum = 0x8004;
/// Blend color query
pub const GL_BLEND_COLOR: GLenum = 0x8005;
/// RGB blend equation query
pub const GL_BLEND_EQUATION_RGB: GLenum = 0x8009;
/// Alpha blend equation query
pub const GL_BLEND_EQUATION_ALPHA: GLenum = 0x883D;
/// Destination RGB factor query
pub const GL_BLEND_DST_RGB: GLenum = 0x80C8;
/// Source RGB factor query
pub const GL_BLEND_SRC_RGB: GLenum = 0x80C9;
/// Destination alpha factor query
pub const GL_BLEND_DST_ALPHA: GLenum = 0x80CA;
/// Source alpha factor query
pub const GL_BLEND_SRC_ALPHA: GLenum = 0x80CB;

// =============================================================================
// BUFFERS
// =============================================================================

/// Vertex data target
pub const GL_ARRAY_BUFFER: GLenum = 0x8892;
/// Index data target
pub const GL_ELEMENT_ARRAY_BUFFER: GLenum = 0x8893;
/// Array buffer binding query
pub const GL_ARRAY_BUFFER_BINDING: GLenum = 0x8894;
/// Element array buffer binding query
pub const GL_ELEMENT_ARRAY_BUFFER_BINDING: GLenum = 0x8895;
/// Stream usage
pub const GL_STREAM_DRAW: GLenum = 0x88E0;
/// Static usage
pub const GL_STATIC_DRAW: GLenum = 0x88E4;
/// Dynamic usage
pub const GL_DYNAMIC_DRAW: GLenum = 0x88E8;
/// Buffer size query
pub const GL_BUFFER_SIZE: GLenum = 0x8764;
/// Buffer usage query
pub const GL_BUFFER_USAGE: GLenum = 0x8765;

// =============================================================================
// CULLING / FACES
// =============================================================================

/// Front face
pub const GL_FRONT: GLenum = 0x0404;
/// Back face
pub const GL_BACK: GLenum = 0x0405;
/// Both faces
pub const GL_FRONT_AND_BACK: GLenum = 0x0408;
/// Clockwise winding
pub const GL_CW: GLenum = 0x0900;
/// Counter-clockwise winding
pub const GL_CCW: GLenum = 0x0901;

// =============================================================================
// CAPABILITIES
// =============================================================================

/// Face culling
pub const GL_CULL_FACE: GLenum = 0x0B44;
/// Depth test
pub const GL_DEPTH_TEST: GLenum = 0x0B71;
/// Stencil test
pub const GL_STENCIL_TEST: GLenum = 0x0B90;
/// Dithering (always off)
pub const GL_DITHER: GLenum = 0x0BD0;
/// Alpha test
pub const GL_ALPHA_TEST: GLenum = 0x0BC0;
/// Blending
pub const GL_BLEND: GLenum = 0x0BE2;
/// Logic operation
pub const GL_COLOR_LOGIC_OP: GLenum = 0x0BF2;
/// Scissor test
pub const GL_SCISSOR_TEST: GLenum = 0x0C11;
/// Polygon offset
pub const GL_POLYGON_OFFSET_FILL: GLenum = 0x8037;
/// Early depth test (PICA)
pub const GL_EARLY_DEPTH_TEST_PICA: GLenum = 0x6780;
/// Inverted scissor test (PICA)
pub const GL_SCISSOR_TEST_INVERTED_PICA: GLenum = 0x6E00;

// =============================================================================
// ERRORS / STRINGS
// =============================================================================

/// Vendor string
pub const GL_VENDOR: GLenum = 0x1F00;
/// Renderer string
pub const GL_RENDERER: GLenum = 0x1F01;
/// Version string
pub const GL_VERSION: GLenum = 0x1F02;
/// Extension list
pub const GL_EXTENSIONS: GLenum = 0x1F03;
/// Shading language version string
pub const GL_SHADING_LANGUAGE_VERSION: GLenum = 0x8B8C;

// =============================================================================
// STATE QUERIES
// =============================================================================

/// Line width
pub const GL_LINE_WIDTH: GLenum = 0x0B21;
/// Aliased point size range
pub const GL_ALIASED_POINT_SIZE_RANGE: GLenum = 0x846D;
/// Aliased line width range
pub const GL_ALIASED_LINE_WIDTH_RANGE: GLenum = 0x846E;
/// Cull face mode
pub const GL_CULL_FACE_MODE: GLenum = 0x0B45;
/// Front face winding
pub const GL_FRONT_FACE: GLenum = 0x0B46;
/// Depth range
pub const GL_DEPTH_RANGE: GLenum = 0x0B70;
/// Depth write mask
pub const GL_DEPTH_WRITEMASK: GLenum = 0x0B72;
/// Depth clear value
pub const GL_DEPTH_CLEAR_VALUE: GLenum = 0x0B73;
/// Depth function
pub const GL_DEPTH_FUNC: GLenum = 0x0B74;
/// Stencil clear value
pub const GL_STENCIL_CLEAR_VALUE: GLenum = 0x0B91;
/// Stencil function
pub const GL_STENCIL_FUNC: GLenum = 0x0B92;
/// Stencil value mask
pub const GL_STENCIL_VALUE_MASK: GLenum = 0x0B93;
/// Stencil fail op
pub const GL_STENCIL_FAIL: GLenum = 0x0B94;
/// Stencil depth fail op
pub const GL_STENCIL_PASS_DEPTH_FAIL: GLenum = 0x0B95;
/// Stencil depth pass op
pub const GL_STENCIL_PASS_DEPTH_PASS: GLenum = 0x0B96;
/// Stencil reference
pub const GL_STENCIL_REF: GLenum = 0x0B97;
/// Stencil write mask
pub const GL_STENCIL_WRITEMASK: GLenum = 0x0B98;
/// Viewport rectangle
pub const GL_VIEWPORT: GLenum = 0x0BA2;
/// Scissor rectangle
pub const GL_SCISSOR_BOX: GLenum = 0x0C10;
/// Clear color
pub const GL_COLOR_CLEAR_VALUE: GLenum = 0x0C22;
/// Color write mask
pub const GL_COLOR_WRITEMASK: GLenum = 0x0C23;
/// Polygon offset units
pub const GL_POLYGON_OFFSET_UNITS: GLenum = 0x2A00;
/// Polygon offset factor
pub const GL_POLYGON_OFFSET_FACTOR: GLenum = 0x8038;
/// Current program query
pub const GL_CURRENT_PROGRAM: GLenum = 0x8B8D;
/// Framebuffer binding query
pub const GL_FRAMEBUFFER_BINDING: GLenum = 0x8CA6;
/// Renderbuffer binding query
pub const GL_RENDERBUFFER_BINDING: GLenum = 0x8CA7;

// =============================================================================
// TEST FUNCTIONS
// =============================================================================

/// Never pass
pub const GL_NEVER: GLenum = 0x0200;
/// Pass if less
pub const GL_LESS: GLenum = 0x0201;
/// Pass if equal
pub const GL_EQUAL: GLenum = 0x0202;
/// Pass if less or equal
pub const GL_LEQUAL: GLenum = 0x0203;
/// Pass if greater
pub const GL_GREATER: GLenum = 0x0204;
/// Pass if not equal
pub const GL_NOTEQUAL: GLenum = 0x0205;
/// Pass if greater or equal
pub const GL_GEQUAL: GLenum = 0x0206;
/// Always pass
pub const GL_ALWAYS: GLenum = 0x0207;

// =============================================================================
// STENCIL OPS
// =============================================================================

/// Keep value
pub const GL_KEEP: GLenum = 0x1E00;
/// Replace with reference
pub const GL_REPLACE: GLenum = 0x1E01;
/// Saturating increment
pub const GL_INCR: GLenum = 0x1E02;
/// Saturating decrement
pub const GL_DECR: GLenum = 0x1E03;
/// Bitwise invert
pub const GL_INVERT: GLenum = 0x150A;
/// Wrapping increment
pub const GL_INCR_WRAP: GLenum = 0x8507;
/// Wrapping decrement
pub const GL_DECR_WRAP: GLenum = 0x8508;

// =============================================================================
// LOGIC OPS
// =============================================================================

/// 0
pub const GL_CLEAR: GLenum = 0x1500;
/// s & d
pub const GL_AND: GLenum = 0x1501;
/// s & !d
pub const GL_AND_REVERSE: GLenum = 0x1502;
/// s
pub const GL_COPY: GLenum = 0x1503;
/// !s & d
pub const GL_AND_INVERTED: GLenum = 0x1504;
/// d
pub const GL_NOOP: GLenum = 0x1505;
/// s ^ d
pub const GL_XOR: GLenum = 0x1506;
/// s | d
pub const GL_OR: GLenum = 0x1507;
/// !(s | d)
pub const GL_NOR: GLenum = 0x1508;
/// !(s ^ d)
pub const GL_EQUIV: GLenum = 0x1509;
/// s | !d
pub const GL_OR_REVERSE: GLenum = 0x150B;
/// !s
pub const GL_COPY_INVERTED: GLenum = 0x150C;
/// !s | d
pub const GL_OR_INVERTED: GLenum = 0x150D;
/// !(s & d)
pub const GL_NAND: GLenum = 0x150E;
/// 1
pub const GL_SET: GLenum = 0x150F;
/// Logic op query
pub const GL_LOGIC_OP_MODE: GLenum = 0x0BF0;

// =============================================================================
// DATA TYPES
// =============================================================================

/// Signed byte
pub const GL_BYTE: GLenum = 0x1400;
/// Unsigned byte
pub const GL_UNSIGNED_BYTE: GLenum = 0x1401;
/// Signed short
pub const GL_SHORT: GLenum = 0x1402;
/// Unsigned short
pub const GL_UNSIGNED_SHORT: GLenum = 0x1403;
/// Float
pub const GL_FLOAT: GLenum = 0x1406;
/// vec4 uniform
pub const GL_FLOAT_VEC4: GLenum = 0x8B52;
/// ivec4 uniform
pub const GL_INT_VEC4: GLenum = 0x8B55;
/// bool uniform
pub const GL_BOOL: GLenum = 0x8B56;

// =============================================================================
// SHADERS / PROGRAMS
// =============================================================================

/// Fragment shader (not supported)
pub const GL_FRAGMENT_SHADER: GLenum = 0x8B30;
/// Vertex shader
pub const GL_VERTEX_SHADER: GLenum = 0x8B31;
/// Geometry shader (PICA)
pub const GL_GEOMETRY_SHADER_PICA: GLenum = 0x6001;
/// Shader binary format (PICA)
pub const GL_SHADER_BINARY_PICA: GLenum = 0x6000;
/// Shader type query
pub const GL_SHADER_TYPE: GLenum = 0x8B4F;
/// Delete status query
pub const GL_DELETE_STATUS: GLenum = 0x8B80;
/// Compile status query
pub const GL_COMPILE_STATUS: GLenum = 0x8B81;
/// Link status query
pub const GL_LINK_STATUS: GLenum = 0x8B82;
/// Validate status query
pub const GL_VALIDATE_STATUS: GLenum = 0x8B83;
/// Info log length query
pub const GL_INFO_LOG_LENGTH: GLenum = 0x8B84;
/// Attached shader count query
pub const GL_ATTACHED_SHADERS: GLenum = 0x8B85;
/// Active uniform count query
pub const GL_ACTIVE_UNIFORMS: GLenum = 0x8B86;
/// Longest active uniform name query
pub const GL_ACTIVE_UNIFORM_MAX_LENGTH: GLenum = 0x8B87;
/// Shader source length query
pub const GL_SHADER_SOURCE_LENGTH: GLenum = 0x8B88;

// =============================================================================
// VERTEX ATTRIBUTES
// =============================================================================

/// Array enabled
pub const GL_VERTEX_ATTRIB_ARRAY_ENABLED: GLenum = 0x8622;
/// Component count
pub const GL_VERTEX_ATTRIB_ARRAY_SIZE: GLenum = 0x8623;
/// Stride
pub const GL_VERTEX_ATTRIB_ARRAY_STRIDE: GLenum = 0x8624;
/// Component type
pub const GL_VERTEX_ATTRIB_ARRAY_TYPE: GLenum = 0x8625;
/// Fixed attribute value
pub const GL_CURRENT_VERTEX_ATTRIB: GLenum = 0x8626;
/// Array pointer
pub const GL_VERTEX_ATTRIB_ARRAY_POINTER: GLenum = 0x8645;
/// Normalized flag
pub const GL_VERTEX_ATTRIB_ARRAY_NORMALIZED: GLenum = 0x886A;
/// Bound buffer
pub const GL_VERTEX_ATTRIB_ARRAY_BUFFER_BINDING: GLenum = 0x889F;

// =============================================================================
// FRAMEBUFFERS
// =============================================================================

/// Framebuffer target
pub const GL_FRAMEBUFFER: GLenum = 0x8D40;
/// Renderbuffer target
pub const GL_RENDERBUFFER: GLenum = 0x8D41;
/// Color attachment point
pub const GL_COLOR_ATTACHMENT0: GLenum = 0x8CE0;
/// Depth attachment point
pub const GL_DEPTH_ATTACHMENT: GLenum = 0x8D00;
/// Stencil attachment point
pub const GL_STENCIL_ATTACHMENT: GLenum = 0x8D20;
/// Complete
pub const GL_FRAMEBUFFER_COMPLETE: GLenum = 0x8CD5;
/// Attachment without storage
pub const GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT: GLenum = 0x8CD6;
/// No attachment
pub const GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT: GLenum = 0x8CD7;
/// Attachment size mismatch
pub const GL_FRAMEBUFFER_INCOMPLETE_DIMENSIONS: GLenum = 0x8CD9;
/// No framebuffer bound
pub const GL_FRAMEBUFFER_UNSUPPORTED: GLenum = 0x8CDD;
/// Renderbuffer width query
pub const GL_RENDERBUFFER_WIDTH: GLenum = 0x8D42;
/// Renderbuffer height query
pub const GL_RENDERBUFFER_HEIGHT: GLenum = 0x8D43;
/// Renderbuffer format query
pub const GL_RENDERBUFFER_INTERNAL_FORMAT: GLenum = 0x8D44;
/// Red bits query
pub const GL_RENDERBUFFER_RED_SIZE: GLenum = 0x8D50;
/// Green bits query
pub const GL_RENDERBUFFER_GREEN_SIZE: GLenum = 0x8D51;
/// Blue bits query
pub const GL_RENDERBUFFER_BLUE_SIZE: GLenum = 0x8D52;
/// Alpha bits query
pub const GL_RENDERBUFFER_ALPHA_SIZE: GLenum = 0x8D53;
/// Depth bits query
pub const GL_RENDERBUFFER_DEPTH_SIZE: GLenum = 0x8D54;
/// Stencil bits query
pub const GL_RENDERBUFFER_STENCIL_SIZE: GLenum = 0x8D55;

/// 32-bit RGBA color
pub const GL_RGBA8_OES: GLenum = 0x8058;
/// 24-bit RGB color
pub const GL_RGB8_OES: GLenum = 0x8051;
/// 16-bit RGBA color
pub const GL_RGBA4: GLenum = 0x8056;
/// 16-bit RGBA color with 1-bit alpha
pub const GL_RGB5_A1: GLenum = 0x8057;
/// 16-bit RGB color
pub const GL_RGB565: GLenum = 0x8D62;
/// 16-bit depth
pub const GL_DEPTH_COMPONENT16: GLenum = 0x81A5;
/// 24-bit depth
pub const GL_DEPTH_COMPONENT24_OES: GLenum = 0x81A6;
/// 24-bit depth with 8-bit stencil
pub const GL_DEPTH24_STENCIL8_OES: GLenum = 0x88F0;

// =============================================================================
// TEXTURE COMBINERS
// =============================================================================

/// First texture unit
pub const GL_TEXTURE0: GLenum = 0x84C0;
/// Second texture unit
pub const GL_TEXTURE1: GLenum = 0x84C1;
/// Third texture unit
pub const GL_TEXTURE2: GLenum = 0x84C2;
/// Fourth texture unit
pub const GL_TEXTURE3: GLenum = 0x84C3;
/// Add function
pub const GL_ADD: GLenum = 0x0104;
/// Modulate function
pub const GL_MODULATE: GLenum = 0x2100;
/// Subtract function
pub const GL_SUBTRACT: GLenum = 0x84E7;
/// RGB function selector
pub const GL_COMBINE_RGB: GLenum = 0x8571;
/// Alpha function selector
pub const GL_COMBINE_ALPHA: GLenum = 0x8572;
/// RGB scale selector
pub const GL_RGB_SCALE: GLenum = 0x8573;
/// Alpha scale selector
pub const GL_ALPHA_SCALE: GLenum = 0x0D1C;
/// Signed add function
pub const GL_ADD_SIGNED: GLenum = 0x8574;
/// Interpolate function
pub const GL_INTERPOLATE: GLenum = 0x8575;
/// Constant color source
pub const GL_CONSTANT: GLenum = 0x8576;
/// Primary color source
pub const GL_PRIMARY_COLOR: GLenum = 0x8577;
/// Previous stage source
pub const GL_PREVIOUS: GLenum = 0x8578;
/// First RGB source
pub const GL_SRC0_RGB: GLenum = 0x8580;
/// Second RGB source
pub const GL_SRC1_RGB: GLenum = 0x8581;
/// Third RGB source
pub const GL_SRC2_RGB: GLenum = 0x8582;
/// First alpha source
pub const GL_SRC0_ALPHA: GLenum = 0x8588;
/// Second alpha source
pub const GL_SRC1_ALPHA: GLenum = 0x8589;
/// Third alpha source
pub const GL_SRC2_ALPHA: GLenum = 0x858A;
/// First RGB operand
pub const GL_OPERAND0_RGB: GLenum = 0x8590;
/// Second RGB operand
pub const GL_OPERAND1_RGB: GLenum = 0x8591;
/// Third RGB operand
pub const GL_OPERAND2_RGB: GLenum = 0x8592;
/// First alpha operand
pub const GL_OPERAND0_ALPHA: GLenum = 0x8598;
/// Second alpha operand
pub const GL_OPERAND1_ALPHA: GLenum = 0x8599;
/// Third alpha operand
pub const GL_OPERAND2_ALPHA: GLenum = 0x859A;
/// Dot product of RGB
pub const GL_DOT3_RGB: GLenum = 0x86AE;
/// Dot product replicated to alpha
pub const GL_DOT3_RGBA: GLenum = 0x86AF;

/// Fragment primary color source (PICA)
pub const GL_FRAGMENT_PRIMARY_COLOR_PICA: GLenum = 0x6210;
/// Fragment secondary color source (PICA)
pub const GL_FRAGMENT_SECONDARY_COLOR_PICA: GLenum = 0x6211;
/// Multiply-add function (PICA)
pub const GL_MULT_ADD_PICA: GLenum = 0x6401;
/// Add-multiply function (PICA)
pub const GL_ADD_MULT_PICA: GLenum = 0x6402;
/// Previous buffer source (PICA)
pub const GL_PREVIOUS_BUFFER_PICA: GLenum = 0x6403;
/// Red channel operand (PICA)
pub const GL_SRC_R_PICA: GLenum = 0x6404;
/// Green channel operand (PICA)
pub const GL_SRC_G_PICA: GLenum = 0x6405;
/// Blue channel operand (PICA)
pub const GL_SRC_B_PICA: GLenum = 0x6406;
/// Inverted red operand (PICA)
pub const GL_ONE_MINUS_SRC_R_PICA: GLenum = 0x6407;
/// Inverted green operand (PICA)
pub const GL_ONE_MINUS_SRC_G_PICA: GLenum = 0x6408;
/// Inverted blue operand (PICA)
pub const GL_ONE_MINUS_SRC_B_PICA: GLenum = 0x6409;

// =============================================================================
// PICA FRAGMENT / FRAMEBUFFER MODES
// =============================================================================

/// Standard fragment pipeline (PICA)
pub const GL_FRAGOP_MODE_DEFAULT_PICA: GLenum = 0x6030;
/// Shadow map rendering (PICA)
pub const GL_FRAGOP_MODE_SHADOW_PICA: GLenum = 0x6048;
/// Gas accumulation (PICA)
pub const GL_FRAGOP_MODE_GAS_PICA: GLenum = 0x6051;
/// 8x8 tiled framebuffer (PICA)
pub const GL_BLOCK8_PICA: GLenum = 0x6789;
/// 32x32 tiled framebuffer (PICA)
pub const GL_BLOCK32_PICA: GLenum = 0x678A;
