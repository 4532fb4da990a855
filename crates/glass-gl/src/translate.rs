//! # Format Translation
//!
//! Stateless mapping of GL enumerants and values to PICA200 encodings:
//! comparison functions, blend and combiner parameters, pixel formats and
//! the 24-bit float vector format used by shader uniforms.
//!
//! ```text
//!   f24:   23   22      16 15              0
//!        +----+----------+-----------------+
//!        |sign| exp (7)  |  mantissa (16)  |
//!        +----+----------+-----------------+
//!
//!   packed vec4 (3 words):
//!        p0 = w << 8  | z >> 16
//!        p1 = z << 16 | y >> 8
//!        p2 = y << 24 | x
//! ```

use glass_core::{Error, GLclampf, GLenum, Result};

use crate::enums::*;

// =============================================================================
// GPU ENCODINGS
// =============================================================================

/// Primitive topology codes
pub mod primitive {
    /// Independent triangles
    pub const TRIANGLES: u32 = 0x0000;
    /// Triangle strip
    pub const TRIANGLE_STRIP: u32 = 0x0100;
    /// Triangle fan
    pub const TRIANGLE_FAN: u32 = 0x0200;
    /// Geometry shader primitive
    pub const GEOMETRY_PRIM: u32 = 0x0300;
}

/// Scissor modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum ScissorMode {
    /// Scissor off
    #[default]
    Disable = 0,
    /// Discard inside the rectangle
    Invert = 1,
    /// Discard outside the rectangle
    Normal = 3,
}

/// Cull modes written to the face culling register
pub mod cull {
    /// No culling
    pub const NONE: u32 = 0;
    /// Cull counter-clockwise front faces
    pub const FRONT_CCW: u32 = 1;
    /// Cull counter-clockwise back faces
    pub const BACK_CCW: u32 = 2;
}

// =============================================================================
// PER-FRAGMENT STATE
// =============================================================================

/// Check a depth, alpha or stencil comparison function
pub fn is_test_func(func: GLenum) -> bool {
    (GL_NEVER..=GL_ALWAYS).contains(&func)
}

/// Comparison function
pub fn test_func(func: GLenum) -> Result<u32> {
    Ok(match func {
        GL_NEVER => 0,
        GL_ALWAYS => 1,
        GL_EQUAL => 2,
        GL_NOTEQUAL => 3,
        GL_LESS => 4,
        GL_LEQUAL => 5,
        GL_GREATER => 6,
        GL_GEQUAL => 7,
        _ => return Err(Error::InvalidEnum),
    })
}

/// Early depth comparison function
pub fn early_depth_func(func: GLenum) -> Result<u32> {
    Ok(match func {
        GL_GEQUAL => 0,
        GL_GREATER => 1,
        GL_LEQUAL => 2,
        GL_LESS => 3,
        _ => return Err(Error::InvalidEnum),
    })
}

/// Stencil operation
pub fn stencil_op(op: GLenum) -> Result<u32> {
    Ok(match op {
        GL_KEEP => 0,
        GL_ZERO => 1,
        GL_REPLACE => 2,
        GL_INCR => 3,
        GL_DECR => 4,
        GL_INVERT => 5,
        GL_INCR_WRAP => 6,
        GL_DECR_WRAP => 7,
        _ => return Err(Error::InvalidEnum),
    })
}

/// Blend equation
pub fn blend_equation(eq: GLenum) -> Result<u32> {
    Ok(match eq {
        GL_FUNC_ADD => 0,
        GL_FUNC_SUBTRACT => 1,
        GL_FUNC_REVERSE_SUBTRACT => 2,
        GL_MIN => 3,
        GL_MAX => 4,
        _ => return Err(Error::InvalidEnum),
    })
}

/// Blend factor
pub fn blend_factor(factor: GLenum) -> Result<u32> {
    Ok(match factor {
        GL_ZERO => 0,
        GL_ONE => 1,
        GL_SRC_COLOR => 2,
        GL_ONE_MINUS_SRC_COLOR => 3,
        GL_DST_COLOR => 4,
        GL_ONE_MINUS_DST_COLOR => 5,
        GL_SRC_ALPHA => 6,
        GL_ONE_MINUS_SRC_ALPHA => 7,
        GL_DST_ALPHA => 8,
        GL_ONE_MINUS_DST_ALPHA => 9,
        GL_CONSTANT_COLOR => 10,
        GL_ONE_MINUS_CONSTANT_COLOR => 11,
        GL_CONSTANT_ALPHA => 12,
        GL_ONE_MINUS_CONSTANT_ALPHA => 13,
        GL_SRC_ALPHA_SATURATE => 14,
        _ => return Err(Error::InvalidEnum),
    })
}

/// Logic operation
pub fn logic_op(op: GLenum) -> Result<u32> {
    Ok(match op {
        GL_CLEAR => 0,
        GL_AND => 1,
        GL_AND_REVERSE => 2,
        GL_COPY => 3,
        GL_SET => 4,
        GL_COPY_INVERTED => 5,
        GL_NOOP => 6,
        GL_INVERT => 7,
        GL_NAND => 8,
        GL_OR => 9,
        GL_NOR => 10,
        GL_XOR => 11,
        GL_EQUIV => 12,
        GL_AND_INVERTED => 13,
        GL_OR_REVERSE => 14,
        GL_OR_INVERTED => 15,
        _ => return Err(Error::InvalidEnum),
    })
}

/// Fragment operation mode
pub fn frag_mode(mode: GLenum) -> Result<u32> {
    Ok(match mode {
        GL_FRAGOP_MODE_DEFAULT_PICA => 0,
        GL_FRAGOP_MODE_GAS_PICA => 1,
        GL_FRAGOP_MODE_SHADOW_PICA => 3,
        _ => return Err(Error::InvalidEnum),
    })
}

// =============================================================================
// TEXTURE COMBINERS
// =============================================================================

/// Combiner source
pub fn combiner_src(src: GLenum) -> Result<u32> {
    Ok(match src {
        GL_PRIMARY_COLOR => 0x0,
        GL_FRAGMENT_PRIMARY_COLOR_PICA => 0x1,
        GL_FRAGMENT_SECONDARY_COLOR_PICA => 0x2,
        GL_TEXTURE0 => 0x3,
        GL_TEXTURE1 => 0x4,
        GL_TEXTURE2 => 0x5,
        GL_TEXTURE3 => 0x6,
        GL_PREVIOUS_BUFFER_PICA => 0xD,
        GL_CONSTANT => 0xE,
        GL_PREVIOUS => 0xF,
        _ => return Err(Error::InvalidEnum),
    })
}

/// RGB combiner operand
pub fn combiner_op_rgb(op: GLenum) -> Result<u32> {
    Ok(match op {
        GL_SRC_COLOR => 0x0,
        GL_ONE_MINUS_SRC_COLOR => 0x1,
        GL_SRC_ALPHA => 0x2,
        GL_ONE_MINUS_SRC_ALPHA => 0x3,
        GL_SRC_R_PICA => 0x4,
        GL_ONE_MINUS_SRC_R_PICA => 0x5,
        GL_SRC_G_PICA => 0x8,
        GL_ONE_MINUS_SRC_G_PICA => 0x9,
        GL_SRC_B_PICA => 0xC,
        GL_ONE_MINUS_SRC_B_PICA => 0xD,
        _ => return Err(Error::InvalidEnum),
    })
}

/// Alpha combiner operand
pub fn combiner_op_alpha(op: GLenum) -> Result<u32> {
    Ok(match op {
        GL_SRC_ALPHA => 0x0,
        GL_ONE_MINUS_SRC_ALPHA => 0x1,
        GL_SRC_R_PICA => 0x2,
        GL_ONE_MINUS_SRC_R_PICA => 0x3,
        GL_SRC_G_PICA => 0x4,
        GL_ONE_MINUS_SRC_G_PICA => 0x5,
        GL_SRC_B_PICA => 0x6,
        GL_ONE_MINUS_SRC_B_PICA => 0x7,
        _ => return Err(Error::InvalidEnum),
    })
}

/// Combiner function
pub fn combiner_func(func: GLenum) -> Result<u32> {
    Ok(match func {
        GL_REPLACE => 0,
        GL_MODULATE => 1,
        GL_ADD => 2,
        GL_ADD_SIGNED => 3,
        GL_INTERPOLATE => 4,
        GL_SUBTRACT => 5,
        GL_DOT3_RGB => 6,
        GL_DOT3_RGBA => 7,
        GL_MULT_ADD_PICA => 8,
        GL_ADD_MULT_PICA => 9,
        _ => return Err(Error::InvalidEnum),
    })
}

/// Combiner output scale
pub fn combiner_scale(scale: f32) -> Result<u32> {
    if scale == 1.0 {
        Ok(0)
    } else if scale == 2.0 {
        Ok(1)
    } else if scale == 4.0 {
        Ok(2)
    } else {
        Err(Error::InvalidValue)
    }
}

// =============================================================================
// PIXEL FORMATS
// =============================================================================

/// Check a color renderbuffer format
pub fn is_color_format(format: GLenum) -> bool {
    matches!(
        format,
        GL_RGBA8_OES | GL_RGB8_OES | GL_RGB5_A1 | GL_RGB565 | GL_RGBA4
    )
}

/// Check a depth renderbuffer format
pub fn is_depth_format(format: GLenum) -> bool {
    matches!(
        format,
        GL_DEPTH_COMPONENT16 | GL_DEPTH_COMPONENT24_OES | GL_DEPTH24_STENCIL8_OES
    )
}

/// Color buffer format code
pub fn color_format(format: GLenum) -> Result<u32> {
    Ok(match format {
        GL_RGBA8_OES => 0,
        GL_RGB8_OES => 1,
        GL_RGB5_A1 => 2,
        GL_RGB565 => 3,
        GL_RGBA4 => 4,
        _ => return Err(Error::InvalidEnum),
    })
}

/// Depth buffer format code
pub fn depth_format(format: GLenum) -> Result<u32> {
    Ok(match format {
        GL_DEPTH_COMPONENT16 => 0,
        GL_DEPTH_COMPONENT24_OES => 2,
        GL_DEPTH24_STENCIL8_OES => 3,
        _ => return Err(Error::InvalidEnum),
    })
}

/// Display transfer format code
pub fn transfer_format(format: GLenum) -> Result<u32> {
    Ok(match format {
        GL_RGBA8_OES => 0,
        GL_RGB8_OES => 1,
        GL_RGB565 => 2,
        GL_RGB5_A1 => 3,
        GL_RGBA4 => 4,
        _ => return Err(Error::InvalidEnum),
    })
}

/// Renderbuffer format of a display framebuffer format code
pub fn display_format(code: u32) -> Result<GLenum> {
    Ok(match code {
        0 => GL_RGBA8_OES,
        1 => GL_RGB8_OES,
        2 => GL_RGB565,
        3 => GL_RGB5_A1,
        4 => GL_RGBA4,
        _ => return Err(Error::InvalidEnum),
    })
}

/// Bytes per pixel
pub fn pixel_bytes(format: GLenum) -> u32 {
    match format {
        GL_RGBA8_OES | GL_DEPTH24_STENCIL8_OES => 4,
        GL_RGB8_OES | GL_DEPTH_COMPONENT24_OES => 3,
        _ => 2,
    }
}

/// Per-channel bit counts: red, green, blue, alpha, depth, stencil
pub fn channel_bits(format: GLenum) -> [u32; 6] {
    match format {
        GL_RGBA8_OES => [8, 8, 8, 8, 0, 0],
        GL_RGB8_OES => [8, 8, 8, 0, 0, 0],
        GL_RGB5_A1 => [5, 5, 5, 1, 0, 0],
        GL_RGB565 => [5, 6, 5, 0, 0, 0],
        GL_RGBA4 => [4, 4, 4, 4, 0, 0],
        GL_DEPTH_COMPONENT16 => [0, 0, 0, 0, 16, 0],
        GL_DEPTH_COMPONENT24_OES => [0, 0, 0, 0, 24, 0],
        GL_DEPTH24_STENCIL8_OES => [0, 0, 0, 0, 24, 8],
        _ => [0; 6],
    }
}

/// Convert a packed `0xRRGGBBAA` color to a renderbuffer's pixel encoding
pub fn convert_rgba8(format: GLenum, color: u32) -> u32 {
    match format {
        GL_RGBA8_OES => color,
        GL_RGB8_OES => color >> 8,
        GL_RGBA4 => {
            (((color >> 24) & 0xF) << 12)
                | (((color >> 16) & 0xF) << 8)
                | (((color >> 8) & 0xF) << 4)
                | (color & 0xF)
        }
        GL_RGB5_A1 => {
            (((color >> 24) & 0x1F) << 11)
                | (((color >> 16) & 0x1F) << 6)
                | (((color >> 8) & 0x1F) << 1)
                | ((color & 0xFF) != 0) as u32
        }
        GL_RGB565 => {
            (((color >> 24) & 0x1F) << 11) | (((color >> 16) & 0x3F) << 5) | ((color >> 8) & 0x1F)
        }
        _ => 0,
    }
}

/// Depth buffer fill value
pub fn clear_depth(format: GLenum, depth: GLclampf, stencil: u8) -> u32 {
    match format {
        GL_DEPTH_COMPONENT16 => (0xFFFF as f32 * depth) as u32,
        GL_DEPTH_COMPONENT24_OES => (0xFF_FFFF as f32 * depth) as u32,
        GL_DEPTH24_STENCIL8_OES => (((0xFF_FFFF as f32 * depth) as u32) << 8) | stencil as u32,
        _ => 0,
    }
}

// =============================================================================
// VERTEX DATA
// =============================================================================

/// Vertex attribute component type
pub fn attrib_type(ty: GLenum) -> Result<u32> {
    Ok(match ty {
        GL_BYTE => 0,
        GL_UNSIGNED_BYTE => 1,
        GL_SHORT => 2,
        GL_FLOAT => 3,
        _ => return Err(Error::InvalidEnum),
    })
}

/// Size in bytes of one attribute component
pub fn attrib_type_size(ty: GLenum) -> u32 {
    match ty {
        GL_SHORT => 2,
        GL_FLOAT => 4,
        _ => 1,
    }
}

/// Primitive topology
pub fn primitive_mode(mode: GLenum) -> Result<u32> {
    Ok(match mode {
        GL_TRIANGLES => primitive::TRIANGLES,
        GL_TRIANGLE_STRIP => primitive::TRIANGLE_STRIP,
        GL_TRIANGLE_FAN => primitive::TRIANGLE_FAN,
        GL_GEOMETRY_PRIMITIVE_PICA => primitive::GEOMETRY_PRIM,
        _ => return Err(Error::InvalidEnum),
    })
}

/// Index buffer element type
pub fn index_type(ty: GLenum) -> Result<u32> {
    Ok(match ty {
        GL_UNSIGNED_BYTE => 0,
        GL_UNSIGNED_SHORT => 1,
        _ => return Err(Error::InvalidEnum),
    })
}

// =============================================================================
// COLORS
// =============================================================================

/// Clamp to [0, 1]
#[inline]
pub fn clampf(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Round to the nearest integer, halfway away from zero
#[inline]
pub fn round_to_int(v: f32) -> i32 {
    if v >= 0.0 {
        (v + 0.5) as i32
    } else {
        (v - 0.5) as i32
    }
}

/// Pack four clamped floats as `0xRRGGBBAA`
pub fn pack_rgba8(r: GLclampf, g: GLclampf, b: GLclampf, a: GLclampf) -> u32 {
    let byte = |v: f32| (255.0 * clampf(v)) as u32 & 0xFF;
    (byte(r) << 24) | (byte(g) << 16) | (byte(b) << 8) | byte(a)
}

/// Split `0xRRGGBBAA` into bytes
pub fn unpack_rgba8(color: u32) -> [u8; 4] {
    color.to_be_bytes()
}

// =============================================================================
// FLOAT ENCODINGS
// =============================================================================

const F24_EXP_MAX: u32 = 0x7F;

/// Encode an IEEE single as a PICA 24-bit float
pub fn f32_to_f24(v: f32) -> u32 {
    let bits = v.to_bits();
    let sign = bits >> 31;
    if bits & 0x7FFF_FFFF == 0 {
        return sign << 23;
    }

    let exp = ((bits >> 23) & 0xFF) as i32 - 0x40;
    if exp < 0 {
        return sign << 23;
    }
    if exp as u32 >= F24_EXP_MAX {
        return (sign << 23) | (F24_EXP_MAX << 16);
    }
    (sign << 23) | ((exp as u32) << 16) | ((bits >> 7) & 0xFFFF)
}

/// Decode a PICA 24-bit float
pub fn f24_to_f32(f: u32) -> f32 {
    let f = f & 0xFF_FFFF;
    let sign = f >> 23;
    let bits = if f & 0x7F_FFFF == 0 {
        sign << 31
    } else if (f >> 16) & 0x7F == F24_EXP_MAX {
        (sign << 31) | (0xFF << 23)
    } else {
        let exp = ((f >> 16) & 0x7F) + 64;
        (sign << 31) | (exp << 23) | ((f & 0xFFFF) << 7)
    };
    f32::from_bits(bits)
}

/// Encode an IEEE single as a PICA 31-bit float
pub fn f32_to_f31(v: f32) -> u32 {
    let bits = v.to_bits();
    let sign = bits >> 31;
    if bits & 0x7FFF_FFFF == 0 {
        return sign << 30;
    }

    let exp = ((bits >> 23) & 0xFF) as i32 - 0x40;
    if exp < 0 {
        return sign << 30;
    }
    let exp = (exp as u32).min(F24_EXP_MAX);
    (sign << 30) | (exp << 23) | (bits & 0x7F_FFFF)
}

/// Pack a vec4 into the three-word uniform format
pub fn pack_float_vector(v: [f32; 4]) -> [u32; 3] {
    let [x, y, z, w] = v.map(f32_to_f24);
    [
        (w << 8) | ((z >> 16) & 0xFF),
        (z << 16) | ((y >> 8) & 0xFFFF),
        (y << 24) | (x & 0xFF_FFFF),
    ]
}

/// Unpack the three-word uniform format into a vec4
pub fn unpack_float_vector(p: [u32; 3]) -> [f32; 4] {
    let x = p[2] & 0xFF_FFFF;
    let y = (p[2] >> 24) | ((p[1] & 0xFFFF) << 8);
    let z = (p[1] >> 16) | ((p[0] & 0xFF) << 16);
    let w = p[0] >> 8;
    [x, y, z, w].map(f24_to_f32)
}

/// Pack an ivec4 into one word, x in the low byte
pub fn pack_int_vector(v: [i32; 4]) -> u32 {
    u32::from_le_bytes(v.map(|c| c as u8))
}

/// Unpack one int uniform word
pub fn unpack_int_vector(word: u32) -> [i32; 4] {
    word.to_le_bytes().map(|c| c as i32)
}
