//! # Register Emitters
//!
//! Stateless functions that append the register writes for one piece of
//! pipeline state to a [`CommandBuffer`]. The resolver decides *when* to
//! call them; these only know *what* to write.
//!
//! ```text
//!   Context ──resolve──▶ gpu::set_* ──▶ CommandBuffer ──flush──▶ GX queue
//! ```

use glass_cmd::CommandBuffer;
use glass_cmd::regs::{self, ShaderUnitRegs};
use glass_core::{GLenum, GLint, GLsizei, PhysAddr, Result};

use crate::enums::*;
use crate::shader::{MAX_CODE_WORDS, MAX_OPDESCS, OutputMap, Shader, ShaderFlags, UniformData};
use crate::state::{
    AlphaState, Attrib, BlendState, ColorMask, Combiner, CullState, DepthState, NUM_ATTRIB_SLOTS,
    Rect, StencilState,
};
use crate::translate::{self, ScissorMode, cull, primitive};

/// Entry point word prefix
const ENTRYPOINT_MAGIC: u32 = 0x7FFF_0000;
/// Bool uniform word prefix
const BOOL_UNIFORM_MAGIC: u32 = 0x7FFF_0000;

// =============================================================================
// FRAMEBUFFER
// =============================================================================

/// One renderbuffer as seen by the GPU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    /// Pixel data
    pub addr: PhysAddr,
    /// Internal format
    pub format: GLenum,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Color and depth surfaces of a framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderTarget {
    /// Color attachment
    pub color: Option<Surface>,
    /// Depth attachment
    pub depth: Option<Surface>,
}

/// Flush the color and depth caches
#[inline]
pub fn flush_framebuffer(cmd: &mut CommandBuffer) -> Result<()> {
    cmd.write(regs::FRAMEBUFFER_FLUSH, 1)
}

/// Invalidate the color and depth caches
#[inline]
pub fn invalidate_framebuffer(cmd: &mut CommandBuffer) -> Result<()> {
    cmd.write(regs::FRAMEBUFFER_INVALIDATE, 1)
}

/// Point the rasterizer at a render target, or at nothing
pub fn bind_framebuffer(
    cmd: &mut CommandBuffer,
    target: Option<&RenderTarget>,
    block32: bool,
) -> Result<()> {
    let color = target.and_then(|t| t.color);
    let depth = target.and_then(|t| t.depth);
    // a depth-only target takes its size from the depth buffer
    let (width, height) = color
        .or(depth)
        .map_or((0, 0), |s| (s.width, s.height));

    invalidate_framebuffer(cmd)?;

    let dim = 0x0100_0000 | ((width.wrapping_sub(1) & 0xFFF) << 12) | (height & 0xFFF);
    let units = |s: Option<Surface>| s.map_or(0, |s| s.addr.units8());
    cmd.write_incremental(regs::DEPTHBUFFER_LOC, &[units(depth), units(color), dim])?;
    cmd.write(regs::RENDERBUF_DIM, dim)?;

    if let Some(c) = color {
        let bytes = translate::pixel_bytes(c.format);
        cmd.write(
            regs::COLORBUFFER_FORMAT,
            (translate::color_format(c.format)? << 16) | (bytes - 2),
        )?;
    }
    if let Some(d) = depth {
        cmd.write(regs::DEPTHBUFFER_FORMAT, translate::depth_format(d.format)?)?;
    }
    if target.is_some() {
        cmd.write(regs::FRAMEBUFFER_BLOCK32, block32 as u32)?;
    }

    let c = color.is_some() as u32;
    let d = depth.is_some() as u32;
    cmd.write_incremental(regs::COLORBUFFER_READ, &[c, c, d, d])
}

// =============================================================================
// RASTERIZER
// =============================================================================

/// Viewport transform
pub fn set_viewport(cmd: &mut CommandBuffer, viewport: &Rect) -> Result<()> {
    let w = viewport.width as f32;
    let h = viewport.height as f32;
    cmd.write_incremental(
        regs::VIEWPORT_WIDTH,
        &[
            translate::f32_to_f24(h / 2.0),
            translate::f32_to_f31(2.0 / h) << 1,
            translate::f32_to_f24(w / 2.0),
            translate::f32_to_f31(2.0 / w) << 1,
        ],
    )?;
    cmd.write(
        regs::VIEWPORT_XY,
        ((viewport.y as u32) << 16) | (viewport.x as u32 & 0xFFFF),
    )
}

/// Scissor mode and rectangle
pub fn set_scissor(cmd: &mut CommandBuffer, mode: ScissorMode, rect: &Rect) -> Result<()> {
    cmd.write_masked(regs::SCISSORTEST_MODE, 0x1, mode as u32)?;
    if mode == ScissorMode::Disable {
        return Ok(());
    }
    let (x, y) = (rect.x as u32, rect.y as u32);
    let (w, h) = (rect.width as u32, rect.height as u32);
    cmd.write(regs::SCISSORTEST_POS, (y << 16) | (x & 0xFFFF))?;
    cmd.write(
        regs::SCISSORTEST_DIM,
        (h.wrapping_sub(y).wrapping_sub(1) << 16) | (w.wrapping_sub(x).wrapping_sub(1) & 0xFFFF),
    )
}

/// Face culling
pub fn set_cull_face(cmd: &mut CommandBuffer, state: &CullState) -> Result<()> {
    // FRONT/CCW and BACK/CW cull the same winding
    let mode = if (state.mode == GL_FRONT) != (state.front == GL_CCW) {
        cull::BACK_CCW
    } else {
        cull::FRONT_CCW
    };
    cmd.write_masked(
        regs::FACECULLING_CONFIG,
        0x1,
        if state.enabled { mode } else { cull::NONE },
    )
}

// =============================================================================
// SHADERS
// =============================================================================

#[inline]
fn unit(shader: &Shader) -> &'static ShaderUnitRegs {
    if shader.is_geometry() { &regs::GSH } else { &regs::VSH }
}

fn upload_binary(cmd: &mut CommandBuffer, shader: &Shader) -> Result<()> {
    let Some(shared) = shader.shared.as_ref() else {
        return Ok(());
    };
    let regs = unit(shader);
    let code = &shared.code[..shared.code.len().min(MAX_CODE_WORDS)];
    let opdescs = &shared.opdescs[..shared.opdescs.len().min(MAX_OPDESCS)];

    cmd.write(regs.codetransfer_config, 0)?;
    cmd.write_repeated(regs.codetransfer_data, code)?;
    cmd.write(regs.codetransfer_end, 1)?;
    cmd.write(regs.opdescs_config, 0)?;
    cmd.write_repeated(regs.opdescs_data, opdescs)
}

/// Program the shader units with the linked stages
pub fn bind_shaders(
    cmd: &mut CommandBuffer,
    vertex: Option<&Shader>,
    geometry: Option<&Shader>,
) -> Result<()> {
    let gs = geometry.is_some();
    cmd.write_masked(regs::GEOSTAGE_CONFIG, 0x3, if gs { 2 } else { 0 })?;
    cmd.write_masked(regs::GEOSTAGE_CONFIG2, 0x3, 0)?;
    cmd.write_masked(regs::VSH_COM_MODE, 0x1, gs as u32)?;

    if let Some(vs) = vertex {
        upload_binary(cmd, vs)?;
        cmd.write(regs::VSH.entrypoint, ENTRYPOINT_MAGIC | (vs.entrypoint & 0xFFFF))?;
        cmd.write_masked(regs::VSH.outmap_mask, 0x3, vs.outmap.mask)?;
        let total = vs.outmap.total.wrapping_sub(1);
        cmd.write_masked(regs::VSH_OUTMAP_TOTAL1, 0x1, total)?;
        cmd.write_masked(regs::VSH_OUTMAP_TOTAL2, 0x1, total)?;
    }

    if let Some(gs) = geometry {
        upload_binary(cmd, gs)?;
        cmd.write(regs::GSH.entrypoint, ENTRYPOINT_MAGIC | (gs.entrypoint & 0xFFFF))?;
        cmd.write_masked(regs::GSH.outmap_mask, 0x1, gs.outmap.mask)?;
    }

    let outmap = match (vertex, geometry) {
        (Some(vs), Some(gs)) if gs.flags.contains(ShaderFlags::MERGE_OUTMAPS) => {
            OutputMap::merge(&vs.outmap, &gs.outmap)
        }
        _ => geometry.or(vertex).map(|s| s.outmap).unwrap_or_default(),
    };

    if outmap.total != 0 {
        cmd.write_masked(regs::PRIMITIVE_CONFIG, 0x1, outmap.total - 1)?;
        cmd.write_masked(regs::SH_OUTMAP_TOTAL, 0x1, outmap.total)?;
        cmd.write_incremental(regs::SH_OUTMAP_O0, &outmap.sems)?;
        cmd.write_masked(regs::SH_OUTATTR_MODE, 0x1, outmap.texcoords as u32)?;
        cmd.write(regs::SH_OUTATTR_CLOCK, outmap.clock)?;
    }

    // geometry stage stays in pass-through configuration
    cmd.write_masked(regs::GEOSTAGE_CONFIG, 0xA, 0)?;
    cmd.write(regs::GSH_MISC0, 0)?;
    cmd.write(regs::GSH_MISC1, 0)?;
    cmd.write(regs::GSH.inputbuffer_config, 0xA000_0000)
}

/// Constant uniforms embedded in the shader binary
pub fn upload_const_uniforms(cmd: &mut CommandBuffer, shader: &Shader) -> Result<()> {
    let regs = unit(shader);
    let consts = &shader.consts;

    cmd.write(regs.bool_uniform, BOOL_UNIFORM_MAGIC | consts.bool_mask as u32)?;
    for (i, word) in consts.int_data.iter().enumerate() {
        if consts.int_mask & (1 << i) != 0 {
            cmd.write(regs.int_uniform_i0 + i as u16, *word)?;
        }
    }
    for (id, packed) in &consts.floats {
        cmd.write(regs.floatuniform_config, *id as u32)?;
        cmd.write_incremental(regs.floatuniform_data, packed)?;
    }
    Ok(())
}

/// Upload every dirty uniform of a shader and clear its dirty bit
///
/// The bool register holds every bool uniform at once, so when any bool
/// uniform is dirty the whole word is rebuilt from the constant mask and
/// all bool uniforms.
pub fn upload_uniforms(cmd: &mut CommandBuffer, shader: &mut Shader) -> Result<()> {
    let regs = unit(shader);
    let mut upload_bool = false;

    for uniform in shader.uniforms.iter_mut().filter(|u| u.dirty) {
        match &uniform.data {
            UniformData::BoolMask(_) => upload_bool = true,
            UniformData::IntVector(values) => {
                let reg = regs.int_uniform_i0 + uniform.id as u16;
                if values.len() == 1 {
                    cmd.write(reg, values[0])?;
                } else {
                    cmd.write_incremental(reg, values)?;
                }
            }
            UniformData::FloatVectorList(vectors) => {
                // the index auto-increments after each vector
                cmd.write(regs.floatuniform_config, uniform.id as u32)?;
                for packed in vectors {
                    cmd.write_incremental(regs.floatuniform_data, packed)?;
                }
            }
        }
        uniform.dirty = false;
    }

    if upload_bool {
        let mask = shader
            .uniforms
            .iter()
            .filter_map(|u| match u.data {
                UniformData::BoolMask(m) => Some((m as u32) << u.id),
                _ => None,
            })
            .fold(shader.consts.bool_mask as u32, |acc, m| acc | m);
        cmd.write(regs.bool_uniform, BOOL_UNIFORM_MAGIC | (mask & 0xFFFF))?;
    }
    Ok(())
}

// =============================================================================
// VERTEX INPUT
// =============================================================================

/// Attribute loader words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct AttribLayout {
    format: [u32; 2],
    permutation: [u32; 2],
    count: u32,
}

fn attrib_layout(attribs: &[Attrib], slots: &[Option<u8>; NUM_ATTRIB_SLOTS]) -> Result<AttribLayout> {
    let mut layout = AttribLayout::default();
    for (i, index) in slots.iter().enumerate() {
        let Some(index) = *index else {
            continue;
        };
        let Some(attrib) = attribs.get(index as usize) else {
            continue;
        };
        let shift = 4 * (i % 8);
        if attrib.phys.is_null() {
            layout.format[1] |= 1 << (16 + i);
        } else {
            let nibble = (attrib.count.wrapping_sub(1) << 2) | translate::attrib_type(attrib.ty)?;
            layout.format[i / 8] |= (nibble & 0xF) << shift;
        }
        layout.permutation[i / 8] |= (index as u32) << shift;
        layout.count += 1;
    }
    layout.format[1] |= layout.count << 28;
    Ok(layout)
}

/// Vertex loader configuration, buffer offsets and fixed attributes
pub fn upload_attributes(
    cmd: &mut CommandBuffer,
    attribs: &[Attrib],
    slots: &[Option<u8>; NUM_ATTRIB_SLOTS],
    linear_base: PhysAddr,
) -> Result<()> {
    let layout = attrib_layout(attribs, slots)?;
    let last = layout.count.wrapping_sub(1);

    cmd.write_incremental(regs::ATTRIBBUFFERS_FORMAT_LOW, &layout.format)?;
    cmd.write_masked(regs::VSH.inputbuffer_config, 0xB, 0xA000_0000 | (last & 0xF))?;
    cmd.write(regs::VSH_NUM_ATTR, last & 0xF)?;
    cmd.write_incremental(regs::VSH.attributes_permutation_low, &layout.permutation)?;

    if layout.count == 0 {
        return Ok(());
    }

    cmd.write(regs::ATTRIBBUFFERS_LOC, linear_base.units8())?;
    for (i, index) in slots.iter().enumerate() {
        let Some(attrib) = index.and_then(|index| attribs.get(index as usize)) else {
            continue;
        };
        if attrib.phys.is_null() {
            let [x, y, z, w] = attrib.components;
            cmd.write(regs::FIXEDATTRIB_INDEX, i as u32)?;
            cmd.write_incremental(
                regs::FIXEDATTRIB_DATA0,
                &translate::pack_float_vector([x, y, z, w]),
            )?;
        } else {
            let stride = match attrib.stride {
                0 => attrib.count * translate::attrib_type_size(attrib.ty),
                s => s,
            };
            cmd.write_incremental(
                regs::ATTRIBBUFFER0_OFFSET + 3 * i as u16,
                &[
                    attrib.phys - linear_base,
                    i as u32,
                    ((stride & 0xFF) << 16) | (1 << 28),
                ],
            )?;
        }
    }
    Ok(())
}

// =============================================================================
// FRAGMENT PIPELINE
// =============================================================================

/// Texture combiner stages
pub fn set_combiners(cmd: &mut CommandBuffer, combiners: &[Combiner]) -> Result<()> {
    for (stage, c) in combiners.iter().enumerate().take(regs::TEXENV.len()) {
        let nibbles = |values: [GLenum; 3], f: fn(GLenum) -> Result<u32>| -> Result<u32> {
            Ok(f(values[0])? | (f(values[1])? << 4) | (f(values[2])? << 8))
        };
        let params = [
            nibbles(c.rgb_src, translate::combiner_src)?
                | (nibbles(c.alpha_src, translate::combiner_src)? << 16),
            nibbles(c.rgb_op, translate::combiner_op_rgb)?
                | (nibbles(c.alpha_op, translate::combiner_op_alpha)? << 12),
            translate::combiner_func(c.rgb_func)?
                | (translate::combiner_func(c.alpha_func)? << 16),
            c.color,
            translate::combiner_scale(c.rgb_scale)?
                | (translate::combiner_scale(c.alpha_scale)? << 16),
        ];
        cmd.write_incremental(regs::TEXENV[stage], &params)?;
    }
    Ok(())
}

/// Fragment operation mode and blend/logic-op selection
pub fn set_frag_op(cmd: &mut CommandBuffer, mode: GLenum, blend: bool) -> Result<()> {
    let blend_bit = if blend { 0x100 } else { 0 };
    let value = 0x00E4_0000 | blend_bit | translate::frag_mode(mode)?;
    cmd.write_masked(regs::COLOR_OPERATION, 0x7, value)
}

/// Color write mask and depth test
pub fn set_color_depth(cmd: &mut CommandBuffer, mask: &ColorMask, depth: &DepthState) -> Result<()> {
    let mut value = (mask.r as u32) << 8
        | (mask.g as u32) << 9
        | (mask.b as u32) << 10
        | (mask.a as u32) << 11;
    if depth.test {
        value |= (translate::test_func(depth.func)? << 4) | (depth.write as u32) << 12 | 1;
    }
    cmd.write_masked(regs::DEPTH_COLOR_MASK, 0x3, value)
}

/// Depth range and polygon offset
///
/// `units` is the polygon offset in depth buffer units; it is scaled by
/// the resolution of `depth_format`.
pub fn set_depth_map(
    cmd: &mut CommandBuffer,
    enabled: bool,
    near: f32,
    far: f32,
    units: f32,
    depth_format: Option<GLenum>,
) -> Result<()> {
    let offset = match depth_format {
        Some(GL_DEPTH_COMPONENT16) => units / 65535.0,
        Some(GL_DEPTH_COMPONENT24_OES | GL_DEPTH24_STENCIL8_OES) => units / 16_777_215.0,
        _ => 0.0,
    };
    cmd.write_masked(regs::DEPTHMAP_ENABLE, 0x1, enabled as u32)?;
    if enabled {
        cmd.write(regs::DEPTHMAP_SCALE, translate::f32_to_f24(near - far))?;
        cmd.write(regs::DEPTHMAP_OFFSET, translate::f32_to_f24(near + offset))?;
    }
    Ok(())
}

/// Early depth test enable
pub fn set_early_depth_test(cmd: &mut CommandBuffer, enabled: bool) -> Result<()> {
    cmd.write_masked(regs::EARLYDEPTH_TEST1, 0x1, enabled as u32)?;
    cmd.write_masked(regs::EARLYDEPTH_TEST2, 0x1, enabled as u32)
}

/// Early depth comparison
pub fn set_early_depth_func(cmd: &mut CommandBuffer, func: GLenum) -> Result<()> {
    cmd.write_masked(regs::EARLYDEPTH_FUNC, 0x1, translate::early_depth_func(func)?)
}

/// Early depth clear value
pub fn set_early_depth_clear(cmd: &mut CommandBuffer, value: f32) -> Result<()> {
    cmd.write_masked(
        regs::EARLYDEPTH_DATA,
        0x7,
        (0xFF_FFFF as f32 * translate::clampf(value)) as u32,
    )
}

/// Clear the early depth buffer
#[inline]
pub fn clear_early_depth(cmd: &mut CommandBuffer) -> Result<()> {
    cmd.write(regs::EARLYDEPTH_CLEAR, 1)
}

/// Stencil test
pub fn set_stencil_test(cmd: &mut CommandBuffer, s: &StencilState) -> Result<()> {
    let mut value = s.test as u32;
    if s.test {
        value |= (translate::test_func(s.func)? << 4)
            | ((s.write_mask & 0xFF) << 8)
            | ((s.reference as i8 as u8 as u32) << 16)
            | ((s.mask & 0xFF) << 24);
    }
    cmd.write(regs::STENCIL_TEST, value)
}

/// Stencil operations
pub fn set_stencil_op(cmd: &mut CommandBuffer, s: &StencilState) -> Result<()> {
    let value = translate::stencil_op(s.fail)?
        | (translate::stencil_op(s.depth_fail)? << 4)
        | (translate::stencil_op(s.depth_pass)? << 8);
    cmd.write_masked(regs::STENCIL_OP, 0x3, value)
}

/// Alpha test
pub fn set_alpha_test(cmd: &mut CommandBuffer, a: &AlphaState) -> Result<()> {
    let mut value = a.test as u32;
    if a.test {
        value |= (translate::test_func(a.func)? << 4)
            | (((translate::clampf(a.reference) * 255.0) as u8 as u32) << 8);
    }
    cmd.write_masked(regs::FRAGOP_ALPHA_TEST, 0x3, value)
}

/// Blend equations and factors
pub fn set_blend_func(cmd: &mut CommandBuffer, b: &BlendState) -> Result<()> {
    let value = (translate::blend_factor(b.dst_alpha)? << 28)
        | (translate::blend_factor(b.src_alpha)? << 24)
        | (translate::blend_factor(b.dst_rgb)? << 20)
        | (translate::blend_factor(b.src_rgb)? << 16)
        | (translate::blend_equation(b.eq_alpha)? << 8)
        | translate::blend_equation(b.eq_rgb)?;
    cmd.write(regs::BLEND_FUNC, value)
}

/// Blend constant color
#[inline]
pub fn set_blend_color(cmd: &mut CommandBuffer, color: u32) -> Result<()> {
    cmd.write(regs::BLEND_COLOR, color)
}

/// Logic operation
pub fn set_logic_op(cmd: &mut CommandBuffer, op: GLenum) -> Result<()> {
    cmd.write_masked(regs::LOGIC_OP, 0x1, translate::logic_op(op)?)
}

// =============================================================================
// DRAWING
// =============================================================================

/// Draw `count` vertices starting at `first`
pub fn draw_arrays(cmd: &mut CommandBuffer, prim: u32, first: GLint, count: GLsizei) -> Result<()> {
    cmd.write_masked(regs::PRIMITIVE_CONFIG, 0x2, prim)?;
    cmd.write(regs::RESTART_PRIMITIVE, 1)?;
    cmd.write(regs::INDEXBUFFER_CONFIG, 0x8000_0000)?;
    cmd.write(regs::NUMVERTICES, count as u32)?;
    cmd.write(regs::VERTEX_OFFSET, first as u32)?;
    cmd.write_masked(regs::GEOSTAGE_CONFIG2, 0x1, 1)?;
    cmd.write_masked(regs::START_DRAW_FUNC0, 0x1, 0)?;
    cmd.write(regs::DRAWARRAYS, 1)?;
    cmd.write_masked(regs::START_DRAW_FUNC0, 0x1, 1)?;
    cmd.write_masked(regs::GEOSTAGE_CONFIG2, 0x1, 0)?;
    cmd.write(regs::VTX_FUNC, 1)
}

/// Draw `count` indexed vertices
///
/// `offset` is the index data address relative to the linear heap base
/// and `index_type` the GPU index type (0 bytes, 1 shorts).
pub fn draw_elements(
    cmd: &mut CommandBuffer,
    prim: u32,
    count: GLsizei,
    index_type: u32,
    offset: u32,
) -> Result<()> {
    let triangles = prim == primitive::TRIANGLES;
    cmd.write_masked(
        regs::PRIMITIVE_CONFIG,
        0x2,
        if triangles { primitive::GEOMETRY_PRIM } else { prim },
    )?;
    cmd.write(regs::RESTART_PRIMITIVE, 1)?;
    cmd.write(regs::INDEXBUFFER_CONFIG, offset | (index_type << 31))?;
    cmd.write(regs::NUMVERTICES, count as u32)?;
    cmd.write(regs::VERTEX_OFFSET, 0)?;
    if triangles {
        cmd.write_masked(regs::GEOSTAGE_CONFIG, 0x2, 0x100)?;
        cmd.write_masked(regs::GEOSTAGE_CONFIG2, 0x2, 0x100)?;
    }
    cmd.write_masked(regs::START_DRAW_FUNC0, 0x1, 0)?;
    cmd.write(regs::DRAWELEMENTS, 1)?;
    cmd.write_masked(regs::START_DRAW_FUNC0, 0x1, 1)?;
    if triangles {
        cmd.write_masked(regs::GEOSTAGE_CONFIG, 0x2, 0)?;
        cmd.write_masked(regs::GEOSTAGE_CONFIG2, 0x2, 0)?;
    }
    cmd.write(regs::VTX_FUNC, 1)?;
    cmd.write_masked(regs::PRIMITIVE_CONFIG, 0x8, 0)?;
    cmd.write_masked(regs::PRIMITIVE_CONFIG, 0x8, 0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloc::vec::Vec;
    use glass_cmd::encoder::header;

    /// Decode a command stream into `(register, mask, value)` triples
    pub(crate) fn decode(words: &[u32]) -> Vec<(u16, u8, u32)> {
        let mut out = Vec::new();
        let mut i = 0;
        while i + 1 < words.len() {
            let hdr = words[i + 1];
            let reg = (hdr & 0x3FF) as u16;
            let mask = ((hdr >> 16) & 0xF) as u8;
            let count = ((hdr >> 20) & 0xFF) as usize + 1;
            let incremental = hdr >> 31 != 0;
            out.push((reg, mask, words[i]));
            for k in 1..count {
                let r = if incremental { reg + k as u16 } else { reg };
                out.push((r, mask, words[i + 1 + k]));
            }
            let len = count + 1;
            i += len + (len & 1);
        }
        out
    }

    fn writes(cmd: &CommandBuffer) -> Vec<(u16, u8, u32)> {
        decode(cmd.pending())
    }

    fn value_of(cmd: &CommandBuffer, reg: u16) -> Option<u32> {
        writes(cmd).into_iter().rev().find(|w| w.0 == reg).map(|w| w.2)
    }

    #[test]
    fn test_decode_matches_encoder() {
        let mut cmd = CommandBuffer::new(64);
        cmd.write_incremental(0x041, &[1, 2, 3]).unwrap();
        assert_eq!(cmd.pending()[1], header(0x041, 0xF, 3, true));
        assert_eq!(
            writes(&cmd),
            alloc::vec![(0x041, 0xF, 1), (0x042, 0xF, 2), (0x043, 0xF, 3)]
        );
    }

    #[test]
    fn test_bind_color_target() {
        let mut cmd = CommandBuffer::new(256);
        let target = RenderTarget {
            color: Some(Surface {
                addr: PhysAddr::new(0x1800_0000),
                format: GL_RGB565,
                width: 400,
                height: 240,
            }),
            depth: None,
        };
        bind_framebuffer(&mut cmd, Some(&target), true).unwrap();

        let dim = 0x0100_0000 | (399 << 12) | 240;
        assert_eq!(value_of(&cmd, regs::FRAMEBUFFER_INVALIDATE), Some(1));
        assert_eq!(value_of(&cmd, regs::DEPTHBUFFER_LOC), Some(0));
        assert_eq!(value_of(&cmd, regs::COLORBUFFER_LOC), Some(0x1800_0000 >> 3));
        assert_eq!(value_of(&cmd, regs::FRAMEBUFFER_DIM), Some(dim));
        assert_eq!(value_of(&cmd, regs::RENDERBUF_DIM), Some(dim));
        assert_eq!(value_of(&cmd, regs::COLORBUFFER_FORMAT), Some(3 << 16));
        assert_eq!(value_of(&cmd, regs::DEPTHBUFFER_FORMAT), None);
        assert_eq!(value_of(&cmd, regs::FRAMEBUFFER_BLOCK32), Some(1));
        assert_eq!(value_of(&cmd, regs::COLORBUFFER_READ), Some(1));
        assert_eq!(value_of(&cmd, regs::COLORBUFFER_READ + 3), Some(0));
    }

    #[test]
    fn test_bind_depth_only_target_uses_depth_size() {
        let mut cmd = CommandBuffer::new(256);
        let target = RenderTarget {
            color: None,
            depth: Some(Surface {
                addr: PhysAddr::new(0x1830_0000),
                format: GL_DEPTH24_STENCIL8_OES,
                width: 64,
                height: 32,
            }),
        };
        bind_framebuffer(&mut cmd, Some(&target), false).unwrap();
        assert_eq!(
            value_of(&cmd, regs::FRAMEBUFFER_DIM),
            Some(0x0100_0000 | (63 << 12) | 32)
        );
        assert_eq!(value_of(&cmd, regs::DEPTHBUFFER_FORMAT), Some(3));
        assert_eq!(value_of(&cmd, regs::COLORBUFFER_FORMAT), None);
    }

    #[test]
    fn test_unbound_target_skips_block_mode() {
        let mut cmd = CommandBuffer::new(256);
        bind_framebuffer(&mut cmd, None, true).unwrap();
        assert_eq!(value_of(&cmd, regs::FRAMEBUFFER_BLOCK32), None);
        assert_eq!(value_of(&cmd, regs::COLORBUFFER_LOC), Some(0));
    }

    #[test]
    fn test_viewport_words() {
        let mut cmd = CommandBuffer::new(64);
        let vp = Rect {
            x: 8,
            y: 4,
            width: 400,
            height: 240,
        };
        set_viewport(&mut cmd, &vp).unwrap();
        assert_eq!(
            value_of(&cmd, regs::VIEWPORT_WIDTH),
            Some(translate::f32_to_f24(120.0))
        );
        assert_eq!(
            value_of(&cmd, regs::VIEWPORT_WIDTH + 2),
            Some(translate::f32_to_f24(200.0))
        );
        assert_eq!(value_of(&cmd, regs::VIEWPORT_XY), Some((4 << 16) | 8));
    }

    #[test]
    fn test_scissor_disabled_writes_mode_only() {
        let mut cmd = CommandBuffer::new(64);
        set_scissor(&mut cmd, ScissorMode::Disable, &Rect::default()).unwrap();
        assert_eq!(writes(&cmd), alloc::vec![(regs::SCISSORTEST_MODE, 0x1, 0)]);

        let mut cmd = CommandBuffer::new(64);
        let rect = Rect {
            x: 10,
            y: 20,
            width: 100,
            height: 50,
        };
        set_scissor(&mut cmd, ScissorMode::Normal, &rect).unwrap();
        assert_eq!(value_of(&cmd, regs::SCISSORTEST_POS), Some((20 << 16) | 10));
        assert_eq!(value_of(&cmd, regs::SCISSORTEST_DIM), Some((29 << 16) | 89));
    }

    #[test]
    fn test_cull_modes() {
        let mut cmd = CommandBuffer::new(64);
        let mut state = CullState {
            enabled: true,
            ..CullState::default()
        };
        set_cull_face(&mut cmd, &state).unwrap();
        assert_eq!(value_of(&cmd, regs::FACECULLING_CONFIG), Some(cull::BACK_CCW));

        state.front = GL_CW;
        set_cull_face(&mut cmd, &state).unwrap();
        assert_eq!(value_of(&cmd, regs::FACECULLING_CONFIG), Some(cull::FRONT_CCW));

        state.enabled = false;
        set_cull_face(&mut cmd, &state).unwrap();
        assert_eq!(value_of(&cmd, regs::FACECULLING_CONFIG), Some(cull::NONE));
    }

    #[test]
    fn test_attribute_layout() {
        let mut attribs = [Attrib::default(); 16];
        attribs[3] = Attrib {
            ty: GL_FLOAT,
            count: 3,
            stride: 0,
            buffer: None,
            phys: PhysAddr::new(0x2000_0100),
            components: [0.0, 0.0, 0.0, 1.0],
        };
        let mut slots = [None; NUM_ATTRIB_SLOTS];
        slots[0] = Some(3);
        slots[1] = Some(5);

        let layout = attrib_layout(&attribs, &slots).unwrap();
        assert_eq!(layout.format[0], (2 << 2) | 3);
        assert_eq!(layout.format[1], (1 << 17) | (2 << 28));
        assert_eq!(layout.permutation[0], 3 | (5 << 4));

        let mut cmd = CommandBuffer::new(256);
        upload_attributes(&mut cmd, &attribs, &slots, PhysAddr::new(0x2000_0000)).unwrap();
        assert_eq!(value_of(&cmd, regs::VSH_NUM_ATTR), Some(1));
        assert_eq!(value_of(&cmd, regs::ATTRIBBUFFERS_LOC), Some(0x2000_0000 >> 3));
        assert_eq!(value_of(&cmd, regs::ATTRIBBUFFER0_OFFSET), Some(0x100));
        assert_eq!(
            value_of(&cmd, regs::ATTRIBBUFFER0_OFFSET + 2),
            Some((12 << 16) | (1 << 28))
        );
        assert_eq!(value_of(&cmd, regs::FIXEDATTRIB_INDEX), Some(1));
    }

    #[test]
    fn test_no_attributes() {
        let attribs = [Attrib::default(); 16];
        let mut cmd = CommandBuffer::new(256);
        upload_attributes(&mut cmd, &attribs, &[None; NUM_ATTRIB_SLOTS], PhysAddr::new(0))
            .unwrap();
        assert_eq!(value_of(&cmd, regs::ATTRIBBUFFERS_LOC), None);
        assert_eq!(value_of(&cmd, regs::ATTRIBBUFFERS_FORMAT_HIGH), Some(0));
    }

    #[test]
    fn test_default_combiners() {
        let combiners: [Combiner; 6] = core::array::from_fn(Combiner::new);
        let mut cmd = CommandBuffer::new(256);
        set_combiners(&mut cmd, &combiners).unwrap();
        for reg in regs::TEXENV {
            assert_eq!(value_of(&cmd, reg + 3), Some(0xFFFF_FFFF));
        }
        assert_eq!(writes(&cmd).len(), 30);
    }

    #[test]
    fn test_stencil_packing() {
        let mut cmd = CommandBuffer::new(64);
        let s = StencilState {
            test: true,
            func: GL_ALWAYS,
            reference: -1,
            mask: 0x1234_56F0,
            write_mask: 0xAB,
            ..StencilState::default()
        };
        set_stencil_test(&mut cmd, &s).unwrap();
        let func = translate::test_func(GL_ALWAYS).unwrap();
        assert_eq!(
            value_of(&cmd, regs::STENCIL_TEST),
            Some(1 | (func << 4) | (0xAB << 8) | (0xFF << 16) | (0xF0 << 24))
        );
    }

    #[test]
    fn test_depth_map_scales_units() {
        let mut cmd = CommandBuffer::new(64);
        set_depth_map(&mut cmd, true, 0.0, 1.0, 65535.0, Some(GL_DEPTH_COMPONENT16)).unwrap();
        assert_eq!(
            value_of(&cmd, regs::DEPTHMAP_SCALE),
            Some(translate::f32_to_f24(-1.0))
        );
        assert_eq!(
            value_of(&cmd, regs::DEPTHMAP_OFFSET),
            Some(translate::f32_to_f24(1.0))
        );

        let mut cmd = CommandBuffer::new(64);
        set_depth_map(&mut cmd, false, 0.0, 1.0, 0.0, None).unwrap();
        assert_eq!(writes(&cmd), alloc::vec![(regs::DEPTHMAP_ENABLE, 0x1, 0)]);
    }

    #[test]
    fn test_draw_arrays_sequence() {
        let mut cmd = CommandBuffer::new(256);
        draw_arrays(&mut cmd, primitive::TRIANGLES, 2, 3).unwrap();
        let regs_written: Vec<u16> = writes(&cmd).iter().map(|w| w.0).collect();
        assert_eq!(
            regs_written,
            alloc::vec![
                regs::PRIMITIVE_CONFIG,
                regs::RESTART_PRIMITIVE,
                regs::INDEXBUFFER_CONFIG,
                regs::NUMVERTICES,
                regs::VERTEX_OFFSET,
                regs::GEOSTAGE_CONFIG2,
                regs::START_DRAW_FUNC0,
                regs::DRAWARRAYS,
                regs::START_DRAW_FUNC0,
                regs::GEOSTAGE_CONFIG2,
                regs::VTX_FUNC,
            ]
        );
        assert_eq!(value_of(&cmd, regs::NUMVERTICES), Some(3));
        assert_eq!(value_of(&cmd, regs::VERTEX_OFFSET), Some(2));
    }

    #[test]
    fn test_draw_elements_triangles_use_geometry_prim() {
        let mut cmd = CommandBuffer::new(256);
        draw_elements(&mut cmd, primitive::TRIANGLES, 6, 1, 0x40).unwrap();
        let all = writes(&cmd);
        assert_eq!(all[0], (regs::PRIMITIVE_CONFIG, 0x2, primitive::GEOMETRY_PRIM));
        assert_eq!(value_of(&cmd, regs::INDEXBUFFER_CONFIG), Some(0x8000_0040));
        assert_eq!(all.iter().filter(|w| w.0 == regs::GEOSTAGE_CONFIG).count(), 2);

        let mut cmd = CommandBuffer::new(256);
        draw_elements(&mut cmd, primitive::TRIANGLE_STRIP, 4, 0, 0).unwrap();
        let all = writes(&cmd);
        assert_eq!(all[0].2, primitive::TRIANGLE_STRIP);
        assert!(all.iter().all(|w| w.0 != regs::GEOSTAGE_CONFIG));
    }
}
