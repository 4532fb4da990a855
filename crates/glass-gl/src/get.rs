//! # State Queries
//!
//! `glGet*` tables. Each parameter lives in exactly one typed table; the
//! typed getters fall back to the other two tables and convert.
//!
//! ```text
//!   get_booleanv: bools ─▶ floats ─▶ ints
//!   get_floatv:   floats ─▶ bools ─▶ ints
//!   get_integerv: ints ─▶ bools ─▶ floats (rounded)
//! ```

use arrayvec::ArrayVec;
use glass_core::{Error, GLboolean, GLenum, GLfloat, GLint};

use crate::context::Glass;
use crate::enums::*;
use crate::object::ObjectStore;
use crate::platform::Platform;
use crate::state::Context;
use crate::translate::{self, ScissorMode};

/// Values of one parameter
pub type Params<T> = ArrayVec<T, 4>;

const VENDOR: &str = "Kynex7510";
const RENDERER: &str = "PICA200";
const VERSION: &str = "OpenGL ES 2.0";
const SHADING_LANGUAGE_VERSION: &str = "SHBIN 1.0";
const EXTENSIONS: &str = "";

fn params<T: Copy, const N: usize>(values: [T; N]) -> Params<T> {
    values.into_iter().collect()
}

// =============================================================================
// TABLES
// =============================================================================

fn get_bools(ctx: &Context, pname: GLenum) -> Option<Params<bool>> {
    Some(match pname {
        GL_BLEND => params([ctx.blend.enabled]),
        GL_COLOR_WRITEMASK => {
            let m = ctx.color_mask;
            params([m.r, m.g, m.b, m.a])
        }
        GL_CULL_FACE => params([ctx.cull.enabled]),
        GL_DEPTH_TEST => params([ctx.depth.test]),
        GL_DEPTH_WRITEMASK => params([ctx.depth.write]),
        GL_DITHER => params([false]),
        GL_POLYGON_OFFSET_FILL => params([ctx.polygon_offset.enabled]),
        GL_SCISSOR_TEST => params([ctx.scissor_mode == ScissorMode::Normal]),
        GL_STENCIL_TEST => params([ctx.stencil.test]),
        _ => return None,
    })
}

fn get_floats(ctx: &Context, pname: GLenum) -> Option<Params<GLfloat>> {
    let color = |rgba: u32| translate::unpack_rgba8(rgba).map(|c| GLfloat::from(c) / 255.0);
    Some(match pname {
        GL_ALIASED_LINE_WIDTH_RANGE | GL_ALIASED_POINT_SIZE_RANGE => params([1.0, 1.0]),
        GL_LINE_WIDTH => params([1.0]),
        GL_BLEND_COLOR => params(color(ctx.blend.color)),
        GL_COLOR_CLEAR_VALUE => params(color(ctx.clear_color)),
        GL_DEPTH_CLEAR_VALUE => params([ctx.clear_depth]),
        GL_DEPTH_RANGE => params([ctx.depth.near, ctx.depth.far]),
        GL_POLYGON_OFFSET_FACTOR => params([ctx.polygon_offset.factor]),
        GL_POLYGON_OFFSET_UNITS => params([ctx.polygon_offset.units]),
        _ => return None,
    })
}

fn get_ints(ctx: &Context, pname: GLenum) -> Option<Params<GLint>> {
    let e = |v: GLenum| v as GLint;
    let rect = |r: crate::state::Rect| params([r.x, r.y, r.width, r.height]);
    Some(match pname {
        GL_ARRAY_BUFFER_BINDING => params([ObjectStore::name(ctx.array_buffer) as GLint]),
        GL_ELEMENT_ARRAY_BUFFER_BINDING => {
            params([ObjectStore::name(ctx.element_buffer) as GLint])
        }
        GL_FRAMEBUFFER_BINDING => params([ObjectStore::name(ctx.framebuffer) as GLint]),
        GL_RENDERBUFFER_BINDING => params([ObjectStore::name(ctx.renderbuffer) as GLint]),
        GL_CURRENT_PROGRAM => params([ObjectStore::name(ctx.program) as GLint]),
        GL_BLEND_DST_ALPHA => params([e(ctx.blend.dst_alpha)]),
        GL_BLEND_DST_RGB => params([e(ctx.blend.dst_rgb)]),
        GL_BLEND_EQUATION_ALPHA => params([e(ctx.blend.eq_alpha)]),
        GL_BLEND_EQUATION_RGB => params([e(ctx.blend.eq_rgb)]),
        GL_BLEND_SRC_ALPHA => params([e(ctx.blend.src_alpha)]),
        GL_BLEND_SRC_RGB => params([e(ctx.blend.src_rgb)]),
        GL_LOGIC_OP_MODE => params([e(ctx.blend.logic_op)]),
        GL_CULL_FACE_MODE => params([e(ctx.cull.mode)]),
        GL_FRONT_FACE => params([e(ctx.cull.front)]),
        GL_DEPTH_FUNC => params([e(ctx.depth.func)]),
        GL_STENCIL_FUNC => params([e(ctx.stencil.func)]),
        GL_STENCIL_REF => params([ctx.stencil.reference]),
        GL_STENCIL_VALUE_MASK => params([ctx.stencil.mask as GLint]),
        GL_STENCIL_WRITEMASK => params([ctx.stencil.write_mask as GLint]),
        GL_STENCIL_FAIL => params([e(ctx.stencil.fail)]),
        GL_STENCIL_PASS_DEPTH_FAIL => params([e(ctx.stencil.depth_fail)]),
        GL_STENCIL_PASS_DEPTH_PASS => params([e(ctx.stencil.depth_pass)]),
        GL_STENCIL_CLEAR_VALUE => params([ctx.clear_stencil]),
        GL_VIEWPORT => rect(ctx.viewport),
        GL_SCISSOR_BOX => rect(ctx.scissor),
        _ => return None,
    })
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

impl<P: Platform> Glass<P> {
    /// Boolean view of a parameter
    pub fn get_booleanv(&mut self, pname: GLenum) -> Params<GLboolean> {
        self.with_current(Params::new(), |gl| {
            let ctx = &*gl.ctx;
            if let Some(v) = get_bools(ctx, pname) {
                return Ok(v.into_iter().map(GLboolean::from).collect());
            }
            if let Some(v) = get_floats(ctx, pname) {
                return Ok(v.into_iter().map(|f| GLboolean::from(f != 0.0)).collect());
            }
            if let Some(v) = get_ints(ctx, pname) {
                return Ok(v.into_iter().map(|i| GLboolean::from(i != 0)).collect());
            }
            Err(Error::InvalidEnum)
        })
    }

    /// Float view of a parameter
    pub fn get_floatv(&mut self, pname: GLenum) -> Params<GLfloat> {
        self.with_current(Params::new(), |gl| {
            let ctx = &*gl.ctx;
            if let Some(v) = get_floats(ctx, pname) {
                return Ok(v);
            }
            if let Some(v) = get_bools(ctx, pname) {
                return Ok(v.into_iter().map(|b| if b { 1.0 } else { 0.0 }).collect());
            }
            if let Some(v) = get_ints(ctx, pname) {
                return Ok(v.into_iter().map(|i| i as GLfloat).collect());
            }
            Err(Error::InvalidEnum)
        })
    }

    /// Integer view of a parameter; floats are rounded
    pub fn get_integerv(&mut self, pname: GLenum) -> Params<GLint> {
        self.with_current(Params::new(), |gl| {
            let ctx = &*gl.ctx;
            if let Some(v) = get_ints(ctx, pname) {
                return Ok(v);
            }
            if let Some(v) = get_bools(ctx, pname) {
                return Ok(v.into_iter().map(GLint::from).collect());
            }
            if let Some(v) = get_floats(ctx, pname) {
                return Ok(v.into_iter().map(translate::round_to_int).collect());
            }
            Err(Error::InvalidEnum)
        })
    }

    /// Implementation strings
    pub fn get_string(&mut self, name: GLenum) -> Option<&'static str> {
        self.with_current(None, |_| {
            Ok(Some(match name {
                GL_VENDOR => VENDOR,
                GL_RENDERER => RENDERER,
                GL_VERSION => VERSION,
                GL_SHADING_LANGUAGE_VERSION => SHADING_LANGUAGE_VERSION,
                GL_EXTENSIONS => EXTENSIONS,
                _ => return Err(Error::InvalidEnum),
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::program::tests::bound;
    use glass_core::error::{GL_INVALID_ENUM, GL_NO_ERROR};

    #[test]
    fn test_strings() {
        let mut glass = bound();
        assert_eq!(glass.get_string(GL_RENDERER), Some("PICA200"));
        assert_eq!(glass.get_string(GL_SHADING_LANGUAGE_VERSION), Some("SHBIN 1.0"));
        assert_eq!(glass.get_string(GL_EXTENSIONS), Some(""));
        assert_eq!(glass.get_string(GL_BLEND), None);
        assert_eq!(glass.get_error(), GL_INVALID_ENUM);
    }

    #[test]
    fn test_native_tables() {
        let mut glass = bound();
        glass.viewport(0, 0, 400, 240);
        glass.depth_rangef(0.25, 2.0);
        glass.color_mask(1, 0, 1, 1);

        assert_eq!(glass.get_integerv(GL_VIEWPORT).as_slice(), &[0, 0, 400, 240]);
        assert_eq!(glass.get_floatv(GL_DEPTH_RANGE).as_slice(), &[0.25, 1.0]);
        assert_eq!(glass.get_booleanv(GL_COLOR_WRITEMASK).as_slice(), &[1, 0, 1, 1]);
        assert_eq!(glass.get_integerv(GL_DEPTH_FUNC).as_slice(), &[GL_LESS as GLint]);
    }

    #[test]
    fn test_cross_type_fallback() {
        let mut glass = bound();
        glass.clear_depthf(0.6);
        glass.enable(GL_CULL_FACE);

        // float rounded into an integer
        assert_eq!(glass.get_integerv(GL_DEPTH_CLEAR_VALUE).as_slice(), &[1]);
        assert_eq!(glass.get_floatv(GL_CULL_FACE).as_slice(), &[1.0]);
        assert_eq!(glass.get_integerv(GL_DEPTH_TEST).as_slice(), &[0]);
        assert_eq!(glass.get_booleanv(GL_FRONT_FACE).as_slice(), &[1]);
        assert_eq!(glass.get_floatv(GL_STENCIL_REF).as_slice(), &[0.0]);
        assert_eq!(glass.get_error(), GL_NO_ERROR);

        assert!(glass.get_integerv(GL_TEXTURE0).is_empty());
        assert_eq!(glass.get_error(), GL_INVALID_ENUM);
    }

    #[test]
    fn test_clear_color_normalized() {
        let mut glass = bound();
        glass.clear_color(1.0, 0.0, 1.0, 0.0);
        assert_eq!(glass.get_floatv(GL_COLOR_CLEAR_VALUE).as_slice(), &[1.0, 0.0, 1.0, 0.0]);
    }
}
