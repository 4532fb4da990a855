//! # Fixed-Function Effects
//!
//! Capabilities, per-fragment setters and the PICA200 extensions. Setters
//! only mutate the context model; a dirty group is raised when the change
//! can be observed by the GPU, i.e. the value differs and its feature is
//! enabled, or an enable bit itself flips.
//!
//! ```text
//!   setter ──▶ ctx state ──(changed && enabled)──▶ DirtyFlags ──▶ resolver
//! ```

use glass_core::{Error, GLboolean, GLclampf, GLenum, GLfloat, GLint, GLsizei, GLuint, Result};

use crate::context::{Current, Glass};
use crate::enums::*;
use crate::platform::Platform;
use crate::state::{ColorMask, DirtyFlags, NUM_COMBINER_STAGES, Rect};
use crate::translate::{self, ScissorMode};

/// Store `value` in `slot`, returning whether it changed
fn update<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

// =============================================================================
// CAPABILITIES
// =============================================================================

impl<P: Platform> Current<'_, P> {
    /// Raise `flags` when `changed`
    #[inline]
    fn mark(&mut self, changed: bool, flags: DirtyFlags) {
        if changed {
            self.ctx.dirty |= flags;
        }
    }

    fn set_capability(&mut self, cap: GLenum, enabled: bool) -> Result<()> {
        let ctx = &mut *self.ctx;
        let (changed, flags) = match cap {
            GL_ALPHA_TEST => (update(&mut ctx.alpha.test, enabled), DirtyFlags::ALPHA),
            GL_BLEND | GL_COLOR_LOGIC_OP => {
                let blend = if enabled {
                    cap == GL_BLEND
                } else {
                    cap == GL_COLOR_LOGIC_OP
                };
                (
                    update(&mut ctx.blend.enabled, blend),
                    DirtyFlags::FRAGMENT | DirtyFlags::BLEND,
                )
            }
            GL_CULL_FACE => (update(&mut ctx.cull.enabled, enabled), DirtyFlags::CULL_FACE),
            GL_DEPTH_TEST => (
                update(&mut ctx.depth.test, enabled),
                DirtyFlags::COLOR_DEPTH | DirtyFlags::DEPTHMAP,
            ),
            GL_EARLY_DEPTH_TEST_PICA => {
                if !ctx.block32 {
                    return Err(Error::InvalidOperation);
                }
                (update(&mut ctx.early_depth.test, enabled), DirtyFlags::EARLY_DEPTH)
            }
            GL_POLYGON_OFFSET_FILL => (
                update(&mut ctx.polygon_offset.enabled, enabled),
                DirtyFlags::DEPTHMAP,
            ),
            GL_SCISSOR_TEST | GL_SCISSOR_TEST_INVERTED_PICA => {
                let mode = match (enabled, cap) {
                    (false, _) => ScissorMode::Disable,
                    (true, GL_SCISSOR_TEST) => ScissorMode::Normal,
                    (true, _) => ScissorMode::Invert,
                };
                (update(&mut ctx.scissor_mode, mode), DirtyFlags::SCISSOR)
            }
            GL_STENCIL_TEST => (update(&mut ctx.stencil.test, enabled), DirtyFlags::STENCIL),
            _ => return Err(Error::InvalidEnum),
        };
        self.mark(changed, flags);
        Ok(())
    }
}

impl<P: Platform> Glass<P> {
    /// Enable a capability
    pub fn enable(&mut self, cap: GLenum) {
        self.dispatch(|gl| gl.set_capability(cap, true))
    }

    /// Disable a capability
    pub fn disable(&mut self, cap: GLenum) {
        self.dispatch(|gl| gl.set_capability(cap, false))
    }

    /// Check a capability
    ///
    /// Blending and logic op are exclusive, so COLOR_LOGIC_OP reads as
    /// enabled whenever blending is not.
    pub fn is_enabled(&mut self, cap: GLenum) -> bool {
        self.with_current(false, |gl| {
            let ctx = &gl.ctx;
            Ok(match cap {
                GL_ALPHA_TEST => ctx.alpha.test,
                GL_BLEND => ctx.blend.enabled,
                GL_COLOR_LOGIC_OP => !ctx.blend.enabled,
                GL_CULL_FACE => ctx.cull.enabled,
                GL_DEPTH_TEST => ctx.depth.test,
                GL_EARLY_DEPTH_TEST_PICA => ctx.early_depth.test,
                GL_POLYGON_OFFSET_FILL => ctx.polygon_offset.enabled,
                GL_SCISSOR_TEST => ctx.scissor_mode == ScissorMode::Normal,
                GL_SCISSOR_TEST_INVERTED_PICA => ctx.scissor_mode == ScissorMode::Invert,
                GL_STENCIL_TEST => ctx.stencil.test,
                _ => return Err(Error::InvalidEnum),
            })
        })
    }

    // =========================================================================
    // PER-FRAGMENT SETTERS
    // =========================================================================

    /// Alpha test function and reference
    pub fn alpha_func(&mut self, func: GLenum, reference: GLclampf) {
        self.dispatch(|gl| {
            if !translate::is_test_func(func) {
                return Err(Error::InvalidEnum);
            }
            let alpha = &mut gl.ctx.alpha;
            let changed = update(&mut alpha.func, func)
                | update(&mut alpha.reference, translate::clampf(reference));
            let test = alpha.test;
            gl.mark(changed && test, DirtyFlags::ALPHA);
            Ok(())
        })
    }

    /// Constant blend color
    pub fn blend_color(&mut self, red: GLclampf, green: GLclampf, blue: GLclampf, alpha: GLclampf) {
        self.dispatch(|gl| {
            let color = translate::pack_rgba8(red, green, blue, alpha);
            let changed = update(&mut gl.ctx.blend.color, color);
            let enabled = gl.ctx.blend.enabled;
            gl.mark(changed && enabled, DirtyFlags::BLEND);
            Ok(())
        })
    }

    /// Blend equation for color and alpha
    pub fn blend_equation(&mut self, mode: GLenum) {
        self.blend_equation_separate(mode, mode);
    }

    /// Blend equations
    pub fn blend_equation_separate(&mut self, mode_rgb: GLenum, mode_alpha: GLenum) {
        self.dispatch(|gl| {
            translate::blend_equation(mode_rgb)?;
            translate::blend_equation(mode_alpha)?;
            let blend = &mut gl.ctx.blend;
            let changed = update(&mut blend.eq_rgb, mode_rgb) | update(&mut blend.eq_alpha, mode_alpha);
            let enabled = blend.enabled;
            gl.mark(changed && enabled, DirtyFlags::BLEND);
            Ok(())
        })
    }

    /// Blend factors for color and alpha
    pub fn blend_func(&mut self, sfactor: GLenum, dfactor: GLenum) {
        self.blend_func_separate(sfactor, dfactor, sfactor, dfactor);
    }

    /// Blend factors
    pub fn blend_func_separate(
        &mut self,
        src_rgb: GLenum,
        dst_rgb: GLenum,
        src_alpha: GLenum,
        dst_alpha: GLenum,
    ) {
        self.dispatch(|gl| {
            for factor in [src_rgb, dst_rgb, src_alpha, dst_alpha] {
                translate::blend_factor(factor)?;
            }
            let blend = &mut gl.ctx.blend;
            let changed = update(&mut blend.src_rgb, src_rgb)
                | update(&mut blend.dst_rgb, dst_rgb)
                | update(&mut blend.src_alpha, src_alpha)
                | update(&mut blend.dst_alpha, dst_alpha);
            let enabled = blend.enabled;
            gl.mark(changed && enabled, DirtyFlags::BLEND);
            Ok(())
        })
    }

    /// Color write mask
    pub fn color_mask(&mut self, red: GLboolean, green: GLboolean, blue: GLboolean, alpha: GLboolean) {
        self.dispatch(|gl| {
            let mask = ColorMask {
                r: red != 0,
                g: green != 0,
                b: blue != 0,
                a: alpha != 0,
            };
            let changed = update(&mut gl.ctx.color_mask, mask);
            gl.mark(changed, DirtyFlags::COLOR_DEPTH);
            Ok(())
        })
    }

    /// Culled face
    pub fn cull_face(&mut self, mode: GLenum) {
        self.dispatch(|gl| {
            if !matches!(mode, GL_FRONT | GL_BACK | GL_FRONT_AND_BACK) {
                return Err(Error::InvalidEnum);
            }
            let changed = update(&mut gl.ctx.cull.mode, mode);
            let enabled = gl.ctx.cull.enabled;
            gl.mark(changed && enabled, DirtyFlags::CULL_FACE);
            Ok(())
        })
    }

    /// Depth test function
    pub fn depth_func(&mut self, func: GLenum) {
        self.dispatch(|gl| {
            if !translate::is_test_func(func) {
                return Err(Error::InvalidEnum);
            }
            let changed = update(&mut gl.ctx.depth.func, func);
            let test = gl.ctx.depth.test;
            gl.mark(changed && test, DirtyFlags::COLOR_DEPTH);
            Ok(())
        })
    }

    /// Depth writes
    pub fn depth_mask(&mut self, flag: GLboolean) {
        self.dispatch(|gl| {
            let changed = update(&mut gl.ctx.depth.write, flag != 0);
            gl.mark(changed, DirtyFlags::COLOR_DEPTH);
            Ok(())
        })
    }

    /// Depth range, clamped to [0, 1]
    pub fn depth_rangef(&mut self, near: GLclampf, far: GLclampf) {
        self.dispatch(|gl| {
            let depth = &mut gl.ctx.depth;
            let changed = update(&mut depth.near, translate::clampf(near))
                | update(&mut depth.far, translate::clampf(far));
            let used = depth.test || gl.ctx.polygon_offset.enabled;
            gl.mark(changed && used, DirtyFlags::DEPTHMAP);
            Ok(())
        })
    }

    /// Front face winding
    pub fn front_face(&mut self, mode: GLenum) {
        self.dispatch(|gl| {
            if !matches!(mode, GL_CW | GL_CCW) {
                return Err(Error::InvalidEnum);
            }
            let changed = update(&mut gl.ctx.cull.front, mode);
            let enabled = gl.ctx.cull.enabled;
            gl.mark(changed && enabled, DirtyFlags::CULL_FACE);
            Ok(())
        })
    }

    /// Logic operation, active while blending is off
    pub fn logic_op(&mut self, opcode: GLenum) {
        self.dispatch(|gl| {
            translate::logic_op(opcode)?;
            let changed = update(&mut gl.ctx.blend.logic_op, opcode);
            let active = !gl.ctx.blend.enabled;
            gl.mark(changed && active, DirtyFlags::BLEND);
            Ok(())
        })
    }

    /// Polygon offset; only `units` reaches the hardware
    pub fn polygon_offset(&mut self, factor: GLfloat, units: GLfloat) {
        self.dispatch(|gl| {
            let offset = &mut gl.ctx.polygon_offset;
            offset.factor = factor;
            let changed = update(&mut offset.units, units);
            let enabled = offset.enabled;
            gl.mark(changed && enabled, DirtyFlags::DEPTHMAP);
            Ok(())
        })
    }

    /// Scissor rectangle
    pub fn scissor(&mut self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        self.dispatch(|gl| {
            if width < 0 || height < 0 {
                return Err(Error::InvalidValue);
            }
            let rect = Rect { x, y, width, height };
            let changed = update(&mut gl.ctx.scissor, rect);
            let enabled = gl.ctx.scissor_mode != ScissorMode::Disable;
            gl.mark(changed && enabled, DirtyFlags::SCISSOR);
            Ok(())
        })
    }

    /// Stencil function, reference and comparison mask
    pub fn stencil_func(&mut self, func: GLenum, reference: GLint, mask: GLuint) {
        self.dispatch(|gl| {
            if !translate::is_test_func(func) {
                return Err(Error::InvalidEnum);
            }
            let stencil = &mut gl.ctx.stencil;
            let changed = update(&mut stencil.func, func)
                | update(&mut stencil.reference, reference)
                | update(&mut stencil.mask, mask);
            let test = stencil.test;
            gl.mark(changed && test, DirtyFlags::STENCIL);
            Ok(())
        })
    }

    /// Stencil write mask
    pub fn stencil_mask(&mut self, mask: GLuint) {
        self.dispatch(|gl| {
            let changed = update(&mut gl.ctx.stencil.write_mask, mask);
            let test = gl.ctx.stencil.test;
            gl.mark(changed && test, DirtyFlags::STENCIL);
            Ok(())
        })
    }

    /// Stencil actions
    pub fn stencil_op(&mut self, sfail: GLenum, dpfail: GLenum, dppass: GLenum) {
        self.dispatch(|gl| {
            for op in [sfail, dpfail, dppass] {
                translate::stencil_op(op)?;
            }
            let stencil = &mut gl.ctx.stencil;
            let changed = update(&mut stencil.fail, sfail)
                | update(&mut stencil.depth_fail, dpfail)
                | update(&mut stencil.depth_pass, dppass);
            let test = stencil.test;
            gl.mark(changed && test, DirtyFlags::STENCIL);
            Ok(())
        })
    }

    /// Viewport; a new viewport also turns the scissor test off
    pub fn viewport(&mut self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        self.dispatch(|gl| {
            if width < 0 || height < 0 {
                return Err(Error::InvalidValue);
            }
            if update(&mut gl.ctx.viewport, Rect { x, y, width, height }) {
                gl.ctx.scissor_mode = ScissorMode::Disable;
                gl.ctx.dirty |= DirtyFlags::VIEWPORT | DirtyFlags::SCISSOR;
            }
            Ok(())
        })
    }

    // =========================================================================
    // PICA200 EXTENSIONS
    // =========================================================================

    /// Framebuffer tiling; early depth is only available with 32x32 blocks
    pub fn block_mode_pica(&mut self, mode: GLenum) {
        self.dispatch(|gl| {
            if !matches!(mode, GL_BLOCK8_PICA | GL_BLOCK32_PICA) {
                return Err(Error::InvalidEnum);
            }
            let changed = update(&mut gl.ctx.block32, mode == GL_BLOCK32_PICA);
            gl.mark(changed, DirtyFlags::FRAMEBUFFER);
            if !gl.ctx.block32 && gl.ctx.early_depth.test {
                gl.ctx.early_depth.test = false;
                gl.ctx.dirty |= DirtyFlags::EARLY_DEPTH;
            }
            Ok(())
        })
    }

    /// Early depth clear value
    pub fn clear_early_depth_pica(&mut self, depth: GLclampf) {
        self.dispatch(|gl| {
            let changed = update(&mut gl.ctx.early_depth.clear, translate::clampf(depth));
            let test = gl.ctx.early_depth.test;
            gl.mark(changed && test, DirtyFlags::EARLY_DEPTH);
            Ok(())
        })
    }

    /// Select the combiner stage edited by the other combiner setters
    pub fn combiner_stage_pica(&mut self, index: GLint) {
        self.dispatch(|gl| {
            let stage = usize::try_from(index)
                .ok()
                .filter(|&s| s < NUM_COMBINER_STAGES)
                .ok_or(Error::InvalidValue)?;
            gl.ctx.combiner_stage = stage;
            Ok(())
        })
    }

    /// Constant color of the active stage
    pub fn combiner_color_pica(&mut self, red: GLclampf, green: GLclampf, blue: GLclampf, alpha: GLclampf) {
        self.dispatch(|gl| {
            let color = translate::pack_rgba8(red, green, blue, alpha);
            let changed = update(&mut gl.ctx.active_combiner().color, color);
            gl.mark(changed, DirtyFlags::COMBINERS);
            Ok(())
        })
    }

    /// Function of the active stage; DOT3_RGBA always covers both halves
    pub fn combiner_func_pica(&mut self, pname: GLenum, func: GLenum) {
        self.dispatch(|gl| {
            translate::combiner_func(func)?;
            let combiner = gl.ctx.active_combiner();
            let (this, other) = match pname {
                GL_COMBINE_RGB => (&mut combiner.rgb_func, &mut combiner.alpha_func),
                GL_COMBINE_ALPHA => (&mut combiner.alpha_func, &mut combiner.rgb_func),
                _ => return Err(Error::InvalidEnum),
            };
            let mut changed = update(this, func);
            if func == GL_DOT3_RGBA {
                changed |= update(other, GL_DOT3_RGBA);
            }
            gl.mark(changed, DirtyFlags::COMBINERS);
            Ok(())
        })
    }

    /// Operand of the active stage
    pub fn combiner_op_pica(&mut self, pname: GLenum, op: GLenum) {
        self.dispatch(|gl| {
            let combiner = gl.ctx.active_combiner();
            let slot = match pname {
                GL_OPERAND0_RGB | GL_OPERAND1_RGB | GL_OPERAND2_RGB => {
                    translate::combiner_op_rgb(op)?;
                    &mut combiner.rgb_op[(pname - GL_OPERAND0_RGB) as usize]
                }
                GL_OPERAND0_ALPHA | GL_OPERAND1_ALPHA | GL_OPERAND2_ALPHA => {
                    translate::combiner_op_alpha(op)?;
                    &mut combiner.alpha_op[(pname - GL_OPERAND0_ALPHA) as usize]
                }
                _ => return Err(Error::InvalidEnum),
            };
            let changed = update(slot, op);
            gl.mark(changed, DirtyFlags::COMBINERS);
            Ok(())
        })
    }

    /// Output scale of the active stage: 1, 2 or 4
    pub fn combiner_scale_pica(&mut self, pname: GLenum, scale: GLfloat) {
        self.dispatch(|gl| {
            translate::combiner_scale(scale)?;
            let combiner = gl.ctx.active_combiner();
            let slot = match pname {
                GL_RGB_SCALE => &mut combiner.rgb_scale,
                GL_ALPHA_SCALE => &mut combiner.alpha_scale,
                _ => return Err(Error::InvalidEnum),
            };
            let changed = update(slot, scale);
            gl.mark(changed, DirtyFlags::COMBINERS);
            Ok(())
        })
    }

    /// Source of the active stage
    pub fn combiner_src_pica(&mut self, pname: GLenum, src: GLenum) {
        self.dispatch(|gl| {
            translate::combiner_src(src)?;
            let combiner = gl.ctx.active_combiner();
            let slot = match pname {
                GL_SRC0_RGB | GL_SRC1_RGB | GL_SRC2_RGB => {
                    &mut combiner.rgb_src[(pname - GL_SRC0_RGB) as usize]
                }
                GL_SRC0_ALPHA | GL_SRC1_ALPHA | GL_SRC2_ALPHA => {
                    &mut combiner.alpha_src[(pname - GL_SRC0_ALPHA) as usize]
                }
                _ => return Err(Error::InvalidEnum),
            };
            let changed = update(slot, src);
            gl.mark(changed, DirtyFlags::COMBINERS);
            Ok(())
        })
    }

    /// Early depth comparison: LESS, LEQUAL, GREATER or GEQUAL
    pub fn early_depth_func_pica(&mut self, func: GLenum) {
        self.dispatch(|gl| {
            translate::early_depth_func(func)?;
            let changed = update(&mut gl.ctx.early_depth.func, func);
            let test = gl.ctx.early_depth.test;
            gl.mark(changed && test, DirtyFlags::EARLY_DEPTH);
            Ok(())
        })
    }

    /// Fragment pipeline mode
    pub fn frag_op_pica(&mut self, mode: GLenum) {
        self.dispatch(|gl| {
            translate::frag_mode(mode)?;
            let changed = update(&mut gl.ctx.frag_mode, mode);
            gl.mark(changed, DirtyFlags::FRAGMENT);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::program::tests::bound;
    use crate::sim::SimPlatform;
    use glass_core::error::{GL_INVALID_ENUM, GL_INVALID_OPERATION, GL_INVALID_VALUE, GL_NO_ERROR};
    use glass_core::{GL_FALSE, GL_TRUE};

    /// Take the dirty flags, leaving the context clean
    fn take_dirty(glass: &mut Glass<SimPlatform>) -> DirtyFlags {
        glass.with_current(DirtyFlags::empty(), |gl| {
            Ok(core::mem::take(&mut gl.ctx.dirty))
        })
    }

    fn clean() -> Glass<SimPlatform> {
        let mut glass = bound();
        take_dirty(&mut glass);
        glass
    }

    #[test]
    fn test_setter_marks_only_when_enabled() {
        let mut glass = clean();
        glass.depth_func(GL_GREATER);
        assert!(take_dirty(&mut glass).is_empty());

        glass.enable(GL_DEPTH_TEST);
        assert_eq!(
            take_dirty(&mut glass),
            DirtyFlags::COLOR_DEPTH | DirtyFlags::DEPTHMAP
        );
        glass.depth_func(GL_LEQUAL);
        assert_eq!(take_dirty(&mut glass), DirtyFlags::COLOR_DEPTH);
        glass.depth_func(GL_LEQUAL);
        assert!(take_dirty(&mut glass).is_empty());
    }

    #[test]
    fn test_enable_twice_marks_once() {
        let mut glass = clean();
        glass.enable(GL_STENCIL_TEST);
        assert_eq!(take_dirty(&mut glass), DirtyFlags::STENCIL);
        glass.enable(GL_STENCIL_TEST);
        assert!(take_dirty(&mut glass).is_empty());
        glass.enable(GL_DITHER);
        assert_eq!(glass.get_error(), GL_INVALID_ENUM);
    }

    #[test]
    fn test_blend_and_logic_op_exclusive() {
        let mut glass = clean();
        assert!(glass.is_enabled(GL_COLOR_LOGIC_OP));
        glass.enable(GL_BLEND);
        assert!(glass.is_enabled(GL_BLEND));
        assert!(!glass.is_enabled(GL_COLOR_LOGIC_OP));
        assert_eq!(take_dirty(&mut glass), DirtyFlags::FRAGMENT | DirtyFlags::BLEND);

        glass.logic_op(GL_XOR);
        assert!(take_dirty(&mut glass).is_empty());
        glass.enable(GL_COLOR_LOGIC_OP);
        assert!(!glass.is_enabled(GL_BLEND));
        glass.disable(GL_COLOR_LOGIC_OP);
        assert!(glass.is_enabled(GL_BLEND));
    }

    #[test]
    fn test_early_depth_requires_block32() {
        let mut glass = clean();
        glass.enable(GL_EARLY_DEPTH_TEST_PICA);
        assert_eq!(glass.get_error(), GL_INVALID_OPERATION);

        glass.block_mode_pica(GL_BLOCK32_PICA);
        glass.enable(GL_EARLY_DEPTH_TEST_PICA);
        assert_eq!(glass.get_error(), GL_NO_ERROR);
        assert_eq!(
            take_dirty(&mut glass),
            DirtyFlags::FRAMEBUFFER | DirtyFlags::EARLY_DEPTH
        );

        glass.block_mode_pica(GL_BLOCK8_PICA);
        assert!(!glass.is_enabled(GL_EARLY_DEPTH_TEST_PICA));
        assert_eq!(
            take_dirty(&mut glass),
            DirtyFlags::FRAMEBUFFER | DirtyFlags::EARLY_DEPTH
        );
        glass.block_mode_pica(GL_RGBA4);
        assert_eq!(glass.get_error(), GL_INVALID_ENUM);
    }

    #[test]
    fn test_viewport_disables_scissor() {
        let mut glass = clean();
        glass.enable(GL_SCISSOR_TEST_INVERTED_PICA);
        assert!(glass.is_enabled(GL_SCISSOR_TEST_INVERTED_PICA));
        assert!(!glass.is_enabled(GL_SCISSOR_TEST));
        take_dirty(&mut glass);

        glass.viewport(0, 0, 400, 240);
        assert!(!glass.is_enabled(GL_SCISSOR_TEST_INVERTED_PICA));
        assert_eq!(take_dirty(&mut glass), DirtyFlags::VIEWPORT | DirtyFlags::SCISSOR);
        glass.viewport(0, 0, 400, 240);
        assert!(take_dirty(&mut glass).is_empty());

        glass.scissor(0, 0, -1, 4);
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);
    }

    #[test]
    fn test_depth_mask_marks_on_change() {
        let mut glass = clean();
        glass.depth_mask(GL_TRUE);
        assert!(take_dirty(&mut glass).is_empty());
        glass.depth_mask(GL_FALSE);
        assert_eq!(take_dirty(&mut glass), DirtyFlags::COLOR_DEPTH);
    }

    #[test]
    fn test_combiner_setters() {
        let mut glass = clean();
        glass.combiner_stage_pica(2);
        glass.combiner_func_pica(GL_COMBINE_ALPHA, GL_DOT3_RGBA);
        glass.combiner_src_pica(GL_SRC1_RGB, GL_TEXTURE0);
        glass.combiner_op_pica(GL_OPERAND2_ALPHA, GL_ONE_MINUS_SRC_R_PICA);
        glass.combiner_scale_pica(GL_RGB_SCALE, 4.0);
        assert_eq!(glass.get_error(), GL_NO_ERROR);
        assert_eq!(take_dirty(&mut glass), DirtyFlags::COMBINERS);

        let ctx = glass.context(glass.current_context().unwrap()).unwrap();
        let stage = &ctx.combiners[2];
        assert_eq!(stage.rgb_func, GL_DOT3_RGBA);
        assert_eq!(stage.alpha_func, GL_DOT3_RGBA);
        assert_eq!(stage.rgb_src[1], GL_TEXTURE0);
        assert_eq!(stage.alpha_op[2], GL_ONE_MINUS_SRC_R_PICA);
        assert_eq!(stage.rgb_scale, 4.0);
        assert_eq!(ctx.combiners[0], crate::state::Combiner::new(0));
    }

    #[test]
    fn test_combiner_validation() {
        let mut glass = clean();
        glass.combiner_stage_pica(6);
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);
        glass.combiner_scale_pica(GL_RGB_SCALE, 3.0);
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);
        glass.combiner_op_pica(GL_OPERAND0_ALPHA, GL_SRC_COLOR);
        assert_eq!(glass.get_error(), GL_INVALID_ENUM);
        glass.combiner_src_pica(GL_COMBINE_RGB, GL_CONSTANT);
        assert_eq!(glass.get_error(), GL_INVALID_ENUM);
        assert!(take_dirty(&mut glass).is_empty());
    }

    #[test]
    fn test_early_depth_func_values() {
        let mut glass = clean();
        for func in [GL_LESS, GL_LEQUAL, GL_GREATER, GL_GEQUAL] {
            glass.early_depth_func_pica(func);
            assert_eq!(glass.get_error(), GL_NO_ERROR);
        }
        glass.early_depth_func_pica(GL_EQUAL);
        assert_eq!(glass.get_error(), GL_INVALID_ENUM);
    }
}
