//! # State Resolver
//!
//! Walks the dirty groups of the current context in a fixed order and emits
//! the register writes that bring the GPU in line with the context model.
//! A group clears its own flag only after its writes land, so a failed emit
//! leaves it dirty for the next resolve, and a second resolve with no
//! state change in between emits nothing.
//!
//! ```text
//!   FRAMEBUFFER ─▶ DRAW ─▶ VIEWPORT ─▶ SCISSOR ─▶ PROGRAM ─▶ uniforms
//!        ─▶ ATTRIBS ─▶ COMBINERS ─▶ FRAGMENT ─▶ COLOR_DEPTH ─▶ DEPTHMAP
//!        ─▶ EARLY_DEPTH ─▶ EARLY_DEPTH_CLEAR ─▶ STENCIL ─▶ CULL_FACE
//!        ─▶ ALPHA ─▶ BLEND
//! ```
//!
//! A pending draw is flushed out of the color and depth caches before the
//! render target changes.

use glass_core::Result;

use crate::context::Current;
use crate::gpu;
use crate::platform::Platform;
use crate::shader::ProgramFlags;
use crate::state::DirtyFlags;

impl<P: Platform> Current<'_, P> {
    #[inline]
    fn is_dirty(&self, flag: DirtyFlags) -> bool {
        self.ctx.dirty.contains(flag)
    }

    /// Clear a group once its writes are in the command buffer
    #[inline]
    fn mark_clean(&mut self, flag: DirtyFlags) {
        self.ctx.dirty.remove(flag);
    }

    /// Emit every dirty state group
    pub(crate) fn resolve(&mut self) -> Result<()> {
        self.resolve_target()?;
        self.resolve_program()?;
        self.resolve_fixed_function()
    }

    fn resolve_target(&mut self) -> Result<()> {
        if self.is_dirty(DirtyFlags::FRAMEBUFFER) {
            if self.is_dirty(DirtyFlags::DRAW) {
                gpu::flush_framebuffer(&mut self.ctx.cmd)?;
                if self.ctx.early_depth.test {
                    gpu::clear_early_depth(&mut self.ctx.cmd)?;
                    self.mark_clean(DirtyFlags::EARLY_DEPTH_CLEAR);
                }
                self.mark_clean(DirtyFlags::DRAW);
            }
            let target = self
                .ctx
                .framebuffer
                .and_then(|fb| self.objects.render_target(fb));
            gpu::bind_framebuffer(&mut self.ctx.cmd, target.as_ref(), self.ctx.block32)?;
            self.mark_clean(DirtyFlags::FRAMEBUFFER);
            log::trace!("Resolved framebuffer {:?}", self.ctx.framebuffer);
        }

        if self.is_dirty(DirtyFlags::DRAW) {
            gpu::flush_framebuffer(&mut self.ctx.cmd)?;
            gpu::invalidate_framebuffer(&mut self.ctx.cmd)?;
            self.mark_clean(DirtyFlags::DRAW);
            log::trace!("Resolved pending draw");
        }

        if self.is_dirty(DirtyFlags::VIEWPORT) {
            gpu::set_viewport(&mut self.ctx.cmd, &self.ctx.viewport)?;
            self.mark_clean(DirtyFlags::VIEWPORT);
            log::trace!("Resolved viewport {:?}", self.ctx.viewport);
        }

        if self.is_dirty(DirtyFlags::SCISSOR) {
            gpu::set_scissor(&mut self.ctx.cmd, self.ctx.scissor_mode, &self.ctx.scissor)?;
            self.mark_clean(DirtyFlags::SCISSOR);
            log::trace!("Resolved scissor {:?}", self.ctx.scissor_mode);
        }
        Ok(())
    }

    fn resolve_program(&mut self) -> Result<()> {
        let program = self.ctx.program.and_then(|h| self.objects.get(h).map(|p| (h, p)));
        let Some((handle, program)) = program else {
            self.ctx.dirty.remove(DirtyFlags::PROGRAM);
            return Ok(());
        };
        let linked = [program.linked_vertex, program.linked_geometry];

        if self.is_dirty(DirtyFlags::PROGRAM) {
            let vertex = program
                .flags
                .contains(ProgramFlags::UPDATE_VERTEX)
                .then_some(program.linked_vertex)
                .flatten();
            let geometry = program
                .flags
                .contains(ProgramFlags::UPDATE_GEOMETRY)
                .then_some(program.linked_geometry)
                .flatten();

            let vs = vertex.and_then(|h| self.objects.get(h));
            let gs = geometry.and_then(|h| self.objects.get(h));
            gpu::bind_shaders(&mut self.ctx.cmd, vs, gs)?;
            for shader in [vs, gs].into_iter().flatten() {
                gpu::upload_const_uniforms(&mut self.ctx.cmd, shader)?;
            }
            log::trace!(
                "Resolved program {:?} (vertex: {}, geometry: {})",
                handle,
                vs.is_some(),
                gs.is_some()
            );

            if let Some(program) = self.objects.get_mut(handle) {
                program
                    .flags
                    .remove(ProgramFlags::UPDATE_VERTEX | ProgramFlags::UPDATE_GEOMETRY);
            }
            self.mark_clean(DirtyFlags::PROGRAM);
        }

        // uniforms carry their own dirty bits
        for shader in linked.into_iter().flatten() {
            if let Some(shader) = self.objects.get_mut(shader) {
                gpu::upload_uniforms(&mut self.ctx.cmd, shader)?;
            }
        }
        Ok(())
    }

    fn resolve_fixed_function(&mut self) -> Result<()> {
        if self.is_dirty(DirtyFlags::ATTRIBS) {
            let base = self.platform.linear_base();
            gpu::upload_attributes(
                &mut self.ctx.cmd,
                &self.ctx.attribs,
                &self.ctx.attrib_slots,
                base,
            )?;
            self.mark_clean(DirtyFlags::ATTRIBS);
            log::trace!("Resolved attributes {:?}", self.ctx.attrib_slots);
        }

        if self.is_dirty(DirtyFlags::COMBINERS) {
            gpu::set_combiners(&mut self.ctx.cmd, &self.ctx.combiners)?;
            self.mark_clean(DirtyFlags::COMBINERS);
            log::trace!("Resolved combiners");
        }

        if self.is_dirty(DirtyFlags::FRAGMENT) {
            gpu::set_frag_op(&mut self.ctx.cmd, self.ctx.frag_mode, self.ctx.blend.enabled)?;
            self.mark_clean(DirtyFlags::FRAGMENT);
            log::trace!("Resolved fragment mode 0x{:x}", self.ctx.frag_mode);
        }

        if self.is_dirty(DirtyFlags::COLOR_DEPTH) {
            gpu::set_color_depth(&mut self.ctx.cmd, &self.ctx.color_mask, &self.ctx.depth)?;
            self.mark_clean(DirtyFlags::COLOR_DEPTH);
            log::trace!("Resolved color and depth masks");
        }

        if self.is_dirty(DirtyFlags::DEPTHMAP) {
            let offset = self.ctx.polygon_offset;
            let depth_format = self
                .ctx
                .framebuffer
                .and_then(|fb| self.objects.render_target(fb))
                .and_then(|t| t.depth)
                .map(|d| d.format);
            gpu::set_depth_map(
                &mut self.ctx.cmd,
                offset.enabled,
                self.ctx.depth.near,
                self.ctx.depth.far,
                if offset.enabled { offset.units } else { 0.0 },
                depth_format,
            )?;
            self.mark_clean(DirtyFlags::DEPTHMAP);
            log::trace!("Resolved depth map");
        }

        if self.is_dirty(DirtyFlags::EARLY_DEPTH) {
            let early = self.ctx.early_depth;
            gpu::set_early_depth_test(&mut self.ctx.cmd, early.test)?;
            if early.test {
                gpu::set_early_depth_func(&mut self.ctx.cmd, early.func)?;
                gpu::set_early_depth_clear(&mut self.ctx.cmd, early.clear)?;
            }
            self.mark_clean(DirtyFlags::EARLY_DEPTH);
            log::trace!("Resolved early depth test ({})", early.test);
        }

        if self.is_dirty(DirtyFlags::EARLY_DEPTH_CLEAR) {
            if self.ctx.early_depth.test {
                gpu::clear_early_depth(&mut self.ctx.cmd)?;
                log::trace!("Resolved early depth clear");
            }
            self.mark_clean(DirtyFlags::EARLY_DEPTH_CLEAR);
        }

        if self.is_dirty(DirtyFlags::STENCIL) {
            gpu::set_stencil_test(&mut self.ctx.cmd, &self.ctx.stencil)?;
            if self.ctx.stencil.test {
                gpu::set_stencil_op(&mut self.ctx.cmd, &self.ctx.stencil)?;
            }
            self.mark_clean(DirtyFlags::STENCIL);
            log::trace!("Resolved stencil test ({})", self.ctx.stencil.test);
        }

        if self.is_dirty(DirtyFlags::CULL_FACE) {
            gpu::set_cull_face(&mut self.ctx.cmd, &self.ctx.cull)?;
            self.mark_clean(DirtyFlags::CULL_FACE);
            log::trace!("Resolved face culling ({})", self.ctx.cull.enabled);
        }

        if self.is_dirty(DirtyFlags::ALPHA) {
            gpu::set_alpha_test(&mut self.ctx.cmd, &self.ctx.alpha)?;
            self.mark_clean(DirtyFlags::ALPHA);
            log::trace!("Resolved alpha test ({})", self.ctx.alpha.test);
        }

        if self.is_dirty(DirtyFlags::BLEND) {
            let blend = self.ctx.blend;
            if blend.enabled {
                gpu::set_blend_func(&mut self.ctx.cmd, &blend)?;
                gpu::set_blend_color(&mut self.ctx.cmd, blend.color)?;
            } else {
                gpu::set_logic_op(&mut self.ctx.cmd, blend.logic_op)?;
            }
            self.mark_clean(DirtyFlags::BLEND);
            log::trace!("Resolved blend (blending: {})", blend.enabled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use glass_cmd::{CommandBuffer, regs};
    use glass_core::Error;

    use crate::context::Glass;
    use crate::enums::*;
    use crate::gpu::tests::decode;
    use crate::shader::Shader;
    use crate::shader::program::tests::{bound, linked_program};
    use crate::sim::SimPlatform;

    type Writes = Vec<(u16, u8, u32)>;

    /// Resolve and return the writes it appended
    fn resolve(glass: &mut Glass<SimPlatform>) -> Writes {
        glass.with_current(Vec::new(), |gl| {
            let start = gl.ctx.cmd.pending_len();
            gl.resolve()?;
            Ok(decode(&gl.ctx.cmd.pending()[start..]))
        })
    }

    fn dirty(glass: &mut Glass<SimPlatform>) -> DirtyFlags {
        glass.with_current(DirtyFlags::empty(), |gl| Ok(gl.ctx.dirty))
    }

    fn set_dirty(glass: &mut Glass<SimPlatform>, flags: DirtyFlags) {
        glass.dispatch(|gl| {
            gl.ctx.dirty |= flags;
            Ok(())
        })
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut glass = bound();
        let first = resolve(&mut glass);
        assert!(!first.is_empty());
        assert!(dirty(&mut glass).is_empty());
        assert!(resolve(&mut glass).is_empty());
    }

    #[test]
    fn test_resolve_emits_only_changed_group() {
        let mut glass = bound();
        resolve(&mut glass);

        glass.enable(GL_CULL_FACE);
        let writes = resolve(&mut glass);
        assert!(!writes.is_empty());
        assert!(writes.iter().all(|w| w.0 == regs::FACECULLING_CONFIG));
    }

    #[test]
    fn test_unchanged_setter_emits_nothing() {
        let mut glass = bound();
        resolve(&mut glass);
        glass.depth_func(GL_LESS);
        glass.cull_face(GL_BACK);
        assert!(resolve(&mut glass).is_empty());
    }

    #[test]
    fn test_pending_draw_flushed_before_rebind() {
        let mut glass = bound();
        resolve(&mut glass);
        set_dirty(&mut glass, DirtyFlags::DRAW | DirtyFlags::FRAMEBUFFER);

        let writes = resolve(&mut glass);
        assert_eq!(writes[0].0, regs::FRAMEBUFFER_FLUSH);
        assert_eq!(writes[1].0, regs::FRAMEBUFFER_INVALIDATE);
        // the draw was consumed by the framebuffer step
        assert_eq!(
            writes.iter().filter(|w| w.0 == regs::FRAMEBUFFER_FLUSH).count(),
            1
        );
    }

    #[test]
    fn test_pending_draw_alone() {
        let mut glass = bound();
        resolve(&mut glass);
        set_dirty(&mut glass, DirtyFlags::DRAW);
        let writes = resolve(&mut glass);
        assert_eq!(
            writes,
            alloc::vec![
                (regs::FRAMEBUFFER_FLUSH, 0xF, 1),
                (regs::FRAMEBUFFER_INVALIDATE, 0xF, 1)
            ]
        );
    }

    #[test]
    fn test_early_depth_clear_needs_test() {
        let mut glass = bound();
        resolve(&mut glass);
        set_dirty(&mut glass, DirtyFlags::EARLY_DEPTH_CLEAR);
        assert!(resolve(&mut glass).is_empty());
        assert!(dirty(&mut glass).is_empty());
    }

    #[test]
    fn test_program_upload_then_uniforms_only() {
        let mut glass = bound();
        let program = linked_program(&mut glass);
        glass.use_program(program);

        let writes = resolve(&mut glass);
        assert!(writes.iter().any(|w| w.0 == regs::VSH.entrypoint));
        assert!(writes.iter().any(|w| w.0 == regs::VSH.codetransfer_data));
        assert!(writes.iter().any(|w| w.0 == regs::VSH.floatuniform_config));

        // every uniform was uploaded once
        let objects = glass.objects();
        let all_clean = objects
            .check::<crate::shader::Program>(program)
            .and_then(|h| objects.get(h))
            .and_then(|p| p.linked_vertex)
            .and_then(|h| objects.get(h))
            .is_some_and(|s: &Shader| s.uniforms.iter().all(|u| !u.dirty));
        assert!(all_clean);
        assert!(resolve(&mut glass).is_empty());
    }

    #[test]
    fn test_logic_op_when_blend_disabled() {
        let mut glass = bound();
        resolve(&mut glass);
        set_dirty(&mut glass, DirtyFlags::BLEND);
        let writes = resolve(&mut glass);
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, regs::LOGIC_OP);

        glass.enable(GL_BLEND);
        let writes = resolve(&mut glass);
        assert!(writes.iter().any(|w| w.0 == regs::BLEND_FUNC));
        assert!(writes.iter().any(|w| w.0 == regs::BLEND_COLOR));
        assert!(writes.iter().any(|w| w.0 == regs::COLOR_OPERATION));
    }

    #[test]
    fn test_failed_emit_keeps_group_dirty() {
        let mut glass = bound();
        resolve(&mut glass);
        set_dirty(&mut glass, DirtyFlags::DRAW | DirtyFlags::VIEWPORT);

        // room for the pending-draw writes only
        let failed = glass.with_current(None, |gl| {
            gl.ctx.cmd = CommandBuffer::new(4);
            Ok(gl.resolve().err())
        });
        assert_eq!(failed, Some(Error::CommandBufferFull));
        let left = dirty(&mut glass);
        assert!(left.contains(DirtyFlags::VIEWPORT));
        assert!(!left.contains(DirtyFlags::DRAW));

        glass.dispatch(|gl| {
            gl.ctx.cmd = CommandBuffer::new(256);
            Ok(())
        });
        let writes = resolve(&mut glass);
        assert!(writes.iter().any(|w| w.0 == regs::VIEWPORT_WIDTH));
        assert!(writes.iter().all(|w| w.0 != regs::FRAMEBUFFER_FLUSH));
        assert!(dirty(&mut glass).is_empty());
    }

    #[test]
    fn test_failed_framebuffer_bind_keeps_draw_pending() {
        let mut glass = bound();
        resolve(&mut glass);
        set_dirty(&mut glass, DirtyFlags::DRAW | DirtyFlags::FRAMEBUFFER);

        let failed = glass.with_current(None, |gl| {
            gl.ctx.cmd = CommandBuffer::new(0);
            Ok(gl.resolve().err())
        });
        assert_eq!(failed, Some(Error::CommandBufferFull));
        assert!(dirty(&mut glass).contains(DirtyFlags::DRAW | DirtyFlags::FRAMEBUFFER));
    }
}
