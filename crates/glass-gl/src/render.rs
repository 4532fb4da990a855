//! # Rendering Pipeline
//!
//! Clears, draws and presentation. These are the only entry points that
//! resolve the context and hand work to the hardware.
//!
//! ```text
//!   clear ──▶ resolve ─▶ flush ─▶ MemoryFill ───────────┐
//!   draw  ──▶ resolve ─▶ draw words (cmd buffer)        ├─▶ TransferQueue
//!   swap  ──▶ resolve ─▶ flush+run ─▶ DisplayTransfer ──┘      │
//!                                        completion: present ◀─┘
//! ```
//!
//! The command buffer keeps a committed offset: every flush submits only
//! the words written since the previous one. The buffer restarts from zero
//! only on a full finish, after the transfer queue has drained.

use arrayvec::ArrayVec;
use glass_cmd::queue::{self, MemoryFill};
use glass_cmd::{DisplayTransfer, GxCommand, TransferEngine};
use glass_core::{
    Error, GLbitfield, GLclampf, GLenum, GLint, GLsizei, PhysAddr, Result, Screen,
};

use crate::context::{Current, Glass};
use crate::enums::*;
use crate::gpu::{self, Surface};
use crate::platform::Platform;
use crate::state::DirtyFlags;
use crate::translate;

/// Buffer bits accepted by [`Glass::clear`]
const CLEAR_MASK: GLbitfield = GL_COLOR_BUFFER_BIT
    | GL_DEPTH_BUFFER_BIT
    | GL_STENCIL_BUFFER_BIT
    | GL_EARLY_DEPTH_BUFFER_BIT_PICA;

/// Completion handler of a swap: show the freshly transferred frame
fn present(engine: &mut dyn TransferEngine, screen: Screen) {
    log::trace!("Presenting {:?}", screen);
    engine.present(screen);
}

/// Fill covering a whole surface
fn surface_fill(surface: &Surface, value: u32) -> MemoryFill {
    let bytes = translate::pixel_bytes(surface.format);
    MemoryFill {
        start: surface.addr,
        end: surface.addr.offset(surface.width * surface.height * bytes),
        value,
        control: queue::fill_control(bytes),
    }
}

// =============================================================================
// SUBMISSION
// =============================================================================

impl<P: Platform> Current<'_, P> {
    /// Submit the words written since the last flush
    pub(crate) fn flush_commands(&mut self) -> Result<()> {
        if let Some(words) = self.ctx.cmd.take_pending()? {
            log::trace!("Submitting {} command words", words.len());
            self.ctx.queue.add(
                &mut *self.platform,
                GxCommand::ProcessCommandList { words, flush: true },
            );
        }
        Ok(())
    }

    /// Submit, drain the queue and restart the command buffer
    pub(crate) fn flush_and_run(&mut self) -> Result<()> {
        self.flush_commands()?;
        self.ctx.queue.wait(&mut *self.platform);
        self.ctx.queue.stop();
        self.ctx.queue.clear();
        self.ctx.cmd.reset();
        self.ctx.queue.run(&mut *self.platform);
        Ok(())
    }

    /// Index data address relative to the linear heap
    ///
    /// `offset` is relative to the bound element buffer, or a physical
    /// address when none is bound.
    fn index_offset(&self, offset: usize) -> Result<u32> {
        let offset = u32::try_from(offset).map_err(|_| Error::InvalidValue)?;
        let addr = match self.ctx.element_buffer {
            Some(handle) => {
                let buffer = self.objects.get(handle).ok_or(Error::InvalidOperation)?;
                if buffer.addr.is_null() {
                    return Err(Error::InvalidOperation);
                }
                buffer.addr.offset(offset)
            }
            None => PhysAddr::new(offset),
        };
        addr.raw()
            .checked_sub(self.platform.linear_base().raw())
            .ok_or(Error::InvalidValue)
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

impl<P: Platform> Glass<P> {
    /// Color used by color clears
    pub fn clear_color(&mut self, red: GLclampf, green: GLclampf, blue: GLclampf, alpha: GLclampf) {
        self.dispatch(|gl| {
            gl.ctx.clear_color = translate::pack_rgba8(red, green, blue, alpha);
            Ok(())
        })
    }

    /// Depth used by depth clears
    pub fn clear_depthf(&mut self, depth: GLclampf) {
        self.dispatch(|gl| {
            gl.ctx.clear_depth = translate::clampf(depth);
            Ok(())
        })
    }

    /// Stencil value used by depth-stencil clears
    pub fn clear_stencil(&mut self, s: GLint) {
        self.dispatch(|gl| {
            gl.ctx.clear_stencil = s;
            Ok(())
        })
    }

    /// Clear buffers of the bound framebuffer
    ///
    /// Color and depth are cleared by a memory fill on the transfer queue,
    /// after the pending commands have been submitted. The early depth
    /// buffer is cleared by the GPU on the next resolve.
    pub fn clear(&mut self, mask: GLbitfield) {
        self.dispatch(|gl| {
            let color = mask & GL_COLOR_BUFFER_BIT != 0;
            let depth = mask & GL_DEPTH_BUFFER_BIT != 0;
            let stencil = mask & GL_STENCIL_BUFFER_BIT != 0;
            if mask & !CLEAR_MASK != 0 || (stencil && !depth) {
                return Err(Error::InvalidValue);
            }
            gl.check_framebuffer()?;

            if mask & GL_EARLY_DEPTH_BUFFER_BIT_PICA != 0 {
                gl.ctx.dirty.insert(DirtyFlags::EARLY_DEPTH_CLEAR);
            }
            if !color && !depth {
                return Ok(());
            }

            gl.resolve()?;
            gl.flush_commands()?;

            let target = gl
                .ctx
                .framebuffer
                .and_then(|fb| gl.objects.render_target(fb))
                .unwrap_or_default();
            let mut fills: ArrayVec<MemoryFill, 2> = ArrayVec::new();
            if let Some(surface) = target.color.filter(|_| color) {
                let value = translate::convert_rgba8(surface.format, gl.ctx.clear_color);
                fills.push(surface_fill(&surface, value));
            }
            if let Some(surface) = target.depth.filter(|_| depth) {
                let value = translate::clear_depth(
                    surface.format,
                    gl.ctx.clear_depth,
                    gl.ctx.clear_stencil as u8,
                );
                fills.push(surface_fill(&surface, value));
            }
            if fills.is_empty() {
                return Ok(());
            }

            // the fill engine takes its regions in address order
            fills.sort_unstable_by_key(|f| f.start);
            log::trace!("Clearing {} buffer(s)", fills.len());
            gl.ctx.queue.add(&mut *gl.platform, GxCommand::MemoryFill(fills));
            Ok(())
        })
    }

    /// Draw `count` vertices from the enabled attribute arrays
    pub fn draw_arrays(&mut self, mode: GLenum, first: GLint, count: GLsizei) {
        self.dispatch(|gl| {
            let prim = translate::primitive_mode(mode)?;
            if count < 0 {
                return Err(Error::InvalidValue);
            }
            gl.check_framebuffer()?;
            gl.resolve()?;
            gpu::draw_arrays(&mut gl.ctx.cmd, prim, first, count)?;
            gl.ctx.dirty.insert(DirtyFlags::DRAW);
            Ok(())
        })
    }

    /// Draw `count` indexed vertices
    ///
    /// `offset` locates the indices inside the bound element buffer, or is
    /// a physical address in linear memory when no element buffer is bound.
    pub fn draw_elements(&mut self, mode: GLenum, count: GLsizei, ty: GLenum, offset: usize) {
        self.dispatch(|gl| {
            let prim = translate::primitive_mode(mode)?;
            let index_type = translate::index_type(ty)?;
            if count < 0 {
                return Err(Error::InvalidValue);
            }
            gl.check_framebuffer()?;
            let offset = gl.index_offset(offset)?;
            gl.resolve()?;
            gpu::draw_elements(&mut gl.ctx.cmd, prim, count, index_type, offset)?;
            gl.ctx.dirty.insert(DirtyFlags::DRAW);
            Ok(())
        })
    }

    /// Submit everything and wait for the hardware
    pub fn finish(&mut self) {
        self.dispatch(|gl| {
            gl.resolve()?;
            gl.flush_and_run()
        })
    }

    /// Submit everything without waiting
    pub fn flush(&mut self) {
        self.dispatch(|gl| {
            gl.resolve()?;
            gl.flush_commands()
        })
    }

    /// Present the color buffer of the bound framebuffer
    ///
    /// The frame is copied to the target screen's display buffer by a
    /// display transfer; the screen flips once that transfer completes.
    /// Only one transfer is outstanding at a time.
    pub fn swap_buffers(&mut self) {
        self.dispatch(|gl| {
            gl.resolve()?;
            gl.flush_and_run()?;

            let Some(color) = gl
                .ctx
                .framebuffer
                .and_then(|fb| gl.objects.render_target(fb))
                .and_then(|target| target.color)
            else {
                return Ok(());
            };

            let settings = gl.ctx.settings;
            let display = gl
                .platform
                .display_buffer(settings.target_screen, settings.target_side);
            if display.addr.is_null() {
                return Err(Error::InvalidOperation);
            }
            let flags = queue::transfer_flags(
                translate::transfer_format(color.format)?,
                translate::transfer_format(translate::display_format(display.format)?)?,
                settings.transfer_scale as u32,
            );
            // display buffers are stored rotated
            let transfer = DisplayTransfer {
                src: color.addr,
                src_dim: queue::buffer_dim(color.width, color.height),
                dst: display.addr,
                dst_dim: queue::buffer_dim(display.height, display.width),
                flags,
            };

            gl.ctx.queue.wait(&mut *gl.platform);
            gl.ctx.queue.set_completion(present, settings.target_screen);
            gl.ctx
                .queue
                .add(&mut *gl.platform, GxCommand::DisplayTransfer(transfer));
            log::debug!(
                "Swap: {} -> {} ({:?})",
                transfer.src,
                transfer.dst,
                settings.target_screen
            );
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::tests::bind_target;
    use crate::gpu::tests::decode;
    use crate::shader::program::tests::bound;
    use crate::sim::{LINEAR_BASE, SimPlatform};
    use crate::state::Context;
    use glass_cmd::regs;
    use glass_core::error::{
        GL_INVALID_ENUM, GL_INVALID_FRAMEBUFFER_OPERATION, GL_INVALID_VALUE, GL_NO_ERROR,
    };

    fn ctx(glass: &Glass<SimPlatform>) -> &Context {
        glass.context(glass.current_context().unwrap()).unwrap()
    }

    fn value_of(words: &[u32], reg: u16) -> Option<u32> {
        decode(words).into_iter().rev().find(|w| w.0 == reg).map(|w| w.2)
    }

    #[test]
    fn test_clear_and_swap() {
        let mut glass = bound();
        let sim = glass.platform().clone();
        let (_, color, _) = bind_target(&mut glass, Some((GL_RGB565, 400, 240)), None);
        assert_ne!(color, 0);

        glass.clear_color(0.40625, 0.6875, 0.84375, 1.0);
        glass.clear(GL_COLOR_BUFFER_BIT);
        assert_eq!(glass.get_error(), GL_NO_ERROR);

        let fill = {
            let state = sim.state();
            assert_eq!(state.fills.len(), 1);
            assert_eq!(state.fills[0].len(), 1);
            state.fills[0][0]
        };
        assert_eq!(fill.value, 0x3DF7);
        assert_eq!(fill.end - fill.start, 400 * 240 * 2);
        assert_eq!(fill.control, queue::fill_control(2));
        assert_eq!(sim.read(fill.start, 4).unwrap(), [0xF7, 0x3D, 0xF7, 0x3D]);
        assert_eq!(
            sim.read(fill.start.offset(400 * 240 * 2 - 2), 2).unwrap(),
            [0xF7, 0x3D]
        );

        glass.swap_buffers();
        assert_eq!(glass.get_error(), GL_NO_ERROR);
        {
            let state = sim.state();
            assert_eq!(state.transfers.len(), 1);
            let t = state.transfers[0];
            assert_eq!(t.src, fill.start);
            assert_eq!(t.src_dim, queue::buffer_dim(400, 240));
            assert_eq!(t.dst_dim, queue::buffer_dim(400, 240));
            // RGB565 into the RGB8 display
            assert_eq!(t.flags, queue::transfer_flags(2, 1, 0));
            assert!(state.presents.is_empty());
        }

        // the flip happens once the transfer is known to be done
        glass.finish();
        assert_eq!(sim.state().presents, [Screen::Top]);
        glass.finish();
        assert_eq!(sim.state().presents.len(), 1);
    }

    #[test]
    fn test_swap_targets_configured_screen() {
        let mut glass = bound();
        let sim = glass.platform().clone();
        let handle = glass.current_context().unwrap();
        glass.context_settings_mut(handle).unwrap().target_screen = Screen::Bottom;
        bind_target(&mut glass, Some((GL_RGBA8_OES, 320, 240)), None);

        glass.swap_buffers();
        glass.swap_buffers();
        assert_eq!(glass.get_error(), GL_NO_ERROR);

        let state = sim.state();
        assert_eq!(state.transfers.len(), 2);
        assert_eq!(state.transfers[0].dst_dim, queue::buffer_dim(320, 240));
        // the second swap waited for the first transfer
        assert_eq!(state.presents, [Screen::Bottom]);
    }

    #[test]
    fn test_swap_without_color_buffer() {
        let mut glass = bound();
        let sim = glass.platform().clone();
        bind_target(&mut glass, None, Some((GL_DEPTH_COMPONENT16, 64, 64)));
        glass.swap_buffers();
        assert_eq!(glass.get_error(), GL_NO_ERROR);
        assert!(sim.state().transfers.is_empty());
    }

    #[test]
    fn test_clear_color_and_depth_in_address_order() {
        let mut glass = bound();
        let sim = glass.platform().clone();
        bind_target(
            &mut glass,
            Some((GL_RGBA8_OES, 64, 32)),
            Some((GL_DEPTH24_STENCIL8_OES, 64, 32)),
        );
        glass.clear_color(1.0, 0.0, 0.0, 1.0);
        glass.clear_stencil(0x12);
        glass.clear(GL_COLOR_BUFFER_BIT | GL_DEPTH_BUFFER_BIT | GL_STENCIL_BUFFER_BIT);
        assert_eq!(glass.get_error(), GL_NO_ERROR);

        let state = sim.state();
        let fills = &state.fills[0];
        assert_eq!(fills.len(), 2);
        assert!(fills[0].start < fills[1].start);
        assert_eq!(fills[0].value, 0xFF00_00FF);
        assert_eq!(fills[1].value, 0xFFFF_FF12);
        assert_eq!(fills[1].control, queue::fill_control(4));
    }

    #[test]
    fn test_clear_submits_pending_commands_first() {
        let mut glass = bound();
        let sim = glass.platform().clone();
        bind_target(&mut glass, Some((GL_RGB565, 16, 16)), None);
        glass.clear(GL_COLOR_BUFFER_BIT);

        let state = sim.state();
        assert_eq!(state.command_lists.len(), 1);
        assert_eq!(state.fills.len(), 1);
        assert!(ctx(&glass).cmd.offset() > 0);
        assert_eq!(ctx(&glass).cmd.pending_len(), 0);
    }

    #[test]
    fn test_clear_validation() {
        let mut glass = bound();
        bind_target(&mut glass, Some((GL_RGB565, 16, 16)), None);
        glass.clear(GL_STENCIL_BUFFER_BIT);
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);
        glass.clear(0x1);
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);

        let mut glass = bound();
        glass.clear(GL_COLOR_BUFFER_BIT);
        assert_eq!(glass.get_error(), GL_INVALID_FRAMEBUFFER_OPERATION);
    }

    #[test]
    fn test_clear_early_depth_only_marks_dirty() {
        let mut glass = bound();
        let sim = glass.platform().clone();
        bind_target(&mut glass, Some((GL_RGB565, 16, 16)), None);
        glass.clear(GL_EARLY_DEPTH_BUFFER_BIT_PICA);
        assert_eq!(glass.get_error(), GL_NO_ERROR);
        assert!(ctx(&glass).dirty.contains(DirtyFlags::EARLY_DEPTH_CLEAR));
        assert!(sim.state().fills.is_empty());
    }

    #[test]
    fn test_draw_incomplete_framebuffer() {
        let mut glass = bound();
        let fb = glass.gen_framebuffers(1)[0];
        glass.bind_framebuffer(GL_FRAMEBUFFER, fb);
        let before = ctx(&glass).cmd.pending().to_vec();

        glass.draw_arrays(GL_TRIANGLES, 0, 3);
        assert_eq!(glass.get_error(), GL_INVALID_FRAMEBUFFER_OPERATION);
        glass.draw_elements(GL_TRIANGLES, 3, GL_UNSIGNED_SHORT, 0);
        assert_eq!(glass.get_error(), GL_INVALID_FRAMEBUFFER_OPERATION);
        assert_eq!(ctx(&glass).cmd.pending(), before.as_slice());
    }

    #[test]
    fn test_draw_arrays_emits_and_marks_draw() {
        let mut glass = bound();
        bind_target(&mut glass, Some((GL_RGB565, 16, 16)), None);
        glass.draw_arrays(GL_TRIANGLE_STRIP, 2, 4);
        assert_eq!(glass.get_error(), GL_NO_ERROR);

        let ctx = ctx(&glass);
        assert!(ctx.dirty.contains(DirtyFlags::DRAW));
        assert_eq!(value_of(ctx.cmd.pending(), regs::DRAWARRAYS), Some(1));
        assert_eq!(value_of(ctx.cmd.pending(), regs::NUMVERTICES), Some(4));
        assert_eq!(value_of(ctx.cmd.pending(), regs::VERTEX_OFFSET), Some(2));
    }

    #[test]
    fn test_draw_validation() {
        let mut glass = bound();
        bind_target(&mut glass, Some((GL_RGB565, 16, 16)), None);
        glass.draw_arrays(GL_FLOAT, 0, 3);
        assert_eq!(glass.get_error(), GL_INVALID_ENUM);
        glass.draw_arrays(GL_TRIANGLES, 0, -1);
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);
        glass.draw_elements(GL_TRIANGLES, 3, GL_FLOAT, 0);
        assert_eq!(glass.get_error(), GL_INVALID_ENUM);
        glass.draw_elements(GL_TRIANGLES, -3, GL_UNSIGNED_BYTE, 0);
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);
    }

    #[test]
    fn test_draw_elements_offsets() {
        let mut glass = bound();
        bind_target(&mut glass, Some((GL_RGB565, 16, 16)), None);

        // absolute address without an element buffer
        glass.draw_elements(GL_TRIANGLES, 3, GL_UNSIGNED_BYTE, (LINEAR_BASE + 0x100) as usize);
        assert_eq!(glass.get_error(), GL_NO_ERROR);
        let config = value_of(ctx(&glass).cmd.pending(), regs::INDEXBUFFER_CONFIG);
        assert_eq!(config, Some(0x100));

        let ibo = glass.gen_buffers(1)[0];
        glass.bind_buffer(GL_ELEMENT_ARRAY_BUFFER, ibo);
        glass.buffer_data(GL_ELEMENT_ARRAY_BUFFER, 12, Some(&[0; 12]), GL_STATIC_DRAW);
        let addr = {
            let objects = glass.objects();
            let h = objects.check::<crate::object::BufferObject>(ibo).unwrap();
            objects.get(h).unwrap().addr
        };
        glass.draw_elements(GL_TRIANGLES, 3, GL_UNSIGNED_SHORT, 4);
        assert_eq!(glass.get_error(), GL_NO_ERROR);
        let config = value_of(ctx(&glass).cmd.pending(), regs::INDEXBUFFER_CONFIG);
        assert_eq!(config, Some((addr.raw() + 4 - LINEAR_BASE) | 1 << 31));

        glass.bind_buffer(GL_ELEMENT_ARRAY_BUFFER, 0);
        glass.draw_elements(GL_TRIANGLES, 3, GL_UNSIGNED_SHORT, 0x10);
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);
    }

    #[test]
    fn test_flush_keeps_committed_offset() {
        let mut glass = bound();
        let sim = glass.platform().clone();
        bind_target(&mut glass, Some((GL_RGB565, 16, 16)), None);

        glass.draw_arrays(GL_TRIANGLES, 0, 3);
        glass.flush();
        let first = ctx(&glass).cmd.offset();
        assert!(first > 0);

        glass.draw_arrays(GL_TRIANGLES, 0, 3);
        glass.flush();
        assert!(ctx(&glass).cmd.offset() > first);
        assert_eq!(sim.state().command_lists.len(), 2);

        // nothing new to submit
        glass.flush();
        assert_eq!(sim.state().command_lists.len(), 2);
    }

    #[test]
    fn test_finish_resets_command_buffer() {
        let mut glass = bound();
        let sim = glass.platform().clone();
        bind_target(&mut glass, Some((GL_RGB565, 16, 16)), None);
        glass.draw_arrays(GL_TRIANGLES, 0, 3);
        glass.finish();
        assert_eq!(glass.get_error(), GL_NO_ERROR);

        assert_eq!(ctx(&glass).cmd.offset(), 0);
        assert_eq!(ctx(&glass).cmd.pending_len(), 0);
        assert!(ctx(&glass).queue.is_empty());
        assert_eq!(value_of(&sim.command_words(), regs::DRAWARRAYS), Some(1));
    }

    #[test]
    fn test_clear_values_clamped() {
        let mut glass = bound();
        glass.clear_color(2.0, -1.0, 0.5, 1.0);
        glass.clear_depthf(3.0);
        assert_eq!(ctx(&glass).clear_color, 0xFF00_7FFF);
        assert_eq!(ctx(&glass).clear_depth, 1.0);
    }
}
