//! # Framebuffers
//!
//! Framebuffer and renderbuffer objects. A framebuffer has one color and one
//! depth (or depth-stencil) attachment; renderbuffer storage lives in VRAM.
//!
//! ```text
//!   Framebuffer ─┬─ color ─▶ Renderbuffer (VRAM bank A)
//!                └─ depth ─▶ Renderbuffer (VRAM bank B)
//! ```

use alloc::vec::Vec;

use glass_core::{Error, GLenum, GLint, GLsizei, GLuint, PhysAddr, Result};

use crate::context::{Current, Glass};
use crate::enums::*;
use crate::gpu::{RenderTarget, Surface};
use crate::object::{
    FramebufferHandle, FramebufferObject, ObjectStore, RenderbufferHandle, RenderbufferObject,
};
use crate::platform::{Platform, VramBank};
use crate::state::DirtyFlags;
use crate::translate;

/// Largest renderbuffer edge
pub const MAX_RENDERBUFFER_SIZE: GLsizei = 1024;

// =============================================================================
// RENDER TARGETS
// =============================================================================

impl ObjectStore {
    /// GPU view of a renderbuffer
    pub(crate) fn surface(&self, rb: RenderbufferHandle) -> Option<Surface> {
        self.get(rb).map(|rb| Surface {
            addr: rb.addr,
            format: rb.format,
            width: rb.width,
            height: rb.height,
        })
    }

    /// GPU view of a framebuffer's attachments
    pub(crate) fn render_target(&self, fb: FramebufferHandle) -> Option<RenderTarget> {
        let fb = self.get(fb)?;
        Some(RenderTarget {
            color: fb.color.and_then(|rb| self.surface(rb)),
            depth: fb.depth.and_then(|rb| self.surface(rb)),
        })
    }

    /// Completeness of a framebuffer binding
    pub(crate) fn framebuffer_status(&self, fb: Option<FramebufferHandle>) -> GLenum {
        let Some(target) = fb.and_then(|fb| self.render_target(fb)) else {
            return GL_FRAMEBUFFER_UNSUPPORTED;
        };
        if target.color.is_none() && target.depth.is_none() {
            return GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT;
        }

        let color_ok = target
            .color
            .is_none_or(|c| !c.addr.is_null() && translate::is_color_format(c.format));
        let depth_ok = target
            .depth
            .is_none_or(|d| !d.addr.is_null() && translate::is_depth_format(d.format));
        if !color_ok || !depth_ok {
            return GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT;
        }

        if let (Some(c), Some(d)) = (target.color, target.depth) {
            if c.width != d.width || c.height != d.height {
                return GL_FRAMEBUFFER_INCOMPLETE_DIMENSIONS;
            }
        }
        GL_FRAMEBUFFER_COMPLETE
    }
}

impl<P: Platform> Current<'_, P> {
    /// Fail unless the bound framebuffer is complete
    pub(crate) fn check_framebuffer(&self) -> Result<()> {
        if self.objects.framebuffer_status(self.ctx.framebuffer) != GL_FRAMEBUFFER_COMPLETE {
            return Err(Error::InvalidFramebufferOperation);
        }
        Ok(())
    }

    /// Check whether a renderbuffer is attached to the bound framebuffer
    fn attached_to_bound(&self, rb: RenderbufferHandle) -> bool {
        self.ctx
            .framebuffer
            .and_then(|fb| self.objects.get(fb))
            .is_some_and(|fb| fb.color == Some(rb) || fb.depth == Some(rb))
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

impl<P: Platform> Glass<P> {
    /// Create framebuffer names
    pub fn gen_framebuffers(&mut self, n: GLsizei) -> Vec<GLuint> {
        self.with_current(Vec::new(), |gl| {
            let n = usize::try_from(n).map_err(|_| Error::InvalidValue)?;
            let mut names = Vec::with_capacity(n);
            for _ in 0..n {
                match gl.objects.create(FramebufferObject::default()) {
                    Ok(h) => names.push(h.raw()),
                    Err(_) => {
                        gl.ctx.set_error(Error::OutOfMemory);
                        break;
                    }
                }
            }
            Ok(names)
        })
    }

    /// Create renderbuffer names
    pub fn gen_renderbuffers(&mut self, n: GLsizei) -> Vec<GLuint> {
        self.with_current(Vec::new(), |gl| {
            let n = usize::try_from(n).map_err(|_| Error::InvalidValue)?;
            let mut names = Vec::with_capacity(n);
            for _ in 0..n {
                match gl.objects.create(RenderbufferObject::default()) {
                    Ok(h) => names.push(h.raw()),
                    Err(_) => {
                        gl.ctx.set_error(Error::OutOfMemory);
                        break;
                    }
                }
            }
            Ok(names)
        })
    }

    /// Delete framebuffers; the bound one is unbound first
    pub fn delete_framebuffers(&mut self, framebuffers: &[GLuint]) {
        self.dispatch(|gl| {
            for &name in framebuffers {
                let Some(handle) = gl.objects.check::<FramebufferObject>(name) else {
                    continue;
                };
                if gl.ctx.framebuffer == Some(handle) {
                    gl.ctx.framebuffer = None;
                    gl.ctx.dirty |= DirtyFlags::FRAMEBUFFER;
                }
                gl.objects.remove(handle);
            }
            Ok(())
        })
    }

    /// Delete renderbuffers, detaching them from the bound framebuffer
    pub fn delete_renderbuffers(&mut self, renderbuffers: &[GLuint]) {
        self.dispatch(|gl| {
            for &name in renderbuffers {
                let Some(handle) = gl.objects.check::<RenderbufferObject>(name) else {
                    continue;
                };
                if let Some(fb) = gl.ctx.framebuffer.and_then(|fb| gl.objects.get_mut(fb)) {
                    if fb.color == Some(handle) {
                        fb.color = None;
                        gl.ctx.dirty |= DirtyFlags::FRAMEBUFFER;
                    } else if fb.depth == Some(handle) {
                        fb.depth = None;
                        gl.ctx.dirty |= DirtyFlags::FRAMEBUFFER;
                    }
                }
                if gl.ctx.renderbuffer == Some(handle) {
                    gl.ctx.renderbuffer = None;
                }
                if let Some(rb) = gl.objects.remove(handle) {
                    if !rb.addr.is_null() {
                        gl.platform.vram_free(rb.addr);
                    }
                }
            }
            Ok(())
        })
    }

    /// Bind a framebuffer as the render target, 0 for none
    pub fn bind_framebuffer(&mut self, target: GLenum, framebuffer: GLuint) {
        self.dispatch(|gl| {
            if target != GL_FRAMEBUFFER {
                return Err(Error::InvalidEnum);
            }
            let handle = match framebuffer {
                0 => None,
                name => Some(
                    gl.objects
                        .check::<FramebufferObject>(name)
                        .ok_or(Error::InvalidOperation)?,
                ),
            };
            if gl.ctx.framebuffer != handle {
                gl.ctx.framebuffer = handle;
                if let Some(fb) = handle.and_then(|h| gl.objects.get_mut(h)) {
                    fb.bound = true;
                }
                gl.ctx.dirty |= DirtyFlags::FRAMEBUFFER;
            }
            Ok(())
        })
    }

    /// Bind a renderbuffer for storage and queries, 0 for none
    pub fn bind_renderbuffer(&mut self, target: GLenum, renderbuffer: GLuint) {
        self.dispatch(|gl| {
            if target != GL_RENDERBUFFER {
                return Err(Error::InvalidEnum);
            }
            let handle = match renderbuffer {
                0 => None,
                name => Some(
                    gl.objects
                        .check::<RenderbufferObject>(name)
                        .ok_or(Error::InvalidOperation)?,
                ),
            };
            if gl.ctx.renderbuffer != handle {
                gl.ctx.renderbuffer = handle;
                if let Some(rb) = handle.and_then(|h| gl.objects.get_mut(h)) {
                    rb.bound = true;
                }
            }
            Ok(())
        })
    }

    /// Completeness of the bound framebuffer
    pub fn check_framebuffer_status(&mut self, target: GLenum) -> GLenum {
        self.with_current(0, |gl| {
            if target != GL_FRAMEBUFFER {
                return Err(Error::InvalidEnum);
            }
            Ok(gl.objects.framebuffer_status(gl.ctx.framebuffer))
        })
    }

    /// Attach a renderbuffer to the bound framebuffer, 0 to detach
    pub fn framebuffer_renderbuffer(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        renderbuffer_target: GLenum,
        renderbuffer: GLuint,
    ) {
        self.dispatch(|gl| {
            if target != GL_FRAMEBUFFER || renderbuffer_target != GL_RENDERBUFFER {
                return Err(Error::InvalidEnum);
            }
            let rb = match renderbuffer {
                0 => None,
                name => Some(
                    gl.objects
                        .check::<RenderbufferObject>(name)
                        .ok_or(Error::InvalidOperation)?,
                ),
            };
            let fb = gl
                .ctx
                .framebuffer
                .and_then(|fb| gl.objects.get_mut(fb))
                .ok_or(Error::InvalidOperation)?;
            match attachment {
                GL_COLOR_ATTACHMENT0 => fb.color = rb,
                GL_DEPTH_ATTACHMENT | GL_STENCIL_ATTACHMENT => fb.depth = rb,
                _ => return Err(Error::InvalidEnum),
            }
            gl.ctx.dirty |= DirtyFlags::FRAMEBUFFER;
            Ok(())
        })
    }

    /// Allocate storage for the bound renderbuffer
    ///
    /// Color buffers prefer VRAM bank A and depth buffers bank B; either
    /// falls back to the other bank.
    pub fn renderbuffer_storage(
        &mut self,
        target: GLenum,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    ) {
        self.dispatch(|gl| {
            let depth = translate::is_depth_format(internal_format);
            if target != GL_RENDERBUFFER
                || !(depth || translate::is_color_format(internal_format))
            {
                return Err(Error::InvalidEnum);
            }
            let valid = 1..=MAX_RENDERBUFFER_SIZE;
            if !valid.contains(&width) || !valid.contains(&height) {
                return Err(Error::InvalidValue);
            }
            let handle = gl.ctx.renderbuffer.ok_or(Error::InvalidOperation)?;
            let rb = gl.objects.get_mut(handle).ok_or(Error::InvalidOperation)?;

            if !rb.addr.is_null() {
                gl.platform.vram_free(rb.addr);
                rb.addr = PhysAddr::null();
            }

            let size = width as usize
                * height as usize
                * translate::pixel_bytes(internal_format) as usize;
            let bank = if depth { VramBank::B } else { VramBank::A };
            rb.addr = gl
                .platform
                .vram_alloc(size, bank)
                .or_else(|| gl.platform.vram_alloc(size, bank.other()))
                .ok_or(Error::OutOfMemory)?;
            rb.width = width as u32;
            rb.height = height as u32;
            rb.format = internal_format;
            log::debug!(
                "Renderbuffer {:?}: {}x{} format 0x{:x} at {}",
                handle,
                width,
                height,
                internal_format,
                rb.addr
            );

            if gl.attached_to_bound(handle) {
                gl.ctx.dirty |= DirtyFlags::FRAMEBUFFER;
            }
            Ok(())
        })
    }

    /// Parameter of the bound renderbuffer
    pub fn get_renderbuffer_parameteriv(&mut self, target: GLenum, pname: GLenum) -> GLint {
        self.with_current(0, |gl| {
            if target != GL_RENDERBUFFER {
                return Err(Error::InvalidEnum);
            }
            let rb = gl
                .ctx
                .renderbuffer
                .and_then(|h| gl.objects.get(h))
                .ok_or(Error::InvalidOperation)?;
            let [r, g, b, a, d, s] = translate::channel_bits(rb.format);
            let value = match pname {
                GL_RENDERBUFFER_WIDTH => rb.width,
                GL_RENDERBUFFER_HEIGHT => rb.height,
                GL_RENDERBUFFER_INTERNAL_FORMAT => rb.format,
                GL_RENDERBUFFER_RED_SIZE => r,
                GL_RENDERBUFFER_GREEN_SIZE => g,
                GL_RENDERBUFFER_BLUE_SIZE => b,
                GL_RENDERBUFFER_ALPHA_SIZE => a,
                GL_RENDERBUFFER_DEPTH_SIZE => d,
                GL_RENDERBUFFER_STENCIL_SIZE => s,
                _ => return Err(Error::InvalidEnum),
            };
            Ok(value as GLint)
        })
    }

    /// Check a framebuffer name that has been bound at least once
    pub fn is_framebuffer(&self, framebuffer: GLuint) -> bool {
        let objects = self.objects();
        objects
            .check::<FramebufferObject>(framebuffer)
            .and_then(|h| objects.get(h))
            .is_some_and(|fb| fb.bound)
    }

    /// Check a renderbuffer name that has been bound at least once
    pub fn is_renderbuffer(&self, renderbuffer: GLuint) -> bool {
        let objects = self.objects();
        objects
            .check::<RenderbufferObject>(renderbuffer)
            .and_then(|h| objects.get(h))
            .is_some_and(|rb| rb.bound)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::shader::program::tests::bound;
    use crate::sim::{SimPlatform, VRAM_A_BASE, VRAM_B_BASE};
    use glass_core::error::{
        GL_INVALID_ENUM, GL_INVALID_OPERATION, GL_INVALID_VALUE, GL_NO_ERROR,
    };

    /// Bind a new framebuffer with the given attachments; returns (fb, color, depth)
    pub(crate) fn bind_target(
        glass: &mut Glass<SimPlatform>,
        color: Option<(GLenum, GLsizei, GLsizei)>,
        depth: Option<(GLenum, GLsizei, GLsizei)>,
    ) -> (GLuint, GLuint, GLuint) {
        let fb = glass.gen_framebuffers(1)[0];
        glass.bind_framebuffer(GL_FRAMEBUFFER, fb);
        let mut names = [0; 2];
        let layout = [(color, GL_COLOR_ATTACHMENT0), (depth, GL_DEPTH_ATTACHMENT)];
        for (slot, (desc, attachment)) in layout.into_iter().enumerate() {
            let Some((format, w, h)) = desc else {
                continue;
            };
            let rb = glass.gen_renderbuffers(1)[0];
            glass.bind_renderbuffer(GL_RENDERBUFFER, rb);
            glass.renderbuffer_storage(GL_RENDERBUFFER, format, w, h);
            glass.framebuffer_renderbuffer(GL_FRAMEBUFFER, attachment, GL_RENDERBUFFER, rb);
            names[slot] = rb;
        }
        (fb, names[0], names[1])
    }

    fn status(glass: &mut Glass<SimPlatform>) -> GLenum {
        glass.check_framebuffer_status(GL_FRAMEBUFFER)
    }

    #[test]
    fn test_status_without_framebuffer() {
        let mut glass = bound();
        assert_eq!(status(&mut glass), GL_FRAMEBUFFER_UNSUPPORTED);
        glass.check_framebuffer_status(GL_RENDERBUFFER);
        assert_eq!(glass.get_error(), GL_INVALID_ENUM);
    }

    #[test]
    fn test_status_missing_attachment() {
        let mut glass = bound();
        bind_target(&mut glass, None, None);
        assert_eq!(status(&mut glass), GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT);
    }

    #[test]
    fn test_status_complete_and_dimensions() {
        let mut glass = bound();
        bind_target(
            &mut glass,
            Some((GL_RGBA8_OES, 400, 240)),
            Some((GL_DEPTH24_STENCIL8_OES, 400, 240)),
        );
        assert_eq!(status(&mut glass), GL_FRAMEBUFFER_COMPLETE);

        bind_target(
            &mut glass,
            Some((GL_RGBA8_OES, 400, 240)),
            Some((GL_DEPTH_COMPONENT16, 320, 240)),
        );
        assert_eq!(status(&mut glass), GL_FRAMEBUFFER_INCOMPLETE_DIMENSIONS);
        assert_eq!(glass.get_error(), GL_NO_ERROR);
    }

    #[test]
    fn test_status_attachment_without_storage() {
        let mut glass = bound();
        let fb = glass.gen_framebuffers(1)[0];
        let rb = glass.gen_renderbuffers(1)[0];
        glass.bind_framebuffer(GL_FRAMEBUFFER, fb);
        glass.framebuffer_renderbuffer(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0, GL_RENDERBUFFER, rb);
        assert_eq!(status(&mut glass), GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT);
    }

    #[test]
    fn test_status_depth_format_in_color_slot() {
        let mut glass = bound();
        bind_target(&mut glass, None, Some((GL_DEPTH_COMPONENT16, 8, 8)));
        let rb = glass.gen_renderbuffers(1)[0];
        glass.bind_renderbuffer(GL_RENDERBUFFER, rb);
        glass.renderbuffer_storage(GL_RENDERBUFFER, GL_DEPTH_COMPONENT16, 8, 8);
        glass.framebuffer_renderbuffer(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0, GL_RENDERBUFFER, rb);
        assert_eq!(status(&mut glass), GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT);
    }

    #[test]
    fn test_storage_bank_preference() {
        let mut glass = bound();
        let (_, color, depth) = bind_target(
            &mut glass,
            Some((GL_RGB565, 16, 16)),
            Some((GL_DEPTH_COMPONENT24_OES, 16, 16)),
        );
        let objects = glass.objects();
        let addr = |name| {
            let h = objects.check::<RenderbufferObject>(name).unwrap();
            objects.get(h).unwrap().addr.raw()
        };
        assert!(addr(color) >= VRAM_A_BASE && addr(color) < VRAM_B_BASE);
        assert!(addr(depth) >= VRAM_B_BASE);
    }

    #[test]
    fn test_storage_validation() {
        let mut glass = bound();
        glass.renderbuffer_storage(GL_RENDERBUFFER, GL_RGBA4, 8, 8);
        assert_eq!(glass.get_error(), GL_INVALID_OPERATION);

        let rb = glass.gen_renderbuffers(1)[0];
        glass.bind_renderbuffer(GL_RENDERBUFFER, rb);
        glass.renderbuffer_storage(GL_RENDERBUFFER, GL_RGBA4, 0, 8);
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);
        glass.renderbuffer_storage(GL_RENDERBUFFER, GL_RGBA4, 8, 1025);
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);
        glass.renderbuffer_storage(GL_RENDERBUFFER, GL_UNSIGNED_BYTE, 8, 8);
        assert_eq!(glass.get_error(), GL_INVALID_ENUM);
    }

    #[test]
    fn test_renderbuffer_parameters() {
        let mut glass = bound();
        let rb = glass.gen_renderbuffers(1)[0];
        glass.bind_renderbuffer(GL_RENDERBUFFER, rb);
        assert_eq!(
            glass.get_renderbuffer_parameteriv(GL_RENDERBUFFER, GL_RENDERBUFFER_INTERNAL_FORMAT),
            GL_RGBA4 as GLint
        );
        glass.renderbuffer_storage(GL_RENDERBUFFER, GL_RGB565, 64, 32);
        let get = |glass: &mut Glass<SimPlatform>, pname| {
            glass.get_renderbuffer_parameteriv(GL_RENDERBUFFER, pname)
        };
        assert_eq!(get(&mut glass, GL_RENDERBUFFER_WIDTH), 64);
        assert_eq!(get(&mut glass, GL_RENDERBUFFER_HEIGHT), 32);
        assert_eq!(get(&mut glass, GL_RENDERBUFFER_GREEN_SIZE), 6);
        assert_eq!(get(&mut glass, GL_RENDERBUFFER_ALPHA_SIZE), 0);
        assert_eq!(get(&mut glass, GL_RENDERBUFFER_DEPTH_SIZE), 0);
    }

    #[test]
    fn test_delete_bound_framebuffer_unbinds() {
        let mut glass = bound();
        let (fb, ..) = bind_target(&mut glass, Some((GL_RGBA4, 8, 8)), None);
        glass.dispatch(|gl| {
            gl.ctx.dirty = DirtyFlags::empty();
            Ok(())
        });

        glass.delete_framebuffers(&[fb]);
        let current = glass.current_context().unwrap();
        let ctx = glass.context(current).unwrap();
        assert_eq!(ctx.framebuffer, None);
        assert!(ctx.dirty.contains(DirtyFlags::FRAMEBUFFER));
        assert!(!glass.is_framebuffer(fb));
    }

    #[test]
    fn test_delete_renderbuffer_detaches_and_frees() {
        let mut glass = bound();
        let sim = glass.platform().clone();
        let before = sim.state().allocations();
        let (_, color, _) = bind_target(&mut glass, Some((GL_RGBA4, 8, 8)), None);
        assert_eq!(sim.state().allocations(), before + 1);

        glass.delete_renderbuffers(&[color]);
        assert_eq!(sim.state().allocations(), before);
        assert_eq!(status(&mut glass), GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT);
        assert!(!glass.is_renderbuffer(color));
    }

    #[test]
    fn test_names_valid_once_bound() {
        let mut glass = bound();
        let fb = glass.gen_framebuffers(1)[0];
        assert!(!glass.is_framebuffer(fb));
        glass.bind_framebuffer(GL_FRAMEBUFFER, fb);
        assert!(glass.is_framebuffer(fb));

        glass.bind_framebuffer(GL_FRAMEBUFFER, 0x1234_5678);
        assert_eq!(glass.get_error(), GL_INVALID_OPERATION);
        assert!(glass.gen_framebuffers(-1).is_empty());
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);
    }
}
