//! # Buffer Objects
//!
//! Vertex and index data in linear memory. Attribute pointers and element
//! offsets are resolved against the buffer bound to their target.
//!
//! ```text
//!   ARRAY_BUFFER ──────────▶ BufferObject ── linear heap
//!   ELEMENT_ARRAY_BUFFER ──▶ BufferObject ── linear heap
//! ```

use alloc::vec::Vec;

use glass_core::{Error, GLenum, GLint, GLsizei, GLuint, PhysAddr, Result};

use crate::context::{Current, Glass};
use crate::enums::*;
use crate::object::{BufferHandle, BufferObject};
use crate::platform::Platform;

impl<P: Platform> Current<'_, P> {
    /// Binding slot for a buffer target
    fn buffer_binding(&mut self, target: GLenum) -> Result<&mut Option<BufferHandle>> {
        match target {
            GL_ARRAY_BUFFER => Ok(&mut self.ctx.array_buffer),
            GL_ELEMENT_ARRAY_BUFFER => Ok(&mut self.ctx.element_buffer),
            _ => Err(Error::InvalidEnum),
        }
    }

    /// Buffer bound to a target
    fn bound_buffer(&mut self, target: GLenum) -> Result<BufferHandle> {
        self.buffer_binding(target)?.ok_or(Error::InvalidOperation)
    }
}

impl<P: Platform> Glass<P> {
    /// Create buffer names
    pub fn gen_buffers(&mut self, n: GLsizei) -> Vec<GLuint> {
        self.with_current(Vec::new(), |gl| {
            let n = usize::try_from(n).map_err(|_| Error::InvalidValue)?;
            let mut names = Vec::with_capacity(n);
            for _ in 0..n {
                match gl.objects.create(BufferObject::default()) {
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

    /// Delete buffers, unbinding them and releasing their storage
    pub fn delete_buffers(&mut self, buffers: &[GLuint]) {
        self.dispatch(|gl| {
            for &name in buffers {
                let Some(handle) = gl.objects.check::<BufferObject>(name) else {
                    continue;
                };
                if gl.ctx.array_buffer == Some(handle) {
                    gl.ctx.array_buffer = None;
                }
                if gl.ctx.element_buffer == Some(handle) {
                    gl.ctx.element_buffer = None;
                }
                if let Some(buffer) = gl.objects.remove(handle) {
                    if !buffer.addr.is_null() {
                        gl.platform.linear_free(buffer.addr);
                    }
                }
            }
            Ok(())
        })
    }

    /// Bind a buffer to a target, 0 to unbind
    pub fn bind_buffer(&mut self, target: GLenum, buffer: GLuint) {
        self.dispatch(|gl| {
            let handle = match buffer {
                0 => None,
                name => Some(
                    gl.objects
                        .check::<BufferObject>(name)
                        .ok_or(Error::InvalidOperation)?,
                ),
            };
            *gl.buffer_binding(target)? = handle;
            if let Some(buffer) = handle.and_then(|h| gl.objects.get_mut(h)) {
                buffer.bound = true;
            }
            Ok(())
        })
    }

    /// Allocate storage for the buffer bound to `target`
    ///
    /// `data`, when given, must hold at least `size` bytes and is copied in.
    /// Any previous storage is released first; a size of 0 leaves the
    /// buffer without storage.
    pub fn buffer_data(&mut self, target: GLenum, size: isize, data: Option<&[u8]>, usage: GLenum) {
        self.dispatch(|gl| {
            if !matches!(usage, GL_STREAM_DRAW | GL_STATIC_DRAW | GL_DYNAMIC_DRAW) {
                return Err(Error::InvalidEnum);
            }
            let size = usize::try_from(size).map_err(|_| Error::InvalidValue)?;
            let data = match data {
                Some(bytes) => Some(bytes.get(..size).ok_or(Error::InvalidValue)?),
                None => None,
            };
            let handle = gl.bound_buffer(target)?;
            let buffer = gl.objects.get_mut(handle).ok_or(Error::InvalidOperation)?;

            if !buffer.addr.is_null() {
                gl.platform.linear_free(buffer.addr);
                buffer.addr = PhysAddr::null();
                buffer.size = 0;
            }
            buffer.usage = usage;
            if size == 0 {
                return Ok(());
            }

            buffer.addr = gl.platform.linear_alloc(size).ok_or(Error::OutOfMemory)?;
            buffer.size = size;
            if let Some(bytes) = data {
                gl.platform.write(buffer.addr, bytes);
            }
            log::trace!("Buffer {:?}: {} bytes at {}", handle, size, buffer.addr);
            Ok(())
        })
    }

    /// Overwrite part of the buffer bound to `target`
    pub fn buffer_sub_data(&mut self, target: GLenum, offset: isize, data: &[u8]) {
        self.dispatch(|gl| {
            let handle = gl.bound_buffer(target)?;
            let buffer = gl.objects.get(handle).ok_or(Error::InvalidOperation)?;
            let offset = usize::try_from(offset).map_err(|_| Error::InvalidValue)?;
            let end = offset.checked_add(data.len()).ok_or(Error::InvalidValue)?;
            if end > buffer.size {
                return Err(Error::InvalidValue);
            }
            if !data.is_empty() {
                gl.platform.write(buffer.addr.offset(offset as u32), data);
            }
            Ok(())
        })
    }

    /// Parameter of the buffer bound to `target`
    pub fn get_buffer_parameteriv(&mut self, target: GLenum, pname: GLenum) -> GLint {
        self.with_current(0, |gl| {
            let handle = gl.bound_buffer(target)?;
            let buffer = gl.objects.get(handle).ok_or(Error::InvalidOperation)?;
            match pname {
                GL_BUFFER_SIZE => Ok(buffer.size as GLint),
                GL_BUFFER_USAGE => Ok(buffer.usage as GLint),
                _ => Err(Error::InvalidEnum),
            }
        })
    }

    /// Check a buffer name that has been bound at least once
    pub fn is_buffer(&self, buffer: GLuint) -> bool {
        let objects = self.objects();
        objects
            .check::<BufferObject>(buffer)
            .and_then(|h| objects.get(h))
            .is_some_and(|b| b.bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::program::tests::bound;
    use glass_core::error::{GL_INVALID_ENUM, GL_INVALID_OPERATION, GL_INVALID_VALUE, GL_NO_ERROR};

    fn bound_buffer_addr(glass: &Glass<impl Platform>, name: GLuint) -> PhysAddr {
        let objects = glass.objects();
        let h = objects.check::<BufferObject>(name).unwrap();
        objects.get(h).unwrap().addr
    }

    #[test]
    fn test_data_and_sub_data() {
        let mut glass = bound();
        let sim = glass.platform().clone();
        let vbo = glass.gen_buffers(1)[0];
        glass.bind_buffer(GL_ARRAY_BUFFER, vbo);
        glass.buffer_data(GL_ARRAY_BUFFER, 8, Some(&[1, 2, 3, 4, 5, 6, 7, 8]), GL_STATIC_DRAW);
        glass.buffer_sub_data(GL_ARRAY_BUFFER, 2, &[0xAA, 0xBB]);
        assert_eq!(glass.get_error(), GL_NO_ERROR);

        let addr = bound_buffer_addr(&glass, vbo);
        assert_eq!(sim.read(addr, 8).unwrap(), [1, 2, 0xAA, 0xBB, 5, 6, 7, 8]);
        assert_eq!(glass.get_buffer_parameteriv(GL_ARRAY_BUFFER, GL_BUFFER_SIZE), 8);
        assert_eq!(
            glass.get_buffer_parameteriv(GL_ARRAY_BUFFER, GL_BUFFER_USAGE),
            GL_STATIC_DRAW as GLint
        );

        glass.buffer_sub_data(GL_ARRAY_BUFFER, 7, &[0, 0]);
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);
    }

    #[test]
    fn test_data_replaces_storage() {
        let mut glass = bound();
        let sim = glass.platform().clone();
        let baseline = sim.state().allocations();
        let vbo = glass.gen_buffers(1)[0];
        glass.bind_buffer(GL_ARRAY_BUFFER, vbo);
        glass.buffer_data(GL_ARRAY_BUFFER, 16, None, GL_DYNAMIC_DRAW);
        glass.buffer_data(GL_ARRAY_BUFFER, 32, None, GL_DYNAMIC_DRAW);
        assert_eq!(sim.state().allocations(), baseline + 1);

        glass.buffer_data(GL_ARRAY_BUFFER, 0, None, GL_DYNAMIC_DRAW);
        assert_eq!(sim.state().allocations(), baseline);
        assert!(bound_buffer_addr(&glass, vbo).is_null());
    }

    #[test]
    fn test_data_validation() {
        let mut glass = bound();
        glass.buffer_data(GL_ARRAY_BUFFER, 4, None, GL_STATIC_DRAW);
        assert_eq!(glass.get_error(), GL_INVALID_OPERATION);

        let vbo = glass.gen_buffers(1)[0];
        glass.bind_buffer(GL_ELEMENT_ARRAY_BUFFER, vbo);
        glass.buffer_data(GL_ELEMENT_ARRAY_BUFFER, 4, None, GL_FLOAT);
        assert_eq!(glass.get_error(), GL_INVALID_ENUM);
        glass.buffer_data(GL_ELEMENT_ARRAY_BUFFER, -1, None, GL_STATIC_DRAW);
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);
        glass.buffer_data(GL_ELEMENT_ARRAY_BUFFER, 4, Some(&[1, 2]), GL_STATIC_DRAW);
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);
        glass.bind_buffer(GL_RENDERBUFFER, vbo);
        assert_eq!(glass.get_error(), GL_INVALID_ENUM);
    }

    #[test]
    fn test_delete_unbinds_and_frees() {
        let mut glass = bound();
        let sim = glass.platform().clone();
        let baseline = sim.state().allocations();
        let names = glass.gen_buffers(2);
        glass.bind_buffer(GL_ARRAY_BUFFER, names[0]);
        glass.buffer_data(GL_ARRAY_BUFFER, 4, None, GL_STREAM_DRAW);
        glass.bind_buffer(GL_ELEMENT_ARRAY_BUFFER, names[0]);
        assert!(glass.is_buffer(names[0]));
        assert!(!glass.is_buffer(names[1]));

        glass.delete_buffers(&[names[0], 0, 0xDEAD]);
        assert_eq!(glass.get_error(), GL_NO_ERROR);
        assert_eq!(sim.state().allocations(), baseline);
        assert!(!glass.is_buffer(names[0]));

        let ctx = glass.context(glass.current_context().unwrap()).unwrap();
        assert_eq!(ctx.array_buffer, None);
        assert_eq!(ctx.element_buffer, None);
    }
}
