//! # Vertex Attributes
//!
//! Sixteen attribute registers, up to twelve of which are fed from memory
//! through the vertex loader slots. A register that is not enabled reads
//! its fixed value.
//!
//! ```text
//!   slot 0..12 ──▶ register 0..16 ──▶ { array: phys, type, count, stride }
//!                                     { fixed: components[4] }
//! ```

use glass_core::{Error, GLboolean, GLenum, GLfloat, GLint, GLsizei, GLuint, PhysAddr, Result};

use crate::context::{Current, Glass};
use crate::enums::*;
use crate::object::ObjectStore;
use crate::platform::Platform;
use crate::state::{Attrib, DirtyFlags, NUM_ATTRIBS};

/// Validate an attribute register index
fn register(index: GLuint) -> Result<usize> {
    let index = index as usize;
    if index >= NUM_ATTRIBS {
        return Err(Error::InvalidValue);
    }
    Ok(index)
}

/// Integer view of an attribute parameter
fn read_int<P: Platform>(gl: &Current<'_, P>, index: usize, pname: GLenum) -> Option<GLint> {
    let attrib = &gl.ctx.attribs[index];
    let value = match pname {
        GL_VERTEX_ATTRIB_ARRAY_BUFFER_BINDING => ObjectStore::name(attrib.buffer) as GLint,
        GL_VERTEX_ATTRIB_ARRAY_SIZE => attrib.count as GLint,
        GL_VERTEX_ATTRIB_ARRAY_STRIDE => attrib.stride as GLint,
        GL_VERTEX_ATTRIB_ARRAY_TYPE => attrib.ty as GLint,
        GL_VERTEX_ATTRIB_ARRAY_NORMALIZED => GLint::from(glass_core::GL_FALSE),
        GL_VERTEX_ATTRIB_ARRAY_ENABLED => gl.ctx.attrib_slot(index).is_some() as GLint,
        _ => return None,
    };
    Some(value)
}

impl<P: Platform> Current<'_, P> {
    /// Make a register read a fixed value
    fn set_fixed_attrib(&mut self, index: GLuint, components: [GLfloat; 4]) -> Result<()> {
        let index = register(index)?;
        self.ctx.attribs[index] = Attrib {
            ty: GL_FLOAT,
            count: 4,
            stride: 16,
            buffer: None,
            phys: PhysAddr::null(),
            components,
        };
        self.ctx.dirty |= DirtyFlags::ATTRIBS;
        Ok(())
    }
}

impl<P: Platform> Glass<P> {
    /// Feed a register from memory; it takes the first free loader slot
    pub fn enable_vertex_attrib_array(&mut self, index: GLuint) {
        self.dispatch(|gl| {
            let index = register(index)?;
            if gl.ctx.attrib_slot(index).is_some() {
                return Ok(());
            }
            let free = gl
                .ctx
                .attrib_slots
                .iter_mut()
                .find(|slot| slot.is_none())
                .ok_or(Error::OutOfMemory)?;
            *free = Some(index as u8);
            gl.ctx.dirty |= DirtyFlags::ATTRIBS;
            Ok(())
        })
    }

    /// Stop feeding a register from memory
    pub fn disable_vertex_attrib_array(&mut self, index: GLuint) {
        self.dispatch(|gl| {
            let index = register(index)?;
            if let Some(slot) = gl.ctx.attrib_slot(index) {
                gl.ctx.attrib_slots[slot] = None;
                gl.ctx.dirty |= DirtyFlags::ATTRIBS;
            }
            Ok(())
        })
    }

    /// Fixed value `(x, 0, 0, 1)`
    pub fn vertex_attrib1f(&mut self, index: GLuint, x: GLfloat) {
        self.dispatch(|gl| gl.set_fixed_attrib(index, [x, 0.0, 0.0, 1.0]))
    }

    /// Fixed value `(x, y, 0, 1)`
    pub fn vertex_attrib2f(&mut self, index: GLuint, x: GLfloat, y: GLfloat) {
        self.dispatch(|gl| gl.set_fixed_attrib(index, [x, y, 0.0, 1.0]))
    }

    /// Fixed value `(x, y, z, 1)`
    pub fn vertex_attrib3f(&mut self, index: GLuint, x: GLfloat, y: GLfloat, z: GLfloat) {
        self.dispatch(|gl| gl.set_fixed_attrib(index, [x, y, z, 1.0]))
    }

    /// Fixed value `(x, y, z, w)`
    pub fn vertex_attrib4f(&mut self, index: GLuint, x: GLfloat, y: GLfloat, z: GLfloat, w: GLfloat) {
        self.dispatch(|gl| gl.set_fixed_attrib(index, [x, y, z, w]))
    }

    /// Vector form of [`Glass::vertex_attrib1f`]
    pub fn vertex_attrib1fv(&mut self, index: GLuint, v: &[GLfloat; 1]) {
        self.vertex_attrib1f(index, v[0]);
    }

    /// Vector form of [`Glass::vertex_attrib2f`]
    pub fn vertex_attrib2fv(&mut self, index: GLuint, v: &[GLfloat; 2]) {
        self.vertex_attrib2f(index, v[0], v[1]);
    }

    /// Vector form of [`Glass::vertex_attrib3f`]
    pub fn vertex_attrib3fv(&mut self, index: GLuint, v: &[GLfloat; 3]) {
        self.vertex_attrib3f(index, v[0], v[1], v[2]);
    }

    /// Vector form of [`Glass::vertex_attrib4f`]
    pub fn vertex_attrib4fv(&mut self, index: GLuint, v: &[GLfloat; 4]) {
        self.vertex_attrib4f(index, v[0], v[1], v[2], v[3]);
    }

    /// Describe an attribute array
    ///
    /// `offset` is relative to the bound ARRAY_BUFFER, or a physical address
    /// when none is bound. Normalization is not supported.
    pub fn vertex_attrib_pointer(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: GLboolean,
        stride: GLsizei,
        offset: usize,
    ) {
        self.dispatch(|gl| {
            if !matches!(ty, GL_BYTE | GL_UNSIGNED_BYTE | GL_SHORT | GL_FLOAT) {
                return Err(Error::InvalidEnum);
            }
            let index = register(index)?;
            if !(1..=4).contains(&size) || stride < 0 || normalized != glass_core::GL_FALSE {
                return Err(Error::InvalidValue);
            }

            let buffer = gl.ctx.array_buffer;
            let phys = match buffer.and_then(|h| gl.objects.get(h)) {
                Some(b) => b.addr.offset(offset as u32),
                None => PhysAddr::new(offset as u32),
            };
            gl.ctx.attribs[index] = Attrib {
                ty,
                count: size as u32,
                stride: stride as u32,
                buffer,
                phys,
                components: [0.0, 0.0, 0.0, 1.0],
            };
            gl.ctx.dirty |= DirtyFlags::ATTRIBS;
            Ok(())
        })
    }

    /// Float parameter of an attribute register
    ///
    /// CURRENT_VERTEX_ATTRIB fills all four values; other parameters fill
    /// the first.
    pub fn get_vertex_attribfv(&mut self, index: GLuint, pname: GLenum) -> [GLfloat; 4] {
        self.with_current([0.0; 4], |gl| {
            let index = register(index)?;
            if pname == GL_CURRENT_VERTEX_ATTRIB {
                return Ok(gl.ctx.attribs[index].components);
            }
            let value = read_int(gl, index, pname).ok_or(Error::InvalidEnum)?;
            Ok([value as GLfloat, 0.0, 0.0, 0.0])
        })
    }

    /// Integer parameter of an attribute register
    pub fn get_vertex_attribiv(&mut self, index: GLuint, pname: GLenum) -> [GLint; 4] {
        self.with_current([0; 4], |gl| {
            let index = register(index)?;
            if let Some(value) = read_int(gl, index, pname) {
                return Ok([value, 0, 0, 0]);
            }
            if pname == GL_CURRENT_VERTEX_ATTRIB {
                return Ok(gl.ctx.attribs[index].components.map(|c| c as GLint));
            }
            Err(Error::InvalidEnum)
        })
    }

    /// Array offset as given to [`Glass::vertex_attrib_pointer`]
    pub fn get_vertex_attrib_pointerv(&mut self, index: GLuint, pname: GLenum) -> usize {
        self.with_current(0, |gl| {
            let index = register(index)?;
            if pname != GL_VERTEX_ATTRIB_ARRAY_POINTER {
                return Err(Error::InvalidEnum);
            }
            let attrib = &gl.ctx.attribs[index];
            if attrib.phys.is_null() {
                return Ok(0);
            }
            let base = attrib.buffer.and_then(|h| gl.objects.get(h)).map(|b| b.addr);
            Ok(match base {
                Some(base) => (attrib.phys - base) as usize,
                None => attrib.phys.raw() as usize,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::program::tests::bound;
    use crate::sim::SimPlatform;
    use glass_core::error::{GL_INVALID_ENUM, GL_INVALID_VALUE, GL_NO_ERROR, GL_OUT_OF_MEMORY};

    fn ctx(glass: &Glass<SimPlatform>) -> &crate::state::Context {
        glass.context(glass.current_context().unwrap()).unwrap()
    }

    #[test]
    fn test_enable_takes_first_free_slot() {
        let mut glass = bound();
        glass.enable_vertex_attrib_array(3);
        glass.enable_vertex_attrib_array(7);
        glass.enable_vertex_attrib_array(3);
        glass.disable_vertex_attrib_array(3);
        glass.enable_vertex_attrib_array(9);
        assert_eq!(&ctx(&glass).attrib_slots[..3], &[Some(9), Some(7), None]);
        assert!(ctx(&glass).dirty.contains(DirtyFlags::ATTRIBS));
    }

    #[test]
    fn test_enable_runs_out_of_slots() {
        let mut glass = bound();
        for index in 0..12 {
            glass.enable_vertex_attrib_array(index);
        }
        assert_eq!(glass.get_error(), GL_NO_ERROR);
        glass.enable_vertex_attrib_array(12);
        assert_eq!(glass.get_error(), GL_OUT_OF_MEMORY);
        glass.enable_vertex_attrib_array(16);
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);
    }

    #[test]
    fn test_fixed_attrib_defaults() {
        let mut glass = bound();
        glass.vertex_attrib2f(1, 0.5, -2.0);
        assert_eq!(
            glass.get_vertex_attribfv(1, GL_CURRENT_VERTEX_ATTRIB),
            [0.5, -2.0, 0.0, 1.0]
        );
        glass.vertex_attrib4fv(1, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(glass.get_vertex_attribiv(1, GL_CURRENT_VERTEX_ATTRIB), [1, 2, 3, 4]);
        assert_eq!(glass.get_vertex_attribiv(1, GL_VERTEX_ATTRIB_ARRAY_STRIDE)[0], 16);
    }

    #[test]
    fn test_pointer_into_buffer() {
        let mut glass = bound();
        let vbo = glass.gen_buffers(1)[0];
        glass.bind_buffer(GL_ARRAY_BUFFER, vbo);
        glass.buffer_data(GL_ARRAY_BUFFER, 64, None, GL_STATIC_DRAW);
        glass.vertex_attrib_pointer(0, 3, GL_FLOAT, glass_core::GL_FALSE, 24, 12);
        assert_eq!(glass.get_error(), GL_NO_ERROR);

        let attrib = ctx(&glass).attribs[0];
        assert_eq!(attrib.count, 3);
        assert_eq!(attrib.components, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(glass.get_vertex_attrib_pointerv(0, GL_VERTEX_ATTRIB_ARRAY_POINTER), 12);
        assert_eq!(
            glass.get_vertex_attribiv(0, GL_VERTEX_ATTRIB_ARRAY_BUFFER_BINDING)[0],
            vbo as GLint
        );
        assert_eq!(glass.get_vertex_attribfv(0, GL_VERTEX_ATTRIB_ARRAY_TYPE)[0], GL_FLOAT as f32);
        assert_eq!(glass.get_vertex_attribiv(0, GL_VERTEX_ATTRIB_ARRAY_ENABLED)[0], 0);
    }

    #[test]
    fn test_pointer_validation() {
        let mut glass = bound();
        glass.vertex_attrib_pointer(0, 3, GL_UNSIGNED_SHORT, glass_core::GL_FALSE, 0, 0);
        assert_eq!(glass.get_error(), GL_INVALID_ENUM);
        glass.vertex_attrib_pointer(0, 5, GL_FLOAT, glass_core::GL_FALSE, 0, 0);
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);
        glass.vertex_attrib_pointer(0, 2, GL_FLOAT, glass_core::GL_TRUE, 0, 0);
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);
        glass.vertex_attrib_pointer(0, 2, GL_FLOAT, glass_core::GL_FALSE, -4, 0);
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);
        glass.get_vertex_attribfv(0, GL_VERTEX_ATTRIB_ARRAY_POINTER);
        assert_eq!(glass.get_error(), GL_INVALID_ENUM);
    }
}
