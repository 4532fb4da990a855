//! # Uniforms
//!
//! Uniform locations and value setters. A location packs the stage, the
//! index into that stage's uniform table and an array offset:
//!
//! ```text
//!   bit 16       bits 15..8     bits 7..0
//!   geometry  │  table index  │  element offset
//! ```
//!
//! Values stay in register encoding; every element written is unpacked,
//! overwritten and packed again.

use alloc::string::String;

use glass_core::{Error, GLboolean, GLenum, GLfloat, GLint, GLsizei, GLuint, Result};

use crate::context::Glass;
use crate::object::{ObjectStore, ProgramHandle, ShaderHandle};
use crate::platform::Platform;
use crate::shader::{Shader, UniformData, UniformInfo, UniformKind};
use crate::translate;

/// Location of no uniform
pub const NO_LOCATION: GLint = -1;

// =============================================================================
// LOCATIONS
// =============================================================================

/// Decoded uniform location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Location {
    geometry: bool,
    index: usize,
    offset: usize,
}

impl Location {
    fn encode(self) -> GLint {
        ((self.geometry as GLint) << 16) | ((self.index as GLint) << 8) | (self.offset as GLint & 0xFF)
    }

    fn decode(location: GLint) -> Self {
        Self {
            geometry: (location >> 16) & 1 != 0,
            index: ((location >> 8) & 0xFF) as usize,
            offset: (location & 0xFF) as usize,
        }
    }
}

/// Split `name[offset]` into its base name and offset
///
/// Struct members and built-in names are never settable.
fn parse_name(name: &str) -> Option<(&str, usize)> {
    if name.contains('.') || name.starts_with("gl_") {
        return None;
    }
    let Some(open) = name.find('[') else {
        return Some((name, 0));
    };
    let digits = name[open + 1..].strip_suffix(']')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((&name[..open], digits.parse().ok()?))
}

fn lookup(shader: &Shader, base: &str, offset: usize) -> Option<Location> {
    let index = shader.uniforms.iter().position(|u| u.name == base)?;
    let uniform = &shader.uniforms[index];
    if offset >= uniform.kind().limit() || offset >= uniform.count as usize {
        return None;
    }
    Some(Location {
        geometry: shader.is_geometry(),
        index,
        offset,
    })
}

impl ObjectStore {
    /// Linked shader a location refers to
    fn location_shader(&self, program: ProgramHandle, location: Location) -> Result<ShaderHandle> {
        let program = self.get(program).ok_or(Error::InvalidOperation)?;
        let stage = if location.geometry {
            program.linked_geometry
        } else {
            program.linked_vertex
        };
        stage.ok_or(Error::InvalidOperation)
    }

    fn uniform_mut(&mut self, program: ProgramHandle, location: Location) -> Result<&mut UniformInfo> {
        let shader = self.location_shader(program, location)?;
        self.get_mut(shader)
            .and_then(|s| s.uniforms.get_mut(location.index))
            .filter(|u| location.offset < u.count as usize)
            .ok_or(Error::InvalidOperation)
    }

    fn uniform(&self, program: ProgramHandle, location: Location) -> Result<&UniformInfo> {
        let shader = self.location_shader(program, location)?;
        self.get(shader)
            .and_then(|s| s.uniforms.get(location.index))
            .filter(|u| location.offset < u.count as usize)
            .ok_or(Error::InvalidOperation)
    }
}

// =============================================================================
// VALUE TRANSFORM
// =============================================================================

/// Values handed to a setter
#[derive(Debug, Clone, Copy)]
enum Values<'a> {
    Float(&'a [GLfloat]),
    Int(&'a [GLint]),
}

impl Values<'_> {
    fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
        }
    }

    fn float(&self, i: usize) -> f32 {
        match self {
            Self::Float(v) => v[i],
            Self::Int(v) => v[i] as f32,
        }
    }

    fn int(&self, i: usize) -> i32 {
        match self {
            Self::Float(v) => translate::round_to_int(v[i]),
            Self::Int(v) => v[i],
        }
    }

    fn truthy(&self, i: usize) -> bool {
        match self {
            Self::Float(v) => v[i] != 0.0,
            Self::Int(v) => v[i] != 0,
        }
    }
}

/// Overwrite `elements` elements of `components` values each, starting at
/// `offset`; the element count is clamped to the uniform's extent
fn write_elements(
    uniform: &mut UniformInfo,
    offset: usize,
    elements: usize,
    components: usize,
    values: Values<'_>,
) -> Result<()> {
    let compatible = matches!(
        (uniform.kind(), values),
        (UniformKind::Bool, _)
            | (UniformKind::Float, Values::Float(_))
            | (UniformKind::Int, Values::Int(_))
    );
    if !compatible {
        return Err(Error::InvalidOperation);
    }

    let elements = elements.min((uniform.count as usize).saturating_sub(offset));
    match &mut uniform.data {
        UniformData::BoolMask(mask) => {
            for e in 0..elements {
                let bit = 1u16 << (offset + e);
                if values.truthy(e * components) {
                    *mask |= bit;
                } else {
                    *mask &= !bit;
                }
            }
        }
        UniformData::IntVector(words) => {
            for (e, word) in words.iter_mut().skip(offset).take(elements).enumerate() {
                let mut v = translate::unpack_int_vector(*word);
                for (c, slot) in v.iter_mut().take(components).enumerate() {
                    *slot = values.int(e * components + c);
                }
                *word = translate::pack_int_vector(v);
            }
        }
        UniformData::FloatVectorList(vectors) => {
            for (e, packed) in vectors.iter_mut().skip(offset).take(elements).enumerate() {
                let mut v = translate::unpack_float_vector(*packed);
                for (c, slot) in v.iter_mut().take(components).enumerate() {
                    *slot = values.float(e * components + c);
                }
                *packed = translate::pack_float_vector(v);
            }
        }
    }
    uniform.dirty = true;
    Ok(())
}

/// Element at `offset` as four floats
fn read_element(uniform: &UniformInfo, offset: usize) -> [f32; 4] {
    match &uniform.data {
        UniformData::BoolMask(mask) => [((*mask >> offset) & 1) as f32, 0.0, 0.0, 0.0],
        UniformData::IntVector(words) => words
            .get(offset)
            .map_or([0; 4], |w| translate::unpack_int_vector(*w))
            .map(|c| c as f32),
        UniformData::FloatVectorList(vectors) => vectors
            .get(offset)
            .map_or([0.0; 4], |p| translate::unpack_float_vector(*p)),
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

impl<P: Platform> Glass<P> {
    /// Location of a settable uniform, or -1
    pub fn get_uniform_location(&mut self, program: GLuint, name: &str) -> GLint {
        self.with_current(NO_LOCATION, |gl| {
            let handle = gl.objects.program(program)?;
            let prog = gl.objects.get(handle).ok_or(Error::InvalidOperation)?;
            if !prog.is_linked() {
                return Err(Error::InvalidOperation);
            }
            let Some((base, offset)) = parse_name(name) else {
                return Ok(NO_LOCATION);
            };
            let location = [prog.linked_vertex, prog.linked_geometry]
                .into_iter()
                .flatten()
                .filter_map(|h| gl.objects.get(h))
                .find_map(|shader| lookup(shader, base, offset));
            Ok(location.map_or(NO_LOCATION, Location::encode))
        })
    }

    /// Name, element count and type of the `index`th uniform, vertex stage
    /// first
    pub fn get_active_uniform(&mut self, program: GLuint, index: GLuint) -> Option<(String, GLint, GLenum)> {
        self.with_current(None, |gl| {
            let handle = gl.objects.program(program)?;
            let prog = gl.objects.get(handle).ok_or(Error::InvalidOperation)?;
            let uniform = [prog.linked_vertex, prog.linked_geometry]
                .into_iter()
                .flatten()
                .filter_map(|h| gl.objects.get(h))
                .flat_map(|shader| shader.uniforms.iter())
                .nth(index as usize)
                .ok_or(Error::InvalidValue)?;
            Ok(Some((
                uniform.name.clone(),
                GLint::from(uniform.count),
                uniform.kind().gl_type(),
            )))
        })
    }

    fn set_uniform(&mut self, location: GLint, count: GLsizei, components: usize, values: Values<'_>) {
        self.dispatch(|gl| {
            let program = gl.ctx.program.ok_or(Error::InvalidOperation)?;
            if location == NO_LOCATION {
                return Ok(());
            }
            let elements = usize::try_from(count).map_err(|_| Error::InvalidValue)?;
            let needed = elements.checked_mul(components).ok_or(Error::InvalidValue)?;
            if values.len() < needed {
                return Err(Error::InvalidValue);
            }
            let location = Location::decode(location);
            let uniform = gl.objects.uniform_mut(program, location)?;
            write_elements(uniform, location.offset, elements, components, values)
        })
    }

    /// Set a float (or bool) uniform
    pub fn uniform1f(&mut self, location: GLint, x: GLfloat) {
        self.set_uniform(location, 1, 1, Values::Float(&[x]));
    }

    /// Set a vec2 uniform
    pub fn uniform2f(&mut self, location: GLint, x: GLfloat, y: GLfloat) {
        self.set_uniform(location, 1, 2, Values::Float(&[x, y]));
    }

    /// Set a vec3 uniform
    pub fn uniform3f(&mut self, location: GLint, x: GLfloat, y: GLfloat, z: GLfloat) {
        self.set_uniform(location, 1, 3, Values::Float(&[x, y, z]));
    }

    /// Set a vec4 uniform
    pub fn uniform4f(&mut self, location: GLint, x: GLfloat, y: GLfloat, z: GLfloat, w: GLfloat) {
        self.set_uniform(location, 1, 4, Values::Float(&[x, y, z, w]));
    }

    /// Set an int (or bool) uniform
    pub fn uniform1i(&mut self, location: GLint, x: GLint) {
        self.set_uniform(location, 1, 1, Values::Int(&[x]));
    }

    /// Set an ivec2 uniform
    pub fn uniform2i(&mut self, location: GLint, x: GLint, y: GLint) {
        self.set_uniform(location, 1, 2, Values::Int(&[x, y]));
    }

    /// Set an ivec3 uniform
    pub fn uniform3i(&mut self, location: GLint, x: GLint, y: GLint, z: GLint) {
        self.set_uniform(location, 1, 3, Values::Int(&[x, y, z]));
    }

    /// Set an ivec4 uniform
    pub fn uniform4i(&mut self, location: GLint, x: GLint, y: GLint, z: GLint, w: GLint) {
        self.set_uniform(location, 1, 4, Values::Int(&[x, y, z, w]));
    }

    /// Set `count` float elements
    pub fn uniform1fv(&mut self, location: GLint, count: GLsizei, value: &[GLfloat]) {
        self.set_uniform(location, count, 1, Values::Float(value));
    }

    /// Set `count` vec2 elements
    pub fn uniform2fv(&mut self, location: GLint, count: GLsizei, value: &[GLfloat]) {
        self.set_uniform(location, count, 2, Values::Float(value));
    }

    /// Set `count` vec3 elements
    pub fn uniform3fv(&mut self, location: GLint, count: GLsizei, value: &[GLfloat]) {
        self.set_uniform(location, count, 3, Values::Float(value));
    }

    /// Set `count` vec4 elements
    pub fn uniform4fv(&mut self, location: GLint, count: GLsizei, value: &[GLfloat]) {
        self.set_uniform(location, count, 4, Values::Float(value));
    }

    /// Set `count` int elements
    pub fn uniform1iv(&mut self, location: GLint, count: GLsizei, value: &[GLint]) {
        self.set_uniform(location, count, 1, Values::Int(value));
    }

    /// Set `count` ivec2 elements
    pub fn uniform2iv(&mut self, location: GLint, count: GLsizei, value: &[GLint]) {
        self.set_uniform(location, count, 2, Values::Int(value));
    }

    /// Set `count` ivec3 elements
    pub fn uniform3iv(&mut self, location: GLint, count: GLsizei, value: &[GLint]) {
        self.set_uniform(location, count, 3, Values::Int(value));
    }

    /// Set `count` ivec4 elements
    pub fn uniform4iv(&mut self, location: GLint, count: GLsizei, value: &[GLint]) {
        self.set_uniform(location, count, 4, Values::Int(value));
    }

    fn set_uniform_matrix(
        &mut self,
        location: GLint,
        count: GLsizei,
        transpose: GLboolean,
        size: usize,
        value: &[GLfloat],
    ) {
        if transpose != glass_core::GL_FALSE {
            self.dispatch(|_| Err(Error::InvalidValue));
            return;
        }
        // each column is one register
        let columns = count.saturating_mul(size as GLsizei);
        self.set_uniform(location, columns, size, Values::Float(value));
    }

    /// Set `count` mat2 uniforms, column-major
    pub fn uniform_matrix2fv(&mut self, location: GLint, count: GLsizei, transpose: GLboolean, value: &[GLfloat]) {
        self.set_uniform_matrix(location, count, transpose, 2, value);
    }

    /// Set `count` mat3 uniforms, column-major
    pub fn uniform_matrix3fv(&mut self, location: GLint, count: GLsizei, transpose: GLboolean, value: &[GLfloat]) {
        self.set_uniform_matrix(location, count, transpose, 3, value);
    }

    /// Set `count` mat4 uniforms, column-major
    pub fn uniform_matrix4fv(&mut self, location: GLint, count: GLsizei, transpose: GLboolean, value: &[GLfloat]) {
        self.set_uniform_matrix(location, count, transpose, 4, value);
    }

    fn read_uniform(&mut self, program: GLuint, location: GLint) -> Option<[f32; 4]> {
        self.with_current(None, |gl| {
            let handle = gl.objects.program(program)?;
            let location = Location::decode(location);
            let uniform = gl.objects.uniform(handle, location)?;
            Ok(Some(read_element(uniform, location.offset)))
        })
    }

    /// Value of one uniform element as floats
    pub fn get_uniformfv(&mut self, program: GLuint, location: GLint) -> [GLfloat; 4] {
        self.read_uniform(program, location).unwrap_or_default()
    }

    /// Value of one uniform element as integers
    pub fn get_uniformiv(&mut self, program: GLuint, location: GLint) -> [GLint; 4] {
        self.read_uniform(program, location)
            .map_or([0; 4], |v| v.map(translate::round_to_int))
    }
}
