//! # Object Store
//!
//! Owns every GL object of a GLASS instance, one generational arena per
//! kind. Object names are packed [`Handle`]s: the kind tag rejects a name
//! of the wrong kind and the generation rejects a name whose object was
//! freed.
//!
//! ```text
//!   name ──resolve──▶ Arena<T> ──▶ &T
//!          tag ok? generation ok?
//! ```
//!
//! Buffers, renderbuffers and framebuffers have no references between
//! each other beyond attachments and are freed on delete. Shaders and
//! programs carry explicit reference counts, see [`crate::shader`].

use glass_core::{Arena, GLenum, GLuint, Handle, PhysAddr, Result};

use crate::enums::*;
use crate::shader::{Program, Shader};

// =============================================================================
// KIND TAGS
// =============================================================================

/// Buffer name tag
pub const TAG_BUFFER: u8 = 1;
/// Renderbuffer name tag
pub const TAG_RENDERBUFFER: u8 = 2;
/// Framebuffer name tag
pub const TAG_FRAMEBUFFER: u8 = 3;
/// Shader name tag
pub const TAG_SHADER: u8 = 4;
/// Program name tag
pub const TAG_PROGRAM: u8 = 5;

// =============================================================================
// OBJECTS
// =============================================================================

/// Vertex or index data in linear memory
#[derive(Debug, Clone)]
pub struct BufferObject {
    /// Storage, null before the first data upload
    pub addr: PhysAddr,
    /// Storage size in bytes
    pub size: usize,
    /// Usage hint
    pub usage: GLenum,
    /// Bound at least once
    pub bound: bool,
}

impl Default for BufferObject {
    fn default() -> Self {
        Self {
            addr: PhysAddr::null(),
            size: 0,
            usage: GL_STATIC_DRAW,
            bound: false,
        }
    }
}

/// Color or depth storage in VRAM
#[derive(Debug, Clone)]
pub struct RenderbufferObject {
    /// Storage, null before allocation
    pub addr: PhysAddr,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Internal format
    pub format: GLenum,
    /// Bound at least once
    pub bound: bool,
}

impl Default for RenderbufferObject {
    fn default() -> Self {
        Self {
            addr: PhysAddr::null(),
            width: 0,
            height: 0,
            format: GL_RGBA4,
            bound: false,
        }
    }
}

/// Render target made of a color and a depth attachment
#[derive(Debug, Clone, Default)]
pub struct FramebufferObject {
    /// Color attachment
    pub color: Option<RenderbufferHandle>,
    /// Depth (and stencil) attachment
    pub depth: Option<RenderbufferHandle>,
    /// Bound at least once
    pub bound: bool,
}

/// Buffer name
pub type BufferHandle = Handle<BufferObject>;
/// Renderbuffer name
pub type RenderbufferHandle = Handle<RenderbufferObject>;
/// Framebuffer name
pub type FramebufferHandle = Handle<FramebufferObject>;
/// Shader name
pub type ShaderHandle = Handle<Shader>;
/// Program name
pub type ProgramHandle = Handle<Program>;

// =============================================================================
// OBJECT STORE
// =============================================================================

/// Object kinds held by the [`ObjectStore`]
pub trait GlObject: Sized {
    /// Arena of this kind
    fn arena(store: &ObjectStore) -> &Arena<Self>;
    /// Mutable arena of this kind
    fn arena_mut(store: &mut ObjectStore) -> &mut Arena<Self>;
}

macro_rules! gl_object {
    ($ty:ty, $field:ident) => {
        impl GlObject for $ty {
            #[inline]
            fn arena(store: &ObjectStore) -> &Arena<Self> {
                &store.$field
            }

            #[inline]
            fn arena_mut(store: &mut ObjectStore) -> &mut Arena<Self> {
                &mut store.$field
            }
        }
    };
}

/// Every GL object of one GLASS instance
pub struct ObjectStore {
    buffers: Arena<BufferObject>,
    renderbuffers: Arena<RenderbufferObject>,
    framebuffers: Arena<FramebufferObject>,
    shaders: Arena<Shader>,
    programs: Arena<Program>,
}

gl_object!(BufferObject, buffers);
gl_object!(RenderbufferObject, renderbuffers);
gl_object!(FramebufferObject, framebuffers);
gl_object!(Shader, shaders);
gl_object!(Program, programs);

impl ObjectStore {
    /// Create an empty store
    pub const fn new() -> Self {
        Self {
            buffers: Arena::new(TAG_BUFFER),
            renderbuffers: Arena::new(TAG_RENDERBUFFER),
            framebuffers: Arena::new(TAG_FRAMEBUFFER),
            shaders: Arena::new(TAG_SHADER),
            programs: Arena::new(TAG_PROGRAM),
        }
    }

    /// Store a new object and return its handle
    pub fn create<T: GlObject>(&mut self, value: T) -> Result<Handle<T>> {
        T::arena_mut(self).insert(value)
    }

    /// Validate a name as a live object of kind `T`
    #[inline]
    pub fn check<T: GlObject>(&self, name: GLuint) -> Option<Handle<T>> {
        T::arena(self).resolve(name)
    }

    /// Borrow an object
    #[inline]
    pub fn get<T: GlObject>(&self, handle: Handle<T>) -> Option<&T> {
        T::arena(self).get(handle)
    }

    /// Mutably borrow an object
    #[inline]
    pub fn get_mut<T: GlObject>(&mut self, handle: Handle<T>) -> Option<&mut T> {
        T::arena_mut(self).get_mut(handle)
    }

    /// Free an object
    #[inline]
    pub fn remove<T: GlObject>(&mut self, handle: Handle<T>) -> Option<T> {
        T::arena_mut(self).remove(handle)
    }

    /// Number of live objects of kind `T`
    pub fn count<T: GlObject>(&self) -> usize {
        T::arena(self).len()
    }

    /// Raw name of an optional handle, 0 for none
    #[inline]
    pub fn name<T>(handle: Option<Handle<T>>) -> GLuint {
        handle.map_or(0, Handle::raw)
    }
}
