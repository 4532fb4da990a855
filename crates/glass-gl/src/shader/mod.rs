//! # Shaders
//!
//! Shader objects built from pre-compiled binaries. A shader holds a
//! reference to the code segment of the binary it was loaded from, its
//! output register map, the constant uniforms baked into the binary and the
//! table of uniforms the application may set.
//!
//! ```text
//!   DVLB ──▶ SharedShaderData (code + opdescs, shared)
//!     ├── DVLE 0 ──▶ Shader A ─┐
//!     └── DVLE 1 ──▶ Shader B ─┴─▶ Arc<SharedShaderData>
//! ```
//!
//! Shaders and programs reference each other through explicit reference
//! counts. A shader starts with one reference (its name), gains one per
//! program it is attached to and one per program it is linked into. It is
//! freed only when the count drops to zero after deletion was requested.

pub mod loader;
pub mod program;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use arrayvec::ArrayVec;
use bitflags::bitflags;
use glass_core::GLenum;

use crate::enums::*;
use crate::object::{ObjectStore, ShaderHandle};

pub use program::{Program, ProgramFlags};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Output map word of an unused output register
pub const UNUSED_SEMANTICS: u32 = 0x1F1F_1F1F;

/// Number of output registers with a semantic map
pub const MAX_OUTPUT_REGS: usize = 7;

/// Maximum code size in words
pub const MAX_CODE_WORDS: usize = 512;

/// Maximum operand descriptors
pub const MAX_OPDESCS: usize = 128;

/// Maximum uniform entries per shader; locations carry an 8-bit table index
pub const MAX_UNIFORM_ENTRIES: usize = 256;

// =============================================================================
// FLAGS
// =============================================================================

bitflags! {
    /// Shader object state
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderFlags: u32 {
        /// Geometry stage shader
        const GEOMETRY = 1 << 0;
        /// Deletion requested
        const DELETE = 1 << 1;
        /// Merge output maps with the vertex shader
        const MERGE_OUTMAPS = 1 << 2;
    }
}

impl Default for ShaderFlags {
    fn default() -> Self {
        ShaderFlags::empty()
    }
}

// =============================================================================
// SHADER DATA
// =============================================================================

/// Code segment shared by every shader loaded from one binary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedShaderData {
    /// Instruction words
    pub code: Vec<u32>,
    /// Operand descriptors
    pub opdescs: Vec<u32>,
}

/// Geometry shader primitive mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum GeometryMode {
    /// One invocation per vertex
    #[default]
    Point = 0,
    /// Variable-size primitives
    VariablePrimitive = 1,
    /// Fixed-size primitives
    FixedPrimitive = 2,
}

/// Output register layout of a shader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputMap {
    /// Written output registers
    pub mask: u32,
    /// Number of written output registers
    pub total: u32,
    /// Semantic of each component, one byte per component
    pub sems: [u32; MAX_OUTPUT_REGS],
    /// Output attribute clock
    pub clock: u32,
    /// Texture coordinates are written
    pub texcoords: bool,
}

impl Default for OutputMap {
    fn default() -> Self {
        Self {
            mask: 0,
            total: 0,
            sems: [UNUSED_SEMANTICS; MAX_OUTPUT_REGS],
            clock: 0,
            texcoords: false,
        }
    }
}

impl OutputMap {
    /// Combine a vertex shader map with the map of a geometry shader that
    /// forwards vertex outputs
    pub fn merge(vertex: &OutputMap, geometry: &OutputMap) -> OutputMap {
        let mut merged = *geometry;
        merged.total = 0;
        for (sem, vsem) in merged.sems.iter_mut().zip(vertex.sems) {
            if *sem == UNUSED_SEMANTICS {
                *sem = vsem;
            }
            if *sem != UNUSED_SEMANTICS {
                merged.total += 1;
            }
        }
        merged.clock |= vertex.clock;
        merged.texcoords |= vertex.texcoords;
        merged
    }
}

/// Uniforms with values fixed by the binary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstUniforms {
    /// Constant bool registers
    pub bool_mask: u16,
    /// Int registers carrying a constant
    pub int_mask: u8,
    /// Packed int register values
    pub int_data: [u32; 4],
    /// Float register ID and packed value
    pub floats: Vec<(u8, [u32; 3])>,
}

// =============================================================================
// UNIFORMS
// =============================================================================

/// Register file of a uniform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    /// Bool registers b0-b15
    Bool,
    /// Int vector registers i0-i3
    Int,
    /// Float vector registers c0-c95
    Float,
}

impl UniformKind {
    /// Number of registers in the file
    pub const fn limit(self) -> usize {
        match self {
            Self::Bool => 16,
            Self::Int => 4,
            Self::Float => 96,
        }
    }

    /// GL type reported for uniforms of this kind
    pub const fn gl_type(self) -> GLenum {
        match self {
            Self::Bool => GL_BOOL,
            Self::Int => GL_INT_VEC4,
            Self::Float => GL_FLOAT_VEC4,
        }
    }
}

/// Uniform values in the register encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniformData {
    /// One bit per element
    BoolMask(u16),
    /// One packed ivec4 per element
    IntVector(ArrayVec<u32, 4>),
    /// One packed f24 vec4 per element
    FloatVectorList(Vec<[u32; 3]>),
}

impl UniformData {
    /// Zeroed storage for `count` elements
    pub fn zeroed(kind: UniformKind, count: usize) -> Self {
        match kind {
            UniformKind::Bool => Self::BoolMask(0),
            UniformKind::Int => Self::IntVector((0..count.min(4)).map(|_| 0).collect()),
            UniformKind::Float => Self::FloatVectorList(vec![[0; 3]; count]),
        }
    }

    /// Register file of the data
    pub const fn kind(&self) -> UniformKind {
        match self {
            Self::BoolMask(_) => UniformKind::Bool,
            Self::IntVector(_) => UniformKind::Int,
            Self::FloatVectorList(_) => UniformKind::Float,
        }
    }
}

/// Uniform settable by the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformInfo {
    /// First register, relative to the start of its file
    pub id: u8,
    /// Number of elements
    pub count: u8,
    /// Symbol name
    pub name: String,
    /// Needs upload
    pub dirty: bool,
    /// Current value
    pub data: UniformData,
}

impl UniformInfo {
    /// Register file
    #[inline]
    pub fn kind(&self) -> UniformKind {
        self.data.kind()
    }
}

// =============================================================================
// SHADER
// =============================================================================

/// Shader object
#[derive(Debug, Clone)]
pub struct Shader {
    /// State flags
    pub flags: ShaderFlags,
    /// Reference count
    pub refc: u32,
    /// Code segment, none until a binary is loaded
    pub shared: Option<Arc<SharedShaderData>>,
    /// Entry point in words
    pub entrypoint: u32,
    /// Primitive mode (geometry shaders)
    pub gs_mode: GeometryMode,
    /// Output register layout
    pub outmap: OutputMap,
    /// Constant uniforms
    pub consts: ConstUniforms,
    /// Settable uniforms
    pub uniforms: Vec<UniformInfo>,
}

impl Shader {
    /// Create an empty shader holding its name reference
    pub fn new(geometry: bool) -> Self {
        let mut flags = ShaderFlags::empty();
        flags.set(ShaderFlags::GEOMETRY, geometry);
        Self {
            flags,
            refc: 1,
            shared: None,
            entrypoint: 0,
            gs_mode: GeometryMode::Point,
            outmap: OutputMap::default(),
            consts: ConstUniforms::default(),
            uniforms: Vec::new(),
        }
    }

    /// Check the stage
    #[inline]
    pub fn is_geometry(&self) -> bool {
        self.flags.contains(ShaderFlags::GEOMETRY)
    }

    /// GL shader type
    pub fn shader_type(&self) -> GLenum {
        if self.is_geometry() {
            GL_GEOMETRY_SHADER_PICA
        } else {
            GL_VERTEX_SHADER
        }
    }

    /// Mark every uniform for upload
    pub fn mark_uniforms_dirty(&mut self) {
        for uniform in &mut self.uniforms {
            uniform.dirty = true;
        }
    }

    /// Replace the shader contents with one entry of a parsed binary
    pub fn load(&mut self, entry: loader::ShaderEntry, shared: Arc<SharedShaderData>) {
        self.flags.set(ShaderFlags::MERGE_OUTMAPS, entry.merge_outmaps);
        self.entrypoint = entry.entrypoint;
        if self.is_geometry() {
            self.gs_mode = entry.gs_mode;
        }
        self.outmap = entry.outmap;
        self.consts = entry.consts;
        self.uniforms = entry.uniforms;
        self.shared = Some(shared);
    }
}

// =============================================================================
// REFERENCE COUNTING
// =============================================================================

impl ObjectStore {
    /// Add a reference to a shader
    pub(crate) fn retain_shader(&mut self, handle: ShaderHandle) {
        if let Some(shader) = self.get_mut(handle) {
            shader.refc += 1;
        }
    }

    /// Drop a reference to a shader, freeing it when unreferenced and
    /// deleted
    ///
    /// Returns `true` if the shader was freed.
    pub(crate) fn release_shader(&mut self, handle: ShaderHandle) -> bool {
        let Some(shader) = self.get_mut(handle) else {
            return false;
        };
        shader.refc = shader.refc.saturating_sub(1);
        if shader.refc == 0 && shader.flags.contains(ShaderFlags::DELETE) {
            self.remove(handle);
            log::debug!("Freed shader {:?}", handle);
            return true;
        }
        false
    }

    /// Drop an optional shader reference
    pub(crate) fn release_shader_opt(&mut self, handle: Option<ShaderHandle>) {
        if let Some(handle) = handle {
            self.release_shader(handle);
        }
    }
}

static_assertions::assert_impl_all!(Shader: Send, Sync);
static_assertions::assert_impl_all!(OutputMap: Copy);
