//! # Programs
//!
//! Program objects and the shader/program entry points: creation,
//! attachment, linking, binary loading, deletion and queries.
//!
//! ```text
//!             attach (+1)         link (+1 new, -1 old)
//!   Shader ───────────────▶ attached_* ───────────────▶ linked_*
//!          ◀─────────────── detach (-1)
//! ```
//!
//! A program may link a different shader than the one currently attached;
//! the linked pair is what draws use.

use alloc::string::String;
use alloc::vec::Vec;

use bitflags::bitflags;
use glass_core::{Error, GLenum, GLint, GLsizei, GLuint, GL_FALSE, GL_TRUE, Result};

use super::{Shader, ShaderFlags, loader};
use crate::context::{Current, Glass};
use crate::enums::*;
use crate::object::{ObjectStore, ProgramHandle, ShaderHandle};
use crate::platform::Platform;
use crate::state::DirtyFlags;

// =============================================================================
// PROGRAM OBJECT
// =============================================================================

bitflags! {
    /// Program object state
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ProgramFlags: u32 {
        /// Deletion requested
        const DELETE = 1 << 0;
        /// Last link failed
        const LINK_FAILED = 1 << 1;
        /// Vertex shader must be uploaded
        const UPDATE_VERTEX = 1 << 2;
        /// Geometry shader must be uploaded
        const UPDATE_GEOMETRY = 1 << 3;
    }
}

impl Default for ProgramFlags {
    fn default() -> Self {
        ProgramFlags::empty()
    }
}

/// Program object
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// Attached vertex shader
    pub attached_vertex: Option<ShaderHandle>,
    /// Attached geometry shader
    pub attached_geometry: Option<ShaderHandle>,
    /// Vertex shader of the last successful link
    pub linked_vertex: Option<ShaderHandle>,
    /// Geometry shader of the last successful link
    pub linked_geometry: Option<ShaderHandle>,
    /// State flags
    pub flags: ProgramFlags,
}

impl Program {
    /// Check the last link
    #[inline]
    pub fn is_linked(&self) -> bool {
        !self.flags.contains(ProgramFlags::LINK_FAILED)
    }

    fn attached_count(&self) -> usize {
        self.attached_vertex.is_some() as usize + self.attached_geometry.is_some() as usize
    }

    /// Linked shaders, vertex first
    pub fn linked(&self) -> impl Iterator<Item = ShaderHandle> + use<> {
        [self.linked_vertex, self.linked_geometry].into_iter().flatten()
    }
}

impl ObjectStore {
    /// Free a program, releasing its shader references
    pub(crate) fn free_program(&mut self, handle: ProgramHandle) {
        let Some(program) = self.remove(handle) else {
            return;
        };
        self.release_shader_opt(program.attached_vertex);
        self.release_shader_opt(program.attached_geometry);
        self.release_shader_opt(program.linked_vertex);
        self.release_shader_opt(program.linked_geometry);
        log::debug!("Freed program {:?}", handle);
    }

    /// Validate a program name
    pub(crate) fn program(&self, name: GLuint) -> Result<ProgramHandle> {
        self.check::<Program>(name).ok_or(Error::InvalidOperation)
    }

    /// Validate a shader name
    pub(crate) fn shader(&self, name: GLuint) -> Result<ShaderHandle> {
        self.check::<Shader>(name).ok_or(Error::InvalidOperation)
    }
}

// =============================================================================
// LINKING
// =============================================================================

/// Move one stage's attached shader into the linked slot
///
/// Returns `true` when the linked shader changed.
fn link_stage(
    objects: &mut ObjectStore,
    attached: Option<ShaderHandle>,
    linked: Option<ShaderHandle>,
) -> bool {
    match attached {
        Some(shader) if attached != linked => {
            objects.release_shader_opt(linked);
            objects.retain_shader(shader);
            true
        }
        _ => false,
    }
}

/// Check that a shader has a binary loaded
fn is_loaded(objects: &ObjectStore, shader: ShaderHandle) -> bool {
    objects.get(shader).is_some_and(|s| s.shared.is_some())
}

impl<P: Platform> Current<'_, P> {
    fn link(&mut self, handle: ProgramHandle) -> Result<()> {
        let program = self.objects.get(handle).ok_or(Error::InvalidOperation)?.clone();

        // a vertex shader is required and every stage that changes needs a binary
        let ready = program.attached_vertex.is_some()
            && [
                (program.attached_vertex, program.linked_vertex),
                (program.attached_geometry, program.linked_geometry),
            ]
            .into_iter()
            .all(|(attached, linked)| match attached {
                Some(shader) if attached != linked => is_loaded(self.objects, shader),
                _ => true,
            });
        if !ready {
            if let Some(p) = self.objects.get_mut(handle) {
                p.flags |= ProgramFlags::LINK_FAILED;
            }
            log::debug!("Link of program {:?} failed", handle);
            return Ok(());
        }

        let new_vertex = link_stage(self.objects, program.attached_vertex, program.linked_vertex);
        let new_geometry =
            link_stage(self.objects, program.attached_geometry, program.linked_geometry);

        let p = self.objects.get_mut(handle).ok_or(Error::InvalidOperation)?;
        if new_vertex {
            p.linked_vertex = p.attached_vertex;
            p.flags |= ProgramFlags::UPDATE_VERTEX;
        }
        if new_geometry {
            p.linked_geometry = p.attached_geometry;
            p.flags |= ProgramFlags::UPDATE_GEOMETRY;
        }
        p.flags.remove(ProgramFlags::LINK_FAILED);
        log::debug!(
            "Linked program {:?} (vertex: {}, geometry: {})",
            handle,
            new_vertex,
            new_geometry
        );

        if self.ctx.program == Some(handle) && (new_vertex || new_geometry) {
            self.ctx.dirty |= DirtyFlags::PROGRAM;
        }
        Ok(())
    }

    /// Make `handle` the current program
    fn use_program(&mut self, handle: Option<ProgramHandle>) -> Result<()> {
        if self.ctx.program == handle {
            return Ok(());
        }
        if let Some(h) = handle {
            let program = self.objects.get(h).ok_or(Error::InvalidOperation)?;
            if !program.is_linked() {
                return Err(Error::InvalidValue);
            }
        }

        if let Some(old) = self.ctx.program {
            let deleted = self
                .objects
                .get(old)
                .is_some_and(|p| p.flags.contains(ProgramFlags::DELETE));
            if deleted {
                self.objects.free_program(old);
            }
        }

        self.ctx.program = handle;
        self.ctx.dirty |= DirtyFlags::PROGRAM;

        // a new program reprograms both stages and every uniform
        if let Some(program) = handle.and_then(|h| self.objects.get_mut(h)) {
            program.flags |= ProgramFlags::UPDATE_VERTEX | ProgramFlags::UPDATE_GEOMETRY;
            let linked: Vec<ShaderHandle> = program.linked().collect();
            for shader in linked {
                if let Some(shader) = self.objects.get_mut(shader) {
                    shader.mark_uniforms_dirty();
                }
            }
        }
        Ok(())
    }

    fn load_binary(&mut self, names: &[GLuint], binary: &[u8]) -> Result<()> {
        let parsed = loader::parse(binary).map_err(|e| {
            log::error!("Malformed shader binary: {}", e);
            Error::from(e)
        })?;

        // pair every entry with the next listed shader of its stage
        let mut targets = Vec::with_capacity(parsed.entries.len());
        let mut last_vertex: Option<usize> = None;
        let mut last_geometry: Option<usize> = None;
        for entry in &parsed.entries {
            let last = if entry.geometry {
                &mut last_geometry
            } else {
                &mut last_vertex
            };
            let start = last.map_or(0, |i| i + 1);
            let mut found = None;
            for (i, &name) in names.iter().enumerate().skip(start) {
                let Some(handle) = self.objects.check::<Shader>(name) else {
                    break;
                };
                if self
                    .objects
                    .get(handle)
                    .is_some_and(|s| s.is_geometry() == entry.geometry)
                {
                    found = Some((i, handle));
                    break;
                }
            }
            let (index, handle) = found.ok_or(Error::InvalidOperation)?;
            *last = Some(index);
            targets.push(handle);
        }

        for (entry, handle) in parsed.entries.into_iter().zip(targets) {
            if let Some(shader) = self.objects.get_mut(handle) {
                shader.load(entry, parsed.shared.clone());
            }
        }
        log::debug!("Loaded shader binary ({} words)", parsed.shared.code.len());
        Ok(())
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

impl<P: Platform> Glass<P> {
    /// Create an empty program
    pub fn create_program(&mut self) -> GLuint {
        self.with_current(0, |gl| {
            let handle = gl
                .objects
                .create(Program::default())
                .map_err(|_| Error::OutOfMemory)?;
            Ok(handle.raw())
        })
    }

    /// Create a vertex or geometry shader
    pub fn create_shader(&mut self, shader_type: GLenum) -> GLuint {
        self.with_current(0, |gl| {
            let geometry = match shader_type {
                GL_VERTEX_SHADER => false,
                GL_GEOMETRY_SHADER_PICA => true,
                _ => return Err(Error::InvalidEnum),
            };
            let handle = gl
                .objects
                .create(Shader::new(geometry))
                .map_err(|_| Error::OutOfMemory)?;
            Ok(handle.raw())
        })
    }

    /// Attach a shader to the empty stage slot of a program
    pub fn attach_shader(&mut self, program: GLuint, shader: GLuint) {
        self.dispatch(|gl| {
            let ph = gl.objects.program(program)?;
            let sh = gl.objects.shader(shader)?;
            let geometry = gl.objects.get(sh).is_some_and(Shader::is_geometry);

            let p = gl.objects.get_mut(ph).ok_or(Error::InvalidOperation)?;
            let slot = if geometry {
                &mut p.attached_geometry
            } else {
                &mut p.attached_vertex
            };
            if slot.is_some() {
                return Err(Error::InvalidOperation);
            }
            *slot = Some(sh);
            gl.objects.retain_shader(sh);
            Ok(())
        })
    }

    /// Detach a shader from a program
    pub fn detach_shader(&mut self, program: GLuint, shader: GLuint) {
        self.dispatch(|gl| {
            let ph = gl.objects.program(program)?;
            let sh = gl.objects.shader(shader)?;

            let p = gl.objects.get_mut(ph).ok_or(Error::InvalidOperation)?;
            if p.attached_vertex == Some(sh) {
                p.attached_vertex = None;
            } else if p.attached_geometry == Some(sh) {
                p.attached_geometry = None;
            } else {
                return Err(Error::InvalidOperation);
            }
            gl.objects.release_shader(sh);
            Ok(())
        })
    }

    /// Request deletion of a program; freed once it is no longer current
    pub fn delete_program(&mut self, program: GLuint) {
        if program == 0 {
            return;
        }
        self.dispatch(|gl| {
            let handle = gl.objects.check::<Program>(program).ok_or(Error::InvalidValue)?;
            let p = gl.objects.get_mut(handle).ok_or(Error::InvalidValue)?;
            if p.flags.contains(ProgramFlags::DELETE) {
                return Ok(());
            }
            p.flags |= ProgramFlags::DELETE;
            if gl.ctx.program != Some(handle) {
                gl.objects.free_program(handle);
            }
            Ok(())
        })
    }

    /// Request deletion of a shader; freed once unreferenced
    pub fn delete_shader(&mut self, shader: GLuint) {
        if shader == 0 {
            return;
        }
        self.dispatch(|gl| {
            let handle = gl.objects.check::<Shader>(shader).ok_or(Error::InvalidValue)?;
            let s = gl.objects.get_mut(handle).ok_or(Error::InvalidValue)?;
            if s.flags.contains(ShaderFlags::DELETE) {
                return Ok(());
            }
            s.flags |= ShaderFlags::DELETE;
            gl.objects.release_shader(handle);
            Ok(())
        })
    }

    /// Link the attached shaders of a program
    ///
    /// Failure is reported through `LINK_STATUS`, not as an error.
    pub fn link_program(&mut self, program: GLuint) {
        self.dispatch(|gl| {
            let handle = gl.objects.program(program)?;
            gl.link(handle)
        })
    }

    /// Make a program current, 0 for none
    pub fn use_program(&mut self, program: GLuint) {
        self.dispatch(|gl| {
            let handle = match program {
                0 => None,
                name => Some(gl.objects.program(name)?),
            };
            gl.use_program(handle)
        })
    }

    /// Load a shader binary into shader objects
    ///
    /// Each entry of the binary is loaded into the next listed shader of
    /// the same stage. Nothing is modified unless every entry finds a
    /// shader.
    pub fn shader_binary(&mut self, shaders: &[GLuint], format: GLenum, binary: &[u8]) {
        self.dispatch(|gl| {
            if format != GL_SHADER_BINARY_PICA {
                return Err(Error::InvalidEnum);
            }
            if shaders.is_empty() {
                return Ok(());
            }
            gl.load_binary(shaders, binary)
        })
    }

    /// Does nothing; programs are always valid once linked
    pub fn validate_program(&mut self, _program: GLuint) {}

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Attached shaders, vertex first, at most `max_count`
    pub fn get_attached_shaders(&mut self, program: GLuint, max_count: GLsizei) -> Vec<GLuint> {
        self.with_current(Vec::new(), |gl| {
            let handle = gl.objects.program(program)?;
            if max_count < 0 {
                return Err(Error::InvalidValue);
            }
            let p = gl.objects.get(handle).ok_or(Error::InvalidOperation)?;
            Ok([p.attached_vertex, p.attached_geometry]
                .into_iter()
                .flatten()
                .take(max_count as usize)
                .map(|h| h.raw())
                .collect())
        })
    }

    /// Program parameter
    pub fn get_programiv(&mut self, program: GLuint, pname: GLenum) -> GLint {
        self.with_current(0, |gl| {
            let handle = gl.objects.program(program)?;
            let p = gl.objects.get(handle).ok_or(Error::InvalidOperation)?;
            let uniforms = || {
                p.linked()
                    .filter_map(|h| gl.objects.get(h))
                    .flat_map(|s| s.uniforms.iter())
            };
            Ok(match pname {
                GL_DELETE_STATUS => gl_bool(p.flags.contains(ProgramFlags::DELETE)),
                GL_LINK_STATUS => gl_bool(p.is_linked()),
                GL_VALIDATE_STATUS => GL_TRUE as GLint,
                GL_INFO_LOG_LENGTH => 0,
                GL_ATTACHED_SHADERS => p.attached_count() as GLint,
                GL_ACTIVE_UNIFORMS => uniforms().count() as GLint,
                GL_ACTIVE_UNIFORM_MAX_LENGTH => {
                    uniforms().map(|u| u.name.len() + 1).max().unwrap_or(0) as GLint
                }
                _ => return Err(Error::InvalidEnum),
            })
        })
    }

    /// Shader parameter
    pub fn get_shaderiv(&mut self, shader: GLuint, pname: GLenum) -> GLint {
        self.with_current(0, |gl| {
            let handle = gl.objects.shader(shader)?;
            let s = gl.objects.get(handle).ok_or(Error::InvalidOperation)?;
            match pname {
                GL_SHADER_TYPE => Ok(s.shader_type() as GLint),
                GL_DELETE_STATUS => Ok(gl_bool(s.flags.contains(ShaderFlags::DELETE))),
                GL_COMPILE_STATUS | GL_INFO_LOG_LENGTH | GL_SHADER_SOURCE_LENGTH => {
                    Err(Error::InvalidOperation)
                }
                _ => Err(Error::InvalidEnum),
            }
        })
    }

    /// Check a program name
    pub fn is_program(&self, program: GLuint) -> bool {
        self.objects().check::<Program>(program).is_some()
    }

    /// Check a shader name
    pub fn is_shader(&self, shader: GLuint) -> bool {
        self.objects().check::<Shader>(shader).is_some()
    }

    /// Program info log; always empty
    pub fn get_program_info_log(&mut self, _program: GLuint) -> String {
        String::new()
    }

    /// Shader info log; always empty
    pub fn get_shader_info_log(&mut self, _shader: GLuint) -> String {
        String::new()
    }

    // =========================================================================
    // UNSUPPORTED SOURCE COMPILATION
    // =========================================================================

    /// Source compilation is not supported
    pub fn compile_shader(&mut self, _shader: GLuint) {
        self.dispatch(|_| Err(Error::InvalidOperation))
    }

    /// Source compilation is not supported
    pub fn shader_source(&mut self, _shader: GLuint, _source: &[&str]) {
        self.dispatch(|_| Err(Error::InvalidOperation))
    }

    /// Source compilation is not supported
    pub fn get_shader_source(&mut self, _shader: GLuint) -> String {
        self.with_current(String::new(), |_| Err(Error::InvalidOperation))
    }

    /// Source compilation is not supported
    pub fn release_shader_compiler(&mut self) {
        self.dispatch(|_| Err(Error::InvalidOperation))
    }

    /// Source compilation is not supported
    pub fn get_shader_precision_format(&mut self, _shader_type: GLenum, _precision: GLenum) {
        self.dispatch(|_| Err(Error::InvalidOperation))
    }
}

#[inline]
pub(crate) fn gl_bool(v: bool) -> GLint {
    if v { GL_TRUE as GLint } else { GL_FALSE as GLint }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloc::vec;
    use crate::context::GlassConfig;
    use crate::shader::loader::tests::{EntryDesc, build_binary, vertex_entry};
    use crate::sim::SimPlatform;
    use glass_core::error::{GL_INVALID_OPERATION, GL_INVALID_VALUE, GL_NO_ERROR};

    pub(crate) fn bound() -> Glass<SimPlatform> {
        let mut glass = Glass::new(SimPlatform::new(), GlassConfig::default());
        let ctx = glass.create_context().unwrap();
        glass.bind_context(Some(ctx));
        glass
    }

    fn refc(glass: &Glass<SimPlatform>, name: GLuint) -> Option<u32> {
        let handle = glass.objects().check::<Shader>(name)?;
        glass.objects().get(handle).map(|s| s.refc)
    }

    /// Vertex shader loaded from the test binary
    pub(crate) fn loaded_vertex(glass: &mut Glass<SimPlatform>) -> GLuint {
        let vs = glass.create_shader(GL_VERTEX_SHADER);
        let blob = build_binary(&[0x4E00_0000, 0x8800_0000], &[0x0000_036F], &[vertex_entry()]);
        glass.shader_binary(&[vs], GL_SHADER_BINARY_PICA, &blob);
        vs
    }

    /// Linked program using the test vertex shader
    pub(crate) fn linked_program(glass: &mut Glass<SimPlatform>) -> GLuint {
        let vs = loaded_vertex(glass);
        let program = glass.create_program();
        glass.attach_shader(program, vs);
        glass.link_program(program);
        program
    }

    #[test]
    fn test_attach_link_refcounts() {
        let mut glass = bound();
        let a = loaded_vertex(&mut glass);
        let p = glass.create_program();
        assert_eq!(refc(&glass, a), Some(1));

        glass.attach_shader(p, a);
        assert_eq!(refc(&glass, a), Some(2));
        glass.link_program(p);
        assert_eq!(refc(&glass, a), Some(3));
        assert_eq!(glass.get_programiv(p, GL_LINK_STATUS), GL_TRUE as GLint);

        // relinking the same shader changes nothing
        glass.link_program(p);
        assert_eq!(refc(&glass, a), Some(3));
        assert_eq!(glass.get_error(), GL_NO_ERROR);
    }

    #[test]
    fn test_relink_moves_reference() {
        let mut glass = bound();
        let a = loaded_vertex(&mut glass);
        let b = loaded_vertex(&mut glass);
        let p = glass.create_program();

        glass.attach_shader(p, a);
        glass.link_program(p);
        glass.detach_shader(p, a);
        assert_eq!(refc(&glass, a), Some(2));

        glass.attach_shader(p, b);
        glass.link_program(p);
        assert_eq!(refc(&glass, a), Some(1));
        assert_eq!(refc(&glass, b), Some(3));

        // only the name reference is left, so deletion frees it
        glass.delete_shader(a);
        assert!(!glass.is_shader(a));
        assert_eq!(glass.get_error(), GL_NO_ERROR);
    }

    #[test]
    fn test_delete_referenced_shader_deferred() {
        let mut glass = bound();
        let a = loaded_vertex(&mut glass);
        let p = glass.create_program();
        glass.attach_shader(p, a);
        glass.link_program(p);

        glass.delete_shader(a);
        assert_eq!(refc(&glass, a), Some(2));
        assert_eq!(glass.get_shaderiv(a, GL_DELETE_STATUS), GL_TRUE as GLint);

        // a second delete is a no-op
        glass.delete_shader(a);
        assert_eq!(refc(&glass, a), Some(2));

        glass.delete_program(p);
        assert!(!glass.is_program(p));
        assert!(!glass.is_shader(a));
    }

    #[test]
    fn test_detach_unattached_rejected() {
        let mut glass = bound();
        let a = loaded_vertex(&mut glass);
        let p = glass.create_program();
        glass.detach_shader(p, a);
        assert_eq!(glass.get_error(), GL_INVALID_OPERATION);
        assert_eq!(refc(&glass, a), Some(1));
    }

    #[test]
    fn test_attach_occupied_stage_rejected() {
        let mut glass = bound();
        let a = loaded_vertex(&mut glass);
        let b = loaded_vertex(&mut glass);
        let p = glass.create_program();
        glass.attach_shader(p, a);
        glass.attach_shader(p, b);
        assert_eq!(glass.get_error(), GL_INVALID_OPERATION);
        assert_eq!(refc(&glass, b), Some(1));
        assert_eq!(glass.get_attached_shaders(p, 4), vec![a]);
    }

    #[test]
    fn test_link_without_binary_fails() {
        let mut glass = bound();
        let vs = glass.create_shader(GL_VERTEX_SHADER);
        let p = glass.create_program();
        glass.link_program(p);
        assert_eq!(glass.get_programiv(p, GL_LINK_STATUS), GL_FALSE as GLint);

        glass.attach_shader(p, vs);
        glass.link_program(p);
        assert_eq!(glass.get_programiv(p, GL_LINK_STATUS), GL_FALSE as GLint);
        assert_eq!(glass.get_error(), GL_NO_ERROR);

        glass.use_program(p);
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);
    }

    #[test]
    fn test_use_program_frees_deleted_predecessor() {
        let mut glass = bound();
        let p = linked_program(&mut glass);
        let q = linked_program(&mut glass);

        glass.use_program(p);
        glass.delete_program(p);
        assert!(glass.is_program(p));
        assert_eq!(glass.get_programiv(p, GL_DELETE_STATUS), GL_TRUE as GLint);

        glass.use_program(q);
        assert!(!glass.is_program(p));

        // a program that was not deleted survives being replaced
        glass.use_program(0);
        assert!(glass.is_program(q));
    }

    #[test]
    fn test_program_queries() {
        let mut glass = bound();
        let p = linked_program(&mut glass);
        assert_eq!(glass.get_programiv(p, GL_ATTACHED_SHADERS), 1);
        assert_eq!(glass.get_programiv(p, GL_ACTIVE_UNIFORMS), 3);
        assert_eq!(
            glass.get_programiv(p, GL_ACTIVE_UNIFORM_MAX_LENGTH),
            "projection".len() as GLint + 1
        );
        assert_eq!(glass.get_programiv(p, GL_VALIDATE_STATUS), GL_TRUE as GLint);
        glass.get_programiv(p, GL_SHADER_TYPE);
        assert_eq!(glass.get_error(), glass_core::error::GL_INVALID_ENUM);
    }

    #[test]
    fn test_shader_queries() {
        let mut glass = bound();
        let gs = glass.create_shader(GL_GEOMETRY_SHADER_PICA);
        assert_eq!(glass.get_shaderiv(gs, GL_SHADER_TYPE), GL_GEOMETRY_SHADER_PICA as GLint);
        glass.get_shaderiv(gs, GL_COMPILE_STATUS);
        assert_eq!(glass.get_error(), GL_INVALID_OPERATION);

        assert_eq!(glass.create_shader(GL_FRAGMENT_SHADER), 0);
        assert_eq!(glass.get_error(), glass_core::error::GL_INVALID_ENUM);
    }

    #[test]
    fn test_binary_pairs_entries_by_stage() {
        let mut glass = bound();
        let gs = glass.create_shader(GL_GEOMETRY_SHADER_PICA);
        let vs = glass.create_shader(GL_VERTEX_SHADER);
        let geometry = EntryDesc {
            geometry: true,
            entrypoint: 7,
            outs: vec![(0, 0, 0xF)],
            ..EntryDesc::default()
        };
        let blob = build_binary(&[1, 2, 3], &[], &[vertex_entry(), geometry]);
        glass.shader_binary(&[gs, vs], GL_SHADER_BINARY_PICA, &blob);
        assert_eq!(glass.get_error(), GL_NO_ERROR);

        let objects = glass.objects();
        let vs = objects.get(objects.check::<Shader>(vs).unwrap()).unwrap();
        let gs = objects.get(objects.check::<Shader>(gs).unwrap()).unwrap();
        assert_eq!(vs.entrypoint, 2);
        assert_eq!(gs.entrypoint, 7);
        assert!(alloc::sync::Arc::ptr_eq(
            vs.shared.as_ref().unwrap(),
            gs.shared.as_ref().unwrap()
        ));
    }

    #[test]
    fn test_binary_without_matching_shader() {
        let mut glass = bound();
        let gs = glass.create_shader(GL_GEOMETRY_SHADER_PICA);
        let blob = build_binary(&[0], &[], &[vertex_entry()]);
        glass.shader_binary(&[gs], GL_SHADER_BINARY_PICA, &blob);
        assert_eq!(glass.get_error(), GL_INVALID_OPERATION);

        let objects = glass.objects();
        let gs = objects.get(objects.check::<Shader>(gs).unwrap()).unwrap();
        assert!(gs.shared.is_none());
    }

    #[test]
    fn test_malformed_binary_reported() {
        let mut glass = bound();
        let vs = glass.create_shader(GL_VERTEX_SHADER);
        glass.shader_binary(&[vs], GL_SHADER_BINARY_PICA, b"DVLBjunk");
        assert_eq!(glass.get_error(), GL_INVALID_VALUE);

        glass.shader_binary(&[vs], 0x1234, b"");
        assert_eq!(glass.get_error(), glass_core::error::GL_INVALID_ENUM);
    }

    #[test]
    fn test_compiler_entry_points_unsupported() {
        let mut glass = bound();
        glass.compile_shader(1);
        assert_eq!(glass.get_error(), GL_INVALID_OPERATION);
        glass.release_shader_compiler();
        assert_eq!(glass.get_error(), GL_INVALID_OPERATION);
        assert!(glass.get_program_info_log(0).is_empty());
    }
}
