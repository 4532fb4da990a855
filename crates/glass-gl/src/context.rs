//! # GLASS Instance
//!
//! [`Glass`] owns the platform, the shared object store and every context.
//! At most one context is current; GL entry points operate on it and
//! record their errors in it.
//!
//! ```text
//!   Glass ─┬─ platform
//!          ├─ objects (buffers, renderbuffers, framebuffers, shaders, programs)
//!          ├─ contexts ── Arena<Context>
//!          └─ current ─▶ Context ── cmd buffer, transfer queue, dirty flags
//! ```

use glass_cmd::GPU_MAX_ENTRIES;
use glass_core::{Arena, GLenum, Handle, Result};

use crate::object::ObjectStore;
use crate::platform::Platform;
use crate::shader::ProgramFlags;
use crate::state::{Context, ContextSettings, DirtyFlags};

/// Context name tag
const TAG_CONTEXT: u8 = 6;

/// Context name
pub type ContextHandle = Handle<Context>;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Instance configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlassConfig {
    /// Command buffer size of each context, in words
    pub command_capacity: usize,
    /// Settings given to new contexts
    pub settings: ContextSettings,
}

impl Default for GlassConfig {
    fn default() -> Self {
        Self {
            command_capacity: GPU_MAX_ENTRIES,
            settings: ContextSettings::default(),
        }
    }
}

// =============================================================================
// CURRENT CONTEXT VIEW
// =============================================================================

/// The current context together with the shared state entry points need
pub(crate) struct Current<'a, P: Platform> {
    /// Current context
    pub ctx: &'a mut Context,
    /// Shared objects
    pub objects: &'a mut ObjectStore,
    /// Platform services
    pub platform: &'a mut P,
}

// =============================================================================
// GLASS
// =============================================================================

/// A GLASS instance
pub struct Glass<P: Platform> {
    platform: P,
    config: GlassConfig,
    objects: ObjectStore,
    contexts: Arena<Context>,
    current: Option<ContextHandle>,
    /// Context that was current before the last switch
    previous: Option<ContextHandle>,
}

impl<P: Platform> Glass<P> {
    /// Create an instance with no context
    pub fn new(platform: P, config: GlassConfig) -> Self {
        Self {
            platform,
            config,
            objects: ObjectStore::new(),
            contexts: Arena::new(TAG_CONTEXT),
            current: None,
            previous: None,
        }
    }

    /// Platform services
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Mutable platform services
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Instance configuration
    pub fn config(&self) -> &GlassConfig {
        &self.config
    }

    /// Shared objects
    pub fn objects(&self) -> &ObjectStore {
        &self.objects
    }

    // =========================================================================
    // CONTEXTS
    // =========================================================================

    /// Create a context; it is not bound
    pub fn create_context(&mut self) -> Result<ContextHandle> {
        let ctx = Context::new(self.config.command_capacity, self.config.settings);
        let handle = self.contexts.insert(ctx)?;
        log::debug!("Created context {:?}", handle);
        Ok(handle)
    }

    /// Destroy a context, unbinding it first if current
    pub fn destroy_context(&mut self, handle: ContextHandle) {
        if self.current == Some(handle) {
            self.bind_context(None);
        }
        if self.previous == Some(handle) {
            self.previous = None;
        }
        if self.contexts.remove(handle).is_some() {
            log::debug!("Destroyed context {:?}", handle);
        }
    }

    /// Make a context current, or unbind with `None`
    ///
    /// The outgoing context's queue is drained. Unless the incoming context
    /// is the one that was current already, or the one that was current
    /// right before an unbind, every state group is marked dirty so the GPU
    /// is fully reprogrammed.
    pub fn bind_context(&mut self, handle: Option<ContextHandle>) {
        if let Some(h) = handle {
            if !self.contexts.contains(h) {
                log::warn!("Bind of unknown context {:?}", h);
                return;
            }
        }

        let skip_update =
            handle == self.current || (self.current.is_none() && handle == self.previous);

        if let Some(ctx) = self.current.and_then(|h| self.contexts.get_mut(h)) {
            ctx.queue.wait(&mut self.platform);
        }

        if handle != self.current {
            self.previous = self.current;
            self.current = handle;
        }

        let Some(current) = self.current else {
            return;
        };
        let Some(ctx) = self.contexts.get_mut(current) else {
            return;
        };
        ctx.queue.run(&mut self.platform);

        if !skip_update {
            ctx.dirty = DirtyFlags::all();
            if let Some(program) = ctx.program.and_then(|p| self.objects.get_mut(p)) {
                program.flags |= ProgramFlags::UPDATE_VERTEX | ProgramFlags::UPDATE_GEOMETRY;
                let stages = [program.linked_vertex, program.linked_geometry];
                for shader in stages.into_iter().flatten() {
                    if let Some(shader) = self.objects.get_mut(shader) {
                        shader.mark_uniforms_dirty();
                    }
                }
            }
        }
        log::debug!("Bound context {:?} (resync: {})", current, !skip_update);
    }

    /// Current context name
    pub fn current_context(&self) -> Option<ContextHandle> {
        self.current
    }

    /// Inspect a context
    pub fn context(&self, handle: ContextHandle) -> Option<&Context> {
        self.contexts.get(handle)
    }

    /// Presentation settings of a context
    pub fn context_settings_mut(&mut self, handle: ContextHandle) -> Option<&mut ContextSettings> {
        self.contexts.get_mut(handle).map(|ctx| &mut ctx.settings)
    }

    /// Return and clear the pending error of the current context
    pub fn get_error(&mut self) -> GLenum {
        match self.current.and_then(|h| self.contexts.get_mut(h)) {
            Some(ctx) => ctx.take_error(),
            None => glass_core::error::GL_NO_ERROR,
        }
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    /// Run an entry point against the current context
    ///
    /// An error is recorded in the context and `neutral` returned. Without
    /// a current context the call does nothing.
    pub(crate) fn with_current<R>(
        &mut self,
        neutral: R,
        op: impl FnOnce(&mut Current<'_, P>) -> Result<R>,
    ) -> R {
        let Some(ctx) = self.current.and_then(|h| self.contexts.get_mut(h)) else {
            log::warn!("GL call without a bound context");
            return neutral;
        };
        let mut cur = Current {
            ctx,
            objects: &mut self.objects,
            platform: &mut self.platform,
        };
        match op(&mut cur) {
            Ok(value) => value,
            Err(error) => {
                cur.ctx.set_error(error);
                neutral
            }
        }
    }

    /// Run an entry point that returns nothing
    #[inline]
    pub(crate) fn dispatch(&mut self, op: impl FnOnce(&mut Current<'_, P>) -> Result<()>) {
        self.with_current((), op)
    }
}
