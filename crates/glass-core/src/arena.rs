//! # Generational Object Arena
//!
//! Typed slot storage for GL objects. Every object name handed to the
//! application is a [`Handle`] packed into a `GLuint`; names carry the kind
//! tag of their arena and the generation of their slot, so a name from a
//! different object kind, or one whose object was already freed, never
//! resolves.
//!
//! ```text
//!  31    28 27            16 15                0
//! +--------+----------------+------------------+
//! |  tag   |   generation   |    index + 1     |
//! +--------+----------------+------------------+
//! ```
//!
//! Index 0 is never produced, so a packed name is never 0 (the GL "no
//! object" name).

use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use crate::error::{Error, Result};
use crate::types::GLuint;

// =============================================================================
// CONSTANTS
// =============================================================================

const TAG_SHIFT: u32 = 28;
const GEN_SHIFT: u32 = 16;
const GEN_MASK: u16 = 0x0FFF;
const INDEX_MASK: u32 = 0xFFFF;

/// Maximum number of live slots per arena
pub const MAX_SLOTS: usize = 0xFFFF;

/// Extract the kind tag of a packed name
#[inline]
pub const fn tag_of(raw: GLuint) -> u8 {
    (raw >> TAG_SHIFT) as u8
}

// =============================================================================
// HANDLE
// =============================================================================

/// Typed, generation-checked object name
pub struct Handle<T> {
    index: u16,
    generation: u16,
    tag: u8,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Slot index
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Kind tag
    #[inline]
    pub const fn tag(self) -> u8 {
        self.tag
    }

    /// Packed GL name (never zero)
    #[inline]
    pub const fn raw(self) -> GLuint {
        ((self.tag as u32) << TAG_SHIFT)
            | (((self.generation & GEN_MASK) as u32) << GEN_SHIFT)
            | (self.index as u32 + 1)
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw() == other.raw()
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw().hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle(0x{:08x})", self.raw())
    }
}

// =============================================================================
// ARENA
// =============================================================================

enum Slot<T> {
    Occupied { generation: u16, value: T },
    Vacant { generation: u16 },
}

/// Generational slot map for one object kind
pub struct Arena<T> {
    /// Slot storage
    slots: Vec<Slot<T>>,
    /// Indices of vacant slots, reused LIFO
    free: Vec<u16>,
    /// Kind tag stamped into every handle
    tag: u8,
    /// Live object count
    len: usize,
}

impl<T> Arena<T> {
    /// Create an empty arena whose handles carry `tag` (1..=15)
    pub const fn new(tag: u8) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            tag,
            len: 0,
        }
    }

    /// Kind tag
    #[inline]
    pub const fn tag(&self) -> u8 {
        self.tag
    }

    /// Live object count
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no object is live
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store a value and return its handle
    pub fn insert(&mut self, value: T) -> Result<Handle<T>> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            let generation = match slot {
                Slot::Vacant { generation } => generation.wrapping_add(1) & GEN_MASK,
                Slot::Occupied { .. } => return Err(Error::StaleHandle),
            };
            *slot = Slot::Occupied { generation, value };
            self.len += 1;
            return Ok(self.handle(index, generation));
        }

        if self.slots.len() >= MAX_SLOTS {
            return Err(Error::OutOfMemory);
        }
        let index = self.slots.len() as u16;
        self.slots.push(Slot::Occupied {
            generation: 0,
            value,
        });
        self.len += 1;
        Ok(self.handle(index, 0))
    }

    /// Resolve a packed GL name into a live handle of this arena
    pub fn resolve(&self, raw: GLuint) -> Option<Handle<T>> {
        if raw == 0 || tag_of(raw) != self.tag {
            return None;
        }
        let index = ((raw & INDEX_MASK) as u16).checked_sub(1)?;
        let generation = ((raw >> GEN_SHIFT) as u16) & GEN_MASK;
        match self.slots.get(index as usize)? {
            Slot::Occupied { generation: g, .. } if *g == generation => {
                Some(self.handle(index, generation))
            }
            _ => None,
        }
    }

    /// Check if a handle is live
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.get(handle).is_some()
    }

    /// Borrow the object behind a handle
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        if handle.tag != self.tag {
            return None;
        }
        match self.slots.get(handle.index())? {
            Slot::Occupied { generation, value } if *generation == handle.generation => Some(value),
            _ => None,
        }
    }

    /// Mutably borrow the object behind a handle
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        if handle.tag != self.tag {
            return None;
        }
        match self.slots.get_mut(handle.index())? {
            Slot::Occupied { generation, value } if *generation == handle.generation => Some(value),
            _ => None,
        }
    }

    /// Remove an object, invalidating every copy of its handle
    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        if !self.contains(handle) {
            log::trace!("Ignoring removal of stale {:?}", handle);
            return None;
        }
        let slot = core::mem::replace(
            &mut self.slots[handle.index()],
            Slot::Vacant {
                generation: handle.generation,
            },
        );
        self.free.push(handle.index);
        self.len -= 1;
        match slot {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    /// Iterate over live objects
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(move |(i, slot)| match slot {
                Slot::Occupied { generation, value } => {
                    Some((self.handle(i as u16, *generation), value))
                }
                Slot::Vacant { .. } => None,
            })
    }

    #[inline]
    fn handle(&self, index: u16, generation: u16) -> Handle<T> {
        Handle {
            index,
            generation,
            tag: self.tag,
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

static_assertions::assert_impl_all!(Handle<u32>: Send, Sync, Copy);
