//! # Simulated Platform
//!
//! In-memory [`Platform`] that hands out linear and VRAM ranges, stores
//! written bytes, executes memory fills and records every GX operation.
//! Clones share one [`SimState`], so a test keeps a clone to inspect what
//! the library did with the copy it was given.
//!
//! ```text
//!   SimPlatform ──clone──▶ SimPlatform (owned by Glass)
//!        │                       │
//!        └──── Arc<Mutex<SimState>> ────┘
//! ```

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use glass_cmd::{DisplayTransfer, MemoryFill, TransferEngine};
use glass_core::{PhysAddr, Screen, Side};
use hashbrown::HashMap;
use spin::{Mutex, MutexGuard};

use crate::platform::{DisplayBuffer, Platform, VramBank};

// =============================================================================
// MEMORY LAYOUT
// =============================================================================

/// Physical base of the simulated linear heap
pub const LINEAR_BASE: u32 = 0x2000_0000;
/// Simulated linear heap size
pub const LINEAR_SIZE: u32 = 0x0100_0000;
/// Physical base of VRAM bank A
pub const VRAM_A_BASE: u32 = 0x1800_0000;
/// Physical base of VRAM bank B
pub const VRAM_B_BASE: u32 = 0x1830_0000;
/// Size of one VRAM bank
pub const VRAM_BANK_SIZE: u32 = 0x0030_0000;

const ALLOC_ALIGN: u32 = 0x80;

/// Top screen framebuffer (portrait layout, RGB8)
const TOP_DISPLAY: (u32, u32, u32) = (240, 400, 1);
/// Bottom screen framebuffer (portrait layout, RGB8)
const BOTTOM_DISPLAY: (u32, u32, u32) = (240, 320, 1);

#[derive(Debug, Clone, Copy)]
struct BumpRegion {
    next: u32,
    end: u32,
}

impl BumpRegion {
    const fn new(base: u32, size: u32) -> Self {
        Self {
            next: base,
            end: base + size,
        }
    }

    fn alloc(&mut self, size: usize) -> Option<u32> {
        let size = u32::try_from(size).ok()?;
        let aligned = size.checked_add(ALLOC_ALIGN - 1)? & !(ALLOC_ALIGN - 1);
        let start = self.next;
        let end = start.checked_add(aligned.max(ALLOC_ALIGN))?;
        if end > self.end {
            return None;
        }
        self.next = end;
        Some(start)
    }
}

// =============================================================================
// SHARED STATE
// =============================================================================

/// Everything the simulated hardware observed
#[derive(Debug)]
pub struct SimState {
    /// Live allocations by base address
    memory: HashMap<u32, Vec<u8>>,
    linear: BumpRegion,
    vram_a: BumpRegion,
    vram_b: BumpRegion,
    displays: [DisplayBuffer; 3],
    /// Command lists processed, in order
    pub command_lists: Vec<Vec<u32>>,
    /// Memory fill batches executed, in order
    pub fills: Vec<Vec<MemoryFill>>,
    /// Display transfers executed, in order
    pub transfers: Vec<DisplayTransfer>,
    /// Screens presented, in order
    pub presents: Vec<Screen>,
    /// Idle waits
    pub waits: usize,
}

impl SimState {
    fn new() -> Self {
        let mut state = Self {
            memory: HashMap::new(),
            linear: BumpRegion::new(LINEAR_BASE, LINEAR_SIZE),
            vram_a: BumpRegion::new(VRAM_A_BASE, VRAM_BANK_SIZE),
            vram_b: BumpRegion::new(VRAM_B_BASE, VRAM_BANK_SIZE),
            displays: [DisplayBuffer {
                addr: PhysAddr::null(),
                format: 0,
                width: 0,
                height: 0,
            }; 3],
            command_lists: Vec::new(),
            fills: Vec::new(),
            transfers: Vec::new(),
            presents: Vec::new(),
            waits: 0,
        };

        let layouts = [TOP_DISPLAY, TOP_DISPLAY, BOTTOM_DISPLAY];
        for (slot, (width, height, format)) in layouts.into_iter().enumerate() {
            let size = (width * height * 3) as usize;
            let addr = state
                .linear
                .alloc(size)
                .map(|a| {
                    state.memory.insert(a, vec![0; size]);
                    PhysAddr::new(a)
                })
                .unwrap_or_default();
            state.displays[slot] = DisplayBuffer {
                addr,
                format,
                width,
                height,
            };
        }
        state
    }

    fn region_mut(&mut self, addr: u32) -> Option<(&mut Vec<u8>, usize)> {
        self.memory.iter_mut().find_map(|(base, bytes)| {
            let offset = addr.checked_sub(*base)? as usize;
            (offset < bytes.len()).then_some((bytes, offset))
        })
    }

    /// Copy `len` bytes starting at `addr` out of one allocation
    pub fn read(&self, addr: PhysAddr, len: usize) -> Option<Vec<u8>> {
        self.memory.iter().find_map(|(base, bytes)| {
            let offset = addr.raw().checked_sub(*base)? as usize;
            bytes.get(offset..offset.checked_add(len)?).map(<[u8]>::to_vec)
        })
    }

    /// Number of live allocations, display buffers included
    pub fn allocations(&self) -> usize {
        self.memory.len()
    }

    fn store(&mut self, addr: u32, data: &[u8]) {
        match self.region_mut(addr) {
            Some((bytes, offset)) => {
                let n = data.len().min(bytes.len() - offset);
                bytes[offset..offset + n].copy_from_slice(&data[..n]);
            }
            None => log::warn!("Write to unmapped address 0x{:08x}", addr),
        }
    }

    fn fill(&mut self, fill: &MemoryFill) {
        let width = match fill.control >> 8 {
            0 => 2,
            1 => 3,
            _ => 4,
        };
        let pattern = fill.value.to_le_bytes();
        let Some((bytes, offset)) = self.region_mut(fill.start.raw()) else {
            log::warn!("Fill of unmapped address {}", fill.start);
            return;
        };
        let end = (offset + (fill.end - fill.start) as usize).min(bytes.len());
        for (i, byte) in bytes[offset..end].iter_mut().enumerate() {
            *byte = pattern[i % width];
        }
    }
}

// =============================================================================
// SIM PLATFORM
// =============================================================================

/// Recording platform for host-side tests
#[derive(Debug, Clone)]
pub struct SimPlatform {
    state: Arc<Mutex<SimState>>,
}

impl SimPlatform {
    /// Create a platform with empty memory and allocated display buffers
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState::new())),
        }
    }

    /// Lock the shared state
    pub fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock()
    }

    /// Copy bytes out of simulated memory
    pub fn read(&self, addr: PhysAddr, len: usize) -> Option<Vec<u8>> {
        self.state.lock().read(addr, len)
    }

    /// Concatenation of every processed command list
    pub fn command_words(&self) -> Vec<u32> {
        self.state.lock().command_lists.concat()
    }
}

impl TransferEngine for SimPlatform {
    fn process_command_list(&mut self, words: &[u32], _flush: bool) {
        self.state.lock().command_lists.push(words.to_vec());
    }

    fn memory_fill(&mut self, fills: &[MemoryFill]) {
        let mut state = self.state.lock();
        for fill in fills {
            state.fill(fill);
        }
        state.fills.push(fills.to_vec());
    }

    fn display_transfer(&mut self, transfer: &DisplayTransfer) {
        self.state.lock().transfers.push(*transfer);
    }

    fn wait_idle(&mut self) {
        self.state.lock().waits += 1;
    }

    fn present(&mut self, screen: Screen) {
        self.state.lock().presents.push(screen);
    }
}

impl Platform for SimPlatform {
    fn linear_base(&self) -> PhysAddr {
        PhysAddr::new(LINEAR_BASE)
    }

    fn linear_alloc(&mut self, size: usize) -> Option<PhysAddr> {
        let mut state = self.state.lock();
        let addr = state.linear.alloc(size)?;
        state.memory.insert(addr, vec![0; size]);
        Some(PhysAddr::new(addr))
    }

    fn linear_free(&mut self, addr: PhysAddr) {
        self.state.lock().memory.remove(&addr.raw());
    }

    fn vram_alloc(&mut self, size: usize, bank: VramBank) -> Option<PhysAddr> {
        let mut state = self.state.lock();
        let addr = match bank {
            VramBank::A => state.vram_a.alloc(size)?,
            VramBank::B => state.vram_b.alloc(size)?,
        };
        state.memory.insert(addr, vec![0; size]);
        Some(PhysAddr::new(addr))
    }

    fn vram_free(&mut self, addr: PhysAddr) {
        self.state.lock().memory.remove(&addr.raw());
    }

    fn write(&mut self, addr: PhysAddr, data: &[u8]) {
        self.state.lock().store(addr.raw(), data);
    }

    fn display_buffer(&self, screen: Screen, side: Side) -> DisplayBuffer {
        let slot = match (screen, side) {
            (Screen::Top, Side::Left) => 0,
            (Screen::Top, Side::Right) => 1,
            (Screen::Bottom, _) => 2,
        };
        self.state.lock().displays[slot]
    }
}

static_assertions::assert_impl_all!(SimPlatform: Send, Sync, Clone);
