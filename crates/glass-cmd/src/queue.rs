//! # GX Transfer Queue
//!
//! Bounded queue of GX operations (command list processing, memory fills,
//! display transfers) submitted to the [`TransferEngine`].
//!
//! ```text
//!   add() ──▶ [ e0 e1 e2 ... e31 ] ──run()──▶ TransferEngine
//!                 ▲ submitted ▲ pending
//!                                   wait() ──▶ one-shot completion
//! ```
//!
//! While the queue is running every added entry is submitted immediately.
//! While it is stopped entries accumulate and are submitted on the next
//! [`TransferQueue::run`].

use alloc::vec::Vec;

use arrayvec::ArrayVec;
use glass_core::{PhysAddr, Screen};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Maximum queued GX operations
pub const GX_MAX_ENTRIES: usize = 32;

/// Fill control: start bit
pub const FILL_START: u16 = 1 << 0;
/// Fill control: finished bit
pub const FILL_FINISHED: u16 = 1 << 1;

/// Memory fill control word for a pixel of `bytes` bytes (2, 3 or 4)
#[inline]
pub const fn fill_control(bytes: u32) -> u16 {
    FILL_START | (((bytes.saturating_sub(2)) as u16) << 8)
}

/// Pack a transfer dimension (height in the low half)
#[inline]
pub const fn buffer_dim(width: u32, height: u32) -> u32 {
    (width << 16) | (height & 0xFFFF)
}

// =============================================================================
// GX OPERATIONS
// =============================================================================

/// One memory fill region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryFill {
    /// First byte
    pub start: PhysAddr,
    /// One past the last byte
    pub end: PhysAddr,
    /// Fill pattern
    pub value: u32,
    /// Control word (start bit, pixel size)
    pub control: u16,
}

/// Framebuffer to display copy with format conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTransfer {
    /// Source buffer
    pub src: PhysAddr,
    /// Source dimensions, see [`buffer_dim`]
    pub src_dim: u32,
    /// Destination buffer
    pub dst: PhysAddr,
    /// Destination dimensions
    pub dst_dim: u32,
    /// Transfer flags, see [`transfer_flags`]
    pub flags: u32,
}

/// Display transfer flag word
#[inline]
pub const fn transfer_flags(in_fmt: u32, out_fmt: u32, scale: u32) -> u32 {
    // no flip, linear output, tiled input
    (in_fmt << 8) | (out_fmt << 12) | (scale << 24)
}

/// Queued GX operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GxCommand {
    /// Execute a command list chunk
    ProcessCommandList {
        /// Command words
        words: Vec<u32>,
        /// Flush the data cache first
        flush: bool,
    },
    /// Fill one or two regions
    MemoryFill(ArrayVec<MemoryFill, 2>),
    /// Copy a framebuffer to the display
    DisplayTransfer(DisplayTransfer),
}

// =============================================================================
// TRANSFER ENGINE
// =============================================================================

/// Hardware (or simulated) executor of GX operations
pub trait TransferEngine {
    /// Execute a command list
    fn process_command_list(&mut self, words: &[u32], flush: bool);

    /// Fill memory regions
    fn memory_fill(&mut self, fills: &[MemoryFill]);

    /// Copy a framebuffer to the display
    fn display_transfer(&mut self, transfer: &DisplayTransfer);

    /// Block until every submitted operation has completed
    fn wait_idle(&mut self);

    /// Present the display buffer of a screen
    fn present(&mut self, screen: Screen);
}

fn submit(engine: &mut dyn TransferEngine, cmd: &GxCommand) {
    match cmd {
        GxCommand::ProcessCommandList { words, flush } => {
            engine.process_command_list(words, *flush)
        }
        GxCommand::MemoryFill(fills) => engine.memory_fill(fills),
        GxCommand::DisplayTransfer(t) => engine.display_transfer(t),
    }
}

// =============================================================================
// TRANSFER QUEUE
// =============================================================================

/// One-shot completion handler
pub type CompletionFn = fn(&mut dyn TransferEngine, Screen);

/// Queue statistics
#[derive(Debug, Clone, Default)]
pub struct QueueStats {
    /// Operations submitted to the engine
    pub total_submissions: u64,
    /// Completion handlers fired
    pub completions: u64,
    /// Stalls (queue full)
    pub stalls: u64,
}

/// Bounded GX operation queue
#[derive(Debug)]
pub struct TransferQueue {
    /// Queued operations
    entries: ArrayVec<GxCommand, GX_MAX_ENTRIES>,
    /// Operations already handed to the engine
    submitted: usize,
    /// Submission enabled
    running: bool,
    /// Handler fired once the queue drains
    completion: Option<(CompletionFn, Screen)>,
    /// Statistics
    stats: QueueStats,
}

impl TransferQueue {
    /// Create an empty, stopped queue
    pub fn new() -> Self {
        Self {
            entries: ArrayVec::new(),
            submitted: 0,
            running: false,
            completion: None,
            stats: QueueStats::default(),
        }
    }

    /// Queued operations
    pub fn entries(&self) -> &[GxCommand] {
        &self.entries
    }

    /// Number of queued operations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no operation is queued
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if submission is enabled
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Check if a completion handler is armed
    pub fn has_completion(&self) -> bool {
        self.completion.is_some()
    }

    /// Get statistics
    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }

    /// Queue an operation
    ///
    /// A full queue is drained (wait, then clear) before the operation is
    /// accepted.
    pub fn add(&mut self, engine: &mut dyn TransferEngine, cmd: GxCommand) {
        if self.entries.is_full() {
            self.stats.stalls += 1;
            log::debug!("Transfer queue full, draining");
            let was_running = self.running;
            self.running = true;
            self.wait(engine);
            self.clear();
            self.running = was_running;
        }
        self.entries.push(cmd);
        if self.running {
            self.kick(engine);
        }
    }

    /// Enable submission and submit everything pending
    pub fn run(&mut self, engine: &mut dyn TransferEngine) {
        self.running = true;
        self.kick(engine);
    }

    /// Disable submission
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Drop every queued operation
    pub fn clear(&mut self) {
        self.entries.clear();
        self.submitted = 0;
    }

    /// Arm the one-shot completion handler
    pub fn set_completion(&mut self, func: CompletionFn, screen: Screen) {
        self.completion = Some((func, screen));
    }

    /// Wait for submitted operations
    ///
    /// Returns `true` when every queued operation has completed, in which
    /// case the completion handler (if any) fires once.
    pub fn wait(&mut self, engine: &mut dyn TransferEngine) -> bool {
        if self.running {
            self.kick(engine);
        }
        engine.wait_idle();

        let drained = self.submitted == self.entries.len();
        if drained {
            if let Some((func, screen)) = self.completion.take() {
                self.stats.completions += 1;
                func(engine, screen);
            }
        }
        drained
    }

    fn kick(&mut self, engine: &mut dyn TransferEngine) {
        while self.submitted < self.entries.len() {
            submit(engine, &self.entries[self.submitted]);
            self.submitted += 1;
            self.stats.total_submissions += 1;
        }
    }
}
