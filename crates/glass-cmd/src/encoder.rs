//! # Command Buffer
//!
//! Encodes register writes into the PICA200 command list format and tracks
//! the committed/pending split of the buffer.
//!
//! ```text
//!            committed (offset)        pending (size)
//! words: [ ..................... | ................... |    free    ]
//!        0                      offset          offset+size     capacity
//! ```
//!
//! A command is laid out as the first parameter, the header, the remaining
//! parameters, then one zero word of padding when the total is odd:
//!
//! ```text
//!  31  30    28 27      20 19  16 15  10 9          0
//! +---+--------+----------+------+------+------------+
//! |inc|   0    | count-1  | mask |  0   |  register  |
//! +---+--------+----------+------+------+------------+
//! ```

use alloc::vec::Vec;

use glass_core::{Error, Result};

use crate::regs::{self, Reg};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default command buffer capacity in words
pub const GPU_MAX_ENTRIES: usize = 0x4000;

/// Maximum parameters per command header
pub const MAX_PARAMS_PER_HEADER: usize = 256;

/// Full byte-enable mask
pub const MASK_ALL: u8 = 0xF;

/// Encode a command header
#[inline]
pub const fn header(reg: Reg, mask: u8, count: usize, incremental: bool) -> u32 {
    (reg as u32 & 0x3FF)
        | ((mask as u32 & 0xF) << 16)
        | (((count as u32 - 1) & 0xFF) << 20)
        | ((incremental as u32) << 31)
}

/// Words taken by one command carrying `count` parameters
#[inline]
const fn encoded_len(count: usize) -> usize {
    let len = count + 1;
    len + (len & 1)
}

// =============================================================================
// COMMAND BUFFER
// =============================================================================

/// Command buffer statistics
#[derive(Debug, Clone, Default)]
pub struct CommandStats {
    /// Commands encoded
    pub commands: u64,
    /// Chunks split off for processing
    pub splits: u64,
    /// Writes rejected for lack of space
    pub overflows: u64,
}

/// PICA200 command list buffer
#[derive(Debug)]
pub struct CommandBuffer {
    /// Encoded words, committed prefix followed by the pending chunk
    words: Vec<u32>,
    /// Capacity in words
    capacity: usize,
    /// Words already handed to the transfer queue
    offset: usize,
    /// Statistics
    stats: CommandStats,
}

impl CommandBuffer {
    /// Create a command buffer holding up to `capacity` words
    pub fn new(capacity: usize) -> Self {
        Self {
            words: Vec::with_capacity(capacity),
            capacity,
            offset: 0,
            stats: CommandStats::default(),
        }
    }

    /// Capacity in words
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Words committed since the last reset
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Words encoded but not yet split off
    pub fn pending_len(&self) -> usize {
        self.words.len() - self.offset
    }

    /// Pending words
    pub fn pending(&self) -> &[u32] {
        &self.words[self.offset..]
    }

    /// Get statistics
    pub fn stats(&self) -> &CommandStats {
        &self.stats
    }

    /// Single write with all bytes enabled
    #[inline]
    pub fn write(&mut self, reg: Reg, value: u32) -> Result<()> {
        self.write_masked(reg, MASK_ALL, value)
    }

    /// Single write with a byte-enable mask
    #[inline]
    pub fn write_masked(&mut self, reg: Reg, mask: u8, value: u32) -> Result<()> {
        self.emit(reg, mask, &[value], false)
    }

    /// Consecutive registers starting at `reg`
    #[inline]
    pub fn write_incremental(&mut self, reg: Reg, values: &[u32]) -> Result<()> {
        self.emit(reg, MASK_ALL, values, true)
    }

    /// Repeated writes to the same register
    #[inline]
    pub fn write_repeated(&mut self, reg: Reg, values: &[u32]) -> Result<()> {
        self.emit(reg, MASK_ALL, values, false)
    }

    /// Encode a write, splitting into chunks of at most 256 parameters
    pub fn emit(&mut self, reg: Reg, mask: u8, values: &[u32], incremental: bool) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }

        let needed: usize = values
            .chunks(MAX_PARAMS_PER_HEADER)
            .map(|c| encoded_len(c.len()))
            .sum();
        if self.words.len() + needed > self.capacity {
            self.stats.overflows += 1;
            log::warn!(
                "Command buffer full: {} words requested, {} free",
                needed,
                self.capacity - self.words.len()
            );
            return Err(Error::CommandBufferFull);
        }

        let mut reg = reg;
        for chunk in values.chunks(MAX_PARAMS_PER_HEADER) {
            self.words.push(chunk[0]);
            self.words.push(header(reg, mask, chunk.len(), incremental));
            self.words.extend_from_slice(&chunk[1..]);
            if self.words.len() & 1 != 0 {
                self.words.push(0);
            }
            if incremental {
                reg = reg.wrapping_add(chunk.len() as Reg);
            }
            self.stats.commands += 1;
        }
        Ok(())
    }

    /// Terminate the pending chunk so it can be processed on its own
    ///
    /// Appends a finalize command, plus one more when needed to keep the
    /// chunk a multiple of four words.
    pub fn split(&mut self) -> Result<()> {
        self.write(regs::FINALIZE, regs::FINALIZE_MAGIC)?;
        if self.pending_len() % 4 != 0 {
            self.write(regs::FINALIZE, regs::FINALIZE_MAGIC)?;
        }
        Ok(())
    }

    /// Split the pending chunk and commit it, returning a copy of its words
    ///
    /// Returns `None` when nothing is pending.
    pub fn take_pending(&mut self) -> Result<Option<Vec<u32>>> {
        if self.pending_len() == 0 {
            return Ok(None);
        }
        self.split()?;
        let chunk = self.words[self.offset..].to_vec();
        self.offset = self.words.len();
        self.stats.splits += 1;
        Ok(Some(chunk))
    }

    /// Drop every word, committed or not
    pub fn reset(&mut self) {
        self.words.clear();
        self.offset = 0;
    }
}
