//! External memory surface: backing store, latency models, and port channels.
//!
//! This module implements the memory fabric the core's stages talk to. It
//! provides:
//! 1. **Backing store:** A word-addressed memory image with loader access.
//! 2. **Channels:** Five read channels and one write channel, each a
//!    single-outstanding request/response pair ([`ports`]).
//! 3. **Latency:** Pluggable fixed or row-buffer timing ([`dram`]).
//!
//! Reads outside the image return zero and writes outside it are dropped;
//! region placement is the host's responsibility and checked only at load
//! time.

/// Latency models (fixed, row-buffer).
pub mod dram;
/// Port channels and the static binding table.
pub mod ports;

use crate::common::constants::{NUM_READ_PORTS, NUM_WRITE_PORTS};
use crate::common::{Cycle, SimError};
use crate::config::MemoryConfig;
use dram::build_model;
use ports::{ReadChannel, WriteChannel};

/// The external memory fabric: backing words plus the fixed channel set.
#[derive(Debug)]
pub struct MemorySystem {
    words: Vec<u64>,
    read: Vec<ReadChannel>,
    write: Vec<WriteChannel>,
}

impl MemorySystem {
    /// Builds the fabric for a validated memory configuration.
    pub fn new(config: &MemoryConfig) -> Self {
        let read = (0..NUM_READ_PORTS)
            .map(|_| ReadChannel::new(build_model(config)))
            .collect();
        let write = (0..NUM_WRITE_PORTS)
            .map(|_| WriteChannel::new(build_model(config)))
            .collect();
        Self {
            words: vec![0; config.size_words as usize],
            read,
            write,
        }
    }

    /// Memory size in words.
    pub fn size_words(&self) -> u64 {
        self.words.len() as u64
    }

    /// Reads one backing word; out-of-image addresses read as zero.
    pub fn read_word(&self, addr: u64) -> u64 {
        self.words.get(addr as usize).copied().unwrap_or(0)
    }

    /// Writes one backing word; out-of-image addresses are dropped.
    pub fn write_word(&mut self, addr: u64, value: u64) {
        if let Some(slot) = self.words.get_mut(addr as usize) {
            *slot = value;
        }
    }

    /// Places an image of words at a base address.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ImageOutOfRange`] if the image does not fit.
    pub fn load_words(&mut self, base: u64, image: &[u64]) -> Result<(), SimError> {
        let end = base.checked_add(image.len() as u64);
        match end {
            Some(end) if end <= self.size_words() => {
                self.words[base as usize..end as usize].copy_from_slice(image);
                Ok(())
            }
            _ => Err(SimError::ImageOutOfRange {
                base,
                words: image.len() as u64,
                mem_words: self.size_words(),
            }),
        }
    }

    /// Issues a burst read of `burst` words at `addr` on the given channel.
    /// Returns `false` without side effects if the channel is busy.
    pub fn issue_read(&mut self, port: usize, now: Cycle, addr: u64, burst: u16) -> bool {
        let data: Vec<u64> = (0..u64::from(burst))
            .map(|i| self.read_word(addr + i))
            .collect();
        match self.read.get_mut(port) {
            Some(channel) => channel.issue(now, addr, data),
            None => false,
        }
    }

    /// Returns a completed read response, if one is ready this cycle.
    pub fn poll_read(&mut self, port: usize, now: Cycle) -> Option<Vec<u64>> {
        self.read.get_mut(port).and_then(|channel| channel.poll(now))
    }

    /// Issues a burst write on the given channel. Data is committed to the
    /// backing store at issue; the ack arrives after the channel latency.
    /// Returns `false` without side effects if the channel is busy.
    pub fn issue_write(&mut self, port: usize, now: Cycle, addr: u64, data: &[u64]) -> bool {
        let accepted = match self.write.get_mut(port) {
            Some(channel) => channel.issue(now, addr, data.len() as u64),
            None => false,
        };
        if accepted {
            for (i, &word) in data.iter().enumerate() {
                self.write_word(addr + i as u64, word);
            }
        }
        accepted
    }

    /// Consumes a completed write ack, if one is ready this cycle.
    pub fn poll_write_ack(&mut self, port: usize, now: Cycle) -> bool {
        self.write
            .get_mut(port)
            .is_some_and(|channel| channel.poll_ack(now))
    }

    /// Drops all in-flight transactions (launch reset). The backing image
    /// is preserved.
    pub fn reset_channels(&mut self) {
        for channel in &mut self.read {
            channel.reset();
        }
        for channel in &mut self.write {
            channel.reset();
        }
    }
}
