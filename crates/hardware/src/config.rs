//! Configuration system for the accelerator core simulator.
//!
//! This module defines all configuration structures and enums used to
//! parameterize the simulator. It provides:
//! 1. **Defaults:** Baseline hardware constants (memory, queues, scratchpad).
//! 2. **Structures:** Hierarchical config for general, memory, core, and scratchpad.
//! 3. **Validation:** One-time elaboration check rejecting malformed fields.
//!
//! Configuration is supplied as JSON (CLI `--config`) or via `Config::default()`.
//! Validation failures are fatal at build time; there is no runtime fallback.

use serde::Deserialize;

use crate::common::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    /// External memory size in 64-bit words (8 MiB).
    pub const MEM_WORDS: u64 = 1 << 20;

    /// Base access latency of a memory channel in cycles.
    pub const MEM_LATENCY: u64 = 4;

    /// CAS latency for the row-buffer memory model.
    pub const T_CAS: u64 = 14;

    /// RAS latency for the row-buffer memory model.
    pub const T_RAS: u64 = 14;

    /// Precharge latency for the row-buffer memory model.
    pub const T_PRE: u64 = 14;

    /// Depth of each typed instruction queue.
    pub const QUEUE_DEPTH: usize = 8;

    /// Depth of each dependency-token channel (1 = single-slot semaphore).
    pub const TOKEN_DEPTH: u8 = 1;

    /// Instructions requested per fetch burst.
    pub const FETCH_BURST: u16 = 4;

    /// Micro-op buffer depth in words.
    pub const UOP_DEPTH: usize = 512;

    /// Operand-input buffer depth in words.
    pub const INP_DEPTH: usize = 1024;

    /// Operand-weight buffer depth in words.
    pub const WGT_DEPTH: usize = 1024;

    /// Accumulator buffer depth in words.
    pub const ACC_DEPTH: usize = 1024;

    /// Result buffer depth in words.
    pub const OUT_DEPTH: usize = 1024;
}

/// Memory latency model selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum MemoryModel {
    /// Fixed latency per access (default).
    #[default]
    Fixed,
    /// Row-buffer-aware latency (CAS, RAS, precharge).
    #[serde(alias = "DRAM")]
    RowBuffer,
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// ```
/// use tacsim_core::config::Config;
///
/// let config = Config::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.core.token_depth, 1);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// External memory configuration.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Core queue and token-channel configuration.
    #[serde(default)]
    pub core: CoreConfig,
    /// Scratchpad region depths.
    #[serde(default)]
    pub scratchpad: ScratchpadConfig,
}

impl Config {
    /// Validates the configuration once, at elaboration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for any zero-sized structural field or a
    /// latency that would break the registered port protocol.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn non_zero(value: u64, field: &'static str) -> Result<(), ConfigError> {
            if value == 0 {
                Err(ConfigError::ZeroField { field })
            } else {
                Ok(())
            }
        }

        non_zero(self.memory.size_words, "memory.size_words")?;
        if self.memory.latency == 0 {
            return Err(ConfigError::ZeroLatency);
        }
        if self.memory.model == MemoryModel::RowBuffer && self.memory.t_cas == 0 {
            return Err(ConfigError::ZeroLatency);
        }
        non_zero(self.core.queue_depth as u64, "core.queue_depth")?;
        non_zero(u64::from(self.core.token_depth), "core.token_depth")?;
        non_zero(u64::from(self.core.fetch_burst), "core.fetch_burst")?;
        non_zero(self.scratchpad.uop as u64, "scratchpad.uop")?;
        non_zero(self.scratchpad.inp as u64, "scratchpad.inp")?;
        non_zero(self.scratchpad.wgt as u64, "scratchpad.wgt")?;
        non_zero(self.scratchpad.acc as u64, "scratchpad.acc")?;
        non_zero(self.scratchpad.out as u64, "scratchpad.out")?;
        Ok(())
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Emit stage start/done edge events to the diagnostic trace surface.
    #[serde(default)]
    pub trace_edges: bool,
}

/// External memory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Memory size in 64-bit words.
    #[serde(default = "MemoryConfig::default_size_words")]
    pub size_words: u64,

    /// Latency model selection.
    #[serde(default)]
    pub model: MemoryModel,

    /// Base access latency in cycles (fixed model; also the row-buffer
    /// model's per-transfer overhead).
    #[serde(default = "MemoryConfig::default_latency")]
    pub latency: u64,

    /// CAS latency (row-buffer model).
    #[serde(default = "MemoryConfig::default_t_cas")]
    pub t_cas: u64,

    /// RAS latency (row-buffer model).
    #[serde(default = "MemoryConfig::default_t_ras")]
    pub t_ras: u64,

    /// Precharge latency (row-buffer model).
    #[serde(default = "MemoryConfig::default_t_pre")]
    pub t_pre: u64,
}

impl MemoryConfig {
    fn default_size_words() -> u64 {
        defaults::MEM_WORDS
    }

    fn default_latency() -> u64 {
        defaults::MEM_LATENCY
    }

    fn default_t_cas() -> u64 {
        defaults::T_CAS
    }

    fn default_t_ras() -> u64 {
        defaults::T_RAS
    }

    fn default_t_pre() -> u64 {
        defaults::T_PRE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size_words: defaults::MEM_WORDS,
            model: MemoryModel::default(),
            latency: defaults::MEM_LATENCY,
            t_cas: defaults::T_CAS,
            t_ras: defaults::T_RAS,
            t_pre: defaults::T_PRE,
        }
    }
}

/// Core queue and dependency-token configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreConfig {
    /// Depth of each typed instruction queue.
    #[serde(default = "CoreConfig::default_queue_depth")]
    pub queue_depth: usize,

    /// Depth of each dependency-token channel. The default of 1 models a
    /// single-slot semaphore: at most one outstanding buffer generation per
    /// producer/consumer pair.
    #[serde(default = "CoreConfig::default_token_depth")]
    pub token_depth: u8,

    /// Instructions requested per fetch burst.
    #[serde(default = "CoreConfig::default_fetch_burst")]
    pub fetch_burst: u16,
}

impl CoreConfig {
    fn default_queue_depth() -> usize {
        defaults::QUEUE_DEPTH
    }

    fn default_token_depth() -> u8 {
        defaults::TOKEN_DEPTH
    }

    fn default_fetch_burst() -> u16 {
        defaults::FETCH_BURST
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            queue_depth: defaults::QUEUE_DEPTH,
            token_depth: defaults::TOKEN_DEPTH,
            fetch_burst: defaults::FETCH_BURST,
        }
    }
}

/// Scratchpad region depths, in 64-bit words.
#[derive(Debug, Clone, Deserialize)]
pub struct ScratchpadConfig {
    /// Micro-op buffer depth.
    #[serde(default = "ScratchpadConfig::default_uop")]
    pub uop: usize,

    /// Operand-input buffer depth.
    #[serde(default = "ScratchpadConfig::default_inp")]
    pub inp: usize,

    /// Operand-weight buffer depth.
    #[serde(default = "ScratchpadConfig::default_wgt")]
    pub wgt: usize,

    /// Accumulator buffer depth.
    #[serde(default = "ScratchpadConfig::default_acc")]
    pub acc: usize,

    /// Result buffer depth.
    #[serde(default = "ScratchpadConfig::default_out")]
    pub out: usize,
}

impl ScratchpadConfig {
    fn default_uop() -> usize {
        defaults::UOP_DEPTH
    }

    fn default_inp() -> usize {
        defaults::INP_DEPTH
    }

    fn default_wgt() -> usize {
        defaults::WGT_DEPTH
    }

    fn default_acc() -> usize {
        defaults::ACC_DEPTH
    }

    fn default_out() -> usize {
        defaults::OUT_DEPTH
    }
}

impl Default for ScratchpadConfig {
    fn default() -> Self {
        Self {
            uop: defaults::UOP_DEPTH,
            inp: defaults::INP_DEPTH,
            wgt: defaults::WGT_DEPTH,
            acc: defaults::ACC_DEPTH,
            out: defaults::OUT_DEPTH,
        }
    }
}
