//! Host-facing control surface.
//!
//! The register block's bit layout lives outside the core; what crosses the
//! boundary is typed: a launch request carrying the six base-address
//! registers and the instruction count, and read-only access to the event
//! counters and the finish flag (via [`crate::core::engine::Core`]).

use serde::Deserialize;

/// The six host-programmed base-address registers, as word offsets into
/// external memory. Latched at launch; read-only to all stages while
/// running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BaseAddrs {
    /// Instruction stream window.
    #[serde(default = "BaseAddrs::default_insn")]
    pub insn: u64,
    /// Micro-op window.
    #[serde(default = "BaseAddrs::default_uop")]
    pub uop: u64,
    /// Operand-input window.
    #[serde(default = "BaseAddrs::default_inp")]
    pub inp: u64,
    /// Operand-weight window.
    #[serde(default = "BaseAddrs::default_wgt")]
    pub wgt: u64,
    /// Accumulator window.
    #[serde(default = "BaseAddrs::default_acc")]
    pub acc: u64,
    /// Output window.
    #[serde(default = "BaseAddrs::default_out")]
    pub out: u64,
}

impl BaseAddrs {
    const fn default_insn() -> u64 {
        0x0000
    }

    const fn default_uop() -> u64 {
        0x1000
    }

    const fn default_inp() -> u64 {
        0x2000
    }

    const fn default_wgt() -> u64 {
        0x3000
    }

    const fn default_acc() -> u64 {
        0x4000
    }

    const fn default_out() -> u64 {
        0x5000
    }
}

impl Default for BaseAddrs {
    /// Disjoint default windows, 4 Ki words apart.
    fn default() -> Self {
        Self {
            insn: Self::default_insn(),
            uop: Self::default_uop(),
            inp: Self::default_inp(),
            wgt: Self::default_wgt(),
            acc: Self::default_acc(),
            out: Self::default_out(),
        }
    }
}

/// One launch: base addresses plus the bounded instruction count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Base-address register values.
    pub base: BaseAddrs,
    /// Number of instructions Fetch will pull before draining.
    pub insn_count: u32,
}

impl LaunchRequest {
    /// A launch over the default windows.
    pub fn with_count(insn_count: u32) -> Self {
        Self {
            base: BaseAddrs::default(),
            insn_count,
        }
    }
}
