// Vektoraddition auf einem OpenCL-Gerät: GPU bevorzugt, CPU als Fallback.

// ─── Module ──────────────────────────────────────────────────────────
pub mod buffer;
pub mod cli;
pub mod config;
pub mod device;
pub mod fill;
pub mod kernel;
pub mod report;
pub mod runner;
pub mod vecadd;

#[cfg(feature = "metrics")]
mod metrics;
#[cfg(feature = "metrics")]
pub use metrics::{record, summary, ALLOCS, ALLOC_BYTES};

// ─── Re-Exports ──────────────────────────────────────────────────────
pub use buffer::{Access, DeviceVec, EventGuard, InFlight, Queued, Ready, State};
pub use config::{RunConfig, DEFAULT_TIMED_SIZE, MAX_VECTOR_SIZE};
pub use device::{DeviceKind, DevicePreference, SelectedDevice, Session};
pub use fill::Fill;
pub use kernel::{ArgLayout, CompiledKernel, KernelSource, KernelSpec};
pub use report::PrintMode;
pub use vecadd::{add_on_device, add_on_host, AddOutcome};

use std::path::PathBuf;

// ─── Fehler‑Typ ──────────────────────────────────────────────────────
#[derive(thiserror::Error, Debug)]
pub enum ClError {
    #[error("OpenCL error code {0}")]
    Api(i32),

    #[error("no OpenCL platform found")]
    NoPlatform,

    #[error("no OpenCL {wanted} device found")]
    NoDevice { wanted: &'static str },

    #[error("failed to build kernel `{kernel}` (error code {code}):\n{log}")]
    Build { kernel: String, code: i32, log: String },

    #[error("kernel `{kernel}` takes {found} arguments, expected 4")]
    KernelArity { kernel: String, found: u32 },

    #[error("couldn't read kernel source {}", path.display())]
    KernelFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid buffer size: {0}")]
    InvalidSize(usize),

    #[error("vector length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("vector size {0} exceeds the kernel's int range")]
    SizeTooLarge(usize),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl ClError {
    /// Build-Log, falls der Fehler vom Kernel-Compiler stammt
    pub fn build_log(&self) -> Option<&str> {
        match self {
            ClError::Build { log, .. } => Some(log),
            _ => None,
        }
    }
}

impl From<opencl3::error_codes::ClError> for ClError {
    fn from(err: opencl3::error_codes::ClError) -> Self {
        ClError::Api(err.0)
    }
}

impl From<i32> for ClError {
    fn from(code: i32) -> Self {
        ClError::Api(code)
    }
}
