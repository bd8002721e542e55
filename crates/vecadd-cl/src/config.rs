//! Laufkonfiguration, unabhängig von der Kommandozeile.

use crate::{
    device::DevicePreference,
    fill::Fill,
    kernel::{KernelSpec, DEFAULT_KERNEL_FILE},
    report::PrintMode,
};

/// Standardgröße von `vecadd-timed` ohne Argument
pub const DEFAULT_TIMED_SIZE: usize = 100_000_000;

/// Größte Länge, die der `int`-Parameter des Kernels fasst
pub const MAX_VECTOR_SIZE: usize = i32::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub size: usize,
    pub device: DevicePreference,
    pub kernel: KernelSpec,
    pub fill: Fill,
    pub print: PrintMode,
    /// Eingaben vor der Berechnung ausgeben
    pub show_inputs: bool,
    /// Kernelzeit in ms ausgeben
    pub timing: bool,
}

impl RunConfig {
    /// Eingebetteter Kernel, sequentielle Eingaben, nur das Ergebnis
    pub fn plain(size: usize) -> Self {
        Self {
            size,
            device: DevicePreference::Auto,
            kernel: KernelSpec::embedded(),
            fill: Fill::Sequential,
            print: PrintMode::Full,
            show_inputs: false,
            timing: false,
        }
    }

    /// Kernel aus Datei, Zufallseingaben, gekürzte Ausgabe mit Zeitmessung
    pub fn timed(size: usize) -> Self {
        Self {
            size,
            device: DevicePreference::Auto,
            kernel: KernelSpec::from_file(DEFAULT_KERNEL_FILE),
            fill: Fill::Random { seed: None },
            print: PrintMode::Truncated,
            show_inputs: true,
            timing: true,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::timed(DEFAULT_TIMED_SIZE)
    }
}
