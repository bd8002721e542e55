//! Kommandozeile der beiden Programme `vecadd` und `vecadd-timed`.

use crate::{
    config::{RunConfig, DEFAULT_TIMED_SIZE, MAX_VECTOR_SIZE},
    device::DevicePreference,
    fill::Fill,
    kernel::{KernelSpec, DEFAULT_KERNEL_FILE, FILE_KERNEL_NAME},
    report::PrintMode,
    vecadd::AddOutcome,
    ClError,
};
use clap::{error::ErrorKind, Args, Parser, ValueEnum};
use std::{error::Error as _, ffi::OsString, path::PathBuf, process::ExitCode};

/// Exit-Status bei Argument- und Laufzeitfehlern
pub const FAILURE: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FillKind {
    Sequential,
    Random,
}

/// Optionen beider Programme
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Device class to run on; `auto` falls back to the CPU without a GPU
    #[arg(long, value_enum, env = "VECADD_DEVICE", default_value_t = DevicePreference::Auto)]
    pub device: DevicePreference,

    /// How vectors are printed [default: program dependent]
    #[arg(long, value_enum)]
    pub print: Option<PrintMode>,

    /// Input initialisation [default: program dependent]
    #[arg(long, value_enum)]
    pub fill: Option<FillKind>,

    /// Seed for `--fill random`
    #[arg(long)]
    pub seed: Option<u64>,
}

impl CommonArgs {
    fn apply(&self, cfg: &mut RunConfig) {
        cfg.device = self.device;
        if let Some(print) = self.print {
            cfg.print = print;
        }
        let kind = self.fill.unwrap_or(match cfg.fill {
            Fill::Sequential => FillKind::Sequential,
            Fill::Random { .. } => FillKind::Random,
        });
        cfg.fill = match kind {
            FillKind::Sequential => Fill::Sequential,
            FillKind::Random => Fill::Random { seed: self.seed },
        };
    }
}

/// Add two integer vectors on an OpenCL device (GPU, else CPU)
#[derive(Parser, Debug)]
#[command(name = "vecadd", version)]
pub struct AddCli {
    /// Number of elements per vector
    #[arg(value_parser = clap::value_parser!(u32).range(..=MAX_VECTOR_SIZE as i64))]
    pub vector_size: u32,

    /// Also print the kernel execution time
    #[arg(long)]
    pub timing: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl AddCli {
    pub fn into_config(self) -> RunConfig {
        let mut cfg = RunConfig::plain(self.vector_size as usize);
        cfg.timing = self.timing;
        self.common.apply(&mut cfg);
        cfg
    }
}

/// Add two random integer vectors with a kernel loaded from disk and time the dispatch
#[derive(Parser, Debug)]
#[command(name = "vecadd-timed", version)]
pub struct TimedCli {
    /// Number of elements per vector
    #[arg(
        default_value_t = DEFAULT_TIMED_SIZE as u32,
        value_parser = clap::value_parser!(u32).range(..=MAX_VECTOR_SIZE as i64)
    )]
    pub vector_size: u32,

    /// OpenCL C source containing the kernel
    #[arg(long, env = "VECADD_KERNEL_FILE", default_value = DEFAULT_KERNEL_FILE)]
    pub kernel_file: PathBuf,

    /// Kernel entry point, called as (size, a, b, out)
    #[arg(long, default_value = FILE_KERNEL_NAME)]
    pub kernel_name: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl TimedCli {
    pub fn into_config(self) -> RunConfig {
        let mut cfg = RunConfig::timed(self.vector_size as usize);
        cfg.kernel = KernelSpec::from_file(self.kernel_file).with_name(self.kernel_name);
        self.common.apply(&mut cfg);
        cfg
    }
}

// ─── Parsen & Exit-Codes ─────────────────────────────────────────────

pub fn parse_or_exit<T: Parser>() -> T {
    parse_from_or_exit(std::env::args_os())
}

/// `--help`/`--version` enden mit 0, jeder andere Fehler mit Usage und Status 1
pub fn parse_from_or_exit<T, I, A>(args: I) -> T
where
    T: Parser,
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(i32::from(FAILURE));
        }
    }
}

/// `RUST_LOG` überschreibt den Standardfilter `warn`
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .try_init();
}

/// Fehler samt Ursachen auf stderr, Build-Logs vollständig
pub fn report_error(err: &ClError) {
    eprintln!("error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}

pub fn exit_code(result: Result<AddOutcome, ClError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::from(FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{ArgLayout, KernelSource};

    #[test]
    fn vecadd_requires_size() {
        let err = AddCli::try_parse_from(["vecadd"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = AddCli::try_parse_from(["vecadd", "five"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn size_is_bounded_by_kernel_int() {
        let cfg = AddCli::try_parse_from(["vecadd", "2147483647"]).unwrap().into_config();
        assert_eq!(cfg.size, MAX_VECTOR_SIZE);

        for too_big in ["2147483648", "5000000000000000000"] {
            let err = AddCli::try_parse_from(["vecadd", too_big]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "argument {too_big}");
            let err = TimedCli::try_parse_from(["vecadd-timed", too_big]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "argument {too_big}");
        }
    }

    #[test]
    fn vecadd_defaults_to_plain_run() {
        let cfg = AddCli::try_parse_from(["vecadd", "5"]).unwrap().into_config();
        assert_eq!(cfg, RunConfig::plain(5));
    }

    #[test]
    fn vecadd_overrides() {
        let cfg = AddCli::try_parse_from([
            "vecadd", "8", "--device", "cpu", "--fill", "random", "--seed", "3", "--print", "off", "--timing",
        ])
        .unwrap()
        .into_config();
        assert_eq!(cfg.device, DevicePreference::Cpu);
        assert_eq!(cfg.fill, Fill::Random { seed: Some(3) });
        assert_eq!(cfg.print, PrintMode::Off);
        assert!(cfg.timing);
    }

    #[test]
    fn timed_size_is_optional() {
        let cfg = TimedCli::try_parse_from(["vecadd-timed"]).unwrap().into_config();
        assert_eq!(cfg.size, DEFAULT_TIMED_SIZE);
        assert_eq!(cfg.fill, Fill::Random { seed: None });

        let cfg = TimedCli::try_parse_from(["vecadd-timed", "20", "--kernel-file", "k.cl", "--kernel-name", "add"])
            .unwrap()
            .into_config();
        assert_eq!(cfg.size, 20);
        assert_eq!(cfg.kernel.source, KernelSource::File(PathBuf::from("k.cl")));
        assert_eq!(cfg.kernel.name, "add");
        assert_eq!(cfg.kernel.layout, ArgLayout::SizeFirst);
    }

    #[test]
    fn timed_can_switch_to_sequential() {
        let cfg = TimedCli::try_parse_from(["vecadd-timed", "4", "--fill", "sequential", "--seed", "9"])
            .unwrap()
            .into_config();
        assert_eq!(cfg.fill, Fill::Sequential);
    }
}
