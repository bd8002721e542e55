//! Kompletter Durchlauf: Eingaben → Gerät → Kernel → Ausgabe.

use crate::{
    config::{RunConfig, MAX_VECTOR_SIZE},
    device::Session,
    kernel,
    report::{self, PrintMode},
    vecadd::{add_on_device, add_on_host, AddOutcome},
    ClError,
};
use log::debug;
use std::io::Write;

#[cfg(feature = "metrics")]
use crate::metrics::{record, summary};
#[cfg(feature = "metrics")]
use std::time::Instant;

pub fn run(cfg: &RunConfig, out: &mut impl Write) -> Result<AddOutcome, ClError> {
    debug!("run: {cfg:?}");
    // vor jeder Allokation und Gerätearbeit
    if cfg.size > MAX_VECTOR_SIZE {
        return Err(ClError::SizeTooLarge(cfg.size));
    }
    let src = cfg.kernel.source.load()?;

    let (a, b) = cfg.fill.generate(cfg.size);

    if cfg.show_inputs {
        report::write_section(out, &a, cfg.print)?;
        report::write_section(out, &b, cfg.print)?;
    }

    #[cfg(feature = "metrics")]
    let t = Instant::now();

    let session = Session::open(cfg.device)?;
    let kernel = kernel::build_source(&session, &src, &cfg.kernel.name, cfg.kernel.layout)?;

    #[cfg(feature = "metrics")]
    record("setup", t);

    let outcome = add_on_device(&session, &kernel, &a, &b)?;

    debug_assert_eq!(outcome.values, add_on_host(&a, &b)?, "device result differs from host");

    if cfg.show_inputs {
        report::write_section(out, &outcome.values, cfg.print)?;
    } else if cfg.print != PrintMode::Off {
        writeln!(out, "{}", report::RESULT_HEADER)?;
        report::write_vector(out, &outcome.values, cfg.print)?;
    }
    if cfg.timing {
        report::write_kernel_time(out, outcome.kernel_time)?;
    }
    out.flush()?;

    #[cfg(feature = "metrics")]
    summary();

    Ok(outcome)
}
