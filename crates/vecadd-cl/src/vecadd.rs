//! Die eigentliche Vektoraddition: Host → Gerät → Kernel → Host.

use crate::{
    buffer::{Access, DeviceVec, EventGuard, Queued},
    device::Session,
    kernel::{ArgLayout, CompiledKernel},
    ClError,
};
use log::debug;
use opencl3::{kernel::ExecuteKernel, types::cl_int};
use std::time::{Duration, Instant};

#[cfg(feature = "metrics")]
use crate::metrics::record;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub values: Vec<cl_int>,
    /// Wanduhrzeit von Kernel-Enqueue bis Event-Abschluss
    pub kernel_time: Duration,
}

/// Referenz auf dem Host, gleiche Überlaufsemantik wie der Kernel
pub fn add_on_host(a: &[cl_int], b: &[cl_int]) -> Result<Vec<cl_int>, ClError> {
    check_lengths(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x.wrapping_add(*y)).collect())
}

fn check_lengths(a: &[cl_int], b: &[cl_int]) -> Result<usize, ClError> {
    if a.len() != b.len() {
        return Err(ClError::LengthMismatch { left: a.len(), right: b.len() });
    }
    Ok(a.len())
}

/// `out[i] = a[i] + b[i]` auf dem Sitzungsgerät.
///
/// Leere Eingaben liefern ein leeres Ergebnis ohne Puffer oder Dispatch.
pub fn add_on_device(
    session: &Session,
    kernel: &CompiledKernel,
    a: &[cl_int],
    b: &[cl_int],
) -> Result<AddOutcome, ClError> {
    let n = check_lengths(a, b)?;
    if n == 0 {
        debug!("empty input, skipping dispatch");
        return Ok(AddOutcome { values: Vec::new(), kernel_time: Duration::ZERO });
    }
    let size = cl_int::try_from(n).map_err(|_| ClError::SizeTooLarge(n))?;

    let ctx = session.context();
    let queue = session.queue();

    // 1) Puffer anlegen & Eingaben schreiben
    let (a_if, guard_a) = DeviceVec::<Queued>::new(ctx, n, Access::ReadOnly)?.enqueue_write(queue, a)?;
    let (b_if, guard_b) = DeviceVec::<Queued>::new(ctx, n, Access::ReadOnly)?.enqueue_write(queue, b)?;
    let a_dev = a_if.into_ready(guard_a)?;
    let b_dev = b_if.into_ready(guard_b)?;
    let out_if = DeviceVec::<Queued>::new(ctx, n, Access::WriteOnly)?.launch();
    debug!("uploaded {} bytes per input", a_dev.size_bytes());

    // 2) Kernel starten und auf das Event warten
    let mut exec = ExecuteKernel::new(kernel.kernel());
    let start = Instant::now();
    // Safety: Argumenttypen entsprechen der Kernel-Signatur des gewählten Layouts
    let evt = unsafe {
        let exec = match kernel.layout() {
            ArgLayout::SizeLast => exec
                .set_arg(a_dev.raw())
                .set_arg(b_dev.raw())
                .set_arg(out_if.raw())
                .set_arg(&size),
            ArgLayout::SizeFirst => exec
                .set_arg(&size)
                .set_arg(a_dev.raw())
                .set_arg(b_dev.raw())
                .set_arg(out_if.raw()),
        };
        exec.set_global_work_size(n).enqueue_nd_range(queue)?
    };
    let out_dev = out_if.into_ready(EventGuard::new(evt))?;
    let kernel_time = start.elapsed();

    #[cfg(feature = "metrics")]
    record("kernel", start);

    debug!("kernel `{}` finished in {kernel_time:?}", kernel.name());

    // 3) Ergebnis zurücklesen
    let mut values = vec![0; n];
    out_dev.read_into(queue, &mut values)?;

    Ok(AddOutcome { values, kernel_time })
}
