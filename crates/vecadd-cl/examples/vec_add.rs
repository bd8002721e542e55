// 2025 Thomas Bicanic – MIT License
//
// Vektoraddition über die Bibliotheks-API statt über die Binaries

use vecadd_cl::{add_on_device, add_on_host, kernel, ClError, DevicePreference, Fill, KernelSpec, Session};

fn main() -> Result<(), ClError> {
    env_logger::init();

    // 1) Gerät & Kontext (GPU, sonst CPU)
    let session = Session::open(DevicePreference::Auto)?;
    println!("device: {} ({})", session.device().name, session.kind());

    // 2) Kernel bauen
    let kernel = kernel::build(&session, &KernelSpec::embedded())?;

    // 3) Hostdaten
    let n = 1 << 22;
    let (a, b) = Fill::Random { seed: Some(42) }.generate(n);

    // 4) Host → Gerät → Kernel → Host
    let outcome = add_on_device(&session, &kernel, &a, &b)?;

    // 5) Verifikation
    assert_eq!(outcome.values, add_on_host(&a, &b)?);
    println!(
        "vec_add OK, {} elements in {:.3} ms, first element = {}",
        n,
        outcome.kernel_time.as_secs_f64() * 1e3,
        outcome.values[0]
    );

    Ok(())
}
