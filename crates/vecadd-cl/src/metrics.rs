#![cfg(feature = "metrics")]

use once_cell::sync::Lazy;
use std::{
    collections::BTreeMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Instant,
};

/* ───────────── Roh‑Latenzen ─────────────────────────── */

static TIMES: Lazy<Mutex<Vec<(&'static str, u128)>>> =
    Lazy::new(|| Mutex::new(Vec::new()));

/// Im Wrapper aufrufen: `record("enqueue_write", t0);`
pub fn record(name: &'static str, start: Instant) {
    let dur = start.elapsed().as_micros();
    // vergiftetes Lock: Messwert verwerfen statt abbrechen
    if let Ok(mut times) = TIMES.lock() {
        times.push((name, dur));
    }
}

/* ───────────── Puffer‑Allokationen ───────────────────── */

pub static ALLOCS:      AtomicUsize = AtomicUsize::new(0);
pub static ALLOC_BYTES: AtomicUsize = AtomicUsize::new(0);

/* ───────────── Auswertung ───────────────────────────── */

/// (Name, Mittelwert µs, p95 µs) je Phase, sortiert nach Name
pub(crate) fn drain_stats() -> Vec<(&'static str, u128, u128)> {
    let mut map: BTreeMap<&'static str, Vec<u128>> = BTreeMap::new();
    if let Ok(mut times) = TIMES.lock() {
        for (name, us) in times.drain(..) {
            map.entry(name).or_default().push(us);
        }
    }

    map.into_iter()
        .map(|(name, mut v)| {
            v.sort_unstable();
            let mean = v.iter().sum::<u128>() / v.len() as u128;
            let p95  = v[((v.len() * 95) / 100).saturating_sub(1)];
            (name, mean, p95)
        })
        .collect()
}

/// Am Programmende aufrufen, schreibt nach stderr
pub fn summary() {
    eprintln!("── metrics summary ──");
    for (name, mean, p95) in drain_stats() {
        eprintln!("{:<18} mean={:>8} µs   p95={:>8} µs", name, mean, p95);
    }

    let allocs = ALLOCS.load(Ordering::Relaxed);
    let bytes  = ALLOC_BYTES.load(Ordering::Relaxed);
    eprintln!("device allocations: {}   ({} MiB)", allocs, bytes / 1024 / 1024);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_group_by_phase() {
        let t = Instant::now();
        record("phase_a", t);
        record("phase_a", t);
        record("phase_b", t);

        let stats = drain_stats();
        let names: Vec<_> = stats.iter().map(|s| s.0).filter(|n| n.starts_with("phase_")).collect();
        assert_eq!(names, ["phase_a", "phase_b"]);
        assert!(drain_stats().iter().all(|s| !s.0.starts_with("phase_")));
    }
}
