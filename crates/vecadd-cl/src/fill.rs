//! Initialisierung der Eingabevektoren.

use opencl3::types::cl_int;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Zufallswerte liegen in `0..RANDOM_BOUND`
pub const RANDOM_BOUND: cl_int = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// `a[i] = i + 1`, `b[i] = n - i`, jede Summe ist `n + 1`
    Sequential,
    /// gleichverteilt in `0..100`, ohne Seed aus der Entropiequelle
    Random { seed: Option<u64> },
}

impl Fill {
    /// Erzeugt das Eingabepaar `(a, b)` der Länge `n`.
    pub fn generate(self, n: usize) -> (Vec<cl_int>, Vec<cl_int>) {
        match self {
            Fill::Sequential => {
                // Werte laufen wie im Kernel-Typ über, wenn n > i32::MAX
                let a = (0..n).map(|i| (i as cl_int).wrapping_add(1)).collect();
                let b = (0..n).map(|i| (n - i) as cl_int).collect();
                (a, b)
            }
            Fill::Random { seed } => {
                let mut rng = match seed {
                    Some(s) => StdRng::seed_from_u64(s),
                    None => StdRng::from_entropy(),
                };
                let a = random_vec(&mut rng, n);
                let b = random_vec(&mut rng, n);
                (a, b)
            }
        }
    }
}

fn random_vec(rng: &mut impl Rng, n: usize) -> Vec<cl_int> {
    (0..n).map(|_| rng.gen_range(0..RANDOM_BOUND)).collect()
}
