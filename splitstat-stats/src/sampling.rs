//! Balanced Sampling
//!
//! Sample-size selection and seeded sampling without replacement.
//!
//! The sampler is a partial Fisher-Yates shuffle driven by ChaCha8 seeded with
//! `seed_from_u64(seed)` and switched to a caller-chosen `stream`: for
//! `i in 0..n`, swap position `i` with a uniformly chosen position in
//! `i..len`, then take the first `n` items. Given the same input order, `n`,
//! seed and stream, the selection is identical on every platform. Distinct
//! streams under one seed are independent.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use splitstat_data::GroupSummary;
use tracing::{info, warn};

/// Seed used when the caller does not pick one
pub const DEFAULT_SEED: u64 = 42;

/// Outcome of the sample-size selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSize {
    /// Size asked for, if any
    pub requested: Option<usize>,
    /// Largest balanced size available (the smaller group)
    pub available: usize,
    /// Size actually drawn from each group
    pub used: usize,
    /// Whether `requested` exceeded `available`
    pub clamped: bool,
}

/// Choose the per-group sample size
///
/// Unspecified means all balanced data; anything above the smaller group is
/// clamped to it with a warning.
pub fn resolve_sample_size(requested: Option<usize>, groups: &GroupSummary) -> SampleSize {
    let available = groups.min;
    match requested {
        None => {
            info!(available, "no sample size provided, using maximum available");
            SampleSize {
                requested,
                available,
                used: available,
                clamped: false,
            }
        }
        Some(n) if n > available => {
            warn!(
                requested = n,
                available, "sample size too high, using maximum available"
            );
            SampleSize {
                requested,
                available,
                used: available,
                clamped: true,
            }
        }
        Some(n) => SampleSize {
            requested,
            available,
            used: n,
            clamped: false,
        },
    }
}

/// Indices of `n` distinct positions in `0..len`, in draw order
pub fn sample_indices(len: usize, n: usize, seed: u64, stream: u64) -> Vec<usize> {
    let n = n.min(len);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    let mut indices: Vec<usize> = (0..len).collect();
    for i in 0..n {
        let j = rng.gen_range(i..len);
        indices.swap(i, j);
    }
    indices.truncate(n);
    indices
}

/// Draw `n` items without replacement
pub fn sample_without_replacement<T: Copy>(
    items: &[T],
    n: usize,
    seed: u64,
    stream: u64,
) -> Vec<T> {
    sample_indices(items.len(), n, seed, stream)
        .into_iter()
        .map(|i| items[i])
        .collect()
}
