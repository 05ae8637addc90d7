//! Synthetic raw sensor rows.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded RNG for jittered fixtures; the same seed gives the same streams.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// `n` rows `[t, a, b, c]` sampled every `dt_s` seconds from `start_s`,
/// with values from `f(i)`.
pub fn linear_rows(start_s: f64, dt_s: f64, n: usize, f: impl Fn(usize) -> [f64; 3]) -> Vec<[f64; 4]> {
    (0..n)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = start_s + dt_s * i as f64;
            let v = f(i);
            [t, v[0], v[1], v[2]]
        })
        .collect()
}

/// Like [`linear_rows`], but each timestamp is shifted by up to
/// `±jitter_s`, as real sensors deliver. Timestamps stay increasing as long
/// as `jitter_s < dt_s / 2`.
pub fn jittered_stream(
    rng: &mut impl Rng,
    start_s: f64,
    dt_s: f64,
    jitter_s: f64,
    n: usize,
    f: impl Fn(usize) -> [f64; 3],
) -> Vec<[f64; 4]> {
    linear_rows(start_s, dt_s, n, f)
        .into_iter()
        .map(|mut row| {
            row[0] += rng.gen_range(-jitter_s..=jitter_s);
            row
        })
        .collect()
}
