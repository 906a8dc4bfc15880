// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Shuffles samples and splits them into two sets:
//   - Training set:   fed to the fine-tuning run
//   - Validation set: held out to measure generalisation
//
// The shuffle is seeded so the same dataset and seed always
// produce the same split. A fraction of 1.0 keeps everything
// for training and skips the shuffle entirely, preserving the
// source order.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with `seed` and split into (train, validation).
///
/// `train_fraction` is clamped to `[0.0, 1.0]`; NaN keeps everything
/// for training.
pub fn split_train_val<T>(mut samples: Vec<T>, train_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let total = samples.len();
    let fraction = if train_fraction.is_nan() {
        1.0
    } else {
        train_fraction.clamp(0.0, 1.0)
    };

    if fraction >= 1.0 {
        return (samples, Vec::new());
    }

    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let split_at = ((total as f64) * fraction).round() as usize;
    let val = samples.split_off(split_at.min(total));

    tracing::debug!(
        "Dataset split: {} training, {} validation (seed {})",
        samples.len(),
        val.len(),
        seed
    );

    (samples, val)
}
