//! Draw helpers over a single pseudo-random stream.
//!
//! Every pipeline stage pulls from the same stream, so the number and order of
//! draws is part of the output contract: reordering calls here changes maps.

use rand_chacha::rand_core::Rng;

/// Uniform `f64` in `[0, 1)` built from the top 53 bits of one `u64` draw.
pub(crate) fn unit_f64<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1_u64 << 53) as f64)
}

/// Uniform `f64` in `[min, max)`.
pub(crate) fn range_f64<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + unit_f64(rng) * (max - min)
}

/// Uniform `usize` in `[min, max)`. `max` must exceed `min`.
pub(crate) fn range_usize<R: Rng + ?Sized>(rng: &mut R, min: usize, max: usize) -> usize {
    debug_assert!(min < max);
    let span = (max - min) as u64;
    min + (rng.next_u64() % span) as usize
}

/// Uniform `i32` in `[min, max)`. `max` must exceed `min`.
pub(crate) fn range_i32<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    debug_assert!(min < max);
    let span = (i64::from(max) - i64::from(min)) as u64;
    (i64::from(min) + (rng.next_u64() % span) as i64) as i32
}

/// Fisher-Yates shuffle into a new vector; `items` is left untouched.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(rng: &mut R, items: &[T]) -> Vec<T> {
    let mut out = items.to_vec();
    for i in 0..out.len() {
        let j = range_usize(rng, i, out.len());
        out.swap(i, j);
    }
    out
}
