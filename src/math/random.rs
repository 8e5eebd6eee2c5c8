//! Seeded pseudo-randomness for stable tree shapes
//!
//! Geometry is regenerated every frame, so any "random" choice that shapes a
//! tree must be a pure function of the tree's seed. One-off events (new canopy
//! particles, splash bursts) draw from a regular `rand` source instead.

/// Deterministic value in `[0, 1)` for a given seed.
///
/// Same seed, same value, on every call and every platform with IEEE `sin`.
pub fn seeded_random(seed: f64) -> f64 {
    let s = seed.sin() * 10000.0;
    let v = s - s.floor();
    // floor() of a huge or non-finite value can leave us at 1.0 or NaN
    if v.is_finite() && v < 1.0 {
        v
    } else {
        0.0
    }
}

/// Seeded value mapped into `[-0.5, 0.5)`
pub fn seeded_centered(seed: f64) -> f64 {
    seeded_random(seed) - 0.5
}
