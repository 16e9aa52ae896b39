//! Overlap between an inserted clip and the narration that follows it.

/// Dynamic overlap policy for a clip of `duration` seconds.
///
/// | duration   | overlap             |
/// |------------|---------------------|
/// | `< 10s`    | `0.3 × d`           |
/// | `10..20s`  | `0.5 × d`           |
/// | `>= 20s`   | `min(10, 0.4 × d)`  |
pub fn dynamic_overlap(duration: f64) -> f64 {
    if duration < 10.0 {
        0.3 * duration
    } else if duration < 20.0 {
        0.5 * duration
    } else {
        (0.4 * duration).min(10.0)
    }
}

/// Overlap for a clip, honoring a fixed fraction when one is configured.
///
/// Always within `[0, duration]`.
pub fn overlap_for(duration: f64, fixed_fraction: Option<f64>) -> f64 {
    if duration <= 0.0 {
        return 0.0;
    }
    let overlap = match fixed_fraction {
        Some(fraction) => duration * fraction,
        None => dynamic_overlap(duration),
    };
    overlap.clamp(0.0, duration)
}
