/// Arithmetic mean, `None` for an empty slice.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let avg = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = value - avg;
            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    Some(variance.sqrt())
}

/// Standard deviation over mean. A zero mean divides by 1 instead.
pub fn coefficient_of_variation(data: &[f64]) -> Option<f64> {
    let avg = mean(data)?;
    let sd = std_dev(data)?;
    Some(sd / nonzero_or_one(avg))
}

/// Guarded divisor: zero becomes 1 so ratios over degenerate extents stay finite.
pub fn nonzero_or_one(v: f64) -> f64 {
    if v == 0.0 {
        1.0
    } else {
        v
    }
}
