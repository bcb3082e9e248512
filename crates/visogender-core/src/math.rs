//! Shared math utilities.

/// Round half to even at `decimals` places, matching NumPy's `round`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (one delta degree of freedom).
///
/// `None` with fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((squares / (values.len() - 1) as f64).sqrt())
}

/// Fraction of `true` values, or `None` when there are none at all.
pub fn true_share<I: IntoIterator<Item = bool>>(flags: I) -> Option<f64> {
    let (hits, total) = flags
        .into_iter()
        .fold((0usize, 0usize), |(hits, total), flag| (hits + flag as usize, total + 1));
    (total > 0).then(|| hits as f64 / total as f64)
}
