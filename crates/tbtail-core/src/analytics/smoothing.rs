//! Causal moving-average smoothing

/// Trailing mean over the last `min(window, i + 1)` samples ending at `i`
///
/// `window <= 1` returns the input unchanged. Runs in O(n) using prefix sums.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 || values.is_empty() {
        return values.to_vec();
    }

    let mut prefix = Vec::with_capacity(values.len() + 1);
    prefix.push(0.0);
    let mut total = 0.0;
    for value in values {
        total += value;
        prefix.push(total);
    }

    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let count = (i - start + 1) as f64;
            (prefix[i + 1] - prefix[start]) / count
        })
        .collect()
}
