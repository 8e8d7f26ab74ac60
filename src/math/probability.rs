/// Shannon entropy `-Σ p·ln(p)` of a set of probabilities
///
/// The probabilities are taken as given; they are not renormalised, so a
/// cell's entropy reflects the raw source frequencies of its options.
/// Non-positive entries contribute nothing.
pub fn shannon_entropy<I>(probabilities: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let sum: f64 = probabilities
        .into_iter()
        .filter(|&p| p > 0.0)
        .map(|p| p * p.ln())
        .sum();
    -sum
}

/// Pick an index into `weights` from a uniform sample `unit` in `[0, 1)`
///
/// Walks the cumulative distribution. Returns `None` when the weights are
/// empty or sum to zero, letting callers choose their own fallback.
pub fn cumulative_choice(weights: &[f64], unit: f64) -> Option<usize> {
    let total: f64 = weights.iter().sum();
    if weights.is_empty() || total <= 0.0 {
        return None;
    }

    let mut remaining = unit * total;
    for (i, &weight) in weights.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        remaining -= weight;
        if remaining < 0.0 {
            return Some(i);
        }
    }

    // Rounding can leave a sliver past the last positive weight
    weights.iter().rposition(|&weight| weight > 0.0)
}
