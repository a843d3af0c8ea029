//! Per-row statistical reductions over the state history.
//!
//! Each completed generation reduces to two scalars: the normalized Shannon
//! entropy of its active/inactive distribution and the density of adjacent
//! cell transitions.

/// Normalized Shannon entropy of a binary row, in bits.
///
/// `H = -p1*log2(p1) - p0*log2(p0)` with the `0 * log2(0) = 0` convention,
/// so a uniform row scores exactly 0 and an evenly split row exactly 1.
pub fn shannon_entropy(row: &[u8]) -> f64 {
    let width = row.len();
    let ones: usize = row.iter().map(|&c| c as usize).sum();
    if ones == 0 || ones == width {
        return 0.0;
    }
    let p1 = ones as f64 / width as f64;
    let p0 = 1.0 - p1;
    -(p1 * p1.log2() + p0 * p0.log2())
}

/// Fraction of adjacent cell pairs that differ, in `[0, 1]`.
///
/// A row with fewer than two cells has no pairs and scores 0.
pub fn local_complexity(row: &[u8]) -> f64 {
    if row.len() < 2 {
        return 0.0;
    }
    let transitions = row.windows(2).filter(|pair| pair[0] != pair[1]).count();
    transitions as f64 / (row.len() - 1) as f64
}

/// Fraction of active cells in a row.
pub fn density(row: &[u8]) -> f64 {
    if row.is_empty() {
        return 0.0;
    }
    let ones: usize = row.iter().map(|&c| c as usize).sum();
    ones as f64 / row.len() as f64
}

/// Arithmetic mean of a series. An empty series scores 0.
pub fn mean(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().sum::<f64>() / series.len() as f64
}

/// Population standard deviation of a series. An empty series scores 0.
pub fn std_dev(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let m = mean(series);
    let variance = series
        .iter()
        .map(|x| {
            let d = x - m;
            d * d
        })
        .sum::<f64>()
        / series.len() as f64;
    variance.sqrt()
}
