use hdrhistogram::Histogram;

/// Percentiles of an ascending-sorted slice, one per quantile, in input order.
///
/// Uses the `q × (n + 1)` rank with linear interpolation between the two
/// neighbouring samples. Ranks below the first sample clamp to the minimum,
/// ranks past the last clamp to the maximum. An empty slice yields zeros.
pub fn sorted_percentiles(sorted: &[i64], quantiles: &[f64]) -> Vec<f64> {
    let n = sorted.len();
    if n == 0 {
        return vec![0.0; quantiles.len()];
    }

    quantiles
        .iter()
        .map(|&q| {
            let pos = q * (n as f64 + 1.0);
            if pos < 1.0 {
                sorted[0] as f64
            } else if pos >= n as f64 {
                sorted[n - 1] as f64
            } else {
                let lower = sorted[pos as usize - 1] as f64;
                let upper = sorted[pos as usize] as f64;
                lower + (pos - pos.floor()) * (upper - lower)
            }
        })
        .collect()
}

/// Percentiles read straight off an HdrHistogram.
/// Precision is bounded by the histogram's significant figures.
pub fn hdr_percentiles(hist: &Histogram<u64>, quantiles: &[f64]) -> Vec<f64> {
    if hist.len() == 0 {
        return vec![0.0; quantiles.len()];
    }

    quantiles
        .iter()
        .map(|&q| hist.value_at_quantile(q) as f64)
        .collect()
}
