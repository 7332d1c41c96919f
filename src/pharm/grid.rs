//! Numeric grids and reductions shared by the models.

/// `n` evenly spaced samples over `[start, stop]`, endpoints included.
///
/// ```
/// use pharmsim::pharm::grid::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// ```
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// `n` samples spaced evenly in log10 between `10^start_exp` and `10^stop_exp`.
pub fn logspace(start_exp: f64, stop_exp: f64, n: usize) -> Vec<f64> {
    linspace(start_exp, stop_exp, n)
        .into_iter()
        .map(|e| 10f64.powf(e))
        .collect()
}

/// Values `start, start + step, ...` strictly below `stop`.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || stop <= start {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil() as usize;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Area under `y(x)` by the trapezoidal rule.
pub fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    y.windows(2)
        .zip(x.windows(2))
        .map(|(yy, xx)| 0.5 * (yy[0] + yy[1]) * (xx[1] - xx[0]))
        .sum()
}

/// Numerical derivative `dy/dx`: second-order central differences inside,
/// first-order one-sided differences at the ends.
pub fn gradient(y: &[f64], x: &[f64]) -> Vec<f64> {
    let n = y.len().min(x.len());
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..n)
            .map(|i| {
                if i == 0 {
                    (y[1] - y[0]) / (x[1] - x[0])
                } else if i == n - 1 {
                    (y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2])
                } else {
                    let hl = x[i] - x[i - 1];
                    let hr = x[i + 1] - x[i];
                    (hl * hl * y[i + 1] - hr * hr * y[i - 1] + (hr * hr - hl * hl) * y[i])
                        / (hl * hr * (hl + hr))
                }
            })
            .collect(),
    }
}

/// Percentile `q` (0..=100) with linear interpolation between order statistics.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let rank = (q / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

pub fn median(values: &[f64]) -> f64 {
    percentile(values, 50.0)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Largest value, ignoring NaN. `-inf` for an empty slice.
pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Index of the largest value (first on ties).
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if best.is_none_or(|(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

/// Equal-width histogram with each bin holding its fraction of the samples.
///
/// Returns bin edges (`bins + 1` values) and probabilities (`bins` values).
pub fn histogram_probability(values: &[f64], bins: usize) -> (Vec<f64>, Vec<f64>) {
    if values.is_empty() || bins == 0 {
        return (Vec::new(), Vec::new());
    }
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = max(values);
    let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };
    let edges = linspace(lo, hi, bins + 1);
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let k = (((v - lo) / width) as usize).min(bins - 1);
        counts[k] += 1;
    }
    let total = values.len() as f64;
    let probability = counts.iter().map(|&c| c as f64 / total).collect();
    (edges, probability)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_hits_both_ends() {
        let g = linspace(0.0, 24.0, 100);
        assert_eq!(g.len(), 100);
        assert_eq!(g[0], 0.0);
        assert_eq!(g[99], 24.0);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    }

    #[test]
    fn logspace_spans_decades() {
        let g = logspace(-3.0, 1.0, 5);
        assert!((g[0] - 1e-3).abs() < 1e-15);
        assert!((g[4] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn arange_excludes_stop() {
        assert_eq!(arange(0.0, 25.0, 2.0).len(), 13);
        assert_eq!(arange(0.0, 1.0, 0.0), Vec::<f64>::new());
    }

    #[test]
    fn trapezoid_integrates_a_line_exactly() {
        let x = linspace(0.0, 2.0, 11);
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v).collect();
        assert!((trapezoid(&y, &x) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn gradient_of_quadratic_is_exact_inside() {
        let x = linspace(0.0, 1.0, 11);
        let y: Vec<f64> = x.iter().map(|v| v * v).collect();
        let d = gradient(&y, &x);
        for i in 1..10 {
            assert!((d[i] - 2.0 * x[i]).abs() < 1e-9);
        }
        assert!((d[0] - 0.1).abs() < 1e-9);
    }

    #[test]
    fn percentile_interpolates() {
        let v = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(percentile(&v, 0.0), 1.0);
        assert_eq!(percentile(&v, 100.0), 4.0);
        assert!((median(&v) - 2.5).abs() < 1e-12);
        assert!((percentile(&v, 10.0) - 1.3).abs() < 1e-12);
    }

    #[test]
    fn argmax_and_histogram() {
        assert_eq!(argmax(&[1.0, 5.0, 5.0, 2.0]), Some(1));
        assert_eq!(argmax(&[]), None);

        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let (edges, probability) = histogram_probability(&values, 10);
        assert_eq!(edges.len(), 11);
        assert_eq!(probability[0], 0.1);
        let total: f64 = probability.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }
}
