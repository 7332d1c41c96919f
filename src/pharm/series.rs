//! Evaluated curves: the data behind every chart.

use serde::Serialize;

/// One named curve sampled on its profile's x grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub y: Vec<f64>,
}

/// A set of curves sharing one x grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub title: String,
    pub x_label: String,
    pub x: Vec<f64>,
    pub series: Vec<Series>,
}

impl Profile {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, x: Vec<f64>) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            x,
            series: Vec::new(),
        }
    }

    /// Adds a curve, builder style.
    pub fn with(mut self, label: impl Into<String>, y: Vec<f64>) -> Self {
        self.push(label, y);
        self
    }

    pub fn push(&mut self, label: impl Into<String>, y: Vec<f64>) {
        self.series.push(Series {
            label: label.into(),
            y,
        });
    }

    /// Looks up a curve by label.
    pub fn get(&self, label: &str) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.y.as_slice())
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Label and length of the first curve whose length differs from the grid.
    pub fn ragged(&self) -> Option<(&str, usize)> {
        self.series
            .iter()
            .find(|s| s.y.len() != self.x.len())
            .map(|s| (s.label.as_str(), s.y.len()))
    }

    /// Row `i` as `[x, y1, y2, ...]`; missing values are NaN.
    pub fn row(&self, i: usize) -> Vec<f64> {
        std::iter::once(self.x.get(i).copied().unwrap_or(f64::NAN))
            .chain(
                self.series
                    .iter()
                    .map(|s| s.y.get(i).copied().unwrap_or(f64::NAN)),
            )
            .collect()
    }

    /// Keeps every `step`-th row (and always the last), for compact tables.
    pub fn thinned(&self, step: usize) -> Self {
        let step = step.max(1);
        let n = self.x.len();
        let keep: Vec<usize> = (0..n)
            .filter(|&i| i % step == 0 || i + 1 == n)
            .collect();
        let pick = |v: &[f64]| keep.iter().filter_map(|&i| v.get(i).copied()).collect();
        Self {
            title: self.title.clone(),
            x_label: self.x_label.clone(),
            x: pick(&self.x),
            series: self
                .series
                .iter()
                .map(|s| Series {
                    label: s.label.clone(),
                    y: pick(&s.y),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Profile {
        Profile::new("demo", "t", vec![0.0, 1.0, 2.0, 3.0, 4.0])
            .with("a", vec![0.0, 1.0, 4.0, 9.0, 16.0])
            .with("b", vec![1.0; 5])
    }

    #[test]
    fn lookup_and_rows() {
        let p = sample();
        assert_eq!(p.get("a").map(|a| a[2]), Some(4.0));
        assert!(p.get("c").is_none());
        assert_eq!(p.row(3), vec![3.0, 9.0, 1.0]);
        assert!(p.ragged().is_none());
    }

    #[test]
    fn thinning_keeps_the_last_row() {
        let t = sample().thinned(3);
        assert_eq!(t.x, vec![0.0, 3.0, 4.0]);
        assert_eq!(t.get("a"), Some(&[0.0, 9.0, 16.0][..]));
    }

    #[test]
    fn ragged_series_are_reported() {
        let p = Profile::new("bad", "x", vec![0.0, 1.0]).with("short", vec![1.0]);
        assert_eq!(p.ragged(), Some(("short", 1)));
    }
}
