use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use pharmsim::pharm::Profile;

use super::tables::{
    fmt_num, print_distribution_table, print_grid_table, print_kv_table, print_list,
};

/// Most curve rows shown in a text table; longer curves are thinned.
const MAX_TABLE_ROWS: usize = 21;

/// One block of a rendered result.
pub enum Section {
    Metrics {
        title: String,
        rows: Vec<(String, String)>,
    },
    Curve(Profile),
    Table {
        title: String,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Distribution {
        title: String,
        rows: Vec<(String, f64)>,
    },
    Notes {
        title: String,
        items: Vec<String>,
    },
}

/// The evaluated result of one command, renderable as text, CSV or JSON.
pub struct Report {
    pub title: String,
    pub sections: Vec<Section>,
    data: Option<Value>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
            data: None,
        }
    }

    pub fn metrics<K, V>(mut self, title: &str, rows: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.sections.push(Section::Metrics {
            title: title.to_string(),
            rows: rows.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        });
        self
    }

    pub fn curve(mut self, profile: Profile) -> Self {
        self.sections.push(Section::Curve(profile));
        self
    }

    pub fn table(mut self, title: &str, headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        self.sections.push(Section::Table {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        });
        self
    }

    pub fn distribution(mut self, title: &str, rows: Vec<(String, f64)>) -> Self {
        self.sections.push(Section::Distribution {
            title: title.to_string(),
            rows,
        });
        self
    }

    pub fn notes<S: ToString>(mut self, title: &str, items: impl IntoIterator<Item = S>) -> Self {
        self.sections.push(Section::Notes {
            title: title.to_string(),
            items: items.into_iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// Attaches the typed result that JSON output serializes.
    pub fn data<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.data = Some(serde_json::to_value(value).context("Failed to serialize result")?);
        Ok(self)
    }

    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.sections.iter().filter_map(|s| match s {
            Section::Curve(p) => Some(p),
            _ => None,
        })
    }

    /// JSON payload: the attached data, or the curves when none was attached.
    pub fn json(&self) -> Value {
        match &self.data {
            Some(v) => v.clone(),
            None => serde_json::json!({
                "title": self.title,
                "profiles": self.profiles().collect::<Vec<_>>(),
            }),
        }
    }

    pub fn write_text(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out)?;
        writeln!(out, "   {}", self.title)?;
        for section in &self.sections {
            writeln!(out)?;
            match section {
                Section::Metrics { title, rows } => print_kv_table(out, title, rows),
                Section::Curve(profile) => write_curve(out, profile),
                Section::Table {
                    title,
                    headers,
                    rows,
                } => print_grid_table(out, title, headers, rows),
                Section::Distribution { title, rows } => print_distribution_table(out, title, rows),
                Section::Notes { title, items } => print_list(out, title, items),
            }
        }
        writeln!(out)?;
        out.flush()
    }
}

fn write_curve(out: &mut impl Write, profile: &Profile) {
    let step = profile.len().div_ceil(MAX_TABLE_ROWS - 1).max(1);
    let shown = profile.thinned(step);
    let headers: Vec<String> = std::iter::once(shown.x_label.clone())
        .chain(shown.series.iter().map(|s| s.label.clone()))
        .collect();
    let rows: Vec<Vec<String>> = (0..shown.len())
        .map(|i| shown.row(i).into_iter().map(fmt_num).collect())
        .collect();
    print_grid_table(out, &shown.title, &headers, &rows);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Report {
        let profile = Profile::new("Decay", "t", (0..50).map(f64::from).collect())
            .with("C", (0..50).map(|i| 100.0 - f64::from(i)).collect());
        Report::new("Test").metrics("Summary", [("Peak", "100")]).curve(profile)
    }

    #[test]
    fn text_output_thins_long_curves() {
        let mut buf = Vec::new();
        sample().write_text(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let data_rows = text.lines().filter(|l| l.contains("│") && l.contains(".000")).count();
        assert!(data_rows <= MAX_TABLE_ROWS, "{data_rows} rows");
        assert!(text.contains("49.000"));
        assert!(text.contains("Peak"));
    }

    #[test]
    fn json_falls_back_to_profiles() {
        let value = sample().json();
        assert_eq!(value["title"], "Test");
        assert_eq!(value["profiles"][0]["series"][0]["label"], "C");
    }

    #[test]
    fn attached_data_wins() {
        let report = sample().data(&serde_json::json!({"k": 1})).unwrap();
        assert_eq!(report.json()["k"], 1);
    }
}
