use std::io::Write;

use pharmsim::chem::{
    LipinskiReport, MAX_H_BOND_ACCEPTORS, MAX_H_BOND_DONORS, MAX_LOGP, MAX_MOLECULAR_WEIGHT,
    RULES_REQUIRED, Rule,
};

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

/// Compact numeric formatting: fixed for ordinary magnitudes, scientific
/// for very large or very small values.
pub fn fmt_num(v: f64) -> String {
    if v.is_nan() {
        return "-".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "∞".to_string() } else { "-∞".to_string() };
    }
    let a = v.abs();
    if a != 0.0 && !(1e-3..1e5).contains(&a) {
        format!("{:.3e}", v)
    } else {
        format!("{:.3}", v)
    }
}

fn print_title(out: &mut impl Write, title: &str) {
    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
}

fn rule(widths: &[usize], left: &str, mid: &str, right: &str) -> String {
    let cells: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}{}", INDENT, left, cells.join(mid), right)
}

pub fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(String, String)]) {
    let key_w = rows
        .iter()
        .map(|(k, _)| k.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(16, 28);
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    print_title(out, title);
    let _ = writeln!(out, "{}", rule(&[key_w, val_w], "┌", "┬", "┐"));
    let _ = writeln!(
        out,
        "{}│ {:<key_w$} │ {:>val_w$} │",
        INDENT,
        "Metric",
        "Value",
        key_w = key_w,
        val_w = val_w
    );
    let _ = writeln!(out, "{}", rule(&[key_w, val_w], "├", "┼", "┤"));

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
            key_w = key_w,
            val_w = val_w
        );
    }

    let _ = writeln!(out, "{}", rule(&[key_w, val_w], "└", "┴", "┘"));
}

/// Table with one header row; column widths follow the widest cell.
pub fn print_grid_table(out: &mut impl Write, title: &str, headers: &[String], rows: &[Vec<String>]) {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
                .min(24)
        })
        .collect();

    let line = |cells: &[String]| {
        let body: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                if i == 0 {
                    format!(" {:<w$} ", truncate(cell, *w), w = w)
                } else {
                    format!(" {:>w$} ", truncate(cell, *w), w = w)
                }
            })
            .collect();
        format!("{}│{}│", INDENT, body.join("│"))
    };

    print_title(out, title);
    let _ = writeln!(out, "{}", rule(&widths, "┌", "┬", "┐"));
    let _ = writeln!(out, "{}", line(headers));
    let _ = writeln!(out, "{}", rule(&widths, "├", "┼", "┤"));
    for row in rows {
        let _ = writeln!(out, "{}", line(row));
    }
    let _ = writeln!(out, "{}", rule(&widths, "└", "┴", "┘"));
}

/// Named percentages with a bar for each.
pub fn print_distribution_table(out: &mut impl Write, title: &str, data: &[(String, f64)]) {
    let name_w = data
        .iter()
        .map(|(n, _)| n.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(10, 24);
    let sep_overhead = 3;
    let dist_w = SAFE_TABLE_WIDTH.saturating_sub(name_w + sep_overhead).max(16);
    let max_bar_width = dist_w.saturating_sub(9).min(24);

    print_title(out, title);
    let _ = writeln!(out, "{}", rule(&[name_w, dist_w], "┌", "┬", "┐"));

    for (name, pct) in data {
        let bar = make_bar(*pct, max_bar_width);
        let dist_cell = format!("{}  {:>5.1}%", bar, pct);
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:<dist_w$} │",
            INDENT,
            truncate(name, name_w),
            dist_cell,
            name_w = name_w,
            dist_w = dist_w
        );
    }

    let _ = writeln!(out, "{}", rule(&[name_w, dist_w], "└", "┴", "┘"));
}

pub fn print_list(out: &mut impl Write, title: &str, items: &[String]) {
    print_title(out, title);
    for item in items {
        let _ = writeln!(out, "{}  • {}", INDENT, item);
    }
}

pub fn print_lipinski_table(out: &mut impl Write, report: &LipinskiReport) {
    let rows: Vec<Vec<String>> = report
        .checks
        .iter()
        .map(|check| {
            let (value, limit) = match check.rule {
                Rule::MolecularWeight => (format!("{:.2}", check.value), format!("≤ {}", MAX_MOLECULAR_WEIGHT)),
                Rule::LogP => (format!("{:.2}", check.value), format!("≤ {}", MAX_LOGP)),
                Rule::HBondDonors => (format!("{}", check.value), format!("≤ {}", MAX_H_BOND_DONORS)),
                Rule::HBondAcceptors => (format!("{}", check.value), format!("≤ {}", MAX_H_BOND_ACCEPTORS)),
            };
            let status = if check.passed { "✓ pass" } else { "✗ fail" };
            vec![check.rule.to_string(), value, limit, status.to_string()]
        })
        .collect();
    let headers = ["Rule", "Value", "Limit", "Status"].map(String::from);
    print_grid_table(out, "Lipinski's Rule of 5", &headers, &rows);

    let verdict = if report.compliant {
        format!(
            "Drug-like: {} of 4 rules passed (at least {} required)",
            4 - report.violations(),
            RULES_REQUIRED
        )
    } else {
        format!("Not drug-like ({} violations)", report.violations())
    };
    let _ = writeln!(out, "{}  {}", INDENT, verdict);
}

fn make_bar(pct: f64, max_width: usize) -> String {
    let filled = ((pct.clamp(0.0, 100.0) / 100.0) * max_width as f64).round() as usize;
    let empty = max_width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_num_switches_to_scientific() {
        assert_eq!(fmt_num(12.5), "12.500");
        assert_eq!(fmt_num(0.0), "0.000");
        assert_eq!(fmt_num(2.5e-7), "2.500e-7");
        assert_eq!(fmt_num(f64::NAN), "-");
    }

    #[test]
    fn make_bar_clamps_percentages() {
        assert_eq!(make_bar(50.0, 4), "██░░");
        assert_eq!(make_bar(150.0, 2), "██");
        assert_eq!(make_bar(-5.0, 2), "░░");
    }

    #[test]
    fn grid_table_pads_columns() {
        let mut buf = Vec::new();
        let headers = ["t", "C"].map(String::from);
        let rows = vec![vec!["0".to_string(), "10.000".to_string()]];
        print_grid_table(&mut buf, "Curve", &headers, &rows);
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("┌─ Curve ─┐"));
        assert!(text.contains("│ 0 │ 10.000 │"));
    }
}
