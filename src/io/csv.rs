use crate::io::error::Error;
use crate::pharm::Profile;
use std::io::Write;

/// Writes a profile as CSV: one x column followed by one column per curve.
///
/// Labels containing commas or quotes are quoted.
pub fn write<W: Write>(mut writer: W, profile: &Profile) -> Result<(), Error> {
    if let Some((_, found)) = profile.ragged() {
        return Err(Error::RaggedProfile {
            title: profile.title.clone(),
            expected: profile.len(),
            found,
        });
    }

    let header: Vec<String> = std::iter::once(profile.x_label.as_str())
        .chain(profile.series.iter().map(|s| s.label.as_str()))
        .map(quote)
        .collect();
    writeln!(writer, "{}", header.join(","))?;

    for i in 0..profile.len() {
        let row: Vec<String> = profile.row(i).iter().map(|v| v.to_string()).collect();
        writeln!(writer, "{}", row.join(","))?;
    }
    Ok(())
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let p = Profile::new("t", "Time (h)", vec![0.0, 0.5])
            .with("Conc, mg/L", vec![10.0, 7.5])
            .with("Free", vec![1.0, 2.0]);
        let mut buf = Vec::new();
        write(&mut buf, &p).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "Time (h),\"Conc, mg/L\",Free\n0,10,1\n0.5,7.5,2\n");
    }

    #[test]
    fn ragged_profiles_are_refused() {
        let p = Profile::new("t", "x", vec![0.0, 1.0]).with("y", vec![0.0]);
        let err = write(Vec::new(), &p).unwrap_err();
        assert!(matches!(err, Error::RaggedProfile { expected: 2, found: 1, .. }));
    }
}
