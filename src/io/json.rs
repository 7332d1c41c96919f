use crate::io::error::Error;
use serde::Serialize;
use std::io::Write;

/// Writes any serializable result as pretty-printed JSON with a trailing newline.
pub fn write<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pharm::Profile;

    #[test]
    fn profile_serializes_with_series() {
        let p = Profile::new("bolus", "t", vec![0.0, 1.0]).with("C", vec![10.0, 5.0]);
        let mut buf = Vec::new();
        write(&mut buf, &p).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["title"], "bolus");
        assert_eq!(value["series"][0]["label"], "C");
        assert_eq!(value["series"][0]["y"][1], 5.0);
    }
}
