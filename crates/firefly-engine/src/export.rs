//! Fire-record CSV export.
//!
//! Writes the sorted per-fly accounting rows under a `Time,N,Row,Col`
//! header: last fire time on the master clock, fly id, and grid
//! position.

use std::path::Path;

use firefly_types::FireRecord;
use tracing::info;

/// Write the records to `path` as CSV, overwriting any existing file.
///
/// The caller is expected to pass records already sorted; this function
/// writes them in the order given.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be written.
pub fn write_fire_records(path: &Path, records: &[FireRecord]) -> std::io::Result<()> {
    let mut out = String::from("Time,N,Row,Col\n");
    for record in records {
        out.push_str(&format!(
            "{},{},{},{}\n",
            record.fire_time, record.fly, record.row, record.col
        ));
    }
    std::fs::write(path, out)?;
    info!(path = %path.display(), records = records.len(), "fire records exported");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use firefly_types::FlyId;

    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let path = std::env::temp_dir().join(format!(
            "firefly-export-test-{}.csv",
            std::process::id()
        ));
        let records = vec![
            FireRecord::new(120, FlyId::new(1), 8, 2),
            FireRecord::new(400, FlyId::new(0), 5, 9),
        ];

        write_fire_records(&path, &records).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(written, "Time,N,Row,Col\n120,1,8,2\n400,0,5,9\n");
    }

    #[test]
    fn empty_records_still_write_the_header() {
        let path = std::env::temp_dir().join(format!(
            "firefly-export-empty-{}.csv",
            std::process::id()
        ));

        write_fire_records(&path, &[]).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(written, "Time,N,Row,Col\n");
    }
}
