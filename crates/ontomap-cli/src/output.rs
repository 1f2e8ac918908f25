//! CSV output for annotation and unmatched tables.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;

use ontomap_common::frame_to_rows;

/// Write a string frame to `path` as CSV with a header row.
pub fn write_frame_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let (headers, rows) = frame_to_rows(df)
        .with_context(|| format!("extract rows for {}", path.display()))?;

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    writer
        .write_record(&headers)
        .with_context(|| format!("write header to {}", path.display()))?;
    for row in &rows {
        writer
            .write_record(row)
            .with_context(|| format!("write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    #[test]
    fn writes_header_and_rows() {
        let df = DataFrame::new(vec![
            Column::new("A".into(), vec!["1", "2"]),
            Column::new("B".into(), vec!["x", "y"]),
        ])
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_frame_csv(&df, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "A,B\n1,x\n2,y\n");
    }

    #[test]
    fn quotes_cells_containing_the_separator() {
        let df = DataFrame::new(vec![Column::new(
            "LABEL".into(),
            vec!["fever, recurrent"],
        )])
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_frame_csv(&df, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "LABEL\n\"fever, recurrent\"\n");
    }

    #[test]
    fn empty_frame_still_gets_a_header() {
        let df = DataFrame::new(vec![Column::new("A".into(), Vec::<String>::new())]).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_frame_csv(&df, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "A\n");
    }
}
