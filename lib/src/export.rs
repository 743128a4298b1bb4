use crate::{ranking::Ranking, Result};
use polars::prelude::*;
use std::path::Path;

/// Writes the `Team`, `<metric>` ranking table as a downloadable CSV sheet.
pub fn write_ranking<P: AsRef<Path>>(ranking: &Ranking, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = std::fs::File::create(path.as_ref())?;
    let mut table = ranking.table.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut table)?;
    log::info!(
        "Exported {} rows of {} to {}",
        table.height(),
        ranking.title(),
        path.as_ref().display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Reduction, TEAM};

    #[test]
    fn writes_team_and_metric_columns() {
        let table = df!(TEAM => &["A", "B"], "Sprint Count" => &[12.0, 9.5]).unwrap();
        let ranking = Ranking {
            metric: "Sprint Count".to_string(),
            reduction: Reduction::Average,
            unit: None,
            entries: Vec::new(),
            table,
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports").join("ranking.csv");
        write_ranking(&ranking, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Team,Sprint Count");
        assert!(lines[1].starts_with("A,12"));
        assert_eq!(lines[2], "B,9.5");
    }
}
