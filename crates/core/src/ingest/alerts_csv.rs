use crate::domain::RawAlertRecord;
use anyhow::Context;
use std::io::Read;
use std::path::Path;

/// Reads raw alert rows; the header row names the columns and blank lines are skipped.
pub fn read_alerts<R: Read>(reader: R) -> anyhow::Result<Vec<RawAlertRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    for (idx, row) in rdr.deserialize::<RawAlertRecord>().enumerate() {
        // +2: one for the header, one for 1-based line numbers.
        let row = row.with_context(|| format!("alerts row {} is malformed", idx + 2))?;
        out.push(row);
    }
    Ok(out)
}

pub fn read_alerts_file(path: &Path) -> anyhow::Result<Vec<RawAlertRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open alerts file {}", path.display()))?;
    read_alerts(file)
}
