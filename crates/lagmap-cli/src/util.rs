use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use lagmap_analysis::table::ObservationTable;

/// Writes `value` as pretty JSON to `output`, or to stdout when `None`.
pub fn write_json<T>(value: &T, output: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_json_to(BufWriter::new(file), value)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => write_json_to(io::stdout().lock(), value)
            .context("Failed to write JSON to stdout")?,
    }
    Ok(())
}

fn write_json_to<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

/// Reads an observation table and logs its size.
///
/// Ragged tables are rejected while parsing.
pub fn read_table_file<P>(path: P) -> anyhow::Result<ObservationTable>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let table: ObservationTable = read_json_file("observation table", path)?;
    tracing::info!(
        path = %path.display(),
        num_obs = table.num_obs(),
        num_columns = table.num_columns(),
        "loaded observation table"
    );
    Ok(table)
}

/// Reads a square matrix given as a JSON array of rows.
pub fn read_matrix_file<P>(path: P) -> anyhow::Result<(Vec<f64>, usize)>
where
    P: AsRef<Path>,
{
    let rows: Vec<Vec<f64>> = read_json_file("matrix", path)?;
    flatten_square(&rows)
}

/// Flattens rows of a square matrix into row-major order.
pub fn flatten_square(rows: &[Vec<f64>]) -> anyhow::Result<(Vec<f64>, usize)> {
    let dim = rows.len();
    for (i, row) in rows.iter().enumerate() {
        anyhow::ensure!(
            row.len() == dim,
            "row {i} has {} entries, expected {dim}",
            row.len()
        );
    }
    Ok((rows.concat(), dim))
}
