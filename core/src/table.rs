//! In-memory columnar table, the unit of exchange between the upload,
//! the feature transform, and the scorer.
//!
//! RULE: Tables are values. Shape-changing operations (row selection,
//! column removal) return a new table; nothing edits a table that has
//! already been handed to another component.

use crate::{
    error::{PipelineError, PipelineResult},
    types::RowIndex,
};
use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }

    /// Render one cell the way it is written to CSV.
    /// Missing floats (NaN) render as an empty cell.
    pub fn cell_text(&self, row: RowIndex) -> String {
        match self {
            Self::Int(v) => v[row].to_string(),
            Self::Float(v) if v[row].is_nan() => String::new(),
            Self::Float(v) => format!("{:?}", v[row]),
            Self::Text(v) => v[row].clone(),
        }
    }

    fn select(&self, rows: &[RowIndex]) -> Column {
        match self {
            Self::Int(v) => Self::Int(rows.iter().map(|&r| v[r]).collect()),
            Self::Float(v) => Self::Float(rows.iter().map(|&r| v[r]).collect()),
            Self::Text(v) => Self::Text(rows.iter().map(|&r| v[r].clone()).collect()),
        }
    }

    /// Pick the narrowest type every cell fits.
    ///   Int:   every cell is an integer, none empty
    ///   Float: every non-empty cell is numeric; empty cells become NaN
    ///   Text:  anything else
    fn infer(cells: Vec<String>) -> Column {
        if cells.iter().all(|c| c.trim().parse::<i64>().is_ok()) {
            return Self::Int(cells.iter().map(|c| c.trim().parse().unwrap_or_default()).collect());
        }
        let numeric = cells.iter().all(|c| {
            let t = c.trim();
            t.is_empty() || t.parse::<f64>().is_ok()
        });
        if numeric {
            return Self::Float(
                cells
                    .iter()
                    .map(|c| c.trim().parse().unwrap_or(f64::NAN))
                    .collect(),
            );
        }
        Self::Text(cells)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from (name, column) pairs in order.
    pub fn from_columns<N: Into<String>>(
        columns: impl IntoIterator<Item = (N, Column)>,
    ) -> PipelineResult<Self> {
        let mut table = Self::new();
        for (name, column) in columns {
            table.push_column(name, column)?;
        }
        Ok(table)
    }

    /// Number of rows. A table with no columns has no rows.
    pub fn len(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    /// Like `column`, but a missing column is a schema error.
    pub fn require(&self, name: &str) -> PipelineResult<&Column> {
        self.column(name).ok_or_else(|| PipelineError::Schema {
            column: name.to_string(),
        })
    }

    /// Append a column. Names must be unique and lengths must agree.
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) -> PipelineResult<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(PipelineError::DuplicateColumn { column: name });
        }
        if !self.columns.is_empty() && column.len() != self.len() {
            return Err(PipelineError::LengthMismatch {
                column: name,
                expected: self.len(),
                actual: column.len(),
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Numeric view of a column. Integers widen to f64; text cells must
    /// parse as numbers, with empty cells read as missing (NaN).
    pub fn f64_values(&self, name: &str) -> PipelineResult<Vec<f64>> {
        match self.require(name)? {
            Column::Int(v) => Ok(v.iter().map(|&x| x as f64).collect()),
            Column::Float(v) => Ok(v.clone()),
            Column::Text(v) => v
                .iter()
                .enumerate()
                .map(|(row, cell)| {
                    let t = cell.trim();
                    if t.is_empty() {
                        return Ok(f64::NAN);
                    }
                    t.parse::<f64>()
                        .map_err(|_| PipelineError::parse(row, name, cell.as_str()))
                })
                .collect(),
        }
    }

    /// Every cell of a column rendered as text.
    pub fn text_values(&self, name: &str) -> PipelineResult<Vec<String>> {
        let column = self.require(name)?;
        Ok((0..column.len()).map(|row| column.cell_text(row)).collect())
    }

    /// New table holding only `rows`, in the given order.
    pub fn select_rows(&self, rows: &[RowIndex]) -> Table {
        Table {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.select(rows)).collect(),
        }
    }

    /// New table without the named columns. Unknown names are ignored.
    pub fn without_columns(&self, drop: &[&str]) -> Table {
        let (names, columns): (Vec<String>, Vec<Column>) = self
            .names
            .iter()
            .zip(self.columns.iter())
            .filter(|(name, _)| !drop.contains(&name.as_str()))
            .map(|(name, column)| (name.clone(), column.clone()))
            .unzip();
        Table { names, columns }
    }

    // ── CSV ────────────────────────────────────────────────────

    /// Read a delimited upload. The first record is the header row.
    pub fn read_csv<R: Read>(reader: R) -> PipelineResult<Table> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in rdr.records() {
            let record = record?;
            for (i, cell) in record.iter().enumerate() {
                cells[i].push(cell.to_string());
            }
        }

        let mut table = Table::new();
        for (name, column_cells) in headers.into_iter().zip(cells) {
            table.push_column(name, Column::infer(column_cells))?;
        }
        log::debug!("Read table: {} rows x {} columns", table.len(), table.width());
        Ok(table)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> PipelineResult<Table> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        Self::read_csv(file)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> PipelineResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.names)?;
        for row in 0..self.len() {
            wtr.write_record(self.columns.iter().map(|c| c.cell_text(row)))?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_path(&self, path: impl AsRef<Path>) -> PipelineResult<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| anyhow::anyhow!("Cannot write {}: {e}", path.display()))?;
        self.write_csv(file)
    }

    /// The CSV rendering as bytes. Used for determinism checks and downloads.
    pub fn to_csv_bytes(&self) -> PipelineResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(buf)
    }
}
