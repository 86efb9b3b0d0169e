//! Tabular data source with raw and numeric views.
//!
//! A [`Table`] holds every column as raw strings and mirrors the
//! numeric-kind columns (`numeric`, `int`, `float`) into an aligned
//! numeric view. Row order is shared between the two views, and the
//! numeric header set is always a subset of the raw header set.
//!
//! The on-disk convention is a comma-delimited text file whose first
//! row names the columns and whose second row declares their kinds.

use crate::error::{AnalizarError, Result};
use crate::primitives::{Matrix, Vector};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Declared kind of a table column, fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// General numeric column.
    Numeric,
    /// Integer-valued numeric column.
    Int,
    /// Float-valued numeric column.
    Float,
    /// Non-numeric column (dates, labels, free text).
    Other,
}

impl ColumnKind {
    /// Parses a kind from its on-disk spelling. Anything that is not
    /// `numeric`, `int`, or `float` is treated as [`ColumnKind::Other`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "numeric" => Self::Numeric,
            "int" => Self::Int,
            "float" => Self::Float,
            _ => Self::Other,
        }
    }

    /// Returns true for kinds that participate in the numeric view.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Other)
    }

    /// The on-disk spelling of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Int => "int",
            Self::Float => "float",
            Self::Other => "string",
        }
    }
}

/// A table of named columns with raw and numeric views.
///
/// # Examples
///
/// ```
/// use analizar::table::{ColumnKind, Table};
///
/// let table = Table::from_rows(
///     vec!["name".to_string(), "x".to_string(), "y".to_string()],
///     vec![ColumnKind::Other, ColumnKind::Numeric, ColumnKind::Numeric],
///     vec![
///         vec!["a".to_string(), "1.0".to_string(), "2.0".to_string()],
///         vec!["b".to_string(), "3.0".to_string(), "4.0".to_string()],
///     ],
/// ).expect("rows match the header layout");
///
/// assert_eq!(table.n_rows(), 2);
/// assert_eq!(table.headers(), vec!["x", "y"]);
/// let x = table.column("x").expect("x is a numeric column");
/// assert_eq!(x.as_slice(), &[1.0, 3.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    raw_headers: Vec<String>,
    kinds: Vec<ColumnKind>,
    raw_rows: Vec<Vec<String>>,
    /// Numeric columns in declaration order, each aligned with `raw_rows`.
    numeric: Vec<(String, Vec<f32>)>,
}

impl Table {
    /// Creates a table from headers, kinds, and raw records.
    ///
    /// # Errors
    ///
    /// Returns an error if headers and kinds differ in length, a record
    /// has the wrong width, a header repeats, or a numeric-kind cell
    /// fails to parse.
    pub fn from_rows(
        raw_headers: Vec<String>,
        kinds: Vec<ColumnKind>,
        raw_rows: Vec<Vec<String>>,
    ) -> Result<Self> {
        if raw_headers.len() != kinds.len() {
            return Err(AnalizarError::dimension_mismatch(
                "kinds",
                raw_headers.len(),
                kinds.len(),
            ));
        }
        for (i, name) in raw_headers.iter().enumerate() {
            if name.is_empty() {
                return Err(AnalizarError::invalid_selection("empty column name"));
            }
            if raw_headers[..i].contains(name) {
                return Err(AnalizarError::invalid_selection(format!(
                    "duplicate column '{name}'"
                )));
            }
        }
        for (i, row) in raw_rows.iter().enumerate() {
            if row.len() != raw_headers.len() {
                return Err(AnalizarError::DimensionMismatch {
                    expected: format!("{} fields per record", raw_headers.len()),
                    actual: format!("{} fields in record {i}", row.len()),
                });
            }
        }

        let mut numeric = Vec::new();
        for (col, (name, kind)) in raw_headers.iter().zip(kinds.iter()).enumerate() {
            if !kind.is_numeric() {
                continue;
            }
            let mut values = Vec::with_capacity(raw_rows.len());
            for (i, row) in raw_rows.iter().enumerate() {
                let parsed: f32 = row[col].trim().parse().map_err(|_| {
                    AnalizarError::Other(format!(
                        "could not parse '{}' in numeric column '{name}' (record {i})",
                        row[col]
                    ))
                })?;
                values.push(parsed);
            }
            numeric.push((name.clone(), values));
        }

        Ok(Self {
            raw_headers,
            kinds,
            raw_rows,
            numeric,
        })
    }

    /// Reads a table from a delimited text file (header row, kind row,
    /// then one record per line).
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or a malformed file.
    pub fn read_delimited<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Reads a table from any buffered reader using the delimited-text
    /// convention.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or a malformed stream.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines();

        let header_line = lines
            .next()
            .ok_or_else(|| AnalizarError::Other("missing header row".to_string()))??;
        let kind_line = lines
            .next()
            .ok_or_else(|| AnalizarError::Other("missing kind row".to_string()))??;

        let raw_headers = parse_record(&header_line);
        let kinds: Vec<ColumnKind> = parse_record(&kind_line)
            .iter()
            .map(|s| ColumnKind::parse(s))
            .collect();

        let mut raw_rows = Vec::new();
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            raw_rows.push(parse_record(&line));
        }

        Self::from_rows(raw_headers, kinds, raw_rows)
    }

    /// Writes the table back out in the delimited-text convention.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure.
    pub fn write_delimited<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let headers: Vec<&str> = self.raw_headers.iter().map(String::as_str).collect();
        writeln!(writer, "{}", format_record(&headers))?;

        let kinds: Vec<&str> = self.kinds.iter().map(|k| k.as_str()).collect();
        writeln!(writer, "{}", format_record(&kinds))?;

        for row in &self.raw_rows {
            let fields: Vec<&str> = row.iter().map(String::as_str).collect();
            writeln!(writer, "{}", format_record(&fields))?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Returns the numeric column names in declaration order.
    #[must_use]
    pub fn headers(&self) -> Vec<&str> {
        self.numeric.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Returns every column name, numeric or not.
    #[must_use]
    pub fn raw_headers(&self) -> Vec<&str> {
        self.raw_headers.iter().map(String::as_str).collect()
    }

    /// Returns the declared column kinds, aligned with [`Table::raw_headers`].
    #[must_use]
    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    /// Returns the number of records.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.raw_rows.len()
    }

    /// Returns the number of numeric columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.numeric.len()
    }

    /// Returns the number of raw columns.
    #[must_use]
    pub fn n_raw_cols(&self) -> usize {
        self.raw_headers.len()
    }

    fn raw_index(&self, name: &str) -> Result<usize> {
        self.raw_headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AnalizarError::unknown_column(name))
    }

    fn numeric_index(&self, name: &str) -> Result<usize> {
        self.numeric
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| AnalizarError::unknown_column(name))
    }

    /// Returns a numeric column by name.
    ///
    /// # Errors
    ///
    /// Returns an error if no numeric column has that name.
    pub fn column(&self, name: &str) -> Result<Vector<f32>> {
        let idx = self.numeric_index(name)?;
        Ok(Vector::from_slice(&self.numeric[idx].1))
    }

    /// Returns a numeric column by positional index in the numeric view.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of bounds.
    pub fn column_by_index(&self, idx: usize) -> Result<Vector<f32>> {
        if idx >= self.numeric.len() {
            return Err(AnalizarError::invalid_selection(format!(
                "numeric column index {idx} out of bounds (n_cols={})",
                self.numeric.len()
            )));
        }
        Ok(Vector::from_slice(&self.numeric[idx].1))
    }

    /// Returns a numeric row by index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of bounds.
    pub fn row(&self, idx: usize) -> Result<Vector<f32>> {
        if idx >= self.n_rows() {
            return Err(AnalizarError::invalid_selection(format!(
                "row index {idx} out of bounds (n_rows={})",
                self.n_rows()
            )));
        }
        let data: Vec<f32> = self.numeric.iter().map(|(_, col)| col[idx]).collect();
        Ok(Vector::from_vec(data))
    }

    /// Returns a raw record by index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of bounds.
    pub fn raw_row(&self, idx: usize) -> Result<&[String]> {
        self.raw_rows
            .get(idx)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                AnalizarError::invalid_selection(format!(
                    "row index {idx} out of bounds (n_rows={})",
                    self.n_rows()
                ))
            })
    }

    /// Returns a raw column by name.
    ///
    /// # Errors
    ///
    /// Returns an error if no column has that name.
    pub fn raw_column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.raw_index(name)?;
        Ok(self.raw_rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Returns a single numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown column or out-of-bounds row.
    pub fn value(&self, row: usize, name: &str) -> Result<f32> {
        let idx = self.numeric_index(name)?;
        self.numeric[idx]
            .1
            .get(row)
            .copied()
            .ok_or_else(|| {
                AnalizarError::invalid_selection(format!(
                    "row index {row} out of bounds (n_rows={})",
                    self.n_rows()
                ))
            })
    }

    /// Assembles the numeric sub-matrix for the named columns, optionally
    /// restricted to a row subset.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown column or an out-of-bounds row
    /// index in the subset.
    pub fn numeric_data(&self, names: &[&str], rows: Option<&[usize]>) -> Result<Matrix<f32>> {
        if names.is_empty() {
            return Err(AnalizarError::invalid_selection(
                "must select at least one column",
            ));
        }

        let col_indices: Vec<usize> = names
            .iter()
            .map(|name| self.numeric_index(name))
            .collect::<Result<_>>()?;

        let row_indices: Vec<usize> = match rows {
            Some(subset) => {
                for &r in subset {
                    if r >= self.n_rows() {
                        return Err(AnalizarError::invalid_selection(format!(
                            "row index {r} out of bounds (n_rows={})",
                            self.n_rows()
                        )));
                    }
                }
                subset.to_vec()
            }
            None => (0..self.n_rows()).collect(),
        };

        let mut data = Vec::with_capacity(row_indices.len() * col_indices.len());
        for &r in &row_indices {
            for &c in &col_indices {
                data.push(self.numeric[c].1[r]);
            }
        }

        Matrix::from_vec(row_indices.len(), col_indices.len(), data).map_err(Into::into)
    }

    /// Updates a single value in both views.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown numeric column or out-of-bounds row.
    pub fn set_value(&mut self, row: usize, name: &str, value: f32) -> Result<()> {
        let num_idx = self.numeric_index(name)?;
        let raw_idx = self.raw_index(name)?;
        if row >= self.n_rows() {
            return Err(AnalizarError::invalid_selection(format!(
                "row index {row} out of bounds (n_rows={})",
                self.n_rows()
            )));
        }
        self.numeric[num_idx].1[row] = value;
        self.raw_rows[row][raw_idx] = value.to_string();
        Ok(())
    }

    /// Replaces a record's numeric values in both views.
    ///
    /// # Errors
    ///
    /// Returns an error for an out-of-bounds row or a length mismatch
    /// against the numeric column count.
    pub fn set_row(&mut self, idx: usize, values: &[f32]) -> Result<()> {
        if idx >= self.n_rows() {
            return Err(AnalizarError::invalid_selection(format!(
                "row index {idx} out of bounds (n_rows={})",
                self.n_rows()
            )));
        }
        if values.len() != self.numeric.len() {
            return Err(AnalizarError::dimension_mismatch(
                "numeric columns",
                self.numeric.len(),
                values.len(),
            ));
        }
        let raw_indices: Vec<usize> = self
            .numeric
            .iter()
            .map(|(name, _)| {
                self.raw_headers
                    .iter()
                    .position(|h| h == name)
                    .expect("numeric headers are a subset of raw headers")
            })
            .collect();
        for (((_, col), &v), &raw_idx) in
            self.numeric.iter_mut().zip(values.iter()).zip(&raw_indices)
        {
            col[idx] = v;
            self.raw_rows[idx][raw_idx] = v.to_string();
        }
        Ok(())
    }

    /// Replaces a numeric column's values in both views.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown numeric column or a length mismatch.
    pub fn set_column(&mut self, name: &str, values: &[f32]) -> Result<()> {
        let num_idx = self.numeric_index(name)?;
        let raw_idx = self.raw_index(name)?;
        if values.len() != self.n_rows() {
            return Err(AnalizarError::dimension_mismatch(
                "rows",
                self.n_rows(),
                values.len(),
            ));
        }
        self.numeric[num_idx].1.copy_from_slice(values);
        for (row, &v) in self.raw_rows.iter_mut().zip(values.iter()) {
            row[raw_idx] = v.to_string();
        }
        Ok(())
    }

    /// Appends a raw record, parsing numeric-kind cells into the numeric
    /// view.
    ///
    /// # Errors
    ///
    /// Returns an error on wrong width or an unparseable numeric cell;
    /// neither view is modified on failure.
    pub fn add_row(&mut self, record: Vec<String>) -> Result<()> {
        if record.len() != self.raw_headers.len() {
            return Err(AnalizarError::DimensionMismatch {
                expected: format!("{} fields", self.raw_headers.len()),
                actual: format!("{}", record.len()),
            });
        }

        // Parse before mutating so a bad cell leaves the table untouched.
        let mut parsed = Vec::with_capacity(self.numeric.len());
        for (col, kind) in self.kinds.iter().enumerate() {
            if !kind.is_numeric() {
                continue;
            }
            let value: f32 = record[col].trim().parse().map_err(|_| {
                AnalizarError::Other(format!(
                    "could not parse '{}' in numeric column '{}'",
                    record[col], self.raw_headers[col]
                ))
            })?;
            parsed.push(value);
        }

        for ((_, col), value) in self.numeric.iter_mut().zip(parsed) {
            col.push(value);
        }
        self.raw_rows.push(record);
        Ok(())
    }

    /// Appends a new numeric column to both views.
    ///
    /// # Errors
    ///
    /// Returns an error on a duplicate name or length mismatch.
    pub fn add_numeric_column(&mut self, name: &str, values: &[f32]) -> Result<()> {
        if name.is_empty() {
            return Err(AnalizarError::invalid_selection("empty column name"));
        }
        if self.raw_headers.iter().any(|h| h == name) {
            return Err(AnalizarError::invalid_selection(format!(
                "duplicate column '{name}'"
            )));
        }
        if values.len() != self.n_rows() {
            return Err(AnalizarError::dimension_mismatch(
                "rows",
                self.n_rows(),
                values.len(),
            ));
        }

        self.raw_headers.push(name.to_string());
        self.kinds.push(ColumnKind::Numeric);
        for (row, &v) in self.raw_rows.iter_mut().zip(values.iter()) {
            row.push(v.to_string());
        }
        self.numeric.push((name.to_string(), values.to_vec()));
        Ok(())
    }

    /// Deletes a record from both views.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of bounds.
    pub fn delete_row(&mut self, idx: usize) -> Result<()> {
        if idx >= self.n_rows() {
            return Err(AnalizarError::invalid_selection(format!(
                "row index {idx} out of bounds (n_rows={})",
                self.n_rows()
            )));
        }
        self.raw_rows.remove(idx);
        for (_, col) in &mut self.numeric {
            col.remove(idx);
        }
        Ok(())
    }

    /// Deletes a column from both views atomically: the lookup happens
    /// before any mutation, so a failure leaves the table untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if no column has that name.
    pub fn delete_column(&mut self, name: &str) -> Result<()> {
        let raw_idx = self.raw_index(name)?;
        let num_idx = self.numeric.iter().position(|(n, _)| n == name);

        self.raw_headers.remove(raw_idx);
        self.kinds.remove(raw_idx);
        for row in &mut self.raw_rows {
            row.remove(raw_idx);
        }
        if let Some(idx) = num_idx {
            self.numeric.remove(idx);
        }
        Ok(())
    }
}

/// Splits one delimited line into fields, honoring double-quote quoting
/// with `""` escapes.
fn parse_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(field.trim().to_string());
                field = String::new();
            }
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

/// Joins fields into one delimited line, quoting any field containing a
/// delimiter or quote.
fn format_record(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| {
            if f.contains(',') || f.contains('"') {
                format!("\"{}\"", f.replace('"', "\"\""))
            } else {
                (*f).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_table() -> Table {
        Table::from_rows(
            vec![
                "date".to_string(),
                "open".to_string(),
                "close".to_string(),
            ],
            vec![ColumnKind::Other, ColumnKind::Numeric, ColumnKind::Float],
            vec![
                vec!["1/1".to_string(), "10.0".to_string(), "11.0".to_string()],
                vec!["1/2".to_string(), "11.0".to_string(), "12.5".to_string()],
                vec!["1/3".to_string(), "12.5".to_string(), "12.0".to_string()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_view_subset_of_raw() {
        let table = sample_table();
        assert_eq!(table.n_raw_cols(), 3);
        assert_eq!(table.n_cols(), 2);
        assert_eq!(table.headers(), vec!["open", "close"]);
        assert_eq!(table.n_rows(), 3);
    }

    #[test]
    fn test_column_lookup() {
        let table = sample_table();
        let open = table.column("open").unwrap();
        assert_eq!(open.as_slice(), &[10.0, 11.0, 12.5]);
        assert!(table.column("date").is_err());
        assert!(table.column("nope").is_err());
    }

    #[test]
    fn test_numeric_data_selection() {
        let table = sample_table();
        let m = table.numeric_data(&["close", "open"], None).unwrap();
        assert_eq!(m.shape(), (3, 2));
        assert!((m.get(0, 0) - 11.0).abs() < 1e-6);
        assert!((m.get(0, 1) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_numeric_data_row_subset() {
        let table = sample_table();
        let m = table.numeric_data(&["open"], Some(&[2, 0])).unwrap();
        assert_eq!(m.shape(), (2, 1));
        assert!((m.get(0, 0) - 12.5).abs() < 1e-6);
        assert!((m.get(1, 0) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_numeric_data_unknown_column() {
        let table = sample_table();
        let result = table.numeric_data(&["open", "volume"], None);
        assert!(matches!(
            result,
            Err(AnalizarError::InvalidSelection { .. })
        ));
    }

    #[test]
    fn test_set_value_updates_both_views() {
        let mut table = sample_table();
        table.set_value(1, "open", 99.5).unwrap();
        assert!((table.value(1, "open").unwrap() - 99.5).abs() < 1e-6);
        assert_eq!(table.raw_row(1).unwrap()[1], "99.5");
    }

    #[test]
    fn test_add_row() {
        let mut table = sample_table();
        table
            .add_row(vec![
                "1/4".to_string(),
                "13.0".to_string(),
                "13.5".to_string(),
            ])
            .unwrap();
        assert_eq!(table.n_rows(), 4);
        assert!((table.value(3, "close").unwrap() - 13.5).abs() < 1e-6);
    }

    #[test]
    fn test_add_row_bad_numeric_leaves_table_unchanged() {
        let mut table = sample_table();
        let result = table.add_row(vec![
            "1/4".to_string(),
            "not a number".to_string(),
            "13.5".to_string(),
        ]);
        assert!(result.is_err());
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.column("open").unwrap().len(), 3);
    }

    #[test]
    fn test_add_numeric_column() {
        let mut table = sample_table();
        table
            .add_numeric_column("volume", &[100.0, 200.0, 300.0])
            .unwrap();
        assert_eq!(table.n_cols(), 3);
        assert_eq!(table.n_raw_cols(), 4);
        let v = table.column("volume").unwrap();
        assert_eq!(v.as_slice(), &[100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_delete_column_both_views() {
        let mut table = sample_table();
        table.delete_column("open").unwrap();
        assert_eq!(table.n_raw_cols(), 2);
        assert_eq!(table.n_cols(), 1);
        assert!(table.column("open").is_err());
        assert_eq!(table.raw_row(0).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_non_numeric_column() {
        let mut table = sample_table();
        table.delete_column("date").unwrap();
        assert_eq!(table.n_raw_cols(), 2);
        assert_eq!(table.n_cols(), 2);
    }

    #[test]
    fn test_delete_unknown_column_is_noop() {
        let mut table = sample_table();
        assert!(table.delete_column("volume").is_err());
        assert_eq!(table.n_raw_cols(), 3);
        assert_eq!(table.n_cols(), 2);
    }

    #[test]
    fn test_delete_row() {
        let mut table = sample_table();
        table.delete_row(0).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.column("open").unwrap().as_slice(), &[11.0, 12.5]);
    }

    #[test]
    fn test_from_reader_round_trip() {
        let text = "date,open,close\nstring,numeric,float\n1/1,10.0,11.0\n1/2,11.0,12.5\n";
        let table = Table::from_reader(Cursor::new(text)).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.headers(), vec!["open", "close"]);
        assert_eq!(table.raw_column("date").unwrap(), vec!["1/1", "1/2"]);
    }

    #[test]
    fn test_parse_record_quoting() {
        let fields = parse_record("a,\"b,c\",\"say \"\"hi\"\"\"");
        assert_eq!(fields, vec!["a", "b,c", "say \"hi\""]);
    }

    #[test]
    fn test_format_record_quoting() {
        let line = format_record(&["a", "b,c", "say \"hi\""]);
        assert_eq!(line, "a,\"b,c\",\"say \"\"hi\"\"\"");
        // Round-trips through the parser.
        assert_eq!(parse_record(&line), vec!["a", "b,c", "say \"hi\""]);
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let result = Table::from_rows(
            vec!["x".to_string(), "x".to_string()],
            vec![ColumnKind::Numeric, ColumnKind::Numeric],
            vec![],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_row_accessor() {
        let table = sample_table();
        let row = table.row(1).unwrap();
        assert_eq!(row.as_slice(), &[11.0, 12.5]);
        assert!(table.row(9).is_err());
    }

    #[test]
    fn test_set_row() {
        let mut table = sample_table();
        table.set_row(0, &[7.0, 8.0]).unwrap();
        assert_eq!(table.row(0).unwrap().as_slice(), &[7.0, 8.0]);
        // Raw view mirrors the change; the non-numeric cell is untouched.
        assert_eq!(table.raw_row(0).unwrap(), &["1/1", "7", "8"]);
        assert!(table.set_row(9, &[1.0, 2.0]).is_err());
        assert!(table.set_row(0, &[1.0]).is_err());
    }

    #[test]
    fn test_set_column() {
        let mut table = sample_table();
        table.set_column("close", &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(table.column("close").unwrap().as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(table.raw_row(2).unwrap()[2], "3");
        assert!(table.set_column("close", &[1.0]).is_err());
    }
}
