//! Tabular units backed by Arrow record batches
//!
//! Every column is read as nullable text and header names are trimmed, so a
//! unit round-trips through the pipeline without type coercion.

use crate::error::TableError;
use arrow::array::{new_null_array, Array, ArrayRef, StringArray};
use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, Field, FieldRef, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use dacat_domain::{ClassificationResult, CATEGORY_COLUMN, REASON_COLUMN};
use std::collections::BTreeMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

/// One unit of tabular data held in memory
#[derive(Debug, Clone)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    /// Read a CSV file with a header row
    ///
    /// Rows with fewer fields than the header are padded with nulls.
    pub fn read_csv(path: &Path) -> Result<Self, TableError> {
        let bytes = fs::read(path)?;

        let (inferred, _) = Format::default()
            .with_header(true)
            .infer_schema(Cursor::new(&bytes), Some(0))?;
        if inferred.fields().is_empty() {
            return Err(TableError::NoColumns);
        }

        let schema: SchemaRef = Arc::new(Schema::new(
            inferred
                .fields()
                .iter()
                .map(|f| Field::new(f.name().trim(), DataType::Utf8, true))
                .collect::<Vec<_>>(),
        ));

        let reader = ReaderBuilder::new(Arc::clone(&schema))
            .with_header(true)
            .with_truncated_rows(true)
            .build(Cursor::new(&bytes))?;
        let batches = reader.collect::<Result<Vec<_>, _>>()?;
        let batch = concat_batches(&schema, &batches)?;

        Ok(Self { batch })
    }

    /// Number of data rows
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Position of a column, matched after trimming
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.batch.schema().index_of(name.trim()).ok()
    }

    /// Value of a text cell, `None` for nulls
    pub fn text(&self, column: usize, row: usize) -> Result<Option<String>, TableError> {
        let array = self.text_column(column)?;
        if row >= array.len() || array.is_null(row) {
            return Ok(None);
        }
        Ok(Some(array.value(row).to_string()))
    }

    /// Statement text of the first row; a null cell reads as empty text
    pub fn first_text(&self, column: usize) -> Result<String, TableError> {
        if self.num_rows() == 0 {
            return Err(TableError::Empty);
        }
        Ok(self.text(column, 0)?.unwrap_or_default())
    }

    /// Occurrences of each value in a text column; nulls count as empty text
    pub fn value_counts(&self, column: usize) -> Result<BTreeMap<String, usize>, TableError> {
        let array = self.text_column(column)?;
        let mut counts = BTreeMap::new();
        for row in 0..array.len() {
            let value = if array.is_null(row) { "" } else { array.value(row) };
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Copy of this table with `Category` and `Reason` set on every row
    ///
    /// Existing columns with those names are replaced.
    pub fn with_classification(&self, result: &ClassificationResult) -> Result<Self, TableError> {
        let rows = self.num_rows();
        let schema = self.batch.schema();

        let mut fields: Vec<FieldRef> = Vec::with_capacity(schema.fields().len() + 2);
        let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len() + 2);
        for (field, column) in schema.fields().iter().zip(self.batch.columns()) {
            if field.name() == CATEGORY_COLUMN || field.name() == REASON_COLUMN {
                continue;
            }
            fields.push(Arc::clone(field));
            columns.push(Arc::clone(column));
        }

        fields.push(Arc::new(Field::new(CATEGORY_COLUMN, DataType::Utf8, true)));
        columns.push(Arc::new(StringArray::from(vec![result.label.as_str(); rows])));
        fields.push(Arc::new(Field::new(REASON_COLUMN, DataType::Utf8, true)));
        columns.push(Arc::new(StringArray::from(vec![result.reason.as_str(); rows])));

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
        Ok(Self { batch })
    }

    /// Concatenate tables, taking the union of their columns
    ///
    /// Columns appear in first-seen order. Cells missing from a table are
    /// null in the result.
    pub fn union(tables: &[Table]) -> Result<Self, TableError> {
        let mut names: Vec<String> = Vec::new();
        for table in tables {
            for field in table.batch.schema().fields() {
                if !names.contains(field.name()) {
                    names.push(field.name().clone());
                }
            }
        }

        let schema: SchemaRef = Arc::new(Schema::new(
            names
                .iter()
                .map(|name| Field::new(name, DataType::Utf8, true))
                .collect::<Vec<_>>(),
        ));

        let mut aligned = Vec::with_capacity(tables.len());
        for table in tables {
            let own = table.batch.schema();
            let rows = table.num_rows();
            let columns: Vec<ArrayRef> = names
                .iter()
                .map(|name| match own.index_of(name) {
                    Ok(idx) => Arc::clone(table.batch.column(idx)),
                    Err(_) => new_null_array(&DataType::Utf8, rows),
                })
                .collect();
            aligned.push(RecordBatch::try_new(Arc::clone(&schema), columns)?);
        }

        let batch = concat_batches(&schema, &aligned)?;
        Ok(Self { batch })
    }

    /// Write as CSV with a header, replacing `path` in a single rename
    ///
    /// The data goes to a hidden temp file in the destination directory
    /// first, so `path` is either absent or complete.
    pub fn write_csv_atomic(&self, path: &Path) -> Result<(), TableError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::Builder::new()
            .prefix(".dacat-")
            .suffix(".partial")
            .tempfile_in(dir)?;
        {
            let mut writer = WriterBuilder::new()
                .with_header(true)
                .build(tmp.as_file_mut());
            writer.write(&self.batch)?;
        }
        tmp.as_file_mut().sync_all()?;
        tmp.persist(path).map_err(|e| TableError::Io(e.error))?;
        Ok(())
    }

    fn text_column(&self, column: usize) -> Result<&StringArray, TableError> {
        let name = || {
            self.batch
                .schema()
                .fields()
                .get(column)
                .map(|f| f.name().clone())
                .unwrap_or_else(|| format!("#{}", column))
        };
        if column >= self.batch.num_columns() {
            return Err(TableError::NotText(name()));
        }
        self.batch
            .column(column)
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| TableError::NotText(name()))
    }
}
