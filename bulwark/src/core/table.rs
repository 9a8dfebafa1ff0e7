//! The table value every check operates on.

use super::Scalar;
use crate::prelude::*;
use arrow::array::{Array, ArrayRef, Int64Array};
use arrow::datatypes::{DataType, Field, SchemaRef};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use std::sync::Arc;

/// An ordered set of named, typed columns sharing a common row index.
///
/// The columns are an Arrow [`RecordBatch`]. The row index is an Arrow array of
/// the same length; when none is supplied the table uses a positional `0..n`
/// index. Cloning a table is cheap: Arrow buffers are reference counted.
///
/// ```rust
/// use arrow::array::{ArrayRef, Int64Array, StringArray};
/// use bulwark::core::Table;
/// use std::sync::Arc;
///
/// let table = Table::try_from_columns(vec![
///     ("id", Arc::new(Int64Array::from(vec![1, 2, 3])) as ArrayRef),
///     ("name", Arc::new(StringArray::from(vec!["a", "b", "c"])) as ArrayRef),
/// ])
/// .unwrap();
///
/// assert_eq!(table.shape(), (3, 2));
/// assert_eq!(table.column_names(), vec!["id", "name"]);
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    batch: RecordBatch,
    index: Option<ArrayRef>,
}

impl Table {
    /// Creates a table with a positional index.
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch, index: None }
    }

    /// Creates a table from `(name, array)` pairs.
    pub fn try_from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ArrayRef)>,
        S: AsRef<str>,
    {
        Ok(Self::new(RecordBatch::try_from_iter(columns)?))
    }

    /// Replaces the row index. The index must have one entry per row.
    pub fn with_index(mut self, index: ArrayRef) -> Result<Self> {
        if index.len() != self.num_rows() {
            return Err(BulwarkError::InvalidTable(format!(
                "index has {} entries but the table has {} rows",
                index.len(),
                self.num_rows()
            )));
        }
        self.index = Some(index);
        Ok(self)
    }

    /// Builds a new table by transforming every column, keeping the index.
    ///
    /// This is the usual way for a pipeline step to derive its output table.
    pub fn map_columns<F>(&self, mut f: F) -> Result<Table>
    where
        F: FnMut(&Field, &ArrayRef) -> Result<ArrayRef>,
    {
        let schema = self.schema();
        let mut fields = Vec::with_capacity(schema.fields().len());
        let mut columns = Vec::with_capacity(schema.fields().len());
        for (field, array) in schema.fields().iter().zip(self.batch.columns()) {
            let mapped = f(field, array)?;
            fields.push(Field::new(
                field.name(),
                mapped.data_type().clone(),
                field.is_nullable() || mapped.null_count() > 0,
            ));
            columns.push(mapped);
        }
        let batch = RecordBatch::try_new(Arc::new(arrow::datatypes::Schema::new(fields)), columns)?;
        Ok(Table {
            batch,
            index: self.index.clone(),
        })
    }

    /// The underlying record batch.
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// The Arrow schema of the columns.
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows(), self.num_columns())
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<&str> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    /// Returns true if the table has a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.batch.column_by_name(name).is_some()
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        self.batch
            .column_by_name(name)
            .ok_or_else(|| BulwarkError::column_not_found(name))
    }

    /// The Arrow data type of a column.
    pub fn dtype(&self, name: &str) -> Result<&DataType> {
        self.column(name).map(|array| array.data_type())
    }

    /// Reads every cell of a column as [`Scalar`]s.
    pub fn values(&self, name: &str) -> Result<Vec<Scalar>> {
        Scalar::from_array(self.column(name)?)
    }

    /// The row index, materialising the positional index when none was set.
    pub fn index(&self) -> ArrayRef {
        match &self.index {
            Some(index) => index.clone(),
            None => Arc::new(Int64Array::from_iter_values(0..self.num_rows() as i64)),
        }
    }

    /// Returns true when the table uses the positional `0..n` index.
    pub fn has_default_index(&self) -> bool {
        self.index.is_none()
    }

    /// Display form of the index entry for a row, used in error messages.
    pub fn row_label(&self, row: usize) -> String {
        match &self.index {
            Some(index) => array_value_to_string(index, row).unwrap_or_else(|_| row.to_string()),
            None => row.to_string(),
        }
    }

    /// Resolves an optional column subset: `None` selects every column, a
    /// subset must name existing columns.
    pub fn resolve_columns(&self, columns: Option<&[String]>) -> Result<Vec<String>> {
        match columns {
            None => Ok(self.column_names().into_iter().map(String::from).collect()),
            Some(columns) => columns
                .iter()
                .map(|c| {
                    if self.has_column(c) {
                        Ok(c.clone())
                    } else {
                        Err(BulwarkError::column_not_found(c.as_str()))
                    }
                })
                .collect(),
        }
    }
}

impl From<RecordBatch> for Table {
    fn from(batch: RecordBatch) -> Self {
        Table::new(batch)
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.batch == other.batch && self.index() == other.index()
    }
}
