//! Dataset rows and collections.

use serde::{Deserialize, Serialize};

/// A single dataset record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Unique identifier
    #[serde(rename = "ID")]
    pub id: String,
    /// Headline text, possibly corrupted
    pub text: String,
    /// Topic label (0-6 in the headline dataset)
    pub target: u32,
}

impl Row {
    /// Number of fields in a row.
    pub const FIELD_COUNT: usize = 3;

    /// Creates a new row.
    pub fn new(id: impl Into<String>, text: impl Into<String>, target: u32) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            target,
        }
    }
}

/// An ordered collection of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    /// Rows in input order
    pub rows: Vec<Row>,
    /// Number of columns in the source file, including ones not kept
    #[serde(skip)]
    pub field_count: usize,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            field_count: Row::FIELD_COUNT,
        }
    }
}

impl Dataset {
    /// Creates a new empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source column count.
    pub fn with_field_count(mut self, field_count: usize) -> Self {
        self.field_count = field_count;
        self
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row.
    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Returns an iterator over the rows.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Returns an iterator over the row IDs.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.id.as_str())
    }
}

impl From<Vec<Row>> for Dataset {
    fn from(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }
}

impl FromIterator<Row> for Dataset {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl IntoIterator for Dataset {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
