use std::collections::HashMap;

use crate::sunspot_errors::{ParseError, SunspotError};

/// Result of a correspondence lookup, see [`Table::correspond`].
///
/// The three outcomes stay distinguishable: most callers want "the one row where this
/// happened" ([`Correspondence::Single`]) but a recurring value (a periodic azimuth, a
/// constant flag) yields every matching row in chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correspondence<'a> {
    /// The source value does not appear in the source column
    Absent,
    /// The source value appears on exactly one row
    Single(&'a str),
    /// The source value appears on several rows, target values in row order
    Multiple(Vec<&'a str>),
}

impl<'a> Correspondence<'a> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Correspondence::Absent)
    }

    /// All corresponding values in row order, empty when absent
    pub fn values(&self) -> Vec<&'a str> {
        match self {
            Correspondence::Absent => Vec::new(),
            Correspondence::Single(v) => vec![*v],
            Correspondence::Multiple(v) => v.clone(),
        }
    }

    /// The single corresponding value, `None` when absent or ambiguous
    pub fn single(&self) -> Option<&'a str> {
        match self {
            Correspondence::Single(v) => Some(*v),
            _ => None,
        }
    }
}

/// In-memory columnar store of an ephemeris.
///
/// `titles` keeps the column order of the provider header, `columns[j]` holds the values of
/// `titles[j]` and every column has the same length. Row `i` across all columns describes the
/// same observation instant. A table is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    titles: Vec<String>,
    columns: Vec<Vec<String>>,
    title_index: HashMap<String, usize>,
}

impl Table {
    /// Build a table from its titles and rows
    ///
    /// Arguments
    /// ---------
    /// * `titles`: column titles in header order
    /// * `rows`: one vector of values per row, each of length `titles.len()`
    ///
    /// Return
    /// ------
    /// * the table, or a [`ParseError`] if a title is repeated or a row has the wrong width
    pub fn from_rows(titles: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, ParseError> {
        let mut title_index = HashMap::with_capacity(titles.len());
        for (j, title) in titles.iter().enumerate() {
            if title_index.insert(title.clone(), j).is_some() {
                return Err(ParseError::DuplicateTitle(title.clone()));
            }
        }

        let mut columns = vec![Vec::with_capacity(rows.len()); titles.len()];
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != titles.len() {
                return Err(ParseError::FieldCount {
                    line: i + 1,
                    expected: titles.len(),
                    found: row.len(),
                });
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }

        Ok(Table {
            titles,
            columns,
            title_index,
        })
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_title(&self, title: &str) -> bool {
        self.title_index.contains_key(title)
    }

    fn index_of(&self, title: &str) -> Result<usize, SunspotError> {
        self.title_index
            .get(title)
            .copied()
            .ok_or_else(|| SunspotError::UnknownColumn(title.to_string()))
    }

    /// Get the values of a column, in chronological order
    ///
    /// Argument
    /// --------
    /// * `title`: a column title, e.g. `"Azi____(a-app)___Elev"`
    ///
    /// Return
    /// ------
    /// * the column, or [`SunspotError::UnknownColumn`] if the title is not in the table
    pub fn column_by_title(&self, title: &str) -> Result<&[String], SunspotError> {
        Ok(&self.columns[self.index_of(title)?])
    }

    /// Values of row `index` in title order
    pub fn row(&self, index: usize) -> Option<Vec<&str>> {
        if index >= self.len() {
            return None;
        }
        Some(self.columns.iter().map(|c| c[index].as_str()).collect())
    }

    /// Find the values of `target_title` on the rows where `source_title` equals `source_value`
    ///
    /// Arguments
    /// ---------
    /// * `target_title`: the column to read the result from
    /// * `source_title`: the column in which `source_value` is searched (exact string match)
    /// * `source_value`: the searched value
    ///
    /// Return
    /// ------
    /// * [`Correspondence::Absent`] when nothing matches, [`Correspondence::Single`] for one
    ///   match, [`Correspondence::Multiple`] (row order) for several
    /// * [`SunspotError::UnknownColumn`] if either title is not in the table
    pub fn correspond(
        &self,
        target_title: &str,
        source_title: &str,
        source_value: &str,
    ) -> Result<Correspondence<'_>, SunspotError> {
        let target = &self.columns[self.index_of(target_title)?];
        let source = &self.columns[self.index_of(source_title)?];

        let mut matches: Vec<&str> = source
            .iter()
            .zip(target)
            .filter(|(s, _)| s.as_str() == source_value)
            .map(|(_, t)| t.as_str())
            .collect();

        Ok(match matches.len() {
            0 => Correspondence::Absent,
            1 => Correspondence::Single(matches.remove(0)),
            _ => Correspondence::Multiple(matches),
        })
    }
}
