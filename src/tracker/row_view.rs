use hifitime::Epoch;

use crate::conversion::parse_f64;

/// One ephemeris row as handed to tracker callbacks.
///
/// Values are in the order of [`Ephemeris::data_titles`](crate::ephemeris::Ephemeris::data_titles),
/// date column included. The same view is passed to the `before`, `on_time` and `after`
/// callbacks of a row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView<'a> {
    index: usize,
    epoch: Epoch,
    titles: &'a [String],
    values: Vec<&'a str>,
}

impl<'a> RowView<'a> {
    pub(crate) fn new(index: usize, epoch: Epoch, titles: &'a [String], values: Vec<&'a str>) -> Self {
        RowView {
            index,
            epoch,
            titles,
            values,
        }
    }

    /// Row index in the ephemeris
    pub fn index(&self) -> usize {
        self.index
    }

    /// Scheduled instant of the row (UTC)
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn titles(&self) -> &'a [String] {
        self.titles
    }

    /// Values in title order
    pub fn values(&self) -> &[&'a str] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the column `title`
    pub fn get(&self, title: &str) -> Option<&'a str> {
        self.titles
            .iter()
            .position(|t| t == title)
            .map(|j| self.values[j])
    }

    /// Value of the column `title` as a float, `None` if absent or not numeric
    pub fn get_f64(&self, title: &str) -> Option<f64> {
        self.get(title).and_then(parse_f64)
    }

    /// `(title, value)` pairs in title order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.titles
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Owned copy of the values, in title order
    pub fn to_vec(&self) -> Vec<String> {
        self.values.iter().map(|v| v.to_string()).collect()
    }
}
