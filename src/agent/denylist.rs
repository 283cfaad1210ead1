//! Organization-wide blocked delivery/pickup dates.

use {
    crate::agent::calendar,
    chrono::NaiveDate,
    std::collections::HashSet,
};

/// Immutable set of denied calendar dates, built once per resolution.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DenyList {
    dates: HashSet<NaiveDate>,
}

impl DenyList {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the list from `YYYY-MM-DD` strings. Entries that do not parse
    /// are skipped with a warning rather than failing the resolution.
    pub fn from_storage_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dates = keys
            .into_iter()
            .filter_map(|key| match calendar::parse_storage_key(key.as_ref()) {
                Ok(date) => Some(date),
                Err(err) => {
                    tracing::warn!(err = ?err, "Skipping malformed denied date.");
                    None
                }
            })
            .collect();

        Self { dates }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl FromIterator<NaiveDate> for DenyList {
    fn from_iter<T: IntoIterator<Item = NaiveDate>>(iter: T) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}
