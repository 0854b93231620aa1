//! Result collection: draining every page of a query's output, and converting the
//! header-plus-rows page format into one mapping per data row.

use rand::Rng;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, instrument, trace};

use crate::api::QueryService;
use crate::models::{AthenaError, QueryResultsResponse, Result, ResultSet, Row};

/// Prefix of the key generated for a column whose header cell has no name.
pub const DUMMY_KEY_PREFIX: &str = "DummyKey";

/// One data row keyed by column name, in header order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRow {
    entries: Vec<(String, Option<String>)>,
}

impl FlatRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`. A repeated key keeps its original position and takes the new value.
    pub fn insert(&mut self, key: String, value: Option<String>) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// `None` when the column does not exist; `Some(None)` when the cell had no value.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_deref())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FlatRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Fetches every result page for `query_execution_id`, starting at `next_token` if given.
///
/// Pages are requested one after another. The returned response is the last page received, with
/// its rows replaced by the rows of all pages in arrival order. When the first page is already
/// the last one it is returned unchanged.
#[instrument(skip(service, next_token))]
pub async fn fetch_all_results<S: QueryService>(
    service: &S,
    query_execution_id: &str,
    next_token: Option<&str>,
) -> Result<QueryResultsResponse> {
    if query_execution_id.is_empty() {
        return Err(AthenaError::InvalidIdentifier);
    }

    let mut token = next_token.map(str::to_owned);
    let mut collected: Option<Vec<Row>> = None;
    let mut pages = 0usize;

    loop {
        let mut page = service
            .get_query_results(query_execution_id, token.as_deref())
            .await?;
        pages += 1;
        debug!(
            page = pages,
            rows = page.rows().len(),
            has_next = page.next_token.is_some(),
            "Fetched result page"
        );

        if let Some(next) = page.next_token.clone() {
            let rows = page.result_set.and_then(|rs| rs.rows).unwrap_or_default();
            collected.get_or_insert_with(Vec::new).extend(rows);
            token = Some(next);
            continue;
        }

        if let Some(mut rows) = collected {
            let result_set = page.result_set.get_or_insert_with(ResultSet::default);
            rows.extend(result_set.rows.take().unwrap_or_default());
            result_set.rows = Some(rows);
        }
        return Ok(page);
    }
}

/// Converts a result page into one [`FlatRow`] per data row.
///
/// The first row supplies the column names. Data rows whose cell count differs from the header
/// are skipped. A header cell without a name gets a generated `DummyKey#####` key, which is
/// random and may differ between calls or collide within a result.
pub fn flatten_to_rows(page: Option<&QueryResultsResponse>) -> Vec<FlatRow> {
    let Some(rows) = page.map(QueryResultsResponse::rows) else {
        return Vec::new();
    };
    let Some((header, data_rows)) = rows.split_first() else {
        return Vec::new();
    };

    let columns = header.cells();
    let mut rng = rand::rng();
    let mut flattened = Vec::with_capacity(data_rows.len());

    for (index, row) in data_rows.iter().enumerate() {
        let cells = row.cells();
        if cells.len() != columns.len() {
            debug!(
                row = index + 1,
                cells = cells.len(),
                columns = columns.len(),
                "Skipping row with mismatched cell count"
            );
            continue;
        }

        let mut flat = FlatRow::new();
        for (column, cell) in columns.iter().zip(cells) {
            let key = match column.var_char_value.as_deref() {
                Some(name) if !name.is_empty() => name.to_owned(),
                _ => {
                    let key = dummy_key(&mut rng);
                    trace!(%key, "Generated key for unnamed column");
                    key
                }
            };
            flat.insert(key, cell.var_char_value.clone());
        }
        flattened.push(flat);
    }

    flattened
}

fn dummy_key(rng: &mut impl Rng) -> String {
    format!("{}{:05}", DUMMY_KEY_PREFIX, rng.random_range(0..100_000u32))
}
