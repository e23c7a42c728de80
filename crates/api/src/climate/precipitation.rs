use log::debug;
use serde::{ser::SerializeMap, Serialize, Serializer};
use std::mem;
use time::Date;

use super::{Climate, Error};
use crate::{db::ScanFilter, format_date};

/// Every precipitation reading recorded on one day, in store order.
///
/// Serializes as a single entry object: `{"2016-08-23": [0.0, 0.15]}`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecipitationGroup {
    pub date: Date,
    pub values: Vec<Option<f64>>,
}

impl Serialize for PrecipitationGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&format_date(self.date), &self.values)?;
        map.end()
    }
}

impl Climate {
    /// Precipitation readings of every station over the most recent year,
    /// one group per day in chronological order.
    pub async fn precipitation(&self) -> Result<Vec<PrecipitationGroup>, Error> {
        let window_start = self.bounds.one_year_cutoff();
        let window_end = self.bounds.latest();

        let rows = self
            .store
            .scan(ScanFilter::between(window_start, window_end).ordered())
            .await?;
        debug!(
            "grouping {} precipitation rows from {}",
            rows.len(),
            format_date(window_start)
        );

        Ok(group_precipitation(
            rows.into_iter().map(|o| (o.date, o.precipitation)),
            window_start,
            window_end,
        ))
    }
}

/// Groups `(date, precipitation)` rows by change of date.
///
/// `rows` must already be ascending by date; nothing is sorted here. The cursor
/// starts at `window_start` and a group is emitted each time the date moves on,
/// with the last group flushed once the input runs out. Rows outside
/// `[window_start, window_end]` are skipped and empty groups are never emitted.
pub fn group_precipitation<I>(
    rows: I,
    window_start: Date,
    window_end: Date,
) -> Vec<PrecipitationGroup>
where
    I: IntoIterator<Item = (Date, Option<f64>)>,
{
    let mut groups = Vec::new();
    let mut cursor = window_start;
    let mut values = Vec::new();

    for (date, value) in rows {
        if date < window_start || date > window_end {
            continue;
        }
        if date != cursor {
            flush(&mut groups, cursor, &mut values);
            cursor = date;
        }
        values.push(value);
    }
    flush(&mut groups, cursor, &mut values);

    groups
}

fn flush(groups: &mut Vec<PrecipitationGroup>, date: Date, values: &mut Vec<Option<f64>>) {
    if !values.is_empty() {
        groups.push(PrecipitationGroup {
            date,
            values: mem::take(values),
        });
    }
}
