//! Stage 3: empty-entity elimination.
//!
//! Delisted securities and entities outside the queried period show up as
//! rows with no data at all. An entity is dropped only when every value
//! column is null on every one of its rows.

use std::collections::{BTreeSet, HashSet};

use polars::prelude::*;

use crate::error::Result;
use crate::frame::{float_values, is_numeric_dtype, text_values};

/// Entity counts reported by [`drop_empty_entities`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropStats {
    pub entities_total: usize,
    pub entities_dropped: usize,
}

impl DropStats {
    pub fn entities_retained(&self) -> usize {
        self.entities_total - self.entities_dropped
    }
}

/// Removes entities with no data in any value column.
///
/// `value_columns` defaults to every numeric column other than the entity
/// column. Rows with a null entity belong to no entity: they are neither
/// counted nor dropped. A missing entity column reports `(0, 0)`; a table
/// without value columns reports its distinct entity count and drops none.
pub fn drop_empty_entities(
    df: &DataFrame,
    entity_column: &str,
    value_columns: Option<&[String]>,
) -> Result<(DataFrame, DropStats)> {
    let Ok(entity) = df.column(entity_column) else {
        tracing::debug!(entity_column, "Entity column absent, nothing to drop");
        return Ok((df.clone(), DropStats::default()));
    };
    let entities = text_values(entity)?;
    let entities_total = entities.iter().flatten().collect::<HashSet<_>>().len();

    let value_columns: Vec<&Column> = match value_columns {
        Some(names) => names
            .iter()
            .filter_map(|name| df.column(name).ok())
            .collect(),
        None => df
            .get_columns()
            .iter()
            .filter(|column| column.name().as_str() != entity_column)
            .filter(|column| is_numeric_dtype(column.dtype()))
            .collect(),
    };
    if value_columns.is_empty() {
        return Ok((
            df.clone(),
            DropStats {
                entities_total,
                entities_dropped: 0,
            },
        ));
    }

    let mut row_has_data = vec![false; df.height()];
    for column in value_columns {
        for (flag, value) in row_has_data.iter_mut().zip(float_values(column)?) {
            *flag |= value.is_some();
        }
    }

    let with_data: HashSet<&str> = entities
        .iter()
        .zip(&row_has_data)
        .filter_map(|(entity, has_data)| entity.as_deref().filter(|_| *has_data))
        .collect();
    let empty: BTreeSet<&str> = entities
        .iter()
        .flatten()
        .map(String::as_str)
        .filter(|entity| !with_data.contains(entity))
        .collect();
    let stats = DropStats {
        entities_total,
        entities_dropped: empty.len(),
    };
    if empty.is_empty() {
        return Ok((df.clone(), stats));
    }
    tracing::debug!(entities = ?empty, "Dropping entities without data");

    let keep: Vec<bool> = entities
        .iter()
        .map(|entity| entity.as_deref().is_none_or(|e| !empty.contains(e)))
        .collect();
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok((df.filter(&mask)?, stats))
}
