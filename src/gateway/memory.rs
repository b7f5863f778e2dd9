//! In-process gateway backed by plain row vectors.

use std::collections::HashMap;

use serde_json::Value;

use super::{Conditions, Filter, Gateway, GatewayError, ResultSet};
use crate::entity::AttributeMap;

/// Gateway keeping every schema's rows in memory.
///
/// Equality and null filters are evaluated directly. Raw predicates need a
/// SQL engine and are rejected with [`GatewayError::Unsupported`].
#[derive(Debug, Default)]
pub struct MemoryGateway {
    tables: HashMap<String, Vec<AttributeMap>>,
    pending_filters: Vec<Filter>,
    pending_assignments: AttributeMap,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current rows of `schema`, in insertion order.
    pub fn rows(&self, schema: &str) -> &[AttributeMap] {
        self.tables.get(schema).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Consume the pending filters, appending `conditions` as equalities.
    fn take_filters(&mut self, conditions: Option<&Conditions>) -> Vec<Filter> {
        let mut filters = std::mem::take(&mut self.pending_filters);
        filters.extend(conditions.into_iter().flatten().cloned().map(Filter::from));
        filters
    }
}

fn matches(row: &AttributeMap, filters: &[Filter]) -> Result<bool, GatewayError> {
    for filter in filters {
        let hit = match filter {
            Filter::Equals { column, value } => row.get(column) == Some(value),
            Filter::IsNull(column) => row.get(column).map_or(true, Value::is_null),
            Filter::IsNotNull(column) => row.get(column).is_some_and(|v| !v.is_null()),
            Filter::Raw(condition) => {
                return Err(GatewayError::Unsupported(format!(
                    "raw predicate {:?}",
                    condition
                )))
            }
        };
        if !hit {
            return Ok(false);
        }
    }
    Ok(true)
}

fn project(row: &AttributeMap, selector: &[String]) -> AttributeMap {
    if selector.is_empty() {
        return row.clone();
    }
    selector
        .iter()
        .filter_map(|column| row.get(column).map(|v| (column.clone(), v.clone())))
        .collect()
}

impl Gateway for MemoryGateway {
    fn create(&mut self, schema: &str, row: AttributeMap) -> Result<bool, GatewayError> {
        self.tables.entry(schema.to_string()).or_default().push(row);
        Ok(true)
    }

    fn create_batch(
        &mut self,
        schema: &str,
        rows: Vec<AttributeMap>,
    ) -> Result<bool, GatewayError> {
        self.tables.entry(schema.to_string()).or_default().extend(rows);
        Ok(true)
    }

    fn read(
        &mut self,
        schema: &str,
        selector: &[String],
        conditions: &Conditions,
    ) -> Result<ResultSet, GatewayError> {
        let filters = self.take_filters(Some(conditions));
        let mut selected = Vec::new();
        for row in self.rows(schema) {
            if matches(row, &filters)? {
                selected.push(project(row, selector));
            }
        }
        Ok(ResultSet::from_rows(selected))
    }

    fn update(&mut self, schema: &str, row: AttributeMap) -> Result<bool, GatewayError> {
        let filters = self.take_filters(None);
        let mut assignments = std::mem::take(&mut self.pending_assignments);
        assignments.extend(row);
        if assignments.is_empty() {
            return Err(GatewayError::QueryBuild(format!(
                "update on {schema} has no assignments"
            )));
        }

        let table = self.tables.entry(schema.to_string()).or_default();
        for stored in table.iter_mut() {
            if matches(stored, &filters)? {
                for (column, value) in &assignments {
                    stored.insert(column.clone(), value.clone());
                }
            }
        }
        Ok(true)
    }

    fn update_batch(
        &mut self,
        reference: &str,
        schema: &str,
        rows: Vec<AttributeMap>,
    ) -> Result<bool, GatewayError> {
        let filters = self.take_filters(None);
        let mut keyed = Vec::with_capacity(rows.len());
        for row in rows {
            let key = row.get(reference).cloned().ok_or_else(|| {
                GatewayError::QueryBuild(format!(
                    "batch row on {schema} is missing reference column {reference}"
                ))
            })?;
            keyed.push((key, row));
        }

        let table = self.tables.entry(schema.to_string()).or_default();
        let eligible = table
            .iter()
            .map(|stored| matches(stored, &filters))
            .collect::<Result<Vec<bool>, GatewayError>>()?;
        for (key, row) in &keyed {
            for (stored, _) in table.iter_mut().zip(&eligible).filter(|(_, hit)| **hit) {
                if stored.get(reference) == Some(key) {
                    for (column, value) in row {
                        stored.insert(column.clone(), value.clone());
                    }
                }
            }
        }
        Ok(true)
    }

    fn delete(
        &mut self,
        schema: &str,
        conditions: Option<&Conditions>,
    ) -> Result<bool, GatewayError> {
        let filters = self.take_filters(conditions);
        let Some(table) = self.tables.get_mut(schema) else {
            return Ok(true);
        };
        // Evaluate first so a failing filter leaves the table untouched
        let doomed = table
            .iter()
            .map(|row| matches(row, &filters))
            .collect::<Result<Vec<bool>, GatewayError>>()?;
        let mut doomed = doomed.into_iter();
        table.retain(|_| !doomed.next().unwrap_or(false));
        Ok(true)
    }

    fn filter(&mut self, filter: Filter) {
        self.pending_filters.push(filter);
    }

    fn has_pending(&self, filter: &Filter) -> bool {
        self.pending_filters.contains(filter)
    }

    fn set(&mut self, column: &str, value: Value) {
        self.pending_assignments.insert(column.to_string(), value);
    }
}
