//! The stats API answers most endpoints with a list of tabular result sets:
//! `{"resultSets": [{"name": ..., "headers": [...], "rowSet": [[...], ...]}]}`.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{RecapError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(rename = "rowSet", default)]
    pub row_set: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ResultSetsResponse {
    #[serde(rename = "resultSets", alias = "resultSet")]
    result_sets: Vec<ResultSet>,
}

impl ResultSet {
    /// Position of `header`, or `fallback` when the set carries no headers at all.
    pub fn column(&self, endpoint: &'static str, header: &str, fallback: usize) -> Result<usize> {
        if self.headers.is_empty() {
            return Ok(fallback);
        }
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(header))
            .ok_or_else(|| {
                RecapError::malformed(endpoint, format!("{} has no {header} column", self.name))
            })
    }
}

/// Decode the result set list. A body without `resultSets`, including `null` and the
/// API's `{"message": ...}` error shape, is malformed rather than empty.
pub fn parse_result_sets(raw: &str, endpoint: &'static str) -> Result<Vec<ResultSet>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(RecapError::malformed(endpoint, "empty body"));
    }
    let resp: ResultSetsResponse = serde_json::from_str(trimmed)
        .map_err(|err| RecapError::malformed(endpoint, format!("invalid json: {err}")))?;
    Ok(resp.result_sets)
}

/// Find a result set by name, falling back to its conventional position when that
/// slot holds an unnamed set.
pub fn pick_set<'a>(sets: &'a [ResultSet], name: &str, fallback: usize) -> Option<&'a ResultSet> {
    sets.iter()
        .find(|set| set.name.eq_ignore_ascii_case(name))
        .or_else(|| sets.get(fallback).filter(|set| set.name.is_empty()))
}

pub fn cell<'a>(row: &'a [Value], idx: usize) -> Option<&'a Value> {
    row.get(idx).filter(|v| !v.is_null())
}

pub fn cell_string(row: &[Value], idx: usize) -> Option<String> {
    match cell(row, idx)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn cell_i64(row: &[Value], idx: usize) -> Option<i64> {
    match cell(row, idx)? {
        Value::Number(n) => n.as_i64().or_else(|| whole_number(n.as_f64()?)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

// Counts sometimes arrive as `27.0`; anything with a fraction is not a count.
fn whole_number(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

pub fn cell_u32(row: &[Value], idx: usize) -> Option<u32> {
    cell_i64(row, idx).and_then(|v| u32::try_from(v).ok())
}

pub fn cell_f64(row: &[Value], idx: usize) -> Option<f64> {
    match cell(row, idx)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
