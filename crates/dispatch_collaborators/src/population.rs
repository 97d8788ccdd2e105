//! Population statistics over an embedded dataset.

use crate::Result;
use async_trait::async_trait;
use dispatch_engine::{HandlerError, ToolHandler};
use dispatch_validator::ValidatedValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::Arc;

const DATASET: &str = include_str!("../data/population.json");

/// Population of one country in a given year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryPopulation {
    pub country_code: String,
    pub country_name: String,
    pub continent: String,
    pub population: u64,
    pub year: u32,
    /// Yearly growth in percent
    pub growth_rate: f64,
}

/// World population in a given year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalPopulation {
    pub year: u32,
    pub population: u64,
    pub growth_rate: f64,
}

/// Column to sort countries by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Population,
    GrowthRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filters of the `countryPopulation` tool.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryQuery {
    pub continent: Option<String>,
    pub sort_by: Option<SortKey>,
    /// Maximum number of rows; fractional values are truncated
    pub limit: Option<f64>,
    /// Only meaningful with `sort_by`; descending when absent
    pub order: Option<SortOrder>,
}

/// Filters of the `globalPopulation` tool. Both bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRange {
    pub start_year: Option<f64>,
    pub end_year: Option<f64>,
}

/// The population dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct PopulationData {
    countries: Vec<CountryPopulation>,
    global: Vec<GlobalPopulation>,
}

impl PopulationData {
    /// Decodes the dataset compiled into the crate.
    pub fn embedded() -> Result<Self> {
        Ok(serde_json::from_str(DATASET)?)
    }

    /// Countries matching a query.
    pub fn countries(&self, query: &CountryQuery) -> Vec<CountryPopulation> {
        let mut rows: Vec<CountryPopulation> = self
            .countries
            .iter()
            .filter(|row| {
                query
                    .continent
                    .as_deref()
                    .is_none_or(|continent| row.continent.eq_ignore_ascii_case(continent.trim()))
            })
            .cloned()
            .collect();

        if let Some(key) = query.sort_by {
            let order = query.order.unwrap_or_default();
            rows.sort_by(|a, b| {
                let ordering = match key {
                    SortKey::Population => a.population.cmp(&b.population),
                    SortKey::GrowthRate => a
                        .growth_rate
                        .partial_cmp(&b.growth_rate)
                        .unwrap_or(Ordering::Equal),
                };
                match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit.max(0.0) as usize);
        }

        rows
    }

    /// Global totals within a year range.
    pub fn global(&self, range: &YearRange) -> Vec<GlobalPopulation> {
        self.global
            .iter()
            .filter(|row| {
                let year = f64::from(row.year);
                range.start_year.is_none_or(|start| year >= start)
                    && range.end_year.is_none_or(|end| year <= end)
            })
            .cloned()
            .collect()
    }
}

fn rows_to_value<T: Serialize>(rows: &[T]) -> std::result::Result<Value, HandlerError> {
    serde_json::to_value(rows).map_err(|e| HandlerError::Malformed(e.to_string()))
}

/// `population.countries`: per-country statistics.
#[derive(Debug, Clone)]
pub struct CountryPopulationHandler {
    data: Arc<PopulationData>,
}

impl CountryPopulationHandler {
    pub fn new(data: Arc<PopulationData>) -> Self {
        Self { data }
    }
}

#[async_trait]
impl ToolHandler for CountryPopulationHandler {
    async fn call(&self, args: &ValidatedValue) -> std::result::Result<Value, HandlerError> {
        let query: CountryQuery = args
            .parse()
            .map_err(|e| HandlerError::Rejected(e.to_string()))?;
        rows_to_value(&self.data.countries(&query))
    }
}

/// `population.global`: yearly world totals.
#[derive(Debug, Clone)]
pub struct GlobalPopulationHandler {
    data: Arc<PopulationData>,
}

impl GlobalPopulationHandler {
    pub fn new(data: Arc<PopulationData>) -> Self {
        Self { data }
    }
}

#[async_trait]
impl ToolHandler for GlobalPopulationHandler {
    async fn call(&self, args: &ValidatedValue) -> std::result::Result<Value, HandlerError> {
        let range: YearRange = args
            .parse()
            .map_err(|e| HandlerError::Rejected(e.to_string()))?;
        rows_to_value(&self.data.global(&range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn data() -> PopulationData {
        PopulationData::embedded().expect("embedded dataset decodes")
    }

    #[test]
    fn test_filter_by_continent() {
        let rows = data().countries(&CountryQuery {
            continent: Some("oceania".into()),
            ..Default::default()
        });
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|row| row.continent == "Oceania"));
    }

    #[test]
    fn test_sort_defaults_to_descending() {
        let rows = data().countries(&CountryQuery {
            sort_by: Some(SortKey::Population),
            limit: Some(2.0),
            ..Default::default()
        });
        let codes: Vec<&str> = rows.iter().map(|r| r.country_code.as_str()).collect();
        assert_eq!(codes, vec!["IND", "CHN"]);
    }

    #[test]
    fn test_sort_by_growth_ascending() {
        let rows = data().countries(&CountryQuery {
            continent: Some("Europe".into()),
            sort_by: Some(SortKey::GrowthRate),
            order: Some(SortOrder::Asc),
            ..Default::default()
        });
        let rates: Vec<f64> = rows.iter().map(|r| r.growth_rate).collect();
        let mut sorted = rates.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(rates, sorted);
    }

    #[test]
    fn test_limit_without_sort_keeps_dataset_order() {
        let all = data().countries(&CountryQuery::default());
        let limited = data().countries(&CountryQuery {
            limit: Some(3.7),
            ..Default::default()
        });
        assert_eq!(limited, all[..3].to_vec());
    }

    #[test]
    fn test_negative_limit_is_empty() {
        let rows = data().countries(&CountryQuery {
            limit: Some(-1.0),
            ..Default::default()
        });
        assert!(rows.is_empty());
    }

    #[test]
    fn test_global_year_range_is_inclusive() {
        let rows = data().global(&YearRange {
            start_year: Some(2020.0),
            end_year: Some(2022.0),
        });
        let years: Vec<u32> = rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2020, 2021, 2022]);
    }

    #[test]
    fn test_query_deserializes_from_tool_arguments() {
        let query: CountryQuery = serde_json::from_value(serde_json::json!({
            "continent": "Asia",
            "sortBy": "growthRate",
            "order": "asc",
            "limit": 5
        }))
        .unwrap();

        assert_eq!(query.sort_by, Some(SortKey::GrowthRate));
        assert_eq!(query.order, Some(SortOrder::Asc));
        assert_eq!(query.limit, Some(5.0));
    }
}
