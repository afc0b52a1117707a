//! Moteur de requêtes JSON

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod executor;

pub use executor::QueryEngine;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    pub collection: String,
    pub filter: Option<QueryFilter>,
    pub sort: Option<Vec<SortField>>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl Query {
    pub fn new(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            filter: None,
            sort: None,
            limit: None,
            offset: None,
        }
    }

    /// Ajoute une condition combinée en ET (équivalent `where(field, value)`).
    pub fn where_eq(mut self, field: &str, value: Value) -> Self {
        let cond = Condition::eq(field, value);
        match &mut self.filter {
            Some(f) if f.operator == FilterOperator::And => f.conditions.push(cond),
            _ => {
                self.filter = Some(QueryFilter {
                    operator: FilterOperator::And,
                    conditions: vec![cond],
                })
            }
        }
        self
    }

    pub fn order_by(mut self, field: &str, order: SortOrder) -> Self {
        self.sort.get_or_insert_with(Vec::new).push(SortField {
            field: field.to_string(),
            order,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryFilter {
    pub operator: FilterOperator,
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    And,
    Or,
    Not,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: ComparisonOperator,
    pub value: Value,
}

impl Condition {
    pub fn eq(field: &str, value: Value) -> Self {
        Self {
            field: field.to_string(),
            operator: ComparisonOperator::Eq,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Contains,
    StartsWith,
    EndsWith,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub documents: Vec<Value>,
    pub total_count: u64,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}
