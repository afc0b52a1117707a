// FICHIER : server/src/json_db/query/executor.rs

use crate::json_db::collections::manager::CollectionsManager;
use crate::json_db::query::{
    ComparisonOperator, Condition, FilterOperator, Query, QueryFilter, QueryResult, SortField,
    SortOrder,
};
use anyhow::Result;
use serde_json::Value;
use std::cmp::Ordering;

// --- MOTEUR DE REQUÊTE ---

pub struct QueryEngine<'a> {
    manager: &'a CollectionsManager<'a>,
}

impl<'a> QueryEngine<'a> {
    pub fn new(manager: &'a CollectionsManager<'a>) -> Self {
        Self { manager }
    }

    pub async fn execute_query(&self, query: Query) -> Result<QueryResult> {
        // 1. CHARGEMENT (Full Scan)
        let mut documents = self.manager.list_all(&query.collection).await?;

        // 2. FILTRAGE
        if let Some(filter) = &query.filter {
            documents.retain(|doc| evaluate_filter(doc, filter));
        }

        // 3. TRI
        if let Some(sort_fields) = &query.sort {
            documents.sort_by(|a, b| compare_docs(a, b, sort_fields));
        }

        let total_count = documents.len() as u64;
        let offset = query.offset.unwrap_or(0);
        let limit = query.limit.unwrap_or(documents.len());

        // 4. PAGINATION
        let paged_docs: Vec<Value> = documents.into_iter().skip(offset).take(limit).collect();

        Ok(QueryResult {
            documents: paged_docs,
            total_count,
            offset: Some(offset),
            limit: Some(limit),
        })
    }
}

// --- LOGIQUE D'ÉVALUATION ---

fn evaluate_filter(document: &Value, filter: &QueryFilter) -> bool {
    match filter.operator {
        FilterOperator::And => filter
            .conditions
            .iter()
            .all(|c| evaluate_condition(document, c)),
        FilterOperator::Or => filter
            .conditions
            .iter()
            .any(|c| evaluate_condition(document, c)),
        FilterOperator::Not => !filter
            .conditions
            .iter()
            .any(|c| evaluate_condition(document, c)),
    }
}

fn evaluate_condition(document: &Value, condition: &Condition) -> bool {
    let val = get_field_value(document, &condition.field);
    let expected = &condition.value;

    match condition.operator {
        ComparisonOperator::Eq => values_equal(val, Some(expected)),
        ComparisonOperator::Ne => !values_equal(val, Some(expected)),
        ComparisonOperator::Gt => compare_json_values(val, Some(expected)) == Ordering::Greater,
        ComparisonOperator::Gte => compare_json_values(val, Some(expected)) != Ordering::Less,
        ComparisonOperator::Lt => compare_json_values(val, Some(expected)) == Ordering::Less,
        ComparisonOperator::Lte => compare_json_values(val, Some(expected)) != Ordering::Greater,
        ComparisonOperator::In => match (val, expected.as_array()) {
            (Some(v), Some(list)) => list.iter().any(|item| values_equal(Some(v), Some(item))),
            _ => false,
        },
        ComparisonOperator::Contains => match (val, expected) {
            (Some(Value::String(s)), Value::String(sub)) => {
                s.to_lowercase().contains(&sub.to_lowercase())
            }
            (Some(Value::Array(arr)), v) => arr.contains(v),
            _ => false,
        },
        ComparisonOperator::StartsWith => match (val, expected) {
            (Some(Value::String(s)), Value::String(prefix)) => s.starts_with(prefix.as_str()),
            _ => false,
        },
        ComparisonOperator::EndsWith => match (val, expected) {
            (Some(Value::String(s)), Value::String(suffix)) => s.ends_with(suffix.as_str()),
            _ => false,
        },
    }
}

/// Accès par chemin pointé ("aliasSet.defaultAlias.name")
fn get_field_value<'b>(doc: &'b Value, path: &str) -> Option<&'b Value> {
    path.split('.')
        .try_fold(doc, |current, part| current.as_object()?.get(part))
}

fn values_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (Some(v1), Some(v2)) => {
            if v1 == v2 {
                return true;
            }
            if let (Some(n1), Some(n2)) = (v1.as_f64(), v2.as_f64()) {
                return (n1 - n2).abs() < f64::EPSILON;
            }
            false
        }
        (None, None) => true,
        _ => false,
    }
}

fn compare_docs(a: &Value, b: &Value, sort_fields: &[SortField]) -> Ordering {
    for s in sort_fields {
        let cmp = compare_json_values(get_field_value(a, &s.field), get_field_value(b, &s.field));
        if cmp != Ordering::Equal {
            return match s.order {
                SortOrder::Asc => cmp,
                SortOrder::Desc => cmp.reverse(),
            };
        }
    }
    Ordering::Equal
}

fn compare_json_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(v1), Some(v2)) => {
            if let (Some(n1), Some(n2)) = (v1.as_f64(), v2.as_f64()) {
                return n1.partial_cmp(&n2).unwrap_or(Ordering::Equal);
            }
            if let (Some(s1), Some(s2)) = (v1.as_str(), v2.as_str()) {
                return s1.cmp(s2);
            }
            if let (Some(b1), Some(b2)) = (v1.as_bool(), v2.as_bool()) {
                return b1.cmp(&b2);
            }
            Ordering::Equal
        }
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
