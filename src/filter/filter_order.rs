use serde_json::{Map, Value};
use std::cmp::Ordering;

use super::error::FilterError;
use super::types::{FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Parse an order string such as `"date desc, createdAt desc"`.
    pub fn parse(spec: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let mut out = Vec::new();
        for part in spec.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let mut it = trimmed.split_whitespace();
            let field = it
                .next()
                .ok_or_else(|| FilterError::InvalidOrder(trimmed.to_string()))?;
            let sort = match it.next() {
                None => SortDirection::Asc,
                Some(dir) if dir.eq_ignore_ascii_case("asc") => SortDirection::Asc,
                Some(dir) if dir.eq_ignore_ascii_case("desc") => SortDirection::Desc,
                Some(other) => {
                    return Err(FilterError::InvalidOrder(format!(
                        "unknown direction '{}' for '{}'",
                        other, field
                    )))
                }
            };
            if it.next().is_some() {
                return Err(FilterError::InvalidOrder(trimmed.to_string()));
            }
            out.push(FilterOrderInfo {
                field: field.to_string(),
                sort,
            });
        }
        Ok(out)
    }

    /// `ORDER BY` over JSONB text projections. Field names must already be validated.
    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("doc->>'{}' {}", i.field, i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }

    /// In-memory counterpart of [`FilterOrder::generate`]. Stable; missing fields sort first
    /// ascending and last descending.
    pub fn sort(infos: &[FilterOrderInfo], docs: &mut [Map<String, Value>]) {
        if infos.is_empty() {
            return;
        }
        docs.sort_by(|a, b| {
            for info in infos {
                let ord = compare_fields(a.get(&info.field), b.get(&info.field));
                let ord = match info.sort {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }
}

fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare_values(a, b),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn parses_multiple_columns() {
        let infos = FilterOrder::parse("date desc, createdAt").unwrap();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].field, "date");
        assert_eq!(infos[0].sort, SortDirection::Desc);
        assert_eq!(infos[1].sort, SortDirection::Asc);
    }

    #[test]
    fn rejects_unknown_direction() {
        assert!(FilterOrder::parse("date sideways").is_err());
    }

    #[test]
    fn generates_jsonb_order_clause() {
        let infos = FilterOrder::parse("date desc").unwrap();
        assert_eq!(FilterOrder::generate(&infos), "ORDER BY doc->>'date' DESC");
    }

    #[test]
    fn sorts_descending_with_tiebreak() {
        let mut docs = vec![
            doc(json!({"date": "2024-03-01", "n": 1})),
            doc(json!({"date": "2024-05-01", "n": 2})),
            doc(json!({"date": "2024-03-01", "n": 3})),
        ];
        let infos = FilterOrder::parse("date desc, n desc").unwrap();
        FilterOrder::sort(&infos, &mut docs);
        let order: Vec<i64> = docs.iter().map(|d| d["n"].as_i64().unwrap()).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn numbers_compare_numerically() {
        let mut docs = vec![doc(json!({"a": 10})), doc(json!({"a": 9.5}))];
        FilterOrder::sort(&FilterOrder::parse("a").unwrap(), &mut docs);
        assert_eq!(docs[0]["a"], json!(9.5));
    }
}
