use serde_json::{Map, Value};

use super::types::FilterWhereInfo;

pub struct FilterWhere;

impl FilterWhere {
    /// Build the JSONB containment document used as `doc @> $1`.
    pub fn containment(conditions: &[FilterWhereInfo]) -> Value {
        let mut object = Map::new();
        for condition in conditions {
            object.insert(condition.field.clone(), condition.data.clone());
        }
        Value::Object(object)
    }

    /// Every condition must equal the document's top-level field.
    pub fn matches(conditions: &[FilterWhereInfo], doc: &Map<String, Value>) -> bool {
        conditions
            .iter()
            .all(|condition| doc.get(&condition.field) == Some(&condition.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cond(field: &str, data: Value) -> FilterWhereInfo {
        FilterWhereInfo { field: field.to_string(), data }
    }

    #[test]
    fn matches_all_conditions() {
        let doc = json!({"ownerId": "u1", "isGlobal": true}).as_object().cloned().unwrap();
        assert!(FilterWhere::matches(&[cond("ownerId", json!("u1"))], &doc));
        assert!(FilterWhere::matches(
            &[cond("ownerId", json!("u1")), cond("isGlobal", json!(true))],
            &doc
        ));
        assert!(!FilterWhere::matches(&[cond("ownerId", json!("u2"))], &doc));
        assert!(!FilterWhere::matches(&[cond("missing", json!(null))], &doc));
    }

    #[test]
    fn containment_object_has_every_field() {
        let value = FilterWhere::containment(&[cond("farmId", json!("f1")), cond("ownerId", json!("u1"))]);
        assert_eq!(value, json!({"farmId": "f1", "ownerId": "u1"}));
    }
}
