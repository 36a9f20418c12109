use serde_json::{Map, Value};

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterOrderInfo, FilterWhereInfo, SqlResult};

/// Equality conditions, ordering and limit for `find_many` against a document collection.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    where_data: Vec<FilterWhereInfo>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<usize>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: impl Into<String>, data: impl Into<Value>) -> Self {
        self.where_data.push(FilterWhereInfo {
            field: field.into(),
            data: data.into(),
        });
        self
    }

    pub fn order(mut self, order_spec: &str) -> Result<Self, FilterError> {
        self.order_data = FilterOrder::parse(order_spec)?;
        Ok(self)
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn conditions(&self) -> &[FilterWhereInfo] {
        &self.where_data
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        for condition in &self.where_data {
            Self::validate_field_name(&condition.field)?;
        }
        for info in &self.order_data {
            Self::validate_field_name(&info.field)?;
        }
        Ok(())
    }

    pub fn matches(&self, doc: &Map<String, Value>) -> bool {
        FilterWhere::matches(&self.where_data, doc)
    }

    /// Filter, order and truncate an in-memory set of documents.
    pub fn apply(&self, docs: impl IntoIterator<Item = Map<String, Value>>) -> Vec<Map<String, Value>> {
        let mut selected: Vec<_> = docs.into_iter().filter(|doc| self.matches(doc)).collect();
        FilterOrder::sort(&self.order_data, &mut selected);
        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }

    pub fn to_sql(&self, table_name: &str) -> Result<SqlResult, FilterError> {
        Self::validate_collection_name(table_name)?;
        self.validate()?;

        let (where_clause, params) = self.build_where_clause();
        let order_clause = FilterOrder::generate(&self.order_data);
        let limit_clause = self.limit.map(|l| format!("LIMIT {}", l)).unwrap_or_default();

        let query = [
            "SELECT doc".to_string(),
            format!("FROM \"{}\"", table_name),
            where_clause,
            order_clause,
            limit_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query, params })
    }

    pub fn to_delete_sql(&self, table_name: &str) -> Result<SqlResult, FilterError> {
        Self::validate_collection_name(table_name)?;
        self.validate()?;

        let (where_clause, params) = self.build_where_clause();
        let query = if where_clause.is_empty() {
            format!("DELETE FROM \"{}\"", table_name)
        } else {
            format!("DELETE FROM \"{}\" {}", table_name, where_clause)
        };
        Ok(SqlResult { query, params })
    }

    fn build_where_clause(&self) -> (String, Vec<Value>) {
        if self.where_data.is_empty() {
            return (String::new(), vec![]);
        }
        (
            "WHERE doc @> $1".to_string(),
            vec![FilterWhere::containment(&self.where_data)],
        )
    }

    pub fn validate_collection_name(name: &str) -> Result<(), FilterError> {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_lowercase() || first == '_' => {}
            _ => return Err(FilterError::InvalidCollection(name.to_string())),
        }
        if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
            return Err(FilterError::InvalidCollection(name.to_string()));
        }
        Ok(())
    }

    fn validate_field_name(name: &str) -> Result<(), FilterError> {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
            _ => return Err(FilterError::InvalidField(name.to_string())),
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(FilterError::InvalidField(name.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn select_sql_uses_containment_and_order() {
        let filter = Filter::new()
            .where_eq("ownerId", "u1")
            .where_eq("farmId", "f1")
            .order("date desc")
            .unwrap()
            .limit(10);

        let sql = filter.to_sql("activities").unwrap();
        assert_eq!(
            sql.query,
            "SELECT doc FROM \"activities\" WHERE doc @> $1 ORDER BY doc->>'date' DESC LIMIT 10"
        );
        assert_eq!(sql.params, vec![json!({"ownerId": "u1", "farmId": "f1"})]);
    }

    #[test]
    fn empty_filter_selects_everything() {
        let sql = Filter::new().to_sql("farms").unwrap();
        assert_eq!(sql.query, "SELECT doc FROM \"farms\"");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn delete_sql_shares_where_clause() {
        let sql = Filter::new().where_eq("farmId", "f1").to_delete_sql("crops").unwrap();
        assert_eq!(sql.query, "DELETE FROM \"crops\" WHERE doc @> $1");
    }

    #[test]
    fn rejects_injection_in_names() {
        assert!(Filter::new().to_sql("farms; DROP TABLE users").is_err());
        assert!(Filter::new().order("date'; --").is_err());
        let quoted = Filter::new().order("da'te desc").unwrap();
        assert!(quoted.to_sql("farms").is_err());
        let bad = Filter::new().where_eq("owner'Id", "x");
        assert!(bad.to_sql("farms").is_err());
    }

    #[test]
    fn apply_filters_sorts_and_limits() {
        let docs = vec![
            json!({"ownerId": "a", "createdAt": "2024-01-01"}),
            json!({"ownerId": "b", "createdAt": "2024-01-02"}),
            json!({"ownerId": "a", "createdAt": "2024-01-03"}),
            json!({"ownerId": "a", "createdAt": "2024-01-04"}),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap());

        let out = Filter::new()
            .where_eq("ownerId", "a")
            .order("createdAt desc")
            .unwrap()
            .limit(2)
            .apply(docs);

        let dates: Vec<&str> = out.iter().map(|d| d["createdAt"].as_str().unwrap()).collect();
        assert_eq!(dates, vec!["2024-01-04", "2024-01-03"]);
    }
}
