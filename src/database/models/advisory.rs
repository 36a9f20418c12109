use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::database::models::{nullable, timestamp, NewRecord, RecordPatch};
use crate::database::repository::{Entity, OwnedEntity};
use crate::error::ApiError;
use crate::validation::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryCategory {
    Weather,
    Pest,
    Disease,
    Fertilizer,
    Irrigation,
    General,
}

impl AdvisoryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryCategory::Weather => "weather",
            AdvisoryCategory::Pest => "pest",
            AdvisoryCategory::Disease => "disease",
            AdvisoryCategory::Fertilizer => "fertilizer",
            AdvisoryCategory::Irrigation => "irrigation",
            AdvisoryCategory::General => "general",
        }
    }
}

impl FromStr for AdvisoryCategory {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weather" => Ok(AdvisoryCategory::Weather),
            "pest" => Ok(AdvisoryCategory::Pest),
            "disease" => Ok(AdvisoryCategory::Disease),
            "fertilizer" => Ok(AdvisoryCategory::Fertilizer),
            "irrigation" => Ok(AdvisoryCategory::Irrigation),
            "general" => Ok(AdvisoryCategory::General),
            _ => Err(ApiError::bad_request(format!("Unknown advisory category: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    pub id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub category: AdvisoryCategory,
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_action: Option<String>,
    /// Crops the advisory applies to. Empty means any crop.
    #[serde(default)]
    pub crops: Vec<String>,
    /// Global advisories are readable by anyone, including anonymous callers.
    #[serde(default = "default_true")]
    pub is_global: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Entity for Advisory {
    const COLLECTION: &'static str = "advisories";
    const LABEL: &'static str = "Advisory";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl OwnedEntity for Advisory {
    const OWNER_FIELD: &'static str = "createdBy";

    fn owner_id(&self) -> Uuid {
        self.created_by
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdvisory {
    pub title: Option<String>,
    pub category: Option<AdvisoryCategory>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub recommended_action: Option<String>,
    pub crops: Option<Vec<String>>,
    pub is_global: Option<bool>,
}

impl NewRecord for NewAdvisory {
    type Record = Advisory;

    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors
            .require_text("title", &self.title)
            .require("category", &self.category)
            .require_text("description", &self.description);
        errors.into_result()
    }

    fn into_record(self, owner_id: Uuid) -> Advisory {
        let now = timestamp::now();
        Advisory {
            id: Uuid::new_v4(),
            created_by: owner_id,
            title: self.title.unwrap_or_default().trim().to_string(),
            category: self.category.unwrap_or(AdvisoryCategory::General),
            description: self.description.unwrap_or_default(),
            severity: self.severity.unwrap_or_default(),
            recommended_action: self.recommended_action,
            crops: self.crops.unwrap_or_default(),
            is_global: self.is_global.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<AdvisoryCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub recommended_action: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crops: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_global: Option<bool>,
}

impl RecordPatch for AdvisoryPatch {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors
            .not_blank("title", &self.title)
            .not_blank("description", &self.description);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_to_global_medium() {
        let input: NewAdvisory = serde_json::from_value(json!({
            "title": "Fall armyworm",
            "category": "pest",
            "description": "Scout maize fields twice a week."
        }))
        .unwrap();
        assert!(input.validate().is_ok());
        let advisory = input.into_record(Uuid::new_v4());
        assert!(advisory.is_global);
        assert_eq!(advisory.severity, Severity::Medium);

        let value = serde_json::to_value(&advisory).unwrap();
        assert_eq!(value["isGlobal"], true);
        assert_eq!(value["createdBy"], json!(advisory.created_by));
    }

    #[test]
    fn category_path_segment_parses() {
        assert_eq!("Weather".parse::<AdvisoryCategory>().unwrap(), AdvisoryCategory::Weather);
        assert!("volcano".parse::<AdvisoryCategory>().is_err());
    }
}
