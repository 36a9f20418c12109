use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::database::models::{nullable, timestamp, NewRecord, RecordPatch};
use crate::database::repository::{Entity, OwnedEntity};
use crate::error::ApiError;
use crate::validation::FieldErrors;

/// Fixed activity vocabulary. Deserialization also accepts the labels shown in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ActivityType {
    Sowing,
    Irrigation,
    Fertilizing,
    Pesticide,
    Weeding,
    Harvesting,
    Other,
}

impl ActivityType {
    pub const ALL: [ActivityType; 7] = [
        ActivityType::Sowing,
        ActivityType::Irrigation,
        ActivityType::Fertilizing,
        ActivityType::Pesticide,
        ActivityType::Weeding,
        ActivityType::Harvesting,
        ActivityType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Sowing => "sowing",
            ActivityType::Irrigation => "irrigation",
            ActivityType::Fertilizing => "fertilizing",
            ActivityType::Pesticide => "pesticide",
            ActivityType::Weeding => "weeding",
            ActivityType::Harvesting => "harvesting",
            ActivityType::Other => "other",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sowing" | "planting" => Ok(ActivityType::Sowing),
            "irrigation" => Ok(ActivityType::Irrigation),
            "fertilizing" | "fertiliser application" | "fertilizer application" => {
                Ok(ActivityType::Fertilizing)
            }
            "pesticide" | "pesticide application" => Ok(ActivityType::Pesticide),
            "weeding" => Ok(ActivityType::Weeding),
            "harvesting" | "harvest" => Ok(ActivityType::Harvesting),
            "other" | "land preparation" | "pruning" => Ok(ActivityType::Other),
            _ => Err(format!("unknown activity type '{}'", s)),
        }
    }
}

impl TryFrom<String> for ActivityType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    #[default]
    Pending,
    Completed,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Pending => "pending",
            ActivityStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub farm_id: Uuid,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub status: ActivityStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Entity for Activity {
    const COLLECTION: &'static str = "activities";
    const LABEL: &'static str = "Activity";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl OwnedEntity for Activity {
    const OWNER_FIELD: &'static str = "ownerId";

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    pub farm_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub activity_type: Option<ActivityType>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub status: Option<ActivityStatus>,
}

impl NewRecord for NewActivity {
    type Record = Activity;

    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors
            .require("farmId", &self.farm_id)
            .require("type", &self.activity_type)
            .require("date", &self.date)
            .non_negative("quantity", self.quantity);
        errors.into_result()
    }

    fn farm_ref(&self) -> Option<Uuid> {
        self.farm_id
    }

    fn into_record(self, owner_id: Uuid) -> Activity {
        let now = timestamp::now();
        Activity {
            id: Uuid::new_v4(),
            owner_id,
            farm_id: self.farm_id.unwrap_or_default(),
            activity_type: self.activity_type.unwrap_or(ActivityType::Other),
            date: self.date.unwrap_or_else(|| now.date_naive()),
            description: self.description,
            notes: self.notes,
            quantity: self.quantity,
            unit: self.unit,
            status: self.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<Uuid>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<ActivityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Option<f64>>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub unit: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,
}

impl RecordPatch for ActivityPatch {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors.non_negative("quantity", self.quantity.flatten());
        errors.into_result()
    }

    fn farm_ref(&self) -> Option<Uuid> {
        self.farm_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ui_labels_map_onto_vocabulary() {
        let cases = [
            ("Harvest", ActivityType::Harvesting),
            ("Fertiliser Application", ActivityType::Fertilizing),
            ("Pesticide Application", ActivityType::Pesticide),
            ("Land Preparation", ActivityType::Other),
            ("Pruning", ActivityType::Other),
            ("irrigation", ActivityType::Irrigation),
        ];
        for (label, expected) in cases {
            assert_eq!(label.parse::<ActivityType>().unwrap(), expected, "{}", label);
        }
        assert!("juggling".parse::<ActivityType>().is_err());
    }

    #[test]
    fn type_serializes_lowercase() {
        let parsed: ActivityType = serde_json::from_value(json!("Harvest")).unwrap();
        assert_eq!(serde_json::to_value(parsed).unwrap(), json!("harvesting"));
        for t in ActivityType::ALL {
            assert_eq!(serde_json::to_value(t).unwrap(), json!(t.as_str()));
        }
    }

    #[test]
    fn new_activity_lists_missing_fields() {
        let input: NewActivity = serde_json::from_value(json!({"notes": "n"})).unwrap();
        match input.validate() {
            Err(ApiError::ValidationError { message, .. }) => {
                assert_eq!(message, "Missing required fields: farmId, type, date");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn notes_only_patch_touches_nothing_else() {
        let patch: ActivityPatch = serde_json::from_value(json!({"notes": "second pass"})).unwrap();
        let doc = patch.into_document().unwrap();
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["notes"]);
    }
}
