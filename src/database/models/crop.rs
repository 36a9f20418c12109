use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{nullable, timestamp, NewRecord, RecordPatch};
use crate::database::repository::{Entity, OwnedEntity};
use crate::error::ApiError;
use crate::validation::FieldErrors;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropStatus {
    Planning,
    #[default]
    Growing,
    Harvested,
}

fn default_unit() -> String {
    "kg".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub farm_id: Uuid,
    pub crop_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
    pub planting_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_harvest_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_harvest_date: Option<NaiveDate>,
    pub area: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_yield: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_yield: Option<f64>,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default)]
    pub status: CropStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Entity for Crop {
    const COLLECTION: &'static str = "crops";
    const LABEL: &'static str = "Crop";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl OwnedEntity for Crop {
    const OWNER_FIELD: &'static str = "ownerId";

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCrop {
    pub farm_id: Option<Uuid>,
    pub crop_name: Option<String>,
    pub variety: Option<String>,
    pub planting_date: Option<NaiveDate>,
    pub expected_harvest_date: Option<NaiveDate>,
    pub actual_harvest_date: Option<NaiveDate>,
    pub area: Option<f64>,
    pub expected_yield: Option<f64>,
    pub actual_yield: Option<f64>,
    pub unit: Option<String>,
    pub season: Option<String>,
    pub status: Option<CropStatus>,
    pub notes: Option<String>,
}

impl NewRecord for NewCrop {
    type Record = Crop;

    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors
            .require("farmId", &self.farm_id)
            .require_text("cropName", &self.crop_name)
            .require("plantingDate", &self.planting_date)
            .require("area", &self.area)
            .positive("area", self.area)
            .non_negative("expectedYield", self.expected_yield)
            .non_negative("actualYield", self.actual_yield);
        errors.into_result()
    }

    fn farm_ref(&self) -> Option<Uuid> {
        self.farm_id
    }

    fn into_record(self, owner_id: Uuid) -> Crop {
        let now = timestamp::now();
        Crop {
            id: Uuid::new_v4(),
            owner_id,
            farm_id: self.farm_id.unwrap_or_default(),
            crop_name: self.crop_name.unwrap_or_default().trim().to_string(),
            variety: self.variety,
            planting_date: self.planting_date.unwrap_or_else(|| now.date_naive()),
            expected_harvest_date: self.expected_harvest_date,
            actual_harvest_date: self.actual_harvest_date,
            area: self.area.unwrap_or_default(),
            expected_yield: self.expected_yield,
            actual_yield: self.actual_yield,
            unit: self.unit.unwrap_or_else(default_unit),
            season: self.season,
            status: self.status.unwrap_or_default(),
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Crops stay on the farm they were planted on, so `farmId` is not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_name: Option<String>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub variety: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planting_date: Option<NaiveDate>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub expected_harvest_date: Option<Option<NaiveDate>>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub actual_harvest_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub expected_yield: Option<Option<f64>>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub actual_yield: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub season: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CropStatus>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl RecordPatch for CropPatch {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors
            .not_blank("cropName", &self.crop_name)
            .positive("area", self.area)
            .non_negative("expectedYield", self.expected_yield.flatten())
            .non_negative("actualYield", self.actual_yield.flatten());
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_unit_and_status() {
        let input: NewCrop = serde_json::from_value(json!({
            "farmId": Uuid::new_v4(),
            "cropName": "Maize",
            "plantingDate": "2024-03-15",
            "area": 2
        }))
        .unwrap();
        assert!(input.validate().is_ok());
        let crop = input.into_record(Uuid::new_v4());
        assert_eq!(crop.unit, "kg");
        assert_eq!(crop.status, CropStatus::Growing);
        assert_eq!(crop.planting_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn rejects_negative_yield() {
        let patch: CropPatch = serde_json::from_value(json!({"actualYield": -5})).unwrap();
        assert!(patch.validate().is_err());
    }
}
