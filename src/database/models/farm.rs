use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{nullable, timestamp, NewRecord, RecordPatch};
use crate::database::repository::{Entity, OwnedEntity};
use crate::error::ApiError;
use crate::validation::FieldErrors;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FarmStatus {
    #[default]
    Active,
    Inactive,
}

/// A named sub-plot within a farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPlot {
    pub name: String,
    pub area: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planting_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harvest_date: Option<NaiveDate>,
    #[serde(default, rename = "yield", skip_serializing_if = "Option::is_none")]
    pub expected_yield: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub farm_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub total_area: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<String>,
    /// Main crop grown on the farm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
    #[serde(default)]
    pub status: FarmStatus,
    #[serde(default)]
    pub fields: Vec<FieldPlot>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Entity for Farm {
    const COLLECTION: &'static str = "farms";
    const LABEL: &'static str = "Farm";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl OwnedEntity for Farm {
    const OWNER_FIELD: &'static str = "ownerId";

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

fn check_plots(errors: &mut FieldErrors, plots: &Option<Vec<FieldPlot>>) {
    for (i, plot) in plots.iter().flatten().enumerate() {
        if plot.name.trim().is_empty() {
            errors.invalid(&format!("fields[{}].name", i), "Must not be empty");
        }
        errors.positive(&format!("fields[{}].area", i), Some(plot.area));
        errors.non_negative(&format!("fields[{}].yield", i), plot.expected_yield);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFarm {
    pub farm_name: Option<String>,
    pub location: Option<String>,
    pub total_area: Option<f64>,
    pub soil_type: Option<String>,
    pub crop: Option<String>,
    pub status: Option<FarmStatus>,
    pub fields: Option<Vec<FieldPlot>>,
}

impl NewRecord for NewFarm {
    type Record = Farm;

    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors
            .require_text("farmName", &self.farm_name)
            .require("totalArea", &self.total_area)
            .positive("totalArea", self.total_area);
        check_plots(&mut errors, &self.fields);
        errors.into_result()
    }

    fn into_record(self, owner_id: Uuid) -> Farm {
        let now = timestamp::now();
        Farm {
            id: Uuid::new_v4(),
            owner_id,
            farm_name: self.farm_name.unwrap_or_default().trim().to_string(),
            location: self.location,
            total_area: self.total_area.unwrap_or_default(),
            soil_type: self.soil_type,
            crop: self.crop,
            status: self.status.unwrap_or_default(),
            fields: self.fields.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_name: Option<String>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_area: Option<f64>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<Option<String>>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub crop: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FarmStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldPlot>>,
}

impl RecordPatch for FarmPatch {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors
            .not_blank("farmName", &self.farm_name)
            .positive("totalArea", self.total_area);
        check_plots(&mut errors, &self.fields);
        errors.into_result()
    }
}
