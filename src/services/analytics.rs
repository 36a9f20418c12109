use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::database::models::{Activity, ActivityType, Farm};
use crate::database::DocumentStore;
use crate::error::ApiError;
use crate::filter::Filter;
use crate::middleware::AuthUser;
use crate::services::OwnedCrud;

const UNSPECIFIED_CROP: &str = "unspecified";
const TIMELINE_MONTHS: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropArea {
    pub crop: String,
    pub area: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCount {
    /// `YYYY-MM`
    pub month: String,
    pub activities: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropYield {
    pub crop: String,
    pub quantity: f64,
    pub yield_per_hectare: f64,
}

/// Per-user totals for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub farm_count: usize,
    pub total_area: f64,
    pub activity_count: usize,
    pub area_by_crop: Vec<CropArea>,
    pub activities_by_type: BTreeMap<String, usize>,
    pub activities_by_status: BTreeMap<String, usize>,
    /// The most recent months that have any activity, oldest first.
    pub activity_timeline: Vec<MonthCount>,
    /// Harvest quantities grouped by the main crop of the farm they were recorded on.
    pub yield_by_crop: Vec<CropYield>,
}

pub async fn summary_for(store: Arc<dyn DocumentStore>, user: &AuthUser) -> Result<AnalyticsSummary, ApiError> {
    let farms = OwnedCrud::<Farm>::new(store.clone());
    let activities = OwnedCrud::<Activity>::new(store);

    let (farms, activities) = futures::try_join!(
        farms.list(user, Filter::new()),
        activities.list(user, Filter::new()),
    )?;
    Ok(summarize(&farms, &activities))
}

pub fn summarize(farms: &[Farm], activities: &[Activity]) -> AnalyticsSummary {
    let crop_of = |farm: &Farm| farm.crop.clone().unwrap_or_else(|| UNSPECIFIED_CROP.to_string());

    let mut area_by_crop: BTreeMap<String, f64> = BTreeMap::new();
    for farm in farms {
        *area_by_crop.entry(crop_of(farm)).or_default() += farm.total_area;
    }

    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_month: BTreeMap<String, usize> = BTreeMap::new();
    for activity in activities {
        *by_type.entry(activity.activity_type.to_string()).or_default() += 1;
        *by_status.entry(activity.status.as_str().to_string()).or_default() += 1;
        *by_month.entry(activity.date.format("%Y-%m").to_string()).or_default() += 1;
    }

    let skip = by_month.len().saturating_sub(TIMELINE_MONTHS);
    let activity_timeline = by_month
        .into_iter()
        .skip(skip)
        .map(|(month, activities)| MonthCount { month, activities })
        .collect();

    // (quantity, area) per crop
    let mut harvests: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for harvest in activities
        .iter()
        .filter(|a| a.activity_type == ActivityType::Harvesting)
    {
        let Some(farm) = farms.iter().find(|f| f.id == harvest.farm_id) else {
            continue;
        };
        let entry = harvests.entry(crop_of(farm)).or_default();
        entry.0 += harvest.quantity.unwrap_or(0.0);
        entry.1 += farm.total_area;
    }

    AnalyticsSummary {
        farm_count: farms.len(),
        total_area: round2(farms.iter().map(|f| f.total_area).sum()),
        activity_count: activities.len(),
        area_by_crop: area_by_crop
            .into_iter()
            .map(|(crop, area)| CropArea { crop, area: round2(area) })
            .collect(),
        activities_by_type: by_type,
        activities_by_status: by_status,
        activity_timeline,
        yield_by_crop: harvests
            .into_iter()
            .map(|(crop, (quantity, area))| CropYield {
                crop,
                quantity: round2(quantity),
                yield_per_hectare: if area > 0.0 { round2(quantity / area) } else { 0.0 },
            })
            .collect(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
