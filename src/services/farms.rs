use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::database::models::{Activity, Crop, Farm};
use crate::database::{DocumentStore, Repository};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::middleware::AuthUser;
use crate::services::OwnedCrud;

/// Outcome of deleting a farm together with the records that point at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FarmRemoval {
    pub farm_id: Uuid,
    pub activities_removed: u64,
    pub crops_removed: u64,
}

/// Delete a farm and its activities and crops. Children go first, so a
/// failure part-way leaves the farm in place and the call can be retried.
pub async fn delete_farm(store: Arc<dyn DocumentStore>, user: &AuthUser, farm_id: Uuid) -> Result<FarmRemoval, ApiError> {
    let farms = OwnedCrud::<Farm>::new(store.clone());
    farms.load_owned(user, farm_id).await?;

    let children = Filter::new().where_eq("farmId", farm_id.to_string());
    let activities_removed = Repository::<Activity>::new(store.clone())
        .delete_many(&children)
        .await?;
    let crops_removed = Repository::<Crop>::new(store).delete_many(&children).await?;

    farms.delete(user, farm_id).await?;
    info!(
        "User {} deleted farm {} ({} activities, {} crops)",
        user.user_id, farm_id, activities_removed, crops_removed
    );

    Ok(FarmRemoval {
        farm_id,
        activities_removed,
        crops_removed,
    })
}
