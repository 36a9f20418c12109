use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::database::models::{Farm, NewRecord, RecordPatch};
use crate::database::{DocumentStore, OwnedEntity, Repository};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::middleware::AuthUser;

/// Create/list/get/update/delete for records that belong to one user.
///
/// Every operation runs in the same order: validate the input, check any
/// referenced farm, load the target and check ownership, then persist.
/// A missing record is reported before a foreign one.
pub struct OwnedCrud<R> {
    records: Repository<R>,
    farms: Repository<Farm>,
}

impl<R: OwnedEntity> OwnedCrud<R> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            records: Repository::new(store.clone()),
            farms: Repository::new(store),
        }
    }

    pub fn repository(&self) -> &Repository<R> {
        &self.records
    }

    pub async fn create<N>(&self, user: &AuthUser, input: N) -> Result<R, ApiError>
    where
        N: NewRecord<Record = R>,
    {
        input.validate()?;
        if let Some(farm_id) = input.farm_ref() {
            self.require_owned_farm(user, farm_id).await?;
        }

        let record = input.into_record(user.user_id);
        let created = self.records.create(&record).await?;
        debug!("Created {} {} for user {}", R::LABEL, created.id(), user.user_id);
        Ok(created)
    }

    /// The caller's records matching `filter`, which should carry an order.
    pub async fn list(&self, user: &AuthUser, filter: Filter) -> Result<Vec<R>, ApiError> {
        let filter = filter.where_eq(R::OWNER_FIELD, user.user_id.to_string());
        Ok(self.records.find_many(&filter).await?)
    }

    pub async fn get(&self, user: &AuthUser, id: Uuid) -> Result<R, ApiError> {
        self.load_owned(user, id).await
    }

    pub async fn update<P>(&self, user: &AuthUser, id: Uuid, patch: P) -> Result<R, ApiError>
    where
        P: RecordPatch,
    {
        patch.validate()?;
        self.load_owned(user, id).await?;
        if let Some(farm_id) = patch.farm_ref() {
            self.require_owned_farm(user, farm_id).await?;
        }

        let doc = patch.into_document()?;
        // Gone between the ownership check and the write.
        self.records
            .update(id, doc)
            .await?
            .ok_or_else(Self::not_found)
    }

    /// Delete and return the removed record.
    pub async fn delete(&self, user: &AuthUser, id: Uuid) -> Result<R, ApiError> {
        let record = self.load_owned(user, id).await?;
        if !self.records.delete(id).await? {
            return Err(Self::not_found());
        }
        debug!("Deleted {} {} for user {}", R::LABEL, id, user.user_id);
        Ok(record)
    }

    pub async fn load_owned(&self, user: &AuthUser, id: Uuid) -> Result<R, ApiError> {
        let record = self
            .records
            .find_by_id(id)
            .await?
            .ok_or_else(Self::not_found)?;

        if record.owner_id() != user.user_id {
            warn!("User {} denied access to {} {}", user.user_id, R::LABEL, id);
            return Err(ApiError::forbidden(format!(
                "Not authorized to access this {}",
                R::LABEL.to_lowercase()
            )));
        }
        Ok(record)
    }

    async fn require_owned_farm(&self, user: &AuthUser, farm_id: Uuid) -> Result<Farm, ApiError> {
        let farm = self
            .farms
            .find_by_id(farm_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Farm not found"))?;

        if farm.owner_id != user.user_id {
            warn!("User {} referenced farm {} owned by someone else", user.user_id, farm_id);
            return Err(ApiError::forbidden("Not authorized to use this farm"));
        }
        Ok(farm)
    }

    fn not_found() -> ApiError {
        ApiError::not_found(format!("{} not found", R::LABEL))
    }
}
