pub mod activity;
pub mod advisory;
pub mod crop;
pub mod farm;
pub mod nullable;
pub mod timestamp;
pub mod user;

pub use activity::{Activity, ActivityPatch, ActivityStatus, ActivityType, NewActivity};
pub use advisory::{Advisory, AdvisoryCategory, AdvisoryPatch, NewAdvisory, Severity};
pub use crop::{Crop, CropPatch, CropStatus, NewCrop};
pub use farm::{Farm, FarmPatch, FarmStatus, FieldPlot, NewFarm};
pub use user::{
    ChangePasswordRequest, LoginRequest, ProfilePatch, RegisterRequest, User, UserProfile, UserSummary,
};

use serde::Serialize;
use uuid::Uuid;

use crate::database::repository::{to_document, OwnedEntity};
use crate::database::store::Document;
use crate::error::ApiError;

/// A create request for an owned entity.
pub trait NewRecord: Send {
    type Record: OwnedEntity;

    fn validate(&self) -> Result<(), ApiError>;

    /// Farm the new record will point at, checked for existence and ownership before insert.
    fn farm_ref(&self) -> Option<Uuid> {
        None
    }

    fn into_record(self, owner_id: Uuid) -> Self::Record;
}

/// A partial update. Absent fields are left untouched; an explicit `null` clears
/// the optional fields that are declared with `nullable`.
pub trait RecordPatch: Serialize + Send {
    fn validate(&self) -> Result<(), ApiError>;

    fn farm_ref(&self) -> Option<Uuid> {
        None
    }

    fn into_document(self) -> Result<Document, ApiError>
    where
        Self: Sized,
    {
        to_document(&self).map_err(ApiError::from)
    }
}
