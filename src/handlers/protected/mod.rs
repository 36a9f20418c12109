// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every handler takes an `AuthUser` before its path and body extractors, so a
// request without a valid token is answered with 401 before anything else runs.
// Records are scoped to their owner by `OwnedCrud`.

pub mod activities;
pub mod advisories;
pub mod analytics;
pub mod auth;
pub mod crops;
pub mod farms;
