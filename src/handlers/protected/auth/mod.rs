// handlers/protected/auth/mod.rs - Account management for the authenticated user

pub mod profile;

pub use profile::{change_password, profile_get, profile_put};
