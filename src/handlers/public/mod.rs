// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and the read side of global advisories.

pub mod advisories;
pub mod auth;
