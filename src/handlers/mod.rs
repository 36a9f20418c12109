// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token). Advisory reads live in the
// public tier because global advisories are visible to anonymous callers.

pub mod protected;
pub mod public;
