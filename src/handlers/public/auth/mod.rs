// handlers/public/auth/mod.rs - Token acquisition endpoints (no authentication)

pub mod login;
pub mod register;

pub use login::login;
pub use register::register;
