//! sea-orm entities for the auth service tables.

pub mod forgot_passwords;
pub mod user_access;
pub mod users;
