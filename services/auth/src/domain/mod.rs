pub mod notification;
pub mod repository;
pub mod throttle;
pub mod types;
pub mod validation;
