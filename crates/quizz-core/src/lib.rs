//! Service plumbing shared by Quizz services: env config, tracing setup,
//! request-id middleware and health handlers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod tracing;
