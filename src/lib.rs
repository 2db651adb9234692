pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod scheduler;
pub mod services;

#[cfg(test)]
pub mod testing;

pub use error::{Entity, PlannerError};
