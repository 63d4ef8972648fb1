pub mod assignments;
pub mod board;
mod error;
pub mod models;
pub mod money;
pub mod ports;
pub mod services;
pub mod sub_tasks;
pub mod validation;
pub mod valuation;

pub use error::HubError;
