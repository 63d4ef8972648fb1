//! ProjectHub: clients, contractors, and the projects and tasks they work on.
//!
//! The [`domain`] module holds the records, the valuation rules and the
//! services; [`adapters`] provides the storage they run on. [`ProjectHub`]
//! wires the two together.

pub mod adapters;
pub mod domain;
mod factory;

pub use domain::HubError;
pub use factory::ProjectHub;
