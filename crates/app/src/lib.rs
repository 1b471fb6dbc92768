//! Shared application domain, persistence and payment modules.

pub mod context;
pub mod database;
pub mod domain;
pub mod payments;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
