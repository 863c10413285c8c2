//! arkdb - A small, strict document store with collection validators and
//! secondary indexes

pub mod cli;
pub mod index;
pub mod observability;
pub mod schema;
pub mod setup;
pub mod store;
