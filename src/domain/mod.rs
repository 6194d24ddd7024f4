//! Domain layer: schemas, collection state and the pure turn logic.

pub mod collection;
pub mod foundation;
pub mod schema;
