//! Example Resolver.
//!
//! Picks concrete values for parameters and request bodies through an ordered
//! chain of [`ResolutionStrategy`]s: declared example, default, enum, format
//! hint, then a type-driven placeholder. Resolution never fails and is pure,
//! so the same operation always yields the same request.

mod request;
mod resolver;
mod schema;

pub use request::*;
pub use resolver::*;
pub use schema::{binary_properties, flatten_schema, schema_fields, schema_type, SchemaField};
