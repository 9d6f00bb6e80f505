//! product-schema - declarative product content schema
//!
//! Descriptors for the `product` and `category` document types, a validator
//! that reports every violation of a document in one pass, and recomputation
//! of read-only derived fields.

pub mod cli;
pub mod observability;
pub mod schema;
