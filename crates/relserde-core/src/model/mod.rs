//! Runtime entity metadata.
//!
//! Types in `model` are the declarative description of mapped entities: one
//! `EntityModel` per mapped type and one `EntityFieldModel` per mapped
//! property. They are declared as `static` items and never mutated.
//!
//! In general:
//! - `model` defines *what is mapped*
//! - `catalog` indexes it for lookups
pub mod entity;
pub mod field;
