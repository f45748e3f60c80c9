//! Flowdesk domain model and pure workflow logic.
//!
//! Everything in this crate is I/O free: the field and template data model,
//! the synchronous field-validation gate, the execution progress state
//! machine, and the typed form values collected for a run. Network access,
//! persistence, and HTTP plumbing live in the `flowdesk-engine`,
//! `flowdesk-store`, and `flowdesk-api` crates.

pub mod error;
pub mod field;
pub mod progress;
pub mod template;
pub mod types;
pub mod validate;
pub mod value;
