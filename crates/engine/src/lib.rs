//! Flowdesk execution engine.
//!
//! Turns a workflow template plus validated form state into one end-to-end
//! run: request building ([`request`]), the network call, content-type
//! driven response classification ([`classify`]), and result rendering
//! ([`render`]), orchestrated by the [`executor`] behind a four-step
//! progress machine. Binary results live in the process-local
//! [`object_url::ObjectStore`] until the run is discarded or superseded.

pub mod classify;
pub mod error;
pub mod executor;
pub mod feedback;
pub mod object_url;
pub mod render;
pub mod request;
pub mod transform;

pub use classify::WorkflowResult;
pub use error::EngineError;
pub use executor::{Execution, WorkflowExecutor};
pub use feedback::{Feedback, FeedbackClient};
pub use object_url::{ObjectStore, ObjectUrl};
pub use render::render;
pub use transform::TransformRegistry;
