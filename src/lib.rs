// Clippy allows for reasonable defaults
#![allow(clippy::new_without_default)] // Default not always appropriate for stateful types
#![allow(clippy::derivable_impls)] // Explicit Default impls can be clearer
#![allow(clippy::field_reassign_with_default)] // Builder pattern is clearer
#![allow(clippy::redundant_closure)] // |x| f(x) can be clearer than f

// Module declarations
pub mod client;
pub mod completion;
pub mod config;
pub mod crm;
pub mod diagnosis;
pub mod email;
pub mod narrative;
pub mod pipeline;
pub mod shutdown;
pub mod templates;
pub mod utils;

// Server module (HTTP API)
pub mod server;

pub use diagnosis::{DiagnosisField, DiagnosisState};
pub use pipeline::{PipelineServices, SubmissionOutcome, SubmissionPipeline};
