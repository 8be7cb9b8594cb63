// flow/src/lib.rs

//! Storefront flow: small async pipelines of named steps.
//!
//! A [`Pipeline`] is an ordered list of steps. Every step may carry `before`,
//! `on` and `after` handlers, each an async function over a shared
//! [`ContextData`]. Handlers steer execution with [`PipelineControl`]:
//! `Continue` moves on, `Stop` halts the run with [`PipelineResult::Stopped`].
//!
//! Steps flagged optional tolerate both a missing handler and a failing one;
//! the failure is logged and the run moves to the next step. This is how
//! side channels such as notifications are kept off the success path of a
//! business operation.
//!
//! A [`FlowRegistry`] keeps one pipeline per context type, so callers only
//! build a context and hand it to [`FlowRegistry::run`].

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::handler::Handler;
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::Pipeline;

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::FlowRegistry;
