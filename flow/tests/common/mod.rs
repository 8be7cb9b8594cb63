// flow/tests/common/mod.rs
#![allow(dead_code)]

use once_cell::sync::Lazy;
use storefront_flow::core::handler::HandlerFuture;
use storefront_flow::{ContextData, FlowError, PipelineControl};
use tracing::Level;

#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub trail: Vec<String>,
  pub stop_at: Option<String>,
  pub skip_audit: bool,
}

#[derive(Clone, Debug, Default)]
pub struct OtherContext {
  pub touched: bool,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("flow error: {0}")]
  Flow(String),

  #[error("handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(err: FlowError) -> Self {
    TestError::Flow(format!("{:?}", err))
  }
}

/// Appends `label` to the trail and bumps the counter; stops when `stop_at` names the label.
pub fn recording(label: &'static str) -> impl Fn(ContextData<TestContext>) -> HandlerFuture<TestError> + Send + Sync + 'static {
  move |ctx: ContextData<TestContext>| -> HandlerFuture<TestError> {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.trail.push(label.to_string());
      tracing::debug!(target: "test_handlers", label, counter = guard.counter, "recorded");
      if guard.stop_at.as_deref() == Some(label) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  }
}

pub fn failing(label: &'static str) -> impl Fn(ContextData<TestContext>) -> HandlerFuture<TestError> + Send + Sync + 'static {
  move |ctx: ContextData<TestContext>| -> HandlerFuture<TestError> {
    Box::pin(async move {
      ctx.write().trail.push(label.to_string());
      Err(TestError::Handler(label.to_string()))
    })
  }
}

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
