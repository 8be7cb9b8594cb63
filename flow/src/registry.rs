// flow/src/registry.rs

//! `FlowRegistry<E>`: one pipeline per context type, run through a single entry point.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineResult;
use crate::error::FlowError;
use crate::pipeline::Pipeline;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, instrument, Level};

#[async_trait]
trait ErasedRunner<E>: Send + Sync
where
  E: std::error::Error + Send + Sync + 'static,
{
  /// `ctx` must hold a `ContextData<TData>` of the wrapped pipeline.
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<PipelineResult, E>;
}

struct Registered<TData, P, E>
where
  TData: Send + Sync + 'static,
  P: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pipeline: Pipeline<TData, P>,
  _app_err: PhantomData<fn() -> E>,
}

#[async_trait]
impl<TData, P, E> ErasedRunner<E> for Registered<TData, P, E>
where
  TData: Send + Sync + 'static,
  P: std::error::Error + From<FlowError> + Send + Sync + 'static,
  E: std::error::Error + From<P> + From<FlowError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<PipelineResult, E> {
    let ctx_data = match ctx.downcast::<ContextData<TData>>() {
      Ok(boxed) => *boxed,
      Err(_) => {
        let expected_type = std::any::type_name::<ContextData<TData>>().to_string();
        event!(Level::ERROR, %expected_type, "Context type mismatch in registry dispatch.");
        return Err(E::from(FlowError::TypeMismatch { expected_type }));
      }
    };
    self.pipeline.run(ctx_data).await.map_err(E::from)
  }
}

/// Type-keyed pipeline registry returning the application error `E`.
///
/// Registering a second pipeline for the same context type replaces the first.
pub struct FlowRegistry<E = FlowError>
where
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pipelines: RwLock<HashMap<TypeId, Arc<dyn ErasedRunner<E>>>>,
}

impl<E> Default for FlowRegistry<E>
where
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<E> FlowRegistry<E>
where
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      pipelines: RwLock::new(HashMap::new()),
    }
  }

  pub fn register_pipeline<TData, P>(&self, pipeline: Pipeline<TData, P>)
  where
    TData: Send + Sync + 'static,
    P: std::error::Error + From<FlowError> + Send + Sync + 'static,
    E: From<P>,
  {
    event!(
      Level::DEBUG,
      context_type = %std::any::type_name::<TData>(),
      steps = ?pipeline.step_names(),
      "Registering pipeline."
    );
    let runner: Arc<dyn ErasedRunner<E>> = Arc::new(Registered::<TData, P, E> {
      pipeline,
      _app_err: PhantomData,
    });
    self.pipelines.write().insert(TypeId::of::<TData>(), runner);
  }

  pub fn is_registered<TData: Send + Sync + 'static>(&self) -> bool {
    self.pipelines.read().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the pipeline registered for `TData`.
  #[instrument(
    name = "FlowRegistry::run",
    skip_all,
    fields(context_type = %std::any::type_name::<TData>())
  )]
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, E>
  where
    TData: Send + Sync + 'static,
  {
    let runner = {
      let pipelines = self.pipelines.read();
      pipelines.get(&TypeId::of::<TData>()).cloned()
    };
    let runner = match runner {
      Some(runner) => runner,
      None => {
        let context_type = std::any::type_name::<TData>().to_string();
        event!(Level::ERROR, %context_type, "No pipeline registered.");
        return Err(E::from(FlowError::NotRegistered { context_type }));
      }
    };
    runner.run_erased(Box::new(ctx_data)).await
  }
}
