// flow/src/pipeline/execution.rs

use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::core::step::StepDef;
use crate::error::FlowError;
use crate::pipeline::definition::{Phase, Pipeline};
use tracing::{event, info_span, instrument, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: Send + Sync + 'static,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step in order against `ctx_data`.
  ///
  /// A failing handler of a required step aborts the run with its error. A
  /// failing handler of an optional step is logged; the remaining phases of
  /// that step are skipped and the run resumes with the next step.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      context_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_index, step_def) in self.steps.iter().enumerate() {
      if let Some(skip_if) = &step_def.skip_if {
        if skip_if(ctx_data.clone()) {
          event!(Level::DEBUG, step = %step_def.name, "Step skipped by its skip condition.");
          continue;
        }
      }

      let span = info_span!(
        "pipeline_step",
        step = %step_def.name,
        step_index,
        optional = step_def.optional
      );
      match self.run_step(step_def, ctx_data.clone()).instrument(span).await {
        Ok(PipelineControl::Continue) => {}
        Ok(PipelineControl::Stop) => {
          event!(Level::INFO, step = %step_def.name, "Pipeline stopped by a handler.");
          return Ok(PipelineResult::Stopped);
        }
        Err(err) if step_def.optional => {
          event!(Level::WARN, step = %step_def.name, error = %err, "Optional step failed; continuing.");
        }
        Err(err) => return Err(err),
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }

  async fn run_step(&self, step_def: &StepDef<TData>, ctx_data: ContextData<TData>) -> Result<PipelineControl, Err> {
    let hooks = match self.hooks.get(&step_def.name) {
      Some(hooks) if !hooks.is_empty() => hooks,
      _ if step_def.optional => {
        event!(Level::DEBUG, "Optional step has no handlers.");
        return Ok(PipelineControl::Continue);
      }
      _ => {
        event!(Level::ERROR, "Required step has no handlers.");
        return Err(Err::from(FlowError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }
    };

    for phase in [Phase::Before, Phase::On, Phase::After] {
      for (handler_index, handler) in hooks.phase(phase).iter().enumerate() {
        match handler(ctx_data.clone()).await {
          Ok(PipelineControl::Continue) => {}
          Ok(PipelineControl::Stop) => {
            event!(Level::DEBUG, %phase, handler_index, "Handler requested stop.");
            return Ok(PipelineControl::Stop);
          }
          Err(err) => {
            event!(Level::DEBUG, %phase, handler_index, error = %err, "Handler failed.");
            return Err(err);
          }
        }
      }
    }
    Ok(PipelineControl::Continue)
  }
}
