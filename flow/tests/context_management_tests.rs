// flow/tests/context_management_tests.rs
mod common;
use common::*;
use serial_test::serial;
use storefront_flow::{ContextData, Pipeline, PipelineControl, PipelineResult};

#[test]
fn clones_share_the_same_state() {
  let ctx = ContextData::new(TestContext::default());
  let other = ctx.clone();
  other.write().counter = 7;
  assert_eq!(ctx.read().counter, 7);
}

#[test]
fn map_read_narrows_to_one_field() {
  let ctx = ContextData::new(TestContext {
    trail: vec!["a".to_string(), "b".to_string()],
    ..Default::default()
  });
  let trail = ctx.map_read(|c| &c.trail);
  assert_eq!(trail.len(), 2);
  assert_eq!(trail[1], "b");
}

#[test]
fn replace_swaps_the_whole_value() {
  let ctx = ContextData::new(TestContext {
    counter: 3,
    ..Default::default()
  });
  let previous = ctx.replace(TestContext {
    counter: 10,
    ..Default::default()
  });
  assert_eq!(previous.counter, 3);
  assert_eq!(ctx.read().counter, 10);
}

#[test]
fn snapshot_is_detached_from_later_writes() {
  let ctx = ContextData::new(TestContext::default());
  ctx.write().counter = 1;
  let snap = ctx.snapshot();
  ctx.write().counter = 2;
  assert_eq!(snap.counter, 1);
  assert_eq!(ctx.read().counter, 2);
}

#[tokio::test]
#[serial]
async fn handlers_see_each_others_writes_through_the_context() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("collect", false, None), ("check", false, None)]);
  pipeline.on("collect", |ctx: ContextData<TestContext>| async move {
    ctx.write().trail.push("collected".to_string());
    Ok::<_, TestError>(PipelineControl::Continue)
  });
  pipeline.on("check", |ctx: ContextData<TestContext>| async move {
    let seen = ctx.map_read(|c| &c.trail).len();
    ctx.write().counter = seen as i32;
    Ok::<_, TestError>(PipelineControl::Continue)
  });

  let ctx = ContextData::new(TestContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await, Ok(PipelineResult::Completed));
  assert_eq!(ctx.snapshot().counter, 1);
}
