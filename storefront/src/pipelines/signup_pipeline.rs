// storefront/src/pipelines/signup_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::SignupCtxData;
use crate::services::auth_service;
use crate::store::StoreError;
use storefront_flow::{ContextData, FlowRegistry, Pipeline, PipelineControl};
use tracing::{event, info, warn, Level};

pub fn register_signup_pipeline(flows: &FlowRegistry<AppError>) {
  let mut signup_p = Pipeline::<SignupCtxData, AppError>::new(&[
    ("validate_signup_input", false, None),
    ("check_existing_user", false, None),
    ("hash_user_password", false, None),
    ("create_user", false, None),
  ]);

  signup_p.on("validate_signup_input", |ctx_data: ContextData<SignupCtxData>| async move {
    let guard = ctx_data.read();
    if guard.username.trim().is_empty() || guard.password.is_empty() {
      warn!("Signup with missing username or password.");
      return Err(AppError::Validation("Missing username or password".to_string()));
    }
    Ok(PipelineControl::Continue)
  });

  signup_p.on("check_existing_user", |ctx_data: ContextData<SignupCtxData>| async move {
    let (app_state, username) = {
      let guard = ctx_data.read();
      (guard.app_state.clone(), guard.username.clone())
    };
    if app_state.stores.credentials.find_user_by_username(&username).await?.is_some() {
      warn!(%username, "Signup with a taken username.");
      return Err(AppError::DuplicateUsername);
    }
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  signup_p.on("hash_user_password", |ctx_data: ContextData<SignupCtxData>| async move {
    let password = ctx_data.read().password.clone();
    let hash = auth_service::hash_password(&password)?;
    ctx_data.write().password_hash = Some(hash);
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  signup_p.on("create_user", |ctx_data: ContextData<SignupCtxData>| async move {
    let (app_state, username, password_hash) = {
      let guard = ctx_data.read();
      (guard.app_state.clone(), guard.username.clone(), guard.password_hash.clone())
    };
    let password_hash =
      password_hash.ok_or_else(|| AppError::Internal("Password hash missing before user creation".to_string()))?;

    // A concurrent signup can still win between the check and this insert.
    let user = match app_state.stores.credentials.insert_user(&username, &password_hash).await {
      Ok(user) => user,
      Err(StoreError::Conflict(_)) => return Err(AppError::DuplicateUsername),
      Err(other) => {
        event!(Level::ERROR, error = %other, "Failed to create user.");
        return Err(other.into());
      }
    };
    ctx_data.write().created_user_id = Some(user.id);
    info!(user_id = %user.id, username = %user.username, "User created.");
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  flows.register_pipeline(signup_p);
  info!("Sign-up pipeline registered.");
}
