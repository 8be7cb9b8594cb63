// storefront/src/pipelines/signin_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::SigninCtxData;
use crate::services::auth_service;
use crate::services::token::Identity;
use storefront_flow::{ContextData, FlowRegistry, Pipeline, PipelineControl};
use tracing::{event, info, warn, Level};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub fn register_signin_pipeline(flows: &FlowRegistry<AppError>) {
  let mut signin_p = Pipeline::<SigninCtxData, AppError>::new(&[
    ("validate_signin_input", false, None),
    ("fetch_user", false, None),
    ("verify_user_password", false, None),
    ("issue_token", false, None),
  ]);

  signin_p.on("validate_signin_input", |ctx_data: ContextData<SigninCtxData>| async move {
    let guard = ctx_data.read();
    if guard.username.trim().is_empty() || guard.password.is_empty() {
      warn!("Login with missing username or password.");
      return Err(AppError::Validation("Missing username or password".to_string()));
    }
    Ok(PipelineControl::Continue)
  });

  signin_p.on("fetch_user", |ctx_data: ContextData<SigninCtxData>| async move {
    let (app_state, username) = {
      let guard = ctx_data.read();
      (guard.app_state.clone(), guard.username.clone())
    };
    let user = app_state.stores.credentials.find_user_by_username(&username).await?;
    event!(Level::DEBUG, %username, found = user.is_some(), "User lookup for login.");
    ctx_data.write().user = user;
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  // Unknown users are checked against a dummy hash so both failures cost the same.
  signin_p.on("verify_user_password", |ctx_data: ContextData<SigninCtxData>| async move {
    let guard = ctx_data.read();
    let stored_hash = guard.user.as_ref().map(|u| u.password_hash.as_str());
    if !auth_service::verify_password_or_dummy(stored_hash, &guard.password)? {
      warn!(username = %guard.username, "Login rejected.");
      return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
    }
    Ok(PipelineControl::Continue)
  });

  signin_p.on("issue_token", |ctx_data: ContextData<SigninCtxData>| async move {
    let (tokens, identity) = {
      let guard = ctx_data.read();
      let user = guard
        .user
        .as_ref()
        .ok_or_else(|| AppError::Internal("User missing after password verification".to_string()))?;
      let identity = Identity {
        user_id: user.id,
        username: user.username.clone(),
      };
      (guard.app_state.tokens.clone(), identity)
    };
    let token = tokens.sign(&identity, tokens.default_ttl())?;
    ctx_data.write().token = Some(token);
    info!(user_id = %identity.user_id, "Login succeeded.");
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  flows.register_pipeline(signin_p);
  info!("Sign-in pipeline registered.");
}
