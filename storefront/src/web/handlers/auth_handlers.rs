// storefront/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use storefront_flow::{ContextData, PipelineResult};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::{SigninCtxData, SignupCtxData};
use crate::state::AppState;

/// Body of `/api/signup` and `/api/login`; absent fields read as empty.
#[derive(Deserialize)]
pub struct CredentialsPayload {
  #[serde(default)]
  pub username: String,
  #[serde(default)]
  pub password: String,
}

#[instrument(name = "handler::signup", skip(app_state, req_payload), fields(username = %req_payload.username))]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CredentialsPayload>,
) -> Result<HttpResponse, AppError> {
  let CredentialsPayload { username, password } = req_payload.into_inner();
  let ctx_data = ContextData::new(SignupCtxData {
    app_state: app_state.get_ref().clone(),
    username,
    password,
    password_hash: None,
    created_user_id: None,
  });

  match app_state.flows.run(ctx_data.clone()).await {
    Ok(PipelineResult::Completed) => {
      let user_id = ctx_data.read().created_user_id;
      info!(user_id = ?user_id, "Signup successful.");
      Ok(HttpResponse::Ok().json(json!({ "message": "Signup successful!" })))
    }
    Ok(PipelineResult::Stopped) => {
      warn!("Signup pipeline was stopped by a handler.");
      Err(AppError::Internal("Signup process was halted".to_string()))
    }
    Err(app_err) => {
      warn!(error = %app_err, "Signup failed.");
      Err(app_err)
    }
  }
}

#[instrument(name = "handler::login", skip(app_state, req_payload), fields(username = %req_payload.username))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CredentialsPayload>,
) -> Result<HttpResponse, AppError> {
  let CredentialsPayload { username, password } = req_payload.into_inner();
  let ctx_data = ContextData::new(SigninCtxData {
    app_state: app_state.get_ref().clone(),
    username,
    password,
    user: None,
    token: None,
  });

  match app_state.flows.run(ctx_data.clone()).await {
    Ok(PipelineResult::Completed) => {
      let token = ctx_data.read().token.clone().ok_or_else(|| {
        warn!("Login pipeline completed without a token.");
        AppError::Internal("Login completed without a token".to_string())
      })?;
      Ok(HttpResponse::Ok().json(json!({ "message": "Login successful", "token": token })))
    }
    Ok(PipelineResult::Stopped) => {
      warn!("Login pipeline was stopped by a handler.");
      Err(AppError::Auth("Authentication was halted".to_string()))
    }
    Err(app_err) => {
      warn!(error = %app_err, "Login failed.");
      Err(app_err)
    }
  }
}
