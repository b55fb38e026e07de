use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::{info, warn};

use crate::db::Sequence;
use crate::error::{ApiError, StoreError};
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::user::{
    LoginForm, LoginResponse, RegisterInput, User, UserResponse, UserSummary, DEFAULT_USER_BUDGET,
};
use crate::services::account_service::{
    generate_token, hash_password, is_valid_email, verify_password,
};
use crate::AppState;

const DUPLICATE_EMAIL: &str = "Email already registered";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub async fn register(
    state: web::Data<AppState>,
    input: web::Json<RegisterInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    let email = input.email.trim().to_string();

    if !is_valid_email(&email) {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    if input.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    if input.password.is_empty() {
        return Err(ApiError::bad_request("Password is required"));
    }
    let budget = input.budget.unwrap_or(DEFAULT_USER_BUDGET);
    if !budget.is_finite() || budget < 0.0 {
        return Err(ApiError::bad_request("Budget must not be negative"));
    }

    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::bad_request(DUPLICATE_EMAIL));
    }

    let password = hash_password(&input.password, state.config.bcrypt_cost)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {}", e)))?;

    let user = User {
        id: state.store.next_id(Sequence::Users).await?,
        name: input.name.trim().to_string(),
        email,
        password,
        preferences: input.preferences.unwrap_or_default(),
        budget,
        created_at: Utc::now(),
    };

    match state.store.insert_user(&user).await {
        Ok(()) => {}
        // Lost a race with a concurrent registration.
        Err(StoreError::Duplicate(_)) => return Err(ApiError::bad_request(DUPLICATE_EMAIL)),
        Err(e) => return Err(e.into()),
    }

    info!("Registered user {}", user.id);
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, ApiError> {
    let form = form.into_inner();

    let user = match state.store.find_user_by_email(form.username.trim()).await? {
        Some(user) if verify_password(&form.password, &user.password) => user,
        _ => {
            warn!("Failed login attempt for {}", form.username);
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
    };

    let access_token = generate_token(
        user.id,
        &user.email,
        &state.config.jwt_secret,
        state.config.token_ttl_hours,
    )
    .map_err(|e| ApiError::Internal(format!("token generation failed: {}", e)))?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: UserSummary {
            id: user.id,
            name: user.name,
            email: user.email,
            preferences: user.preferences,
            budget: user.budget,
        },
    }))
}

pub async fn me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let account = state
        .store
        .find_user_by_id(user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(account)))
}
