//! Registro, login y perfil de usuarios
//!
//! La emisión de tokens es deliberadamente mínima: el resto del sistema
//! solo depende del contrato "caller autenticado con id y rol".

use uuid::Uuid;
use validator::Validate;

use crate::config::EnvironmentConfig;
use crate::middleware::auth::generate_jwt_token;
use crate::models::user::{AuthResponse, LoginRequest, RegisterRequest, UserResponse, UserRole};
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;

pub struct UserController {
    users: UserRepository,
    config: EnvironmentConfig,
}

impl UserController {
    pub fn new(pool: sqlx::PgPool, config: EnvironmentConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            config,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let email = request.email.to_lowercase();

        if self.users.email_exists(&email).await? {
            return Err(AppError::Conflict(
                "User already exists with this email".to_string(),
            ));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        let user = self.users.create(request.name, email, password_hash).await?;
        let token = generate_jwt_token(user.id, user.role, &self.config)?;

        tracing::info!(user_id = %user.id, "user registered");

        Ok(AuthResponse {
            success: true,
            message: "Account created successfully".to_string(),
            token,
        })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let email = request.email.to_lowercase();

        // mismo mensaje para email desconocido y contraseña incorrecta:
        // no revelar cuál de los dos falló
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        let matches = bcrypt::verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;
        if !matches {
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        let token = generate_jwt_token(user.id, user.role, &self.config)?;

        Ok(AuthResponse {
            success: true,
            message: "Login successful".to_string(),
            token,
        })
    }

    pub async fn get_data(&self, user_id: Uuid) -> Result<UserResponse, AppError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(UserResponse::from(user))
    }

    /// Promocionar al caller a owner para que pueda listar coches
    pub async fn change_role_to_owner(&self, user_id: Uuid) -> Result<UserResponse, AppError> {
        let user = self.users.set_role(user_id, UserRole::Owner).await?;
        tracing::info!(user_id = %user.id, "role changed to owner");
        Ok(UserResponse::from(user))
    }
}
