use thiserror::Error;

use crate::{
    application::{credentials::CredentialError, posts::PostServiceError, repos::RepoError},
    config::LoadError,
    infra::error::InfraError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Posts(#[from] PostServiceError),
    #[error(transparent)]
    Credentials(#[from] CredentialError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error("admin session required")]
    AccessDenied,
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Text shown to the user in place of the internal error chain.
    pub fn presentation_message(&self) -> &'static str {
        match self {
            AppError::Posts(PostServiceError::Forbidden) => "Admin only.",
            AppError::AccessDenied => "Access denied. Please log in as admin.",
            AppError::Credentials(CredentialError::WrongCurrentPassword) => {
                "Current password is incorrect."
            }
            AppError::Credentials(CredentialError::Mismatch) => "New passwords do not match.",
            AppError::Posts(PostServiceError::Repo(RepoError::CorruptState { .. }))
            | AppError::Credentials(CredentialError::Repo(RepoError::CorruptState { .. }))
            | AppError::Repo(RepoError::CorruptState { .. }) => {
                "Stored blog data is corrupt."
            }
            AppError::Posts(PostServiceError::Repo(_))
            | AppError::Credentials(CredentialError::Repo(_))
            | AppError::Repo(_)
            | AppError::Infra(InfraError::Io(_)) => "Blog storage could not be accessed.",
            AppError::Config(_) => "Configuration could not be loaded.",
            AppError::Infra(InfraError::Telemetry(_)) => "Logging subsystem could not start.",
            AppError::Posts(PostServiceError::Domain(_)) | AppError::Unexpected(_) => {
                "Unexpected error occurred."
            }
        }
    }
}
