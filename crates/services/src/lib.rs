#![forbid(unsafe_code)]

pub mod app_services;
pub mod drive;
pub mod error;
pub mod google_auth;
pub mod progress_service;
pub mod session_service;

pub use app_services::{AppServices, Backend};
pub use drive::{DriveClient, FileListing};
pub use error::{AppServicesError, AuthError, DriveError, ProgressError, SessionServiceError};
pub use google_auth::{GoogleAuthConfig, GoogleAuthService};
pub use progress_service::ProgressService;
pub use session_service::SessionService;
pub use storage::repository::ProgressScope;
