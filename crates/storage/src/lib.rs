#![forbid(unsafe_code)]

pub mod firestore;
pub mod repository;
pub mod sqlite;

pub use repository::{
    ProgressRepository, ProgressScope, SessionRepository, Storage, StorageError,
};
