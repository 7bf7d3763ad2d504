//! Database repositories
//!
//! Provides the credential store used by the auth service.

pub mod memory;
pub mod user;

pub use memory::InMemoryCredentialStore;
pub use user::{CredentialStore, NewUser, PgCredentialStore, StoreError, User};
