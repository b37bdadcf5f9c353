//! Users Domain
//!
//! User-directory service core: CRUD over user records gated by a
//! three-tier role model (GUEST, USER, ADMIN).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, password hashing, identity extraction
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← authenticate → authorize → existence → execute
//! └──────┬──────┘
//!        │      ┌────────────┐
//!        ├─────▶│   Policy   │  ← pure access-control decisions
//!        │      └────────────┘
//! ┌──────▼──────┐
//! │    Store    │  ← identity store (trait + in-memory implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← records, DTOs, role enum
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{DirectoryService, handlers, store::InMemoryUserStore};
//!
//! let store = InMemoryUserStore::new();
//! let service = DirectoryService::new(store);
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use models::{CreateUser, NewUser, ReplaceUser, Role, UpdateUser, User, UserPatch, UserResponse};
pub use service::DirectoryService;
pub use store::{InMemoryUserStore, UserStore};
