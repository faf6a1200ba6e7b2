//! Authentication primitives library
//!
//! Provides password hashing infrastructure for services that manage
//! credentials:
//! - Adaptive-cost password hashing (Argon2id)
//! - Verification that treats a malformed digest as a mismatch
//!
//! Each service defines its own authentication flow and adapts this
//! implementation. Keeping the primitive here avoids coupling services
//! through shared domain logic while reducing code duplication.
//!
//! # Examples
//!
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("not_my_password", &hash));
//! ```

pub mod password;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
