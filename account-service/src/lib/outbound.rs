pub mod mail;
pub mod memory;
pub mod repositories;
pub mod sessions;
pub mod tokens;
