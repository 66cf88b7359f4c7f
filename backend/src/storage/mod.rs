//! # Storage Layer
//!
//! Data persistence for the net-worth tracker: a SQLite connection with
//! schema bootstrap, storage traits, and the sqlx-backed repositories
//! implementing them.

pub mod db;
pub mod entry_repository;
pub mod link_repository;
pub mod profile_repository;
pub mod traits;
pub mod user_repository;

pub use db::DbConnection;
pub use entry_repository::EntryRepository;
pub use link_repository::LinkRepository;
pub use profile_repository::ProfileRepository;
pub use traits::{EntryStorage, LinkStorage, ProfileStorage, UserStorage};
pub use user_repository::UserRepository;
