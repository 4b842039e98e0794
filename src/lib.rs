//! Persistence and session-token core of a RealWorld ("Conduit") backend.
//!
//! [`database::users::UserRepository`] owns users and the follow graph,
//! [`database::articles::ArticleRepository`] owns articles, tags, comments and
//! favorites, and [`auth::TokenService`] turns user ids into signed session
//! tokens and back. Callers resolve a token to a user id first and then
//! operate on the repositories with that id; ownership rules (who may edit or
//! delete what) are enforced by the caller.

#[macro_use]
extern crate diesel;
#[macro_use]
extern crate validator_derive;

pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod models;
mod schema;
pub mod seed;
pub mod validation;

pub use auth::{TokenError, TokenService};
pub use config::Config;
pub use database::articles::ArticleRepository;
pub use database::users::UserRepository;
pub use database::Db;
pub use errors::{Error, Result};
