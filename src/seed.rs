//! Initial users loaded from a TOML file.
//!
//! ```toml
//! [[users]]
//! username = "foo"
//! email = "foo@example.com"
//! password = "secret"
//! bio = "optional"
//! ```
//!
//! Every entry goes through [`UserRepository::create`], so it is validated
//! and its password hashed like a regular registration. Users are created in
//! file order and seeding stops at the first failure; users created before it
//! stay.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::database::users::UserRepository;
use crate::errors::{Error, Result};
use crate::models::user::{NewUser, User};

#[derive(Deserialize)]
struct SeedFile {
    #[serde(default)]
    users: Vec<NewUser>,
}

pub fn seed_users(users: &UserRepository, contents: &str) -> Result<Vec<User>> {
    let file: SeedFile =
        toml::from_str(contents).map_err(|e| Error::Seed(format!("invalid seed data: {}", e)))?;

    let mut created = Vec::with_capacity(file.users.len());
    for new_user in &file.users {
        let user = users.create(new_user)?;
        tracing::info!(user_id = user.id, username = %user.username, "seeded user");
        created.push(user);
    }
    Ok(created)
}

pub fn seed_file(users: &UserRepository, path: &Path) -> Result<Vec<User>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::Seed(format!("failed to read {}: {}", path.display(), e)))?;
    seed_users(users, &contents)
}
