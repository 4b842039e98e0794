use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use validator::Validate;

use crate::database::Db;
use crate::errors::{Error, Result};
use crate::models::user::{hash_password, NewUser, UpdateUser, User};
use crate::schema::users;

#[derive(Insertable)]
#[diesel(table_name = users)]
struct UserRow<'a> {
    username: &'a str,
    email: &'a str,
    hash: &'a str,
    bio: Option<&'a str>,
    image: Option<&'a str>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = users)]
struct UserChanges<'a> {
    username: Option<&'a str>,
    email: Option<&'a str>,
    hash: Option<String>,
    bio: Option<Option<&'a str>>,
    image: Option<Option<&'a str>>,
    updated_at: NaiveDateTime,
}

/// Users and, through `profiles`, the follow graph between them.
#[derive(Clone)]
pub struct UserRepository {
    pub(crate) db: Db,
}

impl UserRepository {
    pub fn new(db: Db) -> UserRepository {
        UserRepository { db }
    }

    /// Validates and stores a new user. Username and email collisions surface
    /// as `Error::Conflict`.
    pub fn create(&self, new_user: &NewUser) -> Result<User> {
        new_user.validate()?;
        let hash = hash_password(&new_user.password)?;
        let now = Utc::now().naive_utc();

        let row = UserRow {
            username: &new_user.username,
            email: &new_user.email,
            hash: &hash,
            bio: new_user.bio.as_deref(),
            image: new_user.image.as_deref(),
            created_at: now,
            updated_at: now,
        };

        let user = diesel::insert_into(users::table)
            .values(&row)
            .get_result::<User>(&mut self.db.conn()?)?;
        tracing::debug!(user_id = user.id, username = %user.username, "created user");
        Ok(user)
    }

    pub fn get_by_id(&self, id: i32) -> Result<User> {
        users::table
            .find(id)
            .get_result::<User>(&mut self.db.conn()?)
            .optional()?
            .ok_or(Error::NotFound("user"))
    }

    pub fn get_by_email(&self, email: &str) -> Result<User> {
        users::table
            .filter(users::email.eq(email))
            .get_result::<User>(&mut self.db.conn()?)
            .optional()?
            .ok_or(Error::NotFound("user"))
    }

    pub fn get_by_username(&self, username: &str) -> Result<User> {
        users::table
            .filter(users::username.eq(username))
            .get_result::<User>(&mut self.db.conn()?)
            .optional()?
            .ok_or(Error::NotFound("user"))
    }

    /// Checks a login attempt. A wrong password is reported as invalid input
    /// on the `password` field.
    pub fn login(&self, email: &str, password: &str) -> Result<User> {
        let user = self.get_by_email(email)?;
        if !user.verify_password(password) {
            return Err(Error::invalid("password", "mismatch", "invalid email or password"));
        }
        Ok(user)
    }

    /// Applies the fields present in `update`. The password is re-hashed only
    /// when a new one is supplied.
    pub fn update(&self, id: i32, update: &UpdateUser) -> Result<User> {
        update.validate()?;
        let hash = update.password.as_deref().map(hash_password).transpose()?;

        let changes = UserChanges {
            username: update.username.as_deref(),
            email: update.email.as_deref(),
            hash,
            bio: update.bio.as_ref().map(|bio| bio.as_deref()),
            image: update.image.as_ref().map(|image| image.as_deref()),
            updated_at: Utc::now().naive_utc(),
        };

        let user = diesel::update(users::table.find(id))
            .set(&changes)
            .get_result::<User>(&mut self.db.conn()?)
            .optional()?
            .ok_or(Error::NotFound("user"))?;
        tracing::debug!(user_id = user.id, "updated user");
        Ok(user)
    }
}
