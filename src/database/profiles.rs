use diesel::dsl::exists;
use diesel::prelude::*;

use crate::database::users::UserRepository;
use crate::errors::{Error, Result};
use crate::models::user::Profile;
use crate::schema::follows;

impl UserRepository {
    /// Adds the edge `follower -> followed`. Following twice is a conflict.
    pub fn follow(&self, follower: i32, followed: i32) -> Result<()> {
        if follower == followed {
            return Err(Error::invalid(
                "followed",
                "self_follow",
                "cannot follow yourself",
            ));
        }

        diesel::insert_into(follows::table)
            .values((follows::follower.eq(follower), follows::followed.eq(followed)))
            .execute(&mut self.db.conn()?)?;
        tracing::debug!(follower, followed, "followed user");
        Ok(())
    }

    /// Removes the edge if it exists.
    pub fn unfollow(&self, follower: i32, followed: i32) -> Result<()> {
        diesel::delete(follows::table.find((follower, followed)))
            .execute(&mut self.db.conn()?)?;
        Ok(())
    }

    pub fn is_following(&self, follower: i32, followed: i32) -> Result<bool> {
        let following = diesel::select(exists(follows::table.find((follower, followed))))
            .get_result::<bool>(&mut self.db.conn()?)?;
        Ok(following)
    }

    /// Ids of every user `follower` follows, for building a feed.
    pub fn following_ids(&self, follower: i32) -> Result<Vec<i32>> {
        let ids = follows::table
            .filter(follows::follower.eq(follower))
            .select(follows::followed)
            .load::<i32>(&mut self.db.conn()?)?;
        Ok(ids)
    }

    /// Profile of `username` as seen by `viewer`; anonymous viewers never
    /// follow anyone.
    pub fn profile(&self, username: &str, viewer: Option<i32>) -> Result<Profile> {
        let user = self.get_by_username(username)?;
        let following = match viewer {
            Some(viewer) => self.is_following(viewer, user.id)?,
            None => false,
        };
        Ok(user.to_profile(following))
    }
}
