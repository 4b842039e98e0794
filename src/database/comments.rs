use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use validator::Validate;

use crate::database::articles::ArticleRepository;
use crate::errors::{Error, Result};
use crate::models::comment::{Comment, CommentWithAuthor, NewComment};
use crate::models::user::User;
use crate::schema::{comments, users};

#[derive(Insertable)]
#[diesel(table_name = comments)]
struct CommentRow<'a> {
    body: &'a str,
    article: i32,
    author: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl ArticleRepository {
    pub fn create_comment(
        &self,
        article: i32,
        author: i32,
        new_comment: &NewComment,
    ) -> Result<Comment> {
        new_comment.validate()?;
        let now = Utc::now().naive_utc();
        let row = CommentRow {
            body: &new_comment.body,
            article,
            author,
            created_at: now,
            updated_at: now,
        };

        let comment = diesel::insert_into(comments::table)
            .values(&row)
            .get_result::<Comment>(&mut self.db.conn()?)?;
        tracing::debug!(comment_id = comment.id, article, author, "created comment");
        Ok(comment)
    }

    /// Comments of an article, oldest first, each with its author.
    pub fn get_comments(&self, article: i32) -> Result<Vec<CommentWithAuthor>> {
        let rows = comments::table
            .inner_join(users::table)
            .filter(comments::article.eq(article))
            .order((comments::created_at.asc(), comments::id.asc()))
            .load::<(Comment, User)>(&mut self.db.conn()?)?;

        Ok(rows
            .into_iter()
            .map(|(comment, author)| CommentWithAuthor { comment, author })
            .collect())
    }

    pub fn get_comment_by_id(&self, id: i32) -> Result<Comment> {
        comments::table
            .find(id)
            .get_result::<Comment>(&mut self.db.conn()?)
            .optional()?
            .ok_or(Error::NotFound("comment"))
    }

    /// Whether the caller may delete the comment is decided by the caller.
    pub fn delete_comment(&self, id: i32) -> Result<()> {
        let deleted = diesel::delete(comments::table.find(id)).execute(&mut self.db.conn()?)?;
        if deleted == 0 {
            return Err(Error::NotFound("comment"));
        }
        tracing::debug!(comment_id = id, "deleted comment");
        Ok(())
    }
}
