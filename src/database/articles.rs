use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use diesel::SqliteConnection;
use validator::Validate;

use crate::database::{page_bounds, Db};
use crate::errors::{Error, Result};
use crate::models::article::{
    Article, ArticleDetails, FindArticles, NewArticle, Tag, UpdateArticle,
};
use crate::models::user::User;
use crate::schema::{article_tags, articles, comments, favorites, tags, users};
use crate::validation::normalize_tags;

#[derive(Insertable)]
#[diesel(table_name = articles)]
struct ArticleRow<'a> {
    title: &'a str,
    description: &'a str,
    body: &'a str,
    author: i32,
    favorites_count: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// Articles together with their tags, comments and favorites.
#[derive(Clone)]
pub struct ArticleRepository {
    pub(crate) db: Db,
}

impl ArticleRepository {
    pub fn new(db: Db) -> ArticleRepository {
        ArticleRepository { db }
    }

    /// Stores the article and its tag associations in one transaction.
    pub fn create(&self, author: i32, new_article: &NewArticle) -> Result<ArticleDetails> {
        new_article.validate()?;
        let names = normalize_tags(&new_article.tag_list);
        let now = Utc::now().naive_utc();

        let row = ArticleRow {
            title: &new_article.title,
            description: &new_article.description,
            body: &new_article.body,
            author,
            favorites_count: 0,
            created_at: now,
            updated_at: now,
        };

        let mut conn = self.db.conn()?;
        let article = conn.immediate_transaction::<_, Error, _>(|conn| {
            let article = diesel::insert_into(articles::table)
                .values(&row)
                .get_result::<Article>(conn)?;

            for name in &names {
                diesel::insert_or_ignore_into(tags::table)
                    .values(tags::name.eq(name))
                    .execute(conn)?;
            }

            let tag_ids = tags::table
                .filter(tags::name.eq_any(&names))
                .select(tags::id)
                .load::<i32>(conn)?;
            for tag in tag_ids {
                diesel::insert_into(article_tags::table)
                    .values((article_tags::article.eq(article.id), article_tags::tag.eq(tag)))
                    .execute(conn)?;
            }

            Ok(article)
        })?;
        tracing::debug!(article_id = article.id, author, "created article");

        attach(&mut conn, vec![article])?
            .pop()
            .ok_or(Error::NotFound("article"))
    }

    pub fn get_by_id(&self, id: i32) -> Result<ArticleDetails> {
        let mut conn = self.db.conn()?;
        let article = articles::table
            .find(id)
            .get_result::<Article>(&mut conn)
            .optional()?
            .ok_or(Error::NotFound("article"))?;

        attach(&mut conn, vec![article])?
            .pop()
            .ok_or(Error::NotFound("article"))
    }

    /// Overwrites the supplied text fields. Author and tags never change.
    pub fn update(&self, id: i32, changes: &UpdateArticle) -> Result<Article> {
        changes.validate()?;
        diesel::update(articles::table.find(id))
            .set((changes, articles::updated_at.eq(Utc::now().naive_utc())))
            .get_result::<Article>(&mut self.db.conn()?)
            .optional()?
            .ok_or(Error::NotFound("article"))
    }

    /// Deletes the article with its favorites, comments and tag associations.
    /// Tags themselves stay, they are shared.
    pub fn delete(&self, id: i32) -> Result<()> {
        let mut conn = self.db.conn()?;
        conn.immediate_transaction::<_, Error, _>(|conn| {
            diesel::delete(favorites::table.filter(favorites::article.eq(id))).execute(conn)?;
            diesel::delete(comments::table.filter(comments::article.eq(id))).execute(conn)?;
            diesel::delete(article_tags::table.filter(article_tags::article.eq(id)))
                .execute(conn)?;

            let deleted = diesel::delete(articles::table.find(id)).execute(conn)?;
            if deleted == 0 {
                return Err(Error::NotFound("article"));
            }
            Ok(())
        })?;
        tracing::debug!(article_id = id, "deleted article");
        Ok(())
    }

    /// Newest first. `tag`, `author` and `favorited_by` narrow the result
    /// together.
    pub fn get_articles(&self, params: &FindArticles) -> Result<Vec<ArticleDetails>> {
        let (limit, offset) = page_bounds(params.limit, params.offset);
        let mut query: articles::BoxedQuery<'_, Sqlite> = articles::table.into_boxed();

        if let Some(tag) = &params.tag {
            query = query.filter(
                articles::id.eq_any(
                    article_tags::table
                        .inner_join(tags::table)
                        .filter(tags::name.eq(tag))
                        .select(article_tags::article),
                ),
            );
        }

        if let Some(author) = &params.author {
            query = query.filter(
                articles::author.eq_any(
                    users::table
                        .filter(users::username.eq(author))
                        .select(users::id),
                ),
            );
        }

        if let Some(user) = params.favorited_by {
            query = query.filter(
                articles::id.eq_any(
                    favorites::table
                        .filter(favorites::user.eq(user))
                        .select(favorites::article),
                ),
            );
        }

        let mut conn = self.db.conn()?;
        let page = query
            .order((articles::created_at.desc(), articles::id.desc()))
            .limit(limit)
            .offset(offset)
            .load::<Article>(&mut conn)?;
        attach(&mut conn, page)
    }

    /// Articles written by any of `author_ids`, newest first.
    pub fn get_feed_articles(
        &self,
        author_ids: &[i32],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ArticleDetails>> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }
        let (limit, offset) = page_bounds(limit, offset);

        let mut conn = self.db.conn()?;
        let page = articles::table
            .filter(articles::author.eq_any(author_ids))
            .order((articles::created_at.desc(), articles::id.desc()))
            .limit(limit)
            .offset(offset)
            .load::<Article>(&mut conn)?;
        attach(&mut conn, page)
    }

    pub fn is_favorited(&self, article: i32, user: Option<i32>) -> Result<bool> {
        let user = match user {
            Some(user) => user,
            None => return Ok(false),
        };
        let favorited = diesel::select(exists(favorites::table.find((user, article))))
            .get_result::<bool>(&mut self.db.conn()?)?;
        Ok(favorited)
    }

    /// Inserts the favorite edge and bumps the counter as one transaction.
    /// `article.favorites_count` follows the stored value only on success.
    pub fn add_favorite(&self, article: &mut Article, user: i32) -> Result<()> {
        let article_id = article.id;
        let mut conn = self.db.conn()?;
        conn.immediate_transaction::<_, Error, _>(|conn| {
            let favorited = diesel::select(exists(favorites::table.find((user, article_id))))
                .get_result::<bool>(conn)?;
            if favorited {
                return Err(Error::Conflict(format!(
                    "article {} is already favorited by user {}",
                    article_id, user
                )));
            }

            diesel::insert_into(favorites::table)
                .values((favorites::user.eq(user), favorites::article.eq(article_id)))
                .execute(conn)?;

            let updated = diesel::update(articles::table.find(article_id))
                .set(articles::favorites_count.eq(articles::favorites_count + 1))
                .execute(conn)?;
            if updated == 0 {
                return Err(Error::NotFound("article"));
            }
            Ok(())
        })?;

        article.favorites_count += 1;
        tracing::debug!(article_id, user, "favorited article");
        Ok(())
    }

    /// Removes the favorite edge and decrements the counter as one
    /// transaction. Fails with `NotFound` when the edge does not exist.
    pub fn delete_favorite(&self, article: &mut Article, user: i32) -> Result<()> {
        let article_id = article.id;
        let mut conn = self.db.conn()?;
        conn.immediate_transaction::<_, Error, _>(|conn| {
            let removed = diesel::delete(favorites::table.find((user, article_id))).execute(conn)?;
            if removed == 0 {
                return Err(Error::NotFound("favorite"));
            }

            diesel::update(articles::table.find(article_id))
                .set(articles::favorites_count.eq(articles::favorites_count - 1))
                .execute(conn)?;
            Ok(())
        })?;

        article.favorites_count -= 1;
        tracing::debug!(article_id, user, "unfavorited article");
        Ok(())
    }

    pub fn get_tags(&self) -> Result<Vec<Tag>> {
        let tags = tags::table
            .order(tags::name.asc())
            .load::<Tag>(&mut self.db.conn()?)?;
        Ok(tags)
    }
}

/// Loads authors and tags for a page of articles with one query each.
fn attach(conn: &mut SqliteConnection, articles: Vec<Article>) -> Result<Vec<ArticleDetails>> {
    if articles.is_empty() {
        return Ok(Vec::new());
    }

    let article_ids: Vec<i32> = articles.iter().map(|article| article.id).collect();
    let author_ids: Vec<i32> = articles.iter().map(|article| article.author).collect();

    let authors: HashMap<i32, User> = users::table
        .filter(users::id.eq_any(&author_ids))
        .load::<User>(conn)?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();

    let mut tags_by_article: HashMap<i32, Vec<Tag>> = HashMap::new();
    let rows = article_tags::table
        .inner_join(tags::table)
        .filter(article_tags::article.eq_any(&article_ids))
        .select((article_tags::article, (tags::id, tags::name)))
        .order(tags::name.asc())
        .load::<(i32, Tag)>(conn)?;
    for (article, tag) in rows {
        tags_by_article.entry(article).or_default().push(tag);
    }

    articles
        .into_iter()
        .map(|article| {
            let author = authors
                .get(&article.author)
                .cloned()
                .ok_or(Error::NotFound("author"))?;
            let tags = tags_by_article.remove(&article.id).unwrap_or_default();
            Ok(ArticleDetails {
                article,
                author,
                tags,
            })
        })
        .collect()
}
