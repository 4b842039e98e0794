use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::user::User;
use crate::schema::articles;
use crate::validation::{validate_not_blank, validate_tags};

#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub body: String,
    pub author: i32,
    pub favorites_count: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

/// An article with its author and tags loaded.
#[derive(Serialize, Debug, Clone)]
pub struct ArticleDetails {
    pub article: Article,
    pub author: User,
    pub tags: Vec<Tag>,
}

impl ArticleDetails {
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|tag| tag.name.as_str()).collect()
    }
}

#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    #[validate(custom = "validate_not_blank")]
    pub title: String,
    #[validate(custom = "validate_not_blank")]
    pub description: String,
    #[validate(custom = "validate_not_blank")]
    pub body: String,
    #[validate(length(min = 1), custom = "validate_tags")]
    pub tag_list: Vec<String>,
}

/// Only the text fields of an article change after creation.
#[derive(Deserialize, Validate, AsChangeset, Default, Debug, Clone)]
#[diesel(table_name = articles)]
pub struct UpdateArticle {
    #[validate(custom = "validate_not_blank")]
    pub title: Option<String>,
    #[validate(custom = "validate_not_blank")]
    pub description: Option<String>,
    #[validate(custom = "validate_not_blank")]
    pub body: Option<String>,
}

/// Filters for the global article listing. Filters combine with AND.
#[derive(Debug, Clone, Default)]
pub struct FindArticles {
    pub tag: Option<String>,
    /// Username of the author.
    pub author: Option<String>,
    /// Id of a user who favorited the article.
    pub favorited_by: Option<i32>,
    pub limit: i64,
    pub offset: i64,
}
