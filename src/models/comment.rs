use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::user::User;
use crate::validation::validate_not_blank;

#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i32,
    pub body: String,
    pub article: i32,
    pub author: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Serialize, Debug, Clone)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: User,
}

#[derive(Deserialize, Validate, Debug, Clone)]
pub struct NewComment {
    #[validate(custom = "validate_not_blank")]
    pub body: String,
}
