#![allow(dead_code)]

use std::path::PathBuf;

use once_cell::sync::Lazy;
use realworld_core::models::article::{ArticleDetails, NewArticle};
use realworld_core::models::user::{NewUser, User};
use realworld_core::{ArticleRepository, Db, UserRepository};
use tracing_subscriber::EnvFilter;

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

/// A throw-away database file, removed when dropped.
pub struct TestDb {
    pub db: Db,
    path: PathBuf,
}

impl TestDb {
    pub fn new() -> TestDb {
        Lazy::force(&TRACING);
        let path = std::env::temp_dir().join(format!(
            "realworld-core-test-{}.sqlite",
            rand::random::<u64>()
        ));
        let db = Db::open(path.to_str().expect("temp path is not utf-8"), 8)
            .expect("failed to open test database");
        db.setup().expect("failed to create schema");
        TestDb { db, path }
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }

    pub fn articles(&self) -> ArticleRepository {
        ArticleRepository::new(self.db.clone())
    }

    pub fn create_user(&self, username: &str) -> User {
        self.users()
            .create(&new_user(username))
            .expect("failed to create user")
    }

    pub fn create_article(&self, author: &User, title: &str, tags: &[&str]) -> ArticleDetails {
        self.articles()
            .create(author.id, &new_article(title, tags))
            .expect("failed to create article")
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", self.path.display(), suffix));
        }
    }
}

pub fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password: "secret".to_string(),
        bio: None,
        image: None,
    }
}

pub fn new_article(title: &str, tags: &[&str]) -> NewArticle {
    NewArticle {
        title: title.to_string(),
        description: format!("about {}", title),
        body: format!("body of {}", title),
        tag_list: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}
