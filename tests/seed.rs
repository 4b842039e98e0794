mod common;

use common::TestDb;
use realworld_core::seed::{seed_file, seed_users};
use realworld_core::Error;

const USERS: &str = r#"
[[users]]
username = "foo"
email = "foo@example.com"
password = "secret"
bio = "I work at statefarm"

[[users]]
username = "bar"
email = "bar@example.com"
password = "hunter2"
image = "https://example.com/bar.png"
"#;

#[test]
fn seeded_users_can_log_in() {
    let test = TestDb::new();
    let users = test.users();

    let seeded = seed_users(&users, USERS).unwrap();
    let names: Vec<&str> = seeded.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["foo", "bar"]);

    let foo = users.login("foo@example.com", "secret").unwrap();
    assert_eq!(foo.bio.as_deref(), Some("I work at statefarm"));
    assert_ne!(foo.hash, "secret");

    let bar = users.login("bar@example.com", "hunter2").unwrap();
    assert_eq!(bar.image.as_deref(), Some("https://example.com/bar.png"));
    assert_eq!(bar.bio, None);
}

#[test]
fn seed_file_is_read_from_disk() {
    let test = TestDb::new();
    let path = std::env::temp_dir().join(format!(
        "realworld-core-seed-{}.toml",
        rand::random::<u64>()
    ));
    std::fs::write(&path, USERS).unwrap();

    let seeded = seed_file(&test.users(), &path);
    let _ = std::fs::remove_file(&path);

    assert_eq!(seeded.unwrap().len(), 2);
    assert!(test.users().login("bar@example.com", "hunter2").is_ok());
}

#[test]
fn empty_seed_creates_nobody() {
    let test = TestDb::new();
    assert!(seed_users(&test.users(), "").unwrap().is_empty());
}

#[test]
fn seeding_validates_each_user() {
    let test = TestDb::new();
    let users = test.users();
    let contents = r#"
[[users]]
username = "foo"
email = "foo@example.com"
password = "secret"

[[users]]
username = "not valid"
email = "bad@example.com"
password = "secret"
"#;

    let err = seed_users(&users, contents).unwrap_err();
    assert!(matches!(err, Error::Invalid(_)), "{:?}", err);
    assert!(users.get_by_username("foo").is_ok());
    assert!(matches!(
        users.get_by_email("bad@example.com"),
        Err(Error::NotFound("user"))
    ));
}

#[test]
fn seeding_twice_conflicts() {
    let test = TestDb::new();
    seed_users(&test.users(), USERS).unwrap();
    let err = seed_users(&test.users(), USERS).unwrap_err();
    assert!(matches!(err, Error::Conflict(_)), "{:?}", err);
}

#[test]
fn broken_seed_data_is_reported() {
    let test = TestDb::new();
    let users = test.users();

    let err = seed_users(&users, "[[users]]\nusername = \"foo\"\n").unwrap_err();
    assert!(matches!(err, Error::Seed(_)), "{:?}", err);

    let err = seed_users(&users, "this is { not toml").unwrap_err();
    assert!(matches!(err, Error::Seed(_)), "{:?}", err);

    let missing = std::env::temp_dir().join("realworld-core-no-such-seed.toml");
    let err = seed_file(&users, &missing).unwrap_err();
    assert!(matches!(err, Error::Seed(_)), "{:?}", err);
}
