mod common;

use common::TestDb;
use realworld_core::Error;

#[test]
fn follow_is_directed() {
    let test = TestDb::new();
    let users = test.users();
    let foo = test.create_user("foo");
    let bar = test.create_user("bar");

    assert!(!users.is_following(foo.id, bar.id).unwrap());
    users.follow(foo.id, bar.id).unwrap();

    assert!(users.is_following(foo.id, bar.id).unwrap());
    assert!(!users.is_following(bar.id, foo.id).unwrap());
}

#[test]
fn following_twice_is_a_conflict() {
    let test = TestDb::new();
    let users = test.users();
    let foo = test.create_user("foo");
    let bar = test.create_user("bar");

    users.follow(foo.id, bar.id).unwrap();
    let err = users.follow(foo.id, bar.id).unwrap_err();
    assert!(matches!(err, Error::Conflict(_)), "{:?}", err);
    assert_eq!(users.following_ids(foo.id).unwrap(), vec![bar.id]);
}

#[test]
fn cannot_follow_yourself() {
    let test = TestDb::new();
    let users = test.users();
    let foo = test.create_user("foo");

    let err = users.follow(foo.id, foo.id).unwrap_err();
    assert!(matches!(err, Error::Invalid(_)), "{:?}", err);
    assert!(!users.is_following(foo.id, foo.id).unwrap());
}

#[test]
fn following_an_unknown_user_fails() {
    let test = TestDb::new();
    let users = test.users();
    let foo = test.create_user("foo");

    let err = users.follow(foo.id, foo.id + 100).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)), "{:?}", err);
}

#[test]
fn unfollow_removes_the_edge_and_tolerates_missing_edges() {
    let test = TestDb::new();
    let users = test.users();
    let foo = test.create_user("foo");
    let bar = test.create_user("bar");

    users.unfollow(foo.id, bar.id).unwrap();

    users.follow(foo.id, bar.id).unwrap();
    users.unfollow(foo.id, bar.id).unwrap();
    assert!(!users.is_following(foo.id, bar.id).unwrap());

    // the edge can be created again afterwards
    users.follow(foo.id, bar.id).unwrap();
    assert!(users.is_following(foo.id, bar.id).unwrap());
}

#[test]
fn following_ids_lists_followed_users() {
    let test = TestDb::new();
    let users = test.users();
    let foo = test.create_user("foo");
    let bar = test.create_user("bar");
    let baz = test.create_user("baz");

    users.follow(foo.id, bar.id).unwrap();
    users.follow(foo.id, baz.id).unwrap();
    users.follow(bar.id, foo.id).unwrap();

    let mut ids = users.following_ids(foo.id).unwrap();
    ids.sort();
    assert_eq!(ids, vec![bar.id, baz.id]);
    assert_eq!(users.following_ids(bar.id).unwrap(), vec![foo.id]);
    assert!(users.following_ids(baz.id).unwrap().is_empty());
}

#[test]
fn profile_reflects_the_viewer() {
    let test = TestDb::new();
    let users = test.users();
    let foo = test.create_user("foo");
    let bar = test.create_user("bar");
    users.follow(foo.id, bar.id).unwrap();

    let seen_by_foo = users.profile("bar", Some(foo.id)).unwrap();
    assert_eq!(seen_by_foo.username, "bar");
    assert!(seen_by_foo.following);

    assert!(!users.profile("foo", Some(bar.id)).unwrap().following);
    assert!(!users.profile("bar", None).unwrap().following);
    assert!(matches!(
        users.profile("nobody", None),
        Err(Error::NotFound("user"))
    ));
}
