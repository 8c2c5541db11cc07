use taskdesk_core::{
    open_store_in_memory, AccountDirectory, AccountError, AuthError, ConflictError, KeyValueStore,
    SqliteKvStore, ValidationError, ADMIN_EMAIL, ADMIN_PASSWORD, ADMIN_USERNAME, USERS_KEY,
};

#[test]
fn bootstrap_creates_default_admin_once() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let directory = AccountDirectory::new(&store);

    for _ in 0..5 {
        directory.bootstrap_default_admin().unwrap();
    }

    let records = directory.load().unwrap();
    let admins: Vec<_> = records
        .iter()
        .filter(|record| record.username == ADMIN_USERNAME)
        .collect();
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].email, ADMIN_EMAIL);
    assert_eq!(admins[0].password, ADMIN_PASSWORD);
}

#[test]
fn bootstrap_keeps_existing_records() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let directory = AccountDirectory::new(&store);

    directory.bootstrap_default_admin().unwrap();
    directory.register("ann", "a@x.com", "secret1").unwrap();
    directory.bootstrap_default_admin().unwrap();

    let records = directory.load().unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn bootstrap_probe_is_case_insensitive() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let directory = AccountDirectory::new(&store);

    // A lowercase admin record already satisfies the probe, so bootstrap
    // must not append a second one.
    store
        .set(
            USERS_KEY,
            r#"[{"username":"admin_00","email":"other@system.com","password":"whatever"}]"#,
        )
        .unwrap();
    directory.bootstrap_default_admin().unwrap();

    assert_eq!(directory.load().unwrap().len(), 1);
}

#[test]
fn bootstrap_recovers_corrupt_directory_to_admin_only() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let directory = AccountDirectory::new(&store);

    store.set(USERS_KEY, "{not json at all").unwrap();
    directory.bootstrap_default_admin().unwrap();

    let records = directory.load().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].username, ADMIN_USERNAME);
}

#[test]
fn load_surfaces_corrupt_payload_but_load_or_default_recovers() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let directory = AccountDirectory::new(&store);

    store.set(USERS_KEY, "42").unwrap();

    assert!(matches!(
        directory.load(),
        Err(AccountError::InvalidData(_))
    ));
    assert!(directory.load_or_default().unwrap().is_empty());
}

#[test]
fn register_then_duplicate_username_differs_only_in_case() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let directory = AccountDirectory::new(&store);

    directory.register("ann", "a@x.com", "secret1").unwrap();

    let err = directory.register("ANN", "b@x.com", "secret2").unwrap_err();
    assert!(matches!(
        err,
        AccountError::Conflict(ConflictError::DuplicateUsername(_))
    ));
}

#[test]
fn register_rejects_duplicate_email_case_insensitively() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let directory = AccountDirectory::new(&store);

    directory.register("ann", "a@x.com", "secret1").unwrap();

    let err = directory.register("bob", "A@X.COM", "secret2").unwrap_err();
    assert!(matches!(
        err,
        AccountError::Conflict(ConflictError::DuplicateEmail(_))
    ));
}

#[test]
fn register_rejects_empty_fields_and_short_usernames() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let directory = AccountDirectory::new(&store);

    assert!(matches!(
        directory.register("", "a@x.com", "secret1").unwrap_err(),
        AccountError::Validation(ValidationError::EmptyField("username"))
    ));
    assert!(matches!(
        directory.register("ann", "", "secret1").unwrap_err(),
        AccountError::Validation(ValidationError::EmptyField("email"))
    ));
    assert!(matches!(
        directory.register("ann", "a@x.com", "   ").unwrap_err(),
        AccountError::Validation(ValidationError::EmptyField("password"))
    ));
    assert!(matches!(
        directory.register("ab", "a@x.com", "secret1").unwrap_err(),
        AccountError::Validation(ValidationError::UsernameTooShort { min: 3, actual: 2 })
    ));
}

#[test]
fn short_password_is_accepted_at_registration() {
    // The minimum password length is only enforced on change, not on
    // initial registration.
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let directory = AccountDirectory::new(&store);

    directory.register("ann", "a@x.com", "abc").unwrap();
    directory.authenticate("ann", "abc").unwrap();
}

#[test]
fn authenticate_matches_username_case_insensitively_and_password_exactly() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let directory = AccountDirectory::new(&store);

    directory.register("ann", "a@x.com", "Secret1").unwrap();

    let session = directory.authenticate("ANN", "Secret1").unwrap();
    assert_eq!(session.username, "ann");
    assert_eq!(session.email, "a@x.com");

    let err = directory.authenticate("ann", "secret1").unwrap_err();
    assert!(matches!(
        err,
        AccountError::Auth(AuthError::InvalidCredentials)
    ));
}

#[test]
fn authenticate_unknown_user_is_invalid_credentials() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let directory = AccountDirectory::new(&store);

    let err = directory.authenticate("ghost", "whatever").unwrap_err();
    assert!(matches!(
        err,
        AccountError::Auth(AuthError::InvalidCredentials)
    ));
}

#[test]
fn change_password_rejects_wrong_current_password() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let directory = AccountDirectory::new(&store);

    directory.register("ann", "a@x.com", "secret1").unwrap();

    let err = directory
        .change_password("ann", "wrong", "newpass1")
        .unwrap_err();
    assert!(matches!(
        err,
        AccountError::Auth(AuthError::WrongCurrentPassword)
    ));
}

#[test]
fn change_password_rejects_short_new_password() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let directory = AccountDirectory::new(&store);

    directory.register("ann", "a@x.com", "secret1").unwrap();

    let err = directory
        .change_password("ann", "secret1", "abc")
        .unwrap_err();
    assert!(matches!(
        err,
        AccountError::Validation(ValidationError::NewPasswordTooShort { min: 6, actual: 3 })
    ));
}

#[test]
fn change_password_overwrites_in_place() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let directory = AccountDirectory::new(&store);

    directory.register("ann", "a@x.com", "secret1").unwrap();
    directory
        .change_password("ann", "secret1", "newpass1")
        .unwrap();

    assert!(matches!(
        directory.authenticate("ann", "secret1").unwrap_err(),
        AccountError::Auth(AuthError::InvalidCredentials)
    ));
    directory.authenticate("ann", "newpass1").unwrap();
}

#[test]
fn change_password_for_missing_user_is_user_not_found() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let directory = AccountDirectory::new(&store);

    let err = directory
        .change_password("ghost", "secret1", "newpass1")
        .unwrap_err();
    assert!(matches!(
        err,
        AccountError::Auth(AuthError::UserNotFound(username)) if username == "ghost"
    ));
}

#[test]
fn register_trims_surrounding_whitespace() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let directory = AccountDirectory::new(&store);

    directory
        .register("  ann  ", " a@x.com ", " secret1 ")
        .unwrap();

    let records = directory.load().unwrap();
    assert_eq!(records[0].username, "ann");
    assert_eq!(records[0].email, "a@x.com");
    assert_eq!(records[0].password, "secret1");
}

#[test]
fn remove_user_is_exact_match_and_noop_when_absent() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let directory = AccountDirectory::new(&store);

    directory.register("ann", "a@x.com", "secret1").unwrap();

    // Case-different username does not match for removal.
    directory.remove_user("ANN").unwrap();
    assert_eq!(directory.load().unwrap().len(), 1);

    directory.remove_user("ann").unwrap();
    assert!(directory.load().unwrap().is_empty());

    directory.remove_user("ann").unwrap();
}
