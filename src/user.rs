//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, password::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's display name, unique across all users.
    pub full_name: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                full_name TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// The caller should validate `full_name` against the format policy first,
/// see [crate::validation::is_valid_full_name].
///
/// # Errors
///
/// Returns an [Error::DuplicateFullName] if a user with the same full name
/// already exists, or an [Error::SqlError] if some other SQL error occurred.
pub fn create_user(
    full_name: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection
        .execute(
            "INSERT INTO user (full_name, password) VALUES (?1, ?2)",
            (full_name, password_hash.as_ref()),
        )
        .map_err(|error| match Error::from(error) {
            Error::DuplicateFullName(_) => Error::DuplicateFullName(full_name.to_owned()),
            error => error,
        })?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        full_name: full_name.to_owned(),
        password_hash,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an [Error::NotFound] if `user_id` does not
/// belong to a registered user, or an [Error::SqlError] if there was an
/// error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, full_name, password FROM user WHERE id = :id")?
        .query_one(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user from the database whose full name exactly matches
/// `full_name` (case-sensitive).
///
/// # Errors
///
/// This function will return an [Error::UserNotFound] if no user is
/// registered under `full_name`, or an [Error::SqlError] if there was an
/// error trying to access the store.
pub fn get_user_by_full_name(full_name: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, full_name, password FROM user WHERE full_name = :full_name")?
        .query_one(&[(":full_name", &full_name)], map_user_row)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::UserNotFound,
            error => error,
        })
}

/// Overwrite the stored password hash for the user with `user_id`.
///
/// # Errors
///
/// Returns an [Error::NotFound] if `user_id` does not belong to a registered
/// user, or an [Error::SqlError] if some other SQL error occurred.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = :password WHERE id = :id",
        &[
            (":password", &password_hash.as_ref() as &dyn rusqlite::ToSql),
            (":id", &user_id.as_i64()),
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_id = row.get(0)?;
    let full_name = row.get(1)?;
    let raw_password_hash: String = row.get(2)?;

    Ok(User {
        id: UserID::new(raw_id),
        full_name,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::password::PasswordHash;

    use super::{
        Error, UserID, create_user, create_user_table, get_user_by_full_name, get_user_by_id,
        update_password,
    };

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    #[test]
    fn insert_user_succeeds() {
        let db_connection = get_db_connection();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let inserted_user =
            create_user("Іван Петров Сидорович", password_hash.clone(), &db_connection).unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.full_name, "Іван Петров Сидорович");
        assert_eq!(inserted_user.password_hash, password_hash);
    }

    #[test]
    fn insert_duplicate_full_name_fails() {
        let db_connection = get_db_connection();
        let full_name = "Іван Петров Сидорович";
        create_user(full_name, PasswordHash::new_unchecked("hunter2"), &db_connection).unwrap();

        let result = create_user(
            full_name,
            PasswordHash::new_unchecked("hunter3"),
            &db_connection,
        );

        assert_eq!(result, Err(Error::DuplicateFullName(full_name.to_owned())));
    }

    #[test]
    fn full_name_lookup_is_case_sensitive() {
        let db_connection = get_db_connection();
        create_user(
            "Іван Петров Сидорович",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let result = get_user_by_full_name("іван петров сидорович", &db_connection);

        assert_eq!(result, Err(Error::UserNotFound));
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let db_connection = get_db_connection();

        let id = UserID::new(42);

        assert_eq!(get_user_by_id(id, &db_connection), Err(Error::NotFound));
    }

    #[test]
    fn get_user_succeeds_with_existing_full_name() {
        let db_connection = get_db_connection();
        let test_user = create_user(
            "Ivan Petrov Sydorovych",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let retrieved_user = get_user_by_full_name("Ivan Petrov Sydorovych", &db_connection).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn update_password_replaces_stored_hash() {
        let db_connection = get_db_connection();
        let test_user = create_user(
            "Ivan Petrov Sydorovych",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();
        let new_hash = PasswordHash::new_unchecked("hunter3");

        update_password(test_user.id, &new_hash, &db_connection).unwrap();

        let retrieved_user = get_user_by_id(test_user.id, &db_connection).unwrap();
        assert_eq!(retrieved_user.password_hash, new_hash);
    }

    #[test]
    fn update_password_fails_with_non_existent_id() {
        let db_connection = get_db_connection();

        let result = update_password(
            UserID::new(42),
            &PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }
}
