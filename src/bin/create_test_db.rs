use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use skarbnyk_rs::{
    NewRecord, PasswordHash, RecordType, create_record, create_user, initialize_db,
};

/// A utility for creating a test database for the skarbnyk_rs web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const TEST_FULL_NAME: &str = "Тест Тестов Тестович";
const TEST_PASSWORD: &str = "Test123!";

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user {TEST_FULL_NAME} with password {TEST_PASSWORD:?}...");

    let password_hash = PasswordHash::from_raw_password(TEST_PASSWORD, PasswordHash::DEFAULT_COST)?;
    let user = create_user(TEST_FULL_NAME, password_hash, &conn)?;

    println!("Creating sample records...");

    let today = OffsetDateTime::now_utc().date();
    let samples = [
        (RecordType::Income, "Salary", Some("Monthly pay"), 2500.0, 5, true),
        (RecordType::Income, "Gift", Some("Birthday"), 150.0, 4, false),
        (RecordType::Income, "Other", None, 40.0, 3, false),
        (RecordType::Expense, "Food", Some("Groceries"), 85.5, 4, false),
        (RecordType::Expense, "Food", Some("Takeaway"), 22.0, 2, false),
        (RecordType::Expense, "Housing", Some("Rent"), 900.0, 3, true),
        (RecordType::Expense, "Transport", None, 35.0, 3, false),
        (RecordType::Expense, "Entertainment", Some("Cinema"), 18.0, 5, false),
    ];

    for (offset_days, (record_type, category, name, amount, rating, is_monthly)) in
        samples.into_iter().enumerate()
    {
        let date = today - Duration::days(offset_days as i64 * 3);
        let record =
            NewRecord::validate(record_type, date, category, name, amount, rating, is_monthly, today)?;

        create_record(record, user.id, &conn)?;
    }

    println!("Success!");

    Ok(())
}
