//! Builds a handful of queries over a `Person` collection and prints them.
//!
//! Run with `-v` / `--verbose` to see the compiled-query debug events.

use clap::Parser;
use docquery_core::{FieldFilter, SortOrder, TypedQuery};
use docquery_derive::Document;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[allow(dead_code)]
#[derive(Debug, Document)]
#[document(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    #[column(name = "dob")]
    pub date_of_birth: Option<chrono::NaiveDateTime>,
    pub email: Option<String>,
    pub education_level: Option<String>,
}

/// Prints sample queries over a `Person` collection.
#[derive(Parser)]
#[command(name = "person")]
#[command(about = "Prints sample queries over a Person collection")]
struct Args {
    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Setup logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let contact = (Person::email(), Person::first_name(), Person::date_of_birth());

    let paged = TypedQuery::<Person>::new()
        .select(contact)
        .where_is(Person::education_level(), "S3")
        .order_by(Person::first_name(), SortOrder::Asc)
        .skip(10)
        .take(10);
    info!("paged query");
    println!("{}", paged.build()?);

    let grouped = TypedQuery::<Person>::new()
        .select(Person::education_level())
        .select_raw_function_as("COUNT(1)", "people")?
        .group_by(Person::education_level())?;
    info!("grouped query");
    println!("{}", grouped.build()?);

    let nested = TypedQuery::<Person>::new()
        .from_subquery(|q| {
            q.select(contact).select_raw_function_as_field(
                "iif(C.educationLevel = 'S3', 'Doctor','Not Doctor')",
                Person::education_level(),
            )
        })?
        .where_is(Person::education_level(), "Doctor")
        .select_row_count();
    info!("row count over a subquery");
    println!("{}", nested.build()?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_flag() {
        assert!(!Args::try_parse_from(["person"]).unwrap().verbose);
        assert!(Args::try_parse_from(["person", "-v"]).unwrap().verbose);
        assert!(Args::try_parse_from(["person", "--verbose"]).unwrap().verbose);
    }

    #[test]
    fn test_help_is_not_a_run() {
        let err = Args::try_parse_from(["person", "--help"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Args::try_parse_from(["person", "--nope"]).is_err());
    }
}
