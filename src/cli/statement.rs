//! # Statement Preparer
//!
//! Parses the two-statement grammar into executable form. Tokens are
//! whitespace-separated, one statement per line, case-sensitive:
//!
//! ```text
//! insert <id> <username> <email>
//! select
//! ```
//!
//! The preparer owns all user-input validation: ids parse as signed
//! decimal and negatives are rejected before the unsigned key layer ever
//! sees them, and text fields are length-checked in bytes against their
//! slot capacities. Tokens past the ones a statement consumes are ignored.
//!
//! Each error maps to a fixed message printed verbatim by the REPL.

use crate::config::{EMAIL_MAX_LENGTH, USERNAME_MAX_LENGTH};
use crate::record::Row;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    Select,
}

/// Recoverable preparation failures. The REPL prints these and keeps
/// reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepareError {
    Syntax,
    NegativeId,
    StringTooLong,
}

impl std::fmt::Display for PrepareError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrepareError::Syntax => write!(f, "Syntax error. Could not parse statement."),
            PrepareError::NegativeId => write!(f, "ID must be positive."),
            PrepareError::StringTooLong => write!(f, "String is too long."),
        }
    }
}

impl std::error::Error for PrepareError {}

pub fn prepare(input: &str) -> Result<Statement, PrepareError> {
    let mut tokens = input.split_ascii_whitespace();
    match tokens.next() {
        Some("insert") => {
            let id_token = tokens.next().ok_or(PrepareError::Syntax)?;
            let username = tokens.next().ok_or(PrepareError::Syntax)?;
            let email = tokens.next().ok_or(PrepareError::Syntax)?;

            let id: i64 = id_token.parse().map_err(|_| PrepareError::Syntax)?;
            if id < 0 {
                return Err(PrepareError::NegativeId);
            }
            let id = u32::try_from(id).map_err(|_| PrepareError::Syntax)?;

            if username.len() > USERNAME_MAX_LENGTH || email.len() > EMAIL_MAX_LENGTH {
                return Err(PrepareError::StringTooLong);
            }

            Ok(Statement::Insert(Row {
                id,
                username: username.to_string(),
                email: email.to_string(),
            }))
        }
        Some("select") => Ok(Statement::Select),
        _ => Err(PrepareError::Syntax),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_parses_all_three_fields() {
        let statement = prepare("insert 1 user1 person1@example.com").unwrap();

        assert_eq!(
            statement,
            Statement::Insert(Row {
                id: 1,
                username: "user1".to_string(),
                email: "person1@example.com".to_string(),
            })
        );
    }

    #[test]
    fn select_parses() {
        assert_eq!(prepare("select").unwrap(), Statement::Select);
    }

    #[test]
    fn missing_fields_are_a_syntax_error() {
        assert_eq!(prepare("insert"), Err(PrepareError::Syntax));
        assert_eq!(prepare("insert 1"), Err(PrepareError::Syntax));
        assert_eq!(prepare("insert 1 user1"), Err(PrepareError::Syntax));
    }

    #[test]
    fn unknown_keyword_is_a_syntax_error() {
        assert_eq!(prepare("update 1 a b"), Err(PrepareError::Syntax));
        assert_eq!(prepare(""), Err(PrepareError::Syntax));
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(prepare("INSERT 1 a b"), Err(PrepareError::Syntax));
        assert_eq!(prepare("SELECT"), Err(PrepareError::Syntax));
    }

    #[test]
    fn non_numeric_id_is_a_syntax_error() {
        assert_eq!(prepare("insert abc user1 a@b.c"), Err(PrepareError::Syntax));
    }

    #[test]
    fn negative_id_is_rejected() {
        assert_eq!(
            prepare("insert -1 cstack foo@bar.com"),
            Err(PrepareError::NegativeId)
        );
    }

    #[test]
    fn id_boundaries_are_accepted() {
        assert!(prepare("insert 0 a b").is_ok());
        assert!(prepare(&format!("insert {} a b", i32::MAX)).is_ok());
    }

    #[test]
    fn id_past_u32_is_a_syntax_error() {
        assert_eq!(
            prepare("insert 4294967296 a b"),
            Err(PrepareError::Syntax)
        );
    }

    #[test]
    fn max_length_strings_are_accepted() {
        let input = format!("insert 1 {} {}", "a".repeat(32), "b".repeat(255));
        assert!(prepare(&input).is_ok());
    }

    #[test]
    fn over_length_strings_are_rejected() {
        let long_username = format!("insert 1 {} b", "a".repeat(33));
        assert_eq!(prepare(&long_username), Err(PrepareError::StringTooLong));

        let long_email = format!("insert 1 a {}", "b".repeat(256));
        assert_eq!(prepare(&long_email), Err(PrepareError::StringTooLong));
    }

    #[test]
    fn negative_id_wins_over_long_strings() {
        let input = format!("insert -1 {} b", "a".repeat(40));
        assert_eq!(prepare(&input), Err(PrepareError::NegativeId));
    }

    #[test]
    fn trailing_tokens_are_ignored() {
        assert!(prepare("insert 1 user1 a@b.c extra tokens").is_ok());
        assert_eq!(prepare("select everything").unwrap(), Statement::Select);
    }
}
