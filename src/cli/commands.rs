//! # Dot Command Handler
//!
//! Parses and executes meta-commands for introspection and loop control.
//! Dot commands start with a period and bypass the statement preparer.
//!
//! | Command      | Description                                  |
//! |--------------|----------------------------------------------|
//! | `.exit`      | Flush the pager and leave the REPL           |
//! | `.btree`     | Dump the tree structure                      |
//! | `.constants` | Print the layout constants                   |
//!
//! Anything else starting with `.` is reported as unrecognized and the
//! loop continues.

use eyre::Result;

use crate::config::{
    COMMON_NODE_HEADER_SIZE, LEAF_NODE_CELL_SIZE, LEAF_NODE_HEADER_SIZE, LEAF_NODE_MAX_CELLS,
    LEAF_NODE_SPACE_FOR_CELLS, ROW_SIZE,
};
use crate::database::Database;

#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    Exit,
    Output(String),
    Error(String),
}

pub struct CommandHandler;

impl CommandHandler {
    pub fn is_command(input: &str) -> bool {
        input.starts_with('.')
    }

    pub fn execute(input: &str, db: &mut Database) -> Result<CommandResult> {
        match input {
            ".exit" => Ok(CommandResult::Exit),
            ".btree" => Ok(CommandResult::Output(db.tree_display()?)),
            ".constants" => Ok(CommandResult::Output(constants_text())),
            other => Ok(CommandResult::Error(format!(
                "Unrecognized command '{}'.",
                other
            ))),
        }
    }
}

fn constants_text() -> String {
    format!(
        "Constants:\n\
         ROW_SIZE: {}\n\
         COMMON_NODE_HEADER_SIZE: {}\n\
         LEAF_NODE_HEADER_SIZE: {}\n\
         LEAF_NODE_CELL_SIZE: {}\n\
         LEAF_NODE_SPACE_FOR_CELLS: {}\n\
         LEAF_NODE_MAX_CELLS: {}",
        ROW_SIZE,
        COMMON_NODE_HEADER_SIZE,
        LEAF_NODE_HEADER_SIZE,
        LEAF_NODE_CELL_SIZE,
        LEAF_NODE_SPACE_FOR_CELLS,
        LEAF_NODE_MAX_CELLS
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db")).unwrap();
        (db, dir)
    }

    #[test]
    fn dot_prefix_marks_commands() {
        assert!(CommandHandler::is_command(".exit"));
        assert!(!CommandHandler::is_command("insert 1 a b"));
    }

    #[test]
    fn exit_command_signals_exit() {
        let (mut db, _dir) = test_db();

        let result = CommandHandler::execute(".exit", &mut db).unwrap();
        assert_eq!(result, CommandResult::Exit);
    }

    #[test]
    fn constants_output_is_stable() {
        let (mut db, _dir) = test_db();

        let result = CommandHandler::execute(".constants", &mut db).unwrap();
        assert_eq!(
            result,
            CommandResult::Output(
                "Constants:\n\
                 ROW_SIZE: 293\n\
                 COMMON_NODE_HEADER_SIZE: 6\n\
                 LEAF_NODE_HEADER_SIZE: 10\n\
                 LEAF_NODE_CELL_SIZE: 297\n\
                 LEAF_NODE_SPACE_FOR_CELLS: 4086\n\
                 LEAF_NODE_MAX_CELLS: 13"
                    .to_string()
            )
        );
    }

    #[test]
    fn btree_command_dumps_the_tree() {
        let (mut db, _dir) = test_db();

        let result = CommandHandler::execute(".btree", &mut db).unwrap();
        assert_eq!(
            result,
            CommandResult::Output("Tree:\nleaf (size 0)".to_string())
        );
    }

    #[test]
    fn unknown_command_is_reported() {
        let (mut db, _dir) = test_db();

        let result = CommandHandler::execute(".tables", &mut db).unwrap();
        assert_eq!(
            result,
            CommandResult::Error("Unrecognized command '.tables'.".to_string())
        );
    }
}
