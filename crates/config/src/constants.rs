//! Fixed names and defaults for semgate
//!
//! The demo defaults mirror the classic printer and library-tables programs:
//! two users on one printer, six students on three tables, two seconds each.

pub const APP_NAME: &str = "semgate";
pub const CONFIG_FILE: &str = "config.toml";
pub const LOGS_DIR: &str = "logs";

pub const DEFAULT_HOLD_MS: u64 = 2000;
pub const DEFAULT_PRINTER_USERS: [&str; 2] = ["User1", "User2"];
pub const DEFAULT_TABLES: usize = 3;
pub const DEFAULT_STUDENTS: usize = 6;
