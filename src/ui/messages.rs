//! Console reporting helpers. Errors go to stderr, everything else to stdout.

use crate::utils::colors::{CYAN, GREEN, RED, RESET, YELLOW};
use std::fmt;

const BOLD: &str = "\x1b[1m";

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", CYAN, BOLD, ICON_INFO, RESET, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", GREEN, BOLD, ICON_OK, RESET, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    eprintln!("{}{}{} {}{}", YELLOW, BOLD, ICON_WARN, RESET, msg);
}

/// Report a failed turn or command.
pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}{}{} {}{}", RED, BOLD, ICON_ERR, RESET, msg);
}

pub fn header<T: fmt::Display>(title: T) {
    println!("{}{}====================== {} ======================{}\n", CYAN, BOLD, title, RESET);
}
