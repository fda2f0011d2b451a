//! Unified output formatting for consistent CLI presentation.
//!
//! Destination lines go to stdout so they can be piped into a picker.
//! Messages for the user (errors, confirmations, config warnings) go to
//! stderr and never mix with the list.
//!
//! # Markers
//! - `■` a configured directory with a live session
//! - `□` a live session with no configured directory
//! - blank for everything else, so names stay aligned

use crate::core::types::Destination;
use colored::*;

pub const MARKER_DIR_SESSION: &str = "■";
pub const MARKER_STANDALONE_SESSION: &str = "□";

/// Formats and prints an error message with consistent styling
///
/// # Format
/// ```text
///
/// ✕ Error: <message>
///
/// ```
pub fn print_error(message: &str) {
    eprintln!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Formats and prints a non-fatal warning
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "! Warning:".yellow(), message.white());
}

/// Formats and prints a success message with consistent styling
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.white());
}

/// Formats and prints an informational message
pub fn print_info(message: &str) {
    eprintln!("{}", message.white());
}

pub fn marker(destination: &Destination) -> &'static str {
    if destination.is_standalone_session() {
        MARKER_STANDALONE_SESSION
    } else if destination.has_active_session {
        MARKER_DIR_SESSION
    } else {
        " "
    }
}

/// One picker line: marker, name and the dimmed project context
pub fn format_destination(destination: &Destination) -> String {
    let marker = match marker(destination) {
        MARKER_DIR_SESSION => MARKER_DIR_SESSION.green().to_string(),
        MARKER_STANDALONE_SESSION => MARKER_STANDALONE_SESSION.cyan().to_string(),
        blank => blank.to_string(),
    };

    if destination.context.is_empty() || destination.context == destination.name {
        format!("{marker} {}", destination.name)
    } else {
        format!(
            "{marker} {} {}",
            destination.name,
            destination.context.bright_black()
        )
    }
}

pub fn print_destinations(destinations: &[Destination]) {
    for destination in destinations {
        println!("{}", format_destination(destination));
    }
}
