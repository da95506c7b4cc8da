//! Integration tests for the processor module
//!
//! Tests the complete pipeline over temporary `.dly` files.


use std::path::Path;

/// Build a well-formed 269-character `.dly` line. Every day carries
/// `value` with blank flags.
pub fn dly_line(station: &str, year: u32, month: u32, element: &str, value: &str) -> String {
    let mut line = format!("{:<11}{:04}{:02}{:<4}", station, year, month, element);
    for _ in 0..31 {
        line.push_str(&format!("{:>5}   ", value));
    }
    line
}

pub fn write_dly(path: &Path, lines: &[String]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, lines.join("\n") + "\n").unwrap();
}
