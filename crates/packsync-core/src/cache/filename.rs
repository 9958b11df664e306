//! Cache filename validation.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Why a candidate cache filename was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenameProblem {
    Empty,
    Reserved,
    Hidden,
    Separator,
    ControlChar,
    TooLong,
}

impl std::fmt::Display for FilenameProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FilenameProblem::Empty => "empty name",
            FilenameProblem::Reserved => "reserved name",
            FilenameProblem::Hidden => "hidden name",
            FilenameProblem::Separator => "contains a path separator",
            FilenameProblem::ControlChar => "contains a control character",
            FilenameProblem::TooLong => "longer than 255 bytes",
        };
        f.write_str(s)
    }
}

/// Checks that `name` is a single plain path segment usable inside the cache
/// namespace.
///
/// Rejects `""`, `.`, `..`, names starting with `.` (those are reserved for
/// in-flight temp files and are excluded from listings), `/`, `\`, NUL and
/// other control characters, and names over 255 bytes.
pub fn check_filename(name: &str) -> Result<(), FilenameProblem> {
    if name.is_empty() {
        return Err(FilenameProblem::Empty);
    }
    if name == "." || name == ".." {
        return Err(FilenameProblem::Reserved);
    }
    if name.starts_with('.') {
        return Err(FilenameProblem::Hidden);
    }
    if name.contains(['/', '\\']) {
        return Err(FilenameProblem::Separator);
    }
    if name.chars().any(|c| c.is_control()) {
        return Err(FilenameProblem::ControlChar);
    }
    if name.len() > NAME_MAX {
        return Err(FilenameProblem::TooLong);
    }
    Ok(())
}
