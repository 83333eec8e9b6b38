/// Validates that text can be written on a single reduction-file line and read
/// back unchanged.
///
/// # Arguments
///
/// * `entry` - The text to validate, e.g. a directory for a `path` directive.
///
/// # Returns
///
/// * `Ok(())` if the entry is valid.
/// * `Err(&'static str)` if the entry is empty, spans lines or would be cut by the
///   comment character.
pub fn is_valid_line_entry(entry: &str) -> Result<(), &'static str> {
    if entry.trim().is_empty() {
        return Err("Data entry cannot be empty");
    }
    if entry.contains(['\n', '\r']) {
        return Err("Data entry cannot span several lines");
    }
    if entry.contains('\0') {
        return Err("Data entry cannot contain null bytes");
    }
    if entry.contains('#') {
        return Err("Data entry cannot contain the comment character");
    }
    Ok(())
}

/// Validates that a data-block entry is read back as the same file entry.
///
/// # Arguments
///
/// * `entry` - The file path or glob pattern to validate.
///
/// # Returns
///
/// * `Ok(())` if the entry is valid.
/// * `Err(&'static str)` if the entry fails [`is_valid_line_entry`] or would be read
///   as a directive, a table line or a block marker.
pub fn is_valid_data_entry(entry: &str) -> Result<(), &'static str> {
    is_valid_line_entry(entry)?;

    let mut tokens = entry.split_whitespace();
    let first = tokens.next().unwrap_or_default();
    if first.starts_with('|') {
        return Err("Data entry cannot start with the table delimiter");
    }
    if first == "path" || first == "skip" {
        return Err("Data entry cannot start with a directive keyword");
    }
    if (first == "data" || first == "setup") && matches!(tokens.next(), Some("read" | "end")) {
        return Err("Data entry cannot be a block marker");
    }
    Ok(())
}

/// Validates that a sorted list of indices is exactly `1..=N`.
///
/// # Arguments
///
/// * `indices` - Indices sorted in ascending order.
///
/// # Returns
///
/// * `Ok(())` if the indices are sequential and 1-indexed.
/// * `Err(&'static str)` otherwise.
pub fn is_sequential_from_one(indices: &[usize]) -> Result<(), &'static str> {
    if indices.iter().enumerate().all(|(i, &n)| n == i + 1) {
        Ok(())
    } else {
        Err("Indices must be sequential and 1-indexed")
    }
}

/// Validates if a given string is not empty.
///
/// # Arguments
///
/// * `value` - The string to validate.
///
/// # Returns
///
/// * `Ok(())` if the string is not empty.
/// * `Err(&'static str)` if the string is empty.
pub fn is_not_empty(value: &str) -> Result<(), &'static str> {
    if !value.is_empty() {
        Ok(())
    } else {
        Err("Value cannot be empty")
    }
}
