use std::path::Path;

/// # Errors
///
/// Will return `Err` if the directory that should hold the database does not exist
pub fn check_db_path(file: &str) -> Result<String, String> {
    let path = Path::new(file);
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => Err(format!(
            "The directory for database '{file}' does not exist."
        )),
        _ => Ok(file.to_string()),
    }
}

/// # Errors
///
/// Will return `Err` if the value is not a positive integer
pub fn check_positive_millis(value: &str) -> Result<u64, String> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err("The store timeout must be greater than zero.".to_string()),
        Ok(ms) => Ok(ms),
        Err(e) => Err(format!("The store timeout '{value}' is not a number: {e}")),
    }
}
