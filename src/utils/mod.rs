//! Utility functions and helpers.

pub mod http;
pub mod log;

use url::Url;

/// Parse a base URL and append query parameters.
pub fn with_query(base: &str, params: &[(&str, &str)]) -> crate::error::Result<Url> {
    Ok(Url::parse_with_params(base, params)?)
}

/// Substitute `{key}` placeholders in a template.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}
