//! Configuration management for Larder.

use crate::common::{ReadExecutor, WriteExecutor};
use crate::errors::{ErrorKind, LarderError, LarderResult};
use crate::FIELD_SEPARATOR;

/// How the SQL backing store writes bound parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderStyle {
    /// `?` for every parameter (SQLite, MySQL, JDBC style).
    #[default]
    QuestionMark,
    /// `$1`, `$2`, ... (PostgreSQL style).
    Numbered,
}

/// Configuration shared by the backing stores.
///
/// The field separator is process-wide: it decides how every [Document]
/// splits embedded field paths, so it only changes when [apply] is called.
///
/// # Examples
///
/// ```rust
/// use larder::larder_config::{LarderConfig, PlaceholderStyle};
///
/// let config = LarderConfig::new().placeholder_style(PlaceholderStyle::Numbered);
/// assert_eq!(config.get_field_separator(), ".");
/// ```
///
/// [Document]: crate::store::Document
/// [apply]: LarderConfig::apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LarderConfig {
    field_separator: String,
    placeholder_style: PlaceholderStyle,
}

impl Default for LarderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LarderConfig {
    /// Creates a configuration with the default `.` separator and `?`
    /// placeholders.
    pub fn new() -> Self {
        LarderConfig {
            field_separator: ".".to_string(),
            placeholder_style: PlaceholderStyle::default(),
        }
    }

    /// Sets the separator used for embedded field paths.
    pub fn field_separator(mut self, separator: &str) -> Self {
        self.field_separator = separator.to_string();
        self
    }

    /// Sets how SQL parameters are written.
    pub fn placeholder_style(mut self, style: PlaceholderStyle) -> Self {
        self.placeholder_style = style;
        self
    }

    pub fn get_field_separator(&self) -> &str {
        &self.field_separator
    }

    pub fn get_placeholder_style(&self) -> PlaceholderStyle {
        self.placeholder_style
    }

    /// Installs this configuration's field separator process-wide.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if the separator is empty.
    pub fn apply(&self) -> LarderResult<()> {
        if self.field_separator.is_empty() {
            log::error!("Field separator cannot be empty");
            return Err(LarderError::new(
                "Field separator cannot be empty",
                ErrorKind::InvalidValue,
            ));
        }

        let previous = FIELD_SEPARATOR.read_with(|sep| sep.clone());
        if previous != self.field_separator {
            FIELD_SEPARATOR.write_with(|sep| *sep = self.field_separator.clone());
            log::info!(
                "Field separator changed from '{}' to '{}'",
                previous,
                self.field_separator
            );
        }
        Ok(())
    }

    /// Returns the separator currently installed process-wide.
    pub fn current_field_separator() -> String {
        FIELD_SEPARATOR.read_with(|sep| sep.clone())
    }
}
