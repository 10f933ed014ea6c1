//! Buffer configuration
//!
//! [`BufferConfig`] describes a buffer declaratively so it can be built from a
//! TOML file as well as from code:
//!
//! ```toml
//! capacity = 4
//! shape = [3]
//! dtype = "float64"
//! layout = "C"
//! overwrite = true            # QueueBuffer only
//! namespace = ["a", "b", "c", "d"]  # StateBuffer only
//! ```
//!
//! Every variant builds from the same struct; a variant that has no use for a
//! field logs a warning when the field is set.

use serde::{Deserialize, Serialize};
use slabbuf_core::{BufferError, BufferResult, DType, ElementSpec, Layout, Shape};
use std::collections::HashSet;
use std::path::Path;

/// Declarative buffer description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BufferConfig {
    /// Number of slots
    pub capacity: usize,
    /// Element shape; empty for scalars
    #[serde(default)]
    pub shape: Shape,
    /// Element type
    #[serde(default)]
    pub dtype: DType,
    /// Layout hint
    #[serde(default)]
    pub layout: Layout,
    /// Evict the oldest element when full (QueueBuffer)
    #[serde(default)]
    pub overwrite: bool,
    /// Slot keys, one per slot (StateBuffer)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<Vec<String>>,
}

impl BufferConfig {
    /// Scalar `float64` buffer of `capacity` slots
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            shape: Shape::scalar(),
            dtype: DType::default(),
            layout: Layout::default(),
            overwrite: false,
            namespace: None,
        }
    }

    /// Set the element shape
    pub fn shape(mut self, shape: impl Into<Shape>) -> Self {
        self.shape = shape.into();
        self
    }

    /// Set the element type
    pub fn dtype(mut self, dtype: DType) -> Self {
        self.dtype = dtype;
        self
    }

    /// Set the layout hint
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Enable or disable queue overwrite
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Set the state namespace
    pub fn namespace<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.namespace = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for malformed TOML, unknown fields or a description
    /// that fails [`validate`](Self::validate).
    pub fn from_toml_str(source: &str) -> BufferResult<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| BufferError::invalid_config(format!("malformed configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read; otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> BufferResult<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    /// Serialize to a TOML document
    pub fn to_toml_string(&self) -> BufferResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| BufferError::invalid_config(format!("unserializable configuration: {}", e)))
    }

    /// Check the description is buildable
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if `capacity` is zero or namespace keys repeat
    /// - `NamespaceLengthMismatch` if the namespace does not name every slot
    pub fn validate(&self) -> BufferResult<()> {
        if self.capacity == 0 {
            return Err(BufferError::invalid_config("capacity must be positive"));
        }
        if let Some(keys) = &self.namespace {
            validate_namespace(keys, self.capacity)?;
        }
        Ok(())
    }

    /// Element spec of the described buffer
    pub fn element_spec(&self) -> ElementSpec {
        ElementSpec::new(self.shape.clone(), self.dtype).with_layout(self.layout)
    }

    /// Warn about set fields the building variant does not use
    pub fn warn_ignored(&self, variant: &str, uses_overwrite: bool, uses_namespace: bool) {
        if self.overwrite && !uses_overwrite {
            tracing::warn!(
                target: "slabbuf::config",
                variant,
                field = "overwrite",
                "configuration field ignored"
            );
        }
        if self.namespace.is_some() && !uses_namespace {
            tracing::warn!(
                target: "slabbuf::config",
                variant,
                field = "namespace",
                "configuration field ignored"
            );
        }
    }
}

/// Check `keys` name each of `capacity` slots exactly once
///
/// # Errors
///
/// `NamespaceLengthMismatch` on a length mismatch, `InvalidConfig` on a
/// repeated key.
pub fn validate_namespace(keys: &[String], capacity: usize) -> BufferResult<()> {
    if keys.len() != capacity {
        return Err(BufferError::NamespaceLengthMismatch {
            expected: capacity,
            actual: keys.len(),
        });
    }
    let mut seen = HashSet::with_capacity(keys.len());
    for key in keys {
        if !seen.insert(key.as_str()) {
            return Err(BufferError::invalid_config(format!(
                "duplicate namespace key '{}'",
                key
            )));
        }
    }
    Ok(())
}
