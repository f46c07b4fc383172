//! Sentinel identifiers that mark model classes and documented fields.
//!
//! Matching is purely syntactic. A base reference `BaseModel`, `pydantic.BaseModel`
//! or `a.b.BaseModel` all count because their final path component is the
//! sentinel. Aliases introduced with `import ... as ...` are not resolved.

use pm_core::ExtractConfig;

/// Holds the base-class and field-factory names the extractor matches on.
///
/// # Examples
///
/// ```
/// use pm_py_parser::ModelMatcher;
///
/// let matcher = ModelMatcher::default();
/// assert!(matcher.is_model_base("BaseModel"));
/// assert!(!matcher.is_model_base("BaseSettings"));
/// assert!(matcher.is_field_factory("Field"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelMatcher {
    base_class: String,
    field_factory: String,
}

impl ModelMatcher {
    /// Creates a matcher for custom sentinel names.
    #[must_use]
    pub fn new(base_class: impl Into<String>, field_factory: impl Into<String>) -> Self {
        Self {
            base_class: base_class.into(),
            field_factory: field_factory.into(),
        }
    }

    /// Creates a matcher from the extraction section of the configuration.
    #[must_use]
    pub fn from_extract_config(config: &ExtractConfig) -> Self {
        Self::new(config.base_class.as_str(), config.field_factory.as_str())
    }

    /// The base-class sentinel.
    #[inline]
    #[must_use]
    pub fn base_class(&self) -> &str {
        &self.base_class
    }

    /// The field-factory sentinel.
    #[inline]
    #[must_use]
    pub fn field_factory(&self) -> &str {
        &self.field_factory
    }

    /// Returns `true` if `name` (the final component of a base reference) is the sentinel base.
    #[inline]
    #[must_use]
    pub fn is_model_base(&self, name: &str) -> bool {
        name == self.base_class
    }

    /// Returns `true` if `name` is the field-factory sentinel.
    #[inline]
    #[must_use]
    pub fn is_field_factory(&self, name: &str) -> bool {
        name == self.field_factory
    }
}

impl Default for ModelMatcher {
    fn default() -> Self {
        Self::from_extract_config(&ExtractConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sentinels() {
        let matcher = ModelMatcher::default();
        assert_eq!(matcher.base_class(), "BaseModel");
        assert_eq!(matcher.field_factory(), "Field");
    }

    #[test]
    fn test_exact_match_only() {
        let matcher = ModelMatcher::default();
        assert!(!matcher.is_model_base("basemodel"));
        assert!(!matcher.is_model_base("BaseModelMixin"));
        assert!(!matcher.is_field_factory("field"));
    }

    #[test]
    fn test_from_extract_config() {
        let config = ExtractConfig {
            base_class: "Schema".to_owned(),
            field_factory: "Attr".to_owned(),
        };
        let matcher = ModelMatcher::from_extract_config(&config);
        assert!(matcher.is_model_base("Schema"));
        assert!(!matcher.is_model_base("BaseModel"));
        assert!(matcher.is_field_factory("Attr"));
    }
}
