use super::*;
use crate::tool_parser::ToolSpec;
use std::collections::HashSet;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &ExtractorConfig) -> ConfigResult<()> {
        if let Some(tags) = &config.reasoning_tags {
            Self::validate_delimiters(tags.open(), tags.close())?;
        }

        Self::validate_tools(config.tools.specs())?;

        if config.max_param_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_param_iterations".to_string(),
                value: config.max_param_iterations.to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    pub fn validate_delimiters(open: &str, close: &str) -> ConfigResult<()> {
        if open.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "reasoning_tags.open".to_string(),
            });
        }
        if close.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "reasoning_tags.close".to_string(),
            });
        }
        Ok(())
    }

    pub fn validate_tools(specs: &[ToolSpec]) -> ConfigResult<()> {
        let mut names = HashSet::new();
        for spec in specs {
            Self::validate_tag_name("tools.name", &spec.name)?;
            if !names.insert(spec.name.as_str()) {
                return Err(ConfigError::ValidationFailed {
                    reason: format!("Duplicate tool name '{}'", spec.name),
                });
            }

            let mut params = HashSet::new();
            for param in &spec.params {
                Self::validate_tag_name(&format!("tools.{}.params", spec.name), param)?;
                if !params.insert(param.as_str()) {
                    return Err(ConfigError::ValidationFailed {
                        reason: format!(
                            "Duplicate parameter '{}' for tool '{}'",
                            param, spec.name
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Names become `<name>` / `</name>` tags, so they must be non-empty and free of
    /// markup characters.
    fn validate_tag_name(field: &str, name: &str) -> ConfigResult<()> {
        if name.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: field.to_string(),
            });
        }
        if name
            .chars()
            .any(|c| c == '<' || c == '>' || c == '/' || c.is_whitespace())
        {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                value: name.to_string(),
                reason: "Must not contain '<', '>', '/' or whitespace".to_string(),
            });
        }
        Ok(())
    }
}
