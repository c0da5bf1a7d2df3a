use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::{ConfigError, ConfigValidator};

/// A tool that may be invoked as `<name><param>value</param></name>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool name, also the XML tag name
    pub name: String,
    /// Legal parameter names in declared order
    #[serde(default)]
    pub params: Vec<String>,
}

impl ToolSpec {
    pub fn new<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    pub fn open_tag(&self) -> String {
        format!("<{}>", self.name)
    }

    pub fn close_tag(&self) -> String {
        format!("</{}>", self.name)
    }
}

/// Immutable mapping from tool name to its ordered parameter names.
///
/// Catalogue order matters: it is the order tools are reported in when two
/// opening tags could match at the same position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ToolSpec>", into = "Vec<ToolSpec>")]
pub struct ToolCatalogue {
    tools: Vec<ToolSpec>,
    open_tags: Vec<String>,
    index: HashMap<String, usize>,
}

impl ToolCatalogue {
    /// Create a validated catalogue
    pub fn new(tools: Vec<ToolSpec>) -> Result<Self, ConfigError> {
        ConfigValidator::validate_tools(&tools)?;
        Ok(Self::from_specs_unchecked(tools))
    }

    pub(crate) fn from_specs_unchecked(tools: Vec<ToolSpec>) -> Self {
        let open_tags = tools.iter().map(ToolSpec::open_tag).collect();
        let index = tools
            .iter()
            .enumerate()
            .map(|(i, tool)| (tool.name.clone(), i))
            .collect();
        Self {
            tools,
            open_tags,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn specs(&self) -> &[ToolSpec] {
        &self.tools
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Tool at a catalogue position
    pub fn spec_at(&self, index: usize) -> Option<&ToolSpec> {
        self.tools.get(index)
    }

    /// Opening tags (`<name>`) in catalogue order
    pub fn open_tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.open_tags.iter().map(String::as_str)
    }

    /// List all tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }
}

impl TryFrom<Vec<ToolSpec>> for ToolCatalogue {
    type Error = ConfigError;

    fn try_from(tools: Vec<ToolSpec>) -> Result<Self, Self::Error> {
        Self::new(tools)
    }
}

impl From<ToolCatalogue> for Vec<ToolSpec> {
    fn from(catalogue: ToolCatalogue) -> Self {
        catalogue.tools
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ToolCatalogue {
        ToolCatalogue::new(vec![
            ToolSpec::new("read_file", ["uri", "startLine", "endLine"]),
            ToolSpec::new("run_command", ["command", "cwd"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let catalogue = sample();
        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.get("run_command").unwrap().params, vec!["command", "cwd"]);
        assert!(catalogue.get("write_file").is_none());
        assert_eq!(catalogue.spec_at(0).unwrap().name, "read_file");
        assert_eq!(catalogue.names(), vec!["read_file", "run_command"]);
    }

    #[test]
    fn test_tags() {
        let catalogue = sample();
        let tags: Vec<&str> = catalogue.open_tags().collect();
        assert_eq!(tags, vec!["<read_file>", "<run_command>"]);
        assert_eq!(catalogue.spec_at(1).unwrap().close_tag(), "</run_command>");
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = ToolCatalogue::new(vec![
            ToolSpec::new("ls_dir", ["uri"]),
            ToolSpec::new("ls_dir", ["uri"]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_empty_name() {
        assert!(ToolCatalogue::new(vec![ToolSpec::new("", ["uri"])]).is_err());
    }

    #[test]
    fn test_deserialize() {
        let catalogue: ToolCatalogue = serde_json::from_str(
            r#"[{"name": "read_file", "params": ["uri"]}, {"name": "get_dir_tree"}]"#,
        )
        .unwrap();
        assert_eq!(catalogue.len(), 2);
        assert!(catalogue.get("get_dir_tree").unwrap().params.is_empty());

        let json = serde_json::to_value(&catalogue).unwrap();
        assert_eq!(json[0]["name"], "read_file");
    }
}
