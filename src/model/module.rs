use serde::{Deserialize, Deserializer, Serialize};

/// Separator between a module name and the names nested inside it.
pub const QUALIFIER_SEPARATOR: char = '.';

/// One source module as delivered by `/diagram-data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub functions: Vec<Function>,
}

/// A function (or method) definition and the raw call references made from its body.
///
/// Optional fields are normalized here so consumers never branch on absence:
/// `params` and `calls` are always lists, and an empty docstring is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub qualified_name: String,
    pub name: String,
    pub module: String,
    pub line_number: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub params: Vec<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub docstring: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub calls: Vec<String>,
    /// Text of the definition, fed to the chat model as context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            functions: Vec::new(),
        }
    }

    pub fn with_function(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }
}

impl Function {
    /// Create a function qualified under `module`, with no params, docstring or calls.
    pub fn new(module: &str, name: &str, line_number: u32) -> Self {
        Self {
            qualified_name: format!("{}{}{}", module, QUALIFIER_SEPARATOR, name),
            name: name.to_string(),
            module: module.to_string(),
            line_number,
            params: Vec::new(),
            docstring: None,
            calls: Vec::new(),
            source: None,
        }
    }

    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        let docstring = docstring.into();
        self.docstring = if docstring.trim().is_empty() {
            None
        } else {
            Some(docstring)
        };
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_calls<I, S>(mut self, calls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.calls = calls.into_iter().map(Into::into).collect();
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_normalize_to_empty() {
        let json = r#"{
            "qualified_name": "app.index",
            "name": "index",
            "module": "app",
            "line_number": 42
        }"#;
        let f: Function = serde_json::from_str(json).unwrap();

        assert!(f.params.is_empty());
        assert!(f.calls.is_empty());
        assert_eq!(f.docstring, None);
    }

    #[test]
    fn test_null_and_blank_fields_normalize() {
        let json = r#"{
            "qualified_name": "app.upload",
            "name": "upload",
            "module": "app",
            "line_number": 7,
            "params": null,
            "docstring": "   ",
            "calls": null
        }"#;
        let f: Function = serde_json::from_str(json).unwrap();

        assert!(f.params.is_empty());
        assert!(f.calls.is_empty());
        assert_eq!(f.docstring, None);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let json = r#"[{
            "name": "code_parser",
            "path": "workspace/code_parser.py",
            "functions": [{
                "qualified_name": "code_parser.safe_read_file",
                "name": "safe_read_file",
                "module": "code_parser",
                "line_number": 5,
                "params": ["file_path"],
                "docstring": "Read a file, tolerating bad encodings.",
                "calls": ["open"],
                "class": null,
                "parent": null,
                "source": "def safe_read_file(file_path): ...",
                "end_line": 14
            }]
        }]"#;
        let modules: Vec<Module> = serde_json::from_str(json).unwrap();

        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].path.as_deref(), Some("workspace/code_parser.py"));
        let f = &modules[0].functions[0];
        assert_eq!(f.params, vec!["file_path"]);
        assert_eq!(f.calls, vec!["open"]);
        assert_eq!(
            f.docstring.as_deref(),
            Some("Read a file, tolerating bad encodings.")
        );
        assert_eq!(f.source.as_deref(), Some("def safe_read_file(file_path): ..."));
    }

    #[test]
    fn test_missing_qualified_name_is_rejected() {
        let json = r#"{"name": "f", "module": "m", "line_number": 1}"#;
        assert!(serde_json::from_str::<Function>(json).is_err());
    }
}
