use crate::model::{Function, Module, QUALIFIER_SEPARATOR};
use crate::parser::{LanguageParser, ParseError};
use std::cell::RefCell;
use std::path::{Component, Path};
use tree_sitter::{Node, Parser, Tree};

thread_local! {
    // one parser per rayon worker, created on first use
    static PYTHON_PARSER: RefCell<Option<Parser>> = const { RefCell::new(None) };
}

fn parse_tree(source: &str) -> Result<Tree, ParseError> {
    PYTHON_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            let mut parser = Parser::new();
            parser
                .set_language(&tree_sitter_python::LANGUAGE.into())
                .map_err(|e| ParseError::Parse(e.to_string()))?;
            *slot = Some(parser);
        }
        slot.as_mut()
            .and_then(|parser| parser.parse(source, None))
            .ok_or_else(|| ParseError::Parse("Failed to parse file".to_string()))
    })
}

/// Extracts functions, methods and the calls made from their bodies.
///
/// Qualified names are `<module>.<name>` or `<module>.<Class>.<name>`.
/// Calls are recorded the way the caller wrote them: `f()` as `f`,
/// `obj.m()` as `obj.m`, and `self.m()` inside a class as the method's
/// qualified name. Anything else is reduced to its final attribute.
pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageParser for PythonParser {
    fn extensions(&self) -> &[&str] {
        &["py"]
    }

    fn parse_module(&self, path: &Path, source: &str) -> Result<Module, ParseError> {
        let name = module_name(path);
        let tree = parse_tree(source)?;

        let mut visitor = Visitor {
            source: source.as_bytes(),
            module: &name,
            functions: Vec::new(),
        };
        visitor.visit(tree.root_node(), None, None);
        let functions = visitor.functions;

        Ok(Module {
            name,
            path: Some(path.display().to_string()),
            functions,
        })
    }
}

/// Dotted module path of a file relative to the project root:
/// `pkg/utils.py` is `pkg.utils` and `pkg/__init__.py` is `pkg`.
fn module_name(path: &Path) -> String {
    let mut parts: Vec<&str> = path
        .parent()
        .into_iter()
        .flat_map(|dir| dir.components())
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    if stem != "__init__" || parts.is_empty() {
        parts.push(stem);
    }
    parts.join(&QUALIFIER_SEPARATOR.to_string())
}

impl Default for PythonParser {
    fn default() -> Self {
        Self::new()
    }
}

struct Visitor<'a> {
    source: &'a [u8],
    module: &'a str,
    functions: Vec<Function>,
}

impl<'a> Visitor<'a> {
    fn text(&self, node: Node) -> Option<&'a str> {
        node.utf8_text(self.source).ok()
    }

    fn visit(&mut self, node: Node, class: Option<&'a str>, current: Option<usize>) {
        match node.kind() {
            "class_definition" => {
                let name = node.child_by_field_name("name").and_then(|n| self.text(n));
                if let (Some(name), Some(body)) = (name, node.child_by_field_name("body")) {
                    self.visit(body, Some(name), current);
                }
            }
            "function_definition" => {
                let Some(name) = node.child_by_field_name("name").and_then(|n| self.text(n))
                else {
                    return;
                };
                let idx = self.add_function(&node, name, class);
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit(body, class, Some(idx));
                }
            }
            kind => {
                if kind == "call" {
                    if let (Some(idx), Some(callee)) = (
                        current,
                        node.child_by_field_name("function")
                            .and_then(|f| self.callee(f, class)),
                    ) {
                        let calls = &mut self.functions[idx].calls;
                        if !calls.contains(&callee) {
                            calls.push(callee);
                        }
                    }
                }
                let mut cursor = node.walk();
                let children: Vec<Node> = node.named_children(&mut cursor).collect();
                for child in children {
                    self.visit(child, class, current);
                }
            }
        }
    }

    fn add_function(&mut self, node: &Node, name: &str, class: Option<&str>) -> usize {
        let qualified_name = match class {
            Some(class) => format!(
                "{}{sep}{}{sep}{}",
                self.module,
                class,
                name,
                sep = QUALIFIER_SEPARATOR
            ),
            None => format!("{}{}{}", self.module, QUALIFIER_SEPARATOR, name),
        };

        let params = node
            .child_by_field_name("parameters")
            .map(|p| self.params(p))
            .unwrap_or_default();

        let docstring = node
            .child_by_field_name("body")
            .and_then(|body| self.docstring(body));

        self.functions.push(Function {
            qualified_name,
            name: name.to_string(),
            module: self.module.to_string(),
            line_number: (node.start_position().row + 1) as u32,
            params,
            docstring,
            calls: Vec::new(),
            source: self.text(*node).map(str::to_string),
        });
        self.functions.len() - 1
    }

    fn params(&self, parameters: Node) -> Vec<String> {
        let mut cursor = parameters.walk();
        parameters
            .named_children(&mut cursor)
            .filter_map(|param| match param.kind() {
                "identifier" => self.text(param),
                "typed_parameter" => param
                    .named_child(0)
                    .filter(|n| n.kind() == "identifier")
                    .and_then(|n| self.text(n)),
                "default_parameter" | "typed_default_parameter" => param
                    .child_by_field_name("name")
                    .and_then(|n| self.text(n)),
                _ => None,
            })
            .filter(|name| *name != "self")
            .map(str::to_string)
            .collect()
    }

    fn docstring(&self, body: Node) -> Option<String> {
        let first = body.named_child(0)?;
        if first.kind() != "expression_statement" {
            return None;
        }
        let string = first.named_child(0).filter(|n| n.kind() == "string")?;
        clean_docstring(self.text(string)?)
    }

    fn callee(&self, function: Node, class: Option<&str>) -> Option<String> {
        match function.kind() {
            "identifier" => self.text(function).map(str::to_string),
            "attribute" => {
                let attr = self.text(function.child_by_field_name("attribute")?)?;
                let object = function.child_by_field_name("object")?;
                if object.kind() != "identifier" {
                    return Some(attr.to_string());
                }
                let object = self.text(object)?;
                Some(match class {
                    Some(class) if object == "self" => format!(
                        "{}{sep}{}{sep}{}",
                        self.module,
                        class,
                        attr,
                        sep = QUALIFIER_SEPARATOR
                    ),
                    _ => format!("{}{}{}", object, QUALIFIER_SEPARATOR, attr),
                })
            }
            _ => None,
        }
    }
}

/// Strip quotes and prefixes from a string literal and normalize its indentation.
fn clean_docstring(literal: &str) -> Option<String> {
    let body = literal.trim_start_matches(|c: char| "rRuUbBfF".contains(c));
    let body = ["\"\"\"", "'''", "\"", "'"]
        .iter()
        .find_map(|q| body.strip_prefix(q).and_then(|b| b.strip_suffix(q)))?;

    let mut lines = body.lines();
    let first = lines.next().unwrap_or("").trim().to_string();
    let rest: Vec<&str> = lines.collect();
    let indent = rest
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned = vec![first];
    cleaned.extend(
        rest.iter()
            .map(|l| l.get(indent..).unwrap_or("").trim_end().to_string()),
    );

    let text = cleaned.join("\n").trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}
