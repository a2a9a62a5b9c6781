use serde_json::Value;

use crate::error::MalformedInputError;

/// One page of the category hierarchy. Parents own their children; the tree
/// is read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub url: String,
    pub children: Vec<Node>,
}

impl Node {
    pub fn leaf(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            children: Vec::new(),
        }
    }

    pub fn category(name: impl Into<String>, url: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        is_leaf(self)
    }
}

/// A node with no sub-categories is a listing page and gets scraped.
pub fn is_leaf(node: &Node) -> bool {
    node.children.is_empty()
}

/// Builds the tree from a parsed input document.
///
/// `categories` may be missing or empty (`null`, `[]`, `{}`, `""`, `false`,
/// `0`) to mark a leaf. Any node without a string `name` or `url` fails the
/// whole build.
pub fn build(raw: &Value) -> Result<Node, MalformedInputError> {
    build_at(raw, "root")
}

fn build_at(raw: &Value, path: &str) -> Result<Node, MalformedInputError> {
    let object = raw
        .as_object()
        .ok_or_else(|| MalformedInputError::new(path, "expected an object"))?;

    let name = required_str(object, "name", path)?;
    let url = required_str(object, "url", path)?;

    let children = match object.get("categories") {
        None => Vec::new(),
        Some(value) if is_empty_value(value) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, child)| build_at(child, &format!("{path}.categories[{i}]")))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(MalformedInputError::new(
                path,
                "`categories` must be an array",
            ));
        }
    };

    Ok(Node {
        name,
        url,
        children,
    })
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn required_str(
    object: &serde_json::Map<String, Value>,
    field: &str,
    path: &str,
) -> Result<String, MalformedInputError> {
    match object.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(MalformedInputError::new(
            path,
            format!("`{field}` must be a string"),
        )),
        None => Err(MalformedInputError::new(
            path,
            format!("missing required field `{field}`"),
        )),
    }
}
