use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

use super::node::Node;

/// Simple selector: `tag`, `#id` or `.class`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Tag(String),
    Id(String),
    Class(String),
}

impl Selector {
    pub fn matches(&self, node: &Node) -> bool {
        let Some(name) = node.element_name() else {
            return false;
        };
        match self {
            Selector::Tag(tag) => name.eq_ignore_ascii_case(tag),
            Selector::Id(id) => node.attribute("id") == Some(id.as_str()),
            Selector::Class(class) => node.has_class(class),
        }
    }
}

impl FromStr for Selector {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let valid = |value: &str| {
            !value.is_empty()
                && value
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':')
        };

        let selector = if let Some(id) = s.strip_prefix('#') {
            Selector::Id(id.to_string())
        } else if let Some(class) = s.strip_prefix('.') {
            Selector::Class(class.to_string())
        } else {
            Selector::Tag(s.to_ascii_lowercase())
        };

        let value = match &selector {
            Selector::Tag(v) | Selector::Id(v) | Selector::Class(v) => v,
        };
        if !valid(value) {
            return Err(anyhow!("Invalid selector: '{}'", s));
        }
        Ok(selector)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Tag(tag) => write!(f, "{}", tag),
            Selector::Id(id) => write!(f, "#{}", id),
            Selector::Class(class) => write!(f, ".{}", class),
        }
    }
}
