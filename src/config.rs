//! Tree configuration (spec §6 "Configuration — TreeCfg"): the JSON shape a
//! [`crate::tree::Tree`] is loaded from.
//!
//! `TreeCfg`/`NodeCfg`/`DelegatorCfg` derive `nanoserde::DeJson` for their
//! fixed fields; a node's `properties` blob is class-specific and has no
//! fixed shape, so it is parsed into the generic [`Value`] below by a
//! hand-rolled `DeJson` impl that walks tokens the way the teacher's
//! `JsonConfig` does for its own free-form sections.

use nanoserde::{DeJson, DeJsonErr, DeJsonErrReason, DeJsonState, DeJsonTok};
use std::collections::BTreeMap;
use std::str::Chars;

/// Errors raised while loading or validating a [`TreeCfg`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The JSON text did not parse.
    #[error("malformed tree config: {0}")]
    Malformed(std::string::String),
    /// `root` was empty.
    #[error("tree config is missing a root node id")]
    MissingRoot,
    /// `tag` was empty.
    #[error("tree config is missing a tag")]
    MissingTag,
    /// `nodes` was empty.
    #[error("tree config declares no nodes")]
    NoNodes,
    /// A node's `id`, `name` or `category` was empty.
    #[error("node '{0}' is missing a required field")]
    IncompleteNode(std::string::String),
}

impl From<DeJsonErr> for Error {
    fn from(err: DeJsonErr) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// A generic JSON value, used for a node's class-specific `properties` blob.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(std::string::String),
    Array(std::vec::Vec<Value>),
    Object(BTreeMap<std::string::String, Value>),
}

impl Value {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Parse this value as a duration, accepting a non-negative integer
    /// (nanoseconds) or a duration string (spec §6).
    #[must_use]
    pub fn as_duration(&self) -> Option<std::time::Duration> {
        match self {
            Self::Number(n) if *n >= 0.0 => Some(std::time::Duration::from_nanos(*n as u64)),
            Self::String(s) => crate::util::duration::parse(s).or_else(|| s.parse::<u64>().ok().map(std::time::Duration::from_nanos)),
            _ => None,
        }
    }
}

impl DeJson for Value {
    fn de_json(state: &mut DeJsonState, input: &mut Chars) -> Result<Self, DeJsonErr> {
        let value = match state.tok.clone() {
            DeJsonTok::Null => {
                state.next_tok(input)?;
                Self::Null
            }
            DeJsonTok::Bool(b) => {
                state.next_tok(input)?;
                Self::Bool(b)
            }
            DeJsonTok::U64(n) => {
                state.next_tok(input)?;
                Self::Number(n as f64)
            }
            DeJsonTok::I64(n) => {
                state.next_tok(input)?;
                Self::Number(n as f64)
            }
            DeJsonTok::F64(n) => {
                state.next_tok(input)?;
                Self::Number(n)
            }
            DeJsonTok::Str => {
                let s = state.strbuf.clone();
                state.next_tok(input)?;
                Self::String(s)
            }
            DeJsonTok::BlockOpen => {
                state.next_tok(input)?;
                let mut items = std::vec::Vec::new();
                while state.tok != DeJsonTok::BlockClose {
                    items.push(Self::de_json(state, input)?);
                    if state.tok == DeJsonTok::Comma {
                        state.next_tok(input)?;
                    }
                }
                state.next_tok(input)?;
                Self::Array(items)
            }
            DeJsonTok::CurlyOpen => {
                state.next_tok(input)?;
                let mut fields = BTreeMap::new();
                while state.tok != DeJsonTok::CurlyClose {
                    let DeJsonTok::Str = state.tok.clone() else {
                        return Err(DeJsonErr { line: state.line, col: state.col, msg: DeJsonErrReason::UnexpectedToken(state.tok.clone(), state.strbuf.clone()) });
                    };
                    let key = state.strbuf.clone();
                    state.next_tok(input)?;
                    if state.tok == DeJsonTok::Colon {
                        state.next_tok(input)?;
                    }
                    fields.insert(key, Self::de_json(state, input)?);
                    if state.tok == DeJsonTok::Comma {
                        state.next_tok(input)?;
                    }
                }
                state.next_tok(input)?;
                Self::Object(fields)
            }
            other => return Err(DeJsonErr { line: state.line, col: state.col, msg: DeJsonErrReason::UnexpectedToken(other, state.strbuf.clone()) }),
        };
        Ok(value)
    }
}

/// The `delegator` block of a node's config: the delegate target/method
/// and/or a script to compile.
#[derive(Debug, Clone, Default, DeJson)]
pub struct DelegatorCfg {
    #[nserde(default)]
    pub target: Option<std::string::String>,
    #[nserde(default)]
    pub method: Option<std::string::String>,
    #[nserde(default)]
    pub script: Option<std::string::String>,
}

/// One node's declaration within a [`TreeCfg`].
#[derive(Debug, Clone, DeJson)]
pub struct NodeCfg {
    pub id: std::string::String,
    pub name: std::string::String,
    pub category: std::string::String,
    #[nserde(default)]
    pub title: std::string::String,
    #[nserde(default)]
    pub children: std::vec::Vec<std::string::String>,
    #[nserde(default)]
    pub properties: Value,
    #[nserde(default)]
    pub delegator: Option<DelegatorCfg>,
}

impl Default for Value {
    fn default() -> Self {
        Self::Object(BTreeMap::new())
    }
}

impl NodeCfg {
    /// Validate the fields every node needs regardless of class (spec §4.7
    /// `load`: "instantiate each node via the class loader").
    pub fn validate(&self) -> Result<(), Error> {
        if self.id.is_empty() || self.name.is_empty() || self.category.is_empty() {
            return Err(Error::IncompleteNode(self.id.clone()));
        }
        Ok(())
    }
}

/// A whole tree's configuration, as loaded from JSON (spec §6).
#[derive(Debug, Clone, DeJson)]
pub struct TreeCfg {
    pub root: std::string::String,
    pub tag: std::string::String,
    #[nserde(default)]
    pub ver: std::string::String,
    #[nserde(default)]
    pub description: std::string::String,
    pub nodes: BTreeMap<std::string::String, NodeCfg>,
}

impl TreeCfg {
    /// Parse a `TreeCfg` from JSON text and validate the shape-independent
    /// invariants `load` checks before touching the class loader.
    pub fn parse(json: &str) -> Result<Self, Error> {
        let cfg: Self = DeJson::deserialize_json(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.root.is_empty() {
            return Err(Error::MissingRoot);
        }
        if self.tag.is_empty() {
            return Err(Error::MissingTag);
        }
        if self.nodes.is_empty() {
            return Err(Error::NoNodes);
        }
        for node in self.nodes.values() {
            node.validate()?;
        }
        Ok(())
    }

    /// A stable hash of the config text, used to detect an already-loaded
    /// tree under the same tag (spec §4.7: "same tag & version hash").
    #[must_use]
    pub fn version_hash(&self) -> std::string::String {
        if !self.ver.is_empty() {
            return self.ver.clone();
        }
        std::format!("{:x}", fnv1a(self.root.as_bytes()) ^ fnv1a(self.tag.as_bytes()) ^ fnv1a_nodes(&self.nodes))
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

fn fnv1a_nodes(nodes: &BTreeMap<std::string::String, NodeCfg>) -> u64 {
    let mut acc = 0u64;
    for (id, node) in nodes {
        acc ^= fnv1a(id.as_bytes());
        acc ^= fnv1a(node.name.as_bytes());
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_tree() {
        let json = r#"{
            "root": "root",
            "tag": "patrol",
            "nodes": {
                "root": { "id": "root", "name": "Root", "category": "composite", "children": ["wait"] },
                "wait": { "id": "wait", "name": "Wait", "category": "task", "properties": { "waitTime": 200000000, "forever": false } }
            }
        }"#;
        let cfg = TreeCfg::parse(json).expect("valid config parses");
        assert_eq!(cfg.tag, "patrol");
        assert_eq!(cfg.nodes.len(), 2);
        let wait = &cfg.nodes["wait"];
        assert_eq!(wait.properties.as_array(), None);
    }

    #[test]
    fn rejects_a_missing_tag() {
        let json = r#"{"root":"root","tag":"","nodes":{"root":{"id":"root","name":"Root","category":"composite"}}}"#;
        assert!(matches!(TreeCfg::parse(json), Err(Error::MissingTag)));
    }

    #[test]
    fn rejects_an_empty_node_list() {
        let json = r#"{"root":"root","tag":"x","nodes":{}}"#;
        assert!(matches!(TreeCfg::parse(json), Err(Error::NoNodes)));
    }

    #[test]
    fn duration_property_accepts_integer_nanos_and_strings() {
        assert_eq!(Value::Number(200_000_000.0).as_duration(), Some(std::time::Duration::from_millis(200)));
        assert_eq!(Value::String("200ms".into()).as_duration(), Some(std::time::Duration::from_millis(200)));
    }
}
