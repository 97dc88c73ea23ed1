//! The loaded, in-memory form of a [`TreeCfg`](crate::config::TreeCfg): a
//! flat node table plus the tag/version identifying it in the
//! [`Registry`](crate::registry::Registry) (spec §4.7 `load`).
//!
//! Node definitions are immutable and shared by every agent ticking this
//! tree; per-agent state lives in each agent's
//! [`NodeMemory`](crate::blackboard::NodeMemory).

use crate::class_loader::ClassLoader;
use crate::config::TreeCfg;
use crate::node::Node;
use crate::util::id::derive_clone_id;
use crate::{ConstString, NodeCategory};
use std::collections::BTreeMap;

/// Failures raised while assembling a [`Tree`] from its config.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The class loader rejected one of the tree's nodes.
    #[error(transparent)]
    ClassLoader(#[from] crate::class_loader::Error),
    /// A node's `children` (or the tree's `root`) named an id with no
    /// matching entry in `nodes`.
    #[error("tree '{tag}' references unknown node id '{id}'")]
    DanglingReference {
        /// The tree's tag.
        tag: ConstString,
        /// The missing node id.
        id: ConstString,
    },
    /// A node declared a `category` other than `composite`/`decorator`/`task`.
    #[error("node '{node}' has unknown category '{category}'")]
    UnknownCategory {
        /// The offending node's id.
        node: ConstString,
        /// The category string as written in config.
        category: std::string::String,
    },
}

fn category_of(node_id: &str, raw: &str) -> Result<NodeCategory, Error> {
    match raw {
        "composite" => Ok(NodeCategory::Composite),
        "decorator" => Ok(NodeCategory::Decorator),
        "task" => Ok(NodeCategory::Task),
        other => Err(Error::UnknownCategory { node: ConstString::from(node_id), category: other.into() }),
    }
}

/// A loaded tree: every node it declares, by id, plus which one is the root.
pub struct Tree {
    /// The tag this tree is registered under.
    pub tag: ConstString,
    /// The config's version hash, used to detect an unchanged reload.
    pub version: ConstString,
    /// The id of the root node.
    pub root: ConstString,
    nodes: BTreeMap<ConstString, Node>,
}

impl Tree {
    /// Build a `Tree` from a validated config: instantiate every node via
    /// `loader`, then wire parent/child links from each node's declared
    /// `children` list (spec §4.7: "wire composites via child-id lists, wire
    /// decorators to single children").
    pub fn load(cfg: &TreeCfg, loader: &ClassLoader) -> Result<Self, Error> {
        let tag: ConstString = cfg.tag.as_str().into();
        let mut nodes = BTreeMap::new();
        for (id, node_cfg) in &cfg.nodes {
            let kind = loader.new_kind(node_cfg)?;
            let category = category_of(id, &node_cfg.category)?;
            let delegate_target = node_cfg.delegator.as_ref().and_then(|d| d.target.as_deref()).map(ConstString::from);
            let delegate_method = node_cfg.delegator.as_ref().and_then(|d| d.method.as_deref()).map(ConstString::from);
            let has_script = node_cfg.delegator.as_ref().is_some_and(|d| d.script.is_some());
            let node_id: ConstString = id.as_str().into();
            nodes.insert(
                node_id.clone(),
                Node {
                    id: node_id.clone(),
                    name: ConstString::from(node_cfg.name.as_str()),
                    category,
                    kind,
                    parent: None,
                    children: node_cfg.children.iter().map(|c| ConstString::from(c.as_str())).collect(),
                    delegate_target,
                    delegate_method,
                    script_id: has_script.then(|| node_id.clone()),
                },
            );
        }
        let parent_links: std::vec::Vec<(ConstString, ConstString)> =
            nodes.values().flat_map(|n| n.children.iter().map(|c| (c.clone(), n.id.clone()))).collect();
        for (child, parent) in parent_links {
            match nodes.get_mut(&child) {
                Some(node) => node.parent = Some(parent),
                None => return Err(Error::DanglingReference { tag, id: child }),
            }
        }
        let root: ConstString = cfg.root.as_str().into();
        if !nodes.contains_key(&root) {
            return Err(Error::DanglingReference { tag, id: root });
        }
        Ok(Self { tag, version: cfg.version_hash().into(), root, nodes })
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Every node id this tree declares.
    pub fn node_ids(&self) -> impl Iterator<Item = &ConstString> {
        self.nodes.keys()
    }

    /// Deep-clone this tree under fresh node ids (spec §4.7 `mount_all`:
    /// "clone it (deep clone: each node gets a new id; same registered
    /// class; child wiring reconstructed top-down)"). Used to mount a second,
    /// independent instance of a tree already running elsewhere — as a
    /// `Subtree`/`DynamicSubtree` container's linked content, or a repeated
    /// `DynamicSubtree` mount. Compiled script ids are **not** remapped: a
    /// script is immutable program text, shared read-only by every clone,
    /// exactly like the node classes themselves.
    #[must_use]
    pub fn clone_with_fresh_ids(&self) -> Self {
        let id_map: BTreeMap<ConstString, ConstString> = self.nodes.keys().map(|id| (id.clone(), derive_clone_id(id))).collect();
        let nodes = self
            .nodes
            .iter()
            .map(|(old_id, node)| {
                let new_id = id_map[old_id].clone();
                let cloned = Node {
                    id: new_id.clone(),
                    name: node.name.clone(),
                    category: node.category,
                    kind: node.kind.clone(),
                    parent: node.parent.as_ref().map(|p| id_map[p].clone()),
                    children: node.children.iter().map(|c| id_map[c].clone()).collect(),
                    delegate_target: node.delegate_target.clone(),
                    delegate_method: node.delegate_method.clone(),
                    script_id: node.script_id.clone(),
                };
                (new_id, cloned)
            })
            .collect();
        Self { tag: self.tag.clone(), version: self.version.clone(), root: id_map[&self.root].clone(), nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_loader::ClassLoader;

    fn patrol_cfg() -> TreeCfg {
        let json = r#"{
            "root": "root",
            "tag": "patrol",
            "nodes": {
                "root": { "id": "root", "name": "Root", "category": "composite", "children": ["seq"] },
                "seq": { "id": "seq", "name": "Sequence", "category": "composite", "children": ["wait"] },
                "wait": { "id": "wait", "name": "Wait", "category": "task", "properties": { "waitTime": 100000000 } }
            }
        }"#;
        TreeCfg::parse(json).expect("valid config")
    }

    #[test]
    fn loads_and_wires_parent_links() {
        let cfg = patrol_cfg();
        let loader = ClassLoader::with_builtins();
        let tree = Tree::load(&cfg, &loader).expect("loads");
        assert_eq!(tree.node("seq").unwrap().parent.as_deref(), Some("root"));
        assert_eq!(tree.node("wait").unwrap().parent.as_deref(), Some("seq"));
    }

    #[test]
    fn dangling_child_reference_is_an_error() {
        let json = r#"{"root":"root","tag":"x","nodes":{"root":{"id":"root","name":"Root","category":"composite","children":["missing"]}}}"#;
        let cfg = TreeCfg::parse(json).unwrap();
        let loader = ClassLoader::with_builtins();
        assert!(matches!(Tree::load(&cfg, &loader), Err(Error::DanglingReference { .. })));
    }

    #[test]
    fn clone_assigns_fresh_ids_but_keeps_structure() {
        let cfg = patrol_cfg();
        let loader = ClassLoader::with_builtins();
        let tree = Tree::load(&cfg, &loader).expect("loads");
        let clone = tree.clone_with_fresh_ids();
        assert_ne!(clone.root, tree.root);
        assert_eq!(clone.node_ids().count(), 3);
        let cloned_root = clone.node(&clone.root).unwrap();
        assert_eq!(cloned_root.children.len(), 1);
        let cloned_seq = clone.node(&cloned_root.children[0]).unwrap();
        assert_eq!(cloned_seq.parent.as_deref(), Some(clone.root.as_ref()));
    }
}
