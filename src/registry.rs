//! Tree registry (spec §4.7): compiles and holds every loaded [`Tree`],
//! keyed by tag, alongside the shared [`ClassLoader`] and [`Engine`] every
//! tree in the registry is built and scripted with.

use crate::class_loader::ClassLoader;
use crate::config::TreeCfg;
use crate::script::Engine;
use crate::tree::Tree;
use crate::ConstString;
use spin::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Failures raised while loading a tree into a [`Registry`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The config text did not parse or failed validation.
    #[error(transparent)]
    Config(#[from] crate::config::Error),
    /// The config parsed but a node failed to build.
    #[error(transparent)]
    Tree(#[from] crate::tree::Error),
    /// A `delegator.script` failed to compile.
    #[error(transparent)]
    Script(#[from] crate::script::Error),
}

/// Holds every tree currently loaded for this process, keyed by tag (spec
/// §4.7: "one registry per process; trees are looked up by tag when mounting
/// subtrees or starting a run").
pub struct Registry {
    class_loader: ClassLoader,
    script: Arc<Engine>,
    trees: RwLock<BTreeMap<ConstString, Arc<Tree>>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// A registry using the built-in class loader (spec §4.8) and a fresh
    /// script engine.
    #[must_use]
    pub fn new() -> Self {
        Self { class_loader: ClassLoader::with_builtins(), script: Arc::new(Engine::new()), trees: RwLock::new(BTreeMap::new()) }
    }

    /// The shared script engine every loaded tree's `script_id`s are
    /// compiled into.
    #[must_use]
    pub fn script_engine(&self) -> &Arc<Engine> {
        &self.script
    }

    /// Load (or reload) a tree from its parsed config. Idempotent: if a tree
    /// is already registered under the same tag with the same version hash,
    /// it is returned unchanged rather than rebuilt (spec §4.7: "same tag &
    /// version hash means no-op").
    pub fn load(&self, cfg: TreeCfg) -> Result<Arc<Tree>, Error> {
        let tag: ConstString = cfg.tag.as_str().into();
        if let Some(existing) = self.trees.read().get(&tag) {
            if existing.version.as_ref() == cfg.version_hash() {
                return Ok(Arc::clone(existing));
            }
        }
        for (id, node) in &cfg.nodes {
            if let Some(source) = node.delegator.as_ref().and_then(|d| d.script.as_deref()) {
                let script_id: ConstString = id.as_str().into();
                if !self.script.is_compiled(&script_id) {
                    self.script.compile(&script_id, source)?;
                }
            }
        }
        let tree = Arc::new(Tree::load(&cfg, &self.class_loader)?);
        self.trees.write().insert(tag, Arc::clone(&tree));
        Ok(tree)
    }

    /// Parse and load a tree from its JSON text.
    pub fn load_json(&self, json: &str) -> Result<Arc<Tree>, Error> {
        self.load(TreeCfg::parse(json)?)
    }

    /// Look up a previously loaded tree by tag.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<Arc<Tree>> {
        self.trees.read().get(tag).cloned()
    }

    /// Drop a tree from the registry. Agents already running it keep their
    /// own `Arc` reference; only future lookups stop seeing it.
    pub fn remove(&self, tag: &str) -> Option<Arc<Tree>> {
        self.trees.write().remove(tag)
    }

    /// Every tag currently registered.
    #[must_use]
    pub fn tags(&self) -> std::vec::Vec<ConstString> {
        self.trees.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATROL: &str = r#"{
        "root": "root",
        "tag": "patrol",
        "nodes": {
            "root": { "id": "root", "name": "Root", "category": "composite", "children": ["wait"] },
            "wait": { "id": "wait", "name": "Wait", "category": "task", "properties": { "waitTime": 100000000 } }
        }
    }"#;

    #[test]
    fn loads_and_looks_up_by_tag() {
        let registry = Registry::new();
        registry.load_json(PATROL).expect("loads");
        assert!(registry.get("patrol").is_some());
        assert_eq!(registry.tags(), vec![ConstString::from("patrol")]);
    }

    #[test]
    fn reloading_unchanged_config_is_a_no_op() {
        let registry = Registry::new();
        let first = registry.load_json(PATROL).expect("loads");
        let second = registry.load_json(PATROL).expect("loads again");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn remove_drops_it_from_future_lookups() {
        let registry = Registry::new();
        registry.load_json(PATROL).expect("loads");
        assert!(registry.remove("patrol").is_some());
        assert!(registry.get("patrol").is_none());
    }

    #[test]
    fn compiles_delegator_scripts_before_building_the_tree() {
        let json = r#"{
            "root": "root",
            "tag": "scripted",
            "nodes": {
                "root": {
                    "id": "root", "name": "Root", "category": "composite", "children": ["check"],
                    "delegator": { "script": "true" }
                },
                "check": { "id": "check", "name": "Check", "category": "decorator", "children": [] }
            }
        }"#;
        let registry = Registry::new();
        registry.load_json(json).expect("loads");
        assert!(registry.script_engine().is_compiled(&ConstString::from("root")));
    }
}
