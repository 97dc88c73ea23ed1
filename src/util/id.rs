// Id generation helpers.

use crate::ConstString;

/// Generate a fresh, process-wide unique node/tree-instance id.
///
/// Clones of a subtree must receive fresh ids so that their [`NodeMemory`](crate::node::NodeMemory)
/// slots (keyed by node id inside a [`Blackboard`](crate::blackboard::Blackboard)) never collide
/// with the original they were cloned from.
#[must_use]
pub fn generate() -> ConstString {
    uuid::Uuid::new_v4().to_string().into()
}

/// Derive a readable clone id from an original id, keeping the source visible for debugging
/// (e.g. in `tracing` spans) while still being unique.
#[must_use]
pub fn derive_clone_id(original: &str) -> ConstString {
    alloc_string(original)
}

fn alloc_string(original: &str) -> ConstString {
    let mut s = String::with_capacity(original.len() + 9);
    s.push_str(original);
    s.push('#');
    s.push_str(&uuid::Uuid::new_v4().simple().to_string()[..8]);
    s.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
    }

    #[test]
    fn derived_clone_ids_keep_source_visible() {
        let derived = derive_clone_id("patrol-root");
        assert!(derived.starts_with("patrol-root#"));
    }
}
