use crate::visual::VisualNode;
use std::collections::BTreeMap;

/// Handle of a visual root that has been added to a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualId(pub u64);

/// The render scene: the set of visual roots a renderer draws.
///
/// Roots are kept in insertion order (ids are monotonic), which is also the
/// draw order handed to renderers.
#[derive(Debug, Default)]
pub struct Scene {
    roots: BTreeMap<VisualId, VisualNode>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a visual root and return its handle.
    pub fn add(&mut self, root: VisualNode) -> VisualId {
        let id = VisualId(self.next_id);
        self.next_id += 1;
        tracing::trace!(id = id.0, name = %root.name, "visual added to scene");
        self.roots.insert(id, root);
        id
    }

    /// Remove a visual root. Returns it if it was present.
    pub fn remove(&mut self, id: VisualId) -> Option<VisualNode> {
        let removed = self.roots.remove(&id);
        if let Some(root) = &removed {
            tracing::trace!(id = id.0, name = %root.name, "visual removed from scene");
        }
        removed
    }

    pub fn get(&self, id: VisualId) -> Option<&VisualNode> {
        self.roots.get(&id)
    }

    pub fn get_mut(&mut self, id: VisualId) -> Option<&mut VisualNode> {
        self.roots.get_mut(&id)
    }

    pub fn contains(&self, id: VisualId) -> bool {
        self.roots.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn roots(&self) -> impl Iterator<Item = (VisualId, &VisualNode)> {
        self.roots.iter().map(|(id, node)| (*id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove() {
        let mut scene = Scene::new();
        let a = scene.add(VisualNode::group("a"));
        let b = scene.add(VisualNode::group("b"));
        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);

        let removed = scene.remove(a).unwrap();
        assert_eq!(removed.name, "a");
        assert!(!scene.contains(a));
        assert!(scene.remove(a).is_none());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut scene = Scene::new();
        let a = scene.add(VisualNode::group("a"));
        scene.remove(a);
        let b = scene.add(VisualNode::group("b"));
        assert!(b > a);
    }

    #[test]
    fn roots_iterate_in_insertion_order() {
        let mut scene = Scene::new();
        scene.add(VisualNode::group("first"));
        scene.add(VisualNode::group("second"));
        let names: Vec<_> = scene.roots().map(|(_, n)| n.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }
}
