//! Descendant collection.

use std::collections::VecDeque;

use indexmap::IndexSet;
use log::trace;

use crate::scene::{RenderableKey, Scene};

/// Collects every structural descendant of `container` in depth-first
/// preorder.
///
/// Shortcuts are references rather than owned entities: they are left out of
/// the result and their components are not visited. Renderables reachable
/// through several paths appear once. `container` itself is never included.
pub fn get_all_descendents(scene: &Scene, container: RenderableKey) -> IndexSet<RenderableKey> {
    let mut descendants = IndexSet::new();
    let mut stack: Vec<RenderableKey> = scene.components(container).iter().rev().copied().collect();

    while let Some(key) = stack.pop() {
        let Some(renderable) = scene.get(key) else {
            continue;
        };
        if renderable.is_alias_only() || key == container || !descendants.insert(key) {
            continue;
        }
        stack.extend(renderable.components().iter().rev().copied());
    }

    trace!(container:%, count = descendants.len(); "Collected descendants");
    descendants
}

/// Collects every component below `container` breadth-first, shortcuts
/// included.
pub fn get_components_in_hierarchy(
    scene: &Scene,
    container: RenderableKey,
) -> IndexSet<RenderableKey> {
    let mut components = IndexSet::new();
    let mut queue: VecDeque<RenderableKey> = scene.components(container).iter().copied().collect();

    while let Some(key) = queue.pop_front() {
        if key == container || !components.insert(key) {
            continue;
        }
        queue.extend(scene.components(key).iter().copied());
    }
    components
}

#[cfg(test)]
mod tests {
    use pathgraph_core::kind::RenderableKind;

    use super::*;

    /// pathway
    /// ├── complex
    /// │   ├── p1
    /// │   └── p2
    /// ├── shortcut (→ p1) with a child
    /// └── chemical
    fn sample_scene() -> (Scene, [RenderableKey; 7]) {
        let mut scene = Scene::new();
        let pathway = scene.insert(RenderableKind::Pathway, Some("pathway"));
        let complex = scene.insert(RenderableKind::Complex, Some("complex"));
        let p1 = scene.insert(RenderableKind::Protein, Some("p1"));
        let p2 = scene.insert(RenderableKind::Protein, Some("p2"));
        let shortcut = scene.insert(RenderableKind::Complex, Some("complex"));
        let hidden = scene.insert(RenderableKind::Protein, Some("hidden"));
        let chemical = scene.insert(RenderableKind::Chemical, Some("ATP"));

        scene.add_component(pathway, complex).unwrap();
        scene.add_component(complex, p1).unwrap();
        scene.add_component(complex, p2).unwrap();
        scene.add_component(pathway, shortcut).unwrap();
        scene.add_component(shortcut, hidden).unwrap();
        scene.add_component(pathway, chemical).unwrap();
        scene.set_shortcut_target(shortcut, Some(complex)).unwrap();

        (scene, [pathway, complex, p1, p2, shortcut, hidden, chemical])
    }

    #[test]
    fn test_descendants_preorder_without_shortcuts() {
        let (scene, [pathway, complex, p1, p2, _, _, chemical]) = sample_scene();

        let descendants = get_all_descendents(&scene, pathway);

        assert_eq!(
            descendants.into_iter().collect::<Vec<_>>(),
            vec![complex, p1, p2, chemical]
        );
    }

    #[test]
    fn test_descendants_skip_shortcut_subtree() {
        let (scene, [pathway, _, _, _, shortcut, hidden, _]) = sample_scene();

        let descendants = get_all_descendents(&scene, pathway);

        assert!(!descendants.contains(&shortcut));
        assert!(!descendants.contains(&hidden));
    }

    #[test]
    fn test_descendants_of_leaf_is_empty() {
        let (scene, [_, _, p1, ..]) = sample_scene();
        assert!(get_all_descendents(&scene, p1).is_empty());
    }

    #[test]
    fn test_hierarchy_includes_shortcuts() {
        let (scene, [pathway, complex, p1, p2, shortcut, hidden, chemical]) = sample_scene();

        let components = get_components_in_hierarchy(&scene, pathway);

        assert_eq!(
            components.into_iter().collect::<Vec<_>>(),
            vec![complex, shortcut, chemical, p1, p2, hidden]
        );
    }
}
