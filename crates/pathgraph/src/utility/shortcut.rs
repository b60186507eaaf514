//! Shortcut generation and resolution.

use std::collections::HashSet;

use log::debug;

use pathgraph_core::kind::RenderableKind;

use crate::{
    error::SceneError,
    scene::{RenderableKey, Scene},
};

/// Follows shortcut targets from `key` to the first renderable that is not a
/// shortcut.
///
/// A non-shortcut resolves to itself. Returns `None` if the chain reaches a
/// removed renderable or loops.
pub fn get_shortcut_target(scene: &Scene, key: RenderableKey) -> Option<RenderableKey> {
    let mut visited = HashSet::new();
    let mut current = key;
    loop {
        match scene.get(current)?.shortcut_target() {
            None => return Some(current),
            Some(next) => {
                if !visited.insert(current) {
                    return None;
                }
                current = next;
            }
        }
    }
}

/// Creates a shortcut of `key` and returns its key.
///
/// The shortcut aliases the resolved original, copies its kind, name,
/// placement, style and attributes, and joins the original's alias group.
/// It is not placed in any container.
///
/// # Errors
///
/// Returns an error if `key` is unknown, its kind cannot be aliased, or its
/// shortcut chain does not resolve.
pub fn generate_shortcut(scene: &mut Scene, key: RenderableKey) -> Result<RenderableKey, SceneError> {
    let kind = scene.renderable(key)?.kind();
    if !kind.supports_shortcuts() {
        return Err(SceneError::ShortcutUnsupported { key, kind });
    }
    let target = get_shortcut_target(scene, key).ok_or(SceneError::UnknownRenderable(key))?;

    let original = scene.renderable(target)?;
    let name = original.display_name().map(str::to_string);
    let position = original.position();
    let bounds = original.bounds();
    let style = *original.style();
    let attributes = original.attributes().clone();

    let shortcut = scene.insert(kind, name.as_deref());
    let renderable = scene.renderable_mut(shortcut)?;
    renderable.set_position(position);
    renderable.set_bounds(bounds);
    *renderable.style_mut() = style;
    *renderable.attributes_mut() = attributes;

    scene.set_shortcut_target(shortcut, Some(target))?;
    scene.join_alias_group(target, shortcut)?;

    debug!(target:%, shortcut:%; "Generated shortcut");
    Ok(shortcut)
}

/// Creates a shortcut of a complex together with a mirrored shortcut for
/// every component at every depth.
///
/// The mirrored subtree has its own component lists, so editing it never
/// touches the original complex. Components that cannot be aliased are
/// skipped.
///
/// # Errors
///
/// Returns an error if `complex` is unknown or not a complex.
pub fn generate_complex_shortcut(
    scene: &mut Scene,
    complex: RenderableKey,
) -> Result<RenderableKey, SceneError> {
    let kind = scene.renderable(complex)?.kind();
    if kind != RenderableKind::Complex {
        return Err(SceneError::KindMismatch {
            key: complex,
            expected: RenderableKind::Complex.type_name(),
            found: kind,
        });
    }

    let root = generate_shortcut(scene, complex)?;
    let mut visited = HashSet::from([complex]);
    let mut stack = vec![(complex, root)];

    while let Some((original, mirror)) = stack.pop() {
        let components = scene.components(original).to_vec();
        for component in components {
            if !visited.insert(component) {
                continue;
            }
            let kind = scene.renderable(component)?.kind();
            if !kind.supports_shortcuts() {
                debug!(component:%, kind:%; "Skipping component without shortcut support");
                continue;
            }
            let copy = generate_shortcut(scene, component)?;
            scene.add_component(mirror, copy)?;
            stack.push((component, copy));
        }
    }

    Ok(root)
}
