//! Render-info switching, node registration and renaming.

use std::collections::{HashSet, VecDeque};

use log::{debug, trace};

use pathgraph_core::{color::Color, kind::RenderableKind};

use crate::{
    error::SceneError,
    scene::{RenderableKey, Scene},
    session::DiagramSession,
};

/// Hands the rendering state of `source` over to `target`.
///
/// Position, bounds, style and selection are copied and the target's
/// background is set to `highlight`. When both are nodes every widget of
/// `source` is moved to `target` and the attachment list is copied.
///
/// # Errors
///
/// Returns an error if either key is unknown.
pub fn switch_render_info(
    scene: &mut Scene,
    highlight: Color,
    source: RenderableKey,
    target: RenderableKey,
) -> Result<(), SceneError> {
    let from = scene.renderable(source)?;
    let position = from.position();
    let bounds = from.bounds();
    let mut style = *from.style();
    let selected = from.is_selected();
    let source_is_node = from.kind().is_node();
    let widgets = from.connect_info().widgets().to_vec();
    let attachments = from.attachments().to_vec();

    style.background = Some(highlight);
    let to = scene.renderable_mut(target)?;
    to.set_position(position);
    to.set_bounds(bounds);
    *to.style_mut() = style;
    to.set_selected(selected);

    if !(source_is_node && to.kind().is_node()) || source == target {
        return Ok(());
    }
    to.set_attachments(attachments);

    for widget in &widgets {
        scene.set_widget_node(*widget, target)?;
        scene.connect_widget(*widget)?;
    }
    debug!(source:%, target:%, widgets = widgets.len(); "Migrated widgets");
    Ok(())
}

/// Assigns ids and registers `nodes` and everything below them.
///
/// The walk is breadth-first. Unassigned ids are filled from the session
/// counter for every kind; shortcuts and reactions are not registered, but
/// their components are still visited. Nodes without a container are placed
/// in `process` when one is given.
///
/// # Errors
///
/// Returns an error if `process` or a node in `nodes` is unknown.
pub fn register_nodes(
    scene: &mut Scene,
    session: &mut DiagramSession,
    nodes: &[RenderableKey],
    process: Option<RenderableKey>,
) -> Result<(), SceneError> {
    if let Some(process) = process {
        for node in nodes {
            if *node != process && scene.renderable(*node)?.container().is_none() {
                scene.add_component(process, *node)?;
            }
        }
    }

    let mut visited = HashSet::new();
    let mut queue: VecDeque<RenderableKey> = nodes.iter().copied().collect();
    while let Some(key) = queue.pop_front() {
        if !visited.insert(key) {
            continue;
        }
        let Some(renderable) = scene.get_mut(key) else {
            continue;
        };
        if !renderable.id().is_assigned() {
            renderable.set_id(session.next_id());
        }
        let registrable =
            !renderable.is_alias_only() && renderable.kind() != RenderableKind::Reaction;
        queue.extend(renderable.components().iter().copied());

        if registrable {
            session.add(scene, key);
        }
        trace!(key:%, registrable; "Visited node");
    }
    Ok(())
}

/// Renames `key` and every alias of it, keeping the session in sync.
///
/// For node kinds the cached label layout of every alias is invalidated.
///
/// # Errors
///
/// Returns an error if `key` is unknown.
pub fn rename(
    scene: &mut Scene,
    session: &mut DiagramSession,
    key: RenderableKey,
    new_name: &str,
) -> Result<(), SceneError> {
    let renderable = scene.renderable(key)?;
    let old_name = renderable.display_name().map(str::to_string);
    let is_node = renderable.kind().is_node();

    let mut members = scene.alias_group_members(key).to_vec();
    if members.is_empty() {
        members.push(key);
    }
    for member in &members {
        if let Some(renderable) = scene.get_mut(*member) {
            renderable.set_display_name(Some(new_name.to_string()));
        }
    }

    let holder = old_name
        .as_deref()
        .and_then(|name| session.get_single_object(name))
        .filter(|holder| members.contains(holder))
        .unwrap_or(key);
    session.change_name(scene, holder, old_name.as_deref());

    if is_node {
        for member in members.iter().filter(|m| **m != key) {
            if let Some(renderable) = scene.get_mut(*member) {
                renderable.invalidate_bounds();
            }
        }
    }

    debug!(key:%, old_name:?, new_name; "Renamed renderable");
    Ok(())
}
