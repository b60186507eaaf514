//! Structural copies of hyper-edges.

use log::{debug, warn};

use pathgraph_core::{geometry::Point, kind::ConnectRole};

use crate::{
    error::SceneError,
    scene::{ConnectWidget, HyperEdge, PointSlot, RenderableKey, Scene},
};

/// Copies a hyper-edge, returning `None` if the copy could not be built.
///
/// See [`try_copy_hyper_edge`] for the copy semantics. Failures are logged.
pub fn copy_hyper_edge(scene: &mut Scene, edge: RenderableKey) -> Option<RenderableKey> {
    match try_copy_hyper_edge(scene, edge) {
        Ok(copy) => Some(copy),
        Err(err) => {
            warn!(edge:%, err:%; "Failed to copy hyper-edge");
            None
        }
    }
}

/// Copies a hyper-edge into a new renderable of the same kind.
///
/// The copy receives the edge's position, independent copies of the backbone
/// and every branch list, the arrow and width flags, and its attributes. It
/// starts with no widgets; each widget of the source is then recreated
/// against the copy's point lists and attached to the same node. Widgets
/// that were connected on the source are connected on the copy.
///
/// The copy is not placed in a container and is not registered.
///
/// # Errors
///
/// Returns an error if `edge` is not an edge, or if a widget's points cannot
/// be located in the copy. The partial copy is removed before returning.
pub fn try_copy_hyper_edge(
    scene: &mut Scene,
    edge: RenderableKey,
) -> Result<RenderableKey, SceneError> {
    scene.expect_edge(edge)?;

    let source = scene.renderable(edge)?;
    let kind = source.kind();
    let name = source.display_name().map(str::to_string);
    let position = source.position();
    let attributes = source.attributes().clone();
    let geometry = source
        .edge()
        .cloned()
        .ok_or(SceneError::NotAnEdge { key: edge, kind })?;
    let widgets: Vec<ConnectWidget> = source
        .connect_info()
        .widgets()
        .iter()
        .filter_map(|key| scene.widget(*key))
        .cloned()
        .collect();

    let copy = scene.insert(kind, name.as_deref());
    let renderable = scene.renderable_mut(copy)?;
    renderable.set_position(position);
    renderable.set_edge(Some(geometry));
    *renderable.attributes_mut() = attributes;

    let rebuilt = widgets
        .iter()
        .try_for_each(|widget| copy_widget(scene, edge, copy, widget));
    if let Err(err) = rebuilt {
        if let Err(rollback) = scene.remove_renderable(copy) {
            warn!(copy:%, err:% = rollback; "Failed to roll back partial copy");
        }
        return Err(err);
    }

    debug!(edge:%, copy:%, widgets = widgets.len(); "Copied hyper-edge");
    Ok(copy)
}

/// Recreates `widget` of `source` on `copy`.
fn copy_widget(
    scene: &mut Scene,
    source: RenderableKey,
    copy: RenderableKey,
    widget: &ConnectWidget,
) -> Result<(), SceneError> {
    let geometry = scene
        .renderable(copy)?
        .edge()
        .ok_or(SceneError::UnknownRenderable(copy))?;
    let (slots, default_control) = role_slots(geometry, copy, widget.role(), widget.index())?;

    let (point, control_point) = if let [only] = slots.as_slice() {
        (*only, widget.control_point().map(|_| *only))
    } else {
        let original = scene
            .resolve_slot(source, widget.point())
            .ok_or(SceneError::UnresolvedPoint {
                edge: source,
                slot: widget.point(),
            })?;
        let point = find_slot(scene, copy, &slots, original).ok_or(SceneError::UnresolvedPoint {
            edge: copy,
            slot: widget.point(),
        })?;
        let control_point = widget.control_point().and_then(|slot| {
            scene
                .resolve_slot(source, slot)
                .and_then(|original| find_slot(scene, copy, &slots, original))
                .or(default_control)
        });
        (point, control_point)
    };

    let rebuilt = ConnectWidget::new(
        widget.role(),
        widget.index(),
        point,
        control_point,
        widget.connected_node(),
        copy,
    );
    let key = scene.add_widget(rebuilt)?;
    if widget.is_connected() {
        scene.connect_widget(key)?;
    }
    Ok(())
}

/// Returns the slots of the point list a widget with `role` and `index`
/// binds to, plus the role's default control slot.
///
/// Inputs and outputs fall back to the backbone when the branch is absent;
/// their default control is the first or last backbone point. Other roles
/// require their branch and control on the edge position.
fn role_slots(
    geometry: &HyperEdge,
    edge: RenderableKey,
    role: ConnectRole,
    index: usize,
) -> Result<(Vec<PointSlot>, Option<PointSlot>), SceneError> {
    let backbone_len = geometry.backbone().len();
    let branch_slots = geometry.branch(role, index).map(|points| {
        (0..points.len())
            .map(|i| PointSlot::Branch {
                role,
                branch: index,
                index: i,
            })
            .collect::<Vec<_>>()
    });

    let (slots, default_control) = match role {
        ConnectRole::Input | ConnectRole::Output => {
            let slots = branch_slots
                .unwrap_or_else(|| (0..backbone_len).map(PointSlot::Backbone).collect());
            let control = match (role, backbone_len) {
                (_, 0) => None,
                (ConnectRole::Input, _) => Some(PointSlot::Backbone(0)),
                _ => Some(PointSlot::Backbone(backbone_len - 1)),
            };
            (slots, control)
        }
        ConnectRole::Catalyst | ConnectRole::Activator | ConnectRole::Inhibitor => {
            let slots = branch_slots.ok_or(SceneError::MissingBranch { edge, role, index })?;
            (slots, Some(PointSlot::Position))
        }
    };

    if slots.is_empty() {
        return Err(SceneError::MissingBranch { edge, role, index });
    }
    Ok((slots, default_control))
}

fn find_slot(
    scene: &Scene,
    edge: RenderableKey,
    slots: &[PointSlot],
    point: Point,
) -> Option<PointSlot> {
    slots
        .iter()
        .copied()
        .find(|slot| scene.resolve_slot(edge, *slot) == Some(point))
}

#[cfg(test)]
mod tests {
    use pathgraph_core::kind::RenderableKind;

    use super::*;

    fn reaction_scene() -> (Scene, RenderableKey, RenderableKey, RenderableKey) {
        let mut scene = Scene::new();
        let reaction = scene.insert(RenderableKind::Reaction, Some("R1"));
        {
            let renderable = scene.get_mut(reaction).unwrap();
            renderable.set_position(Some(Point::new(5.0, 0.0)));
            let edge = renderable.edge_mut().unwrap();
            *edge.backbone_mut() = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
            edge.set_line_width(2.5);
        }
        let substrate = scene.insert(RenderableKind::Chemical, Some("glucose"));
        let enzyme = scene.insert(RenderableKind::Protein, Some("HK1"));

        scene
            .connect_edge(
                reaction,
                substrate,
                ConnectRole::Input,
                vec![Point::new(-20.0, 0.0), Point::new(-10.0, 0.0)],
            )
            .unwrap();
        scene
            .connect_edge(reaction, enzyme, ConnectRole::Catalyst, vec![Point::new(5.0, -20.0)])
            .unwrap();
        (scene, reaction, substrate, enzyme)
    }

    #[test]
    fn test_copy_is_a_new_renderable() {
        let (mut scene, reaction, ..) = reaction_scene();

        let copy = copy_hyper_edge(&mut scene, reaction).unwrap();

        assert_ne!(copy, reaction);
        let original = scene.get(reaction).unwrap().edge().unwrap().clone();
        let copied = scene.get(copy).unwrap().edge().unwrap();
        assert_eq!(copied, &original);
        assert_eq!(scene.get(copy).unwrap().position(), Some(Point::new(5.0, 0.0)));
    }

    #[test]
    fn test_copy_connects_same_nodes() {
        let (mut scene, reaction, substrate, enzyme) = reaction_scene();

        let copy = copy_hyper_edge(&mut scene, reaction).unwrap();

        assert_eq!(scene.participants(copy, ConnectRole::Input), vec![substrate]);
        assert_eq!(scene.participants(copy, ConnectRole::Catalyst), vec![enzyme]);
        assert_eq!(scene.get(substrate).unwrap().connect_info().len(), 2);
        assert_eq!(scene.get(copy).unwrap().connect_info().len(), 2);
    }

    #[test]
    fn test_copied_widgets_bind_to_copy() {
        let (mut scene, reaction, substrate, _) = reaction_scene();

        let copy = copy_hyper_edge(&mut scene, reaction).unwrap();
        let widget = scene
            .get(copy)
            .unwrap()
            .connect_info()
            .widgets()
            .iter()
            .copied()
            .find(|w| scene.widget(*w).unwrap().connected_node() == substrate)
            .unwrap();

        assert_eq!(scene.widget(widget).unwrap().edge(), copy);
        assert_eq!(scene.widget_point(widget), Some(Point::new(-20.0, 0.0)));
        assert_eq!(
            scene.widget(widget).unwrap().control_point(),
            Some(PointSlot::Backbone(0))
        );
    }

    #[test]
    fn test_single_point_branch_binds_point_and_control() {
        let (mut scene, reaction, _, enzyme) = reaction_scene();

        let copy = copy_hyper_edge(&mut scene, reaction).unwrap();
        let widget = scene
            .get(enzyme)
            .unwrap()
            .connect_info()
            .widgets()
            .iter()
            .copied()
            .find(|w| scene.widget(*w).unwrap().edge() == copy)
            .unwrap();

        let slot = PointSlot::Branch {
            role: ConnectRole::Catalyst,
            branch: 0,
            index: 0,
        };
        assert_eq!(scene.widget(widget).unwrap().point(), slot);
        assert_eq!(scene.widget(widget).unwrap().control_point(), Some(slot));
    }

    #[test]
    fn test_mutating_copy_leaves_original() {
        let (mut scene, reaction, ..) = reaction_scene();

        let copy = copy_hyper_edge(&mut scene, reaction).unwrap();
        scene
            .get_mut(copy)
            .unwrap()
            .edge_mut()
            .unwrap()
            .backbone_mut()
            .push(Point::new(99.0, 99.0));

        assert_eq!(scene.get(reaction).unwrap().edge().unwrap().backbone().len(), 2);
    }

    #[test]
    fn test_copy_of_node_fails() {
        let (mut scene, _, substrate, _) = reaction_scene();
        let before = scene.len();

        assert_eq!(copy_hyper_edge(&mut scene, substrate), None);
        assert_eq!(scene.len(), before);
    }

    #[test]
    fn test_failed_copy_is_rolled_back() {
        let (mut scene, reaction, ..) = reaction_scene();
        scene
            .get_mut(reaction)
            .unwrap()
            .edge_mut()
            .unwrap()
            .branches_mut(ConnectRole::Catalyst)
            .clear();
        let before = scene.len();

        assert!(matches!(
            try_copy_hyper_edge(&mut scene, reaction),
            Err(SceneError::MissingBranch { .. })
        ));
        assert_eq!(scene.len(), before);
    }
}
