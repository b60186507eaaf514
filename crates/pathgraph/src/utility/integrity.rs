//! Structural checks: containment cycles and scene consistency.

use std::{collections::HashSet, fmt};

use log::debug;

use crate::scene::{PointSlot, RenderableKey, Scene, WidgetKey};

/// Looks for a name that would make placing `contained` inside `container`
/// circular.
///
/// Collects the names of `container` and all of its ancestors, then checks
/// `contained` and, depth-first, its components against them. Structural
/// leaves (entities, edges and reaction nodes) are neither checked nor
/// descended into. Returns the first colliding name.
pub fn search_circular_ref(
    scene: &Scene,
    container: RenderableKey,
    contained: RenderableKey,
) -> Option<String> {
    let mut ancestor_names = HashSet::new();
    let mut seen = HashSet::new();
    let mut cursor = Some(container);
    while let Some(key) = cursor {
        if !seen.insert(key) {
            break;
        }
        if let Some(name) = scene.display_name(key) {
            ancestor_names.insert(name);
        }
        cursor = scene.container(key);
    }

    let mut visited = HashSet::new();
    let mut stack = vec![contained];
    while let Some(key) = stack.pop() {
        if !visited.insert(key) {
            continue;
        }
        let Some(renderable) = scene.get(key) else {
            continue;
        };
        if let Some(name) = renderable.display_name() {
            if ancestor_names.contains(name) {
                debug!(container:%, contained:%, name; "Found circular reference");
                return Some(name.to_string());
            }
        }
        stack.extend(
            renderable
                .components()
                .iter()
                .rev()
                .copied()
                .filter(|c| scene.kind(*c).is_some_and(|kind| !kind.is_structural_leaf())),
        );
    }
    None
}

/// A structural inconsistency found by [`check_integrity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// `child` names `container` as its container, but is not one of its components.
    MissingComponent {
        container: RenderableKey,
        child: RenderableKey,
    },
    /// `container` lists `child`, whose container is something else.
    ForeignComponent {
        container: RenderableKey,
        child: RenderableKey,
    },
    /// A relation points at a renderable that no longer exists.
    DanglingReference {
        from: RenderableKey,
        to: RenderableKey,
    },
    /// A shortcut's target chain does not resolve.
    BrokenShortcut { shortcut: RenderableKey },
    /// A node lists a widget that is missing, disconnected or attached elsewhere.
    StrayWidget {
        node: RenderableKey,
        widget: WidgetKey,
    },
    /// A widget refers to a node or edge that no longer exists.
    DanglingWidget {
        widget: WidgetKey,
        missing: RenderableKey,
    },
    /// A widget's point slots do not resolve against its edge.
    UnresolvedWidget {
        widget: WidgetKey,
        edge: RenderableKey,
    },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingComponent { container, child } => {
                write!(f, "{child} claims container {container}, which does not list it")
            }
            Self::ForeignComponent { container, child } => {
                write!(f, "{container} lists {child}, which belongs elsewhere")
            }
            Self::DanglingReference { from, to } => {
                write!(f, "{from} refers to removed renderable {to}")
            }
            Self::BrokenShortcut { shortcut } => {
                write!(f, "shortcut {shortcut} does not resolve to a target")
            }
            Self::StrayWidget { node, widget } => {
                write!(f, "{node} lists widget {widget}, which is not connected to it")
            }
            Self::DanglingWidget { widget, missing } => {
                write!(f, "widget {widget} refers to removed renderable {missing}")
            }
            Self::UnresolvedWidget { widget, edge } => {
                write!(f, "widget {widget} has points that do not resolve on {edge}")
            }
        }
    }
}

/// Checks every relation in `scene` and reports what does not hold.
///
/// An empty result means containment is bidirectional, every key resolves,
/// shortcuts reach a target, and widgets agree with the nodes listing them.
pub fn check_integrity(scene: &Scene) -> Vec<Inconsistency> {
    let mut findings = Vec::new();

    for renderable in scene.iter() {
        let key = renderable.key();

        if let Some(container) = renderable.container() {
            match scene.get(container) {
                None => findings.push(Inconsistency::DanglingReference {
                    from: key,
                    to: container,
                }),
                Some(parent) if !parent.components().contains(&key) => {
                    findings.push(Inconsistency::MissingComponent {
                        container,
                        child: key,
                    });
                }
                Some(_) => {}
            }
        }

        for child in renderable.components() {
            match scene.get(*child) {
                None => findings.push(Inconsistency::DanglingReference {
                    from: key,
                    to: *child,
                }),
                Some(c) if c.container() != Some(key) => {
                    findings.push(Inconsistency::ForeignComponent {
                        container: key,
                        child: *child,
                    });
                }
                Some(_) => {}
            }
        }

        if renderable.is_alias_only() && super::get_shortcut_target(scene, key).is_none() {
            findings.push(Inconsistency::BrokenShortcut { shortcut: key });
        }

        if renderable.kind().is_node() {
            for widget in renderable.connect_info().widgets() {
                let attached = scene
                    .widget(*widget)
                    .is_some_and(|w| w.is_connected() && w.connected_node() == key);
                if !attached {
                    findings.push(Inconsistency::StrayWidget {
                        node: key,
                        widget: *widget,
                    });
                }
            }
        }
    }

    for (key, widget) in scene.widgets() {
        let edge = widget.edge();
        for missing in [edge, widget.connected_node()] {
            if !scene.contains(missing) {
                findings.push(Inconsistency::DanglingWidget {
                    widget: key,
                    missing,
                });
            }
        }
        if !scene.contains(edge) {
            continue;
        }
        let control_resolves = match widget.control_point() {
            None | Some(PointSlot::Position) => true,
            Some(slot) => scene.resolve_slot(edge, slot).is_some(),
        };
        if scene.resolve_slot(edge, widget.point()).is_none() || !control_resolves {
            findings.push(Inconsistency::UnresolvedWidget { widget: key, edge });
        }
    }

    findings
}
