//! The scene arena.
//!
//! A [`Scene`] owns every renderable of one diagram together with the
//! connection widgets of its hyper-edges. Relations between renderables
//! (containment, shortcut targets, alias groups, widget attachment) are
//! stored as keys into the arena, and the scene is the only place that
//! mutates both sides of a relation.
//!
//! Keys are handed out from monotonically increasing counters and are never
//! reused, so a key held after its renderable was removed simply stops
//! resolving.

mod connect;
mod edge;
mod renderable;

pub use connect::{ConnectInfo, ConnectWidget, WidgetState};
pub use edge::{HyperEdge, PointSlot};
pub use renderable::{
    AttachmentKind, Attributes, NodeAttachment, RenderStyle, Renderable,
};

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use indexmap::IndexMap;
use log::{debug, trace};

use pathgraph_core::{
    geometry::Point,
    kind::{ConnectRole, RenderableKind},
};

use crate::error::SceneError;

// =============================================================================
// Keys
// =============================================================================

/// Opaque handle of a renderable inside a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderableKey(usize);

impl RenderableKey {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for RenderableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r#{}", self.0)
    }
}

/// Opaque handle of a connection widget inside a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetKey(usize);

impl WidgetKey {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for WidgetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w#{}", self.0)
    }
}

/// Handle of an alias group: the original renderable and all of its shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AliasGroupKey(usize);

// =============================================================================
// Scene
// =============================================================================

/// Arena of renderables and widgets for one diagram.
#[derive(Debug, Default)]
pub struct Scene {
    renderables: IndexMap<RenderableKey, Renderable>,
    widgets: IndexMap<WidgetKey, ConnectWidget>,
    alias_groups: HashMap<AliasGroupKey, Vec<RenderableKey>>,
    handovers: HashMap<RenderableKey, RenderableKey>,
    next_renderable: usize,
    next_widget: usize,
    next_group: usize,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fresh renderable and returns its key.
    pub fn insert(&mut self, kind: RenderableKind, display_name: Option<&str>) -> RenderableKey {
        let key = RenderableKey::new(self.next_renderable);
        self.next_renderable += 1;

        let mut renderable = Renderable::new(key, kind);
        renderable.set_display_name(display_name.map(str::to_string));
        self.renderables.insert(key, renderable);

        trace!(key:%, kind:%; "Inserted renderable");
        key
    }

    pub fn get(&self, key: RenderableKey) -> Option<&Renderable> {
        self.renderables.get(&key)
    }

    pub fn get_mut(&mut self, key: RenderableKey) -> Option<&mut Renderable> {
        self.renderables.get_mut(&key)
    }

    /// Like [`get`](Self::get) but reports a missing key as an error.
    pub fn renderable(&self, key: RenderableKey) -> Result<&Renderable, SceneError> {
        self.renderables
            .get(&key)
            .ok_or(SceneError::UnknownRenderable(key))
    }

    /// Like [`get_mut`](Self::get_mut) but reports a missing key as an error.
    pub fn renderable_mut(&mut self, key: RenderableKey) -> Result<&mut Renderable, SceneError> {
        self.renderables
            .get_mut(&key)
            .ok_or(SceneError::UnknownRenderable(key))
    }

    pub fn contains(&self, key: RenderableKey) -> bool {
        self.renderables.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.renderables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderables.is_empty()
    }

    /// Returns all renderable keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = RenderableKey> + '_ {
        self.renderables.keys().copied()
    }

    /// Returns all renderables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Renderable> {
        self.renderables.values()
    }

    /// Kind of a renderable, if it exists.
    pub fn kind(&self, key: RenderableKey) -> Option<RenderableKind> {
        self.get(key).map(Renderable::kind)
    }

    /// Display name of a renderable, if it exists and is named.
    pub fn display_name(&self, key: RenderableKey) -> Option<&str> {
        self.get(key).and_then(Renderable::display_name)
    }

    // -------------------------------------------------------------------------
    // Containment
    // -------------------------------------------------------------------------

    /// Returns the ordered components of `key`; empty for unknown keys.
    pub fn components(&self, key: RenderableKey) -> &[RenderableKey] {
        self.get(key).map(Renderable::components).unwrap_or(&[])
    }

    pub fn container(&self, key: RenderableKey) -> Option<RenderableKey> {
        self.get(key).and_then(Renderable::container)
    }

    /// Makes `child` a component of `container`.
    ///
    /// A child that already sits in another container is moved. Adding a
    /// child to its current container is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if either key is unknown or if `child == container`.
    pub fn add_component(
        &mut self,
        container: RenderableKey,
        child: RenderableKey,
    ) -> Result<(), SceneError> {
        if container == child {
            return Err(SceneError::SelfContainment(child));
        }
        self.renderable(container)?;
        let previous = self.renderable(child)?.container();

        if previous == Some(container) {
            return Ok(());
        }
        if let Some(old) = previous.and_then(|p| self.renderables.get_mut(&p)) {
            old.components_mut().retain(|k| *k != child);
        }

        self.renderable_mut(container)?.components_mut().push(child);
        self.renderable_mut(child)?.set_container(Some(container));
        Ok(())
    }

    /// Detaches `child` from `container`. Returns whether it was a component.
    ///
    /// # Errors
    ///
    /// Returns an error if `container` is unknown.
    pub fn remove_component(
        &mut self,
        container: RenderableKey,
        child: RenderableKey,
    ) -> Result<bool, SceneError> {
        let components = self.renderable_mut(container)?.components_mut();
        let before = components.len();
        components.retain(|k| *k != child);
        let removed = components.len() != before;

        if let Some(child) = self.renderables.get_mut(&child) {
            if child.container() == Some(container) {
                child.set_container(None);
            }
        }
        Ok(removed)
    }

    // -------------------------------------------------------------------------
    // Shortcuts and alias groups
    // -------------------------------------------------------------------------

    /// Sets or clears the renderable `key` aliases.
    ///
    /// This only links the two renderables; it does not touch alias groups.
    /// Use [`generate_shortcut`](crate::utility::generate_shortcut) to create a
    /// proper shortcut.
    ///
    /// # Errors
    ///
    /// Returns an error if either key is unknown or if `key` would alias itself.
    pub fn set_shortcut_target(
        &mut self,
        key: RenderableKey,
        target: Option<RenderableKey>,
    ) -> Result<(), SceneError> {
        if let Some(target) = target {
            if target == key {
                return Err(SceneError::SelfContainment(key));
            }
            self.renderable(target)?;
        }
        self.renderable_mut(key)?.set_shortcut_target(target);
        Ok(())
    }

    /// Adds `alias` to the alias group of `member`, creating the group if
    /// `member` has none yet. `alias` leaves any group it was in before.
    ///
    /// # Errors
    ///
    /// Returns an error if either key is unknown.
    pub fn join_alias_group(
        &mut self,
        member: RenderableKey,
        alias: RenderableKey,
    ) -> Result<(), SceneError> {
        let group = self.renderable(member)?.alias_group();
        let alias_group = self.renderable(alias)?.alias_group();

        if group.is_some() && group == alias_group {
            return Ok(());
        }
        if alias_group.is_some() {
            self.detach_from_alias_group(alias);
        }

        let group = match group {
            Some(group) => group,
            None => {
                let group = AliasGroupKey(self.next_group);
                self.next_group += 1;
                self.alias_groups.insert(group, vec![member]);
                self.renderable_mut(member)?.set_alias_group(Some(group));
                group
            }
        };

        self.alias_groups.entry(group).or_default().push(alias);
        self.renderable_mut(alias)?.set_alias_group(Some(group));
        Ok(())
    }

    /// Returns every member of the alias group of `key`, in join order.
    ///
    /// A renderable outside any group yields an empty slice.
    pub fn alias_group_members(&self, key: RenderableKey) -> &[RenderableKey] {
        self.get(key)
            .and_then(Renderable::alias_group)
            .and_then(|group| self.alias_groups.get(&group))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the other members of the alias group of `key`.
    pub fn shortcuts(&self, key: RenderableKey) -> Vec<RenderableKey> {
        self.alias_group_members(key)
            .iter()
            .copied()
            .filter(|k| *k != key)
            .collect()
    }

    /// Removes `key` from its alias group and returns the remaining members.
    ///
    /// A group left with a single member is dissolved.
    pub fn detach_from_alias_group(&mut self, key: RenderableKey) -> Vec<RenderableKey> {
        let Some(group) = self.get(key).and_then(Renderable::alias_group) else {
            return Vec::new();
        };
        if let Some(r) = self.renderables.get_mut(&key) {
            r.set_alias_group(None);
        }

        let Some(members) = self.alias_groups.get_mut(&group) else {
            return Vec::new();
        };
        members.retain(|k| *k != key);
        let remaining = members.clone();

        if remaining.len() <= 1 {
            self.alias_groups.remove(&group);
            for member in &remaining {
                if let Some(r) = self.renderables.get_mut(member) {
                    r.set_alias_group(None);
                }
            }
        }
        remaining
    }

    /// Hands the role of `removed` inside its alias group over to another
    /// member and returns that member.
    ///
    /// `removed` leaves its alias group. Shortcuts that targeted it are
    /// re-targeted: at its own target when `removed` is itself a shortcut,
    /// otherwise at the first of them still in the group, which becomes the
    /// new original. The successor is remembered, so calling this again after
    /// `removed` left the scene yields the same answer.
    pub fn hand_over_aliases(&mut self, removed: RenderableKey) -> Option<RenderableKey> {
        let Some(renderable) = self.get(removed) else {
            return self.successor(removed);
        };
        let own_target = renderable
            .shortcut_target()
            .filter(|target| self.contains(*target));

        let remaining = self.detach_from_alias_group(removed);
        let dependents: Vec<RenderableKey> = self
            .renderables
            .values()
            .filter(|r| r.shortcut_target() == Some(removed))
            .map(Renderable::key)
            .collect();

        let promoted = own_target.or_else(|| {
            remaining
                .iter()
                .find(|k| dependents.contains(*k))
                .or(dependents.first())
                .copied()
        });
        for dependent in &dependents {
            let target = promoted.filter(|p| p != dependent);
            if let Some(r) = self.renderables.get_mut(dependent) {
                r.set_shortcut_target(target);
            }
        }

        let successor = promoted.or_else(|| remaining.first().copied());
        if let Some(successor) = successor {
            debug!(removed:%, successor:%; "Handed alias role over");
            self.handovers.insert(removed, successor);
        }
        successor
    }

    /// Follows recorded hand-overs from `removed` to a renderable still in
    /// the scene.
    pub fn successor(&self, removed: RenderableKey) -> Option<RenderableKey> {
        let mut seen = HashSet::new();
        let mut cursor = self.handovers.get(&removed).copied();
        while let Some(key) = cursor {
            if self.contains(key) {
                return Some(key);
            }
            if !seen.insert(key) {
                break;
            }
            cursor = self.handovers.get(&key).copied();
        }
        None
    }

    // -------------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------------

    /// Removes a renderable from the arena and returns it.
    ///
    /// The renderable is detached from its container and its components are
    /// orphaned. Every widget on it or pointing at it is destroyed, connected
    /// or not. Its alias role is handed over
    /// with [`hand_over_aliases`](Self::hand_over_aliases).
    ///
    /// Registry entries are not touched; remove them from the session first,
    /// or use [`Diagram::remove`](crate::Diagram::remove).
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is unknown.
    pub fn remove_renderable(&mut self, key: RenderableKey) -> Result<Renderable, SceneError> {
        let renderable = self.renderable(key)?;
        let container = renderable.container();
        let components = renderable.components().to_vec();
        let mut widgets = renderable.connect_info().widgets().to_vec();
        widgets.extend(
            self.widgets
                .iter()
                .filter(|(_, w)| w.edge() == key || w.connected_node() == key)
                .map(|(k, _)| *k),
        );

        if let Some(container) = container {
            self.remove_component(container, key)?;
        }
        for child in components {
            if let Some(child) = self.renderables.get_mut(&child) {
                child.set_container(None);
            }
        }

        for widget in widgets {
            if self.widgets.contains_key(&widget) {
                self.remove_widget(widget)?;
            }
        }

        self.hand_over_aliases(key);

        self.renderables
            .shift_remove(&key)
            .ok_or(SceneError::UnknownRenderable(key))
    }

    // -------------------------------------------------------------------------
    // Widgets
    // -------------------------------------------------------------------------

    pub fn widget(&self, key: WidgetKey) -> Option<&ConnectWidget> {
        self.widgets.get(&key)
    }

    pub fn widget_mut(&mut self, key: WidgetKey) -> Option<&mut ConnectWidget> {
        self.widgets.get_mut(&key)
    }

    /// Returns all widgets in creation order.
    pub fn widgets(&self) -> impl Iterator<Item = (WidgetKey, &ConnectWidget)> {
        self.widgets.iter().map(|(k, w)| (*k, w))
    }

    /// Stores a widget and lists it on its edge. The widget stays unconnected.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget's edge is unknown or not an edge.
    pub fn add_widget(&mut self, widget: ConnectWidget) -> Result<WidgetKey, SceneError> {
        let edge = self.expect_edge(widget.edge())?;
        let key = WidgetKey::new(self.next_widget);
        self.next_widget += 1;

        self.renderable_mut(edge)?.connect_info_mut().add(key);
        self.widgets.insert(key, widget);
        Ok(key)
    }

    /// Connects a widget: lists it on its node and marks it connected.
    ///
    /// Connecting an already connected widget is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget or its node is unknown.
    pub fn connect_widget(&mut self, key: WidgetKey) -> Result<(), SceneError> {
        let widget = self.widgets.get(&key).ok_or(SceneError::UnknownWidget(key))?;
        if widget.is_connected() {
            return Ok(());
        }
        let node = widget.connected_node();
        self.renderable_mut(node)?.connect_info_mut().add(key);

        if let Some(widget) = self.widgets.get_mut(&key) {
            widget.set_state(WidgetState::Connected);
        }
        Ok(())
    }

    /// Disconnects a widget: removes it from its node and marks it
    /// disconnected. The widget stays owned by its edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget is unknown.
    pub fn disconnect_widget(&mut self, key: WidgetKey) -> Result<(), SceneError> {
        let widget = self
            .widgets
            .get_mut(&key)
            .ok_or(SceneError::UnknownWidget(key))?;
        if !widget.is_connected() {
            return Ok(());
        }
        widget.set_state(WidgetState::Disconnected);
        let node = widget.connected_node();

        if let Some(node) = self.renderables.get_mut(&node) {
            node.connect_info_mut().remove(key);
        }
        Ok(())
    }

    /// Points a widget at another node, disconnecting it first. The widget
    /// is left disconnected; call [`connect_widget`](Self::connect_widget)
    /// to attach it to the new node.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget or the node is unknown, or if the node
    /// is not a node kind.
    pub fn set_widget_node(&mut self, key: WidgetKey, node: RenderableKey) -> Result<(), SceneError> {
        let node = self.expect_node(node)?;
        self.disconnect_widget(key)?;
        self.widgets
            .get_mut(&key)
            .ok_or(SceneError::UnknownWidget(key))?
            .set_connected_node(node);
        Ok(())
    }

    /// Destroys a widget, disconnecting it first.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget is unknown.
    pub fn remove_widget(&mut self, key: WidgetKey) -> Result<ConnectWidget, SceneError> {
        self.disconnect_widget(key)?;
        let widget = self
            .widgets
            .shift_remove(&key)
            .ok_or(SceneError::UnknownWidget(key))?;
        if let Some(edge) = self.renderables.get_mut(&widget.edge()) {
            edge.connect_info_mut().remove(key);
        }
        Ok(widget)
    }

    /// Adds a branch for `role` to `edge` and connects it to `node`.
    ///
    /// The branch's first point is the node-side point. The widget's control
    /// point is the first backbone point for inputs, the last backbone point
    /// for outputs, and the edge position for the other roles.
    ///
    /// # Errors
    ///
    /// Returns an error if `edge` is not an edge, `node` is not a node, or
    /// `points` is empty.
    pub fn connect_edge(
        &mut self,
        edge: RenderableKey,
        node: RenderableKey,
        role: ConnectRole,
        points: Vec<Point>,
    ) -> Result<WidgetKey, SceneError> {
        self.expect_edge(edge)?;
        self.expect_node(node)?;
        if points.is_empty() {
            return Err(SceneError::EmptyBranch { edge, role });
        }

        let geometry = self.edge_geometry_mut(edge)?;
        let branch = geometry.add_branch(role, points);
        let backbone_len = geometry.backbone().len();

        let control_point = match role {
            ConnectRole::Input if backbone_len > 0 => Some(PointSlot::Backbone(0)),
            ConnectRole::Output if backbone_len > 0 => Some(PointSlot::Backbone(backbone_len - 1)),
            ConnectRole::Input | ConnectRole::Output => None,
            _ => Some(PointSlot::Position),
        };
        let point = PointSlot::Branch {
            role,
            branch,
            index: 0,
        };

        let widget = ConnectWidget::new(role, branch, point, control_point, node, edge);
        let key = self.add_widget(widget)?;
        self.connect_widget(key)?;

        debug!(edge:%, node:%, role:%, widget:% = key; "Connected edge branch");
        Ok(key)
    }

    /// Resolves a point slot of `edge` to a coordinate.
    pub fn resolve_slot(&self, edge: RenderableKey, slot: PointSlot) -> Option<Point> {
        let renderable = self.get(edge)?;
        match slot {
            PointSlot::Position => renderable.position(),
            slot => renderable.edge()?.point(slot),
        }
    }

    /// Node-side coordinate of a widget.
    pub fn widget_point(&self, key: WidgetKey) -> Option<Point> {
        let widget = self.widget(key)?;
        self.resolve_slot(widget.edge(), widget.point())
    }

    /// Edge-side coordinate of a widget.
    pub fn widget_control_point(&self, key: WidgetKey) -> Option<Point> {
        let widget = self.widget(key)?;
        self.resolve_slot(widget.edge(), widget.control_point()?)
    }

    /// Returns the nodes currently connected to `edge` with `role`, in
    /// widget order.
    pub fn participants(&self, edge: RenderableKey, role: ConnectRole) -> Vec<RenderableKey> {
        let Some(renderable) = self.get(edge) else {
            return Vec::new();
        };
        renderable
            .connect_info()
            .widgets()
            .iter()
            .filter_map(|key| self.widget(*key))
            .filter(|w| w.role() == role && w.is_connected())
            .map(ConnectWidget::connected_node)
            .collect()
    }

    // -------------------------------------------------------------------------
    // Kind checks
    // -------------------------------------------------------------------------

    pub(crate) fn expect_node(&self, key: RenderableKey) -> Result<RenderableKey, SceneError> {
        let kind = self.renderable(key)?.kind();
        if kind.is_node() {
            Ok(key)
        } else {
            Err(SceneError::NotANode { key, kind })
        }
    }

    pub(crate) fn expect_edge(&self, key: RenderableKey) -> Result<RenderableKey, SceneError> {
        let kind = self.renderable(key)?.kind();
        if kind.is_edge() {
            Ok(key)
        } else {
            Err(SceneError::NotAnEdge { key, kind })
        }
    }

    fn edge_geometry_mut(&mut self, key: RenderableKey) -> Result<&mut HyperEdge, SceneError> {
        let renderable = self.renderable_mut(key)?;
        let kind = renderable.kind();
        renderable
            .edge_mut()
            .ok_or(SceneError::NotAnEdge { key, kind })
    }
}
