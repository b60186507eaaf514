//! Connection widgets binding hyper-edge branches to nodes.

use pathgraph_core::kind::ConnectRole;

use super::{PointSlot, RenderableKey, WidgetKey};

/// Lifecycle of a widget.
///
/// `Unconnected → Connected → Disconnected`, and `Disconnected → Connected`
/// again when a widget is re-attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Unconnected,
    Connected,
    Disconnected,
}

/// The attachment record of one edge role-branch to one node.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectWidget {
    role: ConnectRole,
    index: usize,
    point: PointSlot,
    control_point: Option<PointSlot>,
    connected_node: RenderableKey,
    edge: RenderableKey,
    state: WidgetState,
}

impl ConnectWidget {
    /// Creates an unconnected widget.
    pub fn new(
        role: ConnectRole,
        index: usize,
        point: PointSlot,
        control_point: Option<PointSlot>,
        connected_node: RenderableKey,
        edge: RenderableKey,
    ) -> Self {
        Self {
            role,
            index,
            point,
            control_point,
            connected_node,
            edge,
            state: WidgetState::Unconnected,
        }
    }

    pub fn role(&self) -> ConnectRole {
        self.role
    }

    /// Branch number within the role.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Node-side attachment slot.
    pub fn point(&self) -> PointSlot {
        self.point
    }

    /// Edge-side anchor slot.
    pub fn control_point(&self) -> Option<PointSlot> {
        self.control_point
    }

    pub fn connected_node(&self) -> RenderableKey {
        self.connected_node
    }

    pub fn edge(&self) -> RenderableKey {
        self.edge
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == WidgetState::Connected
    }

    /// Re-targets the widget. Only valid while it is not connected; the scene
    /// enforces this.
    pub(crate) fn set_connected_node(&mut self, node: RenderableKey) {
        self.connected_node = node;
    }

    pub(crate) fn set_state(&mut self, state: WidgetState) {
        self.state = state;
    }
}

/// Ordered widget list carried by a renderable.
///
/// On a node it lists the widgets currently connected to it; on an edge it
/// lists every widget the edge owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectInfo {
    widgets: Vec<WidgetKey>,
}

impl ConnectInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a widget; duplicates are ignored.
    pub fn add(&mut self, widget: WidgetKey) {
        if !self.widgets.contains(&widget) {
            self.widgets.push(widget);
        }
    }

    /// Removes a widget, returning whether it was present.
    pub fn remove(&mut self, widget: WidgetKey) -> bool {
        let before = self.widgets.len();
        self.widgets.retain(|w| *w != widget);
        self.widgets.len() != before
    }

    pub fn contains(&self, widget: WidgetKey) -> bool {
        self.widgets.contains(&widget)
    }

    pub fn widgets(&self) -> &[WidgetKey] {
        &self.widgets
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_widget_is_unconnected() {
        let widget = ConnectWidget::new(
            ConnectRole::Input,
            0,
            PointSlot::Backbone(0),
            None,
            RenderableKey::new(1),
            RenderableKey::new(2),
        );
        assert_eq!(widget.state(), WidgetState::Unconnected);
        assert!(!widget.is_connected());
        assert_eq!(widget.connected_node(), RenderableKey::new(1));
        assert_eq!(widget.edge(), RenderableKey::new(2));
    }

    #[test]
    fn test_connect_info_ignores_duplicates() {
        let mut info = ConnectInfo::new();
        info.add(WidgetKey::new(3));
        info.add(WidgetKey::new(3));
        info.add(WidgetKey::new(4));

        assert_eq!(info.len(), 2);
        assert!(info.remove(WidgetKey::new(3)));
        assert!(!info.remove(WidgetKey::new(3)));
        assert_eq!(info.widgets(), &[WidgetKey::new(4)]);
    }
}
