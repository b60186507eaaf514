//! The renderable record stored in the scene arena.
//!
//! Relationship fields (container, components, shortcut target, alias group,
//! widgets) are keys into the owning [`Scene`](super::Scene) and are only
//! mutated through it, which keeps both sides of every relation in sync.

use pathgraph_core::{
    color::Color,
    geometry::{Bounds, Point},
    identifier::RenderableId,
    kind::RenderableKind,
};

use super::{AliasGroupKey, ConnectInfo, HyperEdge, RenderableKey};

/// Colors and stroke of a renderable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderStyle {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub line_width: Option<f32>,
}

/// Typed per-renderable attributes.
///
/// `Clone` is a deep copy; copied renderables never share attribute state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    /// Database identifier of the backing instance, when known.
    pub db_id: Option<i64>,
    /// Schema class of the backing instance.
    pub schema_class: Option<String>,
    /// Compartment label shown next to the name.
    pub localization: Option<String>,
    /// Set when the renderable was edited since load.
    pub is_changed: bool,
}

/// Kind of a node attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Feature,
    State,
}

/// A small decoration attached to a node's border, positioned relative to
/// the node bounds (`0.0..=1.0` on both axes).
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAttachment {
    pub kind: AttachmentKind,
    pub label: String,
    pub relative_position: Point,
}

/// A node or edge in the scene graph.
#[derive(Debug, Clone)]
pub struct Renderable {
    key: RenderableKey,
    kind: RenderableKind,
    id: RenderableId,
    display_name: Option<String>,
    position: Option<Point>,
    bounds: Option<Bounds>,
    label_bounds: Option<Bounds>,
    needs_bounds_check: bool,
    style: RenderStyle,
    is_selected: bool,
    container: Option<RenderableKey>,
    components: Vec<RenderableKey>,
    shortcut_target: Option<RenderableKey>,
    alias_group: Option<AliasGroupKey>,
    connect_info: ConnectInfo,
    edge: Option<HyperEdge>,
    attachments: Vec<NodeAttachment>,
    attributes: Attributes,
}

impl Renderable {
    pub(crate) fn new(key: RenderableKey, kind: RenderableKind) -> Self {
        Self {
            key,
            kind,
            id: RenderableId::UNASSIGNED,
            display_name: None,
            position: None,
            bounds: None,
            label_bounds: None,
            needs_bounds_check: true,
            style: RenderStyle::default(),
            is_selected: false,
            container: None,
            components: Vec::new(),
            shortcut_target: None,
            alias_group: None,
            connect_info: ConnectInfo::new(),
            edge: kind.is_edge().then(HyperEdge::default),
            attachments: Vec::new(),
            attributes: Attributes::default(),
        }
    }

    pub fn key(&self) -> RenderableKey {
        self.key
    }

    pub fn kind(&self) -> RenderableKind {
        self.kind
    }

    pub fn id(&self) -> RenderableId {
        self.id
    }

    pub fn set_id(&mut self, id: RenderableId) {
        self.id = id;
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Sets the name without touching any registry; use
    /// [`rename`](crate::utility::rename) to keep a session in sync.
    pub fn set_display_name(&mut self, name: Option<String>) {
        self.display_name = name;
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn set_position(&mut self, position: Option<Point>) {
        self.position = position;
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Option<Bounds>) {
        self.bounds = bounds;
    }

    /// Cached bounds of the rendered label, if laid out.
    pub fn label_bounds(&self) -> Option<Bounds> {
        self.label_bounds
    }

    pub fn set_label_bounds(&mut self, bounds: Option<Bounds>) {
        self.label_bounds = bounds;
        self.needs_bounds_check = false;
    }

    /// Returns true when cached layout must be recomputed before drawing.
    pub fn needs_bounds_check(&self) -> bool {
        self.needs_bounds_check
    }

    /// Drops cached label layout.
    pub fn invalidate_bounds(&mut self) {
        self.label_bounds = None;
        self.needs_bounds_check = true;
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut RenderStyle {
        &mut self.style
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.is_selected = selected;
    }

    pub fn container(&self) -> Option<RenderableKey> {
        self.container
    }

    pub fn components(&self) -> &[RenderableKey] {
        &self.components
    }

    /// The renderable this one aliases, if it is a shortcut.
    pub fn shortcut_target(&self) -> Option<RenderableKey> {
        self.shortcut_target
    }

    /// Returns true for shortcuts: references that do not own the entity.
    pub fn is_alias_only(&self) -> bool {
        self.shortcut_target.is_some()
    }

    /// Key of the alias group this renderable belongs to, if any.
    pub fn alias_group(&self) -> Option<AliasGroupKey> {
        self.alias_group
    }

    pub fn connect_info(&self) -> &ConnectInfo {
        &self.connect_info
    }

    pub fn edge(&self) -> Option<&HyperEdge> {
        self.edge.as_ref()
    }

    pub fn edge_mut(&mut self) -> Option<&mut HyperEdge> {
        self.edge.as_mut()
    }

    pub fn attachments(&self) -> &[NodeAttachment] {
        &self.attachments
    }

    pub fn set_attachments(&mut self, attachments: Vec<NodeAttachment>) {
        self.attachments = attachments;
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub(crate) fn set_container(&mut self, container: Option<RenderableKey>) {
        self.container = container;
    }

    pub(crate) fn components_mut(&mut self) -> &mut Vec<RenderableKey> {
        &mut self.components
    }

    pub(crate) fn set_shortcut_target(&mut self, target: Option<RenderableKey>) {
        self.shortcut_target = target;
    }

    pub(crate) fn set_alias_group(&mut self, group: Option<AliasGroupKey>) {
        self.alias_group = group;
    }

    pub(crate) fn connect_info_mut(&mut self) -> &mut ConnectInfo {
        &mut self.connect_info
    }

    pub(crate) fn set_edge(&mut self, edge: Option<HyperEdge>) {
        self.edge = edge;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_renderable_defaults() {
        let r = Renderable::new(RenderableKey::new(0), RenderableKind::Protein);
        assert!(!r.id().is_assigned());
        assert!(r.display_name().is_none());
        assert!(r.container().is_none());
        assert!(r.components().is_empty());
        assert!(!r.is_alias_only());
        assert!(r.edge().is_none());
        assert!(r.needs_bounds_check());
    }

    #[test]
    fn test_edge_kinds_get_geometry() {
        let r = Renderable::new(RenderableKey::new(0), RenderableKind::Reaction);
        assert!(r.edge().is_some());
    }

    #[test]
    fn test_invalidate_bounds() {
        let mut r = Renderable::new(RenderableKey::new(0), RenderableKind::Complex);
        r.set_label_bounds(Some(Bounds::default()));
        assert!(!r.needs_bounds_check());

        r.invalidate_bounds();
        assert!(r.label_bounds().is_none());
        assert!(r.needs_bounds_check());
    }

    #[test]
    fn test_attributes_clone_is_deep() {
        let mut r = Renderable::new(RenderableKey::new(0), RenderableKind::Chemical);
        r.attributes_mut().schema_class = Some("SimpleEntity".to_string());

        let mut copied = r.attributes().clone();
        copied.schema_class = Some("Drug".to_string());

        assert_eq!(r.attributes().schema_class.as_deref(), Some("SimpleEntity"));
    }
}
