//! Hyper-edge geometry.
//!
//! A [`HyperEdge`] stores a backbone and one list of branches per
//! [`ConnectRole`]. Each branch is a point list whose first point sits on the
//! node side. Connection widgets refer into these lists through
//! [`PointSlot`]s, so copying an edge's lists yields independent coordinates
//! while the slots stay meaningful for the copy.

use pathgraph_core::{geometry::Point, kind::ConnectRole};

/// Location of a single point inside a hyper-edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointSlot {
    /// The edge's own position (the reaction hub).
    Position,
    /// A point on the backbone.
    Backbone(usize),
    /// A point on one branch of a role.
    Branch {
        role: ConnectRole,
        branch: usize,
        index: usize,
    },
}

/// Point lists and flags of a hyper-edge.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperEdge {
    backbone: Vec<Point>,
    inputs: Vec<Vec<Point>>,
    outputs: Vec<Vec<Point>>,
    catalysts: Vec<Vec<Point>>,
    activators: Vec<Vec<Point>>,
    inhibitors: Vec<Vec<Point>>,
    need_input_arrow: bool,
    need_output_arrow: bool,
    line_width: f32,
}

impl Default for HyperEdge {
    fn default() -> Self {
        Self {
            backbone: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            catalysts: Vec::new(),
            activators: Vec::new(),
            inhibitors: Vec::new(),
            need_input_arrow: false,
            need_output_arrow: true,
            line_width: 1.0,
        }
    }
}

impl HyperEdge {
    /// Creates an edge with the given backbone and no branches.
    pub fn new(backbone: Vec<Point>) -> Self {
        Self {
            backbone,
            ..Self::default()
        }
    }

    pub fn backbone(&self) -> &[Point] {
        &self.backbone
    }

    pub fn backbone_mut(&mut self) -> &mut Vec<Point> {
        &mut self.backbone
    }

    /// Returns all branches attached with `role`.
    pub fn branches(&self, role: ConnectRole) -> &[Vec<Point>] {
        match role {
            ConnectRole::Input => &self.inputs,
            ConnectRole::Output => &self.outputs,
            ConnectRole::Catalyst => &self.catalysts,
            ConnectRole::Activator => &self.activators,
            ConnectRole::Inhibitor => &self.inhibitors,
        }
    }

    pub fn branches_mut(&mut self, role: ConnectRole) -> &mut Vec<Vec<Point>> {
        match role {
            ConnectRole::Input => &mut self.inputs,
            ConnectRole::Output => &mut self.outputs,
            ConnectRole::Catalyst => &mut self.catalysts,
            ConnectRole::Activator => &mut self.activators,
            ConnectRole::Inhibitor => &mut self.inhibitors,
        }
    }

    /// Returns one branch of `role`, if present.
    pub fn branch(&self, role: ConnectRole, branch: usize) -> Option<&[Point]> {
        self.branches(role).get(branch).map(Vec::as_slice)
    }

    /// Appends a branch and returns its index.
    pub fn add_branch(&mut self, role: ConnectRole, points: Vec<Point>) -> usize {
        let branches = self.branches_mut(role);
        branches.push(points);
        branches.len() - 1
    }

    /// Resolves a slot to a coordinate.
    ///
    /// [`PointSlot::Position`] is not stored here; callers resolve it against
    /// the owning renderable's position.
    pub fn point(&self, slot: PointSlot) -> Option<Point> {
        match slot {
            PointSlot::Position => None,
            PointSlot::Backbone(index) => self.backbone.get(index).copied(),
            PointSlot::Branch {
                role,
                branch,
                index,
            } => self.branch(role, branch)?.get(index).copied(),
        }
    }

    /// Overwrites the coordinate at a slot. Returns false if the slot does not exist.
    pub fn set_point(&mut self, slot: PointSlot, point: Point) -> bool {
        let target = match slot {
            PointSlot::Position => None,
            PointSlot::Backbone(index) => self.backbone.get_mut(index),
            PointSlot::Branch {
                role,
                branch,
                index,
            } => self
                .branches_mut(role)
                .get_mut(branch)
                .and_then(|points| points.get_mut(index)),
        };
        match target {
            Some(p) => {
                *p = point;
                true
            }
            None => false,
        }
    }

    /// Total number of stored points across the backbone and every branch.
    pub fn point_count(&self) -> usize {
        self.backbone.len()
            + ConnectRole::ALL
                .iter()
                .flat_map(|role| self.branches(*role))
                .map(Vec::len)
                .sum::<usize>()
    }

    pub fn need_input_arrow(&self) -> bool {
        self.need_input_arrow
    }

    pub fn set_need_input_arrow(&mut self, need: bool) {
        self.need_input_arrow = need;
    }

    pub fn need_output_arrow(&self) -> bool {
        self.need_output_arrow
    }

    pub fn set_need_output_arrow(&mut self, need: bool) {
        self.need_output_arrow = need;
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn sample_edge() -> HyperEdge {
        let mut edge = HyperEdge::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        edge.add_branch(
            ConnectRole::Input,
            vec![Point::new(-20.0, 5.0), Point::new(-5.0, 0.0)],
        );
        edge.add_branch(ConnectRole::Catalyst, vec![Point::new(5.0, -20.0)]);
        edge
    }

    #[test]
    fn test_add_branch_returns_index() {
        let mut edge = HyperEdge::default();
        assert_eq!(edge.add_branch(ConnectRole::Output, vec![Point::new(1.0, 1.0)]), 0);
        assert_eq!(edge.add_branch(ConnectRole::Output, vec![Point::new(2.0, 2.0)]), 1);
        assert_eq!(edge.branches(ConnectRole::Output).len(), 2);
        assert!(edge.branches(ConnectRole::Input).is_empty());
    }

    #[test]
    fn test_point_resolution() {
        let edge = sample_edge();
        assert_eq!(edge.point(PointSlot::Backbone(1)), Some(Point::new(10.0, 0.0)));
        assert_eq!(
            edge.point(PointSlot::Branch {
                role: ConnectRole::Input,
                branch: 0,
                index: 1,
            }),
            Some(Point::new(-5.0, 0.0))
        );
        assert_eq!(edge.point(PointSlot::Backbone(7)), None);
        assert_eq!(edge.point(PointSlot::Position), None);
    }

    #[test]
    fn test_set_point() {
        let mut edge = sample_edge();
        let slot = PointSlot::Branch {
            role: ConnectRole::Catalyst,
            branch: 0,
            index: 0,
        };
        assert!(edge.set_point(slot, Point::new(6.0, -21.0)));
        assert_eq!(edge.point(slot), Some(Point::new(6.0, -21.0)));
        assert!(!edge.set_point(PointSlot::Backbone(9), Point::default()));
    }

    #[test]
    fn test_point_count() {
        assert_eq!(sample_edge().point_count(), 5);
        assert_eq!(HyperEdge::default().point_count(), 0);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = sample_edge();
        let mut copy = original.clone();
        copy.backbone_mut()[0] = Point::new(99.0, 99.0);
        copy.set_line_width(3.0);

        assert_eq!(original.backbone()[0], Point::new(0.0, 0.0));
        assert_approx_eq!(f32, original.line_width(), 1.0);
    }
}
