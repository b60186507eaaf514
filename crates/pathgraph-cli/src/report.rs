//! Plain-text summary of a loaded diagram.

use std::fmt;

use pathgraph::{
    Diagram,
    identifier::RenderableId,
    scene::RenderableKey,
    utility::{self, Inconsistency},
};

/// A containment edge whose child repeats the name of one of its ancestors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircularRef {
    pub container: RenderableKey,
    pub contained: RenderableKey,
    pub name: String,
}

/// What the checker found in one diagram.
#[derive(Debug, Clone)]
pub struct Report {
    root_name: String,
    renderables: usize,
    next_id: RenderableId,
    registered: Vec<String>,
    circular: Vec<CircularRef>,
    findings: Vec<Inconsistency>,
}

impl Report {
    /// Inspects `diagram`, whose session has been opened on `root`.
    pub fn new(diagram: &Diagram, root: RenderableKey) -> Self {
        let scene = diagram.scene();
        let session = diagram.session();

        let circular = scene
            .iter()
            .filter(|r| !r.kind().is_structural_leaf())
            .filter_map(|r| {
                let container = r.container()?;
                let name = utility::search_circular_ref(scene, container, r.key())?;
                Some(CircularRef {
                    container,
                    contained: r.key(),
                    name,
                })
            })
            .collect();

        Self {
            root_name: scene
                .display_name(root)
                .map_or_else(|| root.to_string(), str::to_string),
            renderables: scene.len(),
            next_id: session.current_id(),
            registered: session.names().map(str::to_string).collect(),
            circular,
            findings: utility::check_integrity(scene),
        }
    }

    /// True when no circular reference and no inconsistency was found.
    pub fn is_clean(&self) -> bool {
        self.circular.is_empty() && self.findings.is_empty()
    }

    pub fn registered(&self) -> &[String] {
        &self.registered
    }

    pub fn circular(&self) -> &[CircularRef] {
        &self.circular
    }

    pub fn findings(&self) -> &[Inconsistency] {
        &self.findings
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Diagram: {} ({} renderables)",
            self.root_name, self.renderables
        )?;
        writeln!(f, "Current id: {}", self.next_id.value())?;

        writeln!(f, "Registered names ({}):", self.registered.len())?;
        for name in &self.registered {
            writeln!(f, "  - {name}")?;
        }

        if self.circular.is_empty() {
            writeln!(f, "Circular references: none")?;
        } else {
            writeln!(f, "Circular references ({}):", self.circular.len())?;
            for found in &self.circular {
                writeln!(
                    f,
                    "  - `{}` under {} in {}",
                    found.name, found.contained, found.container
                )?;
            }
        }

        if self.findings.is_empty() {
            writeln!(f, "Integrity: ok")
        } else {
            writeln!(f, "Integrity ({} findings):", self.findings.len())?;
            for finding in &self.findings {
                writeln!(f, "  - {finding}")?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use pathgraph::{config::AppConfig, kind::RenderableKind};

    use super::*;

    #[test]
    fn test_clean_report() {
        let mut diagram = Diagram::new(AppConfig::default());
        let scene = diagram.scene_mut();
        let pathway = scene.insert(RenderableKind::Pathway, Some("Glycolysis"));
        let protein = scene.insert(RenderableKind::Protein, Some("HK1"));
        scene.add_component(pathway, protein).unwrap();
        diagram.open(pathway).unwrap();

        let report = Report::new(&diagram, pathway);

        assert!(report.is_clean());
        assert_eq!(report.registered(), ["HK1", "Glycolysis"]);
        let text = report.to_string();
        assert!(text.starts_with("Diagram: Glycolysis (2 renderables)\n"));
        assert!(text.ends_with("Integrity: ok\n"));
    }

    #[test]
    fn test_reports_circular_reference() {
        let mut diagram = Diagram::new(AppConfig::default());
        let scene = diagram.scene_mut();
        let pathway = scene.insert(RenderableKind::Pathway, Some("P"));
        let outer = scene.insert(RenderableKind::Complex, Some("C"));
        let inner = scene.insert(RenderableKind::Complex, Some("C"));
        scene.add_component(pathway, outer).unwrap();
        scene.add_component(outer, inner).unwrap();
        diagram.open(pathway).unwrap();

        let report = Report::new(&diagram, pathway);

        assert!(!report.is_clean());
        assert_eq!(report.circular().len(), 1);
        assert_eq!(report.circular()[0].contained, inner);
        assert_eq!(report.circular()[0].name, "C");
    }
}
