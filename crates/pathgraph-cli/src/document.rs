//! Diagram documents.
//!
//! A document is a TOML file listing renderables and reactions by a
//! document-local `key`:
//!
//! ```toml
//! root = "glycolysis"
//!
//! [[renderable]]
//! key = "glycolysis"
//! kind = "pathway"
//! name = "Glycolysis"
//!
//! [[renderable]]
//! key = "hk1"
//! kind = "protein"
//! name = "HK1"
//! container = "glycolysis"
//! position = [120.0, 40.0]
//!
//! [[reaction]]
//! key = "r1"
//! name = "glucose phosphorylation"
//! container = "glycolysis"
//! backbone = [[100.0, 100.0], [140.0, 100.0]]
//! inputs = ["glucose"]
//! outputs = ["g6p"]
//! catalysts = ["hk1"]
//! ```
//!
//! Entries with `shortcut_of` become shortcuts of the named entry; shortcuts
//! of complexes mirror the whole complex.

use std::{collections::HashMap, ops::Range};

use log::{debug, info};
use serde::Deserialize;

use pathgraph::{
    Diagram, PathgraphError,
    config::AppConfig,
    geometry::Point,
    identifier::RenderableId,
    kind::{ConnectRole, RenderableKind},
    scene::RenderableKey,
    utility,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    root: Option<String>,
    #[serde(default, rename = "renderable")]
    renderables: Vec<RenderableEntry>,
    #[serde(default, rename = "reaction")]
    reactions: Vec<ReactionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RenderableEntry {
    key: String,
    kind: RenderableKind,
    name: Option<String>,
    id: Option<i64>,
    container: Option<String>,
    shortcut_of: Option<String>,
    position: Option<[f32; 2]>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReactionEntry {
    key: String,
    #[serde(default = "default_edge_kind")]
    kind: RenderableKind,
    name: Option<String>,
    id: Option<i64>,
    container: Option<String>,
    position: Option<[f32; 2]>,
    #[serde(default)]
    backbone: Vec<[f32; 2]>,
    #[serde(default)]
    inputs: Vec<String>,
    #[serde(default)]
    outputs: Vec<String>,
    #[serde(default)]
    catalysts: Vec<String>,
    #[serde(default)]
    activators: Vec<String>,
    #[serde(default)]
    inhibitors: Vec<String>,
}

impl ReactionEntry {
    fn participants(&self) -> [(ConnectRole, &[String]); 5] {
        [
            (ConnectRole::Input, &self.inputs),
            (ConnectRole::Output, &self.outputs),
            (ConnectRole::Catalyst, &self.catalysts),
            (ConnectRole::Activator, &self.activators),
            (ConnectRole::Inhibitor, &self.inhibitors),
        ]
    }
}

fn default_edge_kind() -> RenderableKind {
    RenderableKind::Reaction
}

fn to_point([x, y]: [f32; 2]) -> Point {
    Point::new(x, y)
}

/// A diagram built from a document, with the key of its root pathway.
#[derive(Debug)]
pub struct LoadedDiagram {
    pub diagram: Diagram,
    pub root: RenderableKey,
}

/// Parses `source` and builds the diagram it describes.
///
/// Every renderable reachable from the root is given an id and registered,
/// and the diagram session is opened on the root.
///
/// # Errors
///
/// Returns [`PathgraphError::Document`] for malformed documents and
/// unresolved references, and [`PathgraphError::Scene`] when the scene
/// rejects an edit.
pub fn load(source: &str, config: AppConfig) -> Result<LoadedDiagram, PathgraphError> {
    let document: Document = toml::from_str(source).map_err(|err| {
        PathgraphError::new_document_error(err.message(), err.span(), source)
    })?;

    let mut builder = SceneBuilder {
        src: source,
        diagram: Diagram::new(config),
        keys: HashMap::new(),
        order: Vec::new(),
    };
    builder.insert_renderables(&document)?;
    builder.place_in_containers(
        document
            .renderables
            .iter()
            .filter(|e| e.shortcut_of.is_none())
            .map(|e| (&e.key, &e.container)),
    )?;
    builder.insert_shortcuts(&document)?;
    builder.insert_reactions(&document)?;
    builder.place_in_containers(
        document
            .renderables
            .iter()
            .filter(|e| e.shortcut_of.is_some())
            .map(|e| (&e.key, &e.container))
            .chain(document.reactions.iter().map(|e| (&e.key, &e.container))),
    )?;
    let root = builder.root(&document)?;
    builder.register(&document, root)?;

    let SceneBuilder { mut diagram, .. } = builder;
    diagram.open(root)?;
    info!(
        renderables = diagram.scene().len(),
        registered = diagram.session().len();
        "Loaded document"
    );

    Ok(LoadedDiagram { diagram, root })
}

struct SceneBuilder<'a> {
    src: &'a str,
    diagram: Diagram,
    keys: HashMap<String, RenderableKey>,
    order: Vec<RenderableKey>,
}

impl SceneBuilder<'_> {
    fn error(&self, message: String, needle: &str) -> PathgraphError {
        PathgraphError::new_document_error(message, locate(self.src, needle), self.src)
    }

    fn resolve(&self, key: &str) -> Result<RenderableKey, PathgraphError> {
        self.keys
            .get(key)
            .copied()
            .ok_or_else(|| self.error(format!("unknown renderable `{key}`"), key))
    }

    fn declare(&mut self, key: &str, renderable: RenderableKey) -> Result<(), PathgraphError> {
        if self.keys.contains_key(key) {
            return Err(self.error(format!("duplicate key `{key}`"), key));
        }
        self.keys.insert(key.to_string(), renderable);
        self.order.push(renderable);
        Ok(())
    }

    fn place(
        &mut self,
        renderable: RenderableKey,
        id: Option<i64>,
        position: Option<[f32; 2]>,
    ) -> Result<(), PathgraphError> {
        let entry = self.diagram.scene_mut().renderable_mut(renderable)?;
        if let Some(id) = id {
            entry.set_id(RenderableId::new(id));
        }
        if let Some(position) = position {
            entry.set_position(Some(to_point(position)));
        }
        Ok(())
    }

    fn insert_renderables(&mut self, document: &Document) -> Result<(), PathgraphError> {
        for entry in document.renderables.iter().filter(|e| e.shortcut_of.is_none()) {
            if entry.kind.is_edge() {
                return Err(self.error(
                    format!("`{}` is a {}; declare edges as [[reaction]]", entry.key, entry.kind),
                    &entry.key,
                ));
            }
            let key = self
                .diagram
                .scene_mut()
                .insert(entry.kind, entry.name.as_deref());
            self.declare(&entry.key, key)?;
            self.place(key, entry.id, entry.position)?;
        }
        Ok(())
    }

    fn insert_shortcuts(&mut self, document: &Document) -> Result<(), PathgraphError> {
        for entry in &document.renderables {
            let Some(original) = &entry.shortcut_of else {
                continue;
            };
            let target = self.resolve(original)?;
            let scene = self.diagram.scene_mut();
            let target_kind = scene.renderable(target)?.kind();
            if target_kind != entry.kind {
                return Err(self.error(
                    format!(
                        "shortcut `{}` is declared as {} but `{original}` is a {target_kind}",
                        entry.key, entry.kind
                    ),
                    &entry.key,
                ));
            }

            let shortcut = if target_kind == RenderableKind::Complex {
                utility::generate_complex_shortcut(scene, target)?
            } else {
                utility::generate_shortcut(scene, target)?
            };
            if let Some(name) = &entry.name {
                if scene.display_name(shortcut) != Some(name.as_str()) {
                    return Err(self.error(
                        format!("shortcut `{}` cannot rename `{original}`", entry.key),
                        &entry.key,
                    ));
                }
            }
            self.declare(&entry.key, shortcut)?;
            self.place(shortcut, entry.id, entry.position)?;
            debug!(key = entry.key, original = original.as_str(); "Declared shortcut");
        }
        Ok(())
    }

    fn insert_reactions(&mut self, document: &Document) -> Result<(), PathgraphError> {
        for entry in &document.reactions {
            if !entry.kind.is_edge() {
                return Err(self.error(
                    format!("reaction `{}` has non-edge kind {}", entry.key, entry.kind),
                    &entry.key,
                ));
            }
            let edge = self
                .diagram
                .scene_mut()
                .insert(entry.kind, entry.name.as_deref());
            self.declare(&entry.key, edge)?;
            self.place(edge, entry.id, entry.position)?;

            let scene = self.diagram.scene_mut();
            if let Some(geometry) = scene.renderable_mut(edge)?.edge_mut() {
                *geometry.backbone_mut() = entry.backbone.iter().copied().map(to_point).collect();
            }

            for (role, participants) in entry.participants() {
                for participant in participants {
                    let node = self.resolve(participant)?;
                    let scene = self.diagram.scene_mut();
                    let anchor = scene.renderable(node)?.position().unwrap_or_default();
                    scene.connect_edge(edge, node, role, vec![anchor])?;
                }
            }
        }
        Ok(())
    }

    /// Places each `(key, container)` pair; complexes must be filled before
    /// they are mirrored.
    fn place_in_containers<'d>(
        &mut self,
        placements: impl Iterator<Item = (&'d String, &'d Option<String>)>,
    ) -> Result<(), PathgraphError> {
        for (key, container) in placements {
            let Some(container) = container else {
                continue;
            };
            let child = self.resolve(key)?;
            let parent = self.resolve(container)?;
            self.diagram.scene_mut().add_component(parent, child)?;
        }
        Ok(())
    }

    fn root(&self, document: &Document) -> Result<RenderableKey, PathgraphError> {
        if let Some(root) = &document.root {
            return self.resolve(root);
        }
        let scene = self.diagram.scene();
        self.order
            .iter()
            .copied()
            .find(|key| {
                scene.kind(*key) == Some(RenderableKind::Pathway) && scene.container(*key).is_none()
            })
            .ok_or_else(|| {
                PathgraphError::new_document_error(
                    "document has no top-level pathway",
                    None,
                    self.src,
                )
            })
    }

    fn register(&mut self, document: &Document, root: RenderableKey) -> Result<(), PathgraphError> {
        let max_id = document
            .renderables
            .iter()
            .filter_map(|e| e.id)
            .chain(document.reactions.iter().filter_map(|e| e.id))
            .max();
        let (scene, session) = self.diagram.parts_mut();
        if let Some(max_id) = max_id {
            session.suggest_next_id(max_id);
        }

        let mut nodes = vec![root];
        nodes.extend(
            self.order
                .iter()
                .copied()
                .filter(|key| *key != root && scene.container(*key).is_none()),
        );
        utility::register_nodes(scene, session, &nodes, Some(root))?;
        Ok(())
    }
}

/// Byte range of the first quoted occurrence of `needle` in `src`.
fn locate(src: &str, needle: &str) -> Option<Range<usize>> {
    let quoted = format!("\"{needle}\"");
    src.find(&quoted)
        .map(|start| start + 1..start + 1 + needle.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLYCOLYSIS: &str = r#"
        [[renderable]]
        key = "glycolysis"
        kind = "pathway"
        name = "Glycolysis"

        [[renderable]]
        key = "glucose"
        kind = "chemical"
        name = "glucose"
        container = "glycolysis"
        position = [0.0, 0.0]

        [[renderable]]
        key = "g6p"
        kind = "chemical"
        name = "G6P"
        id = 40
        position = [60.0, 0.0]

        [[renderable]]
        key = "hk1"
        kind = "protein"
        name = "HK1"
        container = "glycolysis"

        [[renderable]]
        key = "hk1-copy"
        kind = "protein"
        shortcut_of = "hk1"
        container = "glycolysis"

        [[reaction]]
        key = "r1"
        name = "glucose phosphorylation"
        container = "glycolysis"
        backbone = [[20.0, 0.0], [40.0, 0.0]]
        inputs = ["glucose"]
        outputs = ["g6p"]
        catalysts = ["hk1-copy"]
    "#;

    #[test]
    fn test_load_builds_scene() {
        let loaded = load(GLYCOLYSIS, AppConfig::default()).unwrap();
        let scene = loaded.diagram.scene();
        let session = loaded.diagram.session();

        assert_eq!(scene.display_name(loaded.root), Some("Glycolysis"));
        assert_eq!(scene.components(loaded.root).len(), 5);
        assert!(session.contains("HK1"));
        assert!(session.contains("G6P"));
        assert!(session.contains("glucose phosphorylation"));
        assert_eq!(session.current_id(), RenderableId::new(46));
    }

    #[test]
    fn test_load_connects_participants() {
        let loaded = load(GLYCOLYSIS, AppConfig::default()).unwrap();
        let scene = loaded.diagram.scene();

        let reaction = scene
            .components(loaded.root)
            .iter()
            .copied()
            .find(|k| scene.kind(*k) == Some(RenderableKind::Reaction))
            .unwrap();
        assert_eq!(scene.participants(reaction, ConnectRole::Input).len(), 1);
        assert_eq!(scene.participants(reaction, ConnectRole::Catalyst).len(), 1);
        assert!(utility::check_integrity(scene).is_empty());
    }

    #[test]
    fn test_unknown_reference_has_span() {
        let source = r#"
            [[renderable]]
            key = "p"
            kind = "pathway"

            [[renderable]]
            key = "x"
            kind = "protein"
            container = "nowhere"
        "#;

        match load(source, AppConfig::default()) {
            Err(PathgraphError::Document { message, span, .. }) => {
                assert_eq!(message, "unknown renderable `nowhere`");
                let span = span.unwrap();
                assert_eq!(&source[span], "nowhere");
            }
            other => panic!("expected document error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_toml() {
        let err = load("[[renderable]\nkey = ", AppConfig::default()).unwrap_err();
        assert!(matches!(err, PathgraphError::Document { .. }));
    }

    #[test]
    fn test_unknown_kind() {
        let source = r#"
            [[renderable]]
            key = "x"
            kind = "organelle"
        "#;
        let err = load(source, AppConfig::default()).unwrap_err();
        assert!(matches!(err, PathgraphError::Document { span: Some(_), .. }));
    }

    #[test]
    fn test_missing_root() {
        let source = r#"
            [[renderable]]
            key = "x"
            kind = "protein"
        "#;
        let err = load(source, AppConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "Document error: document has no top-level pathway");
    }

    #[test]
    fn test_complex_shortcut_is_mirrored() {
        let source = r#"
            [[renderable]]
            key = "p"
            kind = "pathway"
            name = "P"

            [[renderable]]
            key = "c"
            kind = "complex"
            name = "C"
            container = "p"

            [[renderable]]
            key = "s"
            kind = "protein"
            name = "S"
            container = "c"

            [[renderable]]
            key = "c2"
            kind = "complex"
            shortcut_of = "c"
            container = "p"
        "#;
        let loaded = load(source, AppConfig::default()).unwrap();
        let scene = loaded.diagram.scene();

        let mirror = scene.components(loaded.root)[1];
        assert!(scene.get(mirror).unwrap().is_alias_only());
        assert_eq!(scene.components(mirror).len(), 1);
        assert_eq!(loaded.diagram.session().len(), 3);
    }
}
