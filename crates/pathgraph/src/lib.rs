//! Pathgraph - the in-memory core of a pathway diagram editor.
//!
//! A diagram is a [`Scene`](scene::Scene) of renderables (containers,
//! entities, reaction nodes, hyper-edges and their connection widgets) plus a
//! [`DiagramSession`](session::DiagramSession) that maps display names to
//! canonical renderables and issues ids. The [`utility`] module holds the
//! graph algorithms that operate over both.

pub mod config;
pub mod scene;
pub mod session;
pub mod utility;

mod error;

pub use pathgraph_core::{color, geometry, identifier, kind};

pub use error::{PathgraphError, SceneError};

use log::{debug, info};

use config::AppConfig;
use scene::{RenderableKey, Scene};
use session::DiagramSession;

/// One diagram being edited: its scene, its session and the configuration
/// both are driven with.
///
/// # Examples
///
/// ```
/// use pathgraph::{Diagram, config::AppConfig, kind::RenderableKind};
///
/// let mut diagram = Diagram::new(AppConfig::default());
/// let pathway = diagram.scene_mut().insert(RenderableKind::Pathway, Some("Glycolysis"));
/// let protein = diagram.scene_mut().insert(RenderableKind::Protein, Some("HK1"));
/// diagram.scene_mut().add_component(pathway, protein).unwrap();
///
/// diagram.open(pathway).unwrap();
/// assert!(diagram.session().contains("HK1"));
/// ```
#[derive(Debug, Default)]
pub struct Diagram {
    config: AppConfig,
    scene: Scene,
    session: DiagramSession,
}

impl Diagram {
    /// Creates an empty diagram using `config`.
    pub fn new(config: AppConfig) -> Self {
        let session = DiagramSession::with_config(config.registry());
        Self {
            config,
            scene: Scene::new(),
            session,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn session(&self) -> &DiagramSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut DiagramSession {
        &mut self.session
    }

    /// Borrows the scene and the session together for utilities that need both.
    pub fn parts_mut(&mut self) -> (&mut Scene, &mut DiagramSession) {
        (&mut self.scene, &mut self.session)
    }

    /// Rebuilds the session from the diagram rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not in the scene.
    pub fn open(&mut self, root: RenderableKey) -> Result<(), PathgraphError> {
        self.scene.renderable(root)?;
        info!(root:%, renderables = self.scene.len(); "Opening diagram");
        self.session.open(&self.scene, root);
        debug!(registered = self.session.len(); "Diagram opened");
        Ok(())
    }

    /// Deletes `key` from the diagram.
    ///
    /// The session is updated first with
    /// [`remove_recursively`](DiagramSession::remove_recursively), so names
    /// move to surviving shortcuts. Every renderable that walk visited is then
    /// deleted from the scene; components it did not reach are orphaned.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is not in the scene.
    pub fn remove(&mut self, key: RenderableKey) -> Result<(), PathgraphError> {
        self.scene.renderable(key)?;
        let visited = self.session.remove_recursively(&mut self.scene, key);
        for removed in &visited {
            if self.scene.contains(*removed) {
                self.scene.remove_renderable(*removed)?;
            }
        }
        info!(key:%, removed = visited.len(), registered = self.session.len(); "Removed from diagram");
        Ok(())
    }

    /// Hands the rendering state of `source` over to `target`, highlighting
    /// the target with the configured color.
    ///
    /// # Errors
    ///
    /// Returns an error if the highlight color is invalid or either key is unknown.
    pub fn switch_render_info(
        &mut self,
        source: RenderableKey,
        target: RenderableKey,
    ) -> Result<(), PathgraphError> {
        let highlight = self
            .config
            .style()
            .highlight_color()
            .map_err(|err| PathgraphError::Config(err.to_string()))?;
        utility::switch_render_info(&mut self.scene, highlight, source, target)?;
        Ok(())
    }
}
