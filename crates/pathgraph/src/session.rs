//! The display-name registry of one open diagram.
//!
//! A [`DiagramSession`] maps every display name to the single canonical
//! renderable holding it and issues renderable ids. Registration is lenient:
//! duplicate names are shadowed (the first registration wins), and blocked or
//! unnamed renderables are ignored instead of rejected.

use std::collections::VecDeque;

use indexmap::IndexMap;
use log::{debug, info, trace};

use pathgraph_core::{identifier::RenderableId, kind::RenderableKind};

use crate::{
    config::RegistryConfig,
    scene::{Renderable, RenderableKey, Scene},
    utility,
};

/// Name table and id counter for one diagram.
#[derive(Debug, Clone, Default)]
pub struct DiagramSession {
    name_to_object: IndexMap<String, RenderableKey>,
    next_id: i64,
    unique_name_separator: String,
}

impl DiagramSession {
    /// Creates an empty session with default registry settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session using `config`.
    pub fn with_config(config: &RegistryConfig) -> Self {
        Self {
            unique_name_separator: config.unique_name_separator().to_string(),
            ..Self::default()
        }
    }

    // -------------------------------------------------------------------------
    // Ids
    // -------------------------------------------------------------------------

    /// Advances the counter and returns the new value.
    pub fn next_id(&mut self) -> RenderableId {
        self.next_id += 1;
        RenderableId::new(self.next_id)
    }

    /// Current counter value. The next issued id is strictly greater.
    pub fn current_id(&self) -> RenderableId {
        RenderableId::new(self.next_id)
    }

    /// Sets the counter unconditionally.
    pub fn reset_next_id(&mut self, id: i64) {
        self.next_id = id;
    }

    /// Raises the counter to `id` if it is larger than the current value.
    pub fn suggest_next_id(&mut self, id: i64) {
        if id > self.next_id {
            self.next_id = id;
        }
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Rebuilds the session from the diagram rooted at `container`.
    ///
    /// All previous state is dropped. Every descendant (shortcuts excluded)
    /// and the container itself are registered, and the counter is set to
    /// one past the largest id found.
    pub fn open(&mut self, scene: &Scene, container: RenderableKey) {
        self.clear();

        let descendants = utility::get_all_descendents(scene, container);
        let mut max_id = -1;
        for key in descendants.iter().copied().chain([container]) {
            self.add(scene, key);
            if let Some(renderable) = scene.get(key) {
                max_id = max_id.max(renderable.id().value());
            }
        }
        self.next_id = max_id + 1;

        info!(
            container:% = container,
            registered = self.len(),
            next_id = self.next_id;
            "Opened diagram session"
        );
    }

    /// Returns true for renderables that are never registered: notes and
    /// unnamed flow lines.
    pub fn is_blocked(renderable: &Renderable) -> bool {
        match renderable.kind() {
            RenderableKind::Note => true,
            RenderableKind::FlowLine => renderable.display_name().is_none(),
            _ => false,
        }
    }

    /// Registers `key` under its display name.
    ///
    /// Blocked and unnamed renderables are ignored. If a different renderable
    /// already holds the name, the registry is left unchanged.
    pub fn add(&mut self, scene: &Scene, key: RenderableKey) {
        let Some(renderable) = scene.get(key) else {
            return;
        };
        if Self::is_blocked(renderable) {
            return;
        }
        let Some(name) = renderable.display_name() else {
            return;
        };

        match self.name_to_object.get(name) {
            Some(holder) if *holder != key => {
                debug!(name, holder:% = holder, shadowed:% = key; "Name already registered");
            }
            Some(_) => {}
            None => {
                trace!(name, key:%; "Registered renderable");
                self.name_to_object.insert(name.to_string(), key);
            }
        }
    }

    /// Registers every key in `keys`.
    pub fn register_all<I>(&mut self, scene: &Scene, keys: I)
    where
        I: IntoIterator<Item = RenderableKey>,
    {
        for key in keys {
            self.add(scene, key);
        }
    }

    /// Removes `key` from the registry.
    ///
    /// The alias role of `key` is handed over in the scene first (see
    /// [`Scene::hand_over_aliases`]). If `key` held a name, the successor
    /// takes the name over and `false` is returned; with no successor the
    /// entry is deleted and `true` is returned. A renderable that held no
    /// name yields `false` and leaves the registry untouched.
    ///
    /// The entry is found by its holder, so this also works after `key` was
    /// removed from the scene.
    pub fn remove(&mut self, scene: &mut Scene, key: RenderableKey) -> bool {
        let successor = scene.hand_over_aliases(key);

        let Some(index) = self.name_to_object.values().position(|holder| *holder == key) else {
            return false;
        };

        match successor {
            Some(promoted) => {
                if let Some((name, holder)) = self.name_to_object.get_index_mut(index) {
                    debug!(name, removed:% = key, promoted:%; "Promoted alias to canonical holder");
                    *holder = promoted;
                }
                false
            }
            None => {
                self.name_to_object.shift_remove_index(index);
                true
            }
        }
    }

    /// Removes `key` and, breadth-first, the components of every renderable
    /// that was fully removed. Reactions are never expanded.
    ///
    /// Returns every key the walk visited, `key` first.
    pub fn remove_recursively(&mut self, scene: &mut Scene, key: RenderableKey) -> Vec<RenderableKey> {
        let mut visited = Vec::new();
        let mut queue = VecDeque::from([key]);
        while let Some(current) = queue.pop_front() {
            if visited.contains(&current) {
                continue;
            }
            visited.push(current);
            if !self.remove(scene, current) {
                continue;
            }
            let Some(renderable) = scene.get(current) else {
                continue;
            };
            if renderable.kind().cascades_removal() {
                queue.extend(renderable.components().iter().copied());
            }
        }
        visited
    }

    /// Returns true if `key` is exactly the renderable stored for its own name.
    pub fn is_registered(&self, scene: &Scene, key: RenderableKey) -> bool {
        scene
            .display_name(key)
            .and_then(|name| self.name_to_object.get(name))
            .is_some_and(|holder| *holder == key)
    }

    /// Moves the registry entry of `key` from `old_name` to its current name.
    ///
    /// The old entry is only dropped when it belongs to `key`. Blocked kinds
    /// are ignored.
    pub fn change_name(&mut self, scene: &Scene, key: RenderableKey, old_name: Option<&str>) {
        let Some(renderable) = scene.get(key) else {
            return;
        };
        if Self::is_blocked(renderable) {
            return;
        }

        if let Some(old_name) = old_name {
            if self.name_to_object.get(old_name) == Some(&key) {
                self.name_to_object.shift_remove(old_name);
            }
        }
        if let Some(name) = renderable.display_name() {
            debug!(old_name:?, name, key:%; "Re-keyed registry entry");
            self.name_to_object.insert(name.to_string(), key);
        }
    }

    /// Returns a name not yet present in the registry, built from the
    /// renderable's display name (or its type name) and a numeric suffix.
    ///
    /// The name is not registered.
    pub fn generate_unique_name(&self, renderable: &Renderable) -> String {
        let base = renderable
            .display_name()
            .unwrap_or_else(|| renderable.kind().type_name());

        (1usize..)
            .map(|suffix| format!("{base}{}{suffix}", self.unique_name_separator))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    pub fn contains(&self, name: &str) -> bool {
        self.name_to_object.contains_key(name)
    }

    /// Returns the canonical holder of `name`.
    pub fn get_single_object(&self, name: &str) -> Option<RenderableKey> {
        self.name_to_object.get(name).copied()
    }

    /// Drops the entry for `name` and returns its holder.
    pub fn unregister(&mut self, name: &str) -> Option<RenderableKey> {
        self.name_to_object.shift_remove(name)
    }

    /// Drops every entry and resets the counter.
    pub fn clear(&mut self) {
        self.name_to_object.clear();
        self.next_id = 0;
    }

    pub fn len(&self) -> usize {
        self.name_to_object.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_object.is_empty()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.name_to_object.keys().map(String::as_str)
    }
}
