//! Stateless graph algorithms over a [`Scene`](crate::scene::Scene).
//!
//! Every operation takes the scene (and, where names or ids are involved,
//! the [`DiagramSession`](crate::session::DiagramSession)) explicitly. All
//! traversals are iterative and guard against cyclic containment with
//! visited sets.

mod copy;
mod integrity;
mod render_info;
mod shortcut;
mod traverse;

pub use copy::{copy_hyper_edge, try_copy_hyper_edge};
pub use integrity::{Inconsistency, check_integrity, search_circular_ref};
pub use render_info::{register_nodes, rename, switch_render_info};
pub use shortcut::{generate_complex_shortcut, generate_shortcut, get_shortcut_target};
pub use traverse::{get_all_descendents, get_components_in_hierarchy};
