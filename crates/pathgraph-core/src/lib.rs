//! Pathgraph Core Types and Definitions
//!
//! This crate provides the foundational types shared by the pathway scene
//! graph. It includes:
//!
//! - **Identifiers**: Diagram-level integer ids ([`identifier::RenderableId`])
//! - **Kinds**: The closed set of renderable kinds and their capabilities
//!   ([`kind::RenderableKind`], [`kind::ConnectRole`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Points, sizes and bounding boxes ([`geometry`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod kind;
