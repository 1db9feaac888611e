//! Blockflow Core Types and Definitions
//!
//! This crate provides the foundational types used to render Blockflow
//! architecture diagrams. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Points, sizes, bounds and polygons ([`geometry`] module)
//! - **Paths**: Parametric edge paths ([`path::EdgePath`])
//! - **Easing**: Normalized easing curves ([`easing`] module)
//! - **Draw**: Drawables that emit layered SVG ([`draw`] module)

pub mod color;
pub mod draw;
pub mod easing;
pub mod geometry;
pub mod identifier;
pub mod path;
