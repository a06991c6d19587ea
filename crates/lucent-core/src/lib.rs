//! Lucent Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Lucent layout and
//! rendering pipeline. It includes:
//!
//! - **Geometry**: Points, sizes, bounds and insets ([`geometry`] module)
//! - **Colors**: CSS color handling ([`color::Color`])
//! - **Draw**: Stroke and text definitions, render layers, the primitive
//!   vocabulary and the finished [`draw::Scene`] ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
