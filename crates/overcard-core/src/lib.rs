#![forbid(unsafe_code)]

//! Core data types for Overcard.
//!
//! This crate provides:
//! - [`Rgba`] packed colors and [`FontSpec`]/[`TextAlignment`] text styling data
//! - [`Size`] and [`Insets`] in points
//! - [`reactive`] thread-safe observable cells used to wire component state
//!   to live views
//! - [`animation`] timing and easing for card entrance and exit

pub mod animation;
pub mod color;
pub mod geometry;
pub mod reactive;
pub mod style;

pub use animation::{AnimationConfig, Easing};
pub use color::Rgba;
pub use geometry::{Insets, Size};
pub use reactive::{BindingScope, Observable, Subscription};
pub use style::{FontSpec, FontTraits, FontWeight, TextAlignment};
