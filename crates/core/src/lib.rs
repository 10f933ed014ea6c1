//! Core types for slabbuf
//!
//! This crate defines the vocabulary every other layer shares:
//! - Element model: [`Shape`], [`DType`], [`Layout`], [`Scalar`], [`Element`]
//! - Admission of written items: [`ElementSpec`] and [`IntoElement`]
//! - Lifecycle [`Event`]s that automations attach to
//! - [`BufferError`] and [`BufferResult`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dtype;
pub mod element;
pub mod error;
pub mod event;
pub mod shape;

pub use dtype::{DType, Layout, Scalar};
pub use element::{Element, ElementData, ElementSpec, ElementValue, IntoElement};
pub use error::{BoxError, BufferError, BufferResult};
pub use event::Event;
pub use shape::Shape;
