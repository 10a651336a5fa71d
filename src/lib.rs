//! unfurl: materialize bundled file trees
//!
//! Programs that ship static assets (web pages, templates, default configs)
//! inside their binary can expose them as ordinary editable files. A
//! read-only [`source::SourceTree`] is walked breadth-first and reconciled
//! against a writable [`destination::Destination`] under one of four
//! policies: [`reconcile::tree`], [`reconcile::touch`], [`reconcile::create`]
//! and [`reconcile::patch`].

pub mod cli;
pub mod config;
pub mod destination;
pub mod error;
pub mod logging;
pub mod reconcile;
pub mod source;
pub mod tree;

pub use reconcile::{create, patch, touch, tree, Policy, Reconciler};
