//! ide-workspace: a local project workspace with remote format, lint and
//! preview actions.
//!
//! Modules:
//! - models: lazy file tree over a `FileProvider`
//! - kernel: state/action/effect core, services (ports + adapters)
//! - app: Workbench that runs effects and feeds messages back

pub mod app;
pub mod kernel;
pub mod models;
