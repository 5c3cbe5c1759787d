//! # Coursemap Architecture
//!
//! Coursemap keeps a course (outcomes, modules, objectives and the materials
//! that serve them) as one JSON document and renders it to a paginated
//! course map. The library does the work; the CLI is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Labels ("B", "2.3") → positions                          │
//! │  - Load, apply, save; import, export, render                │
//! └─────────────────────────────────────────────────────────────┘
//!                │                                 │
//!                ▼                                 ▼
//! ┌──────────────────────────────┐  ┌───────────────────────────┐
//! │  Command Layer (commands/)   │  │  Renderer (render/)       │
//! │  - Course in, course out     │  │  - Course → pages on a    │
//! │  - No I/O                    │  │    DrawingService         │
//! └──────────────────────────────┘  └───────────────────────────┘
//!                │
//!                ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/) over the document codec (document)  │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## References
//!
//! Modules point at outcomes, and items at their module's objectives. In
//! memory these are stable ids, so removing an outcome or objective never
//! shifts what the others point at. On disk they are 0-based positions,
//! which is what the document format has always used. Positions that do not
//! resolve on load are kept as stale references: they survive a round trip
//! and are left out of the rendered map with a warning.
//!
//! ## No I/O in the core
//!
//! From `api.rs` inward, code never writes to stdout/stderr or exits. The
//! renderer draws through the [`render::DrawingService`] trait and only the
//! surface decides what a page is made of.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Course edits, one module per part of the course
//! - [`model`]: Core data types (`Course`, `Module`, `Ref`, ...)
//! - [`index`]: Outcome letters and objective labels, both ways
//! - [`document`]: The persisted JSON document
//! - [`store`]: Storage abstraction and implementations
//! - [`render`]: Page layout, drawing surfaces and the document renderer
//! - [`config`]: Configuration management
//! - [`logging`]: Logger setup
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod logging;
pub mod model;
pub mod render;
pub mod store;
