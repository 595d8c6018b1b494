//! Web server for running report modules on uploaded files.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! ab-report serve
//!
//! # Custom port and auto-open browser
//! ab-report serve --port 3000 --open
//!
//! # Bind to all interfaces
//! ab-report serve --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /api/modules` - Modules with their input roles and default step sizes
//! - `POST /api/sections/{module}` - Run a module (multipart form: one file
//!   field per input file, named by role, plus optional `step_size` and
//!   `label_prefix` fields); returns the report JSON

pub mod format_detection;
pub mod server;
