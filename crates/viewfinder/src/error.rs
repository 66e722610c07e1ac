//! Error types for view resolution and rendering.
//!
//! This module provides [`ViewError`], the primary error type for everything
//! below the facade boundary, and [`ContainerError`], returned by
//! [`Container`](crate::facade::Container) lookups. Both are stable public
//! types that don't expose the underlying template engine's error details.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for view resolution and rendering operations.
///
/// Every fallible step of the pipeline — resolution, file reading, template
/// evaluation — funnels into this type. Usage errors (stringifying a session
/// that has no slug, calling `args()` before `render()`) are programmer
/// mistakes and panic instead; see [`ViewService`](crate::session::ViewService).
#[derive(Debug, Error)]
pub enum ViewError {
    /// No candidate file exists in any search directory.
    ///
    /// Carries the package view directory and the filename that were
    /// attempted, so the message pinpoints the expected default location.
    #[error("unable to locate view: {}/{file}", path.display())]
    NotLocated {
        /// The package's own view directory for this request.
        path: PathBuf,
        /// The default view filename derived from the slug.
        file: String,
    },

    /// A view file resolved but could not be read from disk.
    #[error("failed to read view {}: {source}", path.display())]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The template engine rejected the view file.
    #[error("failed to render view {}: {message}", path.display())]
    Render {
        /// Path of the offending view file.
        path: PathBuf,
        /// Engine error message.
        message: String,
    },

    /// Resolution was requested before a base directory was registered.
    #[error("no base directory configured; register() a `dir` before rendering")]
    MissingBaseDir,
}

/// Error returned by [`Container`](crate::facade::Container) lookups.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The container has no entry for the requested id.
    #[error("service not found in container: {0}")]
    NotFound(String),

    /// The container failed while building or fetching the entry.
    #[error("container resolution failed: {0}")]
    Resolution(String),
}
