//! Rendering of resolved view files.
//!
//! [`RenderPrimitive`] is the seam between resolution and the host's actual
//! template execution: it takes a resolved path and an argument bag and
//! writes text into a caller-supplied buffer. [`JinjaEngine`] is the default
//! primitive, evaluating the file through MiniJinja with the argument bag as
//! template context.
//!
//! [`RenderEngine::capture`] scopes the output buffer around the primitive
//! call: the buffer exists only for the duration of the call and is either
//! returned as the rendered string or dropped when the primitive fails, so
//! no partial output leaks into unrelated renders.

use std::fs;
use std::path::Path;

use minijinja::Environment;
use serde_json::{Map, Value};

use crate::error::ViewError;

/// Executes a resolved view file with an argument bag.
///
/// Implementations write the rendered text into `out` and must not retry;
/// any failure propagates unchanged to the stringification boundary.
pub trait RenderPrimitive {
    /// Renders the file at `path`, exposing `args` to the template scope.
    fn render(
        &self,
        path: &Path,
        args: &Map<String, Value>,
        out: &mut String,
    ) -> Result<(), ViewError>;
}

/// The default render primitive, backed by MiniJinja.
///
/// A fresh environment is built per render and the file is read from disk
/// each time, so edited view files take effect immediately. The file's own
/// directory is installed as the template loader root, letting views
/// `{% include %}` sibling templates by relative name.
#[derive(Debug, Clone, Copy, Default)]
pub struct JinjaEngine;

impl JinjaEngine {
    /// Creates the engine.
    pub fn new() -> Self {
        Self
    }
}

impl RenderPrimitive for JinjaEngine {
    fn render(
        &self,
        path: &Path,
        args: &Map<String, Value>,
        out: &mut String,
    ) -> Result<(), ViewError> {
        let source = fs::read_to_string(path).map_err(|source| ViewError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => "view".to_string(),
        };

        let mut env = Environment::new();
        if let Some(dir) = path.parent() {
            env.set_loader(minijinja::path_loader(dir));
        }
        env.add_template_owned(name.clone(), source)
            .map_err(|err| engine_error(path, err))?;

        let rendered = env
            .get_template(&name)
            .and_then(|template| template.render(minijinja::Value::from_serialize(args)))
            .map_err(|err| engine_error(path, err))?;

        out.push_str(&rendered);
        Ok(())
    }
}

fn engine_error(path: &Path, err: minijinja::Error) -> ViewError {
    ViewError::Render {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Scopes an output buffer around a primitive call.
pub struct RenderEngine;

impl RenderEngine {
    /// Runs `primitive` against `path` and returns the captured output.
    ///
    /// The buffer is torn down on every exit path: returned on success,
    /// dropped on error.
    pub fn capture(
        primitive: &dyn RenderPrimitive,
        path: &Path,
        args: &Map<String, Value>,
    ) -> Result<String, ViewError> {
        let mut buffer = String::new();
        primitive.render(path, args, &mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn args(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_jinja_engine_renders_args_into_scope() {
        let dir = TempDir::new().unwrap();
        let view = dir.path().join("hero.jinja");
        fs::write(&view, "Hello {{ name }}, {{ count }} items").unwrap();

        let output = RenderEngine::capture(
            &JinjaEngine::new(),
            &view,
            &args(&[("name", json!("Alice")), ("count", json!(3))]),
        )
        .unwrap();

        assert_eq!(output, "Hello Alice, 3 items");
    }

    #[test]
    fn test_jinja_engine_resolves_sibling_includes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("hero.jinja"), "A{% include 'part.jinja' %}C").unwrap();
        fs::write(dir.path().join("part.jinja"), "B").unwrap();

        let output = RenderEngine::capture(
            &JinjaEngine::new(),
            &dir.path().join("hero.jinja"),
            &Map::new(),
        )
        .unwrap();

        assert_eq!(output, "ABC");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = RenderEngine::capture(
            &JinjaEngine::new(),
            &dir.path().join("absent.jinja"),
            &Map::new(),
        )
        .unwrap_err();

        assert!(matches!(err, ViewError::Io { .. }));
    }

    #[test]
    fn test_bad_template_is_render_error() {
        let dir = TempDir::new().unwrap();
        let view = dir.path().join("broken.jinja");
        fs::write(&view, "{% if %}").unwrap();

        let err = RenderEngine::capture(&JinjaEngine::new(), &view, &Map::new()).unwrap_err();
        assert!(matches!(err, ViewError::Render { .. }));
    }

    #[test]
    fn test_capture_returns_primitive_output_verbatim() {
        struct Fixed;
        impl RenderPrimitive for Fixed {
            fn render(
                &self,
                _path: &Path,
                _args: &Map<String, Value>,
                out: &mut String,
            ) -> Result<(), ViewError> {
                out.push_str("fixed output");
                Ok(())
            }
        }

        let output = RenderEngine::capture(&Fixed, Path::new("/x"), &Map::new()).unwrap();
        assert_eq!(output, "fixed output");
    }
}
