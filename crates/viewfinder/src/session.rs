//! The view session: a fluent configure/request/render state machine.
//!
//! [`ViewService`] owns the per-instance configuration, the hook registry,
//! the resolution cache, and the render primitive. It moves between two
//! states: *unconfigured* (no slug set) and *configured* (a render request
//! with a slug is pending). `register()` works in either state; `args()` and
//! stringification require a configured session.
//!
//! ```rust,no_run
//! use serde_json::{json, Map};
//! use viewfinder::{ServiceConfig, ViewService};
//!
//! let mut view = ViewService::new();
//! view.register(ServiceConfig::new().dir("/srv/my-plugin"));
//!
//! let mut args = Map::new();
//! args.insert("title".to_string(), json!("Welcome"));
//!
//! let html = view.render(["hero"]).args(args).to_string();
//! ```
//!
//! Stringifying through `Display` is the terminal operation: it resolves the
//! view file (consulting the cache), renders it, and applies the error
//! policy — halt, log, or degrade to an empty string — without leaving the
//! configured state, so the same request can be stringified again.

use std::fmt;

use serde_json::{Map, Value};

use crate::cache::ResolutionCache;
use crate::config::{DebugFlags, ServiceConfig};
use crate::engine::{JinjaEngine, RenderEngine, RenderPrimitive};
use crate::error::ViewError;
use crate::hooks::{self, ViewContext, ViewHooks};
use crate::resolve::{PathResolver, ViewPolicy};

/// The pending render request: what to render and with which arguments.
#[derive(Debug, Clone, Default)]
struct RenderRequest {
    slug: String,
    domain: Option<String>,
    args: Map<String, Value>,
}

/// A view-rendering session with per-instance configuration and cache.
pub struct ViewService {
    config: ServiceConfig,
    hooks: ViewHooks,
    cache: ResolutionCache,
    engine: Box<dyn RenderPrimitive>,
    view: Option<RenderRequest>,
}

impl Default for ViewService {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewService {
    /// Creates a session with the default MiniJinja render primitive.
    pub fn new() -> Self {
        Self::with_engine(Box::new(JinjaEngine::new()))
    }

    /// Creates a session with a custom render primitive.
    pub fn with_engine(engine: Box<dyn RenderPrimitive>) -> Self {
        Self {
            config: ServiceConfig::default(),
            hooks: ViewHooks::new(),
            cache: ResolutionCache::new(),
            engine,
            view: None,
        }
    }

    /// Merges `config` into the session configuration.
    ///
    /// Valid in any state; does not touch the pending request.
    pub fn register(&mut self, config: ServiceConfig) -> &mut Self {
        self.config.merge(config);
        self
    }

    /// Sets the view to render from one or two path segments.
    ///
    /// One segment is the slug; two segments are `domain` then `slug` (an
    /// empty second segment degrades to slug-only). Any previously set
    /// request and its arguments are discarded.
    ///
    /// # Panics
    ///
    /// Panics when called with no segments.
    pub fn render<I, S>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut segments = paths.into_iter().map(Into::into);
        let first = match segments.next() {
            Some(first) => first,
            None => panic!("[View] render() requires at least one path segment."),
        };

        self.view = Some(match segments.next().filter(|s| !s.is_empty()) {
            Some(slug) => RenderRequest {
                domain: Some(first),
                slug,
                args: Map::new(),
            },
            None => RenderRequest {
                slug: first,
                domain: None,
                args: Map::new(),
            },
        });

        self
    }

    /// Merges `args` into the pending request's argument bag.
    ///
    /// The map first passes through the `{prefix}_view_args` extension
    /// point, then merges key-by-key over the existing bag, so repeated
    /// calls layer on top of each other until `render()` resets the request.
    ///
    /// # Panics
    ///
    /// Panics when no view has been set with [`Self::render`] yet.
    pub fn args(&mut self, args: Map<String, Value>) -> &mut Self {
        let ctx = match self.view.as_ref() {
            Some(view) => ViewContext {
                slug: view.slug.clone(),
                domain: view.domain.clone(),
                args: view.args.clone(),
            },
            None => panic!("[View] args() shouldn't be called before render()."),
        };

        let hook = hooks::view_args_hook(self.hook_prefix());
        let merged = self.hooks.apply_view_args(&hook, args, &ctx);

        if let Some(view) = self.view.as_mut() {
            for (key, value) in merged {
                view.args.insert(key, value);
            }
        }

        self
    }

    /// Registration access to the session's extension points.
    pub fn hooks_mut(&mut self) -> &mut ViewHooks {
        &mut self.hooks
    }

    /// The session configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns true once `render()` has established a slug.
    pub fn is_configured(&self) -> bool {
        self.view.is_some()
    }

    /// Snapshot of the pending request, if any.
    pub fn context(&self) -> Option<ViewContext> {
        self.view.as_ref().map(|view| ViewContext {
            slug: view.slug.clone(),
            domain: view.domain.clone(),
            args: view.args.clone(),
        })
    }

    /// The effective extension-point prefix.
    ///
    /// The configured override wins; otherwise the prefix is derived once
    /// from the base directory's name, lowercased with hyphens turned into
    /// underscores, and memoized for the lifetime of the session's cache.
    pub fn hook_prefix(&self) -> &str {
        if let Some(hook) = self.config.hook_override() {
            return hook;
        }
        self.cache
            .hook_prefix(|| self.dirname().replace('-', "_").to_ascii_lowercase())
    }

    /// The base directory's name, memoized on first use.
    fn dirname(&self) -> &str {
        self.cache.dirname(|| {
            self.config
                .base_dir()
                .and_then(|dir| dir.file_name())
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }

    /// Resolves and renders the pending request.
    ///
    /// This is the explicit, fallible form of stringification: resolution
    /// failures and render failures come back as errors instead of being
    /// routed through the error policy. The session stays configured.
    ///
    /// # Panics
    ///
    /// Panics when no view has been set with [`Self::render`] yet — that is
    /// a usage error, not a runtime failure.
    pub fn try_render_to_string(&self) -> Result<String, ViewError> {
        let view = match self.view.as_ref() {
            Some(view) => view,
            None => panic!("[View] no view has been set yet."),
        };
        let base_dir = self.config.base_dir().ok_or(ViewError::MissingBaseDir)?;

        let ctx = ViewContext {
            slug: view.slug.clone(),
            domain: view.domain.clone(),
            args: view.args.clone(),
        };
        let policy = ViewPolicy {
            slug: &view.slug,
            domain: view.domain.as_deref(),
            base_dir,
            hook_prefix: self.hook_prefix(),
            folder: self.config.views_folder(),
            base_path: self.config.base_path(),
            entry: self.config.entry_folder(),
            locate: self.config.locate_folder(),
            themes: self.config.theme_paths(),
        };
        let resolver = PathResolver::new(policy, &self.hooks);

        match resolver.resolve(&self.cache, &ctx) {
            Some(located) => RenderEngine::capture(self.engine.as_ref(), &located, &ctx.args),
            None => Err(ViewError::NotLocated {
                path: resolver.absolute_view_dir(),
                file: resolver.view_file(),
            }),
        }
    }

    fn apply_error_policy(&self, err: &ViewError) {
        let DebugFlags {
            halt_on_error,
            log_on_error,
        } = self.config.debug_flags();

        if halt_on_error {
            panic!("{err}");
        }
        if log_on_error {
            log::error!("{err}");
        }
    }
}

impl fmt::Display for ViewService {
    /// Renders the pending request, applying the error policy.
    ///
    /// With the halt flag set, failures abort with the error message; with
    /// the log flag set, they are logged; otherwise the output degrades to
    /// an empty string. A broken view must not break the surrounding page.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_render_to_string() {
            Ok(output) => f.write_str(&output),
            Err(err) => {
                self.apply_error_policy(&err);
                Ok(())
            }
        }
    }
}

impl fmt::Debug for ViewService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewService")
            .field("config", &self.config)
            .field("hooks", &self.hooks)
            .field("cached", &self.cache.len())
            .field("view", &self.view)
            .finish()
    }
}
