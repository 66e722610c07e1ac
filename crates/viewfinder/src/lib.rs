//! # Viewfinder - Theme-Overridable View Resolution
//!
//! `viewfinder` resolves a symbolic view *slug* (optionally namespaced by a
//! *domain*) to a template file across an ordered list of candidate
//! directories — child theme, parent theme, then the package's own bundled
//! views — memoizes the resolution, and renders the file with an argument
//! bag, returning the captured output as a string. Theme and plugin authors
//! get child-theme overridability for their view files without
//! reimplementing path search logic.
//!
//! ## Core Concepts
//!
//! - [`ViewService`]: fluent session — `register()` configuration,
//!   `render()` a slug, `args()` an argument bag, stringify for output
//! - [`PathResolver`]: the ordered multi-directory search with priority
//!   overrides (child `1` < parent `10` < package `100`)
//! - [`ResolutionCache`]: per-service memo of filename → resolved path
//! - [`ViewHooks`]: named extension points that transform the candidate
//!   filename list, the search directories, and the argument bag
//! - [`View`]: an explicitly-installed, thread-local facade for hosts that
//!   want one shared service per worker
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use serde_json::{json, Map};
//! use viewfinder::{ServiceConfig, ThemePaths, ViewService};
//!
//! let mut view = ViewService::new();
//! view.register(
//!     ServiceConfig::new()
//!         .dir("/srv/plugins/my-plugin")
//!         .locate("my-plugin/views")
//!         .themes(ThemePaths::with_child(
//!             "/srv/themes/base",
//!             "/srv/themes/custom",
//!         )),
//! );
//!
//! let mut args = Map::new();
//! args.insert("title".to_string(), json!("Welcome"));
//!
//! // Looks for hero.jinja in the child theme, then the parent theme, then
//! // /srv/plugins/my-plugin/views/, and renders the first file found.
//! let html = view.render(["hero"]).args(args).to_string();
//! ```
//!
//! ## Resolution Modes
//!
//! With a `locate` folder configured, candidate filenames are searched
//! across the theme directories in priority order and the first existing
//! file wins. Without one, resolution is the deterministic package path
//! `{dir}/{folder}/{slug}.jinja` with no existence check at all.
//!
//! Domains partition views by sub-feature: `render(["shop", "single"])`
//! resolves under `{domain}/{entry}/{folder}/single.jinja` instead of
//! `{folder}/single.jinja`.
//!
//! ## Error Policy
//!
//! Stringification never propagates failures past the session boundary in
//! production configuration: with both [`DebugFlags`] off, a view that
//! cannot be located or rendered degrades to an empty string. The halt flag
//! turns failures into aborts; the log flag records them through the `log`
//! facade. Misuse of the API itself — stringifying before `render()`,
//! `args()` before `render()` — is a programmer error and always panics.
//!
//! ## Extension Points
//!
//! Hosts can register transformations under the service's hook prefix
//! (derived from the base directory name, or overridden via config):
//!
//! ```rust
//! use viewfinder::{ServiceConfig, ViewService};
//!
//! let mut view = ViewService::new();
//! view.register(ServiceConfig::new().dir("/srv/my-plugin"));
//! view.hooks_mut()
//!     .on_file_names("my_plugin_render_view", |mut names, ctx| {
//!         names.insert(0, format!("{}-override.jinja", ctx.slug));
//!         names
//!     });
//! ```

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod facade;
pub mod hooks;
pub mod resolve;
pub mod session;

pub use cache::ResolutionCache;
pub use config::{DebugFlags, ServiceConfig, ThemePaths, DEFAULT_ENTRY_FOLDER, DEFAULT_VIEWS_FOLDER};
pub use engine::{JinjaEngine, RenderEngine, RenderPrimitive};
pub use error::{ContainerError, ViewError};
pub use facade::{Container, Facade, View, SERVICE_ID};
pub use hooks::{ViewContext, ViewHooks};
pub use resolve::{
    PathResolver, ViewPolicy, CHILD_THEME_PRIORITY, PACKAGE_PRIORITY, PARENT_THEME_PRIORITY,
    VIEW_EXTENSION,
};
pub use session::ViewService;
