//! Process-wide access to a shared view service.
//!
//! [`View`] is a convenience facade over one [`ViewService`] per thread. It
//! has an explicit lifecycle: a host either installs a service directly with
//! [`View::install`], or installs a [`Container`] from which the service is
//! fetched under [`SERVICE_ID`]. When neither is installed, the first facade
//! call lazily constructs a default service. [`View::uninstall`] tears the
//! thread's facade down.
//!
//! Facade calls hand back a [`Facade`] handle wrapping the resolved service,
//! so the fluent API chains exactly like on the service itself:
//!
//! ```rust,no_run
//! use serde_json::{json, Map};
//! use viewfinder::{ServiceConfig, View};
//!
//! View::register(ServiceConfig::new().dir("/srv/my-plugin"));
//!
//! let mut args = Map::new();
//! args.insert("title".to_string(), json!("Welcome"));
//!
//! let html = View::render(["hero"]).args(args).to_string();
//! View::uninstall();
//! ```
//!
//! The facade is thread-local on purpose: the execution model is one request
//! per worker with no intra-process parallelism, so no locking discipline is
//! needed and hook closures stay plain `Rc` values.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::config::{DebugFlags, ServiceConfig};
use crate::error::{ContainerError, ViewError};
use crate::session::ViewService;

/// Contract identifier under which containers expose the view service.
pub const SERVICE_ID: &str = "viewfinder.service";

/// A dependency container the facade can fetch the service from.
pub trait Container {
    /// Returns true if the container has an entry for `id`.
    fn has(&self, id: &str) -> bool;

    /// Fetches the entry for `id`.
    fn get(&self, id: &str) -> Result<Rc<RefCell<ViewService>>, ContainerError>;
}

thread_local! {
    static INSTANCE: RefCell<Option<Rc<RefCell<ViewService>>>> = const { RefCell::new(None) };
    static CONTAINER: RefCell<Option<Rc<dyn Container>>> = const { RefCell::new(None) };
}

/// The view facade.
///
/// All methods operate on the current thread's installed service; see the
/// module docs for the resolution order.
pub struct View;

impl View {
    /// Installs `service` as this thread's facade instance.
    ///
    /// Returns the shared handle so the host can keep configuring the same
    /// service directly.
    pub fn install(service: ViewService) -> Rc<RefCell<ViewService>> {
        let service = Rc::new(RefCell::new(service));
        Self::install_shared(Rc::clone(&service));
        service
    }

    /// Installs an already-shared service as this thread's facade instance.
    pub fn install_shared(service: Rc<RefCell<ViewService>>) {
        INSTANCE.with_borrow_mut(|slot| *slot = Some(service));
    }

    /// Installs a container and eagerly resolves the service from it.
    ///
    /// When the container has an entry under [`SERVICE_ID`] it becomes the
    /// facade instance. A failed lookup is swallowed — with `debug.halt_on_error`
    /// set it aborts with the container's message instead, and with
    /// `debug.log_on_error` set it is logged.
    pub fn install_container(container: Rc<dyn Container>, debug: DebugFlags) {
        if container.has(SERVICE_ID) {
            match container.get(SERVICE_ID) {
                Ok(service) => Self::install_shared(service),
                Err(err) => {
                    if debug.halt_on_error {
                        panic!("{err}");
                    }
                    if debug.log_on_error {
                        log::error!("{err}");
                    }
                }
            }
        }
        CONTAINER.with_borrow_mut(|slot| *slot = Some(container));
    }

    /// Tears down this thread's facade instance and container.
    pub fn uninstall() {
        INSTANCE.with_borrow_mut(|slot| *slot = None);
        CONTAINER.with_borrow_mut(|slot| *slot = None);
    }

    /// Returns true if a facade instance is currently installed.
    pub fn is_installed() -> bool {
        INSTANCE.with_borrow(|slot| slot.is_some())
    }

    /// Resolves the facade instance.
    ///
    /// An installed instance wins. With no instance and no container, a
    /// default service is constructed lazily and installed. With a container
    /// installed but no instance resolved from it, the facade is unusable.
    ///
    /// # Panics
    ///
    /// Panics when no instance can be resolved — calling the facade in that
    /// state is a usage error.
    fn resolve() -> Rc<RefCell<ViewService>> {
        let has_container = CONTAINER.with_borrow(|container| container.is_some());

        INSTANCE.with_borrow_mut(|slot| {
            if slot.is_none() && !has_container {
                *slot = Some(Rc::new(RefCell::new(ViewService::new())));
            }
            match slot {
                Some(service) => Rc::clone(service),
                None => panic!("[View] view service could not be resolved."),
            }
        })
    }

    /// Merges `config` into the facade service's configuration.
    pub fn register(config: ServiceConfig) -> Facade {
        let service = Self::resolve();
        service.borrow_mut().register(config);
        Facade { service }
    }

    /// Sets the view to render; see [`ViewService::render`].
    pub fn render<I, S>(paths: I) -> Facade
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let service = Self::resolve();
        service.borrow_mut().render(paths);
        Facade { service }
    }

    /// Merges arguments into the pending request; see [`ViewService::args`].
    pub fn args(args: Map<String, Value>) -> Facade {
        let service = Self::resolve();
        service.borrow_mut().args(args);
        Facade { service }
    }
}

/// Fluent handle returned by facade calls.
///
/// Wraps the resolved service so chained calls keep operating on the same
/// instance, and stringifies exactly like [`ViewService`] does.
pub struct Facade {
    service: Rc<RefCell<ViewService>>,
}

impl Facade {
    /// Merges `config` into the service configuration.
    pub fn register(self, config: ServiceConfig) -> Self {
        self.service.borrow_mut().register(config);
        self
    }

    /// Sets the view to render.
    pub fn render<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.service.borrow_mut().render(paths);
        self
    }

    /// Merges arguments into the pending request.
    pub fn args(self, args: Map<String, Value>) -> Self {
        self.service.borrow_mut().args(args);
        self
    }

    /// The explicit, fallible form of stringification.
    pub fn try_to_string(&self) -> Result<String, ViewError> {
        self.service.borrow().try_render_to_string()
    }

    /// The wrapped service.
    pub fn service(&self) -> Rc<RefCell<ViewService>> {
        Rc::clone(&self.service)
    }
}

impl fmt::Display for Facade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.service.borrow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EmptyContainer;

    impl Container for EmptyContainer {
        fn has(&self, _id: &str) -> bool {
            false
        }

        fn get(&self, id: &str) -> Result<Rc<RefCell<ViewService>>, ContainerError> {
            Err(ContainerError::NotFound(id.to_string()))
        }
    }

    #[test]
    #[serial]
    fn test_lazy_default_instance_without_container() {
        View::uninstall();
        assert!(!View::is_installed());

        let handle = View::register(ServiceConfig::new().dir("/srv/my-plugin"));
        assert!(View::is_installed());
        assert!(handle.service().borrow().config().base_dir().is_some());

        View::uninstall();
    }

    #[test]
    #[serial]
    fn test_installed_instance_takes_precedence() {
        View::uninstall();
        let mut service = ViewService::new();
        service.register(ServiceConfig::new().hook("installed"));
        View::install(service);

        let handle = View::render(["blog"]);
        assert_eq!(handle.service().borrow().hook_prefix(), "installed");

        View::uninstall();
    }

    #[test]
    #[serial]
    #[should_panic(expected = "could not be resolved")]
    fn test_container_without_service_makes_facade_unresolvable() {
        View::uninstall();
        View::install_container(Rc::new(EmptyContainer), DebugFlags::none());
        let _ = View::render(["blog"]);
    }
}
