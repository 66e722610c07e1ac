//! Facade install/teardown lifecycle and container resolution.

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use serde_json::{json, Map};
use serial_test::serial;
use tempfile::TempDir;
use viewfinder::{
    Container, ContainerError, DebugFlags, ServiceConfig, View, ViewService, SERVICE_ID,
};

struct FixedContainer {
    service: Rc<RefCell<ViewService>>,
}

impl Container for FixedContainer {
    fn has(&self, id: &str) -> bool {
        id == SERVICE_ID
    }

    fn get(&self, id: &str) -> Result<Rc<RefCell<ViewService>>, ContainerError> {
        if id == SERVICE_ID {
            Ok(Rc::clone(&self.service))
        } else {
            Err(ContainerError::NotFound(id.to_string()))
        }
    }
}

struct FailingContainer;

impl Container for FailingContainer {
    fn has(&self, _id: &str) -> bool {
        true
    }

    fn get(&self, _id: &str) -> Result<Rc<RefCell<ViewService>>, ContainerError> {
        Err(ContainerError::Resolution("circular dependency".to_string()))
    }
}

#[test]
#[serial]
fn facade_renders_through_installed_service() {
    View::uninstall();

    let pkg = TempDir::new().unwrap();
    fs::create_dir_all(pkg.path().join("views")).unwrap();
    fs::write(pkg.path().join("views/hero.jinja"), "Hi {{ name }}").unwrap();

    View::install(ViewService::new());
    View::register(ServiceConfig::new().dir(pkg.path()));

    let mut args = Map::new();
    args.insert("name".to_string(), json!("facade"));

    assert_eq!(View::render(["hero"]).args(args).to_string(), "Hi facade");

    View::uninstall();
}

#[test]
#[serial]
fn facade_lazily_constructs_a_default_service() {
    View::uninstall();
    assert!(!View::is_installed());

    let handle = View::register(ServiceConfig::new().dir("/srv/my-plugin"));
    assert!(View::is_installed());
    assert_eq!(handle.service().borrow().hook_prefix(), "my_plugin");

    View::uninstall();
    assert!(!View::is_installed());
}

#[test]
#[serial]
fn container_service_becomes_the_facade_instance() {
    View::uninstall();

    let pkg = TempDir::new().unwrap();
    fs::create_dir_all(pkg.path().join("views")).unwrap();
    fs::write(pkg.path().join("views/hero.jinja"), "from container").unwrap();

    let mut service = ViewService::new();
    service.register(ServiceConfig::new().dir(pkg.path()));
    let container = FixedContainer {
        service: Rc::new(RefCell::new(service)),
    };

    View::install_container(Rc::new(container), DebugFlags::none());
    assert!(View::is_installed());
    assert_eq!(View::render(["hero"]).to_string(), "from container");

    View::uninstall();
}

#[test]
#[serial]
fn failed_container_lookup_is_swallowed_without_debug() {
    View::uninstall();

    View::install_container(Rc::new(FailingContainer), DebugFlags::none());
    assert!(!View::is_installed());

    View::uninstall();
}

#[test]
#[serial]
#[should_panic(expected = "circular dependency")]
fn failed_container_lookup_halts_under_debug() {
    View::uninstall();
    View::install_container(Rc::new(FailingContainer), DebugFlags::halting());
}

#[test]
#[serial]
fn installed_service_keeps_state_across_facade_calls() {
    View::uninstall();

    let pkg = TempDir::new().unwrap();
    fs::create_dir_all(pkg.path().join("views")).unwrap();
    fs::write(pkg.path().join("views/hero.jinja"), "{{ a }}{{ b }}").unwrap();

    View::install(ViewService::new());
    View::register(ServiceConfig::new().dir(pkg.path()));

    let mut first = Map::new();
    first.insert("a".to_string(), json!("x"));
    let mut second = Map::new();
    second.insert("b".to_string(), json!("y"));

    // Separate facade calls reach the same underlying session.
    View::render(["hero"]);
    View::args(first);
    assert_eq!(View::args(second).to_string(), "xy");

    View::uninstall();
}
