//! Resolution memoization: positive results stick, misses are re-searched.

use std::fs;

use tempfile::TempDir;
use viewfinder::{ServiceConfig, ThemePaths, ViewService};

const LOCATE: &str = "my-plugin/views";

fn service(pkg: &TempDir, child: &TempDir) -> ViewService {
    let mut view = ViewService::new();
    view.register(
        ServiceConfig::new()
            .dir(pkg.path())
            .locate(LOCATE)
            .themes(ThemePaths::with_child(pkg.path().join("parent-theme"), child.path())),
    );
    view
}

#[test]
fn first_resolution_sticks_even_when_a_better_file_appears() {
    let pkg = TempDir::new().unwrap();
    let child = TempDir::new().unwrap();
    fs::create_dir_all(pkg.path().join("views")).unwrap();
    fs::write(pkg.path().join("views/hero.jinja"), "package").unwrap();

    let mut view = service(&pkg, &child);
    assert_eq!(view.render(["hero"]).to_string(), "package");

    // A child-theme override created after the first resolution is ignored:
    // the cache answers, it does not re-check the filesystem.
    fs::create_dir_all(child.path().join(LOCATE)).unwrap();
    fs::write(child.path().join(LOCATE).join("hero.jinja"), "child").unwrap();

    assert_eq!(view.render(["hero"]).to_string(), "package");
}

#[test]
fn a_miss_is_not_cached_and_later_files_are_discovered() {
    let pkg = TempDir::new().unwrap();
    let child = TempDir::new().unwrap();

    let mut view = service(&pkg, &child);
    assert_eq!(view.render(["hero"]).to_string(), "");

    fs::create_dir_all(pkg.path().join("views")).unwrap();
    fs::write(pkg.path().join("views/hero.jinja"), "late arrival").unwrap();

    assert_eq!(view.render(["hero"]).to_string(), "late arrival");
}

#[test]
fn distinct_slugs_get_distinct_cache_entries() {
    let pkg = TempDir::new().unwrap();
    let child = TempDir::new().unwrap();
    fs::create_dir_all(pkg.path().join("views")).unwrap();
    fs::write(pkg.path().join("views/one.jinja"), "one").unwrap();
    fs::write(pkg.path().join("views/two.jinja"), "two").unwrap();

    let mut view = service(&pkg, &child);
    assert_eq!(view.render(["one"]).to_string(), "one");
    assert_eq!(view.render(["two"]).to_string(), "two");
    assert_eq!(view.render(["one"]).to_string(), "one");
}

#[test]
fn fresh_service_starts_with_a_fresh_cache() {
    let pkg = TempDir::new().unwrap();
    let child = TempDir::new().unwrap();
    fs::create_dir_all(pkg.path().join("views")).unwrap();
    fs::write(pkg.path().join("views/hero.jinja"), "package").unwrap();

    let mut first = service(&pkg, &child);
    assert_eq!(first.render(["hero"]).to_string(), "package");

    fs::create_dir_all(child.path().join(LOCATE)).unwrap();
    fs::write(child.path().join(LOCATE).join("hero.jinja"), "child").unwrap();

    // The memo is scoped to the service, not the process.
    let mut second = service(&pkg, &child);
    assert_eq!(second.render(["hero"]).to_string(), "child");
}
