//! Registry lifecycle and persistence tests.

use vhost_manager::{LoadPolicy, RegistryError};

mod common;

#[test]
fn test_list_empty() {
    let t = common::test_registry();
    assert!(t.registry.list().is_empty());
}

#[test]
fn test_create_and_list() {
    let t = common::test_registry();

    t.registry
        .create("test.server", "/test/", "http://upstream", "")
        .unwrap();

    let hosts = t.registry.list();
    assert_eq!(hosts.len(), 1);
    let mapping = &hosts["test.server"].paths["/test/"];
    assert_eq!(mapping.upstream, "http://upstream");
    assert!(mapping.enabled);
}

#[test]
fn test_create_conflict_leaves_existing_mapping_alone() {
    let t = common::test_registry();

    t.registry.create("a.com", "/x/", "http://1", "").unwrap();
    let err = t.registry.create("a.com", "/x/", "http://2", "").unwrap_err();
    assert!(matches!(err, RegistryError::Conflict { .. }));

    let hosts = t.registry.list();
    assert_eq!(hosts["a.com"].paths["/x/"].upstream, "http://1");
    assert_eq!(hosts["a.com"].len(), 1);
}

#[test]
fn test_modify_moves_single_path() {
    let t = common::test_registry();

    t.registry.create("a.com", "/x/", "http://old", "").unwrap();
    t.registry
        .modify("a.com", "/x/", "/z/", "http://new", "")
        .unwrap();

    let hosts = t.registry.list();
    assert_eq!(hosts["a.com"].len(), 1);
    assert!(!hosts["a.com"].paths.contains_key("/x/"));
    assert_eq!(hosts["a.com"].paths["/z/"].upstream, "http://new");
}

#[test]
fn test_delete_last_path_removes_host_from_listing() {
    let t = common::test_registry();

    t.registry.create("test.server", "/test/", "http://upstream", "").unwrap();
    t.registry.delete("test.server", "/test/").unwrap();

    assert!(!t.registry.list().contains_key("test.server"));
    assert!(t.registry.list().is_empty());
}

#[test]
fn test_disable_then_enable_host() {
    let t = common::test_registry();

    t.registry.create("test.server", "/test1/", "http://upstream", "").unwrap();
    t.registry.create("test.server", "/test2/", "http://upstream", "").unwrap();

    t.registry.disable("test.server", "").unwrap();
    let hosts = t.registry.list();
    for path in ["/test1/", "/test2/"] {
        assert!(!hosts["test.server"].paths[path].enabled);
    }

    t.registry.enable("test.server", "").unwrap();
    let hosts = t.registry.list();
    for path in ["/test1/", "/test2/"] {
        assert!(hosts["test.server"].paths[path].enabled);
    }
}

#[test]
fn test_disable_and_enable_everything() {
    let t = common::test_registry();

    for host in ["test1.server", "test2.server"] {
        t.registry.create(host, "/test1/", "http://upstream", "").unwrap();
        t.registry.create(host, "/test2/", "http://upstream", "").unwrap();
    }

    t.registry.disable("", "").unwrap();
    for host in t.registry.list().values() {
        assert!(host.paths.values().all(|m| !m.enabled));
    }

    // Idempotent: disabling twice is the same as once.
    t.registry.disable("", "").unwrap();
    for host in t.registry.list().values() {
        assert!(host.paths.values().all(|m| !m.enabled));
    }

    t.registry.enable("", "").unwrap();
    for host in t.registry.list().values() {
        assert!(host.paths.values().all(|m| m.enabled));
    }
}

#[test]
fn test_round_trip_preserve_policy() {
    let t = common::test_registry();

    t.registry.create("a.com", "/x/", "http://1", "tag 1;").unwrap();
    t.registry.create("b.com:8081", "/y/", "http://2", "").unwrap();
    t.registry.create("", "/z/", "http://3", "").unwrap();
    t.registry.disable("a.com", "/x/").unwrap();

    let reopened = t.reopen(LoadPolicy::Preserve);
    reopened.load().unwrap();
    assert_eq!(reopened.list(), t.registry.list());
}

#[test]
fn test_round_trip_force_disabled_policy() {
    let t = common::test_registry();

    t.registry.create("a.com", "/x/", "http://1", "").unwrap();
    t.registry.create("b.com", "/y/", "http://2", "").unwrap();

    let reopened = t.reopen(LoadPolicy::ForceDisabled);
    reopened.load().unwrap();

    let hosts = reopened.list();
    assert_eq!(hosts.len(), 2);
    for host in hosts.values() {
        assert!(host.paths.values().all(|m| !m.enabled));
    }
    // Everything but the flags round-trips.
    assert_eq!(hosts["a.com"].paths["/x/"].upstream, "http://1");
}

#[test]
fn test_snapshot_written_after_every_mutation() {
    let t = common::test_registry();

    t.registry.create("a.com", "/x/", "http://1", "").unwrap();
    let first = std::fs::read_to_string(t.snapshot_path()).unwrap();
    assert!(first.contains("a.com"));

    t.registry.delete("a.com", "/x/").unwrap();
    let second = std::fs::read_to_string(t.snapshot_path()).unwrap();
    assert_eq!(second, "[]");
}

#[test]
fn test_rendered_config_tracks_disable() {
    let t = common::test_registry();

    t.registry.create("a.com", "/x/", "http://1", "").unwrap();
    t.registry.create("a.com", "/y/", "http://2", "").unwrap();

    let config = std::fs::read_to_string(t.config_path()).unwrap();
    assert!(config.contains("location /x/"));
    assert!(config.contains("location /y/"));

    t.registry.disable("a.com", "").unwrap();
    let config = std::fs::read_to_string(t.config_path()).unwrap();
    assert!(config.contains("server_name a.com;"));
    assert!(!config.contains("location"));
}
