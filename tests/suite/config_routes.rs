//! Config-driven route tables and role labels.

use std::path::Path;

use clinic_config::ConsoleConfig;
use clinic_core::{Gateway, Navigator, RouteTable, RouteTableError};
use clinic_types::{Access, AdminLabels, DenialReason, RoutePath};

use crate::common::{SessionFixture, load_config};

#[test]
fn configured_admin_labels_drive_role_decoding() {
    let (_dir, config) = load_config(
        r#"
        [roles]
        administrator = ["院长"]
        "#,
    );
    let fixture = SessionFixture::with_labels(config.admin_labels());
    let mut nav = Navigator::new(
        RouteTable::from_config(&config).unwrap(),
        Gateway::new(&fixture.store),
    );

    fixture.sign_in("t1", Some("院长"));
    assert_eq!(
        nav.navigate("/employees").unwrap().resolved.as_str(),
        "/employees"
    );

    fixture.sign_in("t1", Some("管理员"));
    let result = nav.navigate("/employees").unwrap();
    assert_eq!(result.denial(), Some(DenialReason::Forbidden));
}

#[test]
fn configured_routes_replace_the_default_table() {
    let (_dir, config) = load_config(
        r#"
        [[routes]]
        path = "/login"
        public = true

        [[routes]]
        path = "/"
        redirect = "/dashboard"

        [[routes]]
        path = "/dashboard"
        title = "Home"

        [[routes]]
        path = "/audit"
        title = "Audit"
        admin = true
        "#,
    );
    let table = RouteTable::from_config(&config).unwrap();
    assert_eq!(table.len(), 4);
    assert_eq!(table.resolve("/audit").access(), Access::Administrator);
    assert_eq!(table.resolve("/customers"), table.fallback());

    let fixture = SessionFixture::new();
    fixture.sign_in("t1", Some("护士"));
    let mut nav = Navigator::new(table, Gateway::new(&fixture.store));
    assert_eq!(
        nav.navigate("/audit").unwrap().resolved.as_str(),
        "/dashboard"
    );
}

#[test]
fn public_flag_wins_over_admin_flag() {
    let (_dir, config) = load_config(
        r#"
        [[routes]]
        path = "/login"
        public = true
        admin = true

        [[routes]]
        path = "/"
        "#,
    );
    let table = RouteTable::from_config(&config).unwrap();
    assert!(table.resolve("/login").is_public());

    let fixture = SessionFixture::new();
    let mut nav = Navigator::new(table, Gateway::new(&fixture.store));
    assert_eq!(nav.navigate("/login").unwrap().resolved.as_str(), "/login");
}

#[test]
fn redirect_to_missing_route_is_rejected() {
    let (_dir, config) = load_config(
        r#"
        [[routes]]
        path = "/"
        redirect = "/home"
        "#,
    );
    let err = RouteTable::from_config(&config).unwrap_err();
    assert_eq!(
        err,
        RouteTableError::UnknownRedirect {
            from: RoutePath::root(),
            to: RoutePath::parse("/home").unwrap(),
        }
    );
}

#[test]
fn table_without_root_route_is_rejected() {
    let (_dir, config) = load_config(
        r#"
        [[routes]]
        path = "/login"
        public = true

        [[routes]]
        path = "/dashboard"
        "#,
    );
    assert_eq!(
        RouteTable::from_config(&config).unwrap_err(),
        RouteTableError::MissingRoot
    );

    let (_dir, empty) = load_config("routes = []\n");
    assert_eq!(
        RouteTable::from_config(&empty).unwrap_err(),
        RouteTableError::MissingRoot
    );
}

#[test]
fn unknown_paths_in_configured_table_fall_back_to_root() {
    let (_dir, config) = load_config(
        r#"
        [[routes]]
        path = "/login"
        public = true

        [[routes]]
        path = "/"
        redirect = "/dashboard"

        [[routes]]
        path = "/dashboard"
        "#,
    );
    let fixture = SessionFixture::new();
    fixture.sign_in("t1", Some("管理员"));
    let mut nav = Navigator::new(
        RouteTable::from_config(&config).unwrap(),
        Gateway::new(&fixture.store),
    );
    assert_eq!(
        nav.navigate("/nope").unwrap().resolved.as_str(),
        "/dashboard"
    );
}

#[test]
fn session_file_setting_is_honored() {
    let (dir, config) = load_config(
        r#"
        [session]
        file = "/var/lib/clinic/session.json"
        "#,
    );
    assert_eq!(
        config.session_file().as_deref(),
        Some(Path::new("/var/lib/clinic/session.json"))
    );
    drop(dir);
}

#[test]
fn empty_admin_label_list_is_a_config_error() {
    let parsed: Result<ConsoleConfig, _> = toml::from_str(
        r#"
        [roles]
        administrator = []
        "#,
    );
    assert!(parsed.is_err());
    assert_eq!(
        AdminLabels::default().labels(),
        ["管理员".to_string(), "administrator".to_string()]
    );
}
