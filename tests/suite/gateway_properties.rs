//! Gateway decisions over the built-in route table with a file-backed session.

use clinic_core::{Gateway, RouteTable, SessionProvider};
use clinic_types::{
    Decision, DenialReason, NavigationAttempt, Outcome, RouteDescriptor, RoutePath,
};

use crate::common::{ADMIN_CLAIM, STAFF_CLAIMS, SessionFixture};

fn gated_routes(table: &RouteTable) -> impl Iterator<Item = &RouteDescriptor> {
    table.iter().filter(|route| route.redirect().is_none())
}

fn evaluate(fixture: &SessionFixture, table: &RouteTable, raw: &str) -> Decision {
    let gateway = Gateway::new(&fixture.store);
    gateway.evaluate(&NavigationAttempt::initial(table.resolve(raw)))
}

#[test]
fn login_is_reachable_in_every_session_state() {
    let table = RouteTable::console_default();
    let fixture = SessionFixture::new();

    assert_eq!(evaluate(&fixture, &table, "/login"), Decision::Allow);

    fixture.write_raw("garbage");
    assert_eq!(evaluate(&fixture, &table, "/login"), Decision::Allow);

    fixture.sign_in("t1", Some("护士"));
    assert_eq!(evaluate(&fixture, &table, "/login"), Decision::Allow);

    fixture.sign_in("t1", Some(ADMIN_CLAIM));
    assert_eq!(evaluate(&fixture, &table, "/login"), Decision::Allow);
}

#[test]
fn anonymous_is_sent_to_login_from_every_protected_page() {
    let table = RouteTable::console_default();
    let fixture = SessionFixture::new();

    for route in gated_routes(&table).filter(|r| !r.is_public()) {
        let decision = evaluate(&fixture, &table, route.path().as_str());
        assert_eq!(
            decision,
            Decision::deny(DenialReason::Unauthenticated),
            "{}",
            route.path()
        );
        assert_eq!(
            decision.redirect_path().map(RoutePath::as_str),
            Some("/login")
        );
    }
}

#[test]
fn staff_roles_are_kept_out_of_admin_pages_only() {
    let table = RouteTable::console_default();
    let fixture = SessionFixture::new();

    for claim in STAFF_CLAIMS {
        fixture.sign_in("t1", Some(claim));
        for route in gated_routes(&table) {
            let decision = evaluate(&fixture, &table, route.path().as_str());
            if route.requires_admin() {
                assert_eq!(decision.outcome(), Outcome::DeniedForbidden, "{claim}");
                assert_eq!(
                    decision.redirect_path().map(RoutePath::as_str),
                    Some("/dashboard")
                );
            } else {
                assert!(decision.is_allowed(), "{claim} on {}", route.path());
            }
        }
    }
}

#[test]
fn administrator_is_allowed_everywhere() {
    let table = RouteTable::console_default();
    let fixture = SessionFixture::new();
    fixture.sign_in("t1", Some(ADMIN_CLAIM));

    for route in gated_routes(&table) {
        assert!(
            evaluate(&fixture, &table, route.path().as_str()).is_allowed(),
            "{}",
            route.path()
        );
    }
}

#[test]
fn token_without_role_is_authenticated_but_not_admin() {
    let table = RouteTable::console_default();
    let fixture = SessionFixture::new();
    fixture.write_raw(r#"{"token": "t1"}"#);

    assert!(evaluate(&fixture, &table, "/customers").is_allowed());
    assert_eq!(
        evaluate(&fixture, &table, "/projects").outcome(),
        Outcome::DeniedForbidden
    );
}

#[test]
fn role_claim_without_token_is_anonymous() {
    let table = RouteTable::console_default();
    let fixture = SessionFixture::new();
    fixture.write_raw(r#"{"token": "", "userRole": "管理员"}"#);

    assert!(fixture.store.get_token().is_none());
    assert_eq!(
        evaluate(&fixture, &table, "/employees").outcome(),
        Outcome::DeniedUnauthenticated
    );
}

#[test]
fn near_miss_admin_labels_are_not_admin() {
    let table = RouteTable::console_default();
    let fixture = SessionFixture::new();

    for claim in ["管理员 ", "Administrator", "admin", "超级管理员"] {
        fixture.sign_in("t1", Some(claim));
        assert_eq!(
            evaluate(&fixture, &table, "/employees").outcome(),
            Outcome::DeniedForbidden,
            "{claim:?}"
        );
    }
}

#[test]
fn decisions_are_stable_across_repeated_reads() {
    let table = RouteTable::console_default();
    let fixture = SessionFixture::new();
    fixture.sign_in("t1", Some("咨询师"));

    for route in gated_routes(&table) {
        let first = evaluate(&fixture, &table, route.path().as_str());
        let second = evaluate(&fixture, &table, route.path().as_str());
        assert_eq!(first, second);
    }
}
