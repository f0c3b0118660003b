//! Navigation end to end: file-backed session, gateway, notices.

use clinic_core::{
    FileSessionStore, Gateway, HopCause, Navigator, NoticeQueue, RouteTable, SessionProvider,
};
use clinic_types::{DenialReason, Notice, NoticeLevel};

use crate::common::{ADMIN_CLAIM, SessionFixture};

fn navigator(fixture: &SessionFixture) -> Navigator<&FileSessionStore> {
    Navigator::new(RouteTable::console_default(), Gateway::new(&fixture.store))
}

#[test]
fn anonymous_visit_to_protected_page_lands_on_login() {
    let fixture = SessionFixture::new();
    let mut nav = navigator(&fixture);

    let result = nav.navigate("/employees").unwrap();
    assert_eq!(result.resolved.as_str(), "/login");
    assert_eq!(result.denial(), Some(DenialReason::Unauthenticated));
    assert_eq!(
        nav.notices_mut().take(),
        [Notice::new(NoticeLevel::Warning, "Please log in first")]
    );
}

#[test]
fn staff_visit_to_admin_page_lands_on_dashboard() {
    let fixture = SessionFixture::new();
    fixture.sign_in("t1", Some("医生"));
    let mut nav = navigator(&fixture);

    let result = nav.navigate("/employees").unwrap();
    assert_eq!(result.resolved.as_str(), "/dashboard");
    assert_eq!(result.denial(), Some(DenialReason::Forbidden));
    assert_eq!(
        nav.notices_mut().take(),
        [Notice::new(
            NoticeLevel::Error,
            "Administrator privilege required"
        )]
    );
}

#[test]
fn login_then_protected_page_then_logout() {
    let fixture = SessionFixture::new();
    let mut nav = navigator(&fixture);

    let first = nav.navigate("/reports").unwrap();
    assert_eq!(first.resolved.as_str(), "/login");
    nav.notices_mut().take();

    fixture.sign_in("t1", Some(ADMIN_CLAIM));
    let second = nav.navigate("/reports").unwrap();
    assert_eq!(second.resolved.as_str(), "/reports");
    assert!(second.reached_target());
    assert!(nav.notices().is_empty());

    fixture.sign_out();
    assert!(nav.gateway().sessions().get_token().is_none());
    let third = nav.navigate("/reports").unwrap();
    assert_eq!(third.resolved.as_str(), "/login");
    assert_eq!(nav.notices().len(), 1);
}

#[test]
fn unknown_path_redirects_through_root() {
    let fixture = SessionFixture::new();
    fixture.sign_in("t1", Some("护士"));
    let mut nav = navigator(&fixture);

    let result = nav.navigate("/billing/2026").unwrap();
    assert_eq!(result.resolved.as_str(), "/dashboard");
    assert!(
        result
            .hops
            .iter()
            .all(|hop| hop.cause == HopCause::RouteRedirect)
    );
    assert_eq!(result.hops.len(), 2);
    assert!(nav.notices().is_empty());
}

#[test]
fn corrupt_session_file_only_locks_out() {
    let fixture = SessionFixture::new();
    fixture.write_raw("{\"token\": ");
    let mut nav = navigator(&fixture);

    assert_eq!(nav.navigate("/login").unwrap().resolved.as_str(), "/login");
    assert_eq!(
        nav.navigate("/customers").unwrap().resolved.as_str(),
        "/login"
    );
}

#[test]
fn every_denial_raises_its_own_notice() {
    let fixture = SessionFixture::new();
    let mut nav: Navigator<_, NoticeQueue> = navigator(&fixture);

    for raw in ["/customers", "/visits", "/customers"] {
        nav.navigate(raw).unwrap();
    }
    let notices = nav.notices_mut().take();
    assert_eq!(notices.len(), 3);
    assert!(notices.iter().all(|n| n.level() == NoticeLevel::Warning));

    fixture.sign_in("t1", Some("护士"));
    nav.navigate("/employees").unwrap();
    nav.navigate("/employees").unwrap();
    assert_eq!(nav.notices_mut().take().len(), 2);
}
