//! Unit tests for the architecture lint.

use rstest::fixture;
use rstest::rstest;

use super::*;

#[derive(Clone, Copy)]
struct LintSingle;

impl LintSingle {
    fn lint(self, file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
        lint_sources(&[LintSource::new(file, contents)])
    }
}

#[fixture]
fn lint_single() -> LintSingle {
    LintSingle
}

#[rstest]
#[case::inbound_uses_domain(
    "inbound/http/benefits.rs",
    "use crate::domain::Benefit; fn handler(b: &Benefit) { let _ = b.id(); }",
    true
)]
#[case::inbound_imports_outbound(
    "inbound/http/benefits.rs",
    "use crate::outbound::upstream::HttpUpstreamGateway; fn handler() { let _ = HttpUpstreamGateway::new; }",
    false
)]
#[case::inbound_imports_bare_outbound(
    "inbound/http/benefits.rs",
    "use outbound::upstream::UpstreamBenefitsRepository; fn handler() {}",
    false
)]
#[case::inbound_imports_outbound_via_crate_name(
    "inbound/http/benefits.rs",
    "use benefits_backend::outbound::upstream::HttpUpstreamGateway; fn handler() {}",
    false
)]
#[case::inbound_uses_http_client(
    "inbound/http/benefits.rs",
    "fn handler() { let _ = reqwest::Client::new(); }",
    false
)]
#[case::inbound_reads_settings(
    "inbound/http/state.rs",
    "use crate::settings::BenefitsSettings; fn build() {}",
    false
)]
#[case::domain_imports_inbound(
    "domain/benefits_service.rs",
    "use crate::inbound::http; fn thing() { let _ = 1; }",
    false
)]
#[case::domain_imports_actix(
    "domain/error.rs",
    "use actix_web::ResponseError; fn thing() {}",
    false
)]
#[case::domain_derives_schema(
    "domain/benefit.rs",
    "use utoipa::ToSchema; #[derive(ToSchema)] struct Foo;",
    false
)]
#[case::domain_calls_upstream(
    "domain/ports/upstream_gateway.rs",
    "async fn fetch() { let _ = reqwest::get(\"http://example.com\").await; }",
    false
)]
#[case::domain_uses_ports_and_tokio(
    "domain/trace_id.rs",
    "use super::ports::BenefitsQuery; tokio::task_local! { static ID: u8; }",
    true
)]
#[case::outbound_imports_inbound(
    "outbound/upstream/benefits_repository.rs",
    "use crate::inbound::http; fn thing() { let _ = 1; }",
    false
)]
#[case::outbound_imports_actix(
    "outbound/upstream/http_gateway.rs",
    "use actix_web::HttpResponse; fn thing() {}",
    false
)]
#[case::outbound_uses_http_client(
    "outbound/upstream/http_gateway.rs",
    "use crate::domain::ports::UpstreamGateway; fn build() { let _ = reqwest::Client::builder(); }",
    true
)]
#[case::middleware_uses_domain(
    "middleware/trace.rs",
    "use crate::domain::TraceId; fn call() { let _ = TraceId::generate(); }",
    true
)]
#[case::middleware_imports_outbound(
    "middleware/trace.rs",
    "use crate::outbound::upstream; fn call() {}",
    false
)]
#[case::local_variable_named_like_module(
    "outbound/upstream/http_gateway.rs",
    "fn probe(server: &str) { let _ = server.len(); }",
    true
)]
fn detects_boundary_violations(
    lint_single: LintSingle,
    #[case] file: &str,
    #[case] contents: &str,
    #[case] ok: bool,
) {
    let result = lint_single.lint(file, contents);
    assert_eq!(result.is_ok(), ok, "result: {result:?}");
}

#[rstest]
fn reports_each_rule_once_per_file(lint_single: LintSingle) {
    let result = lint_single.lint(
        "domain/benefit.rs",
        "use actix_web::HttpResponse; fn a() { let _ = actix_web::HttpResponse::Ok(); }",
    );

    let Err(ArchitectureLintError::Violations(violations)) = result else {
        panic!("expected violations, got {result:?}");
    };
    assert_eq!(
        violations,
        vec![Violation {
            file: Utf8PathBuf::from("domain/benefit.rs"),
            message: "domain module must not depend on external crate `actix_web`".to_owned(),
        }]
    );
}

#[rstest]
#[case::bootstrap("server/mod.rs")]
#[case::root("lib.rs")]
fn files_outside_layers_are_rejected(lint_single: LintSingle, #[case] file: &str) {
    let result = lint_single.lint(file, "fn main() {}");
    assert!(matches!(result, Err(ArchitectureLintError::Parse { .. })));
}

#[rstest]
fn unparsable_source_is_reported(lint_single: LintSingle) {
    let result = lint_single.lint("domain/benefit.rs", "fn broken( {");
    assert!(matches!(result, Err(ArchitectureLintError::Parse { .. })));
}
