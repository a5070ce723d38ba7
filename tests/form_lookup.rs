//! End-to-end behavior of the zip code field against a mock lookup service.

use std::time::Duration;

use cep_form::{AddressForm, AddressResolver, ResolverConfig, apply_mask};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver_for(uri: &str) -> AddressResolver {
    AddressResolver::new(&ResolverConfig::default().with_service_url(uri)).unwrap()
}

fn paulista_body() -> serde_json::Value {
    json!({
        "logradouro": "Av. Paulista",
        "bairro": "Bela Vista",
        "localidade": "São Paulo",
        "uf": "SP",
        "erro": false
    })
}

fn rio_branco_body() -> serde_json::Value {
    json!({
        "logradouro": "Avenida Rio Branco",
        "bairro": "Centro",
        "localidade": "Rio de Janeiro",
        "uf": "RJ"
    })
}

async fn mount(server: &MockServer, code: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/ws/{}/json/", code)))
        .respond_with(template)
        .mount(server)
        .await;
}

#[test]
fn test_mask_passes_short_digit_strings() {
    let digits = "01310100";
    for len in 0..digits.len() {
        let input = &digits[..len];
        assert_eq!(apply_mask(input), input);
    }
    assert_eq!(apply_mask(digits), "01310-100");
}

#[tokio::test]
async fn test_successful_lookup_fills_form() {
    let server = MockServer::start().await;
    mount(
        &server,
        "01310100",
        ResponseTemplate::new(200).set_body_json(paulista_body()),
    )
    .await;

    let resolver = resolver_for(&server.uri());
    resolver.set_address_number("1578");

    let handle = resolver.on_zip_code_changed("01310100").unwrap();
    handle.await.unwrap();

    let form = resolver.snapshot();
    assert_eq!(form.zip_code, "01310-100");
    assert_eq!(form.street_address, "Av. Paulista");
    assert_eq!(form.district, "Bela Vista");
    assert_eq!(form.city, "São Paulo");
    assert_eq!(form.state, "SP");
    assert_eq!(form.address_number, "1578");
    assert!(!form.is_loading);
}

#[tokio::test]
async fn test_not_found_clears_address_fields() {
    let server = MockServer::start().await;
    mount(
        &server,
        "99999999",
        ResponseTemplate::new(200).set_body_json(json!({"erro": true})),
    )
    .await;

    let resolver = resolver_for(&server.uri());
    resolver.set_street_address("Rua Antiga");
    resolver.set_district("Bairro");
    resolver.set_city("Cidade");
    resolver.set_state("UF");
    resolver.set_complement("Fundos");
    resolver.set_address_number("42");

    resolver.on_zip_code_changed("99999999").unwrap().await.unwrap();

    assert_eq!(
        resolver.snapshot(),
        AddressForm {
            zip_code: "99999-999".to_string(),
            address_number: "42".to_string(),
            ..Default::default()
        }
    );
}

#[tokio::test]
async fn test_transport_failure_clears_address_fields() {
    // Nothing listens on port 1, so the connection is refused.
    let resolver = resolver_for("http://127.0.0.1:1");
    resolver.set_street_address("Rua Antiga");
    resolver.set_complement("Fundos");
    resolver.set_address_number("42");

    let handle = resolver.on_zip_code_changed("01310100").unwrap();
    // The task finishes normally: nothing escapes the resolver.
    assert!(handle.await.is_ok());

    let form = resolver.snapshot();
    assert_eq!(form.street_address, "");
    assert_eq!(form.complement, "");
    assert_eq!(form.district, "");
    assert_eq!(form.city, "");
    assert_eq!(form.state, "");
    assert_eq!(form.address_number, "42");
    assert_eq!(form.zip_code, "01310-100");
    assert!(!form.is_loading);
}

#[tokio::test]
async fn test_server_error_is_a_failure() {
    let server = MockServer::start().await;
    mount(
        &server,
        "01310100",
        ResponseTemplate::new(500).set_body_string("Internal Server Error"),
    )
    .await;

    let resolver = resolver_for(&server.uri());
    resolver.set_city("Cidade");
    resolver.resolve("01310-100").await;

    assert_eq!(resolver.snapshot().city, "");
    assert!(!resolver.is_loading());
}

#[tokio::test]
async fn test_one_lookup_per_completing_edit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ws/01310100/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paulista_body()))
        .expect(2)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server.uri());

    // Typing digit by digit only fires on the completing keystroke.
    let mut fired = Vec::new();
    for prefix in ["0", "01", "013", "0131", "01310", "013101", "0131010", "01310100"] {
        if let Some(handle) = resolver.on_zip_code_changed(prefix) {
            fired.push(handle);
        }
    }
    assert_eq!(fired.len(), 1);

    // Re-submitting the displayed value is not an edit.
    assert!(resolver.on_zip_code_changed("01310-100").is_none());
    assert!(resolver.on_zip_code_changed("01310100").is_none());

    // Deleting a digit and retyping it completes the code again.
    assert!(resolver.on_zip_code_changed("01310-10").is_none());
    fired.push(resolver.on_zip_code_changed("01310-100").unwrap());

    for handle in fired {
        handle.await.unwrap();
    }
    assert_eq!(resolver.snapshot().street_address, "Av. Paulista");
}

#[tokio::test]
async fn test_repeated_resolve_is_idempotent() {
    let server = MockServer::start().await;
    mount(
        &server,
        "01310100",
        ResponseTemplate::new(200).set_body_json(paulista_body()),
    )
    .await;

    let resolver = resolver_for(&server.uri());
    resolver.on_zip_code_changed("01310100").unwrap().await.unwrap();
    let once = resolver.snapshot();

    futures::join!(resolver.resolve("01310-100"), resolver.resolve("01310-100"));
    assert_eq!(resolver.snapshot(), once);
}

#[tokio::test]
async fn test_late_response_overwrites_newer_code() {
    let server = MockServer::start().await;
    mount(
        &server,
        "01310100",
        ResponseTemplate::new(200)
            .set_body_json(paulista_body())
            .set_delay(Duration::from_millis(300)),
    )
    .await;
    mount(
        &server,
        "20040020",
        ResponseTemplate::new(200).set_body_json(rio_branco_body()),
    )
    .await;

    let resolver = resolver_for(&server.uri());
    let slow = resolver.on_zip_code_changed("01310100").unwrap();
    assert!(resolver.on_zip_code_changed("").is_none());
    let fast = resolver.on_zip_code_changed("20040020").unwrap();

    fast.await.unwrap();
    let form = resolver.snapshot();
    assert_eq!(form.city, "Rio de Janeiro");
    // The first lookup to finish lowers the flag even with another in flight.
    assert!(!form.is_loading);

    slow.await.unwrap();
    let form = resolver.snapshot();
    assert_eq!(form.zip_code, "20040-020");
    assert_eq!(form.city, "São Paulo");
}

#[tokio::test]
async fn test_discard_stale_responses() {
    let server = MockServer::start().await;
    mount(
        &server,
        "01310100",
        ResponseTemplate::new(200)
            .set_body_json(paulista_body())
            .set_delay(Duration::from_millis(300)),
    )
    .await;
    mount(
        &server,
        "20040020",
        ResponseTemplate::new(200)
            .set_body_json(rio_branco_body())
            .set_delay(Duration::from_millis(50)),
    )
    .await;

    let config = ResolverConfig::default()
        .with_service_url(server.uri())
        .with_discard_stale_responses(true);
    let resolver = AddressResolver::new(&config).unwrap();

    let slow = resolver.on_zip_code_changed("01310100").unwrap();
    resolver.on_zip_code_changed("");
    let fast = resolver.on_zip_code_changed("20040020").unwrap();

    slow.await.unwrap();
    fast.await.unwrap();

    let form = resolver.snapshot();
    assert_eq!(form.zip_code, "20040-020");
    assert_eq!(form.street_address, "Avenida Rio Branco");
    assert_eq!(form.city, "Rio de Janeiro");
    assert!(!form.is_loading);
}
