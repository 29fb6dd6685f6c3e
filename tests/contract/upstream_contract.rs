use std::sync::Arc;

use cambio_core::{
    BanxicoAdapter, ExchangeRateApiAdapter, FixtureHttpClient, HttpError, HttpResponse,
    ObservationDate, ProviderId, RateSnapshotSource, SectionError, SeriesId, SeriesRequest,
    SeriesSource, MAX_TIMEOUT_MS,
};

const BANXICO_URL: &str = "https://banxico.test/series";
const RATES_URL: &str = "https://rates.test/v6";

/// One way an upstream can misbehave.
#[derive(Clone)]
struct FailureCase {
    label: &'static str,
    client: fn() -> FixtureHttpClient,
}

fn failure_cases() -> Vec<FailureCase> {
    vec![
        FailureCase {
            label: "server error",
            client: || FixtureHttpClient::new().respond(".test", HttpResponse::new(500, "boom")),
        },
        FailureCase {
            label: "not found",
            client: FixtureHttpClient::new,
        },
        FailureCase {
            label: "transport timeout",
            client: || FixtureHttpClient::new().fail(".test", HttpError::timeout("timed out")),
        },
        FailureCase {
            label: "malformed body",
            client: || FixtureHttpClient::new().respond(".test", HttpResponse::ok_json("<html>")),
        },
        FailureCase {
            label: "empty object",
            client: || FixtureHttpClient::new().respond(".test", HttpResponse::ok_json("{}")),
        },
    ]
}

fn series_request() -> SeriesRequest {
    SeriesRequest::latest(vec![SeriesId::parse("SF43718").expect("valid id")])
        .expect("valid request")
}

fn banxico(client: Arc<FixtureHttpClient>) -> BanxicoAdapter {
    BanxicoAdapter::new(client, Some(String::from("bmx-token"))).with_base_url(BANXICO_URL)
}

fn exchangerate(client: Arc<FixtureHttpClient>) -> ExchangeRateApiAdapter {
    ExchangeRateApiAdapter::new(client, Some(String::from("rates-key"))).with_base_url(RATES_URL)
}

fn assert_unavailable(result_provider: ProviderId, error: &SectionError, label: &str) {
    match error {
        SectionError::UpstreamUnavailable { provider, .. } => {
            assert_eq!(*provider, result_provider, "case '{label}': provider");
        }
        other => panic!("case '{label}': expected upstream unavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn central_bank_failures_surface_as_unavailable() {
    for case in failure_cases() {
        let adapter = banxico(Arc::new((case.client)()));
        let error = adapter
            .fetch_series(series_request())
            .await
            .expect_err(case.label);
        assert_unavailable(ProviderId::Banxico, &error, case.label);
    }
}

#[tokio::test]
async fn rate_api_failures_surface_as_unavailable() {
    for case in failure_cases() {
        let adapter = exchangerate(Arc::new((case.client)()));
        let error = adapter.latest().await.expect_err(case.label);
        assert_unavailable(ProviderId::ExchangeRateApi, &error, case.label);
    }
}

#[tokio::test]
async fn rate_api_error_result_names_the_error_type() {
    let client = Arc::new(FixtureHttpClient::new().respond(
        "/latest/USD",
        HttpResponse::ok_json(r#"{"result":"error","error-type":"invalid-key"}"#),
    ));
    let error = exchangerate(client).latest().await.expect_err("must fail");

    assert_unavailable(ProviderId::ExchangeRateApi, &error, "error result");
    assert!(error.to_string().contains("invalid-key"));
}

#[tokio::test]
async fn adapters_report_their_provider_ids() {
    let client = Arc::new(FixtureHttpClient::new());
    assert_eq!(banxico(client.clone()).id(), ProviderId::Banxico);
    assert_eq!(exchangerate(client).id(), ProviderId::ExchangeRateApi);
}

#[tokio::test]
async fn every_outbound_call_carries_a_bounded_timeout() {
    let client = Arc::new(
        FixtureHttpClient::new()
            .respond("/datos/", HttpResponse::ok_json(r#"{"bmx":{"series":[]}}"#))
            .respond(
                "/USD",
                HttpResponse::ok_json(r#"{"result":"success","conversion_rates":{"MXN":18.2}}"#),
            ),
    );
    let date = ObservationDate::parse("2026-10-17").expect("valid date");

    banxico(client.clone())
        .with_timeout_ms(60_000)
        .fetch_series(series_request())
        .await
        .expect("series");
    let rates = exchangerate(client.clone());
    rates.latest().await.expect("latest");
    rates.on_date(date).await.expect("history");

    let seen = client.requests();
    assert_eq!(seen.len(), 3);
    for request in &seen {
        assert!(request.timeout_ms > 0 && request.timeout_ms <= MAX_TIMEOUT_MS);
    }
    assert!(seen[2].url.ends_with("/history/USD/2026/10/17"));
}

#[tokio::test]
async fn rate_api_key_is_part_of_the_path() {
    let client = Arc::new(FixtureHttpClient::new().respond(
        "/latest/USD",
        HttpResponse::ok_json(r#"{"result":"success","conversion_rates":{"BRL":5.45}}"#),
    ));
    let snapshot = exchangerate(client.clone()).latest().await.expect("latest");

    assert_eq!(snapshot.get("BRL"), Some(&5.45));
    assert_eq!(client.requests()[0].url, format!("{RATES_URL}/rates-key/latest/USD"));
}

#[tokio::test]
async fn central_bank_keeps_series_order_and_raw_values() {
    let client = Arc::new(FixtureHttpClient::new().respond(
        "/datos/oportuno",
        HttpResponse::ok_json(
            r#"{"bmx":{"series":[
                {"idSerie":"SF46410","datos":[{"fecha":"17/10/2026","dato":"21.5012"}]},
                {"idSerie":"SF43718","datos":[{"fecha":"17/10/2026","dato":"N/E"}]}
            ]}}"#,
        ),
    ));
    let blocks = banxico(client)
        .fetch_series(series_request())
        .await
        .expect("series");

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].id, "SF46410");
    assert_eq!(blocks[1].observations[0].value, "N/E");
    assert!(blocks[1].observations[0].is_sentinel());
}
