//! End-to-end flow tests over a scripted transport: the full
//! client → flow → render path without a network.

use std::sync::Arc;

use serde_json::json;

use app::flow::{FallbackProvider, FlowError, LiveProvider, SearchFlow, SearchState};
use app::render::render_stock;
use client::api::ApiClient;
use client::errors::ApiError;
use client::transport::mock::MockTransport;
use models::blood::{BloodType, LocationQuery, StockStatus};
use service::session::SessionStore;

const BASE: &str = "http://localhost:5000/api";

async fn client_fixture() -> (Arc<MockTransport>, Arc<ApiClient<MockTransport>>, std::path::PathBuf) {
    let path = std::env::temp_dir().join(format!("damu_flow_{}.json", uuid::Uuid::new_v4()));
    let session = SessionStore::open(&path).await.unwrap();
    let transport = Arc::new(MockTransport::new());
    let client = Arc::new(ApiClient::new(BASE, Arc::clone(&transport), session));
    (transport, client, path)
}

fn query(county: &str, constituency: &str, blood_type: Option<BloodType>) -> LocationQuery {
    LocationQuery {
        county: county.to_string(),
        constituency: constituency.to_string(),
        blood_type,
    }
}

#[tokio::test]
async fn validation_failure_issues_no_network_call() -> anyhow::Result<()> {
    let (transport, client, path) = client_fixture().await;
    let provider = FallbackProvider::new(Some(LiveProvider::new(client)));
    let mut flow = SearchFlow::new(provider);

    let err = flow
        .submit(&query("Nairobi City County", "", Some(BloodType::OPos)))
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::Validation(_)));
    assert!(transport.requests().is_empty());
    let _ = tokio::fs::remove_file(&path).await;
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_falls_back_to_synthetic_stock() -> anyhow::Result<()> {
    let (transport, client, path) = client_fixture().await;
    transport.push(Err(ApiError::Transport("connection refused".into())));

    let provider = FallbackProvider::new(Some(LiveProvider::new(client)));
    let mut flow = SearchFlow::new(provider);

    let hospitals = flow
        .submit(&query("Nairobi City County", "Westlands", Some(BloodType::OPos)))
        .await?;

    // one live attempt was made before falling back
    assert_eq!(transport.requests().len(), 1);
    assert_eq!(flow.state(), SearchState::Displaying);

    // synthetic scenario: exactly one O+ entry per hospital, counts in 1..=20
    assert_eq!(hospitals.len(), 3);
    for hospital in &hospitals {
        assert_eq!(hospital.stock.len(), 1);
        let entry = &hospital.stock[0];
        assert_eq!(entry.blood_type, BloodType::OPos);
        assert!((1..=20).contains(&entry.units_available));
        assert_eq!(entry.status, StockStatus::from_units(entry.units_available));
    }
    let _ = tokio::fs::remove_file(&path).await;
    Ok(())
}

#[tokio::test]
async fn live_results_flow_through_to_rendering() -> anyhow::Result<()> {
    let (transport, client, path) = client_fixture().await;
    transport.push_ok(
        200,
        json!({
            "success": true,
            "data": [{
                "name": "Kenyatta National Hospital",
                "contact_phone": "+254 20 271 3344",
                "contact_email": "knh@health.go.ke",
                "stock": [
                    { "blood_type": "O+", "units_available": 3 },
                    { "blood_type": "A+", "units_available": 15 }
                ]
            }]
        }),
    );

    let provider = FallbackProvider::new(Some(LiveProvider::new(client)));
    let mut flow = SearchFlow::new(provider);
    let hospitals = flow
        .submit(&query("Nairobi City County", "Westlands", None))
        .await?;

    let text = render_stock(&hospitals);
    assert!(text.contains("Kenyatta National Hospital"));
    assert!(text.contains("[Critical]"));
    assert!(text.contains("[Adequate]"));

    let url = &transport.requests()[0].url;
    assert!(url.contains("county=Nairobi+City+County"));
    assert!(url.contains("constituency=Westlands"));
    let _ = tokio::fs::remove_file(&path).await;
    Ok(())
}

#[tokio::test]
async fn request_level_errors_are_not_masked_by_the_fallback() -> anyhow::Result<()> {
    let (transport, client, path) = client_fixture().await;
    transport.push_ok(500, json!({ "error": "database unavailable" }));

    let provider = FallbackProvider::new(Some(LiveProvider::new(client)));
    let mut flow = SearchFlow::new(provider);
    let err = flow
        .submit(&query("Kiambu County", "Ruiru", None))
        .await
        .unwrap_err();

    assert_eq!(flow.state(), SearchState::Failed);
    assert!(err.to_string().contains("database unavailable"));
    let _ = tokio::fs::remove_file(&path).await;
    Ok(())
}
