mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::TestServer;

#[tokio::test]
async fn summary_counts_only_the_callers_records() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.user("Amara", "amara@example.com").await?;
    let other = server.user("Baraka", "baraka@example.com").await?;

    let farm_id = server
        .create_farm(&token, json!({"farmName": "North", "totalArea": 4, "crop": "maize"}))
        .await?;
    server
        .create_farm(&other, json!({"farmName": "Elsewhere", "totalArea": 100}))
        .await?;

    for (kind, quantity) in [("harvesting", json!(800)), ("irrigation", json!(null))] {
        let (status, _) = server
            .post(
                "/api/activities",
                Some(&token),
                json!({"farmId": farm_id, "type": kind, "date": "2024-07-10", "quantity": quantity}),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = server.get("/api/analytics/summary", Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["farmCount"], 1);
    assert_eq!(data["totalArea"], 4.0);
    assert_eq!(data["activityCount"], 2);
    assert_eq!(data["activitiesByType"]["harvesting"], 1);
    assert_eq!(data["activityTimeline"][0]["month"], "2024-07");
    assert_eq!(data["yieldByCrop"][0]["crop"], "maize");
    assert_eq!(data["yieldByCrop"][0]["yieldPerHectare"], 200.0);

    let (status, _) = server.get("/api/analytics/summary", None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}
