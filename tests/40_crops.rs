mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::{id_of, TestServer};

#[tokio::test]
async fn crop_defaults_and_update() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.user("Amara", "amara@example.com").await?;
    let farm_id = server
        .create_farm(&token, json!({"farmName": "North", "totalArea": 5}))
        .await?;

    let (status, body) = server
        .post(
            "/api/crops",
            Some(&token),
            json!({"farmId": farm_id, "cropName": "Maize", "plantingDate": "2024-03-01", "area": 2.5}),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "growing");
    assert_eq!(body["data"]["unit"], "kg");
    let crop_id = id_of(&body)?;

    let (status, body) = server
        .put(
            &format!("/api/crops/{}", crop_id),
            Some(&token),
            json!({"status": "harvested", "actualYield": 1200}),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "harvested");
    assert_eq!(body["data"]["cropName"], "Maize");
    Ok(())
}

#[tokio::test]
async fn crops_by_farm_checks_farm_ownership() -> Result<()> {
    let server = TestServer::spawn().await?;
    let owner = server.user("Amara", "amara@example.com").await?;
    let other = server.user("Baraka", "baraka@example.com").await?;
    let north = server
        .create_farm(&owner, json!({"farmName": "North", "totalArea": 5}))
        .await?;
    let south = server
        .create_farm(&owner, json!({"farmName": "South", "totalArea": 3}))
        .await?;

    for (farm, name) in [(&north, "Maize"), (&north, "Beans"), (&south, "Kale")] {
        let (status, _) = server
            .post(
                "/api/crops",
                Some(&owner),
                json!({"farmId": farm, "cropName": name, "plantingDate": "2024-03-01", "area": 1}),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = server
        .get(&format!("/api/crops/farm/{}", north), Some(&owner))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let (status, _) = server
        .get(&format!("/api/crops/farm/{}", north), Some(&other))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = server
        .post(
            "/api/crops",
            Some(&other),
            json!({"farmId": north, "cropName": "Stolen", "plantingDate": "2024-03-01", "area": 1}),
        )
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = server.get("/api/crops", Some(&owner)).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn crop_validation() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.user("Amara", "amara@example.com").await?;

    let (status, body) = server
        .post("/api/crops", Some(&token), json!({"cropName": "Maize"}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap_or_default();
    assert!(message.contains("farmId"), "{}", message);
    assert!(message.contains("plantingDate"), "{}", message);
    Ok(())
}
