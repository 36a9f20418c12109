mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::{id_of, TestServer};

#[tokio::test]
async fn activity_on_own_farm_with_partial_update() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.user("Amara", "amara@example.com").await?;
    let farm_id = server
        .create_farm(&token, json!({"farmName": "North", "totalArea": 5}))
        .await?;

    let (status, body) = server
        .post(
            "/api/activities",
            Some(&token),
            json!({"farmId": farm_id, "type": "irrigation", "date": "2024-06-01", "description": "Drip line"}),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    let activity_id = id_of(&body)?;
    let path = format!("/api/activities/{}", activity_id);

    let (status, body) = server.put(&path, Some(&token), json!({"notes": "2h run"})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["notes"], "2h run");
    assert_eq!(body["data"]["type"], "irrigation");
    assert_eq!(body["data"]["description"], "Drip line");
    assert_eq!(body["data"]["date"], "2024-06-01");

    let (status, _) = server.delete(&path, Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.delete(&path, Some(&token)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn activity_requires_an_owned_farm() -> Result<()> {
    let server = TestServer::spawn().await?;
    let owner = server.user("Amara", "amara@example.com").await?;
    let other = server.user("Baraka", "baraka@example.com").await?;
    let farm_id = server
        .create_farm(&owner, json!({"farmName": "North", "totalArea": 5}))
        .await?;

    let (status, _) = server
        .post(
            "/api/activities",
            Some(&other),
            json!({"farmId": farm_id, "type": "weeding", "date": "2024-06-01"}),
        )
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = server
        .post(
            "/api/activities",
            Some(&owner),
            json!({"farmId": "00000000-0000-4000-8000-000000000000", "type": "weeding", "date": "2024-06-01"}),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Farm not found");

    // Validation runs before the farm lookup.
    let (status, _) = server
        .post(
            "/api/activities",
            Some(&owner),
            json!({"farmId": "00000000-0000-4000-8000-000000000000"}),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn listing_is_scoped_and_filterable_by_farm() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.user("Amara", "amara@example.com").await?;
    let other = server.user("Baraka", "baraka@example.com").await?;
    let north = server
        .create_farm(&token, json!({"farmName": "North", "totalArea": 5}))
        .await?;
    let south = server
        .create_farm(&token, json!({"farmName": "South", "totalArea": 2}))
        .await?;

    for (farm, date) in [(&north, "2024-05-01"), (&north, "2024-07-01"), (&south, "2024-06-01")] {
        let (status, _) = server
            .post(
                "/api/activities",
                Some(&token),
                json!({"farmId": farm, "type": "sowing", "date": date}),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = server.get("/api/activities", Some(&token)).await?;
    let dates: Vec<&str> = body["data"]
        .as_array()
        .map(|a| a.iter().filter_map(|x| x["date"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(dates, vec!["2024-07-01", "2024-06-01", "2024-05-01"]);

    let (_, body) = server
        .get(&format!("/api/activities?farmId={}", north), Some(&token))
        .await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let (status, _) = server.get("/api/activities?farmId=bogus", Some(&token)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = server.get("/api/activities", Some(&other)).await?;
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn foreign_and_unknown_activity_writes() -> Result<()> {
    let server = TestServer::spawn().await?;
    let owner = server.user("Amara", "amara@example.com").await?;
    let other = server.user("Baraka", "baraka@example.com").await?;
    let farm_id = server
        .create_farm(&owner, json!({"farmName": "North", "totalArea": 5}))
        .await?;
    let (_, body) = server
        .post(
            "/api/activities",
            Some(&owner),
            json!({"farmId": farm_id, "type": "weeding", "date": "2024-06-01"}),
        )
        .await?;
    let path = format!("/api/activities/{}", id_of(&body)?);

    let (status, _) = server.put(&path, Some(&other), json!({"notes": "mine now"})).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = server.delete(&path, Some(&other)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let missing = "/api/activities/00000000-0000-4000-8000-000000000000";
    let (status, _) = server.put(missing, Some(&other), json!({"notes": "x"})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = server.delete(missing, Some(&other)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = server.get(&path, Some(&owner)).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["notes"].is_null());
    Ok(())
}

#[tokio::test]
async fn null_clears_notes_and_keeps_the_rest() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.user("Amara", "amara@example.com").await?;
    let farm_id = server
        .create_farm(&token, json!({"farmName": "North", "totalArea": 5}))
        .await?;
    let (_, body) = server
        .post(
            "/api/activities",
            Some(&token),
            json!({"farmId": farm_id, "type": "irrigation", "date": "2024-06-01", "notes": "n1"}),
        )
        .await?;
    let path = format!("/api/activities/{}", id_of(&body)?);

    let (status, body) = server.put(&path, Some(&token), json!({"notes": null})).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["notes"].is_null());
    assert_eq!(body["data"]["type"], "irrigation");

    let (_, body) = server.get(&path, Some(&token)).await?;
    assert!(body["data"]["notes"].is_null());
    Ok(())
}
