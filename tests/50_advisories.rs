mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::{id_of, TestServer};

#[tokio::test]
async fn global_advisories_are_public() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.user("Extension Officer", "officer@example.com").await?;

    let (status, body) = server
        .post(
            "/api/advisories",
            Some(&token),
            json!({"title": "Fall armyworm", "category": "pest", "description": "Scout maize weekly"}),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["severity"], "medium");
    assert_eq!(body["data"]["isGlobal"], true);
    let id = id_of(&body)?;

    let (status, body) = server.get("/api/advisories", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (status, body) = server.get("/api/advisories/category/pest", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], id);

    let (_, body) = server.get("/api/advisories/category/weather", None).await?;
    assert_eq!(body["data"], json!([]));

    let (status, _) = server.get("/api/advisories/category/volcano", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server.get(&format!("/api/advisories/{}", id), None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn private_advisory_visibility() -> Result<()> {
    let server = TestServer::spawn().await?;
    let author = server.user("Amara", "amara@example.com").await?;
    let other = server.user("Baraka", "baraka@example.com").await?;

    let (_, body) = server
        .post(
            "/api/advisories",
            Some(&author),
            json!({"title": "My notes", "category": "general", "description": "Private", "isGlobal": false}),
        )
        .await?;
    let id = id_of(&body)?;
    let path = format!("/api/advisories/{}", id);

    let (status, _) = server.get(&path, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = server.get(&path, Some(&other)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = server.get(&path, Some(&author)).await?;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = server.get("/api/advisories", None).await?;
    assert_eq!(body["data"], json!([]));

    let (_, body) = server.get("/api/advisories/mine", Some(&author)).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn only_the_creator_can_modify() -> Result<()> {
    let server = TestServer::spawn().await?;
    let author = server.user("Amara", "amara@example.com").await?;
    let other = server.user("Baraka", "baraka@example.com").await?;

    let (_, body) = server
        .post(
            "/api/advisories",
            Some(&author),
            json!({"title": "Heavy rain", "category": "weather", "description": "Clear drains"}),
        )
        .await?;
    let path = format!("/api/advisories/{}", id_of(&body)?);

    let (status, _) = server.put(&path, Some(&other), json!({"severity": "high"})).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = server.delete(&path, Some(&other)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = server.post("/api/advisories", None, json!({"title": "x"})).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = server.put(&path, Some(&author), json!({"severity": "high"})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["severity"], "high");
    assert_eq!(body["data"]["title"], "Heavy rain");

    let (status, _) = server.delete(&path, Some(&author)).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.get(&path, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
