mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

fn names(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|s| s["helper"]["displayName"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_suggestions_rank_by_shared_tags() {
    let app = TestApp::new().await;
    let admin = app.superadmin().await;
    let org = app.create_org(&admin, "Org").await;
    let client = app.create_client(&admin, &org, "Client", &["A", "B"]).await;
    app.create_user(&admin, &org, "h1@o.org", "serviceprovider", "H1", &["a"]).await;
    app.create_user(&admin, &org, "h2@o.org", "serviceprovider", "H2", &[" A ", "b"]).await;
    app.create_user(&admin, &org, "h3@o.org", "serviceprovider", "H3", &["C"]).await;

    let (status, list) = app
        .get(&format!("/api/orgs/{}/clients/{}/suggestions", org, client), &admin)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&list), vec!["H2", "H1"]);
    assert_eq!(list[0]["score"], 2);
    assert_eq!(list[1]["score"], 1);
    assert!(list[0]["connectionStatus"].is_null());
}

#[tokio::test]
async fn test_inactive_helpers_are_not_suggested() {
    let app = TestApp::new().await;
    let admin = app.superadmin().await;
    let org = app.create_org(&admin, "Org").await;
    let client = app.create_client(&admin, &org, "Client", &["Housing"]).await;
    let helper = app.create_user(&admin, &org, "h@o.org", "serviceprovider", "Helper", &["Housing"]).await;

    let (status, body) = app
        .patch(&format!("/api/orgs/{}/helpers/{}", org, helper), &admin, json!({ "active": false }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);

    let (_, list) = app.get(&format!("/api/orgs/{}/clients/{}/suggestions", org, client), &admin).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_connected_helpers_come_first_even_without_shared_tags() {
    let app = TestApp::new().await;
    let admin = app.superadmin().await;
    let org = app.create_org(&admin, "Org").await;
    let client = app.create_client(&admin, &org, "Client", &[]).await;
    let helper = app.create_user(&admin, &org, "h@o.org", "serviceprovider", "Connected", &["Cooking"]).await;
    app.create_user(&admin, &org, "x@o.org", "serviceprovider", "Unrelated", &["Housing"]).await;
    let conn = app.create_connection(&admin, &org, &client, &helper).await;

    let (_, list) = app.get(&format!("/api/orgs/{}/clients/{}/suggestions", org, client), &admin).await;
    assert_eq!(names(&list), vec!["Connected"]);
    assert_eq!(list[0]["score"], 0);
    assert_eq!(list[0]["connectionStatus"], "pending");
    assert_eq!(list[0]["connectionId"], conn.as_str());
}

#[tokio::test]
async fn test_connected_entry_carries_newest_connection_status() {
    let app = TestApp::new().await;
    let admin = app.superadmin().await;
    let org = app.create_org(&admin, "Org").await;
    let client = app.create_client(&admin, &org, "Client", &["Housing"]).await;
    let helper = app.create_user(&admin, &org, "h@o.org", "serviceprovider", "Helper", &["Housing"]).await;
    let helper_token = app.login("h@o.org").await;

    let first = app.create_connection(&admin, &org, &client, &helper).await;
    app.patch(&format!("/api/connections/{}/decline", first), &helper_token, json!({})).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = app.create_connection(&admin, &org, &client, &helper).await;

    let (_, list) = app.get(&format!("/api/orgs/{}/clients/{}/suggestions", org, client), &admin).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["connectionId"], second.as_str());
    assert_eq!(list[0]["connectionStatus"], "pending");
}

#[tokio::test]
async fn test_helpers_cannot_see_suggestions() {
    let app = TestApp::new().await;
    let admin = app.superadmin().await;
    let org = app.create_org(&admin, "Org").await;
    let client = app.create_client(&admin, &org, "Client", &["Housing"]).await;
    app.create_user(&admin, &org, "h@o.org", "serviceprovider", "Helper", &["Housing"]).await;
    let helper = app.login("h@o.org").await;

    let (status, _) = app.get(&format!("/api/orgs/{}/clients/{}/suggestions", org, client), &helper).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_pausing_a_helper_only_affects_that_org() {
    let app = TestApp::with_demo_data().await;
    let admin = app.superadmin().await;
    let test_admin = app.login("orgadmin@testorg.org").await;

    let (_, orgs) = app.get("/api/orgs", &admin).await;
    let org_id = |name: &str| {
        orgs.as_array()
            .unwrap()
            .iter()
            .find(|o| o["name"] == name)
            .unwrap()["id"]
            .as_str()
            .unwrap()
            .to_string()
    };
    let test_org = org_id("TestOrg");
    let other_org = org_id("OtherOrg");

    let (_, members) = app.get(&format!("/api/orgs/{}/users", test_org), &test_admin).await;
    let sarah = members
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["displayName"] == "Sarah Martinez")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (_, clients) = app.get(&format!("/api/orgs/{}/clients", test_org), &test_admin).await;
    let patricia = clients
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "Patricia Davis")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();
    let test_uri = format!("/api/orgs/{}/clients/{}/suggestions", test_org, patricia);

    app.create_user(&admin, &other_org, "admin@otherorg.org", "orgadmin", "Other Admin", &[]).await;
    let other_admin = app.login("admin@otherorg.org").await;
    let other_client = app.create_client(&other_admin, &other_org, "Other Client", &["Housing"]).await;
    let other_uri = format!("/api/orgs/{}/clients/{}/suggestions", other_org, other_client);

    let (_, before) = app.get(&test_uri, &test_admin).await;
    assert_eq!(names(&before), vec!["Sarah Martinez", "James Wilson"]);
    let (_, before) = app.get(&other_uri, &other_admin).await;
    assert_eq!(names(&before), vec!["Sarah Martinez"]);

    let (status, body) = app
        .patch(&format!("/api/orgs/{}/helpers/{}", other_org, sarah), &other_admin, json!({ "active": false }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);

    let (_, after) = app.get(&other_uri, &other_admin).await;
    assert!(after.as_array().unwrap().is_empty());

    let (_, after) = app.get(&test_uri, &test_admin).await;
    assert_eq!(names(&after), vec!["Sarah Martinez", "James Wilson"]);

    let (_, members) = app.get(&format!("/api/orgs/{}/users", test_org), &test_admin).await;
    let sarah_in_test_org = members
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["id"] == sarah.as_str())
        .unwrap();
    assert_eq!(sarah_in_test_org["active"], true);
}
