use crate::fixtures::test_app::{ROOT_ADMIN_EMAIL, TestApp};
use serde_json::Value;

#[tokio::test]
async fn fresh_login_creates_member() {
    let Some(app) = TestApp::spawn().await else { return };

    let token = app.identity_token("uid-new", "new@x.com", Some("New Person"));
    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({ "id_token": token }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["role"], "member");
    assert_eq!(json["user"]["email"], "new@x.com");
    assert_eq!(json["user"]["display_name"], "New Person");
    assert!(json["user"]["lead"].is_null());
}

#[tokio::test]
async fn root_admin_email_provisions_as_admin() {
    let Some(app) = TestApp::spawn().await else { return };

    let admin = app.seed_root_admin().await;
    assert_eq!(admin.email, ROOT_ADMIN_EMAIL);

    let resp = app.auth_get("/api/auth/me", &admin.token).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["role"], "admin");
}

#[tokio::test]
async fn placeholder_links_on_first_login_keeping_role() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.seed_root_admin().await;

    // Pre-provision an advisor who has never logged in.
    let resp = app
        .auth_post("/api/admin/users/manual", &admin.token)
        .json(&serde_json::json!({
            "email": "advisor@x.com",
            "display_name": "Dr. A",
            "role": "advisor",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    // First login binds the external subject and keeps the role.
    let advisor = app
        .login_user("uid-advisor", "advisor@x.com", Some("Dr. A"))
        .await;

    let resp = app.auth_get("/api/auth/me", &advisor.token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["role"], "advisor");
    assert_eq!(json["display_name"], "Dr. A");
}

#[tokio::test]
async fn root_admin_role_self_heals_on_login() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.seed_root_admin().await;

    // Demote behind the API's back; the guard blocks the front door.
    app.db
        .collection::<bson::Document>("users")
        .update_one(
            bson::doc! { "email": ROOT_ADMIN_EMAIL },
            bson::doc! { "$set": { "role": "member" } },
        )
        .await
        .unwrap();

    let relogged = app
        .login_user("uid-root", ROOT_ADMIN_EMAIL, Some("Root Admin"))
        .await;
    assert_eq!(relogged.id, admin.id);

    let resp = app.auth_get("/api/auth/me", &relogged.token).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["role"], "admin");
}

#[tokio::test]
async fn display_name_backfills_on_later_login() {
    let Some(app) = TestApp::spawn().await else { return };

    app.login_user("uid-bf", "bf@x.com", None).await;
    let user = app.login_user("uid-bf", "bf@x.com", Some("Named Now")).await;

    let resp = app.auth_get("/api/auth/me", &user.token).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["display_name"], "Named Now");
}

#[tokio::test]
async fn login_without_email_is_rejected() {
    let Some(app) = TestApp::spawn().await else { return };

    let token = app.identity_token_without_email("uid-noemail");
    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({ "id_token": token }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let Some(app) = TestApp::spawn().await else { return };

    let resp = app.client.get(app.url("/api/auth/me")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 401);

    let resp = app
        .client
        .get(app.url("/api/auth/me"))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}
