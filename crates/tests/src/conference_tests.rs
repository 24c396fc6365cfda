use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn lead_creates_and_lists_own_conferences() {
    let Some(app) = TestApp::spawn().await else { return };
    let lab = app.seed_lab("confown").await;

    let resp = app
        .auth_post("/api/lead/conferences", &lab.lead.token)
        .json(&serde_json::json!({
            "title": "ICRA 2026",
            "date": "2026-06-01",
            "author_ids": [lab.members[0].id, lab.members[1].id],
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "submitted");
    assert_eq!(json["lead"], lab.lead.id);
    assert_eq!(json["authors"].as_array().unwrap().len(), 2);
    // Authors come back embedded with email.
    assert!(json["authors"][0]["email"].as_str().unwrap().contains("@lab.test"));

    let resp = app.auth_get("/api/lead/conferences", &lab.lead.token).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn authors_must_belong_to_the_leads_team() {
    let Some(app) = TestApp::spawn().await else { return };
    let lab = app.seed_lab("confauth").await;
    let stranger = app.login_user("uid-stranger", "stranger@x.com", None).await;

    let resp = app
        .auth_post("/api/lead/conferences", &lab.lead.token)
        .json(&serde_json::json!({
            "title": "CoRL 2026",
            "author_ids": [stranger.id],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn lead_cannot_touch_a_foreign_conference() {
    let Some(app) = TestApp::spawn().await else { return };
    let lab = app.seed_lab("conffor").await;
    let other_lead = app
        .seed_user_with_role(&lab.admin.token, "uid-lead2", "lead2@lab.test", "lead")
        .await;

    let resp = app
        .auth_post("/api/lead/conferences", &lab.lead.token)
        .json(&serde_json::json!({ "title": "IROS 2026" }))
        .send()
        .await
        .unwrap();
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let resp = app
        .auth_put(&format!("/api/lead/conferences/{id}"), &other_lead.token)
        .json(&serde_json::json!({ "status": "published" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    // Record unchanged.
    let resp = app.auth_get("/api/lead/conferences", &lab.lead.token).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json[0]["status"], "submitted");
}

#[tokio::test]
async fn partial_update_touches_only_supplied_fields() {
    let Some(app) = TestApp::spawn().await else { return };
    let lab = app.seed_lab("confpatch").await;

    let resp = app
        .auth_post("/api/lead/conferences", &lab.lead.token)
        .json(&serde_json::json!({
            "title": "HRI 2026",
            "date": "2026-03-10",
            "link": "https://humanrobotinteraction.org",
        }))
        .send()
        .await
        .unwrap();
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let resp = app
        .auth_put(&format!("/api/lead/conferences/{id}"), &lab.lead.token)
        .json(&serde_json::json!({ "status": "accepted" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "accepted");
    assert_eq!(json["title"], "HRI 2026");
    assert_eq!(json["date"], "2026-03-10");
    assert_eq!(json["link"], "https://humanrobotinteraction.org");
}

#[tokio::test]
async fn status_moves_freely_between_states() {
    let Some(app) = TestApp::spawn().await else { return };
    let lab = app.seed_lab("confany").await;

    let resp = app
        .auth_post("/api/lead/conferences", &lab.lead.token)
        .json(&serde_json::json!({ "title": "Backtrack" }))
        .send()
        .await
        .unwrap();
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    // No enforced ordering: forward to published, back to submitted.
    for status in ["published", "submitted", "presented"] {
        let resp = app
            .auth_put(&format!("/api/lead/conferences/{id}"), &lab.lead.token)
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["status"], status);
    }
}

#[tokio::test]
async fn admin_creates_on_behalf_and_updates_any() {
    let Some(app) = TestApp::spawn().await else { return };
    let lab = app.seed_lab("confadm").await;

    let resp = app
        .auth_post("/api/admin/conferences", &lab.admin.token)
        .json(&serde_json::json!({
            "lead_id": lab.lead.id,
            "title": "RSS 2026",
            "author_ids": [lab.members[0].id],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["lead"], lab.lead.id);
    let id = created["id"].as_str().unwrap();

    // The owning lead sees it.
    let resp = app.auth_get("/api/lead/conferences", &lab.lead.token).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    assert!(json.as_array().unwrap().iter().any(|c| c["id"] == id));

    // Admin updates it without owning it.
    let resp = app
        .auth_put(&format!("/api/admin/conferences/{id}"), &lab.admin.token)
        .json(&serde_json::json!({ "status": "accepted" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn deletion_is_admin_only() {
    let Some(app) = TestApp::spawn().await else { return };
    let lab = app.seed_lab("confdel").await;

    let resp = app
        .auth_post("/api/lead/conferences", &lab.lead.token)
        .json(&serde_json::json!({ "title": "Short-lived" }))
        .send()
        .await
        .unwrap();
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let resp = app
        .auth_delete(&format!("/api/admin/conferences/{id}"), &lab.lead.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    let resp = app
        .auth_delete(&format!("/api/admin/conferences/{id}"), &lab.admin.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);

    let resp = app.auth_get("/api/lead/conferences", &lab.lead.token).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn members_cannot_reach_lead_conference_routes() {
    let Some(app) = TestApp::spawn().await else { return };
    let lab = app.seed_lab("confmem").await;

    let resp = app
        .auth_get("/api/lead/conferences", &lab.members[0].token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}
