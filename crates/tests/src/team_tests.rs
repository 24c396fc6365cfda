use crate::fixtures::test_app::TestApp;
use serde_json::Value;

fn group_for<'a>(groups: &'a Value, lead_id: &str) -> &'a Value {
    groups
        .as_array()
        .unwrap()
        .iter()
        .find(|g| g["lead"]["id"] == lead_id)
        .expect("lead missing from grouped view")
}

#[tokio::test]
async fn grouped_view_shows_every_lead_with_members() {
    let Some(app) = TestApp::spawn().await else { return };
    let lab = app.seed_lab("teamgrp").await;
    // A lead with nobody assigned still shows up.
    let empty_lead = app
        .seed_user_with_role(&lab.admin.token, "uid-eml", "empty-lead@lab.test", "lead")
        .await;

    let resp = app.auth_get("/api/admin/team", &lab.admin.token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();

    let full = group_for(&json, &lab.lead.id);
    assert_eq!(full["members"].as_array().unwrap().len(), 2);

    let empty = group_for(&json, &empty_lead.id);
    assert!(empty["members"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn reassignment_moves_the_member_between_groups() {
    let Some(app) = TestApp::spawn().await else { return };
    let lab = app.seed_lab("teammove").await;
    let lead_b = app
        .seed_user_with_role(&lab.admin.token, "uid-leadb", "lead-b@lab.test", "lead")
        .await;

    let resp = app
        .auth_post("/api/admin/team/assign", &lab.admin.token)
        .json(&serde_json::json!({
            "member_id": lab.members[0].id,
            "lead_id": lead_b.id,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app.auth_get("/api/admin/team", &lab.admin.token).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();

    let group_a = group_for(&json, &lab.lead.id);
    assert!(
        !group_a["members"]
            .as_array()
            .unwrap()
            .iter()
            .any(|m| m["id"] == lab.members[0].id)
    );
    let group_b = group_for(&json, &lead_b.id);
    assert!(
        group_b["members"]
            .as_array()
            .unwrap()
            .iter()
            .any(|m| m["id"] == lab.members[0].id)
    );
}

#[tokio::test]
async fn unassign_clears_the_lead_but_keeps_the_account() {
    let Some(app) = TestApp::spawn().await else { return };
    let lab = app.seed_lab("teamun").await;

    let resp = app
        .auth_post("/api/admin/team/unassign", &lab.admin.token)
        .json(&serde_json::json!({ "member_id": lab.members[0].id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert!(json["lead"].is_null());

    // Account still logs in fine.
    let resp = app.auth_get("/api/auth/me", &lab.members[0].token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn assignment_validates_both_roles() {
    let Some(app) = TestApp::spawn().await else { return };
    let lab = app.seed_lab("teamval").await;
    let advisor = app
        .seed_user_with_role(&lab.admin.token, "uid-adv", "adv@lab.test", "advisor")
        .await;

    // Target must actually be a member.
    let resp = app
        .auth_post("/api/admin/team/assign", &lab.admin.token)
        .json(&serde_json::json!({
            "member_id": advisor.id,
            "lead_id": lab.lead.id,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);

    // And the lead must be a lead.
    let resp = app
        .auth_post("/api/admin/team/assign", &lab.admin.token)
        .json(&serde_json::json!({
            "member_id": lab.members[0].id,
            "lead_id": lab.members[1].id,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);

    // Unknown ids surface as 404.
    let resp = app
        .auth_post("/api/admin/team/assign", &lab.admin.token)
        .json(&serde_json::json!({
            "member_id": bson::oid::ObjectId::new().to_hex(),
            "lead_id": lab.lead.id,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn lead_sees_their_own_team() {
    let Some(app) = TestApp::spawn().await else { return };
    let lab = app.seed_lab("teamview").await;

    let resp = app.auth_get("/api/lead/team", &lab.lead.token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["lead"]["id"], lab.lead.id);
    assert_eq!(json["members"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn lead_updates_profiles_only_within_their_team() {
    let Some(app) = TestApp::spawn().await else { return };
    let lab = app.seed_lab("teamprof").await;
    let other_lead = app
        .seed_user_with_role(&lab.admin.token, "uid-ol", "other-lead@lab.test", "lead")
        .await;

    let resp = app
        .auth_patch(
            &format!("/api/lead/team/{}", lab.members[0].id),
            &lab.lead.token,
        )
        .json(&serde_json::json!({
            "mobile": "+38970123456",
            "student_id": "216045",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["mobile"], "+38970123456");
    assert_eq!(json["student_id"], "216045");

    // Partial: nothing else changed.
    assert_eq!(json["email"], lab.members[0].email);

    let resp = app
        .auth_patch(
            &format!("/api/lead/team/{}", lab.members[0].id),
            &other_lead.token,
        )
        .json(&serde_json::json!({ "mobile": "+0000" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}
