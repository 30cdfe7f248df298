//! 部署/桌面生命周期集成测试（mockito 模拟平台）

use isard_vdiplatform::*;
use mockito::{Matcher, Server};
use serde_json::json;

const TOKEN: &str = "session-token";

fn client_for(server: &Server) -> VdiClient {
    VdiClient::with_token(&server.url(), ClientConfig::default(), TOKEN).unwrap()
}

fn bearer() -> String {
    format!("Bearer {}", TOKEN)
}

#[tokio::test]
async fn test_create_deployment_resolves_template() {
    let mut server = Server::new_async().await;

    let template = server
        .mock("GET", "/api/v3/template/tpl-1")
        .match_header("authorization", bearer().as_str())
        .with_status(200)
        .with_body(
            json!({
                "id": "tpl-1",
                "hardware": {
                    "vcpus": 4,
                    "memory": 4194304,
                    "disk_bus": "virtio"
                },
                "guest_properties": {"a": "1", "b": "2"}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let create = server
        .mock("POST", "/api/v3/deployments")
        .match_header("authorization", bearer().as_str())
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "name": "lab",
            "template_id": "tpl-1",
            "hardware": {
                "vcpus": 8,
                "memory": 4,
                "videos": ["default"],
                "disk_bus": "virtio",
                "interfaces": ["default", "wireguard"],
                "reservables": {"vgpus": ["None"]}
            },
            "guest_properties": {"a": "1", "b": "9", "c": "3"},
            "image": {"type": "user"},
            "user_permissions": []
        })))
        .with_status(201)
        .with_body(r#"{"id":"dep-1"}"#)
        .create_async()
        .await;

    let spec = DeploymentSpec::new("lab", "tpl-1")
        .with_vcpus(8)
        .with_guest_property("b", json!("9"))
        .with_guest_property("c", json!("3"));

    let id = client_for(&server).deployment().create(&spec).await.unwrap();
    assert_eq!(id, "dep-1");

    template.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn test_create_deployment_template_failure_aborts() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/v3/template/missing")
        .with_status(404)
        .with_body("template not found")
        .create_async()
        .await;

    let create = server
        .mock("POST", "/api/v3/deployments")
        .expect(0)
        .create_async()
        .await;

    let spec = DeploymentSpec::new("lab", "missing");
    let err = client_for(&server).deployment().create(&spec).await.unwrap_err();

    match err {
        VdiError::TemplateFetch { template_id, source } => {
            assert_eq!(template_id, "missing");
            assert_eq!(source.status(), Some(404));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    create.assert_async().await;
}

#[tokio::test]
async fn test_create_deployment_missing_id() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", "/api/v3/deployments")
        .with_status(200)
        .with_body(r#"{"status":"queued"}"#)
        .create_async()
        .await;

    let payload = resolve_deployment(&DeploymentSpec::new("lab", "tpl"), &Template::default());
    let err = client_for(&server)
        .deployment()
        .create_resolved(&payload)
        .await
        .unwrap_err();

    match err {
        VdiError::Create { status, body } => {
            assert_eq!(status, 200);
            assert!(body.contains("queued"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_get_deployment_not_found_vs_error() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/v3/deployment/gone")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", "/api/v3/deployment/broken")
        .with_status(500)
        .with_body("internal")
        .create_async()
        .await;
    server
        .mock("GET", "/api/v3/deployment/dep-1")
        .with_status(200)
        .with_body(
            json!({
                "id": "dep-1",
                "name": "lab",
                "template": "tpl-1",
                "visible": true,
                "totalDesktops": 20,
                "startedDesktops": 4
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);

    assert!(client.deployment().get("gone").await.unwrap().is_none());

    let err = client.deployment().get("broken").await.unwrap_err();
    assert!(matches!(err, VdiError::Read { status: 500, .. }));

    let deployment = client.deployment().get("dep-1").await.unwrap().unwrap();
    assert_eq!(deployment.template_id, "tpl-1");
    assert_eq!(deployment.total_desktops, 20);
    assert!(deployment.visible);
}

#[tokio::test]
async fn test_get_deployment_with_null_fields() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/v3/deployment/dep-1")
        .with_status(200)
        .with_body(
            r#"{"id":"dep-1","name":"lab","description":null,"desktop_name":null,
                "template":"tpl-1","allowed":null,"totalDesktops":null,"startedDesktops":1}"#,
        )
        .create_async()
        .await;

    let deployment = client_for(&server)
        .deployment()
        .get("dep-1")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(deployment.name, "lab");
    assert_eq!(deployment.description, "");
    assert_eq!(deployment.template_id, "tpl-1");
    assert!(deployment.allowed.is_empty());
    assert_eq!(deployment.total_desktops, 0);
    assert_eq!(deployment.started_desktops, 1);
}

#[tokio::test]
async fn test_get_deployment_info() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/v3/deployment/info/dep-1")
        .with_status(200)
        .with_body(r#"{"id":"dep-1","hardware":{"vcpus":2}}"#)
        .create_async()
        .await;

    let info = client_for(&server)
        .deployment()
        .get_info("dep-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(info["hardware"]["vcpus"], 2);
}

#[tokio::test]
async fn test_update_deployment() {
    let mut server = Server::new_async().await;

    let ok = server
        .mock("PUT", "/api/v3/deployment/dep-1")
        .match_body(Matcher::Json(json!({"description": "new"})))
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("PUT", "/api/v3/deployment/dep-2")
        .with_status(201)
        .create_async()
        .await;

    let client = client_for(&server);
    let update = DeploymentUpdate {
        description: Some("new".into()),
        ..Default::default()
    };

    client.deployment().update("dep-1", &update).await.unwrap();
    ok.assert_async().await;

    // 只有 200 算成功
    let err = client.deployment().update("dep-2", &update).await.unwrap_err();
    assert!(matches!(err, VdiError::Update { status: 201, .. }));
}

#[tokio::test]
async fn test_delete_deployment_idempotent() {
    let mut server = Server::new_async().await;

    let permanent = server
        .mock("DELETE", "/api/v3/deployments/dep-1/true")
        .with_status(204)
        .create_async()
        .await;
    let absent = server
        .mock("DELETE", "/api/v3/deployments/ghost/false")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("DELETE", "/api/v3/deployments/locked/false")
        .with_status(409)
        .with_body("in use")
        .create_async()
        .await;

    let client = client_for(&server);

    client.deployment().delete("dep-1", true).await.unwrap();
    client.deployment().delete("ghost", false).await.unwrap();

    let err = client.deployment().delete("locked", false).await.unwrap_err();
    match err {
        VdiError::Delete { status, body } => {
            assert_eq!(status, 409);
            assert_eq!(body, "in use");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    permanent.assert_async().await;
    absent.assert_async().await;
}

#[tokio::test]
async fn test_start_stop_deployment() {
    let mut server = Server::new_async().await;

    let start = server
        .mock("PUT", "/api/v3/deployments/start/dep-1")
        .match_header("authorization", bearer().as_str())
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("PUT", "/api/v3/deployments/stop/dep-1")
        .with_status(500)
        .with_body("hypervisor offline")
        .create_async()
        .await;

    let client = client_for(&server);
    client.deployment().start("dep-1").await.unwrap();
    start.assert_async().await;

    let err = client.deployment().stop("dep-1").await.unwrap_err();
    assert!(matches!(
        err,
        VdiError::StartStop {
            action: PowerAction::Stop,
            status: 500,
            ..
        }
    ));
}

#[tokio::test]
async fn test_desktop_lifecycle() {
    let mut server = Server::new_async().await;

    let create = server
        .mock("POST", "/api/v3/persistent_desktop")
        .match_body(Matcher::Json(json!({
            "name": "dev-box",
            "template_id": "tpl-1",
            "hardware": {"memory": 4.0}
        })))
        .with_status(200)
        .with_body(r#"{"id":"desk-1"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/v3/domain/info/desk-1")
        .with_status(200)
        .with_body(
            json!({
                "name": "dev-box",
                "description": "assigned",
                "create_dict": {"origin": "tpl-1"},
                "hardware": {"vcpus": 2, "memory": 4.0}
            })
            .to_string(),
        )
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/v3/desktop/desk-1/true")
        .with_status(200)
        .create_async()
        .await;

    let client = client_for(&server);
    let spec = DesktopSpec {
        name: "dev-box".into(),
        template_id: "tpl-1".into(),
        memory: Some(4.0),
        ..Default::default()
    };

    let state = DesktopState::provision(&client, &spec).await.unwrap();
    assert_eq!(state.id, "desk-1");
    assert_eq!(state.description, "assigned");
    assert_eq!(state.vcpus, Some(2));
    assert_eq!(state.memory, Some(4.0));
    create.assert_async().await;

    client.desktop().delete("desk-1").await.unwrap();
    delete.assert_async().await;
}

#[tokio::test]
async fn test_desktop_refresh_drops_on_404() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/v3/domain/info/desk-9")
        .with_status(404)
        .create_async()
        .await;

    let state = DesktopState {
        id: "desk-9".into(),
        ..Default::default()
    };
    let refreshed = state.refresh(&client_for(&server)).await.unwrap();
    assert!(refreshed.is_none());
}

#[tokio::test]
async fn test_deployment_provision_survives_refresh_failure() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/v3/template/tpl-1")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    server
        .mock("POST", "/api/v3/deployments")
        .with_status(200)
        .with_body(r#"{"id":"dep-7"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/v3/deployment/dep-7")
        .with_status(503)
        .create_async()
        .await;

    let spec = DeploymentSpec::new("lab", "tpl-1");
    let state = DeploymentState::provision(&client_for(&server), &spec)
        .await
        .unwrap();

    assert_eq!(state.id, "dep-7");
    assert_eq!(state.name, "lab");
    assert_eq!(state.total_desktops, 0);
}

#[tokio::test]
async fn test_groups_filtered() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/v3/admin/groups")
        .with_status(200)
        .with_body(
            json!([
                {"id": "g1", "name": "Students A", "parent_category": "default"},
                {"id": "g2", "name": "students B", "parent_category": "other"},
                {"id": "g3", "name": "Teachers", "parent_category": "default"}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let filter = GroupFilter::new(Some("student".into()), Some("default".into()));
    let groups = client_for(&server)
        .group()
        .list_filtered(&filter)
        .await
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, "g1");
}

#[tokio::test]
async fn test_groups_with_null_fields() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/v3/admin/groups")
        .with_status(200)
        .with_body(
            r#"[
                {"id":"g1","name":"Students","description":null,"linked_groups":null,"parent_category":"default"},
                {"id":"g2","name":"Teachers","description":"staff","linked_groups":["g1"],"parent_category":null}
            ]"#,
        )
        .create_async()
        .await;

    let groups = client_for(&server).group().list().await.unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].description, "");
    assert!(groups[0].linked_groups.is_empty());
    assert_eq!(groups[1].parent_category, "");
    assert_eq!(groups[1].linked_groups, vec!["g1"]);
}

#[tokio::test]
async fn test_transport_error_is_distinct() {
    // 端口 1 上没有服务，连接会被拒绝
    let client = VdiClient::with_token("http://127.0.0.1:1", ClientConfig::default(), TOKEN).unwrap();

    let err = client.deployment().get("dep-1").await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.status(), None);

    let err = client
        .deployment()
        .create(&DeploymentSpec::new("lab", "tpl"))
        .await
        .unwrap_err();
    assert!(matches!(err, VdiError::TemplateFetch { .. }));
    assert!(err.is_transport());
}
