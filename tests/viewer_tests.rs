#![cfg(feature = "viewer")]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use insertcsg::{
    mesh::Mesh,
    viewer::{AppState, router},
};
use serde_json::{Value, json};
use tower::ServiceExt;

const BOUNDARY: &str = "insertcsg-test-boundary";

fn app(max_uploads: usize) -> Router {
    router(AppState::new(max_uploads, 1024 * 1024))
}

fn cube_stl() -> Vec<u8> {
    Mesh::cuboid(2.0, 2.0, 2.0)
        .expect("valid cube")
        .to_stl_binary("cube")
        .expect("serializes")
}

fn upload_request(filename: &str, contents: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/meshes")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("valid request")
}

fn json_request(method: &str, uri: &str, value: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(value.to_string()))
        .expect("valid request")
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes()
        .to_vec();
    (status, body)
}

async fn upload_cube(app: &Router) -> String {
    let (status, body) = send(app, upload_request("cube.stl", &cube_stl())).await;
    assert_eq!(status, StatusCode::CREATED);
    let value: Value = serde_json::from_slice(&body).expect("json");
    value["id"].as_str().expect("id").to_owned()
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = send(&app(4), empty_request("GET", "/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(value["status"], "ok");
}

#[tokio::test]
async fn page_has_upload_and_both_control_rows() {
    let (status, body) = send(&app(4), empty_request("GET", "/")).await;
    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8(body).expect("utf8");
    assert!(page.contains("STL File Viewer"));
    assert!(page.contains(r#"accept=".stl""#));
    assert!(page.contains(r#"id="controls" class="hidden""#));
    for id in [
        "color",
        "material",
        "auto_rotate",
        "opacity",
        "height",
        "cam_v_angle",
        "cam_h_angle",
        "cam_distance",
        "max_view_distance",
    ] {
        assert!(page.contains(&format!(r#"id="{id}""#)), "missing control {id}");
    }
}

#[tokio::test]
async fn upload_then_download_returns_the_same_bytes() {
    let app = app(4);
    let stl = cube_stl();
    let (status, body) = send(&app, upload_request("cube.stl", &stl)).await;
    assert_eq!(status, StatusCode::CREATED);
    let value: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(value["name"], "cube.stl");
    assert_eq!(value["stats"]["triangles"], 12);

    let id = value["id"].as_str().expect("id");
    let (status, body) = send(&app, empty_request("GET", &format!("/api/meshes/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, stl);
}

#[tokio::test]
async fn non_stl_names_are_unsupported() {
    let (status, _) = send(&app(4), upload_request("cube.obj", &cube_stl())).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn unreadable_stl_is_unprocessable() {
    let (status, body) = send(&app(4), upload_request("junk.stl", b"not a mesh")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let value: Value = serde_json::from_slice(&body).expect("json");
    assert!(value["error"].as_str().expect("message").contains("STL"));
}

#[tokio::test]
async fn render_echoes_a_valid_config() {
    let app = app(4);
    let id = upload_cube(&app).await;

    let config = json!({ "color": "#00FF00", "material": "flat", "opacity": 0.5 });
    let (status, body) = send(
        &app,
        json_request("POST", &format!("/api/meshes/{id}/render"), &config),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(value["mesh_url"], format!("/api/meshes/{id}"));
    assert_eq!(value["config"]["material"], "flat");
    assert_eq!(value["config"]["height"], 500);
    assert_eq!(value["config"]["shininess"], 100);
}

#[tokio::test]
async fn render_rejects_out_of_range_config() {
    let app = app(4);
    let id = upload_cube(&app).await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/meshes/{id}/render"),
            &json!({ "height": 5000 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn echoed_config_can_be_posted_again() {
    let app = app(4);
    let id = upload_cube(&app).await;
    let uri = format!("/api/meshes/{id}/render");

    let (status, body) = send(&app, json_request("POST", &uri, &json!({ "opacity": 0.25 }))).await;
    assert_eq!(status, StatusCode::OK);
    let first: Value = serde_json::from_slice(&body).expect("json");

    let (status, body) = send(&app, json_request("POST", &uri, &first["config"])).await;
    assert_eq!(status, StatusCode::OK);
    let second: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(second["config"], first["config"]);
}

#[tokio::test]
async fn malformed_render_bodies_get_json_errors() {
    let app = app(4);
    let id = upload_cube(&app).await;
    let uri = format!("/api/meshes/{id}/render");

    // a cleared number input arrives as null
    let (status, body) = send(&app, json_request("POST", &uri, &json!({ "opacity": null }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let value: Value = serde_json::from_slice(&body).expect("json error body");
    assert!(value["error"].as_str().expect("message").contains("opacity"));

    let broken = Request::builder()
        .method("POST")
        .uri(&uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"opacity\": "))
        .expect("valid request");
    let (status, body) = send(&app, broken).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let value: Value = serde_json::from_slice(&body).expect("json error body");
    assert!(value["error"].is_string());

    let (status, body) = send(&app, empty_request("POST", &uri)).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(serde_json::from_slice::<Value>(&body).expect("json error body")["error"].is_string());
}

#[tokio::test]
async fn deleted_meshes_are_gone() {
    let app = app(4);
    let id = upload_cube(&app).await;

    let (status, _) = send(&app, empty_request("DELETE", &format!("/api/meshes/{id}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, empty_request("GET", &format!("/api/meshes/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, empty_request("DELETE", &format!("/api/meshes/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oldest_upload_is_evicted() {
    let app = app(1);
    let first = upload_cube(&app).await;
    let second = upload_cube(&app).await;

    let (status, _) = send(&app, empty_request("GET", &format!("/api/meshes/{first}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, empty_request("GET", &format!("/api/meshes/{second}"))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let app = router(AppState::new(4, 256));
    let (status, _) = send(&app, upload_request("cube.stl", &cube_stl())).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
