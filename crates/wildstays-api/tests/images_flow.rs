mod common;

use axum::http::{Method, StatusCode};

use common::{MAX_IMAGE_BYTES, TestApp};

#[tokio::test]
async fn upload_serve_and_delete_image() {
    let app = TestApp::new().await;
    let owner = app.register("owner").await;
    let listing = app.create_listing(&owner, "Bergen", 2, 500).await;
    let upload = format!("/me/listings/{listing}/images?filename=front.jpg");

    let (status, body) = app.send_bytes(&upload, &owner, b"not really a jpeg".to_vec()).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let file_path = body["file_path"].as_str().unwrap().to_string();
    assert!(file_path.starts_with("/uploads/"));
    assert!(file_path.ends_with("_front.jpg"));

    let (status, bytes) = app.get_raw(&file_path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"not really a jpeg");

    let (_, details) = app.send(Method::GET, &format!("/listings/{listing}"), None, None).await;
    assert_eq!(details["listing"]["images"][0]["file_path"], file_path.as_str());

    let image_id = body["id"].as_i64().unwrap();
    let remove = format!("/me/listings/{listing}/images/{image_id}");
    let (status, _) = app.send(Method::DELETE, &remove, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let on_disk = app.uploads.path().join(file_path.trim_start_matches("/uploads/"));
    assert!(!on_disk.exists());

    let (status, _) = app.send(Method::DELETE, &remove, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_rules() {
    let app = TestApp::new().await;
    let owner = app.register("owner").await;
    let stranger = app.register("stranger").await;
    let listing = app.create_listing(&owner, "Bergen", 2, 500).await;
    let upload = format!("/me/listings/{listing}/images");

    let (status, _) = app.send_bytes(&upload, &owner, Vec::new()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send_bytes(&upload, &stranger, b"jpeg".to_vec()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.send_bytes(&upload, &owner, vec![0u8; MAX_IMAGE_BYTES + 1]).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], format!("File exceeds the {MAX_IMAGE_BYTES} byte limit."));

    let (status, body) = app.send_bytes(&upload, &owner, vec![0u8; 4 * MAX_IMAGE_BYTES]).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].is_string());

    let (status, body) = app.send_bytes(&upload, &owner, vec![0u8; MAX_IMAGE_BYTES]).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let stored = app.uploads.path().join(
        body["file_path"].as_str().unwrap().trim_start_matches("/uploads/"),
    );
    std::fs::remove_file(stored).unwrap();

    assert_eq!(std::fs::read_dir(app.uploads.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn deleting_listing_removes_image_files() {
    let app = TestApp::new().await;
    let owner = app.register("owner").await;
    let listing = app.create_listing(&owner, "Bergen", 2, 500).await;
    let upload = format!("/me/listings/{listing}/images?filename=a.png");

    for _ in 0..2 {
        let (status, _) = app.send_bytes(&upload, &owner, b"png".to_vec()).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    assert_eq!(std::fs::read_dir(app.uploads.path()).unwrap().count(), 2);

    let (status, _) = app
        .send(Method::DELETE, &format!("/me/listings/{listing}"), Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(std::fs::read_dir(app.uploads.path()).unwrap().count(), 0);
}
