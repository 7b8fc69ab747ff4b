use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::features::users::handlers;
use crate::features::users::services::{UserProfileService, UserService};
use crate::shared::constants::MAX_PROFILE_IMAGE_SIZE;

/// Create routes for user administration and the profile editor
pub fn routes(users: Arc<UserService>, profiles: Arc<UserProfileService>) -> Router {
    let user_routes = Router::new()
        .route(
            "/api/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route("/api/users/all", get(handlers::list_all_users))
        .route("/api/users/new", get(handlers::new_user_form))
        .route(
            "/api/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/api/users/{id}/edit", get(handlers::edit_user))
        .route("/api/roles", get(handlers::list_roles))
        .with_state(users);

    let profile_routes = Router::new()
        .route(
            "/api/profile",
            get(handlers::get_profile).post(handlers::update_profile).layer(
                // Image limit plus room for the text fields and multipart framing
                DefaultBodyLimit::max(MAX_PROFILE_IMAGE_SIZE + 1024 * 1024),
            ),
        )
        .with_state(profiles);

    user_routes.merge(profile_routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::repositories::memory::MemoryUserStore;
    use crate::modules::storage::memory_storage::MemoryStorage;
    use crate::shared::test_helpers::with_roles;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;
    use serde_json::{json, Value};

    struct Fixture {
        store: Arc<MemoryUserStore>,
        storage: Arc<MemoryStorage>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: Arc::new(MemoryUserStore::new()),
                storage: Arc::new(MemoryStorage::new()),
            }
        }

        fn server(&self, email: &str, roles: &[&str]) -> TestServer {
            let router = routes(
                Arc::new(UserService::new(
                    self.store.clone(),
                    self.store.clone(),
                    self.store.clone(),
                )),
                Arc::new(UserProfileService::new(
                    self.store.clone(),
                    self.store.clone(),
                    self.storage.clone(),
                )),
            );
            TestServer::new(with_roles(router, email, roles)).unwrap()
        }
    }

    fn profile_form() -> MultipartForm {
        MultipartForm::new()
            .add_text("firstName", "Ana")
            .add_text("lastName", "García")
            .add_text("locale", "es")
    }

    fn image_part(content_type: &str, size: usize) -> Part {
        Part::bytes(vec![1u8; size])
            .file_name("avatar.png")
            .mime_type(content_type)
    }

    #[tokio::test]
    async fn test_user_crud_flow() {
        let fixture = Fixture::new();
        let server = fixture.server("admin@example.com", &["ADMIN"]);
        let email: String = SafeEmail().fake();

        let response = server
            .post("/api/users")
            .json(&json!({ "email": email, "roleIds": [3] }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let id = response.json::<Value>()["data"]["id"].as_i64().unwrap();

        let response = server.get(&format!("/api/users/{}/edit", id)).await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"]["user"]["roleIds"], json!([3]));
        assert_eq!(body["data"]["roles"].as_array().unwrap().len(), 3);

        let response = server
            .put(&format!("/api/users/{}", id))
            .json(&json!({
                "email": email,
                "active": true,
                "accountNonLocked": true,
                "failedLoginAttempts": 0,
                "emailVerified": true,
                "mustChangePassword": false,
                "roleIds": [1, 2]
            }))
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>()["message"],
            "User updated successfully"
        );

        let response = server.get(&format!("/api/users/{}", id)).await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"]["email"], email.as_str());
        assert_eq!(body["data"]["roles"][0]["name"], "ADMIN");

        server
            .delete(&format!("/api/users/{}", id))
            .await
            .assert_status_ok();
        server
            .get(&format!("/api/users/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let fixture = Fixture::new();
        fixture.store.seed_user("ana@example.com", &[3]);
        let server = fixture.server("admin@example.com", &["ADMIN"]);

        server
            .post("/api/users")
            .json(&json!({ "email": "Ana@Example.com" }))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_requires_known_roles() {
        let fixture = Fixture::new();
        let user = fixture.store.seed_user("ana@example.com", &[3]);
        let server = fixture.server("admin@example.com", &["ADMIN"]);
        let body = |role_ids: Value| {
            json!({
                "email": "ana@example.com",
                "active": true,
                "accountNonLocked": true,
                "failedLoginAttempts": 0,
                "emailVerified": false,
                "mustChangePassword": false,
                "roleIds": role_ids
            })
        };

        server
            .put(&format!("/api/users/{}", user.id))
            .json(&body(json!([])))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .put(&format!("/api/users/{}", user.id))
            .json(&body(json!([42])))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_users_page() {
        let fixture = Fixture::new();
        for email in ["c@example.com", "a@example.com", "b@example.com"] {
            fixture.store.seed_user(email, &[3]);
        }
        let server = fixture.server("admin@example.com", &["ADMIN"]);

        let response = server
            .get("/api/users")
            .add_query_param("size", 2)
            .add_query_param("sortField", "password")
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"][0]["email"], "a@example.com");
        assert_eq!(body["meta"]["sortField"], "email");
        assert_eq!(body["meta"]["totalPages"], 2);

        let response = server.get("/api/roles").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"][0]["name"], "ADMIN");
    }

    #[tokio::test]
    async fn test_users_require_admin() {
        let fixture = Fixture::new();
        let server = fixture.server("manager@example.com", &["MANAGER"]);
        server
            .get("/api/users")
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .get("/api/roles")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_profile_update_with_image() {
        let fixture = Fixture::new();
        fixture.store.seed_user("ana@example.com", &[3]);
        let server = fixture.server("ana@example.com", &["USER"]);

        let response = server
            .post("/api/profile")
            .multipart(profile_form())
            .await;
        response.assert_status_ok();
        assert!(response.json::<Value>()["data"]["profileImage"].is_null());
        assert_eq!(fixture.storage.save_count(), 0);

        let response = server
            .post("/api/profile")
            .multipart(profile_form().add_part("profileImageFile", image_part("image/png", 1024 * 1024)))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["message"], "Profile updated successfully");
        let path = body["data"]["profileImage"].as_str().unwrap().to_string();
        assert!(path.ends_with(".png"));
        assert!(fixture.storage.contains(&path));

        let response = server.get("/api/profile").await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"]["firstName"], "Ana");
        assert_eq!(body["data"]["profileImage"], path.as_str());
    }

    #[tokio::test]
    async fn test_profile_replaces_previous_image() {
        let fixture = Fixture::new();
        fixture.store.seed_user("ana@example.com", &[3]);
        let server = fixture.server("ana@example.com", &["USER"]);

        let first = server
            .post("/api/profile")
            .multipart(profile_form().add_part("profileImageFile", image_part("image/png", 16)))
            .await
            .json::<Value>()["data"]["profileImage"]
            .as_str()
            .unwrap()
            .to_string();

        let second = server
            .post("/api/profile")
            .multipart(profile_form().add_part("profileImageFile", image_part("image/jpeg", 16)))
            .await
            .json::<Value>()["data"]["profileImage"]
            .as_str()
            .unwrap()
            .to_string();

        assert!(!fixture.storage.contains(&first));
        assert!(fixture.storage.contains(&second));
    }

    #[tokio::test]
    async fn test_profile_rejects_non_image() {
        let fixture = Fixture::new();
        fixture.store.seed_user("ana@example.com", &[3]);
        let server = fixture.server("ana@example.com", &["USER"]);

        let response = server
            .post("/api/profile")
            .multipart(profile_form().add_part("profileImageFile", image_part("text/plain", 16)))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["success"], false);
        assert_eq!(fixture.storage.save_count(), 0);
    }

    #[tokio::test]
    async fn test_profile_rejects_oversized_image() {
        let fixture = Fixture::new();
        fixture.store.seed_user("ana@example.com", &[3]);
        let server = fixture.server("ana@example.com", &["USER"]);

        server
            .post("/api/profile")
            .multipart(profile_form().add_part(
                "profileImageFile",
                image_part("image/png", MAX_PROFILE_IMAGE_SIZE + 1),
            ))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(fixture.storage.save_count(), 0);
    }

    #[tokio::test]
    async fn test_profile_validation_error_writes_nothing() {
        let fixture = Fixture::new();
        let user = fixture.store.seed_user("ana@example.com", &[3]);
        let server = fixture.server("ana@example.com", &["USER"]);

        let form = MultipartForm::new()
            .add_text("lastName", "García")
            .add_part("profileImageFile", image_part("image/png", 16));
        server
            .post("/api/profile")
            .multipart(form)
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        assert_eq!(fixture.storage.save_count(), 0);
        assert!(fixture.store.profile(user.id).is_none());
    }

    #[tokio::test]
    async fn test_profile_of_unknown_user_is_not_found() {
        let fixture = Fixture::new();
        let server = fixture.server("ghost@example.com", &["USER"]);
        server
            .get("/api/profile")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_profile_requires_user_role() {
        let fixture = Fixture::new();
        fixture.store.seed_user("admin@example.com", &[1]);
        let server = fixture.server("admin@example.com", &["ADMIN"]);
        server
            .get("/api/profile")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}
