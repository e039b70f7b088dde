//! Post CRUD handlers.
//!
//! Every handler validates its path and body first; the repository is only
//! reached with a well-formed id and a normalized record.

use actix_web::{HttpResponse, web};

use blog_core::domain::PostDraft;
use blog_core::validation::parse_id;
use blog_shared::{MessageResponse, PostRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn draft(req: PostRequest) -> PostDraft {
    PostDraft {
        author: req.author,
        title: req.title,
        content: req.content,
        cover: req.cover,
    }
}

/// GET /posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(AppError::post_not_found)?;

    Ok(HttpResponse::Ok().json(post))
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let input = state.rules.validate(draft(body.into_inner()))?;

    let post = state.posts.create(input).await?;
    tracing::info!(post_id = post.id, "Post created");

    Ok(HttpResponse::Created().json(post))
}

/// PUT /posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    // Report id and body failures together
    let id = parse_id(&path);
    let input = state.rules.validate(draft(body.into_inner()));
    let (id, input) = match (id, input) {
        (Ok(id), Ok(input)) => (id, input),
        (id, input) => {
            let errors = id
                .err()
                .into_iter()
                .chain(input.err())
                .flat_map(|e| e.into_inner())
                .collect();
            return Err(AppError::Validation(errors));
        }
    };

    let post = state
        .posts
        .update(id, input)
        .await?
        .ok_or_else(AppError::post_not_found)?;

    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;

    state
        .posts
        .delete(id)
        .await?
        .ok_or_else(AppError::post_not_found)?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use actix_web::http::StatusCode;
    use actix_web::http::header::ContentType;
    use actix_web::{App, test};
    use async_trait::async_trait;
    use serde_json::{Value, json};

    use blog_core::PostRules;
    use blog_core::domain::{NewPost, Post, PostId};
    use blog_core::error::RepoError;
    use blog_core::ports::PostRepository;
    use blog_infra::InMemoryPostRepository;

    use crate::handlers::configure_routes;
    use crate::observability::{REQUEST_ID_HEADER, RequestIdMiddleware};
    use crate::state::AppState;

    /// Counts every call and fails each one like an unreachable database.
    #[derive(Default)]
    struct FailingRepository {
        calls: AtomicUsize,
    }

    impl FailingRepository {
        fn fail(&self) -> RepoError {
            self.calls.fetch_add(1, Ordering::SeqCst);
            RepoError::Connection("connection refused (os error 111)".to_string())
        }
    }

    #[async_trait]
    impl PostRepository for FailingRepository {
        async fn list(&self) -> Result<Vec<Post>, RepoError> {
            Err(self.fail())
        }

        async fn find_by_id(&self, _id: PostId) -> Result<Option<Post>, RepoError> {
            Err(self.fail())
        }

        async fn create(&self, _post: NewPost) -> Result<Post, RepoError> {
            Err(self.fail())
        }

        async fn update(&self, _id: PostId, _post: NewPost) -> Result<Option<Post>, RepoError> {
            Err(self.fail())
        }

        async fn delete(&self, _id: PostId) -> Result<Option<Post>, RepoError> {
            Err(self.fail())
        }
    }

    fn state(rules: PostRules) -> AppState {
        AppState::with_repository(Arc::new(InMemoryPostRepository::new()), rules)
    }

    fn full_post(title: &str) -> Value {
        json!({
            "author": "Ada",
            "title": title,
            "content": "Some content",
            "cover": "https://img.example/cover.png",
        })
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .wrap(RequestIdMiddleware)
                    .app_data(actix_web::web::Data::new($state))
                    .configure(configure_routes),
            )
            .await
        };
    }

    fn field_names(body: &Value) -> Vec<String> {
        body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap().to_string())
            .collect()
    }

    #[actix_web::test]
    async fn test_welcome() {
        let app = app!(state(PostRules::strict()));

        let req = test::TestRequest::get().uri("/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body, json!({ "message": "Welcome to the blog API" }));
    }

    #[actix_web::test]
    async fn test_create_then_get_round_trip() {
        let app = app!(state(PostRules::strict()));

        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(full_post("  Hello  "))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;

        assert_eq!(created["title"], "Hello");
        assert_eq!(created["author"], "Ada");
        assert!(created["id"].is_i64());
        assert!(created["created_at"].is_string());
        assert_eq!(created["created_at"], created["updated_at"]);

        let req = test::TestRequest::get()
            .uri(&format!("/posts/{}", created["id"]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let fetched: Value = test::read_body_json(resp).await;
        assert_eq!(fetched, created);
    }

    #[actix_web::test]
    async fn test_strict_rules_name_missing_author_and_cover() {
        let app = app!(state(PostRules::strict()));

        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({ "title": "T", "content": "C" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(field_names(&body), vec!["author", "cover"]);
        assert_eq!(body["errors"][0]["message"], "author is required");
    }

    #[actix_web::test]
    async fn test_minimal_rules_accept_title_and_content() {
        let app = app!(state(PostRules::minimal()));

        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({ "title": "T", "content": "C" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "T");
        assert_eq!(body["content"], "C");
        assert!(body["author"].is_null());
        assert!(body["id"].is_i64());
    }

    #[actix_web::test]
    async fn test_list_is_newest_first() {
        let app = app!(state(PostRules::strict()));

        for title in ["P1", "P2", "P3"] {
            let req = test::TestRequest::post()
                .uri("/posts")
                .set_json(full_post(title))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get().uri("/posts").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let titles: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap())
            .collect();

        assert_eq!(titles, vec!["P3", "P2", "P1"]);
    }

    #[actix_web::test]
    async fn test_update_is_idempotent_in_effect() {
        let app = app!(state(PostRules::strict()));

        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(full_post("Original"))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let uri = format!("/posts/{}", created["id"]);

        let mut results = Vec::new();
        for _ in 0..2 {
            let req = test::TestRequest::put()
                .uri(&uri)
                .set_json(full_post("Edited"))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body: Value = test::read_body_json(resp).await;
            results.push(body);
        }

        for key in ["id", "author", "title", "content", "cover", "created_at"] {
            assert_eq!(results[0][key], results[1][key], "{key} changed");
        }
        assert_eq!(results[1]["title"], "Edited");
        assert_eq!(results[1]["created_at"], created["created_at"]);
    }

    #[actix_web::test]
    async fn test_delete_twice_is_not_found() {
        let app = app!(state(PostRules::strict()));

        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(full_post("Short lived"))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let uri = format!("/posts/{}", created["id"]);

        let req = test::TestRequest::delete().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "Post deleted successfully" }));

        let req = test::TestRequest::delete().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri(&uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_unknown_ids_are_not_found() {
        let app = app!(state(PostRules::strict()));

        let requests = [
            test::TestRequest::get().uri("/posts/999999"),
            test::TestRequest::put()
                .uri("/posts/999999")
                .set_json(full_post("Nope")),
            test::TestRequest::delete().uri("/posts/999999"),
        ];

        for req in requests {
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({ "error": "Post not found" }));
        }
    }

    #[actix_web::test]
    async fn test_non_integer_id_never_reaches_repository() {
        let repo = Arc::new(FailingRepository::default());
        let app = app!(AppState::with_repository(repo.clone(), PostRules::strict()));

        let requests = [
            test::TestRequest::get().uri("/posts/abc"),
            test::TestRequest::put()
                .uri("/posts/abc")
                .set_json(full_post("X")),
            test::TestRequest::delete().uri("/posts/1.5"),
        ];

        for req in requests {
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["errors"][0]["field"], "id");
            assert_eq!(body["errors"][0]["message"], "must be an integer");
        }

        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_update_reports_id_and_body_errors_together() {
        let app = app!(state(PostRules::strict()));

        let req = test::TestRequest::put()
            .uri("/posts/abc")
            .set_json(json!({ "title": "", "content": "C", "author": "A" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(field_names(&body), vec!["id", "title", "cover"]);
    }

    #[actix_web::test]
    async fn test_datastore_fault_is_generic_500() {
        let repo = Arc::new(FailingRepository::default());
        let app = app!(AppState::with_repository(repo.clone(), PostRules::strict()));

        let requests = [
            test::TestRequest::get().uri("/posts"),
            test::TestRequest::get().uri("/posts/1"),
            test::TestRequest::post().uri("/posts").set_json(full_post("X")),
            test::TestRequest::delete().uri("/posts/1"),
        ];

        for req in requests {
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({ "error": "Internal server error" }));
        }

        assert_eq!(repo.calls.load(Ordering::SeqCst), 4);
    }

    #[actix_web::test]
    async fn test_malformed_body_is_structured_400() {
        let app = app!(state(PostRules::strict()));

        let req = test::TestRequest::post()
            .uri("/posts")
            .insert_header(ContentType::json())
            .set_payload("{ not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(field_names(&body), vec!["body"]);

        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({ "title": 5, "content": "C" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_unknown_route_is_json_404() {
        let app = app!(state(PostRules::strict()));

        let req = test::TestRequest::get().uri("/comments").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Not found" }));
    }

    #[actix_web::test]
    async fn test_request_id_is_echoed_or_generated() {
        let app = app!(state(PostRules::strict()));

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((REQUEST_ID_HEADER, "abc-123"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "abc-123");

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        let generated = resp.headers().get(REQUEST_ID_HEADER).unwrap();
        assert_eq!(generated.len(), 36);
    }
}
