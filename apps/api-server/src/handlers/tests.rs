use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};
use uuid::Uuid;

use quill_infra::memory::InMemoryStore;

use super::configure_routes;
use crate::state::AppState;

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::in_memory(InMemoryStore::new())))
                .configure(configure_routes),
        )
        .await
    };
}

/// Send a request and return `(status, json body)`.
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

macro_rules! create_category {
    ($app:expr, $name:expr) => {{
        let (status, body) = send!(
            $app,
            test::TestRequest::post()
                .uri("/api/categories")
                .set_json(json!({ "name": $name, "description": format!("All about {}", $name) }))
        );
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }};
}

macro_rules! create_post {
    ($app:expr, $payload:expr) => {{
        let (status, body) = send!(
            $app,
            test::TestRequest::post().uri("/api/posts").set_json($payload)
        );
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }};
}

fn post_payload(title: &str, content: &str, category: &str) -> Value {
    json!({
        "title": title,
        "content": content,
        "author": "Ada",
        "category": category,
    })
}

#[actix_web::test]
async fn test_health() {
    let app = test_app!();
    let (status, body) = send!(app, test::TestRequest::get().uri("/api/health"));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Server is running");
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["storage"], "memory");
}

#[actix_web::test]
async fn test_category_filter_scenario() {
    let app = test_app!();

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/categories")
            .set_json(json!({ "name": "Tech" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Category created successfully");
    assert_eq!(body["data"]["slug"], "tech");
    let tech = body["data"]["id"].as_str().unwrap().to_string();
    let other = create_category!(app, "Cooking");

    let post_id = create_post!(app, post_payload("Rust 2024", "Editions explained", &tech));

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri(&format!("/api/posts?category={tech}"))
    );
    assert_eq!(status, StatusCode::OK);
    let posts = body["data"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["id"], post_id.as_str());
    assert_eq!(
        posts[0]["category"],
        json!({ "id": tech, "name": "Tech", "slug": "tech" })
    );

    let (_, body) = send!(
        app,
        test::TestRequest::get().uri(&format!("/api/posts?category={other}"))
    );
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["totalPosts"], 0);
    assert_eq!(body["pagination"]["totalPages"], 0);
}

#[actix_web::test]
async fn test_create_then_get_round_trip() {
    let app = test_app!();
    let category = create_category!(app, "Science");

    let payload = json!({
        "title": "Tides",
        "content": "The moon does it",
        "author": "Grace",
        "category": category,
        "featuredImage": "https://img.example.com/tide.png",
        "status": "published",
        "tags": ["ocean", "moon"],
    });
    let (status, body) = send!(
        app,
        test::TestRequest::post().uri("/api/posts").set_json(&payload)
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Post created successfully");
    assert!(body["data"]["category"].get("description").is_none());
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri(&format!("/api/posts/{id}"))
    );
    assert_eq!(status, StatusCode::OK);
    let post = &body["data"];
    for field in ["title", "content", "author", "featuredImage", "status", "tags"] {
        assert_eq!(post[field], payload[field], "{field}");
    }
    assert_eq!(post["category"]["name"], "Science");
    assert_eq!(post["category"]["slug"], "science");
    assert_eq!(post["category"]["description"], "All about Science");
    assert_eq!(post["comments"], json!([]));
}

#[actix_web::test]
async fn test_create_post_validation() {
    let app = test_app!();
    let category = create_category!(app, "Science");

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "content": "x", "author": "y", "category": category }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "message": "\"title\" is required" })
    );

    let mut payload = post_payload("Ok", "Body", &category);
    payload["featuredImage"] = json!("not a url");
    let (status, body) = send!(
        app,
        test::TestRequest::post().uri("/api/posts").set_json(&payload)
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, body) = send!(app, test::TestRequest::get().uri("/api/posts"));
    assert_eq!(body["pagination"]["totalPosts"], 0);
}

#[actix_web::test]
async fn test_pagination() {
    let app = test_app!();
    let category = create_category!(app, "Science");
    for n in 0..3 {
        create_post!(app, post_payload(&format!("Post {n}"), "Body", &category));
    }

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri("/api/posts?page=1&limit=2")
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["pagination"],
        json!({ "currentPage": 1, "totalPages": 2, "totalPosts": 3, "limit": 2 })
    );

    let (_, body) = send!(
        app,
        test::TestRequest::get().uri("/api/posts?page=2&limit=2")
    );
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri("/api/posts?page=9&limit=2")
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["currentPage"], 9);
    assert_eq!(body["pagination"]["totalPosts"], 3);
}

#[actix_web::test]
async fn test_lenient_list_params() {
    let app = test_app!();
    let category = create_category!(app, "Science");
    create_post!(app, post_payload("Only", "Body", &category));

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri("/api/posts?page=abc&limit=-4")
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["pagination"]["limit"], 10);

    let (_, body) = send!(
        app,
        test::TestRequest::get().uri("/api/posts?category=not-an-id")
    );
    assert_eq!(body["data"], json!([]));

    let (_, body) = send!(
        app,
        test::TestRequest::get().uri("/api/posts?status=archived")
    );
    assert_eq!(body["data"], json!([]));

    let (_, body) = send!(app, test::TestRequest::get().uri("/api/posts?status=draft"));
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_search_intersects_category() {
    let app = test_app!();
    let science = create_category!(app, "Science");
    let travel = create_category!(app, "Travel");

    let wanted = create_post!(app, post_payload("Ocean tides", "Moon pull", &science));
    create_post!(app, post_payload("Deserts", "Dry sand", &science));
    create_post!(app, post_payload("Ocean cruise", "Ships", &travel));

    let (_, body) = send!(
        app,
        test::TestRequest::get().uri("/api/posts?search=OCEAN")
    );
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = send!(
        app,
        test::TestRequest::get().uri(&format!("/api/posts?search=ocean&category={science}"))
    );
    let posts = body["data"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["id"], wanted.as_str());
}

#[actix_web::test]
async fn test_get_missing_post() {
    let app = test_app!();

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri(&format!("/api/posts/{}", Uuid::new_v4()))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "message": "Post not found" }));

    let (status, _) = send!(app, test::TestRequest::get().uri("/api/posts/42"));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_update_post() {
    let app = test_app!();
    let category = create_category!(app, "Science");

    let mut payload = post_payload("Draft title", "Body", &category);
    payload["tags"] = json!(["keep"]);
    let id = create_post!(app, payload);

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/posts/{id}"))
            .set_json(post_payload("Final title", "Body", &category))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Post updated successfully");
    assert_eq!(body["data"]["title"], "Final title");
    assert_eq!(body["data"]["tags"], json!(["keep"]));
    assert_eq!(body["data"]["category"]["slug"], "science");

    let (status, _) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/posts/{}", Uuid::new_v4()))
            .set_json(post_payload("Final title", "Body", &category))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/posts/{}", Uuid::new_v4()))
            .set_json(json!({ "title": "" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "\"title\" is not allowed to be empty");
}

#[actix_web::test]
async fn test_update_keeps_comments() {
    let app = test_app!();
    let category = create_category!(app, "Science");
    let id = create_post!(app, post_payload("Discuss", "Body", &category));

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/posts/{id}/comments"))
            .set_json(json!({ "author": "Grace", "content": "Before the edit" }))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/posts/{id}"))
            .set_json(post_payload("Discuss, edited", "Body", &category))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Discuss, edited");
    assert_eq!(body["data"]["comments"][0]["content"], "Before the edit");
}

#[actix_web::test]
async fn test_delete_post() {
    let app = test_app!();
    let category = create_category!(app, "Science");
    let id = create_post!(app, post_payload("Short lived", "Body", &category));

    let (status, body) = send!(
        app,
        test::TestRequest::delete().uri(&format!("/api/posts/{id}"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Post deleted successfully" })
    );

    let (status, _) = send!(
        app,
        test::TestRequest::delete().uri(&format!("/api/posts/{id}"))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send!(app, test::TestRequest::get().uri(&format!("/api/posts/{id}")));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_add_comments() {
    let app = test_app!();
    let category = create_category!(app, "Science");
    let id = create_post!(app, post_payload("Discuss", "Body", &category));
    let uri = format!("/api/posts/{id}/comments");

    for (n, text) in ["first", "second"].into_iter().enumerate() {
        let (status, body) = send!(
            app,
            test::TestRequest::post()
                .uri(&uri)
                .set_json(json!({ "author": "Linus", "content": text }))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Comment added successfully");
        assert_eq!(body["data"]["comments"].as_array().unwrap().len(), n + 1);
        assert_eq!(body["data"]["category"]["description"], "All about Science");
    }

    let (_, body) = send!(app, test::TestRequest::get().uri(&format!("/api/posts/{id}")));
    let contents: Vec<&str> = body["data"]["comments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["first", "second"]);
}

#[actix_web::test]
async fn test_add_comment_failures() {
    let app = test_app!();
    let category = create_category!(app, "Science");
    let id = create_post!(app, post_payload("Discuss", "Body", &category));

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/posts/{id}/comments"))
            .set_json(json!({ "author": "Linus" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Author and content are required");

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/posts/{}/comments", Uuid::new_v4()))
            .set_json(json!({ "author": "Linus", "content": "hello" }))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Post not found");
}

#[actix_web::test]
async fn test_categories_sorted_and_unique() {
    let app = test_app!();
    create_category!(app, "Travel");
    create_category!(app, "Art");

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/categories")
            .set_json(json!({ "name": "Art" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Category already exists" })
    );

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/categories"));
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Art", "Travel"]);
}

#[actix_web::test]
async fn test_malformed_json() {
    let app = test_app!();

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"title\": ")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_unknown_route() {
    let app = test_app!();

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/nope"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "message": "Route not found" }));
}
