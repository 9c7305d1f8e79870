//! Integration tests for the page handlers, driven through a scripted
//! transport.

mod common;

use capafront::api::{CONNECTION_ERROR_MESSAGE, Method};
use capafront::app::{Modal, Section};
use capafront::bridge::UiAction;
use capafront::handlers::{EditPostForm, LoginForm, PostForm, RegisterForm, Submission};
use capafront::notify::NotificationLevel;
use capafront::simulation;
use capafront::types::RecordId;
use common::*;
use rand::rngs::mock::StepRng;
use serde_json::json;

fn valid_post_form() -> PostForm {
    PostForm {
        title: "Hello".to_string(),
        content: "First post".to_string(),
        category: String::new(),
        tags: "rust, web".to_string(),
    }
}

mod loading {
    use super::*;

    #[tokio::test]
    async fn test_rendered_cards_match_payload_length() {
        let (ctx, transport) = context();
        transport.respond(
            Method::Get,
            "/posts",
            json!([
                post_json("p1", "One", "u1", "ana"),
                post_json("p2", "Two", "u2", "bo"),
                post_json("p3", "Three", "u1", "ana"),
            ]),
        );

        assert!(ctx.load_posts().await);

        let html = ctx.view.snapshot().posts_html;
        assert_eq!(html.matches(r#"<article class="post-card""#).count(), 3);
        assert_eq!(ctx.cache.posts().len(), 3);
    }

    #[tokio::test]
    async fn test_non_array_payload_shows_error_placeholder() {
        let (ctx, transport) = context();
        transport.respond(Method::Get, "/posts", json!({ "posts": [] }));

        assert!(!ctx.load_posts().await);

        let html = ctx.view.snapshot().posts_html;
        assert!(html.contains(r#"class="error-message""#));
        assert!(html.contains(r#"data-action="reload-posts""#));
        assert!(ctx.cache.posts().is_empty());
    }

    #[tokio::test]
    async fn test_null_title_does_not_empty_the_feed() {
        let (ctx, transport) = context();
        let mut untitled = post_json("p2", "Two", "u2", "bo");
        untitled["title"] = json!(null);
        transport.respond(
            Method::Get,
            "/posts",
            json!([post_json("p1", "One", "u1", "ana"), untitled, "not a post"]),
        );

        assert!(ctx.load_posts().await);

        assert_eq!(ctx.cache.posts().len(), 2);
        let html = ctx.view.snapshot().posts_html;
        assert_eq!(html.matches(r#"<article class="post-card""#).count(), 2);
        assert!(!html.contains("error-message"));
    }

    #[tokio::test]
    async fn test_plain_id_fields_keep_owner_controls() {
        let (ctx, transport) = context();
        sign_in(&ctx, "u1", "ana");
        transport.respond(
            Method::Get,
            "/posts",
            json!([{ "id": "p1", "title": "Mine", "content": "x", "author": { "id": "u1", "username": "ana" } }]),
        );

        ctx.load_posts().await;

        let html = ctx.view.snapshot().posts_html;
        assert!(html.contains(r#"data-action="edit-post" data-post-id="p1""#));
        assert!(html.contains(r#"data-action="delete-post" data-post-id="p1""#));
    }

    #[tokio::test]
    async fn test_failed_request_reports_once() {
        let (ctx, transport) = context();
        transport.fail(Method::Get, "/posts", 500);

        assert!(!ctx.load_posts().await);

        let errors: Vec<_> = notifications(&ctx)
            .into_iter()
            .filter(|n| n.level == NotificationLevel::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, CONNECTION_ERROR_MESSAGE);
        assert!(ctx.view.snapshot().posts_html.contains("Retry"));
    }

    #[tokio::test]
    async fn test_empty_list_offers_create_only_when_signed_in() {
        let (ctx, transport) = context();
        transport.respond(Method::Get, "/posts", json!([]));

        ctx.load_posts().await;
        assert!(!ctx.view.snapshot().posts_html.contains("createPostModal"));

        sign_in(&ctx, "u1", "ana");
        ctx.load_posts().await;
        assert!(ctx.view.snapshot().posts_html.contains("createPostModal"));
    }

    #[tokio::test]
    async fn test_start_runs_initial_loads() {
        let (ctx, transport) = context();
        transport.respond(
            Method::Get,
            "/categories",
            json!({ "categories": [{ "_id": "c1", "name": "General" }] }),
        );
        transport.respond(Method::Get, "/posts", json!([post_json("p1", "One", "u1", "ana")]));
        transport.respond(
            Method::Get,
            "/messages",
            json!({ "messages": [{ "_id": "m1", "content": "hi", "sender": { "_id": "u1", "username": "ana" } }] }),
        );

        let handle = ctx.start().await;

        assert!(handle.is_none());
        assert_eq!(transport.request_count(), 3);
        let view = ctx.view.snapshot();
        assert!(view.categories_html.contains(r#"data-category="General""#));
        assert!(view.messages_html.contains(r#"<div class="message-author">ana</div>"#));
        assert!(view.user_actions_html.contains("loginModal"));
    }

    #[tokio::test]
    async fn test_authorization_header_follows_session() {
        let (ctx, transport) = context();
        transport.respond(Method::Get, "/posts", json!([]));

        ctx.load_posts().await;
        sign_in(&ctx, "u1", "ana");
        ctx.load_posts().await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].header("Authorization"), None);
        assert_eq!(requests[1].header("Authorization"), Some("Bearer token-u1"));
        for request in &requests {
            assert_eq!(request.header("Content-Type"), Some("application/json"));
        }
    }
}

mod filtering {
    use super::*;

    async fn loaded_context() -> (capafront::AppContext, std::sync::Arc<MockTransport>) {
        let (ctx, transport) = context();
        transport.respond(
            Method::Get,
            "/posts",
            json!([
                post_json("p1", "Rust tips", "u1", "ana"),
                post_json("p2", "Cooking", "u2", "bo"),
            ]),
        );
        ctx.load_posts().await;
        transport.clear_requests();
        (ctx, transport)
    }

    #[tokio::test]
    async fn test_search_filters_locally() {
        let (ctx, transport) = loaded_context().await;

        ctx.on_search_input("rust").await;

        assert_eq!(transport.request_count(), 0);
        let html = ctx.view.snapshot().posts_html;
        assert!(html.contains("Rust tips"));
        assert!(!html.contains("Cooking"));
    }

    #[tokio::test]
    async fn test_short_queries_are_ignored_and_empty_reloads() {
        let (ctx, transport) = loaded_context().await;

        ctx.on_search_input("ru").await;
        assert_eq!(transport.request_count(), 0);

        ctx.on_search_input("").await;
        assert_eq!(transport.request_count(), 1);
        assert_eq!(transport.count(Method::Get, "/posts"), 1);
    }

    #[tokio::test]
    async fn test_category_filter_is_local() {
        let (ctx, transport) = loaded_context().await;

        ctx.filter_by_category("general");
        assert_eq!(transport.request_count(), 0);
        assert_eq!(
            ctx.view
                .snapshot()
                .posts_html
                .matches(r#"<article class="post-card""#)
                .count(),
            2
        );

        ctx.filter_by_category("Travel");
        assert!(ctx.view.snapshot().posts_html.contains("empty-state"));
    }

    #[tokio::test]
    async fn test_category_chip_matches_posts_referencing_its_id() {
        let (ctx, transport) = context();
        transport.respond(
            Method::Get,
            "/categories",
            json!({ "categories": [{ "_id": "c7", "name": "Cloud" }] }),
        );
        let mut by_id = post_json("p1", "Serverless", "u1", "ana");
        by_id["category"] = json!("c7");
        transport.respond(
            Method::Get,
            "/posts",
            json!([by_id, post_json("p2", "Cooking", "u2", "bo")]),
        );
        ctx.load_categories().await;
        ctx.load_posts().await;
        assert!(ctx.view.snapshot().categories_html.contains(r#"data-category="Cloud""#));

        ctx.dispatch(UiAction::FilterCategory("Cloud".to_string())).await;

        let html = ctx.view.snapshot().posts_html;
        assert!(html.contains("Serverless"));
        assert!(!html.contains("Cooking"));
    }
}

mod session {
    use super::*;

    #[tokio::test]
    async fn test_login_accepts_plain_id_field() {
        let (ctx, transport) = context();
        transport.respond(
            Method::Post,
            "/users/login",
            json!({ "user": { "id": 42, "username": "ana", "email": "ana@example.com" }, "token": "abc" }),
        );
        ctx.show_modal(Modal::Login);

        let outcome = ctx
            .handle_login(&LoginForm {
                email: " ana@example.com ".to_string(),
                password: "secret".to_string(),
            })
            .await;

        assert_eq!(outcome, Submission::Done);
        assert_eq!(ctx.session.user_id(), Some(RecordId::from("42")));
        assert_eq!(ctx.session.token().as_deref(), Some("abc"));
        assert!(!ctx.view.is_open(Modal::Login));
        assert!(ctx.view.snapshot().user_actions_html.contains("ana"));
        assert!(has_notification(&ctx, NotificationLevel::Success, "Signed in"));

        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(body, json!({ "email": "ana@example.com", "password": "secret" }));
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let (ctx, transport) = context();

        let outcome = ctx
            .handle_login(&LoginForm {
                email: "ana@example.com".to_string(),
                password: String::new(),
            })
            .await;

        assert_eq!(outcome, Submission::Rejected);
        assert_eq!(transport.request_count(), 0);
        assert!(!ctx.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_without_token_sends_no_bearer() {
        let (ctx, transport) = context();
        transport.respond(
            Method::Post,
            "/users/login",
            json!({ "user": { "_id": "u1", "username": "ana" } }),
        );
        transport.respond(Method::Get, "/posts", json!([]));

        let outcome = ctx
            .handle_login(&LoginForm {
                email: "ana@example.com".to_string(),
                password: "secret".to_string(),
            })
            .await;
        assert_eq!(outcome, Submission::Done);
        assert!(ctx.session.is_authenticated());

        ctx.load_posts().await;
        let requests = transport.requests();
        assert_eq!(path_of(&requests[1]), "/posts");
        assert_eq!(requests[1].header("Authorization"), None);
    }

    fn register_form() -> RegisterForm {
        RegisterForm {
            username: " ana ".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_requires_username() {
        let (ctx, transport) = context();
        ctx.show_modal(Modal::Register);

        let form = RegisterForm {
            username: "  ".to_string(),
            ..register_form()
        };
        assert_eq!(ctx.handle_register(&form).await, Submission::Rejected);

        assert_eq!(transport.request_count(), 0);
        assert!(ctx.view.is_open(Modal::Register));
        assert!(has_notification(
            &ctx,
            NotificationLevel::Warning,
            "Username, email and password are required"
        ));
    }

    #[tokio::test]
    async fn test_register_posts_and_closes_modal() {
        let (ctx, transport) = context();
        transport.respond(Method::Post, "/users/register", json!({ "message": "created" }));
        ctx.show_modal(Modal::Register);

        assert_eq!(ctx.handle_register(&register_form()).await, Submission::Done);

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(path_of(&requests[0]), "/users/register");
        assert_eq!(
            requests[0].body.clone().unwrap(),
            json!({ "username": "ana", "email": "ana@example.com", "password": "secret" })
        );
        assert!(!ctx.view.is_open(Modal::Register));
        assert!(has_notification(&ctx, NotificationLevel::Success, "Account created"));
    }

    #[tokio::test]
    async fn test_failed_register_keeps_modal_open() {
        let (ctx, transport) = context();
        transport.fail(Method::Post, "/users/register", 409);
        ctx.show_modal(Modal::Register);

        assert_eq!(ctx.handle_register(&register_form()).await, Submission::Failed);

        assert!(ctx.view.is_open(Modal::Register));
        assert!(has_notification(&ctx, NotificationLevel::Error, CONNECTION_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_chrome() {
        let (ctx, _transport) = context();
        sign_in(&ctx, "u1", "ana");
        ctx.render_user_chrome();

        ctx.dispatch(UiAction::Logout).await;

        assert!(!ctx.session.is_authenticated());
        assert!(ctx.view.snapshot().user_actions_html.contains("loginModal"));
        assert!(has_notification(&ctx, NotificationLevel::Success, "Signed out"));
    }
}

mod posts {
    use super::*;

    #[tokio::test]
    async fn test_create_with_missing_title_sends_nothing() {
        let (ctx, transport) = context();
        sign_in(&ctx, "u1", "ana");

        let form = PostForm {
            title: "   ".to_string(),
            ..valid_post_form()
        };
        let outcome = ctx.handle_create_post(&form).await;

        assert_eq!(outcome, Submission::Rejected);
        assert_eq!(transport.request_count(), 0);
        assert!(has_notification(
            &ctx,
            NotificationLevel::Warning,
            "Title and content are required"
        ));
    }

    #[tokio::test]
    async fn test_create_without_session_opens_login() {
        let (ctx, transport) = context();

        let outcome = ctx.handle_create_post(&valid_post_form()).await;

        assert_eq!(outcome, Submission::Rejected);
        assert_eq!(transport.request_count(), 0);
        assert!(ctx.view.is_open(Modal::Login));
        assert!(has_notification(
            &ctx,
            NotificationLevel::Warning,
            "You must sign in to create a post"
        ));
    }

    #[tokio::test]
    async fn test_create_posts_then_refetches() {
        let (ctx, transport) = context();
        sign_in(&ctx, "u1", "ana");
        transport.respond(Method::Post, "/posts/posts", json!({ "_id": "p9" }));
        transport.respond(Method::Get, "/posts", json!([post_json("p9", "Hello", "u1", "ana")]));
        ctx.show_modal(Modal::CreatePost);

        let outcome = ctx.handle_create_post(&valid_post_form()).await;

        assert_eq!(outcome, Submission::Done);
        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(
            body,
            json!({ "title": "Hello", "content": "First post", "author": "u1", "tags": ["rust", "web"] })
        );
        assert_eq!(transport.count(Method::Get, "/posts"), 1);
        assert!(!ctx.view.is_open(Modal::CreatePost));
        assert!(ctx.view.snapshot().posts_html.contains("Hello"));
    }

    #[tokio::test]
    async fn test_non_author_cannot_edit() {
        let (ctx, transport) = context();
        sign_in(&ctx, "u1", "ana");
        transport.respond(Method::Get, "/posts/p1", post_json("p1", "Theirs", "u2", "bo"));

        assert!(!ctx.begin_edit("p1").await);
        assert!(!ctx.view.is_open(Modal::EditPost));

        let form = EditPostForm {
            post_id: "p1".to_string(),
            post: valid_post_form(),
        };
        assert_eq!(ctx.handle_edit_post(&form).await, Submission::Rejected);

        assert_eq!(transport.count(Method::Put, "/posts/p1"), 0);
        assert!(has_notification(
            &ctx,
            NotificationLevel::Warning,
            "Only the author can edit this post"
        ));
    }

    #[tokio::test]
    async fn test_author_edit_prefills_and_saves() {
        let (ctx, transport) = context();
        sign_in(&ctx, "u1", "ana");
        transport.respond(Method::Get, "/posts/p1", post_json("p1", "Mine", "u1", "ana"));
        transport.respond(Method::Put, "/posts/p1", json!({ "_id": "p1" }));
        transport.respond(Method::Get, "/posts", json!([]));

        assert!(ctx.begin_edit("p1").await);
        let draft = ctx.view.snapshot().edit_draft.unwrap();
        assert_eq!(draft.title, "Mine");
        assert_eq!(draft.category, "c1");
        assert_eq!(draft.tags, "rust");
        assert!(ctx.view.is_open(Modal::EditPost));

        let mut form = EditPostForm::from(draft);
        form.post.title = "Mine, revised".to_string();
        assert_eq!(ctx.handle_edit_post(&form).await, Submission::Done);

        assert_eq!(transport.count(Method::Put, "/posts/p1"), 1);
        assert!(!ctx.view.is_open(Modal::EditPost));
        assert!(ctx.view.snapshot().edit_draft.is_none());
    }

    #[tokio::test]
    async fn test_non_author_cannot_delete() {
        let (ctx, transport) = context();
        sign_in(&ctx, "u1", "ana");
        transport.respond(Method::Get, "/posts/p1", post_json("p1", "Theirs", "u2", "bo"));

        ctx.dispatch(UiAction::DeletePost("p1".to_string())).await;

        assert_eq!(transport.count(Method::Delete, "/posts/p1"), 0);
        assert!(has_notification(
            &ctx,
            NotificationLevel::Warning,
            "Only the author can delete this post"
        ));
    }

    #[tokio::test]
    async fn test_author_delete_refetches() {
        let (ctx, transport) = context();
        sign_in(&ctx, "u1", "ana");
        transport.respond(Method::Get, "/posts/p1", post_json("p1", "Mine", "u1", "ana"));
        transport.respond(Method::Delete, "/posts/p1", json!({ "message": "deleted" }));
        transport.respond(Method::Get, "/posts", json!([]));

        assert_eq!(ctx.delete_post("p1").await, Submission::Done);
        assert_eq!(transport.count(Method::Delete, "/posts/p1"), 1);
        assert_eq!(transport.count(Method::Get, "/posts"), 1);
        assert!(has_notification(&ctx, NotificationLevel::Success, "Post deleted"));
    }
}

mod chat {
    use super::*;

    #[tokio::test]
    async fn test_empty_message_is_silently_dropped() {
        let (ctx, transport) = context();
        sign_in(&ctx, "u1", "ana");

        assert_eq!(ctx.send_message("   ").await, Submission::Rejected);
        assert_eq!(transport.request_count(), 0);
        assert!(notifications(&ctx).is_empty());
    }

    #[tokio::test]
    async fn test_message_requires_session() {
        let (ctx, transport) = context();

        assert_eq!(ctx.send_message("hello").await, Submission::Rejected);
        assert_eq!(transport.request_count(), 0);
        assert!(has_notification(
            &ctx,
            NotificationLevel::Warning,
            "You must sign in to send messages"
        ));
    }

    #[tokio::test]
    async fn test_message_posts_then_reloads() {
        let (ctx, transport) = context();
        sign_in(&ctx, "u1", "ana");
        transport.respond(Method::Post, "/messages", json!({ "_id": "m2" }));
        transport.respond(
            Method::Get,
            "/messages",
            json!({ "messages": [{ "_id": "m2", "content": "hello", "sender": { "_id": "u1", "username": "ana" } }] }),
        );

        assert_eq!(ctx.send_message(" hello ").await, Submission::Done);

        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(body, json!({ "content": "hello", "sender": "u1" }));
        assert_eq!(transport.count(Method::Get, "/messages"), 1);
        assert!(ctx.view.snapshot().messages_html.contains("hello"));
    }

    #[tokio::test]
    async fn test_simulation_tick_stays_local() {
        let (ctx, transport) = context();
        let mut rng = StepRng::new(0, 0);

        assert!(simulation::tick(&ctx, &mut rng));

        assert_eq!(transport.request_count(), 0);
        assert_eq!(ctx.cache.messages().len(), 1);
        assert!(ctx.view.snapshot().messages_html.contains("message synthetic"));
    }
}

mod navigation {
    use super::*;

    #[tokio::test]
    async fn test_modals_open_and_close() {
        let (ctx, _transport) = context();

        ctx.dispatch(UiAction::OpenModal(Modal::Register)).await;
        ctx.show_modal(Modal::CreatePost);
        assert!(ctx.view.is_open(Modal::Register));
        assert!(ctx.view.is_open(Modal::CreatePost));

        ctx.dispatch(UiAction::CloseModals).await;
        assert!(ctx.view.snapshot().open_modals.is_empty());
    }

    #[test]
    fn test_section_switch_bumps_revision() {
        let (ctx, _transport) = context();
        let before = ctx.view.revision();

        ctx.show_section(Section::Chat);

        assert_eq!(ctx.view.snapshot().section, Section::Chat);
        assert!(ctx.view.revision() > before);
    }
}
