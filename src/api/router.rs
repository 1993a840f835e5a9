use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::halomod;
use super::health;
use super::middleware::session_identity;
use super::state::AppState;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/halomod", halomod::create_halomod_router())
        .layer(middleware::from_fn(session_identity))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::create_app_state;

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let router = create_router(create_app_state());
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("healthy"));
    }

    #[tokio::test]
    async fn test_fresh_request_issues_session_cookie() {
        let router = create_router(create_app_state());
        let response = router
            .oneshot(Request::get("/halomod").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("halomod_session="));
        assert!(body_string(response).await.contains("default"));
    }

    #[tokio::test]
    async fn test_cookie_reuses_session_across_requests() {
        let router = create_router(create_app_state());

        let first = router
            .clone()
            .oneshot(Request::get("/halomod").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let cookie = first.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        let create = router
            .clone()
            .oneshot(
                Request::post("/halomod/create")
                    .header(header::COOKIE, &cookie)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"label":"high-z","z":"2.0"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(create.status(), StatusCode::OK);
        // A known session is never re-issued a cookie.
        assert!(create.headers().get(header::SET_COOKIE).is_none());

        let second = router
            .oneshot(
                Request::get("/halomod")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_string(second).await;
        assert!(body.contains("default"));
        assert!(body.contains("high-z"));
    }
}
