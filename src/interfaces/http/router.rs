//! API Router with Swagger UI

use axum::{
    handler::Handler,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{CorsConfig, RateLimitConfig};
use crate::interfaces::http::common::ErrorResponse;
use crate::interfaces::http::dto::{MemberDto, MessageResponse, PresenceDto, UserDto};
use crate::interfaces::http::middleware::{auth_middleware, require_admin, require_berger};
use crate::interfaces::http::modules::metrics::{
    http_metrics_middleware, prometheus_metrics, MetricsState,
};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::{
    admin, auth, berger, departments, health, members, presence,
};
use crate::interfaces::http::state::AppState;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Root & health
        health::root,
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::profile,
        auth::change_password,
        // Members
        members::create_member,
        members::my_members,
        members::search_members,
        members::get_member,
        members::update_member,
        members::all_members,
        members::delete_member,
        members::list_users,
        members::delete_user,
        members::update_user_role,
        members::export_members_csv,
        members::export_users_csv,
        members::export_members_json,
        members::export_users_json,
        // Berger
        berger::dashboard,
        berger::members,
        berger::stats,
        berger::export_pdf,
        // Presence
        presence::record,
        presence::by_date,
        presence::mark_all,
        presence::report,
        presence::report_pdf,
        presence::stats,
        presence::member_history,
        // Admin
        admin::presences_by_date,
        admin::member_presences,
        admin::service_stats,
        admin::export_daily_pdf,
        admin::weekly_data,
        admin::weekly_pdf,
        admin::export_summary_pdf,
        // Services
        departments::list_departments,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            MemberDto,
            UserDto,
            PresenceDto,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::ChangePasswordRequest,
            auth::AuthResponse,
            auth::ProfileResponse,
            auth::UserInfo,
            members::CreateMemberRequest,
            members::UpdateMemberRequest,
            members::UpdateRoleRequest,
            members::MemberResponse,
            members::MyMembersResponse,
            members::AllMembersResponse,
            members::UsersResponse,
            members::SearchResponse,
            berger::DashboardResponse,
            berger::DepartmentMembersResponse,
            berger::DepartmentStatsResponse,
            presence::RecordPresenceRequest,
            presence::MarkAllRequest,
            presence::ReportResponse,
            presence::PeriodStatsResponse,
            admin::AdminDateResponse,
            admin::AdminMemberResponse,
            admin::ServiceStatsResponse,
            admin::WeeklyDataResponse,
            departments::DepartmentsResponse,
            health::HealthResponse,
            health::RootResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "API banner and health check"),
        (name = "Authentication", description = "Registration, login and profile"),
        (name = "Members", description = "Church members"),
        (name = "Users", description = "Account administration"),
        (name = "Exports", description = "CSV and JSON exports"),
        (name = "Berger", description = "Department workspace of a berger"),
        (name = "Presence", description = "Attendance taken by bergers"),
        (name = "Admin presence", description = "Cross-department attendance and reports"),
        (name = "Departments", description = "Department catalogue"),
    ),
    info(
        title = "Mega-Data API",
        version = "2.2.0",
        description = "Gestion des membres d'église: membres, services, présences et rapports",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Cross-cutting settings of the router.
#[derive(Clone, Default)]
pub struct RouterOptions {
    pub cors: CorsConfig,
    pub production: bool,
    pub rate_limit: RateLimitConfig,
    /// `/metrics` is only mounted when a recorder handle is given
    pub metrics: Option<PrometheusHandle>,
}

/// Whether a browser origin may call the API.
pub fn origin_allowed(origin: &str, cors: &CorsConfig, production: bool) -> bool {
    if !production {
        return true;
    }
    if cors.allowed_origins.iter().any(|allowed| allowed == origin) {
        return true;
    }
    cors.allow_vercel_previews && origin.starts_with("https://") && origin.ends_with(".vercel.app")
}

fn cors_layer(cors: &CorsConfig, production: bool) -> CorsLayer {
    let cors = cors.clone();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts| {
                let allowed = origin
                    .to_str()
                    .map(|o| origin_allowed(o, &cors, production))
                    .unwrap_or(false);
                if !allowed {
                    warn!(origin = ?origin, "CORS origin refused");
                }
                allowed
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Create the API router with all routes
pub fn create_api_router(state: AppState, options: RouterOptions) -> Router {
    let auth_layer = middleware::from_fn_with_state(state.auth.clone(), auth_middleware);

    // Auth routes (public), throttled per peer address
    let mut auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));
    if options.rate_limit.enabled {
        match GovernorConfigBuilder::default()
            .per_second(options.rate_limit.per_second)
            .burst_size(options.rate_limit.burst_size)
            .finish()
        {
            Some(governor) => {
                info!(
                    per_second = options.rate_limit.per_second,
                    burst_size = options.rate_limit.burst_size,
                    "Login rate limiting enabled"
                );
                auth_routes = auth_routes.layer(GovernorLayer::new(governor));
            }
            None => warn!("Invalid rate limit settings, login rate limiting disabled"),
        }
    }

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/profile", get(auth::profile))
        .route("/change-password", put(auth::change_password))
        .route_layer(auth_layer.clone());

    // Member routes; the admin-only ones carry their own gate
    let member_admin_routes = Router::new()
        .route("/all", get(members::all_members))
        .route("/users", get(members::list_users))
        .route("/users/{id}", axum::routing::delete(members::delete_user))
        .route("/users/{id}/role", put(members::update_user_role))
        .route("/export/csv/members", get(members::export_members_csv))
        .route("/export/csv/users", get(members::export_users_csv))
        .route("/export/json/members", get(members::export_members_json))
        .route("/export/json/users", get(members::export_users_json))
        .route_layer(middleware::from_fn(require_admin));

    let member_routes = Router::new()
        .route("/", post(members::create_member))
        .route("/my-members", get(members::my_members))
        .route("/search", get(members::search_members))
        .route(
            "/{id}",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member.layer(middleware::from_fn(require_admin))),
        )
        .merge(member_admin_routes)
        .route_layer(auth_layer.clone());

    // Berger workspace
    let berger_routes = Router::new()
        .route("/dashboard", get(berger::dashboard))
        .route("/members", get(berger::members))
        .route("/stats", get(berger::stats))
        .route("/export/pdf", get(berger::export_pdf))
        .route_layer(middleware::from_fn(require_berger))
        .route_layer(auth_layer.clone());

    // Attendance taken by bergers
    let presence_routes = Router::new()
        .route("/record", post(presence::record))
        .route("/date/{date}", get(presence::by_date))
        .route("/mark-all", post(presence::mark_all))
        .route("/report/{date}", get(presence::report))
        .route("/report/{date}/pdf", get(presence::report_pdf))
        .route("/stats", get(presence::stats))
        .route("/member/{id}/history", get(presence::member_history))
        .route_layer(middleware::from_fn(require_berger))
        .route_layer(auth_layer.clone());

    // Administration: cross-department attendance and reports
    let admin_routes = Router::new()
        .route("/presence/date/{date}", get(admin::presences_by_date))
        .route("/presence/member/{id}", get(admin::member_presences))
        .route("/presence/stats/service", get(admin::service_stats))
        .route("/presence/export/pdf/{date}", get(admin::export_daily_pdf))
        .route("/presence/export/weekly-pdf", get(admin::weekly_data))
        .route("/weekly/export/weekly-pdf", get(admin::weekly_pdf))
        .route("/export/pdf", get(admin::export_summary_pdf))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(auth_layer.clone());

    let service_routes = Router::new()
        .route("/", get(departments::list_departments))
        .route_layer(auth_layer);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    let mut router = Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Root & health
        .route("/", get(health::root))
        .route("/api/health", get(health::health_check))
        // Auth
        .nest("/api/auth", auth_routes)
        .nest("/api/auth", auth_protected_routes)
        // Members
        .nest("/api/members", member_routes)
        // Berger
        .nest("/api/berger", berger_routes)
        // Presence
        .nest("/api/presence", presence_routes)
        // Admin
        .nest("/api/admin", admin_routes)
        // Services
        .nest("/api/services", service_routes)
        // Matched routes only, so the path label is the route template
        .route_layer(middleware::from_fn(http_metrics_middleware))
        .with_state(state);

    if let Some(handle) = options.metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors_layer(&options.cors, options.production))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::{RepositoryProvider, Role, User};
    use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
    use crate::interfaces::http::modules::request_id::REQUEST_ID_HEADER;
    use crate::test_support::{insert_member, insert_user, memory_db, TEST_PASSWORD};

    struct TestApp {
        router: Router,
        repos: Arc<dyn RepositoryProvider>,
        jwt: JwtConfig,
    }

    impl TestApp {
        async fn new() -> Self {
            let jwt = JwtConfig {
                secret: "router-test-secret".into(),
                ..JwtConfig::default()
            };
            let state = AppState::new(memory_db().await, jwt.clone(), "test");
            let repos = state.repos.clone();
            let options = RouterOptions {
                rate_limit: RateLimitConfig {
                    enabled: false,
                    ..RateLimitConfig::default()
                },
                ..RouterOptions::default()
            };
            Self {
                router: create_api_router(state, options),
                repos,
                jwt,
            }
        }

        fn token(&self, user: &User) -> String {
            create_token(user, &self.jwt).unwrap()
        }

        async fn call(
            &self,
            method: &str,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header("authorization", format!("Bearer {}", token));
            }
            let request = match body {
                Some(body) => builder
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, json)
        }
    }

    #[tokio::test]
    async fn root_and_health_are_public() {
        let app = TestApp::new().await;

        let (status, json) = app.call("GET", "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "online");
        assert_eq!(json["endpoints"]["presence"], "/api/presence");

        let (status, json) = app.call("GET", "/api/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["database"]["status"], "healthy");
        assert!(json["tables"]
            .as_array()
            .unwrap()
            .iter()
            .any(|t| t == "membres"));
    }

    #[tokio::test]
    async fn register_login_and_profile() {
        let app = TestApp::new().await;
        let credentials = json!({
            "username": "jean",
            "password": "secret1",
            "nom": "Kouadio",
            "prenom": "Jean",
            "branche": "Yopougon"
        });

        let (status, json) = app
            .call("POST", "/api/auth/register", None, Some(credentials.clone()))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["user"]["role"], "member");

        let (status, json) = app
            .call("POST", "/api/auth/register", None, Some(credentials))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);

        let (status, _) = app
            .call(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({"login": "jean", "password": "wrong-password"})),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, json) = app
            .call(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({"username": "jean", "password": "secret1"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let token = json["token"].as_str().unwrap().to_string();

        let (status, json) = app.call("GET", "/api/auth/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["user"]["username"], "jean");
        assert_eq!(json["user"]["branche"], "Yopougon");
    }

    #[tokio::test]
    async fn protected_routes_require_token_and_role() {
        let app = TestApp::new().await;
        let member = insert_user(&app.repos, "simple", Role::Member, None).await;
        let token = app.token(&member);

        let (status, json) = app.call("GET", "/api/members/my-members", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "Accès refusé. Token manquant.");

        let (status, json) = app.call("GET", "/api/members/all", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Accès interdit. Rôle insuffisant.");

        let (status, _) = app.call("GET", "/api/berger/dashboard", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app.call("DELETE", "/api/members/1", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app.call("GET", "/api/members/my-members", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn berger_takes_attendance() {
        let app = TestApp::new().await;
        let berger = insert_user(&app.repos, "berger COM", Role::Berger, Some("Communication")).await;
        let token = app.token(&berger);

        let (status, json) = app
            .call(
                "POST",
                "/api/members",
                Some(&token),
                Some(json!({
                    "nom": "Yao",
                    "prenom": "Marc",
                    "numero": "0102030405",
                    "quartier": "Cocody",
                    "service": "Communication"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let marc = json["member"]["id"].as_i64().unwrap();
        insert_member(&app.repos, &berger, "Konan", "Communication").await;

        let (status, _) = app
            .call(
                "POST",
                "/api/presence/record",
                Some(&token),
                Some(json!({"membre_id": marc, "date": "2025-03-02", "present": false})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = app
            .call("GET", "/api/presence/report/2025-03-02", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 2);
        assert_eq!(json["absents"], 1);
        assert_eq!(json["non_marques"], 1);

        let (status, _) = app
            .call("GET", "/api/presence/report/02-03-2025", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn member_updates_are_checked() {
        let app = TestApp::new().await;
        let berger = insert_user(&app.repos, "berger COM", Role::Berger, Some("Communication")).await;
        let token = app.token(&berger);
        let member = insert_member(&app.repos, &berger, "Yao", "Communication").await;
        let uri = format!("/api/members/{}", member.id);

        let (status, json) = app
            .call("PUT", &uri, Some(&token), Some(json!({"nom": "Yao", "user_id": 7})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Champs non autorisés: user_id");

        let (status, json) = app
            .call("PUT", &uri, Some(&token), Some(json!({"service": "Protocole"})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["success"], false);

        let (status, json) = app
            .call("PUT", &uri, Some(&token), Some(json!({"quartier": "Plateau"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["member"]["quartier"], "Plateau");
        assert_eq!(json["member"]["service"], "Communication");
    }

    #[tokio::test]
    async fn berger_without_department_is_rejected() {
        let app = TestApp::new().await;
        let berger = insert_user(&app.repos, "berger libre", Role::Berger, None).await;
        let token = app.token(&berger);

        for uri in ["/api/berger/dashboard", "/api/berger/members", "/api/presence/stats"] {
            let (status, json) = app.call("GET", uri, Some(&token), None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(json["message"], "Aucun service assigné à ce berger", "{uri}");
        }
    }

    #[tokio::test]
    async fn presence_history_and_stats_edges() {
        let app = TestApp::new().await;
        let berger = insert_user(&app.repos, "berger COM", Role::Berger, Some("Communication")).await;
        let token = app.token(&berger);

        let (status, json) = app
            .call("GET", "/api/presence/member/9999/history", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);

        let (status, _) = app
            .call("GET", "/api/presence/stats?endDate=-262143-01-05", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .call("GET", "/api/presence/stats?endDate=2025-03-31", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn search_is_capped() {
        let app = TestApp::new().await;
        let admin = insert_user(&app.repos, "admin", Role::Admin, None).await;
        let token = app.token(&admin);
        for i in 0..105 {
            insert_member(&app.repos, &admin, &format!("Membre{i}"), "Communication").await;
        }

        let (status, json) = app
            .call("GET", "/api/members/search?service=COM", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 100);
        assert_eq!(json["membres"].as_array().unwrap().len(), 100);

        let (status, _) = app.call("GET", "/api/members/search", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn berger_pdfs_are_served() {
        let app = TestApp::new().await;
        let berger = insert_user(&app.repos, "berger COM", Role::Berger, Some("Communication")).await;
        let token = app.token(&berger);
        insert_member(&app.repos, &berger, "Yao", "Communication").await;

        for uri in ["/api/berger/export/pdf", "/api/presence/report/2025-03-02/pdf"] {
            let request = Request::builder()
                .uri(uri)
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap();
            let response = app.router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            assert!(bytes.starts_with(b"%PDF"), "{uri}");
        }
    }

    #[tokio::test]
    async fn admin_reports() {
        let app = TestApp::new().await;
        let admin = insert_user(&app.repos, "admin", Role::Admin, None).await;
        let token = app.token(&admin);

        let (status, json) = app
            .call("GET", "/api/admin/weekly/export/weekly-pdf", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Les dates de début et de fin sont requises");

        let (status, _) = app
            .call("GET", "/api/admin/presence/export/pdf/2025-03-02", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, json) = app.call("GET", "/api/members/users", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);

        let request = Request::builder()
            .uri("/api/members/export/csv/users")
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv"));
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let app = TestApp::new().await;
        let request = Request::builder()
            .uri("/api/health")
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc-123");

        let login = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"login": "nobody", "password": TEST_PASSWORD}).to_string(),
            ))
            .unwrap();
        let response = app.router.clone().oneshot(login).await.unwrap();
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[test]
    fn openapi_documents_member_update_as_object() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schema = &doc["components"]["schemas"]["UpdateMemberRequest"];
        assert_eq!(schema["type"], "object");
        assert!(doc["paths"]["/api/members/{id}"]["put"].is_object());
    }

    #[test]
    fn cors_origins() {
        let cors = CorsConfig::default();
        assert!(origin_allowed("http://evil.example", &cors, false));
        assert!(origin_allowed("https://mega-data.vercel.app", &cors, true));
        assert!(origin_allowed("https://mega-data-git-main.vercel.app", &cors, true));
        assert!(!origin_allowed("http://preview.vercel.app", &cors, true));
        assert!(!origin_allowed("http://evil.example", &cors, true));

        let strict = CorsConfig {
            allow_vercel_previews: false,
            ..CorsConfig::default()
        };
        assert!(!origin_allowed("https://mega-data-git-main.vercel.app", &strict, true));
    }
}
