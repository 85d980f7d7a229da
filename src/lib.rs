// Library exports for integration tests and the binary

pub mod api;
pub mod app_data;
pub mod audit;
pub mod cli;
pub mod config;
pub mod coordinators;
pub mod errors;
pub mod integrations;
pub mod providers;
pub mod stores;
pub mod types;

#[cfg(test)]
pub mod test;

use std::sync::Arc;

use poem::middleware::Tracing;
use poem::{Endpoint, EndpointExt, Route};
use poem_openapi::OpenApiService;

use crate::api::{HealthApi, StaffApi};
use crate::app_data::AppData;
use crate::coordinators::StaffCoordinator;

/// Compose the HTTP application
///
/// API endpoints are nested under `/api`, Swagger UI under `/swagger`.
/// The returned endpoint owns everything it uses, so `server_url` may be dropped.
pub fn build_app(app_data: Arc<AppData>, server_url: &str) -> impl Endpoint + use<> {
    let staff_api = StaffApi::new(
        Arc::new(StaffCoordinator::new(app_data.clone())),
        app_data.token_provider.clone(),
    );
    let health_api = HealthApi::new(app_data.backend);

    let api_service = OpenApiService::new((health_api, staff_api), "Assistly Staff API", env!("CARGO_PKG_VERSION"))
        .server(format!("{}/api", server_url));
    let ui = api_service.swagger_ui();

    Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui)
        .with(Tracing)
}

#[cfg(test)]
mod tests {
    use poem::http::{Method, StatusCode, Uri};
    use poem::Request;

    use super::*;
    use crate::config::{BootstrapSettings, DatabaseConnections, MockEnvironment, SecretManager};
    use crate::test::utils::{TEST_JWT_SECRET, TEST_PEPPER};

    async fn local_app_data() -> Arc<AppData> {
        let env = Arc::new(
            MockEnvironment::empty()
                .with_var("IDENTITY_DATABASE_URL", "sqlite::memory:")
                .with_var("PROFILE_DATABASE_URL", "sqlite::memory:")
                .with_var("AUDIT_DATABASE_URL", "sqlite::memory:")
                .with_var("JWT_SECRET", TEST_JWT_SECRET)
                .with_var("PASSWORD_PEPPER", TEST_PEPPER),
        );
        let settings = BootstrapSettings::from_env_provider(env.clone()).unwrap();
        let secret_manager = Arc::new(SecretManager::from_env_provider(env, settings.backend()).unwrap());
        let connections = DatabaseConnections::connect(&settings).await.unwrap();
        connections.migrate().await.unwrap();

        Arc::new(AppData::init(&settings, connections, secret_manager).unwrap())
    }

    fn assert_static<T: 'static>(_: &T) {}

    #[tokio::test]
    async fn test_app_outlives_server_url_and_serves_health() {
        let app_data = local_app_data().await;

        let app = {
            let server_url = format!("http://localhost:{}", 3000);
            build_app(app_data, &server_url)
        };
        assert_static(&app);

        let response = app
            .get_response(Request::builder().uri(Uri::from_static("/api/health")).finish())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_staff_endpoint_requires_bearer_token() {
        let app = build_app(local_app_data().await, "http://localhost:3000");

        let response = app
            .get_response(
                Request::builder()
                    .method(Method::POST)
                    .uri(Uri::from_static("/api/staff/delete"))
                    .content_type("application/json")
                    .body(r#"{"uid":"u1"}"#),
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
