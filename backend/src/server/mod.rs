//! Server construction and route wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::{Runtime, build_runtime};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use poi_sync::inbound::http::health::{HealthState, live, ready};
use poi_sync::inbound::http::position::{get_position, update_position};
use poi_sync::inbound::http::resources::{
    delete_resource, get_resource, list_collections, list_resources, set_resource,
};
use poi_sync::inbound::http::state::HttpState;
use poi_sync::inbound::ws;
use poi_sync::inbound::ws::state::WsState;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        ws_state,
    } = deps;

    let api = web::scope("/api/v1")
        .service(get_position)
        .service(update_position);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(ws_state)
        .service(api)
        .service(list_collections)
        .service(list_resources)
        .service(get_resource)
        .service(set_resource)
        .service(delete_resource)
        .service(ws::telemetry_stream)
        .service(ready)
        .service(live)
}

/// Construct an Actix HTTP server over the prepared adapter states.
///
/// Readiness is flagged once the listener is bound.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    runtime: &Runtime,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state: web::Data::new(runtime.http_state.clone()),
        ws_state: web::Data::new(runtime.ws_state.clone()),
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use poi_sync::PoiSyncSettings;
    use serde_json::Value;
    use std::net::SocketAddr;

    fn runtime() -> Runtime {
        build_runtime(&PoiSyncSettings::default()).expect("runtime builds")
    }

    #[actix_web::test]
    async fn wires_every_route() {
        let runtime = runtime();
        let app = test::init_service(build_app(AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: web::Data::new(runtime.http_state.clone()),
            ws_state: web::Data::new(runtime.ws_state.clone()),
        }))
        .await;

        let names: Vec<String> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/signalk/v2/api/resources")
                .to_request(),
        )
        .await;
        assert_eq!(names, vec!["notes".to_owned()]);

        let listing: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/signalk/v2/api/resources/notes")
                .to_request(),
        )
        .await;
        assert_eq!(listing, serde_json::json!({}));

        let position = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/navigation/position")
                .to_request(),
        )
        .await;
        assert_eq!(position.status(), StatusCode::NOT_FOUND);

        let ready_response = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(ready_response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn create_server_marks_ready() {
        let health_state = web::Data::new(HealthState::new());
        let config = ServerConfig::new(SocketAddr::from(([127, 0, 0, 1], 0)));

        let _server =
            create_server(health_state.clone(), &runtime(), config).expect("server binds");

        assert!(health_state.is_ready());
    }

    #[::core::prelude::v1::test]
    fn invalid_base_url_fails_runtime_construction() {
        let settings = PoiSyncSettings {
            api_base_url: Some("not a url".to_owned()),
            ..PoiSyncSettings::default()
        };
        assert!(build_runtime(&settings).is_err());
    }
}
