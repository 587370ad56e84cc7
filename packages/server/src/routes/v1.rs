use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/search", search_routes())
        .nest("/students", student_routes(config))
        .nest("/site-config", site_config_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
        .routes(routes!(handlers::auth::session))
}

fn search_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::search::search))
}

fn student_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let crud = OpenApiRouter::new()
        .routes(routes!(
            handlers::student::list_students,
            handlers::student::create_student,
            handlers::student::delete_all_students
        ))
        .routes(routes!(
            handlers::student::get_student,
            handlers::student::update_student,
            handlers::student::delete_student
        ))
        .routes(routes!(handlers::import::download_template));

    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::import::import_students))
        .layer(handlers::import::upload_body_limit(
            config.import.max_upload_bytes,
        ));

    crud.merge(upload)
}

fn site_config_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        handlers::site_config::get_site_config,
        handlers::site_config::update_site_config
    ))
}
