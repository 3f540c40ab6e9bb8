mod config;
mod diagnosis;
mod error;
mod inference;
mod routes;

use std::env;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};

use config::AppConfig;
use inference::model::{Classifier, FundusModel};
use routes::configure_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let frontend_dir = if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        format!("{}/../frontend/dist", manifest_dir)
    } else {
        "/usr/src/app/frontend/dist".to_string()
    };

    let mut app_config = AppConfig::load().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Config loading failed: {:?}", e),
        )
    })?;
    if let Ok(model_path) = env::var("MODEL_PATH") {
        app_config.model.path = model_path;
    }
    if let Ok(upload_dir) = env::var("UPLOAD_DIR") {
        app_config.server.upload_dir = upload_dir;
    }

    std::fs::create_dir_all(&app_config.server.upload_dir)?;

    let model = match FundusModel::load(&app_config.model.path) {
        Ok(model) => {
            log::info!("Model loaded from {}", app_config.model.path);
            model
        }
        Err(e) => {
            log::error!("Failed to preload model at startup: {:?}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Model loading failed: {:?}", e),
            ));
        }
    };
    log::info!(
        "Serving {} diagnosis classes, {}-element model input",
        app_config.model.classes,
        app_config.image.element_count()
    );
    if app_config.model.classes != diagnosis::class_count() {
        log::warn!(
            "Configured class count {} differs from diagnosis table size {}",
            app_config.model.classes,
            diagnosis::class_count()
        );
    }

    let classifier = web::Data::new(Classifier::new(model));
    let app_config = web::Data::new(app_config);

    let port = env::var("PORT").unwrap_or_else(|_| "8081".to_string());
    let bind_address = format!("0.0.0.0:{}", port);

    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(classifier.clone())
            .app_data(app_config.clone())
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
