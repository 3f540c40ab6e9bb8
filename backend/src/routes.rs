use std::io::Write;
use std::path::{Path, PathBuf};

use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use futures::{StreamExt, TryStreamExt};
use log::{error, info};
use serde_json::json;
use shared::PredictionResponse;

use crate::config::AppConfig;
use crate::diagnosis;
use crate::error::InferenceError;
use crate::inference::model::Classifier;
use crate::inference::preprocess;

const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: String) {
    cfg.service(web::resource("/api/predict").route(web::post().to(handle_predict)))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(Files::new("/", frontend_dir).index_file("index.html"));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Extension gate applied before any byte of the upload is processed.
pub fn allowed_file(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn validate_extension(filename: &str) -> crate::error::Result<()> {
    if allowed_file(filename) {
        Ok(())
    } else {
        Err(InferenceError::UnsupportedExtension(filename.to_string()))
    }
}

/// Keeps ASCII alphanumerics, dots, dashes and underscores; everything else
/// becomes an underscore. Leading separator characters are stripped so the
/// result can never escape the upload directory.
pub fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_start_matches(['.', '_', '-']).to_string()
}

async fn handle_predict(
    classifier: web::Data<Classifier>,
    config: web::Data<AppConfig>,
    mut payload: Multipart,
) -> Result<HttpResponse, Error> {
    let mut file_field_found = false;
    let mut filename: Option<String> = None;
    let mut image_data: Vec<u8> = Vec::new();

    while let Ok(Some(mut field)) = payload.try_next().await {
        let Some(disposition) = field.content_disposition() else {
            continue;
        };
        if disposition.get_name() != Some("file") {
            continue;
        }
        file_field_found = true;
        filename = disposition.get_filename().map(str::to_string);

        while let Some(chunk) = field.next().await {
            let data = chunk?;
            image_data.write_all(&data)?;
        }
        break;
    }

    if !file_field_found {
        return Ok(HttpResponse::BadRequest().body("No file part"));
    }
    let filename = filename.unwrap_or_default();
    if filename.is_empty() {
        return Ok(HttpResponse::BadRequest().body("No selected file"));
    }
    if let Err(e) = validate_extension(&filename) {
        info!("Rejected upload: {}", e);
        return Ok(HttpResponse::BadRequest()
            .body("Unable to read the file. Please check the file extension"));
    }

    // Single shared namespace: identical filenames overwrite each other.
    let file_path = PathBuf::from(&config.server.upload_dir).join(sanitize_filename(&filename));
    std::fs::write(&file_path, &image_data)?;
    info!("Saved upload to {}", file_path.display());

    let tensor = match preprocess::preprocess(&file_path, &config.image) {
        Ok(tensor) => tensor,
        Err(e) => {
            error!("Preprocessing failed for {}: {}", file_path.display(), e);
            return Ok(
                HttpResponse::InternalServerError().body(format!("Image decode error: {}", e))
            );
        }
    };

    match classifier.classify(&tensor) {
        Ok(prediction) => {
            info!(
                "Predicted class {} ({}) at {:.1}%",
                prediction.class_index, prediction.record.name, prediction.confidence
            );
            let response = PredictionResponse {
                class_index: prediction.class_index,
                class_labels: diagnosis::class_names(),
                probabilities: prediction.probabilities.clone(),
                confidence: prediction.confidence,
                diagnosis: prediction.record.to_info(),
            };
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            error!("Model inference error: {}", e);
            Ok(HttpResponse::InternalServerError().body(format!("Model inference error: {}", e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        assert!(allowed_file("fundus.jpg"));
        assert!(allowed_file("fundus.jpeg"));
        assert!(allowed_file("fundus.png"));
        assert!(allowed_file("FUNDUS.PNG"));
        assert!(allowed_file("scan.left-eye.jpeg"));
    }

    #[test]
    fn test_rejected_extensions() {
        assert!(!allowed_file("fundus.gif"));
        assert!(!allowed_file("fundus.tiff"));
        assert!(!allowed_file("fundus"));
        assert!(!allowed_file("archive.tar.gz"));
        assert!(!allowed_file(""));
    }

    #[test]
    fn test_validate_extension_error() {
        assert!(validate_extension("fundus.png").is_ok());
        let err = validate_extension("fundus.bmp").unwrap_err();
        assert!(matches!(err, InferenceError::UnsupportedExtension(_)));
    }

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename("fundus_01.png"), "fundus_01.png");
        assert_eq!(sanitize_filename("left-eye.jpeg"), "left-eye.jpeg");
    }

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("/tmp/evil.png"), "tmp_evil.png");
        assert_eq!(sanitize_filename("a b\\c.jpg"), "a_b_c.jpg");
    }
}
