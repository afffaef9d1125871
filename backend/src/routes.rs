use actix_files::{Files, NamedFile};
use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{Error, HttpResponse, web};
use futures::{StreamExt, TryStreamExt};
use log::{debug, error, info, warn};
use shared::{ErrorResponse, HealthResponse, ParseFailureResponse, RatingResponse};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::rating::parser::ParseError;
use crate::rating::service::{RatingError, RatingService};

const IMAGE_FIELD: &str = "image";

pub fn configure_routes(cfg: &mut web::ServiceConfig, static_dir: String) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/health").route(web::get().to(health)))
        .service(web::resource("/rate_image").route(web::post().to(rate_image)))
        .service(Files::new("/static", static_dir));
}

async fn index(config: web::Data<AppConfig>) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open(config.server.static_dir.join("index.html"))?)
}

async fn health(service: web::Data<RatingService>) -> HttpResponse {
    let references = service.references();
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        references_loaded: references.len(),
        reference_files: references.file_names(),
        ready: references.is_ready(),
    })
}

enum Upload {
    Image(Vec<u8>),
    Missing,
    EmptyFilename,
    TooLarge,
}

/// Finds the first `image` file field. Fields without a filename are plain form
/// values and do not count as an upload, and neither does a non-multipart body.
async fn read_upload(mut payload: Multipart, max_bytes: usize) -> Result<Upload, Error> {
    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(Upload::Missing),
            Err(
                e @ (MultipartError::ContentTypeMissing
                | MultipartError::ContentTypeParse
                | MultipartError::ContentTypeIncompatible),
            ) => {
                debug!("Request body is not multipart: {}", e);
                return Ok(Upload::Missing);
            }
            Err(e) => return Err(e.into()),
        };
        let filename = match upload_filename(&field) {
            Some(filename) => filename,
            None => {
                drain(&mut field).await?;
                continue;
            }
        };
        if filename.is_empty() {
            return Ok(Upload::EmptyFilename);
        }

        let mut image_data = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            if image_data.len() + data.len() > max_bytes {
                return Ok(Upload::TooLarge);
            }
            image_data.extend_from_slice(&data);
        }
        return Ok(Upload::Image(image_data));
    }
}

fn upload_filename(field: &Field) -> Option<String> {
    if field.name() != Some(IMAGE_FIELD) {
        return None;
    }
    field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(str::to_string)
}

async fn drain(field: &mut Field) -> Result<(), Error> {
    while field.try_next().await?.is_some() {}
    Ok(())
}

async fn rate_image(
    service: web::Data<RatingService>,
    config: web::Data<AppConfig>,
    payload: Multipart,
) -> Result<HttpResponse, Error> {
    let request_id = Uuid::new_v4();

    let image_data = match read_upload(payload, config.server.max_upload_bytes).await? {
        Upload::Image(image_data) => image_data,
        Upload::Missing => {
            return Ok(HttpResponse::BadRequest().json(ErrorResponse::new("No image file provided")));
        }
        Upload::EmptyFilename => {
            return Ok(HttpResponse::BadRequest().json(ErrorResponse::new("No selected file")));
        }
        Upload::TooLarge => {
            warn!(
                "[{}] Upload exceeds {} bytes, rejecting",
                request_id, config.server.max_upload_bytes
            );
            return Ok(HttpResponse::PayloadTooLarge().json(ErrorResponse::new("Image file too large")));
        }
    };

    info!("[{}] Rating uploaded image ({} bytes)", request_id, image_data.len());

    match service.rate(request_id, &image_data).await {
        Ok(result) => {
            info!("[{}] Rated {}", request_id, result.rating);
            Ok(HttpResponse::Ok().json(RatingResponse::from(result)))
        }
        Err(RatingError::Parse(parse_error)) => {
            let error = parse_error.to_string();
            let ParseError::Unparseable { raw } = parse_error;
            warn!("[{}] Could not parse model output: {:?}", request_id, raw);
            Ok(HttpResponse::InternalServerError().json(ParseFailureResponse {
                error,
                raw_output: raw,
            }))
        }
        Err(e) => {
            error!("[{}] Error during rating: {}", request_id, e);
            Ok(HttpResponse::InternalServerError().json(ErrorResponse::new(format!(
                "An error occurred during rating: {}",
                e
            ))))
        }
    }
}
