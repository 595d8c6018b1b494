use axum::{
    extract::{DefaultBodyLimit, Multipart, Path},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::{debug, info};

use crate::cli::ServeArgs;
use crate::modules::{InputRole, ModuleError, ModuleInputs, ModuleKind, ModuleSettings};
use crate::parsing::input::InputFile;
use crate::parsing::ParseError;
use crate::plot::rasterize::RasterError;
use crate::report::Report;
use crate::utils::validation::{validate_upload, ValidationError};
use crate::web::format_detection::detect_kind;

/// Security configuration constants to prevent `DoS` attacks
pub const MAX_MULTIPART_FIELDS: usize = 64;
pub const MAX_FILE_FIELD_SIZE: usize = 16 * 1024 * 1024; // 16MB
pub const MAX_TEXT_FIELD_SIZE: usize = 1024; // 1KB
pub const MAX_BODY_SIZE: usize = 64 * 1024 * 1024; // 64MB

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None,
    }
}

fn error_response(status: StatusCode, error_type: &str, message: &str, internal: Option<&str>) -> Response {
    (
        status,
        Json(create_safe_error_response(error_type, message, internal)),
    )
        .into_response()
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args).await })
}

/// Create the application router with all routes and middleware configured.
///
/// # Errors
///
/// Returns an error if the rate limiter configuration is rejected.
pub fn create_router() -> anyhow::Result<Router> {
    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10)
        .burst_size(50)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?;

    let app = Router::new()
        .route("/api/modules", get(modules_handler))
        .route("/api/sections/{module}", post(section_handler))
        .layer(
            ServiceBuilder::new()
                // Security headers for browser protection
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-xss-protection"),
                    HeaderValue::from_static("1; mode=block"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("strict-transport-security"),
                    HeaderValue::from_static("max-age=31536000; includeSubDomains"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                .layer(GovernorLayer {
                    config: Arc::new(governor_conf),
                })
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(30),
                ))
                .layer(ConcurrencyLimitLayer::new(100))
                .layer(DefaultBodyLimit::max(MAX_BODY_SIZE)),
        );

    Ok(app)
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let app = create_router()?;

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting ab-report web server at http://{addr}");

    if args.open {
        let _ = open::that(format!("http://{addr}/api/modules"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

#[derive(Serialize)]
struct ModuleDescription {
    name: &'static str,
    title: &'static str,
    anchor: &'static str,
    roles: &'static [InputRole],
    #[serde(skip_serializing_if = "Option::is_none")]
    default_step_size: Option<u64>,
}

/// List the modules, their input roles and defaults
async fn modules_handler() -> Json<serde_json::Value> {
    let modules: Vec<ModuleDescription> = ModuleKind::ALL
        .into_iter()
        .map(|kind| ModuleDescription {
            name: kind.name(),
            title: kind.info().name,
            anchor: kind.info().anchor,
            roles: kind.roles(),
            default_step_size: kind.default_step_size(),
        })
        .collect();

    Json(serde_json::json!({
        "count": modules.len(),
        "modules": modules,
    }))
}

/// Run one module over uploaded files and return the report
async fn section_handler(Path(module): Path<String>, mut multipart: Multipart) -> Response {
    let Ok(kind) = module.parse::<ModuleKind>() else {
        return error_response(
            StatusCode::NOT_FOUND,
            "unknown_module",
            "Unknown module",
            None,
        );
    };

    let (inputs, settings) = match extract_request_data(kind, &mut multipart).await {
        Ok(data) => data,
        Err(response) => return *response,
    };

    // Module work is CPU-bound; keep it off the async workers
    let result = tokio::task::spawn_blocking(move || {
        let mut report = Report::new();
        kind.run(&inputs, &settings, &mut report).map(|()| report)
    })
    .await;

    match result {
        Ok(Ok(report)) => {
            info!("Module '{}' produced {} sections", kind, report.sections.len());
            Json(report).into_response()
        }
        Ok(Err(e)) => module_error_response(&e),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "Internal error",
            Some(&e.to_string()),
        ),
    }
}

fn module_error_response(error: &ModuleError) -> Response {
    let internal = error.to_string();
    match error {
        ModuleError::NoData(_) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "no_data",
            "No usable data found in the uploaded files",
            None,
        ),
        ModuleError::Inconsistent(_) | ModuleError::MissingField { .. } => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "inconsistent_input",
            "The uploaded files are incomplete or do not agree with each other",
            Some(&internal),
        ),
        ModuleError::Parse { .. } => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "parse_failed",
            "Unable to process file content. Please check the file format and try again.",
            Some(&internal),
        ),
        ModuleError::Raster(RasterError::TooManyPoints(_)) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "too_many_points",
            "The uploaded files would produce too many plot points. Try a larger step size.",
            Some(&internal),
        ),
        ModuleError::Config(_) | ModuleError::Raster(RasterError::InvalidStepSize) => error_response(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "Invalid module options",
            Some(&internal),
        ),
        ModuleError::Json(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "Internal error",
            Some(&internal),
        ),
    }
}

fn validation_error_response(error: &ValidationError) -> Response {
    match error {
        ValidationError::FilenameTooLong => error_response(
            StatusCode::BAD_REQUEST,
            "filename_too_long",
            "Filename exceeds maximum length limit",
            Some("Filename validation failed due to length constraints"),
        ),
        ValidationError::InvalidFilename | ValidationError::EmptyFilename => error_response(
            StatusCode::BAD_REQUEST,
            "invalid_filename",
            "Filename contains invalid or dangerous characters",
            Some("Filename validation failed due to invalid characters"),
        ),
        ValidationError::FormatValidationFailed(expected) => error_response(
            StatusCode::BAD_REQUEST,
            "format_mismatch",
            &format!("File content does not look like {expected}"),
            None,
        ),
        ValidationError::InvalidFileContent => error_response(
            StatusCode::BAD_REQUEST,
            "invalid_content",
            "File content appears malformed or corrupted",
            None,
        ),
    }
}

/// Collect uploaded files by role and module options from the multipart form
async fn extract_request_data(
    kind: ModuleKind,
    multipart: &mut Multipart,
) -> Result<(ModuleInputs, ModuleSettings), Box<Response>> {
    let mut inputs = ModuleInputs::new();
    let mut settings = ModuleSettings::default();
    let mut fields_received = 0usize;

    loop {
        if fields_received >= MAX_MULTIPART_FIELDS {
            return Err(Box::new(error_response(
                StatusCode::BAD_REQUEST,
                "field_limit_exceeded",
                "Too many form fields",
                None,
            )));
        }

        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(Box::new(error_response(
                    StatusCode::BAD_REQUEST,
                    "malformed_upload",
                    "Failed to parse upload. Please check the form data.",
                    Some(&e.to_string()),
                )));
            }
        };
        fields_received += 1;
        let name = field.name().unwrap_or_default().to_string();

        if let Some(role) = kind.role(&name) {
            let filename = field.file_name().map(ToString::to_string);
            let bytes = field.bytes().await.map_err(|e| {
                Box::new(error_response(
                    StatusCode::BAD_REQUEST,
                    "malformed_upload",
                    "Failed to read uploaded file",
                    Some(&e.to_string()),
                ))
            })?;
            if bytes.len() > MAX_FILE_FIELD_SIZE {
                return Err(Box::new(error_response(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "file_too_large",
                    "File size exceeds limit",
                    None,
                )));
            }
            let file = upload_to_input(role, filename.as_deref(), &bytes)?;
            inputs.add(role.name, file);
            continue;
        }

        match name.as_str() {
            "step_size" | "label_prefix" => {
                let text = field.text().await.unwrap_or_default();
                if text.len() > MAX_TEXT_FIELD_SIZE {
                    return Err(Box::new(error_response(
                        StatusCode::PAYLOAD_TOO_LARGE,
                        "text_too_large",
                        "Text field size exceeds limit",
                        None,
                    )));
                }
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                if name == "label_prefix" {
                    settings.label_prefix = Some(text.to_string());
                } else {
                    match text.parse::<u64>() {
                        Ok(step) if step > 0 => settings.step_size = Some(step),
                        _ => {
                            return Err(Box::new(error_response(
                                StatusCode::BAD_REQUEST,
                                "invalid_step_size",
                                "step_size must be a positive integer",
                                None,
                            )));
                        }
                    }
                }
            }
            _ => debug!("Ignoring form field '{}'", name),
        }
    }

    if inputs.is_empty() {
        let message = if fields_received == 0 {
            "No data received. Please upload at least one file."
        } else {
            "No file fields matched this module's input roles."
        };
        return Err(Box::new(error_response(
            StatusCode::BAD_REQUEST,
            "missing_input",
            message,
            None,
        )));
    }

    Ok((inputs, settings))
}

/// Decompress, validate and wrap one uploaded file
fn upload_to_input(role: &InputRole, filename: Option<&str>, bytes: &[u8]) -> Result<InputFile, Box<Response>> {
    let raw_name = filename.unwrap_or(role.name);
    let decoded = InputFile::from_bytes(raw_name, bytes).map_err(|e| match e {
        ParseError::DecompressedTooLarge { .. } => Box::new(error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            "file_too_large",
            "Decompressed file size exceeds limit",
            Some(&e.to_string()),
        )),
        _ => Box::new(error_response(
            StatusCode::BAD_REQUEST,
            "invalid_content",
            "File content appears malformed or corrupted",
            Some(&e.to_string()),
        )),
    })?;

    match validate_upload(filename, &decoded.content, role.kind) {
        Ok(validated) => {
            let name = validated.unwrap_or_else(|| role.name.to_string());
            Ok(InputFile::from_text(name, decoded.content))
        }
        Err(e) => {
            if let ValidationError::FormatValidationFailed(_) = e {
                if let Ok(detected) = detect_kind(&decoded.content, filename) {
                    debug!(
                        "Upload for role '{}' looks like {}",
                        role.name,
                        detected.display_name()
                    );
                }
            }
            Err(Box::new(validation_error_response(&e)))
        }
    }
}
