//! Employee spreadsheet upload, template download, export and import status.

use axum::{
    Router,
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use hrms_core::import::{check_extension, count_data_rows};
use hrms_db::{EmployeeRepository, ImportJobRepository};
use hrms_shared::{AppError, FieldErrors};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::QueryParams;
use crate::imports::{ImportTask, import_rows};
use crate::middleware::AuthUser;
use crate::response;
use crate::spreadsheet::{self, XLSX_CONTENT_TYPE};

/// Creates the import router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees/upload", post(upload))
        .route("/employees/import-template", get(template))
        .route("/employees/export", get(export))
        .route("/imports/{import_id}", get(import_status))
}

/// Filters accepted by `GET /employees/export`.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// `SMRU` or `BHF`.
    pub organization: Option<String>,
    /// Employee status.
    pub status: Option<String>,
}

/// Body of a `202 Accepted` upload.
#[derive(Debug, Serialize)]
struct QueuedImport {
    import_id: String,
    file_name: String,
    total_rows: usize,
    status: String,
}

fn multipart_error(e: &MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError(AppError::PayloadTooLarge(
            "The uploaded file is too large".into(),
        ))
    } else {
        ApiError::bad_request(format!("Invalid multipart body: {}", e.body_text()))
    }
}

fn attachment(bytes: Vec<u8>, file_name: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// POST /employees/upload - Multipart field `file` (xlsx, xls or csv).
///
/// Small sheets import inline and return the report. Sheets above the
/// configured row threshold are queued and answered with `202` and an
/// `import_id` to poll.
async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(&e))? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| multipart_error(&e))?;
        upload = Some((file_name, bytes));
        break;
    }
    let Some((file_name, bytes)) = upload else {
        return Err(FieldErrors::single("file", "The file field is required.").into());
    };

    let extension = check_extension(&file_name)?;
    if bytes.len() > state.import.max_upload_bytes {
        return Err(ApiError(AppError::PayloadTooLarge(format!(
            "The file may not be greater than {} kilobytes.",
            state.import.max_upload_bytes / 1024
        ))));
    }

    let rows = spreadsheet::read_rows(&extension, &bytes)?;
    let total_rows = count_data_rows(&rows);
    info!(file = %file_name, total_rows, "Employee upload received");

    if total_rows > state.import.async_row_threshold {
        let job = ImportJobRepository::new(state.conn())
            .create(&file_name, total_rows, auth.actor())
            .await?;
        let queued = state.imports.enqueue(ImportTask {
            import_id: job.import_id.clone(),
            file_name: file_name.clone(),
            rows,
            actor: auth.actor(),
        });
        if !queued {
            warn!(import_id = %job.import_id, "Import worker unavailable");
            ImportJobRepository::new(state.conn())
                .fail(&job.import_id, "Import worker is not running")
                .await?;
            return Err(ApiError(AppError::Internal(
                "Import worker is not running".into(),
            )));
        }
        return Ok(response::accepted(
            "Import queued for processing",
            QueuedImport {
                import_id: job.import_id,
                file_name,
                total_rows,
                status: job.status,
            },
        ));
    }

    let db = state.conn();
    let report = import_rows(&db, &rows, auth.actor(), &state.cache, &state.events).await?;
    let message = format!(
        "Import finished: {} of {} rows imported",
        report.imported_count, report.processed_count
    );
    Ok(response::ok(message, report))
}

/// GET /employees/import-template
async fn template() -> ApiResult<Response> {
    let bytes = spreadsheet::employee_template()?;
    Ok(attachment(bytes, "employee_import_template.xlsx"))
}

/// GET /employees/export
async fn export(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ExportQuery>,
) -> ApiResult<Response> {
    let organization = query.organization.filter(|s| !s.trim().is_empty());
    let status = query.status.filter(|s| !s.trim().is_empty());
    let employees = EmployeeRepository::new(state.conn())
        .list_for_export(organization.as_deref(), status.as_deref())
        .await?;

    let records = employees
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<Value>, _>>()
        .map_err(|e| ApiError(AppError::Internal(e.to_string())))?;
    let bytes = spreadsheet::employee_export(&records)?;

    info!(
        count = records.len(),
        organization = organization.as_deref().unwrap_or("all"),
        status = status.as_deref().unwrap_or("all"),
        "Employee export generated"
    );
    let file_name = format!("employees_{}.xlsx", Utc::now().format("%Y%m%d_%H%M%S"));
    Ok(attachment(bytes, &file_name))
}

/// GET /imports/{import_id} - Status and, once finished, the report.
async fn import_status(
    State(state): State<AppState>,
    Path(import_id): Path<String>,
) -> ApiResult<Response> {
    let job = ImportJobRepository::new(state.conn()).find(&import_id).await?;
    Ok(response::ok("Import status retrieved successfully", job))
}
