// src/handlers/report.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{
    error::AppError,
    report::{render_evaluation_report, report_filename, to_pdf},
    store::DynStore,
};

/// Attachment response for a rendered PDF.
pub(crate) fn pdf_response(filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Renders one stored evaluation as a PDF download.
pub async fn evaluation_report(
    State(store): State<DynStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = store
        .get_result(id)
        .await?
        .ok_or(AppError::NotFound("Evaluation not found".to_string()))?;

    let employee = match result.employee_id.id() {
        Some(employee_id) => store.get_employee(employee_id).await?,
        None => None,
    };

    let document = render_evaluation_report(&result)?;
    let filename = report_filename(&result, employee.as_ref());

    tracing::info!(
        "Rendered evaluation {} as {} ({} page(s))",
        result.id,
        filename,
        document.page_count()
    );

    Ok(pdf_response(&filename, to_pdf(&document)))
}
