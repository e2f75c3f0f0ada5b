// src/handlers/employee.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    handlers::report::pdf_response,
    models::employee::EmployeeListParams,
    report::{EMPLOYEE_LIST_FILENAME, render_employee_list_report, to_pdf},
    store::DynStore,
};

/// Lists employees, optionally only the team of one chef.
pub async fn list_employees(
    State(store): State<DynStore>,
    Query(params): Query<EmployeeListParams>,
) -> Result<impl IntoResponse, AppError> {
    let employees = store.list_employees(params.chef_id).await?;

    Ok(Json(employees))
}

/// Exports the employee directory as a PDF.
pub async fn employee_list_report(
    State(store): State<DynStore>,
    Query(params): Query<EmployeeListParams>,
) -> Result<impl IntoResponse, AppError> {
    let employees = store.list_employees(params.chef_id).await?;
    let document = render_employee_list_report(&employees, chrono::Utc::now().date_naive());

    Ok(pdf_response(EMPLOYEE_LIST_FILENAME, to_pdf(&document)))
}
