// src/report/mod.rs

//! Paginated reports: layout into [`layout::Document`], then [`pdf::to_pdf`].

pub mod employees;
pub mod evaluation;
pub mod layout;
pub mod pdf;

pub use employees::{EMPLOYEE_LIST_FILENAME, render_employee_list_report};
pub use evaluation::{render_evaluation_report, report_filename};
pub use pdf::to_pdf;
