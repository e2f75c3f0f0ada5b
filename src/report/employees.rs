// src/report/employees.rs

use chrono::NaiveDate;

use crate::{
    models::employee::Employee,
    report::layout::{Document, DocumentBuilder, Font},
};

const COLUMNS: [f32; 3] = [0.0, 170.0, 360.0];

pub const EMPLOYEE_LIST_FILENAME: &str = "employees.pdf";

pub fn render_employee_list_report(employees: &[Employee], generated_on: NaiveDate) -> Document {
    let mut doc = DocumentBuilder::new("Liste des employés");

    doc.heading("Liste des employés", 18.0);
    doc.paragraph(&format!(
        "Générée le {} - {} employé(s)",
        generated_on.format("%d/%m/%Y"),
        employees.len()
    ));
    doc.spacer(8.0);

    if employees.is_empty() {
        doc.paragraph("Aucun employé.");
        return doc.finish();
    }

    doc.row(&row(["Nom", "Email", "Poste"]), Font::Bold);
    for employee in employees {
        doc.row(
            &row([
                employee.full_name().as_str(),
                employee.email.as_str(),
                employee.position.as_deref().unwrap_or("-"),
            ]),
            Font::Regular,
        );
    }

    doc.finish()
}

fn row(texts: [&str; 3]) -> Vec<(f32, String)> {
    COLUMNS
        .iter()
        .zip(texts)
        .map(|(x, text)| (*x, text.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(id: i64) -> Employee {
        Employee {
            id,
            first_name: format!("Prénom{}", id),
            last_name: format!("Nom{}", id),
            email: format!("e{}@example.com", id),
            position: (id % 2 == 0).then(|| "Développeur".to_string()),
            chef_id: None,
            created_at: None,
        }
    }

    #[test]
    fn lists_every_employee_across_pages() {
        let employees: Vec<Employee> = (1..=80).map(employee).collect();
        let date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let doc = render_employee_list_report(&employees, date);

        assert!(doc.page_count() >= 2);
        assert!(doc.contains_text("30/06/2024 - 80 employé(s)"));
        assert!(doc.contains_text("Prénom1 Nom1"));
        assert!(doc.contains_text("e80@example.com"));
        assert!(doc.contains_text("Développeur"));
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let doc = render_employee_list_report(&[], date);
        assert_eq!(doc.page_count(), 1);
        assert!(doc.contains_text("Aucun employé."));
    }
}
