// tests/api_tests.rs

use std::sync::Arc;

use hr_evaluation::{
    config::Config,
    models::{
        employee::{CreateEmployeeRequest, Employee},
        question::{CreateQuestionRequest, QuestionOption},
    },
    routes,
    state::AppState,
    store::{EvaluationStore, MemoryStore},
    utils::jwt::sign_jwt,
};
use serde_json::{Value, json};

const JWT_SECRET: &str = "test_secret_for_integration_tests";

/// Spawns the app on a random port backed by a fresh in-memory store.
/// Returns the base URL and the store for seeding.
async fn spawn_app() -> (String, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());

    let config = Config {
        database_url: None,
        jwt_secret: JWT_SECRET.to_string(),
        rust_log: "error".to_string(),
        port: 0,
        log_dir: "logs".to_string(),
        allowed_origins: vec!["http://localhost:3000".to_string()],
    };

    let state = AppState {
        store: store.clone(),
        config,
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, store)
}

async fn seed_employee(store: &MemoryStore, first: &str, last: &str, chef_id: Option<i64>) -> Employee {
    store
        .insert_employee(CreateEmployeeRequest {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
            position: Some("Analyste".to_string()),
            chef_id,
        })
        .await
        .unwrap()
}

/// Two chapters of two questions, options noted 0 to 5. Question ids 1..=4.
async fn seed_catalog(store: &MemoryStore) {
    for (chapter, prompt) in [
        ("Communication", "Clarté"),
        ("Communication", "Écoute"),
        ("Technique", "Qualité du code"),
        ("Technique", "Autonomie"),
    ] {
        store
            .insert_question(CreateQuestionRequest {
                chapter_name: chapter.to_string(),
                prompt_text: prompt.to_string(),
                options: (0..=5)
                    .map(|note| QuestionOption {
                        text: format!("Niveau {}", note),
                        note: note as f64,
                    })
                    .collect(),
            })
            .await
            .unwrap();
    }
}

fn answers(notes: [f64; 4]) -> Value {
    json!([
        {"chapterName": "Communication", "questionId": 1, "selectedNote": notes[0]},
        {"chapterName": "Communication", "questionId": 2, "selectedNote": notes[1]},
        {"chapterName": "Technique", "questionId": 3, "selectedNote": notes[2]},
        {"chapterName": "Technique", "questionId": 4, "selectedNote": notes[3]},
    ])
}

#[tokio::test]
async fn unknown_route_404() {
    let (address, _store) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn catalog_reports_equal_chapter_weights() {
    let (address, store) = spawn_app().await;
    seed_catalog(&store).await;

    let body: Value = reqwest::get(format!("{}/api/questions", address))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["pointsPerChapter"], 10.0);
    assert_eq!(body["questionCount"], 4);
    assert_eq!(body["chapters"].as_array().unwrap().len(), 2);
    assert_eq!(body["chapters"][0]["name"], "Communication");
    assert_eq!(body["chapters"][0]["questions"][0]["options"][5]["note"], 5.0);
}

#[tokio::test]
async fn score_preview_full_marks() {
    let (address, store) = spawn_app().await;
    seed_catalog(&store).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/evaluations/score", address))
        .json(&json!({ "answers": answers([5.0; 4]) }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["globalScore"], 20.0);
    assert_eq!(body["chapterScores"]["Communication"], 10.0);
    assert_eq!(body["chapterScores"]["Technique"], 10.0);
    assert_eq!(body["globalRating"], "Excellent");
    assert_eq!(body["chapterRatings"]["Technique"], "Excellent");

    // Nothing was stored.
    assert!(store.list_results(&Default::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn incomplete_submission_is_rejected() {
    let (address, store) = spawn_app().await;
    seed_catalog(&store).await;
    let employee = seed_employee(&store, "Ines", "Gharbi", None).await;
    let client = reqwest::Client::new();

    let mut partial = answers([5.0; 4]);
    partial.as_array_mut().unwrap().pop();

    let response = client
        .post(format!("{}/api/evaluations", address))
        .json(&json!({
            "employeeId": employee.id,
            "periode": "2024-05",
            "answers": partial,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Incomplete submission"));
    assert!(store.list_results(&Default::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn evaluation_is_scored_stored_and_listed() {
    let (address, store) = spawn_app().await;
    seed_catalog(&store).await;
    let employee = seed_employee(&store, "Ines", "Gharbi", None).await;
    let client = reqwest::Client::new();

    let submit = || {
        client
            .post(format!("{}/api/evaluations", address))
            .json(&json!({
                "employeeId": { "_id": employee.id, "firstName": "Ines", "lastName": "Gharbi" },
                "periode": "2024-05",
                "answers": answers([0.0, 0.0, 5.0, 5.0]),
                "chapterComments": { "Communication": "<i>À travailler</i><script>x()</script>" }
            }))
            .send()
    };

    let response = submit().await.unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["employeeName"], "Ines Gharbi");
    assert_eq!(created["chapterScores"]["Communication"], 0.0);
    assert_eq!(created["globalScore"], 10.0);
    assert_eq!(created["chapterComments"]["Communication"], "<i>À travailler</i>");
    let id = created["_id"].as_i64().unwrap();

    // Same employee and periode again: a second, independent record.
    assert_eq!(submit().await.unwrap().status().as_u16(), 201);

    let listed: Vec<Value> = client
        .get(format!("{}/api/evaluationresultat?year=2024&month=5", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);

    let fetched: Value = client
        .get(format!("{}/api/evaluationresultat/{}", address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["_id"], id);
    assert_eq!(fetched["periode"], "2024-05");

    let missing = client
        .get(format!("{}/api/evaluationresultat/9999", address))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

/// Three one-question chapters, options noted 0 to 5. Question ids 1..=3.
async fn seed_three_chapter_catalog(store: &MemoryStore) {
    for chapter in ["Communication", "Technique", "Rigueur"] {
        store
            .insert_question(CreateQuestionRequest {
                chapter_name: chapter.to_string(),
                prompt_text: format!("{} en général", chapter),
                options: (0..=5)
                    .map(|note| QuestionOption {
                        text: format!("Niveau {}", note),
                        note: note as f64,
                    })
                    .collect(),
            })
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn full_marks_on_three_chapters_stay_on_scale() {
    let (address, store) = spawn_app().await;
    seed_three_chapter_catalog(&store).await;
    let employee = seed_employee(&store, "Yassine", "Chaabane", None).await;
    let client = reqwest::Client::new();

    let full_marks = json!([
        {"chapterName": "Communication", "questionId": 1, "selectedNote": 5.0},
        {"chapterName": "Technique", "questionId": 2, "selectedNote": 5.0},
        {"chapterName": "Rigueur", "questionId": 3, "selectedNote": 5.0},
    ]);

    let response = client
        .post(format!("{}/api/evaluations", address))
        .json(&json!({
            "employeeId": employee.id,
            "periode": "2024-09",
            "answers": full_marks,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["chapterScores"]["Rigueur"], 6.67);
    let global = created["globalScore"].as_f64().unwrap();
    assert!(global <= 20.0, "global score {} is off the scale", global);
    assert_eq!(global, 20.0);

    // The preview can be submitted back as precomputed scores.
    let preview: Value = client
        .post(format!("{}/api/evaluations/score", address))
        .json(&json!({ "answers": full_marks }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(preview["globalRating"], "Excellent");

    let resubmitted = client
        .post(format!("{}/api/evaluationresultat", address))
        .json(&json!({
            "employeeId": employee.id,
            "employeeName": "Yassine Chaabane",
            "periode": "2024-09",
            "chapterScores": preview["chapterScores"],
            "globalScore": preview["globalScore"],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resubmitted.status().as_u16(), 201);
}

#[tokio::test]
async fn precomputed_scores_are_rechecked() {
    let (address, store) = spawn_app().await;
    seed_catalog(&store).await;
    let employee = seed_employee(&store, "Karim", "Mansour", None).await;
    let client = reqwest::Client::new();

    let post = |body: Value| {
        client
            .post(format!("{}/api/evaluationresultat", address))
            .json(&body)
            .send()
    };

    let valid = json!({
        "employeeId": employee.id.to_string(),
        "employeeName": "Karim Mansour",
        "periode": "2024-06",
        "chapterScores": { "Communication": 8.0, "Technique": 6.5 },
        "globalScore": 14.5,
        "chapterComments": {}
    });
    assert_eq!(post(valid.clone()).await.unwrap().status().as_u16(), 201);

    let mut wrong_total = valid.clone();
    wrong_total["globalScore"] = json!(16.0);
    assert_eq!(post(wrong_total).await.unwrap().status().as_u16(), 400);

    let mut bad_periode = valid.clone();
    bad_periode["periode"] = json!("06/2024");
    assert_eq!(post(bad_periode).await.unwrap().status().as_u16(), 400);

    let mut missing_chapter = valid.clone();
    missing_chapter["chapterScores"] = json!({ "Communication": 8.0 });
    missing_chapter["globalScore"] = json!(8.0);
    assert_eq!(post(missing_chapter).await.unwrap().status().as_u16(), 400);

    let mut no_employee = valid.clone();
    no_employee.as_object_mut().unwrap().remove("employeeId");
    let response = post(no_employee).await.unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Missing employee selection");

    assert_eq!(store.list_results(&Default::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn chef_scope_limits_results() {
    let (address, store) = spawn_app().await;
    seed_catalog(&store).await;
    let chef = seed_employee(&store, "Sonia", "Chef", None).await;
    let member = seed_employee(&store, "Ali", "Membre", Some(chef.id)).await;
    let outsider = seed_employee(&store, "Rim", "Externe", None).await;
    let client = reqwest::Client::new();

    for employee in [&member, &outsider] {
        let response = client
            .post(format!("{}/api/evaluations", address))
            .json(&json!({
                "employeeId": employee.id,
                "periode": "2024-07",
                "answers": answers([3.0; 4]),
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 201);
    }

    let scoped: Vec<Value> = client
        .get(format!(
            "{}/api/evaluationresultat?chefId={}&userRole=chef",
            address, chef.id
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0]["employeeId"], member.id);

    let everything: Vec<Value> = client
        .get(format!("{}/api/evaluationresultat?userRole=admin", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(everything.len(), 2);

    let chef_without_id = client
        .get(format!("{}/api/evaluationresultat?userRole=chef", address))
        .send()
        .await
        .unwrap();
    assert_eq!(chef_without_id.status().as_u16(), 400);
}

#[tokio::test]
async fn evaluation_report_downloads_as_pdf() {
    let (address, store) = spawn_app().await;
    seed_catalog(&store).await;
    let employee = seed_employee(&store, "Yasmine", "Bouazizi", None).await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{}/api/evaluations", address))
        .json(&json!({
            "employeeId": employee.id,
            "periode": "2024-05",
            "answers": answers([4.0, 5.0, 3.0, 4.0]),
            "chapterComments": { "Technique": "Bonne progression" }
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = client
        .get(format!(
            "{}/api/evaluationresultat/{}/report",
            address, created["_id"]
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.headers()["content-type"], "application/pdf");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"evaluation_Bouazizi_2024-05.pdf\""
    );
    let bytes = response.bytes().await.unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));

    let missing = client
        .get(format!("{}/api/evaluationresultat/9999/report", address))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn employee_directory_and_report() {
    let (address, store) = spawn_app().await;
    let chef = seed_employee(&store, "Sonia", "Chef", None).await;
    seed_employee(&store, "Ali", "Membre", Some(chef.id)).await;
    let client = reqwest::Client::new();

    let team: Vec<Value> = client
        .get(format!("{}/api/employees?chefId={}", address, chef.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(team.len(), 1);
    assert_eq!(team[0]["lastName"], "Membre");

    let response = client
        .get(format!("{}/api/employees/report", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"employees.pdf\""
    );
    assert!(response.bytes().await.unwrap().starts_with(b"%PDF"));
}

#[tokio::test]
async fn admin_routes_require_admin_token() {
    let (address, store) = spawn_app().await;
    seed_catalog(&store).await;
    let employee = seed_employee(&store, "Hedi", "Sassi", None).await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{}/api/evaluations", address))
        .json(&json!({
            "employeeId": employee.id,
            "periode": "2024-08",
            "answers": answers([2.0; 4]),
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let url = format!("{}/api/admin/evaluationresultat/{}", address, created["_id"]);

    let anonymous = client.delete(&url).send().await.unwrap();
    assert_eq!(anonymous.status().as_u16(), 401);

    let employee_token = sign_jwt("5", "employee", JWT_SECRET, 600).unwrap();
    let forbidden = client.delete(&url).bearer_auth(&employee_token).send().await.unwrap();
    assert_eq!(forbidden.status().as_u16(), 403);

    let admin_token = sign_jwt("1", "admin", JWT_SECRET, 600).unwrap();
    let deleted = client.delete(&url).bearer_auth(&admin_token).send().await.unwrap();
    assert_eq!(deleted.status().as_u16(), 204);

    let again = client.delete(&url).bearer_auth(&admin_token).send().await.unwrap();
    assert_eq!(again.status().as_u16(), 404);

    let question = client
        .post(format!("{}/api/admin/questions", address))
        .bearer_auth(&admin_token)
        .json(&json!({
            "chapterName": "Leadership",
            "promptText": "Prise d'initiative",
            "options": [{"text": "Rarement", "note": 1}, {"text": "Souvent", "note": 4}]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(question.status().as_u16(), 201);

    let catalog: Value = reqwest::get(format!("{}/api/questions", address))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let weight = catalog["pointsPerChapter"].as_f64().unwrap();
    assert!((weight - 20.0 / 3.0).abs() < 1e-9);
}
