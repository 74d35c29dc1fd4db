//! Drives the controller against a live server on a loopback port.

use form_controller::{FormController, HttpTransport, Transport, TransportError};
use form_server::{AppState, ServerConfig, build_app_router};
use form_spec::{QuestionCatalog, forms};

async fn spawn_server() -> String {
    let config = ServerConfig::default();
    let app = build_app_router(AppState::new(QuestionCatalog::builtin()), &config);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn fetches_and_submits_over_http() {
    let transport = HttpTransport::new(spawn_server().await);

    let mut controller = FormController::new(forms::survey());
    let request = controller
        .set_field("surveyTopic", "Education")
        .expect("request");
    assert!(controller.apply_questions(request.run(&transport).await));
    assert_eq!(controller.questions().len(), 2);

    controller.set_field("fullName", "Maria Montessori");
    controller.set_field("email", "maria@example.it");
    controller.set_field("highestQualification", "PhD");
    controller.set_field("fieldOfStudy", "Pedagogy");
    controller.set_field("feedback", "x".repeat(forms::FEEDBACK_MIN_LENGTH));

    let submission = controller.submit(&transport).await.expect("submitted");
    assert_eq!(
        submission.follow_up_questions,
        [
            "What was your favorite subject in school?".to_string(),
            "Do you prefer online courses or in-person classes?".to_string()
        ]
    );
}

#[tokio::test]
async fn unknown_topic_over_http_is_empty() {
    let transport = HttpTransport::new(spawn_server().await);
    let questions = transport.fetch_questions("Unknown").await.expect("ok");
    assert!(questions.is_empty());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind and drop a listener to get a port nobody is serving.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = HttpTransport::new(format!("http://{addr}/"));
    let err = transport.fetch_questions("Health").await.expect_err("offline");
    assert!(matches!(err, TransportError::Http(_)));
}
