mod support;

use support::{
    http_stub::{gemini_body, json_response, serve},
    images::write_test_png,
};

use orbitaleye::classifier::{ANALYSIS_FAILED_MESSAGE, Classifier, GeminiClassifier, ImagePayload};
use orbitaleye::config::{ClassifierSettings, NetworkSettings};
use orbitaleye::egui_app::controller::EguiController;
use orbitaleye::egui_app::view_model;
use orbitaleye::scan::DisasterCategory;
use serde_json::json;
use std::{sync::Arc, time::Duration};

fn classifier_for(endpoint: String, max_attempts: usize) -> GeminiClassifier {
    let settings = ClassifierSettings {
        endpoint,
        ..ClassifierSettings::default()
    };
    let network = NetworkSettings {
        max_attempts,
        retry_base_delay_ms: 1,
        retry_max_delay_ms: 2,
    };
    GeminiClassifier::new(&settings, &network)
        .expect("valid classifier settings")
        .with_api_key("test-key")
}

fn payload() -> ImagePayload {
    ImagePayload::from_bytes(&[0x89, b'P', b'N', b'G'], "image/png").expect("payload")
}

fn fire_analysis() -> serde_json::Value {
    json!({
        "category": "FOREST_FIRE",
        "confidence": 0.92,
        "reasoning": "Active fire front with dense smoke.",
        "detectedFeatures": ["smoke plume", "thermal hotspot"],
        "recommendedAction": "Dispatch aerial firefighting units."
    })
}

#[test]
fn controller_scan_goes_through_gemini_endpoint() {
    let (endpoint, requests) = serve(vec![json_response("200 OK", &gemini_body(&fire_analysis()))]);
    let classifier = classifier_for(endpoint, 1);
    let mut controller = EguiController::new(Arc::new(classifier));

    let temp = tempfile::tempdir().expect("create tempdir");
    let path = temp.path().join("fire.png");
    write_test_png(&path, 8, [220, 60, 20, 255]);
    controller.select_image_path(path);
    for _ in 0..400 {
        controller.poll_background_jobs();
        if !controller.has_pending_jobs() {
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }

    let session = controller.session();
    let result = session.result().expect("analysis result");
    assert_eq!(view_model::category_badge(result.category()), "Wildfire Detected");
    assert_eq!(view_model::confidence_percent(result.confidence()), "92.0%");
    assert_eq!(result.detected_features().len(), 2);
    assert_eq!(session.history().len(), 1);

    let request = requests
        .recv_timeout(Duration::from_secs(1))
        .expect("request captured")
        .to_ascii_lowercase();
    assert!(request.starts_with(
        "post /v1beta/models/gemini-3-flash-preview:generatecontent"
    ));
    assert!(request.contains("x-goog-api-key: test-key"));
    assert!(request.contains("\"inlinedata\""));
    assert!(request.contains("image/png"));
}

#[test]
fn server_error_is_retried_once() {
    let (endpoint, requests) = serve(vec![
        json_response("503 Service Unavailable", r#"{"error":"overloaded"}"#),
        json_response("200 OK", &gemini_body(&fire_analysis())),
    ]);
    let classifier = classifier_for(endpoint, 2);

    let result = classifier.analyze(&payload()).expect("retry succeeds");
    assert_eq!(result.category(), DisasterCategory::ForestFire);
    assert_eq!(requests.try_iter().count(), 2);
}

#[test]
fn client_error_is_not_retried() {
    let (endpoint, requests) = serve(vec![
        json_response("400 Bad Request", r#"{"error":"bad image"}"#),
        json_response("200 OK", &gemini_body(&fire_analysis())),
    ]);
    let classifier = classifier_for(endpoint, 3);

    let err = classifier.analyze(&payload()).expect_err("bad request fails");
    assert_eq!(err.to_string(), ANALYSIS_FAILED_MESSAGE);
    assert_eq!(requests.try_iter().count(), 1);
}

#[test]
fn unexpected_category_maps_to_unknown() {
    let analysis = json!({
        "category": "VOLCANO",
        "confidence": 0.3,
        "reasoning": "Ash cloud.",
        "detectedFeatures": [],
        "recommendedAction": "Request a second pass."
    });
    let (endpoint, _requests) = serve(vec![json_response("200 OK", &gemini_body(&analysis))]);
    let classifier = classifier_for(endpoint, 1);

    let result = classifier.analyze(&payload()).expect("unknown still parses");
    assert_eq!(result.category(), DisasterCategory::Unknown);
    assert_eq!(view_model::category_badge(result.category()), "Scan Required");
}

#[test]
fn percentage_confidence_is_rejected() {
    let mut analysis = fire_analysis();
    analysis["confidence"] = json!(92);
    let (endpoint, _requests) = serve(vec![json_response("200 OK", &gemini_body(&analysis))]);
    let classifier = classifier_for(endpoint, 1);

    let err = classifier.analyze(&payload()).expect_err("out of range");
    assert_eq!(err.to_string(), ANALYSIS_FAILED_MESSAGE);
}
