use mindcare_core::models::assessment::{AssessmentRequest, AssessmentResponse};
use mindcare_core::models::chat::{ChatRequest, ChatResponse, ChatRole, ChatTurn, Sender};
use mindcare_core::models::contact::ContactRequest;
use mindcare_core::models::subscale::{SeverityLevel, Subscale};
use mindcare_core::models::user::{ReportTo, UserInfo};

fn user() -> UserInfo {
    UserInfo {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: "555-0100".to_string(),
        age: 36,
        gender: "female".to_string(),
        department: "IT".to_string(),
        report_to: ReportTo::Hr,
    }
}

#[test]
fn assessment_request_uses_camel_case() {
    let request = AssessmentRequest {
        answers: vec![0; 21],
        user_info: user(),
    };
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["answers"].as_array().unwrap().len(), 21);
    assert_eq!(json["userInfo"]["firstName"], "Ada");
    assert_eq!(json["userInfo"]["reportTo"], "hr");
}

#[test]
fn assessment_response_parses_service_payload() {
    let body = r#"{
        "success": true,
        "results": {
            "depression": {"score": 28, "level": "Extremely Severe"},
            "anxiety": {"score": 8, "level": "Mild"},
            "stress": {"score": 0, "level": "Normal"}
        },
        "userInfo": {
            "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com",
            "phone": "555-0100", "age": 36, "gender": "female",
            "department": "IT", "reportTo": "manager"
        },
        "severeCaseDetected": true,
        "timestamp": "2026-10-16T09:30:00.123456"
    }"#;

    let response: AssessmentResponse = serde_json::from_str(body).unwrap();
    assert!(response.validate().is_ok());
    assert_eq!(response.results.depression.level, SeverityLevel::ExtremelySevere);
    assert_eq!(response.results.get(Subscale::Anxiety).score, 8);
    assert_eq!(response.user_info.unwrap().report_to, ReportTo::Manager);
    assert!(response.severe_case_detected);
}

#[test]
fn assessment_response_rejects_unknown_level() {
    let body = r#"{
        "success": true,
        "results": {
            "depression": {"score": 2, "level": "Fine"},
            "anxiety": {"score": 0, "level": "Normal"},
            "stress": {"score": 0, "level": "Normal"}
        },
        "severeCaseDetected": false
    }"#;
    assert!(serde_json::from_str::<AssessmentResponse>(body).is_err());
}

#[test]
fn assessment_response_rejects_missing_subscale() {
    let body = r#"{
        "success": true,
        "results": {"depression": {"score": 2, "level": "Normal"}},
        "severeCaseDetected": false
    }"#;
    assert!(serde_json::from_str::<AssessmentResponse>(body).is_err());
}

#[test]
fn assessment_response_rejects_impossible_scores() {
    let body = r#"{
        "success": true,
        "results": {
            "depression": {"score": 44, "level": "Extremely Severe"},
            "anxiety": {"score": 0, "level": "Normal"},
            "stress": {"score": 0, "level": "Normal"}
        },
        "severeCaseDetected": true
    }"#;
    let response: AssessmentResponse = serde_json::from_str(body).unwrap();
    let err = response.validate().unwrap_err();
    assert!(err.to_string().contains("results.depression.score"));
}

#[test]
fn extremely_severe_round_trips_with_space() {
    let json = serde_json::to_string(&SeverityLevel::ExtremelySevere).unwrap();
    assert_eq!(json, "\"Extremely Severe\"");
    assert_eq!(SeverityLevel::ExtremelySevere.to_string(), "Extremely Severe");
    assert!(SeverityLevel::Severe.is_severe());
    assert!(!SeverityLevel::Moderate.is_severe());
    assert!(SeverityLevel::Mild < SeverityLevel::Severe);
}

#[test]
fn chat_request_shape() {
    let request = ChatRequest {
        message: "hello".to_string(),
        assessment_results: None,
        session_history: vec![ChatTurn {
            role: ChatRole::Assistant,
            content: "Hi there".to_string(),
        }],
    };
    let json = serde_json::to_value(&request).unwrap();
    assert!(json.get("assessmentResults").is_none());
    assert_eq!(json["sessionHistory"][0]["role"], "assistant");
    assert!(request.validate().is_ok());

    let blank = ChatRequest {
        message: "   ".to_string(),
        ..request
    };
    assert!(blank.validate().is_err());
}

#[test]
fn chat_response_defaults_optional_fields() {
    let response: ChatResponse =
        serde_json::from_str(r#"{"success": true, "response": "I hear you."}"#).unwrap();
    assert!(!response.should_end_session);
    assert!(response.recommendations.is_none());
}

#[test]
fn sender_maps_assistant_to_bot() {
    assert_eq!(Sender::from(ChatRole::Assistant), Sender::Bot);
    assert_eq!(serde_json::to_string(&Sender::Bot).unwrap(), "\"bot\"");
}

#[test]
fn user_validation() {
    assert!(user().validate().is_ok());

    let mut bad = user();
    bad.email = "ada.example.com".to_string();
    assert!(bad.validate().is_err());

    let mut bad = user();
    bad.email = "ada@localhost".to_string();
    assert!(bad.validate().is_err());

    let mut bad = user();
    bad.first_name = " ".to_string();
    assert!(bad.validate().is_err());

    let mut bad = user();
    bad.age = 0;
    assert!(bad.validate().is_err());
}

#[test]
fn report_to_parses_case_insensitively() {
    assert_eq!("HR".parse::<ReportTo>().unwrap(), ReportTo::Hr);
    assert_eq!("Manager".parse::<ReportTo>().unwrap(), ReportTo::Manager);
    assert!("ceo".parse::<ReportTo>().is_err());
}

#[test]
fn subscale_parses_names() {
    assert_eq!("Stress".parse::<Subscale>().unwrap(), Subscale::Stress);
    assert!("mood".parse::<Subscale>().is_err());
}

#[test]
fn contact_validation() {
    let ok = ContactRequest {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        message: "Tell me more.".to_string(),
    };
    assert!(ok.validate().is_ok());

    let empty = ContactRequest {
        message: String::new(),
        ..ok
    };
    assert!(empty.validate().is_err());
}
