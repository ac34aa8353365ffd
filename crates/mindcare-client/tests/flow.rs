//! Flow tests against a throwaway HTTP stub bound to localhost.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use mindcare_client::api::ApiClient;
use mindcare_client::config::ClientConfig;
use mindcare_client::error::ClientError;
use mindcare_client::flow;
use mindcare_client::session::Session;
use mindcare_core::models::assessment::ResultSource;
use mindcare_core::models::contact::ContactRequest;
use mindcare_core::models::subscale::{SeverityLevel, Subscale};
use mindcare_core::models::user::{ReportTo, UserInfo};

struct Captured {
    request_line: String,
    body: serde_json::Value,
}

/// Serve `replies` in order, one per connection, then stop.
fn stub(replies: Vec<(u16, &'static str)>) -> (SocketAddr, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for (status, body) in replies {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let captured = handle(stream, status, body);
            if tx.send(captured).is_err() {
                return;
            }
        }
    });

    (addr, rx)
}

fn handle(stream: TcpStream, status: u16, reply: &str) -> Captured {
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    let mut content_length = 0usize;
    let mut chunked = false;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        let lower = line.to_ascii_lowercase();
        if let Some(v) = lower.strip_prefix("content-length:") {
            content_length = v.trim().parse().unwrap();
        }
        if lower.starts_with("transfer-encoding:") && lower.contains("chunked") {
            chunked = true;
        }
    }

    let mut raw = Vec::new();
    if chunked {
        loop {
            let mut size_line = String::new();
            reader.read_line(&mut size_line).unwrap();
            let size = usize::from_str_radix(size_line.trim(), 16).unwrap();
            let mut chunk = vec![0; size + 2];
            reader.read_exact(&mut chunk).unwrap();
            if size == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..size]);
        }
    } else {
        raw.resize(content_length, 0);
        reader.read_exact(&mut raw).unwrap();
    }

    let body = if raw.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&raw).unwrap()
    };

    let mut stream = stream;
    write!(
        stream,
        "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
        reply.len()
    )
    .unwrap();
    stream.flush().unwrap();

    Captured {
        request_line: request_line.trim_end().to_string(),
        body,
    }
}

fn client(addr: SocketAddr) -> ApiClient {
    ApiClient::new(
        ClientConfig::new(format!("http://{addr}/api/")).with_timeout(Duration::from_secs(2)),
    )
}

/// A client pointed at a port nothing listens on.
fn unreachable_client() -> ApiClient {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    client(addr)
}

fn user() -> UserInfo {
    UserInfo {
        first_name: "Alan".to_string(),
        last_name: "Turing".to_string(),
        email: "alan@example.com".to_string(),
        phone: "555-0100".to_string(),
        age: 41,
        gender: "male".to_string(),
        department: "Research".to_string(),
        report_to: ReportTo::Hr,
    }
}

fn ready_session(answers: &[i32]) -> Session {
    let mut session = Session::new();
    session.start(user()).unwrap();
    session.set_answers(answers).unwrap();
    session
}

const ASSESS_OK: &str = r#"{
    "success": true,
    "results": {
        "depression": {"score": 4, "level": "Normal"},
        "anxiety": {"score": 12, "level": "Moderate"},
        "stress": {"score": 36, "level": "Extremely Severe"}
    },
    "userInfo": null,
    "severeCaseDetected": true,
    "timestamp": "2026-10-16T09:00:00"
}"#;

#[test]
fn assessment_uses_service_results() {
    let (addr, rx) = stub(vec![(200, ASSESS_OK)]);
    let api = client(addr);
    let mut session = ready_session(&[1; 21]);

    let outcome = flow::submit_assessment(&api, &mut session).unwrap();
    assert_eq!(outcome.source, ResultSource::Remote);
    assert_eq!(outcome.results.stress.level, SeverityLevel::ExtremelySevere);
    assert!(outcome.severe_case_detected);
    assert_eq!(session.results().unwrap().anxiety.score, 12);

    let req = rx.recv().unwrap();
    assert_eq!(req.request_line, "POST /api/assess HTTP/1.1");
    assert_eq!(req.body["answers"].as_array().unwrap().len(), 21);
    assert_eq!(req.body["userInfo"]["firstName"], "Alan");
    assert_eq!(req.body["userInfo"]["reportTo"], "hr");
}

#[test]
fn assessment_falls_back_to_local_scoring_on_server_error() {
    let (addr, _rx) = stub(vec![(500, r#"{"detail": "Assessment processing failed"}"#)]);
    let api = client(addr);
    let mut session = ready_session(&[3; 21]);

    let outcome = flow::submit_assessment(&api, &mut session).unwrap();
    assert_eq!(outcome.source, ResultSource::Local);
    assert_eq!(outcome.results.depression.score, 42);
    assert_eq!(outcome.results.depression.level, SeverityLevel::ExtremelySevere);
    assert!(outcome.severe_case_detected);
}

#[test]
fn assessment_falls_back_when_service_is_unreachable() {
    let api = unreachable_client();
    let mut session = ready_session(&[0; 21]);

    let outcome = flow::submit_assessment(&api, &mut session).unwrap();
    assert_eq!(outcome.source, ResultSource::Local);
    assert_eq!(outcome.results.max_score(), 0);
    assert!(!outcome.severe_case_detected);
}

#[test]
fn assessment_falls_back_on_malformed_reply() {
    let (addr, _rx) = stub(vec![(
        200,
        r#"{"success": true, "results": {"depression": {"score": 99, "level": "Normal"}}}"#,
    )]);
    let api = client(addr);
    let mut session = ready_session(&[2; 21]);

    let outcome = flow::submit_assessment(&api, &mut session).unwrap();
    assert_eq!(outcome.source, ResultSource::Local);
    assert_eq!(outcome.results.anxiety.score, 28);
}

#[test]
fn invalid_assessment_is_rejected_before_any_request() {
    let api = unreachable_client();

    let mut short = ready_session(&[1; 20]);
    assert!(matches!(
        flow::submit_assessment(&api, &mut short),
        Err(ClientError::Instrument(_))
    ));
    assert!(short.results().is_none());

    let mut out_of_range = ready_session(&[1; 21]);
    out_of_range.answers[5] = Some(7);
    assert!(flow::submit_assessment(&api, &mut out_of_range).is_err());

    let mut anonymous = Session::new();
    anonymous.set_answers(&[1; 21]).unwrap();
    assert!(matches!(
        flow::submit_assessment(&api, &mut anonymous),
        Err(ClientError::NoUser)
    ));
}

#[test]
fn chat_records_both_sides_and_sends_history() {
    let (addr, rx) = stub(vec![
        (200, r#"{"success": true, "response": "Tell me more.", "shouldEndSession": false}"#),
        (200, r#"{"success": true, "response": "Take care.", "shouldEndSession": true}"#),
    ]);
    let api = client(addr);
    let mut session = ready_session(&[1; 21]);

    let first = flow::send_chat(&api, &mut session, "  I am stressed  ").unwrap();
    assert_eq!(first.response, "Tell me more.");
    let req = rx.recv().unwrap();
    assert_eq!(req.request_line, "POST /api/chat HTTP/1.1");
    assert_eq!(req.body["message"], "I am stressed");
    assert!(req.body["sessionHistory"].as_array().unwrap().is_empty());

    let second = flow::send_chat(&api, &mut session, "Thanks").unwrap();
    assert!(second.should_end_session);
    let req = rx.recv().unwrap();
    let history = req.body["sessionHistory"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["role"], "user");
    assert_eq!(history[1]["role"], "assistant");
    assert_eq!(history[1]["content"], "Tell me more.");

    assert_eq!(session.history.len(), 4);
    assert_eq!(session.message_count, 2);
}

#[test]
fn chat_failure_keeps_only_the_user_message() {
    let api = unreachable_client();
    let mut session = ready_session(&[1; 21]);

    let err = flow::send_chat(&api, &mut session, "hello").unwrap_err();
    assert!(matches!(err, ClientError::Transport { .. }));
    assert_eq!(session.history.len(), 1);
    assert_eq!(session.history[0].content, "hello");
}

#[test]
fn blank_chat_message_is_rejected() {
    let api = unreachable_client();
    let mut session = ready_session(&[1; 21]);

    assert!(flow::send_chat(&api, &mut session, "   ").is_err());
    assert!(session.history.is_empty());
}

#[test]
fn end_session_reports_delivery() {
    let (addr, rx) = stub(vec![
        (200, ASSESS_OK),
        (200, r#"{"success": true, "message": "Session report sent successfully"}"#),
    ]);
    let api = client(addr);
    let mut session = ready_session(&[1; 21]);
    flow::submit_assessment(&api, &mut session).unwrap();
    session.push_user("hi");
    session.push_assistant("hello");

    let outcome = flow::end_session(&api, &mut session).unwrap();
    assert!(outcome.delivered);
    assert!(session.is_ended());
    // Anxiety and stress reach Moderate; the general pair always follows.
    assert_eq!(outcome.recommendations.len(), 6);
    assert_eq!(outcome.recommendations[0].title, "Breathing Exercises");
    assert_eq!(outcome.recommendations[2].title, "Stress Management");

    let _assess = rx.recv().unwrap();
    let req = rx.recv().unwrap();
    assert_eq!(req.request_line, "POST /api/end-session HTTP/1.1");
    let history = req.body["chatHistory"].as_array().unwrap();
    assert_eq!(history[1]["sender"], "bot");
    assert_eq!(req.body["assessmentResults"]["stress"]["score"], 36);

    assert!(matches!(
        flow::send_chat(&api, &mut session, "still there?"),
        Err(ClientError::SessionEnded)
    ));
}

#[test]
fn end_session_still_ends_when_report_is_not_delivered() {
    let api = unreachable_client();
    let mut session = ready_session(&[1; 21]);
    flow::submit_assessment(&api, &mut session).unwrap();

    let outcome = flow::end_session(&api, &mut session).unwrap();
    assert!(!outcome.delivered);
    assert!(session.is_ended());
}

#[test]
fn end_session_requires_assessment() {
    let api = unreachable_client();
    let mut session = ready_session(&[1; 21]);
    assert!(matches!(
        flow::end_session(&api, &mut session),
        Err(ClientError::NoAssessment)
    ));
    assert!(!session.is_ended());
}

#[test]
fn contact_error_carries_service_message() {
    let (addr, _rx) = stub(vec![(422, r#"{"detail": "Invalid email address"}"#)]);
    let api = client(addr);
    let request = ContactRequest {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        message: "Hello".to_string(),
    };

    match flow::submit_contact(&api, &request) {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "Invalid email address");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn recommendations_prefer_service_then_fall_back() {
    let (addr, rx) = stub(vec![(
        200,
        r#"{"success": true, "recommendations": [{"title": "Walk", "description": "Go outside."}]}"#,
    )]);
    let api = client(addr);
    let remote = flow::subscale_recommendations(&api, Subscale::Anxiety);
    assert_eq!(remote.len(), 1);
    assert_eq!(remote[0].title, "Walk");
    assert_eq!(rx.recv().unwrap().request_line, "GET /api/recommendations/anxiety HTTP/1.1");

    let local = flow::subscale_recommendations(&unreachable_client(), Subscale::Anxiety);
    assert_eq!(local[0].title, "Breathing Exercises");
    assert_eq!(local.len(), 2);
}

#[test]
fn ending_twice_sends_one_report() {
    let (addr, rx) = stub(vec![
        (200, ASSESS_OK),
        (200, r#"{"success": true, "message": "Session report sent successfully"}"#),
        (200, r#"{"success": true, "message": "Session report sent successfully"}"#),
    ]);
    let api = client(addr);
    let mut session = ready_session(&[1; 21]);
    flow::submit_assessment(&api, &mut session).unwrap();

    assert!(flow::end_session(&api, &mut session).unwrap().delivered);
    assert!(matches!(
        flow::end_session(&api, &mut session),
        Err(ClientError::SessionEnded)
    ));

    let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(first.request_line, "POST /api/assess HTTP/1.1");
    let second = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(second.request_line, "POST /api/end-session HTTP/1.1");
    assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
}

#[test]
fn ended_session_rejects_new_assessment() {
    let api = unreachable_client();
    let mut session = ready_session(&[1; 21]);
    flow::submit_assessment(&api, &mut session).unwrap();
    flow::end_session(&api, &mut session).unwrap();
    let ended_at = session.ended_at;

    assert!(matches!(
        session.set_answers(&[3; 21]),
        Err(ClientError::SessionEnded)
    ));
    assert!(matches!(
        flow::submit_assessment(&api, &mut session),
        Err(ClientError::SessionEnded)
    ));
    assert_eq!(session.results().unwrap().depression.score, 14);
    assert_eq!(session.ended_at, ended_at);

    session.reset();
    session.start(user()).unwrap();
    session.set_answers(&[3; 21]).unwrap();
    let outcome = flow::submit_assessment(&api, &mut session).unwrap();
    assert_eq!(outcome.results.depression.score, 42);
}
