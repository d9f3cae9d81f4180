use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

fn reserve_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("reserve addr");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr.to_string()
}

fn wait_for_http(addr: &str) {
    for _ in 0..80 {
        if TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    panic!("http server not ready on {addr}");
}

fn send_http(addr: &str, method: &str, path: &str, body: &str) -> String {
    let mut stream = TcpStream::connect(addr).expect("connect http");
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(request.as_bytes()).expect("write request");
    stream.flush().expect("flush");
    let mut buf = String::new();
    stream.read_to_string(&mut buf).expect("read response");
    buf
}

fn response_body(response: &str) -> &str {
    response.split("\r\n\r\n").nth(1).unwrap_or("")
}

fn spawn_http(addr: &str) -> Child {
    let child = Command::new(env!("CARGO_BIN_EXE_biz-auditd"))
        .env("BIZ_AUDITD_TRANSPORT", "http")
        .env("BIZ_AUDIT_HTTP_ADDR", addr)
        .env("BIZ_AUDIT_LOG", "off")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn biz-auditd");
    wait_for_http(addr);
    child
}

#[test]
fn http_health_and_audit_work() {
    let addr = reserve_addr();
    let mut child = spawn_http(&addr);

    let health = send_http(&addr, "GET", "/health", "");
    assert!(health.starts_with("HTTP/1.1 200"));
    assert!(response_body(&health).contains("\"status\":\"ok\""));

    let form = r#"{"hasCRM":"no","hasSalesTeam":"yes","platform":"Facebook","targetIncome":"1000","targetIncome_custom":"2500","avgCheck":"250","conversion":"10"}"#;
    let audit = send_http(&addr, "POST", "/audit?locale=en", form);
    assert!(audit.starts_with("HTTP/1.1 200"));
    let report: serde_json::Value =
        serde_json::from_str(response_body(&audit)).expect("report json");
    assert_eq!(report["plan"]["required_customers"], 10);
    assert_eq!(report["plan"]["required_leads"], 100);
    assert_eq!(report["risk"]["score"], 2);
    assert_eq!(report["risk"]["status_label"], "High risk");

    let refused = send_http(&addr, "POST", "/audit", r#"{"targetIncome":"","avgCheck":"","conversion":""}"#);
    assert!(refused.starts_with("HTTP/1.1 422"));
    assert!(response_body(&refused).contains("validation_failed"));

    let _ = child.kill();
    let _ = child.wait();
}

#[test]
fn http_rpc_session_flow_works() {
    let addr = reserve_addr();
    let mut child = spawn_http(&addr);

    let init = send_http(
        &addr,
        "POST",
        "/rpc",
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
    );
    assert!(init.starts_with("HTTP/1.1 200"));
    assert!(response_body(&init).contains("\"biz-audit-server\""));

    let start = send_http(
        &addr,
        "POST",
        "/rpc",
        r#"{"jsonrpc":"2.0","id":2,"method":"session/start"}"#,
    );
    let start_json: serde_json::Value =
        serde_json::from_str(response_body(&start)).expect("start json");
    let session_id = start_json["result"]["session_id"]
        .as_str()
        .expect("session id")
        .to_string();

    let retreat = send_http(
        &addr,
        "POST",
        "/rpc",
        &format!(
            r#"{{"jsonrpc":"2.0","id":3,"method":"session/retreat","params":{{"session_id":"{session_id}"}}}}"#
        ),
    );
    assert!(response_body(&retreat).contains("\"current\":0"));

    let missing = send_http(&addr, "GET", "/nope", "");
    assert!(missing.starts_with("HTTP/1.1 404"));

    let _ = child.kill();
    let _ = child.wait();
}

#[test]
fn http_rejects_oversized_body_and_stays_up() {
    let addr = reserve_addr();
    let mut child = spawn_http(&addr);

    let mut stream = TcpStream::connect(&addr).expect("connect http");
    let request = format!(
        "POST /rpc HTTP/1.1\r\nHost: {addr}\r\nContent-Length: 18446744073709551615\r\nConnection: close\r\n\r\n"
    );
    stream.write_all(request.as_bytes()).expect("write request");
    stream.flush().expect("flush");
    let mut rejected = String::new();
    stream.read_to_string(&mut rejected).expect("read response");
    assert!(rejected.starts_with("HTTP/1.1 413"));
    assert!(response_body(&rejected).contains("payload_too_large"));

    let health = send_http(&addr, "GET", "/health", "");
    assert!(health.starts_with("HTTP/1.1 200"));

    let _ = child.kill();
    let _ = child.wait();
}
