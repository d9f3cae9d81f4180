use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};

use serde_json::{json, Value};

fn spawn_daemon() -> std::process::Child {
    Command::new(env!("CARGO_BIN_EXE_biz-auditd"))
        .env("BIZ_AUDIT_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn biz-auditd")
}

#[test]
fn audit_generate_stdio_flow_works() {
    let mut child = spawn_daemon();
    let mut child_stdin = child.stdin.take().expect("stdin");
    let child_stdout = child.stdout.take().expect("stdout");
    let mut reader = BufReader::new(child_stdout);

    let req = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "audit/generate",
        "params": {
            "answers": {
                "hasCRM": "no",
                "hasSalesTeam": "no",
                "socialStatus": "good",
                "platform": "Instagram",
                "targetIncome": "5000",
                "avgCheck": "250",
                "conversion": "10"
            }
        }
    });

    writeln!(child_stdin, "{}", req).expect("write request");
    drop(child_stdin);

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");

    let response: Value = serde_json::from_str(&line).expect("parse response json");
    let plan = &response["result"]["structuredContent"]["plan"];
    assert_eq!(plan["min_budget"], 300);
    assert_eq!(plan["wasted_budget"], 120);
    assert_eq!(plan["total_budget"], 420);
    assert_eq!(
        response["result"]["structuredContent"]["risk"]["status_label"],
        "Yuqori Xavf"
    );

    let status = child.wait().expect("wait child");
    assert!(status.success());
}

fn write_framed(stdin: &mut std::process::ChildStdin, payload: &Value) {
    let body = serde_json::to_vec(payload).expect("serialize payload");
    let frame = format!("Content-Length: {}\r\n\r\n", body.len());
    stdin
        .write_all(frame.as_bytes())
        .expect("write frame header");
    stdin.write_all(&body).expect("write frame body");
    stdin.flush().expect("flush frame");
}

fn read_framed(reader: &mut BufReader<std::process::ChildStdout>) -> Value {
    let mut content_length: Option<usize> = None;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("read frame header");
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            break;
        }
        if let Some((name, value)) = trimmed.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse::<usize>().ok();
            }
        }
    }

    let len = content_length.expect("content-length header");
    let mut body = vec![0_u8; len];
    std::io::Read::read_exact(reader, &mut body).expect("read frame body");
    serde_json::from_slice(&body).expect("parse framed response")
}

#[test]
fn stdio_framed_session_flow_works() {
    let mut child = spawn_daemon();
    let mut child_stdin = child.stdin.take().expect("stdin");
    let child_stdout = child.stdout.take().expect("stdout");
    let mut reader = BufReader::new(child_stdout);

    write_framed(
        &mut child_stdin,
        &json!({"jsonrpc":"2.0","id":1,"method":"session/start","params":{"locale":"en"}}),
    );
    let started = read_framed(&mut reader);
    let session_id = started["result"]["session_id"]
        .as_str()
        .expect("session id")
        .to_string();
    assert_eq!(started["result"]["progress"]["total"], 7);

    write_framed(
        &mut child_stdin,
        &json!({"jsonrpc":"2.0","id":2,"method":"session/advance","params":{"session_id": session_id}}),
    );
    let refused = read_framed(&mut reader);
    assert_eq!(refused["error"]["code"], -32000);
    assert_eq!(
        refused["error"]["data"]["prompt"],
        "Please pick one of the options or enter your own value!"
    );

    write_framed(
        &mut child_stdin,
        &json!({"jsonrpc":"2.0","id":3,"method":"session/answer","params":{"session_id": session_id, "key":"hasCRM", "value":"yes"}}),
    );
    let answered = read_framed(&mut reader);
    assert!(answered.get("error").is_none());

    write_framed(
        &mut child_stdin,
        &json!({"jsonrpc":"2.0","id":4,"method":"session/advance","params":{"session_id": session_id}}),
    );
    let advanced = read_framed(&mut reader);
    assert_eq!(advanced["result"]["progress"]["current"], 1);

    write_framed(
        &mut child_stdin,
        &json!({"jsonrpc":"2.0","id":5,"method":"session/submit","params":{"session_id": session_id}}),
    );
    let submitted = read_framed(&mut reader);
    assert_eq!(
        submitted["error"]["data"]["prompt"],
        "Please enter the financial details!"
    );

    drop(child_stdin);
    let status = child.wait().expect("wait child");
    assert!(status.success());
}
