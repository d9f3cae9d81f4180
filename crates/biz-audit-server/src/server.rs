use std::collections::HashMap;
use std::io::{self, BufRead, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use biz_audit_copy::Locale;
use biz_audit_core::{AuditEngine, AuditError, RawAnswers, Report};
use biz_audit_wizard::{AuditSession, Questionnaire, SessionError};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::protocol::{
    JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR, SESSION_CAPACITY, SESSION_NOT_FOUND, VALIDATION_FAILED,
};

const SERVER_NAME: &str = "biz-audit-server";
/// Largest request body accepted on either transport.
pub const MAX_FRAME_BYTES: usize = 1024 * 1024;
const INTERNAL_ERROR: i64 = -32603;

pub struct AuditServer {
    config: ServerConfig,
    questionnaires: HashMap<Locale, Arc<Questionnaire>>,
    engine: AuditEngine,
    sessions: Mutex<HashMap<String, SessionSlot>>,
    session_counter: Mutex<u64>,
}

struct SessionSlot {
    session: AuditSession,
    locale: Locale,
    expires_ms: u64,
}

#[derive(Debug, Default, Deserialize)]
struct DescribeParams {
    #[serde(default)]
    locale: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateParams {
    #[serde(default)]
    answers: Value,
    locale: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StartParams {
    locale: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionParams {
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct AnswerParams {
    session_id: String,
    key: String,
    #[serde(default)]
    value: Value,
}

impl AuditServer {
    pub fn new(config: ServerConfig) -> Self {
        let engine = AuditEngine::new(config.policy());
        Self {
            config,
            questionnaires: Locale::ALL
                .into_iter()
                .map(|locale| (locale, Arc::new(Questionnaire::localized(locale))))
                .collect(),
            engine,
            sessions: Mutex::new(HashMap::new()),
            session_counter: Mutex::new(1),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id.unwrap_or(Value::Null),
                INVALID_REQUEST,
                "invalid jsonrpc version",
            ));
        }

        // Notifications get no response.
        let id = request.id?;
        debug!(method = %request.method, "rpc request");

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(
                id,
                json!({
                    "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")},
                    "locale": self.config.locale.code(),
                    "capabilities": {
                        "sessions": true,
                        "maxSessions": self.config.max_sessions
                    }
                }),
            ),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "questionnaire/describe" => self.exec_describe(id, request.params),
            "audit/generate" => self.exec_generate(id, request.params),
            "session/start" => self.exec_session_start(id, request.params),
            "session/answer" => self.exec_session_answer(id, request.params),
            "session/advance" => self.with_session(id, request.params, |session| {
                let progress = session.advance()?;
                Ok(json!({ "progress": progress }))
            }),
            "session/retreat" => self.with_session(id, request.params, |session| {
                Ok(json!({ "progress": session.retreat() }))
            }),
            "session/reset" => self.with_session(id, request.params, |session| {
                Ok(json!({ "progress": session.reset(), "phase": session.phase() }))
            }),
            "session/submit" => self.with_session(id, request.params, |session| {
                let report = session.submit()?;
                Ok(report_result(report))
            }),
            "session/state" => self.with_session(id, request.params, |session| {
                Ok(json!({
                    "progress": session.progress(),
                    "phase": session.phase(),
                    "answers": session.answers(),
                    "report": session.report()
                }))
            }),
            "session/end" => self.exec_session_end(id, request.params),
            _ => JsonRpcResponse::error(id, METHOD_NOT_FOUND, "method not found"),
        };

        Some(response)
    }

    fn exec_describe(&self, id: Value, params: Value) -> JsonRpcResponse {
        let args: DescribeParams = match parse_params_optional(params) {
            Ok(v) => v,
            Err(resp) => return with_id(resp, id),
        };
        let locale = self.resolve_locale(args.locale.as_deref());
        JsonRpcResponse::success(id, self.describe(locale))
    }

    fn questionnaire(&self, locale: Locale) -> Arc<Questionnaire> {
        self.questionnaires
            .get(&locale)
            .cloned()
            .unwrap_or_else(|| Arc::new(Questionnaire::localized(locale)))
    }

    fn describe(&self, locale: Locale) -> Value {
        let questionnaire = self.questionnaire(locale);
        json!({
            "locale": locale.code(),
            "total": questionnaire.len(),
            "steps": questionnaire.steps()
        })
    }

    fn exec_generate(&self, id: Value, params: Value) -> JsonRpcResponse {
        let args: GenerateParams = match parse_params_optional(params) {
            Ok(v) => v,
            Err(resp) => return with_id(resp, id),
        };
        let answers = match answers_from_value(&args.answers) {
            Ok(v) => v,
            Err(msg) => return JsonRpcResponse::error(id, INVALID_PARAMS, msg),
        };
        let locale = self.resolve_locale(args.locale.as_deref());

        match self.engine_for(locale).generate_from_form(&answers) {
            Ok(report) => JsonRpcResponse::success(id, report_result(&report)),
            Err(err) => audit_error_response(id, &err, locale),
        }
    }

    fn exec_session_start(&self, id: Value, params: Value) -> JsonRpcResponse {
        let args: StartParams = match parse_params_optional(params) {
            Ok(v) => v,
            Err(resp) => return with_id(resp, id),
        };
        let locale = self.resolve_locale(args.locale.as_deref());

        let now = now_ms();
        let mut sessions = self.sessions.lock();
        let expired = cleanup_expired_sessions_locked(&mut sessions, now);
        if expired > 0 {
            debug!(expired, "expired idle sessions");
        }
        if sessions.len() >= self.config.max_sessions {
            warn!(live = sessions.len(), "session capacity reached");
            return JsonRpcResponse::error(id, SESSION_CAPACITY, "session capacity reached");
        }

        let session_id = {
            let mut counter = self.session_counter.lock();
            let session_id = format!("audit-{now}-{}", *counter);
            *counter = counter.saturating_add(1);
            session_id
        };
        let session = AuditSession::new(self.questionnaire(locale), self.engine_for(locale));
        let progress = session.progress();
        sessions.insert(
            session_id.clone(),
            SessionSlot {
                session,
                locale,
                expires_ms: now.saturating_add(self.config.session_ttl_ms),
            },
        );
        info!(session = %session_id, "session started");

        JsonRpcResponse::success(
            id,
            json!({
                "session_id": session_id,
                "locale": locale.code(),
                "progress": progress
            }),
        )
    }

    fn exec_session_answer(&self, id: Value, params: Value) -> JsonRpcResponse {
        let args: AnswerParams = match parse_params(params) {
            Ok(v) => v,
            Err(resp) => return with_id(resp, id),
        };
        let Some(value) = scalar_text(&args.value) else {
            return JsonRpcResponse::error(
                id,
                INVALID_PARAMS,
                format!("value for {} must be a string or number", args.key),
            );
        };
        self.with_session(id, json!({ "session_id": args.session_id }), |session| {
            session.set_answer(&args.key, &value)?;
            Ok(json!({ "progress": session.progress(), "phase": session.phase() }))
        })
    }

    fn exec_session_end(&self, id: Value, params: Value) -> JsonRpcResponse {
        let args: SessionParams = match parse_params(params) {
            Ok(v) => v,
            Err(resp) => return with_id(resp, id),
        };
        if self.sessions.lock().remove(&args.session_id).is_none() {
            return JsonRpcResponse::error(id, SESSION_NOT_FOUND, "unknown session id");
        }
        info!(session = %args.session_id, "session ended");
        JsonRpcResponse::success(id, json!({ "ended": true }))
    }

    fn with_session<F>(&self, id: Value, params: Value, op: F) -> JsonRpcResponse
    where
        F: FnOnce(&mut AuditSession) -> Result<Value, SessionError>,
    {
        let args: SessionParams = match parse_params(params) {
            Ok(v) => v,
            Err(resp) => return with_id(resp, id),
        };

        let now = now_ms();
        let mut sessions = self.sessions.lock();
        cleanup_expired_sessions_locked(&mut sessions, now);
        let Some(slot) = sessions.get_mut(&args.session_id) else {
            return JsonRpcResponse::error(id, SESSION_NOT_FOUND, "unknown session id");
        };
        slot.expires_ms = now.saturating_add(self.config.session_ttl_ms);

        match op(&mut slot.session) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => session_error_response(id, &err, slot.locale),
        }
    }

    fn resolve_locale(&self, raw: Option<&str>) -> Locale {
        raw.and_then(Locale::parse).unwrap_or(self.config.locale)
    }

    fn engine_for(&self, locale: Locale) -> AuditEngine {
        if locale == self.engine.policy().locale {
            return self.engine.clone();
        }
        AuditEngine::new(self.engine.policy().clone().with_locale(locale))
    }

    pub fn serve_stdio(&self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve_io(stdin.lock(), stdout.lock())
    }

    /// Accepts both newline-delimited JSON and `Content-Length` framed
    /// messages; each response uses the framing of its request.
    pub fn serve_io<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> io::Result<()> {
        let mut line = String::new();

        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }

            let trimmed = line.trim_end_matches(['\r', '\n']).trim_start();
            if trimmed.is_empty() {
                continue;
            }

            let (payload, frame) = if is_stdio_header_line(trimmed) {
                let declared = match read_frame_length(&mut reader, trimmed) {
                    Ok(v) => v,
                    Err(err) => {
                        let response = JsonRpcResponse::error(
                            Value::Null,
                            PARSE_ERROR,
                            format!("invalid stdio frame: {err}"),
                        );
                        write_stdio_response(&mut writer, &response, StdioFrame::LineDelimited)?;
                        continue;
                    }
                };
                if declared > MAX_FRAME_BYTES {
                    warn!(declared, limit = MAX_FRAME_BYTES, "stdio frame rejected");
                    skip_frame_body(&mut reader, declared)?;
                    let response = JsonRpcResponse::error(
                        Value::Null,
                        PARSE_ERROR,
                        format!("frame of {declared} bytes exceeds the {MAX_FRAME_BYTES} byte limit"),
                    );
                    write_stdio_response(&mut writer, &response, StdioFrame::ContentLength)?;
                    continue;
                }

                let mut body = vec![0_u8; declared];
                if let Err(err) = reader.read_exact(&mut body) {
                    let response = JsonRpcResponse::error(
                        Value::Null,
                        PARSE_ERROR,
                        format!("invalid stdio frame body: {err}"),
                    );
                    write_stdio_response(&mut writer, &response, StdioFrame::ContentLength)?;
                    continue;
                }
                (body, StdioFrame::ContentLength)
            } else {
                (trimmed.as_bytes().to_vec(), StdioFrame::LineDelimited)
            };

            let request: JsonRpcRequest = match serde_json::from_slice(&payload) {
                Ok(v) => v,
                Err(err) => {
                    let response =
                        JsonRpcResponse::error(Value::Null, PARSE_ERROR, format!("parse error: {err}"));
                    write_stdio_response(&mut writer, &response, frame)?;
                    continue;
                }
            };

            if let Some(response) = self.handle_request(request) {
                write_stdio_response(&mut writer, &response, frame)?;
            }
        }

        Ok(())
    }

    pub fn serve_http(&self, addr: &str) -> io::Result<()> {
        let listener = TcpListener::bind(addr)?;
        info!(addr = %listener.local_addr()?, "biz-audit http listening");
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(err) = self.handle_http_connection(stream) {
                        warn!(%err, "http request error");
                    }
                }
                Err(err) => {
                    warn!(%err, "http accept error");
                }
            }
        }
        Ok(())
    }

    fn handle_http_connection(&self, mut stream: TcpStream) -> io::Result<()> {
        let mut reader = io::BufReader::new(stream.try_clone()?);
        let response = match read_http_request(&mut reader)? {
            HttpRead::Closed => return Ok(()),
            HttpRead::Request(req) => self.dispatch_http_request(&req),
            HttpRead::Rejected(response) => response,
        };
        write_http_response(&mut stream, &response)
    }

    fn dispatch_http_request(&self, req: &HttpRequest) -> HttpResponse {
        if req.method == "GET" && req.path == "/health" {
            return HttpResponse::json(200, json!({"status":"ok"}));
        }

        if req.method == "GET" && req.path == "/questionnaire" {
            let locale = self.resolve_locale(req.query.get("locale").map(String::as_str));
            return HttpResponse::json(200, self.describe(locale));
        }

        if req.method == "POST" && req.path == "/audit" {
            let body: Value = match serde_json::from_slice(&req.body) {
                Ok(v) => v,
                Err(err) => {
                    return HttpResponse::json(
                        400,
                        json!({"error":"invalid_request","message": format!("parse error: {err}")}),
                    )
                }
            };
            let answers = match answers_from_value(&body) {
                Ok(v) => v,
                Err(msg) => {
                    return HttpResponse::json(
                        400,
                        json!({"error":"invalid_request","message": msg}),
                    )
                }
            };
            let locale = self.resolve_locale(req.query.get("locale").map(String::as_str));
            return match self.engine_for(locale).generate_from_form(&answers) {
                Ok(report) => match serde_json::to_value(&report) {
                    Ok(payload) => HttpResponse::json(200, payload),
                    Err(_) => HttpResponse::json(
                        500,
                        json!({"error":"internal_error","message":"failed to serialize report"}),
                    ),
                },
                Err(err) => HttpResponse::json(
                    422,
                    json!({
                        "error": "validation_failed",
                        "message": err.to_string(),
                        "prompt": err.prompt(locale)
                    }),
                ),
            };
        }

        if req.path != "/rpc" {
            return HttpResponse::json(
                404,
                json!({"error":"not_found","message":"unknown route"}),
            );
        }
        if req.method != "POST" {
            return HttpResponse::json(
                405,
                json!({"error":"method_not_allowed","message":"use POST for /rpc"}),
            );
        }

        let rpc: JsonRpcRequest = match serde_json::from_slice(&req.body) {
            Ok(v) => v,
            Err(err) => {
                return HttpResponse::json(
                    400,
                    json!({"jsonrpc":"2.0","id": Value::Null, "error":{"code": PARSE_ERROR,"message": format!("parse error: {err}")}}),
                )
            }
        };
        match self.handle_request(rpc) {
            Some(v) => match serde_json::to_value(v) {
                Ok(payload) => HttpResponse::json(200, payload),
                Err(_) => HttpResponse::json(
                    500,
                    json!({"error":"internal_error","message":"failed to serialize rpc response"}),
                ),
            },
            None => HttpResponse::empty(204),
        }
    }
}

impl Default for AuditServer {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

fn cleanup_expired_sessions_locked(sessions: &mut HashMap<String, SessionSlot>, now: u64) -> usize {
    let before = sessions.len();
    sessions.retain(|_, slot| slot.expires_ms > now);
    before.saturating_sub(sessions.len())
}

fn report_result(report: &Report) -> Value {
    match serde_json::to_value(report) {
        Ok(structured) => json!({
            "content": [{"type": "text", "text": report.render_text()}],
            "structuredContent": structured
        }),
        Err(err) => json!({
            "content": [{"type": "text", "text": report.render_text()}],
            "structuredContent": Value::Null,
            "warning": format!("failed to serialize report: {err}")
        }),
    }
}

fn audit_error_response(id: Value, err: &AuditError, locale: Locale) -> JsonRpcResponse {
    match err {
        AuditError::InvalidPolicy(_) => JsonRpcResponse::error(id, INTERNAL_ERROR, err.to_string()),
        _ => JsonRpcResponse::error_with_data(
            id,
            VALIDATION_FAILED,
            err.to_string(),
            Some(json!({ "prompt": err.prompt(locale) })),
        ),
    }
}

fn session_error_response(id: Value, err: &SessionError, locale: Locale) -> JsonRpcResponse {
    match err {
        SessionError::Audit(inner) => audit_error_response(id, inner, locale),
        SessionError::UnknownField(_) => JsonRpcResponse::error(id, INVALID_PARAMS, err.to_string()),
        SessionError::InvalidQuestionnaire(_) => {
            JsonRpcResponse::error(id, INTERNAL_ERROR, err.to_string())
        }
        SessionError::StepIncomplete { .. } | SessionError::UnknownOption { .. } => {
            JsonRpcResponse::error_with_data(
                id,
                VALIDATION_FAILED,
                err.to_string(),
                Some(json!({ "prompt": err.prompt(locale) })),
            )
        }
    }
}

fn with_id(mut response: JsonRpcResponse, id: Value) -> JsonRpcResponse {
    response.id = id;
    response
}

fn parse_params<T: for<'de> Deserialize<'de>>(params: Value) -> Result<T, JsonRpcResponse> {
    if params.is_null() {
        return Err(JsonRpcResponse::error(
            Value::Null,
            INVALID_PARAMS,
            "missing params",
        ));
    }
    serde_json::from_value(params).map_err(|err| {
        JsonRpcResponse::error(Value::Null, INVALID_PARAMS, format!("invalid params: {err}"))
    })
}

fn parse_params_optional<T: for<'de> Deserialize<'de> + Default>(
    params: Value,
) -> Result<T, JsonRpcResponse> {
    if params.is_null() {
        return Ok(T::default());
    }
    parse_params(params)
}

/// Flattens a JSON object of form answers; numbers are kept as typed.
fn answers_from_value(value: &Value) -> Result<RawAnswers, String> {
    let object = match value {
        Value::Object(map) => map,
        Value::Null => return Ok(RawAnswers::new()),
        _ => return Err("answers must be a JSON object".to_string()),
    };
    let mut answers = RawAnswers::new();
    for (key, raw) in object {
        if raw.is_null() {
            continue;
        }
        let Some(text) = scalar_text(raw) else {
            return Err(format!("answer {key} must be a string or number"));
        };
        answers.insert(key.clone(), text);
    }
    Ok(answers)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "yes" } else { "no" }.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[derive(Debug)]
struct HttpRequest {
    method: String,
    path: String,
    query: HashMap<String, String>,
    body: Vec<u8>,
}

struct HttpResponse {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

impl HttpResponse {
    fn json(status: u16, value: Value) -> Self {
        let body = serde_json::to_vec(&value).unwrap_or_else(|_| b"{}".to_vec());
        Self {
            status,
            content_type: "application/json",
            body,
        }
    }

    fn empty(status: u16) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: Vec::new(),
        }
    }
}

enum HttpRead {
    Closed,
    Request(HttpRequest),
    /// Answered without dispatch; the body, if any, is never read.
    Rejected(HttpResponse),
}

fn bad_request(message: impl Into<String>) -> HttpRead {
    HttpRead::Rejected(HttpResponse::json(
        400,
        json!({"error":"invalid_request","message": message.into()}),
    ))
}

fn read_http_request<R: BufRead>(reader: &mut R) -> io::Result<HttpRead> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(HttpRead::Closed);
    }
    let request_line = line.trim_end_matches(['\r', '\n']);
    if request_line.is_empty() {
        return Ok(HttpRead::Closed);
    }

    let mut parts = request_line.split_whitespace();
    let (Some(method), Some(target)) = (parts.next(), parts.next()) else {
        return Ok(bad_request("malformed request line"));
    };
    let (path, query) = split_target(target);

    let mut declared = 0usize;
    let mut header = String::new();
    loop {
        header.clear();
        if reader.read_line(&mut header)? == 0 {
            break;
        }
        let header = header.trim_end_matches(['\r', '\n']);
        if header.is_empty() {
            break;
        }
        match content_length_header(header) {
            Some(Ok(len)) => declared = len,
            Some(Err(err)) => return Ok(bad_request(err.to_string())),
            None => {}
        }
    }

    if declared > MAX_FRAME_BYTES {
        warn!(declared, limit = MAX_FRAME_BYTES, "http body rejected");
        return Ok(HttpRead::Rejected(HttpResponse::json(
            413,
            json!({
                "error": "payload_too_large",
                "message": format!("body of {declared} bytes exceeds the {MAX_FRAME_BYTES} byte limit")
            }),
        )));
    }

    let mut body = vec![0_u8; declared];
    reader.read_exact(&mut body)?;
    Ok(HttpRead::Request(HttpRequest {
        method: method.to_string(),
        path,
        query,
        body,
    }))
}

fn write_http_response<W: Write>(writer: &mut W, response: &HttpResponse) -> io::Result<()> {
    write!(
        writer,
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        http_reason_phrase(response.status),
        response.content_type,
        response.body.len()
    )?;
    writer.write_all(&response.body)?;
    writer.flush()
}

fn http_reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

/// Splits `/path?a=1&b` into the path and its query pairs.
fn split_target(target: &str) -> (String, HashMap<String, String>) {
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    let pairs = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key.to_string(), value.to_string())
        })
        .collect();
    (path.to_string(), pairs)
}

#[derive(Clone, Copy)]
enum StdioFrame {
    LineDelimited,
    ContentLength,
}

fn write_stdio_response<W: Write>(
    writer: &mut W,
    response: &JsonRpcResponse,
    frame: StdioFrame,
) -> io::Result<()> {
    match frame {
        StdioFrame::LineDelimited => {
            let serialized = serde_json::to_string(response)?;
            writeln!(writer, "{serialized}")?;
        }
        StdioFrame::ContentLength => {
            let serialized = serde_json::to_vec(response)?;
            write!(writer, "Content-Length: {}\r\n\r\n", serialized.len())?;
            writer.write_all(&serialized)?;
        }
    }
    writer.flush()
}

fn is_stdio_header_line(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    lower.starts_with("content-length:") || lower.starts_with("content-type:")
}

/// Reads the remaining frame headers and returns the declared body length.
fn read_frame_length<R: BufRead>(reader: &mut R, first_line: &str) -> io::Result<usize> {
    let mut declared = content_length_header(first_line).transpose()?;
    let mut header = String::new();
    loop {
        header.clear();
        if reader.read_line(&mut header)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "frame headers ended before the blank line",
            ));
        }
        let header = header.trim_end_matches(['\r', '\n']);
        if header.is_empty() {
            break;
        }
        if let Some(len) = content_length_header(header).transpose()? {
            declared = Some(len);
        }
    }
    declared.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "missing content-length header"))
}

/// `None` for other headers; an error when the length is not a number.
fn content_length_header(line: &str) -> Option<io::Result<usize>> {
    let (name, value) = line.split_once(':')?;
    if !name.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    let value = value.trim();
    Some(value.parse::<usize>().map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid content-length {value}: {err}"),
        )
    }))
}

/// Drains an oversized body so the stream stays aligned on the next frame.
fn skip_frame_body<R: Read>(reader: &mut R, declared: usize) -> io::Result<u64> {
    let limit = u64::try_from(declared).unwrap_or(u64::MAX);
    io::copy(&mut reader.take(limit), &mut io::sink())
}

#[allow(clippy::cast_possible_truncation)]
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
