use biz_audit_copy::Locale;
use biz_audit_core::{AuditPolicy, DEFAULT_COST_PER_LEAD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    Http,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub transport: Transport,
    pub http_addr: String,
    pub locale: Locale,
    pub cost_per_lead: f64,
    pub max_sessions: usize,
    pub session_ttl_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::Stdio,
            http_addr: "127.0.0.1:8790".to_string(),
            locale: Locale::default(),
            cost_per_lead: DEFAULT_COST_PER_LEAD,
            max_sessions: 1024,
            session_ttl_ms: 1_800_000,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        let transport = match std::env::var("BIZ_AUDITD_TRANSPORT") {
            Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
                "stdio" => Transport::Stdio,
                "http" => Transport::Http,
                _ => return Err("BIZ_AUDITD_TRANSPORT must be stdio or http".to_string()),
            },
            Err(_) => defaults.transport,
        };
        let http_addr = std::env::var("BIZ_AUDIT_HTTP_ADDR")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.http_addr);
        let locale = std::env::var("BIZ_AUDIT_LOCALE")
            .ok()
            .and_then(|v| Locale::parse(&v))
            .unwrap_or(defaults.locale);

        Ok(Self {
            transport,
            http_addr,
            locale,
            cost_per_lead: env_f64(
                "BIZ_AUDIT_COST_PER_LEAD",
                defaults.cost_per_lead,
                0.01,
                10_000.0,
            ),
            max_sessions: env_usize("BIZ_AUDIT_MAX_SESSIONS", defaults.max_sessions, 1, 100_000),
            session_ttl_ms: env_u64(
                "BIZ_AUDIT_SESSION_TTL_MS",
                defaults.session_ttl_ms,
                1_000,
                86_400_000,
            ),
        })
    }

    pub fn policy(&self) -> AuditPolicy {
        AuditPolicy {
            cost_per_lead: self.cost_per_lead,
            ..AuditPolicy::default().with_locale(self.locale)
        }
    }
}

fn env_usize(name: &str, default: usize, min: usize, max: usize) -> usize {
    clamped_usize(std::env::var(name).ok().as_deref(), default, min, max)
}

fn env_u64(name: &str, default: u64, min: u64, max: u64) -> u64 {
    clamped_u64(std::env::var(name).ok().as_deref(), default, min, max)
}

fn env_f64(name: &str, default: f64, min: f64, max: f64) -> f64 {
    clamped_f64(std::env::var(name).ok().as_deref(), default, min, max)
}

fn clamped_usize(raw: Option<&str>, default: usize, min: usize, max: usize) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
        .clamp(min, max)
}

fn clamped_u64(raw: Option<&str>, default: u64, min: u64, max: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
        .clamp(min, max)
}

/// Non-finite values fall back to the default.
fn clamped_f64(raw: Option<&str>, default: f64, min: f64, max: f64) -> f64 {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
        .clamp(min, max)
}
