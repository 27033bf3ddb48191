//! Server configuration: compiled defaults plus environment overrides.
//!
//! Every knob has a default baked in; `ANKH_*` environment variables
//! override them one by one. Invalid values are logged and ignored, so a
//! typo in the environment cannot keep the server from starting.

use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the ankh server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JSON file overriding the built-in glyph table. Absent means the
    /// compiled table is used.
    pub glyph_map_path: Option<PathBuf>,
    pub ledger_path: PathBuf,
    pub translate_base_url: String,
    pub translate_timeout_ms: u64,
    pub ocr_base_url: String,
    pub ocr_timeout_ms: u64,
    pub source_lang: String,
    /// The language the glyph table covers. Not overridable.
    pub target_lang: String,
    pub ocr_languages: String,
    pub max_upload_bytes: usize,
    pub allowed_image_ext: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            glyph_map_path: None,
            ledger_path: PathBuf::from("data/word_counts.json"),
            translate_base_url: "http://127.0.0.1:5000".to_string(),
            translate_timeout_ms: 15_000,
            ocr_base_url: "http://127.0.0.1:8884".to_string(),
            ocr_timeout_ms: 30_000,
            source_lang: "ar".to_string(),
            target_lang: "en".to_string(),
            ocr_languages: "ara".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            allowed_image_ext: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    /// Defaults with `ANKH_*` environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // ── Listener ────────────────────────────────────────────────
        if let Some(v) = read_env_string("ANKH_HOST") {
            config.host = v;
        }
        if let Some(v) = read_env_u16("ANKH_PORT", 1, 65535) {
            config.port = v;
        }

        // ── Resources ───────────────────────────────────────────────
        if let Some(v) = read_env_string("ANKH_GLYPHS_PATH") {
            config.glyph_map_path = Some(PathBuf::from(v));
        }
        if let Some(v) = read_env_string("ANKH_LEDGER_PATH") {
            config.ledger_path = PathBuf::from(v);
        }

        // ── Collaborators ───────────────────────────────────────────
        if let Some(v) = read_env_string("ANKH_TRANSLATE_URL") {
            config.translate_base_url = v;
        }
        if let Some(v) = read_env_u64("ANKH_TRANSLATE_TIMEOUT_MS", 100, 600_000) {
            config.translate_timeout_ms = v;
        }
        if let Some(v) = read_env_string("ANKH_OCR_URL") {
            config.ocr_base_url = v;
        }
        if let Some(v) = read_env_u64("ANKH_OCR_TIMEOUT_MS", 100, 600_000) {
            config.ocr_timeout_ms = v;
        }
        if let Some(v) = read_env_string("ANKH_SOURCE_LANG") {
            config.source_lang = v;
        }
        if let Some(v) = read_env_string("ANKH_OCR_LANGS") {
            config.ocr_languages = v;
        }

        // ── Uploads ─────────────────────────────────────────────────
        if let Some(v) = read_env_usize("ANKH_MAX_UPLOAD_BYTES", 1024, 1_073_741_824) {
            config.max_upload_bytes = v;
        }

        config
    }

    pub fn translate_timeout(&self) -> Duration {
        Duration::from_millis(self.translate_timeout_ms)
    }

    pub fn ocr_timeout(&self) -> Duration {
        Duration::from_millis(self.ocr_timeout_ms)
    }

    /// Case-insensitive check against the allowed upload extensions.
    pub fn is_allowed_extension(&self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        self.allowed_image_ext.iter().any(|a| *a == ext)
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u16(name: &str, min: u16, max: u16) -> Option<u16> {
    let val = std::env::var(name).ok()?;
    let result = parse_u16_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u16 env var, ignoring");
    }
    result
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

fn read_env_usize(name: &str, min: usize, max: usize) -> Option<usize> {
    let val = std::env::var(name).ok()?;
    let result = parse_usize_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid usize env var, ignoring");
    }
    result
}
