//! Logging bootstrapper shared by every pinlock binary.

use env_logger::Env;
use serde_json::json;
use std::env;
use std::io::Write;
use std::sync::OnceLock;

static INIT: OnceLock<()> = OnceLock::new();

const FORMAT_ENV: &str = "PINLOCK_LOG_FORMAT";
const LEVEL_ENV: &str = "PINLOCK_LOG_LEVEL";

/// Initialize the global logger. The first caller wins; later calls are
/// no-ops.
///
/// `RUST_LOG` takes precedence, then `PINLOCK_LOG_LEVEL`, then the supplied
/// `default_level`. Output is plain text unless `PINLOCK_LOG_FORMAT=json`.
pub fn init(default_level: &str) {
    let _ = INIT.get_or_init(|| configure(default_level));
}

fn configure(default_level: &str) {
    let default_level = env::var(LEVEL_ENV).unwrap_or_else(|_| default_level.to_string());
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", &default_level);
    }

    let json_format = env::var(FORMAT_ENV)
        .map(|value| value.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let mut builder = env_logger::Builder::from_env(Env::default());
    if json_format {
        builder.format(|buf, record| {
            let payload = json!({
                "timestamp": buf.timestamp().to_string(),
                "level": record.level().to_string().to_lowercase(),
                "target": record.target(),
                "message": record.args().to_string(),
            });
            writeln!(buf, "{payload}")
        });
    }

    if let Err(err) = builder.try_init() {
        eprintln!("failed to initialize logger: {err}");
    }
}
