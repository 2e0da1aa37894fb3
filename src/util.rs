static INIT_ONCE: std::sync::Once = std::sync::Once::new();

/// Install the fmt subscriber once; `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).try_init();
    });
}

/// Trim and strip a leading `r/` (or `/r/`). Case is kept; it ends up in file names.
pub fn normalize_community(s: &str) -> String {
    let s = s.trim();
    let s = s.strip_prefix('/').unwrap_or(s);
    let s = s.strip_prefix("r/").or_else(|| s.strip_prefix("R/")).unwrap_or(s);
    s.trim_end_matches('/').to_string()
}
