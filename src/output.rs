use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// True when `UCDMERGE_QUIET` asks for no human-oriented console output
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("UCDMERGE_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}
