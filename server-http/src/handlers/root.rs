pub const GREETING: &str = "Movie monster, at your service";

/// GET /
pub async fn root() -> &'static str {
    GREETING
}
