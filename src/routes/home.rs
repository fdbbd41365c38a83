/// GET / — liveness check
pub async fn index() -> &'static str {
    "Server is up and running!"
}
