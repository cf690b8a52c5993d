/// Liveness only; the warehouse is not contacted.
pub async fn get_healthz() -> &'static str {
    "ok"
}
