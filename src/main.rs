#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nudgeflow_lib::run().await
}
