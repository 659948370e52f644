#[tokio::main]
async fn main() -> anyhow::Result<()> {
    examprep_backend::run().await
}
