use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    xpath_forge_cli::cli::run().await
}
