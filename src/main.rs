use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    sensecoach::run().await
}
