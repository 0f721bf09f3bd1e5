#[tokio::main]
async fn main() -> anyhow::Result<()> {
    inventory_web_lib::run().await
}
