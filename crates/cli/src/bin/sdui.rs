use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    sdui_cli::main_entry().await
}
