#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = lectern::run().await {
        eprintln!("lectern fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
