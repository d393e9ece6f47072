#[tokio::main]
async fn main() {
    if let Err(e) = mmi_backend::run().await {
        eprintln!("mmi-backend failed: {}", e);
        std::process::exit(1);
    }
}
