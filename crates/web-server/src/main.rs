// Entry point for `cargo run -p web-server`: the dashboard alone, without the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = configuration::load_config(None)?;
    let _guard = configuration::init_tracing(&config.logging)?;
    web_server::run_server(&config).await
}
