use capafront::{AppContext, Config};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    capafront::config::load_dotenv();
    init_tracing();

    let config = Config::from_env()?;
    tracing::info!(api = %config.api_base_url, "starting capafront");
    let ctx = AppContext::from_config(config);

    dioxus::LaunchBuilder::new()
        .with_context(ctx)
        .launch(capafront::ui::App);
    Ok(())
}
