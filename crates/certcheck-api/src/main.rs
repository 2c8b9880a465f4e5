use certcheck_core::Config;

// Use mimalloc as the global allocator for lower fragmentation under image workloads.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let (_state, router) = certcheck_api::setup::initialize_app(config.clone()).await?;

    certcheck_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
