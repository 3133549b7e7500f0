use std::path::Path;
use wedlot_core::AppConfig;

pub async fn handle_serve_command(
    mut config: AppConfig,
    data_dir: &Path,
    port: Option<u16>,
    announce: bool,
) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    wedlot_server::start_server(&config, data_dir, announce).await
}
