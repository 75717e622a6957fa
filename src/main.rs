use anyhow::Result;

use thatch::{SceneConfig, ThatchApp};

fn main() -> Result<()> {
    env_logger::init();

    // Optional first argument: directory holding the wall and straw textures
    let mut config = SceneConfig::default();
    if let Some(directory) = std::env::args_os().nth(1) {
        config = config.with_asset_directory(directory);
    }
    log::info!("Reading textures from {}", config.assets.directory.display());

    ThatchApp::new(config).run()
}
