use std::sync::Arc;

use color_eyre::eyre::Result;
use magic_tales::{
    OpenAiProvider,
    app::App,
    logging,
    settings::{self, Settings},
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let loaded = Settings::load();
    let settings = loaded.as_ref().cloned().unwrap_or_default();
    logging::init(settings::data_dir(), settings.debug_mode)?;
    log::info!("Magic Tales start: {}", chrono::Local::now());

    let notice = match (&loaded, settings.api_key()) {
        (Err(e), _) => {
            log::warn!(
                "Could not read {}, using default settings: {e}",
                Settings::default_path().display()
            );
            Some("settings.json could not be read. Using default settings.")
        }
        (Ok(_), Some(api_key)) if !settings.validate_api_key(&api_key).await => {
            Some("The API key was rejected. Check settings.json or OPENAI_API_KEY.")
        }
        (Ok(_), Some(_)) => None,
        (Ok(_), None) => Some("No API key found. Set OPENAI_API_KEY or add it to settings.json."),
    };

    let provider = Arc::new(OpenAiProvider::new(&settings));
    let mut app = App::new(settings, provider);
    if let Some(notice) = notice {
        app = app.with_notice(notice);
    }

    app.run().await
}
