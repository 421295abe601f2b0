//! `refugio generate <style>` – request a wallpaper and save it.

use anyhow::Result;
use refugio_core::checksum;
use refugio_core::config::RefugioConfig;
use refugio_core::generate::{CurlTransport, GenerateError, Generator, GeneratorSettings};
use refugio_core::verse::{SelectionTicker, SystemClock};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::build_selector;
use super::verse::print_selection;

pub async fn run_generate(cfg: &RefugioConfig, style: &str, output: Option<&Path>) -> Result<()> {
    let selector = Arc::new(build_selector(cfg)?);
    let ticker = SelectionTicker::start(
        selector,
        Arc::new(SystemClock),
        Duration::from_secs(cfg.tick_secs),
    );
    print_selection(&ticker.current());

    let generator = Generator::new(
        GeneratorSettings::from_config(cfg),
        Arc::new(CurlTransport::from_config(&cfg.imagen)),
    );

    println!("Creando tema \"{}\"...", style);
    let generation = generator.generate(style);
    tokio::pin!(generation);
    let mut updates = ticker.subscribe();

    // The verse keeps rotating while the request waits between retries.
    let result = loop {
        tokio::select! {
            res = &mut generation => break res,
            Ok(()) = updates.changed() => {
                let selection = updates.borrow_and_update().clone();
                tracing::debug!(
                    index = selection.index,
                    time = %selection.time_label,
                    "verse tick during generation"
                );
            }
        }
    };
    let selection = ticker.current();
    ticker.stop().await;

    let artifact = match result {
        Ok(artifact) => artifact,
        Err(err) => return Err(report(err)),
    };

    let path: PathBuf = match output {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(artifact.suggested_filename(selection.date)),
    };
    artifact.write_to(&path)?;
    let digest = checksum::verify_saved(&path, &artifact.sha256_hex())?;
    tracing::info!(path = %path.display(), sha256 = %digest, "saved wallpaper");
    println!("¡Tema listo! {}", path.display());
    println!("{}  {}", digest, path.display());
    Ok(())
}

/// Show the user-facing message and keep the typed error for the exit path.
fn report(err: GenerateError) -> anyhow::Error {
    tracing::error!(kind = err.kind(), "generation failed: {}", err);
    eprintln!("{}", err.user_message());
    anyhow::Error::new(err).context("wallpaper generation failed")
}
