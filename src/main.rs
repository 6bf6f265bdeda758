use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;

use cjk_autopair::cli::{render, CliArgs};
use cjk_autopair::config::{FileSettings, MemorySettings, PairingConfig, SettingsStore};
use cjk_autopair::editable::{Document, EditableSurface, TextBuffer};
use cjk_autopair::pairing::{PairingEngine, PairingSession};

fn main() -> Result<()> {
    cjk_autopair::tracing::init();

    let args = CliArgs::parse();

    let file = if args.no_config {
        None
    } else {
        Some(match &args.config {
            Some(path) => FileSettings::open(path),
            None => FileSettings::open_default()?,
        })
    };

    let mut config = file
        .as_ref()
        .map(|settings| settings.load_config())
        .unwrap_or_default();
    args.apply_overrides(&mut config);

    if args.save {
        let settings = file
            .as_ref()
            .context("--save needs a settings file (drop --no-config)")?;
        settings.save_config(&config)?;
    }

    let output = replay(&args, config)?;
    println!("{}", output);

    Ok(())
}

fn replay(args: &CliArgs, config: PairingConfig) -> Result<String> {
    let settings: Rc<dyn SettingsStore> = Rc::new(MemorySettings::new(config));
    let engine = PairingEngine::new(settings).context("Invalid pairing configuration")?;

    let mut doc = Document::with_text(&args.text);
    let end = doc.position_at(doc.buffer().len_chars());
    doc.set_cursor(end);

    let session = PairingSession::attach(engine, &mut doc);
    for step in &args.steps {
        step.apply(&mut doc, &session);
    }
    tracing::info!("Replayed {} steps", args.steps.len());

    Ok(render(&doc))
}
