use anyhow::{Context, bail};
use clap::Parser;
use tbtail_core::export::export_to_path;
use tbtail_core::{Tailer, TracingSink};
use tbtail_logging::{LogBuffer, SubscriberBuilder};
use tbtail_viewer::{Cli, Target, ViewerConfig, app};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    config.apply_cli(&cli);
    config.validate()?;

    let target = Target::resolve(&cli.path)?;

    if let Some(output) = &cli.export {
        let _guard = SubscriberBuilder::new().with_config(config.batch_log()).init()?;

        let Target::File(spec) = target else {
            bail!("--export needs a single event file, got directory {}", cli.path.display());
        };

        let run_name = spec.name.clone();
        let mut tailer = Tailer::new([spec]);
        tailer.rescan(true, &mut TracingSink);
        let tags = export_to_path(&tailer, &run_name, output)
            .with_context(|| format!("failed to export {}", cli.path.display()))?;
        println!("exported {} tags to {}", tags, output.display());
        return Ok(());
    }

    let logs = LogBuffer::new(config.log.capture.capacity);
    let _guard = SubscriberBuilder::new()
        .with_config(config.interactive_log())
        .with_capture(logs.clone())
        .init()?;

    info!(path = %cli.path.display(), "tbtail starting");
    app::run(target, &config, &logs)
}
