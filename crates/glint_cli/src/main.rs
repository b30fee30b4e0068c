use anyhow::{bail, Context, Result};
use glint_renderer::RenderConfig;
use std::path::PathBuf;

const USAGE: &str = "usage: glint <scene> <output> [width height] [--seed N]";

/// Parsed command line.
#[derive(Debug, PartialEq)]
struct Args {
    scene: PathBuf,
    output: PathBuf,
    config: RenderConfig,
}

impl Args {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut positional = Vec::new();
        let mut seed = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--seed" {
                let value = args.next().context("--seed needs a value")?;
                seed = Some(
                    value
                        .parse::<u64>()
                        .with_context(|| format!("invalid seed '{value}'"))?,
                );
            } else {
                positional.push(arg);
            }
        }

        let (scene, output, width, height) = match positional.as_slice() {
            [scene, output] => (scene, output, 500, 500),
            [scene, output, width, height] => (
                scene,
                output,
                parse_dimension("width", width)?,
                parse_dimension("height", height)?,
            ),
            _ => bail!(USAGE),
        };

        let mut config = RenderConfig::default().with_resolution(width, height);
        config.seed = seed;

        Ok(Self {
            scene: PathBuf::from(scene),
            output: PathBuf::from(output),
            config,
        })
    }
}

fn parse_dimension(name: &str, value: &str) -> Result<u32> {
    let n = value
        .parse::<u32>()
        .with_context(|| format!("invalid {name} '{value}'"))?;
    if n == 0 {
        bail!("{name} must be positive");
    }
    Ok(n)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse(std::env::args().skip(1))?;

    let scene = glint_core::load_scene(&args.scene, args.config.aspect_ratio())
        .with_context(|| format!("failed to load scene {}", args.scene.display()))?;

    let image = glint_renderer::render(&scene, &args.config).context("render failed")?;

    image
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    Ok(())
}
