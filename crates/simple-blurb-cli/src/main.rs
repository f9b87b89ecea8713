use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use simple_blurb_config::Config;
use simple_blurb_engine::{
    Block, BlockRegistry, BlurbContent, BlurbContentAttributes, MediaLibrary, SIMPLE_BLURB,
};

#[derive(Parser)]
#[command(name = "simple-blurb", version, about = "Simple Blurb block markup tool")]
struct Cli {
    /// Log rule resolution and every fallback
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of ~/.config/simple-blurb/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a freshly inserted simple-blurb
    New,

    /// Render blurb-content attributes (camelCase JSON) to saved markup
    Render {
        attributes: PathBuf,

        /// Print only the block's markup, without comment delimiters
        #[arg(long)]
        fragment: bool,
    },

    /// Print the attributes recovered from a saved post
    Extract { document: PathBuf },

    /// Fail unless re-saving a post reproduces it byte for byte
    Check { document: PathBuf },

    /// Apply a media catalog selection to blurb-content attributes
    SelectMedia {
        attributes: PathBuf,
        media_id: u64,

        /// Size variant to use; defaults to the configured slug
        #[arg(short, long)]
        size: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = load_config(cli.config.as_deref())?;
    let registry = BlockRegistry::with_defaults().with_version(config.schema_version()?);
    log::debug!("reading attributes as schema {}", registry.version());

    match cli.command {
        Command::New => {
            let block = registry.create(SIMPLE_BLURB)?;
            println!("{}", registry.serialize_blocks(&[block])?);
        }
        Command::Render {
            attributes,
            fragment,
        } => {
            let attributes = read_attributes(&attributes)?;
            for violation in attributes.validate() {
                log::warn!("{violation}");
            }
            if fragment {
                println!("{}", attributes.save());
            } else {
                let block = Block::BlurbContent(BlurbContent { attributes });
                println!("{}", registry.serialize_blocks(&[block])?);
            }
        }
        Command::Extract { document } => {
            let source = read_document(&document)?;
            let parsed = registry.parse_document(&source);
            for error in &parsed.errors {
                log::warn!("{}: {error}", document.display());
            }
            let summary = describe_blocks(&parsed.blocks)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Check { document } => {
            let source = read_document(&document)?;
            let parsed = registry.parse_document(&source);
            let saved = registry.serialize_document(&parsed)?;
            if saved != source.trim_end() {
                println!("{saved}");
                bail!(
                    "{}: saved markup differs from what the blocks produce",
                    document.display()
                );
            }
            for error in &parsed.errors {
                log::warn!("{}: {error}", document.display());
            }
            log::info!("{}: {} blocks valid", document.display(), parsed.blocks.len());
        }
        Command::SelectMedia {
            attributes,
            media_id,
            size,
        } => {
            let attributes = read_attributes(&attributes)?;
            let catalog = config.media_catalog()?;
            let item = catalog.fetch(media_id);
            let slug = size.unwrap_or_else(|| config.default_size_slug.clone());

            let selection = attributes.select_media(item.clone());
            let mut selected = selection.attributes;
            if let Some(notice) = &selection.notice {
                log::warn!("{notice}");
            } else if let Ok(item) = &item {
                selected = selected.select_size(item, &slug);
            }
            println!("{}", serde_json::to_string_pretty(&selected)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_path(path)?
            .with_context(|| format!("Config file {} does not exist", path.display()))?,
        None => Config::load()?.unwrap_or_default(),
    };
    Ok(config)
}

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_attributes(path: &Path) -> Result<BlurbContentAttributes> {
    let content = read_document(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse attributes in {}", path.display()))
}

/// Name and attributes of every blurb block, nested ones included.
fn describe_blocks(blocks: &[Block]) -> Result<Vec<Value>> {
    let mut out = Vec::new();
    for block in blocks {
        match block {
            Block::SimpleBlurb(blurb) => {
                out.push(json!({
                    "block": SIMPLE_BLURB,
                    "attributes": blurb.attributes.to_values()?,
                }));
                out.extend(describe_blocks(&blurb.inner_blocks)?);
            }
            Block::BlurbContent(blurb) => out.push(json!({
                "block": block.name(),
                "attributes": blurb.attributes.to_values()?,
            })),
            Block::Other(_) => {}
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn describes_nested_blurbs_and_skips_other_blocks() {
        let registry = BlockRegistry::with_defaults();
        let source = format!(
            "<!-- wp:paragraph -->\n<p>x</p>\n<!-- /wp:paragraph -->\n\n{}",
            registry
                .serialize_blocks(&[registry.create(SIMPLE_BLURB).unwrap()])
                .unwrap()
        );
        let parsed = registry.parse_document(&source);

        let summary = describe_blocks(&parsed.blocks).unwrap();
        let names: Vec<_> = summary.iter().map(|entry| entry["block"].clone()).collect();
        assert_eq!(
            names,
            vec![json!("jc-blocks/simple-blurb"), json!("jc-blocks/blurb-content")]
        );
        assert_eq!(summary[1]["attributes"]["imageSlug"], json!("full"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_select_media_arguments() {
        let cli = Cli::try_parse_from([
            "simple-blurb",
            "select-media",
            "attrs.json",
            "42",
            "--size",
            "medium",
        ])
        .unwrap();
        let Command::SelectMedia { media_id, size, .. } = cli.command else {
            panic!("expected select-media");
        };
        assert_eq!(media_id, 42);
        assert_eq!(size.as_deref(), Some("medium"));
    }
}
