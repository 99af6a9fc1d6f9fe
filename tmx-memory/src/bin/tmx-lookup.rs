// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Query a TMX translation memory from the command line.
//!
//! Set `RUST_LOG=debug` to see why a phrase was left untranslated.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use tmx_memory::{MemoryConfig, Phrase, TmxIndexBuilder, TranslationMemory};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Parser)]
#[command(name = "tmx-lookup", version, about)]
struct Cli {
    /// JSON configuration with the plural policy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::Subcommand)]
enum Command {
    /// Translate a phrase using a translation memory.
    Translate {
        #[arg(id = "memory.tmx")]
        memory: PathBuf,
        #[arg(long)]
        locale: String,
        #[arg(long)]
        meta_key: String,
        /// The untranslated phrase, with `%{name}` placeholders.
        key: String,
    },
    /// Print the checksum of each locale.
    Checksum {
        #[arg(id = "memory.tmx")]
        memory: PathBuf,
        /// Only print the checksum of this locale.
        #[arg(long)]
        locale: Option<String>,
    },
    /// Print unit counts and checksums for each locale of each file.
    Report {
        #[arg(id = "memory.tmx", required = true)]
        memories: Vec<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<MemoryConfig> {
    match path {
        Some(path) => MemoryConfig::from_path(path),
        None => Ok(MemoryConfig::default()),
    }
}

fn load_memory(path: &Path, config: MemoryConfig) -> anyhow::Result<TranslationMemory> {
    let corpus = TmxIndexBuilder::new()
        .build_from_path(path)
        .with_context(|| format!("Could not load translation memory {}", path.display()))?;
    Ok(TranslationMemory::new(corpus, config))
}

#[allow(clippy::print_stdout)]
fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Translate {
            memory,
            locale,
            meta_key,
            key,
        } => {
            let memory = load_memory(&memory, config)?;
            println!("{}", memory.translation_for(&locale, &Phrase::new(key, meta_key)));
        }
        Command::Checksum { memory, locale } => {
            let memory = load_memory(&memory, config)?;
            match locale {
                Some(locale) => {
                    if memory.index(&locale).is_none() {
                        bail!("No translations for locale {locale}");
                    }
                    println!("{}", memory.checksum_for(&locale));
                }
                None => {
                    for locale in memory.locales() {
                        println!("{locale}\t{}", memory.checksum_for(locale));
                    }
                }
            }
        }
        Command::Report { memories } => {
            println!("file\tlocale\tmeta keys\tunits\tduplicated\tchecksum");
            for path in &memories {
                let memory = load_memory(path, config.clone())?;
                for locale in memory.locales() {
                    let Some(index) = memory.index(locale) else {
                        continue;
                    };
                    let stats = index.stats();
                    println!(
                        "{}\t{locale}\t{}\t{}\t{}\t{}",
                        path.display(),
                        stats.meta_keys,
                        stats.units,
                        stats.duplicated_keys,
                        memory.checksum_for(locale)
                    );
                }
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}
