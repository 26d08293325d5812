use crate::config::cli::Command;
use crate::config::Config;
use crate::domain::{MailKind, MailParseResult, Storage, StorageKeys};
use crate::error::Result;
use crate::infrastructure::HttpImageFetcher;
use crate::parsers::attachments::extract_attachments;
use crate::parsers::avatar::AvatarCompositor;
use crate::parsers::leaderboard::parse_leaderboard;
use crate::parsers::mail::parse_mail;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;

const STDIN_KEY: &str = "stdin";

/// Runs one CLI command: read the saved page, parse it, print the result and
/// keep a copy in the store when one is configured.
pub struct ParsingService {
    config: Config,
    store: Option<Arc<dyn Storage>>,
}

impl ParsingService {
    pub fn new(config: Config, store: Option<Arc<dyn Storage>>) -> Self {
        Self { config, store }
    }

    pub async fn run(&self) -> Result<()> {
        match self.config.args.command.clone() {
            Command::Mail { kind, files } => self.mail(&kind, &files).await,
            Command::Leaderboard { file } => self.leaderboard(&file).await,
            Command::Attachments { file } => self.attachments(&file).await,
            Command::Avatar { file, out } => self.avatar(&file, out.as_deref()).await,
        }
    }

    async fn mail(&self, kind: &str, files: &[PathBuf]) -> Result<()> {
        let kind: MailKind = kind.parse()?;

        let mut bodies = Vec::with_capacity(files.len());
        for file in files {
            bodies.push(read_input(file).await?);
        }

        let results: Vec<MailParseResult> = bodies
            .par_iter()
            .map(|body| parse_mail(body, kind))
            .collect();
        info!("Parsed {} {} mail bodies", results.len(), kind);

        for (file, result) in files.iter().zip(&results) {
            self.store_record(StorageKeys::MAIL_DIR, file, result)?;
        }
        print_json(&results)
    }

    async fn leaderboard(&self, file: &Path) -> Result<()> {
        let page = read_input(file).await?;
        let result = parse_leaderboard(&page);

        self.store_record(StorageKeys::LEADERBOARDS_DIR, file, &result)?;
        print_json(&result)
    }

    async fn attachments(&self, file: &Path) -> Result<()> {
        let fragment = read_input(file).await?;
        let items = extract_attachments(&fragment);
        info!("Found {} attachments", items.len());

        self.store_record(StorageKeys::ATTACHMENTS_DIR, file, &items)?;
        print_json(&items)
    }

    async fn avatar(&self, file: &Path, out: Option<&Path>) -> Result<()> {
        let page = read_input(file).await?;

        let fetcher = HttpImageFetcher::new(self.config.http_client.clone());
        let compositor =
            AvatarCompositor::new(fetcher).with_asset_origin(self.config.settings.asset_origin.as_str());

        let Some(svg) = compositor.generate(&page).await else {
            info!("No avatar found in {}", file.display());
            return Ok(());
        };

        if let Some(store) = &self.store {
            store.save_markup(StorageKeys::AVATARS_DIR, &record_key(file), &svg)?;
        }

        match out {
            Some(path) => {
                tokio::fs::write(path, &svg).await?;
                info!("Wrote avatar to {}", path.display());
            }
            None => println!("{}", svg),
        }
        Ok(())
    }

    fn store_record<T: Serialize + ?Sized>(&self, family: &str, file: &Path, record: &T) -> Result<()> {
        if let Some(store) = &self.store {
            store.save_record(family, &record_key(file), &serde_json::to_value(record)?)?;
        }
        Ok(())
    }
}

async fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        tokio::io::stdin().read_to_string(&mut input).await?;
        return Ok(input);
    }
    Ok(tokio::fs::read_to_string(path).await?)
}

fn record_key(path: &Path) -> String {
    if path == Path::new("-") {
        return STDIN_KEY.to_string();
    }
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| STDIN_KEY.to_string())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
