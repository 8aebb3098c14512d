use crate::cli::{Cli, MarkupArg, MetadataParserArg, WordPressArgs};
use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::Parser;
use wp_publish_lib::config::WordPressConfig;
use wp_publish_lib::document::{self, Document, MetadataParser};
use wp_publish_lib::ledger::{self, LedgerOutcome};
use wp_publish_lib::markup::MarkupConverter;
use wp_publish_lib::publisher::{PostRecord, PostStatus, Publisher};

impl From<MetadataParserArg> for MetadataParser {
    fn from(arg: MetadataParserArg) -> Self {
        match arg {
            MetadataParserArg::Yaml => MetadataParser::Yaml,
            MetadataParserArg::Flat => MetadataParser::Flat,
        }
    }
}

impl From<MarkupArg> for MarkupConverter {
    fn from(arg: MarkupArg) -> Self {
        match arg {
            MarkupArg::Html => MarkupConverter::Html,
            MarkupArg::Raw => MarkupConverter::Raw,
        }
    }
}

impl From<WordPressArgs> for WordPressConfig {
    fn from(args: WordPressArgs) -> Self {
        WordPressConfig::new(
            args.url.unwrap_or_default(),
            args.user.unwrap_or_default(),
            args.app_password.unwrap_or_default(),
        )
    }
}

pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    // One date for every ledger field written by this run.
    let today = Local::now().date_naive();

    execute(cli, today)
}

fn execute(cli: Cli, today: NaiveDate) -> anyhow::Result<()> {
    let Cli {
        file,
        publish,
        dry_run,
        write_id,
        ledger: ledger_path,
        metadata_parser,
        markup,
        wordpress,
    } = cli;

    if !file.exists() {
        bail!("File not found: {}", file.display());
    }

    println!("Reading: {}", file.display());
    let document = document::load(&file, metadata_parser.into())
        .with_context(|| format!("Failed to read input file: {}", file.display()))?;

    let status = PostStatus::from_publish_flag(publish);
    print_summary(&document, status);

    if dry_run {
        return print_dry_run(&document);
    }

    let config = WordPressConfig::from(wordpress);
    config.validate()?;

    let content = MarkupConverter::from(markup).convert(&document.body);

    println!("\nSending to WordPress...");
    let publisher = Publisher::new(config)?;
    let record = publisher
        .publish(&document.metadata, content, status)
        .context("Failed to publish to WordPress")?;
    print_record(&record);

    let outcome = ledger::update_ledger(&ledger_path, &record, &file, publish, today)
        .context("Post was saved in WordPress, but the content calendar could not be updated")?;
    if outcome != LedgerOutcome::Missing {
        println!("Updated content calendar");
    }

    if document.metadata.wordpress_id().is_none() {
        if write_id {
            document::write_remote_id(&file, &document, record.id)?;
            println!("Recorded wordpress_id: {} in {}", record.id, file.display());
        } else {
            println!("\nAdd this to your frontmatter:");
            println!("   wordpress_id: {}", record.id);
        }
    }

    Ok(())
}

fn print_summary(document: &Document, status: PostStatus) {
    let metadata = &document.metadata;
    println!(
        "Title: {}",
        metadata.title().as_deref().unwrap_or("Untitled")
    );
    println!("Slug: {}", metadata.slug().as_deref().unwrap_or("no-slug"));
    println!("Status: {}", status.as_str());
}

fn print_dry_run(document: &Document) -> anyhow::Result<()> {
    let frontmatter = serde_json::to_string_pretty(&document.metadata.to_json())?;

    println!("\n--- DRY RUN ---");
    println!("Frontmatter: {frontmatter}");
    println!("Body length: {} characters", document.body.chars().count());
    println!("No changes made.");
    Ok(())
}

fn print_record(record: &PostRecord) {
    println!("\nSuccess!");
    println!("   ID: {}", record.id);
    println!("   URL: {}", record.link);
    println!("   Status: {}", record.status);
}
