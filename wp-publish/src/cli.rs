//! Defines the command-line interface for the application.

use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;
use wp_publish_lib::config::{APP_PASSWORD_VAR, URL_VAR, USER_VAR};
use wp_publish_lib::ledger::DEFAULT_LEDGER_PATH;

#[derive(Parser, Debug)]
#[command(
    name = "wp-publish",
    version,
    about = "Publish or update a WordPress post from a Markdown file."
)]
pub struct Cli {
    /// The Markdown file to publish.
    #[arg(value_name = "FILE_PATH")]
    pub file: PathBuf,

    /// Publish immediately. Without this flag the post is saved as a draft.
    #[arg(long)]
    pub publish: bool,

    /// Parse the file and show what would be sent, without contacting WordPress.
    #[arg(long)]
    pub dry_run: bool,

    /// After creating a new post, record its id as `wordpress_id` in the file's frontmatter.
    #[arg(long, conflicts_with = "dry_run")]
    pub write_id: bool,

    /// The JSON content calendar to keep in sync.
    #[arg(
        long,
        value_name = "LEDGER_PATH",
        env = "WP_PUBLISH_LEDGER",
        default_value = DEFAULT_LEDGER_PATH
    )]
    pub ledger: PathBuf,

    /// How to read the frontmatter block.
    #[arg(long, value_enum, default_value_t = MetadataParserArg::Yaml)]
    pub metadata_parser: MetadataParserArg,

    /// What to send as the post content.
    #[arg(long, value_enum, default_value_t = MarkupArg::Html)]
    pub markup: MarkupArg,

    #[command(flatten)]
    pub wordpress: WordPressArgs,
}

#[derive(Args, Debug)]
pub struct WordPressArgs {
    /// Your WordPress site URL (e.g., https://yourblog.com).
    #[arg(long, value_name = "URL", env = URL_VAR)]
    pub url: Option<String>,

    /// Your WordPress username.
    #[arg(long, value_name = "USER", env = USER_VAR)]
    pub user: Option<String>,

    /// An application password created under Users > Profile in WordPress.
    #[arg(long, value_name = "PASSWORD", env = APP_PASSWORD_VAR, hide_env_values = true)]
    pub app_password: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetadataParserArg {
    /// Full YAML, including nested fields such as `seo.description`.
    Yaml,
    /// One `key: value` per line; nested fields are ignored.
    Flat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkupArg {
    /// Convert Markdown to HTML.
    Html,
    /// Send the Markdown body unchanged.
    Raw,
}
