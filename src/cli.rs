// CLI layer: the `Command` enum is the full command table. Each variant
// maps its flags onto one `WebPurifyClient` call and renders the outcome
// as a single line on the given writer.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use crate::api::{Endpoints, WebPurifyClient};

/// Command-line client for the WebPurify moderation API.
#[derive(Parser, Debug)]
#[command(name = "webpurify-cli", version, about)]
pub struct Cli {
    /// Log more to stderr (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct Credential {
    /// WebPurify API key
    #[arg(long)]
    pub token: String,
}

#[derive(Args, Debug, Clone)]
pub struct TextArgs {
    /// Text to check for profanity
    #[arg(long)]
    pub text: String,

    /// Language of the text
    #[arg(long, default_value = "en")]
    pub lang: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check text for profanity; prints True if any was found
    #[command(alias = "checktext")]
    CheckText {
        #[command(flatten)]
        auth: Credential,
        #[command(flatten)]
        input: TextArgs,
    },

    /// Print the text with profanity masked out
    #[command(alias = "replacetext")]
    ReplaceText {
        #[command(flatten)]
        auth: Credential,
        #[command(flatten)]
        input: TextArgs,
        /// Symbol used to mask each profane character
        #[arg(long, default_value = "*")]
        replace_symbol: String,
    },

    /// Submit an image for review and print its image id
    #[command(alias = "checkimage")]
    CheckImage {
        #[command(flatten)]
        auth: Credential,
        /// URL of the image to submit
        #[arg(long)]
        image_url: String,
    },

    /// Print the nudity percentage of an image
    #[command(alias = "checknudityinimage")]
    CheckNudity {
        #[command(flatten)]
        auth: Credential,
        /// URL of the image to score
        #[arg(long)]
        image_url: String,
    },

    /// Print the review status (pending, approved, declined) of an image
    #[command(alias = "checkimagestatus")]
    CheckImageStatus {
        #[command(flatten)]
        auth: Credential,
        /// Image id returned by check-image
        #[arg(long)]
        image_id: String,
    },

    /// Add a word to the account blacklist
    #[command(alias = "addwordtoblacklist")]
    AddToBlacklist {
        #[command(flatten)]
        auth: Credential,
        /// Word to add
        #[arg(long)]
        word: String,
    },

    /// Remove a word from the account blacklist
    #[command(alias = "removewordfromblacklist")]
    RemoveFromBlacklist {
        #[command(flatten)]
        auth: Credential,
        /// Word to remove
        #[arg(long)]
        word: String,
    },

    /// Add a word to the account whitelist
    #[command(alias = "addwordtowhitelist")]
    AddToWhitelist {
        #[command(flatten)]
        auth: Credential,
        /// Word to add
        #[arg(long)]
        word: String,
    },

    /// Remove a word from the account whitelist
    #[command(alias = "removewordfromwhitelist")]
    RemoveFromWhitelist {
        #[command(flatten)]
        auth: Credential,
        /// Word to remove
        #[arg(long)]
        word: String,
    },
}

impl Command {
    pub fn token(&self) -> &str {
        let auth = match self {
            Command::CheckText { auth, .. }
            | Command::ReplaceText { auth, .. }
            | Command::CheckImage { auth, .. }
            | Command::CheckNudity { auth, .. }
            | Command::CheckImageStatus { auth, .. }
            | Command::AddToBlacklist { auth, .. }
            | Command::RemoveFromBlacklist { auth, .. }
            | Command::AddToWhitelist { auth, .. }
            | Command::RemoveFromWhitelist { auth, .. } => auth,
        };
        &auth.token
    }

    fn progress_message(&self) -> &'static str {
        match self {
            Command::CheckText { .. } => "Checking text...",
            Command::ReplaceText { .. } => "Replacing profanity...",
            Command::CheckImage { .. } => "Submitting image...",
            Command::CheckNudity { .. } => "Scoring image...",
            Command::CheckImageStatus { .. } => "Fetching image status...",
            Command::AddToBlacklist { .. } | Command::AddToWhitelist { .. } => "Adding word...",
            Command::RemoveFromBlacklist { .. } | Command::RemoveFromWhitelist { .. } => {
                "Removing word..."
            }
        }
    }

    /// Perform the remote call and render its outcome.
    fn execute(&self, client: &WebPurifyClient) -> crate::Result<String> {
        let line = match self {
            Command::CheckText { input, .. } => {
                render_flag(client.check_text(&input.text, &input.lang)?)
            }
            Command::ReplaceText {
                input,
                replace_symbol,
                ..
            } => client.replace_text(&input.text, &input.lang, replace_symbol)?,
            Command::CheckImage { image_url, .. } => client.submit_image(image_url)?,
            Command::CheckNudity { image_url, .. } => {
                render_percentage(client.check_nudity(image_url)?)
            }
            Command::CheckImageStatus { image_id, .. } => {
                client.image_status(image_id)?.to_string()
            }
            Command::AddToBlacklist { word, .. } => render_flag(client.add_to_blacklist(word)?),
            Command::RemoveFromBlacklist { word, .. } => {
                render_flag(client.remove_from_blacklist(word)?)
            }
            Command::AddToWhitelist { word, .. } => render_flag(client.add_to_whitelist(word)?),
            Command::RemoveFromWhitelist { word, .. } => {
                render_flag(client.remove_from_whitelist(word)?)
            }
        };
        Ok(line)
    }
}

/// Booleans print capitalised, as the service's own tooling does.
pub fn render_flag(value: bool) -> String {
    let text = if value { "True" } else { "False" };
    text.to_string()
}

/// Always keeps a fractional part, so 12 prints as `12.0`.
pub fn render_percentage(value: f64) -> String {
    format!("{value:?}")
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run one invocation against the production endpoints.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    run_with_endpoints(cli, Endpoints::default(), out)
}

pub fn run_with_endpoints(cli: &Cli, endpoints: Endpoints, out: &mut impl Write) -> Result<()> {
    let client = WebPurifyClient::with_endpoints(cli.command.token(), endpoints)?;

    // indicatif hides the spinner when stderr is not a terminal.
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(cli.command.progress_message());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = cli.command.execute(&client);
    spinner.finish_and_clear();

    writeln!(out, "{}", result?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["webpurify-cli"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn lang_defaults_to_en() {
        let cli = parse(&["check-text", "--token", "k", "--text", "hello"]);
        match cli.command {
            Command::CheckText { auth, input } => {
                assert_eq!(auth.token, "k");
                assert_eq!(input.text, "hello");
                assert_eq!(input.lang, "en");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn replace_symbol_defaults_to_star() {
        let cli = parse(&["replace-text", "--token", "k", "--text", "x", "--lang", "de"]);
        let Command::ReplaceText { input, replace_symbol, .. } = cli.command else {
            panic!("expected replace-text");
        };
        assert_eq!(input.lang, "de");
        assert_eq!(replace_symbol, "*");
    }

    #[test]
    fn token_is_required() {
        let err = Cli::try_parse_from(["webpurify-cli", "add-to-blacklist", "--word", "x"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn flat_command_names_are_aliases() {
        let cli = parse(&["checkimagestatus", "--token", "k", "--image-id", "42"]);
        assert!(matches!(cli.command, Command::CheckImageStatus { ref image_id, .. } if image_id == "42"));
        let cli = parse(&["removewordfromwhitelist", "--token", "t", "--word", "w"]);
        assert_eq!(cli.command.token(), "t");
    }

    #[test]
    fn verbose_is_global_and_counted() {
        let cli = parse(&["check-nudity", "-vv", "--token", "k", "--image-url", "http://x/y.jpg"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn rendering() {
        assert_eq!(render_flag(true), "True");
        assert_eq!(render_flag(false), "False");
        assert_eq!(render_percentage(12.0), "12.0");
        assert_eq!(render_percentage(87.5), "87.5");
    }
}
