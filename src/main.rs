use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::debug;
use phpcs_tool::commands::{self, Command, config::ConfigOverrides};
use std::ffi::OsString;
use std::path::PathBuf;

/// phpcs-tool - PHP Code Sniffer Tool
///
/// Install PHP_CodeSniffer standards ("sniffers") from the sniffer index and
/// wire them into phpcs.
///
/// Examples:
///   phpcs-tool show                        # List available sniffers
///   phpcs-tool install symfony/Symfony2    # Install a sniffer
#[derive(Parser, Debug)]
#[command(
    author,
    version = env!("PHPCS_TOOL_VERSION"),
    about,
    disable_help_subcommand = true,
    disable_help_flag = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Install directory (defaults to ~/.php-code-sniffer-tool)
    #[arg(
        long = "root",
        short = 'r',
        env = "PHPCS_TOOL_ROOT",
        value_name = "PATH",
        global = true
    )]
    pub install_root: Option<PathBuf>,

    /// Sniffer index base URL
    #[arg(long = "api-url", env = "PHPCS_TOOL_API_URL", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// PHP interpreter used to run composer.phar
    #[arg(long = "php", env = "PHPCS_TOOL_PHP", value_name = "PATH", global = true)]
    pub php: Option<String>,

    /// Download location of composer.phar
    #[arg(
        long = "composer-url",
        env = "PHPCS_TOOL_COMPOSER_URL",
        value_name = "URL",
        global = true
    )]
    pub composer_url: Option<String>,
}

/// Tokens after a command's own arguments are ignored, not rejected.
#[derive(clap::Args, Debug)]
struct Extra {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    rest: Vec<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List commands
    List {
        #[command(flatten)]
        extra: Extra,
    },

    /// Show a list with available code sniffers
    Show {
        #[command(flatten)]
        extra: Extra,
    },

    /// Install code sniffer with a given code sniffer name
    Install {
        #[arg(value_name = "CODE-SNIFFER-NAME")]
        name: Option<String>,
        #[command(flatten)]
        extra: Extra,
    },

    /// Update code sniffer with a given code sniffer name
    Update {
        #[arg(value_name = "CODE-SNIFFER-NAME")]
        name: Option<String>,
        #[command(flatten)]
        extra: Extra,
    },

    /// Displays help for a command
    Help {
        #[arg(value_name = "COMMAND-NAME")]
        command: Option<String>,
        #[command(flatten)]
        extra: Extra,
    },

    #[command(external_subcommand)]
    External(Vec<String>),
}

/// Parse the command line.
///
/// Flags clap does not know (`--help` included, the help flag is disabled)
/// are dropped and the rest parsed again, so routing only depends on the
/// positional tokens.
fn parse_cli<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    match Cli::try_parse_from(&args) {
        Ok(cli) => Ok(cli),
        Err(e) if e.kind() == ErrorKind::DisplayVersion => Err(e),
        Err(e) => {
            debug!("Retrying without unknown flags: {}", e.kind());
            Cli::try_parse_from(known_args(&args))
        }
    }
}

/// `args` without the flags that are not global options of [`Cli`].
fn known_args(args: &[OsString]) -> Vec<OsString> {
    let mut command = Cli::command();
    command.build();

    let mut kept = Vec::with_capacity(args.len());
    let mut iter = args.iter();
    kept.extend(iter.next().cloned());

    while let Some(arg) = iter.next() {
        let text = arg.to_string_lossy();
        if !text.starts_with('-') || text == "-" {
            kept.push(arg.clone());
            continue;
        }

        let (flag, inline_value) = match text.split_once('=') {
            Some((flag, _)) => (flag, true),
            None => (&*text, false),
        };

        match option_takes_value(&command, flag) {
            Some(takes_value) => {
                kept.push(arg.clone());
                if takes_value && !inline_value {
                    kept.extend(iter.next().cloned());
                }
            }
            None => debug!("Ignoring unknown flag {}", text),
        }
    }

    kept
}

/// `Some(takes_value)` if `flag` names an option of `command`.
fn option_takes_value(command: &clap::Command, flag: &str) -> Option<bool> {
    command
        .get_arguments()
        .find(|arg| {
            let long = arg
                .get_long()
                .is_some_and(|long| flag.strip_prefix("--") == Some(long));
            let short = arg
                .get_short()
                .is_some_and(|short| flag.strip_prefix('-') == Some(short.to_string().as_str()));
            long || short
        })
        .map(|arg| arg.get_action().takes_values())
}

fn into_command(command: Option<Commands>) -> Command {
    match command {
        None => Command::from_tokens(None, None),
        Some(Commands::List { extra }) => extra.route("list", None),
        Some(Commands::Show { extra }) => extra.route("show", None),
        Some(Commands::Install { name, extra }) => extra.route("install", name.as_deref()),
        Some(Commands::Update { name, extra }) => extra.route("update", name.as_deref()),
        Some(Commands::Help { command, extra }) => extra.route("help", command.as_deref()),
        Some(Commands::External(args)) => Command::from_tokens(
            args.first().map(String::as_str),
            args.get(1).map(String::as_str),
        ),
    }
}

impl Extra {
    fn route(self, command: &str, argument: Option<&str>) -> Command {
        if !self.rest.is_empty() {
            debug!("Ignoring extra arguments {:?}", self.rest);
        }
        Command::from_tokens(Some(command), argument)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = match parse_cli(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayVersion => e.exit(),
        Err(e) => return Err(e.into()),
    };
    let runtime = phpcs_tool::runtime::RealRuntime;

    let overrides = ConfigOverrides {
        install_root: cli.install_root,
        api_url: cli.api_url,
        php: cli.php,
        composer_url: cli.composer_url,
    };

    commands::run(&runtime, into_command(cli.command), overrides).await
}
