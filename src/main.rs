//! Purpose: `enid` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: `sieve` emits exactly one JSON object on stdout per invocation.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.

use std::error::Error as StdError;
use std::io::{self, IsTerminal};
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueHint, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Value, json};

mod metadata_json;
mod serve;

use enid_sieve::api::{Enid, Error, ErrorKind, RemoteClient, to_exit_code};
use metadata_json::metadata_json;

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

#[derive(Parser, Debug)]
#[command(
    name = "enid",
    version,
    about = "Decode Egyptian national IDs into structured metadata",
    after_help = r#"EXAMPLES
  $ enid sieve 29608013501312
  {"birthdate":"1996-08-01","century_code":2,...}

  $ enid serve --bind 127.0.0.1:9714        # expose POST /v0/enids/sieve
  $ enid sieve --remote http://127.0.0.1:9714 29608013501312

LEARN MORE
  $ enid <command> --help"#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(
        about = "Validate an ID and print its decoded metadata",
        after_help = r#"EXAMPLES
  $ enid sieve 29608013501312
  $ enid sieve --remote http://127.0.0.1:9714 29608013501312

NOTES
  - The ID must be exactly 14 ASCII digits; anything else is rejected
    before decoding starts
  - The check digit is reported but not verified"#
    )]
    Sieve {
        #[arg(help = "The 14-digit national ID")]
        enid: String,
        #[arg(
            long,
            help = "Sieve via a remote server: http(s)://host:port",
            value_hint = ValueHint::Url
        )]
        remote: Option<String>,
        #[arg(long, help = "Bearer token for the remote server")]
        token: Option<String>,
        #[arg(
            long,
            help = "Read the bearer token from a file",
            value_hint = ValueHint::FilePath,
            conflicts_with = "token"
        )]
        token_file: Option<PathBuf>,
    },
    #[command(
        about = "Run the HTTP sieve server",
        after_help = r#"EXAMPLES
  $ enid serve
  $ enid serve --bind 127.0.0.1:9800 --token-file ./token

NOTES
  - Loopback-only by default; --allow-non-loopback requires a token"#
    )]
    Serve {
        #[arg(long, default_value = "127.0.0.1:9714", help = "Socket address to bind")]
        bind: SocketAddr,
        #[arg(long, help = "Require this bearer token on every request")]
        token: Option<String>,
        #[arg(
            long,
            help = "Read the bearer token from a file",
            value_hint = ValueHint::FilePath,
            conflicts_with = "token"
        )]
        token_file: Option<PathBuf>,
        #[arg(long, help = "Allow binding to non-loopback addresses")]
        allow_non_loopback: bool,
        #[arg(long = "cors-origin", help = "Repeatable allowed CORS origin")]
        cors_origin: Vec<String>,
        #[arg(
            long,
            default_value_t = 64 * 1024,
            help = "Maximum request body size in bytes"
        )]
        max_body_bytes: u64,
    },
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum, help = "Target shell")]
        shell: Shell,
    },
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage).with_message(clap_error_summary(&err)));
            }
        },
    };

    match cli.command {
        Command::Sieve {
            enid,
            remote,
            token,
            token_file,
        } => {
            let enid = Enid::parse(&enid)?;
            let metadata = match remote {
                Some(base_url) => {
                    let mut client = RemoteClient::new(base_url)?;
                    if let Some(token) = resolve_token(token, token_file)? {
                        client = client.with_token(token);
                    }
                    client.sieve(&enid)?
                }
                None => enid.metadata()?,
            };
            emit_json(&metadata_json(&metadata))?;
            Ok(RunOutcome::ok())
        }
        Command::Serve {
            bind,
            token,
            token_file,
            allow_non_loopback,
            cors_origin,
            max_body_bytes,
        } => {
            let config = serve::ServeConfig {
                bind,
                token: resolve_token(token, token_file)?,
                allow_non_loopback,
                cors_origins: cors_origin,
                max_body_bytes,
            };
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(|err| {
                    Error::new(ErrorKind::Internal)
                        .with_message("failed to start runtime")
                        .with_source(err)
                })?;
            runtime.block_on(serve::serve(config))?;
            Ok(RunOutcome::ok())
        }
        Command::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "enid", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
    }
}

fn resolve_token(token: Option<String>, token_file: Option<PathBuf>) -> Result<Option<String>, Error> {
    if let Some(token) = token {
        return Ok(Some(token));
    }
    let Some(path) = token_file else {
        return Ok(None);
    };
    let contents = std::fs::read_to_string(&path).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read token file")
            .with_source(err)
    })?;
    let token = contents.trim();
    if token.is_empty() {
        return Err(Error::new(ErrorKind::Usage).with_message("token file is empty"));
    }
    Ok(Some(token.to_string()))
}

fn emit_json(value: &Value) -> Result<(), Error> {
    let encoded = serde_json::to_string(value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to encode output")
            .with_source(err)
    })?;
    println!("{encoded}");
    Ok(())
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    rendered
        .lines()
        .next()
        .unwrap_or("invalid arguments")
        .trim_start_matches("error: ")
        .to_string()
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("error: {}", error_text(err));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_text(err: &Error) -> String {
    let mut text = error_message(err);
    if let Some(hint) = err.hint() {
        text.push_str(&format!(" ({hint})"));
    }
    text
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error",
        ErrorKind::Usage => "usage error",
        ErrorKind::Format => "malformed national ID",
        ErrorKind::Century => "malformed century field",
        ErrorKind::BirthDate => "malformed birth date field",
        ErrorKind::Governorate => "malformed governorate field",
        ErrorKind::Decode => "national ID decode failed",
        ErrorKind::Permission => "permission denied",
        ErrorKind::Io => "i/o error",
    }
    .to_string()
}

fn error_json(err: &Error) -> Value {
    let mut body = serde_json::Map::new();
    body.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    body.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        body.insert("hint".to_string(), json!(hint));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        body.insert("causes".to_string(), json!(causes));
    }
    json!({ "error": body })
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

#[cfg(test)]
mod tests {
    use super::{Cli, clap_error_summary, error_json, error_message, resolve_token};
    use clap::Parser;
    use enid_sieve::api::{Error, ErrorKind};

    #[test]
    fn cli_parses_the_sieve_command() {
        let cli = Cli::try_parse_from(["enid", "sieve", "29608013501312"]).expect("parse");
        match cli.command {
            super::Command::Sieve { enid, remote, .. } => {
                assert_eq!(enid, "29608013501312");
                assert!(remote.is_none());
            }
            _ => panic!("expected sieve command"),
        }
    }

    #[test]
    fn cli_parses_serve_flags() {
        let cli = Cli::try_parse_from([
            "enid",
            "serve",
            "--bind",
            "127.0.0.1:9800",
            "--cors-origin",
            "http://localhost:5173",
            "--cors-origin",
            "http://localhost:4000",
        ])
        .expect("parse");
        match cli.command {
            super::Command::Serve {
                bind, cors_origin, ..
            } => {
                assert_eq!(bind.port(), 9800);
                assert_eq!(cors_origin.len(), 2);
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn cli_rejects_token_and_token_file_together() {
        let err = Cli::try_parse_from([
            "enid",
            "serve",
            "--token",
            "dev",
            "--token-file",
            "/tmp/token",
        ])
        .expect_err("conflicting flags");
        assert!(!clap_error_summary(&err).is_empty());
    }

    #[test]
    fn error_json_carries_kind_message_and_causes() {
        let err = Error::new(ErrorKind::Io)
            .with_message("failed to read token file")
            .with_source(std::io::Error::other("boom"));
        let value = error_json(&err);
        assert_eq!(value["error"]["kind"], "Io");
        assert_eq!(value["error"]["message"], "failed to read token file");
        assert_eq!(value["error"]["causes"][0], "boom");
    }

    #[test]
    fn error_message_falls_back_per_kind() {
        assert_eq!(
            error_message(&Error::new(ErrorKind::Decode)),
            "national ID decode failed"
        );
        assert_eq!(
            error_message(&Error::new(ErrorKind::Usage).with_message("bad flag")),
            "bad flag"
        );
    }

    #[test]
    fn resolve_token_prefers_the_inline_token() {
        let token = resolve_token(Some("dev".to_string()), None).expect("token");
        assert_eq!(token.as_deref(), Some("dev"));

        let none = resolve_token(None, None).expect("no token");
        assert!(none.is_none());
    }
}
