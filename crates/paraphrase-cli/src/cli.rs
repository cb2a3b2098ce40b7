//! Command-line argument parsing.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use paraphrase_core::ParaphraseMode;

pub const USAGE: &str = "\
Usage: paraphrase <command> [options]

Commands:
  login [--email EMAIL]                 Sign in and store the session token
  register                              Create an account, then sign in
  logout                                Forget the stored session token
  status                                Show whether a session is active
  modes                                 List available paraphrase modes
  paraphrase [--mode MODE] [--file F] [TEXT...]
                                        Paraphrase TEXT, a file, or stdin
  help                                  Show this message

Environment:
  PARAPHRASE_API_URL                    Backend URL (default http://localhost:8000)
  PARAPHRASE_RECAPTCHA_TOKEN            reCAPTCHA response sent with login/register
  RUST_LOG                              Log filter (default warn)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { email: Option<String> },
    Register,
    Logout,
    Status,
    Modes,
    Paraphrase {
        mode: ParaphraseMode,
        file: Option<PathBuf>,
        text: Option<String>,
    },
    Help,
}

fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| anyhow!("{} needs a value", flag))
}

pub fn parse(args: &[String]) -> Result<Command> {
    let mut args = args.iter().cloned();
    let Some(command) = args.next() else {
        return Ok(Command::Help);
    };

    match command.as_str() {
        "login" => {
            let mut email = None;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--email" | "-e" => email = Some(flag_value(&mut args, "--email")?),
                    other => bail!("Unexpected argument for login: {}", other),
                }
            }
            Ok(Command::Login { email })
        }
        "register" => no_more_args(args, Command::Register),
        "logout" => no_more_args(args, Command::Logout),
        "status" => no_more_args(args, Command::Status),
        "modes" => no_more_args(args, Command::Modes),
        "paraphrase" | "p" => {
            let mut mode = ParaphraseMode::default();
            let mut file = None;
            let mut words = Vec::new();
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--mode" | "-m" => mode = flag_value(&mut args, "--mode")?.parse()?,
                    "--file" | "-f" => file = Some(PathBuf::from(flag_value(&mut args, "--file")?)),
                    "--" => words.extend(args.by_ref()),
                    _ => words.push(arg),
                }
            }
            if file.is_some() && !words.is_empty() {
                bail!("Give either --file or TEXT, not both");
            }
            let text = (!words.is_empty()).then(|| words.join(" "));
            Ok(Command::Paraphrase { mode, file, text })
        }
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => bail!("Unknown command: {}", other),
    }
}

fn no_more_args(mut args: impl Iterator<Item = String>, command: Command) -> Result<Command> {
    match args.next() {
        Some(extra) => bail!("Unexpected argument: {}", extra),
        None => Ok(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_empty_is_help() {
        assert_eq!(parse(&[]).unwrap(), Command::Help);
        assert_eq!(parse(&args(&["--help"])).unwrap(), Command::Help);
    }

    #[test]
    fn test_parse_login() {
        assert_eq!(parse(&args(&["login"])).unwrap(), Command::Login { email: None });
        assert_eq!(
            parse(&args(&["login", "--email", "ada@example.com"])).unwrap(),
            Command::Login {
                email: Some("ada@example.com".to_string())
            }
        );
        assert!(parse(&args(&["login", "--email"])).is_err());
        assert!(parse(&args(&["login", "extra"])).is_err());
    }

    #[test]
    fn test_parse_paraphrase_text_and_mode() {
        let cmd = parse(&args(&["paraphrase", "-m", "word changer", "Hello", "world"])).unwrap();
        assert_eq!(
            cmd,
            Command::Paraphrase {
                mode: ParaphraseMode::WordChanger,
                file: None,
                text: Some("Hello world".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_paraphrase_defaults_to_stdin() {
        assert_eq!(
            parse(&args(&["paraphrase"])).unwrap(),
            Command::Paraphrase {
                mode: ParaphraseMode::Standard,
                file: None,
                text: None,
            }
        );
    }

    #[test]
    fn test_parse_paraphrase_double_dash_keeps_flags_as_text() {
        let cmd = parse(&args(&["p", "--", "--mode", "is", "text"])).unwrap();
        assert_eq!(
            cmd,
            Command::Paraphrase {
                mode: ParaphraseMode::Standard,
                file: None,
                text: Some("--mode is text".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_paraphrase_errors() {
        assert!(parse(&args(&["paraphrase", "--mode", "poetic", "hi"])).is_err());
        assert!(parse(&args(&["paraphrase", "--file", "in.txt", "hi"])).is_err());
        assert!(parse(&args(&["frobnicate"])).is_err());
        assert!(parse(&args(&["status", "now"])).is_err());
    }
}
