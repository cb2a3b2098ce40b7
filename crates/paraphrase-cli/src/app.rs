//! Application state and command execution.
//!
//! `App` owns the session context and hands it to the API client and the
//! expiry watcher; nothing reaches the session through globals.

use std::io::{self, BufRead, Read, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use paraphrase_core::auth::signal_channel;
use paraphrase_core::forms::{self, FieldError, LoginForm, RegisterForm, MAX_INPUT_CHARS};
use paraphrase_core::models::{ParaphraseRequest, UserLoginRequest, UserRegisterRequest};
use paraphrase_core::utils::{character_count, format_remaining, truncate_string, word_count};
use paraphrase_core::{
    ApiClient, ApiError, Config, ExpiryWatcher, ParaphraseMode, SessionManager,
};

use crate::cli::{Command, USAGE};

/// Width used when echoing input back in status lines
const PREVIEW_CHARS: usize = 60;

pub struct App {
    config: Config,
    session: Arc<SessionManager>,
    api: ApiClient,
    watcher: JoinHandle<()>,
}

impl App {
    /// Build the session context and wire the gateway and watcher to it.
    /// Must be called inside a tokio runtime.
    pub fn new(config: Config) -> Result<Self> {
        let store = config.token_store()?;
        let session = Arc::new(SessionManager::with_system_clock(store));
        debug!(
            authenticated = session.is_authenticated(),
            persistent = session.is_persistent(),
            "Session loaded"
        );

        let (signals, signal_rx) = signal_channel();
        let api = ApiClient::new(&config, session.clone(), signals)
            .context("Failed to create API client")?;
        let watcher = ExpiryWatcher::spawn(session.clone(), signal_rx, config.poll_interval());

        Ok(Self {
            config,
            session,
            api,
            watcher,
        })
    }

    /// Let the watcher apply any pending signals, then stop it.
    pub async fn shutdown(self) {
        let App { api, watcher, .. } = self;
        // The API client holds the last signal sender
        drop(api);
        if let Err(e) = watcher.await {
            warn!(error = %e, "Expiry watcher ended abnormally");
        }
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Login { email } => self.login(email).await,
            Command::Register => self.register().await,
            Command::Logout => {
                self.logout();
                Ok(())
            }
            Command::Status => {
                self.status();
                Ok(())
            }
            Command::Modes => {
                Self::modes();
                Ok(())
            }
            Command::Paraphrase { mode, file, text } => {
                let text = match (file, text) {
                    (Some(path), _) => std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?,
                    (None, Some(text)) => text,
                    (None, None) => {
                        let mut buf = String::new();
                        io::stdin()
                            .read_to_string(&mut buf)
                            .context("Failed to read text from stdin")?;
                        buf
                    }
                };
                self.paraphrase(mode, text).await
            }
            Command::Help => {
                println!("{}", USAGE);
                Ok(())
            }
        }
    }

    fn recaptcha_token(&self) -> String {
        self.config.recaptcha_token.clone().unwrap_or_default()
    }

    async fn login(&mut self, email: Option<String>) -> Result<()> {
        let email = match email.or_else(|| self.config.last_email.clone()) {
            Some(email) => email,
            None => prompt("Email: ")?,
        };
        let password = rpassword::prompt_password("Password: ")
            .context("Failed to read password")?;

        let form = LoginForm { email, password };
        if let Err(errors) = form.validate() {
            report_field_errors(&errors);
            bail!("Login form is invalid");
        }

        self.sign_in(form.email, form.password).await
    }

    async fn sign_in(&mut self, email: String, password: String) -> Result<()> {
        let request = UserLoginRequest {
            email: email.clone(),
            password,
            recaptcha_token: self.recaptcha_token(),
        };
        self.api.login(&request).await.map_err(describe_api_error)?;

        self.config.last_email = Some(email.clone());
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        println!("Logged in as {}", email);
        if !self.session.is_persistent() {
            eprintln!("Note: the session could not be saved and will end when this command exits.");
        }
        Ok(())
    }

    async fn register(&mut self) -> Result<()> {
        let username = prompt("Username: ")?;
        let email = prompt("Email: ")?;
        let phone_number = prompt("Phone number: ")?;
        let password = rpassword::prompt_password("Password: ")
            .context("Failed to read password")?;
        let confirm = rpassword::prompt_password("Confirm password: ")
            .context("Failed to read password")?;
        if password != confirm {
            bail!("Passwords do not match");
        }

        let form = RegisterForm {
            username,
            email,
            password,
            phone_number,
        };
        if let Err(errors) = form.validate() {
            report_field_errors(&errors);
            bail!("Registration form is invalid");
        }

        let request = UserRegisterRequest {
            username: form.username,
            email: form.email.clone(),
            password: form.password.clone(),
            phone_number: form.phone_number,
            recaptcha_token: self.recaptcha_token(),
        };
        let response = self
            .api
            .register(&request)
            .await
            .map_err(describe_api_error)?;
        println!("{}", response.message);
        info!(user_id = %response.user_id, "Account created, signing in");

        self.sign_in(form.email, form.password).await
    }

    fn logout(&mut self) {
        let was_authenticated = self.session.is_authenticated();
        self.api.logout();
        if was_authenticated {
            println!("Logged out");
        } else {
            println!("Not logged in");
        }
    }

    fn status(&self) {
        if !self.session.check_auth() {
            println!("Not logged in");
            return;
        }
        let subject = self
            .session
            .claims()
            .and_then(|c| c.subject)
            .unwrap_or_else(|| "unknown user".to_string());
        let remaining = self
            .session
            .time_until_expiry()
            .map(format_remaining)
            .unwrap_or_else(|| "?".to_string());
        println!("Logged in as {} (expires in {})", subject, remaining);
        if !self.session.is_persistent() {
            println!("Session storage unavailable; session is in memory only");
        }
    }

    fn modes() {
        for mode in ParaphraseMode::ALL {
            let marker = if mode == ParaphraseMode::default() { " (default)" } else { "" };
            println!("  {:<14} {}{}", mode.as_str(), mode.label(), marker);
        }
    }

    async fn paraphrase(&mut self, mode: ParaphraseMode, text: String) -> Result<()> {
        let text = text.trim().to_string();
        if let Err(e) = forms::validate_input_text(&text) {
            eprintln!("{} ({})", e.message, character_count(&text, MAX_INPUT_CHARS));
            bail!("Nothing to paraphrase");
        }

        debug!(preview = %truncate_string(&text, PREVIEW_CHARS), %mode, "Paraphrasing");
        let request = ParaphraseRequest::new(text, mode);
        let response = self
            .api
            .paraphrase(&request)
            .await
            .map_err(describe_api_error)?;

        println!("{}", response.paraphrased_text);
        eprintln!(
            "[{}] {} -> {} characters, {} words",
            mode,
            response.original_length,
            response.paraphrased_length,
            word_count(&response.paraphrased_text)
        );
        Ok(())
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim().to_string())
}

fn report_field_errors(errors: &[FieldError]) {
    for error in errors {
        eprintln!("  {}", error);
    }
}

/// Turn gateway errors into messages a user can act on.
fn describe_api_error(err: ApiError) -> anyhow::Error {
    match err {
        ApiError::Unauthorized => anyhow::anyhow!(
            "Your session has expired or is invalid. Run `paraphrase login` to sign in again."
        ),
        ApiError::RateLimited { .. } => anyhow::anyhow!("{}", err),
        other => anyhow::Error::new(other).context("Request failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_unauthorized_prompts_login() {
        let message = describe_api_error(ApiError::Unauthorized).to_string();
        assert!(message.contains("paraphrase login"));
    }

    #[test]
    fn test_describe_rate_limit_keeps_wait_time() {
        let err = ApiError::RateLimited {
            retry_after_secs: Some(12),
        };
        assert_eq!(describe_api_error(err).to_string(), "Rate limited - try again in 12s");
    }

    #[test]
    fn test_describe_other_errors_keep_source() {
        let err = describe_api_error(ApiError::ServerError("boom".to_string()));
        assert_eq!(err.to_string(), "Request failed");
        assert_eq!(err.root_cause().to_string(), "Server error: boom");
    }
}
