//! # Mail Configuration
//!
//! Selects the receipt transport from environment variables.
//!
//! `EMAIL_PROVIDER` picks one explicitly (`resend`, `smtp`, `none`).
//! Without it, Resend is used when `RESEND_API_KEY` is set, SMTP when
//! `SMTP_HOST` is set, and receipts are disabled otherwise.

use cart_core::EmailError;
use std::env;
use std::time::Duration;

const DEFAULT_RESEND_API_BASE_URL: &str = "https://api.resend.com";
const DEFAULT_FROM: &str = "onboarding@resend.dev";
const DEFAULT_SUBJECT: &str = "Your purchase receipt";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// SMTP relay settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// STARTTLS when true; plaintext (local catchers such as Mailpit) when false
    pub tls: bool,
}

impl SmtpSettings {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_SMTP_PORT,
            username: None,
            password: None,
            tls: true,
        }
    }
}

/// Which transport delivers receipts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailTransport {
    /// Resend transactional email API
    Resend { api_key: String, api_base_url: String },
    /// SMTP relay
    Smtp(SmtpSettings),
    /// No receipts are sent
    Disabled,
}

impl MailTransport {
    pub fn name(&self) -> &'static str {
        match self {
            MailTransport::Resend { .. } => "resend",
            MailTransport::Smtp(_) => "smtp",
            MailTransport::Disabled => "none",
        }
    }
}

/// Receipt mail configuration
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub transport: MailTransport,
    /// Sender address
    pub from_address: String,
    /// Receipt subject line
    pub subject: String,
    /// Upper bound for one delivery attempt
    pub timeout: Duration,
}

impl MailConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, EmailError> {
        dotenvy::dotenv().ok();

        let resend_key = non_empty_var("RESEND_API_KEY");
        let smtp_host = non_empty_var("SMTP_HOST");

        let transport = match non_empty_var("EMAIL_PROVIDER")
            .map(|p| p.to_ascii_lowercase())
            .as_deref()
        {
            Some("resend") => resend_transport_from_env(resend_key.ok_or_else(|| {
                EmailError::Configuration(
                    "EMAIL_PROVIDER=resend but RESEND_API_KEY not set".to_string(),
                )
            })?),
            Some("smtp") => smtp_transport(smtp_host.ok_or_else(|| {
                EmailError::Configuration("EMAIL_PROVIDER=smtp but SMTP_HOST not set".to_string())
            })?)?,
            Some("none") | Some("disabled") => MailTransport::Disabled,
            Some(other) => {
                return Err(EmailError::Configuration(format!(
                    "Unknown EMAIL_PROVIDER: {}",
                    other
                )))
            }
            None => match (resend_key, smtp_host) {
                (Some(key), _) => resend_transport_from_env(key),
                (None, Some(host)) => smtp_transport(host)?,
                (None, None) => MailTransport::Disabled,
            },
        };

        let timeout_secs = match non_empty_var("EMAIL_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                EmailError::Configuration(format!("EMAIL_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            transport,
            from_address: non_empty_var("EMAIL_FROM").unwrap_or_else(|| DEFAULT_FROM.to_string()),
            subject: non_empty_var("EMAIL_SUBJECT")
                .unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Create config with explicit transport (for testing)
    pub fn new(transport: MailTransport) -> Self {
        Self {
            transport,
            from_address: DEFAULT_FROM.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Config with receipts turned off
    pub fn disabled() -> Self {
        Self::new(MailTransport::Disabled)
    }

    /// Resend transport against the public API
    pub fn resend(api_key: impl Into<String>) -> Self {
        Self::new(resend_transport(api_key.into(), DEFAULT_RESEND_API_BASE_URL))
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.transport, MailTransport::Disabled)
    }

    /// Builder: set sender address
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from_address = from.into();
        self
    }

    /// Builder: set delivery timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn resend_transport_from_env(api_key: String) -> MailTransport {
    let api_base_url = non_empty_var("RESEND_API_BASE_URL")
        .unwrap_or_else(|| DEFAULT_RESEND_API_BASE_URL.to_string());
    resend_transport(api_key, &api_base_url)
}

fn resend_transport(api_key: String, api_base_url: &str) -> MailTransport {
    MailTransport::Resend {
        api_key,
        api_base_url: api_base_url.trim_end_matches('/').to_string(),
    }
}

fn smtp_transport(host: String) -> Result<MailTransport, EmailError> {
    let port = match non_empty_var("SMTP_PORT") {
        Some(raw) => raw.parse::<u16>().map_err(|_| {
            EmailError::Configuration(format!("SMTP_PORT is not a valid port: {}", raw))
        })?,
        None => DEFAULT_SMTP_PORT,
    };

    let tls = non_empty_var("SMTP_TLS")
        .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "no" | "off"))
        .unwrap_or(true);

    Ok(MailTransport::Smtp(SmtpSettings {
        host,
        port,
        username: non_empty_var("SMTP_USERNAME"),
        password: non_empty_var("SMTP_PASSWORD"),
        tls,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_names() {
        assert_eq!(MailConfig::resend("re_123").transport.name(), "resend");
        assert_eq!(
            MailConfig::new(MailTransport::Smtp(SmtpSettings::new("smtp.example.mx")))
                .transport
                .name(),
            "smtp"
        );
        assert_eq!(MailConfig::disabled().transport.name(), "none");
    }

    #[test]
    fn test_defaults() {
        let config = MailConfig::disabled();
        assert!(!config.is_enabled());
        assert_eq!(config.from_address, "onboarding@resend.dev");
        assert_eq!(config.subject, "Your purchase receipt");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_smtp_defaults() {
        let settings = SmtpSettings::new("localhost");
        assert_eq!(settings.port, 587);
        assert!(settings.tls);
        assert!(settings.username.is_none());
    }

    const MAIL_VARS: [&str; 11] = [
        "EMAIL_PROVIDER",
        "EMAIL_FROM",
        "EMAIL_SUBJECT",
        "EMAIL_TIMEOUT_SECS",
        "RESEND_API_KEY",
        "RESEND_API_BASE_URL",
        "SMTP_HOST",
        "SMTP_PORT",
        "SMTP_USERNAME",
        "SMTP_PASSWORD",
        "SMTP_TLS",
    ];

    fn clear_mail_env() {
        for key in MAIL_VARS {
            env::remove_var(key);
        }
    }

    // Env is process-wide, so every from_env scenario lives in this one test
    #[test]
    fn test_from_env_transport_selection() {
        clear_mail_env();

        // Nothing configured
        let config = MailConfig::from_env().unwrap();
        assert_eq!(config.transport, MailTransport::Disabled);
        assert!(!config.is_enabled());

        // SMTP host alone
        env::set_var("SMTP_HOST", "smtp.example.mx");
        env::set_var("SMTP_USERNAME", "mailer");
        env::set_var("SMTP_TLS", "false");
        let config = MailConfig::from_env().unwrap();
        assert_eq!(
            config.transport,
            MailTransport::Smtp(SmtpSettings {
                host: "smtp.example.mx".into(),
                port: 587,
                username: Some("mailer".into()),
                password: None,
                tls: false,
            })
        );

        // Resend key wins over SMTP host
        env::set_var("RESEND_API_KEY", "re_123");
        env::set_var("RESEND_API_BASE_URL", "http://127.0.0.1:9999/");
        let config = MailConfig::from_env().unwrap();
        assert_eq!(
            config.transport,
            MailTransport::Resend {
                api_key: "re_123".into(),
                api_base_url: "http://127.0.0.1:9999".into(),
            }
        );

        // Explicit provider wins over both
        env::set_var("EMAIL_PROVIDER", "SMTP");
        env::set_var("SMTP_PORT", "2525");
        let config = MailConfig::from_env().unwrap();
        assert_eq!(config.transport.name(), "smtp");
        match config.transport {
            MailTransport::Smtp(settings) => assert_eq!(settings.port, 2525),
            other => panic!("unexpected transport: {:?}", other),
        }

        env::set_var("EMAIL_PROVIDER", "none");
        assert!(!MailConfig::from_env().unwrap().is_enabled());

        // Bad SMTP port
        env::set_var("EMAIL_PROVIDER", "smtp");
        env::set_var("SMTP_PORT", "smtp");
        assert!(matches!(
            MailConfig::from_env(),
            Err(EmailError::Configuration(_))
        ));

        // Unknown provider
        env::set_var("EMAIL_PROVIDER", "carrier-pigeon");
        let err = MailConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("Unknown EMAIL_PROVIDER"));

        // Explicit resend without a key
        env::remove_var("RESEND_API_KEY");
        env::set_var("EMAIL_PROVIDER", "resend");
        let err = MailConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("RESEND_API_KEY"));

        // Sender, subject and timeout overrides
        clear_mail_env();
        env::set_var("EMAIL_FROM", "receipts@example.mx");
        env::set_var("EMAIL_SUBJECT", "Gracias");
        env::set_var("EMAIL_TIMEOUT_SECS", "3");
        let config = MailConfig::from_env().unwrap();
        assert_eq!(config.from_address, "receipts@example.mx");
        assert_eq!(config.subject, "Gracias");
        assert_eq!(config.timeout, Duration::from_secs(3));

        clear_mail_env();
    }
}
