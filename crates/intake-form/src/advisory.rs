//! Non-blocking submission advisories
//!
//! A personal mailbox is allowed, but the submitter has to confirm the
//! account is company-managed first. Only the browser enforces this.

/// Known free mailbox providers
pub const FREE_EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "googlemail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "live.com",
    "icloud.com",
    "me.com",
    "aol.com",
    "proton.me",
    "protonmail.com",
    "gmx.com",
    "mail.com",
    "yandex.com",
];

/// Advisory raised for a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Email belongs to a free provider
    FreeEmailProvider { domain: String },
}

impl Advisory {
    /// Text shown beside the acknowledgment checkbox
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::FreeEmailProvider { domain } => format!(
                "{domain} is a personal email provider. Confirm this address is company-managed to continue."
            ),
        }
    }
}

/// Whether `domain` is a free provider (case-insensitive)
#[must_use]
pub fn is_free_provider(domain: &str) -> bool {
    let domain = domain.trim().to_ascii_lowercase();
    FREE_EMAIL_DOMAINS.iter().any(|d| *d == domain)
}

/// Advisory for an email address, if any
#[must_use]
pub fn advise(email: &str) -> Option<Advisory> {
    let (_, domain) = email.trim().rsplit_once('@')?;
    is_free_provider(domain).then(|| Advisory::FreeEmailProvider {
        domain: domain.to_ascii_lowercase(),
    })
}
