use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::error::Error;
use crate::message::WebhookMessage;

const WITH_COMPONENTS: &str = "with_components";

const DISCORD_HOSTS: [&str; 4] = [
    "discord.com",
    "discordapp.com",
    "ptb.discord.com",
    "canary.discord.com",
];

/// A validated Discord webhook execute URL.
///
/// The token part of the URL is a secret: neither `Debug` nor the errors produced here include it.
#[derive(Clone)]
pub struct WebhookUrl(Url);

impl WebhookUrl {
    /// Accepts `https://discord.com/api[/v<N>]/webhooks/<id>/<token>`.
    ///
    /// The returned URL asks Discord to render message components, which webhooks not owned by
    /// an application otherwise drop.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UrlParse`] for text that is not a URL and [`Error::InvalidWebhookUrl`]
    /// for a URL that does not point at a Discord webhook.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let mut url = Url::parse(raw.trim())?;

        if url.scheme() != "https" {
            return Err(invalid("scheme must be https"));
        }
        if !url.host_str().is_some_and(|host| DISCORD_HOSTS.contains(&host)) {
            return Err(invalid("host is not a Discord domain"));
        }
        let Some(path) = webhook_path(&url) else {
            return Err(invalid("expected a path of the form /api/webhooks/<id>/<token>"));
        };

        let query: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != WITH_COMPONENTS)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.set_path(&path);
        url.set_fragment(None);
        url.query_pairs_mut()
            .clear()
            .extend_pairs(query)
            .append_pair(WITH_COMPONENTS, "true");
        Ok(Self(url))
    }

    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl std::fmt::Debug for WebhookUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("WebhookUrl")
            .field(&self.0.host_str().unwrap_or_default())
            .finish()
    }
}

fn invalid(reason: &str) -> Error {
    Error::InvalidWebhookUrl(reason.to_string())
}

/// The normalised webhook path, or `None` when `url` is not a webhook execute URL.
///
/// A single trailing slash is tolerated, any other empty segment is not.
fn webhook_path(url: &Url) -> Option<String> {
    let mut segments: Vec<&str> = url.path_segments()?.collect();
    if segments.last() == Some(&"") {
        segments.pop();
    }
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }

    let rest = match segments.as_slice() {
        ["api", "webhooks", rest @ ..] => rest,
        ["api", version, "webhooks", rest @ ..] if is_api_version(version) => rest,
        _ => return None,
    };

    match rest {
        [id, _token] if id.bytes().all(|b| b.is_ascii_digit()) => {
            Some(format!("/{}", segments.join("/")))
        }
        _ => None,
    }
}

fn is_api_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Delivers a message body to a webhook endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &Url, message: &WebhookMessage) -> Result<(), Error>;
}

/// `reqwest` backed transport; any non-2xx answer is an error.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &Url, message: &WebhookMessage) -> Result<(), Error> {
        let response = self
            .client
            .post(url.clone())
            .json(message)
            .send()
            .await
            // reqwest errors embed the request URL, which carries the webhook token
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        response
            .error_for_status()
            .map_err(reqwest::Error::without_url)?;

        debug!("Webhook answered {status}");
        Ok(())
    }
}

pub struct Webhook<T> {
    url: WebhookUrl,
    transport: T,
}

impl<T: Transport> Webhook<T> {
    #[must_use]
    pub fn new(url: WebhookUrl, transport: T) -> Self {
        Self { url, transport }
    }

    /// Posts `message` to the webhook.
    ///
    /// # Errors
    ///
    /// Returns whatever error the transport reports.
    pub async fn send(&self, message: &WebhookMessage) -> Result<(), Error> {
        self.transport.post(self.url.as_url(), message).await
    }
}
