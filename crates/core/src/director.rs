use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Certificate, Client, Url, header::AUTHORIZATION};
use tracing::debug;

use crate::{
    config::DirectorSettings,
    error::{BoshStatsError, Result},
    source::EventSource,
    types::{Event, EventsFilter},
    uaa::UaaTokenSession,
};

/// The director never returns more than this many events per page.
pub const DEFAULT_PAGE_SIZE: usize = 200;

/// `<base>/<path>` as a URL, validating the base.
pub(crate) fn parse_base_url(base: &str, path: &str) -> Result<Url> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), path);
    Url::parse(&joined).map_err(|e| BoshStatsError::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })
}

/// Build the HTTP client shared by the director and UAA calls.
pub fn http_client(ca_cert_pem: Option<&[u8]>) -> Result<Client> {
    let mut builder = Client::builder().connect_timeout(Duration::from_secs(10));
    if let Some(pem) = ca_cert_pem {
        let cert = Certificate::from_pem(pem).map_err(|e| BoshStatsError::InvalidCaCert {
            reason: e.to_string(),
        })?;
        builder = builder.add_root_certificate(cert);
    }
    Ok(builder.build()?)
}

/// Event source backed by a BOSH director's `/events` endpoint.
#[derive(Debug)]
pub struct DirectorClient {
    http: Client,
    events_url: Url,
    session: UaaTokenSession,
}

impl DirectorClient {
    pub fn new(http: Client, director_url: &str, session: UaaTokenSession) -> Result<Self> {
        Ok(Self {
            http,
            events_url: parse_base_url(director_url, "events")?,
            session,
        })
    }

    /// Client with TLS trust and UAA credentials taken from `settings`.
    pub async fn connect(settings: &DirectorSettings) -> Result<Self> {
        let ca_cert_pem = settings.ca_cert_pem().await?;
        let http = http_client(ca_cert_pem.as_deref())?;
        let session = UaaTokenSession::new(
            http.clone(),
            &settings.uaa_url,
            &settings.client_id,
            &settings.client_secret,
        )?;
        Self::new(http, &settings.director_url, session)
    }

    pub fn events_url(&self) -> &Url {
        &self.events_url
    }
}

#[async_trait]
impl EventSource for DirectorClient {
    async fn fetch_events(&self, filter: &EventsFilter) -> Result<Vec<Event>> {
        let authorization = self.session.authorization().await?;
        debug!(url = %self.events_url, ?filter, "fetching events");

        let response = self
            .http
            .get(self.events_url.clone())
            .query(&filter.query_pairs())
            .header(AUTHORIZATION, authorization)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BoshStatsError::Director {
                status,
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json::<Vec<Event>>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_url_tolerates_trailing_slash() {
        let a = parse_base_url("https://10.0.0.6:25555", "events").unwrap();
        let b = parse_base_url("https://10.0.0.6:25555/", "events").unwrap();
        assert_eq!(a.as_str(), "https://10.0.0.6:25555/events");
        assert_eq!(a, b);
    }

    #[test]
    fn client_debug_does_not_leak_secret() {
        let session =
            UaaTokenSession::new(Client::new(), "http://uaa", "some-client", "itsasecret").unwrap();
        let client = DirectorClient::new(Client::new(), "http://director", session).unwrap();

        let printed = format!("{client:?}");

        assert!(printed.contains("http://director/events"), "{printed}");
        assert!(!printed.contains("itsasecret"), "{printed}");
    }

    #[test]
    fn rejects_unparsable_director_url() {
        let session = UaaTokenSession::new(Client::new(), "http://uaa", "id", "secret").unwrap();
        let err = DirectorClient::new(Client::new(), "%%%", session).unwrap_err();
        assert!(matches!(err, BoshStatsError::InvalidUrl { .. }));
    }
}
