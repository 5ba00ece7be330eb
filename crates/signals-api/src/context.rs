//! Who is asking, and through which channel.

use signals_core::{Config, Principal};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Channel {
    /// A person using the back office, or any unrecognised client.
    #[default]
    Interactive,
    /// An automated integration (e.g. a municipal case system) that is
    /// entitled to unredacted reporter contact details.
    TrustedIntegration,
}

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub principal: Option<Principal>,
    pub channel: Channel,
}

impl RequestContext {
    #[must_use]
    pub const fn interactive(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
            channel: Channel::Interactive,
        }
    }

    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            principal: None,
            channel: Channel::Interactive,
        }
    }

    #[must_use]
    pub const fn trusted_integration() -> Self {
        Self {
            principal: None,
            channel: Channel::TrustedIntegration,
        }
    }

    /// Classify a request by the client id it presented.
    ///
    /// Only client ids listed in `SIGNALS_TRUSTED_INTEGRATION_CLIENTS` are
    /// trusted; everything else, including a missing id, is interactive.
    #[must_use]
    pub fn from_client(
        principal: Option<Principal>,
        client_id: Option<&str>,
        config: &Config,
    ) -> Self {
        let trusted = client_id.is_some_and(|id| config.is_trusted_integration(id));
        if trusted {
            tracing::debug!(client_id, "request from trusted integration channel");
        }
        Self {
            principal,
            channel: if trusted {
                Channel::TrustedIntegration
            } else {
                Channel::Interactive
            },
        }
    }

    #[must_use]
    pub const fn is_trusted(&self) -> bool {
        matches!(self.channel, Channel::TrustedIntegration)
    }
}
