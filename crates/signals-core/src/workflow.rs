//! Workflow states a signal moves through.
//!
//! Codes are the stable values stored and exchanged with integrations;
//! labels are the Dutch display names shown to officials.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusState {
    Gemeld,
    Afwachting,
    Behandeling,
    OnHold,
    Afgehandeld,
    Geannuleerd,
    Heropend,
    Gesplitst,
    VerzoekTotAfhandeling,
    Ingepland,
    ReactieGevraagd,
    ReactieOntvangen,
    DoorgezetNaarExtern,
    TeVerzenden,
    Verzonden,
    VerzendingMislukt,
}

impl StatusState {
    pub const ALL: [Self; 16] = [
        Self::Gemeld,
        Self::Afwachting,
        Self::Behandeling,
        Self::OnHold,
        Self::Afgehandeld,
        Self::Geannuleerd,
        Self::Heropend,
        Self::Gesplitst,
        Self::VerzoekTotAfhandeling,
        Self::Ingepland,
        Self::ReactieGevraagd,
        Self::ReactieOntvangen,
        Self::DoorgezetNaarExtern,
        Self::TeVerzenden,
        Self::Verzonden,
        Self::VerzendingMislukt,
    ];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Gemeld => "m",
            Self::Afwachting => "i",
            Self::Behandeling => "b",
            Self::OnHold => "h",
            Self::Afgehandeld => "o",
            Self::Geannuleerd => "a",
            Self::Heropend => "reopened",
            Self::Gesplitst => "s",
            Self::VerzoekTotAfhandeling => "closure requested",
            Self::Ingepland => "ingepland",
            Self::ReactieGevraagd => "reaction requested",
            Self::ReactieOntvangen => "reaction received",
            Self::DoorgezetNaarExtern => "forward to external",
            Self::TeVerzenden => "ready to send",
            Self::Verzonden => "sent",
            Self::VerzendingMislukt => "send failed",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gemeld => "Gemeld",
            Self::Afwachting => "In afwachting van behandeling",
            Self::Behandeling => "In behandeling",
            Self::OnHold => "On hold",
            Self::Afgehandeld => "Afgehandeld",
            Self::Geannuleerd => "Geannuleerd",
            Self::Heropend => "Heropend",
            Self::Gesplitst => "Gesplitst",
            Self::VerzoekTotAfhandeling => "Extern: verzoek tot afhandeling",
            Self::Ingepland => "Ingepland",
            Self::ReactieGevraagd => "Reactie gevraagd",
            Self::ReactieOntvangen => "Reactie ontvangen",
            Self::DoorgezetNaarExtern => "Doorgezet naar extern",
            Self::TeVerzenden => "Extern: te verzenden",
            Self::Verzonden => "Extern: verzonden",
            Self::VerzendingMislukt => "Extern: mislukt",
        }
    }

    /// Label shown to the reporter in their own signal history.
    ///
    /// Only a handful of states are surfaced to reporters; everything else
    /// reads as "Open".
    #[must_use]
    pub const fn reporter_label(self) -> &'static str {
        match self {
            Self::Heropend => "Heropend",
            Self::Geannuleerd | Self::Afgehandeld => "Afgesloten",
            Self::ReactieGevraagd => "Vraag aan u verstuurd",
            Self::ReactieOntvangen => "Antwoord van u ontvangen",
            _ => "Open",
        }
    }
}

impl fmt::Display for StatusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for StatusState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.code() == s)
            .ok_or_else(|| Error::UnknownStatusState(s.to_string()))
    }
}

impl Serialize for StatusState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for StatusState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
