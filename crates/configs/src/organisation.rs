//! Organisation profile served by `GET /api/v1/organisation`.
//!
//! Lives under `[organisation]` in `config.toml` and is validated once at
//! startup, so the endpoint only ever returns a well-formed block.

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Whole-value patterns; ASCII classes throughout.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+]*[(]?[0-9]{1,4}[)]?[-\t\n\x0B\x0C\r ./0-9]*$").expect("valid phone regex"));
static WEBSITE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?[0-9a-z.-]+\.[a-z.]{2,6}[/A-Za-z0-9_ .-]*/?$").expect("valid website regex")
});
static ZIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{5}(?:-[0-9]{4})?$").expect("valid zip regex"));
static CONTACT_EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+_.-]+@.+$").expect("valid contact email regex"));
static FACEBOOK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(?:https?://)?(?:www\.)?facebook\.com/.*)?$").expect("valid facebook regex"));
static TWITTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(?:https?://)?(?:www\.)?twitter\.com/.*)?$").expect("valid twitter regex"));
static INSTAGRAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(?:https?://)?(?:www\.)?instagram\.com/.*)?$").expect("valid instagram regex"));

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OrganisationInfo {
    pub name: String,
    pub address: Address,
    pub contact: Contact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<Social>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Social {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

impl OrganisationInfo {
    pub fn validate(&self) -> Result<()> {
        require("organisation.name", &self.name)?;
        require("organisation.address.street", &self.address.street)?;
        require("organisation.address.city", &self.address.city)?;
        require("organisation.address.state", &self.address.state)?;
        require("organisation.address.zip", &self.address.zip)?;
        matches("organisation.address.zip", &self.address.zip, &ZIP_RE, "invalid ZIP code format")?;
        require("organisation.contact.name", &self.contact.name)?;
        require("organisation.contact.email", &self.contact.email)?;
        matches("organisation.contact.email", &self.contact.email, &CONTACT_EMAIL_RE, "invalid email format")?;
        if let Some(phone) = self.phone.as_deref() {
            matches("organisation.phone", phone, &PHONE_RE, "invalid phone number format")?;
        }
        if let Some(website) = self.website.as_deref() {
            matches("organisation.website", website, &WEBSITE_RE, "invalid website URL format")?;
        }
        if let Some(social) = &self.social {
            let links = [
                ("facebook", &social.facebook, &FACEBOOK_RE),
                ("twitter", &social.twitter, &TWITTER_RE),
                ("instagram", &social.instagram, &INSTAGRAM_RE),
            ];
            for (network, url, re) in links {
                if let Some(url) = url.as_deref() {
                    if !re.is_match(url) {
                        return Err(anyhow!("organisation.social.{network}: invalid {network} URL"));
                    }
                }
            }
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow!("{field} is required"));
    }
    Ok(())
}

fn matches(field: &str, value: &str, re: &Regex, problem: &str) -> Result<()> {
    if !re.is_match(value) {
        return Err(anyhow!("{field}: {problem}"));
    }
    Ok(())
}
