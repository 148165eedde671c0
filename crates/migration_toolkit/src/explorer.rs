use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use url::Url;

use crate::records::BalanceRecord;

/// Errors for block explorer requests.
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// The request failed.
    #[error(transparent)]
    RequestError(#[from] ReqwestError),
    /// The explorer url could not be parsed.
    #[error(transparent)]
    UrlError(#[from] url::ParseError),
    /// The explorer answered with a non-2xx status.
    #[error("Explorer returned HTTP {status}: {text}")]
    StatusError { status: u16, text: String },
    /// The response could not be deserialized.
    #[error("Deserialization error: {err}. Response: {text}")]
    ResponseSerdeJson {
        err: serde_json::Error,
        text: String,
    },
    /// The explorer reported success without a result list.
    #[error("Explorer response has no result, message: {0:?}")]
    MissingResult(Option<String>),
}

/// One page of `listaccounts`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountPage {
    pub accounts: Vec<BalanceRecord>,
    /// Explicit "more pages" signal when the explorer provides one
    pub has_next: Option<bool>,
}

#[automock]
#[async_trait]
pub trait AccountPages: Send + Sync {
    /// `page` starts at 1, `offset` is the page size
    async fn fetch_page(&self, page: u32, offset: u32) -> Result<AccountPage, ExplorerError>;
}

// Distinguishes an absent field from an explicit null.
fn deserialize_present<'de, D>(
    deserializer: D,
) -> Result<Option<Option<serde_json::Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

#[derive(Deserialize, Debug)]
struct ListAccountsResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<Vec<BalanceRecord>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    next_page_params: Option<Option<serde_json::Value>>,
}

impl TryFrom<ListAccountsResponse> for AccountPage {
    type Error = ExplorerError;

    fn try_from(response: ListAccountsResponse) -> Result<Self, Self::Error> {
        let has_next = response.next_page_params.map(|params| params.is_some());
        match response.result {
            Some(accounts) => Ok(AccountPage { accounts, has_next }),
            // status "0" is how the etherscan-style api says "nothing here"
            None if response.status.as_deref() == Some("0") => Ok(AccountPage {
                accounts: vec![],
                has_next: Some(false),
            }),
            None => Err(ExplorerError::MissingResult(response.message)),
        }
    }
}

/// Client for the Blockscout `api?module=account` endpoints of a SKALE chain explorer
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    client: Client,
    api_url: Url,
}

impl ExplorerClient {
    pub fn new(explorer_url: &str) -> Result<Self, ExplorerError> {
        let mut base = Url::parse(explorer_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            client: Client::new(),
            api_url: base.join("api")?,
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn list_accounts_url(&self, page: u32, offset: u32) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("module", "account")
            .append_pair("action", "listaccounts")
            .append_pair("page", &page.to_string())
            .append_pair("offset", &offset.to_string());
        url
    }
}

#[async_trait]
impl AccountPages for ExplorerClient {
    async fn fetch_page(&self, page: u32, offset: u32) -> Result<AccountPage, ExplorerError> {
        let url = self.list_accounts_url(page, offset);
        log::debug!("GET {}", url);

        let res = self.client.get(url).send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(ExplorerError::StatusError {
                status: status.as_u16(),
                text,
            });
        }

        let response: ListAccountsResponse = serde_json::from_str(&text)
            .map_err(|err| ExplorerError::ResponseSerdeJson { err, text })?;
        response.try_into()
    }
}
