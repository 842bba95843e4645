//! Print log queries
//!
//! The log is the one dataset filtered server-side: it can be far larger
//! than the loaded archive list, so search, filters and pagination are
//! pushed to the backend as query parameters.

use reqwest::Method;

use printbay_protocol::api::{PrintLogPage, PrintLogQuery};

use crate::client::ApiClient;
use crate::error::{PrintBayError, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 500;

/// Print log operations against the farm API.
pub struct LogService<'a, C: ApiClient> {
    client: &'a C,
}

impl<'a, C: ApiClient> LogService<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Fetch one page of the log for `query`.
    pub async fn page(&self, query: &PrintLogQuery) -> Result<PrintLogPage> {
        if query.limit == 0 || query.limit > MAX_PAGE_SIZE {
            return Err(PrintBayError::invalid_input(format!(
                "Page size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let endpoint = format!("print-log?{}", build_query_string(query));
        let response = self
            .client
            .request::<(), PrintLogPage>(Method::GET, &endpoint, None)
            .await?;
        response.into_data()
    }
}

/// Serialize the query into a URL query string; unset filters are omitted.
pub fn build_query_string(query: &PrintLogQuery) -> String {
    let mut params: Vec<(&str, String)> = Vec::new();

    if let Some(search) = &query.search {
        params.push(("search", urlencoding::encode(search).into_owned()));
    }
    if let Some(printer_id) = query.printer_id {
        params.push(("printer_id", printer_id.to_string()));
    }
    if let Some(username) = &query.username {
        params.push(("username", urlencoding::encode(username).into_owned()));
    }
    if let Some(status) = &query.status {
        params.push(("status", urlencoding::encode(status).into_owned()));
    }
    if let Some(from) = &query.from {
        params.push(("from", urlencoding::encode(&from.to_rfc3339()).into_owned()));
    }
    if let Some(to) = &query.to {
        params.push(("to", urlencoding::encode(&to.to_rfc3339()).into_owned()));
    }
    params.push(("limit", query.limit.to_string()));
    params.push(("offset", query.offset.to_string()));

    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}
