//! HTTP client for the SEMDEC incentive API

use async_trait::async_trait;
use ft_core::config::ApiConfig;
use ft_core::error::{FiscalError, Result};
use ft_core::filter::{is_unrestricted, FilterCriteria};
use ft_core::record::RecordPage;
use ft_core::session::Session;
use ft_core::{Cnpj, Record};
use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::models::{
    Alerta, AlertaPage, DashboardSummary, ErrorBody, GeneratedAlerts, LoginResponse, RankingEntry,
    RankingKind, UploadReport,
};
use crate::upload::{UploadFile, UploadKind};

/// Upper bound on followed `next` links when listing companies
const MAX_PAGES: usize = 200;

/// Operations the front-end needs from the backend
#[async_trait]
pub trait FiscalApi: Send + Sync {
    /// Aggregate KPIs
    async fn resumo(&self) -> Result<DashboardSummary>;

    /// Every company, following pagination
    async fn list_empresas(&self) -> Result<Vec<Record>>;

    /// Full detail of one company, passed through as JSON
    async fn empresa_detalhe(&self, cnpj: &Cnpj) -> Result<serde_json::Value>;

    /// Server-rendered CSV of the companies matching `criteria`
    async fn exportar(&self, criteria: &FilterCriteria) -> Result<Vec<u8>>;

    /// Upload a CSV for bulk ingestion
    async fn upload_csv(&self, kind: UploadKind, file: &UploadFile) -> Result<UploadReport>;

    /// Impact ranking
    async fn ranking(&self, kind: RankingKind, limite: u32) -> Result<Vec<RankingEntry>>;

    /// Current alerts
    async fn alertas(&self) -> Result<Vec<Alerta>>;

    /// Ask the backend to generate alerts now
    async fn gerar_alertas(&self) -> Result<GeneratedAlerts>;

    /// Submit credentials. Rejections come back as `Ok` with `success == false`.
    async fn login(&self, username: &str, senha: &str) -> Result<LoginResponse>;
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    senha: &'a str,
}

/// reqwest-backed [`FiscalApi`]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a client for the configured base URL
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(http_error)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach the session token, if logged in
    pub fn with_session(mut self, session: &Session) -> Self {
        self.token = session.token().map(str::to_string);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        debug!(url = %url, "GET");
        let resp = self
            .request(reqwest::Method::GET, url)
            .query(query)
            .send()
            .await
            .map_err(http_error)?;
        let resp = ensure_success(resp).await?;
        resp.json().await.map_err(http_error)
    }

    async fn post_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url = %url, "POST");
        let resp = self
            .request(reqwest::Method::POST, url)
            .send()
            .await
            .map_err(http_error)?;
        let resp = ensure_success(resp).await?;
        resp.json().await.map_err(http_error)
    }
}

/// Query parameters for `/empresas/exportar/`; unrestricted values are left out
pub fn export_query(criteria: &FilterCriteria) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(setor) = criteria.setor.as_deref().filter(|s| !is_unrestricted(s)) {
        params.push(("setor", setor.to_string()));
    }
    if let Some(porte) = criteria.porte {
        params.push(("porte", porte.code().to_string()));
    }
    if !criteria.busca.is_empty() {
        params.push(("busca", criteria.busca.clone()));
    }
    params
}

/// Follow `next` links from `first`, fetching at most `max_pages` pages.
///
/// A listing that still has a `next` link after the last allowed page is an
/// error rather than a silently shortened list.
pub(crate) async fn collect_pages<F, Fut>(
    first: String,
    max_pages: usize,
    mut fetch: F,
) -> Result<Vec<Record>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<RecordPage>>,
{
    let mut records = Vec::new();
    let mut url = first;

    for _ in 0..max_pages {
        let page = fetch(url).await?;
        let next = page.next_page().map(str::to_string);
        records.extend(page.into_records());
        match next {
            Some(next) => url = next,
            None => return Ok(records),
        }
    }

    warn!(pages = max_pages, next = %url, "company listing did not end");
    Err(FiscalError::Validation(format!(
        "Company listing has more than {} pages; refusing to return a partial list",
        max_pages
    )))
}

fn http_error(err: reqwest::Error) -> FiscalError {
    FiscalError::Http(err.to_string())
}

/// Turn a non-2xx response into [`FiscalError::Server`], keeping the API's
/// own message when the body has one.
async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = ErrorBody::message_from(&body).unwrap_or(body);
    Err(FiscalError::Server {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl FiscalApi for HttpClient {
    async fn resumo(&self) -> Result<DashboardSummary> {
        self.get_json(&self.url("/dashboard/resumo/"), &[]).await
    }

    async fn list_empresas(&self) -> Result<Vec<Record>> {
        let records = collect_pages(self.url("/empresas/"), MAX_PAGES, |url| async move {
            self.get_json::<RecordPage>(&url, &[]).await
        })
        .await?;

        info!(count = records.len(), "loaded companies");
        Ok(records)
    }

    async fn empresa_detalhe(&self, cnpj: &Cnpj) -> Result<serde_json::Value> {
        let url = self.url(&format!("/empresas/{}/detalhe-completo/", cnpj.normalized()));
        self.get_json(&url, &[]).await
    }

    async fn exportar(&self, criteria: &FilterCriteria) -> Result<Vec<u8>> {
        let url = self.url("/empresas/exportar/");
        let query = export_query(criteria);
        info!(url = %url, params = query.len(), "requesting server-side export");

        let resp = self
            .request(reqwest::Method::GET, &url)
            .header(reqwest::header::ACCEPT, "text/csv")
            .query(&query)
            .send()
            .await
            .map_err(http_error)?;
        let resp = ensure_success(resp).await?;
        let bytes = resp.bytes().await.map_err(http_error)?;
        Ok(bytes.to_vec())
    }

    async fn upload_csv(&self, kind: UploadKind, file: &UploadFile) -> Result<UploadReport> {
        let url = self.url(kind.endpoint());
        info!(url = %url, file = %file.file_name, bytes = file.bytes.len(), "uploading CSV");

        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str("text/csv")
            .map_err(http_error)?;
        let form = multipart::Form::new().part("file", part);

        let resp = self
            .request(reqwest::Method::POST, &url)
            .multipart(form)
            .send()
            .await
            .map_err(http_error)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = ErrorBody::message_from(&body)
                .unwrap_or_else(|| "Error uploading file".to_string());
            return Err(FiscalError::Upload(message));
        }
        resp.json().await.map_err(http_error)
    }

    async fn ranking(&self, kind: RankingKind, limite: u32) -> Result<Vec<RankingEntry>> {
        let query = [("tipo", kind.as_str().to_string()), ("limite", limite.to_string())];
        self.get_json(&self.url("/calculos/ranking/"), &query).await
    }

    async fn alertas(&self) -> Result<Vec<Alerta>> {
        let page: AlertaPage = self.get_json(&self.url("/alertas/"), &[]).await?;
        Ok(page.into_alertas())
    }

    async fn gerar_alertas(&self) -> Result<GeneratedAlerts> {
        self.post_json(&self.url("/alertas/gerar-alertas/")).await
    }

    async fn login(&self, username: &str, senha: &str) -> Result<LoginResponse> {
        let url = self.url("/auth/login/");
        debug!(url = %url, username = %username, "POST login");

        let resp = self
            .request(reqwest::Method::POST, &url)
            .json(&LoginRequest { username, senha })
            .send()
            .await
            .map_err(http_error)?;

        let status = resp.status();
        let body = resp.text().await.map_err(http_error)?;
        serde_json::from_str(&body).map_err(|_| FiscalError::Server {
            status: status.as_u16(),
            message: body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_core::Porte;
    use pretty_assertions::assert_eq;

    fn client(base_url: &str) -> HttpClient {
        let config = ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        };
        HttpClient::new(&config).unwrap()
    }

    #[test]
    fn test_trims_trailing_slash() {
        let client = client("http://127.0.0.1:8000/api/");
        assert_eq!(client.base_url(), "http://127.0.0.1:8000/api");
    }

    #[test]
    fn test_url_join() {
        let client = client("http://127.0.0.1:8000/api");
        assert_eq!(client.url("/empresas/"), "http://127.0.0.1:8000/api/empresas/");
        assert_eq!(client.url("alertas/"), "http://127.0.0.1:8000/api/alertas/");
    }

    #[test]
    fn test_export_query_omits_unrestricted() {
        let criteria = FilterCriteria {
            busca: String::new(),
            setor: Some("todos".to_string()),
            porte: None,
        };
        assert!(export_query(&criteria).is_empty());
    }

    #[test]
    fn test_export_query_includes_active_filters() {
        let criteria = FilterCriteria::new()
            .with_busca("alpha")
            .with_setor("Tecnologia")
            .with_porte(Porte::Me);
        assert_eq!(
            export_query(&criteria),
            vec![
                ("setor", "Tecnologia".to_string()),
                ("porte", "ME".to_string()),
                ("busca", "alpha".to_string()),
            ]
        );
    }

    #[test]
    fn test_with_session_takes_token() {
        let store = ft_core::session::MemoryStore::new();
        let user: ft_core::session::Usuario =
            serde_json::from_str(r#"{"id": 1, "username": "admin"}"#).unwrap();
        let session = Session::establish(&store, "tok".into(), user).unwrap();
        let client = client("http://localhost/api").with_session(&session);
        assert_eq!(client.token.as_deref(), Some("tok"));
    }

    fn page(ids: &[i64], next: Option<&str>) -> RecordPage {
        RecordPage::Paginated {
            count: None,
            next: next.map(str::to_string),
            results: ids.iter().map(|id| Record::new(*id, "11222333000181")).collect(),
        }
    }

    #[tokio::test]
    async fn test_collect_pages_follows_next_links() {
        let mut requested = Vec::new();
        let records = collect_pages("p1".to_string(), 5, |url| {
            requested.push(url.clone());
            let page = match url.as_str() {
                "p1" => page(&[1, 2], Some("p2")),
                _ => page(&[3], None),
            };
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(requested, vec!["p1", "p2"]);
        let ids: Vec<String> = records.iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_collect_pages_plain_array_is_one_page() {
        let records = collect_pages("p1".to_string(), 1, |_| async {
            Ok(RecordPage::Plain(vec![Record::new(1, "11222333000181")]))
        })
        .await
        .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_collect_pages_endless_listing_is_an_error() {
        let mut calls = 0;
        let result = collect_pages("p0".to_string(), 3, |_| {
            calls += 1;
            let page = page(&[calls], Some("again"));
            async move { Ok(page) }
        })
        .await;

        assert!(matches!(result, Err(FiscalError::Validation(_))));
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_collect_pages_propagates_fetch_error() {
        let result = collect_pages("p0".to_string(), 3, |_| async {
            Err(FiscalError::Http("connection refused".to_string()))
        })
        .await;
        assert!(result.unwrap_err().is_network());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Port 9 (discard) is closed on test hosts; connection is refused fast
        let client = client("http://127.0.0.1:9/api");
        let err = client.resumo().await.unwrap_err();
        assert!(err.is_network());
    }
}
