//! Backend API client.
//!
//! [`ApiClient::fetch_api`] is the source of truth: it returns an
//! [`ApiResult`] for every answered call and an [`AppError`] for transport
//! failures and non-JSON bodies. The read helpers built on top of it are a
//! deliberately lossy convenience layer: any failure collapses into an empty
//! default (empty list, `None`, empty object) and is only visible in the logs.

use std::sync::Arc;

use reqwest::{header, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::client::{ApiRequest, ClientConfig};
use crate::error::{AppError, AppResult};
use crate::models::{
    ApiResult, Customization, Page, PasswordUpdate, ProductEntry, ProductSpec,
    ProductStockDetail, ProductStockSummary, PurchaseOrder, SalesOrder, UserNameUpdate,
};
use crate::modules::AuthSession;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub struct ApiClient {
    http_client: Client,
    base_url: Url,
    session: Arc<AuthSession>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<AuthSession>) -> AppResult<Self> {
        Ok(Self {
            http_client: crate::utils::http::create_client(config.request_timeout)?,
            base_url: config.parsed_base_url()?,
            session,
        })
    }

    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    /// Authenticated call to the backend.
    ///
    /// - No stored token: no request is sent; the session is asked to
    ///   require authentication and the unauthorized result is returned.
    /// - 401 on an authenticated request: the token is dropped, the session
    ///   navigates to login once, and the unauthorized result is returned
    ///   whatever the body held.
    /// - Any other non-2xx: failure carrying the parsed body.
    /// - 2xx: success carrying the parsed body.
    pub async fn fetch_api(&self, request: ApiRequest) -> AppResult<ApiResult> {
        let location = self.session.current_location();
        let Some(token) = self.session.get_token() else {
            tracing::debug!("{} skipped: no credential", request.describe());
            self.session.require_auth(&location);
            return Ok(ApiResult::unauthorized());
        };

        let url = request.url(&self.base_url)?;
        let mut builder = self
            .http_client
            .request(request.method.clone(), url)
            .bearer_auth(&token);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();

        if request.authenticated && status == StatusCode::UNAUTHORIZED {
            tracing::warn!("{} rejected the credential", request.describe());
            self.session.reauthenticate(&location);
            return Ok(ApiResult::unauthorized());
        }

        let body = decode_json_body(response).await?;
        if !status.is_success() {
            tracing::warn!("{} failed with status {}: {}", request.describe(), status, body);
            return Ok(ApiResult::failure(body));
        }

        Ok(ApiResult::ok(body))
    }

    /// Data of a successful call decoded as `T`, or `T::default()`
    async fn fetch_data<T>(&self, request: ApiRequest) -> T
    where
        T: DeserializeOwned + Default,
    {
        let label = request.describe();
        match self.fetch_api(request).await {
            Ok(result) if result.success => result.data_as().unwrap_or_default(),
            Ok(result) => {
                tracing::warn!("{} returned no data: {:?}", label, result.errors);
                T::default()
            }
            Err(e) => {
                tracing::warn!("{} failed: {}", label, e);
                T::default()
            }
        }
    }

    async fn send_json<B>(&self, request: ApiRequest, body: &B) -> AppResult<ApiResult>
    where
        B: Serialize + ?Sized,
    {
        self.fetch_api(request.json(body)?).await
    }

    // ===== Materials =====

    pub async fn add_material<B: Serialize + ?Sized>(&self, material: &B) -> AppResult<ApiResult> {
        self.send_json(ApiRequest::post("materials"), material)
            .await
    }

    pub async fn query_materials(&self, keyword: &str) -> Vec<Value> {
        self.fetch_data(ApiRequest::get("materials").query("keyword", keyword))
            .await
    }

    pub async fn get_categories(&self) -> Vec<String> {
        self.fetch_data(ApiRequest::get("material/categories"))
            .await
    }

    // ===== Product specs =====

    pub async fn add_product_spec(&self, spec: &ProductSpec) -> AppResult<ApiResult> {
        self.send_json(ApiRequest::post("product_specs"), spec)
            .await
    }

    /// Page number and size are only sent when non-zero
    pub async fn query_product_spec(
        &self,
        keyword: &str,
        p: Option<u32>,
        ps: Option<u32>,
    ) -> Vec<ProductSpec> {
        let request = ApiRequest::get("product_specs")
            .query("keyword", keyword)
            .query_opt("p", p.filter(|&p| p > 0))
            .query_opt("ps", ps.filter(|&ps| ps > 0));
        self.fetch_data(request).await
    }

    pub async fn delete_product_spec(&self, id: &str) -> AppResult<ApiResult> {
        self.fetch_api(ApiRequest::delete("product_spec").segment(id))
            .await
    }

    pub async fn get_product_spec(&self, id: &str) -> Option<ProductSpec> {
        self.fetch_data(ApiRequest::get("product_spec").segment(id))
            .await
    }

    pub async fn get_property_enum(&self, property: &str) -> Vec<String> {
        self.fetch_data(ApiRequest::get("product_specs/property_enum").query("property", property))
            .await
    }

    // ===== Stock movements and orders =====

    pub async fn product_entry_stock(&self, entry: &ProductEntry) -> AppResult<ApiResult> {
        self.send_json(ApiRequest::post("product_repo/entry"), entry)
            .await
    }

    pub async fn product_delivery<B: Serialize + ?Sized>(
        &self,
        delivery: &B,
    ) -> AppResult<ApiResult> {
        self.send_json(ApiRequest::post("product_repo/delivery"), delivery)
            .await
    }

    pub async fn add_product_purchase_order<B: Serialize + ?Sized>(
        &self,
        order: &B,
    ) -> AppResult<ApiResult> {
        self.send_json(ApiRequest::post("product_repo/purchase"), order)
            .await
    }

    pub async fn add_product_sales_order<B: Serialize + ?Sized>(
        &self,
        order: &B,
    ) -> AppResult<ApiResult> {
        self.send_json(ApiRequest::post("product_repo/sale"), order)
            .await
    }

    pub async fn query_product_stock_summary(&self, id: i64) -> Page<ProductStockSummary> {
        self.fetch_data(ApiRequest::get("product_repo").segment(id).segment("summary"))
            .await
    }

    pub async fn query_product_stock_detail(
        &self,
        id: i64,
        status: Option<&str>,
        p: u32,
        ps: u32,
    ) -> Vec<ProductStockDetail> {
        let request = ApiRequest::get("product_repo")
            .segment(id)
            .segment("stock")
            .query_opt("status", status)
            .query("p", p)
            .query("ps", ps);
        self.fetch_data(request).await
    }

    /// `pid` of `None` or 0 lists orders for every product
    pub async fn query_product_purchase_order(
        &self,
        pid: Option<i64>,
        status: Option<&str>,
        p: u32,
        ps: u32,
    ) -> Vec<PurchaseOrder> {
        self.fetch_data(order_listing("product_repo/purchase_order", pid, status, p, ps))
            .await
    }

    pub async fn query_product_sales_order(
        &self,
        pid: Option<i64>,
        status: Option<&str>,
        p: u32,
        ps: u32,
    ) -> Vec<SalesOrder> {
        self.fetch_data(order_listing("product_repo/sales_order", pid, status, p, ps))
            .await
    }

    /// Products with their stock counters.
    /// The backend listing takes no keyword, so it is not sent.
    pub async fn product_stock_summary(
        &self,
        _keyword: &str,
        p: u32,
        ps: u32,
    ) -> Vec<ProductStockSummary> {
        let request = ApiRequest::get("product_repo/summary")
            .query("p", p)
            .query("ps", ps);
        self.fetch_data(request).await
    }

    pub async fn delete_product_stock(&self, pid: i64, sn: &str) -> AppResult<ApiResult> {
        self.fetch_api(stock_item(Method::DELETE, pid, sn)).await
    }

    pub async fn query_stock_product_info(&self, pid: i64, sn: &str) -> Map<String, Value> {
        self.fetch_data(stock_item(Method::GET, pid, sn)).await
    }

    pub async fn update_product_customization(
        &self,
        pid: i64,
        sn: &str,
        customization: &str,
        customized_by: &str,
    ) -> AppResult<ApiResult> {
        let request = ApiRequest::post("product_repo")
            .segment(pid)
            .segment("stock")
            .segment(sn)
            .segment("customize");
        let body = Customization {
            customization: customization.to_string(),
            customized_by: customized_by.to_string(),
        };
        self.send_json(request, &body).await
    }

    pub async fn delete_product_purchase_order(&self, order_no: &str) -> AppResult<ApiResult> {
        self.fetch_api(ApiRequest::delete("product_repo/purchase_order").segment(order_no))
            .await
    }

    pub async fn delete_product_sales_order(&self, order_no: &str) -> AppResult<ApiResult> {
        self.fetch_api(ApiRequest::delete("product_repo/sales_order").segment(order_no))
            .await
    }

    // ===== User =====

    pub async fn get_current_user(&self) -> Option<Value> {
        self.fetch_data(ApiRequest::get("user/current")).await
    }

    pub async fn update_user_name(&self, name: &str) -> AppResult<ApiResult> {
        let body = UserNameUpdate {
            username: name.to_string(),
        };
        self.send_json(ApiRequest::put("user/info"), &body).await
    }

    pub async fn update_user_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<ApiResult> {
        let body = PasswordUpdate {
            current_password: old_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.send_json(ApiRequest::put("user/password"), &body)
            .await
    }
}

fn order_listing(
    path: &str,
    pid: Option<i64>,
    status: Option<&str>,
    p: u32,
    ps: u32,
) -> ApiRequest {
    ApiRequest::get(path)
        .query_opt("status", status)
        .query_opt("pid", pid.filter(|&pid| pid != 0))
        .query("p", p)
        .query("ps", ps)
}

fn stock_item(method: Method, pid: i64, sn: &str) -> ApiRequest {
    ApiRequest::new(method, "product_repo")
        .segment(pid)
        .segment("stock")
        .segment(sn)
}

fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}

/// Parse a response body as JSON. An empty body reads as `null`; anything
/// that is not JSON is a [`AppError::MalformedResponse`].
async fn decode_json_body(response: reqwest::Response) -> AppResult<Value> {
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response.bytes().await?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    if let Some(ct) = content_type.as_deref() {
        if !is_json_content_type(ct) {
            return Err(AppError::MalformedResponse {
                status,
                content_type: content_type.clone(),
                reason: "expected a JSON body".to_string(),
            });
        }
    }

    serde_json::from_slice(&bytes).map_err(|e| AppError::MalformedResponse {
        status,
        content_type,
        reason: e.to_string(),
    })
}
