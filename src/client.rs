use reqwest::Client as ReqwestClient;
use tracing::{debug, warn};
use url::Url;

use crate::Result;
use crate::auth::Credentials;
use crate::calculator::QuoteRequest;
use crate::config::ClientConfig;
use crate::order::Order;
use crate::requests::{self, CourierCall};
use crate::transport::Transport;
use crate::xml::{self, Element, NormalizedNode};

const CREATE_ORDER_PATH: &str = "new_orders.php";
const DELETE_ORDER_PATH: &str = "delete_orders.php";
const ORDER_STATUS_PATH: &str = "status_report_h.php";
const ORDER_INFO_PATH: &str = "info_report.php";
const ORDER_PRINT_PATH: &str = "orders_print.php";
const DELIVERY_POINTS_PATH: &str = "pvzlist.php";
const CALL_COURIER_PATH: &str = "call_courier.php";

/// Client for the CDEK integrator and calculator endpoints.
///
/// Holds only immutable configuration and credentials, so a single
/// instance can be shared across tasks without locking. Every operation is
/// one request/response round trip; there is no retry policy.
#[derive(Clone, Debug)]
pub struct CdekClient {
    config: ClientConfig,
    transport: Transport,
}

impl CdekClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = Transport::new(config.timeout)?;
        Ok(Self { config, transport })
    }

    /// Creates a client around a caller-supplied HTTP client.
    #[must_use]
    pub fn with_client(config: ClientConfig, client: ReqwestClient) -> Self {
        Self {
            transport: Transport::with_client(client),
            config,
        }
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.config.credentials
    }

    /// Quotes delivery cost and terms; unsigned in the current protocol
    /// revision.
    ///
    /// Returns the decoded calculator body verbatim. A business-level
    /// rejection arrives under the body's `error` key; inspecting it is the
    /// caller's contract, not an error of this layer.
    pub async fn get_shipping_cost(&self, quote: &QuoteRequest) -> Result<serde_json::Value> {
        let body = quote.to_body()?;
        debug!(url = %self.config.calculator_url, "requesting shipping cost");
        self.transport
            .post_json(self.config.calculator_url.clone(), &body)
            .await
    }

    /// Lists pickup points for one city, or all of them when `city_id` is
    /// absent. Repeated `Pvz` entries normalize into an ordered sequence.
    pub async fn get_delivery_points(
        &self,
        city_id: Option<u32>,
    ) -> Result<Option<NormalizedNode>> {
        let url = self.endpoint(DELIVERY_POINTS_PATH)?;
        let query: Vec<(&str, String)> = city_id
            .map(|id| ("cityid", id.to_string()))
            .into_iter()
            .collect();
        debug!(%url, "requesting delivery points");
        let body = self.transport.get_text(url, &query).await?;
        Ok(normalize_response(&body))
    }

    /// Registers one order for delivery.
    pub async fn create_order(&self, order: &impl Order) -> Result<Option<NormalizedNode>> {
        self.exec_xml_request(CREATE_ORDER_PATH, requests::delivery_request(order))
            .await
    }

    /// Cancels a previously registered order by the client's own number.
    pub async fn delete_order(&self, order_number: &str) -> Result<Option<NormalizedNode>> {
        self.exec_xml_request(DELETE_ORDER_PATH, requests::delete_request(order_number))
            .await
    }

    /// Fetches current statuses for the given dispatch numbers;
    /// `show_history` includes the movement log (`State` entries).
    pub async fn get_orders_statuses(
        &self,
        dispatch_numbers: &[impl AsRef<str>],
        show_history: bool,
    ) -> Result<Option<NormalizedNode>> {
        self.exec_xml_request(
            ORDER_STATUS_PATH,
            requests::status_report(dispatch_numbers, show_history),
        )
        .await
    }

    /// Fetches extended delivery information for the given dispatch
    /// numbers.
    pub async fn get_orders_info(
        &self,
        dispatch_numbers: &[impl AsRef<str>],
    ) -> Result<Option<NormalizedNode>> {
        self.exec_xml_request(ORDER_INFO_PATH, requests::info_request(dispatch_numbers))
            .await
    }

    /// Downloads printable labels for the given dispatch numbers.
    ///
    /// The service answers with raw label data on success and with an XML
    /// error document otherwise; the latter is reported as `None`. The
    /// request is signed inline because its body bypasses the structured
    /// wrapper, but through the same signing function as every other call.
    pub async fn get_orders_print(
        &self,
        dispatch_numbers: &[impl AsRef<str>],
        copy_count: u32,
    ) -> Result<Option<Vec<u8>>> {
        let mut element = requests::orders_print(dispatch_numbers, copy_count);
        self.config.credentials.sign(&mut element);
        let url = self.endpoint(ORDER_PRINT_PATH)?;
        debug!(%url, "requesting order labels");
        let raw = self
            .transport
            .post_form_bytes(url, &[("xml_request", element.to_xml())])
            .await?;
        if raw.starts_with(b"<?xml") {
            warn!("print request answered with an error document");
            return Ok(None);
        }
        Ok(Some(raw))
    }

    /// Schedules a courier pickup.
    ///
    /// The one operation that reports its outcome as a boolean: a transport
    /// failure or an unparseable answer is logged and returned as `false`
    /// instead of propagating.
    pub async fn call_courier(&self, call: &CourierCall) -> bool {
        match self
            .exec_xml_request(CALL_COURIER_PATH, requests::call_courier(call))
            .await
        {
            Ok(response) => response.is_some(),
            Err(err) => {
                warn!(error = %err, "courier call failed");
                false
            }
        }
    }

    /// Shared finalization for the XML family: sign the root, serialize,
    /// post as an `xml_request` form field and normalize the answer.
    async fn exec_xml_request(
        &self,
        path: &str,
        mut element: Element,
    ) -> Result<Option<NormalizedNode>> {
        self.config.credentials.sign(&mut element);
        let url = self.endpoint(path)?;
        debug!(%url, root = element.tag(), "dispatching xml request");
        let body = self
            .transport
            .post_form_text(url, &[("xml_request", element.to_xml())])
            .await?;
        Ok(normalize_response(&body))
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.config.integrator_url.join(path)?)
    }
}

/// `None` for a body that is not a well-formed document; callers treat
/// that as a checkable outcome, never a crash.
fn normalize_response(body: &str) -> Option<NormalizedNode> {
    xml::parse(body).map(|element| xml::normalize(&element))
}
