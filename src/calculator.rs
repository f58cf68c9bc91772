//! Shipping-cost quoting against the JSON calculator endpoint.
//!
//! The calculator is the one operation that needs no signature in the
//! current protocol revision. Business-level failures come back inside the
//! decoded body under an `error` key; this layer does not interpret them.

use serde::Serialize;

use crate::auth::local_timestamp;
use crate::error::Error;
use crate::Result;

const CALCULATOR_PROTOCOL_VERSION: &str = "1.0";

/// One side of a quote: a city id in the provider's base and/or a postal
/// code. At least one of the two must be present.
#[derive(Clone, Debug, Default)]
pub struct Location {
    pub city_id: Option<u32>,
    pub postcode: Option<String>,
}

impl Location {
    #[must_use]
    pub fn city(city_id: u32) -> Self {
        Self {
            city_id: Some(city_id),
            postcode: None,
        }
    }

    #[must_use]
    pub fn postcode(postcode: impl Into<String>) -> Self {
        Self {
            city_id: None,
            postcode: Some(postcode.into()),
        }
    }

    #[must_use]
    pub fn with_postcode(mut self, postcode: impl Into<String>) -> Self {
        self.postcode = Some(postcode.into());
        self
    }

    fn ensure_addressable(&self, side: &str) -> Result<()> {
        if self.city_id.is_none() && self.postcode.is_none() {
            return Err(Error::validation(format!(
                "{side} location needs a city id or a postcode"
            )));
        }
        Ok(())
    }
}

/// Physical parameters of one shipped good.
#[derive(Clone, Debug, Serialize)]
pub struct Good {
    /// Weight in kilograms.
    pub weight: f64,
    /// Length in centimeters.
    pub length: u32,
    /// Width in centimeters.
    pub width: u32,
    /// Height in centimeters.
    pub height: u32,
}

/// Inputs for one shipping-cost quote.
///
/// Tariffs are tried in the order given: the first gets the highest
/// priority on the wire.
#[derive(Clone, Debug)]
pub struct QuoteRequest {
    pub sender: Location,
    pub receiver: Location,
    pub tariffs: Vec<u32>,
    pub goods: Vec<Good>,
}

impl QuoteRequest {
    #[must_use]
    pub fn new(sender: Location, receiver: Location) -> Self {
        Self {
            sender,
            receiver,
            tariffs: Vec::new(),
            goods: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tariff(mut self, tariff: u32) -> Self {
        self.tariffs.push(tariff);
        self
    }

    #[must_use]
    pub fn with_good(mut self, good: Good) -> Self {
        self.goods.push(good);
        self
    }

    pub(crate) fn to_body(&self) -> Result<CalculatorBody> {
        self.sender.ensure_addressable("sender")?;
        self.receiver.ensure_addressable("receiver")?;

        let timestamp = local_timestamp();
        Ok(CalculatorBody {
            version: CALCULATOR_PROTOCOL_VERSION,
            date_execute: timestamp
                .split('T')
                .next()
                .unwrap_or(&timestamp)
                .to_owned(),
            date: timestamp.clone(),
            sender_city_id: self.sender.city_id,
            sender_city_post_code: self.sender.postcode.clone(),
            receiver_city_id: self.receiver.city_id,
            receiver_city_post_code: self.receiver.postcode.clone(),
            tariff_list: self
                .tariffs
                .iter()
                .enumerate()
                .map(|(index, id)| TariffPriority {
                    priority: -i64::try_from(index).unwrap_or(i64::MAX - 1) - 1,
                    id: *id,
                })
                .collect(),
            goods: self.goods.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TariffPriority {
    pub(crate) priority: i64,
    pub(crate) id: u32,
}

/// Wire body of the calculator call; field names are fixed by the remote
/// service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CalculatorBody {
    pub(crate) version: &'static str,
    pub(crate) date_execute: String,
    pub(crate) date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) sender_city_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) sender_city_post_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) receiver_city_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) receiver_city_post_code: Option<String>,
    pub(crate) tariff_list: Vec<TariffPriority>,
    pub(crate) goods: Vec<Good>,
}
