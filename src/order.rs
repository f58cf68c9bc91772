//! Capability contracts for application-side order data.
//!
//! The request builders only ever read through these accessors; they never
//! depend on a concrete order representation and never mutate one. An
//! ORM-backed order, a test fixture and a plain struct all qualify by
//! implementing the same two traits.

use rust_decimal::Decimal;

/// Minimum accessors an order must expose to build a `DeliveryRequest`.
///
/// `comment` and the postal-code accessors carry default bodies; postal
/// codes only appear on the wire in the later protocol variant, so an
/// implementation can ignore them entirely.
pub trait Order {
    type Line: OrderLine;

    /// The client's own order number (distinct from the provider's
    /// dispatch number).
    fn number(&self) -> String;

    /// Sender city id in the provider's city base.
    fn sender_city_id(&self) -> u32;

    /// Recipient city id in the provider's city base.
    fn recipient_city_id(&self) -> u32;

    fn recipient_name(&self) -> String;

    fn recipient_phone(&self) -> String;

    fn address_street(&self) -> String;

    fn address_house(&self) -> String;

    fn address_flat(&self) -> String;

    /// Pickup-point code; takes precedence over the street address when
    /// present and non-empty.
    fn pvz_code(&self) -> Option<String>;

    /// Tariff code selecting the delivery service level.
    fn shipping_tariff(&self) -> u32;

    /// Delivery cost charged to the recipient.
    fn delivery_price(&self) -> Decimal;

    fn lines(&self) -> Vec<Self::Line>;

    /// Free-text delivery instructions.
    fn comment(&self) -> String {
        String::new()
    }

    fn sender_postcode(&self) -> Option<String> {
        None
    }

    fn recipient_postcode(&self) -> Option<String> {
        None
    }
}

/// Minimum accessors for one line item of an [`Order`].
pub trait OrderLine {
    /// Merchandise key; truncated to 30 characters on the wire.
    fn product_upc(&self) -> String;

    /// Unit weight in grams.
    fn product_weight(&self) -> u32;

    fn quantity(&self) -> u32;

    /// Unit price, also sent as the unit cash-on-delivery payment.
    fn product_price(&self) -> Decimal;
}
