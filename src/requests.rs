//! Builders for the six XML request shapes the integrator accepts.
//!
//! Each builder produces the exact tree the remote service expects
//! verbatim; signing happens afterwards, through
//! [`Credentials::sign`](crate::auth::Credentials::sign).

use chrono::{NaiveDate, NaiveTime};

use crate::order::{Order, OrderLine as _};
use crate::xml::Element;

const WARE_KEY_MAX_CHARS: usize = 30;

/// Order creation: `DeliveryRequest` with one `Order`, its `Address` and a
/// single synthesized `Package`.
pub(crate) fn delivery_request(order: &impl Order) -> Element {
    let number = order.number();

    let mut order_element = Element::new("Order")
        .with_attr("Number", &number)
        .with_attr("SendCityCode", order.sender_city_id().to_string());
    if let Some(postcode) = order.sender_postcode() {
        order_element.set_attr("SendCityPostCode", postcode);
    }
    order_element.set_attr("RecCityCode", order.recipient_city_id().to_string());
    if let Some(postcode) = order.recipient_postcode() {
        order_element.set_attr("RecCityPostCode", postcode);
    }
    order_element.set_attr("RecipientName", order.recipient_name());
    order_element.set_attr("TariffTypeCode", order.shipping_tariff().to_string());
    order_element.set_attr("DeliveryRecipientCost", order.delivery_price().to_string());
    order_element.set_attr("Phone", order.recipient_phone());
    order_element.set_attr("Comment", order.comment());

    order_element.push_child(address_element(order));
    order_element.push_child(package_element(order, &number));

    Element::new("DeliveryRequest")
        .with_attr("Number", number)
        .with_attr("OrderCount", "1")
        .with_child(order_element)
}

/// A pickup-point code and a street address are mutually exclusive; the
/// code wins when present and non-empty.
fn address_element(order: &impl Order) -> Element {
    let mut address = Element::new("Address");
    match order.pvz_code().filter(|code| !code.is_empty()) {
        Some(code) => address.set_attr("PvzCode", code),
        None => {
            address.set_attr("Street", order.address_street());
            address.set_attr("House", order.address_house());
            address.set_attr("Flat", order.address_flat());
        }
    }
    address
}

fn package_element(order: &impl Order, order_number: &str) -> Element {
    // One synthesized package per order, numbered after it.
    let package_number = format!("{order_number}1");
    let mut package = Element::new("Package")
        .with_attr("Number", &package_number)
        .with_attr("BarCode", &package_number);

    // The provider has always been fed the sum of declared unit weights
    // here, not weight x quantity. Kept verbatim for wire compatibility.
    let mut total_weight: u64 = 0;
    for line in order.lines() {
        let price = line.product_price().to_string();
        package.push_child(
            Element::new("Item")
                .with_attr("Amount", line.quantity().to_string())
                .with_attr("Weight", line.product_weight().to_string())
                .with_attr("WareKey", truncate_ware_key(&line.product_upc()))
                .with_attr("Cost", &price)
                .with_attr("Payment", &price),
        );
        total_weight += u64::from(line.product_weight());
    }
    package.set_attr("Weight", total_weight.to_string());
    package
}

fn truncate_ware_key(upc: &str) -> String {
    upc.chars().take(WARE_KEY_MAX_CHARS).collect()
}

pub(crate) fn delete_request(order_number: &str) -> Element {
    Element::new("DeleteRequest")
        .with_attr("Number", order_number)
        .with_attr("OrderCount", "1")
        .with_child(Element::new("Order").with_attr("Number", order_number))
}

pub(crate) fn status_report(
    dispatch_numbers: &[impl AsRef<str>],
    show_history: bool,
) -> Element {
    let mut report = Element::new("StatusReport")
        .with_attr("ShowHistory", if show_history { "1" } else { "0" });
    for number in dispatch_numbers {
        report.push_child(Element::new("Order").with_attr("DispatchNumber", number.as_ref()));
    }
    report
}

pub(crate) fn info_request(dispatch_numbers: &[impl AsRef<str>]) -> Element {
    let mut request = Element::new("InfoRequest");
    for number in dispatch_numbers {
        request.push_child(Element::new("Order").with_attr("DispatchNumber", number.as_ref()));
    }
    request
}

pub(crate) fn orders_print(dispatch_numbers: &[impl AsRef<str>], copy_count: u32) -> Element {
    let mut print = Element::new("OrdersPrint")
        .with_attr("OrderCount", dispatch_numbers.len().to_string())
        .with_attr("CopyCount", copy_count.to_string());
    for number in dispatch_numbers {
        print.push_child(Element::new("Order").with_attr("DispatchNumber", number.as_ref()));
    }
    print
}

/// Input values for scheduling one courier pickup.
#[derive(Clone, Debug)]
pub struct CourierCall {
    pub date: NaiveDate,
    pub time_begin: NaiveTime,
    pub time_end: NaiveTime,
    pub send_city_id: u32,
    pub send_phone: String,
    pub sender_name: String,
    /// Total consignment weight in grams.
    pub weight: u32,
    pub comment: String,
    pub lunch_begin: Option<NaiveTime>,
    pub lunch_end: Option<NaiveTime>,
    pub address_street: String,
    pub address_house: String,
    pub address_flat: String,
}

impl CourierCall {
    pub fn new(
        date: NaiveDate,
        time_begin: NaiveTime,
        time_end: NaiveTime,
        send_city_id: u32,
        send_phone: impl Into<String>,
        sender_name: impl Into<String>,
        weight: u32,
    ) -> Self {
        Self {
            date,
            time_begin,
            time_end,
            send_city_id,
            send_phone: send_phone.into(),
            sender_name: sender_name.into(),
            weight,
            comment: String::new(),
            lunch_begin: None,
            lunch_end: None,
            address_street: String::new(),
            address_house: String::new(),
            address_flat: String::new(),
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    #[must_use]
    pub fn with_lunch(mut self, begin: NaiveTime, end: NaiveTime) -> Self {
        self.lunch_begin = Some(begin);
        self.lunch_end = Some(end);
        self
    }

    #[must_use]
    pub fn with_address(
        mut self,
        street: impl Into<String>,
        house: impl Into<String>,
        flat: impl Into<String>,
    ) -> Self {
        self.address_street = street.into();
        self.address_house = house.into();
        self.address_flat = flat.into();
        self
    }
}

pub(crate) fn call_courier(call: &CourierCall) -> Element {
    let mut call_element = Element::new("Call")
        .with_attr("Date", call.date.format("%Y-%m-%d").to_string())
        .with_attr("TimeBeg", call.time_begin.format("%H:%M:%S").to_string())
        .with_attr("TimeEnd", call.time_end.format("%H:%M:%S").to_string());
    // Lunch window attributes appear only when provided.
    if let Some(lunch_begin) = call.lunch_begin {
        call_element.set_attr("LunchBeg", lunch_begin.format("%H:%M:%S").to_string());
    }
    if let Some(lunch_end) = call.lunch_end {
        call_element.set_attr("LunchEnd", lunch_end.format("%H:%M:%S").to_string());
    }
    call_element.set_attr("SendCityCode", call.send_city_id.to_string());
    call_element.set_attr("SendPhone", call.send_phone.clone());
    call_element.set_attr("SenderName", call.sender_name.clone());
    call_element.set_attr("Weight", call.weight.to_string());
    call_element.set_attr("Comment", call.comment.clone());

    let address = Element::new("Address")
        .with_attr("Street", call.address_street.clone())
        .with_attr("House", call.address_house.clone())
        .with_attr("Flat", call.address_flat.clone());

    Element::new("CallCourier")
        .with_attr("CallCount", "1")
        .with_child(call_element.with_child(address))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::{
        CourierCall, call_courier, delete_request, delivery_request, info_request, orders_print,
        status_report,
    };
    use crate::auth::Credentials;
    use crate::order::{Order, OrderLine};
    use crate::xml::Element;

    #[derive(Clone)]
    struct TestLine {
        upc: String,
        weight: u32,
        quantity: u32,
        price: Decimal,
    }

    impl OrderLine for TestLine {
        fn product_upc(&self) -> String {
            self.upc.clone()
        }

        fn product_weight(&self) -> u32 {
            self.weight
        }

        fn quantity(&self) -> u32 {
            self.quantity
        }

        fn product_price(&self) -> Decimal {
            self.price
        }
    }

    struct TestOrder {
        pvz_code: Option<String>,
        lines: Vec<TestLine>,
    }

    impl TestOrder {
        fn with_lines(lines: Vec<TestLine>) -> Self {
            Self {
                pvz_code: None,
                lines,
            }
        }
    }

    impl Order for TestOrder {
        type Line = TestLine;

        fn number(&self) -> String {
            "42".to_owned()
        }

        fn sender_city_id(&self) -> u32 {
            44
        }

        fn recipient_city_id(&self) -> u32 {
            137
        }

        fn recipient_name(&self) -> String {
            "Ivanov I. I.".to_owned()
        }

        fn recipient_phone(&self) -> String {
            "+70000000000".to_owned()
        }

        fn address_street(&self) -> String {
            "Lenina".to_owned()
        }

        fn address_house(&self) -> String {
            "10".to_owned()
        }

        fn address_flat(&self) -> String {
            "5".to_owned()
        }

        fn pvz_code(&self) -> Option<String> {
            self.pvz_code.clone()
        }

        fn shipping_tariff(&self) -> u32 {
            136
        }

        fn delivery_price(&self) -> Decimal {
            dec!(250.00)
        }

        fn lines(&self) -> Vec<TestLine> {
            self.lines.clone()
        }
    }

    fn line(upc: &str, weight: u32, quantity: u32) -> TestLine {
        TestLine {
            upc: upc.to_owned(),
            weight,
            quantity,
            price: dec!(99.90),
        }
    }

    fn address_of(root: &Element) -> &Element {
        root.children()[0]
            .children()
            .iter()
            .find(|child| child.tag() == "Address")
            .expect("order should carry an address")
    }

    fn package_of(root: &Element) -> &Element {
        root.children()[0]
            .children()
            .iter()
            .find(|child| child.tag() == "Package")
            .expect("order should carry a package")
    }

    #[test]
    fn pickup_code_excludes_street_address() {
        let order = TestOrder {
            pvz_code: Some("MSK67".to_owned()),
            lines: vec![line("sku-1", 100, 1)],
        };

        let address = address_of(&delivery_request(&order)).clone();

        assert_eq!(address.attr("PvzCode"), Some("MSK67"));
        assert_eq!(address.attr("Street"), None);
        assert_eq!(address.attr("House"), None);
        assert_eq!(address.attr("Flat"), None);
    }

    #[test]
    fn missing_pickup_code_yields_street_address() {
        let order = TestOrder::with_lines(vec![line("sku-1", 100, 1)]);

        let request = delivery_request(&order);
        let address = address_of(&request);

        assert_eq!(address.attr("PvzCode"), None);
        assert_eq!(address.attr("Street"), Some("Lenina"));
        assert_eq!(address.attr("House"), Some("10"));
        assert_eq!(address.attr("Flat"), Some("5"));
    }

    #[test]
    fn empty_pickup_code_counts_as_absent() {
        let order = TestOrder {
            pvz_code: Some(String::new()),
            lines: vec![line("sku-1", 100, 1)],
        };

        let address = address_of(&delivery_request(&order)).clone();

        assert_eq!(address.attr("PvzCode"), None);
        assert_eq!(address.attr("Street"), Some("Lenina"));
    }

    #[test]
    fn package_weight_sums_unit_weights_ignoring_quantity() {
        let order = TestOrder::with_lines(vec![
            line("sku-1", 100, 2),
            line("sku-2", 250, 1),
            line("sku-3", 75, 3),
        ]);

        let request = delivery_request(&order);
        let package = package_of(&request);

        assert_eq!(package.attr("Weight"), Some("425"));
        assert_eq!(package.attr("Number"), Some("421"));
        assert_eq!(package.attr("BarCode"), Some("421"));
        assert_eq!(package.children().len(), 3);
        assert_eq!(package.children()[0].attr("Amount"), Some("2"));
    }

    #[test]
    fn ware_key_truncates_to_thirty_characters() {
        let order = TestOrder::with_lines(vec![line(
            "a-merchandise-key-far-longer-than-thirty-characters",
            100,
            1,
        )]);

        let request = delivery_request(&order);
        let item = &package_of(&request).children()[0];
        let ware_key = item.attr("WareKey").expect("ware key");

        assert_eq!(ware_key.chars().count(), 30);
        assert_eq!(ware_key, "a-merchandise-key-far-longer-t");
    }

    #[test]
    fn item_cost_and_payment_are_the_unit_price() {
        let order = TestOrder::with_lines(vec![line("sku-1", 100, 2)]);

        let request = delivery_request(&order);
        let item = &package_of(&request).children()[0];

        assert_eq!(item.attr("Cost"), Some("99.90"));
        assert_eq!(item.attr("Payment"), Some("99.90"));
        assert_eq!(item.attr("Weight"), Some("100"));
    }

    #[test]
    fn delete_request_repeats_the_order_number() {
        let request = delete_request("42");

        assert_eq!(request.tag(), "DeleteRequest");
        assert_eq!(request.attr("Number"), Some("42"));
        assert_eq!(request.attr("OrderCount"), Some("1"));
        assert_eq!(request.children()[0].attr("Number"), Some("42"));
    }

    #[test]
    fn signed_status_report_matches_the_wire_shape() {
        let mut report = status_report(&["100", "200"], true);
        Credentials::new("test-account", "s3cr3t").sign_with_date(&mut report, "2024-01-15T10:30:00");

        assert_eq!(report.tag(), "StatusReport");
        assert_eq!(report.attr("ShowHistory"), Some("1"));
        assert_eq!(report.children().len(), 2);
        assert_eq!(report.children()[0].attr("DispatchNumber"), Some("100"));
        assert_eq!(report.children()[1].attr("DispatchNumber"), Some("200"));
        for attribute in ["Date", "Account", "Secure"] {
            assert!(
                report.attr(attribute).is_some_and(|value| !value.is_empty()),
                "{attribute} should be present and non-empty"
            );
        }
    }

    #[test]
    fn status_report_without_history_sends_zero() {
        let report = status_report(&["100"], false);

        assert_eq!(report.attr("ShowHistory"), Some("0"));
    }

    #[test]
    fn info_request_lists_dispatch_numbers() {
        let request = info_request(&["100", "200", "300"]);

        assert_eq!(request.tag(), "InfoRequest");
        let numbers: Vec<&str> = request
            .children()
            .iter()
            .map(|child| child.attr("DispatchNumber").expect("dispatch number"))
            .collect();
        assert_eq!(numbers, ["100", "200", "300"]);
    }

    #[test]
    fn print_request_counts_orders_and_copies() {
        let request = orders_print(&["100", "200"], 3);

        assert_eq!(request.tag(), "OrdersPrint");
        assert_eq!(request.attr("OrderCount"), Some("2"));
        assert_eq!(request.attr("CopyCount"), Some("3"));
        assert_eq!(request.children().len(), 2);
    }

    #[test]
    fn courier_call_includes_lunch_window_only_when_provided() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
        let begin = NaiveTime::from_hms_opt(10, 0, 0).expect("valid time");
        let end = NaiveTime::from_hms_opt(18, 0, 0).expect("valid time");

        let bare = call_courier(&CourierCall::new(
            date,
            begin,
            end,
            44,
            "+70000000000",
            "Petrov P. P.",
            4000,
        ));
        assert_eq!(bare.tag(), "CallCourier");
        assert_eq!(bare.attr("CallCount"), Some("1"));
        let call = &bare.children()[0];
        assert_eq!(call.attr("Date"), Some("2024-01-15"));
        assert_eq!(call.attr("TimeBeg"), Some("10:00:00"));
        assert_eq!(call.attr("TimeEnd"), Some("18:00:00"));
        assert_eq!(call.attr("LunchBeg"), None);
        assert_eq!(call.attr("LunchEnd"), None);
        assert_eq!(call.attr("Weight"), Some("4000"));

        let lunch_begin = NaiveTime::from_hms_opt(13, 0, 0).expect("valid time");
        let lunch_end = NaiveTime::from_hms_opt(14, 0, 0).expect("valid time");
        let with_lunch = call_courier(
            &CourierCall::new(date, begin, end, 44, "+70000000000", "Petrov P. P.", 4000)
                .with_lunch(lunch_begin, lunch_end)
                .with_address("Lenina", "10", "5"),
        );
        let call = &with_lunch.children()[0];
        assert_eq!(call.attr("LunchBeg"), Some("13:00:00"));
        assert_eq!(call.attr("LunchEnd"), Some("14:00:00"));
        assert_eq!(call.children()[0].attr("Street"), Some("Lenina"));
    }

    #[test]
    fn delivery_request_omits_postcodes_by_default() {
        let order = TestOrder::with_lines(vec![line("sku-1", 100, 1)]);

        let request = delivery_request(&order);
        let order_element = &request.children()[0];

        assert_eq!(order_element.attr("SendCityCode"), Some("44"));
        assert_eq!(order_element.attr("SendCityPostCode"), None);
        assert_eq!(order_element.attr("RecCityCode"), Some("137"));
        assert_eq!(order_element.attr("RecCityPostCode"), None);
        assert_eq!(order_element.attr("TariffTypeCode"), Some("136"));
        assert_eq!(order_element.attr("DeliveryRecipientCost"), Some("250.00"));
        assert_eq!(order_element.attr("Comment"), Some(""));
    }
}
