//! Orders
//!
//! Order records and the fulfilment state machine:
//!
//! ```text
//! Pending --accept--> Processing --pack--> Ready to Ship --ship--> Shipped
//! Pending --reject--> Cancelled
//! ```
//!
//! `Shipped` and `Cancelled` are terminal. Rejections and shipments are only
//! constructed through [`RejectionForm`] and [`ShipmentForm`], so an order can
//! never hold an empty reason, carrier or tracking number.

use std::fmt;

use jiff::Timestamp;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    criteria::{Filterable, contains_ignore_case},
    store::{Record, RecordStore, StoreError},
};

/// Fulfilment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Awaiting acceptance.
    Pending,

    /// Accepted, being picked.
    Processing,

    /// Packed, awaiting carrier hand-over.
    ReadyToShip,

    /// Handed to the carrier.
    Shipped,

    /// Rejected by the seller.
    Cancelled,
}

impl OrderStatus {
    /// Every status, in tab order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::ReadyToShip,
        OrderStatus::Shipped,
        OrderStatus::Cancelled,
    ];

    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::ReadyToShip => "Ready to Ship",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Shipped | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shipping carriers offered in the ship dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Carrier {
    /// UPS
    Ups,
    /// `FedEx`
    FedEx,
    /// USPS
    Usps,
    /// DHL
    Dhl,
}

impl Carrier {
    /// Every carrier, in dialog order.
    pub const ALL: [Carrier; 4] = [Carrier::Ups, Carrier::FedEx, Carrier::Usps, Carrier::Dhl];

    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Carrier::Ups => "UPS",
            Carrier::FedEx => "FedEx",
            Carrier::Usps => "USPS",
            Carrier::Dhl => "DHL",
        }
    }

    /// Parse a carrier label, ignoring case.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();

        Carrier::ALL
            .into_iter()
            .find(|carrier| carrier.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reasons offered in the reject dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    /// Item is out of stock.
    OutOfStock,
    /// Cannot ship before the deadline.
    CannotShipInTime,
    /// Listed price was wrong.
    PricingError,
    /// Order looks fraudulent.
    SuspectedFraud,
    /// Free-text reason.
    Other,
}

impl RejectionReason {
    /// Every reason, in dialog order.
    pub const ALL: [RejectionReason; 5] = [
        RejectionReason::OutOfStock,
        RejectionReason::CannotShipInTime,
        RejectionReason::PricingError,
        RejectionReason::SuspectedFraud,
        RejectionReason::Other,
    ];

    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RejectionReason::OutOfStock => "Out of stock",
            RejectionReason::CannotShipInTime => "Cannot ship in time",
            RejectionReason::PricingError => "Pricing error",
            RejectionReason::SuspectedFraud => "Suspected fraud",
            RejectionReason::Other => "Other",
        }
    }

    /// Parse a reason label, ignoring case.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();

        RejectionReason::ALL
            .into_iter()
            .find(|reason| reason.label().eq_ignore_ascii_case(label))
    }
}

/// A validated rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    reason: RejectionReason,
    text: String,
}

impl Rejection {
    /// Selected reason.
    pub fn reason(&self) -> RejectionReason {
        self.reason
    }

    /// Reason text shown to the customer.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A validated, immutable shipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shipment {
    carrier: Carrier,
    tracking_number: String,
}

impl Shipment {
    /// Carrier.
    pub fn carrier(&self) -> Carrier {
        self.carrier
    }

    /// Tracking number.
    pub fn tracking_number(&self) -> &str {
        &self.tracking_number
    }
}

/// Errors raised by order transitions and their dialogs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// The action is not allowed from the current status.
    #[error("cannot {action} an order that is {from}")]
    Illegal {
        /// Attempted action.
        action: &'static str,
        /// Status at the time.
        from: OrderStatus,
    },

    /// No reason selected, or "Other" with blank text.
    #[error("a rejection reason is required")]
    MissingReason,

    /// No carrier selected.
    #[error("a carrier is required")]
    MissingCarrier,

    /// Blank tracking number.
    #[error("a tracking number is required")]
    MissingTracking,

    /// Store lookup failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// State of the reject dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RejectionForm {
    /// Selected reason.
    pub reason: Option<RejectionReason>,

    /// Free text, required when the reason is "Other".
    pub other_text: String,
}

impl RejectionForm {
    /// Whether the confirm button is enabled.
    pub fn can_confirm(&self) -> bool {
        self.submit().is_ok()
    }

    /// Validate the dialog into a [`Rejection`].
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::MissingReason` when no reason is selected or
    /// "Other" has blank text.
    pub fn submit(&self) -> Result<Rejection, TransitionError> {
        match self.reason {
            None => Err(TransitionError::MissingReason),
            Some(RejectionReason::Other) => {
                let text = self.other_text.trim();

                if text.is_empty() {
                    return Err(TransitionError::MissingReason);
                }

                Ok(Rejection {
                    reason: RejectionReason::Other,
                    text: text.to_string(),
                })
            }
            Some(reason) => Ok(Rejection {
                reason,
                text: reason.label().to_string(),
            }),
        }
    }
}

/// State of the ship dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipmentForm {
    /// Selected carrier.
    pub carrier: Option<Carrier>,

    /// Tracking number text.
    pub tracking_number: String,
}

impl ShipmentForm {
    /// Whether the confirm button is enabled.
    pub fn can_confirm(&self) -> bool {
        self.submit().is_ok()
    }

    /// Validate the dialog into a [`Shipment`].
    ///
    /// # Errors
    ///
    /// Returns `MissingCarrier` or `MissingTracking` when either is absent.
    pub fn submit(&self) -> Result<Shipment, TransitionError> {
        let carrier = self.carrier.ok_or(TransitionError::MissingCarrier)?;
        let tracking_number = self.tracking_number.trim();

        if tracking_number.is_empty() {
            return Err(TransitionError::MissingTracking);
        }

        Ok(Shipment {
            carrier,
            tracking_number: tracking_number.to_string(),
        })
    }
}

/// A fulfilment action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderAction {
    /// Pending -> Processing.
    Accept,
    /// Pending -> Cancelled.
    Reject(Rejection),
    /// Processing -> Ready to Ship.
    Pack,
    /// Ready to Ship -> Shipped.
    Ship(Shipment),
}

impl OrderAction {
    /// Verb used in logs and errors.
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            OrderAction::Accept => "accept",
            OrderAction::Reject(_) => "reject",
            OrderAction::Pack => "pack",
            OrderAction::Ship(_) => "ship",
        }
    }
}

/// Customer contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Customer {
    /// Full name.
    pub name: String,

    /// Email address.
    pub email: String,
}

/// Shipping address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    /// Street line.
    pub line1: String,

    /// City.
    pub city: String,

    /// Postal code.
    pub postal_code: String,

    /// Country.
    pub country: String,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} {}, {}",
            self.line1, self.city, self.postal_code, self.country
        )
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem<'a> {
    /// Ordered SKU.
    pub sku: String,

    /// Product name at order time.
    pub name: String,

    /// Units ordered.
    pub quantity: u32,

    /// Price per unit.
    pub unit_price: Money<'a, Currency>,
}

impl<'a> OrderItem<'a> {
    /// Quantity times unit price.
    pub fn line_total(&self) -> Money<'a, Currency> {
        Money::from_minor(
            self.unit_price
                .to_minor_units()
                .saturating_mul(i64::from(self.quantity)),
            self.unit_price.currency(),
        )
    }
}

/// Order
#[derive(Debug, Clone, PartialEq)]
pub struct Order<'a> {
    /// Order identifier.
    pub id: String,

    /// Customer-facing order number.
    pub number: String,

    /// When the order was placed.
    pub placed_at: Timestamp,

    /// Customer.
    pub customer: Customer,

    /// Ship-by deadline.
    pub ship_by: Timestamp,

    /// Shipping address.
    pub shipping_address: Address,

    /// Payment method label.
    pub payment_method: String,

    currency: &'a Currency,
    items: Vec<OrderItem<'a>>,
    status: OrderStatus,
    shipment: Option<Shipment>,
    rejection: Option<Rejection>,
}

impl<'a> Order<'a> {
    /// Create a pending order without items.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        number: impl Into<String>,
        customer: Customer,
        currency: &'a Currency,
        placed_at: Timestamp,
        ship_by: Timestamp,
    ) -> Self {
        Order {
            id: id.into(),
            number: number.into(),
            placed_at,
            customer,
            ship_by,
            shipping_address: Address::default(),
            payment_method: String::new(),
            currency,
            items: Vec::new(),
            status: OrderStatus::Pending,
            shipment: None,
            rejection: None,
        }
    }

    /// Set the order lines.
    #[must_use]
    pub fn with_items(mut self, items: impl Into<Vec<OrderItem<'a>>>) -> Self {
        self.items = items.into();
        self
    }

    /// Set the shipping address.
    #[must_use]
    pub fn with_address(mut self, address: Address) -> Self {
        self.shipping_address = address;
        self
    }

    /// Set the payment method.
    #[must_use]
    pub fn with_payment_method(mut self, payment_method: impl Into<String>) -> Self {
        self.payment_method = payment_method.into();
        self
    }

    /// Current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Order lines.
    pub fn items(&self) -> &[OrderItem<'a>] {
        &self.items
    }

    /// Order currency.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Shipment, once shipped.
    pub fn shipment(&self) -> Option<&Shipment> {
        self.shipment.as_ref()
    }

    /// Rejection, once cancelled.
    pub fn rejection(&self) -> Option<&Rejection> {
        self.rejection.as_ref()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |sum, item| sum.saturating_add(item.quantity))
    }

    /// Total value across all lines.
    ///
    /// # Errors
    ///
    /// Returns a `MoneyError` if a line is priced in another currency.
    pub fn total(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.items
            .iter()
            .try_fold(Money::from_minor(0, self.currency), |acc, item| {
                acc.add(item.line_total())
            })
    }

    /// Whether the ship-by deadline has passed without the order leaving.
    pub fn is_overdue(&self, now: Timestamp) -> bool {
        !self.status.is_terminal() && self.ship_by < now
    }

    /// Apply a fulfilment action.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::Illegal` if the action is not allowed from
    /// the current status; the order is left unchanged.
    pub fn apply(&mut self, action: OrderAction) -> Result<OrderStatus, TransitionError> {
        let next = match (self.status, &action) {
            (OrderStatus::Pending, OrderAction::Accept) => OrderStatus::Processing,
            (OrderStatus::Pending, OrderAction::Reject(_)) => OrderStatus::Cancelled,
            (OrderStatus::Processing, OrderAction::Pack) => OrderStatus::ReadyToShip,
            (OrderStatus::ReadyToShip, OrderAction::Ship(_)) => OrderStatus::Shipped,
            (from, _) => {
                return Err(TransitionError::Illegal {
                    action: action.verb(),
                    from,
                });
            }
        };

        match action {
            OrderAction::Reject(rejection) => self.rejection = Some(rejection),
            OrderAction::Ship(shipment) => self.shipment = Some(shipment),
            OrderAction::Accept | OrderAction::Pack => {}
        }

        self.status = next;

        Ok(next)
    }

    /// Pending -> Processing.
    ///
    /// # Errors
    ///
    /// See [`Order::apply`].
    pub fn accept(&mut self) -> Result<OrderStatus, TransitionError> {
        self.apply(OrderAction::Accept)
    }

    /// Pending -> Cancelled.
    ///
    /// # Errors
    ///
    /// See [`Order::apply`].
    pub fn reject(&mut self, rejection: Rejection) -> Result<OrderStatus, TransitionError> {
        self.apply(OrderAction::Reject(rejection))
    }

    /// Processing -> Ready to Ship.
    ///
    /// # Errors
    ///
    /// See [`Order::apply`].
    pub fn pack(&mut self) -> Result<OrderStatus, TransitionError> {
        self.apply(OrderAction::Pack)
    }

    /// Ready to Ship -> Shipped.
    ///
    /// # Errors
    ///
    /// See [`Order::apply`].
    pub fn ship(&mut self, shipment: Shipment) -> Result<OrderStatus, TransitionError> {
        self.apply(OrderAction::Ship(shipment))
    }
}

impl Record for Order<'_> {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Filterable for Order<'_> {
    fn matches_text(&self, needle: &str) -> bool {
        contains_ignore_case(&self.id, needle)
            || contains_ignore_case(&self.number, needle)
            || contains_ignore_case(&self.customer.name, needle)
            || contains_ignore_case(&self.customer.email, needle)
            || self.items.iter().any(|item| {
                contains_ignore_case(&item.sku, needle) || contains_ignore_case(&item.name, needle)
            })
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.status.label())
    }

    fn timestamp(&self) -> Option<Timestamp> {
        Some(self.placed_at)
    }

    fn title(&self) -> Option<&str> {
        Some(&self.customer.name)
    }

    fn value_minor(&self) -> Option<i64> {
        self.total().ok().map(|total| total.to_minor_units())
    }
}

/// Apply a fulfilment action to an order in the store.
///
/// # Errors
///
/// Returns `TransitionError::Store` for unknown ids and
/// `TransitionError::Illegal` for disallowed actions.
pub fn transition(
    store: &mut RecordStore<Order<'_>>,
    id: &str,
    action: OrderAction,
) -> Result<OrderStatus, TransitionError> {
    let verb = action.verb();

    match store.update(id, |order| order.apply(action)) {
        Ok(status) => {
            info!(order_id = id, action = verb, status = %status, "order transitioned");
            Ok(status)
        }
        Err(error) => {
            warn!(order_id = id, action = verb, %error, "order transition rejected");
            Err(error)
        }
    }
}

/// Order counts per status, for the orders tab strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    counts: [usize; 5],
}

impl StatusCounts {
    /// Count orders by status.
    pub fn from_orders<'o, 'a: 'o>(orders: impl IntoIterator<Item = &'o Order<'a>>) -> Self {
        let mut counts = StatusCounts::default();

        for order in orders {
            if let Some(count) = counts.counts.get_mut(status_slot(order.status())) {
                *count = count.saturating_add(1);
            }
        }

        counts
    }

    /// Orders with the status.
    pub fn get(&self, status: OrderStatus) -> usize {
        self.counts
            .get(status_slot(status))
            .copied()
            .unwrap_or_default()
    }

    /// All orders.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

fn status_slot(status: OrderStatus) -> usize {
    match status {
        OrderStatus::Pending => 0,
        OrderStatus::Processing => 1,
        OrderStatus::ReadyToShip => 2,
        OrderStatus::Shipped => 3,
        OrderStatus::Cancelled => 4,
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, USD};
    use testresult::TestResult;

    use super::*;

    fn order(id: &str) -> TestResult<Order<'static>> {
        Ok(Order::new(
            id,
            format!("#{id}"),
            Customer {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
            },
            USD,
            "2024-06-01T09:00:00Z".parse()?,
            "2024-06-03T09:00:00Z".parse()?,
        )
        .with_items([
            OrderItem {
                sku: "WH-BLK-M".to_string(),
                name: "Wireless Headphones".to_string(),
                quantity: 2,
                unit_price: Money::from_minor(7999, USD),
            },
            OrderItem {
                sku: "DL-01".to_string(),
                name: "Desk Lamp".to_string(),
                quantity: 1,
                unit_price: Money::from_minor(2500, USD),
            },
        ]))
    }

    fn shipment() -> Result<Shipment, TransitionError> {
        ShipmentForm {
            carrier: Some(Carrier::Ups),
            tracking_number: "1Z999".to_string(),
        }
        .submit()
    }

    #[test]
    fn happy_path_reaches_shipped() -> TestResult {
        let mut order = order("o1")?;

        assert_eq!(order.accept()?, OrderStatus::Processing);
        assert_eq!(order.pack()?, OrderStatus::ReadyToShip);
        assert_eq!(order.ship(shipment()?)?, OrderStatus::Shipped);

        assert_eq!(
            order.shipment().map(Shipment::tracking_number),
            Some("1Z999")
        );
        assert!(order.status().is_terminal());

        Ok(())
    }

    #[test]
    fn reject_from_pending_cancels() -> TestResult {
        let mut order = order("o1")?;

        let rejection = RejectionForm {
            reason: Some(RejectionReason::OutOfStock),
            other_text: String::new(),
        }
        .submit()?;

        assert_eq!(order.reject(rejection)?, OrderStatus::Cancelled);
        assert_eq!(
            order.rejection().map(Rejection::text),
            Some("Out of stock")
        );

        Ok(())
    }

    #[test]
    fn illegal_transitions_leave_order_unchanged() -> TestResult {
        let mut order = order("o1")?;

        assert_eq!(
            order.ship(shipment()?),
            Err(TransitionError::Illegal {
                action: "ship",
                from: OrderStatus::Pending
            })
        );
        assert_eq!(order.status(), OrderStatus::Pending);
        assert!(order.shipment().is_none());

        order.accept()?;

        assert!(order.accept().is_err());
        assert!(order.reject(
            RejectionForm {
                reason: Some(RejectionReason::PricingError),
                other_text: String::new(),
            }
            .submit()?
        )
        .is_err());

        Ok(())
    }

    #[test]
    fn terminal_states_accept_nothing() -> TestResult {
        let mut order = order("o1")?;

        order.accept()?;
        order.pack()?;
        order.ship(shipment()?)?;

        let replacement = ShipmentForm {
            carrier: Some(Carrier::Dhl),
            tracking_number: "NEW".to_string(),
        }
        .submit()?;

        assert!(order.ship(replacement).is_err());
        assert_eq!(
            order.shipment().map(Shipment::carrier),
            Some(Carrier::Ups)
        );

        Ok(())
    }

    #[test]
    fn rejection_form_requires_reason() {
        let mut form = RejectionForm::default();

        assert!(!form.can_confirm());

        form.reason = Some(RejectionReason::Other);
        form.other_text = "   ".to_string();

        assert_eq!(form.submit(), Err(TransitionError::MissingReason));

        form.other_text = "Customer asked by phone".to_string();

        assert!(form.can_confirm());
    }

    #[test]
    fn shipment_form_requires_carrier_and_tracking() {
        let mut form = ShipmentForm {
            carrier: Some(Carrier::FedEx),
            tracking_number: String::new(),
        };

        assert!(!form.can_confirm());
        assert_eq!(form.submit(), Err(TransitionError::MissingTracking));

        form.carrier = None;
        form.tracking_number = "123".to_string();

        assert_eq!(form.submit(), Err(TransitionError::MissingCarrier));

        form.carrier = Some(Carrier::FedEx);

        assert!(form.can_confirm());
    }

    #[test]
    fn totals_sum_lines() -> TestResult {
        let order = order("o1")?;

        assert_eq!(order.item_count(), 3);
        assert_eq!(order.total()?, Money::from_minor(18_498, USD));

        Ok(())
    }

    #[test]
    fn total_with_mixed_currency_errors() -> TestResult {
        let order = order("o1")?.with_items([OrderItem {
            sku: "X".to_string(),
            name: "Euro thing".to_string(),
            quantity: 1,
            unit_price: Money::from_minor(100, EUR),
        }]);

        assert!(order.total().is_err());

        Ok(())
    }

    #[test]
    fn search_covers_customer_and_items() -> TestResult {
        let order = order("o1")?;

        assert!(order.matches_text("lovelace"));
        assert!(order.matches_text("ada@"));
        assert!(order.matches_text("wh-blk"));
        assert!(order.matches_text("#o1"));
        assert!(!order.matches_text("grace"));

        Ok(())
    }

    #[test]
    fn overdue_only_while_open() -> TestResult {
        let mut order = order("o1")?;
        let late: Timestamp = "2024-06-04T00:00:00Z".parse()?;

        assert!(order.is_overdue(late));
        assert!(!order.is_overdue("2024-06-02T00:00:00Z".parse()?));

        order.reject(
            RejectionForm {
                reason: Some(RejectionReason::CannotShipInTime),
                other_text: String::new(),
            }
            .submit()?,
        )?;

        assert!(!order.is_overdue(late));

        Ok(())
    }

    #[test]
    fn transition_in_store() -> TestResult {
        let mut store = RecordStore::with_records([order("o1")?, order("o2")?])?;

        assert_eq!(
            transition(&mut store, "o2", OrderAction::Accept)?,
            OrderStatus::Processing
        );
        assert_eq!(
            transition(&mut store, "zz", OrderAction::Accept),
            Err(TransitionError::Store(StoreError::NotFound("zz".to_string())))
        );

        let counts = StatusCounts::from_orders(&store);

        assert_eq!(counts.get(OrderStatus::Pending), 1);
        assert_eq!(counts.get(OrderStatus::Processing), 1);
        assert_eq!(counts.total(), 2);

        Ok(())
    }

    #[test]
    fn labels_parse_back() {
        assert_eq!(Carrier::parse("fedex"), Some(Carrier::FedEx));
        assert_eq!(
            RejectionReason::parse("pricing error"),
            Some(RejectionReason::PricingError)
        );
        assert_eq!(Carrier::parse("pigeon"), None);
    }
}
