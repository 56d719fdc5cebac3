//! `sellerdesk orders`

use std::io;

use clap::Args;

use sellerdesk::{
    generators::MockData,
    orders::{
        Carrier, OrderAction, RejectionForm, RejectionReason, ShipmentForm, StatusCounts,
        transition,
    },
    pipeline::derive_view,
    render::{write_orders, write_page_footer, write_status_counts},
    store::RecordStore,
};

use super::{CliError, ViewArgs};

/// Order table flags.
#[derive(Debug, Args)]
pub struct OrdersArgs {
    /// Data source, filters and paging
    #[command(flatten)]
    pub view: ViewArgs,

    /// Number of catalog products orders are drawn from
    #[arg(long, default_value_t = 12)]
    pub catalog_size: usize,

    /// Only orders past their ship-by date
    #[arg(long)]
    pub overdue: bool,

    /// Accept a pending order
    #[arg(long, value_name = "ID")]
    pub accept: Vec<String>,

    /// Mark a processing order as packed
    #[arg(long, value_name = "ID")]
    pub pack: Vec<String>,

    /// Reject a pending order (requires --reason)
    #[arg(long, value_name = "ID", requires = "reason")]
    pub reject: Option<String>,

    /// Rejection reason (Out of stock, Cannot ship in time, Pricing error, Suspected fraud, Other)
    #[arg(long)]
    pub reason: Option<String>,

    /// Free text for the "Other" rejection reason
    #[arg(long, default_value = "")]
    pub note: String,

    /// Ship a ready order (requires --carrier and --tracking)
    #[arg(long, value_name = "ID", requires_all = ["carrier", "tracking"])]
    pub ship: Option<String>,

    /// Carrier (UPS, FedEx, USPS, DHL)
    #[arg(long)]
    pub carrier: Option<String>,

    /// Tracking number
    #[arg(long)]
    pub tracking: Option<String>,
}

impl OrdersArgs {
    fn rejection_form(&self) -> Result<RejectionForm, CliError> {
        let reason = match self.reason.as_deref() {
            Some(label) => Some(
                RejectionReason::parse(label)
                    .ok_or_else(|| CliError::Usage(format!("unknown rejection reason {label:?}")))?,
            ),
            None => None,
        };

        Ok(RejectionForm {
            reason,
            other_text: self.note.clone(),
        })
    }

    fn shipment_form(&self) -> Result<ShipmentForm, CliError> {
        let carrier = match self.carrier.as_deref() {
            Some(label) => Some(
                Carrier::parse(label)
                    .ok_or_else(|| CliError::Usage(format!("unknown carrier {label:?}")))?,
            ),
            None => None,
        };

        Ok(ShipmentForm {
            carrier,
            tracking_number: self.tracking.clone().unwrap_or_default(),
        })
    }

    fn actions(&self) -> Result<Vec<(String, OrderAction)>, CliError> {
        let mut actions: Vec<(String, OrderAction)> = self
            .accept
            .iter()
            .map(|id| (id.clone(), OrderAction::Accept))
            .collect();

        if let Some(id) = &self.reject {
            actions.push((id.clone(), OrderAction::Reject(self.rejection_form()?.submit()?)));
        }

        actions.extend(self.pack.iter().map(|id| (id.clone(), OrderAction::Pack)));

        if let Some(id) = &self.ship {
            actions.push((id.clone(), OrderAction::Ship(self.shipment_form()?.submit()?)));
        }

        Ok(actions)
    }
}

/// Run the orders view.
///
/// Actions run in the order accept, reject, pack, ship, so one invocation can
/// take an order from pending to ready to ship.
///
/// # Errors
///
/// Returns a `CliError` if generation, a dialog, a transition or output fails.
pub fn run(args: &OrdersArgs, mut out: impl io::Write) -> Result<(), CliError> {
    let mut data = MockData::new(args.view.seed);
    let catalog = data.products(args.catalog_size.max(1))?;
    let mut store = RecordStore::with_records(data.orders(args.view.count, &catalog)?)?;
    let now = data.now();

    for (id, action) in args.actions()? {
        let status = transition(&mut store, &id, action)?;

        writeln!(out, "{id}: {status}")?;
    }

    let criteria = args.view.criteria(now)?;
    let mut view = derive_view(&store, &criteria);

    if args.overdue {
        view.retain(|order| order.is_overdue(now));
    }

    let pagination = args.view.pagination(view.len());

    write_status_counts(&mut out, &StatusCounts::from_orders(&store))?;
    write_orders(&mut out, pagination.slice(&view), now)?;
    write_page_footer(&mut out, &pagination, view.len(), 0)?;

    Ok(())
}
