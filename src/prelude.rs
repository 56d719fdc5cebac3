//! Sellerdesk prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    criteria::{Choice, Criteria, DateRange, Filterable, Matcher, Sort, SortDirection, SortKey},
    finance::{
        FinanceError, FinanceSummary, Transaction, TransactionKind, TransactionStatus,
        with_running_balance,
    },
    fixtures::{Fixture, FixtureError},
    generators::{GenerateError, MockData},
    orders::{
        Address, Carrier, Customer, Order, OrderAction, OrderItem, OrderStatus, Rejection,
        RejectionForm, RejectionReason, Shipment, ShipmentForm, StatusCounts, TransitionError,
        transition,
    },
    pagination::{DEFAULT_PAGE_SIZE, Pagination},
    pipeline::{derive_view, filter, sort},
    products::{
        PriceRange, Product, ProductStatus, StockField, Thumbnail, Variant, Visibility,
        set_visibility,
    },
    render::RenderError,
    stock::{InventoryLevel, LOW_STOCK_THRESHOLD, StockStatus},
    store::{Record, RecordStore, StoreError},
    table::{
        EditError, EditOutcome, EditTarget, Editable, InvalidEditPolicy, KeySignal, TableState,
    },
    theme::{
        FilePreferences, MemoryPreferences, PreferenceStore, PreferencesError, RouteClass, Theme,
        resolve_theme, theme_for_path,
    },
};
