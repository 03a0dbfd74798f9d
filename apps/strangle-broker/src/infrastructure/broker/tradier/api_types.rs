//! Tradier API request and response types.
//!
//! Tradier collapses single-element lists to a bare object and reports empty
//! collections as `null` or the string `"null"`. The `one_or_many` and
//! `nullable` helpers normalize those shapes before anything else sees them.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;

use super::error::TradierError;
use crate::application::dto::{
    AccountBalances, CalendarDay, Expiration, HistoricalBar, MarketClock, OrderLegResult,
    OrderResult, OrderStatus, Quote,
};
use crate::domain::option_contract::{Greeks, OptionContract, OptionType};
use crate::domain::order::{OrderRequest, OtocoRequest};
use crate::domain::strangle::Position;

// ============================================================================
// Shape normalization
// ============================================================================

/// Deserialize an array, a single object, `null` or `"null"` into a list.
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Shape<T> {
        Many(Vec<T>),
        One(T),
        Text(String),
    }

    match Option::<Shape<T>>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(Shape::Many(items)) => Ok(items),
        Some(Shape::One(item)) => Ok(vec![item]),
        Some(Shape::Text(text)) if is_null_text(&text) => Ok(Vec::new()),
        Some(Shape::Text(text)) => Err(de::Error::custom(format!(
            "expected object or array, found string '{text}'"
        ))),
    }
}

/// Deserialize an object, `null` or `"null"` into an option.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Shape<T> {
        Value(T),
        Text(String),
    }

    match Option::<Shape<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Shape::Value(value)) => Ok(Some(value)),
        Some(Shape::Text(text)) if is_null_text(&text) => Ok(None),
        Some(Shape::Text(text)) => Err(de::Error::custom(format!(
            "expected object, found string '{text}'"
        ))),
    }
}

fn is_null_text(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || text.eq_ignore_ascii_case("null")
}

// ============================================================================
// Market data
// ============================================================================

/// `GET /markets/quotes`
#[derive(Debug, Deserialize)]
pub struct QuotesResponse {
    #[serde(default, deserialize_with = "nullable")]
    quotes: Option<QuotesBody>,
}

#[derive(Debug, Deserialize)]
struct QuotesBody {
    #[serde(default, deserialize_with = "one_or_many")]
    quote: Vec<Quote>,
}

impl QuotesResponse {
    /// Quote for `symbol`, matched case-insensitively.
    pub fn into_quote(self, symbol: &str) -> Option<Quote> {
        self.quotes?
            .quote
            .into_iter()
            .find(|q| q.symbol.eq_ignore_ascii_case(symbol))
    }
}

/// `GET /markets/options/expirations`
#[derive(Debug, Deserialize)]
pub struct ExpirationsResponse {
    #[serde(default, deserialize_with = "nullable")]
    expirations: Option<ExpirationsBody>,
}

#[derive(Debug, Deserialize)]
struct ExpirationsBody {
    #[serde(default, deserialize_with = "one_or_many")]
    date: Vec<NaiveDate>,
    #[serde(default, deserialize_with = "one_or_many")]
    expiration: Vec<ExpirationWithStrikes>,
}

#[derive(Debug, Deserialize)]
struct ExpirationWithStrikes {
    date: NaiveDate,
    #[serde(default, deserialize_with = "nullable")]
    strikes: Option<StrikesBody>,
}

#[derive(Debug, Deserialize)]
struct StrikesBody {
    #[serde(default, deserialize_with = "one_or_many")]
    strike: Vec<f64>,
}

impl ExpirationsResponse {
    /// Expirations sorted by date.
    pub fn into_expirations(self) -> Vec<Expiration> {
        let Some(body) = self.expirations else {
            return Vec::new();
        };

        let mut expirations: Vec<Expiration> = if body.expiration.is_empty() {
            body.date
                .into_iter()
                .map(|date| Expiration {
                    date,
                    strikes: Vec::new(),
                })
                .collect()
        } else {
            body.expiration
                .into_iter()
                .map(|e| Expiration {
                    date: e.date,
                    strikes: e.strikes.map(|s| s.strike).unwrap_or_default(),
                })
                .collect()
        };
        expirations.sort_by_key(|e| e.date);
        expirations
    }
}

/// `GET /markets/options/chains`
#[derive(Debug, Deserialize)]
pub struct ChainResponse {
    #[serde(default, deserialize_with = "nullable")]
    options: Option<ChainBody>,
}

#[derive(Debug, Deserialize)]
struct ChainBody {
    #[serde(default, deserialize_with = "one_or_many")]
    option: Vec<TradierOption>,
}

#[derive(Debug, Deserialize)]
struct TradierOption {
    symbol: String,
    #[serde(default)]
    underlying: String,
    #[serde(default)]
    root_symbol: Option<String>,
    expiration_date: NaiveDate,
    option_type: String,
    strike: f64,
    #[serde(default)]
    bid: Option<f64>,
    #[serde(default)]
    ask: Option<f64>,
    #[serde(default)]
    last: Option<f64>,
    #[serde(default)]
    volume: Option<u64>,
    #[serde(default)]
    open_interest: Option<u64>,
    #[serde(default, deserialize_with = "nullable")]
    greeks: Option<TradierGreeks>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TradierGreeks {
    delta: Option<f64>,
    gamma: Option<f64>,
    theta: Option<f64>,
    vega: Option<f64>,
    rho: Option<f64>,
    phi: Option<f64>,
    bid_iv: Option<f64>,
    mid_iv: Option<f64>,
    ask_iv: Option<f64>,
    smv_vol: Option<f64>,
}

impl TradierGreeks {
    /// Greeks without a delta are dropped.
    fn into_greeks(self) -> Option<Greeks> {
        Some(Greeks {
            delta: self.delta?,
            gamma: self.gamma.unwrap_or_default(),
            theta: self.theta.unwrap_or_default(),
            vega: self.vega.unwrap_or_default(),
            rho: self.rho.unwrap_or_default(),
            phi: self.phi.unwrap_or_default(),
            bid_iv: self.bid_iv.unwrap_or_default(),
            mid_iv: self.mid_iv.unwrap_or_default(),
            ask_iv: self.ask_iv.unwrap_or_default(),
            smv_vol: self.smv_vol.unwrap_or_default(),
        })
    }
}

impl ChainResponse {
    /// Convert the chain into contracts.
    pub fn into_contracts(self) -> Result<Vec<OptionContract>, TradierError> {
        let Some(body) = self.options else {
            return Ok(Vec::new());
        };
        body.option.into_iter().map(TradierOption::into_contract).collect()
    }
}

impl TradierOption {
    fn into_contract(self) -> Result<OptionContract, TradierError> {
        let option_type = OptionType::parse(&self.option_type).ok_or_else(|| {
            TradierError::UnexpectedResponse(format!(
                "option {} has type '{}'",
                self.symbol, self.option_type
            ))
        })?;

        let underlying = if self.underlying.is_empty() {
            self.root_symbol.unwrap_or_default()
        } else {
            self.underlying
        };

        Ok(OptionContract {
            symbol: self.symbol,
            underlying,
            expiration: self.expiration_date,
            option_type,
            strike: self.strike,
            bid: self.bid,
            ask: self.ask,
            last: self.last,
            volume: self.volume.unwrap_or_default(),
            open_interest: self.open_interest.unwrap_or_default(),
            greeks: self.greeks.and_then(TradierGreeks::into_greeks),
        })
    }
}

/// `GET /markets/clock`
#[derive(Debug, Deserialize)]
pub struct ClockResponse {
    /// Clock reading.
    pub clock: MarketClock,
}

/// `GET /markets/calendar`
#[derive(Debug, Deserialize)]
pub struct CalendarResponse {
    #[serde(default, deserialize_with = "nullable")]
    calendar: Option<CalendarBody>,
}

#[derive(Debug, Deserialize)]
struct CalendarBody {
    #[serde(default, deserialize_with = "nullable")]
    days: Option<CalendarDays>,
}

#[derive(Debug, Deserialize)]
struct CalendarDays {
    #[serde(default, deserialize_with = "one_or_many")]
    day: Vec<CalendarDay>,
}

impl CalendarResponse {
    /// Days of the requested month.
    pub fn into_days(self) -> Vec<CalendarDay> {
        self.calendar
            .and_then(|c| c.days)
            .map(|d| d.day)
            .unwrap_or_default()
    }
}

/// `GET /markets/history`
#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    #[serde(default, deserialize_with = "nullable")]
    history: Option<HistoryBody>,
}

#[derive(Debug, Deserialize)]
struct HistoryBody {
    #[serde(default, deserialize_with = "one_or_many")]
    day: Vec<HistoricalBar>,
}

impl HistoryResponse {
    /// Bars in broker order.
    pub fn into_bars(self) -> Vec<HistoricalBar> {
        self.history.map(|h| h.day).unwrap_or_default()
    }
}

// ============================================================================
// Account
// ============================================================================

/// `GET /accounts/{id}/positions`
#[derive(Debug, Deserialize)]
pub struct PositionsResponse {
    #[serde(default, deserialize_with = "nullable")]
    positions: Option<PositionsBody>,
}

#[derive(Debug, Deserialize)]
struct PositionsBody {
    #[serde(default, deserialize_with = "one_or_many")]
    position: Vec<TradierPosition>,
}

#[derive(Debug, Deserialize)]
struct TradierPosition {
    id: i64,
    symbol: String,
    quantity: f64,
    #[serde(default)]
    cost_basis: f64,
    #[serde(default)]
    date_acquired: Option<DateTime<Utc>>,
}

impl PositionsResponse {
    /// Open positions; an empty account yields an empty list.
    pub fn into_positions(self) -> Vec<Position> {
        self.positions
            .map(|p| p.position)
            .unwrap_or_default()
            .into_iter()
            .map(|p| Position {
                id: p.id,
                symbol: p.symbol,
                quantity: p.quantity,
                cost_basis: p.cost_basis,
                date_acquired: p.date_acquired,
            })
            .collect()
    }
}

/// `GET /accounts/{id}/balances`
#[derive(Debug, Deserialize)]
pub struct BalancesResponse {
    balances: TradierBalances,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TradierBalances {
    account_number: String,
    account_type: String,
    total_equity: Option<f64>,
    total_cash: Option<f64>,
    market_value: Option<f64>,
    option_short_value: Option<f64>,
    pending_orders_count: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    margin: Option<BuyingPower>,
    #[serde(deserialize_with = "nullable")]
    pdt: Option<BuyingPower>,
    #[serde(deserialize_with = "nullable")]
    cash: Option<CashBalances>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BuyingPower {
    option_buying_power: Option<f64>,
    stock_buying_power: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CashBalances {
    cash_available: Option<f64>,
}

impl BalancesResponse {
    /// Flatten the margin, PDT or cash sub-object into one view.
    pub fn into_balances(self) -> AccountBalances {
        let b = self.balances;
        let (option_buying_power, stock_buying_power) = match (b.margin.or(b.pdt), b.cash) {
            (Some(power), _) => (
                power.option_buying_power.unwrap_or_default(),
                power.stock_buying_power.unwrap_or_default(),
            ),
            (None, Some(cash)) => {
                let available = cash.cash_available.unwrap_or_default();
                (available, available)
            }
            (None, None) => (0.0, 0.0),
        };

        AccountBalances {
            account_number: b.account_number,
            account_type: b.account_type,
            total_equity: b.total_equity.unwrap_or_default(),
            total_cash: b.total_cash.unwrap_or_default(),
            market_value: b.market_value.unwrap_or_default(),
            option_buying_power,
            stock_buying_power,
            option_short_value: b.option_short_value.unwrap_or_default(),
            pending_orders_count: b.pending_orders_count.unwrap_or_default(),
        }
    }
}

// ============================================================================
// Orders
// ============================================================================

/// Any endpoint that answers with `{"order": {...}}`.
#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    #[serde(default, deserialize_with = "nullable")]
    order: Option<TradierOrder>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TradierOrder {
    id: Option<i64>,
    status: OrderStatus,
    class: Option<String>,
    #[serde(rename = "type")]
    order_type: Option<String>,
    symbol: Option<String>,
    side: Option<String>,
    quantity: Option<f64>,
    duration: Option<String>,
    price: Option<f64>,
    avg_fill_price: Option<f64>,
    exec_quantity: Option<f64>,
    last_fill_price: Option<f64>,
    last_fill_quantity: Option<f64>,
    remaining_quantity: Option<f64>,
    create_date: Option<DateTime<Utc>>,
    transaction_date: Option<DateTime<Utc>>,
    tag: Option<String>,
    partner_id: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    leg: Vec<OrderLegResult>,
}

impl OrderResponse {
    /// Convert to the port result.
    pub fn into_result(self) -> Result<OrderResult, TradierError> {
        let order = self
            .order
            .ok_or_else(|| TradierError::UnexpectedResponse("response has no order".to_string()))?;

        Ok(OrderResult {
            id: order.id,
            status: order.status,
            class: order.class,
            order_type: order.order_type,
            symbol: order.symbol,
            side: order.side,
            quantity: order.quantity,
            duration: order.duration,
            price: order.price,
            avg_fill_price: order.avg_fill_price,
            exec_quantity: order.exec_quantity,
            last_fill_price: order.last_fill_price,
            last_fill_quantity: order.last_fill_quantity,
            remaining_quantity: order.remaining_quantity,
            create_date: order.create_date,
            transaction_date: order.transaction_date,
            tag: order.tag,
            partner_id: order.partner_id,
            legs: order.leg,
        })
    }
}

/// Form body for a single-leg or multileg order.
pub fn order_form(order: &OrderRequest) -> Vec<(String, String)> {
    let mut form = vec![
        field("class", order.class.as_str()),
        field("symbol", &order.underlying),
        field("type", order.order_type.as_str()),
        field("duration", order.duration.as_str()),
    ];
    if let Some(price) = order.price {
        form.push(field("price", &format_price(price)));
    }

    if order.is_multileg() {
        for (n, leg) in order.legs.iter().enumerate() {
            form.push(field(&format!("option_symbol[{n}]"), &leg.option_symbol));
            form.push(field(&format!("side[{n}]"), leg.side.as_str()));
            form.push(field(&format!("quantity[{n}]"), &leg.quantity.to_string()));
        }
    } else if let Some(leg) = order.legs.first() {
        form.push(field("option_symbol", &leg.option_symbol));
        form.push(field("side", leg.side.as_str()));
        form.push(field("quantity", &leg.quantity.to_string()));
    }

    if let Some(tag) = &order.tag {
        form.push(field("tag", tag.as_str()));
    }
    if order.preview {
        form.push(field("preview", "true"));
    }
    form
}

/// Form body for an OTOCO order: component 0 is the entry, component 1 the
/// exit, each a multileg order with its legs indexed `[component][leg]`.
pub fn otoco_form(order: &OtocoRequest) -> Vec<(String, String)> {
    let mut form = vec![
        field("class", "otoco"),
        field("duration", order.duration.as_str()),
    ];

    for (i, component) in [&order.entry, &order.exit].into_iter().enumerate() {
        form.push(field(&format!("symbol[{i}]"), &component.underlying));
        form.push(field(&format!("type[{i}]"), component.order_type.as_str()));
        if let Some(price) = component.price {
            form.push(field(&format!("price[{i}]"), &format_price(price)));
        }
        form.push(field(&format!("duration[{i}]"), component.duration.as_str()));
        for (j, leg) in component.legs.iter().enumerate() {
            form.push(field(
                &format!("option_symbol[{i}][{j}]"),
                &leg.option_symbol,
            ));
            form.push(field(&format!("side[{i}][{j}]"), leg.side.as_str()));
            form.push(field(
                &format!("quantity[{i}][{j}]"),
                &leg.quantity.to_string(),
            ));
        }
    }

    if let Some(tag) = &order.tag {
        form.push(field("tag", tag.as_str()));
    }
    if order.entry.preview {
        form.push(field("preview", "true"));
    }
    form
}

fn field(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}

fn format_price(price: Decimal) -> String {
    price.round_dp(2).to_string()
}
