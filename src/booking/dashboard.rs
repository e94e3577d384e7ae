//! Dashboard figures and client summaries

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Appointment, ServiceOffering};

/// Read-only price lookup by service id
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    prices: HashMap<String, Decimal>,
}

impl PriceTable {
    pub fn new(prices: HashMap<String, Decimal>) -> Self {
        Self { prices }
    }

    pub fn from_offerings(offerings: &[ServiceOffering]) -> Self {
        Self {
            prices: offerings
                .iter()
                .map(|o| (o.id.to_string(), o.price))
                .collect(),
        }
    }

    /// Price of a service; unknown ids cost nothing
    pub fn price_of(&self, service_id: &str) -> Decimal {
        self.prices.get(service_id).copied().unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DayFigures {
    #[schema(value_type = String)]
    pub revenue: Decimal,
    pub bookings: i64,
    pub clients: i64,
}

/// Percentage change per figure
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct Trends {
    pub revenue: f64,
    pub bookings: f64,
    pub clients: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct Comparison {
    pub current: DayFigures,
    pub previous: DayFigures,
    pub trend: Trends,
}

fn client_key(appointment: &Appointment) -> &str {
    if appointment.client_email.trim().is_empty() {
        appointment.client_name.trim()
    } else {
        appointment.client_email.trim()
    }
}

/// Sum up one day's appointments, ignoring admin blocks
pub fn aggregate<'a>(
    appointments: impl IntoIterator<Item = &'a Appointment>,
    prices: &PriceTable,
) -> DayFigures {
    let mut revenue = Decimal::ZERO;
    let mut bookings = 0;
    let mut clients = HashSet::new();

    for appointment in appointments.into_iter().filter(|a| !a.is_blocked()) {
        revenue += prices.price_of(&appointment.service_id);
        bookings += 1;
        clients.insert(client_key(appointment).to_lowercase());
    }

    DayFigures {
        revenue,
        bookings,
        clients: clients.len() as i64,
    }
}

/// `(current - previous) / previous * 100`; growth from zero counts as +100
pub fn trend_percent(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    (current - previous) / previous * 100.0
}

pub fn compare(current: DayFigures, previous: DayFigures) -> Comparison {
    let trend = Trends {
        revenue: trend_percent(
            current.revenue.to_f64().unwrap_or_default(),
            previous.revenue.to_f64().unwrap_or_default(),
        ),
        bookings: trend_percent(current.bookings as f64, previous.bookings as f64),
        clients: trend_percent(current.clients as f64, previous.clients as f64),
    };
    Comparison {
        current,
        previous,
        trend,
    }
}

/// One client as seen by the shop
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    pub client_email: String,
    pub client_name: String,
    pub visits: i64,
    #[schema(value_type = String)]
    pub total_spent: Decimal,
    pub last_visit: NaiveDate,
}

/// Group appointments by client (email, falling back to name), newest name wins
pub fn client_summaries<'a>(
    appointments: impl IntoIterator<Item = &'a Appointment>,
    prices: &PriceTable,
) -> Vec<ClientSummary> {
    let mut by_client: BTreeMap<String, ClientSummary> = BTreeMap::new();

    for appointment in appointments.into_iter().filter(|a| !a.is_blocked()) {
        let key = client_key(appointment).to_lowercase();
        let price = prices.price_of(&appointment.service_id);
        by_client
            .entry(key)
            .and_modify(|summary| {
                summary.visits += 1;
                summary.total_spent += price;
                if appointment.date >= summary.last_visit {
                    summary.last_visit = appointment.date;
                    summary.client_name = appointment.client_name.clone();
                }
            })
            .or_insert_with(|| ClientSummary {
                client_email: appointment.client_email.clone(),
                client_name: appointment.client_name.clone(),
                visits: 1,
                total_spent: price,
                last_visit: appointment.date,
            });
    }

    let mut summaries: Vec<ClientSummary> = by_client.into_values().collect();
    summaries.sort_by(|a, b| b.last_visit.cmp(&a.last_visit).then(a.client_email.cmp(&b.client_email)));
    summaries
}
