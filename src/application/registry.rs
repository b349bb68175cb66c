use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::MoneyService;
use crate::domain::{Currency, Money, MoneyError, MoneyResult, MoneyValue};

/// Immutable, ordered collection of named services.
///
/// Filtering returns a new map; surviving entries keep their names and their
/// relative order.
#[derive(Clone)]
pub struct ServiceMap<S> {
    entries: Vec<(String, S)>,
}

impl<S> ServiceMap<S> {
    /// A repeated name replaces the earlier service in its original position.
    pub fn new<K: Into<String>>(services: impl IntoIterator<Item = (K, S)>) -> Self {
        let mut entries: Vec<(String, S)> = Vec::new();
        for (name, service) in services {
            let name = name.into();
            match entries.iter_mut().find(|(existing, _)| *existing == name) {
                Some(entry) => entry.1 = service,
                None => entries.push((name, service)),
            }
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> MoneyResult<&S> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, service)| service)
            .ok_or_else(|| MoneyError::UnknownService(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &S)> {
        self.entries.iter().map(|(key, service)| (key.as_str(), service))
    }
}

impl<S: Clone> ServiceMap<S> {
    pub fn select(&self, predicate: impl Fn(&str, &S) -> bool) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(key, service)| predicate(key.as_str(), service))
                .cloned()
                .collect(),
        }
    }
}

impl<S> Default for ServiceMap<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<S, K: Into<String>> FromIterator<(K, S)> for ServiceMap<S> {
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<S> fmt::Debug for ServiceMap<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceMap")
            .field("services", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A payment backend that can tell whether it handles a given amount.
pub trait PaymentService: Send + Sync {
    fn can_request(&self, amount: &Money) -> bool;
    fn can_send(&self, amount: &Money) -> bool;
}

pub type PaymentServiceMap = ServiceMap<Arc<dyn PaymentService>>;

impl ServiceMap<Arc<dyn PaymentService>> {
    /// Services able to request (receive) `amount`.
    pub fn available_for_request(&self, amount: &Money) -> Self {
        let available = self.select(|_, service| service.can_request(amount));
        debug!(%amount, available = available.len(), "payment services available for request");
        available
    }

    /// Services able to send (pay out) `amount`.
    pub fn available_for_send(&self, amount: &Money) -> Self {
        let available = self.select(|_, service| service.can_send(amount));
        debug!(%amount, available = available.len(), "payment services available for send");
        available
    }
}

/// Named money services, e.g. one per market or product line.
pub type MoneyServiceMap<M = Money> = ServiceMap<Arc<MoneyService<M>>>;

impl<M: MoneyValue> ServiceMap<Arc<MoneyService<M>>> {
    /// Names of the services whose registry knows `currency`.
    pub fn supporting(&self, currency: &Currency) -> Vec<&str> {
        self.iter()
            .filter(|(_, service)| service.currencies().contains(currency))
            .map(|(name, _)| name)
            .collect()
    }
}
