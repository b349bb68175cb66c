use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Currency, Money, MoneyError};

/// Immutable multi-currency ledger holding one balance per currency.
///
/// Credit and debit return a new wallet with a single entry replaced; the
/// receiver is left untouched. A currency without an entry has a zero balance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Money>", into = "BTreeMap<String, Money>")]
pub struct Wallet {
    balances: BTreeMap<Currency, Money>,
}

impl Wallet {
    pub fn make_empty() -> Self {
        Self::default()
    }

    /// Build a wallet by crediting each amount in turn.
    pub fn from_balances(amounts: impl IntoIterator<Item = Money>) -> Self {
        amounts
            .into_iter()
            .fold(Self::make_empty(), |wallet, amount| wallet.credit(&amount))
    }

    /// True when every stored balance is zero, so a credit followed by the
    /// matching debit leaves an empty wallet.
    pub fn is_empty(&self) -> bool {
        self.balances.values().all(Money::is_zero)
    }

    pub fn get_balance(&self, currency: &Currency) -> Money {
        self.balances
            .get(currency)
            .cloned()
            .unwrap_or_else(|| Money::new(0, currency.clone()))
    }

    /// True when the balance in `amount`'s currency covers `amount`.
    pub fn has_balance(&self, amount: &Money) -> bool {
        self.get_balance(amount.currency()).amount() >= amount.amount()
    }

    pub fn credit(&self, amount: &Money) -> Self {
        let balance = self.get_balance(amount.currency());
        self.with_balance(Money::new(
            balance.amount() + amount.amount(),
            amount.currency().clone(),
        ))
    }

    /// Balances are allowed to go negative.
    pub fn debit(&self, amount: &Money) -> Self {
        self.credit(&amount.negate())
    }

    pub fn balances(&self) -> &BTreeMap<Currency, Money> {
        &self.balances
    }

    pub fn iter(&self) -> impl Iterator<Item = &Money> {
        self.balances.values()
    }

    /// Number of currencies with an entry, zero balances included.
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    fn with_balance(&self, balance: Money) -> Self {
        let mut balances = self.balances.clone();
        balances.insert(balance.currency().clone(), balance);
        Self { balances }
    }
}

impl TryFrom<BTreeMap<String, Money>> for Wallet {
    type Error = MoneyError;

    fn try_from(entries: BTreeMap<String, Money>) -> Result<Self, Self::Error> {
        let mut balances = BTreeMap::new();
        for (key, money) in entries {
            let currency = Currency::from_text(&key)?;
            // keys are stored in canonical upper case
            if currency.code() != key {
                return Err(MoneyError::InvalidFormat(key));
            }
            if &currency != money.currency() {
                return Err(MoneyError::currency_mismatch(&currency, money.currency()));
            }
            balances.insert(currency, money);
        }
        Ok(Self { balances })
    }
}

impl From<Wallet> for BTreeMap<String, Money> {
    fn from(wallet: Wallet) -> Self {
        wallet
            .balances
            .into_iter()
            .map(|(currency, money)| (currency.into(), money))
            .collect()
    }
}
