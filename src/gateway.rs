//! Validation gateway for wire-level transfer entries.
//!
//! Pure validation: parses the entry's address, amount and currency symbol
//! into a canonical [`ValidatedTransfer`], or fails with a descriptive
//! [`GatewayError`]. No I/O, no side effects. Every money-affecting adapter
//! call goes through here first.

use regex::Regex;
use rust_decimal::Decimal;

use crate::adapters::TransferEntry;

/// Address grammar: `[schema ":"] handle ["@" parent]`, each component
/// restricted to alphanumerics and `_-+.`
const ADDRESS_PATTERN: &str = r"^(?:(?P<schema>[A-Za-z0-9_\-+.]+):)?(?P<handle>[A-Za-z0-9_\-+.]+)(?:@(?P<parent>[A-Za-z0-9_\-+.]+))?$";

/// Constants the gateway checks entries against.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Handle of the wallet this bank owns on the remote ledger
    pub bank_wallet: String,
    /// Schema tag internal addresses must carry
    pub schema: String,
    /// The single supported currency code
    pub symbol: String,
    /// Minor units per major unit (100 for cent-denominated currencies)
    pub unit_factor: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bank_wallet: "bbva".to_owned(),
            schema: "svgs".to_owned(),
            symbol: "cop".to_owned(),
            unit_factor: 100,
        }
    }
}

/// Validation failures. Messages are part of the external contract: they
/// travel to the orchestrator as the Failed result's detail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Address missing from entry")]
    MissingAddress,

    #[error("Invalid address, got {0}")]
    InvalidAddress(String),

    #[error("Expected address parent to be {expected}, got {got}")]
    WrongParent { expected: String, got: String },

    #[error("Expected address schema to be {expected}, got {got}")]
    WrongSchema { expected: String, got: String },

    #[error("Account missing from transfer request")]
    MissingAccount,

    #[error("Positive integer amount expected, got {0}")]
    InvalidAmount(i64),

    #[error("Symbol {expected} expected, got {got}")]
    WrongSymbol { expected: String, got: String },
}

/// A parsed and verified bank-internal address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub schema: String,
    pub account: String,
    pub parent: String,
}

/// The canonical, type-checked form of a transfer entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTransfer {
    pub address: Address,
    /// Amount in major units (minor units divided by the unit factor)
    pub amount: Decimal,
    pub symbol: String,
}

/// Validates transfer entries against the configured bank constants.
pub struct Gateway {
    config: GatewayConfig,
    address_regex: Regex,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            // the pattern is a compile-time constant, so this cannot fail
            address_regex: Regex::new(ADDRESS_PATTERN).unwrap(),
        }
    }

    /// Validate a whole entry: address (picked by leg type), amount, symbol.
    ///
    /// The "credit" schema tags an inbound leg, so the address under check is
    /// the target; every other schema is outbound and checks the source.
    pub fn validate_entry(&self, entry: &TransferEntry) -> Result<ValidatedTransfer, GatewayError> {
        let raw_address = if entry.schema == "credit" {
            &entry.target
        } else {
            &entry.source
        };
        if raw_address.is_empty() {
            return Err(GatewayError::MissingAddress);
        }

        let address = self.validate_address(raw_address)?;
        let amount = self.validate_amount(entry.amount)?;
        let symbol = self.validate_symbol(&entry.symbol)?;

        Ok(ValidatedTransfer {
            address,
            amount,
            symbol,
        })
    }

    /// Parse an address against the grammar and check it belongs to this bank.
    pub fn validate_address(&self, raw: &str) -> Result<Address, GatewayError> {
        let captures = self
            .address_regex
            .captures(raw)
            .ok_or_else(|| GatewayError::InvalidAddress(raw.to_owned()))?;

        let schema = captures.name("schema").map(|m| m.as_str().to_owned());
        let account = captures.name("handle").map(|m| m.as_str().to_owned());
        let parent = captures.name("parent").map(|m| m.as_str().to_owned());

        // the grammar makes parent and schema optional; validity does not
        if parent.as_deref() != Some(&self.config.bank_wallet) {
            return Err(GatewayError::WrongParent {
                expected: self.config.bank_wallet.clone(),
                got: parent.unwrap_or_default(),
            });
        }
        if schema.as_deref() != Some(&self.config.schema) {
            return Err(GatewayError::WrongSchema {
                expected: self.config.schema.clone(),
                got: schema.unwrap_or_default(),
            });
        }
        let account = account.filter(|a| !a.is_empty()).ok_or(GatewayError::MissingAccount)?;

        Ok(Address {
            schema: schema.unwrap_or_default(),
            account,
            parent: parent.unwrap_or_default(),
        })
    }

    /// Check the amount is a positive integer of minor units and convert it
    /// to major units.
    pub fn validate_amount(&self, minor: i64) -> Result<Decimal, GatewayError> {
        if minor <= 0 {
            return Err(GatewayError::InvalidAmount(minor));
        }
        Ok(Decimal::from(minor) / Decimal::from(self.config.unit_factor))
    }

    /// Check the currency symbol matches the single supported code.
    pub fn validate_symbol(&self, symbol: &str) -> Result<String, GatewayError> {
        if symbol != self.config.symbol {
            return Err(GatewayError::WrongSymbol {
                expected: self.config.symbol.clone(),
                got: symbol.to_owned(),
            });
        }
        Ok(symbol.to_owned())
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new(GatewayConfig::default())
    }
}
