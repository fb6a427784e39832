use thiserror::Error;

use super::{AlertCondition, NewAlert};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertField {
    Email,
    Coin,
    Condition,
    Price,
}

impl AlertField {
    const ORDER: [AlertField; 4] = [
        AlertField::Email,
        AlertField::Coin,
        AlertField::Condition,
        AlertField::Price,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            AlertField::Email => "Email",
            AlertField::Coin => "Coin",
            AlertField::Condition => "Condition",
            AlertField::Price => "Price",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlertFormError {
    #[error("email address is required")]
    MissingEmail,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("coin is required")]
    MissingCoin,
    #[error("'{0}' is not a valid price")]
    InvalidPrice(String),
    #[error("target price must be greater than zero")]
    NonPositivePrice,
}

/// Editable state of the new-alert popup.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertForm {
    pub email: String,
    pub coin: String,
    pub condition: AlertCondition,
    pub price: String,
    pub focus: AlertField,
    pub error: Option<AlertFormError>,
}

impl AlertForm {
    /// Blank form preset to the coin currently on the chart.
    pub fn new(coin: &str) -> Self {
        Self {
            email: String::new(),
            coin: coin.to_string(),
            condition: AlertCondition::Above,
            price: String::new(),
            focus: AlertField::Email,
            error: None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Type a character into the focused field. Space flips the condition.
    pub fn input(&mut self, c: char) {
        self.error = None;
        match self.focus {
            AlertField::Email => self.email.push(c),
            AlertField::Coin => self.coin.push(c.to_ascii_lowercase()),
            AlertField::Condition => {
                if c == ' ' {
                    self.condition = self.condition.toggled();
                } else if let Some(cond) = match c.to_ascii_lowercase() {
                    'a' => Some(AlertCondition::Above),
                    'b' => Some(AlertCondition::Below),
                    _ => None,
                } {
                    self.condition = cond;
                }
            }
            AlertField::Price => {
                if c.is_ascii_digit() || c == '.' {
                    self.price.push(c);
                }
            }
        }
    }

    pub fn backspace(&mut self) {
        self.error = None;
        match self.focus {
            AlertField::Email => {
                self.email.pop();
            }
            AlertField::Coin => {
                self.coin.pop();
            }
            AlertField::Condition => {}
            AlertField::Price => {
                self.price.pop();
            }
        }
    }

    pub fn field_value(&self, field: AlertField) -> String {
        match field {
            AlertField::Email => self.email.clone(),
            AlertField::Coin => self.coin.clone(),
            AlertField::Condition => self.condition.to_string(),
            AlertField::Price => self.price.clone(),
        }
    }

    pub fn validate(&self) -> Result<NewAlert, AlertFormError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(AlertFormError::MissingEmail);
        }
        let valid_email = email
            .split_once('@')
            .is_some_and(|(user, domain)| !user.is_empty() && !domain.is_empty());
        if !valid_email {
            return Err(AlertFormError::InvalidEmail(email.to_string()));
        }

        let coin = self.coin.trim().to_ascii_lowercase();
        if coin.is_empty() {
            return Err(AlertFormError::MissingCoin);
        }

        let raw_price = self.price.trim();
        let price: f64 = raw_price
            .parse()
            .map_err(|_| AlertFormError::InvalidPrice(raw_price.to_string()))?;
        if !price.is_finite() || price <= 0.0 {
            return Err(AlertFormError::NonPositivePrice);
        }

        Ok(NewAlert {
            email: email.to_string(),
            coin,
            condition: self.condition,
            price,
        })
    }

    /// Validate, remembering the failure for display.
    pub fn submit(&mut self) -> Option<NewAlert> {
        match self.validate() {
            Ok(alert) => {
                self.error = None;
                Some(alert)
            }
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }
}
