//! Receipts and their categorized line items.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Direction of a receipt's money flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money spent.
    #[default]
    Expense,
    /// Money received.
    Income,
}

impl TransactionType {
    /// Server-side code for this transaction type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(DomainError::InvalidIdentifier(format!(
                "unknown transaction type: {other}"
            ))),
        }
    }
}

/// Closed set of line-item categories understood by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Fuel.
    Fuel,
    /// Car maintenance and expenses.
    CarExpenses,
    /// Fast food.
    Fastfood,
    /// Alcohol.
    Alcohol,
    /// Groceries and drinks.
    FoodDrinks,
    /// Household chemicals.
    Chemistry,
    /// Clothing.
    Clothes,
    /// Electronics and games.
    ElectronicsGames,
    /// Tickets and entrance fees.
    TicketsEntrance,
    /// Delivery fees.
    Delivery,
    /// Other one-off shopping.
    OtherShopping,
    /// Housing bills.
    FlatBills,
    /// Monthly subscriptions.
    MonthlySubscriptions,
    /// Other recurring expenses.
    OtherCyclicalExpenses,
    /// Investments and savings.
    InvestmentsSavings,
    /// Anything else.
    Other,
    /// Study-related expenses.
    ForStudy,
    /// Salary and other work income.
    WorkIncome,
    /// Transfers from family.
    FamilyIncome,
    /// Returns on investments.
    InvestmentsIncome,
    /// Refunds.
    MoneyBack,
    /// Balance carried over from the previous month.
    LastMonthBalance,
}

impl Category {
    /// Server-side code for this category (the serde wire name).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fuel => "fuel",
            Self::CarExpenses => "car_expenses",
            Self::Fastfood => "fastfood",
            Self::Alcohol => "alcohol",
            Self::FoodDrinks => "food_drinks",
            Self::Chemistry => "chemistry",
            Self::Clothes => "clothes",
            Self::ElectronicsGames => "electronics_games",
            Self::TicketsEntrance => "tickets_entrance",
            Self::Delivery => "delivery",
            Self::OtherShopping => "other_shopping",
            Self::FlatBills => "flat_bills",
            Self::MonthlySubscriptions => "monthly_subscriptions",
            Self::OtherCyclicalExpenses => "other_cyclical_expenses",
            Self::InvestmentsSavings => "investments_savings",
            Self::Other => "other",
            Self::ForStudy => "for_study",
            Self::WorkIncome => "work_income",
            Self::FamilyIncome => "family_income",
            Self::InvestmentsIncome => "investments_income",
            Self::MoneyBack => "money_back",
            Self::LastMonthBalance => "last_month_balance",
        }
    }

    /// All category codes, in server declaration order.
    pub const ALL: [Self; 22] = [
        Self::Fuel,
        Self::CarExpenses,
        Self::Fastfood,
        Self::Alcohol,
        Self::FoodDrinks,
        Self::Chemistry,
        Self::Clothes,
        Self::ElectronicsGames,
        Self::TicketsEntrance,
        Self::Delivery,
        Self::OtherShopping,
        Self::FlatBills,
        Self::MonthlySubscriptions,
        Self::OtherCyclicalExpenses,
        Self::InvestmentsSavings,
        Self::Other,
        Self::ForStudy,
        Self::WorkIncome,
        Self::FamilyIncome,
        Self::InvestmentsIncome,
        Self::MoneyBack,
        Self::LastMonthBalance,
    ];

    /// Returns true for categories that represent incoming money.
    #[must_use]
    pub const fn is_income(self) -> bool {
        matches!(
            self,
            Self::WorkIncome
                | Self::FamilyIncome
                | Self::InvestmentsIncome
                | Self::MoneyBack
                | Self::LastMonthBalance
        )
    }
}

impl std::str::FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::InvalidIdentifier(format!("unknown category: {s}")))
    }
}

/// A single line item on a receipt.
///
/// `value` is the server's decimal-as-string representation; use
/// [`Item::amount`] for arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Server-assigned id (0 for unsaved items).
    #[serde(default)]
    pub id: i64,
    /// Spending category.
    pub category: Category,
    /// Monetary value as a decimal string (e.g. `"12.50"`).
    pub value: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Number of units.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Ids of the persons this item is split between.
    #[serde(default)]
    pub owners: Vec<i64>,
}

const fn default_quantity() -> u32 {
    1
}

impl Item {
    /// Parses the decimal value.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] when the value is not a
    /// decimal number.
    pub fn amount(&self) -> DomainResult<f64> {
        self.value
            .parse()
            .map_err(|_| DomainError::InvalidAmount(self.value.clone()))
    }

    /// Value share per owner, splitting the item evenly.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] when the value is not a
    /// decimal number.
    pub fn amount_per_owner(&self) -> DomainResult<f64> {
        let amount = self.amount()?;
        if self.owners.is_empty() {
            Ok(amount)
        } else {
            #[allow(clippy::cast_precision_loss)]
            Ok(amount / self.owners.len() as f64)
        }
    }
}

/// A logged receipt: one payer, one shop, one or more line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Server-assigned id (0 for unsaved receipts).
    #[serde(default)]
    pub id: i64,
    /// Date the payment was made.
    pub payment_date: NaiveDate,
    /// Id of the person who paid.
    pub payer: i64,
    /// Shop name.
    pub shop: String,
    /// Expense or income.
    pub transaction_type: TransactionType,
    /// Line items on this receipt.
    pub items: Vec<Item>,
}

impl Receipt {
    /// Sum of all item values on this receipt.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] for the first item whose
    /// value is not a decimal number.
    pub fn total(&self) -> DomainResult<f64> {
        self.items.iter().try_fold(0.0, |acc, item| Ok(acc + item.amount()?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_item(value: &str, owners: Vec<i64>) -> Item {
        Item {
            id: 0,
            category: Category::FoodDrinks,
            value: value.to_string(),
            description: "milk".to_string(),
            quantity: 1,
            owners,
        }
    }

    #[test]
    fn category_wire_codes_round_trip() {
        for (category, code) in [
            (Category::Fuel, "\"fuel\""),
            (Category::CarExpenses, "\"car_expenses\""),
            (Category::ElectronicsGames, "\"electronics_games\""),
            (Category::LastMonthBalance, "\"last_month_balance\""),
        ] {
            assert_eq!(serde_json::to_string(&category).unwrap(), code);
            let parsed: Category = serde_json::from_str(code).unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn category_parses_from_code() {
        assert_eq!("fuel".parse::<Category>().unwrap(), Category::Fuel);
        assert_eq!(
            "electronics_games".parse::<Category>().unwrap(),
            Category::ElectronicsGames
        );
        assert!("groceries".parse::<Category>().is_err());

        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn income_categories() {
        assert!(Category::WorkIncome.is_income());
        assert!(Category::MoneyBack.is_income());
        assert!(!Category::Fuel.is_income());
    }

    #[test]
    fn item_amount_split() {
        let item = sample_item("30.00", vec![1, 2, 3]);
        assert_eq!(item.amount().unwrap(), 30.0);
        assert_eq!(item.amount_per_owner().unwrap(), 10.0);

        let solo = sample_item("30.00", vec![]);
        assert_eq!(solo.amount_per_owner().unwrap(), 30.0);
    }

    #[test]
    fn bad_amount_is_an_error() {
        let item = sample_item("abc", vec![]);
        assert!(matches!(item.amount(), Err(DomainError::InvalidAmount(_))));
    }

    #[test]
    fn receipt_deserializes_server_shape() {
        let json = r#"{
            "id": 7,
            "payment_date": "2024-01-15",
            "payer": 1,
            "shop": "biedronka",
            "transaction_type": "expense",
            "items": [
                {"id": 3, "category": "food_drinks", "value": "12.50",
                 "description": "bread", "quantity": 2, "owners": [1, 2]}
            ]
        }"#;

        let receipt: Receipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.shop, "biedronka");
        assert_eq!(receipt.transaction_type, TransactionType::Expense);
        assert_eq!(receipt.items[0].owners, vec![1, 2]);
        assert_eq!(receipt.total().unwrap(), 12.5);
    }

    #[test]
    fn unsaved_receipt_defaults() {
        let json = r#"{
            "payment_date": "2024-02-01",
            "payer": 2,
            "shop": "lidl",
            "transaction_type": "income",
            "items": [{"category": "work_income", "value": "100"}]
        }"#;

        let receipt: Receipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.id, 0);
        assert_eq!(receipt.items[0].quantity, 1);
        assert!(receipt.items[0].owners.is_empty());
    }
}
