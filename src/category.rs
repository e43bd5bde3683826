//! Defines the closed set of categories used to classify transactions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// A classification tag on a transaction.
///
/// [Category::Income] is the single category denoting money flowing in;
/// every other category denotes money flowing out. The set is closed on
/// purpose: styling, icons and export labels all key off an exhaustive
/// match rather than free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Money flowing in: salary, refunds, interest.
    Income,
    /// Groceries, restaurants, takeaway.
    Food,
    /// Fuel, public transport, ride hailing.
    Transport,
    /// Clothing, gadgets, household purchases.
    Shopping,
    /// Medical bills, pharmacy, insurance.
    Health,
    /// Movies, subscriptions, outings.
    Entertainment,
    /// Rent, power, water, phone and internet.
    Utilities,
    /// Expenses that fit no other category.
    Other,
}

impl Category {
    /// Every category, in the order the UI presents them.
    pub const ALL: [Category; 8] = [
        Category::Income,
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Health,
        Category::Entertainment,
        Category::Utilities,
        Category::Other,
    ];

    /// Whether this category denotes an inflow.
    pub fn is_income(self) -> bool {
        matches!(self, Category::Income)
    }

    /// The display name of the category.
    pub fn label(self) -> &'static str {
        match self {
            Category::Income => "Income",
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Entertainment => "Entertainment",
            Category::Utilities => "Utilities",
            Category::Other => "Other",
        }
    }

    /// The coarse flow direction shown in exports: `Income` or `Expense`.
    pub fn flow_label(self) -> &'static str {
        if self.is_income() { "Income" } else { "Expense" }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "Income" => Ok(Category::Income),
            "Food" => Ok(Category::Food),
            "Transport" => Ok(Category::Transport),
            "Shopping" => Ok(Category::Shopping),
            "Health" => Ok(Category::Health),
            "Entertainment" => Ok(Category::Entertainment),
            "Utilities" => Ok(Category::Utilities),
            "Other" => Ok(Category::Other),
            bad => Err(Error::InvalidCategory(bad.to_owned())),
        }
    }
}

#[cfg(test)]
mod category_tests {
    use crate::Error;

    use super::Category;

    #[test]
    fn parse_round_trips_every_label() {
        for category in Category::ALL {
            let parsed = category
                .label()
                .parse::<Category>()
                .expect("label should parse back into its category");

            assert_eq!(category, parsed);
        }
    }

    #[test]
    fn parse_fails_on_unknown_name() {
        let result = "Groceries".parse::<Category>();

        assert_eq!(result, Err(Error::InvalidCategory("Groceries".to_owned())));
    }

    #[test]
    fn only_income_is_an_inflow() {
        for category in Category::ALL {
            assert_eq!(category.is_income(), category == Category::Income);
        }
    }

    #[test]
    fn flow_label_maps_to_income_or_expense() {
        assert_eq!(Category::Income.flow_label(), "Income");
        assert_eq!(Category::Food.flow_label(), "Expense");
        assert_eq!(Category::Other.flow_label(), "Expense");
    }

    #[test]
    fn serializes_as_plain_name() {
        let json = serde_json::to_string(&Category::Entertainment).unwrap();

        assert_eq!(json, "\"Entertainment\"");
    }
}
