use super::error::{Error, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// A capital cost allowance class and its declining-balance rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CcaClass {
    pub id: &'static str,
    pub rate: Decimal,
    pub description: &'static str,
}

static CLASSES: [CcaClass; 11] = [
    CcaClass {
        id: "1",
        rate: dec!(0.04),
        description: "Buildings acquired after 1987",
    },
    CcaClass {
        id: "8",
        rate: dec!(0.20),
        description: "Furniture, appliances, tools and equipment",
    },
    CcaClass {
        id: "10",
        rate: dec!(0.30),
        description: "Automotive equipment and vehicles",
    },
    CcaClass {
        id: "10.1",
        rate: dec!(0.30),
        description: "Passenger vehicles over the prescribed cost",
    },
    CcaClass {
        id: "12",
        rate: dec!(1.00),
        description: "Tools, software and small assets under $500",
    },
    CcaClass {
        id: "14.1",
        rate: dec!(0.05),
        description: "Goodwill and eligible capital property",
    },
    CcaClass {
        id: "43",
        rate: dec!(0.30),
        description: "Manufacturing and processing machinery",
    },
    CcaClass {
        id: "46",
        rate: dec!(0.30),
        description: "Data network infrastructure equipment",
    },
    CcaClass {
        id: "50",
        rate: dec!(0.55),
        description: "Computer hardware and systems software",
    },
    CcaClass {
        id: "53",
        rate: dec!(0.50),
        description: "Manufacturing and processing equipment acquired after 2015",
    },
    CcaClass {
        id: "54",
        rate: dec!(0.30),
        description: "Zero-emission vehicles",
    },
];

/// Categories offered for expenses that do not name one. The first is the fallback.
pub static DEFAULT_EXPENSE_CATEGORIES: [&str; 12] = [
    "General",
    "Advertising",
    "Bank Charges",
    "Insurance",
    "Meals and Entertainment",
    "Office Supplies",
    "Professional Fees",
    "Rent",
    "Software Subscriptions",
    "Telephone and Internet",
    "Travel",
    "Vehicle",
];

/// All registered classes
pub fn classes() -> &'static [CcaClass] {
    &CLASSES
}

pub fn lookup(id: &str) -> Result<&'static CcaClass> {
    let id = id.trim();
    CLASSES
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| Error::UnknownCcaClass(id.to_string()))
}
