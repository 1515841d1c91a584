use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// City
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum City {
    Yangon,
    Naypyitaw,
    Mandalay,
}

impl City {
    pub const ALL: [City; 3] = [City::Yangon, City::Naypyitaw, City::Mandalay];

    pub fn as_str(&self) -> &'static str {
        match self {
            City::Yangon => "Yangon",
            City::Naypyitaw => "Naypyitaw",
            City::Mandalay => "Mandalay",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CustomerType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CustomerType {
    Member,
    Normal,
}

impl CustomerType {
    pub const ALL: [CustomerType; 2] = [CustomerType::Member, CustomerType::Normal];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::Member => "Member",
            CustomerType::Normal => "Normal",
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Transaction — One row of the sales dataset
// ---------------------------------------------------------------------------

/// A single sale. `total` already includes tax; the crate treats it as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub invoice_id: String,
    pub branch: Option<String>,
    pub city: City,
    pub customer_type: CustomerType,
    pub gender: Gender,
    pub product_line: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub total: f64,
    pub date: NaiveDate,
    pub payment: Option<String>,
    pub gross_income: f64,
    pub rating: f64,
}
