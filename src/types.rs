use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw field strings for one product card, exactly as scraped. Missing card
/// fields arrive as the placeholder strings from `constants`, so validation
/// downstream decides inclusion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProduct {
    pub title: String,
    pub price: String,
    pub rating: String,
    pub colors: String,
    pub size: String,
    pub gender: String,
}

/// Garment sizes the catalog sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    S,
    M,
    L,
    XL,
    XXL,
}

impl Size {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "S" => Some(Size::S),
            "M" => Some(Size::M),
            "L" => Some(Size::L),
            "XL" => Some(Size::XL),
            "XXL" => Some(Size::XXL),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::XL => "XL",
            Size::XXL => "XXL",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target audience labels the catalog uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Men,
    Women,
    Unisex,
}

impl Gender {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Men" => Some(Gender::Men),
            "Women" => Some(Gender::Women),
            "Unisex" => Some(Gender::Unisex),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Men => "Men",
            Gender::Women => "Women",
            Gender::Unisex => "Unisex",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully validated product record eligible for persistence. The serde
/// renames pin the CSV header to the published column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanProduct {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Rating")]
    pub rating: f64,
    #[serde(rename = "Colors")]
    pub colors: u32,
    #[serde(rename = "Size")]
    pub size: Size,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    pub timestamp: String,
}

impl CleanProduct {
    /// Identity key for duplicate detection. The timestamp is excluded since
    /// it is constant within a run; floats are compared by bit pattern.
    pub fn dedup_key(&self) -> (String, u64, u64, u32, Size, Gender) {
        (
            self.title.clone(),
            self.price.to_bits(),
            self.rating.to_bits(),
            self.colors,
            self.size,
            self.gender,
        )
    }
}
