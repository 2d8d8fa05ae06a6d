//! Customer Model

use super::de;
use super::ids::CustomerId;
use serde::{Deserialize, Deserializer, Serialize};

/// Segment label for customers without a usable retailer profile
pub const UNKNOWN_SEGMENT: &str = "Inconnue";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    /// Either `"Sfax"` or `{"region": "Sfax"}` upstream
    #[serde(default, deserialize_with = "region")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub city: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRegion {
    Nested {
        #[serde(default, deserialize_with = "de::opt_text")]
        region: Option<String>,
    },
    Flat(#[serde(deserialize_with = "de::opt_text")] Option<String>),
}

fn region<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawRegion>::deserialize(deserializer)? {
        Some(RawRegion::Nested { region }) | Some(RawRegion::Flat(region)) => region,
        None => None,
    })
}

/// Customer entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(alias = "customer_id", deserialize_with = "de::id")]
    pub id: CustomerId,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub retailer_profile: Option<String>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub addresses: Vec<Address>,
}

impl Customer {
    /// Retailer segment; `"0"` and empty profiles are unknown
    pub fn segment(&self) -> &str {
        match self.retailer_profile.as_deref() {
            None | Some("0") => UNKNOWN_SEGMENT,
            Some(profile) => profile,
        }
    }

    /// Region of the first address, if any
    pub fn region(&self) -> Option<&str> {
        self.addresses.first().and_then(|a| a.region.as_deref())
    }
}
