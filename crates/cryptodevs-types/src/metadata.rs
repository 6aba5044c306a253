//! Static per-token metadata.

use serde::{Deserialize, Serialize};

pub const COLLECTION_DESCRIPTION: &str = "Crypto Dev is a collection of developers in crypto";

/// Metadata document served for a token, following the OpenSea metadata layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
}

/// Build the metadata for `token_id`.
///
/// The id is not validated. A non-numeric id still produces a well-formed
/// document whose image URL points at nothing.
pub fn token_metadata(token_id: &str, image_base_url: &str) -> TokenMetadata {
    TokenMetadata {
        name: format!("Crypto Dev #{token_id}"),
        description: COLLECTION_DESCRIPTION.to_string(),
        image: format!("{image_base_url}{token_id}.svg"),
    }
}
