use super::AuthClient;
use crate::models::DraftListing;
use crate::utils::{find_char_boundary, image_data_url};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

// Draft defaults. The seller finalizes price and category in Seller Hub
// before publishing, so these only need to be valid placeholders.
const CONDITION: &str = "NEW";
const QUANTITY: u32 = 1;
const MARKETPLACE_ID: &str = "EBAY_US";
const LISTING_FORMAT: &str = "FIXED_PRICE";
const DEFAULT_PRICE: &str = "9.99";
const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_CATEGORY_ID: &str = "111422";

/// Client for the Sell Inventory API draft-listing sequence:
/// inventory item (PUT, keyed by SKU) then offer (POST).
pub struct ListingClient {
    auth: AuthClient,
    base_url: String,
    http: reqwest::Client,
}

// ── Wire types (Sell Inventory API) ─────────────────────────────────────

#[derive(Serialize)]
struct InventoryItem {
    product: Product,
    condition: &'static str,
    availability: Availability,
}

#[derive(Serialize)]
struct Product {
    title: String,
    description: String,
    #[serde(rename = "imageUrls", skip_serializing_if = "Vec::is_empty")]
    image_urls: Vec<String>,
}

#[derive(Serialize)]
struct Availability {
    #[serde(rename = "shipToLocationAvailability")]
    ship_to_location_availability: ShipToLocationAvailability,
}

#[derive(Serialize)]
struct ShipToLocationAvailability {
    quantity: u32,
}

#[derive(Serialize)]
struct Offer {
    sku: String,
    #[serde(rename = "marketplaceId")]
    marketplace_id: &'static str,
    format: &'static str,
    #[serde(rename = "listingDescription", skip_serializing_if = "String::is_empty")]
    listing_description: String,
    #[serde(rename = "pricingSummary")]
    pricing_summary: PricingSummary,
    #[serde(rename = "categoryId")]
    category_id: &'static str,
    #[serde(rename = "listingPolicies")]
    listing_policies: ListingPolicies,
}

#[derive(Serialize)]
struct PricingSummary {
    price: Price,
}

#[derive(Serialize)]
struct Price {
    value: &'static str,
    currency: &'static str,
}

/// Left empty for drafts; the seller attaches policies when publishing.
#[derive(Serialize, Default)]
struct ListingPolicies {}

#[derive(Deserialize)]
struct OfferResponse {
    #[serde(rename = "offerId")]
    offer_id: Option<String>,
}

impl ListingClient {
    pub fn new(auth: AuthClient) -> Self {
        Self {
            base_url: auth.environment().api_base_url().to_string(),
            auth,
            http: reqwest::Client::new(),
        }
    }

    /// Point the client at a different API base URL. Used by tests to
    /// target a mock server.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Run the full sequence and return the offer ID of the created draft.
    pub async fn create_draft_listing(&self, listing: &DraftListing) -> Result<String> {
        let access_token = self
            .auth
            .get_access_token()
            .await
            .context("Failed to get access token")?;

        let image_urls = encode_images(listing)?;

        let sku = generate_sku();

        self.create_inventory_item(&access_token, &sku, listing, image_urls)
            .await
            .context("Failed to create inventory item")?;

        let offer_id = self
            .create_offer(&access_token, &sku, listing)
            .await
            .context("Failed to create offer")?;

        Ok(offer_id)
    }

    async fn create_inventory_item(
        &self,
        access_token: &str,
        sku: &str,
        listing: &DraftListing,
        image_urls: Vec<String>,
    ) -> Result<()> {
        let item = InventoryItem {
            product: Product {
                title: listing.title.clone(),
                description: listing.description.clone(),
                image_urls,
            },
            condition: CONDITION,
            availability: Availability {
                ship_to_location_availability: ShipToLocationAvailability { quantity: QUANTITY },
            },
        };

        let url = format!("{}/inventory_item/{}", self.base_url, sku);
        let resp = self
            .http
            .put(&url)
            .bearer_auth(access_token)
            .header("Content-Language", "en-US")
            .json(&item)
            .timeout(Duration::from_secs(120))
            .send()
            .await
            .with_context(|| format!("Inventory item request to {url} failed"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .context("Failed to read inventory item response")?;

        // 204 on create/replace, 200 on some sandbox responses
        if status.as_u16() != 200 && status.as_u16() != 204 {
            return Err(anyhow!(
                "Inventory item request failed with status {}: {}",
                status.as_u16(),
                body
            ));
        }

        Ok(())
    }

    async fn create_offer(
        &self,
        access_token: &str,
        sku: &str,
        listing: &DraftListing,
    ) -> Result<String> {
        let offer = Offer {
            sku: sku.to_string(),
            marketplace_id: MARKETPLACE_ID,
            format: LISTING_FORMAT,
            listing_description: listing.description.clone(),
            pricing_summary: PricingSummary {
                price: Price {
                    value: DEFAULT_PRICE,
                    currency: DEFAULT_CURRENCY,
                },
            },
            category_id: DEFAULT_CATEGORY_ID,
            listing_policies: ListingPolicies::default(),
        };

        let url = format!("{}/offer", self.base_url);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .header("Content-Language", "en-US")
            .json(&offer)
            .timeout(Duration::from_secs(120))
            .send()
            .await
            .with_context(|| format!("Offer request to {url} failed"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .context("Failed to read offer response")?;

        if status.as_u16() != 200 && status.as_u16() != 201 {
            return Err(anyhow!(
                "Offer request failed with status {}: {}",
                status.as_u16(),
                body
            ));
        }

        let parsed: OfferResponse = serde_json::from_str(&body).with_context(|| {
            format!(
                "Failed to parse offer response. Raw body:\n{}",
                &body[..find_char_boundary(&body, 500)]
            )
        })?;

        parsed
            .offer_id
            .ok_or_else(|| anyhow!("Offer ID not found in response"))
    }
}

/// Encode each photo as an inline base64 data URL. The Inventory API wants
/// externally hosted URLs; data URLs keep the tool self-contained.
fn encode_images(listing: &DraftListing) -> Result<Vec<String>> {
    listing
        .photo_paths
        .iter()
        .map(|path| image_data_url(path))
        .collect()
}

/// Draft SKUs are throwaway identifiers, but they key the inventory item,
/// so each invocation must get a fresh one.
fn generate_sku() -> String {
    format!("DRAFT-{}", Uuid::new_v4().simple())
}
