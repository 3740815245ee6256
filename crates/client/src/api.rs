//! Storefront GraphQL API transport.
//!
//! A thin reqwest-based client: POSTs `{query, variables}` with the bearer
//! token, parses the standard GraphQL response envelope, and maps mutation
//! payloads with `success: false` into [`ClientError::Rejected`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::instrument;
use url::Url;

use clementine_core::{AddressId, AddressType, ErrorCode, UserId, VariantId};

use crate::error::ClientError;

// =============================================================================
// GraphQL documents
// =============================================================================

const GET_MY_CART: &str = r"
query GetMyCart {
    getMyCart {
        items { variantId productName sku quantity unitPrice lineTotal updatedAt }
        subtotal
        totalQuantity
    }
}";

const GET_ADDRESS: &str = r"
query GetAddress($id: AddressId!) {
    getAddress(id: $id) {
        id addressType label line1 line2 city state country postalCode phone isDefault
    }
}";

const GET_ADDRESS_OF_USER: &str = r"
query GetAddressOfUser {
    getAddressOfUser {
        id addressType label line1 line2 city state country postalCode phone isDefault
    }
}";

const GET_USER_PROFILE_DETAILS: &str = r"
query GetUserProfileDetails {
    getUserProfileDetails { id email firstName lastName phone createdAt }
}";

const ADD_TO_CART: &str = r"
mutation AddToCart($variantId: VariantId!, $quantity: Int!) {
    addToCart(variantId: $variantId, quantity: $quantity) { success code message }
}";

const REMOVE_FROM_CART: &str = r"
mutation RemoveFromCart($variantId: VariantId!) {
    removeFromCart(variantId: $variantId) { success code message }
}";

const UPDATE_CART_QUANTITY: &str = r"
mutation UpdateCartQuantity($variantId: VariantId!, $quantity: Int!) {
    updateCartQuantity(variantId: $variantId, quantity: $quantity) { success code message }
}";

const CLEAR_CART: &str = r"
mutation ClearCart {
    clearCart { success code message }
}";

const ADD_ADDRESS: &str = r"
mutation AddAddress($input: AddressInput!) {
    addAddress(input: $input) { success code message }
}";

const UPDATE_ADDRESS: &str = r"
mutation UpdateAddress($input: UpdateAddressInput!) {
    updateAddress(input: $input) { success code message }
}";

const UPDATE_USER_PROFILE_DETAILS: &str = r"
mutation UpdateUserProfileDetails($input: UpdateProfileInput!) {
    updateUserProfileDetails(input: $input) { success code message }
}";

// =============================================================================
// Response payloads
// =============================================================================

/// One cart line as returned by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub variant_id: VariantId,
    pub product_name: String,
    pub sku: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// The caller's cart as returned by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartLine>,
    pub subtotal: Decimal,
    pub total_quantity: i64,
}

/// A saved address as returned by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub address_type: AddressType,
    pub label: Option<String>,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub phone: Option<String>,
    pub is_default: bool,
}

/// Profile details as returned by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The uniform mutation payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResult {
    pub success: bool,
    pub code: Option<ErrorCode>,
    pub message: Option<String>,
}

impl MutationResult {
    /// Turn `success: false` into [`ClientError::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Rejected` with the payload's code and message
    /// when the mutation did not succeed.
    pub fn into_result(self) -> Result<(), ClientError> {
        if self.success {
            return Ok(());
        }
        let code = self.code.unwrap_or(ErrorCode::Internal);
        Err(ClientError::Rejected {
            code,
            message: self.message.unwrap_or_else(|| code.message().to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CartData {
    #[serde(rename = "getMyCart")]
    cart: Cart,
}

#[derive(Debug, Deserialize)]
struct AddressData {
    #[serde(rename = "getAddress")]
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
struct AddressListData {
    #[serde(rename = "getAddressOfUser")]
    addresses: Vec<Address>,
}

#[derive(Debug, Deserialize)]
struct ProfileData {
    #[serde(rename = "getUserProfileDetails")]
    profile: UserProfile,
}

/// A single-mutation response; the field name varies per document.
#[derive(Debug, Deserialize)]
struct MutationData {
    #[serde(
        alias = "addToCart",
        alias = "removeFromCart",
        alias = "updateCartQuantity",
        alias = "clearCart",
        alias = "addAddress",
        alias = "updateAddress",
        alias = "updateUserProfileDetails"
    )]
    result: MutationResult,
}

// =============================================================================
// Input payloads
// =============================================================================

/// Input for `addAddress`. Mirrors the server-side `AddressInput`.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub address_type: AddressType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub is_default: bool,
}

/// Sparse input for `updateAddress`. Absent fields are left untouched.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAddressInput {
    pub id: AddressId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_type: Option<AddressType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

/// Sparse input for `updateUserProfileDetails`.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

// =============================================================================
// Client
// =============================================================================

/// Storefront GraphQL API client.
#[derive(Clone)]
pub struct StoreClient {
    client: reqwest::Client,
    endpoint: Url,
    token: SecretString,
}

impl StoreClient {
    /// Create a client for the given `/api/graphql` endpoint and bearer token.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(endpoint: Url, token: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint,
            token,
        }
    }

    /// Execute a GraphQL document against the storefront.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` on transport failures, `ClientError::GraphQL`
    /// when the response carries errors, and `ClientError::MissingData` when
    /// the envelope has neither data nor errors.
    #[instrument(skip(self, query, variables))]
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ClientError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.token.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let envelope: graphql_client::Response<T> = response.json().await?;

        if let Some(errors) = envelope.errors
            && !errors.is_empty()
        {
            return Err(ClientError::GraphQL(errors));
        }

        envelope.data.ok_or(ClientError::MissingData)
    }

    async fn mutate(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<(), ClientError> {
        let data: MutationData = self.execute(query, variables).await?;
        data.result.into_result()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Fetch the caller's cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or GraphQL failures.
    pub async fn get_my_cart(&self) -> Result<Cart, ClientError> {
        let data: CartData = self
            .execute(GET_MY_CART, serde_json::Value::Null)
            .await?;
        Ok(data.cart)
    }

    /// Fetch one address by id, if owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or GraphQL failures.
    pub async fn get_address(&self, id: AddressId) -> Result<Option<Address>, ClientError> {
        let data: AddressData = self
            .execute(GET_ADDRESS, serde_json::json!({ "id": id }))
            .await?;
        Ok(data.address)
    }

    /// Fetch all addresses of the caller.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or GraphQL failures.
    pub async fn get_addresses(&self) -> Result<Vec<Address>, ClientError> {
        let data: AddressListData = self
            .execute(GET_ADDRESS_OF_USER, serde_json::Value::Null)
            .await?;
        Ok(data.addresses)
    }

    /// Fetch the caller's profile details.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or GraphQL failures.
    pub async fn get_profile(&self) -> Result<UserProfile, ClientError> {
        let data: ProfileData = self
            .execute(GET_USER_PROFILE_DETAILS, serde_json::Value::Null)
            .await?;
        Ok(data.profile)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a variant to the cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Rejected` when the server refuses the add.
    pub async fn add_to_cart(
        &self,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<(), ClientError> {
        self.mutate(
            ADD_TO_CART,
            serde_json::json!({ "variantId": variant_id, "quantity": quantity }),
        )
        .await
    }

    /// Remove a variant from the cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Rejected` when the server refuses the removal.
    pub async fn remove_from_cart(&self, variant_id: VariantId) -> Result<(), ClientError> {
        self.mutate(
            REMOVE_FROM_CART,
            serde_json::json!({ "variantId": variant_id }),
        )
        .await
    }

    /// Overwrite a cart line's quantity. Zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Rejected` when the server refuses the update.
    pub async fn update_cart_quantity(
        &self,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<(), ClientError> {
        self.mutate(
            UPDATE_CART_QUANTITY,
            serde_json::json!({ "variantId": variant_id, "quantity": quantity }),
        )
        .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or GraphQL failures.
    pub async fn clear_cart(&self) -> Result<(), ClientError> {
        self.mutate(CLEAR_CART, serde_json::Value::Null).await
    }

    /// Save a new address.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Rejected` when validation fails.
    pub async fn add_address(&self, input: &AddressInput) -> Result<(), ClientError> {
        self.mutate(ADD_ADDRESS, serde_json::json!({ "input": input }))
            .await
    }

    /// Apply a sparse update to an owned address.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Rejected` with `ADDRESS_NOT_FOUND` when the
    /// address does not exist or belongs to another user.
    pub async fn update_address(&self, input: &UpdateAddressInput) -> Result<(), ClientError> {
        self.mutate(UPDATE_ADDRESS, serde_json::json!({ "input": input }))
            .await
    }

    /// Apply a sparse update to the caller's profile.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Rejected` when validation fails.
    pub async fn update_profile(&self, input: &UpdateProfileInput) -> Result<(), ClientError> {
        self.mutate(
            UPDATE_USER_PROFILE_DETAILS,
            serde_json::json!({ "input": input }),
        )
        .await
    }
}

impl UpdateAddressInput {
    /// An empty patch targeting the given address.
    #[must_use]
    pub const fn for_address(id: AddressId) -> Self {
        Self {
            id,
            address_type: None,
            label: None,
            line1: None,
            line2: None,
            city: None,
            state: None,
            country: None,
            postal_code: None,
            phone: None,
            is_default: None,
        }
    }
}
