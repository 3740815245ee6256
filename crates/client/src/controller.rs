//! Reconciliation loop between the API and the optimistic cart state.
//!
//! Every cart write goes through here: apply the optimistic change, fire the
//! mutation, then confirm or roll back based on the server's answer. The
//! error code of a rejected mutation lands in the variant's indicator so the
//! UI can explain the rollback.

use clementine_core::{ErrorCode, VariantId};
use tracing::instrument;

use crate::api::StoreClient;
use crate::cart_state::CartState;
use crate::error::ClientError;

/// Drives cart mutations against the shared optimistic state.
#[derive(Clone)]
pub struct CartController {
    client: StoreClient,
    state: CartState,
}

impl CartController {
    /// Create a controller over the given transport and shared state.
    #[must_use]
    pub const fn new(client: StoreClient, state: CartState) -> Self {
        Self { client, state }
    }

    /// The shared state this controller writes to.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Add a variant optimistically, then reconcile with the server.
    ///
    /// # Errors
    ///
    /// Returns the underlying `ClientError`; the state has already been
    /// rolled back and the indicator set to Failed when this returns `Err`.
    #[instrument(skip(self))]
    pub async fn add(&self, variant_id: VariantId, quantity: i32) -> Result<(), ClientError> {
        self.state.begin_add(variant_id, quantity);
        self.settle(variant_id, self.client.add_to_cart(variant_id, quantity).await)
    }

    /// Overwrite a line's quantity optimistically (zero removes), then
    /// reconcile with the server.
    ///
    /// # Errors
    ///
    /// Returns the underlying `ClientError` after rolling back.
    #[instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<(), ClientError> {
        self.state.begin_set(variant_id, quantity);
        self.settle(
            variant_id,
            self.client.update_cart_quantity(variant_id, quantity).await,
        )
    }

    /// Remove a line optimistically, then reconcile with the server.
    ///
    /// # Errors
    ///
    /// Returns the underlying `ClientError` after rolling back.
    #[instrument(skip(self))]
    pub async fn remove(&self, variant_id: VariantId) -> Result<(), ClientError> {
        self.state.begin_set(variant_id, 0);
        self.settle(variant_id, self.client.remove_from_cart(variant_id).await)
    }

    /// Empty the cart on the server, then drop the local state.
    ///
    /// Not optimistic: an accidental full clear is worse than a short wait.
    ///
    /// # Errors
    ///
    /// Returns the underlying `ClientError`; local state is untouched on
    /// failure.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), ClientError> {
        self.client.clear_cart().await?;
        self.state.clear();
        Ok(())
    }

    /// Replace the confirmed state with a fresh server read.
    ///
    /// # Errors
    ///
    /// Returns the underlying `ClientError` when the cart cannot be fetched.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let cart = self.client.get_my_cart().await?;
        self.state
            .set_server(cart.items.into_iter().map(|l| (l.variant_id, l.quantity)));
        Ok(())
    }

    fn settle(
        &self,
        variant_id: VariantId,
        outcome: Result<(), ClientError>,
    ) -> Result<(), ClientError> {
        match outcome {
            Ok(()) => {
                self.state.confirm(variant_id);
                Ok(())
            }
            Err(err) => {
                let code = err.code().unwrap_or(ErrorCode::Internal);
                tracing::debug!(variant_id = %variant_id, code = code.as_str(), "cart mutation rolled back");
                self.state.fail(variant_id, code);
                Err(err)
            }
        }
    }
}
