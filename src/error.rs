use uuid::Uuid;

/// Engine-level failure kinds.
///
/// Every variant except `Store` is a recoverable validation/lookup outcome
/// the transport layer flattens into its uniform rejection; the specific
/// kind is logged at the handler boundary before flattening.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A batch item re-declares an existing unit with the other type.
    #[error("unit {0} has a different type than the one already stored")]
    TypeConflict(Uuid),

    /// A referenced parent id resolves neither in the batch nor in the store.
    #[error("parent unit {0} does not exist")]
    ParentNotFound(Uuid),

    /// A referenced parent id resolves to an offer.
    #[error("unit {0} is an OFFER and cannot be a parent")]
    ParentIsOffer(Uuid),

    /// Two batch items share one id.
    #[error("unit {0} appears more than once in the batch")]
    DuplicateIdInBatch(Uuid),

    /// A batch item names itself as its parent.
    #[error("unit {0} cannot be its own parent")]
    SelfParent(Uuid),

    /// Offer without a non-negative price, or category with a price.
    #[error("unit {0} has an invalid price for its type")]
    InvalidPrice(Uuid),

    /// No version of the unit exists, either at all or at the queried instant.
    #[error("unit {0} not found")]
    NotFound(Uuid),

    /// The version store failed.
    #[error("store error: {0}")]
    Store(#[from] sea_orm::DbErr),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
