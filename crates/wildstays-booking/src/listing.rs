use thiserror::Error;
use wildstays_db::models::ListingDraft;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingValidation {
    #[error("{0} is required.")]
    Missing(&'static str),
    #[error("{0} must be greater than zero.")]
    NotPositive(&'static str),
    #[error("End date must be after the start date.")]
    EndBeforeStart,
}

/// Check the listing invariants before anything is written.
pub fn validate_listing(draft: &ListingDraft) -> Result<(), ListingValidation> {
    if draft.name.trim().is_empty() {
        return Err(ListingValidation::Missing("Name"));
    }
    if draft.place.trim().is_empty() {
        return Err(ListingValidation::Missing("Place"));
    }

    let counts = [
        ("Price", draft.price),
        ("Guests", draft.guests),
        ("Bedrooms", draft.bedrooms),
        ("Bathrooms", draft.bathrooms),
    ];
    if let Some((field, _)) = counts.into_iter().find(|(_, value)| *value == 0) {
        return Err(ListingValidation::NotPositive(field));
    }

    if !crate::dates::check_date_order(draft.start_date, draft.end_date) {
        return Err(ListingValidation::EndBeforeStart);
    }
    Ok(())
}
