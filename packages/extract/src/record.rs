//! Column assignment for a single data line.
//!
//! The first token is always the date. The rest are scanned left to right
//! and assigned greedily by shape:
//!
//! 1. the first currency-prefixed token fills `$/Hr`
//! 2. the first two plain-numeric tokens fill `Pieces/Hr` then `Skus/Hr`
//! 3. everything else joins the store label
//!
//! This is first-match-wins: a store name that ends in digits, or metrics in
//! an unexpected order, will be misassigned. Such guesses are
//! recorded as [`Ambiguity`] flags on the record instead of being hidden.

use prod_report_production_models::{Ambiguity, RawRecord};

use crate::OwnerContext;
use crate::token::{self, TokenShape};

/// Extracts a raw record from the whitespace tokens of a data line.
///
/// Returns `None` if there are fewer than two tokens. The record's owner is
/// whatever `owner` currently holds, which may be nothing; such records are
/// rejected later by [`crate::clean`].
#[must_use]
pub fn extract(tokens: &[&str], owner: &OwnerContext, page: usize) -> Option<RawRecord> {
    let (&date, rest) = tokens.split_first()?;
    if rest.is_empty() {
        return None;
    }

    let mut location: Vec<&str> = Vec::new();
    let mut dollars: Option<&str> = None;
    let mut numerics: Vec<&str> = Vec::with_capacity(2);
    let mut ambiguities: Vec<Ambiguity> = Vec::new();

    for (i, &tok) in rest.iter().enumerate() {
        match token::classify(tok) {
            TokenShape::Currency if dollars.is_none() => dollars = Some(tok),
            TokenShape::Numeric if numerics.len() < 2 => {
                // Reports print Pieces/Hr, $/Hr, Skus/Hr; a number straight
                // after the first one before any currency is out of place.
                if numerics.is_empty()
                    && dollars.is_none()
                    && rest
                        .get(i + 1)
                        .is_some_and(|next| token::classify(next) == TokenShape::Numeric)
                {
                    flag(&mut ambiguities, Ambiguity::AdjacentNumerics);
                }
                numerics.push(tok);
            }
            shape => {
                match shape {
                    TokenShape::Currency => flag(&mut ambiguities, Ambiguity::ExtraCurrency),
                    TokenShape::Numeric => flag(&mut ambiguities, Ambiguity::NumericInLocation),
                    TokenShape::Label => {}
                }
                location.push(tok);
            }
        }
    }

    if dollars.is_none() {
        flag(&mut ambiguities, Ambiguity::MissingCurrency);
    }
    if numerics.len() < 2 {
        flag(&mut ambiguities, Ambiguity::MissingNumeric);
    }
    if location.is_empty() {
        flag(&mut ambiguities, Ambiguity::EmptyLocation);
    }
    ambiguities.sort_unstable();

    Some(RawRecord {
        owner: owner.current().map(str::to_owned),
        date: date.to_owned(),
        location: location.join(" "),
        pieces_text: numerics.first().copied().unwrap_or_default().to_owned(),
        dollars_text: dollars.unwrap_or_default().to_owned(),
        skus_text: numerics.get(1).copied().unwrap_or_default().to_owned(),
        page,
        ambiguities,
    })
}

fn flag(ambiguities: &mut Vec<Ambiguity>, ambiguity: Ambiguity) {
    if !ambiguities.contains(&ambiguity) {
        ambiguities.push(ambiguity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned_by(name: &str) -> OwnerContext {
        let mut ctx = OwnerContext::new();
        ctx.observe(name);
        ctx
    }

    fn tokens(line: &str) -> Vec<&str> {
        line.split_whitespace().collect()
    }

    #[test]
    fn assigns_columns_by_shape() {
        let ctx = owned_by("John Smith");
        let record = extract(&tokens("01/05/2025 Main St 100 $4.00 40"), &ctx, 0).unwrap();
        assert_eq!(record.owner.as_deref(), Some("John Smith"));
        assert_eq!(record.date, "01/05/2025");
        assert_eq!(record.location, "Main St");
        assert_eq!(record.pieces_text, "100");
        assert_eq!(record.dollars_text, "$4.00");
        assert_eq!(record.skus_text, "40");
        assert!(record.ambiguities.is_empty());
    }

    #[test]
    fn multi_word_store_names_are_joined() {
        let ctx = owned_by("Ann");
        let record = extract(
            &tokens("02/11/2025 Pick N Save Brookfield 1,204 $61.20 310"),
            &ctx,
            3,
        )
        .unwrap();
        assert_eq!(record.location, "Pick N Save Brookfield");
        assert_eq!(record.pieces_text, "1,204");
        assert_eq!(record.page, 3);
    }

    #[test]
    fn missing_columns_stay_empty_and_are_flagged() {
        let ctx = owned_by("Ann");
        let record = extract(&tokens("02/11/2025 Metro Market 880"), &ctx, 0).unwrap();
        assert_eq!(record.pieces_text, "880");
        assert_eq!(record.dollars_text, "");
        assert_eq!(record.skus_text, "");
        assert_eq!(
            record.ambiguities,
            vec![Ambiguity::MissingCurrency, Ambiguity::MissingNumeric]
        );
    }

    #[test]
    fn third_number_falls_into_location() {
        let ctx = owned_by("Ann");
        let record = extract(&tokens("02/11/2025 Store 100 200 300 $5.00"), &ctx, 0).unwrap();
        assert_eq!(record.pieces_text, "100");
        assert_eq!(record.skus_text, "200");
        assert_eq!(record.location, "Store 300");
        assert_eq!(
            record.ambiguities,
            vec![Ambiguity::NumericInLocation, Ambiguity::AdjacentNumerics]
        );
    }

    #[test]
    fn second_currency_falls_into_location() {
        let ctx = owned_by("Ann");
        let record = extract(&tokens("02/11/2025 Store 1 $5.00 2 $6.00"), &ctx, 0).unwrap();
        assert_eq!(record.dollars_text, "$5.00");
        assert_eq!(record.location, "Store $6.00");
        assert_eq!(record.ambiguities, vec![Ambiguity::ExtraCurrency]);
    }

    #[test]
    fn numeric_store_name_is_consumed_as_metric() {
        let ctx = owned_by("Ann");
        let record = extract(&tokens("02/11/2025 7 100 $5.00 50"), &ctx, 0).unwrap();
        assert_eq!(record.pieces_text, "7");
        assert_eq!(record.skus_text, "100");
        assert_eq!(record.location, "50");
        assert!(record.ambiguities.contains(&Ambiguity::NumericInLocation));
    }

    #[test]
    fn store_number_before_metrics_is_flagged() {
        let ctx = owned_by("Ann");
        let record = extract(&tokens("01/05/2025 Store 7 100 $4.00"), &ctx, 0).unwrap();
        assert_eq!(record.location, "Store");
        assert_eq!(record.pieces_text, "7");
        assert_eq!(record.skus_text, "100");
        assert_eq!(record.ambiguities, vec![Ambiguity::AdjacentNumerics]);
    }

    #[test]
    fn numbers_split_by_currency_are_not_flagged() {
        let ctx = owned_by("Ann");
        let record = extract(&tokens("01/05/2025 Store 7 $4.00 100"), &ctx, 0).unwrap();
        assert!(record.ambiguities.is_empty());
    }

    #[test]
    fn single_token_lines_produce_nothing() {
        let ctx = owned_by("Ann");
        assert!(extract(&tokens("02/11/2025"), &ctx, 0).is_none());
        assert!(extract(&[], &ctx, 0).is_none());
    }

    #[test]
    fn records_without_an_owner_are_still_extracted() {
        let record = extract(&tokens("02/11/2025 Store 1 $2 3"), &OwnerContext::new(), 0).unwrap();
        assert_eq!(record.owner, None);
    }
}
