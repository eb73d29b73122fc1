//! Party ledger and ledger entry handlers

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::info;
use validator::Validate;

use core_kernel::{DateRange, EntryId, PartyId};
use domain_ledger::Book;

use crate::dto::{
    AmendEntryRequest, ApiResponse, EntryDto, PartyLedgerDto, PartyLedgerQuery,
    RecordEntryRequest, RestatementDto,
};
use crate::error::ApiError;
use crate::handlers::{latest_only, metadata, optional_date};
use crate::AppState;

/// `GET /sales/ledger`
pub async fn sales_ledger(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PartyLedgerQuery>,
) -> Result<Json<ApiResponse<PartyLedgerDto>>, ApiError> {
    party_ledger(&state, &headers, Book::Sales, query).await
}

/// `GET /purchase/rice/ledger`
pub async fn rice_purchase_ledger(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PartyLedgerQuery>,
) -> Result<Json<ApiResponse<PartyLedgerDto>>, ApiError> {
    party_ledger(&state, &headers, Book::RicePurchase, query).await
}

async fn party_ledger(
    state: &AppState,
    headers: &HeaderMap,
    book: Book,
    query: PartyLedgerQuery,
) -> Result<Json<ApiResponse<PartyLedgerDto>>, ApiError> {
    let raw_party = query
        .party_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("partyId is required".to_string()))?;
    let party = PartyId::from_str(raw_party)
        .map_err(|_| ApiError::BadRequest(format!("partyId '{}' is not a valid id", raw_party)))?;
    let range = DateRange::from_bounds(
        optional_date(query.from.as_deref(), "from")?,
        optional_date(query.to.as_deref(), "to")?,
    )?;

    let view_key = format!("{}-ledger", book);
    let dto = latest_only(state, headers, &view_key, async {
        let view = state
            .ledger
            .party_ledger(book, party, range, query.search.as_deref(), metadata(headers))
            .await?;
        Ok::<_, ApiError>(PartyLedgerDto::new(party, book, &view))
    })
    .await?;

    Ok(Json(ApiResponse::ok(dto)))
}

/// `POST /ledger/entries`
pub async fn record_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RecordEntryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EntryDto>>), ApiError> {
    request.validate()?;
    let entry = request.into_new_entry(state.config.currency)?;

    let stored = state.ledger.record(entry, metadata(&headers)).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(EntryDto::from(&stored)).with_message("Entry recorded")),
    ))
}

/// `PUT /ledger/entries/:id`
///
/// Responds with the recomputed balances from the amended entry onwards.
pub async fn amend_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<AmendEntryRequest>,
) -> Result<Json<ApiResponse<RestatementDto>>, ApiError> {
    let id = EntryId::from_str(&id)
        .map_err(|_| ApiError::BadRequest(format!("'{}' is not a valid entry id", id)))?;
    request.validate()?;
    let amendment = request.into_amendment(state.config.currency)?;

    let restatement = state.ledger.amend(id, amendment, metadata(&headers)).await?;
    info!(
        entry_id = %id,
        downstream = restatement.downstream.len(),
        "Entry amended"
    );

    Ok(Json(ApiResponse::ok(RestatementDto::from(&restatement))))
}
