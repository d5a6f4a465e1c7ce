//! Management routes: bulk status, full listings, unlink/relink

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;

use crate::context::AppContext;
use crate::dto::{
    parse_id, AccountsFromDiscord, DiscordDto, DiscordManageDto, IncludeInactiveQuery,
    LinkPairQuery, ListDiscordItem, ListDiscordResponse, ListRequest, ListResponse,
    ListWikidotItem, ListWikidotResponse, ToggleResponse, WikidotManageDto, WikidotMemberDto,
};
use crate::error::ApiError;

/// POST /v1/list - bulk status for a set of Discord ids.
///
/// Ids without a known account are omitted from the result map; only
/// active links are reported.
pub async fn list(
    State(ctx): State<AppContext>,
    Json(body): Json<ListRequest>,
) -> Result<Json<ListResponse>, ApiError> {
    let mut result = BTreeMap::new();

    for raw_id in body.discord_ids {
        let discord_id = parse_id(&raw_id)?;
        let Some(account) = ctx.discord_accounts.get(discord_id).await? else {
            continue;
        };

        let mut wikidot = Vec::new();
        for link in ctx.registry.active_links_for(discord_id).await? {
            if let Some(acc) = ctx.wikidot_accounts.get(link.wikidot_id).await? {
                wikidot.push(WikidotMemberDto::from(&acc));
            }
        }

        result.insert(raw_id, AccountsFromDiscord { discord: DiscordDto::from(&account), wikidot });
    }

    Ok(Json(ListResponse { result }))
}

/// GET /v1/list/discord - full listing keyed by Discord account.
pub async fn list_discord(
    State(ctx): State<AppContext>,
    Query(query): Query<IncludeInactiveQuery>,
) -> Result<Json<ListDiscordResponse>, ApiError> {
    let mut result = Vec::new();

    for account in ctx.discord_accounts.list_all().await? {
        let mut wikidot = Vec::new();
        for link in ctx.registry.links_for(account.discord_id, query.include_inactive).await? {
            if let Some(acc) = ctx.wikidot_accounts.get(link.wikidot_id).await? {
                wikidot.push(WikidotManageDto::from_link(&acc, &link));
            }
        }

        result.push(ListDiscordItem { discord: DiscordDto::from(&account), wikidot });
    }

    Ok(Json(ListDiscordResponse { result }))
}

/// GET /v1/list/wikidot - full listing keyed by Wikidot account.
pub async fn list_wikidot(
    State(ctx): State<AppContext>,
    Query(query): Query<IncludeInactiveQuery>,
) -> Result<Json<ListWikidotResponse>, ApiError> {
    let mut result = Vec::new();

    for account in ctx.wikidot_accounts.list_all().await? {
        let mut discord = Vec::new();
        for link in
            ctx.registry.links_for_wikidot(account.wikidot_id, query.include_inactive).await?
        {
            if let Some(acc) = ctx.discord_accounts.get(link.discord_id).await? {
                discord.push(DiscordManageDto::from_link(&acc, &link));
            }
        }

        result.push(ListWikidotItem { discord, wikidot: WikidotMemberDto::from(&account) });
    }

    Ok(Json(ListWikidotResponse { result }))
}

/// PATCH /v1/unlink?discord_id=&wikidot_id= - deactivate a link.
pub async fn unlink(
    State(ctx): State<AppContext>,
    Query(query): Query<LinkPairQuery>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let discord_id = parse_id(&query.discord_id)?;
    let wikidot_id = parse_id(&query.wikidot_id)?;

    let result = ctx.registry.unlink(discord_id, wikidot_id).await?;
    Ok(Json(ToggleResponse { result }))
}

/// PATCH /v1/relink?discord_id=&wikidot_id= - reactivate a link.
pub async fn relink(
    State(ctx): State<AppContext>,
    Query(query): Query<LinkPairQuery>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let discord_id = parse_id(&query.discord_id)?;
    let wikidot_id = parse_id(&query.wikidot_id)?;

    let result = ctx.registry.relink(discord_id, wikidot_id).await?;
    Ok(Json(ToggleResponse { result }))
}
