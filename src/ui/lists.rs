// The signed-in user's two personal lists: games to play and games played.

use std::str::FromStr;

use anyhow::Result;

use super::{catalog, listing, Context};
use crate::api::{Catalog, GameRecord, PlayedRecord, ToPlayRecord};
use crate::console::Console;
use crate::interact;
use crate::values::Vote;

pub const ALREADY_IN_LIST: &str = "Game already in list";
pub const ADDED_TO_PLAY: &str = "Game added to games to play!";
pub const ADDED_PLAYED: &str = "Game added to games played!";
pub const REMOVED_TO_PLAY: &str = "Game removed from games to play!";
pub const REMOVED_PLAYED: &str = "Game removed from games played!";
pub const MOVED_TO_PLAYED: &str = "Game moved to games played!";

const VOTE_PROMPT: &str = "Vote (1-10)";

pub fn show_to_play<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    to_play_listing(ctx)?;
    Ok(())
}

pub fn show_played<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    played_listing(ctx)?;
    Ok(())
}

fn to_play_listing<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<Vec<ToPlayRecord>> {
    let token = ctx.token()?;
    let to_play = ctx.catalog.games_to_play(&token)?;
    let genres = ctx.catalog.genres()?;
    let rows = to_play
        .iter()
        .map(|record| (&record.game, listing::global_score(record.game.global_rating)));
    let lines = listing::games(rows, &genres, listing::VOTE_BY_USERS);
    ctx.print(lines)?;
    ctx.say("")?;
    Ok(to_play)
}

fn played_listing<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<Vec<PlayedRecord>> {
    let token = ctx.token()?;
    let played = ctx.catalog.games_played(&token)?;
    let genres = ctx.catalog.genres()?;
    let rows = played
        .iter()
        .map(|record| (&record.game, record.rating.to_string()));
    let lines = listing::games(rows, &genres, listing::VOTE_GIVEN);
    ctx.print(lines)?;
    ctx.say("")?;
    Ok(played)
}

/// Let the user pick a game of the whole catalog.
fn pick_game<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<Option<GameRecord>> {
    let games = catalog::games_listing(ctx)?;
    let picked = ctx.pick(games.len())?;
    Ok(picked.map(|i| games[i].clone()))
}

pub fn add_to_play<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    let token = ctx.token()?;
    let Some(game) = pick_game(ctx)? else {
        return Ok(());
    };
    let to_play = ctx.catalog.games_to_play(&token)?;
    if to_play.iter().any(|record| record.game.id == game.id) {
        ctx.say(ALREADY_IN_LIST)?;
        return Ok(());
    }
    ctx.catalog.add_to_play(&token, game.id)?;
    ctx.say(ADDED_TO_PLAY)?;
    Ok(())
}

pub fn add_played<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    let token = ctx.token()?;
    let Some(game) = pick_game(ctx)? else {
        return Ok(());
    };
    let played = ctx.catalog.games_played(&token)?;
    if played.iter().any(|record| record.game.id == game.id) {
        ctx.say(ALREADY_IN_LIST)?;
        return Ok(());
    }
    let vote = interact::read(ctx, VOTE_PROMPT, Vote::from_str)?;
    ctx.catalog.add_played(&token, game.id, vote)?;
    ctx.say(ADDED_PLAYED)?;
    Ok(())
}

pub fn remove_to_play<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    let token = ctx.token()?;
    let to_play = to_play_listing(ctx)?;
    let Some(i) = ctx.pick(to_play.len())? else {
        return Ok(());
    };
    ctx.catalog.remove_to_play(&token, to_play[i].id)?;
    ctx.say(REMOVED_TO_PLAY)?;
    Ok(())
}

pub fn remove_played<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    let token = ctx.token()?;
    let played = played_listing(ctx)?;
    let Some(i) = ctx.pick(played.len())? else {
        return Ok(());
    };
    ctx.catalog.remove_played(&token, played[i].id)?;
    ctx.say(REMOVED_PLAYED)?;
    Ok(())
}

/// The vote is asked before anything changes, so a closed input leaves
/// both lists as they were.
pub fn move_to_played<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    let token = ctx.token()?;
    let to_play = to_play_listing(ctx)?;
    let Some(i) = ctx.pick(to_play.len())? else {
        return Ok(());
    };
    let vote = interact::read(ctx, VOTE_PROMPT, Vote::from_str)?;
    let record = &to_play[i];
    ctx.catalog.remove_to_play(&token, record.id)?;
    ctx.catalog.add_played(&token, record.game.id, vote)?;
    tracing::info!(game = %record.game.title, "moved to games played");
    ctx.say(MOVED_TO_PLAYED)?;
    Ok(())
}
