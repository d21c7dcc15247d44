// Browsing the catalog, and the admin operations that change it.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;

use super::{busy, listing, Context};
use crate::api::{Catalog, GameRecord, GenreRecord, NewGame};
use crate::console::Console;
use crate::interact;
use crate::values::{
    whole_number, GameDescription, GameTitle, Genre, Pegi, Rejection, ReleaseDate,
};

pub const MAX_GENRES_PER_GAME: usize = 5;

pub const GAME_ADDED: &str = "Game added successfully!";
pub const GAME_REMOVED: &str = "Game removed successfully!";
pub const GENRE_ADDED: &str = "Genre added successfully!";
pub const GENRE_EXISTS: &str = "Genre already added";
pub const GENRE_REMOVED: &str = "Genre removed successfully!";
pub const GENRE_ALREADY_SELECTED: &str = "Genre already selected. Please choose a different one.";
pub const NO_GENRES: &str = "There are no genres yet, add one first";
pub const USER_BANNED: &str = "User banned successfully!";

pub fn show_games<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    games_listing(ctx)?;
    Ok(())
}

/// Print every game and return what was printed, in order.
pub(super) fn games_listing<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<Vec<GameRecord>> {
    let games = ctx.catalog.games()?;
    let genres = ctx.catalog.genres()?;
    let rows = games
        .iter()
        .map(|game| (game, listing::global_score(game.global_rating)));
    let lines = listing::games(rows, &genres, listing::VOTE_BY_USERS);
    ctx.print(lines)?;
    ctx.say("")?;
    Ok(games)
}

pub fn show_genres<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    genres_listing(ctx)?;
    Ok(())
}

fn genres_listing<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<Vec<GenreRecord>> {
    let genres = ctx.catalog.genres()?;
    ctx.print(listing::genres(&genres))?;
    ctx.say("")?;
    Ok(genres)
}

pub fn add_game<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    let token = ctx.token()?;
    let description = interact::read(ctx, "Description", GameDescription::from_str)?;
    let title = interact::read(ctx, "Title", GameTitle::from_str)?;

    let available = ctx.catalog.genres()?;
    if available.is_empty() {
        ctx.say(NO_GENRES)?;
        return Ok(());
    }
    let most = available.len().min(MAX_GENRES_PER_GAME) as i64;
    let count = interact::read(ctx, "Number of genres", |raw: &str| whole_number(raw, 1..=most))?;

    ctx.print(listing::genres(&available))?;
    let mut genres: Vec<u64> = Vec::new();
    for n in 1..=count {
        let id = interact::read(ctx, &format!("Genre {n} index"), |raw: &str| -> Result<u64, Rejection> {
            let index = whole_number(raw, 1..=available.len() as i64)?;
            let id = available[index as usize - 1].id;
            if genres.contains(&id) {
                Err(Rejection::invalid(GENRE_ALREADY_SELECTED))
            } else {
                Ok(id)
            }
        })?;
        genres.push(id);
    }

    let pegi = interact::read(ctx, "Pegi", Pegi::from_str)?;
    let release_date = read_release_date(ctx)?;

    let default_art = ctx.settings.box_art.clone();
    let prompt = format!("Box art path (empty for {})", default_art.display());
    let box_art = interact::read(ctx, &prompt, |raw: &str| {
        if raw.is_empty() {
            return Ok(default_art.clone());
        }
        let path = PathBuf::from(raw);
        if path.is_file() {
            Ok(path)
        } else {
            Err(Rejection::invalid(format!("No file at {raw}")))
        }
    })?;

    let game = NewGame {
        title,
        description,
        genres,
        pegi,
        release_date,
        box_art,
    };
    busy("Uploading...", || ctx.catalog.add_game(&token, &game))?;
    tracing::info!(title = %game.title, "game added");
    ctx.say(GAME_ADDED)?;
    Ok(())
}

/// Year, month and day, checked together as one calendar date.
fn read_release_date<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<ReleaseDate> {
    let years = i64::from(ReleaseDate::FIRST_YEAR)..=i64::from(ReleaseDate::latest_year());
    let year = interact::read(ctx, "Release year", |raw: &str| whole_number(raw, years.clone()))?;
    let month = interact::read(ctx, "Release month", |raw: &str| whole_number(raw, 1..=12))?;
    let date = interact::read(ctx, "Release day", |raw: &str| -> Result<ReleaseDate, Rejection> {
        let day = whole_number(raw, 1..=31)?;
        Ok(ReleaseDate::new(year as i32, month as u32, day as u32)?)
    })?;
    Ok(date)
}

pub fn add_genre<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    let token = ctx.token()?;
    let existing = genres_listing(ctx)?;
    let genre = interact::read(ctx, "Genre", Genre::from_str)?;
    if existing
        .iter()
        .any(|g| g.name.eq_ignore_ascii_case(genre.as_str()))
    {
        ctx.say(GENRE_EXISTS)?;
        return Ok(());
    }
    ctx.catalog.add_genre(&token, &genre)?;
    ctx.say(GENRE_ADDED)?;
    Ok(())
}

pub fn remove_game<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    let token = ctx.token()?;
    let games = games_listing(ctx)?;
    let Some(i) = ctx.pick(games.len())? else {
        return Ok(());
    };
    ctx.catalog.remove_game(&token, games[i].id)?;
    ctx.say(GAME_REMOVED)?;
    Ok(())
}

pub fn remove_genre<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    let token = ctx.token()?;
    let genres = genres_listing(ctx)?;
    let Some(i) = ctx.pick(genres.len())? else {
        return Ok(());
    };
    ctx.catalog.remove_genre(&token, genres[i].id)?;
    ctx.say(GENRE_REMOVED)?;
    Ok(())
}

pub fn ban_user<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    let token = ctx.token()?;
    let users = ctx.catalog.users(&token)?;
    ctx.print(listing::users(&users))?;
    ctx.say("")?;
    let Some(i) = ctx.pick(users.len())? else {
        return Ok(());
    };
    ctx.catalog.ban_user(&token, users[i].id)?;
    tracing::info!(username = %users[i].username, "user banned");
    ctx.say(USER_BANNED)?;
    Ok(())
}
