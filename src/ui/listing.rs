// Listings of catalog data as text tables.

use crate::api::{GameRecord, GenreRecord, UserRecord};
use crate::table::{Column, Table};
use crate::values::GlobalRating;

pub const NO_VOTES: &str = "No votes yet";
pub const VOTE_BY_USERS: &str = "VOTE BY USERS";
pub const VOTE_GIVEN: &str = "VOTE GIVEN";
pub const GENRES_HEADER: &str = "|\t\tGENRES:\t\t\t|";

/// Games with the score shown in the last column, one row per game,
/// numbered from 1.
pub fn games<'a, I>(rows: I, genres: &[GenreRecord], score_header: &'static str) -> Vec<String>
where
    I: IntoIterator<Item = (&'a GameRecord, String)>,
{
    let mut table = Table::new([
        Column::fixed("INDEX", 5),
        Column::wrapped("TITLE", 30),
        Column::wrapped("DESCRIPTION", 40),
        Column::wrapped("GENRE", 20),
        Column::fixed("PEGI", 6),
        Column::fixed("RELEASE DATE", 12),
        Column::fixed(score_header, 13),
    ]);
    for (i, (game, score)) in rows.into_iter().enumerate() {
        table.row([
            (i + 1).to_string(),
            game.title.clone(),
            game.description.clone(),
            genre_names(&game.genres, genres),
            game.pegi.to_string(),
            game.release_date.clone(),
            score,
        ]);
    }
    table.render()
}

/// Genres numbered from 1, in the order the service returned them.
pub fn genres(genres: &[GenreRecord]) -> Vec<String> {
    let mut lines = vec![GENRES_HEADER.to_string()];
    lines.extend(
        genres
            .iter()
            .enumerate()
            .map(|(i, genre)| format!("{}: {}", i + 1, genre.name)),
    );
    lines
}

pub fn users(users: &[UserRecord]) -> Vec<String> {
    let mut table = Table::new([
        Column::fixed("INDEX", 5),
        Column::fixed("USER", 30),
        Column::fixed("EMAIL", 50),
    ]);
    for (i, user) in users.iter().enumerate() {
        table.row([(i + 1).to_string(), user.username.clone(), user.email.clone()]);
    }
    table.render()
}

/// The average vote of a game, or [`NO_VOTES`] when nobody voted.
pub fn global_score(score: f64) -> String {
    match GlobalRating::from_score(score) {
        Ok(rating) if rating.is_unrated() => NO_VOTES.to_string(),
        Ok(rating) => rating.to_string(),
        Err(err) => {
            tracing::warn!(score, %err, "service sent an impossible rating");
            score.to_string()
        }
    }
}

fn genre_names(ids: &[u64], genres: &[GenreRecord]) -> String {
    ids.iter()
        .map(|id| match genres.iter().find(|g| g.id == *id) {
            Some(genre) => genre.name.clone(),
            None => format!("#{id}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
