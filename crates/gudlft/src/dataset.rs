//! In-memory club and competition data.
//!
//! The dataset is loaded once from two JSON files at startup and mutated in
//! place by bookings. Nothing is written back to disk.

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{Club, Competition};

#[derive(Deserialize)]
struct ClubsFile {
    clubs: Vec<Club>,
}

#[derive(Deserialize)]
struct CompetitionsFile {
    competitions: Vec<Competition>,
}

/// Load the club list from a `{"clubs": [...]}` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any club entry is invalid.
pub fn load_clubs(path: impl AsRef<Path>) -> Result<Vec<Club>> {
    let file: ClubsFile = read_json(path.as_ref())?;
    Ok(file.clubs)
}

/// Load the competition list from a `{"competitions": [...]}` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any competition entry is invalid.
pub fn load_competitions(path: impl AsRef<Path>) -> Result<Vec<Competition>> {
    let file: CompetitionsFile = read_json(path.as_ref())?;
    Ok(file.competitions)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Reading {}", path.display());
    let raw = std::fs::read_to_string(path).map_err(|source| Error::DataRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| Error::DataParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Clubs, competitions and the places each club has booked so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    clubs: Vec<Club>,
    competitions: Vec<Competition>,
    /// Places booked per (club name, competition name).
    booked: HashMap<(String, String), u32>,
}

impl Dataset {
    /// Create a dataset with no bookings yet.
    #[must_use]
    pub fn new(clubs: Vec<Club>, competitions: Vec<Competition>) -> Self {
        Self {
            clubs,
            competitions,
            booked: HashMap::new(),
        }
    }

    /// Load both data files.
    ///
    /// # Errors
    ///
    /// Returns an error if either file is missing or malformed.
    pub fn load(clubs_path: impl AsRef<Path>, competitions_path: impl AsRef<Path>) -> Result<Self> {
        let clubs = load_clubs(clubs_path)?;
        let competitions = load_competitions(competitions_path)?;
        info!(
            clubs = clubs.len(),
            competitions = competitions.len(),
            "Dataset loaded"
        );
        Ok(Self::new(clubs, competitions))
    }

    /// All clubs, in file order.
    #[must_use]
    pub fn clubs(&self) -> &[Club] {
        &self.clubs
    }

    /// All competitions, in file order.
    #[must_use]
    pub fn competitions(&self) -> &[Competition] {
        &self.competitions
    }

    /// Find the first club registered with `email`.
    #[must_use]
    pub fn club_by_email(&self, email: &str) -> Option<&Club> {
        self.clubs.iter().find(|club| club.email == email)
    }

    /// Find the first club called `name`.
    #[must_use]
    pub fn club_by_name(&self, name: &str) -> Option<&Club> {
        self.clubs.iter().find(|club| club.name == name)
    }

    /// Find the first competition called `name`.
    #[must_use]
    pub fn competition_by_name(&self, name: &str) -> Option<&Competition> {
        self.competitions.iter().find(|c| c.name == name)
    }

    /// Places `club` has already booked in `competition`.
    #[must_use]
    pub fn booked_places(&self, club: &str, competition: &str) -> u32 {
        self.booked
            .get(&(club.to_string(), competition.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn club_index(&self, name: &str) -> Option<usize> {
        self.clubs.iter().position(|club| club.name == name)
    }

    pub(crate) fn competition_index(&self, name: &str) -> Option<usize> {
        self.competitions.iter().position(|c| c.name == name)
    }

    pub(crate) fn club_at(&self, index: usize) -> &Club {
        &self.clubs[index]
    }

    pub(crate) fn competition_at(&self, index: usize) -> &Competition {
        &self.competitions[index]
    }

    /// Apply an already validated booking.
    ///
    /// Callers must have checked that the club holds `cost` points and the
    /// competition has `places` places left.
    pub(crate) fn commit_booking(&mut self, club: usize, competition: usize, places: u32, cost: u32) {
        let club = &mut self.clubs[club];
        let competition = &mut self.competitions[competition];
        club.points -= cost;
        competition.number_of_places -= places;
        *self
            .booked
            .entry((club.name.clone(), competition.name.clone()))
            .or_insert(0) += places;
    }
}
