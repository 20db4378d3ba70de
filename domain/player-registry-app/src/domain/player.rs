use chrono::{DateTime, Utc};

use crate::domain::{
    PlayerId, RepoError, RepoRetrieveError, RepoUpdateError, level::LevelProgress,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Race {
    Human,
    Dwarf,
    Elf,
    Giant,
    Orc,
    Troll,
    Hobbit,
}

impl Race {
    pub const ALL: [Race; 7] = [
        Race::Human,
        Race::Dwarf,
        Race::Elf,
        Race::Giant,
        Race::Orc,
        Race::Troll,
        Race::Hobbit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Race::Human => "HUMAN",
            Race::Dwarf => "DWARF",
            Race::Elf => "ELF",
            Race::Giant => "GIANT",
            Race::Orc => "ORC",
            Race::Troll => "TROLL",
            Race::Hobbit => "HOBBIT",
        }
    }
}

impl std::str::FromStr for Race {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Race::ALL
            .into_iter()
            .find(|race| race.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl std::fmt::Display for Race {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Profession {
    Warrior,
    Rogue,
    Sorcerer,
    Cleric,
    Paladin,
    Nazgul,
    Warlock,
    Druid,
}

impl Profession {
    pub const ALL: [Profession; 8] = [
        Profession::Warrior,
        Profession::Rogue,
        Profession::Sorcerer,
        Profession::Cleric,
        Profession::Paladin,
        Profession::Nazgul,
        Profession::Warlock,
        Profession::Druid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Profession::Warrior => "WARRIOR",
            Profession::Rogue => "ROGUE",
            Profession::Sorcerer => "SORCERER",
            Profession::Cleric => "CLERIC",
            Profession::Paladin => "PALADIN",
            Profession::Nazgul => "NAZGUL",
            Profession::Warlock => "WARLOCK",
            Profession::Druid => "DRUID",
        }
    }
}

impl std::str::FromStr for Profession {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profession::ALL
            .into_iter()
            .find(|profession| profession.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl std::fmt::Display for Profession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant: {0}")]
pub struct UnknownVariant(pub String);

/// A player that has not been stored yet. Level fields are derived on
/// construction and kept in sync by [`PlayerRecord::set_experience`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerRecord {
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    pub birthday: DateTime<Utc>,
    pub banned: bool,
    pub experience: i32,
    pub level: i32,
    pub until_next_level: i32,
}

impl PlayerRecord {
    pub fn new(
        name: String,
        title: String,
        race: Race,
        profession: Profession,
        birthday: DateTime<Utc>,
        banned: bool,
        experience: i32,
    ) -> Self {
        let progress = LevelProgress::from_experience(experience);
        Self {
            name,
            title,
            race,
            profession,
            birthday,
            banned,
            experience,
            level: progress.level,
            until_next_level: progress.until_next_level,
        }
    }

    pub fn set_experience(&mut self, experience: i32) {
        let progress = LevelProgress::from_experience(experience);
        self.experience = experience;
        self.level = progress.level;
        self.until_next_level = progress.until_next_level;
    }

    pub fn with_id(self, id: PlayerId) -> Player {
        Player { id, record: self }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub record: PlayerRecord,
}

#[async_trait::async_trait]
pub trait PlayerRepository {
    /// Stores a new player and returns it with the id assigned by the store.
    async fn create_player(&self, record: PlayerRecord) -> Result<Player, RepoError>;
    async fn get_player(&self, id: PlayerId) -> Result<Player, RepoRetrieveError>;
    /// All players in ascending id order.
    async fn list_players(&self) -> Result<Vec<Player>, RepoError>;
    /// Overwrites every field of an existing player in one write.
    async fn update_player(&self, player: &Player) -> Result<(), RepoUpdateError>;
    async fn remove_player(&self, id: PlayerId) -> Result<(), RepoUpdateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_names_round_trip() {
        for race in Race::ALL {
            assert_eq!(race.as_str().parse::<Race>(), Ok(race));
        }
        for profession in Profession::ALL {
            assert_eq!(profession.as_str().parse::<Profession>(), Ok(profession));
        }
        assert!("human".parse::<Race>().is_err());
        assert!("BARD".parse::<Profession>().is_err());
    }

    #[test]
    fn test_set_experience_recomputes_level() {
        let mut record = PlayerRecord::new(
            "Ragnar".to_string(),
            "Seeker of fjords".to_string(),
            Race::Human,
            Profession::Warrior,
            DateTime::from_timestamp_millis(1_000_000_000_000).unwrap(),
            false,
            0,
        );
        assert_eq!((record.level, record.until_next_level), (0, 100));

        record.set_experience(1000);
        assert_eq!(record.experience, 1000);
        assert_eq!((record.level, record.until_next_level), (4, 500));
    }
}
