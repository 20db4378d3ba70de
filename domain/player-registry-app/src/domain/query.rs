use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::domain::player::{Player, Profession, Race};

pub const DEFAULT_PAGE_NUMBER: usize = 0;
pub const DEFAULT_PAGE_SIZE: usize = 3;

/// Optional predicates over players. Only the ones that are set take part,
/// and a player has to satisfy all of them.
#[derive(Debug, Clone, Default)]
pub struct PlayerFilter {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    pub born_after: Option<DateTime<Utc>>,
    pub born_before: Option<DateTime<Utc>>,
    pub banned: Option<bool>,
    pub min_experience: Option<i32>,
    pub max_experience: Option<i32>,
    pub min_level: Option<i32>,
    pub max_level: Option<i32>,
}

impl PlayerFilter {
    pub fn matches(&self, player: &Player) -> bool {
        let record = &player.record;
        if let Some(name) = &self.name
            && !record.name.contains(name.as_str())
        {
            return false;
        }
        if let Some(title) = &self.title
            && !record.title.contains(title.as_str())
        {
            return false;
        }
        if self.race.is_some_and(|race| record.race != race) {
            return false;
        }
        if self
            .profession
            .is_some_and(|profession| record.profession != profession)
        {
            return false;
        }
        if self.born_after.is_some_and(|after| record.birthday < after) {
            return false;
        }
        if self
            .born_before
            .is_some_and(|before| record.birthday >= before)
        {
            return false;
        }
        if self.banned.is_some_and(|banned| record.banned != banned) {
            return false;
        }
        if self.min_experience.is_some_and(|min| record.experience < min) {
            return false;
        }
        if self.max_experience.is_some_and(|max| record.experience > max) {
            return false;
        }
        if self.min_level.is_some_and(|min| record.level < min) {
            return false;
        }
        if self.max_level.is_some_and(|max| record.level > max) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerOrder {
    Id,
    Name,
    Experience,
    Birthday,
}

impl PlayerOrder {
    pub fn comparator(self) -> fn(&Player, &Player) -> Ordering {
        match self {
            PlayerOrder::Id => |a: &Player, b: &Player| a.id.cmp(&b.id),
            PlayerOrder::Name => |a: &Player, b: &Player| a.record.name.cmp(&b.record.name),
            PlayerOrder::Experience => {
                |a: &Player, b: &Player| a.record.experience.cmp(&b.record.experience)
            }
            PlayerOrder::Birthday => {
                |a: &Player, b: &Player| a.record.birthday.cmp(&b.record.birthday)
            }
        }
    }
}

impl std::str::FromStr for PlayerOrder {
    type Err = crate::domain::player::UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ID" => Ok(PlayerOrder::Id),
            "NAME" => Ok(PlayerOrder::Name),
            "EXPERIENCE" => Ok(PlayerOrder::Experience),
            "BIRTHDAY" => Ok(PlayerOrder::Birthday),
            other => Err(crate::domain::player::UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: usize,
    pub size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            number: DEFAULT_PAGE_NUMBER,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(number: Option<usize>, size: Option<usize>) -> Self {
        Self {
            number: number.unwrap_or(DEFAULT_PAGE_NUMBER),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

pub fn filter_players(players: Vec<Player>, filter: &PlayerFilter) -> Vec<Player> {
    players
        .into_iter()
        .filter(|player| filter.matches(player))
        .collect()
}

/// Stable sort, so equal keys keep their relative order. `None` leaves the
/// slice as it is.
pub fn sort_players(players: &mut [Player], order: Option<PlayerOrder>) {
    if let Some(order) = order {
        players.sort_by(order.comparator());
    }
}

pub fn page_players(players: Vec<Player>, page: PageRequest) -> Vec<Player> {
    let start = page.number.saturating_mul(page.size);
    if start >= players.len() {
        return Vec::new();
    }
    players.into_iter().skip(start).take(page.size).collect()
}

#[derive(Debug, Clone, Default)]
pub struct PlayerQuery {
    pub filter: PlayerFilter,
    pub order: Option<PlayerOrder>,
    pub page: PageRequest,
}

impl PlayerQuery {
    pub fn run(&self, players: Vec<Player>) -> Vec<Player> {
        let mut players = filter_players(players, &self.filter);
        sort_players(&mut players, self.order);
        page_players(players, self.page)
    }
}
