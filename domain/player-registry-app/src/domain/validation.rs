use chrono::{DateTime, Utc};
use validator::Validate;

use crate::domain::player::{PlayerRecord, Profession, Race};

pub const MIN_EXPERIENCE: i32 = 0;
pub const MAX_EXPERIENCE: i32 = 10_000_000;

/// Earliest accepted birthday, inclusive.
pub const BIRTHDAY_MIN_MILLIS: i64 = 946_674_000_000;
/// Latest accepted birthday, inclusive.
pub const BIRTHDAY_MAX_MILLIS: i64 = 32_535_205_199_999;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid value for field: {0}")]
    InvalidField(String),
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        ValidationError::InvalidField(fields.into_iter().next().unwrap_or_default())
    }
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

fn birthday_in_window(birthday: &DateTime<Utc>) -> Result<(), validator::ValidationError> {
    let millis = birthday.timestamp_millis();
    if !(BIRTHDAY_MIN_MILLIS..=BIRTHDAY_MAX_MILLIS).contains(&millis) {
        return Err(validator::ValidationError::new("birthday_out_of_range"));
    }
    Ok(())
}

/// Creation input. Every field except `banned` is required.
#[derive(Clone, Debug, Default, Validate)]
pub struct PlayerDraft {
    #[validate(length(min = 1, max = 12), custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 30))]
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    #[validate(custom(function = "birthday_in_window"))]
    pub birthday: Option<DateTime<Utc>>,
    pub banned: Option<bool>,
    #[validate(range(min = 0, max = 10_000_000))]
    pub experience: Option<i32>,
}

impl PlayerDraft {
    /// Full validation. Produces a record with derived level fields and
    /// `banned` defaulted to false.
    pub fn into_record(self) -> Result<PlayerRecord, ValidationError> {
        self.validate()?;
        let name = self.name.ok_or(ValidationError::MissingField("name"))?;
        let title = self.title.ok_or(ValidationError::MissingField("title"))?;
        let race = self.race.ok_or(ValidationError::MissingField("race"))?;
        let profession = self
            .profession
            .ok_or(ValidationError::MissingField("profession"))?;
        let birthday = self
            .birthday
            .ok_or(ValidationError::MissingField("birthday"))?;
        let experience = self
            .experience
            .ok_or(ValidationError::MissingField("experience"))?;
        Ok(PlayerRecord::new(
            name,
            title,
            race,
            profession,
            birthday,
            self.banned.unwrap_or(false),
            experience,
        ))
    }
}

/// Update input. Absent fields are left untouched; present fields must
/// satisfy the same bounds as on creation.
#[derive(Clone, Debug, Default, Validate)]
pub struct PlayerPatch {
    #[validate(length(min = 1, max = 12), custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 30))]
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    #[validate(custom(function = "birthday_in_window"))]
    pub birthday: Option<DateTime<Utc>>,
    pub banned: Option<bool>,
    #[validate(range(min = 0, max = 10_000_000))]
    pub experience: Option<i32>,
}

impl PlayerPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.title.is_none()
            && self.race.is_none()
            && self.profession.is_none()
            && self.birthday.is_none()
            && self.banned.is_none()
            && self.experience.is_none()
    }

    /// Partial validation. Either every present field is valid, or nothing
    /// can be applied.
    pub fn into_changes(self) -> Result<PlayerChanges, ValidationError> {
        self.validate()?;
        Ok(PlayerChanges(self))
    }
}

/// A patch that passed validation.
#[derive(Clone, Debug)]
pub struct PlayerChanges(PlayerPatch);

impl PlayerChanges {
    /// Returns a copy of `record` with the changes applied. Level fields are
    /// recomputed when experience changes.
    pub fn apply(self, record: &PlayerRecord) -> PlayerRecord {
        let patch = self.0;
        let mut updated = record.clone();
        if let Some(name) = patch.name {
            updated.name = name;
        }
        if let Some(title) = patch.title {
            updated.title = title;
        }
        if let Some(race) = patch.race {
            updated.race = race;
        }
        if let Some(profession) = patch.profession {
            updated.profession = profession;
        }
        if let Some(birthday) = patch.birthday {
            updated.birthday = birthday;
        }
        if let Some(banned) = patch.banned {
            updated.banned = banned;
        }
        if let Some(experience) = patch.experience {
            updated.set_experience(experience);
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    fn complete_draft() -> PlayerDraft {
        PlayerDraft {
            name: Some("Amarylis".to_string()),
            title: Some("Queen of the night".to_string()),
            race: Some(Race::Elf),
            profession: Some(Profession::Sorcerer),
            birthday: Some(millis(1_200_000_000_000)),
            banned: None,
            experience: Some(1000),
        }
    }

    fn existing_record() -> PlayerRecord {
        PlayerRecord::new(
            "Drogo".to_string(),
            "Holder of the axe".to_string(),
            Race::Dwarf,
            Profession::Warrior,
            millis(1_100_000_000_000),
            false,
            300,
        )
    }

    #[test]
    fn test_complete_draft_is_accepted() {
        let record = complete_draft().into_record().unwrap();
        assert_eq!(record.name, "Amarylis");
        assert!(!record.banned);
        assert_eq!((record.level, record.until_next_level), (4, 500));
    }

    #[test]
    fn test_banned_flag_is_kept() {
        let draft = PlayerDraft {
            banned: Some(true),
            ..complete_draft()
        };
        assert!(draft.into_record().unwrap().banned);
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let cases: Vec<(&'static str, PlayerDraft)> = vec![
            ("name", PlayerDraft { name: None, ..complete_draft() }),
            ("title", PlayerDraft { title: None, ..complete_draft() }),
            ("race", PlayerDraft { race: None, ..complete_draft() }),
            (
                "profession",
                PlayerDraft {
                    profession: None,
                    ..complete_draft()
                },
            ),
            (
                "birthday",
                PlayerDraft {
                    birthday: None,
                    ..complete_draft()
                },
            ),
            (
                "experience",
                PlayerDraft {
                    experience: None,
                    ..complete_draft()
                },
            ),
        ];
        for (field, draft) in cases {
            assert_eq!(
                draft.into_record(),
                Err(ValidationError::MissingField(field))
            );
        }
    }

    #[test]
    fn test_name_bounds() {
        for name in ["", "   ", "ThirteenChars"] {
            let draft = PlayerDraft {
                name: Some(name.to_string()),
                ..complete_draft()
            };
            assert_eq!(
                draft.into_record(),
                Err(ValidationError::InvalidField("name".to_string())),
                "name {:?}",
                name
            );
        }
        let draft = PlayerDraft {
            name: Some("TwelveChars!".to_string()),
            ..complete_draft()
        };
        assert!(draft.into_record().is_ok());
    }

    #[test]
    fn test_title_bounds() {
        let draft = PlayerDraft {
            title: Some("x".repeat(31)),
            ..complete_draft()
        };
        assert_eq!(
            draft.into_record(),
            Err(ValidationError::InvalidField("title".to_string()))
        );
        let draft = PlayerDraft {
            title: Some("x".repeat(30)),
            ..complete_draft()
        };
        assert!(draft.into_record().is_ok());
    }

    #[test]
    fn test_experience_bounds() {
        for experience in [-1, MAX_EXPERIENCE + 1] {
            let draft = PlayerDraft {
                experience: Some(experience),
                ..complete_draft()
            };
            assert_eq!(
                draft.into_record(),
                Err(ValidationError::InvalidField("experience".to_string()))
            );
        }
        for experience in [MIN_EXPERIENCE, MAX_EXPERIENCE] {
            let draft = PlayerDraft {
                experience: Some(experience),
                ..complete_draft()
            };
            assert!(draft.into_record().is_ok());
        }
    }

    #[test]
    fn test_birthday_bounds() {
        for ms in [BIRTHDAY_MIN_MILLIS - 1, BIRTHDAY_MAX_MILLIS + 1, 0] {
            let draft = PlayerDraft {
                birthday: Some(millis(ms)),
                ..complete_draft()
            };
            assert_eq!(
                draft.into_record(),
                Err(ValidationError::InvalidField("birthday".to_string()))
            );
        }
        for ms in [BIRTHDAY_MIN_MILLIS, BIRTHDAY_MAX_MILLIS] {
            let draft = PlayerDraft {
                birthday: Some(millis(ms)),
                ..complete_draft()
            };
            assert!(draft.into_record().is_ok());
        }
    }

    #[test]
    fn test_patch_leaves_absent_fields_untouched() {
        let record = existing_record();
        let patch = PlayerPatch {
            title: Some("Breaker of shields".to_string()),
            ..Default::default()
        };
        let updated = patch.into_changes().unwrap().apply(&record);
        assert_eq!(updated.title, "Breaker of shields");
        assert_eq!(
            PlayerRecord {
                title: record.title.clone(),
                ..updated
            },
            record
        );
    }

    #[test]
    fn test_patch_rejects_invalid_present_field() {
        let patch = PlayerPatch {
            title: Some("Fine title".to_string()),
            name: Some("x".repeat(20)),
            ..Default::default()
        };
        assert_eq!(
            patch.into_changes().map(|_| ()),
            Err(ValidationError::InvalidField("name".to_string()))
        );

        let patch = PlayerPatch {
            birthday: Some(millis(BIRTHDAY_MIN_MILLIS - 1)),
            ..Default::default()
        };
        assert!(patch.into_changes().is_err());
    }

    #[test]
    fn test_patch_recomputes_level_on_experience() {
        let record = existing_record();
        assert_eq!(record.level, 2);
        let patch = PlayerPatch {
            experience: Some(1000),
            ..Default::default()
        };
        let updated = patch.into_changes().unwrap().apply(&record);
        assert_eq!(updated.experience, 1000);
        assert_eq!((updated.level, updated.until_next_level), (4, 500));
    }

    #[test]
    fn test_empty_patch() {
        assert!(PlayerPatch::default().is_empty());
        let record = existing_record();
        let updated = PlayerPatch::default().into_changes().unwrap().apply(&record);
        assert_eq!(updated, record);
    }
}
