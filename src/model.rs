//! Domain records shared by every backend: characters, weapons, and the
//! account/stats snapshot.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single playable character as exposed to the rendering layer.
///
/// Two schema variants exist in the wild: the nested export carries a full
/// [`Weapon`] object, while the remote table flattens the weapon down to a
/// `weapon_type` code. Both shapes map onto this record; the field the source
/// does not carry stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    /// Numeric primary key. Present on remote table rows, usually absent in
    /// JSON exports.
    pub id: Option<u32>,
    pub name: String,
    pub icon: String,
    pub element: String,
    pub rarity: u8,
    pub level: u32,
    pub constellation: u8,
    pub friendship: u8,
    /// Equipped weapon, nested schema variant.
    pub weapon: Option<Weapon>,
    /// Weapon category code, flattened schema variant.
    pub weapon_type: Option<u8>,
}

impl Character {
    /// Derives the route identifier the site uses for character pages:
    /// the display name lowercased with whitespace runs collapsed to `-`.
    pub fn slug(&self) -> String {
        self.name
            .split_whitespace()
            .map(|part| part.to_lowercase())
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// The weapon equipped by a character in the nested schema variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weapon {
    pub icon: String,
    pub level: u32,
    pub name: String,
    pub rarity: u8,
    pub refinement: u8,
}

/// Exploration and progress counters attached to an account.
///
/// Sources disagree on which counters they export, so every named field has a
/// default and any counter this struct does not name is kept verbatim in
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub achievements: u32,
    pub days_active: u32,
    pub characters: u32,
    pub spiral_abyss: String,
    pub anemoculi: u32,
    pub geoculi: u32,
    pub electroculi: u32,
    pub dendroculi: u32,
    pub hydroculi: u32,
    pub common_chests: u32,
    pub exquisite_chests: u32,
    pub precious_chests: u32,
    pub luxurious_chests: u32,
    pub unlocked_waypoints: u32,
    pub unlocked_domains: u32,
    /// Counters present in the source but not named above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The canonical account snapshot: player profile fields with the progress
/// counters nested under `stats`.
///
/// Older exports merged profile and counters into one flat object; those are
/// adapted through [`Account::from_legacy`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub uid: Option<u64>,
    pub nickname: String,
    pub level: u32,
    pub server: Option<String>,
    pub stats: Option<Stats>,
    /// Profile fields present in the source but not named above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Account {
    /// Adapts the legacy flat shape, where profile fields and counters live in
    /// one object, into the canonical nested record.
    pub fn from_legacy(mut flat: Map<String, Value>) -> Self {
        let uid = flat.remove("uid").and_then(|v| v.as_u64());
        let nickname = flat
            .remove("nickname")
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        let level = flat
            .remove("level")
            .and_then(|v| v.as_u64())
            .unwrap_or_default() as u32;
        let server = flat
            .remove("server")
            .and_then(|v| v.as_str().map(str::to_string));

        // Everything left over is a counter.
        let stats = if flat.is_empty() {
            None
        } else {
            serde_json::from_value(Value::Object(flat)).ok()
        };

        Account {
            uid,
            nickname,
            level,
            server,
            stats,
            extra: Map::new(),
        }
    }
}

/// The combined document root: all characters plus the single account record.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub characters: Vec<Character>,
    pub account: Option<Account>,
}

impl Document {
    /// Parses a combined document, accepting both the current root
    /// (`characters` + `account`) and the legacy export layout
    /// (`characters` + `accounts` array + sibling `stats` object), where the
    /// first account entry and the stats object merge into one legacy record.
    pub fn from_value(root: Value) -> anyhow::Result<Self> {
        let Value::Object(mut obj) = root else {
            anyhow::bail!("combined document root is not a JSON object");
        };

        let characters: Vec<Character> = match obj.remove("characters") {
            Some(value) => serde_json::from_value(value)?,
            None => anyhow::bail!("combined document has no 'characters' key"),
        };

        let account = match obj.remove("account") {
            Some(value) => Some(serde_json::from_value(value)?),
            None => merge_accounts_and_stats(obj.remove("accounts"), obj.remove("stats")),
        };

        Ok(Document {
            characters,
            account,
        })
    }
}

/// Merges `accounts[0]` with a sibling `stats` object the way the legacy
/// combined export laid them out, then runs the legacy adapter.
fn merge_accounts_and_stats(accounts: Option<Value>, stats: Option<Value>) -> Option<Account> {
    let mut flat = match accounts {
        Some(Value::Array(entries)) => match entries.into_iter().next() {
            Some(Value::Object(obj)) => obj,
            _ => return None,
        },
        _ => return None,
    };

    // Stats values take precedence over account values on key conflicts,
    // matching the spread order of the legacy combined export.
    if let Some(Value::Object(counters)) = stats {
        for (key, value) in counters {
            flat.insert(key, value);
        }
    }

    Some(Account::from_legacy(flat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_character_nested_weapon() {
        let character: Character = serde_json::from_value(json!({
            "name": "Hu Tao",
            "element": "Pyro",
            "rarity": 5,
            "level": 90,
            "constellation": 1,
            "friendship": 10,
            "icon": "hu-tao.png",
            "weapon": {
                "name": "Staff of Homa",
                "icon": "homa.png",
                "level": 90,
                "rarity": 5,
                "refinement": 1
            }
        }))
        .unwrap();

        assert_eq!(character.name, "Hu Tao");
        assert_eq!(character.id, None);
        assert_eq!(character.weapon_type, None);
        let weapon = character.weapon.unwrap();
        assert_eq!(weapon.name, "Staff of Homa");
        assert_eq!(weapon.refinement, 1);
    }

    #[test]
    fn test_character_flattened_weapon_type() {
        let character: Character = serde_json::from_value(json!({
            "id": 7,
            "name": "Amber",
            "element": "Pyro",
            "rarity": 4,
            "weapon_type": 2
        }))
        .unwrap();

        assert_eq!(character.id, Some(7));
        assert_eq!(character.weapon_type, Some(2));
        assert!(character.weapon.is_none());
    }

    #[test]
    fn test_sparse_character_parses_with_defaults() {
        let character: Character =
            serde_json::from_value(json!({"id": 1, "name": "Amber"})).unwrap();
        assert_eq!(character.id, Some(1));
        assert_eq!(character.level, 0);
        assert_eq!(character.element, "");
    }

    #[test]
    fn test_slug_lowercases_and_hyphenates() {
        let character = Character {
            name: "Hu Tao".to_string(),
            ..Character::default()
        };
        assert_eq!(character.slug(), "hu-tao");

        let character = Character {
            name: "Kaedehara  Kazuha".to_string(),
            ..Character::default()
        };
        assert_eq!(character.slug(), "kaedehara-kazuha");
    }

    #[test]
    fn test_stats_keeps_unknown_counters() {
        let stats: Stats = serde_json::from_value(json!({
            "achievements": 620,
            "anemoculi": 66,
            "remarkable_chests": 4
        }))
        .unwrap();

        assert_eq!(stats.achievements, 620);
        assert_eq!(stats.anemoculi, 66);
        assert_eq!(stats.extra.get("remarkable_chests"), Some(&json!(4)));
    }

    #[test]
    fn test_account_keeps_unknown_profile_fields() {
        let account: Account = serde_json::from_value(json!({
            "uid": 5,
            "signature": "Ad astra abyssosque!"
        }))
        .unwrap();

        assert_eq!(account.uid, Some(5));
        assert_eq!(
            account.extra.get("signature"),
            Some(&json!("Ad astra abyssosque!"))
        );
    }

    #[test]
    fn test_account_from_legacy_splits_profile_and_counters() {
        let flat = json!({
            "uid": 700000001,
            "nickname": "Traveler",
            "level": 58,
            "server": "os_euro",
            "achievements": 620,
            "spiral_abyss": "12-3",
            "unlocked_domains": 35
        });
        let Value::Object(flat) = flat else {
            unreachable!()
        };

        let account = Account::from_legacy(flat);
        assert_eq!(account.uid, Some(700000001));
        assert_eq!(account.nickname, "Traveler");
        assert_eq!(account.level, 58);
        assert_eq!(account.server.as_deref(), Some("os_euro"));

        let stats = account.stats.unwrap();
        assert_eq!(stats.achievements, 620);
        assert_eq!(stats.spiral_abyss, "12-3");
        assert_eq!(stats.unlocked_domains, 35);
    }

    #[test]
    fn test_account_from_legacy_without_counters() {
        let Value::Object(flat) = json!({"uid": 5}) else {
            unreachable!()
        };
        let account = Account::from_legacy(flat);
        assert_eq!(account.uid, Some(5));
        assert!(account.stats.is_none());
    }

    #[test]
    fn test_document_current_root() {
        let document = Document::from_value(json!({
            "characters": [{"id": 1, "name": "Amber"}],
            "account": {"uid": 5}
        }))
        .unwrap();

        assert_eq!(document.characters.len(), 1);
        assert_eq!(document.account.unwrap().uid, Some(5));
    }

    #[test]
    fn test_document_legacy_export_root() {
        let document = Document::from_value(json!({
            "characters": [{"name": "Amber"}, {"name": "Lisa"}],
            "accounts": [{"uid": 42, "nickname": "Traveler", "level": 60}],
            "stats": {"achievements": 900, "geoculi": 131}
        }))
        .unwrap();

        assert_eq!(document.characters.len(), 2);
        let account = document.account.unwrap();
        assert_eq!(account.uid, Some(42));
        assert_eq!(account.nickname, "Traveler");
        assert_eq!(account.stats.unwrap().geoculi, 131);
    }

    #[test]
    fn test_legacy_export_stats_values_win_on_conflict() {
        // The legacy combined export spread the stats object over the account
        // entry, so its values override duplicated profile fields.
        let document = Document::from_value(json!({
            "characters": [],
            "accounts": [{"uid": 42, "nickname": "old-name", "level": 10}],
            "stats": {"nickname": "Traveler", "level": 58, "achievements": 900}
        }))
        .unwrap();

        let account = document.account.unwrap();
        assert_eq!(account.nickname, "Traveler");
        assert_eq!(account.level, 58);
        assert_eq!(account.stats.unwrap().achievements, 900);
    }

    #[test]
    fn test_document_missing_characters_is_an_error() {
        assert!(Document::from_value(json!({"account": {"uid": 5}})).is_err());
        assert!(Document::from_value(json!([1, 2, 3])).is_err());
    }
}
