//! Content pools consumed by scenario generation and resolution.
//!
//! Content is pure lookup: a [`ContentTables`] value per language, with no
//! side effects. The built-in tables ship English and Chinese pools; other
//! backends can construct tables from JSON with [`ContentTables::from_json`].
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::ContentSource;
use crate::scenario::{Direction, InteractableKind, Role};

/// Languages the engine ships content for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "zh" => Ok(Self::Zh),
            _ => Err(()),
        }
    }
}

/// Errors raised by content lookup.
#[derive(Debug, Error)]
pub enum ContentError {
    /// No pools exist for the requested language. Never silently falls back.
    #[error("no content tables for language `{language}`")]
    MissingLanguage { language: Language },
    #[error("content tables malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Name/description template for a generated location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationTemplate {
    pub name: String,
    pub desc: String,
}

/// Template a discovered clue is stamped from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueTemplate {
    pub name: String,
    pub desc: String,
    /// Base power before the discovery jitter.
    pub power: i32,
}

/// Scripted confrontation lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DialogueLines {
    /// Opening taunts, drawn per character at generation.
    pub intro: Vec<String>,
    pub win: String,
    pub lose: String,
    /// Flourish appended to the win line on a critical success.
    pub critical: String,
}

/// Disjoint content pools for one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContentTables {
    pub titles: Vec<String>,
    pub descriptions: Vec<String>,
    pub prologues: Vec<String>,
    /// Relationship labels keyed by role.
    pub roles: HashMap<Role, Vec<String>>,
    /// First-name pool; names are drawn without replacement per cast.
    pub names: Vec<String>,
    pub personalities: Vec<String>,
    pub weaknesses: Vec<String>,
    pub locations: Vec<LocationTemplate>,
    /// Object name pools keyed by interactable kind.
    pub interactables: HashMap<InteractableKind, Vec<String>>,
    /// Placement sentence per compass facing, stamped onto interactables.
    pub facing_notes: HashMap<Direction, String>,
    pub clues: Vec<ClueTemplate>,
    pub dialogues: DialogueLines,
}

impl ContentTables {
    /// Empty tables (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load tables from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid tables.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Relationship pool for a role; empty slice when the role has none.
    #[must_use]
    pub fn role_pool(&self, role: Role) -> &[String] {
        self.roles.get(&role).map_or(&[], Vec::as_slice)
    }

    /// Object name pool for a kind; empty slice when the kind has none.
    #[must_use]
    pub fn interactable_pool(&self, kind: InteractableKind) -> &[String] {
        self.interactables.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Placement sentence for a facing; empty when the table has none.
    #[must_use]
    pub fn facing_note(&self, direction: Direction) -> &str {
        self.facing_notes
            .get(&direction)
            .map_or("", String::as_str)
    }
}

/// Static, in-memory content backend holding one table set per language.
#[derive(Debug, Clone, Default)]
pub struct StaticContentSource {
    tables: HashMap<Language, ContentTables>,
}

impl StaticContentSource {
    /// Backend carrying the built-in English and Chinese pools.
    #[must_use]
    pub fn builtin() -> Self {
        let mut tables = HashMap::new();
        tables.insert(Language::En, english_tables());
        tables.insert(Language::Zh, chinese_tables());
        Self { tables }
    }

    /// Backend with explicit tables, e.g. parsed from JSON.
    #[must_use]
    pub fn with_tables(tables: HashMap<Language, ContentTables>) -> Self {
        Self { tables }
    }
}

impl ContentSource for StaticContentSource {
    type Error = ContentError;

    fn tables(&self, language: Language) -> Result<ContentTables, Self::Error> {
        self.tables
            .get(&language)
            .cloned()
            .ok_or(ContentError::MissingLanguage { language })
    }

    fn prologue_pool(&self, language: Language) -> Result<Vec<String>, Self::Error> {
        self.tables
            .get(&language)
            .map(|t| t.prologues.clone())
            .ok_or(ContentError::MissingLanguage { language })
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn location_templates(items: &[(&str, &str)]) -> Vec<LocationTemplate> {
    items
        .iter()
        .map(|(name, desc)| LocationTemplate {
            name: (*name).to_string(),
            desc: (*desc).to_string(),
        })
        .collect()
}

fn clue_templates(items: &[(&str, &str, i32)]) -> Vec<ClueTemplate> {
    items
        .iter()
        .map(|(name, desc, power)| ClueTemplate {
            name: (*name).to_string(),
            desc: (*desc).to_string(),
            power: *power,
        })
        .collect()
}

fn english_tables() -> ContentTables {
    ContentTables {
        titles: owned(&[
            "The Chen Legacy",
            "The Lee Syndicate War",
            "Manor of Deceit",
            "Cyber-Key Succession",
        ]),
        descriptions: owned(&[
            "The patriarch has fallen. The sharks are circling.",
            "A battle for control disguised as a family reunion.",
            "Whoever holds the ledger holds the future.",
        ]),
        prologues: owned(&[
            "The reading of the will ended in shouting. You left with five percent and a promise to find the truth.",
            "The estate is frozen until the claims are settled. Every room in this house hides a reason to reopen them.",
            "They think you will sign and disappear. The evidence scattered through the manor says otherwise.",
        ]),
        roles: HashMap::from([
            (
                Role::Rival,
                owned(&[
                    "Greedy Uncle",
                    "Cruel Aunt",
                    "Scheming Step-brother",
                    "Cold Half-sibling",
                ]),
            ),
            (
                Role::Lawyer,
                owned(&["Ace Attorney", "Family Advisor", "Legal Counsel"]),
            ),
            (
                Role::Witness,
                owned(&["The Old Butler", "The Maid", "Private Doctor"]),
            ),
            (Role::Neutral, owned(&["Distant Cousin"])),
        ]),
        names: owned(&[
            "James", "Victoria", "Charles", "Diana", "Richard", "Emily", "Marcus", "Sophia",
        ]),
        personalities: owned(&["Aggressive", "Calculating", "Dismissive", "Volatile"]),
        weaknesses: owned(&[
            "Evidence of Fraud",
            "A Paper Trail",
            "Witnesses Who Talk",
            "The Unsigned Codicil",
        ]),
        locations: location_templates(&[
            (
                "Master Bedroom",
                "Scent of old sandalwood. The patriarch's secrets sleep here.",
            ),
            (
                "Private Study",
                "Walls of books. The ledger is hidden somewhere.",
            ),
            (
                "Drawing Room",
                "Where fake smiles are exchanged. Maybe a wiretap is hidden.",
            ),
            (
                "Underground Vault",
                "Heavy steel doors. Only a few know the code.",
            ),
            ("Garden", "Quiet paths. The dirt looks recently disturbed."),
            ("Dining Hall", "The seat of power is now empty."),
        ]),
        interactables: HashMap::from([
            (
                InteractableKind::Furniture,
                owned(&[
                    "Mahogany Desk",
                    "Velvet Sofa",
                    "Nightstand",
                    "Bookshelf",
                    "Display Cabinet",
                ]),
            ),
            (
                InteractableKind::Decor,
                owned(&[
                    "Antique Vase",
                    "Oil Painting",
                    "Wall Clock",
                    "Persian Rug",
                    "Sculpture",
                ]),
            ),
            (
                InteractableKind::Hidden,
                owned(&["Wall Safe", "Floor Hatch", "Ventilation Shaft", "Hollow Book"]),
            ),
        ]),
        facing_notes: HashMap::from([
            (Direction::North, "Located on the north side of the room.".to_string()),
            (Direction::South, "Located on the south side of the room.".to_string()),
            (Direction::East, "Located on the east side of the room.".to_string()),
            (Direction::West, "Located on the west side of the room.".to_string()),
        ]),
        clues: clue_templates(&[
            (
                "Altered Will",
                "Dates are smudged. The signature looks shaky.",
                85,
            ),
            (
                "Secret Ledger",
                "Records of unexplained off-shore transfers.",
                90,
            ),
            (
                "Voice Recorder",
                "Captured a heated argument moments before death.",
                75,
            ),
            ("Torn Letter", "Fragments threatening exposure.", 60),
            ("Brass Key", "Old and heavy. Unclear what it unlocks.", 40),
            (
                "Medical Records",
                "Suggests mental instability prior to signing.",
                80,
            ),
            ("Bank Statement", "Millions moved to the Cayman Islands.", 70),
            ("Old Photo", "Reveals an illegitimate affair.", 50),
        ]),
        dialogues: DialogueLines {
            intro: owned(&[
                "You think you deserve a cut? Keep dreaming.",
                "Some secrets are better left buried.",
                "We are family. No need for lawyers, right? (Sneers)",
                "The law is on my side. That paper is trash.",
            ]),
            win: "W-what?! Where did you find that?!".to_string(),
            lose: "Hah. I knew you were bluffing.".to_string(),
            critical: "Critical Hit! Perfect evidence!".to_string(),
        },
    }
}

fn chinese_tables() -> ContentTables {
    ContentTables {
        titles: owned(&["陈氏家族遗产案", "李氏财团继承战", "王府百年家产风云", "赛博世家：加密密钥之争"]),
        descriptions: owned(&[
            "家主突然离世，留下巨额资产和未公开的遗嘱。家族内部暗流涌动。",
            "一场关于控制权的血腥博弈。不仅是为了钱，更是为了生存。",
            "谁掌握了核心账本，谁就掌握了未来。现在的平静只是暴风雨的前奏。",
        ]),
        prologues: owned(&[
            "遗嘱宣读在争吵中结束。你带着百分之五的份额离场，并发誓要查明真相。",
            "在所有权属争议解决之前，遗产被冻结。这座宅邸的每个房间都藏着翻案的理由。",
            "他们以为你会签字走人。散落在宅邸各处的证据却另有说法。",
        ]),
        roles: HashMap::from([
            (
                Role::Rival,
                owned(&["贪婪的大伯", "刻薄的姑妈", "心机的继兄", "冷漠的私生子"]),
            ),
            (Role::Lawyer, owned(&["金牌律师", "家族顾问", "私人法务"])),
            (Role::Witness, owned(&["老管家", "贴身女仆", "私人医生"])),
            (Role::Neutral, owned(&["不知情的远房表亲"])),
        ]),
        names: owned(&[
            "张伟", "陈淑芬", "李明", "王强", "赵敏", "刘波", "Alice", "Robert", "Grace",
        ]),
        personalities: owned(&["咄咄逼人", "工于心计", "不屑一顾", "喜怒无常"]),
        weaknesses: owned(&["欺诈的证据", "账面上的漏洞", "愿意开口的证人", "未签署的遗嘱附录"]),
        locations: location_templates(&[
            ("主卧室", "空气中弥漫着陈旧的檀木香，这里隐藏着家主最后的秘密。"),
            ("私人书房", "满墙的书籍和文件，账本通常藏在不起眼的角落。"),
            ("会客室", "虚伪的寒暄发生地，沙发缝隙里也许有录音笔。"),
            ("地下金库", "厚重的防盗门紧闭，只有极少数人知道密码。"),
            ("后花园", "幽静的小径，泥土似乎最近被翻动过。"),
            ("餐厅", "长桌尽头曾经坐着最有权力的人。"),
        ]),
        interactables: HashMap::from([
            (
                InteractableKind::Furniture,
                owned(&["红木办公桌", "丝绒沙发", "床头柜", "书架", "陈列柜"]),
            ),
            (
                InteractableKind::Decor,
                owned(&["古董花瓶", "油画", "挂钟", "地毯", "雕塑"]),
            ),
            (
                InteractableKind::Hidden,
                owned(&["墙壁保险箱", "地板暗格", "通风口", "书本夹层"]),
            ),
        ]),
        facing_notes: HashMap::from([
            (Direction::North, "位于房间的北面。".to_string()),
            (Direction::South, "位于房间的南面。".to_string()),
            (Direction::East, "位于房间的东面。".to_string()),
            (Direction::West, "位于房间的西面。".to_string()),
        ]),
        clues: clue_templates(&[
            ("修改过的遗嘱", "日期被涂改过，签字迹象可疑。", 85),
            ("秘密账本", "记录了数笔不明资金的去向。", 90),
            ("录音笔", "记录了一段激烈的争吵。", 75),
            ("撕碎的信件", "拼凑后隐约可见威胁的字眼。", 60),
            ("神秘钥匙", "不知道通向哪里的黄铜钥匙。", 40),
            ("医疗记录", "显示家主生前神智可能不清。", 80),
            ("海外汇款单", "巨额资金流向了开曼群岛。", 70),
            ("旧照片", "揭示了一段不为人知的私情。", 50),
        ]),
        dialogues: DialogueLines {
            intro: owned(&[
                "你以为你能拿走一分钱吗？别做梦了。",
                "有些事情，你最好不要知道得太清楚。",
                "我们是一家人，没必要闹得这么僵，对吧？（冷笑）",
                "法律是站在我这边的，你手里的废纸没用。",
            ]),
            win: "这...这不可能！你怎么会有这个？！".to_string(),
            lose: "哼，我就知道你是在虚张声势。".to_string(),
            critical: "暴击！完美证据！".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_carries_both_languages() {
        let source = StaticContentSource::builtin();
        for language in [Language::En, Language::Zh] {
            let tables = source.tables(language).unwrap();
            assert!(tables.locations.len() >= 4, "{language}: location pool");
            assert!(tables.names.len() >= 3, "{language}: name pool");
            assert!(!tables.clues.is_empty(), "{language}: clue pool");
            assert!(!tables.prologues.is_empty(), "{language}: prologue pool");
            for role in Role::CAST {
                assert!(!tables.role_pool(role).is_empty(), "{language}: {role}");
            }
            for kind in [
                InteractableKind::Furniture,
                InteractableKind::Decor,
                InteractableKind::Hidden,
            ] {
                assert!(
                    !tables.interactable_pool(kind).is_empty(),
                    "{language}: {kind}"
                );
            }
            for direction in Direction::ALL {
                assert!(
                    !tables.facing_note(direction).is_empty(),
                    "{language}: {direction}"
                );
            }
        }
    }

    #[test]
    fn missing_language_is_an_error_not_a_fallback() {
        let source =
            StaticContentSource::with_tables(HashMap::from([(Language::En, english_tables())]));
        assert!(source.tables(Language::En).is_ok());
        let err = source.tables(Language::Zh).unwrap_err();
        assert!(matches!(
            err,
            ContentError::MissingLanguage {
                language: Language::Zh
            }
        ));
        assert!(source.prologue_pool(Language::Zh).is_err());
    }

    #[test]
    fn tables_roundtrip_through_json() {
        let tables = english_tables();
        let json = serde_json::to_string(&tables).unwrap();
        let back = ContentTables::from_json(&json).unwrap();
        assert_eq!(back, tables);
    }

    #[test]
    fn empty_pools_report_as_empty_slices() {
        let tables = ContentTables::empty();
        assert!(tables.role_pool(Role::Rival).is_empty());
        assert!(tables.interactable_pool(InteractableKind::Hidden).is_empty());
    }
}
