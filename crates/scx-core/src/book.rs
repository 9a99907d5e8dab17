//! Book alias resolution.
//!
//! Maps the free-form book token captured by the citation grammar (plus an
//! optional leading numeral such as `1`, `I`, `II`) onto a [`CanonicalBook`].
//! Resolution never fails: input that matches nothing in the alias table is
//! returned as a title-cased [`BookName::Unresolved`] string.
//!
//! # Lookup order
//!
//! 1. `"{numeral} {token}"` when a numeral is present.
//! 2. The bare token.
//! 3. The last 3, 2, then 1 words of the token, numeral-prefixed when present.
//!
//! Roman numerals `I`/`II`/`III` are converted to Arabic digits before lookup,
//! so `"I Cor"` and `"1 Cor"` hit the same entry.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// A book of the Catholic canon (Old Testament, deuterocanon, New Testament).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalBook {
    Genesis,
    Exodus,
    Leviticus,
    Numbers,
    Deuteronomy,
    Joshua,
    Judges,
    Ruth,
    FirstSamuel,
    SecondSamuel,
    FirstKings,
    SecondKings,
    FirstChronicles,
    SecondChronicles,
    Ezra,
    Nehemiah,
    Tobit,
    Judith,
    Esther,
    FirstMaccabees,
    SecondMaccabees,
    Job,
    Psalms,
    Proverbs,
    Ecclesiastes,
    SongOfSongs,
    Wisdom,
    Sirach,
    Isaiah,
    Jeremiah,
    Lamentations,
    Baruch,
    Ezekiel,
    Daniel,
    Hosea,
    Joel,
    Amos,
    Obadiah,
    Jonah,
    Micah,
    Nahum,
    Habakkuk,
    Zephaniah,
    Haggai,
    Zechariah,
    Malachi,
    Matthew,
    Mark,
    Luke,
    John,
    Acts,
    Romans,
    FirstCorinthians,
    SecondCorinthians,
    Galatians,
    Ephesians,
    Philippians,
    Colossians,
    FirstThessalonians,
    SecondThessalonians,
    FirstTimothy,
    SecondTimothy,
    Titus,
    Philemon,
    Hebrews,
    James,
    FirstPeter,
    SecondPeter,
    FirstJohn,
    SecondJohn,
    ThirdJohn,
    Jude,
    Revelation,
}

impl CanonicalBook {
    /// Every canonical book in canon order.
    pub const ALL: [Self; 73] = [
        Self::Genesis,
        Self::Exodus,
        Self::Leviticus,
        Self::Numbers,
        Self::Deuteronomy,
        Self::Joshua,
        Self::Judges,
        Self::Ruth,
        Self::FirstSamuel,
        Self::SecondSamuel,
        Self::FirstKings,
        Self::SecondKings,
        Self::FirstChronicles,
        Self::SecondChronicles,
        Self::Ezra,
        Self::Nehemiah,
        Self::Tobit,
        Self::Judith,
        Self::Esther,
        Self::FirstMaccabees,
        Self::SecondMaccabees,
        Self::Job,
        Self::Psalms,
        Self::Proverbs,
        Self::Ecclesiastes,
        Self::SongOfSongs,
        Self::Wisdom,
        Self::Sirach,
        Self::Isaiah,
        Self::Jeremiah,
        Self::Lamentations,
        Self::Baruch,
        Self::Ezekiel,
        Self::Daniel,
        Self::Hosea,
        Self::Joel,
        Self::Amos,
        Self::Obadiah,
        Self::Jonah,
        Self::Micah,
        Self::Nahum,
        Self::Habakkuk,
        Self::Zephaniah,
        Self::Haggai,
        Self::Zechariah,
        Self::Malachi,
        Self::Matthew,
        Self::Mark,
        Self::Luke,
        Self::John,
        Self::Acts,
        Self::Romans,
        Self::FirstCorinthians,
        Self::SecondCorinthians,
        Self::Galatians,
        Self::Ephesians,
        Self::Philippians,
        Self::Colossians,
        Self::FirstThessalonians,
        Self::SecondThessalonians,
        Self::FirstTimothy,
        Self::SecondTimothy,
        Self::Titus,
        Self::Philemon,
        Self::Hebrews,
        Self::James,
        Self::FirstPeter,
        Self::SecondPeter,
        Self::FirstJohn,
        Self::SecondJohn,
        Self::ThirdJohn,
        Self::Jude,
        Self::Revelation,
    ];

    /// The preferred display spelling, e.g. `"1 Corinthians"`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Genesis => "Genesis",
            Self::Exodus => "Exodus",
            Self::Leviticus => "Leviticus",
            Self::Numbers => "Numbers",
            Self::Deuteronomy => "Deuteronomy",
            Self::Joshua => "Joshua",
            Self::Judges => "Judges",
            Self::Ruth => "Ruth",
            Self::FirstSamuel => "1 Samuel",
            Self::SecondSamuel => "2 Samuel",
            Self::FirstKings => "1 Kings",
            Self::SecondKings => "2 Kings",
            Self::FirstChronicles => "1 Chronicles",
            Self::SecondChronicles => "2 Chronicles",
            Self::Ezra => "Ezra",
            Self::Nehemiah => "Nehemiah",
            Self::Tobit => "Tobit",
            Self::Judith => "Judith",
            Self::Esther => "Esther",
            Self::FirstMaccabees => "1 Maccabees",
            Self::SecondMaccabees => "2 Maccabees",
            Self::Job => "Job",
            Self::Psalms => "Psalms",
            Self::Proverbs => "Proverbs",
            Self::Ecclesiastes => "Ecclesiastes",
            Self::SongOfSongs => "Song of Songs",
            Self::Wisdom => "Wisdom",
            Self::Sirach => "Sirach",
            Self::Isaiah => "Isaiah",
            Self::Jeremiah => "Jeremiah",
            Self::Lamentations => "Lamentations",
            Self::Baruch => "Baruch",
            Self::Ezekiel => "Ezekiel",
            Self::Daniel => "Daniel",
            Self::Hosea => "Hosea",
            Self::Joel => "Joel",
            Self::Amos => "Amos",
            Self::Obadiah => "Obadiah",
            Self::Jonah => "Jonah",
            Self::Micah => "Micah",
            Self::Nahum => "Nahum",
            Self::Habakkuk => "Habakkuk",
            Self::Zephaniah => "Zephaniah",
            Self::Haggai => "Haggai",
            Self::Zechariah => "Zechariah",
            Self::Malachi => "Malachi",
            Self::Matthew => "Matthew",
            Self::Mark => "Mark",
            Self::Luke => "Luke",
            Self::John => "John",
            Self::Acts => "Acts",
            Self::Romans => "Romans",
            Self::FirstCorinthians => "1 Corinthians",
            Self::SecondCorinthians => "2 Corinthians",
            Self::Galatians => "Galatians",
            Self::Ephesians => "Ephesians",
            Self::Philippians => "Philippians",
            Self::Colossians => "Colossians",
            Self::FirstThessalonians => "1 Thessalonians",
            Self::SecondThessalonians => "2 Thessalonians",
            Self::FirstTimothy => "1 Timothy",
            Self::SecondTimothy => "2 Timothy",
            Self::Titus => "Titus",
            Self::Philemon => "Philemon",
            Self::Hebrews => "Hebrews",
            Self::James => "James",
            Self::FirstPeter => "1 Peter",
            Self::SecondPeter => "2 Peter",
            Self::FirstJohn => "1 John",
            Self::SecondJohn => "2 John",
            Self::ThirdJohn => "3 John",
            Self::Jude => "Jude",
            Self::Revelation => "Revelation",
        }
    }

    /// Parse an exact canonical name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|book| book.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for CanonicalBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The book of a resolved citation.
///
/// Unresolved tokens are carried as a best-effort title-cased string; consumers
/// must tolerate non-canonical names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BookName {
    Canonical(CanonicalBook),
    Unresolved(String),
}

impl BookName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Canonical(book) => book.name(),
            Self::Unresolved(raw) => raw,
        }
    }

    #[must_use]
    pub const fn canonical(&self) -> Option<CanonicalBook> {
        match self {
            Self::Canonical(book) => Some(*book),
            Self::Unresolved(_) => None,
        }
    }
}

impl fmt::Display for BookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BookName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BookName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(CanonicalBook::from_name(&raw).map_or(Self::Unresolved(raw), Self::Canonical))
    }
}

// ---------------------------------------------------------------------------
// Alias table
// ---------------------------------------------------------------------------

/// Lowercase aliases and abbreviations. Canonical names are added on top of
/// these when the table is built.
use CanonicalBook as B;

const ALIASES: &[(&str, CanonicalBook)] = &[
    ("gen", B::Genesis),
    ("ge", B::Genesis),
    ("gn", B::Genesis),
    ("ex", B::Exodus),
    ("exo", B::Exodus),
    ("lev", B::Leviticus),
    ("lv", B::Leviticus),
    ("num", B::Numbers),
    ("nm", B::Numbers),
    ("deut", B::Deuteronomy),
    ("dt", B::Deuteronomy),
    ("deu", B::Deuteronomy),
    ("jos", B::Joshua),
    ("josh", B::Joshua),
    ("judg", B::Judges),
    ("jdg", B::Judges),
    ("jg", B::Judges),
    ("rut", B::Ruth),
    ("ru", B::Ruth),
    ("1 sam", B::FirstSamuel),
    ("1 sm", B::FirstSamuel),
    ("2 sam", B::SecondSamuel),
    ("2 sm", B::SecondSamuel),
    ("1 kgs", B::FirstKings),
    ("1 ki", B::FirstKings),
    ("2 kgs", B::SecondKings),
    ("2 ki", B::SecondKings),
    ("1 chron", B::FirstChronicles),
    ("1 chr", B::FirstChronicles),
    ("1 ch", B::FirstChronicles),
    ("2 chron", B::SecondChronicles),
    ("2 chr", B::SecondChronicles),
    ("2 ch", B::SecondChronicles),
    ("ezr", B::Ezra),
    ("neh", B::Nehemiah),
    ("ne", B::Nehemiah),
    ("esth", B::Esther),
    ("est", B::Esther),
    ("ps", B::Psalms),
    ("pss", B::Psalms),
    ("psalm", B::Psalms),
    ("prov", B::Proverbs),
    ("prv", B::Proverbs),
    ("pr", B::Proverbs),
    ("eccl", B::Ecclesiastes),
    ("qohelet", B::Ecclesiastes),
    ("song", B::SongOfSongs),
    ("canticles", B::SongOfSongs),
    ("canticle of canticles", B::SongOfSongs),
    ("song of solomon", B::SongOfSongs),
    ("cant", B::SongOfSongs),
    ("isa", B::Isaiah),
    ("is", B::Isaiah),
    ("jer", B::Jeremiah),
    ("je", B::Jeremiah),
    ("lam", B::Lamentations),
    ("la", B::Lamentations),
    ("ezek", B::Ezekiel),
    ("ez", B::Ezekiel),
    ("dan", B::Daniel),
    ("dn", B::Daniel),
    ("hos", B::Hosea),
    ("ho", B::Hosea),
    ("jl", B::Joel),
    ("am", B::Amos),
    ("obad", B::Obadiah),
    ("ob", B::Obadiah),
    ("jon", B::Jonah),
    ("mic", B::Micah),
    ("mi", B::Micah),
    ("nah", B::Nahum),
    ("na", B::Nahum),
    ("hab", B::Habakkuk),
    ("hb", B::Habakkuk),
    ("zeph", B::Zephaniah),
    ("zp", B::Zephaniah),
    ("hag", B::Haggai),
    ("hg", B::Haggai),
    ("zech", B::Zechariah),
    ("zec", B::Zechariah),
    ("zc", B::Zechariah),
    ("mal", B::Malachi),
    ("ml", B::Malachi),
    ("tob", B::Tobit),
    ("tb", B::Tobit),
    ("jdt", B::Judith),
    ("wis", B::Wisdom),
    ("ws", B::Wisdom),
    ("wisdom of solomon", B::Wisdom),
    ("sir", B::Sirach),
    ("ecclus", B::Sirach),
    ("ecclesiasticus", B::Sirach),
    ("bar", B::Baruch),
    ("letter of jeremiah", B::Baruch),
    ("1 macc", B::FirstMaccabees),
    ("1 mac", B::FirstMaccabees),
    ("1 mach", B::FirstMaccabees),
    ("2 macc", B::SecondMaccabees),
    ("2 mac", B::SecondMaccabees),
    ("2 mach", B::SecondMaccabees),
    ("mt", B::Matthew),
    ("matt", B::Matthew),
    ("mk", B::Mark),
    ("mrk", B::Mark),
    ("lk", B::Luke),
    ("jn", B::John),
    ("rom", B::Romans),
    ("ro", B::Romans),
    ("1 cor", B::FirstCorinthians),
    ("2 cor", B::SecondCorinthians),
    ("gal", B::Galatians),
    ("eph", B::Ephesians),
    ("phil", B::Philippians),
    ("php", B::Philippians),
    ("phl", B::Philippians),
    ("col", B::Colossians),
    ("1 thess", B::FirstThessalonians),
    ("1 thes", B::FirstThessalonians),
    ("2 thess", B::SecondThessalonians),
    ("2 thes", B::SecondThessalonians),
    ("1 tim", B::FirstTimothy),
    ("2 tim", B::SecondTimothy),
    ("tit", B::Titus),
    ("philem", B::Philemon),
    ("phm", B::Philemon),
    ("heb", B::Hebrews),
    ("jas", B::James),
    ("jam", B::James),
    ("jm", B::James),
    ("1 pet", B::FirstPeter),
    ("2 pet", B::SecondPeter),
    ("1 jn", B::FirstJohn),
    ("2 jn", B::SecondJohn),
    ("3 jn", B::ThirdJohn),
    ("jud", B::Jude),
    ("rev", B::Revelation),
    ("apocalypse", B::Revelation),
    ("rv", B::Revelation),
];

static ALIAS_TABLE: LazyLock<HashMap<String, CanonicalBook>> = LazyLock::new(|| {
    let mut table: HashMap<String, CanonicalBook> = ALIASES
        .iter()
        .map(|(alias, book)| ((*alias).to_string(), *book))
        .collect();
    for book in CanonicalBook::ALL {
        table.entry(book.name().to_lowercase()).or_insert(book);
    }
    table
});

/// Look up a cleaned, lowercase alias (e.g. `"1 cor"`) in the alias table.
#[must_use]
pub fn lookup(alias: &str) -> Option<CanonicalBook> {
    ALIAS_TABLE.get(alias).copied()
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve a raw book token and optional leading numeral to a book name.
///
/// Never fails; see the module docs for the lookup order and fallback.
#[must_use]
pub fn resolve(raw_token: &str, leading_numeral: Option<&str>) -> BookName {
    let token = fold_alias(&clean_token(raw_token));
    let numeral = leading_numeral.and_then(normalize_numeral);

    let with_numeral = |key: &str| match &numeral {
        Some(num) => format!("{num} {key}"),
        None => key.to_string(),
    };

    if numeral.is_some() {
        if let Some(book) = lookup(&with_numeral(&token)) {
            return BookName::Canonical(book);
        }
    }
    if let Some(book) = lookup(&token) {
        return BookName::Canonical(book);
    }

    let words: Vec<&str> = token.split(' ').collect();
    for take in (1..=words.len().min(3)).rev() {
        let tail = words[words.len() - take..].join(" ");
        if let Some(book) = lookup(&with_numeral(&tail)) {
            return BookName::Canonical(book);
        }
    }

    let titled = title_case(&token);
    BookName::Unresolved(match numeral {
        Some(num) if titled.is_empty() => num,
        Some(num) => format!("{num} {titled}"),
        None => titled,
    })
}

/// Lowercase, replace punctuation with spaces, collapse whitespace, and drop a
/// single leading connector word (`cf`, `see`, `see also`, `also`, `and`).
fn clean_token(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");

    for connector in ["see also", "cf", "see", "also", "and"] {
        if let Some(rest) = collapsed
            .strip_prefix(connector)
            .and_then(|rest| rest.strip_prefix(' '))
        {
            return rest.to_string();
        }
    }
    collapsed
}

/// Fold multi-name aliases to the single spelling present in the table.
fn fold_alias(token: &str) -> String {
    let folded = match token {
        "psalm" | "psalms" => "psalms",
        "song" | "songs" | "song of solomon" => "song of songs",
        "canticle" | "canticles" => "canticles",
        "wisdom of solomon" => "wisdom",
        "ecclesiasticus" | "ecclus" => "sirach",
        "qohelet" => "ecclesiastes",
        "apoc" | "apocalypse" => "apocalypse",
        "sap" => "wis",
        other => other,
    };
    folded.to_string()
}

/// `I`/`II`/`III` become `1`/`2`/`3`; other numerals pass through trimmed.
fn normalize_numeral(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let arabic = match trimmed.to_ascii_lowercase().as_str() {
        "i" => "1".to_string(),
        "ii" => "2".to_string(),
        "iii" => "3".to_string(),
        _ => trimmed.to_string(),
    };
    Some(arabic)
}

fn title_case(token: &str) -> String {
    token
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
