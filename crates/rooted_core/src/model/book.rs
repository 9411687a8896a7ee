//! Canonical book identifier table.
//!
//! # Responsibility
//! - Define the 66 protestant-canon books with stable USFM codes.
//! - Resolve free-text book tokens (names, abbreviations) to codes.
//!
//! # Invariants
//! - Codes are uppercase USFM (`"GEN"` … `"REV"`) and never change.
//! - Lookup is case-insensitive and ignores all whitespace.
//! - No alias resolves to more than one book.
//!
//! # See also
//! - docs/architecture/detection.md

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One canon book entry.
///
/// `aliases` holds common printed abbreviations. Forms that normalize to the
/// same key as `id` or `name` are omitted; bare English words ("is", "am")
/// are deliberately excluded so prose does not resolve to a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Book {
    /// Canonical USFM code.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Additional lookup aliases.
    pub aliases: &'static [&'static str],
}

/// All 66 books in canon order.
pub const BOOKS: [Book; 66] = [
    Book { id: "GEN", name: "Genesis", aliases: &["Gn"] },
    Book { id: "EXO", name: "Exodus", aliases: &["Exod", "Ex"] },
    Book { id: "LEV", name: "Leviticus", aliases: &["Lv"] },
    Book { id: "NUM", name: "Numbers", aliases: &["Nm"] },
    Book { id: "DEU", name: "Deuteronomy", aliases: &["Deut", "Dt"] },
    Book { id: "JOS", name: "Joshua", aliases: &["Josh"] },
    Book { id: "JDG", name: "Judges", aliases: &["Judg"] },
    Book { id: "RUT", name: "Ruth", aliases: &["Ru"] },
    Book { id: "1SA", name: "1 Samuel", aliases: &["1 Sam", "1 Sm"] },
    Book { id: "2SA", name: "2 Samuel", aliases: &["2 Sam", "2 Sm"] },
    Book { id: "1KI", name: "1 Kings", aliases: &["1 Kgs"] },
    Book { id: "2KI", name: "2 Kings", aliases: &["2 Kgs"] },
    Book { id: "1CH", name: "1 Chronicles", aliases: &["1 Chron", "1 Chr"] },
    Book { id: "2CH", name: "2 Chronicles", aliases: &["2 Chron", "2 Chr"] },
    Book { id: "EZR", name: "Ezra", aliases: &[] },
    Book { id: "NEH", name: "Nehemiah", aliases: &[] },
    Book { id: "EST", name: "Esther", aliases: &["Esth"] },
    Book { id: "JOB", name: "Job", aliases: &["Jb"] },
    Book { id: "PSA", name: "Psalms", aliases: &["Psalm", "Pss", "Ps"] },
    Book { id: "PRO", name: "Proverbs", aliases: &["Prov", "Prv"] },
    Book { id: "ECC", name: "Ecclesiastes", aliases: &["Eccl"] },
    Book { id: "SNG", name: "Song of Solomon", aliases: &["Song of Songs", "Song", "Sg"] },
    Book { id: "ISA", name: "Isaiah", aliases: &[] },
    Book { id: "JER", name: "Jeremiah", aliases: &[] },
    Book { id: "LAM", name: "Lamentations", aliases: &[] },
    Book { id: "EZK", name: "Ezekiel", aliases: &["Ezek"] },
    Book { id: "DAN", name: "Daniel", aliases: &["Dn"] },
    Book { id: "HOS", name: "Hosea", aliases: &[] },
    Book { id: "JOL", name: "Joel", aliases: &["Jl"] },
    Book { id: "AMO", name: "Amos", aliases: &[] },
    Book { id: "OBA", name: "Obadiah", aliases: &["Obad"] },
    Book { id: "JON", name: "Jonah", aliases: &["Jnh"] },
    Book { id: "MIC", name: "Micah", aliases: &[] },
    Book { id: "NAH", name: "Nahum", aliases: &[] },
    Book { id: "HAB", name: "Habakkuk", aliases: &[] },
    Book { id: "ZEP", name: "Zephaniah", aliases: &["Zeph"] },
    Book { id: "HAG", name: "Haggai", aliases: &[] },
    Book { id: "ZEC", name: "Zechariah", aliases: &["Zech"] },
    Book { id: "MAL", name: "Malachi", aliases: &[] },
    Book { id: "MAT", name: "Matthew", aliases: &["Matt", "Mt"] },
    Book { id: "MRK", name: "Mark", aliases: &["Mk"] },
    Book { id: "LUK", name: "Luke", aliases: &["Lk"] },
    Book { id: "JHN", name: "John", aliases: &["Jn"] },
    Book { id: "ACT", name: "Acts", aliases: &["Ac"] },
    Book { id: "ROM", name: "Romans", aliases: &["Rm"] },
    Book { id: "1CO", name: "1 Corinthians", aliases: &["1 Cor"] },
    Book { id: "2CO", name: "2 Corinthians", aliases: &["2 Cor"] },
    Book { id: "GAL", name: "Galatians", aliases: &[] },
    Book { id: "EPH", name: "Ephesians", aliases: &[] },
    Book { id: "PHP", name: "Philippians", aliases: &["Phil"] },
    Book { id: "COL", name: "Colossians", aliases: &[] },
    Book { id: "1TH", name: "1 Thessalonians", aliases: &["1 Thess", "1 Thes"] },
    Book { id: "2TH", name: "2 Thessalonians", aliases: &["2 Thess", "2 Thes"] },
    Book { id: "1TI", name: "1 Timothy", aliases: &["1 Tim"] },
    Book { id: "2TI", name: "2 Timothy", aliases: &["2 Tim"] },
    Book { id: "TIT", name: "Titus", aliases: &[] },
    Book { id: "PHM", name: "Philemon", aliases: &["Philem", "Phlm"] },
    Book { id: "HEB", name: "Hebrews", aliases: &[] },
    Book { id: "JAS", name: "James", aliases: &[] },
    Book { id: "1PE", name: "1 Peter", aliases: &["1 Pet", "1 Pt"] },
    Book { id: "2PE", name: "2 Peter", aliases: &["2 Pet", "2 Pt"] },
    Book { id: "1JN", name: "1 John", aliases: &["1 Jn"] },
    Book { id: "2JN", name: "2 John", aliases: &["2 Jn"] },
    Book { id: "3JN", name: "3 John", aliases: &["3 Jn"] },
    Book { id: "JUD", name: "Jude", aliases: &[] },
    Book { id: "REV", name: "Revelation", aliases: &["Rv"] },
];

static BOOK_INDEX: Lazy<HashMap<String, &'static Book>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for book in &BOOKS {
        index.insert(normalize_book_key(book.id), book);
        index.insert(normalize_book_key(book.name), book);
        for alias in book.aliases {
            index.insert(normalize_book_key(alias), book);
        }
    }
    index
});

/// Resolves a free-text book token to its canonical USFM code.
///
/// Accepts display names, USFM codes and known abbreviations, in any casing
/// and with arbitrary internal whitespace (`"1 John"`, `"1john"`, `"1 JOHN"`
/// all resolve to `"1JN"`). Returns `None` for unknown tokens.
pub fn book_code(raw: &str) -> Option<&'static str> {
    BOOK_INDEX.get(&normalize_book_key(raw)).map(|book| book.id)
}

/// Returns the display name for a canonical USFM code.
pub fn book_name(code: &str) -> Option<&'static str> {
    BOOKS
        .iter()
        .find(|book| book.id == code)
        .map(|book| book.name)
}

fn normalize_book_key(raw: &str) -> String {
    raw.to_lowercase().split_whitespace().collect()
}
