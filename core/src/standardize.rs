//! Product name standardization.
//!
//! Vendors type product names free-form ("햇 사과 부사 10kg", "Fuji apple").
//! Price comparison only works when equivalent offers share one canonical
//! name, so raw names are normalized and resolved against a catalog of
//! standardized names, with a fuzzy fallback for near-misses.

use std::collections::HashMap;
use std::sync::OnceLock;
use strsim::jaro_winkler;

/// Minimum Jaro-Winkler similarity for a fuzzy hit. Below this the raw name
/// stays unstandardized and never groups with other listings.
const FUZZY_THRESHOLD: f64 = 0.92;

type CatalogMap = HashMap<&'static str, Vec<&'static str>>;

/// Global catalog of standardized names and their known aliases, initialized
/// once on first access.
static CATALOG: OnceLock<CatalogMap> = OnceLock::new();

fn build_catalog() -> CatalogMap {
    let mut catalog = HashMap::new();

    catalog.insert("사과", vec!["apple", "fuji apple", "부사", "홍로", "사과 부사"]);
    catalog.insert("배", vec!["pear", "신고배", "원황배", "나주배"]);
    catalog.insert("감자", vec!["potato", "수미감자", "감자 수미"]);
    catalog.insert("고구마", vec!["sweet potato", "밤고구마", "호박고구마"]);
    catalog.insert("양파", vec!["onion", "햇양파", "자색양파"]);
    catalog.insert("대파", vec!["green onion", "scallion", "흙대파"]);
    catalog.insert("배추", vec!["napa cabbage", "cabbage", "김장배추", "알배추"]);
    catalog.insert("무", vec!["radish", "세척무", "김장무"]);
    catalog.insert("당근", vec!["carrot", "세척당근", "흙당근"]);
    catalog.insert("마늘", vec!["garlic", "깐마늘", "통마늘"]);
    catalog.insert("토마토", vec!["tomato", "완숙토마토", "방울토마토"]);
    catalog.insert("오이", vec!["cucumber", "백다다기", "취청오이"]);
    catalog.insert("딸기", vec!["strawberry", "설향", "설향 딸기"]);
    catalog.insert("포도", vec!["grape", "샤인머스캣", "캠벨"]);

    catalog
}

/// Grade/packaging noise that carries no identity: sizes, grades, origin
/// fillers. Stripped before lookup.
const NOISE_WORDS: &[&str] = &[
    "햇", "특", "상", "중", "하", "특품", "상품", "국산", "수입", "세척", "흙",
    "fresh", "premium", "organic", "box",
];

/// Normalize a raw product name: lowercase, collapse whitespace, strip size
/// suffixes like "10kg" and grade noise words.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .split_whitespace()
        .filter(|word| !NOISE_WORDS.contains(word))
        .filter(|word| !is_size_token(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_size_token(word: &str) -> bool {
    let stripped = word
        .trim_end_matches("kg")
        .trim_end_matches('g')
        .trim_end_matches("개입")
        .trim_end_matches("입");
    stripped != word && stripped.chars().all(|c| c.is_ascii_digit()) && !stripped.is_empty()
}

/// Resolve a raw vendor product name to its standardized catalog name.
///
/// Ladder: normalized exact match against the standard name or any alias,
/// then a Jaro-Winkler pass over the catalog. Returns `None` for names the
/// catalog does not cover; callers keep the raw name in that case.
pub fn standardize(raw: &str) -> Option<&'static str> {
    let normalized = normalize(raw);
    if normalized.is_empty() {
        return None;
    }

    let catalog = CATALOG.get_or_init(build_catalog);

    // Exact pass first so an alias hit never loses to a fuzzy one
    for (standard, aliases) in catalog.iter() {
        if normalized == standard.to_lowercase() {
            return Some(standard);
        }
        if aliases.iter().any(|a| normalized == a.to_lowercase()) {
            return Some(standard);
        }
    }

    let mut best: Option<(&'static str, f64)> = None;
    for (standard, aliases) in catalog.iter() {
        let score = std::iter::once(*standard)
            .chain(aliases.iter().copied())
            .map(|candidate| jaro_winkler(&normalized, &candidate.to_lowercase()))
            .fold(0.0_f64, f64::max);

        if score >= FUZZY_THRESHOLD && best.map_or(true, |(_, s)| score > s) {
            best = Some((standard, score));
        }
    }

    best.map(|(standard, _)| standard)
}
