use std::sync::LazyLock;

use rdpbench_core::Metadata;
use regex::Regex;

use crate::result::{CheckResult, Item, Shape};

static FILE_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s/\\]+\.[A-Za-z0-9]{2,5}$").ok());

static MEDIA_TYPE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^(application|audio|font|example|image|message|model|multipart|text|video)/[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]{0,126}$",
    )
    .ok()
});

static BYTE_SIZE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^\d+([.,]\d+)?\s*(b|bytes?|kb|mb|gb|tb|pb|kib|mib|gib|tib|pib)$").ok()
});

/// Texts shorter than this keep their declared tag; detection on a handful
/// of words is noise.
const MIN_DETECTION_WORDS: usize = 8;

fn matches(re: &LazyLock<Option<Regex>>, value: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(value))
}

fn words(text: &str) -> Item {
    Item::from(text.split_whitespace().count())
}

/// ISO 639-1 code of a detected language, for the languages metadata is
/// commonly written in.
fn iso_639_1(lang: whatlang::Lang) -> Option<&'static str> {
    let code = match lang.code() {
        "eng" => "en",
        "deu" => "de",
        "fra" => "fr",
        "spa" => "es",
        "por" => "pt",
        "ita" => "it",
        "nld" => "nl",
        "dan" => "da",
        "swe" => "sv",
        "nob" => "nb",
        "fin" => "fi",
        "pol" => "pl",
        "ces" => "cs",
        "slk" => "sk",
        "hun" => "hu",
        "ron" => "ro",
        "hrv" => "hr",
        "slv" => "sl",
        "est" => "et",
        "lit" => "lt",
        "lav" => "lv",
        "ell" => "el",
        "tur" => "tr",
        "rus" => "ru",
        "ukr" => "uk",
        "bul" => "bg",
        "ara" => "ar",
        "heb" => "he",
        "hin" => "hi",
        "jpn" => "ja",
        "kor" => "ko",
        "cmn" => "zh",
        _ => return None,
    };
    Some(code)
}

/// Language of `text`: a reliable detection on enough words wins, then the
/// declared tag, then whatever the detector guessed.
fn text_language(text: &str, declared: Option<&str>) -> Item {
    let declared = declared.map(str::trim).filter(|tag| !tag.is_empty());
    let detected = whatlang::detect(text);
    let long_enough = text.split_whitespace().count() >= MIN_DETECTION_WORDS;

    if let Some(info) = detected.as_ref().filter(|info| long_enough && info.is_reliable()) {
        if let Some(code) = iso_639_1(info.lang()) {
            return Item::from(code);
        }
    }
    if let Some(tag) = declared {
        return Item::from(tag);
    }
    Item::from(detected.and_then(|info| iso_639_1(info.lang())))
}

fn count(len: usize) -> CheckResult {
    CheckResult::metric(len as f64, "")
}

/// List result over a collection; an empty collection cannot be assessed.
fn per_item<T>(items: &[T], what: &str, measure: impl Fn(&T) -> Item) -> CheckResult {
    if items.is_empty() {
        return CheckResult::undetermined(Shape::List, format!("no {what} given"));
    }
    CheckResult::list(items.iter().map(measure).collect(), "")
}

pub(crate) fn descriptions_number(md: &Metadata) -> CheckResult {
    count(md.descriptions.len())
}

pub(crate) fn descriptions_length(md: &Metadata) -> CheckResult {
    per_item(&md.descriptions, "descriptions", |d| words(&d.text))
}

pub(crate) fn descriptions_language(md: &Metadata) -> CheckResult {
    per_item(&md.descriptions, "descriptions", |d| {
        text_language(&d.text, d.lang.as_deref())
    })
}

pub(crate) fn descriptions_type(md: &Metadata) -> CheckResult {
    per_item(&md.descriptions, "descriptions", |d| {
        Item::from(d.description_type.as_deref())
    })
}

pub(crate) fn titles_number(md: &Metadata) -> CheckResult {
    count(md.titles.len())
}

pub(crate) fn titles_length(md: &Metadata) -> CheckResult {
    per_item(&md.titles, "titles", |t| words(&t.text))
}

pub(crate) fn titles_language(md: &Metadata) -> CheckResult {
    per_item(&md.titles, "titles", |t| text_language(&t.text, t.lang.as_deref()))
}

pub(crate) fn titles_just_a_file_name(md: &Metadata) -> CheckResult {
    per_item(&md.titles, "titles", |t| {
        Item::from(matches(&FILE_NAME, t.text.trim()))
    })
}

/// Untyped titles are main titles and show up as null.
pub(crate) fn titles_type(md: &Metadata) -> CheckResult {
    per_item(&md.titles, "titles", |t| Item::from(t.title_type.as_deref()))
}

pub(crate) fn formats_media_type(md: &Metadata) -> CheckResult {
    per_item(&md.formats, "formats", |format| {
        let essence = format.split(';').next().unwrap_or_default().trim();
        Item::from(matches(&MEDIA_TYPE, essence))
    })
}

pub(crate) fn subjects_qualified(md: &Metadata) -> CheckResult {
    per_item(&md.subjects, "subjects", |s| {
        Item::from(s.scheme.is_some() && s.scheme_uri.is_some())
    })
}

pub(crate) fn subjects_number(md: &Metadata) -> CheckResult {
    count(md.subjects.len())
}

pub(crate) fn subjects_have_ddc(md: &Metadata) -> CheckResult {
    let found = md.subjects.iter().any(|s| {
        let scheme = s.scheme.as_deref().unwrap_or_default().to_ascii_lowercase();
        let uri = s.scheme_uri.as_deref().unwrap_or_default().to_ascii_lowercase();
        scheme == "ddc" || scheme.contains("dewey") || uri.contains("dewey")
    });
    CheckResult::boolean(found, "")
}

pub(crate) fn subjects_wikidata(md: &Metadata) -> CheckResult {
    let found = md.subjects.iter().any(|s| {
        [s.value_uri.as_deref(), s.scheme_uri.as_deref()]
            .into_iter()
            .flatten()
            .any(|uri| uri.contains("wikidata.org"))
    });
    CheckResult::boolean(found, "")
}

pub(crate) fn sizes_number(md: &Metadata) -> CheckResult {
    count(md.sizes.len())
}

pub(crate) fn sizes_byte_size(md: &Metadata) -> CheckResult {
    per_item(&md.sizes, "sizes", |size| {
        Item::from(matches(&BYTE_SIZE, size.trim()))
    })
}

pub(crate) fn language_specified(md: &Metadata) -> CheckResult {
    let specified = md
        .language
        .as_deref()
        .is_some_and(|lang| !lang.trim().is_empty());
    CheckResult::boolean(specified, "")
}
