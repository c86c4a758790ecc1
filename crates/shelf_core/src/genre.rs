use std::collections::BTreeSet;
use std::fmt;

/// Label of the synthetic catalog entry that means "no genre filter".
pub const ALL_GENRES_LABEL: &str = "All";

/// Genres offered to the post composer even before any book uses them.
pub const SUGGESTED_GENRES: &[&str] = &[
    "Fiction",
    "Non-Fiction",
    "Romance",
    "Thriller",
    "Mystery",
    "Fantasy",
    "Science Fiction",
    "Classics",
    "Biography",
    "History",
    "Self-Help",
    "Cookbook",
    "Educational",
    "Young Adult",
    "Children's",
    "Personal Finance",
    "Historical Fiction",
    "Literary Fiction",
    "Business",
];

/// Lowercase alias -> canonical genre name.
const GENRE_ALIASES: &[(&str, &str)] = &[
    ("sci-fi", "Science Fiction"),
    ("scifi", "Science Fiction"),
    ("science-fiction", "Science Fiction"),
    ("sciencefiction", "Science Fiction"),
    ("sf", "Science Fiction"),
    ("non-fiction", "Non-Fiction"),
    ("nonfiction", "Non-Fiction"),
    ("non fiction", "Non-Fiction"),
    ("nf", "Non-Fiction"),
    ("fiction", "Fiction"),
    ("general fiction", "Fiction"),
    ("romance", "Romance"),
    ("romantic", "Romance"),
    ("love story", "Romance"),
    ("rom", "Romance"),
    ("thriller", "Thriller"),
    ("suspense", "Thriller"),
    ("thrill", "Thriller"),
    ("psychological thriller", "Thriller"),
    ("mystery", "Mystery"),
    ("crime", "Mystery"),
    ("detective", "Mystery"),
    ("whodunit", "Mystery"),
    ("horror", "Horror"),
    ("scary", "Horror"),
    ("terror", "Horror"),
    ("fantasy", "Fantasy"),
    ("high fantasy", "Fantasy"),
    ("epic fantasy", "Fantasy"),
    ("fant", "Fantasy"),
    ("classics", "Classics"),
    ("classic", "Classics"),
    ("literary classics", "Classics"),
    ("biography", "Biography"),
    ("bio", "Biography"),
    ("autobiography", "Biography"),
    ("memoir", "Biography"),
    ("history", "History"),
    ("hist", "History"),
    ("self-help", "Self-Help"),
    ("selfhelp", "Self-Help"),
    ("personal development", "Self-Help"),
    ("self-improvement", "Self-Help"),
    ("cookbook", "Cookbook"),
    ("cooking", "Cookbook"),
    ("recipe", "Cookbook"),
    ("culinary", "Cookbook"),
    ("educational", "Educational"),
    ("education", "Educational"),
    ("academic", "Educational"),
    ("textbook", "Educational"),
    ("young adult", "Young Adult"),
    ("ya", "Young Adult"),
    ("teen", "Young Adult"),
    ("youth", "Young Adult"),
    ("children's", "Children's"),
    ("childrens", "Children's"),
    ("kids", "Children's"),
    ("juvenile", "Children's"),
    ("personal finance", "Personal Finance"),
    ("finance", "Personal Finance"),
    ("money", "Personal Finance"),
    ("financial", "Personal Finance"),
    ("historical fiction", "Historical Fiction"),
    ("histfic", "Historical Fiction"),
    ("historical novel", "Historical Fiction"),
    ("historical", "Historical Fiction"),
    ("literary fiction", "Literary Fiction"),
    ("lit fic", "Literary Fiction"),
    ("literary", "Literary Fiction"),
    ("lit", "Literary Fiction"),
    ("business", "Business"),
    ("biz", "Business"),
    ("entrepreneurship", "Business"),
    ("management", "Business"),
    ("poetry", "Poetry"),
    ("poem", "Poetry"),
    ("verse", "Poetry"),
    ("adventure", "Adventure"),
    ("action", "Adventure"),
    ("quest", "Adventure"),
    ("dystopian", "Dystopian"),
    ("dystopia", "Dystopian"),
    ("post-apocalyptic", "Dystopian"),
    ("humor", "Humor"),
    ("comedy", "Humor"),
    ("funny", "Humor"),
    ("satire", "Humor"),
    ("graphic novel", "Graphic Novel"),
    ("comic", "Graphic Novel"),
    ("manga", "Graphic Novel"),
    ("graphic", "Graphic Novel"),
    ("true crime", "True Crime"),
    ("truecrime", "True Crime"),
    ("crime story", "True Crime"),
    ("paranormal", "Paranormal"),
    ("supernatural", "Paranormal"),
    ("ghost story", "Paranormal"),
    ("western", "Western"),
    ("cowboy", "Western"),
    ("frontier", "Western"),
    ("travel", "Travel"),
    ("travelogue", "Travel"),
    ("adventure travel", "Travel"),
];

/// Map user-typed genre text onto its canonical name.
///
/// Unknown genres are kept as typed, minus surrounding whitespace.
pub fn normalize_genre(raw: &str) -> String {
    let trimmed = raw.trim();
    let lowered = trimmed.to_lowercase();
    GENRE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Build the filter bar entries: "All" followed by the distinct, non-blank
/// genre names in alphabetical order.
pub fn build_catalog<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let distinct: BTreeSet<String> = raw
        .into_iter()
        .map(|genre| genre.as_ref().trim().to_string())
        .filter(|genre| !genre.is_empty() && genre != ALL_GENRES_LABEL)
        .collect();

    let mut catalog = Vec::with_capacity(distinct.len() + 1);
    catalog.push(ALL_GENRES_LABEL.to_string());
    catalog.extend(distinct);
    catalog
}

/// Which slice of the listing API the feed shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GenreFilter {
    #[default]
    All,
    Genre(String),
}

impl GenreFilter {
    /// Interpret a catalog label. "All" (and blank input) selects the unfiltered feed.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.is_empty() || trimmed == ALL_GENRES_LABEL {
            GenreFilter::All
        } else {
            GenreFilter::Genre(trimmed.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            GenreFilter::All => ALL_GENRES_LABEL,
            GenreFilter::Genre(name) => name,
        }
    }

    pub fn genre(&self) -> Option<&str> {
        match self {
            GenreFilter::All => None,
            GenreFilter::Genre(name) => Some(name),
        }
    }
}

impl fmt::Display for GenreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
