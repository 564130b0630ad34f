// Search query builders.
// Produce literal search strings for an external web search tool; no network I/O.

use chrono::NaiveDate;
use serde::Serialize;

/// Class and experience categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassCategory {
    MartialArts,
    Cooking,
    Pottery,
    Art,
    #[default]
    General,
}

impl ClassCategory {
    pub const ALL: [ClassCategory; 5] = [
        ClassCategory::MartialArts,
        ClassCategory::Cooking,
        ClassCategory::Pottery,
        ClassCategory::Art,
        ClassCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassCategory::MartialArts => "martial-arts",
            ClassCategory::Cooking => "cooking",
            ClassCategory::Pottery => "pottery",
            ClassCategory::Art => "art",
            ClassCategory::General => "general",
        }
    }

    /// Look up a category by its exact name. Anything else maps to `General`.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == name)
            .unwrap_or_default()
    }

    /// Search strings for this category in a city.
    pub fn queries(&self, city: &str) -> Vec<String> {
        match self {
            ClassCategory::MartialArts => vec![
                format!("BJJ beginner class {city} free trial"),
                format!("martial arts intro class {city}"),
                format!("kickboxing beginner class {city}"),
                format!("martial arts couples class {city}"),
            ],
            ClassCategory::Cooking => vec![
                format!("cooking class {city} couples"),
                format!("cooking class {city} date night"),
                format!("best cooking classes {city}"),
                format!("pasta making class {city}"),
            ],
            ClassCategory::Pottery => vec![
                format!("pottery class {city} beginners drop-in"),
                format!("ceramic class {city} couples"),
                format!("wheel throwing class {city} beginner"),
            ],
            ClassCategory::Art => vec![
                format!("paint and sip {city}"),
                format!("art class {city} beginners"),
                format!("stained glass class {city}"),
                format!("drawing class {city} drop-in"),
            ],
            ClassCategory::General => vec![
                format!("couples activities {city}"),
                format!("unique date experiences {city}"),
                format!("ClassBento {city}"),
                format!("Airbnb experiences {city}"),
            ],
        }
    }
}

/// Search strings for classes in a city. Unknown categories use the general set.
pub fn class_search_queries(category: &str, city: &str) -> Vec<String> {
    ClassCategory::from_name(category).queries(city)
}

pub fn comedy_search_queries(city: &str, today: NaiveDate) -> Vec<String> {
    let date = today.format("%Y-%m-%d");
    let month_year = month_year(today);
    vec![
        format!("comedy shows {city} this week {date}"),
        format!("stand up comedy {city} this weekend"),
        format!("best comedy clubs {city} upcoming shows {month_year}"),
        format!("comedy events {city} tonight"),
    ]
}

pub fn theater_search_queries(city: &str) -> Vec<String> {
    vec![
        format!("theater shows {city} now playing"),
        format!("broadway shows {city} current"),
        format!("live theater {city} this month"),
        format!("performing arts {city} upcoming shows"),
    ]
}

pub fn food_event_search_queries(city: &str, today: NaiveDate) -> Vec<String> {
    let month_year = month_year(today);
    let year = today.format("%Y");
    vec![
        format!("food events {city} {month_year}"),
        format!("food festival {city} this month"),
        format!("pop up restaurant {city} this week"),
        format!("restaurant week {city} {year}"),
    ]
}

pub fn museum_exhibition_queries(city: &str, today: NaiveDate) -> Vec<String> {
    let month_year = month_year(today);
    vec![
        format!("museum exhibitions {city} {month_year}"),
        format!("art exhibitions {city} now"),
        format!("best museums {city} current shows"),
        format!("free museum days {city} this month"),
    ]
}

fn month_year(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Booking site suggested alongside class searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Platform {
    pub name: &'static str,
    pub url: &'static str,
    pub focus: &'static str,
}

pub const CLASS_PLATFORMS: [Platform; 4] = [
    Platform {
        name: "ClassBento",
        url: "https://classbento.com",
        focus: "Creative classes",
    },
    Platform {
        name: "Coursehorse",
        url: "https://coursehorse.com",
        focus: "All class types",
    },
    Platform {
        name: "Airbnb Experiences",
        url: "https://www.airbnb.com/s/experiences",
        focus: "Unique local experiences",
    },
    Platform {
        name: "Groupon",
        url: "https://www.groupon.com/local/things-to-do",
        focus: "Deals on classes",
    },
];
